use clap::{Parser, Subcommand};
use studymate::{
    build_search_service,
    config::AppConfig,
    db,
    repositories::SqliteUserRepository,
    services::{CreateUserRequest, UserService},
};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "studymate-cli")]
#[command(about = "CLI tool for managing StudyMate users and running searches", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// User management commands
    User {
        #[command(subcommand)]
        command: UserCommands,
    },

    /// Run an aggregated search and print the JSON result
    Search {
        /// Topic to search for
        topic: String,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// Create a new user
    Create {
        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password (will prompt if not provided)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// List all users
    List {
        /// Maximum number of users to display
        #[arg(short, long, default_value_t = 100)]
        limit: i64,

        /// Offset for pagination
        #[arg(short = 'o', long, default_value_t = 0)]
        offset: i64,
    },
}

fn get_password(prompt: &str) -> anyhow::Result<String> {
    use std::io::{self, Write};
    print!("{}: ", prompt);
    io::stdout().flush()?;

    Ok(rpassword::read_password()?)
}

async fn open_user_service(config: &AppConfig) -> anyhow::Result<UserService> {
    let pool = db::create_pool(&config.database_url).await?;
    db::run_migrations(&pool).await?;

    let user_repository = Arc::new(SqliteUserRepository::new(pool));
    Ok(UserService::new(user_repository))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::from_env()?;

    match cli.command {
        Commands::User { command } => {
            let user_service = open_user_service(&config).await?;

            match command {
                UserCommands::Create { email, password } => {
                    let password = match password {
                        Some(pw) => pw,
                        None => {
                            let password = get_password("Password")?;
                            if password != get_password("Confirm password")? {
                                eprintln!("❌ Passwords do not match");
                                std::process::exit(1);
                            }
                            password
                        }
                    };

                    let request = CreateUserRequest { email, password };

                    match user_service.create_user(request).await {
                        Ok(user) => {
                            println!("✅ User created successfully!");
                            println!("  ID: {}", user.id);
                            println!("  Email: {}", user.email);
                        }
                        Err(err) => {
                            eprintln!("❌ Failed to create user: {}", err);
                            std::process::exit(1);
                        }
                    }
                }

                UserCommands::List { limit, offset } => {
                    match user_service.list_users(Some(limit), Some(offset)).await {
                        Ok(users) => {
                            if users.is_empty() {
                                println!("No users found.");
                            } else {
                                println!("{:<5} {:<40} {:<20}", "ID", "Email", "Created");
                                println!("{}", "-".repeat(65));
                                for user in users {
                                    println!(
                                        "{:<5} {:<40} {:<20}",
                                        user.id,
                                        user.email,
                                        user.created_at.as_deref().unwrap_or("N/A")
                                    );
                                }
                            }
                        }
                        Err(err) => {
                            eprintln!("❌ Failed to list users: {}", err);
                            std::process::exit(1);
                        }
                    }
                }
            }
        }

        Commands::Search { topic } => {
            let topic = topic.trim();
            if topic.is_empty() {
                eprintln!("❌ A topic is required");
                std::process::exit(1);
            }

            let search_service = build_search_service(&config)?;
            let results = search_service.search(topic).await;
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
    }

    Ok(())
}
