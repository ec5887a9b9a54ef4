pub mod test_helpers {
    use crate::config::{AppConfig, ConfigError};
    use crate::services::user_service::hash_password;
    use crate::{routes::build_router, AppState};
    use axum::Router;
    use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
    use tempfile::NamedTempFile;

    pub const TEST_JWT_SECRET: &str = "integration-test-secret-with-enough-bytes";

    /// Create a new in-memory SQLite database for testing
    pub async fn create_test_db() -> Result<SqlitePool, sqlx::Error> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(":memory:")
            .await?;

        // Run migrations
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(pool)
    }

    /// Create a temporary file-based SQLite database for testing
    /// Useful when you need to test features that don't work with in-memory databases
    pub async fn create_test_db_file() -> Result<(SqlitePool, NamedTempFile), sqlx::Error> {
        let temp_file = NamedTempFile::new().map_err(sqlx::Error::Io)?;
        let db_path = temp_file
            .path()
            .to_str()
            .ok_or_else(|| sqlx::Error::Configuration("Invalid database path".into()))?;
        let database_url = format!("sqlite://{}", db_path);

        let pool = crate::db::create_pool(&database_url).await?;

        // Run migrations
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok((pool, temp_file))
    }

    /// Insert a test user with hashed password
    pub async fn insert_test_user(
        pool: &SqlitePool,
        email: &str,
        password: &str,
    ) -> Result<i64, sqlx::Error> {
        let password_hash = hash_password(password).map_err(|e| {
            sqlx::Error::Configuration(format!("Password hashing failed: {}", e).into())
        })?;

        let result = sqlx::query("INSERT INTO users (email, password_hash) VALUES (?, ?)")
            .bind(email)
            .bind(password_hash)
            .execute(pool)
            .await?;

        Ok(result.last_insert_rowid())
    }

    /// Configuration pointing the upstream sources at local mock servers.
    pub fn test_config(
        youtube_api_base: &str,
        duckduckgo_base: &str,
        youtube_api_key: Option<&str>,
    ) -> Result<AppConfig, ConfigError> {
        let youtube_api_base = youtube_api_base.to_string();
        let duckduckgo_base = duckduckgo_base.to_string();
        let youtube_api_key = youtube_api_key.map(str::to_string);

        AppConfig::from_lookup(|key| match key {
            "JWT_SECRET_KEY" => Some(TEST_JWT_SECRET.to_string()),
            "YOUTUBE_API_BASE" => Some(youtube_api_base.clone()),
            "DUCKDUCKGO_BASE" => Some(duckduckgo_base.clone()),
            "YOUTUBE_API_KEY" => youtube_api_key.clone(),
            "FETCH_TIMEOUT_SECS" => Some("2".to_string()),
            "SEARCH_BUDGET_SECS" => Some("4".to_string()),
            _ => None,
        })
    }

    /// Build the full router over `pool` with upstream sources pointing at
    /// an unroutable address.
    pub fn create_test_app(pool: SqlitePool) -> Router {
        let config = test_config("http://127.0.0.1:9", "http://127.0.0.1:9", None)
            .unwrap_or_else(|e| panic!("Failed to build test config: {}", e));
        create_test_app_with_config(pool, &config)
    }

    pub fn create_test_app_with_config(pool: SqlitePool, config: &AppConfig) -> Router {
        let state = AppState::from_config(pool, config)
            .unwrap_or_else(|e| panic!("Failed to build test state: {}", e));
        build_router(state)
    }
}

// Re-export commonly used test functions at module level for convenience
// Note: This is test-only code. Panic on error is acceptable in tests.
#[cfg(test)]
pub async fn create_test_pool() -> sqlx::SqlitePool {
    match test_helpers::create_test_db().await {
        Ok(pool) => pool,
        Err(e) => panic!("Failed to create test pool: {}", e),
    }
}

#[cfg(test)]
pub use test_helpers::insert_test_user;
