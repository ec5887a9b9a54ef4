use crate::models::user::User;
use crate::repositories::{RepositoryError, UserRepository};
use crate::services::token_service::{TokenError, TokenService};
use crate::services::user_service::verify_password;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Token error: {0}")]
    Token(#[from] TokenError),
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub struct AuthService {
    user_repository: Arc<dyn UserRepository>,
    token_service: Arc<TokenService>,
}

impl AuthService {
    pub fn new(user_repository: Arc<dyn UserRepository>, token_service: Arc<TokenService>) -> Self {
        Self {
            user_repository,
            token_service,
        }
    }

    /// Unknown email and wrong password both yield `InvalidCredentials`.
    pub async fn authenticate(&self, request: LoginRequest) -> Result<User, AuthServiceError> {
        let user = self
            .user_repository
            .find_by_email(request.email.trim())
            .await?
            .ok_or_else(|| {
                debug!("login for unknown email");
                AuthServiceError::InvalidCredentials
            })?;

        if !verify_password(&request.password, &user.password_hash) {
            debug!(user_id = user.id, "login with wrong password");
            return Err(AuthServiceError::InvalidCredentials);
        }

        Ok(user)
    }

    /// Authenticate and issue an access token for the user.
    pub async fn login(&self, request: LoginRequest) -> Result<String, AuthServiceError> {
        let user = self.authenticate(request).await?;
        let token = self.token_service.issue(user.id)?;
        info!(user_id = user.id, "user logged in");
        Ok(token)
    }
}
