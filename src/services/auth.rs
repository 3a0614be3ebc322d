use crate::{errors::AuthError, models::user::UserModel, store::user::UserRepository};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use tracing::instrument;

#[derive(Clone, Debug)]
pub struct AuthService {
    repo: UserRepository,
}

impl AuthService {
    pub fn new(repo: UserRepository) -> Self {
        Self { repo }
    }

    #[instrument(name = "AuthService: Register", skip(self, password))]
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<uuid::Uuid, AuthError> {
        if username.is_empty() || email.is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| {
                tracing::error!("Failed to hash password: {:?}", e);
                AuthError::Internal
            })?
            .to_string();

        self.repo
            .create_user(username, email, &hash)
            .await
            .map_err(|e| {
                let unique_violation = e
                    .downcast_ref::<sqlx::Error>()
                    .and_then(|e| e.as_database_error())
                    .is_some_and(|db| db.is_unique_violation());
                if unique_violation {
                    tracing::warn!("Registration rejected: username or email taken");
                    AuthError::UserAlreadyExists
                } else {
                    tracing::error!("Database error during registration: {:?}", e);
                    AuthError::Internal
                }
            })
    }

    #[instrument(
        name = "AuthService: Login attempt",
        skip(self, password),
        fields(user_email = %email)
    )]
    pub async fn login(&self, email: &str, password: &str) -> Result<uuid::Uuid, AuthError> {
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let user = self.repo.find_by_email(email).await.map_err(|e| {
            tracing::error!("Database error during login: {:?}", e);
            AuthError::Internal
        })?;

        let user = match user {
            Some(u) => u,
            None => {
                tracing::warn!("Login failed: User not found");
                return Err(AuthError::WrongCredentials);
            }
        };

        let parsed_hash = PasswordHash::new(&user.password_hash).map_err(|e| {
            tracing::error!("Critical: Failed to parse password hash from DB: {:?}", e);
            AuthError::Internal
        })?;

        if Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_err()
        {
            tracing::warn!("Login failed: Invalid password provided");
            return Err(AuthError::WrongCredentials);
        }

        tracing::info!("User authenticated successfully");
        Ok(user.id)
    }

    /// Resolves the user behind a validated token, for `GET /user`.
    #[instrument(name = "AuthService: Current user", skip(self))]
    pub async fn current_user(&self, id: uuid::Uuid) -> Result<UserModel, AuthError> {
        let user = self.repo.find_by_id(id).await.map_err(|e| {
            tracing::error!("Database error resolving current user: {:?}", e);
            AuthError::Internal
        })?;

        // The token outlived the account.
        user.ok_or(AuthError::InvalidToken)
    }
}
