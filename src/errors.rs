use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("User already exists")]
    UserAlreadyExists,

    #[error("Wrong credentials")]
    WrongCredentials,

    #[error("Missing credentials")]
    MissingCredentials,

    #[error("Token creation error")]
    TokenCreation,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Internal server error")]
    Internal,
}

impl AuthError {
    fn status_and_message(&self) -> (StatusCode, &'static str) {
        match self {
            AuthError::UserAlreadyExists => (
                StatusCode::CONFLICT,
                "A user with this username or email already exists",
            ),
            AuthError::WrongCredentials => (StatusCode::UNAUTHORIZED, "Invalid email or password"),
            AuthError::MissingCredentials => {
                (StatusCode::BAD_REQUEST, "Required credentials are missing")
            }
            AuthError::TokenCreation => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to generate session",
            ),
            AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid or expired session"),
            AuthError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An unexpected error occurred",
            ),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, error_message) = self.status_and_message();

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

#[derive(Debug, Error)]
pub enum IdeaError {
    #[error("Idea not found")]
    NotFound,

    #[error("Missing idea payload")]
    MissingPayload,

    #[error("Invalid pagination parameters")]
    InvalidPagination,

    #[error("Idea belongs to another user")]
    NotOwner,

    #[error("Internal server error")]
    Internal,

    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl IdeaError {
    fn status_and_message(&self) -> (StatusCode, &'static str) {
        match self {
            IdeaError::NotFound => (StatusCode::NOT_FOUND, "Idea not found"),
            IdeaError::MissingPayload => (StatusCode::BAD_REQUEST, "An idea object is required"),
            IdeaError::InvalidPagination => {
                (StatusCode::BAD_REQUEST, "limit and offset must be non-negative")
            }
            IdeaError::NotOwner => (StatusCode::FORBIDDEN, "Idea belongs to another user"),
            IdeaError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An unexpected error occurred",
            ),
            IdeaError::Auth(inner) => inner.status_and_message(),
        }
    }
}

impl IntoResponse for IdeaError {
    fn into_response(self) -> Response {
        let (status, error_message) = self.status_and_message();

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_errors_map_to_expected_statuses() {
        assert_eq!(
            AuthError::WrongCredentials.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::InvalidToken.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::UserAlreadyExists.into_response().status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AuthError::MissingCredentials.into_response().status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn idea_errors_map_to_expected_statuses() {
        assert_eq!(
            IdeaError::NotFound.into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            IdeaError::MissingPayload.into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            IdeaError::InvalidPagination.into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            IdeaError::NotOwner.into_response().status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            IdeaError::Internal.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn missing_credentials_message_fits_login_and_register() {
        // returned from both flows; login has no username field
        let (status, message) = AuthError::MissingCredentials.status_and_message();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(message, "Required credentials are missing");
    }

    #[test]
    fn wrapped_auth_error_keeps_its_status() {
        let err = IdeaError::from(AuthError::InvalidToken);
        assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);
    }
}
