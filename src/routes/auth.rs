use std::fmt::Display;
use std::sync::LazyLock;

use axum::Json;
use axum::RequestPartsExt;
use axum::extract::{FromRequestParts, State};
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::response::IntoResponse;
use axum_extra::extract::TypedHeader;
use axum_extra::headers::{Authorization, authorization::Bearer};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::instrument;

use crate::errors::AuthError;
use crate::startup::AppState;

static KEYS: LazyLock<Keys> = LazyLock::new(|| {
    let secret = std::env::var("JWT_SECRET").expect("JWT_SECRET must be set");
    Keys::new(secret.as_bytes())
});

pub struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl Keys {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

impl Claims {
    /// 24h session for the given user id.
    fn for_user(user_id: uuid::Uuid) -> Self {
        Self {
            sub: user_id.to_string(),
            exp: (chrono::Utc::now() + chrono::Duration::hours(24)).timestamp() as usize,
        }
    }

    /// The `sub` claim as the user id it was issued for.
    pub fn user_id(&self) -> Result<uuid::Uuid, AuthError> {
        uuid::Uuid::parse_str(&self.sub).map_err(|_| AuthError::InvalidToken)
    }
}

impl Display for Claims {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "User: {}", self.sub)
    }
}

#[derive(Debug, Serialize)]
pub struct AuthBody {
    access_token: String,
    token_type: String,
}

impl AuthBody {
    fn new(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "Bearer".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterPayload {
    username: String,
    email: String,
    password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    email: String,
    password: String,
}

fn issue_token(user_id: uuid::Uuid) -> Result<AuthBody, AuthError> {
    let claims = Claims::for_user(user_id);
    let token = encode(&Header::default(), &claims, &KEYS.encoding).map_err(|e| {
        tracing::error!("JWT Encoding failed: {:?}", e);
        AuthError::TokenCreation
    })?;
    Ok(AuthBody::new(token))
}

#[instrument(name = "HTTP: Register new user", skip(state, payload))]
pub async fn register_handler(
    State(state): State<AppState>,
    Json(payload): Json<RegisterPayload>,
) -> Result<impl IntoResponse, AuthError> {
    let user_id = state
        .auth_service
        .register(&payload.username, &payload.email, &payload.password)
        .await?;

    tracing::info!("User registered");
    Ok((StatusCode::CREATED, Json(issue_token(user_id)?)))
}

#[instrument(
    name = "HTTP: Login",
    skip(state, payload),
    fields(user_email = %payload.email)
)]
pub async fn login_handler(
    State(state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<AuthBody>, AuthError> {
    tracing::info!("Received login request");

    let user_id = state
        .auth_service
        .login(&payload.email, &payload.password)
        .await
        .map_err(|e| {
            tracing::error!("Authorization failed: {:?}", e);
            e
        })?;

    tracing::info!("JWT issued for user");
    Ok(Json(issue_token(user_id)?))
}

#[instrument(name = "HTTP: Current user", skip(state, claims))]
pub async fn current_user_handler(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<impl IntoResponse, AuthError> {
    let user = state.auth_service.current_user(claims.user_id()?).await?;

    Ok(Json(json!({ "user": user })))
}

impl<S> FromRequestParts<S> for Claims
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    #[instrument(name = "Extracting Claims", skip(_state, parts))]
    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| {
                tracing::warn!("No bearer token in Authorization header");
                AuthError::InvalidToken
            })?;

        let token_data = decode::<Claims>(bearer.token(), &KEYS.decoding, &Validation::default())
            .map_err(|e| {
                tracing::error!("JWT decoding failed: {:?}", e);
                AuthError::InvalidToken
            })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claims_round_trip_through_jwt() {
        let keys = Keys::new(b"test-secret");
        let user_id = uuid::Uuid::new_v4();
        let claims = Claims::for_user(user_id);

        let token = encode(&Header::default(), &claims, &keys.encoding).unwrap();
        let decoded = decode::<Claims>(&token, &keys.decoding, &Validation::default()).unwrap();

        assert_eq!(decoded.claims.sub, user_id.to_string());
        assert_eq!(decoded.claims.user_id().unwrap(), user_id);
    }

    #[test]
    fn expired_token_is_rejected() {
        let keys = Keys::new(b"test-secret");
        let claims = Claims {
            sub: uuid::Uuid::new_v4().to_string(),
            exp: (chrono::Utc::now() - chrono::Duration::hours(1)).timestamp() as usize,
        };

        let token = encode(&Header::default(), &claims, &keys.encoding).unwrap();
        let result = decode::<Claims>(&token, &keys.decoding, &Validation::default());

        assert!(result.is_err());
    }

    #[test]
    fn token_signed_with_other_key_is_rejected() {
        let signer = Keys::new(b"one-secret");
        let verifier = Keys::new(b"another-secret");
        let claims = Claims::for_user(uuid::Uuid::new_v4());

        let token = encode(&Header::default(), &claims, &signer.encoding).unwrap();
        let result = decode::<Claims>(&token, &verifier.decoding, &Validation::default());

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn request_without_authorization_header_is_rejected() {
        let (mut parts, _) = axum::http::Request::builder()
            .uri("/ideas")
            .body(())
            .unwrap()
            .into_parts();

        let result = Claims::from_request_parts(&mut parts, &()).await;

        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn non_bearer_authorization_header_is_rejected() {
        let (mut parts, _) = axum::http::Request::builder()
            .uri("/ideas")
            .header("Authorization", "Token abc123")
            .body(())
            .unwrap()
            .into_parts();

        let result = Claims::from_request_parts(&mut parts, &()).await;

        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[test]
    fn malformed_sub_is_an_invalid_token() {
        let claims = Claims {
            sub: "not-a-uuid".into(),
            exp: 0,
        };

        assert!(matches!(claims.user_id(), Err(AuthError::InvalidToken)));
    }
}
