use axum::{
    RequestPartsExt, async_trait,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use axum_extra::{
    TypedHeader,
    extract::CookieJar,
    headers::{Authorization, authorization::Bearer},
};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::{
    config::config_loader, domain::value_objects::iam::AuthSubject,
    infrastructure::axum_http::error_responses::error_response,
};

pub const SESSION_COOKIE: &str = "session";

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    #[serde(default)]
    pub is_staff: bool,
    pub exp: usize,
}

#[derive(Debug)]
pub struct AuthError(anyhow::Error);

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        AuthError(err)
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        debug!(reason = %self.0, "auth: rejected request");
        error_response(StatusCode::UNAUTHORIZED, format!("Unauthorized: {}", self.0))
    }
}

pub fn validate_session_token(token: &str, secret: &str) -> Result<AuthSubject, AuthError> {
    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::new(Algorithm::HS256);

    let token_data = decode::<SessionClaims>(token, &decoding_key, &validation)
        .map_err(|e| anyhow::anyhow!("JWT validation failed: {}", e))?;

    let user_id = Uuid::parse_str(&token_data.claims.sub)
        .map_err(|_| anyhow::anyhow!("Invalid user ID in token"))?;

    Ok(AuthSubject {
        user_id,
        is_staff: token_data.claims.is_staff,
    })
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthSubject
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Bearer header first, then the browser session cookie.
        let token = match parts.extract::<TypedHeader<Authorization<Bearer>>>().await {
            Ok(TypedHeader(Authorization(bearer))) => bearer.token().to_string(),
            Err(_) => CookieJar::from_headers(&parts.headers)
                .get(SESSION_COOKIE)
                .map(|cookie| cookie.value().to_string())
                .ok_or_else(|| anyhow::anyhow!("Missing credentials"))?,
        };

        let secret = config_loader::get_jwt_secret()?;
        validate_session_token(&token, &secret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Request, header};
    use jsonwebtoken::{EncodingKey, Header, encode};

    const SECRET: &str = "supersecretjwtsecretforunittesting123";
    const USER_ID: &str = "123e4567-e89b-12d3-a456-426614174000";

    fn token(secret: &str, sub: &str, is_staff: bool, exp: usize) -> String {
        let claims = SessionClaims {
            sub: sub.to_string(),
            is_staff,
            exp,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_validate_session_token_success() {
        let subject =
            validate_session_token(&token(SECRET, USER_ID, true, 9999999999), SECRET).unwrap();

        assert_eq!(subject.user_id, Uuid::parse_str(USER_ID).unwrap());
        assert!(subject.is_staff);
    }

    #[test]
    fn test_validate_session_token_expired() {
        let result = validate_session_token(&token(SECRET, USER_ID, false, 1), SECRET);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_session_token_invalid_signature() {
        let result = validate_session_token(&token("wrongsecret", USER_ID, false, 9999999999), SECRET);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_session_token_bad_subject() {
        let result = validate_session_token(&token(SECRET, "not-a-uuid", false, 9999999999), SECRET);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_missing_credentials_is_unauthorized() {
        let (mut parts, _) = Request::builder()
            .uri("/api/v1/students")
            .header(header::ACCEPT, "application/json")
            .body(())
            .unwrap()
            .into_parts();

        let rejection = AuthSubject::from_request_parts(&mut parts, &()).await.unwrap_err();
        assert_eq!(rejection.into_response().status(), StatusCode::UNAUTHORIZED);
    }
}
