use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::main_lib::AppState;

/// Shared-secret bearer check for the protected API routes.
pub struct ApiKeyAuth {
    api_key: String,
}

#[derive(Debug, PartialEq, Eq)]
pub enum AuthError {
    MissingCredentials,
    InvalidScheme,
    InvalidKey,
}

#[derive(Serialize)]
struct AuthErrorBody {
    code: u16,
    message: String,
}

impl ApiKeyAuth {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }

    /// Checks an `Authorization` header value.
    pub fn verify(&self, header: Option<&str>) -> Result<(), AuthError> {
        let header = header.ok_or(AuthError::MissingCredentials)?;

        let mut parts = header.splitn(2, ' ');
        let (Some(scheme), Some(token)) = (parts.next(), parts.next()) else {
            return Err(AuthError::InvalidScheme);
        };
        if !scheme.eq_ignore_ascii_case("Bearer") {
            return Err(AuthError::InvalidScheme);
        }

        if !constant_time_eq(token.trim().as_bytes(), self.api_key.as_bytes()) {
            return Err(AuthError::InvalidKey);
        }
        Ok(())
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = match self {
            AuthError::MissingCredentials => "Missing Authorization header",
            AuthError::InvalidScheme => "Authorization header must use the Bearer scheme",
            AuthError::InvalidKey => "Invalid API key",
        };
        let status = StatusCode::UNAUTHORIZED;
        let body = Json(AuthErrorBody {
            code: status.as_u16(),
            message: message.to_string(),
        });
        (status, body).into_response()
    }
}

pub async fn require_api_key(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let Some(auth) = state.auth.as_ref() else {
        return Ok(next.run(request).await);
    };

    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    if let Err(err) = auth.verify(header) {
        tracing::warn!(
            "Rejected {} {}: {:?}",
            request.method(),
            request.uri().path(),
            err
        );
        return Err(err);
    }
    Ok(next.run(request).await)
}
