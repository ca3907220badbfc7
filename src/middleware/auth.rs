use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use thiserror::Error;

use crate::auth::{AuthError, Identity, TokenCodec};
use crate::error::ApiError;

/// Why the gate turned a request away. Logged, never sent to the client:
/// every variant renders as the same 401 body.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthRejection {
    #[error("missing Authorization header")]
    MissingCredentials,

    #[error("Authorization header is not `Bearer <token>`")]
    MalformedCredentials,

    #[error("token failed verification")]
    InvalidToken,

    #[error("token expired")]
    ExpiredToken,
}

impl From<AuthError> for AuthRejection {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::ExpiredToken => AuthRejection::ExpiredToken,
            _ => AuthRejection::InvalidToken,
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        ApiError::unauthorized().into_response()
    }
}

/// Verified identity as stored in request extensions. Only the gate can
/// construct one, so its presence means the token checked out.
#[derive(Clone, Debug)]
pub(crate) struct Authenticated(Identity);

/// Bearer token gate for identity-scoped routes.
///
/// Reads `Authorization`, verifies the token and binds the identity to the
/// request before handing off to the next stage. Any failure ends the request
/// with a uniform 401.
pub async fn require_identity(
    State(codec): State<Arc<TokenCodec>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthRejection> {
    let outcome = bearer_token(request.headers().get(header::AUTHORIZATION))
        .and_then(|token| codec.verify(token).map_err(AuthRejection::from));

    let identity = match outcome {
        Ok(identity) => identity,
        Err(rejection) => {
            tracing::debug!(
                method = %request.method(),
                path = %request.uri().path(),
                reason = %rejection,
                "rejected unauthenticated request"
            );
            return Err(rejection);
        }
    };

    request.extensions_mut().insert(Authenticated(identity));
    Ok(next.run(request).await)
}

/// Extract the token from an `Authorization` header value.
///
/// The scheme is matched case-insensitively; the header must be exactly two
/// parts separated by a single space.
pub fn bearer_token(value: Option<&HeaderValue>) -> Result<&str, AuthRejection> {
    let value = value.ok_or(AuthRejection::MissingCredentials)?;
    let raw = value
        .to_str()
        .map_err(|_| AuthRejection::MalformedCredentials)?;

    if raw.trim().is_empty() {
        return Err(AuthRejection::MissingCredentials);
    }

    let mut parts = raw.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None)
            if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() =>
        {
            Ok(token)
        }
        _ => Err(AuthRejection::MalformedCredentials),
    }
}

// Handlers take `Identity` as an argument to read what the gate bound.
#[async_trait]
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<Authenticated>() {
            Some(Authenticated(identity)) => Ok(identity.clone()),
            None => {
                tracing::error!(
                    "identity requested on {} without the auth gate in front",
                    parts.uri.path()
                );
                Err(AuthRejection::MissingCredentials)
            }
        }
    }
}
