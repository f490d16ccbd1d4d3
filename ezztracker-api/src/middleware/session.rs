/// Session cookie handling
///
/// [`resolve_session`] runs on every request. It reads the session cookie,
/// validates the token and reloads the user, then stores the outcome as a
/// [`CurrentPrincipal`] request extension. A missing, expired or forged
/// cookie, or a token naming a deleted user, simply yields an anonymous
/// request; rejecting it is left to the access policy.

use crate::{app::AppState, error::ApiError};
use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use ezztracker_shared::auth::{policy::Principal, session::validate_session_token};

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "ezztracker_session";

/// The principal behind the current request, if any
#[derive(Debug, Clone, Default)]
pub struct CurrentPrincipal(pub Option<Principal>);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentPrincipal
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<CurrentPrincipal>()
            .cloned()
            .unwrap_or_default())
    }
}

/// Middleware resolving the session cookie into a [`CurrentPrincipal`]
pub async fn resolve_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let principal = match session_token(req.headers()) {
        Some(token) => match validate_session_token(token, &state.config.session.secret) {
            Ok(claims) => {
                let principal = Principal::load(&state.db, claims.sub).await?;
                if principal.is_none() {
                    tracing::debug!(user_id = claims.sub, "Session names a deleted user");
                }
                principal
            }
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring invalid session cookie");
                None
            }
        },
        None => None,
    };

    req.extensions_mut().insert(CurrentPrincipal(principal));
    Ok(next.run(req).await)
}

/// Extracts the session token from the `Cookie` header
pub fn session_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|cookie| cookie.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value)
}

/// `Set-Cookie` value carrying a fresh session token
pub fn session_cookie(token: &str, max_age_seconds: i64) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE, token, max_age_seconds
    )
}

/// `Set-Cookie` value that removes the session cookie
pub fn clear_session_cookie() -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", SESSION_COOKIE)
}
