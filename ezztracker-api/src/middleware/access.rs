/// Access policy enforcement
///
/// Layered once over the whole `/admin/{endpoint}` tree so every entity view
/// is gated the same way. A denied request never reaches a view handler.

use crate::{app::AppState, error::ApiError, middleware::session::CurrentPrincipal};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

pub async fn require_policy(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Err(e) = state.policy.check(principal.as_ref()) {
        tracing::warn!(
            user_id = principal.as_ref().map(|p| p.user_id),
            method = %req.method(),
            path = %req.uri().path(),
            reason = %e,
            "Admin access denied"
        );
        return Err(e.into());
    }

    Ok(next.run(req).await)
}
