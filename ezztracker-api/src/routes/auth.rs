/// Login and logout
///
/// # Endpoints
///
/// - `GET /login/` - Login form
/// - `POST /login/` - Submit credentials; sets the session cookie
/// - `GET /logout/` - Clear the session cookie

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    middleware::session::{clear_session_cookie, session_cookie, CurrentPrincipal},
};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use ezztracker_shared::auth::{
    login::authenticate,
    session::{create_session_token, SessionClaims},
};
use serde::Deserialize;

/// Where a successful login lands
pub const ADMIN_INDEX: &str = "/admin/";

/// Login form
#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,

    #[serde(default, alias = "senha")]
    pub password: String,
}

/// Shows the login form, or skips it when already logged in
pub async fn login_page(CurrentPrincipal(principal): CurrentPrincipal) -> Response {
    if principal.is_some() {
        return Redirect::to(ADMIN_INDEX).into_response();
    }

    Html(render_login_form("", None)).into_response()
}

/// Checks credentials and starts a session
///
/// # Responses
///
/// - `303 See Other` to `/admin/` with the session cookie on success
/// - `401 Unauthorized` with the form and an error message otherwise
pub async fn login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> ApiResult<Response> {
    let email = form.email.trim();

    let user = match authenticate(&state.db, email, &form.password).await {
        Ok(user) => user,
        Err(e) => {
            return match ApiError::from(e) {
                ApiError::Unauthorized(message) => Ok((
                    StatusCode::UNAUTHORIZED,
                    Html(render_login_form(email, Some(&message))),
                )
                    .into_response()),
                other => Err(other),
            };
        }
    };

    let ttl = state.config.session_ttl();
    let token = create_session_token(&SessionClaims::new(user.id, ttl), &state.config.session.secret)?;

    tracing::info!(user_id = user.id, "Session started");

    Ok((
        [(header::SET_COOKIE, session_cookie(&token, ttl.num_seconds()))],
        Redirect::to(ADMIN_INDEX),
    )
        .into_response())
}

pub async fn logout(CurrentPrincipal(principal): CurrentPrincipal) -> Response {
    if let Some(principal) = principal {
        tracing::info!(user_id = principal.user_id, "Session ended");
    }

    (
        [(header::SET_COOKIE, clear_session_cookie())],
        Redirect::to(ADMIN_INDEX),
    )
        .into_response()
}

fn render_login_form(email: &str, error: Option<&str>) -> String {
    let error = error
        .map(|message| format!(r#"<p class="error">{}</p>"#, escape_html(message)))
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html>
<head><title>ezzTracker - Login</title></head>
<body>
<h1>Login</h1>
{error}
<form method="post" action="/login/">
  <label>Email <input type="email" name="email" value="{email}"></label>
  <label>Password <input type="password" name="password"></label>
  <button type="submit">Login</button>
</form>
</body>
</html>
"#,
        error = error,
        email = escape_html(email),
    )
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
