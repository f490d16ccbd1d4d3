/// Login, logout and session cookie tests
mod common;

use axum::http::{header, Method, StatusCode};
use common::*;
use ezztracker_shared::auth::session::{create_session_token, SessionClaims};

#[tokio::test]
async fn test_login_success_sets_cookie_and_redirects() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx.send(login_request(ADMIN_EMAIL, ADMIN_PASSWORD)).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/admin/");

    let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(cookie.starts_with("ezztracker_session="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("Max-Age=86400"));
}

#[tokio::test]
async fn test_login_wrong_password_rejected() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx.send(login_request(ADMIN_EMAIL, "not-the-password")).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().get(header::SET_COOKIE).is_none());

    let body = body_text(response).await;
    assert!(body.contains("<form"));
    assert!(body.contains(ADMIN_EMAIL));
}

#[tokio::test]
async fn test_login_unknown_email_rejected() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx.send(login_request("nobody@example.com", ADMIN_PASSWORD)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_accepts_senha_field() {
    let ctx = TestContext::new().await.unwrap();

    let request = axum::http::Request::builder()
        .method(Method::POST)
        .uri("/login/")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(axum::body::Body::from(format!(
            "email=harry.brown%40example.com&senha={}",
            USER_PASSWORD
        )))
        .unwrap();

    let response = ctx.send(request).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_inactive_user_can_log_in() {
    let ctx = TestContext::new().await.unwrap();

    assert!(ctx.login(INACTIVE_EMAIL, INACTIVE_PASSWORD).await.is_some());
}

#[tokio::test]
async fn test_login_page_renders_form() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx.send(json_request(Method::GET, "/login/", None, None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains(r#"action="/login/""#));
}

#[tokio::test]
async fn test_login_page_skipped_when_logged_in() {
    let ctx = TestContext::new().await.unwrap();
    let cookie = ctx.user_cookie().await;

    let response = ctx.send(json_request(Method::GET, "/login/", Some(&cookie), None)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/admin/");
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let ctx = TestContext::new().await.unwrap();
    let cookie = ctx.admin_cookie().await;

    let response = ctx.send(json_request(Method::GET, "/logout/", Some(&cookie), None)).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let cleared = response.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(cleared.starts_with("ezztracker_session=;"));
    assert!(cleared.contains("Max-Age=0"));
}

#[tokio::test]
async fn test_admin_index_for_superuser_lists_views() {
    let ctx = TestContext::new().await.unwrap();
    let cookie = ctx.admin_cookie().await;

    let response = ctx.send(json_request(Method::GET, "/admin/", Some(&cookie), None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["title"], "ezzTracker Admin");
    assert_eq!(body["principal"]["email"], ADMIN_EMAIL);

    let endpoints: Vec<&str> = body["views"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["endpoint"].as_str().unwrap())
        .collect();
    assert_eq!(
        endpoints,
        vec!["track", "trackhandler", "user", "role", "company", "products", "os", "status", "priority"]
    );
}

#[tokio::test]
async fn test_admin_index_hides_views_from_plain_user() {
    let ctx = TestContext::new().await.unwrap();
    let cookie = ctx.user_cookie().await;

    let response = ctx.send(json_request(Method::GET, "/admin/", Some(&cookie), None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert!(body["views"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_admin_index_redirects_anonymous_to_login() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx.send(json_request(Method::GET, "/admin/", None, None)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/login/");
}

#[tokio::test]
async fn test_tampered_cookie_is_anonymous() {
    let ctx = TestContext::new().await.unwrap();
    let cookie = format!("{}x", ctx.admin_cookie().await);

    let response = ctx.send(json_request(Method::GET, "/admin/", Some(&cookie), None)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_token_signed_with_other_secret_is_anonymous() {
    let ctx = TestContext::new().await.unwrap();

    let claims = SessionClaims::new(ctx.admin.id, chrono::Duration::hours(1));
    let token = create_session_token(&claims, "some-other-secret-that-is-long-enough").unwrap();
    let cookie = format!("ezztracker_session={}", token);

    let response = ctx.send(json_request(Method::GET, "/admin/priority/", Some(&cookie), None)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_session_of_deleted_user_is_anonymous() {
    let ctx = TestContext::new().await.unwrap();
    let cookie = ctx.admin_cookie().await;

    sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(ctx.admin.id)
        .execute(&ctx.db)
        .await
        .unwrap();

    let response = ctx.send(json_request(Method::GET, "/admin/", Some(&cookie), None)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_health_check() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx.send(json_request(Method::GET, "/health", None, None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
}
