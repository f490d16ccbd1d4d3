//! Common test utilities for integration tests
//!
//! Every test gets its own in-memory database with:
//! - the `user` and `superuser` roles
//! - company 1
//! - an active superuser, an active plain user and an inactive superuser,
//!   each with a known password
#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use ezztracker_api::app::{build_router, AppState};
use ezztracker_api::config::{ApiConfig, Config, DatabaseConfig, SessionConfig};
use ezztracker_shared::auth::password::hash_password;
use ezztracker_shared::db::{migrations::run_migrations, pool::create_memory_pool};
use ezztracker_shared::models::company::{Company, CreateCompany};
use ezztracker_shared::models::os::{CreateOs, Os};
use ezztracker_shared::models::priority::{CreatePriority, Priority};
use ezztracker_shared::models::product::{CreateProduct, Product};
use ezztracker_shared::models::role::{CreateRole, Role, SUPERUSER, USER};
use ezztracker_shared::models::status::{CreateStatus, Status};
use ezztracker_shared::models::user::{CreateUser, User};
use sqlx::SqlitePool;
use tower::Service;

pub const ADMIN_EMAIL: &str = "admin@ebizz.com.br";
pub const ADMIN_PASSWORD: &str = "admin-pass";
pub const USER_EMAIL: &str = "harry.brown@example.com";
pub const USER_PASSWORD: &str = "harry-pass";
pub const INACTIVE_EMAIL: &str = "former.admin@example.com";
pub const INACTIVE_PASSWORD: &str = "former-pass";

pub const SECRET: &str = "integration-test-secret-key-0123456789";

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: SqlitePool,
    pub app: Router,
    pub config: Config,
    pub company: Company,
    pub user_role: Role,
    pub superuser_role: Role,
    pub admin: User,
    pub user: User,
    pub inactive_admin: User,
}

impl TestContext {
    pub async fn new() -> anyhow::Result<Self> {
        let db = create_memory_pool().await?;
        run_migrations(&db).await?;

        let config = test_config();

        let company = Company::create(
            &db,
            CreateCompany {
                id: Some(1),
                company_name: "ebizz".to_string(),
                description: None,
            },
        )
        .await?;

        let user_role = Role::create(
            &db,
            CreateRole {
                name: USER.to_string(),
                description: None,
            },
        )
        .await?;
        let superuser_role = Role::create(
            &db,
            CreateRole {
                name: SUPERUSER.to_string(),
                description: None,
            },
        )
        .await?;

        let admin = create_user(&db, ADMIN_EMAIL, ADMIN_PASSWORD, true, vec![user_role.id, superuser_role.id]).await?;
        let user = create_user(&db, USER_EMAIL, USER_PASSWORD, true, vec![user_role.id]).await?;
        let inactive_admin =
            create_user(&db, INACTIVE_EMAIL, INACTIVE_PASSWORD, false, vec![superuser_role.id]).await?;

        let app = build_router(AppState::new(db.clone(), config.clone()));

        Ok(TestContext {
            db,
            app,
            config,
            company,
            user_role,
            superuser_role,
            admin,
            user,
            inactive_admin,
        })
    }

    /// Sends a request through the router
    pub async fn send(&self, request: Request<Body>) -> Response {
        self.app.clone().call(request).await.unwrap()
    }

    /// Posts the login form and returns the `Cookie` header value on success
    pub async fn login(&self, email: &str, password: &str) -> Option<String> {
        let response = self.send(login_request(email, password)).await;
        if response.status() != StatusCode::SEE_OTHER {
            return None;
        }

        let set_cookie = response.headers().get(header::SET_COOKIE)?.to_str().ok()?;
        set_cookie.split(';').next().map(str::to_string)
    }

    pub async fn admin_cookie(&self) -> String {
        self.login(ADMIN_EMAIL, ADMIN_PASSWORD).await.expect("admin login")
    }

    pub async fn user_cookie(&self) -> String {
        self.login(USER_EMAIL, USER_PASSWORD).await.expect("user login")
    }

    /// Priority, status and product a track can reference
    pub async fn track_refs(&self) -> anyhow::Result<(Priority, Status, Product)> {
        let priority = Priority::create(&self.db, CreatePriority { name: "High".to_string() }).await?;
        let status = Status::create(&self.db, CreateStatus { name: "Open".to_string() }).await?;
        let os = Os::create(
            &self.db,
            CreateOs {
                name: "Linux".to_string(),
                initials: Some("LNX".to_string()),
                version: Some("6".to_string()),
            },
        )
        .await?;
        let product = Product::create(
            &self.db,
            CreateProduct {
                name: "Tracker".to_string(),
                initials: Some("TRK".to_string()),
                version: Some("1.0".to_string()),
                company_id: self.company.id,
                os_id: os.id,
            },
        )
        .await?;

        Ok((priority, status, product))
    }
}

pub fn test_config() -> Config {
    Config {
        company_name: "ebizz".to_string(),
        admin_title: "ezzTracker Admin".to_string(),
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        database: DatabaseConfig {
            file: ":memory:".into(),
            max_connections: 1,
        },
        session: SessionConfig {
            secret: SECRET.to_string(),
            ttl_hours: 24,
        },
    }
}

async fn create_user(
    db: &SqlitePool,
    email: &str,
    password: &str,
    active: bool,
    role_ids: Vec<i64>,
) -> anyhow::Result<User> {
    Ok(User::create(
        db,
        CreateUser {
            first_name: Some("Tester".to_string()),
            last_name: Some("Account".to_string()),
            company_id: Some(1),
            email: email.to_string(),
            password_hash: hash_password(password)?,
            active,
            role_ids,
            ..Default::default()
        },
    )
    .await?)
}

pub fn login_request(email: &str, password: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/login/")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(format!("email={}&password={}", urlencode(email), urlencode(password))))
        .unwrap()
}

/// JSON request, optionally carrying a session cookie
pub fn json_request(
    method: Method,
    uri: &str,
    cookie: Option<&str>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }

    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Url-encoded form request carrying a session cookie
pub fn form_request(method: Method, uri: &str, cookie: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::COOKIE, cookie)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn urlencode(value: &str) -> String {
    value
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => (b as char).to_string(),
            _ => format!("%{:02X}", b),
        })
        .collect()
}
