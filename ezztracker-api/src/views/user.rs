/// User view
///
/// Passwords arrive in plaintext and are hashed before they reach the model.
/// On edit a blank password leaves the stored hash alone, and an absent
/// `roles` list leaves role membership alone.

use super::{checkbox, empty_as_none, required, ModelView, ViewSpec};
use crate::error::{ApiError, ApiResult, ValidationErrorDetail};
use async_trait::async_trait;
use ezztracker_shared::auth::password::hash_password;
use ezztracker_shared::db::listing::{fetch_page, ListQuery, ListSpec, Page};
use ezztracker_shared::models::user::{CreateUser, UpdateUser, User};
use serde::Deserialize;
use sqlx::SqlitePool;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct UserForm {
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(
        required(message = "This field is required"),
        length(min = 5, max = 50, message = "First name must have between 5 and 50 characters")
    )]
    pub first_name: Option<String>,

    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(
        required(message = "This field is required"),
        length(min = 5, max = 50, message = "Last name must have between 5 and 50 characters")
    )]
    pub last_name: Option<String>,

    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(required(message = "This field is required"))]
    pub company_id: Option<i64>,

    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(
        required(message = "This field is required"),
        email(message = "Invalid email address"),
        length(min = 5, max = 50, message = "Email must have between 5 and 50 characters")
    )]
    pub email: Option<String>,

    #[serde(default, deserialize_with = "empty_as_none")]
    pub telephone: Option<String>,

    /// Plaintext; required on create, optional on edit
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(length(min = 8, max = 16, message = "Password must have between 8 and 16 characters"))]
    pub password: Option<String>,

    #[serde(default, deserialize_with = "checkbox")]
    pub active: bool,

    /// Role ids
    #[serde(default)]
    pub roles: Option<Vec<i64>>,
}

impl UserForm {
    fn password_hash(&self) -> ApiResult<Option<String>> {
        Ok(self.password.as_deref().map(hash_password).transpose()?)
    }
}

pub struct UserView;

#[async_trait]
impl ModelView for UserView {
    type Row = User;
    type Form = UserForm;

    const SPEC: ViewSpec = ViewSpec {
        name: "User",
        endpoint: "user",
        form_columns: &[
            "first_name",
            "last_name",
            "company_id",
            "email",
            "telephone",
            "password",
            "active",
            "roles",
        ],
        column_list: &[
            "id",
            "login",
            "first_name",
            "last_name",
            "company_id",
            "email",
            "telephone",
            "active",
            "confirmed_at",
            "roles",
        ],
        list: ListSpec {
            table: "users",
            searchable: &["first_name", "email"],
            filterable: &["first_name", "email"],
            sortable: &["id", "first_name", "last_name", "email", "active"],
            default_sort: ("first_name", false),
        },
        create_modal: false,
        edit_modal: true,
    };

    async fn list(pool: &SqlitePool, query: &ListQuery) -> ApiResult<Page<User>> {
        let page: Page<User> = fetch_page(pool, &Self::SPEC.list, query).await?;

        let mut items = Vec::with_capacity(page.items.len());
        for user in page.items {
            items.push(user.load_roles(pool).await?);
        }

        Ok(Page { items, ..page })
    }

    async fn find(pool: &SqlitePool, id: i64) -> ApiResult<Option<User>> {
        match User::find_by_id(pool, id).await? {
            Some(user) => Ok(Some(user.load_roles(pool).await?)),
            None => Ok(None),
        }
    }

    async fn create(pool: &SqlitePool, form: UserForm) -> ApiResult<User> {
        let password_hash = form.password_hash()?.ok_or_else(|| {
            ApiError::ValidationError(vec![ValidationErrorDetail::new(
                "password",
                "A password is required for new users",
            )])
        })?;

        let user = User::create(
            pool,
            CreateUser {
                login: None,
                first_name: form.first_name,
                last_name: form.last_name,
                company_id: Some(required(form.company_id, "company_id")?),
                email: required(form.email, "email")?,
                password_hash,
                telephone: form.telephone,
                active: form.active,
                confirmed_at: None,
                role_ids: form.roles.unwrap_or_default(),
            },
        )
        .await?;

        tracing::info!(user_id = user.id, "User created");
        Ok(user.load_roles(pool).await?)
    }

    async fn update(pool: &SqlitePool, id: i64, form: UserForm) -> ApiResult<Option<User>> {
        let password_hash = form.password_hash()?;
        let password_changed = password_hash.is_some();

        let updated = User::update(
            pool,
            id,
            UpdateUser {
                first_name: form.first_name,
                last_name: form.last_name,
                company_id: Some(required(form.company_id, "company_id")?),
                email: required(form.email, "email")?,
                telephone: form.telephone,
                active: form.active,
                password_hash,
                role_ids: form.roles,
            },
        )
        .await?;

        let Some(user) = updated else {
            return Ok(None);
        };

        if password_changed {
            tracing::info!(user_id = id, "Password changed");
        }
        Ok(Some(user.load_roles(pool).await?))
    }

    async fn delete(pool: &SqlitePool, id: i64) -> ApiResult<bool> {
        Ok(User::delete(pool, id).await?)
    }
}
