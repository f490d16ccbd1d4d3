/// Admin CRUD views
///
/// Each entity is exposed through a [`ModelView`]: a static [`ViewSpec`]
/// describing how the entity is listed and edited, a validated form type, and
/// the persistence operations behind it. The generic handlers in [`crud`]
/// turn any `ModelView` into the five admin routes.
///
/// # Routes per view
///
/// ```text
/// GET    /admin/{endpoint}/      list (search, filters, sort, page)
/// POST   /admin/{endpoint}/      create
/// GET    /admin/{endpoint}/:id   read
/// PUT    /admin/{endpoint}/:id   update
/// DELETE /admin/{endpoint}/:id   delete
/// ```

use crate::error::{ApiError, ApiResult, ValidationErrorDetail};
use async_trait::async_trait;
use axum::{
    extract::{FromRequest, Request},
    http::header,
    Form, Json,
};
use ezztracker_shared::db::listing::{fetch_page, ListQuery, ListSpec, Page};
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use sqlx::{sqlite::SqliteRow, FromRow, SqlitePool};
use std::{fmt::Display, str::FromStr};
use validator::Validate;

pub mod company;
pub mod crud;
pub mod os;
pub mod priority;
pub mod product;
pub mod role;
pub mod status;
pub mod track;
pub mod track_handler;
pub mod user;

/// Message attached to a missing required field
pub const REQUIRED: &str = "This field is required";

/// Static description of an admin view
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ViewSpec {
    /// Display name
    pub name: &'static str,

    /// URL segment under `/admin/`
    pub endpoint: &'static str,

    /// Fields accepted by the create and edit forms
    pub form_columns: &'static [&'static str],

    /// Columns shown in the list
    pub column_list: &'static [&'static str],

    /// Search, filter and sort settings for the list
    pub list: ListSpec,

    pub create_modal: bool,
    pub edit_modal: bool,
}

/// An entity exposed in the admin
#[async_trait]
pub trait ModelView: Send + Sync + 'static {
    /// Row type returned to clients
    type Row: Serialize + for<'r> FromRow<'r, SqliteRow> + Send + Sync + Unpin + 'static;

    /// Submitted create/edit form
    type Form: DeserializeOwned + Validate + Send + 'static;

    const SPEC: ViewSpec;

    async fn list(pool: &SqlitePool, query: &ListQuery) -> ApiResult<Page<Self::Row>> {
        Ok(fetch_page(pool, &Self::SPEC.list, query).await?)
    }

    async fn find(pool: &SqlitePool, id: i64) -> ApiResult<Option<Self::Row>>;

    /// Persists a validated form as a new row
    async fn create(pool: &SqlitePool, form: Self::Form) -> ApiResult<Self::Row>;

    /// Returns `None` when no row has this id
    async fn update(pool: &SqlitePool, id: i64, form: Self::Form) -> ApiResult<Option<Self::Row>>;

    /// Returns `false` when no row has this id
    async fn delete(pool: &SqlitePool, id: i64) -> ApiResult<bool>;

    /// Runs after a create or update has been committed
    fn after_model_change(_row: &Self::Row, _is_created: bool) {}
}

/// Specs of every admin view, in menu order
pub fn all_specs() -> Vec<ViewSpec> {
    vec![
        track::TrackView::SPEC,
        track_handler::TrackHandlerView::SPEC,
        user::UserView::SPEC,
        role::RoleView::SPEC,
        company::CompanyView::SPEC,
        product::ProductView::SPEC,
        os::OsView::SPEC,
        status::StatusView::SPEC,
        priority::PriorityView::SPEC,
    ]
}

/// Unwraps a required form value
///
/// Validation has already rejected missing values; this turns the `Option`
/// into its value without panicking should a form skip that rule.
pub fn required<T>(value: Option<T>, field: &str) -> ApiResult<T> {
    value.ok_or_else(|| {
        ApiError::ValidationError(vec![ValidationErrorDetail::new(field, REQUIRED)])
    })
}

/// Deserializes a form value, treating a blank string as absent
///
/// Accepts native JSON values as well as strings, so the same form type
/// serves both JSON and url-encoded bodies.
pub fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + Deserialize<'de>,
    T::Err: Display,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw<T> {
        Text(String),
        Value(T),
    }

    match Option::<Raw<T>>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(Raw::Text(text)) => text.parse().map(Some).map_err(serde::de::Error::custom),
        Some(Raw::Value(value)) => Ok(Some(value)),
    }
}

/// Whether a form value means "on"
///
/// Covers HTML checkboxes (`on`) and the usual spellings of true.
pub fn truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "on" | "y" | "yes" | "1"
    )
}

/// Deserializes a checkbox: a JSON bool, or any form string, [`truthy`] or not
pub fn checkbox<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Flag(bool),
        Text(String),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Flag(flag) => flag,
        Raw::Text(text) => truthy(&text),
    })
}

/// Body extractor accepting JSON or url-encoded forms
pub struct FormOrJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for FormOrJson<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/json"));

        if is_json {
            let Json(value) = Json::<T>::from_request(req, state)
                .await
                .map_err(|e| ApiError::BadRequest(e.body_text()))?;
            Ok(Self(value))
        } else {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(|e| ApiError::BadRequest(e.body_text()))?;
            Ok(Self(value))
        }
    }
}
