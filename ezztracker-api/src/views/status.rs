use super::{empty_as_none, required, ModelView, ViewSpec};
use crate::error::ApiResult;
use async_trait::async_trait;
use ezztracker_shared::db::listing::ListSpec;
use ezztracker_shared::models::status::{CreateStatus, Status};
use serde::Deserialize;
use sqlx::SqlitePool;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct StatusForm {
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(required(message = "This field is required"))]
    pub name: Option<String>,
}

pub struct StatusView;

#[async_trait]
impl ModelView for StatusView {
    type Row = Status;
    type Form = StatusForm;

    const SPEC: ViewSpec = ViewSpec {
        name: "Status",
        endpoint: "status",
        form_columns: &["name"],
        column_list: &["id", "name"],
        list: ListSpec {
            table: "statuses",
            searchable: &["name"],
            filterable: &[],
            sortable: &["id", "name"],
            default_sort: ("id", false),
        },
        create_modal: false,
        edit_modal: true,
    };

    async fn find(pool: &SqlitePool, id: i64) -> ApiResult<Option<Status>> {
        Ok(Status::find_by_id(pool, id).await?)
    }

    async fn create(pool: &SqlitePool, form: StatusForm) -> ApiResult<Status> {
        let name = required(form.name, "name")?;
        Ok(Status::create(pool, CreateStatus { name }).await?)
    }

    async fn update(pool: &SqlitePool, id: i64, form: StatusForm) -> ApiResult<Option<Status>> {
        let name = required(form.name, "name")?;
        Ok(Status::update(pool, id, CreateStatus { name }).await?)
    }

    async fn delete(pool: &SqlitePool, id: i64) -> ApiResult<bool> {
        Ok(Status::delete(pool, id).await?)
    }
}
