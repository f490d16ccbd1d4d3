use super::{empty_as_none, required, ModelView, ViewSpec};
use crate::error::ApiResult;
use async_trait::async_trait;
use ezztracker_shared::db::listing::ListSpec;
use ezztracker_shared::models::priority::{CreatePriority, Priority};
use serde::Deserialize;
use sqlx::SqlitePool;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct PriorityForm {
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(required(message = "This field is required"))]
    pub name: Option<String>,
}

pub struct PriorityView;

#[async_trait]
impl ModelView for PriorityView {
    type Row = Priority;
    type Form = PriorityForm;

    const SPEC: ViewSpec = ViewSpec {
        name: "Priority",
        endpoint: "priority",
        form_columns: &["name"],
        column_list: &["id", "name"],
        list: ListSpec {
            table: "priorities",
            searchable: &["name"],
            filterable: &[],
            sortable: &["id", "name"],
            default_sort: ("id", false),
        },
        create_modal: false,
        edit_modal: true,
    };

    async fn find(pool: &SqlitePool, id: i64) -> ApiResult<Option<Priority>> {
        Ok(Priority::find_by_id(pool, id).await?)
    }

    async fn create(pool: &SqlitePool, form: PriorityForm) -> ApiResult<Priority> {
        let name = required(form.name, "name")?;
        Ok(Priority::create(pool, CreatePriority { name }).await?)
    }

    async fn update(pool: &SqlitePool, id: i64, form: PriorityForm) -> ApiResult<Option<Priority>> {
        let name = required(form.name, "name")?;
        Ok(Priority::update(pool, id, CreatePriority { name }).await?)
    }

    async fn delete(pool: &SqlitePool, id: i64) -> ApiResult<bool> {
        Ok(Priority::delete(pool, id).await?)
    }
}
