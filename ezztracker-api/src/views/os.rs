/// Operating system view
///
/// Every committed create or update is recorded in the log.

use super::{empty_as_none, required, ModelView, ViewSpec};
use crate::error::ApiResult;
use async_trait::async_trait;
use ezztracker_shared::db::listing::ListSpec;
use ezztracker_shared::models::os::{CreateOs, Os};
use serde::Deserialize;
use sqlx::SqlitePool;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct OsForm {
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(required(message = "This field is required"))]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "empty_as_none")]
    pub initials: Option<String>,

    #[serde(default, deserialize_with = "empty_as_none")]
    pub version: Option<String>,
}

impl OsForm {
    fn into_model(self) -> ApiResult<CreateOs> {
        Ok(CreateOs {
            name: required(self.name, "name")?,
            initials: self.initials,
            version: self.version,
        })
    }
}

pub struct OsView;

#[async_trait]
impl ModelView for OsView {
    type Row = Os;
    type Form = OsForm;

    const SPEC: ViewSpec = ViewSpec {
        name: "Os",
        endpoint: "os",
        form_columns: &["name", "initials", "version"],
        column_list: &["id", "name", "initials", "version"],
        list: ListSpec {
            table: "os",
            searchable: &["name", "initials"],
            filterable: &[],
            sortable: &["id", "name", "initials", "version"],
            default_sort: ("id", false),
        },
        create_modal: false,
        edit_modal: true,
    };

    async fn find(pool: &SqlitePool, id: i64) -> ApiResult<Option<Os>> {
        Ok(Os::find_by_id(pool, id).await?)
    }

    async fn create(pool: &SqlitePool, form: OsForm) -> ApiResult<Os> {
        Ok(Os::create(pool, form.into_model()?).await?)
    }

    async fn update(pool: &SqlitePool, id: i64, form: OsForm) -> ApiResult<Option<Os>> {
        Ok(Os::update(pool, id, form.into_model()?).await?)
    }

    async fn delete(pool: &SqlitePool, id: i64) -> ApiResult<bool> {
        Ok(Os::delete(pool, id).await?)
    }

    fn after_model_change(row: &Os, is_created: bool) {
        let name = row.name.as_deref().unwrap_or_default();
        if is_created {
            tracing::info!(row_id = row.id, name, "Os created");
        } else {
            tracing::info!(row_id = row.id, name, "Os updated");
        }
    }
}
