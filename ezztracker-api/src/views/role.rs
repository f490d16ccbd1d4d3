/// Role view
///
/// Renaming or deleting the `superuser` role locks every account out of the
/// admin; nothing here prevents it.

use super::{empty_as_none, required, ModelView, ViewSpec};
use crate::error::ApiResult;
use async_trait::async_trait;
use ezztracker_shared::db::listing::ListSpec;
use ezztracker_shared::models::role::{CreateRole, Role};
use serde::Deserialize;
use sqlx::SqlitePool;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct RoleForm {
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(
        required(message = "This field is required"),
        length(max = 80, message = "Name must have at most 80 characters")
    )]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(length(max = 255, message = "Description must have at most 255 characters"))]
    pub description: Option<String>,
}

impl RoleForm {
    fn into_model(self) -> ApiResult<CreateRole> {
        Ok(CreateRole {
            name: required(self.name, "name")?,
            description: self.description,
        })
    }
}

pub struct RoleView;

#[async_trait]
impl ModelView for RoleView {
    type Row = Role;
    type Form = RoleForm;

    const SPEC: ViewSpec = ViewSpec {
        name: "Role",
        endpoint: "role",
        form_columns: &["name", "description"],
        column_list: &["id", "name", "description"],
        list: ListSpec {
            table: "roles",
            searchable: &["name"],
            filterable: &["name"],
            sortable: &["id", "name"],
            default_sort: ("name", false),
        },
        create_modal: false,
        edit_modal: true,
    };

    async fn find(pool: &SqlitePool, id: i64) -> ApiResult<Option<Role>> {
        Ok(Role::find_by_id(pool, id).await?)
    }

    async fn create(pool: &SqlitePool, form: RoleForm) -> ApiResult<Role> {
        Ok(Role::create(pool, form.into_model()?).await?)
    }

    async fn update(pool: &SqlitePool, id: i64, form: RoleForm) -> ApiResult<Option<Role>> {
        Ok(Role::update(pool, id, form.into_model()?).await?)
    }

    async fn delete(pool: &SqlitePool, id: i64) -> ApiResult<bool> {
        Ok(Role::delete(pool, id).await?)
    }
}
