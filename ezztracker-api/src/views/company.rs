use super::{empty_as_none, required, ModelView, ViewSpec};
use crate::error::ApiResult;
use async_trait::async_trait;
use ezztracker_shared::db::listing::ListSpec;
use ezztracker_shared::models::company::{Company, CreateCompany};
use serde::Deserialize;
use sqlx::SqlitePool;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CompanyForm {
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(required(message = "This field is required"))]
    pub company_name: Option<String>,

    #[serde(default, deserialize_with = "empty_as_none")]
    pub description: Option<String>,
}

impl CompanyForm {
    fn into_model(self) -> ApiResult<CreateCompany> {
        Ok(CreateCompany {
            id: None,
            company_name: required(self.company_name, "company_name")?,
            description: self.description,
        })
    }
}

pub struct CompanyView;

#[async_trait]
impl ModelView for CompanyView {
    type Row = Company;
    type Form = CompanyForm;

    const SPEC: ViewSpec = ViewSpec {
        name: "Company",
        endpoint: "company",
        form_columns: &["company_name", "description"],
        column_list: &["id", "company_name", "description"],
        list: ListSpec {
            table: "companies",
            searchable: &["company_name"],
            filterable: &[],
            sortable: &["id", "company_name"],
            default_sort: ("id", false),
        },
        create_modal: false,
        edit_modal: true,
    };

    async fn find(pool: &SqlitePool, id: i64) -> ApiResult<Option<Company>> {
        Ok(Company::find_by_id(pool, id).await?)
    }

    async fn create(pool: &SqlitePool, form: CompanyForm) -> ApiResult<Company> {
        Ok(Company::create(pool, form.into_model()?).await?)
    }

    async fn update(pool: &SqlitePool, id: i64, form: CompanyForm) -> ApiResult<Option<Company>> {
        Ok(Company::update(pool, id, form.into_model()?).await?)
    }

    async fn delete(pool: &SqlitePool, id: i64) -> ApiResult<bool> {
        Ok(Company::delete(pool, id).await?)
    }
}
