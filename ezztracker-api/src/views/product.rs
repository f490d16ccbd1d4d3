use super::{empty_as_none, required, ModelView, ViewSpec};
use crate::error::ApiResult;
use async_trait::async_trait;
use ezztracker_shared::db::listing::ListSpec;
use ezztracker_shared::models::product::{CreateProduct, Product};
use serde::Deserialize;
use sqlx::SqlitePool;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct ProductForm {
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(required(message = "This field is required"))]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "empty_as_none")]
    pub initials: Option<String>,

    #[serde(default, deserialize_with = "empty_as_none")]
    pub version: Option<String>,

    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(required(message = "This field is required"))]
    pub company_id: Option<i64>,

    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(required(message = "This field is required"))]
    pub os_id: Option<i64>,
}

impl ProductForm {
    fn into_model(self) -> ApiResult<CreateProduct> {
        Ok(CreateProduct {
            name: required(self.name, "name")?,
            initials: self.initials,
            version: self.version,
            company_id: required(self.company_id, "company_id")?,
            os_id: required(self.os_id, "os_id")?,
        })
    }
}

pub struct ProductView;

#[async_trait]
impl ModelView for ProductView {
    type Row = Product;
    type Form = ProductForm;

    const SPEC: ViewSpec = ViewSpec {
        name: "Products",
        endpoint: "products",
        form_columns: &["name", "initials", "version", "company_id", "os_id"],
        column_list: &["id", "name", "initials", "version", "company_id", "os_id"],
        list: ListSpec {
            table: "products",
            searchable: &["name", "initials"],
            filterable: &["company_id", "os_id"],
            sortable: &["id", "name", "initials", "version"],
            default_sort: ("id", false),
        },
        create_modal: false,
        edit_modal: true,
    };

    async fn find(pool: &SqlitePool, id: i64) -> ApiResult<Option<Product>> {
        Ok(Product::find_by_id(pool, id).await?)
    }

    async fn create(pool: &SqlitePool, form: ProductForm) -> ApiResult<Product> {
        Ok(Product::create(pool, form.into_model()?).await?)
    }

    async fn update(pool: &SqlitePool, id: i64, form: ProductForm) -> ApiResult<Option<Product>> {
        Ok(Product::update(pool, id, form.into_model()?).await?)
    }

    async fn delete(pool: &SqlitePool, id: i64) -> ApiResult<bool> {
        Ok(Product::delete(pool, id).await?)
    }
}
