/// Ticket view

use super::{empty_as_none, required, ModelView, ViewSpec};
use crate::error::ApiResult;
use async_trait::async_trait;
use ezztracker_shared::db::listing::ListSpec;
use ezztracker_shared::models::track::{CreateTrack, Track};
use serde::Deserialize;
use sqlx::SqlitePool;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct TrackForm {
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(
        required(message = "This field is required"),
        length(min = 5, message = "Title must have at least 5 characters")
    )]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(required(message = "This field is required"))]
    pub priority_id: Option<i64>,

    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(required(message = "This field is required"))]
    pub product_id: Option<i64>,

    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(required(message = "This field is required"))]
    pub requester_id: Option<i64>,

    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(required(message = "This field is required"))]
    pub status_id: Option<i64>,

    #[serde(default, deserialize_with = "empty_as_none")]
    pub description: Option<String>,
}

impl TrackForm {
    fn into_model(self) -> ApiResult<CreateTrack> {
        Ok(CreateTrack {
            title: required(self.title, "title")?,
            priority_id: required(self.priority_id, "priority_id")?,
            product_id: required(self.product_id, "product_id")?,
            requester_id: required(self.requester_id, "requester_id")?,
            status_id: required(self.status_id, "status_id")?,
            description: self.description,
        })
    }
}

pub struct TrackView;

#[async_trait]
impl ModelView for TrackView {
    type Row = Track;
    type Form = TrackForm;

    const SPEC: ViewSpec = ViewSpec {
        name: "Track",
        endpoint: "track",
        form_columns: &[
            "title",
            "priority_id",
            "product_id",
            "requester_id",
            "status_id",
            "description",
        ],
        column_list: &["id", "title", "priority_id", "requester_id", "status_id"],
        list: ListSpec {
            table: "tracks",
            searchable: &["title"],
            filterable: &["title", "priority_id", "requester_id", "status_id"],
            sortable: &["id", "title", "priority_id", "requester_id", "status_id"],
            default_sort: ("id", false),
        },
        create_modal: false,
        edit_modal: true,
    };

    async fn find(pool: &SqlitePool, id: i64) -> ApiResult<Option<Track>> {
        Ok(Track::find_by_id(pool, id).await?)
    }

    async fn create(pool: &SqlitePool, form: TrackForm) -> ApiResult<Track> {
        Ok(Track::create(pool, form.into_model()?).await?)
    }

    async fn update(pool: &SqlitePool, id: i64, form: TrackForm) -> ApiResult<Option<Track>> {
        Ok(Track::update(pool, id, form.into_model()?).await?)
    }

    async fn delete(pool: &SqlitePool, id: i64) -> ApiResult<bool> {
        Ok(Track::delete(pool, id).await?)
    }
}
