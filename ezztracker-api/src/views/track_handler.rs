use super::{empty_as_none, required, ModelView, ViewSpec};
use crate::error::ApiResult;
use async_trait::async_trait;
use ezztracker_shared::db::listing::ListSpec;
use ezztracker_shared::models::track_handler::{CreateTrackHandler, TrackHandler};
use serde::Deserialize;
use sqlx::SqlitePool;
use validator::Validate;

/// Assignment form; `handle_at` is stamped on save
#[derive(Debug, Deserialize, Validate)]
pub struct TrackHandlerForm {
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(required(message = "This field is required"))]
    pub handler_id: Option<i64>,

    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(required(message = "This field is required"))]
    pub tracker_id: Option<i64>,
}

impl TrackHandlerForm {
    fn into_model(self) -> ApiResult<CreateTrackHandler> {
        Ok(CreateTrackHandler::now(
            required(self.handler_id, "handler_id")?,
            required(self.tracker_id, "tracker_id")?,
        ))
    }
}

pub struct TrackHandlerView;

#[async_trait]
impl ModelView for TrackHandlerView {
    type Row = TrackHandler;
    type Form = TrackHandlerForm;

    const SPEC: ViewSpec = ViewSpec {
        name: "TrackHandler",
        endpoint: "trackhandler",
        form_columns: &["handler_id", "tracker_id"],
        column_list: &["id", "handler_id", "tracker_id", "handle_at"],
        list: ListSpec {
            table: "track_handlers",
            searchable: &[],
            filterable: &["handler_id", "tracker_id"],
            sortable: &["id", "handler_id", "tracker_id", "handle_at"],
            default_sort: ("handle_at", true),
        },
        create_modal: false,
        edit_modal: true,
    };

    async fn find(pool: &SqlitePool, id: i64) -> ApiResult<Option<TrackHandler>> {
        Ok(TrackHandler::find_by_id(pool, id).await?)
    }

    async fn create(pool: &SqlitePool, form: TrackHandlerForm) -> ApiResult<TrackHandler> {
        Ok(TrackHandler::create(pool, form.into_model()?).await?)
    }

    async fn update(
        pool: &SqlitePool,
        id: i64,
        form: TrackHandlerForm,
    ) -> ApiResult<Option<TrackHandler>> {
        Ok(TrackHandler::update(pool, id, form.into_model()?).await?)
    }

    async fn delete(pool: &SqlitePool, id: i64) -> ApiResult<bool> {
        Ok(TrackHandler::delete(pool, id).await?)
    }
}
