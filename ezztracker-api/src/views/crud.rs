/// Generic CRUD handlers shared by every admin view
///
/// Handlers are generic over [`ModelView`]; [`routes`] instantiates them for
/// one view. Access control is not done here: the admin router layers the
/// access policy over all of these routes.

use super::{truthy, FormOrJson, ModelView};
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use ezztracker_shared::db::listing::{ListQuery, Page};
use std::collections::BTreeMap;
use validator::Validate;

/// Builds the five CRUD routes of one view
pub fn routes<V: ModelView>() -> Router<AppState> {
    let collection = format!("/admin/{}/", V::SPEC.endpoint);
    let item = format!("/admin/{}/:id", V::SPEC.endpoint);

    Router::new()
        .route(&collection, get(list::<V>).post(create::<V>))
        .route(&item, get(read::<V>).put(update::<V>).delete(delete::<V>))
}

/// Turns raw query parameters into a [`ListQuery`]
///
/// `search`, `sort`, `desc`, `page` and `page_size` have fixed meanings;
/// every other non-empty key is an equality filter. Unknown filter columns are kept here and dropped by the list query, which
/// only honours the view's declared filters.
pub fn parse_list_query(mut params: BTreeMap<String, String>) -> ApiResult<ListQuery> {
    let number = |value: Option<String>, name: &str| -> ApiResult<u32> {
        match value.as_deref().map(str::trim) {
            None | Some("") => Ok(0),
            Some(raw) => raw
                .parse()
                .map_err(|_| ApiError::BadRequest(format!("{} must be a positive integer", name))),
        }
    };

    let search = params.remove("search").filter(|s| !s.trim().is_empty());
    let sort = params.remove("sort").filter(|s| !s.is_empty());
    let desc = params.remove("desc").is_some_and(|value| truthy(&value));
    let page = number(params.remove("page"), "page")?;
    let page_size = number(params.remove("page_size"), "page_size")?;

    params.retain(|_, value| !value.is_empty());

    Ok(ListQuery {
        search,
        sort,
        desc,
        filters: params,
        page,
        page_size,
    })
}

pub async fn list<V: ModelView>(
    State(state): State<AppState>,
    Query(params): Query<BTreeMap<String, String>>,
) -> ApiResult<Json<Page<V::Row>>> {
    let query = parse_list_query(params)?;
    let page = V::list(&state.db, &query).await?;

    tracing::debug!(view = V::SPEC.endpoint, total = page.total, "Listed rows");
    Ok(Json(page))
}

pub async fn create<V: ModelView>(
    State(state): State<AppState>,
    FormOrJson(form): FormOrJson<V::Form>,
) -> ApiResult<(StatusCode, Json<V::Row>)> {
    form.validate()?;

    let row = V::create(&state.db, form).await?;
    V::after_model_change(&row, true);

    tracing::info!(view = V::SPEC.endpoint, "Row created");
    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn read<V: ModelView>(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<V::Row>> {
    V::find(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found::<V>(id))
}

pub async fn update<V: ModelView>(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    FormOrJson(form): FormOrJson<V::Form>,
) -> ApiResult<Json<V::Row>> {
    form.validate()?;

    let row = V::update(&state.db, id, form)
        .await?
        .ok_or_else(|| not_found::<V>(id))?;
    V::after_model_change(&row, false);

    tracing::info!(view = V::SPEC.endpoint, row_id = id, "Row updated");
    Ok(Json(row))
}

pub async fn delete<V: ModelView>(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    if !V::delete(&state.db, id).await? {
        return Err(not_found::<V>(id));
    }

    tracing::info!(view = V::SPEC.endpoint, row_id = id, "Row deleted");
    Ok(StatusCode::NO_CONTENT)
}

fn not_found<V: ModelView>(id: i64) -> ApiError {
    ApiError::NotFound(format!("{} {} not found", V::SPEC.name, id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_list_query() {
        let query = parse_list_query(params(&[
            ("search", "harry"),
            ("sort", "email"),
            ("desc", "true"),
            ("page", "2"),
            ("page_size", "10"),
            ("first_name", "Harry"),
            ("email", ""),
        ]))
        .unwrap();

        assert_eq!(query.search.as_deref(), Some("harry"));
        assert_eq!(query.sort.as_deref(), Some("email"));
        assert!(query.desc);
        assert_eq!(query.page, 2);
        assert_eq!(query.page_size, 10);
        assert_eq!(query.filters, params(&[("first_name", "Harry")]));
    }

    #[test]
    fn test_parse_list_query_defaults() {
        let query = parse_list_query(BTreeMap::new()).unwrap();

        assert!(query.search.is_none());
        assert!(!query.desc);
        assert_eq!(query.page(), 1);
        assert_eq!(query.page_size(), 20);
        assert!(query.filters.is_empty());
    }

    #[test]
    fn test_parse_list_query_bad_page() {
        assert!(matches!(
            parse_list_query(params(&[("page", "-1")])),
            Err(ApiError::BadRequest(_))
        ));
    }
}
