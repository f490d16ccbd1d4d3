/// Admin index
///
/// `GET /admin/` sends anonymous visitors to the login form. Logged-in users
/// get the site title, their own principal, and the specs of the views they
/// may open: all of them for principals passing the access policy, none
/// otherwise.

use crate::{
    app::AppState,
    middleware::session::CurrentPrincipal,
    views::{all_specs, ViewSpec},
};
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use ezztracker_shared::auth::policy::Principal;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct AdminIndex {
    pub title: String,
    pub principal: Principal,
    pub views: Vec<ViewSpec>,
}

pub async fn admin_index(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
) -> Response {
    let Some(principal) = principal else {
        return Redirect::to("/login/").into_response();
    };

    let views = if state.policy.is_accessible(Some(&principal)) {
        all_specs()
    } else {
        Vec::new()
    };

    Json(AdminIndex {
        title: state.config.admin_title.clone(),
        principal,
        views,
    })
    .into_response()
}
