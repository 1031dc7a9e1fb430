//! Group listing page.

use axum::extract::{Path, Query, State};
use serde_json::json;
use yatube_common::AppResult;

use crate::{
    extractors::PageQuery,
    middleware::AppState,
    response::{PageObject, PageView},
};

const GROUP_TEMPLATE: &str = "posts/group_list.html";

/// Posts filed under a group.
pub async fn group_list(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<PageQuery>,
) -> AppResult<PageView> {
    let group = state.group_service.get_by_slug(&slug).await?;
    let page = state
        .post_service
        .group_posts(&group.id, &query.into_request())
        .await?;

    Ok(PageView::new(
        GROUP_TEMPLATE,
        json!({
            "title": format!("Posts of community {group}"),
            "group": group,
            "page_obj": PageObject::from(&page),
        }),
    ))
}
