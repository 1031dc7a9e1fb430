//! Profile page and follow/unfollow actions.

use axum::{
    extract::{Path, Query, State},
    response::Response,
};
use serde_json::json;
use yatube_common::AppResult;
use yatube_core::{FollowOutcome, UserSummary};

use crate::{
    extractors::{AuthUser, MaybeAuthUser, PageQuery},
    middleware::AppState,
    response::{PageObject, PageView, found},
};

const PROFILE_TEMPLATE: &str = "posts/profile.html";

fn profile_url(username: &str) -> String {
    format!("/profile/{username}/")
}

/// An author's posts.
pub async fn profile(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<AppState>,
    Path(username): Path<String>,
    Query(query): Query<PageQuery>,
) -> AppResult<PageView> {
    let author = state.user_service.get_by_username(&username).await?;
    let page = state
        .post_service
        .user_posts(&author.id, &query.into_request())
        .await?;

    let following = match &viewer {
        Some(viewer) => {
            state
                .following_service
                .is_following(&viewer.id, &author.id)
                .await?
        }
        None => false,
    };

    Ok(PageView::new(
        PROFILE_TEMPLATE,
        json!({
            "author": UserSummary::from(&author),
            "count": page.count,
            "page_obj": PageObject::from(&page),
            "following": following,
        }),
    ))
}

/// Follow an author, then show their profile.
pub async fn profile_follow(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<Response> {
    let author = state.user_service.get_by_username(&username).await?;

    let outcome = state.following_service.follow(&user, &author).await?;
    if outcome != FollowOutcome::Followed {
        tracing::debug!(?outcome, author = %author.username, "Follow left unchanged");
    }

    Ok(found(&profile_url(&author.username)))
}

/// Stop following an author, then show their profile.
pub async fn profile_unfollow(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<Response> {
    let author = state.user_service.get_by_username(&username).await?;
    state.following_service.unfollow(&user, &author).await?;

    Ok(found(&profile_url(&author.username)))
}
