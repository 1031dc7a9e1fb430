//! Page endpoints.

mod comments;
mod groups;
mod posts;
mod profiles;

use axum::{
    Router,
    http::Uri,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};
use tower_http::services::ServeDir;
use yatube_common::AppError;

use crate::middleware::{AppState, auth_middleware};
use crate::page_cache::cache_index_middleware;

/// Create the page router.
///
/// The index route is wrapped in the page cache, so it needs the state
/// up front.
pub fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(posts::index).layer(middleware::from_fn_with_state(
                state.page_cache.clone(),
                cache_index_middleware,
            )),
        )
        .route("/group/{slug}/", get(groups::group_list))
        .route("/profile/{username}/", get(profiles::profile))
        .route(
            "/profile/{username}/follow/",
            get(profiles::profile_follow).post(profiles::profile_follow),
        )
        .route(
            "/profile/{username}/unfollow/",
            get(profiles::profile_unfollow).post(profiles::profile_unfollow),
        )
        .route("/posts/{post_id}/", get(posts::post_detail))
        .route(
            "/posts/{post_id}/edit/",
            get(posts::post_edit_form).post(posts::post_edit),
        )
        .route(
            "/posts/{post_id}/comment/",
            get(comments::comment_redirect).post(comments::add_comment),
        )
        .route(
            "/create/",
            get(posts::post_create_form).post(posts::post_create),
        )
        .route("/follow/", get(posts::follow_index))
}

/// Full application: pages, uploaded media, authentication and the 404
/// fallback.
pub fn app(state: AppState) -> Router {
    let media = ServeDir::new(&state.media.root);
    let media_url = format!("/{}", state.media.url.trim_matches('/'));

    router(&state)
        .nest_service(&media_url, media)
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state)
}

async fn not_found(uri: Uri) -> Response {
    AppError::NotFound(uri.path().to_string()).into_response()
}
