//! Application state and authentication middleware.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::Response,
};
use sea_orm::DatabaseConnection;
use yatube_common::{Config, StorageBackend, config::MediaConfig};
use yatube_core::{CommentService, FollowingService, GroupService, PostService, UserService};
use yatube_db::repositories::{
    CommentRepository, FollowRepository, GroupRepository, PostRepository, UserRepository,
};

use crate::page_cache::PageCache;

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub group_service: GroupService,
    pub post_service: PostService,
    pub comment_service: CommentService,
    pub following_service: FollowingService,
    pub page_cache: PageCache,
    pub media: MediaConfig,
}

impl AppState {
    /// Wire every service onto one connection pool.
    #[must_use]
    pub fn new(
        db: Arc<DatabaseConnection>,
        storage: Arc<dyn StorageBackend>,
        config: &Config,
    ) -> Self {
        let user_repo = UserRepository::new(Arc::clone(&db));
        let group_repo = GroupRepository::new(Arc::clone(&db));
        let post_repo = PostRepository::new(Arc::clone(&db));
        let comment_repo = CommentRepository::new(Arc::clone(&db));
        let follow_repo = FollowRepository::new(db);

        Self {
            user_service: UserService::new(user_repo.clone()),
            group_service: GroupService::new(group_repo.clone()),
            post_service: PostService::new(
                post_repo,
                user_repo.clone(),
                group_repo,
                follow_repo.clone(),
                storage,
            ),
            comment_service: CommentService::new(comment_repo, user_repo),
            following_service: FollowingService::new(follow_repo),
            page_cache: PageCache::new(Duration::from_secs(config.cache.index_ttl_secs)),
            media: config.media.clone(),
        }
    }
}

/// Authentication middleware.
///
/// A valid `Authorization: Bearer <token>` header puts the user into the
/// request extensions; anything else leaves the request anonymous.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(ToString::to_string);

    if let Some(token) = token {
        match state.user_service.authenticate_by_token(&token).await {
            Ok(user) => {
                req.extensions_mut().insert(user);
            }
            Err(e) => tracing::debug!(error = %e, "Ignoring invalid bearer token"),
        }
    }

    next.run(req).await
}
