//! Following service.

use chrono::Utc;
use sea_orm::Set;
use yatube_common::{AppResult, IdGenerator};
use yatube_db::{
    entities::{follow, user},
    repositories::FollowRepository,
};

/// What a follow request did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowOutcome {
    /// A new follow edge was created.
    Followed,
    /// The edge already existed; nothing changed.
    AlreadyFollowing,
    /// Users cannot follow themselves; nothing changed.
    SelfFollow,
}

/// Following service for business logic.
#[derive(Clone)]
pub struct FollowingService {
    follow_repo: FollowRepository,
    id_gen: IdGenerator,
}

impl FollowingService {
    /// Create a new following service.
    #[must_use]
    pub const fn new(follow_repo: FollowRepository) -> Self {
        Self {
            follow_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Follow an author.
    ///
    /// Following yourself or an author you already follow is a no-op.
    pub async fn follow(
        &self,
        follower: &user::Model,
        author: &user::Model,
    ) -> AppResult<FollowOutcome> {
        if follower.id == author.id {
            return Ok(FollowOutcome::SelfFollow);
        }

        if self
            .follow_repo
            .is_following(&follower.id, &author.id)
            .await?
        {
            return Ok(FollowOutcome::AlreadyFollowing);
        }

        let model = follow::ActiveModel {
            id: Set(self.id_gen.generate()),
            follower_id: Set(follower.id.clone()),
            author_id: Set(author.id.clone()),
            created_at: Set(Utc::now().into()),
        };
        self.follow_repo.create(model).await?;

        tracing::info!(follower = %follower.username, author = %author.username, "Followed author");
        Ok(FollowOutcome::Followed)
    }

    /// Stop following an author.
    ///
    /// Removes every matching edge; returns how many were removed.
    pub async fn unfollow(&self, follower: &user::Model, author: &user::Model) -> AppResult<u64> {
        let removed = self
            .follow_repo
            .delete_by_pair(&follower.id, &author.id)
            .await?;

        if removed > 0 {
            tracing::info!(follower = %follower.username, author = %author.username, "Unfollowed author");
        }
        Ok(removed)
    }

    /// Check if a user follows an author.
    pub async fn is_following(&self, follower_id: &str, author_id: &str) -> AppResult<bool> {
        self.follow_repo.is_following(follower_id, author_id).await
    }
}
