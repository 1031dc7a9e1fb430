//! Comment service.

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use sea_orm::Set;
use serde::Serialize;
use yatube_common::{AppResult, IdGenerator};
use yatube_db::{
    entities::{comment, post, user},
    repositories::{CommentRepository, UserRepository},
};

use crate::forms::{CommentForm, Submission};
use crate::services::post::UserSummary;

/// A comment ready for a page context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentView {
    pub id: String,
    pub text: String,
    /// Creation time, RFC 3339.
    pub created: String,
    pub author: UserSummary,
}

/// Comment service for business logic.
#[derive(Clone)]
pub struct CommentService {
    comment_repo: CommentRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl CommentService {
    /// Create a new comment service.
    #[must_use]
    pub const fn new(comment_repo: CommentRepository, user_repo: UserRepository) -> Self {
        Self {
            comment_repo,
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Attach a comment by `author` to `post`.
    pub async fn add(
        &self,
        post: &post::Model,
        author: &user::Model,
        form: CommentForm,
    ) -> AppResult<Submission<comment::Model>> {
        let errors = form.clean();
        if !errors.is_empty() {
            return Ok(Submission::Rejected(errors));
        }

        let model = comment::ActiveModel {
            id: Set(self.id_gen.generate()),
            post_id: Set(post.id.clone()),
            user_id: Set(author.id.clone()),
            text: Set(form.text.trim().to_string()),
            created_at: Set(Utc::now().into()),
        };

        let comment = self.comment_repo.create(model).await?;
        tracing::debug!(comment_id = %comment.id, post_id = %post.id, "Added comment");
        Ok(Submission::Accepted(comment))
    }

    /// Comments on a post, oldest first, with their authors.
    pub async fn for_post(&self, post_id: &str) -> AppResult<Vec<CommentView>> {
        let comments = self.comment_repo.find_by_post(post_id).await?;

        let user_ids: Vec<String> = comments
            .iter()
            .map(|c| c.user_id.clone())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let authors: HashMap<String, user::Model> = self
            .user_repo
            .find_by_ids(&user_ids)
            .await?
            .into_iter()
            .map(|u| (u.id.clone(), u))
            .collect();

        Ok(comments
            .into_iter()
            .filter_map(|comment| {
                let author = authors.get(&comment.user_id)?;
                Some(CommentView {
                    id: comment.id,
                    text: comment.text,
                    created: comment.created_at.to_rfc3339(),
                    author: UserSummary::from(author),
                })
            })
            .collect())
    }
}
