//! Post repository.

use std::sync::Arc;

use crate::entities::{Post, post};
use crate::pagination::{Page, PageRequest};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Select,
};
use yatube_common::{AppError, AppResult};

/// Post repository for database operations.
///
/// Every listing is newest first, with the ID breaking ties between posts
/// published in the same instant.
#[derive(Clone)]
pub struct PostRepository {
    db: Arc<DatabaseConnection>,
}

impl PostRepository {
    /// Create a new post repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a post by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<post::Model>> {
        Post::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a post by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<post::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::PostNotFound(id.to_string()))
    }

    /// Create a new post.
    pub async fn create(&self, model: post::ActiveModel) -> AppResult<post::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a post.
    pub async fn update(&self, model: post::ActiveModel) -> AppResult<post::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a post by ID.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        Post::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Count all posts.
    pub async fn count(&self) -> AppResult<u64> {
        Post::find()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count posts written by a user.
    pub async fn count_by_user(&self, user_id: &str) -> AppResult<u64> {
        Post::find()
            .filter(post::Column::UserId.eq(user_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// One page of every post.
    pub async fn paginate_all(&self, request: &PageRequest) -> AppResult<Page<post::Model>> {
        self.paginate(Post::find(), request).await
    }

    /// One page of the posts written by a user.
    pub async fn paginate_by_user(
        &self,
        user_id: &str,
        request: &PageRequest,
    ) -> AppResult<Page<post::Model>> {
        self.paginate(Post::find().filter(post::Column::UserId.eq(user_id)), request)
            .await
    }

    /// One page of the posts filed under a group.
    pub async fn paginate_by_group(
        &self,
        group_id: &str,
        request: &PageRequest,
    ) -> AppResult<Page<post::Model>> {
        self.paginate(
            Post::find().filter(post::Column::GroupId.eq(group_id)),
            request,
        )
        .await
    }

    /// One page of the posts written by any of `author_ids`.
    pub async fn paginate_by_authors(
        &self,
        author_ids: &[String],
        request: &PageRequest,
    ) -> AppResult<Page<post::Model>> {
        if author_ids.is_empty() {
            return Ok(Page::empty(request));
        }

        self.paginate(
            Post::find().filter(post::Column::UserId.is_in(author_ids.iter().cloned())),
            request,
        )
        .await
    }

    async fn paginate(
        &self,
        query: Select<Post>,
        request: &PageRequest,
    ) -> AppResult<Page<post::Model>> {
        let paginator = query
            .order_by_desc(post::Column::CreatedAt)
            .order_by_desc(post::Column::Id)
            .paginate(self.db.as_ref(), request.per_page());

        let count = paginator
            .num_items()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if count == 0 {
            return Ok(Page::empty(request));
        }

        let number = request.resolve(count);
        let items = paginator
            .fetch_page(number - 1)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(Page::new(items, number, count, request))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_post(id: &str, user_id: &str, text: &str) -> post::Model {
        post::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            text: text.to_string(),
            group_id: None,
            image: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<post::Model>::new()])
                .into_connection(),
        );

        let repo = PostRepository::new(db);
        let result = repo.get_by_id("missing").await;

        assert!(matches!(result, Err(AppError::PostNotFound(_))));
    }

    #[tokio::test]
    async fn test_paginate_all_last_page() {
        let posts: Vec<post::Model> = (0..3)
            .map(|i| create_test_post(&format!("p{i}"), "user1", "text"))
            .collect();

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(13))
                }]])
                .append_query_results([posts])
                .into_connection(),
        );

        let repo = PostRepository::new(db);
        let page = repo
            .paginate_all(&PageRequest::new(Some("2".to_string())))
            .await
            .unwrap();

        assert_eq!(page.number, 2);
        assert_eq!(page.num_pages, 2);
        assert_eq!(page.count, 13);
        assert_eq!(page.len(), 3);
    }

    #[tokio::test]
    async fn test_paginate_empty_listing() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(0))
                }]])
                .into_connection(),
        );

        let repo = PostRepository::new(db);
        let page = repo
            .paginate_by_group("g1", &PageRequest::new(Some("7".to_string())))
            .await
            .unwrap();

        assert_eq!(page.number, 1);
        assert!(page.is_empty());
    }

    #[tokio::test]
    async fn test_paginate_by_authors_without_authors() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let repo = PostRepository::new(db);
        let page = repo
            .paginate_by_authors(&[], &PageRequest::first())
            .await
            .unwrap();

        assert_eq!(page.count, 0);
        assert_eq!(page.num_pages, 1);
    }

    #[tokio::test]
    async fn test_delete() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = PostRepository::new(db);
        assert!(repo.delete("p1").await.is_ok());
    }
}
