//! Post service.
//!
//! Listings, detail views, and create/edit with optional image upload.
//! Listings are hydrated with their authors and groups in two batch
//! queries instead of one query per post.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::Utc;
use sea_orm::Set;
use serde::Serialize;
use yatube_common::{AppError, AppResult, IdGenerator, StorageBackend, sanitize_file_name};
use yatube_db::{
    Page, PageRequest,
    entities::{group, post, user},
    repositories::{FollowRepository, GroupRepository, PostRepository, UserRepository},
};

use crate::forms::{FormErrors, INVALID_CHOICE_MESSAGE, ImageUpload, PostForm, Submission};

/// Storage directory for post images.
pub const IMAGE_DIR: &str = "posts";

/// Number of characters of the text used as the detail page title.
pub const TITLE_LEN: usize = 30;

/// Names tried for one upload before giving up.
const STORE_ATTEMPTS: usize = 8;

/// Author as shown next to a post or comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSummary {
    pub id: String,
    pub username: String,
    pub name: Option<String>,
}

impl From<&user::Model> for UserSummary {
    fn from(user: &user::Model) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            name: user.name.clone(),
        }
    }
}

/// Group as shown next to a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupSummary {
    pub id: String,
    pub title: String,
    pub slug: String,
}

impl From<&group::Model> for GroupSummary {
    fn from(group: &group::Model) -> Self {
        Self {
            id: group.id.clone(),
            title: group.title.clone(),
            slug: group.slug.clone(),
        }
    }
}

/// A post ready for a page context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostView {
    pub id: String,
    pub text: String,
    /// Short label (first characters of the text).
    pub label: String,
    /// Publication time, RFC 3339.
    pub pub_date: String,
    /// Public URL of the attached image.
    pub image: Option<String>,
    pub author: UserSummary,
    pub group: Option<GroupSummary>,
}

impl PostView {
    /// Title for the post's own page.
    #[must_use]
    pub fn title(&self) -> String {
        self.text.chars().take(TITLE_LEN).collect()
    }
}

/// Post service for business logic.
#[derive(Clone)]
pub struct PostService {
    post_repo: PostRepository,
    user_repo: UserRepository,
    group_repo: GroupRepository,
    follow_repo: FollowRepository,
    storage: Arc<dyn StorageBackend>,
    id_gen: IdGenerator,
}

impl PostService {
    /// Create a new post service.
    #[must_use]
    pub fn new(
        post_repo: PostRepository,
        user_repo: UserRepository,
        group_repo: GroupRepository,
        follow_repo: FollowRepository,
        storage: Arc<dyn StorageBackend>,
    ) -> Self {
        Self {
            post_repo,
            user_repo,
            group_repo,
            follow_repo,
            storage,
            id_gen: IdGenerator::new(),
        }
    }

    /// Get a post by ID.
    pub async fn get(&self, id: &str) -> AppResult<post::Model> {
        self.post_repo.get_by_id(id).await
    }

    /// Get a post by ID, hydrated for display.
    pub async fn detail(&self, id: &str) -> AppResult<PostView> {
        let post = self.post_repo.get_by_id(id).await?;
        self.to_views(std::slice::from_ref(&post))
            .await?
            .pop()
            .ok_or_else(|| AppError::Internal(format!("Author of post {id} is missing")))
    }

    /// One page of every post.
    pub async fn index(&self, request: &PageRequest) -> AppResult<Page<PostView>> {
        let page = self.post_repo.paginate_all(request).await?;
        self.hydrate_page(page).await
    }

    /// One page of the posts filed under a group.
    pub async fn group_posts(
        &self,
        group_id: &str,
        request: &PageRequest,
    ) -> AppResult<Page<PostView>> {
        let page = self.post_repo.paginate_by_group(group_id, request).await?;
        self.hydrate_page(page).await
    }

    /// One page of the posts written by a user.
    pub async fn user_posts(
        &self,
        user_id: &str,
        request: &PageRequest,
    ) -> AppResult<Page<PostView>> {
        let page = self.post_repo.paginate_by_user(user_id, request).await?;
        self.hydrate_page(page).await
    }

    /// One page of the posts by every author `follower_id` follows.
    pub async fn feed(
        &self,
        follower_id: &str,
        request: &PageRequest,
    ) -> AppResult<Page<PostView>> {
        let author_ids = self.follow_repo.find_author_ids(follower_id).await?;
        let page = self
            .post_repo
            .paginate_by_authors(&author_ids, request)
            .await?;
        self.hydrate_page(page).await
    }

    /// Publish a post written by `author`.
    pub async fn create(
        &self,
        author: &user::Model,
        form: PostForm,
    ) -> AppResult<Submission<post::Model>> {
        let errors = self.clean(&form).await?;
        if !errors.is_empty() {
            return Ok(Submission::Rejected(errors));
        }

        let group_id = form.group_id().map(ToString::to_string);
        let image = match &form.image {
            Some(upload) => Some(self.store_image(upload).await?),
            None => None,
        };

        let model = post::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(author.id.clone()),
            text: Set(form.text.trim().to_string()),
            group_id: Set(group_id),
            image: Set(image),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        let post = self.post_repo.create(model).await?;
        tracing::info!(post_id = %post.id, author = %author.username, "Created post");
        Ok(Submission::Accepted(post))
    }

    /// Check that `editor` wrote `post`.
    pub fn ensure_author(editor: &user::Model, post: &post::Model) -> AppResult<()> {
        if post.user_id == editor.id {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Only the author can edit this post".to_string(),
            ))
        }
    }

    /// Update a post in place.
    ///
    /// The image is replaced only when a new one is uploaded. The
    /// publication time never changes.
    pub async fn edit(
        &self,
        editor: &user::Model,
        post: post::Model,
        form: PostForm,
    ) -> AppResult<Submission<post::Model>> {
        Self::ensure_author(editor, &post)?;

        let errors = self.clean(&form).await?;
        if !errors.is_empty() {
            return Ok(Submission::Rejected(errors));
        }

        let group_id = form.group_id().map(ToString::to_string);
        let mut active: post::ActiveModel = post.into();
        active.text = Set(form.text.trim().to_string());
        active.group_id = Set(group_id);
        if let Some(upload) = &form.image {
            active.image = Set(Some(self.store_image(upload).await?));
        }
        active.updated_at = Set(Some(Utc::now().into()));

        let post = self.post_repo.update(active).await?;
        tracing::info!(post_id = %post.id, "Edited post");
        Ok(Submission::Accepted(post))
    }

    /// Number of posts written by a user.
    pub async fn count_by_user(&self, user_id: &str) -> AppResult<u64> {
        self.post_repo.count_by_user(user_id).await
    }

    async fn clean(&self, form: &PostForm) -> AppResult<FormErrors> {
        let mut errors = form.clean();
        if let Some(group_id) = form.group_id() {
            if self.group_repo.find_by_id(group_id).await?.is_none() {
                errors.add("group", INVALID_CHOICE_MESSAGE);
            }
        }
        Ok(errors)
    }

    /// Write an uploaded image and return its storage key.
    ///
    /// A name already taken gets a short random suffix before the extension.
    async fn store_image(&self, upload: &ImageUpload) -> AppResult<String> {
        let name = sanitize_file_name(&upload.file_name);
        let mut key = format!("{IMAGE_DIR}/{name}");

        for _ in 0..STORE_ATTEMPTS {
            if self.storage.create(&key, &upload.data).await? {
                return Ok(key);
            }

            let suffix = self.id_gen.generate_suffix();
            key = match name.rsplit_once('.') {
                Some((stem, ext)) => format!("{IMAGE_DIR}/{stem}_{suffix}.{ext}"),
                None => format!("{IMAGE_DIR}/{name}_{suffix}"),
            };
        }

        Err(AppError::Storage(format!("No free name for upload {name}")))
    }

    async fn hydrate_page(&self, page: Page<post::Model>) -> AppResult<Page<PostView>> {
        let views = self.to_views(&page.object_list).await?;
        Ok(page.with_object_list(views))
    }

    async fn to_views(&self, posts: &[post::Model]) -> AppResult<Vec<PostView>> {
        let user_ids: Vec<String> = posts
            .iter()
            .map(|p| p.user_id.clone())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let group_ids: Vec<String> = posts
            .iter()
            .filter_map(|p| p.group_id.clone())
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
        let groups: HashMap<String, group::Model> = self
            .group_repo
            .find_by_ids(&group_ids)
            .await?
            .into_iter()
            .map(|g| (g.id.clone(), g))
            .collect();

        Ok(posts
            .iter()
            .filter_map(|post| {
                let Some(author) = authors.get(&post.user_id) else {
                    tracing::warn!(post_id = %post.id, "Skipping post without author");
                    return None;
                };
                let group = post.group_id.as_ref().and_then(|id| groups.get(id));

                Some(PostView {
                    id: post.id.clone(),
                    text: post.text.clone(),
                    label: post.to_string(),
                    pub_date: post.created_at.to_rfc3339(),
                    image: post.image.as_deref().map(|key| self.storage.public_url(key)),
                    author: UserSummary::from(author),
                    group: group.map(GroupSummary::from),
                })
            })
            .collect())
    }
}
