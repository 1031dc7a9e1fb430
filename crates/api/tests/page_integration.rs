//! Page integration tests.
//!
//! Each test drives the full router against a fresh in-memory database.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::redundant_clone)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, Response, StatusCode, header},
};
use chrono::{Duration, Utc};
use sea_orm::Set;
use serde_json::Value;
use tower::ServiceExt;
use yatube_api::{AppState, app};
use yatube_common::{
    IdGenerator, LocalStorage,
    config::{CacheConfig, Config, DatabaseConfig, MediaConfig, ServerConfig},
};
use yatube_core::{CreateGroupInput, CreateUserInput};
use yatube_db::{
    entities::{group, post, user},
    repositories::{CommentRepository, FollowRepository, PostRepository},
    test_utils::{MEMORY_URL, TestDatabase},
};

const BOUNDARY: &str = "yatube-test-boundary";
const GIF: &[u8] = b"GIF89a\x01\x00\x01\x00\x00\x00\x00;";

struct TestApp {
    state: AppState,
    db: TestDatabase,
    media_root: PathBuf,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.media_root);
    }
}

fn create_test_config(media_root: PathBuf) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8000,
            url: "http://localhost:8000".to_string(),
        },
        database: DatabaseConfig {
            url: MEMORY_URL.to_string(),
            max_connections: 1,
            min_connections: 1,
        },
        media: MediaConfig {
            root: media_root,
            url: "/media".to_string(),
        },
        cache: CacheConfig { index_ttl_secs: 60 },
    }
}

async fn setup() -> TestApp {
    let db = TestDatabase::new().await.expect("test database");
    let media_root = std::env::temp_dir().join(format!("yatube-media-{}", uuid::Uuid::new_v4()));
    let config = create_test_config(media_root.clone());
    let storage = Arc::new(LocalStorage::new(
        media_root.clone(),
        config.media.url.clone(),
    ));
    let state = AppState::new(db.connection(), storage, &config);

    TestApp {
        state,
        db,
        media_root,
    }
}

impl TestApp {
    async fn send(&self, request: Request<Body>) -> Response<Body> {
        app(self.state.clone()).oneshot(request).await.unwrap()
    }

    async fn create_user(&self, username: &str) -> user::Model {
        self.state
            .user_service
            .create(CreateUserInput {
                username: username.to_string(),
                name: None,
            })
            .await
            .unwrap()
    }

    async fn create_group(&self, slug: &str) -> group::Model {
        self.state
            .group_service
            .create(CreateGroupInput {
                title: format!("Group {slug}"),
                slug: slug.to_string(),
                description: String::new(),
            })
            .await
            .unwrap()
    }

    /// Insert a post published `age_secs` seconds ago.
    async fn create_post(
        &self,
        author: &user::Model,
        group: Option<&group::Model>,
        text: &str,
        age_secs: i64,
    ) -> post::Model {
        PostRepository::new(self.db.connection())
            .create(post::ActiveModel {
                id: Set(IdGenerator::new().generate()),
                user_id: Set(author.id.clone()),
                text: Set(text.to_string()),
                group_id: Set(group.map(|g| g.id.clone())),
                image: Set(None),
                created_at: Set((Utc::now() - Duration::seconds(age_secs)).into()),
                updated_at: Set(None),
            })
            .await
            .unwrap()
    }

    fn posts(&self) -> PostRepository {
        PostRepository::new(self.db.connection())
    }

    fn follows(&self) -> FollowRepository {
        FollowRepository::new(self.db.connection())
    }
}

fn get(uri: &str, user: Option<&user::Model>) -> Request<Body> {
    with_auth(Request::builder().uri(uri).method("GET"), user)
        .body(Body::empty())
        .unwrap()
}

fn post_form(uri: &str, user: Option<&user::Model>, body: &str) -> Request<Body> {
    with_auth(Request::builder().uri(uri).method("POST"), user)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_multipart(
    uri: &str,
    user: Option<&user::Model>,
    fields: &[(&str, &str)],
    image: Option<(&str, &[u8])>,
) -> Request<Body> {
    let mut body: Vec<u8> = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, data)) = image {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    with_auth(Request::builder().uri(uri).method("POST"), user)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn with_auth(
    builder: axum::http::request::Builder,
    user: Option<&user::Model>,
) -> axum::http::request::Builder {
    match user.and_then(|u| u.token.as_deref()) {
        Some(token) => builder.header(header::AUTHORIZATION, format!("Bearer {token}")),
        None => builder,
    }
}

async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn location(response: &Response<Body>) -> &str {
    response.headers()[header::LOCATION].to_str().unwrap()
}

fn listed_texts(page: &Value) -> Vec<String> {
    page["context"]["page_obj"]["object_list"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["text"].as_str().unwrap().to_string())
        .collect()
}

// === Listings ===

#[tokio::test]
async fn test_index_splits_thirteen_posts_ten_and_three() {
    let app = setup().await;
    let author = app.create_user("leo").await;
    for i in 0..13 {
        app.create_post(&author, None, &format!("post {i}"), i).await;
    }

    let first = body_json(app.send(get("/", None)).await).await;
    assert_eq!(first["template"], "posts/index.html");
    assert_eq!(listed_texts(&first).len(), 10);
    assert_eq!(listed_texts(&first)[0], "post 0");
    assert_eq!(first["context"]["page_obj"]["num_pages"], 2);

    let second = body_json(app.send(get("/?page=2", None)).await).await;
    assert_eq!(listed_texts(&second).len(), 3);
    assert_eq!(listed_texts(&second)[2], "post 12");
}

#[tokio::test]
async fn test_out_of_range_page_serves_last_page() {
    let app = setup().await;
    let author = app.create_user("leo").await;
    for i in 0..13 {
        app.create_post(&author, None, &format!("post {i}"), i).await;
    }

    let page = body_json(
        app.send(get("/profile/leo/?page=99", None)).await,
    )
    .await;
    assert_eq!(page["context"]["page_obj"]["number"], 2);

    let page = body_json(app.send(get("/profile/leo/?page=abc", None)).await).await;
    assert_eq!(page["context"]["page_obj"]["number"], 1);
}

#[tokio::test]
async fn test_group_listing_only_shows_its_posts() {
    let app = setup().await;
    let author = app.create_user("leo").await;
    let cats = app.create_group("cats").await;
    let dogs = app.create_group("dogs").await;
    app.create_post(&author, Some(&cats), "about cats", 0).await;

    let cats_page = body_json(app.send(get("/group/cats/", None)).await).await;
    assert_eq!(cats_page["template"], "posts/group_list.html");
    assert_eq!(cats_page["context"]["title"], "Posts of community Group cats");
    assert_eq!(listed_texts(&cats_page), ["about cats"]);
    assert_eq!(
        cats_page["context"]["page_obj"]["object_list"][0]["group"]["slug"],
        "cats"
    );

    let dogs_page = body_json(app.send(get("/group/dogs/", None)).await).await;
    assert!(listed_texts(&dogs_page).is_empty());
    assert_eq!(dogs_page["context"]["group"]["id"], dogs.id.as_str());
}

#[tokio::test]
async fn test_missing_records_are_not_found() {
    let app = setup().await;

    for uri in ["/group/nope/", "/profile/nobody/", "/posts/missing/", "/no/such/page/"] {
        let response = app.send(get(uri, None)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body_json(response).await["template"], "core/404.html");
    }
}

#[tokio::test]
async fn test_profile_context() {
    let app = setup().await;
    let author = app.create_user("leo").await;
    let reader = app.create_user("mia").await;
    app.create_post(&author, None, "hello", 0).await;

    let anonymous = body_json(app.send(get("/profile/leo/", None)).await).await;
    assert_eq!(anonymous["template"], "posts/profile.html");
    assert_eq!(anonymous["context"]["author"]["username"], "leo");
    assert_eq!(anonymous["context"]["count"], 1);
    assert_eq!(anonymous["context"]["following"], false);

    app.send(get("/profile/leo/follow/", Some(&reader))).await;
    let following = body_json(app.send(get("/profile/leo/", Some(&reader))).await).await;
    assert_eq!(following["context"]["following"], true);
}

#[tokio::test]
async fn test_post_detail_context() {
    let app = setup().await;
    let author = app.create_user("leo").await;
    let post = app
        .create_post(&author, None, "A post long enough to need a shorter title", 0)
        .await;

    let page = body_json(app.send(get(&format!("/posts/{}/", post.id), None)).await).await;
    assert_eq!(page["template"], "posts/post_detail.html");
    assert_eq!(page["context"]["id"], post.id.as_str());
    assert_eq!(page["context"]["title"], "A post long enough to need a s");
    assert_eq!(page["context"]["post"]["author"]["username"], "leo");
    assert!(page["context"]["comments"].as_array().unwrap().is_empty());
}

// === Create / edit ===

#[tokio::test]
async fn test_members_only_pages_redirect_to_login() {
    let app = setup().await;
    let author = app.create_user("leo").await;
    let post = app.create_post(&author, None, "hello", 0).await;

    let cases = [
        ("/create/".to_string(), "/auth/login/?next=/create/".to_string()),
        ("/follow/".to_string(), "/auth/login/?next=/follow/".to_string()),
        (
            format!("/posts/{}/edit/", post.id),
            format!("/auth/login/?next=/posts/{}/edit/", post.id),
        ),
        (
            "/profile/leo/follow/".to_string(),
            "/auth/login/?next=/profile/leo/follow/".to_string(),
        ),
    ];

    for (uri, expected) in cases {
        let response = app.send(get(&uri, None)).await;
        assert_eq!(response.status(), StatusCode::FOUND, "{uri}");
        assert_eq!(location(&response), expected);
    }

    let response = app
        .send(post_multipart("/create/", None, &[("text", "sneaky")], None))
        .await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(app.posts().count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_create_form_lists_groups() {
    let app = setup().await;
    let author = app.create_user("leo").await;
    app.create_group("cats").await;

    let page = body_json(app.send(get("/create/", Some(&author))).await).await;
    assert_eq!(page["template"], "posts/create_post.html");
    assert_eq!(page["context"]["is_edit"], false);
    assert_eq!(page["context"]["groups"][0]["slug"], "cats");
}

#[tokio::test]
async fn test_create_post_adds_one_post_by_submitter() {
    let app = setup().await;
    let author = app.create_user("leo").await;
    let group = app.create_group("cats").await;
    let before = app.posts().count().await.unwrap();

    let response = app
        .send(post_multipart(
            "/create/",
            Some(&author),
            &[("text", "Fresh post"), ("group", &group.id)],
            None,
        ))
        .await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/profile/leo/");
    assert_eq!(app.posts().count().await.unwrap(), before + 1);

    let page = app
        .posts()
        .paginate_by_user(&author.id, &yatube_db::PageRequest::first())
        .await
        .unwrap();
    let created = &page.object_list[0];
    assert_eq!(created.text, "Fresh post");
    assert_eq!(created.user_id, author.id);
    assert_eq!(created.group_id.as_deref(), Some(group.id.as_str()));
}

#[tokio::test]
async fn test_create_post_with_image() {
    let app = setup().await;
    let author = app.create_user("leo").await;

    let response = app
        .send(post_multipart(
            "/create/",
            Some(&author),
            &[("text", "With a picture")],
            Some(("small.gif", GIF)),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::FOUND);

    let page = body_json(app.send(get("/", None)).await).await;
    assert_eq!(
        page["context"]["page_obj"]["object_list"][0]["image"],
        "/media/posts/small.gif"
    );
    assert!(app.media_root.join("posts").join("small.gif").exists());

    let media = app.send(get("/media/posts/small.gif", None)).await;
    assert_eq!(media.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_invalid_submission_rerenders_form() {
    let app = setup().await;
    let author = app.create_user("leo").await;

    let response = app
        .send(post_multipart(
            "/create/",
            Some(&author),
            &[("text", "  "), ("group", "no-such-group")],
            Some(("notes.txt", b"plain text")),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let page = body_json(response).await;
    assert_eq!(page["template"], "posts/create_post.html");
    let errors = &page["context"]["form"]["errors"];
    assert_eq!(errors["text"][0], "This field is required.");
    assert!(errors["group"][0].as_str().unwrap().starts_with("Select a valid choice."));
    assert!(errors["image"][0].as_str().unwrap().starts_with("Upload a valid image."));
    assert_eq!(app.posts().count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_edit_by_author_updates_post() {
    let app = setup().await;
    let author = app.create_user("leo").await;
    let post = app.create_post(&author, None, "Original", 0).await;
    let uri = format!("/posts/{}/edit/", post.id);

    let form = body_json(app.send(get(&uri, Some(&author))).await).await;
    assert_eq!(form["context"]["is_edit"], true);
    assert_eq!(form["context"]["form"]["text"], "Original");

    let response = app
        .send(post_multipart(&uri, Some(&author), &[("text", "Edited")], None))
        .await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), format!("/posts/{}/", post.id));

    let edited = app.posts().get_by_id(&post.id).await.unwrap();
    assert_eq!(edited.text, "Edited");
    assert_eq!(edited.created_at, post.created_at);
    assert!(edited.updated_at.is_some());
}

#[tokio::test]
async fn test_edit_by_non_author_changes_nothing() {
    let app = setup().await;
    let author = app.create_user("leo").await;
    let stranger = app.create_user("mia").await;
    let group = app.create_group("cats").await;
    let post = app.create_post(&author, Some(&group), "Original", 0).await;
    let uri = format!("/posts/{}/edit/", post.id);

    let response = app.send(get(&uri, Some(&stranger))).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), format!("/posts/{}/", post.id));

    let response = app
        .send(post_multipart(
            &uri,
            Some(&stranger),
            &[("text", "Hijacked"), ("group", "")],
            None,
        ))
        .await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), format!("/posts/{}/", post.id));

    let unchanged = app.posts().get_by_id(&post.id).await.unwrap();
    assert_eq!(unchanged.text, "Original");
    assert_eq!(unchanged.group_id, Some(group.id));
}

#[tokio::test]
async fn test_create_post_from_urlencoded_form() {
    let app = setup().await;
    let author = app.create_user("leo").await;
    let group = app.create_group("cats").await;

    let response = app
        .send(post_form(
            "/create/",
            Some(&author),
            &format!("text=Plain+text&group={}", group.id),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/profile/leo/");

    let page = app
        .posts()
        .paginate_by_user(&author.id, &yatube_db::PageRequest::first())
        .await
        .unwrap();
    assert_eq!(page.count, 1);
    assert_eq!(page.object_list[0].text, "Plain text");
    assert_eq!(page.object_list[0].group_id, Some(group.id));
}

#[tokio::test]
async fn test_urlencoded_edit_by_non_author_redirects_to_post() {
    let app = setup().await;
    let author = app.create_user("leo").await;
    let stranger = app.create_user("mia").await;
    let post = app.create_post(&author, None, "Original", 0).await;
    let uri = format!("/posts/{}/edit/", post.id);

    let response = app
        .send(post_form(&uri, Some(&stranger), "text=Hijacked"))
        .await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), format!("/posts/{}/", post.id));

    let unchanged = app.posts().get_by_id(&post.id).await.unwrap();
    assert_eq!(unchanged.text, "Original");
}

#[tokio::test]
async fn test_edit_of_missing_post_is_not_found() {
    let app = setup().await;
    let author = app.create_user("leo").await;

    let response = app
        .send(post_form("/posts/nope/edit/", Some(&author), "text=Hi"))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["template"], "core/404.html");

    let response = app
        .send(post_multipart("/posts/nope/edit/", Some(&author), &[("text", "Hi")], None))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// === Comments ===

#[tokio::test]
async fn test_comment_is_added_and_shown() {
    let app = setup().await;
    let author = app.create_user("leo").await;
    let reader = app.create_user("mia").await;
    let post = app.create_post(&author, None, "hello", 0).await;
    let uri = format!("/posts/{}/comment/", post.id);

    let response = app.send(post_form(&uri, Some(&reader), "text=Nice+post")).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), format!("/posts/{}/", post.id));

    let page = body_json(app.send(get(&format!("/posts/{}/", post.id), None)).await).await;
    let comments = page["context"]["comments"].as_array().unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0]["text"], "Nice post");
    assert_eq!(comments[0]["author"]["username"], "mia");
}

#[tokio::test]
async fn test_blank_comment_is_rejected_with_errors() {
    let app = setup().await;
    let author = app.create_user("leo").await;
    let post = app.create_post(&author, None, "hello", 0).await;
    let uri = format!("/posts/{}/comment/", post.id);

    let response = app.send(post_form(&uri, Some(&author), "text=+++")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_json(response).await;
    assert_eq!(page["template"], "posts/post_detail.html");
    assert_eq!(
        page["context"]["form"]["errors"]["text"][0],
        "This field is required."
    );
    assert_eq!(
        CommentRepository::new(app.db.connection())
            .count_by_post(&post.id)
            .await
            .unwrap(),
        0
    );
}

#[tokio::test]
async fn test_anonymous_comment_redirects_to_login() {
    let app = setup().await;
    let author = app.create_user("leo").await;
    let post = app.create_post(&author, None, "hello", 0).await;
    let uri = format!("/posts/{}/comment/", post.id);

    let response = app.send(post_form(&uri, None, "text=Hi")).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), format!("/auth/login/?next={uri}"));
}

#[tokio::test]
async fn test_multipart_comment_rerenders_with_errors() {
    let app = setup().await;
    let author = app.create_user("leo").await;
    let post = app.create_post(&author, None, "hello", 0).await;
    let uri = format!("/posts/{}/comment/", post.id);

    let response = app
        .send(post_multipart(&uri, Some(&author), &[("text", "Nice")], None))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_json(response).await;
    assert_eq!(page["template"], "posts/post_detail.html");
    assert_eq!(
        page["context"]["form"]["errors"]["text"][0],
        "This field is required."
    );
    assert_eq!(
        CommentRepository::new(app.db.connection())
            .count_by_post(&post.id)
            .await
            .unwrap(),
        0
    );
}

#[tokio::test]
async fn test_comment_on_missing_post_is_not_found() {
    let app = setup().await;
    let author = app.create_user("leo").await;

    let response = app
        .send(post_multipart("/posts/nope/comment/", Some(&author), &[("text", "Hi")], None))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["template"], "core/404.html");
}

// === Following ===

#[tokio::test]
async fn test_follow_and_unfollow_are_idempotent() {
    let app = setup().await;
    let author = app.create_user("leo").await;
    let reader = app.create_user("mia").await;
    let before = app.follows().count_by_pair(&reader.id, &author.id).await.unwrap();

    for _ in 0..2 {
        let response = app.send(get("/profile/leo/follow/", Some(&reader))).await;
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(location(&response), "/profile/leo/");
    }
    assert_eq!(
        app.follows().count_by_pair(&reader.id, &author.id).await.unwrap(),
        before + 1
    );

    for _ in 0..2 {
        let response = app.send(get("/profile/leo/unfollow/", Some(&reader))).await;
        assert_eq!(response.status(), StatusCode::FOUND);
    }
    assert_eq!(
        app.follows().count_by_pair(&reader.id, &author.id).await.unwrap(),
        before
    );
}

#[tokio::test]
async fn test_cannot_follow_yourself() {
    let app = setup().await;
    let author = app.create_user("leo").await;

    let response = app.send(get("/profile/leo/follow/", Some(&author))).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(app.follows().count_by_follower(&author.id).await.unwrap(), 0);
}

#[tokio::test]
async fn test_follow_unknown_author_is_not_found() {
    let app = setup().await;
    let reader = app.create_user("mia").await;

    let response = app.send(get("/profile/nobody/follow/", Some(&reader))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_feed_shows_only_followed_authors() {
    let app = setup().await;
    let followed = app.create_user("leo").await;
    let other = app.create_user("ann").await;
    let reader = app.create_user("mia").await;
    app.create_post(&followed, None, "from leo", 0).await;
    app.create_post(&other, None, "from ann", 0).await;

    let empty = body_json(app.send(get("/follow/", Some(&reader))).await).await;
    assert_eq!(empty["template"], "posts/follow.html");
    assert!(listed_texts(&empty).is_empty());

    app.send(get("/profile/leo/follow/", Some(&reader))).await;
    let feed = body_json(app.send(get("/follow/", Some(&reader))).await).await;
    assert_eq!(listed_texts(&feed), ["from leo"]);

    let others = body_json(app.send(get("/follow/", Some(&other))).await).await;
    assert!(listed_texts(&others).is_empty());
}

// === Index cache ===

#[tokio::test]
async fn test_index_is_cached_until_cleared() {
    let app = setup().await;
    let author = app.create_user("leo").await;
    let post = app.create_post(&author, None, "soon gone", 0).await;

    let before = body_json(app.send(get("/", None)).await).await;
    assert_eq!(listed_texts(&before), ["soon gone"]);

    app.posts().delete(&post.id).await.unwrap();

    let cached = body_json(app.send(get("/", None)).await).await;
    assert_eq!(cached, before);

    app.state.page_cache.clear().await;

    let fresh = body_json(app.send(get("/", None)).await).await;
    assert!(listed_texts(&fresh).is_empty());
}

#[tokio::test]
async fn test_new_post_does_not_invalidate_index_cache() {
    let app = setup().await;
    let author = app.create_user("leo").await;

    let before = body_json(app.send(get("/", None)).await).await;
    assert!(listed_texts(&before).is_empty());

    app.send(post_multipart("/create/", Some(&author), &[("text", "new")], None))
        .await;

    let cached = body_json(app.send(get("/", None)).await).await;
    assert!(listed_texts(&cached).is_empty());

    let other_page = body_json(app.send(get("/?page=1", None)).await).await;
    assert_eq!(listed_texts(&other_page), ["new"]);
}
