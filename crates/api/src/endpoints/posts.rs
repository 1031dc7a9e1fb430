//! Post pages: index, detail, create, edit and the follow feed.

use axum::{
    Form,
    extract::{FromRequest, Multipart, Path, Query, Request, State},
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use yatube_common::{AppError, AppResult};
use yatube_core::{CommentForm, FormErrors, ImageUpload, PostForm, PostService, Submission};

use crate::{
    extractors::{AuthUser, PageQuery},
    middleware::AppState,
    response::{PageObject, PageView, found},
};

const INDEX_TEMPLATE: &str = "posts/index.html";
const DETAIL_TEMPLATE: &str = "posts/post_detail.html";
const CREATE_TEMPLATE: &str = "posts/create_post.html";
const FOLLOW_TEMPLATE: &str = "posts/follow.html";

/// Home page: every post, newest first.
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<PageView> {
    let page = state.post_service.index(&query.into_request()).await?;

    Ok(PageView::new(
        INDEX_TEMPLATE,
        json!({ "page_obj": PageObject::from(&page) }),
    ))
}

/// A single post with its comments.
pub async fn post_detail(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> AppResult<PageView> {
    let context = detail_context(&state, &post_id, &CommentForm::default(), &FormErrors::new()).await?;
    Ok(PageView::new(DETAIL_TEMPLATE, context))
}

/// Detail page context, with the comment form as submitted.
pub(crate) async fn detail_context(
    state: &AppState,
    post_id: &str,
    form: &CommentForm,
    errors: &FormErrors,
) -> AppResult<Value> {
    let post = state.post_service.detail(post_id).await?;
    let comments = state.comment_service.for_post(&post.id).await?;

    Ok(json!({
        "id": post_id,
        "title": post.title(),
        "post": post,
        "form": { "text": form.text, "errors": errors },
        "comments": comments,
    }))
}

/// Blank post form.
pub async fn post_create_form(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<PageView> {
    form_page(&state, &PostForm::default(), &FormErrors::new(), None).await
}

/// Publish a post and go to the author's profile.
pub async fn post_create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    request: Request,
) -> AppResult<Response> {
    let form = read_post_form(request, &state).await?;
    let text = form.text.clone();
    let group = form.group.clone();

    match state.post_service.create(&user, form).await? {
        Submission::Accepted(_) => Ok(found(&format!("/profile/{}/", user.username))),
        Submission::Rejected(errors) => {
            let submitted = PostForm {
                text,
                group,
                image: None,
            };
            Ok(form_page(&state, &submitted, &errors, None)
                .await?
                .into_response())
        }
    }
}

/// Post form filled with the current values.
///
/// Anyone but the author is sent back to the post.
pub async fn post_edit_form(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> AppResult<Response> {
    let post = state.post_service.get(&post_id).await?;
    if PostService::ensure_author(&user, &post).is_err() {
        return Ok(found(&detail_url(&post.id)));
    }

    let form = PostForm {
        text: post.text.clone(),
        group: post.group_id.clone(),
        image: None,
    };
    Ok(form_page(&state, &form, &FormErrors::new(), Some(&post.id))
        .await?
        .into_response())
}

/// Save an edited post and go back to it.
///
/// Anyone but the author is sent back to the post before the body is read.
pub async fn post_edit(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    request: Request,
) -> AppResult<Response> {
    let post = state.post_service.get(&post_id).await?;
    if PostService::ensure_author(&user, &post).is_err() {
        tracing::debug!(post_id = %post.id, user = %user.username, "Refusing edit by non-author");
        return Ok(found(&detail_url(&post.id)));
    }

    let form = read_post_form(request, &state).await?;
    let text = form.text.clone();
    let group = form.group.clone();

    match state.post_service.edit(&user, post, form).await? {
        Submission::Accepted(post) => Ok(found(&detail_url(&post.id))),
        Submission::Rejected(errors) => {
            let submitted = PostForm {
                text,
                group,
                image: None,
            };
            Ok(form_page(&state, &submitted, &errors, Some(&post_id))
                .await?
                .into_response())
        }
    }
}

/// Posts by every author the user follows.
pub async fn follow_index(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<PageView> {
    let page = state
        .post_service
        .feed(&user.id, &query.into_request())
        .await?;

    Ok(PageView::new(
        FOLLOW_TEMPLATE,
        json!({ "page_obj": PageObject::from(&page) }),
    ))
}

pub(crate) fn detail_url(post_id: &str) -> String {
    format!("/posts/{post_id}/")
}

async fn form_page(
    state: &AppState,
    form: &PostForm,
    errors: &FormErrors,
    editing: Option<&str>,
) -> AppResult<PageView> {
    let groups = state.group_service.list().await?;

    Ok(PageView::new(
        CREATE_TEMPLATE,
        json!({
            "form": {
                "text": form.text,
                "group": form.group_id(),
                "errors": errors,
            },
            "groups": groups,
            "is_edit": editing.is_some(),
            "post_id": editing,
        }),
    ))
}

/// Read a post submission.
///
/// `multipart/form-data` bodies may carry an image. Anything else is read as
/// a url-encoded form with only `text` and `group`.
async fn read_post_form(request: Request, state: &AppState) -> AppResult<PostForm> {
    let is_multipart = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("multipart/form-data"));

    if is_multipart {
        let multipart = Multipart::from_request(request, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        read_multipart(multipart).await
    } else {
        let Form(form) = Form::<PostForm>::from_request(request, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        Ok(form)
    }
}

/// Collect the `text`, `group` and `image` parts of a multipart submission.
///
/// An `image` part without a file name and without content is what browsers
/// send when no file was chosen, so it counts as no upload.
async fn read_multipart(mut multipart: Multipart) -> AppResult<PostForm> {
    let mut form = PostForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "text" => {
                form.text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
            }
            "group" => {
                form.group = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?,
                );
            }
            "image" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?
                    .to_vec();

                if !(file_name.is_empty() && data.is_empty()) {
                    form.image = Some(ImageUpload { file_name, data });
                }
            }
            _ => {}
        }
    }

    Ok(form)
}
