//! Comment submission.

use axum::{
    Form,
    extract::{Path, State, rejection::FormRejection},
    response::{IntoResponse, Response},
};
use yatube_common::AppResult;
use yatube_core::{CommentForm, Submission};

use super::posts::{detail_context, detail_url};
use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{PageView, found},
};

const DETAIL_TEMPLATE: &str = "posts/post_detail.html";

/// Add a comment and go back to the post.
///
/// An invalid comment re-renders the post with the form errors. A body that
/// is not a url-encoded form counts as an empty comment.
pub async fn add_comment(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    form: Result<Form<CommentForm>, FormRejection>,
) -> AppResult<Response> {
    let post = state.post_service.get(&post_id).await?;
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            tracing::debug!(post_id = %post.id, error = %rejection, "Unreadable comment body");
            CommentForm::default()
        }
    };
    let text = form.text.clone();

    match state.comment_service.add(&post, &user, form).await? {
        Submission::Accepted(_) => Ok(found(&detail_url(&post.id))),
        Submission::Rejected(errors) => {
            let submitted = CommentForm { text };
            let context = detail_context(&state, &post.id, &submitted, &errors).await?;
            Ok(PageView::new(DETAIL_TEMPLATE, context).into_response())
        }
    }
}

/// Nothing was submitted; show the post.
pub async fn comment_redirect(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> AppResult<Response> {
    let post = state.post_service.get(&post_id).await?;
    Ok(found(&detail_url(&post.id)))
}
