//! Request extractors.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use yatube_db::{PageRequest, entities::user};

use crate::response::found;

/// Where anonymous visitors of members-only pages are sent.
pub const LOGIN_URL: &str = "/auth/login/";

/// Login page URL that returns to `next` afterwards.
#[must_use]
pub fn login_url(next: &str) -> String {
    // Slashes stay readable in the query string.
    let next = urlencoding::encode(next).replace("%2F", "/");
    format!("{LOGIN_URL}?next={next}")
}

/// Rejection for pages that need a signed-in user.
#[derive(Debug, Clone)]
pub struct LoginRedirect {
    next: String,
}

impl IntoResponse for LoginRedirect {
    fn into_response(self) -> Response {
        tracing::debug!(next = %self.next, "Redirecting anonymous request to login");
        found(&login_url(&self.next))
    }
}

/// Authenticated user extractor.
#[derive(Debug, Clone)]
pub struct AuthUser(pub user::Model);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = LoginRedirect;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get user from request extensions (set by auth middleware)
        parts
            .extensions
            .get::<user::Model>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| LoginRedirect {
                next: parts
                    .uri
                    .path_and_query()
                    .map_or_else(|| parts.uri.path().to_string(), ToString::to_string),
            })
    }
}

/// Optional authenticated user extractor.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<user::Model>);

impl<S> FromRequestParts<S> for MaybeAuthUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<user::Model>().cloned()))
    }
}

/// `?page=` query parameter.
///
/// Kept as raw text: anything that is not a page number falls back to a
/// valid page instead of failing the request.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

impl PageQuery {
    /// Page request for a listing.
    #[must_use]
    pub fn into_request(self) -> PageRequest {
        PageRequest::new(self.page)
    }
}
