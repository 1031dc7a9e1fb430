//! Page views and redirects.
//!
//! Handlers do not render HTML. They answer with the template to render and
//! the context to render it with; the renderer in front of this service
//! turns that into a page.

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use yatube_db::Page;

/// A template name plus the context to render it with.
#[derive(Debug, Clone)]
pub struct PageView {
    pub template: &'static str,
    pub context: Value,
    pub status: StatusCode,
}

impl PageView {
    /// A page rendered with status 200.
    #[must_use]
    pub const fn new(template: &'static str, context: Value) -> Self {
        Self {
            template,
            context,
            status: StatusCode::OK,
        }
    }
}

impl IntoResponse for PageView {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "template": self.template,
            "context": self.context,
        }));
        (self.status, body).into_response()
    }
}

/// `302 Found` pointing at `location`.
#[must_use]
pub fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

/// A listing page as exposed to templates.
#[derive(Debug, Serialize)]
pub struct PageObject<'a, T> {
    pub object_list: &'a [T],
    pub number: u64,
    pub num_pages: u64,
    pub count: u64,
    pub per_page: u64,
    pub has_next: bool,
    pub has_previous: bool,
    pub has_other_pages: bool,
    pub next_page_number: Option<u64>,
    pub previous_page_number: Option<u64>,
    pub start_index: u64,
    pub end_index: u64,
}

impl<'a, T> From<&'a Page<T>> for PageObject<'a, T> {
    fn from(page: &'a Page<T>) -> Self {
        Self {
            object_list: &page.object_list,
            number: page.number,
            num_pages: page.num_pages,
            count: page.count,
            per_page: page.per_page,
            has_next: page.has_next(),
            has_previous: page.has_previous(),
            has_other_pages: page.has_next() || page.has_previous(),
            next_page_number: page.next_page_number(),
            previous_page_number: page.previous_page_number(),
            start_index: page.start_index(),
            end_index: page.end_index(),
        }
    }
}
