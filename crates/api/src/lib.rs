//! HTTP layer for yatube.
//!
//! - **Endpoints**: one handler per page, producing page views for the renderer
//! - **Extractors**: authenticated user, optional user, page number
//! - **Middleware**: bearer-token authentication
//! - **Page cache**: short-lived cache of the index listing
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod page_cache;
pub mod response;

pub use endpoints::{app, router};
pub use middleware::AppState;
pub use page_cache::PageCache;
