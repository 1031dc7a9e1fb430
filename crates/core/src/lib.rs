//! Core business logic for yatube.

pub mod forms;
pub mod services;

pub use forms::{CommentForm, FormErrors, ImageUpload, PostForm, Submission};
pub use services::*;
