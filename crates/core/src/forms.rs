//! Submitted forms and their field validation.
//!
//! Field errors are collected per field name so a page can be re-rendered
//! with the submitted values and the messages next to each input.

use std::borrow::Cow;
use std::collections::BTreeMap;

use image::ImageFormat;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

/// Message for a missing or blank required field.
pub const REQUIRED_MESSAGE: &str = "This field is required.";

/// Message for a group that does not exist.
pub const INVALID_CHOICE_MESSAGE: &str =
    "Select a valid choice. That choice is not one of the available choices.";

/// Message for an upload that is not a supported image.
pub const INVALID_IMAGE_MESSAGE: &str = "Upload a valid image. The file you uploaded was either not an image or a corrupted image.";

/// Image formats accepted for post pictures.
const ACCEPTED_FORMATS: [ImageFormat; 4] = [
    ImageFormat::Jpeg,
    ImageFormat::Png,
    ImageFormat::Gif,
    ImageFormat::WebP,
];

/// Outcome of handling a form submission.
#[derive(Debug)]
pub enum Submission<T> {
    /// The form was valid and the record was saved.
    Accepted(T),
    /// The form was invalid; nothing was saved.
    Rejected(FormErrors),
}

/// Field name to error messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    /// Create an empty error set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error against a field.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// Messages recorded against a field.
    #[must_use]
    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map_or(&[], Vec::as_slice)
    }

    /// Whether no errors were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<ValidationErrors> for FormErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut form_errors = Self::new();
        for (field, field_errors) in errors.field_errors() {
            for error in field_errors {
                let message = error
                    .message
                    .as_ref()
                    .map_or_else(|| error.code.to_string(), ToString::to_string);
                form_errors.add(&field, message);
            }
        }
        form_errors
    }
}

fn validate_required(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required").with_message(Cow::Borrowed(REQUIRED_MESSAGE)));
    }
    Ok(())
}

/// An uploaded file.
#[derive(Debug, Clone, Default)]
pub struct ImageUpload {
    /// File name as sent by the client.
    pub file_name: String,
    /// Raw file contents.
    pub data: Vec<u8>,
}

impl ImageUpload {
    /// Detect the image format from the file contents.
    ///
    /// Returns `None` unless the bytes are one of the accepted formats.
    #[must_use]
    pub fn format(&self) -> Option<ImageFormat> {
        image::guess_format(&self.data)
            .ok()
            .filter(|format| ACCEPTED_FORMATS.contains(format))
    }
}

/// Post create/edit form.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct PostForm {
    #[validate(custom(function = "validate_required"))]
    #[serde(default)]
    pub text: String,

    /// Selected group ID; blank means no group.
    #[serde(default)]
    pub group: Option<String>,

    #[serde(skip)]
    pub image: Option<ImageUpload>,
}

impl PostForm {
    /// The selected group, with a blank selection treated as none.
    #[must_use]
    pub fn group_id(&self) -> Option<&str> {
        self.group
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    /// Check the fields that need no database access.
    #[must_use]
    pub fn clean(&self) -> FormErrors {
        let mut errors = self
            .validate()
            .err()
            .map(FormErrors::from)
            .unwrap_or_default();

        if self
            .image
            .as_ref()
            .is_some_and(|upload| upload.format().is_none())
        {
            errors.add("image", INVALID_IMAGE_MESSAGE);
        }

        errors
    }
}

/// Comment form.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct CommentForm {
    #[validate(custom(function = "validate_required"))]
    #[serde(default)]
    pub text: String,
}

impl CommentForm {
    /// Check the form fields.
    #[must_use]
    pub fn clean(&self) -> FormErrors {
        self.validate()
            .err()
            .map(FormErrors::from)
            .unwrap_or_default()
    }
}
