//! Loading local files into blob fields
//!
//! Blob fields travel as base64 next to a `<field>ContentType` companion
//! field. Failures are reported to the [`Notifier`] under an `error.file.*`
//! key before being returned.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::form::{EntityForm, FormError};
use crate::core::navigation::{ErrorEvent, Notifier};

/// A file read from disk, ready for a blob field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedFile {
    /// Base64 of the file bytes
    pub data: String,
    pub content_type: String,
    pub size: usize,
}

/// Errors that can occur while loading a file into a form
#[derive(Debug, Error)]
pub enum FileLoadError {
    #[error("could not read {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("file was expected to be an image but was found to be '{content_type}'")]
    NotImage { content_type: String },

    #[error(transparent)]
    Form(#[from] FormError),
}

impl FileLoadError {
    /// Short key identifying the failure
    pub fn key(&self) -> &'static str {
        match self {
            FileLoadError::Unreadable { .. } => "could.not.extract",
            FileLoadError::NotImage { .. } => "not.image",
            FileLoadError::Form(_) => "invalid.field",
        }
    }

    /// Alert event for this failure
    pub fn event(&self) -> ErrorEvent {
        ErrorEvent::new(format!("error.file.{}", self.key()), self.to_string())
    }
}

/// Guess a media type from the file extension
pub fn guess_content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "pdf" => "application/pdf",
        "json" => "application/json",
        "xml" => "application/xml",
        "zip" => "application/zip",
        "txt" | "log" => "text/plain",
        "csv" => "text/csv",
        "html" | "htm" => "text/html",
        "md" => "text/markdown",
        _ => "application/octet-stream",
    }
}

/// Read `path` and encode it for a blob field
pub fn load_file(path: &Path, expect_image: bool) -> Result<LoadedFile, FileLoadError> {
    let content_type = guess_content_type(path);
    if expect_image && !content_type.starts_with("image/") {
        return Err(FileLoadError::NotImage {
            content_type: content_type.to_string(),
        });
    }

    let bytes = std::fs::read(path).map_err(|source| FileLoadError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(LoadedFile {
        data: STANDARD.encode(&bytes),
        content_type: content_type.to_string(),
        size: bytes.len(),
    })
}

/// Load `path` into blob `field` of `form` (and its `<field>ContentType` companion)
///
/// On failure the form is left unchanged and the error is also published.
pub fn load_file_into_form<F: EntityForm>(
    form: &mut F,
    field: &str,
    path: &Path,
    expect_image: bool,
    notifier: &mut dyn Notifier,
) -> Result<LoadedFile, FileLoadError> {
    let result = load_file(path, expect_image).and_then(|file| {
        let mut updated = form.clone();
        updated.set(field, &file.data)?;
        updated.set(&format!("{}ContentType", field), &file.content_type)?;
        *form = updated;
        Ok(file)
    });

    if let Err(err) = &result {
        notifier.publish(err.event());
    }
    result
}
