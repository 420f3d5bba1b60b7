//! File selection and pre-submission validation.
//!
//! Validation here is a UX optimisation, not a security boundary: the
//! backend re-validates everything. The rules are pure functions so the
//! never-hits-the-network guarantee can be tested in isolation.

use std::path::Path;

use crate::error::{ClientError, ClientResult};

/// A locally selected media file, held in memory for the lifetime of
/// one upload session and released on reselection or reset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub file_name: String,
    /// MIME type, e.g. `video/mp4`. Only `video/*` is accepted.
    pub media_type: String,
    pub data: Vec<u8>,
}

impl SelectedFile {
    pub fn new(file_name: impl Into<String>, media_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            media_type: media_type.into(),
            data,
        }
    }

    /// Load a file from disk, guessing the MIME type from the extension.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let media_type = guess_media_type(&file_name);
        let data = std::fs::read(path)?;
        Ok(Self::new(file_name, media_type, data))
    }

    pub fn is_video(&self) -> bool {
        self.media_type.starts_with("video/")
    }
}

/// Map a filename extension to a MIME type. Unknown extensions come out
/// as `application/octet-stream` and are rejected at selection time.
pub fn guess_media_type(file_name: &str) -> String {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "mp4" | "m4v" => "video/mp4",
        "mov" => "video/quicktime",
        "avi" => "video/x-msvideo",
        "mkv" => "video/x-matroska",
        "webm" => "video/webm",
        _ => "application/octet-stream",
    }
    .to_string()
}

/// Accept or reject a file selection. Rejection carries the inline
/// message shown next to the picker.
pub fn validate_selection(file: &SelectedFile) -> ClientResult<()> {
    if file.is_video() {
        Ok(())
    } else {
        Err(ClientError::validation(
            "only video files can be uploaded (e.g. .mp4, .mov)",
        ))
    }
}

/// The submit-eligibility rule: file present, title non-empty after
/// trimming, and (candidate set empty OR exactly one candidate selected).
pub fn validate_submission(
    has_file: bool,
    title: &str,
    candidate_count: usize,
    selected_candidate: Option<usize>,
) -> ClientResult<()> {
    if !has_file {
        return Err(ClientError::validation("select a video file first"));
    }
    if title.trim().is_empty() {
        return Err(ClientError::validation("enter a title for the video"));
    }
    if candidate_count > 0 && selected_candidate.is_none() {
        return Err(ClientError::validation("select a thumbnail"));
    }
    if let Some(index) = selected_candidate {
        if index >= candidate_count {
            return Err(ClientError::validation("selected thumbnail no longer exists"));
        }
    }
    Ok(())
}

/// Trim a comment body, rejecting empty input.
pub fn validate_comment_text(text: &str) -> ClientResult<&str> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        Err(ClientError::validation("comment text must not be empty"))
    } else {
        Ok(trimmed)
    }
}
