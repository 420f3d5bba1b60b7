//! The protected video entity as returned by the backend.

use serde::{Deserialize, Serialize};

use crate::types::{DbId, Timestamp};

/// Uploader information attached to public/detail video payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoOwner {
    pub username: String,
}

/// A video created server-side by a successful protection submission.
///
/// Immutable once created except for deletion. Field availability varies
/// by endpoint: the master rendition is only present on admin-facing
/// payloads, the thumbnail only when one was submitted, and the owner
/// only on public/detail responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub id: DbId,
    pub title: String,
    #[serde(default)]
    pub original_filename: Option<String>,
    /// Server-relative thumbnail path, e.g. `/thumbnails/42.jpg`.
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    /// The broadly compatible streaming rendition.
    pub playback_filename: String,
    /// The high-fidelity rendition, visible to privileged roles.
    #[serde(default)]
    pub master_filename: Option<String>,
    pub upload_timestamp: Timestamp,
    #[serde(default)]
    pub user: Option<VideoOwner>,
}

impl Video {
    /// Absolute URL of the playback rendition under `base`.
    pub fn playback_url(&self, base: &str) -> String {
        output_url(base, &self.playback_filename)
    }

    /// Absolute URL of the master rendition, when visible.
    pub fn master_url(&self, base: &str) -> String {
        self.master_filename
            .as_deref()
            .map(|name| output_url(base, name))
            .unwrap_or_default()
    }

    /// Absolute URL of the thumbnail, when one exists.
    pub fn thumbnail_url(&self, base: &str) -> Option<String> {
        self.thumbnail_url
            .as_deref()
            .map(|path| format!("{}{path}", base.trim_end_matches('/')))
    }
}

/// Protected renditions are served from the backend's `/outputs` tree.
pub fn output_url(base: &str, filename: &str) -> String {
    format!("{}/outputs/{filename}", base.trim_end_matches('/'))
}
