//! Wire shapes for the backend REST contract.

use ddw_core::types::DbId;
use ddw_core::video::Video;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
}

/// Everything carried by one multipart protection submission.
#[derive(Debug, Clone)]
pub struct EmbedUpload {
    pub file_name: String,
    pub media_type: String,
    pub video: Vec<u8>,
    /// The selected thumbnail, pre-encoded as a base64 data URL and sent
    /// as a text part, matching what the backend expects.
    pub thumbnail_data_url: Option<String>,
    pub title: String,
}

/// Returned by `POST /api/embed` after the protection service finishes.
#[derive(Debug, Clone, Deserialize)]
pub struct EmbedResponse {
    pub video_id: DbId,
    pub playback_filename: String,
    pub master_filename: String,
}

/// Returned by the verification endpoint; `watermark` is the embedded
/// identifying payload.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyResponse {
    pub watermark: String,
}

/// One page of the owned-videos feed.
#[derive(Debug, Clone, Deserialize)]
pub struct VideoPageResponse {
    pub videos: Vec<Video>,
    pub total_pages: u32,
    pub current_page: u32,
    pub total_videos: u64,
}

#[derive(Debug, Serialize)]
pub struct CommentBody<'a> {
    pub text: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embed_response_deserializes() {
        let resp: EmbedResponse = serde_json::from_str(
            r#"{"video_id":42,"playback_filename":"p42.mp4","master_filename":"m42.mkv"}"#,
        )
        .unwrap();
        assert_eq!(resp.video_id, 42);
        assert_eq!(resp.playback_filename, "p42.mp4");
        assert_eq!(resp.master_filename, "m42.mkv");
    }

    #[test]
    fn page_response_deserializes() {
        let resp: VideoPageResponse = serde_json::from_str(
            r#"{
                "videos": [{
                    "id": 1,
                    "title": "t",
                    "playback_filename": "p1.mp4",
                    "upload_timestamp": "2026-08-01T12:00:00Z"
                }],
                "total_pages": 3,
                "current_page": 2,
                "total_videos": 17
            }"#,
        )
        .unwrap();
        assert_eq!(resp.videos.len(), 1);
        assert_eq!(resp.current_page, 2);
        assert_eq!(resp.total_videos, 17);
    }
}
