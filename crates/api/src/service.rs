//! The backend contract as a trait.
//!
//! The orchestration layer in `ddw-client` is generic over
//! [`VideoService`] so its state machines can be exercised in tests
//! against an in-memory fake while production wires in [`ApiClient`].

use async_trait::async_trait;
use ddw_core::comment::Comment;
use ddw_core::types::DbId;
use ddw_core::video::Video;

use crate::dto::{EmbedResponse, EmbedUpload, LoginResponse, VerifyResponse, VideoPageResponse};
use crate::error::ApiError;

#[async_trait]
pub trait VideoService: Send + Sync {
    /// `POST /api/login` -- exchange credentials for a bearer token.
    async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError>;

    /// `POST /api/embed` -- submit a video for protection embedding.
    async fn embed(&self, token: &str, upload: EmbedUpload) -> Result<EmbedResponse, ApiError>;

    /// `GET /api/videos/{id}` -- one video's metadata.
    async fn video(&self, id: DbId) -> Result<Video, ApiError>;

    /// `GET /api/videos/public` -- the public discovery feed.
    async fn public_videos(&self) -> Result<Vec<Video>, ApiError>;

    /// `GET /api/my-videos?page&per_page` -- one page of owned videos.
    async fn my_videos(
        &self,
        token: &str,
        page: u32,
        per_page: u32,
    ) -> Result<VideoPageResponse, ApiError>;

    /// `DELETE /api/videos/{id}` -- owner/admin deletion.
    async fn delete_video(&self, token: &str, id: DbId) -> Result<(), ApiError>;

    /// `GET /api/videos/{id}/verify` -- the embedded identifying payload.
    async fn verify(&self, token: &str, id: DbId) -> Result<VerifyResponse, ApiError>;

    /// `GET /api/videos/{id}/comments` -- comments in insertion order.
    async fn comments(&self, video_id: DbId) -> Result<Vec<Comment>, ApiError>;

    /// `POST /api/videos/{id}/comments` -- returns the confirmed comment.
    async fn create_comment(
        &self,
        token: &str,
        video_id: DbId,
        text: &str,
    ) -> Result<Comment, ApiError>;

    /// `PUT /api/comments/{id}` -- returns the confirmed comment.
    async fn update_comment(
        &self,
        token: &str,
        comment_id: DbId,
        text: &str,
    ) -> Result<Comment, ApiError>;

    /// `DELETE /api/comments/{id}`.
    async fn delete_comment(&self, token: &str, comment_id: DbId) -> Result<(), ApiError>;
}
