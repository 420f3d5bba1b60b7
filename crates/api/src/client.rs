//! Production [`VideoService`] implementation over `reqwest`.

use async_trait::async_trait;
use ddw_core::comment::Comment;
use ddw_core::types::DbId;
use ddw_core::video::Video;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;

use crate::dto::{
    CommentBody, EmbedResponse, EmbedUpload, LoginRequest, LoginResponse, VerifyResponse,
    VideoPageResponse,
};
use crate::error::{extract_error_message, ApiError};
use crate::service::VideoService;

/// HTTP client for a single DDW backend instance.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for a backend base URL, e.g. `http://localhost:5000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: normalize(base_url.into()),
        }
    }

    /// Reuse an existing [`reqwest::Client`] for connection pooling.
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: normalize(base_url.into()),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Parse a response body on success, or extract the structured
    /// error message on a non-2xx status.
    async fn parse<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        if status.is_success() {
            Ok(response.json().await?)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::Api {
                status: status.as_u16(),
                message: extract_error_message(&body),
            })
        }
    }

    /// Like [`parse`](Self::parse) but for endpoints whose success body
    /// is irrelevant.
    async fn check_status(response: reqwest::Response) -> Result<(), ApiError> {
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::Api {
                status: status.as_u16(),
                message: extract_error_message(&body),
            })
        }
    }
}

fn normalize(base_url: String) -> String {
    base_url.trim_end_matches('/').to_string()
}

#[async_trait]
impl VideoService for ApiClient {
    async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let response = self
            .client
            .post(self.url("/api/login"))
            .json(&LoginRequest { username, password })
            .send()
            .await?;
        Self::parse(response).await
    }

    async fn embed(&self, token: &str, upload: EmbedUpload) -> Result<EmbedResponse, ApiError> {
        tracing::info!(
            file_name = %upload.file_name,
            bytes = upload.video.len(),
            has_thumbnail = upload.thumbnail_data_url.is_some(),
            "Submitting video for protection embedding"
        );

        let video_part = Part::bytes(upload.video)
            .file_name(upload.file_name)
            .mime_str(&upload.media_type)?;
        let mut form = Form::new().part("video", video_part);
        if let Some(data_url) = upload.thumbnail_data_url {
            form = form.text("thumbnail", data_url);
        }
        form = form.text("title", upload.title);

        let response = self
            .client
            .post(self.url("/api/embed"))
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await?;
        Self::parse(response).await
    }

    async fn video(&self, id: DbId) -> Result<Video, ApiError> {
        let response = self
            .client
            .get(self.url(&format!("/api/videos/{id}")))
            .send()
            .await?;
        Self::parse(response).await
    }

    async fn public_videos(&self) -> Result<Vec<Video>, ApiError> {
        let response = self
            .client
            .get(self.url("/api/videos/public"))
            .send()
            .await?;
        Self::parse(response).await
    }

    async fn my_videos(
        &self,
        token: &str,
        page: u32,
        per_page: u32,
    ) -> Result<VideoPageResponse, ApiError> {
        let response = self
            .client
            .get(self.url("/api/my-videos"))
            .query(&[("page", page), ("per_page", per_page)])
            .bearer_auth(token)
            .send()
            .await?;
        Self::parse(response).await
    }

    async fn delete_video(&self, token: &str, id: DbId) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(self.url(&format!("/api/videos/{id}")))
            .bearer_auth(token)
            .send()
            .await?;
        Self::check_status(response).await
    }

    async fn verify(&self, token: &str, id: DbId) -> Result<VerifyResponse, ApiError> {
        let response = self
            .client
            .get(self.url(&format!("/api/videos/{id}/verify")))
            .bearer_auth(token)
            .send()
            .await?;
        Self::parse(response).await
    }

    async fn comments(&self, video_id: DbId) -> Result<Vec<Comment>, ApiError> {
        let response = self
            .client
            .get(self.url(&format!("/api/videos/{video_id}/comments")))
            .send()
            .await?;
        Self::parse(response).await
    }

    async fn create_comment(
        &self,
        token: &str,
        video_id: DbId,
        text: &str,
    ) -> Result<Comment, ApiError> {
        let response = self
            .client
            .post(self.url(&format!("/api/videos/{video_id}/comments")))
            .bearer_auth(token)
            .json(&CommentBody { text })
            .send()
            .await?;
        Self::parse(response).await
    }

    async fn update_comment(
        &self,
        token: &str,
        comment_id: DbId,
        text: &str,
    ) -> Result<Comment, ApiError> {
        let response = self
            .client
            .put(self.url(&format!("/api/comments/{comment_id}")))
            .bearer_auth(token)
            .json(&CommentBody { text })
            .send()
            .await?;
        Self::parse(response).await
    }

    async fn delete_comment(&self, token: &str, comment_id: DbId) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(self.url(&format!("/api/comments/{comment_id}")))
            .bearer_auth(token)
            .send()
            .await?;
        Self::check_status(response).await
    }
}
