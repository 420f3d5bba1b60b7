//! Shared in-memory [`VideoService`] fake for the orchestration tests.
//!
//! Records every network-issuing call so tests can assert that
//! validation failures and race discards never reached the wire, and
//! lets individual endpoints be delayed (with paused tokio time) to
//! exercise arrival-order races deterministically.
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use ddw_api::{
    ApiError, EmbedResponse, EmbedUpload, LoginResponse, VerifyResponse, VideoPageResponse,
    VideoService,
};
use ddw_core::comment::{Comment, CommentAuthor};
use ddw_core::session::{Identity, Role, SessionContext};
use ddw_core::types::DbId;
use ddw_core::video::Video;

#[derive(Default)]
pub struct FakeService {
    /// Every network call, in issue order, e.g. `"embed"`, `"my_videos p2"`.
    pub calls: Mutex<Vec<String>>,

    pub login_token: Mutex<Option<String>>,

    pub embed_results: Mutex<VecDeque<Result<EmbedResponse, ApiError>>>,
    pub last_embed: Mutex<Option<EmbedUpload>>,
    pub embed_delay: Mutex<Option<Duration>>,

    pub verify_results: Mutex<VecDeque<Result<VerifyResponse, ApiError>>>,
    pub verify_delay: Mutex<Option<Duration>>,

    pub videos: Mutex<HashMap<DbId, Video>>,
    pub public: Mutex<Vec<Video>>,

    pub pages: Mutex<HashMap<u32, VideoPageResponse>>,
    /// Per-page artificial latency, driven by paused tokio time.
    pub page_delays: Mutex<HashMap<u32, Duration>>,

    /// The server-side comment list for the video under test.
    pub comments: Mutex<Vec<Comment>>,
    pub comments_load_failure: Mutex<Option<ApiError>>,
    pub comment_author: Mutex<Option<CommentAuthor>>,
    pub comment_delay: Mutex<Option<Duration>>,
    /// Injected failure for the next comment mutation.
    pub comment_failure: Mutex<Option<ApiError>>,
    pub next_comment_id: AtomicI64,

    pub delete_failure: Mutex<Option<ApiError>>,
}

impl FakeService {
    pub fn new() -> Self {
        Self {
            next_comment_id: AtomicI64::new(100),
            ..Self::default()
        }
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    pub fn call_log(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn push_embed_ok(&self, video_id: DbId, playback: &str, master: &str) {
        self.embed_results
            .lock()
            .unwrap()
            .push_back(Ok(EmbedResponse {
                video_id,
                playback_filename: playback.to_string(),
                master_filename: master.to_string(),
            }));
    }

    pub fn push_embed_err(&self, status: u16, message: &str) {
        self.embed_results
            .lock()
            .unwrap()
            .push_back(Err(api_err(status, message)));
    }

    pub fn push_verify_ok(&self, watermark: &str) {
        self.verify_results
            .lock()
            .unwrap()
            .push_back(Ok(VerifyResponse {
                watermark: watermark.to_string(),
            }));
    }

    pub fn push_verify_err(&self, status: u16, message: &str) {
        self.verify_results
            .lock()
            .unwrap()
            .push_back(Err(api_err(status, message)));
    }

    pub fn set_page(&self, page: u32, response: VideoPageResponse) {
        self.pages.lock().unwrap().insert(page, response);
    }

    pub fn delay_page(&self, page: u32, delay: Duration) {
        self.page_delays.lock().unwrap().insert(page, delay);
    }

    pub fn seed_comments(&self, comments: Vec<Comment>) {
        *self.comments.lock().unwrap() = comments;
    }

    pub fn server_comments(&self) -> Vec<Comment> {
        self.comments.lock().unwrap().clone()
    }
}

#[async_trait]
impl VideoService for FakeService {
    async fn login(&self, username: &str, _password: &str) -> Result<LoginResponse, ApiError> {
        self.record(format!("login {username}"));
        let token = self
            .login_token
            .lock()
            .unwrap()
            .clone()
            .expect("login_token not configured");
        Ok(LoginResponse {
            access_token: token,
        })
    }

    async fn embed(&self, _token: &str, upload: EmbedUpload) -> Result<EmbedResponse, ApiError> {
        self.record("embed");
        *self.last_embed.lock().unwrap() = Some(upload);
        let delay = *self.embed_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.embed_results
            .lock()
            .unwrap()
            .pop_front()
            .expect("no embed result queued")
    }

    async fn video(&self, id: DbId) -> Result<Video, ApiError> {
        self.record(format!("video {id}"));
        self.videos
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| api_err(404, "video not found"))
    }

    async fn public_videos(&self) -> Result<Vec<Video>, ApiError> {
        self.record("public_videos");
        Ok(self.public.lock().unwrap().clone())
    }

    async fn my_videos(
        &self,
        _token: &str,
        page: u32,
        _per_page: u32,
    ) -> Result<VideoPageResponse, ApiError> {
        self.record(format!("my_videos p{page}"));
        let delay = self.page_delays.lock().unwrap().get(&page).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.pages
            .lock()
            .unwrap()
            .get(&page)
            .cloned()
            .ok_or_else(|| api_err(404, "no such page"))
    }

    async fn delete_video(&self, _token: &str, id: DbId) -> Result<(), ApiError> {
        self.record(format!("delete_video {id}"));
        match self.delete_failure.lock().unwrap().take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    async fn verify(&self, _token: &str, id: DbId) -> Result<VerifyResponse, ApiError> {
        self.record(format!("verify {id}"));
        let delay = *self.verify_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.verify_results
            .lock()
            .unwrap()
            .pop_front()
            .expect("no verify result queued")
    }

    async fn comments(&self, video_id: DbId) -> Result<Vec<Comment>, ApiError> {
        self.record(format!("comments {video_id}"));
        if let Some(e) = self.comments_load_failure.lock().unwrap().take() {
            return Err(e);
        }
        Ok(self.comments.lock().unwrap().clone())
    }

    async fn create_comment(
        &self,
        _token: &str,
        video_id: DbId,
        text: &str,
    ) -> Result<Comment, ApiError> {
        self.record(format!("create_comment {video_id}"));
        let delay = *self.comment_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(e) = self.comment_failure.lock().unwrap().take() {
            return Err(e);
        }
        let author = self
            .comment_author
            .lock()
            .unwrap()
            .clone()
            .expect("comment_author not configured");
        let created = Comment {
            id: self.next_comment_id.fetch_add(1, Ordering::SeqCst),
            text: text.to_string(),
            timestamp: Utc::now(),
            user: author,
        };
        self.comments.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update_comment(
        &self,
        _token: &str,
        comment_id: DbId,
        text: &str,
    ) -> Result<Comment, ApiError> {
        self.record(format!("update_comment {comment_id}"));
        let delay = *self.comment_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(e) = self.comment_failure.lock().unwrap().take() {
            return Err(e);
        }
        let mut comments = self.comments.lock().unwrap();
        let Some(entry) = comments.iter_mut().find(|c| c.id == comment_id) else {
            return Err(api_err(404, "comment not found"));
        };
        entry.text = text.to_string();
        Ok(entry.clone())
    }

    async fn delete_comment(&self, _token: &str, comment_id: DbId) -> Result<(), ApiError> {
        self.record(format!("delete_comment {comment_id}"));
        if let Some(e) = self.comment_failure.lock().unwrap().take() {
            return Err(e);
        }
        self.comments.lock().unwrap().retain(|c| c.id != comment_id);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

pub fn api_err(status: u16, message: &str) -> ApiError {
    ApiError::Api {
        status,
        message: message.to_string(),
    }
}

pub fn video(id: DbId, title: &str) -> Video {
    Video {
        id,
        title: title.to_string(),
        original_filename: Some(format!("{title}.mp4")),
        thumbnail_url: None,
        playback_filename: format!("p{id}.mp4"),
        master_filename: Some(format!("m{id}.mkv")),
        upload_timestamp: Utc::now(),
        user: None,
    }
}

pub fn comment(id: DbId, author_id: DbId, username: &str, text: &str) -> Comment {
    Comment {
        id,
        text: text.to_string(),
        timestamp: Utc::now(),
        user: CommentAuthor {
            id: author_id,
            username: username.to_string(),
        },
    }
}

pub fn page(current: u32, total_pages: u32, total_videos: u64, videos: Vec<Video>) -> VideoPageResponse {
    VideoPageResponse {
        videos,
        total_pages,
        current_page: current,
        total_videos,
    }
}

/// Install an identity directly; the token is opaque to the fake.
pub fn sign_in(session: &SessionContext, user_id: DbId, role: Role) {
    session.set(Identity {
        token: format!("token-{user_id}"),
        user_id,
        role,
    });
}
