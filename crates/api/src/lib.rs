//! HTTP client for the DDW backend.
//!
//! [`ApiClient`] wraps the backend REST contract (login, protection
//! submission, video/comment CRUD, verification) using [`reqwest`].
//! The [`VideoService`] trait is the seam the orchestration layer codes
//! against, so tests can substitute an in-memory fake.

pub mod client;
pub mod dto;
pub mod error;
pub mod service;

pub use client::ApiClient;
pub use dto::{EmbedResponse, EmbedUpload, LoginResponse, VerifyResponse, VideoPageResponse};
pub use error::ApiError;
pub use service::VideoService;
