//! Client-side interaction orchestration for the DDW platform.
//!
//! The components here coordinate asynchronous, cancelable, partially
//! ordered operations against transient client state and keep that state
//! consistent despite network races, stale responses, and concurrent user
//! actions:
//!
//! - [`auth::AuthFlow`] -- login/logout against the process-wide
//!   [`ddw_core::SessionContext`].
//! - [`upload::UploadOrchestrator`] -- the submission state machine:
//!   file selection, thumbnail capture, protection embedding,
//!   verification.
//! - [`comments::CommentStore`] -- per-video comment CRUD with
//!   confirm-then-apply reconciliation and ownership gating.
//! - [`feed::MyVideosFeed`] -- the paginated owned-videos window with a
//!   latest-request-wins race guard.
//! - [`detail`] -- concurrent video + comment loading for the detail view.
//! - [`preview::CardPreview`] -- hover preview playback with safe
//!   cancellation.
//!
//! Every handle is `Clone` and internally synchronised; locks are never
//! held across an await, and each await's continuation re-validates its
//! guard (selection generation, latest requested page) before touching
//! state.

pub mod auth;
pub mod comments;
pub mod detail;
pub mod feed;
pub mod preview;
pub mod upload;

pub use auth::AuthFlow;
pub use comments::CommentStore;
pub use feed::{fetch_public_videos, MyVideosFeed, PageFetch, PageWindow, DEFAULT_PAGE_SIZE};
pub use preview::{CardPreview, PlaybackError, PreviewPlayer};
pub use upload::{
    UploadOrchestrator, UploadOutcome, UploadPhase, UploadSnapshot, VerificationOutcome,
};
