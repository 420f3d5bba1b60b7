//! Domain types and client-side rules for the DDW watermarking platform.
//!
//! This crate is presentation- and transport-agnostic: it defines the
//! entities exchanged with the backend (videos, comments, identities),
//! the client error taxonomy, the pre-submission validation rules, and
//! the process-wide session store. Everything network-facing lives in
//! `ddw-api`; everything stateful in `ddw-client`.

pub mod comment;
pub mod error;
pub mod session;
pub mod types;
pub mod upload;
pub mod video;

pub use comment::{Comment, CommentAuthor};
pub use error::{ClientError, ClientResult};
pub use session::{Identity, Role, SessionContext};
pub use types::{DbId, Timestamp};
pub use upload::SelectedFile;
pub use video::{Video, VideoOwner};
