//! Local thumbnail sampling for selected video files.
//!
//! Given a locally selected video, this crate probes its duration and
//! native dimensions with `ffprobe`, then grabs a small fixed number of
//! representative frames with `ffmpeg` -- strictly one seek at a time --
//! and encodes them as JPEG candidates for the upload flow. No network
//! round-trip is involved.

pub mod grabber;
pub mod probe;
pub mod thumbs;

pub use grabber::{FfmpegGrabber, FrameGrabber};
pub use probe::{MediaError, VideoProbe};
pub use thumbs::{capture_candidates, sample_offsets, ThumbnailCandidate, CANDIDATE_COUNT};
