//! Sequential frame grabbing.
//!
//! [`FrameGrabber`] is the seam between the sampling loop and the actual
//! decoder. The `&mut self` receiver is load-bearing: two outstanding
//! seeks on the same media source are not well-ordered, so the type
//! system simply forbids them.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::probe::{probe_video, MediaError, VideoProbe};

#[async_trait]
pub trait FrameGrabber: Send {
    /// Total duration of the source in seconds; `0.0` when undecodable.
    fn duration_secs(&self) -> f64;

    /// Seek to `timestamp_secs`, wait for the seek to resolve, and
    /// return the frame at that position encoded as JPEG.
    async fn grab(&mut self, timestamp_secs: f64) -> Result<Vec<u8>, MediaError>;
}

/// Production grabber that shells out to `ffmpeg` per frame.
///
/// Frames are rendered at the source's native pixel dimensions into a
/// scratch directory that lives as long as the grabber, then read back
/// as bytes.
pub struct FfmpegGrabber {
    video_path: PathBuf,
    probe: VideoProbe,
    scratch: tempfile::TempDir,
    frame_index: u32,
}

impl FfmpegGrabber {
    /// Probe a local video file and prepare a grabber for it.
    pub async fn open(video_path: &Path) -> Result<Self, MediaError> {
        let probe = probe_video(video_path).await?;
        let scratch = tempfile::tempdir()?;
        Ok(Self {
            video_path: video_path.to_path_buf(),
            probe,
            scratch,
            frame_index: 0,
        })
    }

    pub fn probe(&self) -> VideoProbe {
        self.probe
    }
}

#[async_trait]
impl FrameGrabber for FfmpegGrabber {
    fn duration_secs(&self) -> f64 {
        self.probe.duration_secs
    }

    async fn grab(&mut self, timestamp_secs: f64) -> Result<Vec<u8>, MediaError> {
        let out_path = self
            .scratch
            .path()
            .join(format!("frame_{:06}.jpg", self.frame_index));
        self.frame_index += 1;

        let output = tokio::process::Command::new("ffmpeg")
            .args(["-y", "-ss", &format!("{timestamp_secs:.3}"), "-i"])
            .arg(&self.video_path)
            .args(["-vframes", "1", "-q:v", "2"])
            .arg(&out_path)
            .output()
            .await
            .map_err(MediaError::NotFound)?;

        if !output.status.success() {
            return Err(MediaError::ExecutionFailed {
                exit_code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            });
        }

        tracing::trace!(
            timestamp_secs,
            path = %out_path.display(),
            "Grabbed thumbnail frame"
        );

        Ok(tokio::fs::read(&out_path).await?)
    }
}
