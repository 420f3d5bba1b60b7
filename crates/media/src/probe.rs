//! `ffprobe` wrapper for duration and native pixel dimensions.

use std::path::Path;

use serde::Deserialize;

/// Error type for local media operations.
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("ffprobe/ffmpeg binary not found: {0}")]
    NotFound(std::io::Error),

    #[error("ffprobe/ffmpeg execution failed (exit code {exit_code:?}): {stderr}")]
    ExecutionFailed {
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("failed to parse ffprobe output: {0}")]
    ParseError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("video file not found: {0}")]
    VideoNotFound(String),
}

/// What the upload flow needs to know about a selected video.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoProbe {
    /// Total duration in seconds; `0.0` when no duration is decodable.
    pub duration_secs: f64,
    /// Native width of the first video stream, when known.
    pub width: Option<i64>,
    /// Native height of the first video stream, when known.
    pub height: Option<i64>,
}

// ---------------------------------------------------------------------------
// ffprobe JSON output structures
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    streams: Vec<FfprobeStream>,
    format: FfprobeFormat,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: Option<String>,
    width: Option<i64>,
    height: Option<i64>,
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Run `ffprobe` on a video file and distil the parts the thumbnail
/// flow cares about.
///
/// A file that ffprobe can open but whose duration cannot be decoded
/// yields `duration_secs == 0.0` rather than an error -- the candidate
/// set is simply empty in that case.
pub async fn probe_video(path: &Path) -> Result<VideoProbe, MediaError> {
    if !path.exists() {
        return Err(MediaError::VideoNotFound(
            path.to_string_lossy().to_string(),
        ));
    }

    let output = tokio::process::Command::new("ffprobe")
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path)
        .output()
        .await
        .map_err(MediaError::NotFound)?;

    if !output.status.success() {
        return Err(MediaError::ExecutionFailed {
            exit_code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed = serde_json::from_str::<FfprobeOutput>(&stdout)
        .map_err(|e| MediaError::ParseError(format!("{e}: {stdout}")))?;

    Ok(distil(&parsed))
}

fn distil(probe: &FfprobeOutput) -> VideoProbe {
    let video_stream = probe
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"));

    VideoProbe {
        duration_secs: parse_duration(probe, video_stream),
        width: video_stream.and_then(|s| s.width),
        height: video_stream.and_then(|s| s.height),
    }
}

/// Format-level duration first, then the video stream's own.
fn parse_duration(probe: &FfprobeOutput, video_stream: Option<&FfprobeStream>) -> f64 {
    if let Some(d) = &probe.format.duration {
        if let Ok(secs) = d.parse::<f64>() {
            return secs;
        }
    }
    if let Some(stream) = video_stream {
        if let Some(d) = &stream.duration {
            if let Ok(secs) = d.parse::<f64>() {
                return secs;
            }
        }
    }
    0.0
}
