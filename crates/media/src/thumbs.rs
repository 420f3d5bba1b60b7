//! Thumbnail candidate sampling.
//!
//! Samples up to [`CANDIDATE_COUNT`] frames at evenly spaced offsets
//! starting at zero, one seek at a time. The resulting candidate list is
//! consumed in full by the upload flow and is never reusable across file
//! selections.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use crate::grabber::FrameGrabber;
use crate::probe::MediaError;

/// Number of frames sampled per file selection.
pub const CANDIDATE_COUNT: usize = 5;

/// A locally sampled still image proposed as the video's thumbnail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailCandidate {
    /// Ordinal position in the sampled sequence (0-based).
    pub index: usize,
    /// Offset the frame was sampled at, in milliseconds.
    pub timestamp_ms: u64,
    /// JPEG-encoded frame.
    pub jpeg: Vec<u8>,
}

impl ThumbnailCandidate {
    /// Encode as the `data:image/jpeg;base64,…` string the backend
    /// accepts as the multipart `thumbnail` field.
    pub fn to_data_url(&self) -> String {
        format!("data:image/jpeg;base64,{}", BASE64.encode(&self.jpeg))
    }
}

/// Evenly spaced sample offsets: `0, D/N, 2D/N, …, (N-1)·D/N`.
///
/// Empty for a non-positive duration -- an undecodable source simply
/// yields no candidates.
pub fn sample_offsets(duration_secs: f64, count: usize) -> Vec<f64> {
    if duration_secs <= 0.0 || count == 0 {
        return Vec::new();
    }
    let interval = duration_secs / count as f64;
    (0..count).map(|i| i as f64 * interval).collect()
}

/// Drive the sequential sampling loop over `grabber`.
///
/// Failures mid-sequence are permissive: the frames captured so far are
/// kept and the failure is logged, never surfaced. Strict sequencing
/// (one in-flight seek at a time) follows from awaiting each grab before
/// issuing the next.
pub async fn capture_candidates<G: FrameGrabber + ?Sized>(
    grabber: &mut G,
) -> Vec<ThumbnailCandidate> {
    let offsets = sample_offsets(grabber.duration_secs(), CANDIDATE_COUNT);
    let mut candidates = Vec::with_capacity(offsets.len());

    for (index, timestamp_secs) in offsets.into_iter().enumerate() {
        match grabber.grab(timestamp_secs).await {
            Ok(jpeg) => candidates.push(ThumbnailCandidate {
                index,
                timestamp_ms: (timestamp_secs * 1000.0).round() as u64,
                jpeg,
            }),
            Err(e) => {
                log_grab_failure(index, timestamp_secs, &e);
                break;
            }
        }
    }

    candidates
}

fn log_grab_failure(index: usize, timestamp_secs: f64, e: &MediaError) {
    tracing::warn!(
        index,
        timestamp_secs,
        error = %e,
        "Thumbnail grab failed; keeping frames captured so far"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct FakeGrabber {
        duration_secs: f64,
        grabbed: Vec<f64>,
        in_flight: bool,
        fail_at: Option<usize>,
    }

    impl FakeGrabber {
        fn new(duration_secs: f64) -> Self {
            Self {
                duration_secs,
                grabbed: Vec::new(),
                in_flight: false,
                fail_at: None,
            }
        }
    }

    #[async_trait]
    impl FrameGrabber for FakeGrabber {
        fn duration_secs(&self) -> f64 {
            self.duration_secs
        }

        async fn grab(&mut self, timestamp_secs: f64) -> Result<Vec<u8>, MediaError> {
            assert!(!self.in_flight, "two seeks outstanding at once");
            self.in_flight = true;
            tokio::task::yield_now().await;
            self.in_flight = false;

            if self.fail_at == Some(self.grabbed.len()) {
                return Err(MediaError::ExecutionFailed {
                    exit_code: Some(1),
                    stderr: "decode error".into(),
                });
            }
            self.grabbed.push(timestamp_secs);
            Ok(vec![0xFF, 0xD8, timestamp_secs as u8])
        }
    }

    #[test]
    fn offsets_are_evenly_spaced_from_zero() {
        assert_eq!(sample_offsets(10.0, 5), vec![0.0, 2.0, 4.0, 6.0, 8.0]);
        // Sub-second clips still sample five offsets, just tightly packed.
        let short = sample_offsets(0.5, 5);
        assert_eq!(short.len(), 5);
        assert_eq!(short[0], 0.0);
        assert!(short.windows(2).all(|w| w[1] > w[0]));
        assert!(short[4] < 0.5);
    }

    #[test]
    fn non_positive_duration_yields_no_offsets() {
        assert!(sample_offsets(0.0, 5).is_empty());
        assert!(sample_offsets(-3.0, 5).is_empty());
    }

    #[tokio::test]
    async fn captures_five_sequential_frames() {
        let mut grabber = FakeGrabber::new(10.0);
        let candidates = capture_candidates(&mut grabber).await;
        assert_eq!(candidates.len(), CANDIDATE_COUNT);
        assert_eq!(grabber.grabbed, vec![0.0, 2.0, 4.0, 6.0, 8.0]);
        assert_eq!(
            candidates.iter().map(|c| c.index).collect::<Vec<_>>(),
            vec![0, 1, 2, 3, 4]
        );
    }

    #[tokio::test]
    async fn zero_duration_grabs_nothing() {
        let mut grabber = FakeGrabber::new(0.0);
        let candidates = capture_candidates(&mut grabber).await;
        assert!(candidates.is_empty());
        assert!(grabber.grabbed.is_empty());
    }

    #[tokio::test]
    async fn failure_mid_sequence_keeps_prior_frames() {
        let mut grabber = FakeGrabber::new(10.0);
        grabber.fail_at = Some(2);
        let candidates = capture_candidates(&mut grabber).await;
        assert_eq!(candidates.len(), 2);
        assert_eq!(grabber.grabbed, vec![0.0, 2.0]);
    }

    #[test]
    fn data_url_encoding() {
        let candidate = ThumbnailCandidate {
            index: 0,
            timestamp_ms: 0,
            jpeg: vec![0xFF, 0xD8, 0xFF],
        };
        assert_eq!(candidate.to_data_url(), "data:image/jpeg;base64,/9j/");
    }
}
