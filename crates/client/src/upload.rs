//! The upload orchestration state machine.
//!
//! Drives one protection submission end to end: file selection,
//! thumbnail capture, multipart submission, result presentation, and
//! optional verification. The orchestrator is a clonable handle over
//! shared state; a **selection generation** counter invalidates any
//! in-flight work from a previous file selection -- its eventual
//! completion is dropped, never applied.

use std::sync::{Arc, Mutex, MutexGuard};

use ddw_api::{EmbedUpload, VideoService};
use ddw_core::error::{ClientError, ClientResult};
use ddw_core::session::SessionContext;
use ddw_core::types::DbId;
use ddw_core::upload::{validate_selection, validate_submission, SelectedFile};
use ddw_media::{capture_candidates, FrameGrabber, ThumbnailCandidate};

/// Outer state of one upload session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadPhase {
    #[default]
    Idle,
    FileSelected,
    ThumbnailsReady,
    Submitting,
    Succeeded,
    Failed,
}

/// What a successful submission returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOutcome {
    pub video_id: DbId,
    pub playback_filename: String,
    pub master_filename: String,
}

/// Result of the most recent verification request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationOutcome {
    /// The embedded identifying payload.
    Verified(String),
    /// The rejection reason (or communication-failure message).
    Rejected(String),
}

/// Read-only view of the orchestrator for presentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSnapshot {
    pub phase: UploadPhase,
    pub file_name: Option<String>,
    pub candidate_count: usize,
    pub selected_candidate: Option<usize>,
    pub error_message: Option<String>,
    pub outcome: Option<UploadOutcome>,
    pub verification: Option<VerificationOutcome>,
}

#[derive(Debug, Default)]
struct UploadState {
    phase: UploadPhase,
    /// Bumped by `select_file` and `reset`; in-flight work re-checks it
    /// before applying.
    generation: u64,
    file: Option<SelectedFile>,
    candidates: Vec<ThumbnailCandidate>,
    selected_candidate: Option<usize>,
    error_message: Option<String>,
    outcome: Option<UploadOutcome>,
    verification: Option<VerificationOutcome>,
    verifying: bool,
}

pub struct UploadOrchestrator<S> {
    service: Arc<S>,
    session: SessionContext,
    state: Arc<Mutex<UploadState>>,
}

impl<S> Clone for UploadOrchestrator<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            session: self.session.clone(),
            state: Arc::clone(&self.state),
        }
    }
}

impl<S: VideoService> UploadOrchestrator<S> {
    pub fn new(service: Arc<S>, session: SessionContext) -> Self {
        Self {
            service,
            session,
            state: Arc::new(Mutex::new(UploadState::default())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, UploadState> {
        self.state.lock().expect("upload state lock poisoned")
    }

    /// Accept a newly picked file, discarding all state from the
    /// previous selection. Non-video media types are rejected with a
    /// validation error and the orchestrator stays in `Idle`.
    pub fn select_file(&self, file: SelectedFile) -> ClientResult<()> {
        let mut st = self.lock();
        st.generation += 1;

        if let Err(e) = validate_selection(&file) {
            st.phase = UploadPhase::Idle;
            st.file = None;
            st.candidates.clear();
            st.selected_candidate = None;
            st.outcome = None;
            st.verification = None;
            st.error_message = Some(e.user_message());
            return Err(e);
        }

        tracing::debug!(file_name = %file.file_name, "File selected");
        st.phase = UploadPhase::FileSelected;
        st.file = Some(file);
        st.candidates.clear();
        st.selected_candidate = None;
        st.outcome = None;
        st.verification = None;
        st.error_message = None;
        Ok(())
    }

    /// Sample thumbnail candidates for the current selection.
    ///
    /// Strictly sequential (the grabber's `&mut` receiver forbids
    /// overlapping seeks). Only runs between file selection and
    /// submission: once a submit has started or settled, a capture is
    /// discarded so it cannot rewind the phase or disturb a stored
    /// outcome. If the file selection changes while the capture is in
    /// flight, the completed set is silently dropped. The first
    /// candidate is auto-selected; an empty set (undecodable duration)
    /// still moves to `ThumbnailsReady` and submission simply proceeds
    /// without a thumbnail.
    pub async fn capture_thumbnails<G: FrameGrabber + ?Sized>(&self, grabber: &mut G) -> usize {
        let generation = {
            let st = self.lock();
            if st.file.is_none() {
                return 0;
            }
            if !matches!(
                st.phase,
                UploadPhase::FileSelected | UploadPhase::ThumbnailsReady
            ) {
                tracing::debug!(phase = ?st.phase, "Discarding thumbnail capture outside the selection phase");
                return 0;
            }
            st.generation
        };

        let candidates = capture_candidates(grabber).await;

        let mut st = self.lock();
        if st.generation != generation {
            tracing::debug!("Discarding thumbnail capture for a stale file selection");
            return 0;
        }
        if !matches!(
            st.phase,
            UploadPhase::FileSelected | UploadPhase::ThumbnailsReady
        ) {
            tracing::debug!(phase = ?st.phase, "Discarding thumbnail capture that outlived the selection phase");
            return 0;
        }

        let count = candidates.len();
        st.selected_candidate = if count > 0 { Some(0) } else { None };
        st.candidates = candidates;
        st.phase = UploadPhase::ThumbnailsReady;
        count
    }

    /// Select one of the captured candidates.
    pub fn select_candidate(&self, index: usize) -> ClientResult<()> {
        let mut st = self.lock();
        if index >= st.candidates.len() {
            return Err(ClientError::validation("no such thumbnail candidate"));
        }
        st.selected_candidate = Some(index);
        Ok(())
    }

    /// Submit the current selection for protection embedding.
    ///
    /// Validation failures and a missing identity never issue a network
    /// call. Success lands in `Succeeded` with the created video id and
    /// both rendition names; failure lands in `Failed` with the server's
    /// message and the same selection intact, so a retry is one more
    /// explicit `submit` call.
    pub async fn submit(&self, title: &str) -> ClientResult<UploadOutcome> {
        let (token, upload, generation) = {
            let mut st = self.lock();

            if st.phase == UploadPhase::Submitting {
                return Err(ClientError::validation("an upload is already in progress"));
            }

            if let Err(e) = validate_submission(
                st.file.is_some(),
                title,
                st.candidates.len(),
                st.selected_candidate,
            ) {
                st.error_message = Some(e.user_message());
                return Err(e);
            }

            let identity = match self.session.require() {
                Ok(identity) => identity,
                Err(e) => {
                    st.error_message = Some(e.user_message());
                    return Err(e);
                }
            };

            let Some(file) = st.file.as_ref() else {
                return Err(ClientError::validation("select a video file first"));
            };
            let thumbnail_data_url = st
                .selected_candidate
                .and_then(|i| st.candidates.get(i))
                .map(ThumbnailCandidate::to_data_url);

            let upload = EmbedUpload {
                file_name: file.file_name.clone(),
                media_type: file.media_type.clone(),
                video: file.data.clone(),
                thumbnail_data_url,
                title: title.trim().to_string(),
            };

            st.phase = UploadPhase::Submitting;
            st.error_message = None;
            st.outcome = None;
            st.verification = None;

            (identity.token, upload, st.generation)
        };

        let result = self.service.embed(&token, upload).await;

        let mut st = self.lock();
        if st.generation != generation {
            tracing::debug!("Discarding submission result for a stale selection");
            return Err(ClientError::validation("the upload was superseded"));
        }

        match result {
            Ok(response) => {
                let outcome = UploadOutcome {
                    video_id: response.video_id,
                    playback_filename: response.playback_filename,
                    master_filename: response.master_filename,
                };
                tracing::info!(video_id = outcome.video_id, "Protection embedding succeeded");
                st.phase = UploadPhase::Succeeded;
                st.outcome = Some(outcome.clone());
                Ok(outcome)
            }
            Err(e) => {
                let err = ClientError::from(e);
                tracing::warn!(error = %err, "Protection embedding failed");
                st.phase = UploadPhase::Failed;
                st.error_message = Some(err.user_message());
                Err(err)
            }
        }
    }

    /// Request the embedded identifying payload for the created video.
    ///
    /// Only meaningful from `Succeeded`. Without an identity the request
    /// is not attempted. Repeatable: each completion only replaces the
    /// verification payload, never the outer phase or stored renditions.
    pub async fn verify(&self) -> ClientResult<VerificationOutcome> {
        let (video_id, generation) = {
            let mut st = self.lock();
            if st.phase != UploadPhase::Succeeded {
                return Err(ClientError::validation("no processed video to verify"));
            }
            if st.verifying {
                return Err(ClientError::validation("verification is already running"));
            }
            let Some(outcome) = st.outcome.as_ref() else {
                return Err(ClientError::validation("no processed video to verify"));
            };
            let video_id = outcome.video_id;
            st.verifying = true;
            (video_id, st.generation)
        };

        let identity = match self.session.require() {
            Ok(identity) => identity,
            Err(e) => {
                self.lock().verifying = false;
                return Err(e);
            }
        };

        let result = self.service.verify(&identity.token, video_id).await;

        let mut st = self.lock();
        st.verifying = false;
        if st.generation != generation {
            tracing::debug!("Discarding verification result for a stale session");
            return Err(ClientError::validation("the upload was superseded"));
        }

        let outcome = match result {
            Ok(response) => VerificationOutcome::Verified(response.watermark),
            Err(e) => VerificationOutcome::Rejected(ClientError::from(e).user_message()),
        };
        st.verification = Some(outcome.clone());
        Ok(outcome)
    }

    /// Back to `Idle` from any state, releasing the held file bytes,
    /// candidates, results, and verification data.
    pub fn reset(&self) {
        let mut st = self.lock();
        let generation = st.generation + 1;
        *st = UploadState {
            generation,
            ..UploadState::default()
        };
    }

    pub fn phase(&self) -> UploadPhase {
        self.lock().phase
    }

    pub fn snapshot(&self) -> UploadSnapshot {
        let st = self.lock();
        UploadSnapshot {
            phase: st.phase,
            file_name: st.file.as_ref().map(|f| f.file_name.clone()),
            candidate_count: st.candidates.len(),
            selected_candidate: st.selected_candidate,
            error_message: st.error_message.clone(),
            outcome: st.outcome.clone(),
            verification: st.verification.clone(),
        }
    }
}
