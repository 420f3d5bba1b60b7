//! Hover-triggered inline preview playback.
//!
//! A pointer-leave racing a just-issued play request is an expected
//! outcome, not an error: the player reports it as
//! [`PlaybackError::Aborted`] and the preview swallows it. Anything else
//! is logged and still never surfaced to the user.

use async_trait::async_trait;

/// Why inline playback did not start.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PlaybackError {
    /// Playback was aborted by a near-simultaneous pause (e.g. the
    /// pointer left before playback started). Expected; ignored.
    #[error("playback aborted before it started")]
    Aborted,

    /// Any other playback failure. Logged, not shown.
    #[error("playback failed: {0}")]
    Failed(String),
}

/// The playback surface behind one video card.
#[async_trait]
pub trait PreviewPlayer: Send {
    /// Start (or resume) inline playback from the current position.
    async fn play(&mut self) -> Result<(), PlaybackError>;

    /// Pause playback immediately.
    fn pause(&mut self);

    /// Rewind to the start so the next hover replays from the beginning.
    fn seek_to_start(&mut self);
}

/// Hover behavior for one video card.
pub struct CardPreview<P> {
    player: P,
}

impl<P: PreviewPlayer> CardPreview<P> {
    pub fn new(player: P) -> Self {
        Self { player }
    }

    pub fn player(&self) -> &P {
        &self.player
    }

    /// Pointer entered the card: attempt playback. No failure here ever
    /// reaches the user.
    pub async fn pointer_enter(&mut self) {
        match self.player.play().await {
            Ok(()) => {}
            Err(PlaybackError::Aborted) => {
                tracing::trace!("Preview play aborted by pointer-leave");
            }
            Err(e) => {
                tracing::error!(error = %e, "Preview playback failed");
            }
        }
    }

    /// Pointer left the card: pause and rewind.
    pub fn pointer_leave(&mut self) {
        self.player.pause();
        self.player.seek_to_start();
    }
}
