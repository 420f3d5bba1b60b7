//! Per-video comment store with confirm-then-apply reconciliation.
//!
//! The local collection is the displayed truth, but every mutation is
//! server-confirmed before it lands: creation appends the confirmed
//! comment (never an optimistic copy), update replaces in place, delete
//! removes -- and on failure the collection is left untouched. Ownership
//! gating (author or admin) happens before any network call.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use ddw_api::VideoService;
use ddw_core::comment::Comment;
use ddw_core::error::{ClientError, ClientResult};
use ddw_core::session::{Identity, SessionContext};
use ddw_core::types::DbId;
use ddw_core::upload::validate_comment_text;

#[derive(Debug, Default)]
struct CommentState {
    comments: Vec<Comment>,
    /// At most one comment is in edit mode at a time.
    editing: Option<DbId>,
    /// A create is in flight; further creates are locally rejected.
    posting: bool,
    /// Update/delete in flight, keyed by comment id.
    in_flight: HashSet<DbId>,
}

/// All operations are scoped to one video id.
pub struct CommentStore<S> {
    service: Arc<S>,
    session: SessionContext,
    video_id: DbId,
    state: Arc<Mutex<CommentState>>,
}

impl<S> Clone for CommentStore<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            session: self.session.clone(),
            video_id: self.video_id,
            state: Arc::clone(&self.state),
        }
    }
}

impl<S: VideoService> CommentStore<S> {
    pub fn new(service: Arc<S>, session: SessionContext, video_id: DbId) -> Self {
        Self {
            service,
            session,
            video_id,
            state: Arc::new(Mutex::new(CommentState::default())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, CommentState> {
        self.state.lock().expect("comment state lock poisoned")
    }

    pub fn video_id(&self) -> DbId {
        self.video_id
    }

    /// Replace the collection with the server's ordering.
    pub async fn load(&self) -> ClientResult<usize> {
        let comments = self.service.comments(self.video_id).await?;
        let count = comments.len();
        let mut st = self.lock();
        st.comments = comments;
        st.editing = None;
        Ok(count)
    }

    /// Snapshot of the displayed collection, in insertion order.
    pub fn comments(&self) -> Vec<Comment> {
        self.lock().comments.clone()
    }

    pub fn editing(&self) -> Option<DbId> {
        self.lock().editing
    }

    /// Create a comment; appended locally only after the server confirms.
    pub async fn create(&self, text: &str) -> ClientResult<Comment> {
        let trimmed = validate_comment_text(text)?.to_string();
        let identity = self.session.require()?;

        {
            let mut st = self.lock();
            if st.posting {
                return Err(ClientError::validation(
                    "a comment is already being posted",
                ));
            }
            st.posting = true;
        }

        let result = self
            .service
            .create_comment(&identity.token, self.video_id, &trimmed)
            .await;

        let mut st = self.lock();
        st.posting = false;
        match result {
            Ok(comment) => {
                tracing::debug!(comment_id = comment.id, video_id = self.video_id, "Comment created");
                st.comments.push(comment.clone());
                Ok(comment)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Enter edit mode for one comment, implicitly cancelling any prior
    /// edit without persisting it. Ownership-gated.
    pub fn begin_edit(&self, comment_id: DbId) -> ClientResult<()> {
        let identity = self.session.require()?;
        let mut st = self.lock();
        Self::authorize(&st, comment_id, &identity)?;
        st.editing = Some(comment_id);
        Ok(())
    }

    pub fn cancel_edit(&self) {
        self.lock().editing = None;
    }

    /// Persist an edit. On success the confirmed comment replaces the
    /// entry in place (same position) and edit mode ends; on failure the
    /// prior text stays visible and edit mode remains active.
    pub async fn update(&self, comment_id: DbId, text: &str) -> ClientResult<Comment> {
        let trimmed = validate_comment_text(text)?.to_string();
        let identity = self.session.require()?;

        {
            let mut st = self.lock();
            Self::authorize(&st, comment_id, &identity)?;
            if !st.in_flight.insert(comment_id) {
                return Err(ClientError::validation(
                    "this comment already has a change in flight",
                ));
            }
        }

        let result = self
            .service
            .update_comment(&identity.token, comment_id, &trimmed)
            .await;

        let mut st = self.lock();
        st.in_flight.remove(&comment_id);
        match result {
            Ok(updated) => {
                if let Some(entry) = st.comments.iter_mut().find(|c| c.id == comment_id) {
                    *entry = updated.clone();
                }
                if st.editing == Some(comment_id) {
                    st.editing = None;
                }
                Ok(updated)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Delete a comment. The confirmation gate runs after the ownership
    /// check and before any network call; answering no issues nothing.
    pub async fn remove(
        &self,
        comment_id: DbId,
        confirm: impl FnOnce() -> bool,
    ) -> ClientResult<bool> {
        let identity = self.session.require()?;

        {
            let st = self.lock();
            Self::authorize(&st, comment_id, &identity)?;
        }

        if !confirm() {
            return Ok(false);
        }

        {
            let mut st = self.lock();
            if !st.in_flight.insert(comment_id) {
                return Err(ClientError::validation(
                    "this comment already has a change in flight",
                ));
            }
        }

        let result = self.service.delete_comment(&identity.token, comment_id).await;

        let mut st = self.lock();
        st.in_flight.remove(&comment_id);
        match result {
            Ok(()) => {
                st.comments.retain(|c| c.id != comment_id);
                if st.editing == Some(comment_id) {
                    st.editing = None;
                }
                Ok(true)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// The ownership gate: the actor must be the author or an admin,
    /// and the comment must still exist locally.
    fn authorize(
        st: &CommentState,
        comment_id: DbId,
        identity: &Identity,
    ) -> ClientResult<()> {
        let Some(comment) = st.comments.iter().find(|c| c.id == comment_id) else {
            return Err(ClientError::validation("comment not found"));
        };
        if comment.can_be_modified_by(identity) {
            Ok(())
        } else {
            Err(ClientError::validation(
                "only the author or an admin can modify a comment",
            ))
        }
    }
}
