//! Paginated owned-videos feed and the public discovery feed.
//!
//! Page navigation is racy by nature: the user can click "next" again
//! before the previous fetch resolves. The window must always show the
//! most recently *requested* page, not the most recently *arrived*
//! response, so every fetch records its page number and its continuation
//! applies the response only if that page is still the latest request.

use std::sync::{Arc, Mutex, MutexGuard};

use ddw_api::VideoService;
use ddw_core::error::{ClientError, ClientResult};
use ddw_core::session::SessionContext;
use ddw_core::types::DbId;
use ddw_core::video::Video;

/// Page size used by the owned-videos view.
pub const DEFAULT_PAGE_SIZE: u32 = 8;

/// The displayed pagination window, recomputed wholesale per fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct PageWindow {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_videos: u64,
    pub items: Vec<Video>,
}

impl Default for PageWindow {
    fn default() -> Self {
        Self {
            current_page: 1,
            total_pages: 1,
            total_videos: 0,
            items: Vec::new(),
        }
    }
}

/// How a `go_to` call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageFetch {
    /// The response was applied to the window.
    Applied,
    /// A newer page request superseded this one; the response was dropped.
    Discarded,
    /// The requested page is outside `[1, total_pages]`; nothing was issued.
    OutOfRange,
}

#[derive(Debug, Default)]
struct FeedState {
    window: PageWindow,
    /// Page number of the most recent request; the race-guard key.
    latest_requested: Option<u32>,
}

/// The authorized, paginated owned-videos feed.
pub struct MyVideosFeed<S> {
    service: Arc<S>,
    session: SessionContext,
    per_page: u32,
    state: Arc<Mutex<FeedState>>,
}

impl<S> Clone for MyVideosFeed<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            session: self.session.clone(),
            per_page: self.per_page,
            state: Arc::clone(&self.state),
        }
    }
}

impl<S: VideoService> MyVideosFeed<S> {
    pub fn new(service: Arc<S>, session: SessionContext) -> Self {
        Self::with_page_size(service, session, DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(service: Arc<S>, session: SessionContext, per_page: u32) -> Self {
        Self {
            service,
            session,
            per_page,
            state: Arc::new(Mutex::new(FeedState::default())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, FeedState> {
        self.state.lock().expect("feed state lock poisoned")
    }

    pub fn window(&self) -> PageWindow {
        self.lock().window.clone()
    }

    /// Fetch one page, latest-request-wins.
    ///
    /// Out-of-range pages are a no-op (the buttons should be disabled at
    /// the boundaries; this guard is the backstop). Stale responses --
    /// and stale failures -- are silently discarded so the window always
    /// matches the most recently requested page.
    pub async fn go_to(&self, page: u32) -> ClientResult<PageFetch> {
        {
            let st = self.lock();
            if page < 1 || page > st.window.total_pages {
                return Ok(PageFetch::OutOfRange);
            }
        }
        self.fetch_and_apply(page).await
    }

    /// First load: the total page count is unknown, so page 1 is fetched
    /// unconditionally.
    pub async fn refresh(&self) -> ClientResult<PageFetch> {
        self.fetch_and_apply(1).await
    }

    /// Issue exactly one fetch for `page` and apply the response only if
    /// `page` is still the most recently requested one.
    async fn fetch_and_apply(&self, page: u32) -> ClientResult<PageFetch> {
        self.lock().latest_requested = Some(page);

        let identity = self.session.require()?;

        let result = self
            .service
            .my_videos(&identity.token, page, self.per_page)
            .await;

        let mut st = self.lock();
        if st.latest_requested != Some(page) {
            tracing::debug!(page, "Discarding stale page response");
            return Ok(PageFetch::Discarded);
        }

        match result {
            Ok(response) => {
                if response.current_page != page {
                    tracing::warn!(
                        requested = page,
                        reported = response.current_page,
                        "Server reported a different page than requested"
                    );
                }
                // `page` is the key the staleness check above was keyed on;
                // trusting the server's echo here would let a bad response
                // desynchronize the window from `latest_requested`.
                st.window = PageWindow {
                    current_page: page,
                    total_pages: response.total_pages,
                    total_videos: response.total_videos,
                    items: response.videos,
                };
                Ok(PageFetch::Applied)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Drop a deleted video from the current window in place, without a
    /// re-fetch, and decrement the tracked total.
    pub fn remove(&self, video_id: DbId) {
        let mut st = self.lock();
        let before = st.window.items.len();
        st.window.items.retain(|v| v.id != video_id);
        if st.window.items.len() < before {
            st.window.total_videos = st.window.total_videos.saturating_sub(1);
        }
    }

    /// Confirmation-gated deletion: answering no issues nothing; on
    /// success the window is updated locally (no re-fetch).
    pub async fn delete_video(
        &self,
        video_id: DbId,
        confirm: impl FnOnce() -> bool,
    ) -> ClientResult<bool> {
        let identity = self.session.require()?;
        if !confirm() {
            return Ok(false);
        }
        self.service
            .delete_video(&identity.token, video_id)
            .await
            .map_err(ClientError::from)?;
        tracing::info!(video_id, "Video deleted");
        self.remove(video_id);
        Ok(true)
    }
}

/// The non-paginated public discovery feed.
pub async fn fetch_public_videos<S: VideoService>(service: &S) -> ClientResult<Vec<Video>> {
    service.public_videos().await.map_err(ClientError::from)
}
