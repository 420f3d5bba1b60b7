//! Video detail view loading.

use ddw_api::VideoService;
use ddw_core::comment::Comment;
use ddw_core::error::{ClientError, ClientResult};
use ddw_core::types::DbId;
use ddw_core::video::Video;

/// Fetch a video's metadata and its comments concurrently.
///
/// The metadata fetch failing is the view's failure; the comments fetch
/// failing only degrades to an empty list with a warning, matching the
/// backend contract's treatment of comments as a secondary payload.
pub async fn load_video_detail<S: VideoService>(
    service: &S,
    video_id: DbId,
) -> ClientResult<(Video, Vec<Comment>)> {
    let (video, comments) = tokio::join!(service.video(video_id), service.comments(video_id));

    let video = video.map_err(ClientError::from)?;
    let comments = comments.unwrap_or_else(|e| {
        tracing::warn!(video_id, error = %e, "Failed to load comments for video");
        Vec::new()
    });

    Ok((video, comments))
}
