//! `ddw` -- command-line front end for the DDW protection backend.
//!
//! Drives the same orchestration components the desktop UI uses, so
//! every command goes through the shared validation, session, and
//! race-handling paths rather than raw HTTP calls.
//!
//! # Environment variables
//!
//! | Variable      | Required | Default                 | Description                          |
//! |---------------|----------|-------------------------|--------------------------------------|
//! | `DDW_API_URL` | no       | `http://localhost:5000` | Backend base URL                     |
//! | `DDW_TOKEN`   | for authed commands | --           | Bearer token from a previous `login` |

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Parser;
use ddw_api::ApiClient;
use ddw_client::{fetch_public_videos, AuthFlow, CommentStore, MyVideosFeed, UploadOrchestrator};
use ddw_core::session::SessionContext;
use ddw_core::types::DbId;
use ddw_core::upload::SelectedFile;
use ddw_core::video::Video;
use ddw_media::FfmpegGrabber;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "ddw", about = "Command-line client for the DDW protection backend")]
struct Cli {
    /// Backend base URL.
    #[arg(long, env = "DDW_API_URL", default_value = "http://localhost:5000")]
    api_url: String,

    /// Bearer token from a previous `login`; required for authed commands.
    #[arg(long, env = "DDW_TOKEN")]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Sign in and print the bearer token.
    Login { username: String, password: String },

    /// List the public video feed.
    Public,

    /// List one page of your videos.
    My {
        #[arg(default_value_t = 1)]
        page: u32,
    },

    /// Protect a video and print the result.
    Upload { path: PathBuf, title: String },

    /// List a video's comments.
    Comments { video_id: DbId },

    /// Post a comment.
    Comment { video_id: DbId, text: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before clap reads the `env` attrs.
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ddw_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let base_url = cli.api_url.clone();
    let service = Arc::new(ApiClient::new(&base_url));
    let session = SessionContext::new();
    let auth = AuthFlow::new(Arc::clone(&service), session.clone());

    match cli.command {
        Command::Login { username, password } => {
            let identity = auth.login(&username, &password).await?;
            tracing::info!(user_id = identity.user_id, role = ?identity.role, "Signed in");
            println!("{}", identity.token);
        }

        Command::Public => {
            let videos = fetch_public_videos(service.as_ref()).await?;
            print_videos(&videos, &base_url);
        }

        Command::My { page } => {
            resume(&auth, cli.token.as_deref())?;
            let feed = MyVideosFeed::new(Arc::clone(&service), session.clone());
            feed.refresh().await?;
            if page > 1 {
                feed.go_to(page).await?;
            }
            let window = feed.window();
            println!(
                "page {}/{} ({} videos total)",
                window.current_page, window.total_pages, window.total_videos
            );
            print_videos(&window.items, &base_url);
        }

        Command::Upload { path, title } => {
            resume(&auth, cli.token.as_deref())?;
            let upload = UploadOrchestrator::new(Arc::clone(&service), session.clone());

            let file = SelectedFile::from_path(&path)
                .with_context(|| format!("could not read {}", path.display()))?;
            upload.select_file(file)?;

            let mut grabber = FfmpegGrabber::open(Path::new(&path)).await?;
            let captured = upload.capture_thumbnails(&mut grabber).await;
            tracing::info!(captured, "Thumbnail candidates sampled");

            let outcome = upload.submit(&title).await?;
            println!("video id:  {}", outcome.video_id);
            println!(
                "playback:  {}",
                ddw_core::video::output_url(&base_url, &outcome.playback_filename)
            );
            println!(
                "master:    {}",
                ddw_core::video::output_url(&base_url, &outcome.master_filename)
            );

            match upload.verify().await? {
                ddw_client::VerificationOutcome::Verified(watermark) => {
                    println!("verified:  {watermark}");
                }
                ddw_client::VerificationOutcome::Rejected(reason) => {
                    println!("rejected:  {reason}");
                }
            }
        }

        Command::Comments { video_id } => {
            let store = CommentStore::new(Arc::clone(&service), session.clone(), video_id);
            let count = store.load().await?;
            println!("{count} comment(s)");
            for comment in store.comments() {
                println!(
                    "  #{} {} [{}]: {}",
                    comment.id,
                    comment.user.username,
                    comment.timestamp.format("%Y-%m-%d %H:%M"),
                    comment.text
                );
            }
        }

        Command::Comment { video_id, text } => {
            resume(&auth, cli.token.as_deref())?;
            let store = CommentStore::new(Arc::clone(&service), session.clone(), video_id);
            store.load().await?;
            let created = store.create(&text).await?;
            println!("posted comment #{}", created.id);
        }
    }

    Ok(())
}

/// Install the identity from `--token`/`DDW_TOKEN` for commands that
/// need one.
fn resume(auth: &AuthFlow<ApiClient>, token: Option<&str>) -> anyhow::Result<()> {
    let Some(token) = token else {
        bail!("DDW_TOKEN is required for this command (run `ddw login` first)");
    };
    auth.resume(token)?;
    Ok(())
}

fn print_videos(videos: &[Video], base_url: &str) {
    for video in videos {
        println!(
            "  #{} {} ({})",
            video.id,
            video.title,
            video.playback_url(base_url)
        );
    }
}
