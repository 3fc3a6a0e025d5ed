use anyhow::Result;
use chapter_progress::{Config, JsonFileStore, SessionManager};
use clap::{Arg, Command};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter("chapter_progress=info,warn")
        .init();

    let matches = Command::new("Chapter Progress")
        .version("0.1.0")
        .about("Video chapter segmentation and learning progress inspection")
        .arg(
            Arg::new("description")
                .short('f')
                .long("description")
                .value_name("FILE")
                .help("Text file containing the video description")
                .required(true)
        )
        .arg(
            Arg::new("video-id")
                .short('i')
                .long("video-id")
                .value_name("ID")
                .help("Video identifier used to scope saved progress")
                .required(true)
        )
        .arg(
            Arg::new("duration")
                .short('d')
                .long("duration")
                .value_name("SECONDS")
                .help("Known video duration in seconds")
        )
        .arg(
            Arg::new("data-dir")
                .long("data-dir")
                .value_name("DIR")
                .help("Directory holding saved progress records")
        )
        .arg(
            Arg::new("reset")
                .long("reset")
                .help("Clear saved progress for the video before listing")
                .action(clap::ArgAction::SetTrue)
        )
        .get_matches();

    let description_path = PathBuf::from(matches.get_one::<String>("description").expect("required arg"));
    let video_id = matches.get_one::<String>("video-id").expect("required arg").clone();
    let duration: Option<f64> = matches
        .get_one::<String>("duration")
        .map(|s| s.parse())
        .transpose()?;

    // Load configuration
    let config = Config::load().unwrap_or_else(|e| {
        warn!("Failed to load config, using defaults: {}", e);
        Config::default()
    });

    let data_dir = matches
        .get_one::<String>("data-dir")
        .map(PathBuf::from)
        .unwrap_or_else(|| config.storage.data_dir.clone());

    let store = Arc::new(JsonFileStore::new(data_dir)?);
    let manager = SessionManager::new(config.segmentation, store);

    let description = tokio::fs::read_to_string(&description_path).await?;
    manager.open_session(&video_id, &description, duration).await?;

    if matches.get_flag("reset") {
        manager.reset_progress(&video_id).await?;
        info!("🔄 Cleared saved progress for {}", video_id);
    }

    let segments = manager.segments(&video_id).await?;
    if segments.is_empty() {
        println!("No chapters found in {}", description_path.display());
        return Ok(());
    }

    println!("Chapters for {}:", video_id);
    for segment in &segments {
        println!(
            "  [{}] {:>8} - {:>8}  {}",
            if segment.completed { "x" } else { " " },
            chapter_progress::format_timestamp(segment.start_time),
            chapter_progress::format_timestamp(segment.end_time),
            segment.title
        );
    }
    println!(
        "Progress: {}% ({} of {} chapters)",
        manager.progress_percent(&video_id).await?,
        segments.iter().filter(|s| s.completed).count(),
        segments.len()
    );

    Ok(())
}
