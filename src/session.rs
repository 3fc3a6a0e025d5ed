/// Session management for per-video segmentation state
///
/// One session per open video: the description is parsed into segments once,
/// persisted completion flags are merged in, and subsequent playback samples
/// are routed to the video's tracker. When the playback collaborator first
/// reports the real duration, the segment list is rebuilt so the last
/// chapter's fallback window is replaced with the true end time.
use crate::config::SegmentationConfig;
use crate::segments::{build_segments, ProgressTracker, Segment, TimestampExtractor};
use crate::store::CompletionStore;
use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

struct VideoSession {
    description: String,
    duration: Option<f64>,
    tracker: ProgressTracker,
    opened_at: DateTime<Utc>,
}

/// Manages segmentation sessions across videos
#[derive(Clone)]
pub struct SessionManager {
    config: SegmentationConfig,
    extractor: TimestampExtractor,
    store: Arc<dyn CompletionStore>,
    sessions: Arc<RwLock<HashMap<String, VideoSession>>>,
}

impl SessionManager {
    pub fn new(config: SegmentationConfig, store: Arc<dyn CompletionStore>) -> Self {
        Self {
            config,
            extractor: TimestampExtractor::new(),
            store,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Open (or reopen) a session for a video
    ///
    /// Extracts chapters from the description, merges persisted completion
    /// flags, and returns the resulting segment list. An empty list means
    /// the description carries no recognizable chapters.
    pub async fn open_session(
        &self,
        video_id: &str,
        description: &str,
        duration: Option<f64>,
    ) -> Result<Vec<Segment>> {
        let tracker = self.build_tracker(video_id, description, duration)?;
        let segments = tracker.segments().to_vec();

        if segments.is_empty() {
            info!("ℹ️ No chapters found in description for {}", video_id);
        } else {
            info!("🎬 Opened session for {}: {} chapters", video_id, segments.len());
        }

        let session = VideoSession {
            description: description.to_string(),
            duration,
            tracker,
            opened_at: Utc::now(),
        };
        self.sessions.write().await.insert(video_id.to_string(), session);

        Ok(segments)
    }

    /// Close a session, dropping its in-memory state
    ///
    /// Persisted completion flags are unaffected.
    pub async fn close_session(&self, video_id: &str) -> bool {
        self.sessions.write().await.remove(video_id).is_some()
    }

    /// Process one `(current_time, duration)` playback sample
    ///
    /// Returns the active segment index, or `None` when playback is outside
    /// every chapter window. A newly reported duration triggers a segment
    /// rebuild before the sample is applied.
    pub async fn on_time_sample(
        &self,
        video_id: &str,
        current_time: f64,
        duration: f64,
    ) -> Result<Option<usize>> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(video_id)
            .ok_or_else(|| anyhow!("no open session for video {}", video_id))?;

        if duration > 0.0 && session.duration.map_or(true, |d| (d - duration).abs() > 0.5) {
            debug!("🔄 Duration now known for {}: {:.0}s, rebuilding segments", video_id, duration);
            session.tracker = self.build_tracker(video_id, &session.description, Some(duration))?;
            session.duration = Some(duration);
        }

        session.tracker.on_time_sample(current_time)
    }

    /// Current segment list for an open session
    pub async fn segments(&self, video_id: &str) -> Result<Vec<Segment>> {
        let sessions = self.sessions.read().await;
        let session = sessions
            .get(video_id)
            .ok_or_else(|| anyhow!("no open session for video {}", video_id))?;
        Ok(session.tracker.segments().to_vec())
    }

    /// Manually set a chapter's completion flag
    pub async fn set_completed(
        &self,
        video_id: &str,
        segment_id: &str,
        completed: bool,
    ) -> Result<bool> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(video_id)
            .ok_or_else(|| anyhow!("no open session for video {}", video_id))?;
        session.tracker.set_completed(segment_id, completed)
    }

    /// Force every chapter of a video to completed
    pub async fn mark_all_complete(&self, video_id: &str) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(video_id)
            .ok_or_else(|| anyhow!("no open session for video {}", video_id))?;
        session.tracker.mark_all_complete()
    }

    /// Clear all progress for a video, including the persisted record
    pub async fn reset_progress(&self, video_id: &str) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(video_id)
            .ok_or_else(|| anyhow!("no open session for video {}", video_id))?;
        session.tracker.reset_progress()
    }

    /// Overall completion percentage for a video, rounded
    pub async fn progress_percent(&self, video_id: &str) -> Result<u32> {
        let sessions = self.sessions.read().await;
        let session = sessions
            .get(video_id)
            .ok_or_else(|| anyhow!("no open session for video {}", video_id))?;
        Ok(session.tracker.progress_percent())
    }

    /// Per-session diagnostics, newest sessions first
    pub async fn list_sessions(&self) -> Vec<SessionInfo> {
        let sessions = self.sessions.read().await;
        let mut infos: Vec<SessionInfo> = sessions
            .iter()
            .map(|(video_id, session)| SessionInfo {
                video_id: video_id.clone(),
                chapter_count: session.tracker.segments().len(),
                completed_count: session.tracker.completed_count(),
                duration_known: session.duration.is_some(),
                opened_at: session.opened_at,
            })
            .collect();

        infos.sort_by(|a, b| b.opened_at.cmp(&a.opened_at));
        infos
    }

    /// Aggregate statistics across open sessions
    pub async fn session_stats(&self) -> SessionStats {
        let sessions = self.sessions.read().await;
        let mut stats = SessionStats::default();

        for session in sessions.values() {
            stats.open_sessions += 1;
            stats.total_segments += session.tracker.segments().len();
            stats.completed_segments += session.tracker.completed_count();
        }

        stats
    }

    fn build_tracker(
        &self,
        video_id: &str,
        description: &str,
        duration: Option<f64>,
    ) -> Result<ProgressTracker> {
        let timestamps = self.extractor.extract(description);
        let segments = build_segments(
            &timestamps,
            video_id,
            duration.map(|d| d.round() as u64),
            self.config.fallback_window_seconds,
        );
        ProgressTracker::load(
            video_id,
            segments,
            self.store.clone(),
            self.config.completion_threshold,
        )
    }
}

/// Diagnostics for a single open session
#[derive(Debug, Clone, Serialize)]
pub struct SessionInfo {
    pub video_id: String,
    pub chapter_count: usize,
    pub completed_count: usize,
    pub duration_known: bool,
    pub opened_at: DateTime<Utc>,
}

/// Aggregate session statistics
#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionStats {
    pub open_sessions: usize,
    pub total_segments: usize,
    pub completed_segments: usize,
}
