/// Per-video learning progress tracking
///
/// Drives the segment state machine: segments start pending, become active
/// while playback is inside their window, and transition to completed either
/// automatically once enough of the window has been watched or by explicit
/// user action. Completion flags are the only state that survives a reload;
/// they are written to the injected store on every transition.
use super::Segment;
use crate::store::{completion_key, CompletionStore};
use anyhow::Result;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Fraction of a segment's window that must be watched before it is
/// auto-marked complete
pub const DEFAULT_COMPLETION_THRESHOLD: f64 = 0.90;

/// Tracks active segment and completion state for a single video
pub struct ProgressTracker {
    video_id: String,
    segments: Vec<Segment>,
    active_index: Option<usize>,
    completion_threshold: f64,
    store: Arc<dyn CompletionStore>,
}

impl ProgressTracker {
    /// Create a tracker, merging any persisted completion flags into the
    /// freshly built segments
    ///
    /// A missing record means no prior progress. A malformed record is
    /// logged and treated the same way, never surfaced as an error.
    pub fn load(
        video_id: impl Into<String>,
        mut segments: Vec<Segment>,
        store: Arc<dyn CompletionStore>,
        completion_threshold: f64,
    ) -> Result<Self> {
        let video_id = video_id.into();
        let saved = Self::read_saved_completions(&video_id, store.as_ref())?;

        for segment in &mut segments {
            if saved.get(&segment.id).copied().unwrap_or(false) {
                segment.completed = true;
            }
        }

        debug!(
            "📋 Loaded tracker for {}: {} segments, {} already completed",
            video_id,
            segments.len(),
            segments.iter().filter(|s| s.completed).count()
        );

        Ok(Self {
            video_id,
            segments,
            active_index: None,
            completion_threshold,
            store,
        })
    }

    fn read_saved_completions(
        video_id: &str,
        store: &dyn CompletionStore,
    ) -> Result<HashMap<String, bool>> {
        let key = completion_key(video_id);
        match store.get(&key)? {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(map) => Ok(map),
                Err(e) => {
                    warn!(
                        "Malformed completion record for {}, starting fresh: {}",
                        video_id, e
                    );
                    Ok(HashMap::new())
                }
            },
            None => Ok(HashMap::new()),
        }
    }

    /// Process one playback-time sample
    ///
    /// Recomputes the active segment and applies the auto-completion rule to
    /// it. Returns the new active index, or `None` when playback is outside
    /// every window. A segment completes at most once per flag flip; samples
    /// past the threshold on an already-completed segment are no-ops.
    pub fn on_time_sample(&mut self, current_time: f64) -> Result<Option<usize>> {
        let active = self.segments.iter().position(|s| s.contains(current_time));

        if active != self.active_index {
            self.active_index = active;
            if let Some(i) = active {
                debug!(
                    "▶️ Active chapter for {}: '{}'",
                    self.video_id, self.segments[i].title
                );
            }
        }

        if let Some(i) = active {
            let segment = &self.segments[i];
            if !segment.completed {
                let span = segment.duration() as f64;
                let fraction_watched = (current_time - segment.start_time as f64) / span;
                if fraction_watched >= self.completion_threshold {
                    self.segments[i].completed = true;
                    info!(
                        "✅ Auto-completed chapter '{}' for {}",
                        self.segments[i].title, self.video_id
                    );
                    self.persist()?;
                }
            }
        }

        Ok(active)
    }

    /// Manually set a segment's completion flag
    ///
    /// Allowed from any state to any state; un-completing an auto-completed
    /// segment is fine. Returns `false` when the id is unknown.
    pub fn set_completed(&mut self, segment_id: &str, completed: bool) -> Result<bool> {
        let Some(segment) = self.segments.iter_mut().find(|s| s.id == segment_id) else {
            return Ok(false);
        };

        if segment.completed != completed {
            segment.completed = completed;
            self.persist()?;
        }

        Ok(true)
    }

    /// Flip a segment's completion flag, returning the new value
    pub fn toggle_completed(&mut self, segment_id: &str) -> Result<Option<bool>> {
        let Some(completed) = self
            .segments
            .iter()
            .find(|s| s.id == segment_id)
            .map(|s| s.completed)
        else {
            return Ok(None);
        };

        self.set_completed(segment_id, !completed)?;
        Ok(Some(!completed))
    }

    /// Force every segment to completed
    pub fn mark_all_complete(&mut self) -> Result<()> {
        for segment in &mut self.segments {
            segment.completed = true;
        }
        self.persist()?;
        info!("✅ Marked all {} chapters complete for {}", self.segments.len(), self.video_id);
        Ok(())
    }

    /// Clear all progress and drop the persisted record
    pub fn reset_progress(&mut self) -> Result<()> {
        for segment in &mut self.segments {
            segment.completed = false;
        }
        self.store.remove(&completion_key(&self.video_id))?;
        info!("🔄 Reset progress for {}", self.video_id);
        Ok(())
    }

    /// Write the full completion map under the video-scoped key
    fn persist(&self) -> Result<()> {
        let completions: HashMap<&str, bool> = self
            .segments
            .iter()
            .map(|s| (s.id.as_str(), s.completed))
            .collect();

        let json = serde_json::to_string(&completions)?;
        self.store.set(&completion_key(&self.video_id), &json)?;
        debug!("💾 Saved completion record for {}", self.video_id);
        Ok(())
    }

    pub fn video_id(&self) -> &str {
        &self.video_id
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active_index
    }

    pub fn active_segment(&self) -> Option<&Segment> {
        self.active_index.and_then(|i| self.segments.get(i))
    }

    pub fn completed_count(&self) -> usize {
        self.segments.iter().filter(|s| s.completed).count()
    }

    /// Overall completion percentage, rounded to a whole number
    pub fn progress_percent(&self) -> u32 {
        if self.segments.is_empty() {
            return 0;
        }
        let fraction = self.completed_count() as f64 / self.segments.len() as f64;
        (fraction * 100.0).round() as u32
    }

    /// Start time the playback collaborator should seek to for a chapter
    /// click, if the index is valid
    pub fn seek_target(&self, index: usize) -> Option<u64> {
        self.segments.get(index).map(|s| s.start_time)
    }
}
