/// Video chapter segmentation module
///
/// This module turns free-text video descriptions into structured,
/// time-ordered chapter lists and tracks per-chapter learning progress.
/// Raw text flows through the extractor into the builder, and the
/// resulting segments are fed playback samples by the tracker.

pub mod builder;
pub mod extractor;
pub mod tracker;

// Re-export main types
pub use builder::{build_segments, DEFAULT_FALLBACK_WINDOW_SECONDS};
pub use extractor::TimestampExtractor;
pub use tracker::ProgressTracker;

use serde::{Deserialize, Serialize};

/// A raw `(time, label)` pair extracted from description text
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Timestamp {
    /// Time offset in seconds from start of video
    pub time_seconds: u64,
    /// Trimmed text following the time code on the same line
    pub label: String,
}

/// A bounded chapter window within a video
///
/// The window is half-open: playback time `t` belongs to the segment
/// when `start_time <= t < end_time`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Segment {
    /// Stable identifier derived from the video id and start time
    pub id: String,
    /// Window start in seconds
    pub start_time: u64,
    /// Window end in seconds (exclusive)
    pub end_time: u64,
    /// Chapter title
    pub title: String,
    /// Whether the learner has finished this chapter
    pub completed: bool,
}

impl Segment {
    /// Window length in seconds
    pub fn duration(&self) -> u64 {
        self.end_time - self.start_time
    }

    /// Whether a playback time falls inside this segment's window
    pub fn contains(&self, time: f64) -> bool {
        self.start_time as f64 <= time && time < self.end_time as f64
    }
}

/// Format a second count as `H:MM:SS`, or `M:SS` when under an hour
pub fn format_timestamp(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_contains_is_half_open() {
        let segment = Segment {
            id: "abc-segment-60".to_string(),
            start_time: 60,
            end_time: 120,
            title: "Setup".to_string(),
            completed: false,
        };

        assert!(segment.contains(60.0));
        assert!(segment.contains(119.9));
        assert!(!segment.contains(120.0));
        assert!(!segment.contains(59.9));
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0), "0:00");
        assert_eq!(format_timestamp(65), "1:05");
        assert_eq!(format_timestamp(600), "10:00");
        assert_eq!(format_timestamp(3661), "1:01:01");
    }
}
