/// Segment construction from extracted timestamps
use super::{Segment, Timestamp};
use tracing::debug;

/// Window granted to the last segment when the video duration is unknown
pub const DEFAULT_FALLBACK_WINDOW_SECONDS: u64 = 600;

/// Build a time-ordered segment list from raw timestamps
///
/// Timestamps are stably sorted by time and deduplicated by time (first
/// occurrence in text order wins), so derived ids never collide. Each
/// segment's window ends where the next one starts; the last segment ends
/// at `known_duration` when available, otherwise after `fallback_window`
/// seconds. An empty timestamp list yields an empty segment list, which
/// callers treat as "no structured chapters available".
pub fn build_segments(
    timestamps: &[Timestamp],
    video_id: &str,
    known_duration: Option<u64>,
    fallback_window: u64,
) -> Vec<Segment> {
    let mut sorted: Vec<Timestamp> = timestamps.to_vec();
    sorted.sort_by_key(|t| t.time_seconds);
    sorted.dedup_by_key(|t| t.time_seconds);

    let count = sorted.len();
    let mut segments = Vec::with_capacity(count);

    for (i, timestamp) in sorted.iter().enumerate() {
        let start_time = timestamp.time_seconds;
        let end_time = if i + 1 < count {
            sorted[i + 1].time_seconds
        } else {
            match known_duration {
                Some(duration) if duration > start_time => duration,
                _ => start_time + fallback_window,
            }
        };

        segments.push(Segment {
            id: format!("{}-segment-{}", video_id, start_time),
            start_time,
            end_time,
            title: timestamp.label.clone(),
            completed: false,
        });
    }

    if sorted.len() != timestamps.len() {
        debug!(
            "Dropped {} duplicate timestamps for video {}",
            timestamps.len() - sorted.len(),
            video_id
        );
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(time_seconds: u64, label: &str) -> Timestamp {
        Timestamp {
            time_seconds,
            label: label.to_string(),
        }
    }

    #[test]
    fn test_build_sorts_by_start_time() {
        let timestamps = vec![ts(300, "Later"), ts(60, "Earlier")];
        let segments = build_segments(&timestamps, "vid", None, DEFAULT_FALLBACK_WINDOW_SECONDS);

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].start_time, 60);
        assert_eq!(segments[0].title, "Earlier");
        assert_eq!(segments[1].start_time, 300);
    }

    #[test]
    fn test_build_windows_are_contiguous() {
        let timestamps = vec![ts(0, "A"), ts(90, "B"), ts(240, "C")];
        let segments = build_segments(&timestamps, "vid", Some(600), 600);

        for pair in segments.windows(2) {
            assert_eq!(pair[0].end_time, pair[1].start_time);
        }
        assert!(segments.iter().all(|s| s.end_time > s.start_time));
    }

    #[test]
    fn test_build_last_segment_uses_known_duration() {
        let timestamps = vec![ts(0, "A"), ts(100, "B")];
        let segments = build_segments(&timestamps, "vid", Some(450), 600);

        assert_eq!(segments[1].end_time, 450);
    }

    #[test]
    fn test_build_last_segment_fallback_window() {
        let timestamps = vec![ts(0, "A")];
        let segments = build_segments(&timestamps, "vid", None, 600);

        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].end_time, 600);
    }

    #[test]
    fn test_build_ignores_duration_not_past_last_start() {
        // A stale or bogus duration must not produce an empty window
        let timestamps = vec![ts(500, "Tail")];
        let segments = build_segments(&timestamps, "vid", Some(400), 600);

        assert_eq!(segments[0].end_time, 1100);
    }

    #[test]
    fn test_build_ids_are_stable_across_rebuilds() {
        let timestamps = vec![ts(120, "B"), ts(30, "A")];
        let first = build_segments(&timestamps, "abc123", Some(900), 600);

        // Same input with different text order yields identical ids
        let reordered = vec![ts(30, "A"), ts(120, "B")];
        let second = build_segments(&reordered, "abc123", Some(900), 600);

        assert_eq!(first[0].id, "abc123-segment-30");
        assert_eq!(first[1].id, "abc123-segment-120");
        assert_eq!(
            first.iter().map(|s| &s.id).collect::<Vec<_>>(),
            second.iter().map(|s| &s.id).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_build_dedupes_equal_times_keeping_first() {
        let timestamps = vec![ts(60, "First"), ts(60, "Second"), ts(120, "Next")];
        let segments = build_segments(&timestamps, "vid", None, 600);

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].title, "First");
        let ids: std::collections::HashSet<_> = segments.iter().map(|s| &s.id).collect();
        assert_eq!(ids.len(), segments.len());
    }

    #[test]
    fn test_build_empty_input() {
        let segments = build_segments(&[], "vid", Some(600), 600);
        assert!(segments.is_empty());
    }
}
