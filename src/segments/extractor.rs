/// Timestamp extraction from free-text video descriptions
use super::Timestamp;
use regex::{Captures, Regex};

/// Matches one time code per line: an optional opening bracket, one or two
/// digits, a colon, exactly two digits, an optional `:SS` group, an optional
/// closing bracket, then a dash-style or whitespace separator and the label.
const TIMESTAMP_PATTERN: &str =
    r"\[?(\d{1,2}):(\d{2})(?::(\d{2}))?\]?(?:\s*[-\u{2013}\u{2014}]\s*|\s+)(.*)$";

/// Scans description text for chapter time codes
#[derive(Debug, Clone)]
pub struct TimestampExtractor {
    pattern: Regex,
}

impl TimestampExtractor {
    pub fn new() -> Self {
        let pattern = Regex::new(TIMESTAMP_PATTERN).expect("timestamp pattern is valid");
        Self { pattern }
    }

    /// Extract all timestamps from a block of description text
    ///
    /// Returns matches in text order, which is not necessarily time order.
    /// Duplicate time codes are kept; the builder is responsible for
    /// deduplication. Malformed text yields an empty list, never an error.
    pub fn extract(&self, text: &str) -> Vec<Timestamp> {
        let mut timestamps = Vec::new();

        for line in text.lines() {
            if let Some(caps) = self.pattern.captures(line) {
                if let Some(timestamp) = timestamp_from_captures(&caps) {
                    timestamps.push(timestamp);
                }
            }
        }

        timestamps
    }
}

impl Default for TimestampExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Interpret the numeric groups of a match
///
/// Three groups are H:MM:SS, two groups are M:SS (no hours).
fn timestamp_from_captures(caps: &Captures) -> Option<Timestamp> {
    let first: u64 = caps.get(1)?.as_str().parse().ok()?;
    let second: u64 = caps.get(2)?.as_str().parse().ok()?;
    let third: Option<u64> = match caps.get(3) {
        Some(m) => Some(m.as_str().parse().ok()?),
        None => None,
    };

    let time_seconds = match third {
        Some(seconds) => first * 3600 + second * 60 + seconds,
        None => first * 60 + second,
    };

    let label = caps
        .get(4)
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default();

    Some(Timestamp {
        time_seconds,
        label,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_minutes_seconds() {
        let extractor = TimestampExtractor::new();
        let timestamps = extractor.extract("0:00 - Intro\n2:30 - Setup");

        assert_eq!(timestamps.len(), 2);
        assert_eq!(timestamps[0].time_seconds, 0);
        assert_eq!(timestamps[0].label, "Intro");
        assert_eq!(timestamps[1].time_seconds, 150);
        assert_eq!(timestamps[1].label, "Setup");
    }

    #[test]
    fn test_extract_hours_minutes_seconds() {
        let extractor = TimestampExtractor::new();
        let timestamps = extractor.extract("1:02:03 - Deep Dive");

        assert_eq!(timestamps.len(), 1);
        assert_eq!(timestamps[0].time_seconds, 3723);
        assert_eq!(timestamps[0].label, "Deep Dive");
    }

    #[test]
    fn test_extract_bracketed_and_plain_space() {
        let extractor = TimestampExtractor::new();
        let timestamps = extractor.extract("[00:10] Getting Started\n5:00 Recap");

        assert_eq!(timestamps.len(), 2);
        assert_eq!(timestamps[0].time_seconds, 10);
        assert_eq!(timestamps[0].label, "Getting Started");
        assert_eq!(timestamps[1].time_seconds, 300);
        assert_eq!(timestamps[1].label, "Recap");
    }

    #[test]
    fn test_extract_dash_variants() {
        let extractor = TimestampExtractor::new();
        let timestamps = extractor.extract("1:00 \u{2013} En Dash\n2:00 \u{2014} Em Dash");

        assert_eq!(timestamps.len(), 2);
        assert_eq!(timestamps[0].label, "En Dash");
        assert_eq!(timestamps[1].label, "Em Dash");
    }

    #[test]
    fn test_extract_preserves_text_order() {
        let extractor = TimestampExtractor::new();
        let timestamps = extractor.extract("5:00 - Later\n1:00 - Earlier");

        // Text order, not time order
        assert_eq!(timestamps[0].time_seconds, 300);
        assert_eq!(timestamps[1].time_seconds, 60);
    }

    #[test]
    fn test_extract_keeps_duplicates() {
        let extractor = TimestampExtractor::new();
        let timestamps = extractor.extract("1:00 - First\n1:00 - Second");

        assert_eq!(timestamps.len(), 2);
    }

    #[test]
    fn test_extract_ignores_prose_lines() {
        let extractor = TimestampExtractor::new();
        let text = "Welcome to the course!\nSubscribe for more.\n\n0:00 - Intro";
        let timestamps = extractor.extract(text);

        assert_eq!(timestamps.len(), 1);
        assert_eq!(timestamps[0].time_seconds, 0);
    }

    #[test]
    fn test_extract_embedded_time_code() {
        let extractor = TimestampExtractor::new();
        let timestamps = extractor.extract("Chapters: 0:45 First Steps");

        assert_eq!(timestamps.len(), 1);
        assert_eq!(timestamps[0].time_seconds, 45);
        assert_eq!(timestamps[0].label, "First Steps");
    }

    #[test]
    fn test_extract_empty_input() {
        let extractor = TimestampExtractor::new();
        assert!(extractor.extract("").is_empty());
        assert!(extractor.extract("no chapters here").is_empty());
    }

    #[test]
    fn test_extract_label_is_trimmed() {
        let extractor = TimestampExtractor::new();
        let timestamps = extractor.extract("3:15 -   Padded Label   ");

        assert_eq!(timestamps[0].label, "Padded Label");
    }
}
