/// Chapter Progress
///
/// Turns free-text video descriptions into structured, time-ordered chapter
/// lists and tracks per-chapter learning progress against a stream of
/// playback samples, persisting completion flags through a pluggable
/// key-value store.

pub mod config;
pub mod segments;
pub mod session;
pub mod store;

// Re-export main types for easy access
pub use crate::config::{Config, SegmentationConfig, StorageConfig};
pub use crate::segments::{
    build_segments, format_timestamp, ProgressTracker, Segment, Timestamp, TimestampExtractor,
};
pub use crate::session::{SessionInfo, SessionManager, SessionStats};
pub use crate::store::{
    completion_key, prune_completions, CompletionStore, JsonFileStore, MemoryStore,
};
