//! Progress persistence
//!
//! Features:
//! - Key = value text record (unlocked level, coins, high score)
//! - Per-field fallback to defaults on corruption
//! - Clamping on both load and save
//! - Temp-file write then rename over the previous save

pub mod progress;
pub mod store;

pub use progress::Progress;
pub use store::{FileStore, MemoryStore, ProgressStore};
