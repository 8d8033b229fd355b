//! Progress storage backends
//!
//! The session only talks to [`ProgressStore`]; the file backend is what the
//! game ships with, the memory backend is for tests and demos.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::Context;

use super::Progress;

const HEADER: &str = "# gapflight progress\n";

/// Load/save contract for the progress record
pub trait ProgressStore {
    /// Load progress. Never fails: missing or corrupt data yields defaults.
    fn load(&mut self) -> Progress;

    /// Persist progress, clamping out-of-range values first
    fn save(&mut self, progress: &Progress) -> anyhow::Result<()>;
}

/// Key = value text file, one per installation
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Default file name, relative to the working directory
    pub const DEFAULT_PATH: &'static str = "progress.properties";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| Self::DEFAULT_PATH.into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl Default for FileStore {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PATH)
    }
}

impl ProgressStore for FileStore {
    fn load(&mut self) -> Progress {
        if !self.path.exists() {
            let progress = Progress::default();
            log::info!("No progress at {}, creating defaults", self.path.display());
            if let Err(e) = self.save(&progress) {
                log::warn!("Could not create progress file: {e:#}");
            }
            return progress;
        }

        match fs::read(&self.path) {
            Ok(bytes) => {
                let progress = parse_progress(&String::from_utf8_lossy(&bytes));
                log::info!(
                    "Loaded progress: level {} unlocked, {} coins, high score {}",
                    progress.unlocked_level,
                    progress.coins,
                    progress.high_score
                );
                progress
            }
            Err(e) => {
                log::warn!("Error loading progress from {}: {e}", self.path.display());
                Progress::default()
            }
        }
    }

    fn save(&mut self, progress: &Progress) -> anyhow::Result<()> {
        let body = toml::to_string(&progress.clamped()).context("encoding progress")?;
        let tmp = self.temp_path();
        fs::write(&tmp, format!("{HEADER}{body}"))
            .with_context(|| format!("writing {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("replacing {}", self.path.display()))?;
        log::debug!("Progress saved to {}", self.path.display());
        Ok(())
    }
}

/// Parse a progress record line by line. Each field is read on its own, so a
/// bad line only costs that field its value.
///
/// Accepts `key = value`, `key=value` and `key: value`, with `#` or `!`
/// comment lines. Later lines win over earlier ones.
pub fn parse_progress(raw: &str) -> Progress {
    let mut progress = Progress::default();

    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }
        let Some((key, value)) = line.split_once(['=', ':']) else {
            log::warn!("Skipping unreadable progress line `{line}`");
            continue;
        };

        let key = key.trim();
        let slot = match key {
            "unlockedLevel" => &mut progress.unlocked_level,
            "coins" => &mut progress.coins,
            "highScore" => &mut progress.high_score,
            _ => continue,
        };
        match parse_field(value) {
            Some(v) => *slot = v,
            None => log::warn!("Progress field `{key}` is not an integer, keeping {slot}"),
        }
    }

    progress.clamped()
}

/// Integer value, optionally quoted. Out-of-range numbers saturate.
fn parse_field(value: &str) -> Option<i32> {
    let value = value.trim().trim_matches('"').trim();
    let v: i64 = value.parse().ok()?;
    Some(v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32)
}

#[derive(Debug, Default)]
struct MemoryInner {
    saved: Option<Progress>,
    save_count: usize,
    fail_saves: bool,
}

/// In-memory store. Clones share the same record so a test can keep a handle
/// after boxing one into the session.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Rc<RefCell<MemoryInner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a record, as if saved by an earlier session
    pub fn with_progress(progress: Progress) -> Self {
        let store = Self::default();
        store.inner.borrow_mut().saved = Some(progress.clamped());
        store
    }

    /// Last record written
    pub fn saved(&self) -> Option<Progress> {
        self.inner.borrow().saved
    }

    pub fn save_count(&self) -> usize {
        self.inner.borrow().save_count
    }

    /// Make every subsequent save fail, to exercise error paths
    pub fn fail_saves(&self, fail: bool) {
        self.inner.borrow_mut().fail_saves = fail;
    }
}

impl ProgressStore for MemoryStore {
    fn load(&mut self) -> Progress {
        let saved = self.inner.borrow().saved;
        match saved {
            Some(progress) => progress,
            None => {
                let progress = Progress::default();
                self.inner.borrow_mut().saved = Some(progress);
                progress
            }
        }
    }

    fn save(&mut self, progress: &Progress) -> anyhow::Result<()> {
        let mut inner = self.inner.borrow_mut();
        if inner.fail_saves {
            anyhow::bail!("memory store is read-only");
        }
        inner.saved = Some(progress.clamped());
        inner.save_count += 1;
        Ok(())
    }
}
