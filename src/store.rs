//! High-score persistence.
//!
//! The game only ever reads one integer at startup and writes one integer
//! when it is beaten, so the capability is exactly that and nothing more.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::cell::Cell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Key the high score is stored under.
pub const HIGH_SCORE_KEY: &str = "anyoFlappyHighScore";

pub trait HighScoreStore {
    /// Stored best, or 0 when missing or unreadable.
    fn load(&self) -> u32;

    fn save(&mut self, score: u32) -> Result<()>;
}

/// Missing, empty and non-numeric values all mean "no high score yet".
pub fn parse_high_score(raw: &str) -> u32 {
    raw.trim().parse().unwrap_or(0)
}

/// One text file per key inside a directory.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store under the platform data directory.
    pub fn in_data_dir() -> Result<Self> {
        let dirs = ProjectDirs::from("", "", "anyo-flappy")
            .context("could not determine a data directory")?;
        Ok(Self::new(dirs.data_dir().join(HIGH_SCORE_KEY)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HighScoreStore for FileStore {
    fn load(&self) -> u32 {
        match fs::read_to_string(&self.path) {
            Ok(raw) => parse_high_score(&raw),
            Err(err) => {
                tracing::debug!("no high score at {}: {}", self.path.display(), err);
                0
            }
        }
    }

    fn save(&mut self, score: u32) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("creating {}", dir.display()))?;
        }
        fs::write(&self.path, score.to_string())
            .with_context(|| format!("writing {}", self.path.display()))
    }
}

/// In-memory store. Clones share the same slot, so a test can keep one
/// handle while the game owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    value: Rc<Cell<Option<u32>>>,
    writes: Rc<Cell<u32>>,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn with_value(score: u32) -> Self {
        let store = Self::default();
        store.value.set(Some(score));
        store
    }

    /// Every `save` errors and leaves the value untouched.
    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    pub fn value(&self) -> Option<u32> {
        self.value.get()
    }

    pub fn writes(&self) -> u32 {
        self.writes.get()
    }
}

impl HighScoreStore for MemoryStore {
    fn load(&self) -> u32 {
        self.value.get().unwrap_or(0)
    }

    fn save(&mut self, score: u32) -> Result<()> {
        if self.fail_writes {
            anyhow::bail!("high score storage is read-only");
        }
        self.value.set(Some(score));
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}
