//! Durable persistence of the demo-mode flag.
//!
//! Only the boolean flag survives a restart; the dataset itself is always
//! regenerated. The file-backed store keeps a marker file in the user's
//! config directory (or a caller-supplied path); the in-memory store backs
//! tests.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::{fs, io};

use directories::ProjectDirs;
use log::warn;

use crate::error::DemoResult;

/// Durable storage for the demo-mode flag.
pub trait DemoFlagStore: Send + Sync {
    /// Whether the flag was persisted by a previous session.
    fn is_set(&self) -> bool;
    /// Persist the flag.
    fn persist(&self) -> DemoResult<()>;
    /// Remove the persisted flag. Removing an absent flag is a no-op.
    fn clear(&self) -> DemoResult<()>;
}

/// Marker-file implementation of [`DemoFlagStore`].
#[derive(Debug, Clone)]
pub struct FileFlagStore {
    path: PathBuf,
}

impl FileFlagStore {
    /// Use an explicit marker-file path.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Marker file in the per-user config directory, falling back to the
    /// working directory when no home is available.
    pub fn default_location() -> Self {
        let path = match ProjectDirs::from("", "", "loyalty-demo") {
            Some(dirs) => dirs.config_dir().join("demo_mode"),
            None => {
                warn!("no config directory available; keeping demo flag in ./demo_mode");
                PathBuf::from("demo_mode")
            }
        };
        Self::new(path)
    }
}

impl DemoFlagStore for FileFlagStore {
    fn is_set(&self) -> bool {
        self.path.exists()
    }

    fn persist(&self) -> DemoResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, b"true")?;
        Ok(())
    }

    fn clear(&self) -> DemoResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Volatile implementation of [`DemoFlagStore`] for tests.
#[derive(Debug, Default)]
pub struct MemoryFlagStore {
    flag: AtomicBool,
}

impl MemoryFlagStore {
    /// Start with the flag already set, as if persisted by a previous
    /// session.
    pub fn preset() -> Self {
        Self {
            flag: AtomicBool::new(true),
        }
    }
}

impl DemoFlagStore for MemoryFlagStore {
    fn is_set(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    fn persist(&self) -> DemoResult<()> {
        self.flag.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn clear(&self) -> DemoResult<()> {
        self.flag.store(false, Ordering::SeqCst);
        Ok(())
    }
}
