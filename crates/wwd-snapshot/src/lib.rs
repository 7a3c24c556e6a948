//! wwd-snapshot
//!
//! Local backup of the last raw feed batch. `load` reconstructs the
//! previous-bulletin-id set after a restart; `save` goes through a temp file
//! in the same directory followed by a rename, so a crash mid-save leaves
//! the prior snapshot readable.
//!
//! A missing or undecodable snapshot is the expected first-run / corrupt
//! state and loads as the empty set; it is never fatal.

use std::collections::BTreeSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::warn;
use wwd_schemas::RawWarning;

#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the id set of the previous poll's raw batch.
    ///
    /// Missing file => empty set (first run). Undecodable content => empty
    /// set with a warning; the next successful save repairs the store.
    /// Only hard IO errors propagate.
    pub fn load(&self) -> Result<BTreeSet<String>> {
        let bytes = match fs::read(&self.path) {
            Ok(b) => b,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeSet::new()),
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("snapshot read failed: {}", self.path.display())
                })
            }
        };

        match serde_json::from_slice::<Vec<RawWarning>>(&bytes) {
            Ok(batch) => Ok(batch.into_iter().map(|w| w.id).collect()),
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    "snapshot undecodable, treating as empty: {e}"
                );
                Ok(BTreeSet::new())
            }
        }
    }

    /// Persist the raw batch just fetched, overwriting the prior snapshot.
    ///
    /// The batch is written before collapsing: the next poll diffs against
    /// every bulletin id the feed delivered, not just the retained ones.
    pub fn save(&self, batch: &[RawWarning]) -> Result<()> {
        let json = serde_json::to_vec(batch).context("snapshot serialize failed")?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("snapshot dir create failed: {}", parent.display())
                })?;
            }
        }

        // Temp file must live in the target directory for the rename to be
        // atomic on the same filesystem.
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, &json)
            .with_context(|| format!("snapshot temp write failed: {}", tmp.display()))?;
        fs::rename(&tmp, &self.path).with_context(|| {
            format!("snapshot rename failed: {}", self.path.display())
        })?;

        Ok(())
    }
}
