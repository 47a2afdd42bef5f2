//! JSONL-backed similarity index that survives restarts.

use super::{SimilarityIndex, query_entries, validate_batch};
use crate::error::IndexError;
use crate::model::{IndexEntry, SearchHit};
use log::{debug, info};
use parking_lot::RwLock;
use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// Persistent index storing one entry per line.
///
/// Entries are loaded into memory on open. Seeding writes a temporary file
/// and renames it into place, so a crash never leaves a partial index.
#[derive(Debug)]
pub struct FileIndex {
    path: PathBuf,
    entries: RwLock<Vec<IndexEntry>>,
}

impl FileIndex {
    /// Open the index at `path`, creating parent directories as needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, IndexError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let entries = load_entries(&path)?;
        validate_batch(&entries)?;
        info!(
            "opened file index (path={}, count={})",
            path.display(),
            entries.len()
        );
        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }

    fn write_entries(&self, entries: &[IndexEntry]) -> Result<(), IndexError> {
        let temp_path = self.temp_path();
        {
            let mut file = OpenOptions::new()
                .create(true)
                .truncate(true)
                .write(true)
                .open(&temp_path)?;
            for entry in entries {
                let line = serde_json::to_string(entry)?;
                writeln!(file, "{line}")?;
            }
            file.sync_all()?;
        }
        std::fs::rename(temp_path, &self.path)?;
        Ok(())
    }
}

fn load_entries(path: &Path) -> Result<Vec<IndexEntry>, IndexError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let file = OpenOptions::new().read(true).open(path)?;
    let reader = BufReader::new(file);
    let mut entries = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        entries.push(serde_json::from_str(&line)?);
    }
    Ok(entries)
}

impl SimilarityIndex for FileIndex {
    fn count(&self) -> usize {
        self.entries.read().len()
    }

    fn dimensions(&self) -> Option<usize> {
        self.entries
            .read()
            .first()
            .map(|entry| entry.embedding.len())
    }

    fn seed_if_empty(&self, entries: Vec<IndexEntry>) -> Result<usize, IndexError> {
        validate_batch(&entries)?;
        let mut guard = self.entries.write();
        if !guard.is_empty() {
            debug!(
                "file index already populated (path={}, count={})",
                self.path.display(),
                guard.len()
            );
            return Ok(0);
        }
        self.write_entries(&entries)?;
        let inserted = entries.len();
        *guard = entries;
        info!(
            "seeded file index (path={}, count={inserted})",
            self.path.display()
        );
        Ok(inserted)
    }

    fn query(&self, embedding: &[f32], top_k: usize) -> Result<Vec<SearchHit>, IndexError> {
        let guard = self.entries.read();
        query_entries(&guard, embedding, top_k)
    }
}
