use crate::error::HistoryFileError;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryOrigin {
    Seeded,
    Accepted,
    Rejected,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryEntry {
    pub text: String,
    pub origin: EntryOrigin,
}

impl HistoryEntry {
    pub fn was_accepted(&self) -> bool {
        self.origin != EntryOrigin::Rejected
    }
}

/// Append-only record of submitted statements for one session.
#[derive(Debug, Default)]
pub struct HistoryStore {
    entries: Vec<HistoryEntry>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed<S: AsRef<str>>(&mut self, texts: &[S]) {
        for text in texts {
            self.entries.push(HistoryEntry {
                text: text.as_ref().to_string(),
                origin: EntryOrigin::Seeded,
            });
        }
    }

    pub fn append(&mut self, text: &str, accepted: bool) -> &HistoryEntry {
        let origin = if accepted {
            EntryOrigin::Accepted
        } else {
            EntryOrigin::Rejected
        };
        self.entries.push(HistoryEntry {
            text: text.to_string(),
            origin,
        });
        let index = self.entries.len() - 1;
        &self.entries[index]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Entries appended by submissions, excluding anything seeded.
    pub fn submitted(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.origin != EntryOrigin::Seeded)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct HistoryRecord {
    text: String,
    accepted: bool,
}

/// JSON-lines persistence for history between sessions.
#[derive(Clone, Debug)]
pub struct HistoryFile {
    path: PathBuf,
}

impl HistoryFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The last `limit` statement texts, oldest first.
    pub fn load_seed(&self, limit: usize) -> Result<Vec<String>, HistoryFileError> {
        let file = match std::fs::File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut texts = Vec::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<HistoryRecord>(&line) {
                Ok(record) => texts.push(record.text),
                Err(err) => tracing::warn!(
                    path = %self.path.display(),
                    line = index + 1,
                    error = %err,
                    "skipping malformed history record"
                ),
            }
        }

        let skip = texts.len().saturating_sub(limit);
        Ok(texts.split_off(skip))
    }

    pub fn append(&self, entry: &HistoryEntry) -> Result<(), HistoryFileError> {
        let record = HistoryRecord {
            text: entry.text.clone(),
            accepted: entry.was_accepted(),
        };
        let mut line = serde_json::to_string(&record)?;
        line.push('\n');
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;
        Ok(())
    }
}
