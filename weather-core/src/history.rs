//! Recent-search history, persisted as a JSON array of place names.
//!
//! History is best-effort: read and write failures are logged and never
//! reach the caller.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;

/// Maximum number of remembered searches.
pub const MAX_HISTORY: usize = 10;

const HISTORY_FILE_NAME: &str = "search_history.json";

/// Move `place` to the front of `entries`, dropping any exact duplicate and
/// keeping at most [`MAX_HISTORY`] items. Returns `false` if `place` is blank.
pub fn push_recent(entries: &mut Vec<String>, place: &str) -> bool {
    let place = place.trim();
    if place.is_empty() {
        return false;
    }

    entries.retain(|existing| existing != place);
    entries.insert(0, place.to_string());
    entries.truncate(MAX_HISTORY);
    true
}

#[derive(Debug)]
pub struct HistoryStore {
    path: PathBuf,
    entries: Vec<String>,
}

impl HistoryStore {
    /// Open the store at `path`, loading whatever is there.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = read_entries(&path);
        Self { path, entries }
    }

    /// Platform data directory location, e.g. `~/.local/share/weather/search_history.json`.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("dev", "weather-lab", "weather")
            .map(|dirs| dirs.data_dir().join(HISTORY_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Most-recent-first snapshot held in memory.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Re-read the durable list. Missing or corrupt files read as empty.
    pub fn load(&self) -> Vec<String> {
        read_entries(&self.path)
    }

    /// Replace the durable list with `entries`.
    pub fn persist(&self, entries: &[String]) {
        if let Err(err) = write_entries(&self.path, entries) {
            tracing::warn!("History save error: {err:#}");
        }
    }

    /// Record a successful search and persist the new list.
    pub fn add(&mut self, place: &str) {
        if push_recent(&mut self.entries, place) {
            self.persist(&self.entries);
        }
    }
}

fn read_entries(path: &Path) -> Vec<String> {
    if !path.exists() {
        return Vec::new();
    }

    let parsed = fs::read_to_string(path)
        .with_context(|| format!("Failed to read history file: {}", path.display()))
        .and_then(|contents| {
            serde_json::from_str::<Vec<String>>(&contents)
                .with_context(|| format!("Failed to parse history file: {}", path.display()))
        });

    match parsed {
        Ok(mut entries) => {
            entries.truncate(MAX_HISTORY);
            entries
        }
        Err(err) => {
            tracing::warn!("Error loading history: {err:#}");
            Vec::new()
        }
    }
}

/// Write to a temp file next to `path`, then rename over it.
fn write_entries(path: &Path, entries: &[String]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create history directory: {}", dir.display()))?;

    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;

    serde_json::to_writer_pretty(&mut tmp, entries).context("Failed to serialize history")?;
    tmp.write_all(b"\n").context("Failed to write history")?;

    tmp.persist(path)
        .with_context(|| format!("Failed to write history file: {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> HistoryStore {
        HistoryStore::open(dir.path().join(HISTORY_FILE_NAME))
    }

    #[test]
    fn re_adding_moves_to_front() {
        let mut entries = Vec::new();
        push_recent(&mut entries, "Manila");
        push_recent(&mut entries, "Cebu");
        push_recent(&mut entries, "Manila");
        assert_eq!(entries, vec!["Manila", "Cebu"]);
    }

    #[test]
    fn keeps_only_the_ten_most_recent() {
        let mut entries = Vec::new();
        for i in 0..11 {
            push_recent(&mut entries, &format!("City {i}"));
        }
        assert_eq!(entries.len(), MAX_HISTORY);
        assert_eq!(entries.first().map(String::as_str), Some("City 10"));
        assert_eq!(entries.last().map(String::as_str), Some("City 1"));
        assert!(!entries.contains(&"City 0".to_string()));
    }

    #[test]
    fn blank_input_is_ignored_and_input_is_trimmed() {
        let mut entries = Vec::new();
        assert!(!push_recent(&mut entries, "   "));
        assert!(entries.is_empty());

        assert!(push_recent(&mut entries, "  Davao \n"));
        assert_eq!(entries, vec!["Davao"]);
    }

    #[test]
    fn dedup_is_case_sensitive() {
        let mut entries = Vec::new();
        push_recent(&mut entries, "manila");
        push_recent(&mut entries, "Manila");
        assert_eq!(entries, vec!["Manila", "manila"]);
    }

    #[test]
    fn add_persists_and_reopen_restores() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        assert!(store.entries().is_empty());

        store.add("Manila");
        store.add("Cebu");

        let reopened = store_in(&dir);
        assert_eq!(reopened.entries(), ["Cebu", "Manila"]);
        assert_eq!(store.load(), vec!["Cebu", "Manila"]);
    }

    #[test]
    fn corrupt_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(HISTORY_FILE_NAME);
        fs::write(&path, "{ not json").unwrap();

        let store = HistoryStore::open(&path);
        assert!(store.entries().is_empty());
    }

    #[test]
    fn non_array_json_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(HISTORY_FILE_NAME);
        fs::write(&path, r#"{"recent": ["Manila"]}"#).unwrap();

        assert!(HistoryStore::open(&path).entries().is_empty());
    }

    #[test]
    fn missing_parent_directory_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join(HISTORY_FILE_NAME);
        let mut store = HistoryStore::open(&path);

        store.add("Iloilo");

        assert!(path.exists());
        let raw = fs::read_to_string(&path).unwrap();
        let parsed: Vec<String> = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed, vec!["Iloilo"]);
    }

    #[test]
    fn persist_failure_is_swallowed() {
        let dir = tempfile::tempdir().unwrap();
        // The store path is an existing directory, so the rename must fail.
        let store = HistoryStore::open(dir.path());
        store.persist(&["Manila".to_string()]);
        assert!(dir.path().is_dir());
    }
}
