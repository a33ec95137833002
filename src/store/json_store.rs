use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::store::schema::ProgressData;

const PROGRESS_FILE: &str = "progress.json";

pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("civicprep");
        Self::with_base_dir(base_dir)
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)
            .with_context(|| format!("creating data directory {}", base_dir.display()))?;
        Ok(Self { base_dir })
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    /// Load progress. Returns None if the file exists but cannot be parsed.
    pub fn load_progress(&self) -> Option<ProgressData> {
        let path = self.file_path(PROGRESS_FILE);
        if !path.exists() {
            return Some(ProgressData::default());
        }
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to read progress");
                return None;
            }
        };
        match serde_json::from_str(&content) {
            Ok(progress) => {
                tracing::debug!(path = %path.display(), "loaded progress");
                Some(progress)
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to parse progress");
                None
            }
        }
    }

    /// Saved progress, or a fresh start if the file is unreadable or from an old schema.
    pub fn load_progress_or_default(&self) -> ProgressData {
        match self.load_progress() {
            Some(progress) if !progress.needs_reset() => progress,
            Some(progress) => {
                tracing::warn!(
                    schema_version = progress.schema_version,
                    "progress schema is outdated, starting fresh"
                );
                ProgressData::default()
            }
            None => {
                tracing::warn!("progress file is unreadable, starting fresh");
                ProgressData::default()
            }
        }
    }

    /// Write via a synced temp file and rename so a crash never leaves a torn file.
    pub fn save_progress(&self, data: &ProgressData) -> Result<()> {
        let path = self.file_path(PROGRESS_FILE);
        let tmp_path = path.with_extension("json.tmp");

        let json = serde_json::to_string_pretty(data)?;
        let mut file = fs::File::create(&tmp_path)
            .with_context(|| format!("creating {}", tmp_path.display()))?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        tracing::debug!(path = %path.display(), bytes = json.len(), "saved progress");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn make_test_store() -> (TempDir, JsonStore) {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        (dir, store)
    }

    #[test]
    fn test_missing_file_loads_default() {
        let (_dir, store) = make_test_store();
        assert_eq!(store.load_progress(), Some(ProgressData::default()));
    }

    #[test]
    fn test_save_then_load() {
        let (_dir, store) = make_test_store();
        let day = NaiveDate::from_ymd_opt(2026, 7, 4).unwrap();
        let mut progress = ProgressData::default();
        progress.record_answer("q1", "Symbols and Holidays", true, day);
        progress.record_mock_test(day, 9, 10).unwrap();

        store.save_progress(&progress).unwrap();
        assert_eq!(store.load_progress(), Some(progress));
    }

    #[test]
    fn test_corrupt_file_loads_none() {
        let (_dir, store) = make_test_store();
        fs::write(store.file_path(PROGRESS_FILE), "{ not json").unwrap();
        assert_eq!(store.load_progress(), None);
    }

    #[test]
    fn test_load_or_default_keeps_current_progress() {
        let (_dir, store) = make_test_store();
        let day = NaiveDate::from_ymd_opt(2026, 7, 4).unwrap();
        let mut progress = ProgressData::default();
        progress.record_answer("q7", "Geography", false, day);
        store.save_progress(&progress).unwrap();
        assert_eq!(store.load_progress_or_default(), progress);
    }

    #[test]
    fn test_load_or_default_resets_corrupt_and_stale_files() {
        let (_dir, store) = make_test_store();
        fs::write(store.file_path(PROGRESS_FILE), "{ not json").unwrap();
        assert_eq!(store.load_progress_or_default(), ProgressData::default());

        fs::write(
            store.file_path(PROGRESS_FILE),
            r#"{"schema_version": 0, "practiced_questions": ["q1"]}"#,
        )
        .unwrap();
        assert!(store.load_progress().unwrap().needs_reset());
        assert_eq!(store.load_progress_or_default(), ProgressData::default());
    }

    #[test]
    fn test_save_leaves_no_tmp_file() {
        let (dir, store) = make_test_store();
        store.save_progress(&ProgressData::default()).unwrap();

        let tmp_files: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().and_then(|x| x.to_str()) == Some("tmp"))
            .collect();
        assert!(tmp_files.is_empty(), "no residual .tmp files");
        assert!(store.file_path(PROGRESS_FILE).exists());
    }

    #[test]
    fn test_with_base_dir_creates_nested_dirs() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        let store = JsonStore::with_base_dir(nested.clone()).unwrap();
        store.save_progress(&ProgressData::default()).unwrap();
        assert!(nested.join(PROGRESS_FILE).exists());
    }
}
