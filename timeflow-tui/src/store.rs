use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
#[cfg(unix)]
use std::{io::Write, os::unix::fs::OpenOptionsExt};

use timeflow_client::domain::DailyLog;

use crate::app::draft::DayDraft;
use crate::config::TimeflowConfig;

/// A rejected submission copied aside to seed a resubmission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StagedEdit {
    pub id: i64,
    pub week_start_date: NaiveDate,
    pub daily_logs: Vec<DailyLog>,
}

/// Typed file-backed store for everything the client persists between runs:
/// the access token, the refresh cookie, per-week unsent drafts and the
/// staged rejected-edit payload. Plain read/overwrite, last writer wins.
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
}

fn secure_write(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    #[cfg(unix)]
    {
        std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)?
            .write_all(content.as_bytes())?;
    }

    #[cfg(not(unix))]
    {
        std::fs::write(path, content)?;
    }

    Ok(())
}

fn read_trimmed(path: &Path) -> Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let raw = raw.trim().to_string();
    if raw.is_empty() {
        return Ok(None);
    }
    Ok(Some(raw))
}

fn remove_if_exists(path: &Path) -> Result<()> {
    if path.exists() {
        std::fs::remove_file(path)?;
    }
    Ok(())
}

impl LocalStore {
    pub fn open() -> Result<Self> {
        Ok(Self {
            root: TimeflowConfig::root_path()?,
        })
    }

    /// Store rooted at an explicit directory, for tests.
    #[cfg(test)]
    pub fn with_root(root: PathBuf) -> Self {
        Self { root }
    }

    fn token_path(&self) -> PathBuf {
        self.root.join("token")
    }

    fn refresh_cookie_path(&self) -> PathBuf {
        self.root.join("refresh_cookie")
    }

    fn draft_path(&self, week_start: NaiveDate) -> PathBuf {
        self.root
            .join("drafts")
            .join(format!("draft_timesheet_{}.json", week_start.format("%Y-%m-%d")))
    }

    fn staged_edit_path(&self) -> PathBuf {
        self.root.join("edit_timesheet.json")
    }

    pub fn token(&self) -> Result<Option<String>> {
        read_trimmed(&self.token_path())
    }

    pub fn set_token(&self, token: &str) -> Result<()> {
        secure_write(&self.token_path(), token)
    }

    pub fn clear_token(&self) -> Result<()> {
        remove_if_exists(&self.token_path())
    }

    pub fn refresh_cookie(&self) -> Result<Option<String>> {
        read_trimmed(&self.refresh_cookie_path())
    }

    pub fn set_refresh_cookie(&self, value: &str) -> Result<()> {
        secure_write(&self.refresh_cookie_path(), value)
    }

    pub fn clear_refresh_cookie(&self) -> Result<()> {
        remove_if_exists(&self.refresh_cookie_path())
    }

    pub fn load_draft(&self, week_start: NaiveDate) -> Result<Option<Vec<DayDraft>>> {
        let path = self.draft_path(week_start);
        if !path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read draft at {}", path.display()))?;
        let days = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse draft at {}", path.display()))?;
        Ok(Some(days))
    }

    pub fn save_draft(&self, week_start: NaiveDate, days: &[DayDraft]) -> Result<()> {
        let path = self.draft_path(week_start);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, serde_json::to_string(days)?)?;
        Ok(())
    }

    pub fn clear_draft(&self, week_start: NaiveDate) -> Result<()> {
        remove_if_exists(&self.draft_path(week_start))
    }

    pub fn staged_edit(&self) -> Result<Option<StagedEdit>> {
        let path = self.staged_edit_path();
        if !path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read staged edit at {}", path.display()))?;
        let staged = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse staged edit at {}", path.display()))?;
        Ok(Some(staged))
    }

    pub fn stage_edit(&self, staged: &StagedEdit) -> Result<()> {
        let path = self.staged_edit_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, serde_json::to_string(staged)?)?;
        Ok(())
    }

    pub fn clear_staged_edit(&self) -> Result<()> {
        remove_if_exists(&self.staged_edit_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::draft::EntryDraft;
    use timeflow_client::domain::TaskEntry;

    fn temp_store(name: &str) -> LocalStore {
        let root = std::env::temp_dir()
            .join("timeflow-tui-tests")
            .join(format!("{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&root);
        LocalStore::with_root(root)
    }

    fn week() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 24).unwrap()
    }

    #[test]
    fn token_round_trip_and_clear() {
        let store = temp_store("token");
        assert_eq!(store.token().unwrap(), None);

        store.set_token("abc.def.ghi").unwrap();
        assert_eq!(store.token().unwrap().as_deref(), Some("abc.def.ghi"));

        store.clear_token().unwrap();
        assert_eq!(store.token().unwrap(), None);
    }

    #[test]
    fn draft_is_keyed_by_week_start() {
        let store = temp_store("draft");
        let days = vec![DayDraft {
            date: week(),
            start_time: "09:00".to_string(),
            end_time: "".to_string(),
            entries: vec![EntryDraft {
                task_id: "3".to_string(),
                duration: "".to_string(),
            }],
        }];

        store.save_draft(week(), &days).unwrap();
        assert_eq!(store.load_draft(week()).unwrap(), Some(days));

        let other_week = week() + chrono::Duration::days(7);
        assert_eq!(store.load_draft(other_week).unwrap(), None);

        store.clear_draft(week()).unwrap();
        assert_eq!(store.load_draft(week()).unwrap(), None);
    }

    #[test]
    fn staged_edit_round_trip() {
        let store = temp_store("staged");
        let staged = StagedEdit {
            id: 17,
            week_start_date: week(),
            daily_logs: vec![DailyLog {
                date: week(),
                start_time: "09:00".to_string(),
                end_time: "17:00".to_string(),
                task_entries: vec![TaskEntry {
                    task_id: 3,
                    duration: 7.5,
                }],
            }],
        };

        store.stage_edit(&staged).unwrap();
        let loaded = store.staged_edit().unwrap().unwrap();
        assert_eq!(loaded.id, 17);
        assert_eq!(loaded.daily_logs, staged.daily_logs);

        store.clear_staged_edit().unwrap();
        assert!(store.staged_edit().unwrap().is_none());
    }
}
