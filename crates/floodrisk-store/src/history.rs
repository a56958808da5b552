//! JSON-lines history file. Entries are only ever appended.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use floodrisk_core::{AssessmentResult, RiskLevel};
use tracing::{debug, info};

use crate::StoreError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimeWindow {
    #[default]
    All,
    /// Last 7 days.
    Week,
    /// Last 30 days.
    Month,
}

impl TimeWindow {
    fn max_age(self) -> Option<Duration> {
        match self {
            Self::All => None,
            Self::Week => Some(Duration::days(7)),
            Self::Month => Some(Duration::days(30)),
        }
    }
}

impl FromStr for TimeWindow {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            other => Err(StoreError::UnknownWindow(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HistoryFilter {
    pub window: TimeWindow,
    pub risk: Option<RiskLevel>,
}

impl HistoryFilter {
    pub fn matches(&self, entry: &AssessmentResult, now: DateTime<Utc>) -> bool {
        if let Some(max_age) = self.window.max_age() {
            let age = now.signed_duration_since(entry.produced_at()).abs();
            if age > max_age {
                return false;
            }
        }
        self.risk.is_none_or(|risk| entry.risk_level() == risk)
    }
}

pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    pub fn append(&self, entry: &AssessmentResult) -> Result<(), StoreError> {
        let mut line = serde_json::to_string(entry)?;
        line.push('\n');

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_error(e))?;
        file.write_all(line.as_bytes())
            .map_err(|e| self.io_error(e))?;

        info!(path = %self.path.display(), level = %entry.risk_level(), "saved assessment to history");
        Ok(())
    }

    /// All entries in file order. A missing file is an empty history.
    pub fn load(&self) -> Result<Vec<AssessmentResult>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.io_error(e)),
        };

        let mut entries = Vec::new();
        for (idx, line) in raw.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let entry = serde_json::from_str(line).map_err(|source| StoreError::Corrupt {
                line: idx + 1,
                source,
            })?;
            entries.push(entry);
        }
        debug!(path = %self.path.display(), count = entries.len(), "loaded history");
        Ok(entries)
    }

    /// Entries passing `filter`, newest first.
    pub fn query(
        &self,
        filter: &HistoryFilter,
        now: DateTime<Utc>,
    ) -> Result<Vec<AssessmentResult>, StoreError> {
        let mut entries: Vec<_> = self
            .load()?
            .into_iter()
            .filter(|entry| filter.matches(entry, now))
            .collect();
        entries.sort_by_key(|entry| std::cmp::Reverse(entry.produced_at()));
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use floodrisk_core::{AnalysisModel, ManualInput, Region, Season};

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 30, 12, 0, 0).unwrap()
    }

    fn manual(water: &str, days_ago: i64) -> AssessmentResult {
        let signals = ManualInput {
            water_level: Some(water.into()),
            rainfall: Some("0".into()),
            terrain: Some("flat".into()),
            soil: Some("dry".into()),
        }
        .normalize(Region::Inland, Season::Winter)
        .unwrap();
        AssessmentResult::from_signals(
            &signals,
            AnalysisModel::Standard,
            now() - Duration::days(days_ago),
        )
    }

    #[test]
    fn missing_file_is_empty_history() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::open(dir.path().join("none.jsonl"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn append_then_load_keeps_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::open(dir.path().join("nested/history.jsonl"));
        let first = manual("0.5", 3);
        let second = manual("4", 1);
        store.append(&first).unwrap();
        store.append(&second).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded, vec![first, second]);
    }

    #[test]
    fn query_filters_by_window_and_sorts_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::open(dir.path().join("history.jsonl"));
        for days in [40, 2, 10, 6] {
            store.append(&manual("1", days)).unwrap();
        }

        let week = HistoryFilter {
            window: TimeWindow::Week,
            risk: None,
        };
        let found = store.query(&week, now()).unwrap();
        let ages: Vec<i64> = found
            .iter()
            .map(|e| (now() - e.produced_at()).num_days())
            .collect();
        assert_eq!(ages, vec![2, 6]);

        let month = HistoryFilter {
            window: TimeWindow::Month,
            risk: None,
        };
        assert_eq!(store.query(&month, now()).unwrap().len(), 3);
        assert_eq!(store.query(&HistoryFilter::default(), now()).unwrap().len(), 4);
    }

    #[test]
    fn query_filters_by_risk_level() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::open(dir.path().join("history.jsonl"));
        // 0.5 m → 5 + 15 = 20 (Low); 4 m → 40 + 15 = 55 (Moderate)
        store.append(&manual("0.5", 1)).unwrap();
        store.append(&manual("4", 1)).unwrap();
        store
            .append(&AssessmentResult::degraded(Region::Coastal, Season::Fall, now()))
            .unwrap();

        let moderate = HistoryFilter {
            window: TimeWindow::All,
            risk: Some(RiskLevel::MODERATE),
        };
        assert_eq!(store.query(&moderate, now()).unwrap().len(), 2);
    }

    #[test]
    fn corrupt_line_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.jsonl");
        let store = HistoryStore::open(&path);
        store.append(&manual("1", 0)).unwrap();
        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        writeln!(file, "{{not json").unwrap();

        assert!(matches!(store.load(), Err(StoreError::Corrupt { line: 2, .. })));
    }

    #[test]
    fn window_parsing() {
        assert_eq!("Week".parse::<TimeWindow>().unwrap(), TimeWindow::Week);
        assert!(matches!(
            "year".parse::<TimeWindow>(),
            Err(StoreError::UnknownWindow(_))
        ));
    }
}
