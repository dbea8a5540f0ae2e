use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::HISTORY_WINDOW_DAYS;
use crate::error::Result;
use crate::roster::RosterEntry;
use crate::schedule::types::{DaySchedule, Position, TimeSlot};

/// Everything stored about one worked day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayRecord {
    pub date: NaiveDate,
    #[serde(default)]
    pub staff: Vec<RosterEntry>,
    /// Person who did the pre-open grill prep
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grill_opener: Option<String>,
    #[serde(default)]
    pub one_griller_only: bool,
    /// Absent until a schedule has been generated for the day
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<DaySchedule>,
}

/// Frozen, read-only snapshot of past schedules used while scoring one day
#[derive(Debug, Clone, Default)]
pub struct HistoryView {
    frequency: HashMap<(String, Position), u32>,
    previous_day: HashSet<(String, Position, TimeSlot)>,
    days: usize,
}

impl HistoryView {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a view from past schedules, most recent first.
    ///
    /// Only the first `HISTORY_WINDOW_DAYS` entries are read. The first entry
    /// is the previous day for same-slot checks.
    pub fn from_schedules<'a, I>(schedules: I) -> Self
    where
        I: IntoIterator<Item = &'a DaySchedule>,
    {
        let mut view = Self::default();

        for (index, schedule) in schedules.into_iter().take(HISTORY_WINDOW_DAYS).enumerate() {
            for (slot, assignments) in &schedule.slots {
                for assignment in assignments {
                    let Some(person_id) = assignment.person_id() else {
                        continue;
                    };
                    *view
                        .frequency
                        .entry((person_id.to_string(), assignment.position))
                        .or_insert(0) += 1;
                    if index == 0 {
                        view.previous_day
                            .insert((person_id.to_string(), assignment.position, *slot));
                    }
                }
            }
            view.days += 1;
        }

        view
    }

    /// Builds a view for scheduling `today` from stored records.
    ///
    /// Records dated `today` or later are ignored, so regenerating a day never
    /// reads its own earlier output. Records without a schedule are skipped.
    pub fn from_records(records: &[DayRecord], today: NaiveDate) -> Self {
        let mut past: Vec<&DayRecord> = records
            .iter()
            .filter(|r| r.date < today && r.schedule.is_some())
            .collect();
        past.sort_by(|a, b| b.date.cmp(&a.date));

        let view = Self::from_schedules(past.iter().filter_map(|r| r.schedule.as_ref()));
        debug!(days = view.days, %today, "built history view");
        view
    }

    /// Times the person held the position across the window
    pub fn frequency(&self, person_id: &str, position: Position) -> u32 {
        self.frequency
            .get(&(person_id.to_string(), position))
            .copied()
            .unwrap_or(0)
    }

    /// Whether the person held this exact position in this exact slot on the previous recorded day
    pub fn worked_same_slot_previous_day(&self, person_id: &str, position: Position, slot: TimeSlot) -> bool {
        self.previous_day
            .contains(&(person_id.to_string(), position, slot))
    }

    pub fn days(&self) -> usize {
        self.days
    }
}

/// JSON-file backed store of the trailing window of day records
#[derive(Debug)]
pub struct HistoryStore {
    path: PathBuf,
    records: Vec<DayRecord>,
    window: usize,
}

impl HistoryStore {
    /// Opens the store. A missing or unreadable file starts an empty history.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let records = match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<Vec<DayRecord>>(&raw) {
                Ok(records) => records,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "history file is malformed, starting empty");
                    Vec::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not read history file, starting empty");
                Vec::new()
            }
        };

        let mut store = Self {
            path,
            records,
            window: HISTORY_WINDOW_DAYS,
        };
        store.normalize();
        store
    }

    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self.normalize();
        self
    }

    /// Records, newest first
    pub fn records(&self) -> &[DayRecord] {
        &self.records
    }

    pub fn get(&self, date: NaiveDate) -> Option<&DayRecord> {
        self.records.iter().find(|r| r.date == date)
    }

    /// Frozen view for scheduling `date`
    pub fn view_for(&self, date: NaiveDate) -> HistoryView {
        HistoryView::from_records(&self.records, date)
    }

    /// Inserts or replaces the record for its date, then re-sorts and trims the window.
    ///
    /// Returns false when the record is older than every day the window keeps;
    /// the store is left unchanged in that case.
    pub fn merge(&mut self, record: DayRecord) -> bool {
        if self.records.len() >= self.window
            && !self.records.iter().any(|r| r.date == record.date)
            && self.records.iter().all(|r| r.date > record.date)
        {
            warn!(date = %record.date, window = self.window, "record is older than the history window, not stored");
            return false;
        }

        self.records.retain(|r| r.date != record.date);
        self.records.push(record);
        self.normalize();
        true
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self) -> Result<()> {
        write_records(&self.path, &self.records)
    }

    fn normalize(&mut self) {
        self.records.sort_by(|a, b| b.date.cmp(&a.date));
        self.records.dedup_by(|a, b| a.date == b.date);
        self.records.truncate(self.window);
    }
}

/// Writes records as the JSON history file, creating its directory if needed
pub fn write_records(path: &Path, records: &[DayRecord]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(records)?;
    std::fs::write(path, json)?;
    debug!(path = %path.display(), records = records.len(), "saved history");
    Ok(())
}
