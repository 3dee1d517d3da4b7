//! Collections and utility functions for tasks and literature.
//!
//! This module provides `TaskDb` and `LiteratureDb`, the in-memory collections
//! that are loaded from and saved to a `KeyValueStore`, along with helpers for
//! date parsing, relative-date formatting, display labels and table output.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use chrono::{Datelike, Duration, Local, NaiveDate};

use crate::error::{Result, VoltaError};
use crate::fields::*;
use crate::literature::{non_empty, sample_literature, Literature, LiteratureDraft};
use crate::store::{load_json, save_json, KeyValueStore, Loaded, LITERATURE_KEY, TASKS_KEY};
use crate::task::{sample_tasks, Task, TaskDraft};

/// In-memory task collection, persisted wholesale under `TASKS_KEY`.
#[derive(Debug, Default, Clone)]
pub struct TaskDb {
    pub tasks: Vec<Task>,
}

impl TaskDb {
    /// Load tasks from the store.
    ///
    /// An empty store is seeded with the sample tasks and written back.
    /// Malformed stored data falls back to the samples without overwriting.
    pub fn load(store: &mut dyn KeyValueStore) -> Result<Self> {
        match load_json::<Vec<Task>>(store, TASKS_KEY)? {
            Loaded::Value(tasks) => {
                tracing::debug!(count = tasks.len(), "loaded tasks");
                Ok(TaskDb { tasks })
            }
            Loaded::Missing => {
                let db = TaskDb { tasks: sample_tasks() };
                db.save(store)?;
                tracing::info!(count = db.tasks.len(), "seeded task store with sample data");
                Ok(db)
            }
            Loaded::Malformed(e) => {
                tracing::warn!("stored tasks are malformed, using sample data: {e}");
                Ok(TaskDb { tasks: sample_tasks() })
            }
        }
    }

    /// Replace the stored collection with this one.
    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<()> {
        save_json(store, TASKS_KEY, &self.tasks)
    }

    /// Generate the next available task ID.
    pub fn next_id(&self) -> u64 {
        self.tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1
    }

    /// Get a task by ID.
    pub fn get(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Get a mutable reference to a task by ID.
    pub fn get_mut(&mut self, id: u64) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    fn require_mut(&mut self, id: u64) -> Result<&mut Task> {
        self.get_mut(id).ok_or(VoltaError::NotFound { kind: "Task", id })
    }

    /// Append a new task built from a validated draft; returns its ID.
    pub fn add(&mut self, draft: TaskDraft, today: NaiveDate) -> Result<u64> {
        let draft = draft.validate()?;
        let id = self.next_id();
        self.tasks.push(Task {
            id,
            name: draft.name,
            description: draft.description,
            phase: draft.phase,
            status: draft.status,
            priority: draft.priority,
            due_date: draft.due_date,
            deliverable: draft.deliverable,
            progress: draft.progress,
            related_literature: draft.related_literature.unwrap_or_default(),
            created_at: today,
            updated_at: today,
        });
        Ok(id)
    }

    /// Overwrite a task's editable fields. `createdAt` is kept.
    pub fn update(&mut self, id: u64, draft: TaskDraft, today: NaiveDate) -> Result<()> {
        let draft = draft.validate()?;
        let task = self.require_mut(id)?;
        task.name = draft.name;
        task.description = draft.description;
        task.phase = draft.phase;
        task.status = draft.status;
        task.priority = draft.priority;
        task.due_date = draft.due_date;
        task.deliverable = draft.deliverable;
        task.progress = draft.progress;
        if let Some(related) = draft.related_literature {
            task.related_literature = related;
        }
        task.updated_at = today;
        Ok(())
    }

    /// Completion shortcut: status complete, progress 100.
    pub fn complete(&mut self, id: u64, today: NaiveDate) -> Result<()> {
        self.require_mut(id)?.complete(today);
        Ok(())
    }

    /// Remove a task, returning it.
    pub fn remove(&mut self, id: u64) -> Result<Task> {
        let idx = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(VoltaError::NotFound { kind: "Task", id })?;
        Ok(self.tasks.remove(idx))
    }
}

/// Aggregate numbers shown above the literature list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiteratureStats {
    pub total: usize,
    pub saved: usize,
    pub recent: usize,
    pub journals: usize,
}

/// In-memory bibliography, persisted wholesale under `LITERATURE_KEY`.
#[derive(Debug, Default, Clone)]
pub struct LiteratureDb {
    pub items: Vec<Literature>,
}

impl LiteratureDb {
    /// Load literature from the store.
    ///
    /// When the key is empty, the bootstrap file (a JSON array) is tried once,
    /// then the built-in samples; whichever wins is written back.
    pub fn load(store: &mut dyn KeyValueStore, bootstrap: Option<&Path>) -> Result<Self> {
        match load_json::<Vec<Literature>>(store, LITERATURE_KEY)? {
            Loaded::Value(items) => {
                tracing::debug!(count = items.len(), "loaded literature");
                Ok(LiteratureDb { items })
            }
            Loaded::Missing => {
                let items = bootstrap.and_then(read_bootstrap).unwrap_or_else(|| {
                    tracing::info!("seeding literature store with sample data");
                    sample_literature()
                });
                let db = LiteratureDb { items };
                db.save(store)?;
                Ok(db)
            }
            Loaded::Malformed(e) => {
                tracing::warn!("stored literature is malformed, using sample data: {e}");
                Ok(LiteratureDb { items: sample_literature() })
            }
        }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<()> {
        save_json(store, LITERATURE_KEY, &self.items)
    }

    pub fn next_id(&self) -> u64 {
        self.items.iter().map(|i| i.id).max().unwrap_or(0) + 1
    }

    pub fn get(&self, id: u64) -> Option<&Literature> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn get_mut(&mut self, id: u64) -> Option<&mut Literature> {
        self.items.iter_mut().find(|i| i.id == id)
    }

    fn require_mut(&mut self, id: u64) -> Result<&mut Literature> {
        self.get_mut(id).ok_or(VoltaError::NotFound { kind: "Literature", id })
    }

    /// Append a new, unsaved entry; returns its ID.
    pub fn add(&mut self, draft: LiteratureDraft, today: NaiveDate) -> Result<u64> {
        let d = draft.validate()?;
        let id = self.next_id();
        self.items.push(Literature {
            id,
            title: d.title,
            authors: d.authors,
            year: d.year,
            journal: d.journal,
            volume: non_empty(d.volume),
            pages: non_empty(d.pages),
            abstract_text: d.abstract_text,
            tags: d.tags,
            doi: non_empty(d.doi),
            url: non_empty(d.url),
            status: d.status,
            priority: d.priority,
            saved: false,
            notes: non_empty(d.notes),
            added_date: today,
        });
        Ok(id)
    }

    /// Overwrite an entry's fields. The saved flag and added date are kept.
    pub fn update(&mut self, id: u64, draft: LiteratureDraft) -> Result<()> {
        let d = draft.validate()?;
        let item = self.require_mut(id)?;
        item.title = d.title;
        item.authors = d.authors;
        item.year = d.year;
        item.journal = d.journal;
        item.volume = non_empty(d.volume);
        item.pages = non_empty(d.pages);
        item.abstract_text = d.abstract_text;
        item.tags = d.tags;
        item.doi = non_empty(d.doi);
        item.url = non_empty(d.url);
        item.status = d.status;
        item.priority = d.priority;
        item.notes = non_empty(d.notes);
        Ok(())
    }

    /// Flip the saved flag; returns the new value.
    pub fn toggle_saved(&mut self, id: u64) -> Result<bool> {
        let item = self.require_mut(id)?;
        item.saved = !item.saved;
        Ok(item.saved)
    }

    pub fn remove(&mut self, id: u64) -> Result<Literature> {
        let idx = self
            .items
            .iter()
            .position(|i| i.id == id)
            .ok_or(VoltaError::NotFound { kind: "Literature", id })?;
        Ok(self.items.remove(idx))
    }

    pub fn stats(&self, recent_since_year: i32) -> LiteratureStats {
        let journals: BTreeSet<&str> = self.items.iter().map(|i| i.journal.as_str()).collect();
        LiteratureStats {
            total: self.items.len(),
            saved: self.items.iter().filter(|i| i.saved).count(),
            recent: self.items.iter().filter(|i| i.year >= recent_since_year).count(),
            journals: journals.len(),
        }
    }

    /// Distinct tags with usage counts, most used first.
    pub fn tag_counts(&self) -> Vec<(String, usize)> {
        let mut counts: std::collections::BTreeMap<String, usize> = std::collections::BTreeMap::new();
        for item in &self.items {
            for tag in &item.tags {
                *counts.entry(tag.to_lowercase()).or_default() += 1;
            }
        }
        let mut out: Vec<(String, usize)> = counts.into_iter().collect();
        out.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        out
    }
}

fn read_bootstrap(path: &Path) -> Option<Vec<Literature>> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no bootstrap file");
        return None;
    }
    match fs::read_to_string(path).map_err(VoltaError::from).and_then(|raw| {
        serde_json::from_str::<Vec<Literature>>(&raw).map_err(VoltaError::from)
    }) {
        Ok(items) => {
            tracing::info!(count = items.len(), path = %path.display(), "loaded literature bootstrap file");
            Some(items)
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), "ignoring unreadable bootstrap file: {e}");
            None
        }
    }
}

/// Parse human-readable due date input.
///
/// Supports:
/// - "today", "tomorrow"
/// - "monday", "next friday", ...
/// - "end of week", "end of month"
/// - "in 3d", "in 2w"
/// - "YYYY-MM-DD" format
pub fn parse_due_input(s: &str, today: NaiveDate) -> Option<NaiveDate> {
    let s = s.trim().to_lowercase();

    match s.as_str() {
        "today" => return Some(today),
        "tomorrow" => return Some(today + Duration::days(1)),
        "end of week" | "eow" => {
            let weekday = today.weekday().num_days_from_monday() as i64;
            return Some(today + Duration::days(6 - weekday));
        }
        "end of month" | "eom" => {
            let (year, month) = if today.month() == 12 {
                (today.year() + 1, 1)
            } else {
                (today.year(), today.month() + 1)
            };
            let first_of_next = NaiveDate::from_ymd_opt(year, month, 1)?;
            return Some(first_of_next - Duration::days(1));
        }
        _ => {}
    }

    if let Some(rest) = s.strip_prefix("in ") {
        if let Some(nd) = rest.strip_suffix('d') {
            if let Ok(days) = nd.trim().parse::<i64>() {
                return today.checked_add_signed(Duration::try_days(days)?);
            }
        }
        if let Some(nw) = rest.strip_suffix('w') {
            if let Ok(weeks) = nw.trim().parse::<i64>() {
                return today.checked_add_signed(Duration::try_weeks(weeks)?);
            }
        }
    }

    let weekdays = [
        ("monday", 0), ("tuesday", 1), ("wednesday", 2), ("thursday", 3),
        ("friday", 4), ("saturday", 5), ("sunday", 6),
    ];
    let current = today.weekday().num_days_from_monday() as i64;
    for (day_name, target) in weekdays {
        let ahead = (target + 7 - current) % 7;
        if s == day_name {
            return Some(today + Duration::days(ahead));
        }
        if s == format!("next {}", day_name) {
            let days = if ahead == 0 { 7 } else { ahead + 7 };
            return Some(today + Duration::days(days));
        }
    }

    NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()
}

/// Whole days from `today` until `date` (negative when past).
pub fn days_until(date: NaiveDate, today: NaiveDate) -> i64 {
    (date - today).num_days()
}

/// Due within `window` days and not yet past.
pub fn is_due_within(date: NaiveDate, today: NaiveDate, window: i64) -> bool {
    let d = days_until(date, today);
    (0..=window).contains(&d)
}

/// Format a due date relative to today ("today", "tomorrow", "in 3d", "2d late").
pub fn format_due_relative(due: NaiveDate, today: NaiveDate) -> String {
    match days_until(due, today) {
        0 => "today".into(),
        1 => "tomorrow".into(),
        n if n > 1 => format!("in {}d", n),
        n => format!("{}d late", -n),
    }
}

/// "Dec 15, 2025".
pub fn format_date_short(d: NaiveDate) -> String {
    d.format("%b %-d, %Y").to_string()
}

/// "Monday, December 15, 2025".
pub fn format_date_long(d: NaiveDate) -> String {
    d.format("%A, %B %-d, %Y").to_string()
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Format a task status for display.
pub fn format_status(s: TaskStatus) -> &'static str {
    match s {
        TaskStatus::NotStarted => "Not Started",
        TaskStatus::InProgress => "In Progress",
        TaskStatus::UnderReview => "Under Review",
        TaskStatus::Complete => "Complete",
    }
}

/// Format a literature status for display.
pub fn format_literature_status(s: LiteratureStatus) -> &'static str {
    match s {
        LiteratureStatus::ToRead => "To Read",
        LiteratureStatus::Reading => "Reading",
        LiteratureStatus::Reviewed => "Reviewed",
        LiteratureStatus::Cited => "Cited",
    }
}

/// Format a literature list filter for display.
pub fn format_literature_filter(f: LiteratureFilter) -> &'static str {
    match f {
        LiteratureFilter::All => "All",
        LiteratureFilter::Saved => "Saved",
        LiteratureFilter::Recent => "Recent",
        LiteratureFilter::Status(s) => format_literature_status(s),
    }
}

/// Format a priority for display.
pub fn format_priority(p: Priority) -> &'static str {
    match p {
        Priority::Low => "Low",
        Priority::Medium => "Medium",
        Priority::High => "High",
    }
}

/// Roman numeral of a phase.
pub fn format_phase(p: Phase) -> &'static str {
    match p {
        Phase::I => "I",
        Phase::II => "II",
        Phase::III => "III",
        Phase::IV => "IV",
        Phase::V => "V",
    }
}

/// Built-in descriptive name of a phase.
pub fn phase_name(p: Phase) -> &'static str {
    match p {
        Phase::I => "Foundation & Definition",
        Phase::II => "Analysis & Evaluation",
        Phase::III => "Strategy & Synthesis",
        Phase::IV => "Finalization",
        Phase::V => "Delivery",
    }
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out = String::new();
        for (i, ch) in s.chars().enumerate() {
            if i + 1 >= width {
                out.push('…');
                break;
            }
            out.push(ch);
        }
        out
    }
}

/// Print tasks in a formatted table.
pub fn print_task_table(tasks: &[&Task], today: NaiveDate) {
    println!(
        "{:<4} {:<5} {:<13} {:<7} {:>4} {:<10} {}",
        "ID", "Phase", "Status", "Pri", "Prog", "Due", "Name"
    );
    for t in tasks {
        println!(
            "{:<4} {:<5} {:<13} {:<7} {:>3}% {:<10} {}",
            t.id,
            format_phase(t.phase),
            format_status(t.status),
            format_priority(t.priority),
            t.progress,
            format_due_relative(t.due_date, today),
            t.name
        );
    }
}

/// Print literature entries in a formatted table.
pub fn print_literature_table(items: &[&Literature]) {
    println!(
        "{:<4} {:<5} {:<9} {:<5} {:<24} {:<22} {}",
        "ID", "Year", "Status", "Saved", "Authors", "Journal", "Title"
    );
    for i in items {
        println!(
            "{:<4} {:<5} {:<9} {:<5} {:<24} {:<22} {}",
            i.id,
            i.year,
            format_literature_status(i.status),
            if i.saved { "*" } else { "" },
            truncate(&crate::citation::short_authors(i), 24),
            truncate(&i.journal, 22),
            i.title
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_empty_store_is_seeded_and_persisted() {
        let mut store = MemoryStore::default();
        let db = TaskDb::load(&mut store).unwrap();
        assert_eq!(db.tasks.len(), 3);
        assert!(store.get(TASKS_KEY).unwrap().is_some());

        let lit = LiteratureDb::load(&mut store, None).unwrap();
        assert_eq!(lit.items.len(), 2);
        assert!(store.get(LITERATURE_KEY).unwrap().is_some());
    }

    #[test]
    fn test_malformed_store_falls_back_without_overwriting() {
        let mut store = MemoryStore::default();
        store.set(TASKS_KEY, "not json").unwrap();
        let db = TaskDb::load(&mut store).unwrap();
        assert_eq!(db.tasks, sample_tasks());
        assert_eq!(store.get(TASKS_KEY).unwrap().as_deref(), Some("not json"));
    }

    #[test]
    fn test_bootstrap_file_seeds_literature() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("literature-db.json");
        let mut items = sample_literature();
        items.truncate(1);
        items[0].id = 42;
        fs::write(&path, serde_json::to_string(&items).unwrap()).unwrap();

        let mut store = MemoryStore::default();
        let db = LiteratureDb::load(&mut store, Some(&path)).unwrap();
        assert_eq!(db.items.len(), 1);
        assert_eq!(db.items[0].id, 42);

        // Broken bootstrap falls back to samples.
        fs::write(&path, "[{").unwrap();
        let mut store = MemoryStore::default();
        let db = LiteratureDb::load(&mut store, Some(&path)).unwrap();
        assert_eq!(db.items.len(), 2);
    }

    #[test]
    fn test_task_ids_are_monotonic() {
        let mut db = TaskDb::default();
        let today = d(2026, 1, 1);
        let mut draft = TaskDraft::new(today);
        draft.name = "First".into();
        assert_eq!(db.add(draft.clone(), today).unwrap(), 1);
        assert_eq!(db.add(draft.clone(), today).unwrap(), 2);
        db.remove(1).unwrap();
        assert_eq!(db.add(draft, today).unwrap(), 3);
    }

    #[test]
    fn test_task_update_keeps_created_at_and_links() {
        let mut db = TaskDb { tasks: sample_tasks() };
        let today = d(2026, 1, 3);
        let mut draft = TaskDraft::from_task(db.get(1).unwrap());
        draft.name = "Renamed".into();
        draft.related_literature = None;
        db.update(1, draft, today).unwrap();

        let task = db.get(1).unwrap();
        assert_eq!(task.name, "Renamed");
        assert_eq!(task.created_at, d(2025, 12, 1));
        assert_eq!(task.updated_at, today);
        assert_eq!(task.related_literature, vec![1, 2, 3]);
    }

    #[test]
    fn test_complete_and_missing_ids() {
        let mut db = TaskDb { tasks: sample_tasks() };
        let today = d(2026, 1, 3);
        db.complete(2, today).unwrap();
        let t = db.get(2).unwrap();
        assert_eq!((t.status, t.progress), (TaskStatus::Complete, 100));

        assert!(matches!(db.complete(99, today), Err(VoltaError::NotFound { id: 99, .. })));
        assert!(db.remove(99).is_err());
    }

    #[test]
    fn test_literature_edit_preserves_saved_and_added_date() {
        let mut db = LiteratureDb { items: sample_literature() };
        let mut draft = LiteratureDraft::from_literature(db.get(1).unwrap());
        draft.volume = String::new();
        draft.title = "Retitled".into();
        db.update(1, draft).unwrap();

        let item = db.get(1).unwrap();
        assert_eq!(item.title, "Retitled");
        assert!(item.saved);
        assert_eq!(item.added_date, d(2024, 1, 15));
        assert_eq!(item.volume, None);
    }

    #[test]
    fn test_literature_add_toggle_and_stats() {
        let mut db = LiteratureDb { items: sample_literature() };
        let draft = LiteratureDraft {
            title: "Lithium supply risk".into(),
            authors: "Ortiz, M.".into(),
            journal: "Nature Energy".into(),
            abstract_text: "Supply chains.".into(),
            tags: vec!["policy".into()],
            ..LiteratureDraft::new(2019)
        };
        let id = db.add(draft, d(2026, 1, 1)).unwrap();
        assert_eq!(id, 3);
        assert!(!db.get(3).unwrap().saved);

        assert!(db.toggle_saved(3).unwrap());
        let stats = db.stats(2023);
        assert_eq!(stats, LiteratureStats { total: 3, saved: 3, recent: 2, journals: 2 });
        assert!(!db.toggle_saved(3).unwrap());
    }

    #[test]
    fn test_parse_due_input() {
        let today = d(2026, 1, 7); // Wednesday
        assert_eq!(parse_due_input("today", today), Some(today));
        assert_eq!(parse_due_input("in 3d", today), Some(d(2026, 1, 10)));
        assert_eq!(parse_due_input("in 2w", today), Some(d(2026, 1, 21)));
        assert_eq!(parse_due_input("friday", today), Some(d(2026, 1, 9)));
        assert_eq!(parse_due_input("next wednesday", today), Some(d(2026, 1, 14)));
        assert_eq!(parse_due_input("eow", today), Some(d(2026, 1, 11)));
        assert_eq!(parse_due_input("eom", today), Some(d(2026, 1, 31)));
        assert_eq!(parse_due_input("2026-02-01", today), Some(d(2026, 2, 1)));
        assert_eq!(parse_due_input("someday", today), None);
    }

    #[test]
    fn test_parse_due_input_out_of_range_offsets() {
        let today = d(2026, 1, 7);
        assert_eq!(parse_due_input("in 99999999999d", today), None);
        assert_eq!(parse_due_input("in 9999999999999w", today), None);
        assert_eq!(parse_due_input("in 9223372036854775807d", today), None);
    }

    #[test]
    fn test_format_due_relative() {
        let today = d(2026, 1, 7);
        assert_eq!(format_due_relative(today, today), "today");
        assert_eq!(format_due_relative(d(2026, 1, 8), today), "tomorrow");
        assert_eq!(format_due_relative(d(2026, 1, 12), today), "in 5d");
        assert_eq!(format_due_relative(d(2026, 1, 5), today), "2d late");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a longer title", 6), "a lon…");
    }
}
