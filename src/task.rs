//! Task data structure and related functionality.
//!
//! This module defines the `Task` record as it is kept in the store, the
//! `TaskDraft` that forms and CLI flags bind to, and the sample records used to
//! seed an empty store.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Result, VoltaError};
use crate::fields::*;

/// A unit of project work, bucketed by phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub phase: Phase,
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: Priority,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub deliverable: String,
    #[serde(default)]
    pub progress: u8,
    #[serde(default)]
    pub related_literature: Vec<u64>,
    pub created_at: NaiveDate,
    pub updated_at: NaiveDate,
}

impl Task {
    pub fn is_complete(&self) -> bool {
        self.status == TaskStatus::Complete
    }

    /// Mark the task complete. Always sets progress to 100.
    pub fn complete(&mut self, today: NaiveDate) {
        self.status = TaskStatus::Complete;
        self.progress = 100;
        self.updated_at = today;
    }

    /// Deliverable for display, with a placeholder when none is set.
    pub fn deliverable_text(&self) -> &str {
        if self.deliverable.is_empty() {
            "No deliverable specified"
        } else {
            &self.deliverable
        }
    }
}

/// Typed form values for creating or editing a task.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskDraft {
    pub name: String,
    pub description: String,
    pub phase: Phase,
    pub status: TaskStatus,
    pub priority: Priority,
    pub due_date: NaiveDate,
    pub deliverable: String,
    pub progress: u8,
    /// `None` keeps whatever the task already links to.
    pub related_literature: Option<Vec<u64>>,
}

impl TaskDraft {
    /// Defaults of a fresh add form: phase I, not started, due in a week.
    pub fn new(today: NaiveDate) -> Self {
        TaskDraft {
            name: String::new(),
            description: String::new(),
            phase: Phase::I,
            status: TaskStatus::NotStarted,
            priority: Priority::Medium,
            due_date: today + chrono::Duration::days(7),
            deliverable: String::new(),
            progress: 0,
            related_literature: None,
        }
    }

    pub fn from_task(task: &Task) -> Self {
        TaskDraft {
            name: task.name.clone(),
            description: task.description.clone(),
            phase: task.phase,
            status: task.status,
            priority: task.priority,
            due_date: task.due_date,
            deliverable: task.deliverable.clone(),
            progress: task.progress,
            related_literature: Some(task.related_literature.clone()),
        }
    }

    /// Trim text fields, clamp progress and reject an empty name.
    pub fn validate(mut self) -> Result<Self> {
        self.name = self.name.trim().to_string();
        self.description = self.description.trim().to_string();
        self.deliverable = self.deliverable.trim().to_string();
        self.progress = self.progress.min(100);
        if self.name.is_empty() {
            return Err(VoltaError::required_fields());
        }
        Ok(self)
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

/// Records written to an empty store on first use.
pub fn sample_tasks() -> Vec<Task> {
    vec![
        Task {
            id: 1,
            name: "Problem Definition & Literature Review".into(),
            description: "Define the Wicked Problem: Critical Raw Materials and Batteries. Focus on unsustainability of current battery supply chains regarding geopolitical constraints and carbon footprint.".into(),
            phase: Phase::I,
            status: TaskStatus::InProgress,
            priority: Priority::High,
            due_date: date(2025, 12, 15),
            deliverable: "Outline of Introduction/Scientific Background, Preliminary Bibliography (ACS Style)".into(),
            progress: 75,
            related_literature: vec![1, 2, 3],
            created_at: date(2025, 12, 1),
            updated_at: date(2025, 12, 5),
        },
        Task {
            id: 2,
            name: "Scientific Background Draft".into(),
            description: "Write scientific background covering battery chemistry principles, redox reactions, electrochemical principles, and molecular structure-property relationships.".into(),
            phase: Phase::I,
            status: TaskStatus::NotStarted,
            priority: Priority::High,
            due_date: date(2025, 12, 20),
            deliverable: "Complete Scientific Background section with chemical equations and thermodynamics".into(),
            progress: 0,
            related_literature: vec![4, 5],
            created_at: date(2025, 12, 1),
            updated_at: date(2025, 12, 1),
        },
        Task {
            id: 3,
            name: "Current Solutions Analysis".into(),
            description: "Analyze existing battery technologies (LFP, NMC, NCA) and identify limitations from scientific, economic, and geopolitical perspectives.".into(),
            phase: Phase::II,
            status: TaskStatus::NotStarted,
            priority: Priority::Medium,
            due_date: date(2026, 1, 5),
            deliverable: "Section drafts: Current Solutions, Chemical Analysis".into(),
            progress: 0,
            related_literature: vec![6, 7],
            created_at: date(2025, 12, 1),
            updated_at: date(2025, 12, 1),
        },
    ]
}
