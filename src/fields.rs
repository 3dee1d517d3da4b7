//! Enumerations and field types for tasks and literature.
//!
//! This module defines the structured values used to categorise records:
//! project phases, task and literature statuses, priorities, and the
//! filter/view selectors used by the list commands and the TUI.

use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// One of the five fixed project stages.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    #[value(name = "I", alias = "i", alias = "1")]
    I,
    #[value(name = "II", alias = "ii", alias = "2")]
    II,
    #[value(name = "III", alias = "iii", alias = "3")]
    III,
    #[value(name = "IV", alias = "iv", alias = "4")]
    IV,
    #[value(name = "V", alias = "v", alias = "5")]
    V,
}

impl Phase {
    pub const ALL: [Phase; 5] = [Phase::I, Phase::II, Phase::III, Phase::IV, Phase::V];
}

/// Task completion status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[value(alias = "not_started")]
    NotStarted,
    #[value(alias = "in_progress")]
    InProgress,
    #[value(alias = "under_review")]
    UnderReview,
    Complete,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::NotStarted,
        TaskStatus::InProgress,
        TaskStatus::UnderReview,
        TaskStatus::Complete,
    ];
}

/// Priority shared by tasks and literature entries.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];
}

/// Reading status of a literature entry.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LiteratureStatus {
    #[value(alias = "to_read")]
    ToRead,
    Reading,
    #[default]
    Reviewed,
    Cited,
}

impl LiteratureStatus {
    pub const ALL: [LiteratureStatus; 4] = [
        LiteratureStatus::ToRead,
        LiteratureStatus::Reading,
        LiteratureStatus::Reviewed,
        LiteratureStatus::Cited,
    ];
}

/// Status filter applied to the literature list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LiteratureFilter {
    #[default]
    All,
    Saved,
    Recent,
    Status(LiteratureStatus),
}

impl LiteratureFilter {
    /// Filter choices in the order the TUI cycles through them.
    pub fn cycle() -> Vec<LiteratureFilter> {
        let mut filters = vec![LiteratureFilter::All, LiteratureFilter::Saved, LiteratureFilter::Recent];
        filters.extend(LiteratureStatus::ALL.iter().map(|&s| LiteratureFilter::Status(s)));
        filters
    }
}

impl FromStr for LiteratureFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(LiteratureFilter::All),
            "saved" => Ok(LiteratureFilter::Saved),
            "recent" => Ok(LiteratureFilter::Recent),
            other => LiteratureStatus::from_str(other, true)
                .map(LiteratureFilter::Status)
                .map_err(|_| format!("unknown filter '{}': expected all, saved, recent or a status", s)),
        }
    }
}

/// Rendering mode for the task list.
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum TaskView {
    #[default]
    List,
    Board,
    Timeline,
}

/// Rendering mode for the literature list.
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum LiteratureView {
    #[default]
    Grid,
    List,
}
