//! JSON export and import files.
//!
//! Exports wrap a collection in a small envelope with the export timestamp.
//! Imports validate the envelope before anything touches the store.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, VoltaError};
use crate::literature::Literature;
use crate::task::Task;

/// Which collection an export file holds; used in the default file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Tasks,
    Literature,
    Dashboard,
}

impl ExportKind {
    fn slug(self) -> &'static str {
        match self {
            ExportKind::Tasks => "tasks",
            ExportKind::Literature => "literature",
            ExportKind::Dashboard => "dashboard",
        }
    }
}

/// `project-volta-<kind>-YYYY-MM-DD.json`.
pub fn export_filename(kind: ExportKind, date: NaiveDate) -> String {
    format!("project-volta-{}-{}.json", kind.slug(), date.format("%Y-%m-%d"))
}

/// Target path for an export: the explicit path, or the default file name in `dir`.
pub fn export_path(explicit: Option<&Path>, dir: &Path, kind: ExportKind, date: NaiveDate) -> PathBuf {
    match explicit {
        Some(p) => p.to_path_buf(),
        None => dir.join(export_filename(kind, date)),
    }
}

/// Current UTC time as an ISO-8601 timestamp with milliseconds.
pub fn export_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskExport {
    pub project: String,
    pub export_date: String,
    pub task_count: usize,
    pub tasks: Vec<Task>,
}

impl TaskExport {
    pub fn new(project: &str, export_date: String, tasks: &[Task]) -> Self {
        TaskExport {
            project: project.to_string(),
            export_date,
            task_count: tasks.len(),
            tasks: tasks.to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiteratureExport {
    pub export_date: String,
    pub count: usize,
    pub literature: Vec<Literature>,
}

impl LiteratureExport {
    pub fn new(export_date: String, items: &[Literature]) -> Self {
        LiteratureExport {
            export_date,
            count: items.len(),
            literature: items.to_vec(),
        }
    }
}

/// Pretty-print `value` to `path`, creating parent directories.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, serde_json::to_string_pretty(value)?)?;
    tracing::info!(path = %path.display(), "wrote export");
    Ok(())
}

/// Tasks from an export file. The file must be an object with a `tasks` array.
pub fn parse_task_import(raw: &str) -> Result<Vec<Task>> {
    let value: Value = serde_json::from_str(raw).map_err(|e| VoltaError::InvalidImport(e.to_string()))?;
    match value.get("tasks") {
        Some(tasks @ Value::Array(_)) => {
            serde_json::from_value(tasks.clone()).map_err(|e| VoltaError::InvalidImport(e.to_string()))
        }
        _ => Err(VoltaError::InvalidImport("expected an object with a \"tasks\" array".into())),
    }
}

/// Literature from a bare array or an object with a `literature` array.
pub fn parse_literature_import(raw: &str) -> Result<Vec<Literature>> {
    let value: Value = serde_json::from_str(raw).map_err(|e| VoltaError::InvalidImport(e.to_string()))?;
    let items = match value {
        Value::Array(_) => value,
        Value::Object(mut map) => match map.remove("literature") {
            Some(items @ Value::Array(_)) => items,
            _ => {
                return Err(VoltaError::InvalidImport(
                    "expected an array or an object with a \"literature\" array".into(),
                ))
            }
        },
        _ => return Err(VoltaError::InvalidImport("expected an array of literature entries".into())),
    };
    serde_json::from_value(items).map_err(|e| VoltaError::InvalidImport(e.to_string()))
}

pub fn read_task_import(path: &Path) -> Result<Vec<Task>> {
    let tasks = parse_task_import(&fs::read_to_string(path)?)?;
    tracing::info!(path = %path.display(), count = tasks.len(), "read task import");
    Ok(tasks)
}

pub fn read_literature_import(path: &Path) -> Result<Vec<Literature>> {
    let items = parse_literature_import(&fs::read_to_string(path)?)?;
    tracing::info!(path = %path.display(), count = items.len(), "read literature import");
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::literature::sample_literature;
    use crate::task::sample_tasks;

    #[test]
    fn test_task_export_round_trip() {
        let tasks = sample_tasks();
        let export = TaskExport::new("Volta", "2026-01-01T00:00:00.000Z".into(), &tasks);
        let raw = serde_json::to_string_pretty(&export).unwrap();
        assert!(raw.contains("\"taskCount\": 3"));
        assert!(raw.contains("\"exportDate\""));
        assert_eq!(parse_task_import(&raw).unwrap(), tasks);
    }

    #[test]
    fn test_task_import_requires_tasks_array() {
        for raw in ["[]", "{}", "{\"tasks\": {}}", "not json"] {
            let err = parse_task_import(raw).unwrap_err();
            assert!(matches!(err, VoltaError::InvalidImport(_)), "{raw}");
            assert!(err.to_string().starts_with("Invalid file format"));
        }
        assert!(parse_task_import("{\"tasks\": []}").unwrap().is_empty());
    }

    #[test]
    fn test_literature_import_accepts_both_shapes() {
        let items = sample_literature();
        let bare = serde_json::to_string(&items).unwrap();
        assert_eq!(parse_literature_import(&bare).unwrap(), items);

        let wrapped = serde_json::to_string(&LiteratureExport::new("t".into(), &items)).unwrap();
        assert_eq!(parse_literature_import(&wrapped).unwrap(), items);

        assert!(parse_literature_import("{\"items\": []}").is_err());
        assert!(parse_literature_import("42").is_err());
    }

    #[test]
    fn test_export_filename_and_path() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 9).unwrap();
        assert_eq!(export_filename(ExportKind::Tasks, date), "project-volta-tasks-2026-01-09.json");
        assert_eq!(
            export_path(None, Path::new("/tmp"), ExportKind::Dashboard, date),
            PathBuf::from("/tmp/project-volta-dashboard-2026-01-09.json")
        );
        assert_eq!(
            export_path(Some(Path::new("out.json")), Path::new("/tmp"), ExportKind::Literature, date),
            PathBuf::from("out.json")
        );
    }

    #[test]
    fn test_write_json_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.json");
        write_json(&path, &serde_json::json!({"ok": true})).unwrap();
        assert!(fs::read_to_string(&path).unwrap().contains("\"ok\": true"));
    }
}
