//! Dashboard aggregates: counts, phase progress, urgency, recent activity,
//! the phase timeline and the final-deadline countdown.
//!
//! Every function here is pure over a task slice, the config and a reference
//! date, so the CLI, the TUI and the export share one computation.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::config::{Config, PhaseWindow};
use crate::db::{days_until, is_due_within, phase_name};
use crate::fields::*;
use crate::task::Task;

/// Number of rows in the urgent list.
pub const URGENT_LIST_LIMIT: usize = 5;
/// Number of rows in the recent activity list.
pub const RECENT_ACTIVITY_LIMIT: usize = 3;
/// Countdown turns into a warning at or below this many days.
pub const COUNTDOWN_WARNING_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardStats {
    pub total: usize,
    pub complete: usize,
    pub in_progress: usize,
    pub not_started: usize,
    pub under_review: usize,
    pub urgent: usize,
}

impl DashboardStats {
    pub fn compute(tasks: &[Task], today: NaiveDate, urgent_days: i64) -> Self {
        let count = |s: TaskStatus| tasks.iter().filter(|t| t.status == s).count();
        DashboardStats {
            total: tasks.len(),
            complete: count(TaskStatus::Complete),
            in_progress: count(TaskStatus::InProgress),
            not_started: count(TaskStatus::NotStarted),
            under_review: count(TaskStatus::UnderReview),
            urgent: tasks
                .iter()
                .filter(|t| !t.is_complete() && is_due_within(t.due_date, today, urgent_days))
                .count(),
        }
    }

    /// Completed share of all tasks, rounded to a whole percent.
    pub fn overall_progress(&self) -> u8 {
        percent(self.complete, self.total)
    }
}

/// `round(part / whole * 100)`, 0 when `whole` is 0.
pub fn percent(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        return 0;
    }
    ((part as f64 / whole as f64) * 100.0).round() as u8
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseProgress {
    pub phase: Phase,
    pub name: String,
    pub task_count: usize,
    pub completed_count: usize,
    pub progress: u8,
}

/// Per-phase counts, in phase order.
pub fn phase_progress(tasks: &[Task], config: &Config) -> Vec<PhaseProgress> {
    Phase::ALL
        .iter()
        .map(|&phase| {
            let in_phase: Vec<&Task> = tasks.iter().filter(|t| t.phase == phase).collect();
            let completed = in_phase.iter().filter(|t| t.is_complete()).count();
            PhaseProgress {
                phase,
                name: display_phase_name(config, phase),
                task_count: in_phase.len(),
                completed_count: completed,
                progress: percent(completed, in_phase.len()),
            }
        })
        .collect()
}

fn display_phase_name(config: &Config, phase: Phase) -> String {
    config
        .phase_window(phase)
        .map(|w| w.name.clone())
        .unwrap_or_else(|| phase_name(phase).to_string())
}

/// Incomplete tasks due within `window` days (not overdue), soonest first.
pub fn urgent_tasks(tasks: &[Task], today: NaiveDate, window: i64, limit: usize) -> Vec<&Task> {
    let mut out: Vec<&Task> = tasks
        .iter()
        .filter(|t| !t.is_complete() && is_due_within(t.due_date, today, window))
        .collect();
    out.sort_by_key(|t| t.due_date);
    out.truncate(limit);
    out
}

/// One row of the recent activity feed.
#[derive(Debug, Clone, PartialEq)]
pub struct Activity<'a> {
    pub task: &'a Task,
    pub verb: &'static str,
    pub icon: &'static str,
}

pub fn activity_verb(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Complete => "Completed task",
        TaskStatus::InProgress => "Updated task",
        TaskStatus::UnderReview => "Submitted for review",
        TaskStatus::NotStarted => "Started work on",
    }
}

pub fn activity_icon(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Complete => "✔",
        TaskStatus::InProgress => "↻",
        TaskStatus::UnderReview => "◉",
        TaskStatus::NotStarted => "✎",
    }
}

/// The most recently updated tasks, newest first.
pub fn recent_activity(tasks: &[Task], limit: usize) -> Vec<Activity<'_>> {
    let mut sorted: Vec<&Task> = tasks.iter().collect();
    sorted.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    sorted
        .into_iter()
        .take(limit)
        .map(|task| Activity {
            task,
            verb: activity_verb(task.status),
            icon: activity_icon(task.status),
        })
        .collect()
}

/// "5 minutes ago", "1 hour ago", "3 days ago". Negative spans read as 0 minutes.
pub fn time_ago(elapsed: Duration) -> String {
    let mins = elapsed.num_minutes().max(0);
    let hours = elapsed.num_hours().max(0);
    let days = elapsed.num_days().max(0);
    let plural = |n: i64| if n == 1 { "" } else { "s" };
    if mins < 60 {
        format!("{} minute{} ago", mins, plural(mins))
    } else if hours < 24 {
        format!("{} hour{} ago", hours, plural(hours))
    } else {
        format!("{} day{} ago", days, plural(days))
    }
}

/// Time since a record's update date (taken as midnight) until `now`.
pub fn time_since(date: NaiveDate, now: NaiveDateTime) -> String {
    time_ago(now - date.and_time(chrono::NaiveTime::MIN))
}

/// Phase whose window contains `today`. Falls back to phase I.
pub fn current_phase(config: &Config, today: NaiveDate) -> Phase {
    config
        .phases
        .iter()
        .filter(|w| w.start <= today && today <= w.end)
        .last()
        .map(|w| w.phase)
        .unwrap_or(Phase::I)
}

/// Days spent in a phase window so far: 0 before it starts, its full length
/// once it has ended.
pub fn days_in_phase(window: &PhaseWindow, today: NaiveDate) -> i64 {
    if today < window.start {
        0
    } else if today > window.end {
        (window.end - window.start).num_days()
    } else {
        (today - window.start).num_days()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseState {
    Past,
    Active,
    Upcoming,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineEntry {
    pub phase: Phase,
    pub name: String,
    pub range: String,
    pub color: String,
    pub state: PhaseState,
}

/// The configured phases in order, each tagged past/active/upcoming.
pub fn phase_timeline(config: &Config, today: NaiveDate) -> Vec<TimelineEntry> {
    let current = current_phase(config, today);
    config
        .phases
        .iter()
        .map(|w| TimelineEntry {
            phase: w.phase,
            name: w.name.clone(),
            range: format_date_range(w.start, w.end),
            color: w.color.clone(),
            state: if w.phase == current {
                PhaseState::Active
            } else if w.end < today {
                PhaseState::Past
            } else {
                PhaseState::Upcoming
            },
        })
        .collect()
}

/// "Dec 1-20" within one month, "Dec 21 - Jan 10" across months.
pub fn format_date_range(start: NaiveDate, end: NaiveDate) -> String {
    let start_month = start.format("%b").to_string();
    let end_month = end.format("%b").to_string();
    if (start.year(), start.month()) == (end.year(), end.month()) {
        format!("{} {}-{}", start_month, start.format("%-d"), end.format("%-d"))
    } else {
        format!("{} {} - {} {}", start_month, start.format("%-d"), end_month, end.format("%-d"))
    }
}

/// Status distribution for the chart. Overdue overlaps the status buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Distribution {
    pub complete: usize,
    pub in_progress: usize,
    pub not_started: usize,
    pub overdue: usize,
}

impl Distribution {
    pub fn compute(tasks: &[Task], today: NaiveDate) -> Self {
        let count = |s: TaskStatus| tasks.iter().filter(|t| t.status == s).count();
        Distribution {
            complete: count(TaskStatus::Complete),
            in_progress: count(TaskStatus::InProgress),
            not_started: count(TaskStatus::NotStarted),
            overdue: tasks.iter().filter(|t| !t.is_complete() && t.due_date < today).count(),
        }
    }

    pub fn total(&self) -> usize {
        self.complete + self.in_progress + self.not_started + self.overdue
    }

    /// Label, count and share of the distribution total, in chart order.
    pub fn segments(&self) -> [(&'static str, usize, u8); 4] {
        let total = self.total();
        [
            ("Completed", self.complete, percent(self.complete, total)),
            ("In Progress", self.in_progress, percent(self.in_progress, total)),
            ("Not Started", self.not_started, percent(self.not_started, total)),
            ("Overdue", self.overdue, percent(self.overdue, total)),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    pub days: i64,
    pub warning: bool,
}

/// Days left until the final deadline, floored at 0.
pub fn countdown(final_deadline: NaiveDate, today: NaiveDate) -> Countdown {
    let days = days_until(final_deadline, today).max(0);
    Countdown {
        days,
        warning: days <= COUNTDOWN_WARNING_DAYS,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportStatistics {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub in_progress_tasks: usize,
    pub not_started_tasks: usize,
    pub urgent_tasks: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportUrgentTask {
    pub name: String,
    pub phase: Phase,
    pub due_date: NaiveDate,
    pub status: TaskStatus,
    pub priority: Priority,
}

/// Dashboard snapshot written by `volta dashboard --export`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardExport {
    pub export_date: String,
    pub project: String,
    pub statistics: ExportStatistics,
    pub phases: Vec<PhaseProgress>,
    pub urgent_tasks: Vec<ExportUrgentTask>,
}

impl DashboardExport {
    /// Build the snapshot. Unlike the on-screen urgent list, the exported
    /// urgent tasks include overdue ones and are not truncated.
    pub fn build(tasks: &[Task], config: &Config, today: NaiveDate, export_date: String) -> Self {
        let stats = DashboardStats::compute(tasks, today, config.urgent_days);
        DashboardExport {
            export_date,
            project: config.project_name.clone(),
            statistics: ExportStatistics {
                total_tasks: stats.total,
                completed_tasks: stats.complete,
                in_progress_tasks: stats.in_progress,
                not_started_tasks: stats.not_started,
                urgent_tasks: stats.urgent,
            },
            phases: phase_progress(tasks, config),
            urgent_tasks: tasks
                .iter()
                .filter(|t| !t.is_complete() && days_until(t.due_date, today) <= config.upcoming_days)
                .map(|t| ExportUrgentTask {
                    name: t.name.clone(),
                    phase: t.phase,
                    due_date: t.due_date,
                    status: t.status,
                    priority: t.priority,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::sample_tasks;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_stats_and_urgency_window() {
        let tasks = sample_tasks();
        // Task 1 due Dec 15 (2 days), task 2 due Dec 20 (7 days).
        let stats = DashboardStats::compute(&tasks, d(2025, 12, 13), 3);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.in_progress, 1);
        assert_eq!(stats.not_started, 2);
        assert_eq!(stats.urgent, 1);
        assert_eq!(stats.overall_progress(), 0);

        // Overdue tasks are not urgent.
        let stats = DashboardStats::compute(&tasks, d(2025, 12, 16), 3);
        assert_eq!(stats.urgent, 0);
    }

    #[test]
    fn test_completed_tasks_are_never_urgent() {
        let mut tasks = sample_tasks();
        tasks[0].complete(d(2025, 12, 13));
        let stats = DashboardStats::compute(&tasks, d(2025, 12, 13), 3);
        assert_eq!(stats.urgent, 0);
        assert_eq!(stats.overall_progress(), 33);
    }

    #[test]
    fn test_phase_progress() {
        let mut tasks = sample_tasks();
        tasks[1].complete(d(2025, 12, 13));
        let phases = phase_progress(&tasks, &Config::default());
        assert_eq!(phases.len(), 5);
        assert_eq!(phases[0].name, "Foundation & Definition");
        assert_eq!((phases[0].task_count, phases[0].completed_count, phases[0].progress), (2, 1, 50));
        assert_eq!(phases[1].progress, 0);
        assert_eq!(phases[4].task_count, 0);
    }

    #[test]
    fn test_urgent_list_sorted_and_limited() {
        let tasks = sample_tasks();
        let urgent = urgent_tasks(&tasks, d(2025, 12, 13), 7, URGENT_LIST_LIMIT);
        let ids: Vec<u64> = urgent.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(urgent_tasks(&tasks, d(2025, 12, 13), 7, 1).len(), 1);
    }

    #[test]
    fn test_recent_activity() {
        let tasks = sample_tasks();
        let feed = recent_activity(&tasks, RECENT_ACTIVITY_LIMIT);
        assert_eq!(feed.len(), 3);
        assert_eq!(feed[0].task.id, 1);
        assert_eq!(feed[0].verb, "Updated task");
        assert_eq!(feed[1].verb, "Started work on");
    }

    #[test]
    fn test_time_ago() {
        assert_eq!(time_ago(Duration::minutes(1)), "1 minute ago");
        assert_eq!(time_ago(Duration::minutes(59)), "59 minutes ago");
        assert_eq!(time_ago(Duration::minutes(61)), "1 hour ago");
        assert_eq!(time_ago(Duration::hours(49)), "2 days ago");
        assert_eq!(time_ago(Duration::minutes(-5)), "0 minutes ago");

        let now = d(2025, 12, 7).and_hms_opt(6, 0, 0).unwrap();
        assert_eq!(time_since(d(2025, 12, 5), now), "2 days ago");
    }

    #[test]
    fn test_current_phase_and_days_in_phase() {
        let config = Config::default();
        assert_eq!(current_phase(&config, d(2025, 12, 25)), Phase::II);
        assert_eq!(current_phase(&config, d(2026, 1, 23)), Phase::V);
        assert_eq!(current_phase(&config, d(2027, 1, 1)), Phase::I);

        let window = config.phase_window(Phase::II).unwrap();
        assert_eq!(days_in_phase(window, d(2025, 12, 1)), 0);
        assert_eq!(days_in_phase(window, d(2025, 12, 25)), 4);
        assert_eq!(days_in_phase(window, d(2026, 3, 1)), 20);
    }

    #[test]
    fn test_timeline_states() {
        let entries = phase_timeline(&Config::default(), d(2026, 1, 12));
        let states: Vec<PhaseState> = entries.iter().map(|e| e.state).collect();
        assert_eq!(
            states,
            vec![PhaseState::Past, PhaseState::Past, PhaseState::Active, PhaseState::Upcoming, PhaseState::Upcoming]
        );
        assert_eq!(entries[0].range, "Dec 1-20");
        assert_eq!(entries[1].range, "Dec 21 - Jan 10");
    }

    #[test]
    fn test_date_range_spanning_a_year_names_both_months() {
        assert_eq!(format_date_range(d(2025, 12, 1), d(2026, 12, 20)), "Dec 1 - Dec 20");
        assert_eq!(format_date_range(d(2026, 3, 2), d(2026, 3, 30)), "Mar 2-30");
    }

    #[test]
    fn test_distribution_counts_overdue() {
        let tasks = sample_tasks();
        let dist = Distribution::compute(&tasks, d(2025, 12, 18));
        assert_eq!(dist, Distribution { complete: 0, in_progress: 1, not_started: 2, overdue: 1 });
        assert_eq!(dist.segments()[3], ("Overdue", 1, 25));
    }

    #[test]
    fn test_countdown() {
        let deadline = d(2026, 1, 23);
        assert_eq!(countdown(deadline, d(2025, 12, 1)), Countdown { days: 53, warning: false });
        assert_eq!(countdown(deadline, d(2026, 1, 1)), Countdown { days: 22, warning: true });
        assert_eq!(countdown(deadline, d(2026, 2, 1)).days, 0);
    }

    #[test]
    fn test_export_includes_overdue_in_urgent() {
        let tasks = sample_tasks();
        let export = DashboardExport::build(&tasks, &Config::default(), d(2025, 12, 18), "now".into());
        assert_eq!(export.statistics.total_tasks, 3);
        assert_eq!(export.statistics.urgent_tasks, 1);
        let names: Vec<&str> = export.urgent_tasks.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Problem Definition & Literature Review", "Scientific Background Draft"]);

        let value = serde_json::to_value(&export).unwrap();
        assert_eq!(value["statistics"]["inProgressTasks"], 1);
        assert_eq!(value["phases"][0]["taskCount"], 2);
        assert_eq!(value["urgentTasks"][0]["dueDate"], "2025-12-15");
    }
}
