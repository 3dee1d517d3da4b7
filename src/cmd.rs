//! Command implementations for the CLI interface.
//!
//! This module contains the subcommand definitions and their handlers: the
//! dashboard summary, task and literature CRUD, citations, export/import and
//! the TUI launcher. Handlers return `Result` and leave printing of errors to
//! `main`.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{Datelike, Local};
use clap::{Args, Subcommand};
use clap_complete::{generate, Shell};

use crate::citation::{citation, citation_markup, short_authors};
use crate::dashboard::*;
use crate::db::*;
use crate::error::{Result, VoltaError};
use crate::fields::*;
use crate::literature::{split_tags, Literature, LiteratureDraft};
use crate::project::Project;
use crate::query::{board_columns, page_window, paginate, timeline, LiteratureQuery, TaskQuery};
use crate::task::{Task, TaskDraft};
use crate::transfer::*;
use crate::tui::enums::Screen;
use crate::tui::run::run_tui;

#[derive(Subcommand)]
pub enum Commands {
    /// Show progress, urgent tasks and the phase timeline.
    Dashboard {
        /// Write the dashboard snapshot as JSON (default: project-volta-dashboard-<date>.json).
        #[arg(long, value_name = "PATH", num_args = 0..=1)]
        export: Option<Option<PathBuf>>,
    },

    /// Manage project tasks.
    Task {
        #[command(subcommand)]
        action: TaskAction,
    },

    /// Manage the literature database.
    Lit {
        #[command(subcommand)]
        action: LitAction,
    },

    /// Launch the interactive UI.
    Ui {
        /// Screen to open first.
        #[arg(long, value_enum, default_value_t = Screen::Dashboard)]
        screen: Screen,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Optional task fields shared by `task add` and `task edit`.
#[derive(Args, Default)]
pub struct TaskFields {
    /// Longer description.
    #[arg(long)]
    pub desc: Option<String>,
    /// Phase: I | II | III | IV | V.
    #[arg(long, value_enum)]
    pub phase: Option<Phase>,
    #[arg(long, value_enum)]
    pub status: Option<TaskStatus>,
    #[arg(long, value_enum)]
    pub priority: Option<Priority>,
    /// Due date: YYYY-MM-DD, "today", "tomorrow", "friday", "in 3d", "eow".
    #[arg(long)]
    pub due: Option<String>,
    /// Expected deliverable.
    #[arg(long)]
    pub deliverable: Option<String>,
    /// Progress percentage (clamped to 100).
    #[arg(long)]
    pub progress: Option<u8>,
    /// Related literature IDs. Comma-separated, may be repeated.
    #[arg(long = "lit", value_delimiter = ',')]
    pub lit: Vec<u64>,
}

impl TaskFields {
    /// Overlay the given fields on a draft.
    fn apply(self, draft: &mut TaskDraft, today: chrono::NaiveDate) -> Result<()> {
        if let Some(desc) = self.desc {
            draft.description = desc;
        }
        if let Some(phase) = self.phase {
            draft.phase = phase;
        }
        if let Some(status) = self.status {
            draft.status = status;
        }
        if let Some(priority) = self.priority {
            draft.priority = priority;
        }
        if let Some(due) = self.due {
            draft.due_date = parse_due_input(&due, today)
                .ok_or_else(|| VoltaError::Validation(format!("Invalid due date '{}'", due)))?;
        }
        if let Some(deliverable) = self.deliverable {
            draft.deliverable = deliverable;
        }
        if let Some(progress) = self.progress {
            draft.progress = progress;
        }
        if !self.lit.is_empty() {
            draft.related_literature = Some(self.lit);
        }
        Ok(())
    }
}

#[derive(Subcommand)]
pub enum TaskAction {
    /// List tasks with optional filters.
    List {
        /// Case-insensitive text search over name, description and deliverable.
        #[arg(long)]
        search: Option<String>,
        /// key:value filter (phase:I, status:complete, priority:high). May be repeated.
        #[arg(long = "filter")]
        filters: Vec<String>,
        #[arg(long, value_enum)]
        phase: Option<Phase>,
        #[arg(long, value_enum)]
        status: Option<TaskStatus>,
        #[arg(long, value_enum)]
        priority: Option<Priority>,
        /// Rendering: list | board | timeline.
        #[arg(long, value_enum, default_value_t = TaskView::List)]
        view: TaskView,
    },

    /// Add a new task.
    Add {
        /// Task name.
        name: String,
        #[command(flatten)]
        fields: TaskFields,
    },

    /// Edit fields on a task.
    Edit {
        id: u64,
        /// New name.
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        fields: TaskFields,
        /// Remove all related literature links.
        #[arg(long, conflicts_with = "lit")]
        clear_lit: bool,
    },

    /// Show a single task.
    View { id: u64 },

    /// Mark a task complete (progress 100%).
    Complete { id: u64 },

    /// Delete a task.
    Delete {
        id: u64,
        /// Skip the confirmation prompt.
        #[arg(long, short)]
        yes: bool,
    },

    /// Export all tasks as JSON.
    Export {
        /// Output file (default: project-volta-tasks-<date>.json).
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Replace all tasks with the contents of an export file.
    Import {
        input: PathBuf,
        /// Skip the confirmation prompt.
        #[arg(long, short)]
        yes: bool,
    },
}

/// Literature fields shared by `lit add` and `lit edit`.
#[derive(Args, Default)]
pub struct LitFields {
    #[arg(long)]
    pub title: Option<String>,
    /// Semicolon-separated authors, e.g. "Zhang, L.; Wang, H.".
    #[arg(long)]
    pub authors: Option<String>,
    #[arg(long)]
    pub year: Option<i32>,
    #[arg(long)]
    pub journal: Option<String>,
    #[arg(long)]
    pub volume: Option<String>,
    #[arg(long)]
    pub pages: Option<String>,
    #[arg(long = "abstract")]
    pub abstract_text: Option<String>,
    /// Comma-separated tags. May be repeated.
    #[arg(long = "tag")]
    pub tags: Vec<String>,
    #[arg(long, value_enum)]
    pub status: Option<LiteratureStatus>,
    #[arg(long, value_enum)]
    pub priority: Option<Priority>,
    #[arg(long)]
    pub doi: Option<String>,
    #[arg(long)]
    pub url: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
}

impl LitFields {
    fn apply(self, draft: &mut LiteratureDraft) {
        let set = |target: &mut String, value: Option<String>| {
            if let Some(v) = value {
                *target = v;
            }
        };
        set(&mut draft.title, self.title);
        set(&mut draft.authors, self.authors);
        set(&mut draft.journal, self.journal);
        set(&mut draft.volume, self.volume);
        set(&mut draft.pages, self.pages);
        set(&mut draft.abstract_text, self.abstract_text);
        set(&mut draft.doi, self.doi);
        set(&mut draft.url, self.url);
        set(&mut draft.notes, self.notes);
        if let Some(year) = self.year {
            draft.year = year;
        }
        if !self.tags.is_empty() {
            draft.tags = split_tags(&self.tags);
        }
        if let Some(status) = self.status {
            draft.status = status;
        }
        if let Some(priority) = self.priority {
            draft.priority = priority;
        }
    }
}

#[derive(Subcommand)]
pub enum LitAction {
    /// List literature, newest first, one page at a time.
    List {
        /// Search title, authors, journal, abstract, tags and DOI.
        #[arg(long)]
        search: Option<String>,
        /// all | saved | recent | to-read | reading | reviewed | cited.
        #[arg(long, default_value = "all")]
        filter: LiteratureFilter,
        /// Only entries carrying this tag.
        #[arg(long)]
        tag: Option<String>,
        /// Page number (1-based).
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// Rendering: grid | list.
        #[arg(long, value_enum, default_value_t = LiteratureView::Grid)]
        view: LiteratureView,
    },

    /// Add a literature entry.
    Add {
        #[command(flatten)]
        fields: LitFields,
    },

    /// Edit a literature entry.
    Edit {
        id: u64,
        #[command(flatten)]
        fields: LitFields,
    },

    /// Show a single entry.
    View { id: u64 },

    /// Print the citation for an entry.
    Cite {
        id: u64,
        /// Emphasise the journal with <em> markup.
        #[arg(long)]
        markup: bool,
    },

    /// Toggle the saved flag.
    Save { id: u64 },

    /// Delete an entry.
    Delete {
        id: u64,
        /// Skip the confirmation prompt.
        #[arg(long, short)]
        yes: bool,
    },

    /// Collection statistics and tag counts.
    Stats,

    /// Export the literature database as JSON.
    Export {
        /// Output file (default: project-volta-literature-<date>.json).
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Replace the literature database with an export file or JSON array.
    Import {
        input: PathBuf,
        /// Skip the confirmation prompt.
        #[arg(long, short)]
        yes: bool,
    },
}

/// Ask a yes/no question on stdout. Anything but "y..." is a no.
fn confirm(prompt: &str) -> Result<bool> {
    print!("{} (y/N): ", prompt);
    io::stdout().flush()?;
    let mut response = String::new();
    io::stdin().read_line(&mut response)?;
    Ok(response.trim().to_lowercase().starts_with('y'))
}

/// `[#####-----]` style bar for a percentage.
pub fn bar(percent: u8, width: usize) -> String {
    let filled = (percent.min(100) as usize * width + 50) / 100;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

/// Launch the terminal user interface.
pub fn cmd_ui(project: Project, screen: Screen) -> Result<()> {
    run_tui(project, screen)
}

/// Print the dashboard, or write it as JSON with `--export`.
pub fn cmd_dashboard(project: &mut Project, export: Option<Option<PathBuf>>) -> Result<()> {
    let db = project.load_tasks()?;
    let config = &project.config;
    let today = today();

    if let Some(target) = export {
        let path = export_path(target.as_deref(), Path::new("."), ExportKind::Dashboard, today);
        let snapshot = DashboardExport::build(&db.tasks, config, today, export_timestamp());
        write_json(&path, &snapshot)?;
        println!("Dashboard data exported to {}", path.display());
        return Ok(());
    }

    let stats = DashboardStats::compute(&db.tasks, today, config.urgent_days);
    let left = countdown(config.final_deadline, today);
    println!("{}", config.project_name);
    println!("{}", format_date_long(today));
    println!(
        "Final deadline {}: {} day{} left{}",
        format_date_short(config.final_deadline),
        left.days,
        if left.days == 1 { "" } else { "s" },
        if left.warning { " (!)" } else { "" }
    );
    println!();
    println!(
        "Tasks: {} total | {} complete | {} in progress | {} not started | {} urgent",
        stats.total, stats.complete, stats.in_progress, stats.not_started, stats.urgent
    );
    println!("Overall progress: {} {}%", bar(stats.overall_progress(), 20), stats.overall_progress());

    println!("\nPhase progress:");
    for p in phase_progress(&db.tasks, config) {
        println!(
            "  {:<4} {:<26} {} {:>3}% ({}/{})",
            format_phase(p.phase),
            truncate(&p.name, 26),
            bar(p.progress, 10),
            p.progress,
            p.completed_count,
            p.task_count
        );
    }

    let current = current_phase(config, today);
    println!("\nTimeline:");
    for entry in phase_timeline(config, today) {
        let marker = match entry.state {
            PhaseState::Active => ">",
            PhaseState::Past => "x",
            PhaseState::Upcoming => " ",
        };
        println!("  {} {:<4} {:<26} {}", marker, format_phase(entry.phase), entry.name, entry.range);
    }
    if let Some(window) = config.phase_window(current) {
        println!("  Current phase {}: day {}", format_phase(current), days_in_phase(window, today));
    }

    println!("\nUrgent tasks (next {} days):", config.upcoming_days);
    let urgent = urgent_tasks(&db.tasks, today, config.upcoming_days, URGENT_LIST_LIMIT);
    if urgent.is_empty() {
        println!("  No urgent tasks");
    }
    for t in urgent {
        let days = days_until(t.due_date, today);
        println!(
            "  #{:<3} {:<40} {} day{} left ({})",
            t.id,
            truncate(&t.name, 40),
            days,
            if days == 1 { "" } else { "s" },
            format_priority(t.priority)
        );
    }

    println!("\nRecent activity:");
    let now = Local::now().naive_local();
    let feed = recent_activity(&db.tasks, RECENT_ACTIVITY_LIMIT);
    if feed.is_empty() {
        println!("  No recent activity");
    }
    for a in feed {
        println!("  {} {}: {} ({})", a.icon, a.verb, a.task.name, time_since(a.task.updated_at, now));
    }

    println!("\nStatus distribution:");
    let dist = Distribution::compute(&db.tasks, today);
    for (label, count, pct) in dist.segments() {
        println!("  {:<12} {} {:>3} ({}%)", label, bar(pct, 20), count, pct);
    }
    Ok(())
}

/// Dispatch a `task` subcommand.
pub fn cmd_task(project: &mut Project, action: TaskAction) -> Result<()> {
    let mut db = project.load_tasks()?;
    let today = today();

    match action {
        TaskAction::List { search, filters, phase, status, priority, view } => {
            let mut query = TaskQuery { search: search.unwrap_or_default(), status, phase, priority };
            for expr in &filters {
                query.apply_filter_expr(expr).map_err(VoltaError::Validation)?;
            }
            let matching: Vec<Task> = query.apply(&db.tasks).into_iter().cloned().collect();
            if matching.is_empty() {
                println!("No tasks found");
                return Ok(());
            }
            match view {
                TaskView::List => print_task_table(&matching.iter().collect::<Vec<_>>(), today),
                TaskView::Board => {
                    for (phase, tasks) in board_columns(&matching, query.phase) {
                        println!("Phase {} - {} ({})", format_phase(phase), phase_name(phase), tasks.len());
                        for t in tasks {
                            println!("  #{:<3} [{}] {} ({}%)", t.id, format_status(t.status), t.name, t.progress);
                        }
                    }
                }
                TaskView::Timeline => {
                    for t in timeline(&matching) {
                        println!(
                            "{}  {:<10} Phase {:<4} #{:<3} {}",
                            t.due_date,
                            format_due_relative(t.due_date, today),
                            format_phase(t.phase),
                            t.id,
                            t.name
                        );
                    }
                }
            }
        }

        TaskAction::Add { name, fields } => {
            let mut draft = TaskDraft::new(today);
            draft.name = name;
            fields.apply(&mut draft, today)?;
            let id = db.add(draft, today)?;
            project.save_tasks(&db)?;
            tracing::info!(id, "task added");
            println!("Task created successfully! (#{})", id);
        }

        TaskAction::Edit { id, name, fields, clear_lit } => {
            let task = db.get(id).ok_or(VoltaError::NotFound { kind: "Task", id })?;
            let mut draft = TaskDraft::from_task(task);
            if let Some(name) = name {
                draft.name = name;
            }
            fields.apply(&mut draft, today)?;
            if clear_lit {
                draft.related_literature = Some(Vec::new());
            }
            db.update(id, draft, today)?;
            project.save_tasks(&db)?;
            println!("Task updated successfully! (#{})", id);
        }

        TaskAction::View { id } => {
            let task = db.get(id).ok_or(VoltaError::NotFound { kind: "Task", id })?;
            let lit = project.load_literature()?;
            print_task_detail(task, &lit, today);
        }

        TaskAction::Complete { id } => {
            db.complete(id, today)?;
            project.save_tasks(&db)?;
            println!("Task marked as complete! (#{})", id);
        }

        TaskAction::Delete { id, yes } => {
            let task = db.get(id).ok_or(VoltaError::NotFound { kind: "Task", id })?;
            if !yes && !confirm(&format!("Delete task #{} '{}'?", id, task.name))? {
                println!("Cancelled.");
                return Ok(());
            }
            db.remove(id)?;
            project.save_tasks(&db)?;
            println!("Task deleted successfully! (#{})", id);
        }

        TaskAction::Export { output } => {
            let path = export_path(output.as_deref(), Path::new("."), ExportKind::Tasks, today);
            let export = TaskExport::new(&project.config.project_name, export_timestamp(), &db.tasks);
            write_json(&path, &export)?;
            println!("Exported {} tasks to {}", db.tasks.len(), path.display());
        }

        TaskAction::Import { input, yes } => {
            let tasks = read_task_import(&input)?;
            if !yes
                && !confirm(&format!(
                    "Replace {} existing tasks with {} imported?",
                    db.tasks.len(),
                    tasks.len()
                ))?
            {
                println!("Import cancelled.");
                return Ok(());
            }
            db.tasks = tasks;
            project.save_tasks(&db)?;
            println!("Tasks imported successfully! ({} tasks)", db.tasks.len());
        }
    }
    Ok(())
}

fn print_task_detail(task: &Task, lit: &LiteratureDb, today: chrono::NaiveDate) {
    println!("ID:           {}", task.id);
    println!("Name:         {}", task.name);
    println!("Phase:        {} - {}", format_phase(task.phase), phase_name(task.phase));
    println!("Status:       {}", format_status(task.status));
    println!("Priority:     {}", format_priority(task.priority));
    println!("Due:          {} ({})", format_date_short(task.due_date), format_due_relative(task.due_date, today));
    println!("Progress:     {} {}%", bar(task.progress, 20), task.progress);
    println!("Deliverable:  {}", task.deliverable_text());
    println!("Created:      {}", task.created_at);
    println!("Updated:      {}", task.updated_at);
    println!("Description:\n{}\n", if task.description.is_empty() { "-" } else { &task.description });
    if task.related_literature.is_empty() {
        println!("Related literature: -");
    } else {
        println!("Related literature:");
        for id in &task.related_literature {
            match lit.get(*id) {
                Some(item) => println!("  #{} {} ({})", id, item.title, item.year),
                None => println!("  #{} (not in library)", id),
            }
        }
    }
}

/// Dispatch a `lit` subcommand.
pub fn cmd_lit(project: &mut Project, action: LitAction) -> Result<()> {
    let mut db = project.load_literature()?;
    let today = today();
    let recent_since = project.config.recent_since_year;

    match action {
        LitAction::List { search, filter, tag, page, view } => {
            let query = LiteratureQuery { search: search.unwrap_or_default(), filter, category: tag };
            let matching: Vec<&Literature> = query.apply(&db.items, recent_since);
            let page_size = project.config.page_size;
            let page = paginate(&matching, page, page_size);
            if page.items.is_empty() {
                println!("No literature found");
                return Ok(());
            }
            match view {
                LiteratureView::List => print_literature_table(&page.items),
                LiteratureView::Grid => {
                    for item in &page.items {
                        print_literature_card(item);
                    }
                }
            }
            if let Some((first, last)) = page.shown_range(page_size) {
                let numbers: Vec<String> = page_window(page.page, page.total_pages, 5)
                    .map(|n| if n == page.page { format!("[{}]", n) } else { n.to_string() })
                    .collect();
                println!(
                    "Showing {}-{} of {} | Page {} of {}: {}",
                    first,
                    last,
                    page.total_items,
                    page.page,
                    page.total_pages,
                    numbers.join(" ")
                );
            }
        }

        LitAction::Add { fields } => {
            let mut draft = LiteratureDraft::new(Local::now().year());
            fields.apply(&mut draft);
            let id = db.add(draft, today)?;
            project.save_literature(&db)?;
            tracing::info!(id, "literature added");
            println!("Literature added successfully! (#{})", id);
        }

        LitAction::Edit { id, fields } => {
            let item = db.get(id).ok_or(VoltaError::NotFound { kind: "Literature", id })?;
            let mut draft = LiteratureDraft::from_literature(item);
            fields.apply(&mut draft);
            db.update(id, draft)?;
            project.save_literature(&db)?;
            println!("Literature updated successfully! (#{})", id);
        }

        LitAction::View { id } => {
            let item = db.get(id).ok_or(VoltaError::NotFound { kind: "Literature", id })?;
            print_literature_detail(item);
        }

        LitAction::Cite { id, markup } => {
            let item = db.get(id).ok_or(VoltaError::NotFound { kind: "Literature", id })?;
            println!("{}", if markup { citation_markup(item) } else { citation(item) });
        }

        LitAction::Save { id } => {
            let saved = db.toggle_saved(id)?;
            project.save_literature(&db)?;
            println!("{} (#{})", if saved { "Added to saved items" } else { "Removed from saved items" }, id);
        }

        LitAction::Delete { id, yes } => {
            let item = db.get(id).ok_or(VoltaError::NotFound { kind: "Literature", id })?;
            if !yes && !confirm(&format!("Delete '{}'?", truncate(&item.title, 60)))? {
                println!("Cancelled.");
                return Ok(());
            }
            db.remove(id)?;
            project.save_literature(&db)?;
            println!("Literature deleted successfully! (#{})", id);
        }

        LitAction::Stats => {
            let stats = db.stats(recent_since);
            println!("Total:    {}", stats.total);
            println!("Saved:    {}", stats.saved);
            println!("Recent:   {} (since {})", stats.recent, recent_since);
            println!("Journals: {}", stats.journals);
            let tags = db.tag_counts();
            if !tags.is_empty() {
                println!("Tags:");
                for (tag, count) in tags {
                    println!("  {:<24} {}", tag, count);
                }
            }
        }

        LitAction::Export { output } => {
            let path = export_path(output.as_deref(), Path::new("."), ExportKind::Literature, today);
            write_json(&path, &LiteratureExport::new(export_timestamp(), &db.items))?;
            println!("Exported {} entries to {}", db.items.len(), path.display());
        }

        LitAction::Import { input, yes } => {
            let items = read_literature_import(&input)?;
            if !yes
                && !confirm(&format!(
                    "Replace {} existing entries with {} imported?",
                    db.items.len(),
                    items.len()
                ))?
            {
                println!("Import cancelled.");
                return Ok(());
            }
            db.items = items;
            project.save_literature(&db)?;
            println!("Literature imported successfully! ({} entries)", db.items.len());
        }
    }
    Ok(())
}

fn print_literature_card(item: &Literature) {
    println!(
        "#{} {}{}",
        item.id,
        item.title,
        if item.saved { " *" } else { "" }
    );
    println!(
        "   {} | {} | {} | {}",
        short_authors(item),
        item.year,
        item.journal,
        format_literature_status(item.status)
    );
    if !item.tags.is_empty() {
        println!("   tags: {}", item.tags.join(", "));
    }
    println!();
}

fn print_literature_detail(item: &Literature) {
    let or_dash = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".into());
    println!("ID:        {}", item.id);
    println!("Title:     {}", item.title);
    println!("Authors:   {}", item.authors);
    println!("Year:      {}", item.year);
    println!("Journal:   {}", item.journal);
    println!("Volume:    {}", or_dash(&item.volume));
    println!("Pages:     {}", or_dash(&item.pages));
    println!("DOI:       {}", or_dash(&item.doi));
    println!("URL:       {}", or_dash(&item.url));
    println!("Status:    {}", format_literature_status(item.status));
    println!("Priority:  {}", format_priority(item.priority));
    println!("Saved:     {}", if item.saved { "yes" } else { "no" });
    println!("Added:     {}", item.added_date);
    println!("Tags:      {}", item.tags.join(", "));
    println!("Abstract:\n{}\n", item.abstract_text);
    if let Some(notes) = &item.notes {
        println!("Notes:\n{}\n", notes);
    }
    println!("Citation:\n{}", citation(item));
}

/// Print a completion script for `shell` to stdout.
pub fn cmd_completions(shell: Shell) {
    use clap::CommandFactory;
    use crate::cli::Cli;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar() {
        assert_eq!(bar(0, 10), "[----------]");
        assert_eq!(bar(50, 10), "[#####-----]");
        assert_eq!(bar(100, 4), "[####]");
        assert_eq!(bar(250, 4), "[####]");
    }

    #[test]
    fn test_task_fields_overlay() {
        let today = chrono::NaiveDate::from_ymd_opt(2026, 1, 7).unwrap();
        let mut draft = TaskDraft::new(today);
        let fields = TaskFields {
            phase: Some(Phase::III),
            due: Some("in 2d".into()),
            lit: vec![4, 5],
            ..Default::default()
        };
        fields.apply(&mut draft, today).unwrap();
        assert_eq!(draft.phase, Phase::III);
        assert_eq!(draft.due_date, chrono::NaiveDate::from_ymd_opt(2026, 1, 9).unwrap());
        assert_eq!(draft.related_literature, Some(vec![4, 5]));

        let bad = TaskFields { due: Some("whenever".into()), ..Default::default() };
        assert!(bad.apply(&mut draft, today).is_err());
    }

    #[test]
    fn test_lit_fields_overlay_splits_tags() {
        let mut draft = LiteratureDraft::new(2026);
        let fields = LitFields {
            title: Some("Recycling routes".into()),
            tags: vec!["recycling, policy".into()],
            status: Some(LiteratureStatus::ToRead),
            ..Default::default()
        };
        fields.apply(&mut draft);
        assert_eq!(draft.title, "Recycling routes");
        assert_eq!(draft.tags, vec!["recycling", "policy"]);
        assert_eq!(draft.status, LiteratureStatus::ToRead);
        assert_eq!(draft.year, 2026);
    }
}
