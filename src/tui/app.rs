//! Main application logic for the terminal user interface.
//!
//! `App` owns the loaded collections and all screen state: the dashboard,
//! the task list/board/timeline, the paged literature browser, and the shared
//! add/edit/view/delete dialog. Input is read in `handle_input` and dispatched
//! by `handle_key` so the key flows can be driven from tests.

use std::path::Path;
use std::time::{Duration, Instant};

use chrono::{Datelike, Local};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Tabs, Wrap},
    Frame, Terminal,
};

use crate::citation::{citation, short_authors};
use crate::dashboard::{DashboardExport, DashboardStats};
use crate::db::*;
use crate::error::Result;
use crate::fields::{LiteratureFilter, LiteratureView, TaskView};
use crate::literature::Literature;
use crate::modal::Modal;
use crate::project::Project;
use crate::query::{page_window, paginate, timeline, LiteratureQuery, Page, TaskQuery};
use crate::task::Task;
use crate::transfer::{export_path, export_timestamp, write_json, ExportKind, LiteratureExport, TaskExport};
use crate::tui::{
    board::{render_board, BoardState},
    colors::{priority_color, status_color, DARK_GREEN, DARK_PURPLE, DARK_RED, GOLD},
    dashboard_view::{render_dashboard, DashboardFrame},
    enums::{InputMode, Screen},
    input::InputField,
    literature_form::{self, LiteratureForm},
    task_form::{self, TaskForm},
    utils::{centered_rect, cycle_index},
};

/// Page numbers shown in the literature pager.
const PAGER_WIDTH: usize = 5;

pub struct App {
    project: Project,
    screen: Screen,
    tasks: TaskDb,
    literature: LiteratureDb,
    stats: DashboardStats,
    task_query: TaskQuery,
    task_view: TaskView,
    filtered_tasks: Vec<u64>,
    task_table: TableState,
    board: BoardState,
    lit_query: LiteratureQuery,
    lit_view: LiteratureView,
    lit_page: Page<u64>,
    lit_table: TableState,
    modal: Modal,
    task_form: TaskForm,
    lit_form: LiteratureForm,
    input_mode: InputMode,
    input: InputField,
    status_message: String,
    show_help: bool,
    citation_popup: Option<String>,
    last_stats_refresh: Instant,
    last_full_refresh: Instant,
}

impl App {
    /// Load both collections from the project store and build the initial views.
    pub fn new(mut project: Project, screen: Screen) -> Result<Self> {
        let tasks = project.load_tasks()?;
        let literature = project.load_literature()?;
        let today = today();
        let stats = DashboardStats::compute(&tasks.tasks, today, project.config.urgent_days);

        let mut app = App {
            project,
            screen,
            tasks,
            literature,
            stats,
            task_query: TaskQuery::default(),
            task_view: TaskView::List,
            filtered_tasks: Vec::new(),
            task_table: TableState::default(),
            board: BoardState::default(),
            lit_query: LiteratureQuery::default(),
            lit_view: LiteratureView::Grid,
            lit_page: paginate::<u64>(&[], 1, 1),
            lit_table: TableState::default(),
            modal: Modal::Closed,
            task_form: TaskForm::new(today),
            lit_form: LiteratureForm::new(today.year()),
            input_mode: InputMode::None,
            input: InputField::new(),
            status_message: String::new(),
            show_help: false,
            citation_popup: None,
            last_stats_refresh: Instant::now(),
            last_full_refresh: Instant::now(),
        };
        app.update_filtered_tasks();
        app.update_literature_page(1);
        Ok(app)
    }

    fn set_status_message(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }

    fn clear_status_message(&mut self) {
        self.status_message.clear();
    }

    /// Report a failed operation in the status bar.
    fn report(&mut self, result: Result<()>) {
        if let Err(e) = result {
            tracing::error!(error = %e, "operation failed");
            self.set_status_message(format!("Error: {}", e));
        }
    }

    // ---- views -------------------------------------------------------------

    fn update_filtered_tasks(&mut self) {
        let matching = self.task_query.apply(&self.tasks.tasks);
        self.filtered_tasks = match self.task_view {
            TaskView::Timeline => {
                let owned: Vec<Task> = matching.into_iter().cloned().collect();
                timeline(&owned).iter().map(|t| t.id).collect()
            }
            _ => matching.iter().map(|t| t.id).collect(),
        };

        if self.filtered_tasks.is_empty() {
            self.task_table.select(None);
        } else {
            let idx = self.task_table.selected().unwrap_or(0).min(self.filtered_tasks.len() - 1);
            self.task_table.select(Some(idx));
        }
        let visible = self.visible_tasks();
        self.board.clamp(&visible);
    }

    /// Filtered tasks, in filter order.
    fn visible_tasks(&self) -> Vec<Task> {
        self.filtered_tasks.iter().filter_map(|&id| self.tasks.get(id)).cloned().collect()
    }

    fn update_literature_page(&mut self, page: usize) {
        let ids: Vec<u64> = self
            .lit_query
            .apply(&self.literature.items, self.project.config.recent_since_year)
            .iter()
            .map(|item| item.id)
            .collect();
        self.lit_page = paginate(&ids, page, self.project.config.page_size);

        if self.lit_page.items.is_empty() {
            self.lit_table.select(None);
        } else {
            let idx = self.lit_table.selected().unwrap_or(0).min(self.lit_page.items.len() - 1);
            self.lit_table.select(Some(idx));
        }
    }

    /// Recompute every derived view after the collections change.
    fn rebuild_views(&mut self) {
        self.stats = DashboardStats::compute(&self.tasks.tasks, today(), self.project.config.urgent_days);
        self.last_stats_refresh = Instant::now();
        self.update_filtered_tasks();
        self.update_literature_page(self.lit_page.page);
    }

    fn selected_task_id(&self) -> Option<u64> {
        match self.task_view {
            TaskView::Board => self.board.selected_id(&self.visible_tasks()),
            _ => self.task_table.selected().and_then(|i| self.filtered_tasks.get(i).copied()),
        }
    }

    fn selected_literature_id(&self) -> Option<u64> {
        self.lit_table.selected().and_then(|i| self.lit_page.items.get(i).copied())
    }

    /// Re-read both collections from the store.
    fn reload(&mut self) -> Result<()> {
        self.tasks = self.project.load_tasks()?;
        self.literature = self.project.load_literature()?;
        self.last_full_refresh = Instant::now();
        self.rebuild_views();
        tracing::debug!(tasks = self.tasks.tasks.len(), literature = self.literature.items.len(), "reloaded");
        Ok(())
    }

    /// Timed refreshes: stats on the short interval, a full reload on the long one.
    /// A full reload waits while a dialog is open.
    fn tick(&mut self) {
        let config = &self.project.config;
        let stats_every = Duration::from_secs(config.stats_refresh_secs);
        let full_every = Duration::from_secs(config.full_refresh_secs);

        if self.last_full_refresh.elapsed() >= full_every && !self.modal.is_open() {
            let result = self.reload();
            self.report(result);
        } else if self.last_stats_refresh.elapsed() >= stats_every {
            self.stats = DashboardStats::compute(&self.tasks.tasks, today(), self.project.config.urgent_days);
            self.last_stats_refresh = Instant::now();
        }
    }

    // ---- persistence -------------------------------------------------------

    fn save_tasks(&mut self) -> Result<()> {
        self.project.save_tasks(&self.tasks)?;
        self.rebuild_views();
        Ok(())
    }

    fn save_literature(&mut self) -> Result<()> {
        self.project.save_literature(&self.literature)?;
        self.rebuild_views();
        Ok(())
    }

    fn submit_task_form(&mut self) {
        let today = today();
        let draft = match self.task_form.to_draft(today) {
            Ok(draft) => draft,
            Err(e) => {
                self.set_status_message(e.to_string());
                return;
            }
        };
        let outcome = match self.modal {
            Modal::Edit(id) => self.tasks.update(id, draft, today).map(|_| format!("Task updated successfully! (#{})", id)),
            _ => self.tasks.add(draft, today).map(|id| format!("Task created successfully! (#{})", id)),
        };
        match outcome.and_then(|msg| self.save_tasks().map(|_| msg)) {
            Ok(msg) => {
                self.modal.close();
                self.set_status_message(msg);
            }
            Err(e) => self.set_status_message(format!("Error: {}", e)),
        }
    }

    fn submit_literature_form(&mut self) {
        let draft = match self.lit_form.to_draft() {
            Ok(draft) => draft,
            Err(e) => {
                self.set_status_message(e.to_string());
                return;
            }
        };
        let outcome = match self.modal {
            Modal::Edit(id) => self
                .literature
                .update(id, draft)
                .map(|_| format!("Literature updated successfully! (#{})", id)),
            _ => self
                .literature
                .add(draft, today())
                .map(|id| format!("Literature added successfully! (#{})", id)),
        };
        match outcome.and_then(|msg| self.save_literature().map(|_| msg)) {
            Ok(msg) => {
                self.modal.close();
                self.set_status_message(msg);
            }
            Err(e) => self.set_status_message(format!("Error: {}", e)),
        }
    }

    fn delete_confirmed(&mut self) {
        let Some(id) = self.modal.confirm() else {
            return;
        };
        let result = match self.screen {
            Screen::Literature => self
                .literature
                .remove(id)
                .and_then(|_| self.save_literature())
                .map(|_| format!("Literature deleted successfully! (#{})", id)),
            _ => self
                .tasks
                .remove(id)
                .and_then(|_| self.save_tasks())
                .map(|_| format!("Task deleted successfully! (#{})", id)),
        };
        match result {
            Ok(msg) => self.set_status_message(msg),
            Err(e) => self.set_status_message(format!("Error: {}", e)),
        }
    }

    fn complete_selected_task(&mut self) {
        let Some(id) = self.selected_task_id() else {
            return;
        };
        let result = self.tasks.complete(id, today()).and_then(|_| self.save_tasks());
        match result {
            Ok(()) => self.set_status_message(format!("Task marked as complete! (#{})", id)),
            Err(e) => self.set_status_message(format!("Error: {}", e)),
        }
    }

    fn toggle_saved(&mut self, id: u64) {
        let result = self.literature.toggle_saved(id).and_then(|saved| self.save_literature().map(|_| saved));
        match result {
            Ok(true) => self.set_status_message(format!("Added to saved items (#{})", id)),
            Ok(false) => self.set_status_message(format!("Removed from saved items (#{})", id)),
            Err(e) => self.set_status_message(format!("Error: {}", e)),
        }
    }

    /// Write the current screen's collection to the working directory.
    fn export(&mut self) {
        let today = today();
        let here = Path::new(".");
        let result = match self.screen {
            Screen::Dashboard => {
                let path = export_path(None, here, ExportKind::Dashboard, today);
                let snapshot = DashboardExport::build(&self.tasks.tasks, &self.project.config, today, export_timestamp());
                write_json(&path, &snapshot).map(|_| format!("Dashboard data exported to {}", path.display()))
            }
            Screen::Tasks => {
                let path = export_path(None, here, ExportKind::Tasks, today);
                let export = TaskExport::new(&self.project.config.project_name, export_timestamp(), &self.tasks.tasks);
                write_json(&path, &export)
                    .map(|_| format!("Exported {} tasks to {}", self.tasks.tasks.len(), path.display()))
            }
            Screen::Literature => {
                let path = export_path(None, here, ExportKind::Literature, today);
                write_json(&path, &LiteratureExport::new(export_timestamp(), &self.literature.items))
                    .map(|_| format!("Exported {} entries to {}", self.literature.items.len(), path.display()))
            }
        };
        match result {
            Ok(msg) => self.set_status_message(msg),
            Err(e) => self.set_status_message(format!("Error: {}", e)),
        }
    }

    // ---- dialogs -----------------------------------------------------------

    fn open_add(&mut self) {
        let today = today();
        match self.screen {
            Screen::Tasks => self.task_form = TaskForm::new(today),
            Screen::Literature => self.lit_form = LiteratureForm::new(today.year()),
            Screen::Dashboard => return,
        }
        self.modal.open_add();
    }

    /// Fill the edit form for `id`; `false` when the record is gone.
    fn load_edit_form(&mut self, id: u64) -> bool {
        match self.screen {
            Screen::Tasks => match self.tasks.get(id) {
                Some(task) => self.task_form = TaskForm::from_task(task),
                None => return false,
            },
            Screen::Literature => match self.literature.get(id) {
                Some(item) => self.lit_form = LiteratureForm::from_literature(item),
                None => return false,
            },
            Screen::Dashboard => return false,
        }
        true
    }

    fn open_edit(&mut self, id: u64) {
        if self.load_edit_form(id) {
            self.modal.open_edit(id);
        }
    }

    // ---- input -------------------------------------------------------------

    /// Dispatch one key press. Returns `true` when the app should quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.kind != KeyEventKind::Press {
            return false;
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }
        self.clear_status_message();

        if self.show_help {
            self.show_help = false;
            return false;
        }
        if self.citation_popup.is_some() {
            self.citation_popup = None;
            return false;
        }
        if self.input_mode != InputMode::None {
            self.handle_text_input(key.code);
            return false;
        }
        match self.modal {
            Modal::Closed => self.handle_screen_input(key.code),
            Modal::Add | Modal::Edit(_) => {
                self.handle_form_input(key.code);
                false
            }
            Modal::View(id) => {
                self.handle_view_input(key.code, id);
                false
            }
            Modal::ConfirmDelete(_) => {
                self.handle_confirm_input(key.code);
                false
            }
        }
    }

    fn handle_screen_input(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Tab => self.screen = self.screen.next(),
            KeyCode::BackTab => self.screen = self.screen.prev(),
            KeyCode::Char('1') => self.screen = Screen::Dashboard,
            KeyCode::Char('2') => self.screen = Screen::Tasks,
            KeyCode::Char('3') => self.screen = Screen::Literature,
            KeyCode::Char('h') | KeyCode::Char('?') | KeyCode::F(1) => self.show_help = true,
            KeyCode::Char('r') => {
                let result = self.reload();
                self.report(result);
                if self.status_message.is_empty() {
                    self.set_status_message("Data reloaded");
                }
            }
            KeyCode::Char('x') => self.export(),
            _ => match self.screen {
                Screen::Dashboard => {}
                Screen::Tasks => self.handle_task_keys(key),
                Screen::Literature => self.handle_literature_keys(key),
            },
        }
        false
    }

    fn handle_task_keys(&mut self, key: KeyCode) {
        let board = self.task_view == TaskView::Board;
        match key {
            KeyCode::Down | KeyCode::Char('j') if board => {
                let visible = self.visible_tasks();
                self.board.move_card(&visible, true);
            }
            KeyCode::Up | KeyCode::Char('k') if board => {
                let visible = self.visible_tasks();
                self.board.move_card(&visible, false);
            }
            KeyCode::Left if board => {
                let visible = self.visible_tasks();
                self.board.move_column(&visible, false);
            }
            KeyCode::Right if board => {
                let visible = self.visible_tasks();
                self.board.move_column(&visible, true);
            }
            KeyCode::Down | KeyCode::Char('j') => step_table(&mut self.task_table, self.filtered_tasks.len(), true),
            KeyCode::Up | KeyCode::Char('k') => step_table(&mut self.task_table, self.filtered_tasks.len(), false),
            KeyCode::Char('v') => {
                self.task_view = match self.task_view {
                    TaskView::List => TaskView::Board,
                    TaskView::Board => TaskView::Timeline,
                    TaskView::Timeline => TaskView::List,
                };
                self.update_filtered_tasks();
            }
            KeyCode::Char('/') => self.begin_input(InputMode::Search),
            KeyCode::Char(':') => self.begin_input(InputMode::Filter),
            KeyCode::Char('a') => self.open_add(),
            KeyCode::Char('e') => {
                if let Some(id) = self.selected_task_id() {
                    self.open_edit(id);
                }
            }
            KeyCode::Enter => {
                if let Some(id) = self.selected_task_id() {
                    self.modal.open_view(id);
                }
            }
            KeyCode::Char('c') => self.complete_selected_task(),
            KeyCode::Char('d') => {
                if let Some(id) = self.selected_task_id() {
                    self.modal.prompt_delete(id);
                }
            }
            _ => {}
        }
    }

    fn handle_literature_keys(&mut self, key: KeyCode) {
        match key {
            KeyCode::Down | KeyCode::Char('j') => step_table(&mut self.lit_table, self.lit_page.items.len(), true),
            KeyCode::Up | KeyCode::Char('k') => step_table(&mut self.lit_table, self.lit_page.items.len(), false),
            KeyCode::Right | KeyCode::PageDown => {
                if self.lit_page.page < self.lit_page.total_pages {
                    self.lit_table.select(Some(0));
                    self.update_literature_page(self.lit_page.page + 1);
                }
            }
            KeyCode::Left | KeyCode::PageUp => {
                if self.lit_page.page > 1 {
                    self.lit_table.select(Some(0));
                    self.update_literature_page(self.lit_page.page - 1);
                }
            }
            KeyCode::Char('/') => self.begin_input(InputMode::Search),
            KeyCode::Char('t') => self.begin_input(InputMode::Tag),
            KeyCode::Char('f') => {
                let filters = LiteratureFilter::cycle();
                let current = filters.iter().position(|&f| f == self.lit_query.filter).unwrap_or(0);
                self.lit_query.filter = filters[cycle_index(current, filters.len(), true)];
                self.update_literature_page(1);
                self.set_status_message(format!("Filter: {}", format_literature_filter(self.lit_query.filter)));
            }
            KeyCode::Char('v') => {
                self.lit_view = match self.lit_view {
                    LiteratureView::Grid => LiteratureView::List,
                    LiteratureView::List => LiteratureView::Grid,
                };
            }
            KeyCode::Char('s') => {
                if let Some(id) = self.selected_literature_id() {
                    self.toggle_saved(id);
                }
            }
            KeyCode::Char('c') => {
                if let Some(item) = self.selected_literature_id().and_then(|id| self.literature.get(id)) {
                    self.citation_popup = Some(citation(item));
                }
            }
            KeyCode::Char('a') => self.open_add(),
            KeyCode::Char('e') => {
                if let Some(id) = self.selected_literature_id() {
                    self.open_edit(id);
                }
            }
            KeyCode::Enter => {
                if let Some(id) = self.selected_literature_id() {
                    self.modal.open_view(id);
                }
            }
            KeyCode::Char('d') => {
                if let Some(id) = self.selected_literature_id() {
                    self.modal.prompt_delete(id);
                }
            }
            _ => {}
        }
    }

    fn begin_input(&mut self, mode: InputMode) {
        let current = match mode {
            InputMode::Search if self.screen == Screen::Tasks => self.task_query.search.clone(),
            InputMode::Search => self.lit_query.search.clone(),
            InputMode::Tag => self.lit_query.category.clone().unwrap_or_default(),
            InputMode::Filter | InputMode::None => String::new(),
        };
        self.input = InputField::with_value(&current);
        self.input.active = true;
        self.input_mode = mode;
    }

    /// Search narrows as you type; tag and filter apply on Enter.
    fn handle_text_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                self.input.clear();
                if self.input_mode == InputMode::Search {
                    self.apply_search();
                }
                self.input_mode = InputMode::None;
            }
            KeyCode::Enter => {
                match self.input_mode {
                    InputMode::Search => self.apply_search(),
                    InputMode::Tag => {
                        let tag = self.input.value.trim();
                        self.lit_query.category = (!tag.is_empty()).then(|| tag.to_string());
                        self.update_literature_page(1);
                    }
                    InputMode::Filter => {
                        let expr = self.input.value.clone();
                        match self.task_query.apply_filter_expr(&expr) {
                            Ok(()) => self.update_filtered_tasks(),
                            Err(e) => self.set_status_message(format!("Error: {}", e)),
                        }
                    }
                    InputMode::None => {}
                }
                self.input_mode = InputMode::None;
            }
            KeyCode::Backspace => {
                self.input.handle_backspace();
                if self.input_mode == InputMode::Search {
                    self.apply_search();
                }
            }
            KeyCode::Delete => self.input.handle_delete(),
            KeyCode::Left => self.input.move_cursor_left(),
            KeyCode::Right => self.input.move_cursor_right(),
            KeyCode::Char(c) => {
                self.input.handle_char(c);
                if self.input_mode == InputMode::Search {
                    self.apply_search();
                }
            }
            _ => {}
        }
    }

    fn apply_search(&mut self) {
        if self.screen == Screen::Tasks {
            self.task_query.search = self.input.value.clone();
            self.update_filtered_tasks();
        } else {
            self.lit_query.search = self.input.value.clone();
            self.update_literature_page(1);
        }
    }

    fn handle_form_input(&mut self, key: KeyCode) {
        let literature = self.screen == Screen::Literature;
        match key {
            KeyCode::Esc => {
                self.modal.close();
                self.set_status_message("Cancelled.");
            }
            KeyCode::Enter if literature => self.submit_literature_form(),
            KeyCode::Enter => self.submit_task_form(),
            KeyCode::Tab | KeyCode::Down if literature => self.lit_form.next_field(),
            KeyCode::BackTab | KeyCode::Up if literature => self.lit_form.prev_field(),
            KeyCode::Left if literature => self.lit_form.handle_left_right(false),
            KeyCode::Right if literature => self.lit_form.handle_left_right(true),
            KeyCode::Backspace if literature => self.lit_form.handle_backspace(),
            KeyCode::Delete if literature => self.lit_form.handle_delete(),
            KeyCode::Char(c) if literature => self.lit_form.handle_char(c),
            KeyCode::Tab | KeyCode::Down => self.task_form.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.task_form.prev_field(),
            KeyCode::Left => self.task_form.handle_left_right(false),
            KeyCode::Right => self.task_form.handle_left_right(true),
            KeyCode::Backspace => self.task_form.handle_backspace(),
            KeyCode::Delete => self.task_form.handle_delete(),
            KeyCode::Char(c) => self.task_form.handle_char(c),
            _ => {}
        }
    }

    fn handle_view_input(&mut self, key: KeyCode, id: u64) {
        match key {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter => self.modal.close(),
            KeyCode::Char('e') => {
                if self.load_edit_form(id) {
                    self.modal.edit_viewed();
                }
            }
            KeyCode::Char('d') => self.modal.prompt_delete(id),
            KeyCode::Char('s') if self.screen == Screen::Literature => self.toggle_saved(id),
            KeyCode::Char('c') if self.screen == Screen::Tasks => {
                let result = self.tasks.complete(id, today()).and_then(|_| self.save_tasks());
                match result {
                    Ok(()) => self.set_status_message(format!("Task marked as complete! (#{})", id)),
                    Err(e) => self.set_status_message(format!("Error: {}", e)),
                }
            }
            _ => {}
        }
    }

    fn handle_confirm_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('y') | KeyCode::Char('Y') => self.delete_confirmed(),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.modal.close();
                self.set_status_message("Cancelled.");
            }
            _ => {}
        }
    }

    fn handle_input(&mut self) -> Result<bool> {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                return Ok(self.handle_key(key));
            }
        }
        Ok(false)
    }

    // ---- rendering ---------------------------------------------------------

    fn screen_color(&self) -> Color {
        match self.screen {
            Screen::Dashboard => Color::Blue,
            Screen::Tasks => DARK_GREEN,
            Screen::Literature => DARK_PURPLE,
        }
    }

    fn render_tabs(&self, f: &mut Frame, area: Rect) {
        let titles: Vec<Line> = Screen::ALL
            .iter()
            .enumerate()
            .map(|(i, s)| Line::from(format!("{} {}", i + 1, s.title())))
            .collect();
        let tabs = Tabs::new(titles)
            .block(Block::default().borders(Borders::ALL).title(self.project.config.project_name.as_str()))
            .select(self.screen.index())
            .highlight_style(Style::default().fg(GOLD).add_modifier(Modifier::BOLD));
        f.render_widget(tabs, area);
    }

    fn render_tasks(&mut self, f: &mut Frame, area: Rect) {
        let today = today();
        let title = format!(
            "Tasks ({}/{}) - {:?} view{} - Press 'h' for help",
            self.filtered_tasks.len(),
            self.tasks.tasks.len(),
            self.task_view,
            query_suffix(&self.task_query),
        );

        if self.task_view == TaskView::Board {
            let block = Block::default().borders(Borders::ALL).title(title);
            let inner = block.inner(area);
            f.render_widget(block, area);
            let visible = self.visible_tasks();
            render_board(f, inner, &visible, &mut self.board, &self.project.config, today);
            return;
        }

        let header_cells = ["ID", "Phase", "Status", "Priority", "Due", "Progress", "Name"]
            .iter()
            .map(|h| Cell::from(*h).style(Style::default().add_modifier(Modifier::BOLD)));
        let header = Row::new(header_cells)
            .style(Style::default().bg(DARK_GREEN).fg(Color::White))
            .height(1);

        let rows: Vec<Row> = self
            .filtered_tasks
            .iter()
            .filter_map(|&id| self.tasks.get(id))
            .map(|task| {
                let style = if task.is_complete() {
                    Style::default().fg(Color::DarkGray)
                } else if days_until(task.due_date, today) < 0 {
                    Style::default().fg(Color::Red)
                } else {
                    Style::default()
                };
                let due = match self.task_view {
                    TaskView::Timeline => format!("{} ({})", format_date_short(task.due_date), format_due_relative(task.due_date, today)),
                    _ => format_due_relative(task.due_date, today),
                };
                Row::new(vec![
                    Cell::from(task.id.to_string()),
                    Cell::from(format_phase(task.phase)),
                    Cell::from(format_status(task.status)).style(Style::default().fg(status_color(task.status))),
                    Cell::from(format_priority(task.priority)).style(Style::default().fg(priority_color(task.priority))),
                    Cell::from(due),
                    Cell::from(format!("{}%", task.progress)),
                    Cell::from(task.name.clone()),
                ])
                .style(style)
            })
            .collect();

        let due_width = if self.task_view == TaskView::Timeline { 26 } else { 14 };
        let widths = [
            Constraint::Length(4),
            Constraint::Length(6),
            Constraint::Length(13),
            Constraint::Length(9),
            Constraint::Length(due_width),
            Constraint::Length(9),
            Constraint::Min(20),
        ];
        let table = Table::new(rows, widths)
            .header(header)
            .block(Block::default().borders(Borders::ALL).title(title))
            .row_highlight_style(Style::default().bg(Color::Gray).fg(Color::Black))
            .highlight_symbol(">> ");
        f.render_stateful_widget(table, area, &mut self.task_table);
    }

    fn render_literature(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(1)])
            .split(area);

        let stats = self.literature.stats(self.project.config.recent_since_year);
        let summary = Paragraph::new(Line::from(vec![
            Span::styled(format!("{} total", stats.total), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(format!("  {} saved  {} recent  {} journals", stats.saved, stats.recent, stats.journals)),
            Span::styled(
                format!(
                    "  Filter: {}{}{}",
                    format_literature_filter(self.lit_query.filter),
                    self.lit_query.category.as_deref().map(|t| format!("  Tag: {}", t)).unwrap_or_default(),
                    if self.lit_query.search.is_empty() { String::new() } else { format!("  Search: '{}'", self.lit_query.search) },
                ),
                Style::default().fg(Color::Cyan),
            ),
        ]))
        .block(Block::default().borders(Borders::ALL).title("Literature"))
        .alignment(Alignment::Center);
        f.render_widget(summary, chunks[0]);

        let items: Vec<&Literature> = self.lit_page.items.iter().filter_map(|&id| self.literature.get(id)).collect();
        if items.is_empty() {
            let empty = Paragraph::new("No literature found")
                .block(Block::default().borders(Borders::ALL))
                .alignment(Alignment::Center);
            f.render_widget(empty, chunks[1]);
        } else {
            match self.lit_view {
                LiteratureView::Grid => {
                    let selected = self.lit_table.selected();
                    render_literature_grid(f, chunks[1], &items, selected);
                }
                LiteratureView::List => {
                    let header = Row::new(
                        ["ID", "", "Year", "Authors", "Journal", "Status", "Title"]
                            .iter()
                            .map(|h| Cell::from(*h).style(Style::default().add_modifier(Modifier::BOLD))),
                    )
                    .style(Style::default().bg(DARK_PURPLE).fg(Color::White));
                    let rows: Vec<Row> = items
                        .iter()
                        .map(|item| {
                            Row::new(vec![
                                Cell::from(item.id.to_string()),
                                Cell::from(if item.saved { "★" } else { " " }).style(Style::default().fg(GOLD)),
                                Cell::from(item.year.to_string()),
                                Cell::from(short_authors(item)),
                                Cell::from(item.journal.clone()),
                                Cell::from(format_literature_status(item.status)),
                                Cell::from(item.title.clone()),
                            ])
                        })
                        .collect();
                    let widths = [
                        Constraint::Length(4),
                        Constraint::Length(2),
                        Constraint::Length(5),
                        Constraint::Length(18),
                        Constraint::Length(22),
                        Constraint::Length(9),
                        Constraint::Min(20),
                    ];
                    let table = Table::new(rows, widths)
                        .header(header)
                        .block(Block::default().borders(Borders::ALL))
                        .row_highlight_style(Style::default().bg(Color::Gray).fg(Color::Black))
                        .highlight_symbol(">> ");
                    f.render_stateful_widget(table, chunks[1], &mut self.lit_table);
                }
            }
        }

        f.render_widget(Paragraph::new(pager_line(&self.lit_page, self.project.config.page_size)), chunks[2]);
    }

    fn render_task_view(&self, f: &mut Frame, area: Rect, id: u64) {
        let Some(task) = self.tasks.get(id) else {
            return;
        };
        let today = today();
        let area = centered_rect(70, 70, area);
        f.render_widget(Clear, area);

        let related: Vec<String> = task
            .related_literature
            .iter()
            .map(|lid| match self.literature.get(*lid) {
                Some(item) => format!("  #{} {} ({})", lid, item.title, item.year),
                None => format!("  #{} (missing)", lid),
            })
            .collect();

        let mut text = vec![
            Line::from(Span::styled(task.name.clone(), Style::default().add_modifier(Modifier::BOLD))),
            Line::from(""),
            detail_line("Phase", format!("{} - {}", format_phase(task.phase), phase_name(task.phase))),
            detail_line("Status", format_status(task.status).to_string()),
            detail_line("Priority", format_priority(task.priority).to_string()),
            detail_line("Due", format!("{} ({})", format_date_short(task.due_date), format_due_relative(task.due_date, today))),
            detail_line("Progress", format!("{}%", task.progress)),
            detail_line("Deliverable", task.deliverable_text().to_string()),
            detail_line("Updated", format_date_short(task.updated_at)),
            Line::from(""),
            Line::from(task.description.clone()),
        ];
        if !related.is_empty() {
            text.push(Line::from(""));
            text.push(Line::from(Span::styled("Related literature:", Style::default().add_modifier(Modifier::BOLD))));
            text.extend(related.into_iter().map(Line::from));
        }

        let paragraph = Paragraph::new(text)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("Task #{} - e edit, c complete, d delete, Esc close", task.id))
                    .border_style(Style::default().fg(GOLD)),
            )
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    fn render_literature_view(&self, f: &mut Frame, area: Rect, id: u64) {
        let Some(item) = self.literature.get(id) else {
            return;
        };
        let area = centered_rect(75, 75, area);
        f.render_widget(Clear, area);

        let mut text = vec![
            Line::from(Span::styled(item.title.clone(), Style::default().add_modifier(Modifier::BOLD))),
            Line::from(""),
            detail_line("Authors", item.authors.clone()),
            detail_line("Year", item.year.to_string()),
            detail_line("Journal", item.journal.clone()),
            detail_line("Status", format_literature_status(item.status).to_string()),
            detail_line("Priority", format_priority(item.priority).to_string()),
            detail_line("Tags", item.tags.join(", ")),
            detail_line("Saved", if item.saved { "yes".into() } else { "no".into() }),
            detail_line("Added", format_date_short(item.added_date)),
        ];
        for (label, value) in [("Volume", &item.volume), ("Pages", &item.pages), ("DOI", &item.doi), ("URL", &item.url)] {
            if let Some(v) = value {
                text.push(detail_line(label, v.clone()));
            }
        }
        text.push(Line::from(""));
        text.push(Line::from(item.abstract_text.clone()));
        if let Some(notes) = &item.notes {
            text.push(Line::from(""));
            text.push(detail_line("Notes", notes.clone()));
        }
        text.push(Line::from(""));
        text.push(Line::from(Span::styled(citation(item), Style::default().fg(Color::Cyan))));

        let paragraph = Paragraph::new(text)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("Literature #{} - e edit, s save, d delete, Esc close", item.id))
                    .border_style(Style::default().fg(GOLD)),
            )
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    fn render_task_form(&self, f: &mut Frame, area: Rect) {
        let title = if matches!(self.modal, Modal::Edit(_)) { "Edit Task" } else { "Add Task" };
        let area = centered_rect(70, 90, area);
        f.render_widget(Clear, area);
        let block = Block::default().borders(Borders::ALL).title(title).border_style(Style::default().fg(GOLD));
        let inner = block.inner(area);
        f.render_widget(block, area);

        let mut constraints = vec![Constraint::Length(3); task_form::FIELD_COUNT];
        constraints.push(Constraint::Min(1));
        let chunks = Layout::default().direction(Direction::Vertical).constraints(constraints).split(inner);

        let form = &self.task_form;
        let fields: [(&str, String); task_form::FIELD_COUNT] = [
            ("Name *", form.name.display()),
            ("Description", form.description.display()),
            ("Phase", format!("< {} - {} >", format_phase(form.selected_phase()), phase_name(form.selected_phase()))),
            ("Status", format!("< {} >", format_status(form.selected_status()))),
            ("Priority", format!("< {} >", format_priority(form.selected_priority()))),
            ("Due Date (YYYY-MM-DD, today, in 3d, fri)", form.due.display()),
            ("Deliverable", form.deliverable.display()),
            ("Progress (0-100)", form.progress.display()),
        ];
        for (order, (label, value)) in fields.into_iter().enumerate() {
            render_form_field(f, chunks[order], label, value, form.current_field == order);
        }
        f.render_widget(
            Paragraph::new("Tab/↑↓ move  ←→ change  Enter save  Esc cancel").style(Style::default().fg(Color::Gray)),
            chunks[task_form::FIELD_COUNT],
        );
    }

    fn render_literature_form(&self, f: &mut Frame, area: Rect) {
        let title = if matches!(self.modal, Modal::Edit(_)) { "Edit Literature" } else { "Add Literature" };
        let area = centered_rect(90, 95, area);
        f.render_widget(Clear, area);
        let block = Block::default().borders(Borders::ALL).title(title).border_style(Style::default().fg(GOLD));
        let inner = block.inner(area);
        f.render_widget(block, area);

        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(inner);
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(outer[0]);
        let left_count = literature_form::FIELD_COUNT.div_ceil(2);
        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints(vec![Constraint::Length(3); left_count])
            .split(columns[0]);
        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints(vec![Constraint::Length(3); literature_form::FIELD_COUNT - left_count])
            .split(columns[1]);

        let form = &self.lit_form;
        for order in 0..literature_form::FIELD_COUNT {
            let value = match form.input(order) {
                Some(input) => input.display(),
                None => format!("< {} >", form.selector_value(order).unwrap_or_default()),
            };
            let rect = if order < left_count { left[order] } else { right[order - left_count] };
            render_form_field(f, rect, literature_form::LABELS[order], value, form.current_field == order);
        }
        f.render_widget(
            Paragraph::new("Tab/↑↓ move  ←→ change  Enter save  Esc cancel").style(Style::default().fg(Color::Gray)),
            outer[1],
        );
    }

    fn render_confirm(&self, f: &mut Frame, area: Rect, id: u64) {
        let action = match self.screen {
            Screen::Literature => format!(
                "Delete literature #{}: {}",
                id,
                self.literature.get(id).map(|i| i.title.as_str()).unwrap_or("")
            ),
            _ => format!("Delete task #{}: {}", id, self.tasks.get(id).map(|t| t.name.as_str()).unwrap_or("")),
        };
        let block = Block::default()
            .title("Confirm Action")
            .borders(Borders::ALL)
            .style(Style::default().bg(DARK_RED));

        let area = centered_rect(50, 20, area);
        f.render_widget(Clear, area);

        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "Are you sure you want to:",
                Style::default().add_modifier(Modifier::BOLD),
            )]),
            Line::from(action),
            Line::from(""),
            Line::from("This action cannot be undone."),
            Line::from(""),
            Line::from("Press 'y' to confirm, 'n' to cancel"),
        ];

        let paragraph = Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    fn render_citation(&self, f: &mut Frame, area: Rect, text: &str) {
        let area = centered_rect(70, 25, area);
        f.render_widget(Clear, area);
        let paragraph = Paragraph::new(text.to_string())
            .block(Block::default().borders(Borders::ALL).title("Citation - press any key"))
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    fn render_help(&self, f: &mut Frame, area: Rect) {
        let heading = |s: &'static str| Line::from(Span::styled(s, Style::default().add_modifier(Modifier::BOLD)));
        let help_text = vec![
            heading("Volta Help"),
            Line::from(""),
            heading("Everywhere:"),
            Line::from("  Tab/Shift+Tab, 1-3  Switch screen"),
            Line::from("  r                   Reload from disk"),
            Line::from("  x                   Export current screen as JSON"),
            Line::from("  h/?/F1              Show this help"),
            Line::from("  q/Esc/Ctrl+C        Quit"),
            Line::from(""),
            heading("Tasks:"),
            Line::from("  ↑↓/jk (←→ on board) Move selection"),
            Line::from("  v                   Cycle list, board and timeline views"),
            Line::from("  /                   Search name, description, deliverable"),
            Line::from("  :                   Filter, e.g. phase:II, status:complete, all"),
            Line::from("  a/e/Enter/c/d       Add, edit, view, complete, delete"),
            Line::from(""),
            heading("Literature:"),
            Line::from("  ↑↓/jk               Move selection"),
            Line::from("  ←→/PgUp/PgDn        Previous/next page"),
            Line::from("  / and t             Search text, filter by tag"),
            Line::from("  f                   Cycle all, saved, recent and status filters"),
            Line::from("  v                   Toggle grid and list views"),
            Line::from("  s, c                Toggle saved, show citation"),
            Line::from("  a/e/Enter/d         Add, edit, view, delete"),
            Line::from(""),
            heading("Due Date Formats:"),
            Line::from("  YYYY-MM-DD, today, tomorrow, eow, eom, in 3d, in 2w, fri, next mon"),
        ];

        let paragraph = Paragraph::new(help_text)
            .block(Block::default().borders(Borders::ALL).title("Help - Press any key to return"))
            .wrap(Wrap { trim: true });
        f.render_widget(Clear, area);
        f.render_widget(paragraph, area);
    }

    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let status_text = if self.input_mode != InputMode::None {
            let label = match self.input_mode {
                InputMode::Search => "Search",
                InputMode::Tag => "Tag",
                _ => "Filter",
            };
            format!("{}: {} (Enter to confirm, Esc to clear)", label, self.input.display())
        } else if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            match self.screen {
                Screen::Dashboard => format!(
                    "{} | {} tasks, {} urgent | Press 'h' for help",
                    format_date_long(today()),
                    self.stats.total,
                    self.stats.urgent
                ),
                Screen::Tasks => format!("Tasks: {} | a add, c complete, v view | Press 'h' for help", self.filtered_tasks.len()),
                Screen::Literature => format!(
                    "Literature: {} | f filter, s save, c cite | Press 'h' for help",
                    self.lit_page.total_items
                ),
            }
        };

        let status = Paragraph::new(status_text)
            .style(Style::default().bg(self.screen_color()).fg(Color::White))
            .alignment(Alignment::Left);
        f.render_widget(status, area);
    }

    fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(1)])
            .split(f.area());

        self.render_tabs(f, chunks[0]);
        match self.screen {
            Screen::Dashboard => {
                let frame = DashboardFrame {
                    tasks: &self.tasks.tasks,
                    stats: self.stats,
                    config: &self.project.config,
                    today: today(),
                    now: Local::now().naive_local(),
                };
                render_dashboard(f, chunks[1], &frame);
            }
            Screen::Tasks => self.render_tasks(f, chunks[1]),
            Screen::Literature => self.render_literature(f, chunks[1]),
        }

        let literature = self.screen == Screen::Literature;
        match self.modal {
            m if m.is_form() && literature => self.render_literature_form(f, chunks[1]),
            m if m.is_form() => self.render_task_form(f, chunks[1]),
            Modal::View(id) if literature => self.render_literature_view(f, chunks[1], id),
            Modal::View(id) => self.render_task_view(f, chunks[1], id),
            Modal::ConfirmDelete(id) => self.render_confirm(f, chunks[1], id),
            _ => {}
        }
        if let Some(text) = &self.citation_popup {
            self.render_citation(f, chunks[1], text);
        }
        if self.show_help {
            self.render_help(f, chunks[1]);
        }

        self.render_status_bar(f, chunks[2]);
    }

    /// Main event loop. Draws, applies timed refreshes and handles input until quit.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;
            self.tick();

            if self.handle_input()? {
                break;
            }
        }
        Ok(())
    }
}

fn step_table(state: &mut TableState, len: usize, down: bool) {
    if len == 0 {
        state.select(None);
        return;
    }
    let current = state.selected().unwrap_or(0);
    let next = if down { (current + 1).min(len - 1) } else { current.saturating_sub(1) };
    state.select(Some(next));
}

fn query_suffix(q: &TaskQuery) -> String {
    let mut parts = Vec::new();
    if let Some(p) = q.phase {
        parts.push(format!("phase:{}", format_phase(p)));
    }
    if let Some(s) = q.status {
        parts.push(format!("status:{}", format_status(s)));
    }
    if let Some(p) = q.priority {
        parts.push(format!("priority:{}", format_priority(p)));
    }
    if !q.search.is_empty() {
        parts.push(format!("'{}'", q.search));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" [{}]", parts.join(" "))
    }
}

/// "Showing 13-24 of 30 | Page 2 of 3: 1 [2] 3"
fn pager_line(page: &Page<u64>, page_size: usize) -> String {
    let Some((first, last)) = page.shown_range(page_size) else {
        return "Showing 0 of 0".to_string();
    };
    let numbers: Vec<String> = page_window(page.page, page.total_pages, PAGER_WIDTH)
        .map(|n| if n == page.page { format!("[{}]", n) } else { n.to_string() })
        .collect();
    format!(
        "Showing {}-{} of {} | Page {} of {}: {}",
        first,
        last,
        page.total_items,
        page.page,
        page.total_pages,
        numbers.join(" ")
    )
}

fn detail_line(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:<12}", format!("{}:", label)), Style::default().fg(Color::Gray)),
        Span::raw(value),
    ])
}

fn render_form_field(f: &mut Frame, area: Rect, label: &str, value: String, focused: bool) {
    let style = if focused { Style::default().fg(GOLD) } else { Style::default() };
    let field = Paragraph::new(value).block(
        Block::default()
            .borders(Borders::ALL)
            .title(label.to_string())
            .border_style(style),
    );
    f.render_widget(field, area);
}

/// Cards three to a row, one per literature entry on the page.
fn render_literature_grid(f: &mut Frame, area: Rect, items: &[&Literature], selected: Option<usize>) {
    const COLUMNS: usize = 3;
    const CARD_HEIGHT: u16 = 6;
    let rows = items.len().div_ceil(COLUMNS);
    let visible_rows = (area.height / CARD_HEIGHT).max(1) as usize;
    let selected_row = selected.unwrap_or(0) / COLUMNS;
    let first_row = selected_row.saturating_sub(visible_rows - 1);
    let width = area.width / COLUMNS as u16;

    for row in first_row..rows.min(first_row + visible_rows) {
        for col in 0..COLUMNS {
            let idx = row * COLUMNS + col;
            let Some(item) = items.get(idx) else {
                break;
            };
            let rect = Rect::new(
                area.x + col as u16 * width,
                area.y + (row - first_row) as u16 * CARD_HEIGHT,
                width,
                CARD_HEIGHT,
            );
            let border = if selected == Some(idx) {
                Style::default().fg(GOLD).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            let star = if item.saved { "★ " } else { "" };
            let text = vec![
                Line::from(Span::styled(
                    format!("{}{}", star, truncate(&item.title, width.saturating_sub(4) as usize)),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(format!("{} ({})", short_authors(item), item.year)),
                Line::from(Span::styled(item.journal.clone(), Style::default().add_modifier(Modifier::ITALIC))),
                Line::from(Span::styled(
                    item.tags.iter().map(|t| format!("#{}", t)).collect::<Vec<_>>().join(" "),
                    Style::default().fg(Color::Cyan),
                )),
            ];
            let card = Paragraph::new(text).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border)
                    .title(format!("#{} {}", item.id, format_literature_status(item.status))),
            );
            f.render_widget(card, rect);
        }
    }
}
