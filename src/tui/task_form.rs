//! Task form handling for the terminal user interface.
//!
//! This module provides the `TaskForm` structure used by the add and edit
//! dialogs, the field ordering constants, and conversion of the form into a
//! `TaskDraft`.

use chrono::NaiveDate;

use crate::db::parse_due_input;
use crate::error::{Result, VoltaError};
use crate::fields::{Phase, Priority, TaskStatus};
use crate::task::{Task, TaskDraft};
use crate::tui::input::InputField;
use crate::tui::utils::cycle_index;

/// Order of fields in the task form.
pub const NAME_ORDER: usize = 0;
pub const DESCRIPTION_ORDER: usize = 1;
pub const PHASE_ORDER: usize = 2;
pub const STATUS_ORDER: usize = 3;
pub const PRIORITY_ORDER: usize = 4;
pub const DUE_ORDER: usize = 5;
pub const DELIVERABLE_ORDER: usize = 6;
pub const PROGRESS_ORDER: usize = 7;
pub const FIELD_COUNT: usize = 8;

/// Task form for the add and edit dialogs.
pub struct TaskForm {
    pub name: InputField,
    pub description: InputField,
    pub due: InputField,
    pub deliverable: InputField,
    pub progress: InputField,
    pub phase: usize,
    pub status: usize,
    pub priority: usize,
    pub current_field: usize,
    /// Links carried over from the task being edited.
    related_literature: Option<Vec<u64>>,
}

impl TaskForm {
    /// Blank form with add-dialog defaults.
    pub fn new(today: NaiveDate) -> Self {
        Self::from_draft(&TaskDraft::new(today))
    }

    /// Form populated from an existing task.
    pub fn from_task(task: &Task) -> Self {
        Self::from_draft(&TaskDraft::from_task(task))
    }

    fn from_draft(draft: &TaskDraft) -> Self {
        let mut form = TaskForm {
            name: InputField::with_value(&draft.name),
            description: InputField::with_value(&draft.description),
            due: InputField::with_value(&draft.due_date.to_string()),
            deliverable: InputField::with_value(&draft.deliverable),
            progress: InputField::with_value(&draft.progress.to_string()),
            phase: Phase::ALL.iter().position(|&p| p == draft.phase).unwrap_or(0),
            status: TaskStatus::ALL.iter().position(|&s| s == draft.status).unwrap_or(0),
            priority: Priority::ALL.iter().position(|&p| p == draft.priority).unwrap_or(1),
            current_field: NAME_ORDER,
            related_literature: draft.related_literature.clone(),
        };
        form.update_active_field();
        form
    }

    pub fn selected_phase(&self) -> Phase {
        Phase::ALL[self.phase]
    }

    pub fn selected_status(&self) -> TaskStatus {
        TaskStatus::ALL[self.status]
    }

    pub fn selected_priority(&self) -> Priority {
        Priority::ALL[self.priority]
    }

    /// Text field for the current position; `None` on selectors.
    fn current_input(&mut self) -> Option<&mut InputField> {
        match self.current_field {
            NAME_ORDER => Some(&mut self.name),
            DESCRIPTION_ORDER => Some(&mut self.description),
            DUE_ORDER => Some(&mut self.due),
            DELIVERABLE_ORDER => Some(&mut self.deliverable),
            PROGRESS_ORDER => Some(&mut self.progress),
            _ => None,
        }
    }

    pub fn next_field(&mut self) {
        self.current_field = cycle_index(self.current_field, FIELD_COUNT, true);
        self.update_active_field();
    }

    pub fn prev_field(&mut self) {
        self.current_field = cycle_index(self.current_field, FIELD_COUNT, false);
        self.update_active_field();
    }

    pub fn update_active_field(&mut self) {
        for field in [
            &mut self.name,
            &mut self.description,
            &mut self.due,
            &mut self.deliverable,
            &mut self.progress,
        ] {
            field.active = false;
        }
        if let Some(field) = self.current_input() {
            field.active = true;
        }
    }

    pub fn handle_char(&mut self, c: char) {
        if let Some(field) = self.current_input() {
            field.handle_char(c);
        }
    }

    pub fn handle_backspace(&mut self) {
        if let Some(field) = self.current_input() {
            field.handle_backspace();
        }
    }

    pub fn handle_delete(&mut self) {
        if let Some(field) = self.current_input() {
            field.handle_delete();
        }
    }

    /// Left/right moves the cursor in text fields and cycles selectors.
    pub fn handle_left_right(&mut self, right: bool) {
        match self.current_field {
            PHASE_ORDER => self.phase = cycle_index(self.phase, Phase::ALL.len(), right),
            STATUS_ORDER => self.status = cycle_index(self.status, TaskStatus::ALL.len(), right),
            PRIORITY_ORDER => self.priority = cycle_index(self.priority, Priority::ALL.len(), right),
            _ => {
                if let Some(field) = self.current_input() {
                    if right {
                        field.move_cursor_right()
                    } else {
                        field.move_cursor_left()
                    }
                }
            }
        }
    }

    /// Convert the form into a draft. Bad dates or progress are validation errors.
    pub fn to_draft(&self, today: NaiveDate) -> Result<TaskDraft> {
        let due_date = parse_due_input(&self.due.value, today)
            .ok_or_else(|| VoltaError::Validation(format!("Invalid due date '{}'", self.due.value.trim())))?;
        let progress_text = self.progress.value.trim();
        let progress = if progress_text.is_empty() {
            0
        } else {
            progress_text
                .parse::<u32>()
                .map(|p| p.min(100) as u8)
                .map_err(|_| VoltaError::Validation(format!("Invalid progress '{}'", progress_text)))?
        };
        let draft = TaskDraft {
            name: self.name.value.clone(),
            description: self.description.value.clone(),
            phase: self.selected_phase(),
            status: self.selected_status(),
            priority: self.selected_priority(),
            due_date,
            deliverable: self.deliverable.value.clone(),
            progress,
            related_literature: self.related_literature.clone(),
        };
        draft.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::sample_tasks;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 7).unwrap()
    }

    #[test]
    fn test_new_form_defaults() {
        let form = TaskForm::new(today());
        assert_eq!(form.selected_phase(), Phase::I);
        assert_eq!(form.selected_status(), TaskStatus::NotStarted);
        assert_eq!(form.selected_priority(), Priority::Medium);
        assert_eq!(form.due.value, "2026-01-14");
        assert!(form.name.active);
    }

    #[test]
    fn test_edit_form_round_trips_task() {
        let task = &sample_tasks()[0];
        let form = TaskForm::from_task(task);
        let draft = form.to_draft(today()).unwrap();
        assert_eq!(draft, TaskDraft::from_task(task));
    }

    #[test]
    fn test_selectors_cycle() {
        let mut form = TaskForm::new(today());
        form.current_field = PHASE_ORDER;
        form.handle_left_right(false);
        assert_eq!(form.selected_phase(), Phase::V);
        form.next_field();
        form.handle_left_right(true);
        assert_eq!(form.selected_status(), TaskStatus::InProgress);
        // Typing on a selector is ignored.
        form.handle_char('x');
        assert_eq!(form.name.value, "");
    }

    #[test]
    fn test_invalid_inputs_are_reported() {
        let mut form = TaskForm::new(today());
        assert!(matches!(form.to_draft(today()), Err(VoltaError::Validation(_))));

        form.name = InputField::with_value("Write conclusions");
        form.progress = InputField::with_value("lots");
        assert!(form.to_draft(today()).is_err());

        form.progress = InputField::with_value("250");
        assert_eq!(form.to_draft(today()).unwrap().progress, 100);

        form.due = InputField::with_value("someday");
        assert!(form.to_draft(today()).is_err());

        form.due = InputField::with_value("in 99999999999d");
        match form.to_draft(today()) {
            Err(VoltaError::Validation(msg)) => assert!(msg.starts_with("Invalid due date")),
            other => panic!("expected a validation error, got {:?}", other),
        }
    }
}
