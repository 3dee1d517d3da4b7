//! Literature form for the add and edit dialogs.

use crate::error::{Result, VoltaError};
use crate::fields::{LiteratureStatus, Priority};
use crate::literature::{split_tags, Literature, LiteratureDraft};
use crate::tui::input::InputField;
use crate::tui::utils::cycle_index;

pub const TITLE_ORDER: usize = 0;
pub const AUTHORS_ORDER: usize = 1;
pub const YEAR_ORDER: usize = 2;
pub const JOURNAL_ORDER: usize = 3;
pub const VOLUME_ORDER: usize = 4;
pub const PAGES_ORDER: usize = 5;
pub const ABSTRACT_ORDER: usize = 6;
pub const TAGS_ORDER: usize = 7;
pub const STATUS_ORDER: usize = 8;
pub const PRIORITY_ORDER: usize = 9;
pub const DOI_ORDER: usize = 10;
pub const URL_ORDER: usize = 11;
pub const NOTES_ORDER: usize = 12;
pub const FIELD_COUNT: usize = 13;

/// Labels in field order. A trailing `*` marks required fields.
pub const LABELS: [&str; FIELD_COUNT] = [
    "Title *", "Authors *", "Year", "Journal *", "Volume", "Pages", "Abstract *",
    "Tags * (comma-separated)", "Status", "Priority", "DOI", "URL", "Notes",
];

pub struct LiteratureForm {
    pub title: InputField,
    pub authors: InputField,
    pub year: InputField,
    pub journal: InputField,
    pub volume: InputField,
    pub pages: InputField,
    pub abstract_text: InputField,
    pub tags: InputField,
    pub doi: InputField,
    pub url: InputField,
    pub notes: InputField,
    pub status: usize,
    pub priority: usize,
    pub current_field: usize,
}

impl LiteratureForm {
    /// Blank form with the current year filled in.
    pub fn new(year: i32) -> Self {
        Self::from_draft(&LiteratureDraft::new(year))
    }

    pub fn from_literature(item: &Literature) -> Self {
        Self::from_draft(&LiteratureDraft::from_literature(item))
    }

    fn from_draft(d: &LiteratureDraft) -> Self {
        let mut form = LiteratureForm {
            title: InputField::with_value(&d.title),
            authors: InputField::with_value(&d.authors),
            year: InputField::with_value(&d.year.to_string()),
            journal: InputField::with_value(&d.journal),
            volume: InputField::with_value(&d.volume),
            pages: InputField::with_value(&d.pages),
            abstract_text: InputField::with_value(&d.abstract_text),
            tags: InputField::with_value(&d.tags.join(", ")),
            doi: InputField::with_value(&d.doi),
            url: InputField::with_value(&d.url),
            notes: InputField::with_value(&d.notes),
            status: LiteratureStatus::ALL.iter().position(|&s| s == d.status).unwrap_or(2),
            priority: Priority::ALL.iter().position(|&p| p == d.priority).unwrap_or(1),
            current_field: TITLE_ORDER,
        };
        form.update_active_field();
        form
    }

    pub fn selected_status(&self) -> LiteratureStatus {
        LiteratureStatus::ALL[self.status]
    }

    pub fn selected_priority(&self) -> Priority {
        Priority::ALL[self.priority]
    }

    /// Text field at `order`; `None` for selectors.
    pub fn input(&self, order: usize) -> Option<&InputField> {
        match order {
            TITLE_ORDER => Some(&self.title),
            AUTHORS_ORDER => Some(&self.authors),
            YEAR_ORDER => Some(&self.year),
            JOURNAL_ORDER => Some(&self.journal),
            VOLUME_ORDER => Some(&self.volume),
            PAGES_ORDER => Some(&self.pages),
            ABSTRACT_ORDER => Some(&self.abstract_text),
            TAGS_ORDER => Some(&self.tags),
            DOI_ORDER => Some(&self.doi),
            URL_ORDER => Some(&self.url),
            NOTES_ORDER => Some(&self.notes),
            _ => None,
        }
    }

    fn input_mut(&mut self, order: usize) -> Option<&mut InputField> {
        match order {
            TITLE_ORDER => Some(&mut self.title),
            AUTHORS_ORDER => Some(&mut self.authors),
            YEAR_ORDER => Some(&mut self.year),
            JOURNAL_ORDER => Some(&mut self.journal),
            VOLUME_ORDER => Some(&mut self.volume),
            PAGES_ORDER => Some(&mut self.pages),
            ABSTRACT_ORDER => Some(&mut self.abstract_text),
            TAGS_ORDER => Some(&mut self.tags),
            DOI_ORDER => Some(&mut self.doi),
            URL_ORDER => Some(&mut self.url),
            NOTES_ORDER => Some(&mut self.notes),
            _ => None,
        }
    }

    /// Display text of a selector field.
    pub fn selector_value(&self, order: usize) -> Option<String> {
        match order {
            STATUS_ORDER => Some(crate::db::format_literature_status(self.selected_status()).to_string()),
            PRIORITY_ORDER => Some(crate::db::format_priority(self.selected_priority()).to_string()),
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
        let current = self.current_field;
        for order in 0..FIELD_COUNT {
            if let Some(field) = self.input_mut(order) {
                field.active = order == current;
            }
        }
    }

    pub fn handle_char(&mut self, c: char) {
        if let Some(field) = self.input_mut(self.current_field) {
            field.handle_char(c);
        }
    }

    pub fn handle_backspace(&mut self) {
        if let Some(field) = self.input_mut(self.current_field) {
            field.handle_backspace();
        }
    }

    pub fn handle_delete(&mut self) {
        if let Some(field) = self.input_mut(self.current_field) {
            field.handle_delete();
        }
    }

    pub fn handle_left_right(&mut self, right: bool) {
        match self.current_field {
            STATUS_ORDER => self.status = cycle_index(self.status, LiteratureStatus::ALL.len(), right),
            PRIORITY_ORDER => self.priority = cycle_index(self.priority, Priority::ALL.len(), right),
            order => {
                if let Some(field) = self.input_mut(order) {
                    if right {
                        field.move_cursor_right()
                    } else {
                        field.move_cursor_left()
                    }
                }
            }
        }
    }

    pub fn to_draft(&self) -> Result<LiteratureDraft> {
        let year_text = self.year.value.trim();
        let year = year_text
            .parse::<i32>()
            .map_err(|_| VoltaError::Validation(format!("Invalid year '{}'", year_text)))?;
        let draft = LiteratureDraft {
            title: self.title.value.clone(),
            authors: self.authors.value.clone(),
            year,
            journal: self.journal.value.clone(),
            volume: self.volume.value.clone(),
            pages: self.pages.value.clone(),
            abstract_text: self.abstract_text.value.clone(),
            tags: split_tags(std::slice::from_ref(&self.tags.value)),
            status: self.selected_status(),
            priority: self.selected_priority(),
            doi: self.doi.value.clone(),
            url: self.url.value.clone(),
            notes: self.notes.value.clone(),
        };
        draft.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::literature::sample_literature;

    #[test]
    fn test_new_form_defaults() {
        let form = LiteratureForm::new(2026);
        assert_eq!(form.year.value, "2026");
        assert_eq!(form.selected_status(), LiteratureStatus::Reviewed);
        assert_eq!(form.selected_priority(), Priority::Medium);
        assert!(form.to_draft().is_err());
    }

    #[test]
    fn test_edit_form_round_trips_entry() {
        let item = &sample_literature()[1];
        let draft = LiteratureForm::from_literature(item).to_draft().unwrap();
        assert_eq!(draft, LiteratureDraft::from_literature(item));
    }

    #[test]
    fn test_typing_and_selectors() {
        let mut form = LiteratureForm::new(2026);
        for c in "Cobalt".chars() {
            form.handle_char(c);
        }
        assert_eq!(form.title.value, "Cobalt");

        form.current_field = STATUS_ORDER;
        form.update_active_field();
        assert!(!form.title.active);
        form.handle_left_right(true);
        assert_eq!(form.selected_status(), LiteratureStatus::Cited);
        assert_eq!(form.selector_value(STATUS_ORDER).as_deref(), Some("Cited"));
    }

    #[test]
    fn test_bad_year_is_a_validation_error() {
        let mut form = LiteratureForm::from_literature(&sample_literature()[0]);
        form.year = InputField::with_value("20x4");
        assert!(matches!(form.to_draft(), Err(VoltaError::Validation(_))));
    }
}
