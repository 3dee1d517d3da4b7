//! Add/edit/view/delete dialog state shared by both record screens.

/// Which dialog is open, and for which record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Modal {
    #[default]
    Closed,
    Add,
    Edit(u64),
    View(u64),
    ConfirmDelete(u64),
}

impl Modal {
    pub fn is_open(&self) -> bool {
        *self != Modal::Closed
    }

    /// Form dialogs (add or edit).
    pub fn is_form(&self) -> bool {
        matches!(self, Modal::Add | Modal::Edit(_))
    }

    pub fn open_add(&mut self) {
        *self = Modal::Add;
    }

    pub fn open_edit(&mut self, id: u64) {
        *self = Modal::Edit(id);
    }

    pub fn open_view(&mut self, id: u64) {
        *self = Modal::View(id);
    }

    pub fn prompt_delete(&mut self, id: u64) {
        *self = Modal::ConfirmDelete(id);
    }

    /// Switch the detail view of a record to its edit form.
    pub fn edit_viewed(&mut self) -> bool {
        if let Modal::View(id) = *self {
            *self = Modal::Edit(id);
            true
        } else {
            false
        }
    }

    pub fn close(&mut self) {
        *self = Modal::Closed;
    }

    /// Accept a pending delete. Returns the id to remove; any other state is
    /// left untouched and yields `None`.
    pub fn confirm(&mut self) -> Option<u64> {
        match *self {
            Modal::ConfirmDelete(id) => {
                *self = Modal::Closed;
                Some(id)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_then_edit() {
        let mut m = Modal::default();
        assert!(!m.is_open());
        m.open_view(4);
        assert_eq!(m, Modal::View(4));
        assert!(m.edit_viewed());
        assert_eq!(m, Modal::Edit(4));
        assert!(m.is_form());
        // Only a view can turn into an edit.
        assert!(!m.edit_viewed());
    }

    #[test]
    fn test_delete_requires_confirm_state() {
        let mut m = Modal::Add;
        assert_eq!(m.confirm(), None);
        assert_eq!(m, Modal::Add);

        m.prompt_delete(9);
        assert_eq!(m.confirm(), Some(9));
        assert_eq!(m, Modal::Closed);
        assert_eq!(m.confirm(), None);
    }

    #[test]
    fn test_cancel_closes_any_dialog() {
        for mut m in [Modal::Add, Modal::Edit(1), Modal::View(2), Modal::ConfirmDelete(3)] {
            m.close();
            assert_eq!(m, Modal::Closed);
        }
    }
}
