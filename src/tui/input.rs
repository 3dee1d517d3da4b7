//! Input field handling for the terminal user interface.

/// A single-line text input with a cursor measured in characters.
#[derive(Debug, Clone, Default)]
pub struct InputField {
    pub value: String,
    pub cursor: usize,
    pub active: bool,
}

impl InputField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an input field with initial text, cursor at the end.
    pub fn with_value(value: &str) -> Self {
        Self {
            value: value.to_string(),
            cursor: value.chars().count(),
            active: false,
        }
    }

    fn byte_index(&self, char_idx: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_idx)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    fn len(&self) -> usize {
        self.value.chars().count()
    }

    /// Insert a character at the cursor.
    pub fn handle_char(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.value.insert(at, c);
        self.cursor += 1;
    }

    /// Delete the character before the cursor.
    pub fn handle_backspace(&mut self) {
        if self.cursor > 0 {
            let at = self.byte_index(self.cursor - 1);
            self.value.remove(at);
            self.cursor -= 1;
        }
    }

    /// Delete the character at the cursor.
    pub fn handle_delete(&mut self) {
        if self.cursor < self.len() {
            let at = self.byte_index(self.cursor);
            self.value.remove(at);
        }
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor < self.len() {
            self.cursor += 1;
        }
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Value with a `|` at the cursor, for the focused field.
    pub fn display(&self) -> String {
        if !self.active {
            return self.value.clone();
        }
        let at = self.byte_index(self.cursor);
        format!("{}|{}", &self.value[..at], &self.value[at..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_editing_multibyte_text() {
        let mut f = InputField::with_value("Sodium-ion é");
        f.handle_backspace();
        assert_eq!(f.value, "Sodium-ion ");
        f.handle_char('ü');
        f.move_cursor_left();
        f.handle_char('x');
        assert_eq!(f.value, "Sodium-ion xü");
        f.handle_delete();
        assert_eq!(f.value, "Sodium-ion x");
    }

    #[test]
    fn test_cursor_bounds_and_display() {
        let mut f = InputField::with_value("ab");
        f.move_cursor_right();
        assert_eq!(f.cursor, 2);
        f.move_cursor_left();
        f.move_cursor_left();
        f.move_cursor_left();
        assert_eq!(f.cursor, 0);
        f.handle_backspace();
        assert_eq!(f.value, "ab");

        assert_eq!(f.display(), "ab");
        f.active = true;
        assert_eq!(f.display(), "|ab");
        f.clear();
        assert_eq!((f.value.as_str(), f.cursor), ("", 0));
    }
}
