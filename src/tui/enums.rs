//! Enumerations for TUI state management.

use clap::ValueEnum;

/// Top-level screens, one per tab.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Screen {
    #[default]
    Dashboard,
    Tasks,
    Literature,
}

impl Screen {
    pub const ALL: [Screen; 3] = [Screen::Dashboard, Screen::Tasks, Screen::Literature];

    pub fn title(self) -> &'static str {
        match self {
            Screen::Dashboard => "Dashboard",
            Screen::Tasks => "Tasks",
            Screen::Literature => "Literature",
        }
    }

    pub fn index(self) -> usize {
        Screen::ALL.iter().position(|&s| s == self).unwrap_or(0)
    }

    /// Next tab, wrapping around.
    pub fn next(self) -> Screen {
        Screen::ALL[(self.index() + 1) % Screen::ALL.len()]
    }

    pub fn prev(self) -> Screen {
        Screen::ALL[(self.index() + Screen::ALL.len() - 1) % Screen::ALL.len()]
    }
}

/// Input mode for the list screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    None,
    /// Typing into the search box.
    Search,
    /// Typing into the tag (category) box.
    Tag,
    /// Typing a `key:value` task filter.
    Filter,
}
