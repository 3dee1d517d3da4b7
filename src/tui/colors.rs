//! Color constants for the terminal user interface.

use ratatui::style::Color;

use crate::fields::{Priority, TaskStatus};

/// Accent for focused fields and the status bar.
pub const GOLD: Color = Color::Rgb(255, 215, 0);
/// Background of delete confirmations.
pub const DARK_RED: Color = Color::Rgb(114, 0, 0);
pub const DARK_GREEN: Color = Color::Rgb(0, 80, 0);
/// Status bar background.
pub const DARK_PURPLE: Color = Color::Rgb(86, 60, 92);

/// Parse `#rrggbb`; anything else renders gray.
pub fn hex_color(hex: &str) -> Color {
    let digits = hex.trim().trim_start_matches('#');
    if digits.len() != 6 {
        return Color::Gray;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    match (channel(0), channel(2), channel(4)) {
        (Some(r), Some(g), Some(b)) => Color::Rgb(r, g, b),
        _ => Color::Gray,
    }
}

pub fn status_color(status: TaskStatus) -> Color {
    match status {
        TaskStatus::Complete => Color::Green,
        TaskStatus::InProgress => Color::Blue,
        TaskStatus::UnderReview => Color::Magenta,
        TaskStatus::NotStarted => Color::Gray,
    }
}

pub fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::High => Color::Red,
        Priority::Medium => GOLD,
        Priority::Low => Color::Green,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_color() {
        assert_eq!(hex_color("#3b82f6"), Color::Rgb(0x3b, 0x82, 0xf6));
        assert_eq!(hex_color("ef4444"), Color::Rgb(0xef, 0x44, 0x44));
        assert_eq!(hex_color("#zzzzzz"), Color::Gray);
        assert_eq!(hex_color("red"), Color::Gray);
    }
}
