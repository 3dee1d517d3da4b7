//! Board rendering for the task screen: one column per phase, one card per task.

use chrono::NaiveDate;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::config::Config;
use crate::db::{format_due_relative, format_phase, format_status, phase_name};
use crate::fields::Phase;
use crate::query::board;
use crate::task::Task;
use crate::tui::colors::{hex_color, status_color, GOLD};

/// Lines per card.
const CARD_HEIGHT: u16 = 5;

/// Column/card cursor for the board, with per-column scroll offsets.
#[derive(Debug, Clone, Default)]
pub struct BoardState {
    pub column: usize,
    pub card: usize,
    scroll: [usize; 5],
}

impl BoardState {
    /// Id of the selected card in `tasks`, if any.
    pub fn selected_id(&self, tasks: &[Task]) -> Option<u64> {
        board(tasks)
            .get(self.column)
            .and_then(|(_, cards)| cards.get(self.card))
            .map(|t| t.id)
    }

    pub fn move_column(&mut self, tasks: &[Task], right: bool) {
        if right && self.column + 1 < Phase::ALL.len() {
            self.column += 1;
        } else if !right && self.column > 0 {
            self.column -= 1;
        }
        self.clamp(tasks);
    }

    pub fn move_card(&mut self, tasks: &[Task], down: bool) {
        if down {
            self.card += 1;
        } else {
            self.card = self.card.saturating_sub(1);
        }
        self.clamp(tasks);
    }

    /// Keep the card index inside the current column.
    pub fn clamp(&mut self, tasks: &[Task]) {
        let len = board(tasks).get(self.column).map(|(_, c)| c.len()).unwrap_or(0);
        self.card = self.card.min(len.saturating_sub(1));
    }

    fn scroll_for(&mut self, column: usize, visible: usize) -> usize {
        let offset = &mut self.scroll[column];
        if column == self.column && visible > 0 {
            if self.card < *offset {
                *offset = self.card;
            } else if self.card >= *offset + visible {
                *offset = self.card + 1 - visible;
            }
        }
        *offset
    }
}

/// Render `tasks` as five phase columns.
pub fn render_board(f: &mut Frame, area: Rect, tasks: &[Task], state: &mut BoardState, config: &Config, today: NaiveDate) {
    let columns = board(tasks);
    let constraints: Vec<Constraint> = columns.iter().map(|_| Constraint::Ratio(1, columns.len() as u32)).collect();
    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    for (i, (phase, cards)) in columns.iter().enumerate() {
        let color = config.phase_window(*phase).map(|w| hex_color(&w.color)).unwrap_or(Color::Gray);
        let is_selected = i == state.column;
        let border_style = if is_selected {
            Style::default().fg(color).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(color)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!("Phase {} ({})", format_phase(*phase), cards.len()))
            .border_style(border_style);
        let inner = block.inner(layout[i]);
        f.render_widget(block, layout[i]);

        if cards.is_empty() {
            f.render_widget(
                Paragraph::new(phase_name(*phase)).style(Style::default().fg(Color::DarkGray)).wrap(Wrap { trim: true }),
                inner,
            );
            continue;
        }

        let visible = (inner.height / CARD_HEIGHT) as usize;
        let offset = state.scroll_for(i, visible);
        let mut y = inner.y;
        for (card_idx, task) in cards.iter().enumerate().skip(offset) {
            if y + CARD_HEIGHT > inner.y + inner.height {
                break;
            }
            let rect = Rect::new(inner.x, y, inner.width, CARD_HEIGHT);
            render_card(f, rect, task, is_selected && card_idx == state.card, today);
            y += CARD_HEIGHT;
        }
    }
}

fn render_card(f: &mut Frame, area: Rect, task: &Task, is_selected: bool, today: NaiveDate) {
    let border_style = if is_selected {
        Style::default().fg(GOLD).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let text = vec![
        Line::from(Span::styled(task.name.clone(), Style::default().add_modifier(Modifier::BOLD))),
        Line::from(vec![
            Span::styled(format_status(task.status), Style::default().fg(status_color(task.status))),
            Span::raw(format!("  {}%", task.progress)),
        ]),
        Line::from(Span::styled(
            format!("Due {}", format_due_relative(task.due_date, today)),
            Style::default().fg(Color::Gray),
        )),
    ];
    let card = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).border_style(border_style).title(format!("#{}", task.id)))
        .wrap(Wrap { trim: true });
    f.render_widget(card, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::sample_tasks;

    #[test]
    fn test_navigation_stays_in_bounds() {
        let tasks = sample_tasks();
        let mut state = BoardState::default();
        assert_eq!(state.selected_id(&tasks), Some(1));

        state.move_card(&tasks, true);
        state.move_card(&tasks, true);
        assert_eq!(state.card, 1);
        assert_eq!(state.selected_id(&tasks), Some(2));

        // Phase II has one task; the card index clamps.
        state.move_column(&tasks, true);
        assert_eq!(state.card, 0);
        assert_eq!(state.selected_id(&tasks), Some(3));

        state.move_column(&tasks, true);
        assert_eq!(state.selected_id(&tasks), None);
        for _ in 0..10 {
            state.move_column(&tasks, true);
        }
        assert_eq!(state.column, 4);
    }

    #[test]
    fn test_scroll_follows_selection() {
        let mut state = BoardState { column: 0, card: 6, scroll: [0; 5] };
        assert_eq!(state.scroll_for(0, 3), 4);
        state.card = 1;
        assert_eq!(state.scroll_for(0, 3), 1);
        // Other columns keep their offset.
        assert_eq!(state.scroll_for(1, 3), 0);
    }
}
