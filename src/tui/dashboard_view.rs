//! Dashboard screen: summary cards, phase progress, timeline, urgent tasks,
//! recent activity, status distribution and the deadline countdown.

use chrono::{NaiveDate, NaiveDateTime};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{BarChart, Block, Borders, Gauge, List, ListItem, Paragraph},
    Frame,
};

use crate::config::Config;
use crate::dashboard::*;
use crate::db::{days_until, format_date_long, format_phase, format_priority};
use crate::task::Task;
use crate::tui::colors::{hex_color, priority_color, DARK_GREEN, GOLD};

/// Inputs for one dashboard frame.
pub struct DashboardFrame<'a> {
    pub tasks: &'a [Task],
    /// Counts refreshed on the stats timer.
    pub stats: DashboardStats,
    pub config: &'a Config,
    pub today: NaiveDate,
    pub now: NaiveDateTime,
}

pub fn render_dashboard(f: &mut Frame, area: Rect, d: &DashboardFrame) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Length(9),
            Constraint::Min(8),
        ])
        .split(area);

    render_header(f, rows[0], d);
    render_cards(f, rows[1], d);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(rows[2]);
    render_phase_progress(f, middle[0], d);
    render_timeline(f, middle[1], d);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(38), Constraint::Percentage(32), Constraint::Percentage(30)])
        .split(rows[3]);
    render_urgent(f, bottom[0], d);
    render_activity(f, bottom[1], d);
    render_distribution(f, bottom[2], d);
}

fn render_header(f: &mut Frame, area: Rect, d: &DashboardFrame) {
    let left = countdown(d.config.final_deadline, d.today);
    let countdown_style = if left.warning {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Green)
    };
    let header = Paragraph::new(Line::from(vec![
        Span::styled(d.config.project_name.clone(), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("  "),
        Span::styled(format_date_long(d.today), Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC)),
        Span::raw("  Final deadline: "),
        Span::styled(format!("{} days", left.days), countdown_style),
    ]))
    .block(Block::default().borders(Borders::ALL))
    .alignment(Alignment::Center);
    f.render_widget(header, area);
}

fn render_cards(f: &mut Frame, area: Rect, d: &DashboardFrame) {
    let cards = [
        ("Total Tasks", d.stats.total.to_string(), Color::White),
        ("Completed", d.stats.complete.to_string(), Color::Green),
        ("In Progress", d.stats.in_progress.to_string(), Color::Blue),
        ("Urgent", d.stats.urgent.to_string(), Color::Red),
        ("Overall", format!("{}%", d.stats.overall_progress()), GOLD),
    ];
    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(cards.iter().map(|_| Constraint::Ratio(1, cards.len() as u32)).collect::<Vec<_>>())
        .split(area);
    for (i, (label, value, color)) in cards.into_iter().enumerate() {
        let card = Paragraph::new(vec![
            Line::from(Span::styled(value, Style::default().fg(color).add_modifier(Modifier::BOLD))),
            Line::from(Span::styled(label, Style::default().fg(Color::Gray))),
        ])
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);
        f.render_widget(card, layout[i]);
    }
}

fn render_phase_progress(f: &mut Frame, area: Rect, d: &DashboardFrame) {
    let block = Block::default().borders(Borders::ALL).title("Phase Progress");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let phases = phase_progress(d.tasks, d.config);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(phases.iter().map(|_| Constraint::Length(1)).collect::<Vec<_>>())
        .split(inner);
    for (i, p) in phases.iter().enumerate() {
        let color = d.config.phase_window(p.phase).map(|w| hex_color(&w.color)).unwrap_or(DARK_GREEN);
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(color).bg(Color::Black))
            .percent(p.progress as u16)
            .label(format!(
                "{:<4} {} {}% ({}/{})",
                format_phase(p.phase),
                p.name,
                p.progress,
                p.completed_count,
                p.task_count
            ));
        f.render_widget(gauge, rows[i]);
    }
}

fn render_timeline(f: &mut Frame, area: Rect, d: &DashboardFrame) {
    let current = current_phase(d.config, d.today);
    let in_phase: Vec<&Task> = d.tasks.iter().filter(|t| t.phase == current).collect();
    let done = in_phase.iter().filter(|t| t.is_complete()).count();
    let days = d.config.phase_window(current).map(|w| days_in_phase(w, d.today)).unwrap_or(0);

    let mut items: Vec<ListItem> = phase_timeline(d.config, d.today)
        .into_iter()
        .map(|e| {
            let (marker, style) = match e.state {
                PhaseState::Active => ("●", Style::default().fg(hex_color(&e.color)).add_modifier(Modifier::BOLD)),
                PhaseState::Past => ("✔", Style::default().fg(Color::DarkGray)),
                PhaseState::Upcoming => ("○", Style::default()),
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{} {:<4}", marker, format_phase(e.phase)), style),
                Span::styled(format!("{:<24}", e.name), style),
                Span::styled(e.range, Style::default().fg(Color::Gray)),
            ]))
        })
        .collect();
    items.push(ListItem::new(Line::from(Span::styled(
        format!("Phase {}: {}% complete, day {}", format_phase(current), percent(done, in_phase.len()), days),
        Style::default().fg(Color::Cyan),
    ))));

    f.render_widget(List::new(items).block(Block::default().borders(Borders::ALL).title("Timeline")), area);
}

fn render_urgent(f: &mut Frame, area: Rect, d: &DashboardFrame) {
    let urgent = urgent_tasks(d.tasks, d.today, d.config.upcoming_days, URGENT_LIST_LIMIT);
    let items: Vec<ListItem> = if urgent.is_empty() {
        vec![ListItem::new(Span::styled("No urgent tasks", Style::default().fg(Color::Green)))]
    } else {
        urgent
            .iter()
            .map(|t| {
                let left = days_until(t.due_date, d.today);
                ListItem::new(vec![
                    Line::from(Span::styled(t.name.clone(), Style::default().add_modifier(Modifier::BOLD))),
                    Line::from(vec![
                        Span::raw(format!("  Phase {} | ", format_phase(t.phase))),
                        Span::styled(format_priority(t.priority), Style::default().fg(priority_color(t.priority))),
                        Span::raw(format!(" | {} day{} left", left, if left == 1 { "" } else { "s" })),
                    ]),
                ])
            })
            .collect()
    };
    let title = format!("Urgent (next {} days)", d.config.upcoming_days);
    f.render_widget(List::new(items).block(Block::default().borders(Borders::ALL).title(title)), area);
}

fn render_activity(f: &mut Frame, area: Rect, d: &DashboardFrame) {
    let feed = recent_activity(d.tasks, RECENT_ACTIVITY_LIMIT);
    let items: Vec<ListItem> = if feed.is_empty() {
        vec![ListItem::new("No recent activity")]
    } else {
        feed.iter()
            .map(|a| {
                ListItem::new(vec![
                    Line::from(Span::styled(
                        format!("{} {}", a.icon, a.verb),
                        Style::default().add_modifier(Modifier::BOLD),
                    )),
                    Line::from(format!("  {}", a.task.name)),
                    Line::from(Span::styled(
                        format!("  {}", time_since(a.task.updated_at, d.now)),
                        Style::default().fg(Color::Gray),
                    )),
                ])
            })
            .collect()
    };
    f.render_widget(List::new(items).block(Block::default().borders(Borders::ALL).title("Recent Activity")), area);
}

fn render_distribution(f: &mut Frame, area: Rect, d: &DashboardFrame) {
    let dist = Distribution::compute(d.tasks, d.today);
    let segments = dist.segments();
    let labels = ["Done", "Active", "Todo", "Late"];
    let data: Vec<(&str, u64)> = segments
        .iter()
        .zip(labels)
        .map(|((_, count, _), label)| (label, *count as u64))
        .collect();
    let chart = BarChart::default()
        .block(Block::default().borders(Borders::ALL).title("Status Distribution"))
        .bar_width(6)
        .bar_gap(1)
        .bar_style(Style::default().fg(Color::Blue))
        .value_style(Style::default().fg(Color::Black).bg(Color::Blue))
        .data(data.as_slice());
    f.render_widget(chart, area);
}
