use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph},
    Frame,
};

use crate::app::{App, EditorField};
use crate::app::draft::{DayDraft, WeekStatus};

use super::widgets::{field_style, input_display, key_hint};

const TIME_SLOT: usize = 5;
const TASK_SLOT: usize = 6;
const DURATION_SLOT: usize = 5;

pub fn render_editor_view(frame: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    render_week_header(frame, app, chunks[0]);
    render_days(frame, app, chunks[1]);
    render_hints(frame, app, chunks[2]);
}

fn status_color(status: WeekStatus) -> Color {
    match status {
        WeekStatus::Unsubmitted => Color::DarkGray,
        WeekStatus::PendingApproval => Color::Yellow,
        WeekStatus::Approved => Color::Green,
        WeekStatus::RejectedEditable => Color::Red,
    }
}

fn fmt_hours(hours: f64) -> String {
    if hours.fract() == 0.0 {
        format!("{}h", hours as i64)
    } else {
        format!("{:.2}h", hours)
    }
}

fn render_week_header(frame: &mut Frame, app: &App, area: Rect) {
    let (regular, overtime) = app.draft.weekly_totals();

    let mut spans = vec![
        Span::styled(
            format!(
                "{} – {}",
                app.draft.week_start.format("%d %b %Y"),
                app.draft.week_end().format("%d %b %Y")
            ),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(" | ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            app.draft.status.label(),
            Style::default().fg(status_color(app.draft.status)),
        ),
        Span::styled(" | ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("Regular {}", fmt_hours(regular)),
            Style::default().fg(Color::White),
        ),
    ];
    if overtime > 0.0 {
        spans.push(Span::styled(
            format!("  Overtime {}", fmt_hours(overtime)),
            Style::default().fg(Color::Magenta),
        ));
    }
    if app.draft.editing_id.is_some() {
        spans.push(Span::styled(
            "  (editing rejected submission)",
            Style::default().fg(Color::Red),
        ));
    }

    let title = if app.draft.is_locked() {
        " Timesheet (locked) "
    } else {
        " Timesheet "
    };
    let paragraph = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(paragraph, area);
}

fn render_days(frame: &mut Frame, app: &App, area: Rect) {
    let locked = app.draft.is_locked();
    let mut lines: Vec<Line> = Vec::new();

    for (day_idx, day) in app.draft.days.iter().enumerate() {
        let selected = day_idx == app.selected_day;
        lines.push(day_header_line(app, day, selected));
        lines.push(times_line(app, day, selected, locked));
        for (entry_idx, entry) in day.entries.iter().enumerate() {
            let task_focused =
                selected && !locked && app.field == EditorField::Task(entry_idx);
            let duration_focused =
                selected && !locked && app.field == EditorField::Duration(entry_idx);

            let mut spans = vec![
                Span::raw("    task "),
                Span::styled(
                    input_display(&entry.task_id, TASK_SLOT, task_focused),
                    field_style(task_focused),
                ),
                Span::raw(" "),
                Span::styled(
                    input_display(&entry.duration, DURATION_SLOT, duration_focused),
                    field_style(duration_focused),
                ),
                Span::styled(" h", Style::default().fg(Color::DarkGray)),
            ];
            if let Some(name) = app.task_name(&entry.task_id) {
                spans.push(Span::styled(
                    format!("  {}", name),
                    Style::default().fg(Color::Cyan),
                ));
            }
            lines.push(Line::from(spans));
        }
        lines.push(Line::from(""));
    }

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Daily Logs ")
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(paragraph, area);
}

fn day_header_line<'a>(app: &App, day: &'a DayDraft, selected: bool) -> Line<'a> {
    let marker = if selected { "▸ " } else { "  " };
    let date_style = if app.is_excluded_date(day.date) {
        Style::default().fg(Color::DarkGray)
    } else if selected {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };

    let mut spans = vec![
        Span::styled(marker, Style::default().fg(Color::Yellow)),
        Span::styled(day.date.format("%a %d %b").to_string(), date_style),
        Span::styled(
            format!("  {}", fmt_hours(day.hours())),
            Style::default().fg(Color::Magenta),
        ),
    ];
    if app.is_excluded_date(day.date) {
        spans.push(Span::styled(
            "  (leave/holiday)",
            Style::default().fg(Color::DarkGray),
        ));
    }
    Line::from(spans)
}

fn times_line<'a>(app: &App, day: &'a DayDraft, selected: bool, locked: bool) -> Line<'a> {
    let start_focused = selected && !locked && app.field == EditorField::StartTime;
    let end_focused = selected && !locked && app.field == EditorField::EndTime;

    Line::from(vec![
        Span::raw("    "),
        Span::styled(
            input_display(&day.start_time, TIME_SLOT, start_focused),
            field_style(start_focused),
        ),
        Span::styled(" - ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            input_display(&day.end_time, TIME_SLOT, end_focused),
            field_style(end_focused),
        ),
    ])
}

fn render_hints(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = Vec::new();
    if app.draft.is_locked() {
        spans.extend(key_hint("[/]", "Change week"));
        spans.extend(key_hint("l", "List"));
        spans.extend(key_hint("q", "Quit"));
    } else {
        spans.extend(key_hint("Tab", "Next field"));
        spans.extend(key_hint("a", "Add day"));
        spans.extend(key_hint("t", "Add task"));
        spans.extend(key_hint("+/-", "Move day"));
        spans.extend(key_hint("s", "Save draft"));
        spans.extend(key_hint("Enter", "Submit"));
        spans.extend(key_hint("[/]", "Change week"));
        spans.extend(key_hint("l", "List"));
        spans.extend(key_hint("q", "Quit"));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
