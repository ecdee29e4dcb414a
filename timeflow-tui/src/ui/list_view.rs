use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Padding, Paragraph},
    Frame,
};

use timeflow_client::domain::ApprovalStatus;

use crate::app::App;

use super::widgets::key_hint;

pub fn render_list_view(frame: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[0]);

    render_records(frame, app, panes[0]);
    render_notifications(frame, app, panes[1]);
    render_hints(frame, chunks[1]);
}

fn approval_color(status: ApprovalStatus) -> Color {
    match status {
        ApprovalStatus::Pending => Color::Yellow,
        ApprovalStatus::Approved => Color::Green,
        ApprovalStatus::Rejected => Color::Red,
    }
}

fn approval_label(status: ApprovalStatus) -> &'static str {
    match status {
        ApprovalStatus::Pending => "Pending",
        ApprovalStatus::Approved => "Approved",
        ApprovalStatus::Rejected => "Rejected",
    }
}

fn render_records(frame: &mut Frame, app: &mut App, area: Rect) {
    let items: Vec<ListItem> = app
        .records
        .iter()
        .map(|record| {
            let hours: f64 = record
                .daily_logs
                .iter()
                .flat_map(|log| log.task_entries.iter())
                .map(|entry| entry.duration)
                .sum();
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("Week of {}", record.week_start_date.format("%d %b %Y")),
                    Style::default().fg(Color::White),
                ),
                Span::styled(" | ", Style::default().fg(Color::DarkGray)),
                Span::styled(
                    approval_label(record.approval_status),
                    Style::default().fg(approval_color(record.approval_status)),
                ),
                Span::styled(
                    format!(" | {}h", hours),
                    Style::default().fg(Color::Magenta),
                ),
            ]))
        })
        .collect();

    let mut state = ListState::default();
    if !app.records.is_empty() {
        state.select(Some(app.selected_record.min(app.records.len() - 1)));
    }

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Submitted Timesheets ")
                .padding(Padding::horizontal(1)),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_notifications(frame: &mut Frame, app: &App, area: Rect) {
    let lines: Vec<Line> = if app.notifications.is_empty() {
        vec![Line::from(Span::styled(
            "No notifications yet.",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        app.notifications
            .iter()
            .rev()
            .map(|notification| {
                let color = match notification.status.as_deref() {
                    Some("approved") => Color::Green,
                    Some("rejected") => Color::Red,
                    _ => Color::White,
                };
                Line::from(Span::styled(
                    notification.message.clone(),
                    Style::default().fg(color),
                ))
            })
            .collect()
    };

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Notifications ")
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(paragraph, area);
}

fn render_hints(frame: &mut Frame, area: Rect) {
    let mut spans = Vec::new();
    spans.extend(key_hint("↑/↓", "Select"));
    spans.extend(key_hint("e", "Edit rejected"));
    spans.extend(key_hint("r", "Refresh"));
    spans.extend(key_hint("n", "Editor"));
    spans.extend(key_hint("q", "Quit"));
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
