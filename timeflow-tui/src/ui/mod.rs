use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Paragraph},
    Frame,
};

use crate::app::{App, StatusKind, View};

mod editor_view;
mod list_view;
pub(super) mod widgets;

pub fn render(frame: &mut Frame, app: &mut App) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_top_bar(frame, app, root[0]);

    let body = root[1];
    match app.view {
        View::Editor => editor_view::render_editor_view(frame, app, body),
        View::List => list_view::render_list_view(frame, app, body),
    }

    render_status_line(frame, app, root[2]);

    if app.confirm_submit {
        render_confirm_overlay(frame, app);
    }
}

fn render_top_bar(frame: &mut Frame, app: &mut App, area: Rect) {
    let throbber_area = Rect {
        x: area.x + 1,
        y: area.y,
        width: 1,
        height: 1,
    };
    let label_area = Rect {
        x: throbber_area.x + 1,
        y: area.y,
        width: area.width.saturating_sub(2),
        height: 1,
    };

    let throbber = throbber_widgets_tui::Throbber::default()
        .style(Style::default().fg(Color::Yellow))
        .throbber_style(Style::default().fg(Color::Yellow))
        .throbber_set(throbber_widgets_tui::BRAILLE_SIX)
        .use_type(if app.is_submitting {
            throbber_widgets_tui::WhichUse::Spin
        } else {
            throbber_widgets_tui::WhichUse::Full
        });
    frame.render_stateful_widget(throbber, throbber_area, &mut app.throbber_state);

    let label = format!(
        " Timeflow — {} ({})",
        app.user.first_name,
        app.user.role.as_str()
    );
    frame.render_widget(
        Paragraph::new(Span::styled(label, Style::default().fg(Color::Yellow))),
        label_area,
    );
}

fn render_status_line(frame: &mut Frame, app: &App, area: Rect) {
    let Some(status) = &app.status else {
        return;
    };
    let color = match status.kind {
        StatusKind::Info => Color::Cyan,
        StatusKind::Success => Color::Green,
        StatusKind::Error => Color::Red,
    };
    frame.render_widget(
        Paragraph::new(Span::styled(
            format!(" {}", status.text),
            Style::default().fg(color),
        )),
        area,
    );
}

fn render_confirm_overlay(frame: &mut Frame, app: &App) {
    let area = widgets::centered_rect(52, 7, frame.area());
    frame.render_widget(Clear, area);

    let (regular, overtime) = app.draft.weekly_totals();
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!(
                "Submit the week of {}?",
                app.draft.week_start.format("%d %b %Y")
            ),
            Style::default().fg(Color::White),
        )),
        Line::from(Span::styled(
            format!("{}h regular, {}h overtime", regular, overtime),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("y", Style::default().fg(Color::Yellow)),
            Span::raw("/"),
            Span::styled("Enter", Style::default().fg(Color::Yellow)),
            Span::raw(": Submit  "),
            Span::styled("n", Style::default().fg(Color::Yellow)),
            Span::raw("/"),
            Span::styled("Esc", Style::default().fg(Color::Yellow)),
            Span::raw(": Cancel"),
        ]),
    ];

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(Span::styled(
                " Confirm Submission ",
                Style::default().fg(Color::Yellow),
            ))
            .padding(Padding::horizontal(2)),
    );
    frame.render_widget(paragraph, area);
}
