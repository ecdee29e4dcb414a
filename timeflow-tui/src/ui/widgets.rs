use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Span,
};

/// Helper function to create a centered rectangle
pub fn centered_rect(width: u16, height: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((r.height.saturating_sub(height)) / 2),
            Constraint::Length(height),
            Constraint::Length((r.height.saturating_sub(height)) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((r.width.saturating_sub(width)) / 2),
            Constraint::Length(width),
            Constraint::Length((r.width.saturating_sub(width)) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Render an input value in a fixed-width bracketed slot. A focused slot
/// shows a block cursor after the typed characters.
pub fn input_display(value: &str, width: usize, focused: bool) -> String {
    if focused && value.len() < width {
        let padding = width - value.len() - 1;
        format!("[{}█{}]", value, " ".repeat(padding))
    } else if value.len() >= width {
        format!("[{}]", value)
    } else {
        format!("[{}{}]", value, " ".repeat(width - value.len()))
    }
}

pub fn field_style(focused: bool) -> Style {
    if focused {
        Style::default()
            .fg(Color::Black)
            .bg(Color::White)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    }
}

pub fn key_hint(key: &'static str, action: &'static str) -> Vec<Span<'static>> {
    vec![
        Span::styled(key, Style::default().fg(Color::Yellow)),
        Span::raw(format!(": {}  ", action)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_display_pads_and_places_the_cursor() {
        assert_eq!(input_display("09:0", 5, true), "[09:0█]");
        assert_eq!(input_display("09:00", 5, true), "[09:00]");
        assert_eq!(input_display("", 5, false), "[     ]");
        assert_eq!(input_display("7.5", 5, false), "[7.5  ]");
    }
}
