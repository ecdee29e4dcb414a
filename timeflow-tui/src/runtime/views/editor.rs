use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{App, EditorField, View};

use super::super::action_queue::{Action, ActionTx};

const TIME_LEN: usize = 5; // "HH:MM"
const TASK_ID_LEN: usize = 6;
const DURATION_LEN: usize = 5;

pub(crate) fn handle_editor_key(key: KeyEvent, app: &mut App, tx: &ActionTx) {
    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('l') => {
            app.view = View::List;
            let _ = tx.send(Action::LoadList);
        }
        KeyCode::Char('a') => {
            if app.draft.add_day() {
                app.selected_day = app.draft.days.len() - 1;
                app.field = EditorField::StartTime;
            }
        }
        KeyCode::Char('t') => app.draft.add_entry(app.selected_day),
        KeyCode::Char('s') => {
            let _ = tx.send(Action::SaveDraft);
        }
        KeyCode::Char('[') => change_week(app, tx, -1),
        KeyCode::Char(']') => change_week(app, tx, 1),
        KeyCode::Char('+') | KeyCode::Char('=') => {
            app.draft.shift_day_date(app.selected_day, 1);
        }
        KeyCode::Char('-') | KeyCode::Char('_') => {
            app.draft.shift_day_date(app.selected_day, -1);
        }
        KeyCode::Tab => app.next_field(),
        KeyCode::BackTab => app.prev_field(),
        KeyCode::Up => app.select_day(-1),
        KeyCode::Down => app.select_day(1),
        KeyCode::Enter => {
            if !app.draft.is_locked() {
                app.confirm_submit = true;
            }
        }
        KeyCode::Backspace => {
            let mut value = app.current_field_value();
            value.pop();
            app.apply_field_edit(value);
        }
        KeyCode::Char(c) => {
            let value = app.current_field_value();
            if accepts(app.field, c, &value) {
                let mut value = value;
                value.push(c);
                app.apply_field_edit(value);
            }
        }
        KeyCode::Esc => app.clear_status(),
        _ => {}
    }
}

fn change_week(app: &mut App, tx: &ActionTx, delta_weeks: i64) {
    let generation = app.draft.change_week(delta_weeks);
    app.reset_cursor();
    let _ = tx.send(Action::LoadWeek { generation });
}

/// Per-field character whitelist: times take digits and a colon, task ids
/// digits, durations digits and a decimal point.
fn accepts(field: EditorField, c: char, current: &str) -> bool {
    match field {
        EditorField::StartTime | EditorField::EndTime => {
            (c.is_ascii_digit() || c == ':') && current.len() < TIME_LEN
        }
        EditorField::Task(_) => c.is_ascii_digit() && current.len() < TASK_ID_LEN,
        EditorField::Duration(_) => {
            (c.is_ascii_digit() || (c == '.' && !current.contains('.')))
                && current.len() < DURATION_LEN
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::draft::WeekStatus;
    use crate::runtime::action_queue::channel;
    use chrono::NaiveDate;
    use crossterm::event::KeyModifiers;
    use timeflow_client::domain::LoggedInUser;
    use timeflow_client::Role;

    fn test_app() -> App {
        let user = LoggedInUser {
            id: 1,
            username: "jdoe".to_string(),
            email: "jdoe@example.com".to_string(),
            first_name: "Jo".to_string(),
            role: Role::Employee,
        };
        App::new(user, NaiveDate::from_ymd_opt(2026, 8, 24).unwrap())
    }

    fn press(app: &mut App, code: KeyCode) -> Option<Action> {
        let (tx, mut rx) = channel();
        handle_editor_key(KeyEvent::new(code, KeyModifiers::NONE), app, &tx);
        rx.try_recv().ok()
    }

    #[test]
    fn typing_edits_the_focused_field() {
        let mut app = test_app();
        for c in "09:00".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        assert_eq!(app.draft.days[0].start_time, "09:00");

        // Sixth character is refused.
        press(&mut app, KeyCode::Char('1'));
        assert_eq!(app.draft.days[0].start_time, "09:00");

        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.draft.days[0].start_time, "09:0");
    }

    #[test]
    fn duration_takes_a_single_decimal_point() {
        let mut app = test_app();
        app.field = EditorField::Duration(0);
        for c in "7.5.".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        assert_eq!(app.draft.days[0].entries[0].duration, "7.5");
    }

    #[test]
    fn week_change_queues_a_tagged_check() {
        let mut app = test_app();
        let action = press(&mut app, KeyCode::Char(']'));
        match action {
            Some(Action::LoadWeek { generation }) => {
                assert_eq!(generation, app.draft.generation())
            }
            other => panic!("expected LoadWeek, got {other:?}"),
        }
    }

    #[test]
    fn enter_opens_confirmation_only_when_editable() {
        let mut app = test_app();
        press(&mut app, KeyCode::Enter);
        assert!(app.confirm_submit);

        app.confirm_submit = false;
        app.draft.status = WeekStatus::Approved;
        press(&mut app, KeyCode::Enter);
        assert!(!app.confirm_submit);
    }
}
