use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{App, View};

use super::super::action_queue::{Action, ActionTx};

pub(crate) fn handle_list_key(key: KeyEvent, app: &mut App, tx: &ActionTx) {
    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('n') => {
            app.view = View::Editor;
            let _ = tx.send(Action::LoadWeek {
                generation: app.draft.generation(),
            });
        }
        KeyCode::Char('e') => {
            let _ = tx.send(Action::EditRejected);
        }
        KeyCode::Char('r') => {
            let _ = tx.send(Action::LoadList);
        }
        KeyCode::Up => move_selection(app, -1),
        KeyCode::Down => move_selection(app, 1),
        KeyCode::Esc => app.clear_status(),
        _ => {}
    }
}

fn move_selection(app: &mut App, delta: i64) {
    if app.records.is_empty() {
        app.selected_record = 0;
        return;
    }
    let last = app.records.len() as i64 - 1;
    app.selected_record = (app.selected_record as i64 + delta).clamp(0, last) as usize;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::action_queue::channel;
    use chrono::NaiveDate;
    use crossterm::event::KeyModifiers;
    use timeflow_client::domain::{ApprovalStatus, LoggedInUser, TimesheetRecord};
    use timeflow_client::Role;

    fn test_app() -> App {
        let user = LoggedInUser {
            id: 1,
            username: "jdoe".to_string(),
            email: "jdoe@example.com".to_string(),
            first_name: "Jo".to_string(),
            role: Role::Employee,
        };
        let mut app = App::new(user, NaiveDate::from_ymd_opt(2026, 8, 24).unwrap());
        app.view = View::List;
        app
    }

    fn record(week: NaiveDate) -> TimesheetRecord {
        TimesheetRecord {
            id: 7,
            week_start_date: week,
            approval_status: ApprovalStatus::Pending,
            daily_logs: vec![],
        }
    }

    #[test]
    fn selection_stays_within_the_record_list() {
        let mut app = test_app();
        let (tx, _rx) = channel();

        handle_list_key(KeyEvent::new(KeyCode::Down, KeyModifiers::NONE), &mut app, &tx);
        assert_eq!(app.selected_record, 0);

        app.records.push(record(NaiveDate::from_ymd_opt(2026, 8, 17).unwrap()));
        app.records.push(record(NaiveDate::from_ymd_opt(2026, 8, 10).unwrap()));
        handle_list_key(KeyEvent::new(KeyCode::Down, KeyModifiers::NONE), &mut app, &tx);
        handle_list_key(KeyEvent::new(KeyCode::Down, KeyModifiers::NONE), &mut app, &tx);
        assert_eq!(app.selected_record, 1);

        handle_list_key(KeyEvent::new(KeyCode::Up, KeyModifiers::NONE), &mut app, &tx);
        assert_eq!(app.selected_record, 0);
    }

    #[test]
    fn returning_to_the_editor_rechecks_the_week() {
        let mut app = test_app();
        let (tx, mut rx) = channel();
        handle_list_key(
            KeyEvent::new(KeyCode::Char('n'), KeyModifiers::NONE),
            &mut app,
            &tx,
        );
        assert_eq!(app.view, View::Editor);
        assert!(matches!(rx.try_recv(), Ok(Action::LoadWeek { .. })));
    }
}
