mod editor;
mod list;

use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{App, View};

use super::action_queue::{Action, ActionTx};

pub(super) fn handle_view_key(key: KeyEvent, app: &mut App, tx: &ActionTx) {
    // Submit confirmation modal swallows everything else.
    if app.confirm_submit {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.confirm_submit = false;
                app.is_submitting = true;
                let _ = tx.send(Action::Submit);
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.confirm_submit = false;
            }
            _ => {}
        }
        return;
    }

    match app.view {
        View::Editor => editor::handle_editor_key(key, app, tx),
        View::List => list::handle_list_key(key, app, tx),
    }
}
