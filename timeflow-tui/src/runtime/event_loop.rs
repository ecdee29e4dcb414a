use crate::app::App;
use crate::store::LocalStore;
use crate::ui;
use anyhow::Result;
use crossterm::event::{self, Event};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;
use timeflow_client::domain::Notification;
use timeflow_client::TimeflowClient;
use tokio::sync::mpsc::UnboundedReceiver;

use super::action_queue::{channel, Action};
use super::actions::run_action;
use super::views::handle_view_key;

pub async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    client: &TimeflowClient,
    store: &LocalStore,
    notif_rx: &mut UnboundedReceiver<Notification>,
) -> Result<()> {
    let (action_tx, mut action_rx) = channel();

    let _ = action_tx.send(Action::LoadReferenceData);
    let _ = action_tx.send(Action::LoadWeek {
        generation: app.draft.generation(),
    });

    loop {
        terminal.draw(|f| ui::render(f, app))?;

        if app.is_submitting {
            app.throbber_state.calc_next();
        }

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                handle_view_key(key, app, &action_tx);
            }
        }

        while let Ok(notification) = notif_rx.try_recv() {
            app.push_notification(notification);
        }

        while let Ok(action) = action_rx.try_recv() {
            // Paint the pending state before a blocking submission so the
            // throbber is visible while the request is in flight.
            if app.is_submitting {
                terminal.draw(|f| ui::render(f, app))?;
            }
            run_action(action, app, client, store, &action_tx).await?;
        }

        if !app.running {
            break;
        }
    }

    Ok(())
}
