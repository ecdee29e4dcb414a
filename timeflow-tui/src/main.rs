mod app;
mod cli;
mod config;
mod login;
mod runtime;
mod session;
mod store;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;

use app::{App, StatusKind};
use cli::{Cli, Commands};
use config::TimeflowConfig;
use session::SessionManager;
use store::LocalStore;
use timeflow_client::TimeflowClient;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing()?;

    let config = TimeflowConfig::load()?;

    match cli.command {
        Commands::Run => run(config).await,
        Commands::Login => {
            let store = LocalStore::open()?;
            login::run_login(&config, store).await
        }
        Commands::Logout => {
            let store = LocalStore::open()?;
            SessionManager::new(store).logout()?;
            println!("Logged out.");
            Ok(())
        }
        Commands::ConfigPath => {
            let path = TimeflowConfig::config_path()?;
            if !path.exists() {
                config.save()?;
            }
            println!("{}", path.display());
            Ok(())
        }
    }
}

/// Logs go to a file so they never tear the alternate screen.
fn init_tracing() -> Result<()> {
    let root = TimeflowConfig::root_path()?;
    std::fs::create_dir_all(&root)?;
    let file = std::fs::File::create(root.join("timeflow-tui.log"))
        .context("Failed to open log file")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::sync::Arc::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

async fn run(config: TimeflowConfig) -> Result<()> {
    let store = LocalStore::open()?;
    let refresh_cookie = store.refresh_cookie()?;
    let mut client = TimeflowClient::new(&config.api_url, refresh_cookie.as_deref())?;

    let manager = SessionManager::new(store.clone());
    let Some(session) = manager.initialize_auth(&client).await else {
        eprintln!("Not logged in. Run `timeflow-tui login` first.");
        return Ok(());
    };
    client.set_access_token(session.token.clone());

    let user = client
        .logged_in_user()
        .await
        .context("Could not load the signed-in user")?;

    let mut app = App::new(user, chrono::Local::now().date_naive());

    // Resume a rejected-edit staged by a previous run.
    match store.staged_edit() {
        Ok(Some(staged)) => {
            app.draft.load_staged_edit(&staged);
            app.set_status(StatusKind::Info, "Resuming edit of a rejected timesheet.");
        }
        Ok(None) => {}
        Err(e) => tracing::warn!(%e, "could not read staged edit"),
    }

    // One-way notification stream, reconnecting until the UI goes away.
    let (notif_tx, mut notif_rx) = tokio::sync::mpsc::unbounded_channel();
    let stream_client = client.clone();
    tokio::spawn(async move {
        loop {
            if let Err(e) = stream_client.stream_notifications(notif_tx.clone()).await {
                tracing::debug!(%e, "notification stream dropped");
            }
            if notif_tx.is_closed() {
                break;
            }
            tokio::time::sleep(Duration::from_secs(5)).await;
        }
    });

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = runtime::run_app(&mut terminal, &mut app, &client, &store, &mut notif_rx).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}
