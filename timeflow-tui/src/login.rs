use anyhow::{Context, Result};
use std::io::{self, Write};

use timeflow_client::TimeflowClient;

use crate::config::TimeflowConfig;
use crate::session::SessionManager;
use crate::store::LocalStore;

/// Interactive credential login: prompt on stdin, exchange the credentials
/// for a token pair and persist it for later runs.
pub async fn run_login(config: &TimeflowConfig, store: LocalStore) -> Result<()> {
    print!("Username: ");
    io::stdout().flush()?;
    let mut username = String::new();
    io::stdin()
        .read_line(&mut username)
        .context("Failed to read username")?;
    let username = username.trim();
    if username.is_empty() {
        anyhow::bail!("Username cannot be empty");
    }

    let password = rpassword::prompt_password("Password: ").context("Failed to read password")?;

    let client = TimeflowClient::new(&config.api_url, None)?;
    let manager = SessionManager::new(store);
    let session = manager.login(&client, username, &password).await?;

    println!(
        "Login successful. Signed in as {} ({}).",
        username,
        session.role().as_str()
    );
    Ok(())
}
