//! Init command implementation

use colored::Colorize;
use dialoguer::{Input, Password, theme::ColorfulTheme};

use crate::client::{ExamApi, SbatClient};
use crate::config::Config;
use crate::error::Result;
use crate::token::TokenStore;

/// Run the init command
///
/// Interactive setup against the production endpoints. Custom endpoints,
/// centers, and the date window can be edited in the config file afterwards.
pub async fn run(config_path: Option<&str>) -> Result<()> {
    println!("{}", "Welcome to slotwatch!".bold().green());
    println!("Let's set up your exam account and webhook.\n");

    let username: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Account email")
        .interact_text()?;

    let password: String = Password::with_theme(&ColorfulTheme::default())
        .with_prompt("Account password")
        .interact()?;

    let webhook_url: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Webhook URL")
        .interact_text()?;

    let config = Config::with_account(username, password, webhook_url);

    // Verify the account before persisting anything
    println!("\n{}", "Authenticating...".cyan());
    let client = SbatClient::new(&config)?;
    let token = client.authenticate().await?;
    println!("{}", "✓ Authentication successful!".green());

    TokenStore::new(config.token_path()?).save(&token)?;
    config.save_at(config_path)?;

    let path = Config::resolve_path(config_path)?;
    println!("\n{} Configuration saved to: {}", "✓".green(), path.display());
    println!(
        "  Watching {} centers, window {} - {}",
        config.centers.len(),
        config.window.start,
        config.window.end
    );

    println!("\n{}", "You're all set! Try running:".bold());
    println!("  {} - Show configuration status", "slotwatch status".cyan());
    println!("  {} - Poll for open slots once", "slotwatch run".cyan());
    println!("\nEdit the config file to adjust the centers and the date window.");

    Ok(())
}
