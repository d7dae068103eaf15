//! Status command implementation

use colored::Colorize;

use crate::config::Config;
use crate::error::Result;
use crate::token::{self, TokenStore};

/// Run the status command to display configuration and token state
pub fn run(config_path: Option<&str>) -> Result<()> {
    println!("{}\n", "slotwatch Configuration Status".bold());

    let config = match Config::load_at(config_path) {
        Ok(config) => config,
        Err(_) => {
            println!("{} Configuration not found", "✗".red());
            println!();
            println!(
                "Run {} to create a configuration file.",
                "slotwatch init".cyan()
            );
            println!();
            return Ok(());
        }
    };

    let path = Config::resolve_path(config_path)?;
    println!("Config file: {}", path.display().to_string().cyan());
    println!();

    if config.username.trim().is_empty() {
        println!("{} Account not configured", "✗".red());
        println!("  → Run 'slotwatch init' to configure");
    } else {
        println!("{} Account: {}", "✓".green(), config.username);
    }

    let store = TokenStore::new(config.token_path()?);
    match store.load() {
        None => {
            println!(
                "{} No token cached (will authenticate on next run)",
                "○".dimmed()
            );
        }
        Some(cached) => match token::expiry(&cached) {
            Some(expires_at) if !token::is_expired(&cached) => {
                let remaining = expires_at.signed_duration_since(chrono::Utc::now());
                let hours = remaining.num_hours();
                let mins = remaining.num_minutes() % 60;
                println!(
                    "{} Token valid (expires in {}h {}m)",
                    "✓".green(),
                    hours,
                    mins
                );
            }
            _ => {
                println!(
                    "{} Cached token expired (will re-authenticate on next run)",
                    "⚠".yellow()
                );
            }
        },
    }

    println!(
        "{} Window: {} - {}",
        "✓".green(),
        config.window.start,
        config.window.end
    );

    println!("{} Watching {} exam centers:", "✓".green(), config.centers.len());
    for center in &config.centers {
        println!("    {} {}", format!("[{}]", center.id).dimmed(), center.name);
    }

    println!();
    Ok(())
}
