//! Run command: one polling pass over the configured exam centers

use chrono::Local;
use colored::Colorize;
use log::{debug, info, warn};

use crate::client::{ExamApi, SbatClient};
use crate::config::Config;
use crate::error::Result;
use crate::notify::{RunResult, Webhook, WebhookClient, build_digest};
use crate::slots::filter_slots;
use crate::token::{self, TokenStore};

/// Run a single polling pass
pub async fn run(config_path: Option<&str>) -> Result<()> {
    let config = Config::load_at(config_path)?;
    config.validate()?;

    let client = SbatClient::new(&config)?;
    let webhook = WebhookClient::new(&config)?;
    let store = TokenStore::new(config.token_path()?);

    run_with(&config, &client, &webhook, &store).await
}

/// One pass: ensure a usable token, query every center in order, filter each
/// center's slots against the window, and post a digest if anything matched.
async fn run_with(
    config: &Config,
    api: &dyn ExamApi,
    webhook: &dyn Webhook,
    store: &TokenStore,
) -> Result<()> {
    let token = ensure_token(api, store).await?;

    // One "search from" timestamp for the whole pass; every center queries
    // with the identical value
    let start_date = Local::now().format("%Y-%m-%dT%H:%M").to_string();

    let mut results: RunResult = Vec::new();
    for center in &config.centers {
        let slots = api.available_slots(&token, center.id, &start_date).await;
        let matching = filter_slots(slots, &config.window);
        if !matching.is_empty() {
            results.push((center.name.clone(), matching));
        }
    }

    if results.is_empty() {
        info!(
            "No slots between {} and {}",
            config.window.start, config.window.end
        );
        println!(
            "No open slots between {} and {}.",
            config.window.start, config.window.end
        );
        return Ok(());
    }

    let total: usize = results.iter().map(|(_, slots)| slots.len()).sum();
    println!(
        "{} Found {} matching slot(s) across {} center(s)",
        "✓".green(),
        total,
        results.len()
    );

    if let Err(e) = webhook.post(&build_digest(&results)).await {
        warn!("Webhook delivery failed: {e}");
    }

    Ok(())
}

/// Produce a token that is valid by its own `exp` claim: reuse the cached
/// one when possible, otherwise authenticate and write the replacement back
/// before any center is queried.
async fn ensure_token(api: &dyn ExamApi, store: &TokenStore) -> Result<String> {
    if let Some(cached) = store.load() {
        if !token::is_expired(&cached) {
            debug!("Cached token still valid");
            return Ok(cached);
        }
        info!("Cached token expired, re-authenticating");
    } else {
        info!("No cached token, authenticating");
    }

    let fresh = api.authenticate().await?;
    store.save(&fresh)?;
    Ok(fresh)
}
