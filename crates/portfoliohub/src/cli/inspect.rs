//! Read-only commands: packages, moderate and config.

use portfoliohub::{HubConfig, HubResult, ModerationGateway, Moderator, credit_catalog};
use tracing::instrument;

/// Print the package catalog.
pub fn print_packages() {
    println!(
        "{:<10} {:>8} {:>7} {:>8} {:>7}",
        "PACKAGE", "CREDITS", "BONUS", "POINTS", "RATE"
    );
    for package in credit_catalog() {
        let marker = if *package.popular() { " *" } else { "" };
        println!(
            "{:<10} {:>8} {:>7} {:>8} {:>7.1}{}",
            package.id(),
            package.credits_granted(),
            package.bonus_credits(),
            package.points_cost(),
            package.display_rate(),
            marker
        );
    }
}

/// Moderate `text` and print the verdict.
#[instrument(skip(config, text))]
pub async fn moderate_text(config: &HubConfig, text: &str) -> HubResult<()> {
    let gateway = ModerationGateway::from_config(&config.moderation);
    let verdict = gateway.moderate(text).await?;
    let source = if gateway.has_classifier() {
        "classifier"
    } else {
        "fallback"
    };

    println!(
        "{} (confidence {:.2}, {})",
        if verdict.approved { "APPROVED" } else { "REJECTED" },
        verdict.confidence,
        source
    );
    if let Some(reason) = &verdict.reason {
        println!("Reason: {}", reason);
    }
    Ok(())
}

/// Print the configuration as TOML.
pub fn print_config(config: &HubConfig) -> HubResult<()> {
    print!("{}", config.to_redacted_toml()?);
    Ok(())
}
