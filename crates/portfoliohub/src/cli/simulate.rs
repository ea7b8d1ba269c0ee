//! The `simulate` command.

use portfoliohub::{HubConfig, HubResult, PortfolioHub, run_scenario};

/// Run the scenario in memory and print the resulting balances.
pub async fn simulate(config: HubConfig) -> HubResult<()> {
    let hub = PortfolioHub::in_memory(config);
    let outcome = run_scenario(&hub).await;
    hub.shutdown().await;
    let report = outcome?;

    println!(
        "Bought '{}': {} credit(s) for {} points",
        report.purchase.package.id(),
        report.purchase.package.total_credits(),
        report.purchase.package.points_cost()
    );
    println!(
        "Published '{}' ({} likes, {} views)",
        report.listing.title, report.listing.likes, report.listing.views
    );
    println!(
        "Comment \"{}\" is {}{}",
        report.comment.content,
        report.comment.status,
        report
            .comment
            .moderation_reason
            .as_deref()
            .map(|reason| format!(" ({})", reason))
            .unwrap_or_default()
    );
    println!();
    for account in [&report.artist, &report.viewer] {
        println!(
            "{:<8} {:>4} points {:>3} credits",
            account.display_name, account.points, account.credits
        );
    }
    Ok(())
}
