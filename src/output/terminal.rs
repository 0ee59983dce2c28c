// Colored terminal output for the rewards card, the catalog and report lists.
//
// This module handles all terminal-specific formatting. The main.rs command
// handlers delegate here.

use std::collections::HashSet;

use colored::Colorize;

use crate::db::models::{DisplayStatus, Report};
use crate::rewards::calculator::RewardsSnapshot;
use crate::rewards::catalog::RewardCatalogEntry;
use crate::rewards::sponsor::{rescue_powered_by, PoweredBy};

/// Display the "Your Rewards" card.
pub fn display_rewards_card(snapshot: &RewardsSnapshot) {
    println!("\n{}", "=== Your Rewards ===".bold());
    println!(
        "{}",
        "Earn coins and badges by reporting incidents and volunteering to help".dimmed()
    );
    println!();
    println!(
        "  Coins: {}   Badges: {}   Level: {}   Rescues: {}",
        snapshot.coins.to_string().yellow().bold(),
        snapshot.badges.len().to_string().blue().bold(),
        snapshot.level.to_string().green().bold(),
        snapshot.rescues.to_string().magenta().bold(),
    );

    if !snapshot.badges.is_empty() {
        let names: Vec<String> = snapshot
            .badges
            .iter()
            .map(|b| format!("[{}]", b).cyan().to_string())
            .collect();
        println!("\n  Your badges: {}", names.join(" "));
    }
}

/// Display catalog entries with whether the balance covers each one.
pub fn display_catalog(entries: &[&RewardCatalogEntry], balance: Option<u64>) {
    println!("\n{}", "=== Redeem Rewards ===".bold());
    if let Some(coins) = balance {
        println!("  Available coins: {}", coins.to_string().yellow().bold());
    }
    println!();

    println!(
        "  {:<10} {:<26} {:>6}  {}",
        "Id".dimmed(),
        "Reward".dimmed(),
        "Cost".dimmed(),
        "Description".dimmed(),
    );
    println!("  {}", "-".repeat(78).dimmed());

    for entry in entries {
        let line = format!(
            "  {:<10} {:<26} {:>6}  {}",
            entry.id,
            entry.name,
            entry.cost,
            super::truncate_chars(entry.description, 34),
        );
        match balance {
            Some(coins) if coins < entry.cost => println!("{}", line.dimmed()),
            _ => println!("{line}"),
        }
    }
}

/// Display a report list with status and "Rescue Powered By" columns.
pub fn display_reports(reports: &[&Report], seen: &HashSet<String>, viewer_id: Option<&str>) {
    if reports.is_empty() {
        println!("No reports found. Import some with `straysaver import <file>`.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Reports ({}) ===", reports.len()).bold()
    );
    println!();
    println!(
        "  {:<14} {:<12} {:<17} {:<20} {}",
        "Id".dimmed(),
        "Reported".dimmed(),
        "Status".dimmed(),
        "Powered by".dimmed(),
        "Volunteer".dimmed(),
    );
    println!("  {}", "-".repeat(78).dimmed());

    for report in reports {
        let status = crate::reports::display_status(report, seen);
        let powered_by = match rescue_powered_by(report, viewer_id) {
            None => "-".dimmed(),
            Some(PoweredBy::SelfRescue) => "Self".green(),
            Some(PoweredBy::Sponsor(sponsor)) => sponsor.name.cyan(),
        };
        println!(
            "  {:<14} {:<12} {:<17} {:<20} {}",
            super::truncate_chars(&report.id, 11),
            report.created_at.format("%Y-%m-%d").to_string(),
            colorize_status(status),
            powered_by,
            report.volunteer_id.as_deref().unwrap_or("-"),
        );
    }
}

/// Colorize a display status.
fn colorize_status(status: DisplayStatus) -> colored::ColoredString {
    match status {
        DisplayStatus::Waiting => status.as_str().yellow(),
        DisplayStatus::Seen => status.as_str().bright_blue(),
        DisplayStatus::InProgress => status.as_str().bright_magenta(),
        DisplayStatus::Resolved => status.as_str().green(),
    }
}
