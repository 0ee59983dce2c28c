use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::sync::Arc;
use tracing::info;

use straysaver::config::Config;
use straysaver::db::models::{Report, ReportStatus};
use straysaver::db::Database;
use straysaver::reports::ReportTab;
use straysaver::rewards::catalog::{self, SponsorshipEligibility};
use straysaver::rewards::{RedemptionOutcome, RewardsSession};

/// Stray Saver: rewards for reporting and rescuing stray animals.
///
/// Computes coins, badges and levels from the report history, and lets
/// users spend coins on rewards or on sponsoring rescues.
#[derive(Parser)]
#[command(name = "straysaver", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the local database
    Init,

    /// Import report records from a JSON file (array of reports)
    Import {
        /// Path to the JSON file
        path: std::path::PathBuf,
    },

    /// List reports
    Reports {
        /// Which reports to show
        #[arg(long, value_enum, default_value_t = ReportTab::All)]
        tab: ReportTab,
    },

    /// Claim a report as the active user (marks it in progress)
    Claim {
        /// Report id
        id: String,
    },

    /// Mark a report as rescued by the active user
    Resolve {
        /// Report id
        id: String,
    },

    /// Mark a report as seen (local to the active user)
    Seen {
        /// Report id
        id: String,
    },

    /// Show the active user's coins, badges, level and rescues
    Rewards,

    /// List redeemable rewards
    Catalog {
        /// Only show "sponsor a rescue" tiers
        #[arg(long)]
        sponsorships: bool,
    },

    /// Spend coins on a reward
    Redeem {
        /// Catalog id (e.g. reward3, sponsor1)
        reward_id: String,
    },

    /// Check whether the active user can sponsor a rescue
    Sponsor,

    /// Show system status (DB stats, report counts, ledger size)
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("straysaver=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Init => {
            info!("Initializing Stray Saver database...");
            let db = straysaver::db::initialize_sqlite(&config.db_path)?;
            let table_count = db.table_count().await?;
            println!("Database initialized at: {}", config.db_path);
            println!("Tables created: {table_count}");
            println!("\nNext step: import report records");
            println!("  straysaver import reports.json");
        }

        Commands::Import { path } => {
            let db = straysaver::db::open_sqlite(&config.db_path)?;
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let reports: Vec<Report> = serde_json::from_str(&json)
                .with_context(|| format!("{} is not a valid report list", path.display()))?;

            straysaver::reports::validate_batch(&reports)
                .with_context(|| format!("Rejected batch from {}", path.display()))?;
            db.upsert_reports(&reports).await?;

            info!(count = reports.len(), path = %path.display(), "Imported reports");
            println!("{} {} reports imported", "✓".green(), reports.len());
        }

        Commands::Reports { tab } => {
            let db = straysaver::db::open_sqlite(&config.db_path)?;
            let viewer = (!config.user_id.is_empty()).then_some(config.user_id.as_str());
            if tab != ReportTab::All {
                config.require_user()?;
            }

            let reports = db.list_reports().await?;
            let seen = match viewer {
                Some(user) => db.get_seen_reports(user).await?,
                None => Default::default(),
            };
            let visible = straysaver::reports::filter_reports(&reports, tab, &config.user_id);
            straysaver::output::terminal::display_reports(&visible, &seen, viewer);
        }

        Commands::Claim { id } => {
            let db = straysaver::db::open_sqlite(&config.db_path)?;
            let user = config.require_user()?;
            update_report_status(&db, &id, ReportStatus::InProgress, user).await?;
            println!("Report {id} claimed. Thanks for helping!");
        }

        Commands::Resolve { id } => {
            let db = straysaver::db::open_sqlite(&config.db_path)?;
            let user = config.require_user()?;
            update_report_status(&db, &id, ReportStatus::Resolved, user).await?;
            println!("Report {id} marked as rescued.");

            let session = load_session(&db, user).await?;
            straysaver::output::terminal::display_rewards_card(session.snapshot());
        }

        Commands::Seen { id } => {
            let db = straysaver::db::open_sqlite(&config.db_path)?;
            let user = config.require_user()?;
            if db.get_report(&id).await?.is_none() {
                anyhow::bail!("No report with id {id}");
            }
            db.mark_seen(user, &id).await?;
            println!("Report marked as seen");
        }

        Commands::Rewards => {
            let db = straysaver::db::open_sqlite(&config.db_path)?;
            let user = config.require_user()?;
            let session = load_session(&db, user).await?;
            straysaver::output::terminal::display_rewards_card(session.snapshot());
        }

        Commands::Catalog { sponsorships } => {
            let entries: Vec<_> = if sponsorships {
                catalog::sponsorship_tiers().collect()
            } else {
                catalog::available_rewards().iter().collect()
            };

            // Show the balance when we know who's asking and have their history
            let db = if config.user_id.is_empty() {
                None
            } else {
                straysaver::db::open_sqlite_if_exists(&config.db_path)?
            };
            let balance = match db {
                Some(db) => Some(load_session(&db, &config.user_id).await?.snapshot().coins),
                None => None,
            };
            straysaver::output::terminal::display_catalog(&entries, balance);
        }

        Commands::Redeem { reward_id } => {
            let db = straysaver::db::open_sqlite(&config.db_path)?;
            let user = config.require_user()?;
            let reward = catalog::find_reward(&reward_id).with_context(|| {
                format!("Unknown reward '{reward_id}'. Run `straysaver catalog` to list them.")
            })?;

            let mut session = load_session(&db, user).await?;
            session.open_dialog();

            let outcome = match session.press(reward) {
                Some(gesture) => session.redeem(gesture, Utc::now()),
                None => RedemptionOutcome::InsufficientBalance {
                    balance: session.snapshot().coins,
                    cost: reward.cost,
                },
            };

            match &outcome {
                RedemptionOutcome::Redeemed { record, remaining } => {
                    db.record_redemption(record).await?;
                    println!("{} {}", "✓".green(), outcome.notice());
                    println!("  {} redeemed. Coins left: {remaining}", reward.name.bold());
                }
                _ => println!("{} {}", "✗".red(), outcome.notice()),
            }
        }

        Commands::Sponsor => {
            let db = straysaver::db::open_sqlite(&config.db_path)?;
            let user = config.require_user()?;
            let session = load_session(&db, user).await?;

            match catalog::sponsorship_eligibility(session.snapshot().coins) {
                SponsorshipEligibility::Eligible { .. } => {
                    let tiers: Vec<_> = catalog::sponsorship_tiers().collect();
                    straysaver::output::terminal::display_catalog(
                        &tiers,
                        Some(session.snapshot().coins),
                    );
                    println!("\nRedeem a tier with `straysaver redeem <id>`.");
                }
                SponsorshipEligibility::Short { needed, balance } => {
                    println!(
                        "{} You need at least {needed} coins to sponsor a rescue. \
                         You currently have {balance} coins.",
                        "✗".red()
                    );
                }
            }
        }

        Commands::Status => {
            let Some(db) = straysaver::db::open_sqlite_if_exists(&config.db_path)? else {
                println!("Database: not initialized");
                println!("\nRun `straysaver init` to set up the database.");
                return Ok(());
            };
            straysaver::status::show(&db, &config.db_path).await?;
        }
    }

    Ok(())
}

/// Fetch the report list and the user's ledger, and compute their rewards.
async fn load_session(db: &Arc<dyn Database>, user_id: &str) -> Result<RewardsSession> {
    let reports = db.list_reports().await?;
    let ledger = db.get_redemptions(user_id).await?;

    let mut session = RewardsSession::new(user_id);
    session.recompute(&reports, &ledger);
    Ok(session)
}

/// Move a stored report to a new status on behalf of the active user.
async fn update_report_status(
    db: &Arc<dyn Database>,
    id: &str,
    status: ReportStatus,
    user_id: &str,
) -> Result<()> {
    let mut report = db
        .get_report(id)
        .await?
        .with_context(|| format!("No report with id {id}"))?;

    straysaver::reports::transition(&mut report, status, user_id, Utc::now())?;
    db.upsert_report(&report).await?;

    info!(report = %id, status = %status, volunteer = %user_id, "Updated report status");
    Ok(())
}
