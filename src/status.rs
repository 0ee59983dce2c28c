// System status display: shows DB stats, report counts and ledger size.

use anyhow::Result;
use std::sync::Arc;

use crate::db::Database;

/// Display system status to the terminal. The caller has already opened
/// the database, so the file exists.
pub async fn show(db: &Arc<dyn Database>, db_display_path: &str) -> Result<()> {
    let file_size = std::fs::metadata(db_display_path)
        .map(|m| format_bytes(m.len()))
        .unwrap_or_else(|_| "unknown".to_string());
    println!("Database: {} ({})", db_display_path, file_size);

    let counts = db.count_reports_by_status().await?;
    let total: i64 = counts.iter().map(|(_, n)| n).sum();
    if total == 0 {
        println!("Reports: none yet");
        println!("  Run `straysaver import <file.json>` to load report records");
    } else {
        let breakdown: Vec<String> = counts
            .iter()
            .map(|(status, n)| format!("{n} {status}"))
            .collect();
        println!("Reports: {} total ({})", total, breakdown.join(", "));
    }

    println!("Redemptions recorded: {}", db.redemption_count().await?);

    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
