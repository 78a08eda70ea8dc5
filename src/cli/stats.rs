use anyhow::Result;

use crate::collection::stats::store_stats;
use crate::config::TastebudConfig;

/// Display vector store statistics in the terminal.
pub fn stats(config: &TastebudConfig) -> Result<()> {
    let db_path = config.resolved_db_path();
    if !db_path.exists() {
        println!("Vector database: not found at {}", db_path.display());
        println!("Run `tastebud ingest` to create it.");
        return Ok(());
    }

    let conn = crate::db::open_database(&db_path)?;
    let response = store_stats(&conn, Some(&db_path))?;

    println!("Vector Store Statistics");
    println!("{}", "=".repeat(40));
    println!("  Database:            {}", db_path.display());
    println!("  Size:                {}", format_bytes(response.db_size_bytes));
    println!(
        "  Embedding model:     {}",
        response.embedding_model.as_deref().unwrap_or("(not set)")
    );
    println!("  Total entries:       {}", response.total_entries);
    println!();

    if response.collections.is_empty() {
        println!("No collections.");
        return Ok(());
    }

    println!("Collections:");
    for c in &response.collections {
        let dimension = c
            .dimension
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".into());
        println!(
            "  {:<28} {:<7} dim {:<6} {} entries",
            c.name,
            c.metric.as_str(),
            dimension,
            c.entries
        );
    }

    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
