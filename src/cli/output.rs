//! Plain-text rendering of records and summaries.

use crate::domain::{SignalRecord, SignalSummary, HIGH_SCORE_THRESHOLD};

/// Shorten to `max` characters, marking the cut with "..."
pub fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        return value.to_string();
    }
    let kept: String = value.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}

/// Ranked table with growth reasons
pub fn print_records(records: &[SignalRecord]) {
    if records.is_empty() {
        println!("No startups match the selected filters.");
        return;
    }

    println!(
        "{:<3} {:<26} {:>5} {:<22} {:<12} {:<20}",
        "#", "NAME", "SCORE", "SECTOR", "STAGE", "SIGNAL"
    );
    println!("{}", "-".repeat(93));

    for (idx, record) in records.iter().enumerate() {
        println!(
            "{:<3} {:<26} {:>5} {:<22} {:<12} {:<20}",
            idx + 1,
            truncate(&record.name, 26),
            record.score,
            truncate(&record.sector, 22),
            truncate(&record.funding_stage, 12),
            truncate(&record.signal_type, 20),
        );
        println!("    {}", record.growth_reason);
        println!("    {}", record.source_link);
    }
}

/// Stored records with their capture time
pub fn print_history(records: &[SignalRecord]) {
    println!("{:<20} {:<26} {:>5} {:<22}", "CAPTURED", "NAME", "SCORE", "SECTOR");
    println!("{}", "-".repeat(76));

    for record in records {
        println!(
            "{:<20} {:<26} {:>5} {:<22}",
            record.timestamp.format("%Y-%m-%d %H:%M:%S"),
            truncate(&record.name, 26),
            record.score,
            truncate(&record.sector, 22),
        );
    }
}

/// One-line headline numbers
pub fn print_summary(summary: &SignalSummary) {
    println!(
        "\nTotal: {} | Avg score: {:.1} | High score ({}+): {}",
        summary.total, summary.average_score, HIGH_SCORE_THRESHOLD, summary.high_score_count
    );
}

/// Histograms as indented count lists
pub fn print_distributions(summary: &SignalSummary) {
    let sections = [
        ("Score bands", &summary.score_bands),
        ("Sectors", &summary.by_sector),
        ("Signal types", &summary.by_signal_type),
        ("Funding stages", &summary.by_funding_stage),
    ];

    for (title, counts) in sections {
        println!("\n{}:", title);
        for (label, count) in counts {
            println!("  {:<24} {}", label, count);
        }
    }
}
