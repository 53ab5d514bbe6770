//! Selection database seeder
//!
//! Populates a local SQLite database with one candidate and the first 30
//! Fibonacci values, then runs the reporting and cleanup queries against it.

mod config;
mod fibonacci;
mod storage;

use std::path::Path;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::AppConfig;
use crate::storage::SelectionRepository;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "selection_db=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load()?;
    tracing::info!("Configuration loaded");
    tracing::info!("Database path: {}", config.database.path);

    let mut repo = SelectionRepository::open(Path::new(&config.database.path))
        .context("Failed to open selection database")?;

    run_sequence(&mut repo, &config);

    Ok(())
}

/// Run the fixed seed, report and prune sequence against the repository.
///
/// Steps after the seed log their error and let the run continue; only the
/// batch insert depends on a previous result (the candidate id).
fn run_sequence(repo: &mut SelectionRepository, config: &AppConfig) {
    let candidate_id = match repo.insert_candidate(&config.seed.candidate_name) {
        Ok(id) => {
            tracing::info!(
                "Candidate '{}' inserted with id {}",
                config.seed.candidate_name,
                id
            );
            Some(id)
        }
        Err(e) => {
            tracing::error!("Failed to insert candidate: {}", e);
            None
        }
    };

    match candidate_id {
        Some(id) => seed_test_records(repo, id, config.seed.sequence_length),
        None => tracing::warn!("Skipping test record insertion without a candidate id"),
    }

    print_sequence(repo);
    print_top_values(repo, config.report.top_k);
    print_parity_counts(repo);
    prune_above(repo, config.report.prune_threshold);

    // List again to show the effect of the prune
    print_sequence(repo);

    if let (Ok(candidates), Ok(records)) = (repo.candidate_count(), repo.test_record_count()) {
        tracing::info!(
            "Database now holds {} candidates and {} test records",
            candidates,
            records
        );
    }
}

/// Generate the Fibonacci sequence and insert one test record per value.
fn seed_test_records(repo: &mut SelectionRepository, candidate_id: i64, length: usize) {
    let values = fibonacci::generate(length);
    tracing::info!("Generated {} Fibonacci values", values.len());

    match repo.insert_test_batch(candidate_id, &values) {
        Ok(inserted) => {
            tracing::info!(
                "{} test records inserted for candidate {}",
                inserted,
                candidate_id
            );
        }
        Err(e) => tracing::error!("Failed to insert test records: {}", e),
    }

    match repo.get_candidate(candidate_id) {
        Ok(candidate) => tracing::info!(
            "Candidate '{}' registered at {}",
            candidate.name,
            candidate.registered_at
        ),
        Err(e) => tracing::error!("Failed to read candidate back: {}", e),
    }
}

/// Print every stored value in insertion order.
fn print_sequence(repo: &SelectionRepository) {
    println!("\n### Stored Fibonacci sequence ###");
    match repo.list_sequence() {
        Ok(values) if values.is_empty() => println!("No values stored."),
        Ok(values) => {
            let joined = values
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            println!("Sequence: {}", joined);
        }
        Err(e) => tracing::error!("Failed to list sequence: {}", e),
    }
}

/// Print the k largest stored values, largest first.
fn print_top_values(repo: &SelectionRepository, k: usize) {
    println!("\n### Top {} values ###", k);
    match repo.top_values(k) {
        Ok(values) if values.is_empty() => println!("No values stored."),
        Ok(values) => {
            for (rank, value) in values.iter().enumerate() {
                println!("#{}: {}", rank + 1, value);
            }
        }
        Err(e) => tracing::error!("Failed to list top values: {}", e),
    }
}

/// Print how many stored values are even and how many are odd.
fn print_parity_counts(repo: &SelectionRepository) {
    println!("\n### Even/odd counts ###");
    match repo.parity_counts() {
        Ok(counts) => {
            println!("Even values: {}", counts.even);
            println!("Odd values: {}", counts.odd);
            println!("Total records: {}", counts.total());
        }
        Err(e) => tracing::error!("Failed to count parities: {}", e),
    }
}

/// Delete every stored value strictly greater than the threshold.
fn prune_above(repo: &SelectionRepository, threshold: i64) {
    println!("\n### Deleting values greater than {} ###", threshold);
    match repo.delete_greater_than(threshold) {
        Ok(deleted) => println!("{} records deleted.", deleted),
        Err(e) => tracing::error!("Failed to delete records: {}", e),
    }
}
