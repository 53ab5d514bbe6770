//! Configuration for the selection database run.

use serde::{Deserialize, Serialize};

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "processoSeletivo.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Seed data configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConfig {
    #[serde(default = "default_candidate_name")]
    pub candidate_name: String,
    #[serde(default = "default_sequence_length")]
    pub sequence_length: usize,
}

fn default_candidate_name() -> String {
    "Gustavo Saraiva".to_string()
}

fn default_sequence_length() -> usize {
    30
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            candidate_name: default_candidate_name(),
            sequence_length: default_sequence_length(),
        }
    }
}

/// Report and cleanup configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default = "default_prune_threshold")]
    pub prune_threshold: i64,
}

fn default_top_k() -> usize {
    5
}

fn default_prune_threshold() -> i64 {
    5000
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            prune_threshold: default_prune_threshold(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub seed: SeedConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

impl AppConfig {
    /// Load configuration from environment and config file
    pub fn load() -> anyhow::Result<Self> {
        let config = config::Config::builder()
            // Start with defaults
            .add_source(config::Config::try_from(&AppConfig::default())?)
            // Add config file if exists
            .add_source(config::File::with_name("config").required(false))
            // Override with environment variables (SELECAO_DATABASE_PATH, etc.)
            .add_source(
                config::Environment::with_prefix("SELECAO")
                    .separator("_")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.database.path, "processoSeletivo.db");
        assert_eq!(config.seed.sequence_length, 30);
        assert_eq!(config.report.top_k, 5);
        assert_eq!(config.report.prune_threshold, 5000);
    }
}
