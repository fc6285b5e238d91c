use crate::playlist::DEFAULT_QUEUE_LENGTH;
use anyhow::{Context, Result};

/// Configuration loaded from environment variables
#[derive(Debug)]
pub struct Config {
    pub dataset_path: String,
    pub queue_length: usize,
    pub preferences_path: Option<String>,
}

/// Load configuration from `.env` and environment
pub fn load_config() -> Result<Config> {
    // Load `.env` file if present
    dotenv::dotenv().ok();

    let dataset_path = std::env::var("DATASET_PATH").unwrap_or_else(|_| "dataset.tsv".to_string());
    let queue_length = match std::env::var("QUEUE_LENGTH") {
        Ok(value) => value
            .parse()
            .with_context(|| format!("QUEUE_LENGTH '{value}' is not a number"))?,
        Err(_) => DEFAULT_QUEUE_LENGTH,
    };
    let preferences_path = std::env::var("PREFERENCES_PATH").ok();

    Ok(Config {
        dataset_path,
        queue_length,
        preferences_path,
    })
}
