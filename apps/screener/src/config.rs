use std::path::PathBuf;

use anyhow::{Context, Result};

const DATASET_FILE: &str = "comprehensive_training_dataset.csv";
const HISTORY_FILE: &str = "analysis_history.csv";

/// Training knobs. Defaults: 80/20 split, seed 42, 1000 TF-IDF features.
#[derive(Debug, Clone)]
pub struct TrainingConfig {
    pub test_fraction: f64,
    pub seed: u64,
    pub max_features: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            test_fraction: 0.2,
            seed: 42,
            max_features: 1000,
        }
    }
}

/// Application configuration loaded from environment variables.
/// Every variable is optional; unset ones fall back to local defaults.
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub models_dir: PathBuf,
    pub synonyms_path: Option<PathBuf>,
    pub training: TrainingConfig,
    pub rust_log: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            models_dir: PathBuf::from("models"),
            synonyms_path: None,
            training: TrainingConfig::default(),
            rust_log: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();

        let test_fraction = parse_env("SCREENER_TEST_FRACTION", defaults.training.test_fraction)?;
        if !(test_fraction > 0.0 && test_fraction < 1.0) {
            anyhow::bail!("SCREENER_TEST_FRACTION must be in (0, 1), got {test_fraction}");
        }

        Ok(Config {
            data_dir: std::env::var("SCREENER_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            models_dir: std::env::var("SCREENER_MODELS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.models_dir),
            synonyms_path: std::env::var("SCREENER_SYNONYMS_PATH").ok().map(PathBuf::from),
            training: TrainingConfig {
                test_fraction,
                seed: parse_env("SCREENER_SEED", defaults.training.seed)?,
                max_features: parse_env("SCREENER_MAX_FEATURES", defaults.training.max_features)?,
            },
            rust_log: std::env::var("RUST_LOG").unwrap_or(defaults.rust_log),
        })
    }

    pub fn with_data_dir(mut self, dir: PathBuf) -> Self {
        self.data_dir = dir;
        self
    }

    pub fn with_models_dir(mut self, dir: PathBuf) -> Self {
        self.models_dir = dir;
        self
    }

    pub fn dataset_path(&self) -> PathBuf {
        self.data_dir.join(DATASET_FILE)
    }

    pub fn history_path(&self) -> PathBuf {
        self.data_dir.join(HISTORY_FILE)
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_paths_live_under_data_dir() {
        let config = Config::default().with_data_dir(PathBuf::from("/tmp/screener"));
        assert_eq!(
            config.dataset_path(),
            PathBuf::from("/tmp/screener/comprehensive_training_dataset.csv")
        );
        assert_eq!(
            config.history_path(),
            PathBuf::from("/tmp/screener/analysis_history.csv")
        );
    }

    #[test]
    fn test_training_defaults() {
        let t = TrainingConfig::default();
        assert_eq!(t.seed, 42);
        assert_eq!(t.max_features, 1000);
        assert!((t.test_fraction - 0.2).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_env_falls_back_to_default() {
        let v: u64 = parse_env("SCREENER_TEST_SURELY_UNSET_VAR", 7).unwrap();
        assert_eq!(v, 7);
    }
}
