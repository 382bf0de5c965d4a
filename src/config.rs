use std::path::{Path, PathBuf};

use anyhow::{ensure, Context, Result};
use clap::Parser;
use serde::Deserialize;

use crate::stats::buckets::{BucketMode, PriceStat};

/// Environment variable that overrides the listings file location.
pub const DATA_ENV: &str = "VEHICLE_EXPLORER_DATA";

pub const DEFAULT_DATA_PATH: &str = "data/car_price_prediction_.csv";

#[derive(Debug, Parser)]
#[command(name = "vehicle-explorer", about = "Vehicle price dashboard", version)]
pub struct Cli {
    /// Listings file (.csv or .parquet)
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// JSON settings file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub data_path: PathBuf,
    /// Percentile of mileage used as the initial cap.
    pub cap_percentile: f64,
    /// Percentile of mileage used as the upper end of the cap slider.
    pub cap_max_percentile: f64,
    pub bucket_mode: BucketMode,
    pub price_stat: PriceStat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            cap_percentile: 0.99,
            cap_max_percentile: 0.999,
            bucket_mode: BucketMode::Fixed,
            price_stat: PriceStat::Median,
        }
    }
}

impl AppConfig {
    /// Read settings from a JSON file. Absent keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: AppConfig = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults, then `--config`, then the environment, then `--data`.
    pub fn resolve(cli: &Cli, env_data: Option<String>) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        if let Some(path) = env_data.filter(|p| !p.is_empty()) {
            config.data_path = PathBuf::from(path);
        }
        if let Some(path) = &cli.data {
            config.data_path = path.clone();
        }
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        for (name, q) in [
            ("cap_percentile", self.cap_percentile),
            ("cap_max_percentile", self.cap_max_percentile),
        ] {
            ensure!((0.0..=1.0).contains(&q), "{name} must be within [0, 1], got {q}");
        }
        ensure!(
            self.cap_percentile <= self.cap_max_percentile,
            "cap_percentile ({}) exceeds cap_max_percentile ({})",
            self.cap_percentile,
            self.cap_max_percentile
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("vehicle-explorer").chain(args.iter().copied()))
    }

    #[test]
    fn defaults() {
        let config = AppConfig::resolve(&cli(&[]), None).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.data_path, PathBuf::from(DEFAULT_DATA_PATH));
    }

    #[test]
    fn load_partial_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("settings.json");
        fs::write(
            &config_path,
            r#"{ "data_path": "/srv/cars.csv", "bucket_mode": "quantile", "cap_percentile": 0.95 }"#,
        )
        .unwrap();

        let config = AppConfig::from_file(&config_path).unwrap();
        assert_eq!(config.data_path, PathBuf::from("/srv/cars.csv"));
        assert_eq!(config.bucket_mode, BucketMode::Quantile);
        assert_eq!(config.price_stat, PriceStat::Median);
        assert_eq!(config.cap_percentile, 0.95);
        assert_eq!(config.cap_max_percentile, 0.999);
    }

    #[test]
    fn cli_beats_env_beats_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("settings.json");
        fs::write(&config_path, r#"{ "data_path": "from-file.csv" }"#).unwrap();
        let path = config_path.to_str().unwrap();

        let config = AppConfig::resolve(&cli(&["--config", path]), None).unwrap();
        assert_eq!(config.data_path, PathBuf::from("from-file.csv"));

        let config =
            AppConfig::resolve(&cli(&["--config", path]), Some("from-env.csv".into())).unwrap();
        assert_eq!(config.data_path, PathBuf::from("from-env.csv"));

        let config = AppConfig::resolve(
            &cli(&["--config", path, "--data", "from-cli.csv"]),
            Some("from-env.csv".into()),
        )
        .unwrap();
        assert_eq!(config.data_path, PathBuf::from("from-cli.csv"));
    }

    #[test]
    fn rejects_bad_percentiles_and_unknown_keys() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("settings.json");

        fs::write(&config_path, r#"{ "cap_percentile": 1.5 }"#).unwrap();
        assert!(AppConfig::from_file(&config_path).is_err());

        fs::write(&config_path, r#"{ "cap_percentile": 0.9, "cap_max_percentile": 0.5 }"#).unwrap();
        assert!(AppConfig::from_file(&config_path).is_err());

        fs::write(&config_path, r#"{ "datapath": "x.csv" }"#).unwrap();
        assert!(AppConfig::from_file(&config_path).is_err());
    }
}
