use crate::accent::extractor::{bounded_concurrency_hint, concurrency_hint_for, DEFAULT_WORKER_FRACTION};
use crate::accent::request::clamp_downsample;
use crate::render::format::OutputFormat;
use anyhow::{Context, Result};
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const ENV_CONFIG_PATH: &str = "ACCENT_COLOR_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Sample every n-th pixel of each chunk. Values below 1 mean 1.
    #[serde(default = "default_downsample_factor")]
    pub downsample_factor: i64,

    /// Histogram threads. When unset, derived from `worker_fraction`.
    #[serde(default)]
    pub workers: Option<usize>,

    #[serde(default = "default_worker_fraction")]
    pub worker_fraction: f32,

    #[serde(default)]
    pub format: OutputFormat,

    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

fn default_downsample_factor() -> i64 {
    1
}

fn default_worker_fraction() -> f32 {
    DEFAULT_WORKER_FRACTION
}

fn default_cache_capacity() -> usize {
    32
}

impl Default for Config {
    fn default() -> Self {
        Self {
            downsample_factor: default_downsample_factor(),
            workers: None,
            worker_fraction: default_worker_fraction(),
            format: OutputFormat::default(),
            cache_capacity: default_cache_capacity(),
        }
    }
}

impl Config {
    pub fn load_or_default() -> Result<Self> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// A missing file yields defaults; a file that exists must parse.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let config: Self = toml::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| format!("mkdir {}", parent.display()))?;
        }
        let raw = toml::to_string_pretty(self).context("serialize config")?;
        fs::write(path, raw).with_context(|| format!("write {}", path.display()))
    }

    /// Writes to `path`, or to the default location when none is given, and
    /// returns where the file went.
    pub fn save(&self, path: Option<&Path>) -> Result<PathBuf> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_path().context("no config directory on this system")?,
        };
        self.save_to(&path)?;
        log::info!("wrote config to {}", path.display());
        Ok(path)
    }

    pub fn downsample(&self) -> usize {
        clamp_downsample(self.downsample_factor)
    }

    /// Worker count, never more than the machine has CPUs.
    pub fn concurrency_hint(&self) -> usize {
        match self.workers {
            Some(n) => bounded_concurrency_hint(n),
            None => concurrency_hint_for(num_cpus::get(), self.worker_fraction),
        }
    }

    pub fn default_path() -> Option<PathBuf> {
        if let Some(p) = std::env::var_os(ENV_CONFIG_PATH) {
            return Some(PathBuf::from(p));
        }
        // Linux: $XDG_CONFIG_HOME/accent-color/config.toml
        BaseDirs::new().map(|d| d.config_dir().join("accent-color").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "downsample_factor = -2\nworkers = 1\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.downsample(), 1);
        assert_eq!(config.concurrency_hint(), 1);
        assert_eq!(config.format, OutputFormat::Hex);
        assert_eq!(config.cache_capacity, 32);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "downsample_factor = \"lots\"").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config {
            downsample_factor: 4,
            workers: Some(2),
            worker_fraction: 0.5,
            format: OutputFormat::Toml,
            cache_capacity: 8,
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn save_to_explicit_path_keeps_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out").join("accent.toml");
        let config = Config { downsample_factor: 3, format: OutputFormat::Rgb, ..Config::default() };

        let written = config.save(Some(&target)).unwrap();
        assert_eq!(written, target);
        let loaded = Config::load_from(&written).unwrap();
        assert_eq!(loaded.downsample(), 3);
        assert_eq!(loaded.format, OutputFormat::Rgb);
    }

    #[test]
    fn zero_workers_means_one() {
        let config = Config { workers: Some(0), ..Config::default() };
        assert_eq!(config.concurrency_hint(), 1);
        assert!(Config::default().concurrency_hint() >= 1);
    }

    #[test]
    fn huge_worker_count_is_capped() {
        let config = Config { workers: Some(1_000_000_000), ..Config::default() };
        assert_eq!(config.concurrency_hint(), num_cpus::get().max(1));
    }
}
