#![forbid(unsafe_code)]

//! Layered settings: built-in defaults, then `svamitva.toml`, then the
//! environment and command line.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use sv_storage::{DataFiles, REMARKS_FILE, RESPONSIBILITY_FILE, VILLAGES_FILE};

pub const CONFIG_FILE: &str = "svamitva.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file {} does not exist", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Config {
    pub data_dir: PathBuf,
    pub villages_file: PathBuf,
    pub remarks_file: PathBuf,
    pub responsibility_file: PathBuf,
    /// Write sample data for missing files before running a command.
    pub seed_sample_data: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            villages_file: PathBuf::from(VILLAGES_FILE),
            remarks_file: PathBuf::from(REMARKS_FILE),
            responsibility_file: PathBuf::from(RESPONSIBILITY_FILE),
            seed_sample_data: true,
        }
    }
}

impl Config {
    pub fn data_files(&self) -> DataFiles {
        DataFiles {
            villages: self.data_dir.join(&self.villages_file),
            remarks: self.data_dir.join(&self.remarks_file),
            responsibility: self.data_dir.join(&self.responsibility_file),
        }
    }
}

/// One config file's worth of settings; absent keys keep the lower layer.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigLayer {
    pub data_dir: Option<PathBuf>,
    pub villages_file: Option<PathBuf>,
    pub remarks_file: Option<PathBuf>,
    pub responsibility_file: Option<PathBuf>,
    pub seed_sample_data: Option<bool>,
}

impl ConfigLayer {
    /// Relative `data_dir` values are taken relative to `base`.
    pub fn apply_to(&self, config: &mut Config, base: &Path) {
        if let Some(dir) = &self.data_dir {
            config.data_dir = base.join(dir);
        }
        if let Some(file) = &self.villages_file {
            config.villages_file = file.clone();
        }
        if let Some(file) = &self.remarks_file {
            config.remarks_file = file.clone();
        }
        if let Some(file) = &self.responsibility_file {
            config.responsibility_file = file.clone();
        }
        if let Some(seed) = self.seed_sample_data {
            config.seed_sample_data = seed;
        }
    }
}

/// Values from the command line (clap folds `SVAMITVA_DATA_DIR` into `data_dir`).
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub config_file: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
    pub no_seed: bool,
}

pub fn read_layer(path: &Path) -> Result<ConfigLayer, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load(overrides: &Overrides) -> Result<Config, ConfigError> {
    let mut config = Config::default();
    let search_dir = overrides
        .data_dir
        .clone()
        .unwrap_or_else(|| config.data_dir.clone());

    let path = match &overrides.config_file {
        Some(path) if !path.exists() => return Err(ConfigError::NotFound(path.clone())),
        Some(path) => Some(path.clone()),
        None => Some(search_dir.join(CONFIG_FILE)).filter(|path| path.exists()),
    };
    if let Some(path) = path {
        let layer = read_layer(&path)?;
        let base = path.parent().unwrap_or(Path::new("."));
        layer.apply_to(&mut config, base);
        tracing::debug!(path = %path.display(), "config file applied");
    }

    if let Some(dir) = &overrides.data_dir {
        config.data_dir = dir.clone();
    }
    if overrides.no_seed {
        config.seed_sample_data = false;
    }
    Ok(config)
}
