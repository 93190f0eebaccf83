use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// File looked up in the working directory at startup.
pub const CONFIG_FILE: &str = "border-crossings.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("parsing {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("map zoom range {min}..={max} is empty")]
    ZoomRange { min: f64, max: f64 },
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Initial placement of the map and the look of the heat points.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// `[longitude, latitude]` of the initial view.
    pub center: [f64; 2],
    pub zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Base radius in screen pixels of the heaviest point.
    pub point_radius: f32,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center: [-95.7129, 39.8283],
            zoom: 3.0,
            min_zoom: 1.0,
            max_zoom: 20.0,
            point_radius: 6.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// The static dataset read at startup.
    pub data_path: PathBuf,
    /// Directory holding `Flag_of_Mexico.svg` and `Flag_of_Canada.svg`.
    pub flag_dir: PathBuf,
    pub map: MapConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("static/json/data.json"),
            flag_dir: PathBuf::from("static/images"),
            map: MapConfig::default(),
        }
    }
}

impl DashboardConfig {
    /// Read a config file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: DashboardConfig =
            toml::from_str(content).map_err(|source| ConfigError::Parse {
                path: PathBuf::from("<inline>"),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let MapConfig {
            min_zoom, max_zoom, ..
        } = self.map;
        if !(min_zoom <= max_zoom) {
            return Err(ConfigError::ZoomRange {
                min: min_zoom,
                max: max_zoom,
            });
        }
        Ok(())
    }

    /// Startup configuration: the config file in the working directory,
    /// then an optional data path from the command line.
    pub fn from_env() -> Self {
        let mut config = match Self::load(Path::new(CONFIG_FILE)) {
            Ok(c) => c,
            Err(e) => {
                log::error!("{e}; using defaults");
                Self::default()
            }
        };
        if let Some(path) = std::env::args_os().nth(1) {
            config.data_path = PathBuf::from(path);
        }
        config
    }
}
