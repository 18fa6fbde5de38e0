//! Where the station is.
//!
//! The location comes from a small TOML file:
//!
//! ```toml
//! latitude = 45.0703
//! longitude = 7.6869
//! city = "Torino"
//! timezone = "Europe/Rome"
//! ```
//!
//! Missing keys take the defaults, which put the station in Bosa, Sardinia.

use std::path::{Path, PathBuf};

use georadio::{GeoPoint, GridLocator};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Where the config lives unless told otherwise, relative to `$HOME`.
pub const DEFAULT_CONFIG_PATH: &str = ".config/radiodash/station.toml";

/// City name given to a location set by hand.
pub const CUSTOM_CITY: &str = "Custom location";

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid station location")]
    Location(#[from] georadio::Error),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StationConfig {
    pub latitude: f64,
    pub longitude: f64,
    pub city: String,

    /// IANA name, only used for display.
    pub timezone: String,
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            latitude: 40.2958,
            longitude: 8.5006,
            city: "Bosa".into(),
            timezone: "Europe/Rome".into(),
        }
    }
}

impl StationConfig {
    /// `$HOME/.config/radiodash/station.toml`, if there is a home.
    pub fn default_path() -> Option<PathBuf> {
        std::env::var_os("HOME").map(|home| PathBuf::from(home).join(DEFAULT_CONFIG_PATH))
    }

    /// Loads the station config.
    ///
    /// An explicit `path` must exist. Without one, the default path is tried
    /// and the defaults are used if there is nothing there.
    pub fn load(path: Option<&Path>) -> Result<Self, Error> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) if path.exists() => path,
                _ => {
                    debug!("no station config, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        let raw = std::fs::read_to_string(&path).map_err(|source| Error::Read {
            path: path.clone(),
            source,
        })?;

        let config = Self::from_toml(&raw).map_err(|err| match err {
            Error::Parse { source, .. } => Error::Parse {
                path: path.clone(),
                source,
            },
            other => other,
        })?;

        info!("station config from {}: {}", path.display(), config.city);
        Ok(config)
    }

    /// Parses a config, checking the location is on the globe.
    pub fn from_toml(raw: &str) -> Result<Self, Error> {
        let config: Self = toml::from_str(raw).map_err(|source| Error::Parse {
            path: PathBuf::new(),
            source,
        })?;
        config.location()?;
        Ok(config)
    }

    pub fn location(&self) -> georadio::Result<GeoPoint> {
        GeoPoint::new(self.latitude, self.longitude)
    }

    /// Moves the station. On invalid coordinates nothing changes.
    pub fn set_location(&mut self, latitude: f64, longitude: f64) -> georadio::Result<GeoPoint> {
        let point = GeoPoint::new(latitude, longitude)?;
        self.latitude = point.latitude();
        self.longitude = point.longitude();
        self.city = CUSTOM_CITY.into();
        Ok(point)
    }

    /// The station's 6-character locator.
    pub fn locator(&self) -> georadio::Result<GridLocator> {
        self.location().map(georadio::lat_lon_to_grid)
    }
}
