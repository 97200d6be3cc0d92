//! Deployment configuration.
//!
//! [`ParkingConfig`] holds the grid shape, lot capacity and classifier
//! settings. It is serializable via [`serde`] so it can be stored to /
//! restored from a JSON file next to the data directory.
//!
//! # Example
//!
//! ```rust
//! use parking_rssi::config::ParkingConfig;
//!
//! let cfg = ParkingConfig::default();
//! cfg.validate().expect("default config is valid");
//!
//! assert_eq!(cfg.input_size(), 6);
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::domain::grid::GridShape;
use crate::error::ConfigError;
use crate::pipeline::classifier::VotePolicy;

/// Grid, capacity and classifier settings for one deployment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParkingConfig {
    /// Grid rows. Default: **3**.
    pub rows: usize,

    /// Grid columns. Default: **2**.
    pub cols: usize,

    /// Number of parking slots in the lot. Default: **10**.
    pub capacity: u32,

    /// Neighbour count for the classifier. Default: **3**.
    pub k: usize,

    /// How neighbour labels are combined. Default: **nearest**.
    pub vote: VotePolicy,
}

impl Default for ParkingConfig {
    fn default() -> Self {
        ParkingConfig {
            rows: 3,
            cols: 2,
            capacity: 10,
            k: 3,
            vote: VotePolicy::Nearest,
        }
    }
}

impl ParkingConfig {
    /// Largest accepted `rows * cols`. Every scan allocates one slot per
    /// cell, so the grid is kept to a size a real lot can have.
    pub const MAX_CELLS: usize = 4096;

    /// Load a [`ParkingConfig`] from a JSON file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::FileRead`] if the file cannot be opened,
    /// [`ConfigError::ParseError`] if the JSON is malformed and
    /// [`ConfigError::InvalidValue`] if validation fails.
    pub fn from_json(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg: ParkingConfig =
            serde_json::from_str(&contents).map_err(|source| ConfigError::ParseError {
                path: path.to_path_buf(),
                source,
            })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Like [`Self::from_json`], but a missing file yields the default.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_json(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Serialize this configuration to pretty-printed JSON and write it to
    /// `path`, creating parent directories if necessary.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::FileRead`] if the directory cannot be created or
    /// the file cannot be written.
    pub fn to_json(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::FileRead {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::invalid_value("(serialization)", e.to_string()))?;
        std::fs::write(path, json).map_err(|source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(())
    }

    /// Grid shape.
    pub fn grid(&self) -> GridShape {
        GridShape::new(self.rows, self.cols)
    }

    /// Fingerprint dimensionality, `rows * cols`.
    pub fn input_size(&self) -> usize {
        self.grid().cell_count()
    }

    /// Validate all fields.
    ///
    /// - `rows`, `cols` and `k` must be at least 1.
    /// - `rows * cols` must not exceed [`Self::MAX_CELLS`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 {
            return Err(ConfigError::invalid_value("rows", "must be > 0"));
        }
        if self.cols == 0 {
            return Err(ConfigError::invalid_value("cols", "must be > 0"));
        }
        match self.rows.checked_mul(self.cols) {
            Some(cells) if cells <= Self::MAX_CELLS => {}
            _ => {
                return Err(ConfigError::invalid_value(
                    "rows",
                    format!(
                        "{} x {} grid exceeds {} cells",
                        self.rows,
                        self.cols,
                        Self::MAX_CELLS
                    ),
                ))
            }
        }
        if self.k == 0 {
            return Err(ConfigError::invalid_value("k", "must be > 0"));
        }
        Ok(())
    }
}
