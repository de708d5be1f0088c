//! Run-level configuration for the outlier and join computations.
//!
//! Configuration is plain serializable data. It is validated once at run start,
//! before any record is partitioned, so a bad parameter never surfaces halfway
//! through a run.
use crate::error::{GridError, Result};
use serde::{Deserialize, Serialize};
use spatio_grid_types::{GridDomain, SpatialWindow};

/// Parameters of the radius outlier computation.
///
/// # Example
///
/// ```rust
/// use spatio_grid::OutlierConfig;
///
/// let config = OutlierConfig::new(2.0, 1).with_chunk_size(50);
/// assert!(config.validate().is_ok());
///
/// let json = r#"{ "radius": 5.0, "k": 10 }"#;
/// let config = OutlierConfig::from_json(json).unwrap();
/// assert_eq!(config.chunk_size, 100);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutlierConfig {
    /// Neighbor radius `r`, compared with `<=`
    pub radius: f64,

    /// A point with fewer than `k` neighbors is an outlier
    pub k: usize,

    /// Side of the square chunks points are replicated into
    #[serde(default = "OutlierConfig::default_chunk_size")]
    pub chunk_size: i64,

    /// Bound of the chunk enumeration
    #[serde(default)]
    pub domain: GridDomain,
}

impl OutlierConfig {
    const fn default_chunk_size() -> i64 {
        100
    }

    pub fn new(radius: f64, k: usize) -> Self {
        Self {
            radius,
            k,
            chunk_size: Self::default_chunk_size(),
            domain: GridDomain::default(),
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: i64) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_domain(mut self, domain: GridDomain) -> Self {
        self.domain = domain;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.radius.is_finite() {
            return Err(GridError::InvalidConfig(format!(
                "radius r must be finite, got {}",
                self.radius
            )));
        }
        if self.radius <= 0.0 {
            return Err(GridError::InvalidConfig(format!(
                "radius r must be positive, got {}",
                self.radius
            )));
        }
        if self.k == 0 {
            return Err(GridError::InvalidConfig(
                "neighbor threshold k must be at least 1".to_string(),
            ));
        }
        if self.chunk_size <= 0 {
            return Err(GridError::InvalidConfig(format!(
                "chunk size must be positive, got {}",
                self.chunk_size
            )));
        }
        if self.domain.max_coordinate <= 0 {
            return Err(GridError::InvalidConfig(format!(
                "domain bound must be positive, got {}",
                self.domain.max_coordinate
            )));
        }
        Ok(())
    }

    /// Load and validate from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: OutlierConfig =
            serde_json::from_str(json).map_err(|e| GridError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

/// Parameters of the spatial join.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JoinConfig {
    /// Records outside this window are dropped before partitioning
    #[serde(default)]
    pub window: SpatialWindow,

    /// Side of the square cells points and rectangles are grouped by
    #[serde(default = "JoinConfig::default_cell_size")]
    pub cell_size: i64,
}

impl JoinConfig {
    const fn default_cell_size() -> i64 {
        10
    }

    pub fn with_window(mut self, window: SpatialWindow) -> Self {
        self.window = window;
        self
    }

    pub fn with_cell_size(mut self, cell_size: i64) -> Self {
        self.cell_size = cell_size;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.window.is_valid() {
            return Err(GridError::InvalidConfig(format!(
                "spatial window {} must satisfy x1 <= x2 and y1 <= y2",
                self.window
            )));
        }
        if self.cell_size <= 0 {
            return Err(GridError::InvalidConfig(format!(
                "cell size must be positive, got {}",
                self.cell_size
            )));
        }
        Ok(())
    }
}

impl Default for JoinConfig {
    fn default() -> Self {
        Self {
            window: SpatialWindow::default(),
            cell_size: Self::default_cell_size(),
        }
    }
}

/// Configuration file contents.
///
/// ```rust
/// use spatio_grid::Config;
///
/// let json = r#"{
///     "workers": 4,
///     "outlier": { "radius": 5.0, "k": 3 },
///     "join": { "window": { "x1": 0, "y1": 0, "x2": 20, "y2": 20 } }
/// }"#;
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.join.cell_size, 10);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Worker threads of the local engine (None: one per core)
    #[serde(default)]
    pub workers: Option<usize>,

    #[serde(default)]
    pub outlier: Option<OutlierConfig>,

    #[serde(default)]
    pub join: JoinConfig,
}

impl Config {
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.workers == Some(0) {
            return Err(GridError::InvalidConfig(
                "worker count must be at least 1".to_string(),
            ));
        }
        if let Some(outlier) = &self.outlier {
            outlier.validate()?;
        }
        self.join.validate()
    }

    /// Load configuration from JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Config =
            serde_json::from_str(json).map_err(|e| GridError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration as JSON string
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load configuration from TOML string (requires toml feature)
    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(toml_str).map_err(|e| GridError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration as TOML string (requires toml feature)
    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| GridError::Serialization(e.to_string()))
    }
}
