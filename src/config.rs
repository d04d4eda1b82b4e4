//! Configuration loading for Marga

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::Point2D;
use crate::environment::Footprint;
use crate::error::ConfigError;
use crate::planning::PlannerKind;

/// Planner parameters, re-read on every planning request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Maximum planar distance between consecutive output frames in meters (default: 0.10)
    #[serde(default = "default_max_dist_between_pathframes")]
    pub max_dist_between_pathframes: f64,

    /// Footprint cost at or above which a pose is occupied (default: 256)
    #[serde(default = "default_max_footprint_cost")]
    pub max_footprint_cost: u32,

    /// Motion-check step as a fraction of the state space extent (default: 0.004)
    #[serde(default = "default_relative_validity_check_resolution")]
    pub relative_validity_check_resolution: f64,

    /// Densify the solution before returning it (default: true)
    #[serde(default = "default_interpolate_path")]
    pub interpolate_path: bool,

    /// Solver time budget in seconds (default: 1.0)
    #[serde(default = "default_solver_maxtime")]
    pub solver_maxtime: f64,

    /// Planner kind name (default: LBKPIECE)
    #[serde(default = "default_global_planner_type")]
    pub global_planner_type: String,

    /// Publish diagnostics and statistics records (default: true)
    #[serde(default = "default_publish_diagnostics")]
    pub publish_diagnostics: bool,

    /// Seed for planner sampling; random when unset
    #[serde(default)]
    pub random_seed: Option<u64>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_dist_between_pathframes: default_max_dist_between_pathframes(),
            max_footprint_cost: default_max_footprint_cost(),
            relative_validity_check_resolution: default_relative_validity_check_resolution(),
            interpolate_path: default_interpolate_path(),
            solver_maxtime: default_solver_maxtime(),
            global_planner_type: default_global_planner_type(),
            publish_diagnostics: default_publish_diagnostics(),
            random_seed: None,
        }
    }
}

impl PlannerConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Copy with out-of-range values reset to their defaults.
    ///
    /// A non-positive frame spacing falls back to 0.10 with a warning.
    pub fn sanitized(&self) -> Self {
        let mut config = self.clone();
        if !(config.max_dist_between_pathframes > 0.0) {
            warn!(
                "Frame spacing {} is invalid, must be greater than 0. Using default {}",
                config.max_dist_between_pathframes,
                default_max_dist_between_pathframes()
            );
            config.max_dist_between_pathframes = default_max_dist_between_pathframes();
        }
        config
    }

    /// Solver time budget. Values too large for a `Duration` saturate.
    pub fn solver_budget(&self) -> Duration {
        Duration::try_from_secs_f64(self.solver_maxtime).unwrap_or(Duration::MAX)
    }

    /// Planner kind named by `global_planner_type`.
    pub fn planner_kind(&self) -> Result<PlannerKind, ConfigError> {
        self.global_planner_type.parse()
    }

    /// Check values that cannot be repaired.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let resolution = self.relative_validity_check_resolution;
        if !(resolution > 0.0 && resolution <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "relative_validity_check_resolution must be in (0, 1], got {}",
                resolution
            )));
        }
        if !(self.solver_maxtime > 0.0 && self.solver_maxtime.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "solver_maxtime must be positive, got {}",
                self.solver_maxtime
            )));
        }
        self.planner_kind()?;
        Ok(())
    }
}

/// Configuration of the `marga` command-line tool.
#[derive(Clone, Debug, Deserialize)]
pub struct MargaConfig {
    #[serde(default)]
    pub planner: PlannerConfig,
    pub map: MapSection,
}

/// Environment description for the command-line tool.
#[derive(Clone, Debug, Deserialize)]
pub struct MapSection {
    /// ASCII map file, relative paths resolve against the config file
    pub path: PathBuf,

    /// Cell size in meters (default: 0.05)
    #[serde(default = "default_resolution")]
    pub resolution: f64,

    /// World position of the lower-left map corner (default: [0, 0])
    #[serde(default)]
    pub origin: [f64; 2],

    /// Frame the map is expressed in (default: "map")
    #[serde(default = "default_frame_id")]
    pub frame_id: String,

    /// Robot footprint polygon in the robot frame (default: 0.3 m square)
    #[serde(default = "default_footprint")]
    pub footprint: Footprint,

    /// Inflation band beyond the inscribed radius in meters (default: 0.25)
    #[serde(default = "default_inflation_radius")]
    pub inflation_radius: f64,

    /// Exponential decay of inflated costs (default: 10.0)
    #[serde(default = "default_cost_scaling_factor")]
    pub cost_scaling_factor: f64,
}

impl MapSection {
    pub fn origin(&self) -> Point2D {
        Point2D::new(self.origin[0], self.origin[1])
    }
}

impl MargaConfig {
    /// Load configuration from a TOML file.
    ///
    /// A relative map path is resolved against the config file's directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: MargaConfig = toml::from_str(&content)?;

        if config.map.path.is_relative() {
            if let Some(dir) = path.parent() {
                config.map.path = dir.join(&config.map.path);
            }
        }

        Ok(config)
    }
}

// Default value functions
fn default_max_dist_between_pathframes() -> f64 {
    0.10
}
fn default_max_footprint_cost() -> u32 {
    256
}
fn default_relative_validity_check_resolution() -> f64 {
    0.004
}
fn default_interpolate_path() -> bool {
    true
}
fn default_solver_maxtime() -> f64 {
    1.0
}
fn default_global_planner_type() -> String {
    PlannerKind::default().name().to_string()
}
fn default_publish_diagnostics() -> bool {
    true
}

// Map defaults
fn default_resolution() -> f64 {
    0.05
}
fn default_frame_id() -> String {
    "map".to_string()
}
fn default_footprint() -> Footprint {
    Footprint::rectangle(0.3, 0.3)
}
fn default_inflation_radius() -> f64 {
    0.25
}
fn default_cost_scaling_factor() -> f64 {
    10.0
}
