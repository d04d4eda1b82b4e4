//! Error types for Marga

use thiserror::Error;

use crate::planning::ValidityVerdict;

/// Configuration loading and validation errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Unsupported planner type '{0}'")]
    UnsupportedPlanner(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Path densification errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DensifyError {
    #[error("Path must contain at least two poses, got {0}")]
    TooShort(usize),

    #[error("Frame spacing must be positive, got {0}")]
    InvalidSpacing(f64),
}

/// ASCII map loading errors.
#[derive(Error, Debug)]
pub enum MapError {
    #[error("Failed to read map: {0}")]
    Io(#[from] std::io::Error),

    #[error("Map contains no cells")]
    Empty,

    #[error("Row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Unrecognized cell '{symbol}' at row {row}, column {column}")]
    InvalidCell {
        symbol: char,
        row: usize,
        column: usize,
    },

    #[error("Resolution must be positive, got {0}")]
    InvalidResolution(f64),
}

/// Planning request errors.
///
/// A search that runs out of time is not an error: `make_plan` returns an
/// outcome with `solved == false`.
#[derive(Error, Debug)]
pub enum PlanError {
    #[error("Planner has not been initialized")]
    NotInitialized,

    #[error("Goal frame '{goal}' does not match environment frame '{expected}'")]
    FrameMismatch { goal: String, expected: String },

    #[error("Environment has a degenerate extent: {width} x {height} m")]
    DegenerateMap { width: f64, height: f64 },

    #[error("Goal pose is not free ({verdict:?})")]
    GoalNotFree { verdict: ValidityVerdict },

    #[error("Start pose is not free ({verdict:?})")]
    StartNotFree { verdict: ValidityVerdict },

    #[error("Start pose is outside the environment bounds")]
    StartOutOfBounds,

    #[error("Goal pose is outside the environment bounds")]
    GoalOutOfBounds,

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Densification failed: {0}")]
    Densify(#[from] DensifyError),

    #[error("Planner reported success without a solution path")]
    MissingSolution,
}

impl PlanError {
    /// Whether the error reflects a misconfiguration that no retry can fix.
    pub fn is_fatal(&self) -> bool {
        matches!(self, PlanError::Config(ConfigError::UnsupportedPlanner(_)))
    }
}

pub type Result<T> = std::result::Result<T, PlanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_unsupported_planner_is_fatal() {
        assert!(PlanError::Config(ConfigError::UnsupportedPlanner("Bogus".into())).is_fatal());
        assert!(!PlanError::Config(ConfigError::Invalid("x".into())).is_fatal());
        assert!(!PlanError::NotInitialized.is_fatal());
        assert!(!PlanError::Densify(DensifyError::TooShort(1)).is_fatal());
        assert!(!PlanError::MissingSolution.is_fatal());
    }

    #[test]
    fn test_messages() {
        let err = PlanError::FrameMismatch {
            goal: "odom".into(),
            expected: "map".into(),
        };
        assert_eq!(
            err.to_string(),
            "Goal frame 'odom' does not match environment frame 'map'"
        );
        let err = PlanError::GoalNotFree {
            verdict: ValidityVerdict::Occupied,
        };
        assert_eq!(err.to_string(), "Goal pose is not free (Occupied)");
    }
}
