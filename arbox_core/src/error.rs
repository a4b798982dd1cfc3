// arbox_core/src/error.rs

use thiserror::Error;

/// Rejected values in a `SpawnerConfig`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("spawn interval must be greater than zero")]
    ZeroInterval,
    #[error("spawn height must be finite, got {0}")]
    InvalidHeight(f32),
    #[error("horizontal extent must be finite and non-negative, got {0}")]
    InvalidExtent(f32),
}

/// Problems found while validating the scene's asset registrations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AssetError {
    #[error("invalid color '{0}', expected #RRGGBB")]
    InvalidColor(String),
    #[error("tracking target '{name}' must have a positive physical width, got {width}")]
    NonPositiveWidth { name: String, width: f32 },
    #[error("animation '{0}' has a zero duration")]
    ZeroDuration(String),
    #[error("material '{0}' is referenced by the scene layout but not registered")]
    UnknownMaterial(String),
    #[error("tracking target '{0}' is not registered")]
    UnknownTarget(String),
    #[error("animation '{0}' is not registered")]
    UnknownAnimation(String),
}

/// Layout values the host engine cannot turn into meshes or bodies.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LayoutError {
    #[error("{what} must be positive and finite, got {value}")]
    NonPositiveExtent { what: &'static str, value: f32 },
    #[error("{what} must have a positive mass, got {mass}")]
    NonPositiveMass { what: &'static str, mass: f32 },
}

/// Raised when a raw tracking-quality code from the runtime has no mapping.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TrackingError {
    #[error("unrecognized tracking state code {0}")]
    UnknownCode(i32),
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("interval period must be greater than zero")]
    ZeroPeriod,
}
