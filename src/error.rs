//! Central error handling for the atlas
//!
//! Provides a unified AtlasError enum covering feature normalization,
//! surface lifecycle and configuration failures.

use crate::config::ConfigError;

/// Centralized error type for all atlas operations
#[derive(thiserror::Error, Debug)]
pub enum AtlasError {
    /// Raw record without a usable coordinate pair. Excluded, never fatal.
    #[error("Invalid feature '{id}': {reason}")]
    InvalidFeature { id: String, reason: String },

    /// A layer id was mounted twice. The surface resolves it by remove-then-add.
    #[error("Duplicate layer id: {0}")]
    DuplicateLayerId(String),

    /// Surface operation issued before the map signalled ready, or after destroy.
    #[error("Map surface not ready: {0}")]
    SurfaceNotReady(String),

    /// Mount-time fatal condition.
    #[error("Map container unavailable: {0}")]
    ContainerUnavailable(String),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AtlasError {
    /// Short category prefix used in log lines
    pub fn category(&self) -> &'static str {
        match self {
            AtlasError::InvalidFeature { .. } => "InvalidFeature",
            AtlasError::DuplicateLayerId(_) => "DuplicateLayerId",
            AtlasError::SurfaceNotReady(_) => "SurfaceNotReady",
            AtlasError::ContainerUnavailable(_) => "ContainerUnavailable",
            AtlasError::Config(_) => "Config",
            AtlasError::Io(_) => "IO",
            AtlasError::Json(_) => "JSON",
        }
    }

    /// Convenience constructors for common error types
    pub fn invalid_feature<I: ToString, R: ToString>(id: I, reason: R) -> Self {
        AtlasError::InvalidFeature {
            id: id.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn not_ready<T: ToString>(msg: T) -> Self {
        AtlasError::SurfaceNotReady(msg.to_string())
    }

    pub fn container_unavailable<T: ToString>(msg: T) -> Self {
        AtlasError::ContainerUnavailable(msg.to_string())
    }
}

/// Result type alias for atlas operations
pub type AtlasResult<T> = Result<T, AtlasError>;
