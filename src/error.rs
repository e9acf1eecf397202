//! Error types for survey-boundary

use std::io;
use thiserror::Error;

/// Result type for survey-boundary operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while loading layers or running an analysis
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed JSON (layer file or configuration)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV export failure
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Reference layer could not be found or decoded
    #[error("Invalid layer '{name}': {reason}")]
    InvalidLayer { name: String, reason: String },

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Boundary polygon could not be built
    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),

    /// The analysis was cancelled by the caller
    #[error("Analysis cancelled")]
    Cancelled,
}

/// Failures of the polygon-building stage
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    /// Fewer than three distinct points were supplied
    #[error("Insufficient points: {distinct} distinct, at least 3 required")]
    InsufficientPoints { distinct: usize },

    /// The ring is invalid and the overlay repair produced no area
    #[error("Unrepairable geometry: repair produced an empty polygon")]
    UnrepairableGeometry,
}

impl Error {
    /// Builds an [`Error::InvalidLayer`] for the named layer
    pub fn invalid_layer(name: &str, reason: impl Into<String>) -> Self {
        Error::InvalidLayer {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Config("empty layer list".to_string());
        assert_eq!(err.to_string(), "Invalid configuration: empty layer list");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_invalid_layer() {
        let err = Error::invalid_layer("zone_inondable", "not a FeatureCollection");
        assert!(err.to_string().contains("zone_inondable"));
        assert!(err.to_string().contains("not a FeatureCollection"));
    }

    #[test]
    fn test_geometry_error_conversion() {
        let err: Error = GeometryError::InsufficientPoints { distinct: 2 }.into();
        assert!(matches!(
            err,
            Error::Geometry(GeometryError::InsufficientPoints { distinct: 2 })
        ));
        assert!(err.to_string().contains("2 distinct"));
    }
}
