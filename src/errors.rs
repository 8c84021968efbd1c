//! Shared error types used across submodules.

use thiserror::Error;

/// Top-level error type for the crate.
#[derive(Debug, Error)]
pub enum CoilError {
    /// Raised when a material name is not present in the registry.
    #[error("unknown material: {0:?}")]
    UnknownMaterial(String),
    /// Raised when a caller-supplied configuration is internally inconsistent.
    #[error("configuration error: {0}")]
    InvalidConfig(String),
    /// Raised when the dispersion root-find fails to converge.
    #[error("solver convergence failure: {0}")]
    Convergence(String),
    /// Raised when a tuned parameter misses its target by more than the
    /// caller-allowed relative deviation.
    #[error("achieved error of {achieved_pct:.2} % exceeds allowed {allowed_pct:.2} %")]
    Tolerance {
        /// Relative deviation from the target after optimization, in percent.
        achieved_pct: f64,
        /// Maximum relative deviation the caller allowed, in percent.
        allowed_pct: f64,
    },
}
