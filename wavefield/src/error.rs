//! Error types for field construction and configuration.

use bevy::math::{IVec3, Vec3};

/// Errors raised while validating grid or wave configuration.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum FieldError {
    /// Every grid axis must have at least one voxel.
    #[error("grid size must be positive on every axis, got {0:?}")]
    InvalidGridSize(IVec3),

    /// The world volume must have positive extent on every axis.
    #[error("world size must be positive on every axis, got {0:?}")]
    InvalidWorldSize(Vec3),

    /// Wave propagation speed must be positive.
    #[error("wave speed must be positive, got {0}")]
    InvalidWaveSpeed(f32),

    /// Wavelength must be positive.
    #[error("wavelength must be positive, got {0}")]
    InvalidWavelength(f32),
}
