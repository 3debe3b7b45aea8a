//! Error types for cloth construction and simulation calls.

use thiserror::Error;

/// Errors rejected at the engine boundary.
///
/// Queries never produce these; out-of-range lookups return `None`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClothError {
    /// Mass must be positive and finite.
    #[error("mass must be positive and finite")]
    InvalidMass,
    /// Stiffness must be in [0, 1].
    #[error("stiffness must be in [0, 1]")]
    InvalidStiffness,
    /// Damping must be in [0, 1).
    #[error("damping must be in [0, 1)")]
    InvalidDamping,
    /// Grid must have at least one segment along each axis.
    #[error("grid must have at least one row and one column of cells")]
    InvalidGridDimensions,
    /// Width and height must be positive and finite.
    #[error("cloth extents must be positive and finite")]
    InvalidExtent,
    /// Gravity and wind must be finite.
    #[error("external force vectors must be finite")]
    InvalidForce,
    /// At least one relaxation pass is required per step.
    #[error("relaxation iterations must be at least 1")]
    InvalidIterations,
    /// Time delta must be finite and non-negative.
    #[error("time step must be finite and non-negative")]
    InvalidTimeStep,
    /// Grid coordinate is out of bounds.
    #[error("particle ({col}, {row}) out of bounds (grid: {cols}x{rows} vertices)")]
    ParticleOutOfBounds { col: usize, row: usize, cols: usize, rows: usize },
    /// Row index is out of bounds.
    #[error("row {row} out of bounds (rows: {rows})")]
    RowOutOfBounds { row: usize, rows: usize },
    /// Two constraint endpoints coincide at construction.
    #[error("constraint between particles {a} and {b} has zero rest length")]
    DegenerateConstraint { a: usize, b: usize },
    /// Surface buffer was exported from a grid of a different size.
    #[error("surface holds {found} vertices, cloth has {expected}")]
    SurfaceMismatch { expected: usize, found: usize },
}
