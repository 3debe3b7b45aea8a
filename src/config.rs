//! Cloth configuration: resolution, extents and material tuning.

use crate::error::ClothError;
use crate::float::Float;
use crate::vec::{Vec, Vec3};

/// Relaxation passes per step unless overridden.
pub const DEFAULT_ITERATIONS: usize = 10;

/// Everything needed to build a [`Cloth`](crate::cloth::Cloth).
///
/// `cols` and `rows` count grid cells, so the mesh holds
/// `(cols + 1) * (rows + 1)` particles. Only `stiffness` and `damping` may
/// change after construction, through the cloth's setters.
///
/// # Builder Pattern
/// ```
/// use drape::config::ClothConfig;
/// use drape::vec::Vec3;
///
/// let config: ClothConfig<f32> = ClothConfig::new(20, 40, 4.0, 8.0)
///     .with_mass(0.1)
///     .with_stiffness(0.8)
///     .with_damping(0.08)
///     .with_gravity(Vec3::new(0.0, -2.0, 0.0));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug)]
pub struct ClothConfig<F: Float> {
    /// Cells along x. Default from `new`.
    pub cols: usize,
    /// Cells along y (downward). Default from `new`.
    pub rows: usize,
    /// Span along x, centred on the origin.
    pub width: F,
    /// Span along y, hanging down from y = 0.
    pub height: F,
    /// Per-particle mass. Default: 0.1.
    pub mass: F,
    /// Structural and shear stiffness in [0, 1]. Bending uses half. Default: 0.01.
    pub stiffness: F,
    /// Verlet damping in [0, 1). Default: 0.08.
    pub damping: F,
    /// Acceleration applied every step. Default: (0, -2, 0).
    ///
    /// The direction is an art-direction choice and may point anywhere.
    pub gravity: Vec3<F>,
    /// Force applied to every free particle each step. Default: zero.
    pub wind: Vec3<F>,
    /// Relaxation passes per step. Default: 10.
    pub iterations: usize,
}

impl<F: Float> ClothConfig<F> {
    /// Create a config with default material values.
    pub fn new(cols: usize, rows: usize, width: F, height: F) -> Self {
        ClothConfig {
            cols,
            rows,
            width,
            height,
            mass: F::from_f32(0.1),
            stiffness: F::from_f32(0.01),
            damping: F::from_f32(0.08),
            gravity: Vec3::new(F::zero(), F::from_f32(-2.0), F::zero()),
            wind: Vec3::zero(),
            iterations: DEFAULT_ITERATIONS,
        }
    }

    pub fn with_mass(mut self, mass: F) -> Self {
        self.mass = mass;
        self
    }

    pub fn with_stiffness(mut self, stiffness: F) -> Self {
        self.stiffness = stiffness;
        self
    }

    pub fn with_damping(mut self, damping: F) -> Self {
        self.damping = damping;
        self
    }

    pub fn with_gravity(mut self, gravity: Vec3<F>) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_wind(mut self, wind: Vec3<F>) -> Self {
        self.wind = wind;
        self
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Stiffness given to bending constraints.
    pub fn bend_stiffness(&self) -> F {
        self.stiffness * F::half()
    }

    /// Reject configurations that would build a broken mesh or diverge.
    pub fn validate(&self) -> Result<(), ClothError> {
        if self.cols == 0 || self.rows == 0 {
            return Err(ClothError::InvalidGridDimensions);
        }
        // Surface indices are u32.
        let vertices = self.cols.checked_add(1)
            .zip(self.rows.checked_add(1))
            .and_then(|(c, r)| c.checked_mul(r));
        match vertices {
            Some(n) if n <= u32::MAX as usize => {}
            _ => return Err(ClothError::InvalidGridDimensions),
        }
        if !is_positive(self.width) || !is_positive(self.height) {
            return Err(ClothError::InvalidExtent);
        }
        if !is_positive(self.mass) {
            return Err(ClothError::InvalidMass);
        }
        validate_stiffness(self.stiffness)?;
        validate_damping(self.damping)?;
        if !self.gravity.is_finite() || !self.wind.is_finite() {
            return Err(ClothError::InvalidForce);
        }
        if self.iterations == 0 {
            return Err(ClothError::InvalidIterations);
        }
        Ok(())
    }
}

pub(crate) fn validate_stiffness<F: Float>(stiffness: F) -> Result<(), ClothError> {
    if stiffness.is_finite() && stiffness >= F::zero() && stiffness <= F::one() {
        Ok(())
    } else {
        Err(ClothError::InvalidStiffness)
    }
}

pub(crate) fn validate_damping<F: Float>(damping: F) -> Result<(), ClothError> {
    if damping.is_finite() && damping >= F::zero() && damping < F::one() {
        Ok(())
    } else {
        Err(ClothError::InvalidDamping)
    }
}

fn is_positive<F: Float>(v: F) -> bool {
    v.is_finite() && v > F::zero()
}
