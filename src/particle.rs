//! Verlet point masses with position-based dynamics.

use crate::error::ClothError;
use crate::float::Float;
use crate::vec::Vec;

/// A Verlet point mass: current, previous and rest position, no explicit velocity.
///
/// `rest` is the undeformed location. It is the additive base for
/// rest-relative offsets and is only changed by placement operations
/// ([`Particle::shift`]), never by integration.
#[derive(Clone, Debug)]
pub struct Particle<V: Vec> {
    pub pos: V,
    pub prev_pos: V,
    pub rest: V,
    pub acceleration: V,
    pub pinned: bool,
    mass: V::Scalar,
}

impl<V: Vec> Particle<V> {
    /// Create a free particle at rest at `pos`.
    pub fn new(pos: V, mass: V::Scalar) -> Result<Self, ClothError> {
        if !mass.is_finite() || mass <= V::Scalar::zero() {
            return Err(ClothError::InvalidMass);
        }
        Ok(Particle {
            pos,
            prev_pos: pos,
            rest: pos,
            acceleration: V::zero(),
            pinned: false,
            mass,
        })
    }

    pub fn mass(&self) -> V::Scalar {
        self.mass
    }

    /// Accumulate `force / mass` into this step's acceleration.
    ///
    /// Pinned particles ignore forces, so nothing is left over when they
    /// are later unpinned.
    pub fn add_force(&mut self, force: V) {
        if !self.pinned {
            self.acceleration = self.acceleration + force.unscale(self.mass);
        }
    }

    /// Damped Verlet step:
    /// `next = pos * (2 - damping) - prev * (1 - damping) + acc * dt²`.
    ///
    /// Takes the squared time step. Consumes and clears the accumulated
    /// acceleration.
    pub fn integrate(&mut self, dt_sq: V::Scalar, damping: V::Scalar) {
        if self.pinned {
            return;
        }
        let one = V::Scalar::one();
        let next = self.pos.scale(V::Scalar::two() - damping)
            - self.prev_pos.scale(one - damping)
            + self.acceleration.scale(dt_sq);
        self.prev_pos = self.pos;
        self.pos = next;
        self.acceleration = V::zero();
    }

    /// Implicit per-step velocity.
    pub fn velocity_raw(&self) -> V {
        self.pos - self.prev_pos
    }

    /// Offset of the current position from rest.
    pub fn displacement(&self) -> V {
        self.pos - self.rest
    }

    pub fn pin(&mut self) {
        self.pinned = true;
    }

    pub fn unpin(&mut self) {
        self.pinned = false;
    }

    /// Relocate a pinned particle, e.g. to follow an animated rod.
    ///
    /// Returns `false` and leaves the particle alone when it is free.
    pub fn override_position(&mut self, pos: V) -> bool {
        if !self.pinned {
            return false;
        }
        self.teleport(pos);
        true
    }

    /// Relocate a free particle under a pointer drag.
    ///
    /// Returns `false` and leaves the particle alone when it is pinned.
    pub fn drag_to(&mut self, pos: V) -> bool {
        if self.pinned {
            return false;
        }
        self.teleport(pos);
        true
    }

    /// Move current, previous and rest position together.
    pub fn shift(&mut self, offset: V) {
        self.pos = self.pos + offset;
        self.prev_pos = self.prev_pos + offset;
        self.rest = self.rest + offset;
    }

    // Setting both positions keeps the implicit velocity at zero.
    pub(crate) fn teleport(&mut self, pos: V) {
        self.pos = pos;
        self.prev_pos = pos;
    }
}
