//! Pairwise distance constraints relaxed by Gauss-Seidel iteration.

use crate::error::ClothError;
use crate::float::Float;
use crate::particle::Particle;
use crate::vec::Vec;

/// Topological family a constraint belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ConstraintKind {
    /// Horizontal and vertical neighbours; resists stretch.
    Structural,
    /// Quad diagonals; resists skew.
    Shear,
    /// Skip-one neighbours at half stiffness; resists sharp folds.
    Bend,
}

/// Outcome of one [`DistanceConstraint::satisfy`] call.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Relaxation {
    Applied,
    /// Endpoints coincide; no direction to correct along.
    Degenerate,
}

/// Keeps two particles, addressed by index, at their construction-time distance.
#[derive(Clone, Debug)]
pub struct DistanceConstraint<V: Vec> {
    pub a: usize,
    pub b: usize,
    pub kind: ConstraintKind,
    pub stiffness: V::Scalar,
    rest_length: V::Scalar,
}

impl<V: Vec> DistanceConstraint<V> {
    /// Capture the current distance between `a` and `b` as the rest length.
    pub fn from_particles(
        a: usize,
        b: usize,
        particles: &[Particle<V>],
        kind: ConstraintKind,
        stiffness: V::Scalar,
    ) -> Result<Self, ClothError> {
        let rest_length = particles[a].pos.distance(particles[b].pos);
        if rest_length.is_near_zero(V::Scalar::from_f32(1e-10)) {
            return Err(ClothError::DegenerateConstraint { a, b });
        }
        Ok(DistanceConstraint { a, b, kind, stiffness, rest_length })
    }

    pub fn rest_length(&self) -> V::Scalar {
        self.rest_length
    }

    /// One relaxation pass over this pair.
    ///
    /// Each free endpoint moves by half the stiffness-scaled error; a
    /// pinned endpoint stays put and its half of the correction is dropped.
    pub fn satisfy(&self, particles: &mut [Particle<V>]) -> Relaxation {
        let delta = particles[self.b].pos - particles[self.a].pos;
        let distance = delta.length();
        if distance.is_near_zero(V::Scalar::from_f32(1e-10)) {
            return Relaxation::Degenerate;
        }

        let correction = (self.rest_length - distance) / distance;
        let translation = delta.scale(correction * self.stiffness * V::Scalar::half());

        if !particles[self.a].pinned {
            particles[self.a].pos = particles[self.a].pos - translation;
        }
        if !particles[self.b].pinned {
            particles[self.b].pos = particles[self.b].pos + translation;
        }
        Relaxation::Applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec::Vec3;
    use alloc::vec;

    fn pair(ax: f64, bx: f64) -> alloc::vec::Vec<Particle<Vec3<f64>>> {
        vec![
            Particle::new(Vec3::new(ax, 0.0, 0.0), 1.0).unwrap(),
            Particle::new(Vec3::new(bx, 0.0, 0.0), 1.0).unwrap(),
        ]
    }

    #[test]
    fn rest_length_is_measured() {
        let particles = pair(0.0, 3.0);
        let c = DistanceConstraint::from_particles(0, 1, &particles, ConstraintKind::Structural, 1.0).unwrap();
        assert_eq!(c.rest_length(), 3.0);
    }

    #[test]
    fn coincident_endpoints_rejected() {
        let particles = pair(1.0, 1.0);
        let err = DistanceConstraint::from_particles(0, 1, &particles, ConstraintKind::Shear, 1.0).unwrap_err();
        assert_eq!(err, ClothError::DegenerateConstraint { a: 0, b: 1 });
    }

    #[test]
    fn single_pass_halves_error_at_full_stiffness() {
        let mut particles = pair(0.0, 1.0);
        let c = DistanceConstraint::from_particles(0, 1, &particles, ConstraintKind::Structural, 1.0).unwrap();
        particles[1].pos = Vec3::new(2.0, 0.0, 0.0);

        assert_eq!(c.satisfy(&mut particles), Relaxation::Applied);
        // translation = 2 * (-1/2) * 0.5 = -0.5 along x
        assert!((particles[0].pos.x - 0.5).abs() < 1e-12);
        assert!((particles[1].pos.x - 1.5).abs() < 1e-12);
    }

    #[test]
    fn stiffness_scales_correction() {
        let mut particles = pair(0.0, 1.0);
        let c = DistanceConstraint::from_particles(0, 1, &particles, ConstraintKind::Bend, 0.5).unwrap();
        particles[1].pos = Vec3::new(3.0, 0.0, 0.0);
        c.satisfy(&mut particles);
        // translation = 3 * (-2/3) * 0.5 * 0.5 = -0.5
        assert!((particles[0].pos.x - 0.5).abs() < 1e-12);
        assert!((particles[1].pos.x - 2.5).abs() < 1e-12);
    }

    #[test]
    fn collapsed_pair_is_skipped() {
        let mut particles = pair(0.0, 1.0);
        let c = DistanceConstraint::from_particles(0, 1, &particles, ConstraintKind::Structural, 1.0).unwrap();
        particles[1].pos = particles[0].pos;
        assert_eq!(c.satisfy(&mut particles), Relaxation::Degenerate);
        assert_eq!(particles[0].pos, Vec3::zero());
        assert_eq!(particles[1].pos, Vec3::zero());
    }
}
