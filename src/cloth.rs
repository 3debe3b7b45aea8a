//! Cloth mesh: a Verlet particle grid with structural, shear, and bend constraints.

use crate::config::{self, ClothConfig};
use crate::constraint::{ConstraintKind, DistanceConstraint, Relaxation};
use crate::error::ClothError;
use crate::float::Float;
use crate::observer::StepObserver;
use crate::particle::Particle;
use crate::surface::Surface;
use crate::vec::{Vec, Vec3};
use alloc::vec::Vec as AllocVec;
use tracing::{debug, trace, warn};

/// A vertex position in the grid. Row 0 is the top edge.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct GridCoord {
    pub col: usize,
    pub row: usize,
}

impl GridCoord {
    pub fn new(col: usize, row: usize) -> Self {
        GridCoord { col, row }
    }
}

/// A hanging cloth sheet built from a grid of Verlet particles.
///
/// `cols x rows` cells give `(cols + 1) * (rows + 1)` particles stored
/// row-major: particle `(col, row)` has index `row * (cols + 1) + col`.
/// Constraints refer to particles by index only.
pub struct Cloth<F: Float> {
    particles: AllocVec<Particle<Vec3<F>>>,
    constraints: AllocVec<DistanceConstraint<Vec3<F>>>,
    config: ClothConfig<F>,
    degenerate: AllocVec<usize>,
}

impl<F: Float> Cloth<F> {
    /// Build particles and constraints for `config`.
    ///
    /// Particle `(col, row)` rests at
    /// `x = col / cols * width - width / 2`, `y = -(row / rows) * height`, `z = 0`.
    ///
    /// Constraints are created in a fixed order, which is also the order
    /// they are relaxed in:
    /// - Structural: per particle, right neighbour then lower neighbour
    /// - Shear: per quad, both diagonals
    /// - Bend: skip-one horizontal, then skip-one vertical, at half stiffness
    pub fn new(config: ClothConfig<F>) -> Result<Self, ClothError> {
        config.validate()?;
        let (cols, rows) = (config.cols, config.rows);
        let half_width = config.width / F::two();

        let mut particles = AllocVec::with_capacity((cols + 1) * (rows + 1));
        for row in 0..=rows {
            for col in 0..=cols {
                let x = F::from_usize(col) / F::from_usize(cols) * config.width - half_width;
                let y = -(F::from_usize(row) / F::from_usize(rows)) * config.height;
                particles.push(Particle::new(Vec3::new(x, y, F::zero()), config.mass)?);
            }
        }

        let mut cloth = Cloth {
            particles,
            constraints: AllocVec::new(),
            config,
            degenerate: AllocVec::new(),
        };
        cloth.build_constraints()?;

        debug!(
            cols,
            rows,
            particles = cloth.particles.len(),
            constraints = cloth.constraints.len(),
            "built cloth mesh"
        );
        Ok(cloth)
    }

    fn build_constraints(&mut self) -> Result<(), ClothError> {
        let (cols, rows) = (self.config.cols, self.config.rows);
        let stiffness = self.config.stiffness;
        let bend_stiffness = self.config.bend_stiffness();
        let stride = cols + 1;

        // Structural
        for row in 0..=rows {
            for col in 0..=cols {
                let a = row * stride + col;
                if col < cols {
                    self.link(a, a + 1, ConstraintKind::Structural, stiffness)?;
                }
                if row < rows {
                    self.link(a, a + stride, ConstraintKind::Structural, stiffness)?;
                }
            }
        }

        // Shear
        for row in 0..rows {
            for col in 0..cols {
                let tl = row * stride + col;
                let tr = tl + 1;
                let bl = tl + stride;
                let br = bl + 1;
                self.link(tl, br, ConstraintKind::Shear, stiffness)?;
                self.link(tr, bl, ConstraintKind::Shear, stiffness)?;
            }
        }

        // Bend: skip-one horizontal
        for row in 0..=rows {
            for col in 0..stride.saturating_sub(2) {
                let a = row * stride + col;
                self.link(a, a + 2, ConstraintKind::Bend, bend_stiffness)?;
            }
        }

        // Bend: skip-one vertical
        for row in 0..(rows + 1).saturating_sub(2) {
            for col in 0..=cols {
                let a = row * stride + col;
                self.link(a, a + 2 * stride, ConstraintKind::Bend, bend_stiffness)?;
            }
        }

        Ok(())
    }

    fn link(&mut self, a: usize, b: usize, kind: ConstraintKind, stiffness: F) -> Result<(), ClothError> {
        let constraint = DistanceConstraint::from_particles(a, b, &self.particles, kind, stiffness)?;
        self.constraints.push(constraint);
        Ok(())
    }

    /// Advance the sheet by `dt` seconds.
    ///
    /// Accumulates gravity and wind, integrates every particle with
    /// `dt * dt`, then runs the configured number of relaxation passes over
    /// all constraints in construction order. A negative or non-finite `dt`
    /// is rejected before any state changes.
    pub fn step<O: StepObserver>(&mut self, dt: F, observer: &mut O) -> Result<(), ClothError> {
        if !dt.is_finite() || dt < F::zero() {
            return Err(ClothError::InvalidTimeStep);
        }
        let dt_sq = dt * dt;
        self.degenerate.clear();
        let gravity = self.config.gravity;
        let wind = self.config.wind;

        for p in self.particles.iter_mut() {
            p.add_force(gravity.scale(p.mass()));
            p.add_force(wind);
        }
        observer.on_forces();

        for p in self.particles.iter_mut() {
            p.integrate(dt_sq, self.config.damping);
        }
        observer.on_integrate();

        for i in 0..self.config.iterations {
            for (index, c) in self.constraints.iter().enumerate() {
                if c.satisfy(&mut self.particles) == Relaxation::Degenerate {
                    if !self.degenerate.contains(&index) {
                        warn!(constraint = index, a = c.a, b = c.b, "skipping constraint with coincident endpoints");
                        self.degenerate.push(index);
                    }
                    observer.on_degenerate_constraint(index);
                }
            }
            observer.on_relaxation_iteration(i);
        }

        observer.on_step_complete();
        trace!(?dt, "cloth step complete");
        Ok(())
    }

    /// Add a one-shot force (a gust) to every free particle for the next step.
    pub fn apply_force(&mut self, force: Vec3<F>) {
        for p in self.particles.iter_mut() {
            p.add_force(force);
        }
    }

    /// Change structural and shear stiffness; bending follows at half.
    pub fn set_stiffness(&mut self, stiffness: F) -> Result<(), ClothError> {
        config::validate_stiffness(stiffness)?;
        self.config.stiffness = stiffness;
        let bend_stiffness = self.config.bend_stiffness();
        for c in self.constraints.iter_mut() {
            c.stiffness = match c.kind {
                ConstraintKind::Bend => bend_stiffness,
                ConstraintKind::Structural | ConstraintKind::Shear => stiffness,
            };
        }
        Ok(())
    }

    pub fn set_damping(&mut self, damping: F) -> Result<(), ClothError> {
        config::validate_damping(damping)?;
        self.config.damping = damping;
        Ok(())
    }

    // ---- pinning ----

    pub fn pin(&mut self, col: usize, row: usize) -> Result<(), ClothError> {
        let idx = self.checked_index(col, row)?;
        self.particles[idx].pin();
        Ok(())
    }

    pub fn unpin(&mut self, col: usize, row: usize) -> Result<(), ClothError> {
        let idx = self.checked_index(col, row)?;
        self.particles[idx].unpin();
        Ok(())
    }

    /// Pin every particle in `row`, e.g. the top edge hanging from a rod.
    pub fn pin_row(&mut self, row: usize) -> Result<(), ClothError> {
        if row > self.config.rows {
            return Err(ClothError::RowOutOfBounds { row, rows: self.config.rows + 1 });
        }
        let stride = self.stride();
        for p in self.particles[row * stride..(row + 1) * stride].iter_mut() {
            p.pin();
        }
        Ok(())
    }

    pub fn pin_top_row(&mut self) {
        let stride = self.stride();
        for p in self.particles[..stride].iter_mut() {
            p.pin();
        }
    }

    /// Relocate a pinned particle. Returns `Ok(false)` for a free one.
    pub fn override_position(&mut self, col: usize, row: usize, pos: Vec3<F>) -> Result<bool, ClothError> {
        let idx = self.checked_index(col, row)?;
        Ok(self.particles[idx].override_position(pos))
    }

    /// Relocate a free particle under a drag. Returns `Ok(false)` for a pinned one.
    pub fn drag_particle(&mut self, col: usize, row: usize, pos: Vec3<F>) -> Result<bool, ClothError> {
        let idx = self.checked_index(col, row)?;
        Ok(self.particles[idx].drag_to(pos))
    }

    // ---- placement and rest-relative driving ----

    /// Move the whole sheet, rest positions included.
    pub fn translate(&mut self, offset: Vec3<F>) {
        for p in self.particles.iter_mut() {
            p.shift(offset);
        }
    }

    /// Displace columns along z by `sin(col * 2π / fold_width) * depth`.
    ///
    /// Rest positions follow, constraint rest lengths do not: they stay as
    /// measured on the flat sheet, so relaxation pulls the pleats flatter.
    pub fn apply_pleats(&mut self, depth: F, fold_width: F) -> Result<(), ClothError> {
        if !depth.is_finite() || !fold_width.is_finite() || fold_width.is_near_zero(F::from_f32(1e-10)) {
            return Err(ClothError::InvalidExtent);
        }
        let frequency = F::two() * F::pi() / fold_width;
        let stride = self.stride();
        for (idx, p) in self.particles.iter_mut().enumerate() {
            let col = F::from_usize(idx % stride);
            let dz = (col * frequency).sin() * depth;
            p.shift(Vec3::new(F::zero(), F::zero(), dz));
        }
        Ok(())
    }

    /// Place every particle, pinned or not, at `rest + offset(coord, rest)`.
    ///
    /// Position and previous position are both set, so the move carries
    /// no velocity into the next step.
    pub fn drive_from_rest<D>(&mut self, mut offset: D)
    where
        D: FnMut(GridCoord, Vec3<F>) -> Vec3<F>,
    {
        let stride = self.stride();
        for (idx, p) in self.particles.iter_mut().enumerate() {
            let coord = GridCoord::new(idx % stride, idx / stride);
            let target = p.rest + offset(coord, p.rest);
            p.teleport(target);
        }
    }

    /// Set only the x of every particle, pinned or not, to
    /// `rest.x + offset(coord)`.
    ///
    /// y and z stay with the simulation, so sag, wind and drags survive
    /// the drive. `pos.x` and `prev_pos.x` are both written.
    pub fn drive_x_from_rest<D>(&mut self, mut offset: D)
    where
        D: FnMut(GridCoord) -> F,
    {
        let stride = self.stride();
        for (idx, p) in self.particles.iter_mut().enumerate() {
            let x = p.rest.x + offset(GridCoord::new(idx % stride, idx / stride));
            p.pos.x = x;
            p.prev_pos.x = x;
        }
    }

    // ---- queries ----

    /// Grid coordinate of the particle closest to `point`. Ties go to the
    /// first particle in row-major order.
    pub fn nearest_particle(&self, point: Vec3<F>) -> GridCoord {
        let mut best = 0;
        let mut best_dist = self.particles[0].pos.distance_sq(point);
        for (idx, p) in self.particles.iter().enumerate().skip(1) {
            let d = p.pos.distance_sq(point);
            if d < best_dist {
                best = idx;
                best_dist = d;
            }
        }
        self.coord(best)
    }

    pub fn particle_at(&self, col: usize, row: usize) -> Option<&Particle<Vec3<F>>> {
        self.index(col, row).map(|idx| &self.particles[idx])
    }

    pub fn particle_at_mut(&mut self, col: usize, row: usize) -> Option<&mut Particle<Vec3<F>>> {
        let idx = self.index(col, row)?;
        Some(&mut self.particles[idx])
    }

    pub fn position_at(&self, col: usize, row: usize) -> Option<Vec3<F>> {
        self.particle_at(col, row).map(|p| p.pos)
    }

    /// Flat index of `(col, row)`, or `None` outside the grid.
    pub fn index(&self, col: usize, row: usize) -> Option<usize> {
        (col <= self.config.cols && row <= self.config.rows).then(|| row * self.stride() + col)
    }

    pub fn coord(&self, index: usize) -> GridCoord {
        GridCoord::new(index % self.stride(), index / self.stride())
    }

    fn checked_index(&self, col: usize, row: usize) -> Result<usize, ClothError> {
        self.index(col, row).ok_or(ClothError::ParticleOutOfBounds {
            col,
            row,
            cols: self.config.cols + 1,
            rows: self.config.rows + 1,
        })
    }

    fn stride(&self) -> usize {
        self.config.cols + 1
    }

    // ---- rendering ----

    /// Build the render buffers from current positions.
    pub fn export_surface(&self) -> Surface<F> {
        Surface::build(self.config.cols, self.config.rows, self.particles.iter().map(|p| p.pos))
    }

    /// Rewrite the position channel of `surface` in place and recompute normals.
    pub fn refresh_surface(&self, surface: &mut Surface<F>) -> Result<(), ClothError> {
        if surface.vertex_count() != self.particles.len() {
            return Err(ClothError::SurfaceMismatch {
                expected: self.particles.len(),
                found: surface.vertex_count(),
            });
        }
        surface.write_positions(self.particles.iter().map(|p| p.pos));
        Ok(())
    }

    pub fn positions(&self) -> AllocVec<Vec3<F>> {
        self.particles.iter().map(|p| p.pos).collect()
    }

    pub fn particles(&self) -> &[Particle<Vec3<F>>] { &self.particles }
    pub fn constraints(&self) -> &[DistanceConstraint<Vec3<F>>] { &self.constraints }
    pub fn config(&self) -> &ClothConfig<F> { &self.config }
    pub fn cols(&self) -> usize { self.config.cols }
    pub fn rows(&self) -> usize { self.config.rows }
    pub fn particle_count(&self) -> usize { self.particles.len() }
    pub fn constraint_count(&self) -> usize { self.constraints.len() }

    /// Constraints skipped as coincident during the last step, each listed once.
    pub fn degenerate_constraints(&self) -> &[usize] { &self.degenerate }

    pub fn count_of(&self, kind: ConstraintKind) -> usize {
        self.constraints.iter().filter(|c| c.kind == kind).count()
    }
}
