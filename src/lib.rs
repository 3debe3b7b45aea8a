//! Verlet cloth simulation for curtain-like panels.
//!
//! `drape` simulates a rectangular sheet as a grid of point masses held
//! together by distance constraints, and exports it as an indexed triangle
//! surface for rendering. It is tuned for visual plausibility at interactive
//! frame rates, not physical units.
//!
//! # Features
//!
//! - **Damped Verlet integration**: position-based dynamics with implicit velocity
//! - **Constraint relaxation**: structural, shear and bending distance constraints,
//!   relaxed in a fixed Gauss-Seidel order
//! - **Pinning and dragging**: fix rows to a rod, relocate pinned or grabbed points
//! - **Rest-relative driving**: slide, pleat and wave the sheet around its rest shape
//! - **Render surface**: row-major positions, uvs, normals and a static index buffer
//! - **Observable**: monitor physics steps via the `StepObserver` trait
//! - **`no_std` compatible**: works in embedded and WASM environments
//!
//! ```
//! use drape::{Cloth, ClothConfig, NoOpStepObserver, Vec3};
//!
//! let config = ClothConfig::new(8, 16, 2.0, 4.0).with_gravity(Vec3::new(0.0, -9.8, 0.0));
//! let mut cloth = Cloth::<f32>::new(config)?;
//! cloth.pin_top_row();
//!
//! let mut surface = cloth.export_surface();
//! cloth.step(1.0 / 60.0, &mut NoOpStepObserver)?;
//! cloth.refresh_surface(&mut surface)?;
//! assert_eq!(surface.revision(), 1);
//! # Ok::<(), drape::ClothError>(())
//! ```

#![no_std]

extern crate alloc;

pub mod float;
pub mod vec;
pub mod particle;
pub mod constraint;
pub mod config;
pub mod cloth;
pub mod surface;
pub mod observer;
pub mod error;

// Re-export primary API
pub use float::Float;
pub use vec::{Vec, Vec3};
pub use particle::Particle;
pub use constraint::{ConstraintKind, DistanceConstraint, Relaxation};
pub use config::{ClothConfig, DEFAULT_ITERATIONS};
pub use cloth::{Cloth, GridCoord};
pub use surface::{grid_indices, Surface};
pub use observer::{StepObserver, NoOpStepObserver};
pub use error::ClothError;
