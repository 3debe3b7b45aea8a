//! Step observer trait for monitoring cloth simulation progress.

/// Trait for observing cloth simulation steps.
///
/// Implement this to count relaxation passes, flag degenerate constraints
/// or time phases of a step. All methods have default no-op implementations.
pub trait StepObserver {
    /// Called after gravity and wind have been accumulated on every particle.
    fn on_forces(&mut self) {}

    /// Called after all particles have been integrated (Verlet step).
    fn on_integrate(&mut self) {}

    /// Called when a constraint is skipped because its endpoints coincide.
    fn on_degenerate_constraint(&mut self, _index: usize) {}

    /// Called after each relaxation pass over the full constraint list.
    fn on_relaxation_iteration(&mut self, _iteration: usize) {}

    /// Called when a simulation step is fully complete.
    fn on_step_complete(&mut self) {}
}

/// A no-op observer that does nothing. Use as default when no observation needed.
pub struct NoOpStepObserver;

impl StepObserver for NoOpStepObserver {}
