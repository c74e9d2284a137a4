use std::{
    fmt::Debug,
    ops::{AddAssign, MulAssign},
};

pub mod state_array;

/// Trait representing an integrable state for use in ODE solvers.
///
/// Types implementing this trait must support in-place scaling and accumulation, cloning,
/// and formatting for debugging. The derivative of a state is represented by the same type.
pub trait Integrable: Clone + Debug + Default + MulAssign<f64> + for<'a> AddAssign<&'a Self> {
    /// Index of the first component that is NaN or infinite, if any.
    fn non_finite_index(&self) -> Option<usize>;

    fn is_finite(&self) -> bool {
        self.non_finite_index().is_none()
    }
}
