//! Geometry

use crate::math::*;

mod differentials;
mod point2;
mod vector3;

// Re-export
pub use differentials::*;
pub use point2::*;
pub use vector3::*;

/// Dot product of two vectors.
pub trait Dot<T> {
    /// Output type of the dot product.
    type Output;

    /// Returns the dot product.
    ///
    /// * `other` - The other vector.
    fn dot(&self, other: &T) -> Self::Output;

    /// Returns the absolute value of the dot product.
    ///
    /// * `other` - The other vector.
    fn abs_dot(&self, other: &T) -> Self::Output;
}
