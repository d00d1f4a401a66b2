//! Ray Differentials

use super::Vector3f;

/// Directions of the two auxiliary rays offset by one pixel in x and y that
/// travel alongside a main ray. Expressed in the same local frame as the main
/// direction.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Differentials {
    /// Direction of the ray offset in x.
    pub dx: Vector3f,

    /// Direction of the ray offset in y.
    pub dy: Vector3f,
}

impl Differentials {
    /// Create a new `Differentials`.
    ///
    /// * `dx` - Direction of the ray offset in x.
    /// * `dy` - Direction of the ray offset in y.
    pub fn new(dx: Vector3f, dy: Vector3f) -> Self {
        Self { dx, dy }
    }

    /// Applies `f` to both directions, returning `None` if either fails.
    ///
    /// * `f` - The direction transform.
    pub fn try_map<F>(&self, f: F) -> Option<Self>
    where
        F: Fn(&Vector3f) -> Option<Vector3f>,
    {
        Some(Self::new(f(&self.dx)?, f(&self.dy)?))
    }

    /// Applies `f` to both directions.
    ///
    /// * `f` - The direction transform.
    pub fn map<F>(&self, f: F) -> Self
    where
        F: Fn(&Vector3f) -> Vector3f,
    {
        Self::new(f(&self.dx), f(&self.dy))
    }
}
