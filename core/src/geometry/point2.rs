//! 2-D Points

use super::Float;
use std::ops::Index;

/// A 2-D point containing `Float` values. Used for pairs of sample values.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Point2f {
    /// X-coordinate.
    pub x: Float,

    /// Y-coordinate.
    pub y: Float,
}

impl Point2f {
    /// Creates a new 2-D point.
    ///
    /// * `x` - X-coordinate.
    /// * `y` - Y-coordinate.
    pub fn new(x: Float, y: Float) -> Self {
        Self { x, y }
    }

    /// Creates a new 2-D point at the origin.
    pub fn zero() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl Index<usize> for Point2f {
    type Output = Float;

    /// Index the point by 0 or 1.
    ///
    /// * `index` - The component index.
    fn index(&self, index: usize) -> &Self::Output {
        match index {
            0 => &self.x,
            1 => &self.y,
            _ => panic!("Invalid index for Point2f: {}", index),
        }
    }
}
