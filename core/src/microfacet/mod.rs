//! Microfacet Distribution Models

use crate::geometry::*;
use crate::math::*;
use crate::reflection::abs_cos_theta;
use std::fmt::Debug;

mod trowbridge_reitz;

// Re-exports
pub use trowbridge_reitz::*;

/// Interface for microfacet distribution models. Directions are in the
/// shading frame.
pub trait MicrofacetDistribution: Debug + Send + Sync {
    /// Return the differential area of microfacets oriented with the surface
    /// normal `wh`.
    ///
    /// * `wh` - A microfacet normal.
    fn d(&self, wh: &Vector3f) -> Float;

    /// Returns the invisible masked microfacet area per visible microfacet area.
    ///
    /// * `w` - The direction.
    fn lambda(&self, w: &Vector3f) -> Float;

    /// Evaluates Smith's masking function which gives the fraction of
    /// microfacets that are visible from a given direction.
    ///
    /// * `w` - The direction.
    fn g1(&self, w: &Vector3f) -> Float {
        1.0 / (1.0 + self.lambda(w))
    }

    /// Returns the fraction of microfacets in a differential area that are
    /// visible from both directions.
    ///
    /// * `w0` - First direction.
    /// * `w1` - Second direction.
    fn g(&self, w0: &Vector3f, w1: &Vector3f) -> Float {
        1.0 / (1.0 + self.lambda(w0) + self.lambda(w1))
    }

    /// Samples a microfacet normal from the distribution of normals visible
    /// from `w`. The result lies on the same side as `w`.
    ///
    /// * `w` - The direction the surface is viewed from.
    /// * `u` - The 2D uniform random values.
    fn sample_wh(&self, w: &Vector3f, u: &Point2f) -> Vector3f;

    /// Returns the density of `sample_wh()` producing `wh` when viewed from
    /// `w`.
    ///
    /// * `w`  - The direction the surface is viewed from.
    /// * `wh` - A microfacet normal.
    fn pdf(&self, w: &Vector3f, wh: &Vector3f) -> Float {
        let cos = abs_cos_theta(w);
        if cos == 0.0 {
            0.0
        } else {
            self.d(wh) * self.g1(w) * w.abs_dot(wh) / cos
        }
    }
}
