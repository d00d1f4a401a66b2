//! Sampling

use crate::geometry::*;
use crate::math::*;

/// Uniformly sample a point on the unit disk using Shirley's concentric
/// mapping, which keeps strata adjacent and distortion low.
///
/// * `u` - The random sample point in `[0, 1)^2`.
pub fn concentric_sample_disk(u: &Point2f) -> Point2f {
    // Map uniform random numbers to [-1,1]^2.
    let ox = 2.0 * u.x - 1.0;
    let oy = 2.0 * u.y - 1.0;

    // Handle degeneracy at the origin.
    if ox == 0.0 && oy == 0.0 {
        return Point2f::zero();
    }

    let (r, theta) = if abs(ox) > abs(oy) {
        (ox, PI_OVER_FOUR * (oy / ox))
    } else {
        (oy, PI_OVER_TWO - PI_OVER_FOUR * (ox / oy))
    };

    Point2f::new(r * theta.cos(), r * theta.sin())
}

/// Cosine-weighted sample of a direction on the `+z` hemisphere using Malley's
/// method.
///
/// * `u` - The random sample point in `[0, 1)^2`.
pub fn cosine_sample_hemisphere(u: &Point2f) -> Vector3f {
    let d = concentric_sample_disk(u);
    let z = max(0.0, 1.0 - d.x * d.x - d.y * d.y).sqrt();
    Vector3f::new(d.x, d.y, z)
}

/// Returns the PDF for cosine-weighted sampling of a hemisphere direction.
///
/// * `cos_theta` - Cosine of the angle with the hemisphere axis.
#[inline]
pub fn cosine_hemisphere_pdf(cos_theta: Float) -> Float {
    abs(cos_theta) * INV_PI
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
