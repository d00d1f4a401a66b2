//! Trowbridge-Reitz Distribution

use super::MicrofacetDistribution;
use crate::geometry::*;
use crate::math::*;
use crate::reflection::*;

/// Smallest alpha a distribution is built with. Smoother surfaces should use
/// a specular model.
pub const MIN_ALPHA: Float = 0.001;

/// Anisotropic Trowbridge-Reitz (GGX) distribution.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TrowbridgeReitzDistribution {
    /// Roughness for microfacets oriented perpendicular to the x-axis, where
    /// α = sqrt(2) * σ and σ is the RMS slope.
    alpha_x: Float,

    /// Roughness for microfacets oriented perpendicular to the y-axis.
    alpha_y: Float,
}

impl TrowbridgeReitzDistribution {
    /// Create a new `TrowbridgeReitzDistribution`. Alpha values are floored at
    /// `MIN_ALPHA`.
    ///
    /// * `alpha_x` - Roughness along x.
    /// * `alpha_y` - Roughness along y.
    pub fn new(alpha_x: Float, alpha_y: Float) -> Self {
        Self {
            alpha_x: max(MIN_ALPHA, alpha_x),
            alpha_y: max(MIN_ALPHA, alpha_y),
        }
    }

    /// Returns the roughness along x.
    pub fn alpha_x(&self) -> Float {
        self.alpha_x
    }

    /// Returns the roughness along y.
    pub fn alpha_y(&self) -> Float {
        self.alpha_y
    }

    /// Maps a perceptual roughness in [0, 1] to alpha, where values close to 0
    /// are near-perfect specular reflection.
    ///
    /// * `roughness` - Roughness parameter value.
    pub fn roughness_to_alpha(roughness: Float) -> Float {
        let roughness = max(roughness, 1e-3);
        let x = roughness.ln();
        1.62142 + 0.819955 * x + 0.1734 * x * x + 0.0171201 * x * x * x + 0.000640711 * x * x * x * x
    }
}

impl MicrofacetDistribution for TrowbridgeReitzDistribution {
    fn d(&self, wh: &Vector3f) -> Float {
        let tan2_theta = tan_2_theta(wh);
        if !tan2_theta.is_finite() {
            return 0.0;
        }

        let cos4_theta = cos_2_theta(wh) * cos_2_theta(wh);
        let e = (cos_2_phi(wh) / (self.alpha_x * self.alpha_x)
            + sin_2_phi(wh) / (self.alpha_y * self.alpha_y))
            * tan2_theta;
        1.0 / (PI * self.alpha_x * self.alpha_y * cos4_theta * (1.0 + e) * (1.0 + e))
    }

    fn lambda(&self, w: &Vector3f) -> Float {
        let abs_tan_theta = abs(tan_theta(w));
        if !abs_tan_theta.is_finite() {
            return 0.0;
        }

        let alpha = (cos_2_phi(w) * self.alpha_x * self.alpha_x
            + sin_2_phi(w) * self.alpha_y * self.alpha_y)
            .sqrt();
        let alpha2_tan2_theta = (alpha * abs_tan_theta) * (alpha * abs_tan_theta);
        (-1.0 + (1.0 + alpha2_tan2_theta).sqrt()) / 2.0
    }

    fn sample_wh(&self, w: &Vector3f, u: &Point2f) -> Vector3f {
        let flip = w.z < 0.0;
        let w = if flip { -(*w) } else { *w };
        let wh = sample_visible(&w, self.alpha_x, self.alpha_y, u.x, u.y);
        if flip {
            -wh
        } else {
            wh
        }
    }
}

/// Samples the slopes of the visible normals of the unit-roughness
/// distribution viewed at `cos_theta`.
///
/// * `cos_theta` - Cosine of the view direction with the normal.
/// * `u1`        - Uniform sample value.
/// * `u2`        - Uniform sample value.
fn sample_slopes(cos_theta: Float, u1: Float, u2: Float) -> (Float, Float) {
    // Normal incidence.
    if cos_theta > 0.9999 {
        let r = (u1 / (1.0 - u1)).sqrt();
        let phi = TWO_PI * u2;
        return (r * phi.cos(), r * phi.sin());
    }

    let sin_theta = max(0.0, 1.0 - cos_theta * cos_theta).sqrt();
    let tan_theta = sin_theta / cos_theta;
    let a = 1.0 / tan_theta;
    let g1 = 2.0 / (1.0 + (1.0 + 1.0 / (a * a)).sqrt());

    // Slope along x.
    let a = 2.0 * u1 / g1 - 1.0;
    let tmp = min(1.0 / (a * a - 1.0), 1e10);
    let b = tan_theta;
    let d = max(b * b * tmp * tmp - (a * a - b * b) * tmp, 0.0).sqrt();
    let slope_x_1 = b * tmp - d;
    let slope_x_2 = b * tmp + d;
    let slope_x = if a < 0.0 || slope_x_2 > 1.0 / tan_theta {
        slope_x_1
    } else {
        slope_x_2
    };

    // Slope along y.
    let (s, u2) = if u2 > 0.5 {
        (1.0, 2.0 * (u2 - 0.5))
    } else {
        (-1.0, 2.0 * (0.5 - u2))
    };
    let z = (u2 * (u2 * (u2 * 0.27385 - 0.73369) + 0.46341))
        / (u2 * (u2 * (u2 * 0.093073 + 0.309420) - 1.000000) + 0.597999);
    let slope_y = s * z * (1.0 + slope_x * slope_x).sqrt();

    debug_assert!(slope_y.is_finite());
    (slope_x, slope_y)
}

/// Samples a visible microfacet normal: stretch the view direction to unit
/// roughness, sample slopes there, rotate back to the view azimuth and
/// unstretch.
///
/// * `w`       - View direction on the +z side.
/// * `alpha_x` - Roughness along x.
/// * `alpha_y` - Roughness along y.
/// * `u1`      - Uniform sample value.
/// * `u2`      - Uniform sample value.
fn sample_visible(w: &Vector3f, alpha_x: Float, alpha_y: Float, u1: Float, u2: Float) -> Vector3f {
    let stretched = Vector3f::new(alpha_x * w.x, alpha_y * w.y, w.z).normalize();

    let (slope_x, slope_y) = sample_slopes(cos_theta(&stretched), u1, u2);

    let (cos, sin) = (cos_phi(&stretched), sin_phi(&stretched));
    let rotated_x = cos * slope_x - sin * slope_y;
    let rotated_y = sin * slope_x + cos * slope_y;

    Vector3f::new(-alpha_x * rotated_x, -alpha_y * rotated_y, 1.0).normalize()
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use proptest::prelude::*;

    #[test]
    fn d_at_normal() {
        let distribution = TrowbridgeReitzDistribution::new(1.0, 2.0);
        let d = distribution.d(&Vector3f::new(0.0, 0.0, 1.0));
        assert!(approx_eq!(Float, d, 0.15915, epsilon = 1e-5));
    }

    #[test]
    fn d_in_tangent_plane_is_zero() {
        let distribution = TrowbridgeReitzDistribution::new(1.0, 2.0);
        assert_eq!(distribution.d(&Vector3f::new(1.0, 0.0, 0.0)), 0.0);
        assert_eq!(distribution.lambda(&Vector3f::new(0.0, 1.0, 0.0)), 0.0);
    }

    #[test]
    fn alpha_is_floored() {
        let distribution = TrowbridgeReitzDistribution::new(0.0, -1.0);
        assert_eq!(distribution.alpha_x(), MIN_ALPHA);
        assert_eq!(distribution.alpha_y(), MIN_ALPHA);
    }

    #[test]
    fn roughness_to_alpha_increases() {
        let a = TrowbridgeReitzDistribution::roughness_to_alpha(0.1);
        let b = TrowbridgeReitzDistribution::roughness_to_alpha(0.5);
        assert!(a > 0.0 && a < b);
    }

    proptest! {
        #[test]
        fn sampled_normals_face_viewer(
            x in -1.0..1.0f32,
            y in -1.0..1.0f32,
            z in -1.0..1.0f32,
            u1 in 0.0..1.0f32,
            u2 in 0.0..1.0f32,
        ) {
            prop_assume!(z.abs() > 0.05);
            let w = Vector3f::new(x, y, z).normalize();
            let distribution = TrowbridgeReitzDistribution::new(0.3, 0.6);
            let wh = distribution.sample_wh(&w, &Point2f::new(u1, u2));
            prop_assert!((wh.length() - 1.0).abs() < 1e-3);
            prop_assert!(wh.z * w.z > 0.0);
            prop_assert!(distribution.pdf(&w, &wh) >= 0.0);
        }
    }
}
