//! Shading-frame Trigonometry
//!
//! Directions are expressed in a local frame where +z is the shading normal,
//! so angles with the normal reduce to component lookups.

use crate::geometry::*;
use crate::math::*;

/// Returns cos(θ) of the direction with the z-axis.
///
/// * `w` - The direction vector.
#[inline]
pub fn cos_theta(w: &Vector3f) -> Float {
    w.z
}

/// Returns cos²(θ).
///
/// * `w` - The direction vector.
#[inline]
pub fn cos_2_theta(w: &Vector3f) -> Float {
    w.z * w.z
}

/// Returns |cos(θ)|.
///
/// * `w` - The direction vector.
#[inline]
pub fn abs_cos_theta(w: &Vector3f) -> Float {
    abs(w.z)
}

/// Returns sin²(θ).
///
/// * `w` - The direction vector.
#[inline]
pub fn sin_2_theta(w: &Vector3f) -> Float {
    max(0.0, 1.0 - cos_2_theta(w))
}

/// Returns sin(θ).
///
/// * `w` - The direction vector.
#[inline]
pub fn sin_theta(w: &Vector3f) -> Float {
    sin_2_theta(w).sqrt()
}

/// Returns tan(θ). Infinite for directions in the tangent plane.
///
/// * `w` - The direction vector.
#[inline]
pub fn tan_theta(w: &Vector3f) -> Float {
    sin_theta(w) / cos_theta(w)
}

/// Returns tan²(θ). Infinite for directions in the tangent plane.
///
/// * `w` - The direction vector.
#[inline]
pub fn tan_2_theta(w: &Vector3f) -> Float {
    sin_2_theta(w) / cos_2_theta(w)
}

/// Returns cos(φ), the azimuth measured from the x-axis in the xy plane.
///
/// * `w` - The direction vector.
#[inline]
pub fn cos_phi(w: &Vector3f) -> Float {
    let s = sin_theta(w);
    if s == 0.0 {
        1.0
    } else {
        clamp(w.x / s, -1.0, 1.0)
    }
}

/// Returns cos²(φ).
///
/// * `w` - The direction vector.
#[inline]
pub fn cos_2_phi(w: &Vector3f) -> Float {
    let c = cos_phi(w);
    c * c
}

/// Returns sin(φ).
///
/// * `w` - The direction vector.
#[inline]
pub fn sin_phi(w: &Vector3f) -> Float {
    let s = sin_theta(w);
    if s == 0.0 {
        0.0
    } else {
        clamp(w.y / s, -1.0, 1.0)
    }
}

/// Returns sin²(φ).
///
/// * `w` - The direction vector.
#[inline]
pub fn sin_2_phi(w: &Vector3f) -> Float {
    let s = sin_phi(w);
    s * s
}

/// Returns the cosine of the azimuthal angle between two directions.
///
/// * `wa` - First direction vector.
/// * `wb` - Second direction vector.
pub fn cos_d_phi(wa: &Vector3f, wb: &Vector3f) -> Float {
    let waxy = wa.x * wa.x + wa.y * wa.y;
    let wbxy = wb.x * wb.x + wb.y * wb.y;
    if waxy == 0.0 || wbxy == 0.0 {
        1.0
    } else {
        clamp((wa.x * wb.x + wa.y * wb.y) / (waxy * wbxy).sqrt(), -1.0, 1.0)
    }
}

/// Returns `true` if two directions lie strictly on the same side of the
/// tangent plane.
///
/// * `w`  - First direction.
/// * `wp` - Second direction.
#[inline]
pub fn same_hemisphere(w: &Vector3f, wp: &Vector3f) -> bool {
    w.z * wp.z > 0.0
}

/// Mirrors a direction about the z-axis.
///
/// * `w` - The direction.
#[inline]
pub fn mirror(w: &Vector3f) -> Vector3f {
    Vector3f::new(-w.x, -w.y, w.z)
}

/// Reflects `w` about the normal `n`. Both point away from the surface.
///
/// * `w` - Direction to reflect.
/// * `n` - Normal.
#[inline]
pub fn reflect(w: &Vector3f, n: &Vector3f) -> Vector3f {
    -(*w) + *n * (2.0 * w.dot(n))
}

/// Refracts `w` through the interface with normal `n`, which must lie on the
/// same side as `w`. Returns `None` on total internal reflection. The result
/// points away from the surface on the opposite side.
///
/// * `w`   - Direction to refract.
/// * `n`   - Normal on the side of `w`.
/// * `eta` - Ratio of the incident index over the transmitted index.
pub fn refract(w: &Vector3f, n: &Vector3f, eta: Float) -> Option<Vector3f> {
    let cos_theta_i = n.dot(w);
    let sin_2_theta_i = max(0.0, 1.0 - cos_theta_i * cos_theta_i);
    let sin_2_theta_t = eta * eta * sin_2_theta_i;

    if sin_2_theta_t >= 1.0 {
        None
    } else {
        let cos_theta_t = (1.0 - sin_2_theta_t).sqrt();
        Some(-(*w) * eta + *n * (eta * cos_theta_i - cos_theta_t))
    }
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
    fn trig_of_normal() {
        let n = Vector3f::new(0.0, 0.0, 1.0);
        assert_eq!(cos_theta(&n), 1.0);
        assert_eq!(sin_theta(&n), 0.0);
        assert_eq!(cos_phi(&n), 1.0);
        assert_eq!(sin_phi(&n), 0.0);
        assert!(tan_2_theta(&Vector3f::new(1.0, 0.0, 0.0)).is_infinite());
    }

    #[test]
    fn refract_normal_incidence() {
        let n = Vector3f::new(0.0, 0.0, 1.0);
        let t = refract(&n, &n, 1.0 / 1.5).unwrap();
        assert!(approx_eq!(Float, t.z, -1.0, epsilon = 1e-6));
    }

    #[test]
    fn refract_total_internal_reflection() {
        let n = Vector3f::new(0.0, 0.0, 1.0);
        let w = Vector3f::new(0.9, 0.0, 0.1).normalize();
        assert!(refract(&w, &n, 1.5).is_none());
    }

    proptest! {
        #[test]
        fn reflect_about_z_is_mirror(x in -1.0..1.0f32, y in -1.0..1.0f32, z in 0.01..1.0f32) {
            let w = Vector3f::new(x, y, z);
            let r = reflect(&w, &Vector3f::new(0.0, 0.0, 1.0));
            let m = mirror(&w);
            prop_assert!((r.x - m.x).abs() < 1e-5);
            prop_assert!((r.y - m.y).abs() < 1e-5);
            prop_assert!((r.z - m.z).abs() < 1e-5);
        }

        #[test]
        fn refract_obeys_snell(theta in 0.0..1.5f32, eta in 0.5..2.0f32) {
            let n = Vector3f::new(0.0, 0.0, 1.0);
            let w = Vector3f::new(theta.sin(), 0.0, theta.cos());
            if let Some(t) = refract(&w, &n, eta) {
                prop_assert!(t.z < 0.0);
                prop_assert!((sin_theta(&t) - eta * sin_theta(&w)).abs() < 1e-3);
                prop_assert!((t.length() - 1.0).abs() < 1e-3);
            }
        }
    }
}
