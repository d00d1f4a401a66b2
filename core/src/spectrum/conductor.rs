//! Conductor Fresnel Reflectance

use super::{Reflector, Spectrum};
use crate::math::*;

/// Unpolarized Fresnel reflectance of a conductor, evaluated per wavelength.
/// Absent spectra are treated as zero and the incident index is floored at 1.
#[derive(Debug)]
pub(super) struct FresnelConductorReflector<'a> {
    /// Absolute cosine of the incident angle. Never zero.
    pub cos_theta: Float,

    /// Index of refraction of the incident medium.
    pub eta_i: Option<&'a dyn Spectrum>,

    /// Index of refraction of the conductor.
    pub eta_t: Option<&'a dyn Spectrum>,

    /// Absorption coefficient of the conductor.
    pub k: Option<&'a dyn Spectrum>,
}

impl<'a> Reflector for FresnelConductorReflector<'a> {
    fn reflectance(&self, wavelength: Float) -> Float {
        let intensity = |s: Option<&'a dyn Spectrum>| s.map_or(0.0, |s| s.intensity(wavelength));

        let eta_i = max(intensity(self.eta_i), 1.0);
        fr_conductor(self.cos_theta, intensity(self.eta_t) / eta_i, intensity(self.k) / eta_i)
    }
}

/// Returns the Fresnel reflectance of a conductor for relative index `eta`
/// and relative absorption `eta_k`.
///
/// * `cos_theta_i` - Cosine of the incident angle.
/// * `eta`         - Relative index of refraction.
/// * `eta_k`       - Relative absorption coefficient.
pub fn fr_conductor(cos_theta_i: Float, eta: Float, eta_k: Float) -> Float {
    let cos_theta_i = clamp(abs(cos_theta_i), 0.0, 1.0);
    let cos2 = cos_theta_i * cos_theta_i;
    let sin2 = 1.0 - cos2;
    let eta2 = eta * eta;
    let etak2 = eta_k * eta_k;

    let t0 = eta2 - etak2 - sin2;
    let a2plusb2 = (t0 * t0 + 4.0 * eta2 * etak2).sqrt();
    let t1 = a2plusb2 + cos2;
    let a = max(0.5 * (a2plusb2 + t0), 0.0).sqrt();
    let t2 = 2.0 * cos_theta_i * a;
    let rs = if t1 + t2 > 0.0 { (t1 - t2) / (t1 + t2) } else { 1.0 };

    let t3 = cos2 * a2plusb2 + sin2 * sin2;
    let t4 = t2 * sin2;
    let rp = if t3 + t4 > 0.0 {
        rs * (t3 - t4) / (t3 + t4)
    } else {
        rs
    };

    clamp(0.5 * (rp + rs), 0.0, 1.0)
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
