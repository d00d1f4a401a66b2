//! Fresnel Dielectrics and Conductors

use crate::math::*;
use crate::spectrum::*;
use std::mem::swap;

/// Policy for splitting energy between reflection and transmission at an
/// interface.
#[derive(Copy, Clone, Debug)]
pub enum Fresnel<'a> {
    /// Reflects and transmits everything unchanged.
    NoOp,
    Dielectric(FresnelDielectric),
    Conductor(FresnelConductor<'a>),
}

impl<'a> Fresnel<'a> {
    /// Attenuates a reflectance by the fraction of light reflected.
    ///
    /// * `reflectance` - The reflectance to attenuate.
    /// * `cos_theta_i` - Cosine of the incident angle with the interface normal.
    /// * `allocator`   - The spectral allocator.
    pub fn attenuate_reflectance(
        &self,
        reflectance: Option<&'a dyn Reflector>,
        cos_theta_i: Float,
        allocator: &SpectralAllocator<'a>,
    ) -> Option<&'a dyn Reflector> {
        match self {
            Self::NoOp => reflectance,
            Self::Dielectric(f) => allocator.scale(reflectance, f.evaluate(cos_theta_i)),
            Self::Conductor(f) => allocator.scale_reflectors(reflectance, f.evaluate(cos_theta_i, allocator)),
        }
    }

    /// Attenuates a transmittance by the fraction of light transmitted.
    /// Conductors transmit nothing.
    ///
    /// * `transmittance` - The transmittance to attenuate.
    /// * `cos_theta_i`   - Cosine of the incident angle with the interface normal.
    /// * `allocator`     - The spectral allocator.
    pub fn attenuate_transmittance(
        &self,
        transmittance: Option<&'a dyn Reflector>,
        cos_theta_i: Float,
        allocator: &SpectralAllocator<'a>,
    ) -> Option<&'a dyn Reflector> {
        match self {
            Self::NoOp => transmittance,
            Self::Dielectric(f) => allocator.scale(transmittance, 1.0 - f.evaluate(cos_theta_i)),
            Self::Conductor(_) => None,
        }
    }
}

/// Fresnel reflectance of a dielectric interface.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FresnelDielectric {
    /// Index of refraction on the +z side of the surface.
    eta_i: Float,

    /// Index of refraction on the -z side of the surface.
    eta_t: Float,
}

impl FresnelDielectric {
    /// Create a new `FresnelDielectric`. Returns `None` unless both indices
    /// are finite and at least 1.
    ///
    /// * `eta_i` - Index of refraction on the +z side of the surface.
    /// * `eta_t` - Index of refraction on the -z side of the surface.
    pub fn new(eta_i: Float, eta_t: Float) -> Option<Self> {
        if is_valid_eta(eta_i) && is_valid_eta(eta_t) {
            Some(Self { eta_i, eta_t })
        } else {
            None
        }
    }

    /// Returns the index of refraction on the +z side.
    pub fn eta_i(&self) -> Float {
        self.eta_i
    }

    /// Returns the index of refraction on the -z side.
    pub fn eta_t(&self) -> Float {
        self.eta_t
    }

    /// Returns the fraction of light reflected.
    ///
    /// * `cos_theta_i` - Cosine of the incident angle; negative from the -z side.
    pub fn evaluate(&self, cos_theta_i: Float) -> Float {
        fr_dielectric(cos_theta_i, self.eta_i, self.eta_t)
    }
}

/// Fresnel reflectance of a conductor. Missing spectra are treated as zero.
#[derive(Copy, Clone, Debug)]
pub struct FresnelConductor<'a> {
    /// Index of refraction of the incident medium.
    eta_i: Option<&'a dyn Spectrum>,

    /// Index of refraction of the conductor.
    eta_t: Option<&'a dyn Spectrum>,

    /// Absorption coefficient of the conductor.
    k: Option<&'a dyn Spectrum>,
}

impl<'a> FresnelConductor<'a> {
    /// Create a new `FresnelConductor`.
    ///
    /// * `eta_i` - Index of refraction of the incident medium.
    /// * `eta_t` - Index of refraction of the conductor.
    /// * `k`     - Absorption coefficient of the conductor.
    pub fn new(
        eta_i: Option<&'a dyn Spectrum>,
        eta_t: Option<&'a dyn Spectrum>,
        k: Option<&'a dyn Spectrum>,
    ) -> Self {
        Self { eta_i, eta_t, k }
    }

    /// Returns the reflectance at the given angle; the side is ignored.
    ///
    /// * `cos_theta_i` - Cosine of the incident angle.
    /// * `allocator`   - The spectral allocator.
    pub fn evaluate(&self, cos_theta_i: Float, allocator: &SpectralAllocator<'a>) -> Option<&'a dyn Reflector> {
        allocator.fresnel_conductor(cos_theta_i, self.eta_i, self.eta_t, self.k)
    }
}

/// Returns the Fresnel reflectance of a dielectric interface for unpolarized
/// light. Total internal reflection yields exactly 1.
///
/// * `cos_theta_i` - Cosine of the incident angle; negative when arriving from
///                   the `eta_t` side.
/// * `eta_i`       - Index of refraction on the positive side.
/// * `eta_t`       - Index of refraction on the negative side.
pub fn fr_dielectric(cos_theta_i: Float, eta_i: Float, eta_t: Float) -> Float {
    let mut cos_theta_i = clamp(cos_theta_i, -1.0, 1.0);
    let (mut eta_i, mut eta_t) = (eta_i, eta_t);

    if cos_theta_i <= 0.0 {
        swap(&mut eta_i, &mut eta_t);
        cos_theta_i = abs(cos_theta_i);
    }

    let sin_theta_i = max(0.0, 1.0 - cos_theta_i * cos_theta_i).sqrt();
    let sin_theta_t = eta_i / eta_t * sin_theta_i;
    if sin_theta_t >= 1.0 {
        return 1.0;
    }

    let cos_theta_t = max(0.0, 1.0 - sin_theta_t * sin_theta_t).sqrt();
    let r_parl = ((eta_t * cos_theta_i) - (eta_i * cos_theta_t))
        / ((eta_t * cos_theta_i) + (eta_i * cos_theta_t));
    let r_perp = ((eta_i * cos_theta_i) - (eta_t * cos_theta_t))
        / ((eta_i * cos_theta_i) + (eta_t * cos_theta_t));
    (r_parl * r_parl + r_perp * r_perp) / 2.0
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
