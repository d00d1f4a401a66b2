//! Composite reflectors and spectra. Operands are captured by reference and
//! evaluated lazily at query time.

use super::{Reflector, Spectrum};
use crate::math::*;

/// Sum of two reflectors clamped to 1.
#[derive(Debug)]
pub(super) struct AddReflector<'a> {
    pub a: &'a dyn Reflector,
    pub b: &'a dyn Reflector,
}

impl<'a> Reflector for AddReflector<'a> {
    fn reflectance(&self, wavelength: Float) -> Float {
        min(self.a.reflectance(wavelength) + self.b.reflectance(wavelength), 1.0)
    }
}

/// Reflector scaled by a scalar, clamped to `[0, 1]`.
#[derive(Debug)]
pub(super) struct ScaleReflector<'a> {
    pub r: &'a dyn Reflector,
    pub scalar: Float,
}

impl<'a> Reflector for ScaleReflector<'a> {
    fn reflectance(&self, wavelength: Float) -> Float {
        clamp(self.r.reflectance(wavelength) * self.scalar, 0.0, 1.0)
    }
}

/// Product of two reflectors.
#[derive(Debug)]
pub(super) struct ScaleReflectors<'a> {
    pub a: &'a dyn Reflector,
    pub b: &'a dyn Reflector,
}

impl<'a> Reflector for ScaleReflectors<'a> {
    fn reflectance(&self, wavelength: Float) -> Float {
        self.a.reflectance(wavelength) * self.b.reflectance(wavelength)
    }
}

/// `1 - r`, never negative.
#[derive(Debug)]
pub(super) struct InvertReflector<'a> {
    pub r: &'a dyn Reflector,
}

impl<'a> Reflector for InvertReflector<'a> {
    fn reflectance(&self, wavelength: Float) -> Float {
        max(1.0 - self.r.reflectance(wavelength), 0.0)
    }
}

#[derive(Debug)]
pub(super) struct UnboundedAddReflector<'a> {
    pub a: &'a dyn Reflector,
    pub b: &'a dyn Reflector,
}

impl<'a> Reflector for UnboundedAddReflector<'a> {
    fn reflectance(&self, wavelength: Float) -> Float {
        self.a.reflectance(wavelength) + self.b.reflectance(wavelength)
    }
}

#[derive(Debug)]
pub(super) struct UnboundedScaleReflector<'a> {
    pub r: &'a dyn Reflector,
    pub scalar: Float,
}

impl<'a> Reflector for UnboundedScaleReflector<'a> {
    fn reflectance(&self, wavelength: Float) -> Float {
        self.r.reflectance(wavelength) * self.scalar
    }
}

#[derive(Debug)]
pub(super) struct AddSpectra<'a> {
    pub a: &'a dyn Spectrum,
    pub b: &'a dyn Spectrum,
}

impl<'a> Spectrum for AddSpectra<'a> {
    fn intensity(&self, wavelength: Float) -> Float {
        self.a.intensity(wavelength) + self.b.intensity(wavelength)
    }
}

#[derive(Debug)]
pub(super) struct ScaleSpectrum<'a> {
    pub s: &'a dyn Spectrum,
    pub scalar: Float,
}

impl<'a> Spectrum for ScaleSpectrum<'a> {
    fn intensity(&self, wavelength: Float) -> Float {
        self.s.intensity(wavelength) * self.scalar
    }
}

#[derive(Debug)]
pub(super) struct ScaleSpectra<'a> {
    pub a: &'a dyn Spectrum,
    pub b: &'a dyn Spectrum,
}

impl<'a> Spectrum for ScaleSpectra<'a> {
    fn intensity(&self, wavelength: Float) -> Float {
        self.a.intensity(wavelength) * self.b.intensity(wavelength)
    }
}

/// Spectrum attenuated by a reflector.
#[derive(Debug)]
pub(super) struct ReflectSpectrum<'a> {
    pub s: &'a dyn Spectrum,
    pub r: &'a dyn Reflector,
}

impl<'a> Spectrum for ReflectSpectrum<'a> {
    fn intensity(&self, wavelength: Float) -> Float {
        self.s.intensity(wavelength) * self.r.reflectance(wavelength)
    }
}
