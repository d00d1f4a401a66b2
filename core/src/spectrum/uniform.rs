//! Uniform Spectra

use super::{Reflector, Spectrum};
use crate::math::*;

/// The canonical perfect reflector (≡1 at every wavelength). `invert` maps it
/// to absent and absent to it.
pub static PERFECT_REFLECTOR: UniformReflector = UniformReflector { value: 1.0 };

/// Reflector with the same value at every wavelength.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct UniformReflector {
    value: Float,
}

impl UniformReflector {
    /// Create a new `UniformReflector`. Returns `None` unless `value` is in
    /// `[0, 1]`.
    ///
    /// * `value` - The reflectance.
    pub fn new(value: Float) -> Option<Self> {
        if (0.0..=1.0).contains(&value) {
            Some(Self { value })
        } else {
            None
        }
    }

    /// Returns the reflectance value.
    pub fn value(&self) -> Float {
        self.value
    }
}

impl Reflector for UniformReflector {
    fn reflectance(&self, _wavelength: Float) -> Float {
        self.value
    }
}

/// Spectrum with the same intensity at every wavelength.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct UniformSpectrum {
    value: Float,
}

impl UniformSpectrum {
    /// Create a new `UniformSpectrum`. Returns `None` if `value` is negative
    /// or not finite.
    ///
    /// * `value` - The intensity.
    pub fn new(value: Float) -> Option<Self> {
        if value.is_finite() && value >= 0.0 {
            Some(Self { value })
        } else {
            None
        }
    }

    /// Returns the intensity value.
    pub fn value(&self) -> Float {
        self.value
    }
}

impl Spectrum for UniformSpectrum {
    fn intensity(&self, _wavelength: Float) -> Float {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reflector_range() {
        assert!(UniformReflector::new(-0.1).is_none());
        assert!(UniformReflector::new(1.1).is_none());
        assert!(UniformReflector::new(Float::NAN).is_none());
        assert_eq!(UniformReflector::new(0.25).map(|r| r.reflectance(550.0)), Some(0.25));
        assert_eq!(PERFECT_REFLECTOR.reflectance(400.0), 1.0);
    }

    #[test]
    fn spectrum_range() {
        assert!(UniformSpectrum::new(-1.0).is_none());
        assert!(UniformSpectrum::new(INFINITY).is_none());
        assert_eq!(UniformSpectrum::new(3.5).map(|s| s.intensity(700.0)), Some(3.5));
    }
}
