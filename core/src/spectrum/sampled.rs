//! Sampled Spectra

use super::{Reflector, Spectrum};
use crate::math::*;

/// Piecewise-linear function of wavelength, clamped to the end values outside
/// of the tabulated range.
#[derive(Clone, Debug, PartialEq)]
struct Samples {
    /// Strictly increasing wavelengths.
    lambda: Vec<Float>,

    /// Values at each wavelength.
    values: Vec<Float>,
}

impl Samples {
    /// Validates that both tables are non-empty, the same length, finite and
    /// that wavelengths strictly increase.
    fn new(lambda: Vec<Float>, values: Vec<Float>) -> Option<Self> {
        if lambda.is_empty() || lambda.len() != values.len() {
            return None;
        }
        if lambda.iter().chain(values.iter()).any(|v| !v.is_finite()) {
            return None;
        }
        if lambda.windows(2).any(|w| w[0] >= w[1]) {
            return None;
        }
        Some(Self { lambda, values })
    }

    fn interpolate(&self, l: Float) -> Float {
        let n = self.lambda.len();
        if n == 1 || l <= self.lambda[0] {
            return self.values[0];
        }
        if l >= self.lambda[n - 1] {
            return self.values[n - 1];
        }

        let offset = find_interval(n, |index| self.lambda[index] <= l);
        let t = (l - self.lambda[offset]) / (self.lambda[offset + 1] - self.lambda[offset]);
        lerp(t, self.values[offset], self.values[offset + 1])
    }
}

/// Measured reflector tabulated over wavelength.
#[derive(Clone, Debug, PartialEq)]
pub struct SampledReflector {
    samples: Samples,
}

impl SampledReflector {
    /// Create a new `SampledReflector`. Returns `None` if the tables are
    /// empty, differ in length, are not finite, if wavelengths do not strictly
    /// increase or if any value lies outside `[0, 1]`.
    ///
    /// * `lambda` - Wavelengths in nanometers.
    /// * `values` - Reflectance at each wavelength.
    pub fn new(lambda: Vec<Float>, values: Vec<Float>) -> Option<Self> {
        if values.iter().any(|v| !(0.0..=1.0).contains(v)) {
            return None;
        }
        Samples::new(lambda, values).map(|samples| Self { samples })
    }
}

impl Reflector for SampledReflector {
    fn reflectance(&self, wavelength: Float) -> Float {
        self.samples.interpolate(wavelength)
    }
}

/// Measured spectrum tabulated over wavelength.
#[derive(Clone, Debug, PartialEq)]
pub struct SampledSpectrum {
    samples: Samples,
}

impl SampledSpectrum {
    /// Create a new `SampledSpectrum`. Returns `None` if the tables are empty,
    /// differ in length, are not finite, if wavelengths do not strictly
    /// increase or if any value is negative.
    ///
    /// * `lambda` - Wavelengths in nanometers.
    /// * `values` - Intensity at each wavelength.
    pub fn new(lambda: Vec<Float>, values: Vec<Float>) -> Option<Self> {
        if values.iter().any(|v| *v < 0.0) {
            return None;
        }
        Samples::new(lambda, values).map(|samples| Self { samples })
    }
}

impl Spectrum for SampledSpectrum {
    fn intensity(&self, wavelength: Float) -> Float {
        self.samples.interpolate(wavelength)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    #[test]
    fn rejects_bad_tables() {
        assert!(SampledReflector::new(vec![], vec![]).is_none());
        assert!(SampledReflector::new(vec![400.0, 500.0], vec![0.5]).is_none());
        assert!(SampledReflector::new(vec![500.0, 400.0], vec![0.5, 0.5]).is_none());
        assert!(SampledReflector::new(vec![400.0, 500.0], vec![0.5, 1.5]).is_none());
        assert!(SampledSpectrum::new(vec![400.0, 500.0], vec![2.0, -1.0]).is_none());
        assert!(SampledSpectrum::new(vec![400.0, Float::NAN], vec![2.0, 1.0]).is_none());
    }

    #[test]
    fn interpolates_and_clamps() {
        let r = SampledReflector::new(vec![400.0, 500.0, 600.0], vec![0.0, 0.5, 1.0]).unwrap();
        assert_eq!(r.reflectance(300.0), 0.0);
        assert_eq!(r.reflectance(700.0), 1.0);
        assert!(approx_eq!(Float, r.reflectance(450.0), 0.25, epsilon = 1e-6));
        assert!(approx_eq!(Float, r.reflectance(550.0), 0.75, epsilon = 1e-6));
    }

    #[test]
    fn single_sample_is_constant() {
        let s = SampledSpectrum::new(vec![550.0], vec![4.0]).unwrap();
        assert_eq!(s.intensity(380.0), 4.0);
        assert_eq!(s.intensity(780.0), 4.0);
    }
}
