//! Spectral Allocator

use super::composite::*;
use super::conductor::FresnelConductorReflector;
use super::*;
use crate::memory::Arena;

/// Builds composite reflectors and spectra in an arena.
///
/// Absent operands are first-class values: absent is the identity for
/// addition and the annihilator for scaling. Every operation applies these
/// rules itself so callers never special-case them.
#[derive(Copy, Clone)]
pub struct SpectralAllocator<'a> {
    /// The arena for memory allocations.
    arena: &'a Arena,
}

impl<'a> SpectralAllocator<'a> {
    /// Create a new `SpectralAllocator`.
    ///
    /// * `arena` - The arena for memory allocations.
    pub fn new(arena: &'a Arena) -> Self {
        Self { arena }
    }

    /// Returns the arena backing this allocator.
    pub fn arena(&self) -> &'a Arena {
        self.arena
    }

    /// Returns a reflector with the same value at every wavelength. Values at
    /// or below 0 (and NaN) are absent; values at or above 1 return the
    /// perfect reflector.
    ///
    /// * `value` - The reflectance.
    pub fn uniform(&self, value: Float) -> Option<&'a dyn Reflector> {
        if !(value > 0.0) {
            None
        } else if value >= 1.0 {
            Some(&PERFECT_REFLECTOR)
        } else {
            self.reflector(UniformReflector::new(value)?)
        }
    }

    /// Returns `a + b` clamped to 1.
    ///
    /// * `a` - First addend.
    /// * `b` - Second addend.
    pub fn add(
        &self,
        a: Option<&'a dyn Reflector>,
        b: Option<&'a dyn Reflector>,
    ) -> Option<&'a dyn Reflector> {
        match (a, b) {
            (None, b) => b,
            (a, None) => a,
            (Some(a), Some(b)) => self.reflector(AddReflector { a, b }),
        }
    }

    /// Returns `r * scalar` clamped to `[0, 1]`. A scalar that is not
    /// positive yields absent; a scalar of exactly 1 returns `r` itself.
    ///
    /// * `r`      - The reflector.
    /// * `scalar` - The scale factor.
    pub fn scale(&self, r: Option<&'a dyn Reflector>, scalar: Float) -> Option<&'a dyn Reflector> {
        let r = r?;
        if !(scalar > 0.0) {
            None
        } else if scalar == 1.0 {
            Some(r)
        } else {
            self.reflector(ScaleReflector { r, scalar })
        }
    }

    /// Returns the product `a * b`; absent if either is absent.
    ///
    /// * `a` - First factor.
    /// * `b` - Second factor.
    pub fn scale_reflectors(
        &self,
        a: Option<&'a dyn Reflector>,
        b: Option<&'a dyn Reflector>,
    ) -> Option<&'a dyn Reflector> {
        let (a, b) = (a?, b?);
        if is_perfect_reflector(a) {
            Some(b)
        } else if is_perfect_reflector(b) {
            Some(a)
        } else {
            self.reflector(ScaleReflectors { a, b })
        }
    }

    /// Returns `1 - r`. Absent inverts to the perfect reflector and the
    /// perfect reflector inverts to absent.
    ///
    /// * `r` - The reflector.
    pub fn invert(&self, r: Option<&'a dyn Reflector>) -> Option<&'a dyn Reflector> {
        match r {
            None => Some(&PERFECT_REFLECTOR),
            Some(r) if is_perfect_reflector(r) => None,
            Some(r) => self.reflector(InvertReflector { r }),
        }
    }

    /// Returns `a + b` without clamping.
    ///
    /// * `a` - First addend.
    /// * `b` - Second addend.
    pub fn unbounded_add(
        &self,
        a: Option<&'a dyn Reflector>,
        b: Option<&'a dyn Reflector>,
    ) -> Option<&'a dyn Reflector> {
        match (a, b) {
            (None, b) => b,
            (a, None) => a,
            (Some(a), Some(b)) => self.reflector(UnboundedAddReflector { a, b }),
        }
    }

    /// Returns `r * scalar` without clamping. A scalar that is not positive
    /// and finite yields absent; a scalar of exactly 1 returns `r` itself.
    ///
    /// * `r`      - The reflector.
    /// * `scalar` - The scale factor.
    pub fn unbounded_scale(
        &self,
        r: Option<&'a dyn Reflector>,
        scalar: Float,
    ) -> Option<&'a dyn Reflector> {
        let r = r?;
        if !(scalar > 0.0) || !scalar.is_finite() {
            None
        } else if scalar == 1.0 {
            Some(r)
        } else {
            self.reflector(UnboundedScaleReflector { r, scalar })
        }
    }

    /// Returns the Fresnel reflectance of a conductor at the given incident
    /// angle. A grazing angle (`cos_theta == 0`) yields absent; absent spectra
    /// are treated as zero and the incident index is floored at 1.
    ///
    /// * `cos_theta` - Cosine of the incident angle. The sign is ignored.
    /// * `eta_i`     - Index of refraction of the incident medium.
    /// * `eta_t`     - Index of refraction of the conductor.
    /// * `k`         - Absorption coefficient of the conductor.
    pub fn fresnel_conductor(
        &self,
        cos_theta: Float,
        eta_i: Option<&'a dyn Spectrum>,
        eta_t: Option<&'a dyn Spectrum>,
        k: Option<&'a dyn Spectrum>,
    ) -> Option<&'a dyn Reflector> {
        if cos_theta == 0.0 || cos_theta.is_nan() {
            return None;
        }
        self.reflector(FresnelConductorReflector {
            cos_theta: min(abs(cos_theta), 1.0),
            eta_i,
            eta_t,
            k,
        })
    }

    /// Returns `a + b`.
    ///
    /// * `a` - First addend.
    /// * `b` - Second addend.
    pub fn add_spectra(
        &self,
        a: Option<&'a dyn Spectrum>,
        b: Option<&'a dyn Spectrum>,
    ) -> Option<&'a dyn Spectrum> {
        match (a, b) {
            (None, b) => b,
            (a, None) => a,
            (Some(a), Some(b)) => self.spectrum(AddSpectra { a, b }),
        }
    }

    /// Returns `s * scalar`. A scalar that is not positive and finite yields
    /// absent; a scalar of exactly 1 returns `s` itself.
    ///
    /// * `s`      - The spectrum.
    /// * `scalar` - The scale factor.
    pub fn scale_spectrum(
        &self,
        s: Option<&'a dyn Spectrum>,
        scalar: Float,
    ) -> Option<&'a dyn Spectrum> {
        let s = s?;
        if !(scalar > 0.0) || !scalar.is_finite() {
            None
        } else if scalar == 1.0 {
            Some(s)
        } else {
            self.spectrum(ScaleSpectrum { s, scalar })
        }
    }

    /// Returns the product `a * b`; absent if either is absent.
    ///
    /// * `a` - First factor.
    /// * `b` - Second factor.
    pub fn scale_spectra(
        &self,
        a: Option<&'a dyn Spectrum>,
        b: Option<&'a dyn Spectrum>,
    ) -> Option<&'a dyn Spectrum> {
        let (a, b) = (a?, b?);
        self.spectrum(ScaleSpectra { a, b })
    }

    /// Returns `s` attenuated by `r`; absent if either is absent.
    ///
    /// * `s` - The spectrum.
    /// * `r` - The reflector.
    pub fn reflect_spectrum(
        &self,
        s: Option<&'a dyn Spectrum>,
        r: Option<&'a dyn Reflector>,
    ) -> Option<&'a dyn Spectrum> {
        let (s, r) = (s?, r?);
        if is_perfect_reflector(r) {
            Some(s)
        } else {
            self.spectrum(ReflectSpectrum { s, r })
        }
    }

    fn reflector<R: Reflector + 'a>(&self, r: R) -> Option<&'a dyn Reflector> {
        let r: &'a R = self.arena.alloc(r);
        Some(r)
    }

    fn spectrum<S: Spectrum + 'a>(&self, s: S) -> Option<&'a dyn Spectrum> {
        let s: &'a S = self.arena.alloc(s);
        Some(s)
    }

    /// Returns a zeroed scratch buffer of `len` values owned by the arena.
    ///
    /// * `len` - Number of elements.
    #[allow(clippy::mut_from_ref)]
    pub fn scratch(&self, len: usize) -> &'a mut [Float] {
        self.arena.alloc_zeroed(len)
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

    fn value(r: Option<&dyn Reflector>) -> Float {
        r.map_or(0.0, |r| r.reflectance(550.0))
    }

    #[test]
    fn scale_by_one_is_identity() {
        let arena = Arena::new();
        let alloc = SpectralAllocator::new(&arena);
        let r = alloc.uniform(0.5);
        assert!(same_reflector(alloc.scale(r, 1.0), r));
        assert!(same_reflector(alloc.unbounded_scale(r, 1.0), r));
    }

    #[test]
    fn scale_by_zero_is_absent() {
        let arena = Arena::new();
        let alloc = SpectralAllocator::new(&arena);
        let r = alloc.uniform(0.5);
        assert!(alloc.scale(r, 0.0).is_none());
        assert!(alloc.scale(r, -1.0).is_none());
        assert!(alloc.scale(r, Float::NAN).is_none());
        assert!(alloc.scale(None, 0.5).is_none());
    }

    #[test]
    fn add_absent_is_identity() {
        let arena = Arena::new();
        let alloc = SpectralAllocator::new(&arena);
        let r = alloc.uniform(0.25);
        assert!(same_reflector(alloc.add(None, r), r));
        assert!(same_reflector(alloc.add(r, None), r));
        assert!(alloc.add(None, None).is_none());
    }

    #[test]
    fn add_is_clamped() {
        let arena = Arena::new();
        let alloc = SpectralAllocator::new(&arena);
        let r = alloc.uniform(0.75);
        assert_eq!(value(alloc.add(r, r)), 1.0);
        assert_eq!(value(alloc.unbounded_add(r, r)), 1.5);
    }

    #[test]
    fn invert_absent_and_perfect() {
        let arena = Arena::new();
        let alloc = SpectralAllocator::new(&arena);
        let inverted = alloc.invert(None);
        for l in [380.0, 550.0, 720.0] {
            assert_eq!(inverted.map(|r| r.reflectance(l)), Some(1.0));
        }
        assert!(alloc.invert(Some(&PERFECT_REFLECTOR)).is_none());
        assert!(alloc.invert(alloc.uniform(1.0)).is_none());
        assert!(approx_eq!(Float, value(alloc.invert(alloc.uniform(0.3))), 0.7, epsilon = 1e-6));
    }

    #[test]
    fn invert_never_negative() {
        let arena = Arena::new();
        let alloc = SpectralAllocator::new(&arena);
        let big = alloc.unbounded_scale(alloc.uniform(0.5), 4.0);
        assert_eq!(value(alloc.invert(big)), 0.0);
    }

    #[test]
    fn uniform_boundaries() {
        let arena = Arena::new();
        let alloc = SpectralAllocator::new(&arena);
        assert!(alloc.uniform(0.0).is_none());
        assert!(alloc.uniform(Float::NAN).is_none());
        assert!(alloc
            .uniform(2.0)
            .map_or(false, is_perfect_reflector));
    }

    #[test]
    fn scale_reflectors_absorbs_absent() {
        let arena = Arena::new();
        let alloc = SpectralAllocator::new(&arena);
        let r = alloc.uniform(0.5);
        assert!(alloc.scale_reflectors(r, None).is_none());
        assert!(alloc.scale_reflectors(None, r).is_none());
        assert!(same_reflector(alloc.scale_reflectors(Some(&PERFECT_REFLECTOR), r), r));
        assert_eq!(value(alloc.scale_reflectors(r, r)), 0.25);
    }

    #[test]
    fn fresnel_conductor_grazing_is_absent() {
        let arena = Arena::new();
        let alloc = SpectralAllocator::new(&arena);
        assert!(alloc.fresnel_conductor(0.0, None, None, None).is_none());
    }

    #[test]
    fn fresnel_conductor_defaults() {
        let arena = Arena::new();
        let alloc = SpectralAllocator::new(&arena);

        // All spectra absent: eta_t = k = 0 reflects everything.
        assert_eq!(value(alloc.fresnel_conductor(1.0, None, None, None)), 1.0);

        // An incident index below 1 is floored, so it matches vacuum.
        let low = UniformSpectrum::new(0.5).unwrap();
        let gold = UniformSpectrum::new(0.2).unwrap();
        let k = UniformSpectrum::new(3.9).unwrap();
        let a = alloc.fresnel_conductor(0.7, Some(&low), Some(&gold), Some(&k));
        let b = alloc.fresnel_conductor(-0.7, None, Some(&gold), Some(&k));
        assert_eq!(value(a), value(b));
        assert!(value(a) > 0.0 && value(a) <= 1.0);
    }

    #[test]
    fn spectrum_algebra() {
        let arena = Arena::new();
        let alloc = SpectralAllocator::new(&arena);
        let s = UniformSpectrum::new(2.0).unwrap();
        let t = UniformSpectrum::new(3.0).unwrap();
        let intensity = |s: Option<&dyn Spectrum>| s.map_or(0.0, |s| s.intensity(500.0));

        assert_eq!(intensity(alloc.add_spectra(Some(&s), Some(&t))), 5.0);
        assert_eq!(intensity(alloc.add_spectra(None, Some(&t))), 3.0);
        assert_eq!(intensity(alloc.scale_spectrum(Some(&s), 4.0)), 8.0);
        assert!(alloc.scale_spectrum(Some(&s), 0.0).is_none());
        assert_eq!(intensity(alloc.scale_spectra(Some(&s), Some(&t))), 6.0);
        assert!(alloc.scale_spectra(None, Some(&t)).is_none());
        assert_eq!(intensity(alloc.reflect_spectrum(Some(&s), alloc.uniform(0.5))), 1.0);
        assert!(alloc.reflect_spectrum(Some(&s), None).is_none());
    }

    proptest! {
        #[test]
        fn bounded_results_stay_in_unit_range(
            a in 0.0..1.0f32,
            b in 0.0..1.0f32,
            s in 0.0..4.0f32,
        ) {
            let arena = Arena::new();
            let alloc = SpectralAllocator::new(&arena);
            let (ra, rb) = (alloc.uniform(a), alloc.uniform(b));

            for r in [alloc.add(ra, rb), alloc.scale(ra, s), alloc.invert(ra), alloc.scale_reflectors(ra, rb)] {
                let v = value(r);
                prop_assert!((0.0..=1.0).contains(&v));
            }
        }
    }
}
