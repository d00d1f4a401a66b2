//! Attenuated Scattering

use super::*;

/// Scales every reflectance of a wrapped function by a constant in `(0, 1)`.
#[derive(Copy, Clone, Debug)]
pub struct Attenuated<'a> {
    /// The wrapped function.
    bxdf: &'a Bxdf<'a>,

    /// The scale factor.
    attenuation: Float,
}

impl<'a> Attenuated<'a> {
    /// Allocate a new `Attenuated`.
    ///
    /// * `allocator`   - The BxDF allocator.
    /// * `bxdf`        - The wrapped function.
    /// * `attenuation` - The scale factor, strictly inside `(0, 1)`.
    pub fn alloc(allocator: &BxdfAllocator<'a>, bxdf: &'a Bxdf<'a>, attenuation: Float) -> &'a Bxdf<'a> {
        let model = allocator.allocate(Self { bxdf, attenuation });
        allocator.allocate(Bxdf::Attenuated(model))
    }

    /// Returns the wrapped function.
    pub fn bxdf(&self) -> &'a Bxdf<'a> {
        self.bxdf
    }

    /// Returns the wrapped function's weight.
    pub fn diffuse_pdf(&self) -> Option<Float> {
        self.bxdf.diffuse_pdf()
    }

    /// Samples the wrapped function, attenuating a specular reflectance.
    ///
    /// * `incoming`      - The incoming direction.
    /// * `differentials` - Optional directions of offset rays.
    /// * `sampler`       - Source of sample values.
    /// * `allocator`     - The spectral allocator.
    pub fn sample(
        &self,
        incoming: &Vector3f,
        differentials: Option<&Differentials>,
        sampler: &mut Sampler,
        allocator: &SpectralAllocator<'a>,
    ) -> SampleResult<'a> {
        match self.bxdf.sample_unchecked(incoming, differentials, sampler, allocator) {
            SampleResult::Specular(sample) => allocator
                .unbounded_scale(Some(sample.reflectance), self.attenuation)
                .map(|reflectance| SpecularSample { reflectance, ..sample })
                .into(),
            result => result,
        }
    }

    /// Returns the wrapped function's reflectance, attenuated.
    ///
    /// * `incoming`   - The incoming direction.
    /// * `outgoing`   - The scattered direction.
    /// * `hemisphere` - The hemisphere being queried.
    /// * `allocator`  - The spectral allocator.
    pub fn reflectance_diffuse(
        &self,
        incoming: &Vector3f,
        outgoing: &Vector3f,
        hemisphere: Hemisphere,
        allocator: &SpectralAllocator<'a>,
    ) -> Option<&'a dyn Reflector> {
        let reflectance = self.bxdf.reflectance_diffuse(incoming, outgoing, hemisphere, allocator);
        allocator.unbounded_scale(reflectance, self.attenuation)
    }
}

/// Returns `bxdf` attenuated by `attenuation`. An attenuation that is not
/// positive yields `None`; one of at least 1 returns `bxdf` unchanged.
///
/// * `allocator`   - The BxDF allocator.
/// * `bxdf`        - The function to attenuate.
/// * `attenuation` - The scale factor.
pub fn make_attenuated_bxdf<'a>(
    allocator: &BxdfAllocator<'a>,
    bxdf: Option<&'a Bxdf<'a>>,
    attenuation: Float,
) -> Option<&'a Bxdf<'a>> {
    let bxdf = bxdf?;
    if !(attenuation > 0.0) {
        None
    } else if attenuation >= 1.0 {
        Some(bxdf)
    } else {
        Some(Attenuated::alloc(allocator, bxdf, attenuation))
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflection::tests::{value, with_allocators};
    use crate::rng::RNG;
    use float_cmp::*;

    #[test]
    fn boundaries_resolve_in_factory() {
        with_allocators(|bxdfs, spectra| {
            let lambertian = make_lambertian_brdf(bxdfs, spectra.uniform(0.5));
            assert!(make_attenuated_bxdf(bxdfs, None, 0.5).is_none());
            assert!(make_attenuated_bxdf(bxdfs, lambertian, 0.0).is_none());
            assert!(make_attenuated_bxdf(bxdfs, lambertian, -1.0).is_none());
            assert!(make_attenuated_bxdf(bxdfs, lambertian, Float::NAN).is_none());
            assert!(matches!(make_attenuated_bxdf(bxdfs, lambertian, 1.0), Some(Bxdf::Lambertian(_))));
            assert!(matches!(make_attenuated_bxdf(bxdfs, lambertian, 2.0), Some(Bxdf::Lambertian(_))));
            assert!(matches!(make_attenuated_bxdf(bxdfs, lambertian, 0.5), Some(Bxdf::Attenuated(_))));
        });
    }

    #[test]
    fn scales_diffuse_reflectance_only() {
        with_allocators(|bxdfs, spectra| {
            let bxdf = make_attenuated_bxdf(bxdfs, make_lambertian_brdf(bxdfs, spectra.uniform(1.0)), 0.25).unwrap();
            let incoming = Vector3f::new(0.0, 0.0, 1.0);
            let outgoing = Vector3f::new(0.0, 0.6, 0.8);

            let r = value(bxdf.reflectance_diffuse(&incoming, &outgoing, Hemisphere::Brdf, spectra));
            assert!(approx_eq!(Float, r, 0.25 * INV_PI, epsilon = 1e-6));
            let pdf = bxdf.pdf_diffuse(&incoming, &outgoing, Hemisphere::Brdf);
            assert!(approx_eq!(Float, pdf, 0.8 * INV_PI, epsilon = 1e-6));
            assert_eq!(bxdf.diffuse_pdf(), Some(1.0));
        });
    }

    #[test]
    fn glossy_peak_is_not_clamped() {
        with_allocators(|bxdfs, spectra| {
            let glossy =
                make_microfacet_dielectric_brdf(bxdfs, Some(&PERFECT_REFLECTOR), 1.0, 1.5, 0.01, 0.01, false);
            let attenuated = make_attenuated_bxdf(bxdfs, glossy, 0.5).unwrap();
            let normal = Vector3f::new(0.0, 0.0, 1.0);

            let peak = value(glossy.unwrap().reflectance_diffuse(&normal, &normal, Hemisphere::Brdf, spectra));
            assert!(peak > 1.0);

            let r = value(attenuated.reflectance_diffuse(&normal, &normal, Hemisphere::Brdf, spectra));
            assert!(approx_eq!(Float, r, 0.5 * peak, epsilon = 1e-4 * peak));
        });
    }

    #[test]
    fn scales_specular_reflectance() {
        with_allocators(|bxdfs, spectra| {
            let bxdf = make_attenuated_bxdf(bxdfs, make_mirror_brdf(bxdfs, spectra.uniform(0.8)), 0.5).unwrap();
            assert!(!bxdf.is_diffuse());

            let incoming = Vector3f::new(0.0, 0.6, 0.8);
            let mut rng = RNG::new(4);
            let mut sampler = Sampler::new(&mut rng);
            match bxdf.sample(&incoming, None, &Vector3f::new(0.0, 0.0, 1.0), &mut sampler, spectra) {
                SampleResult::Specular(s) => {
                    assert!(approx_eq!(Float, value(Some(s.reflectance)), 0.4, epsilon = 1e-6));
                    assert_eq!(s.direction, Vector3f::new(0.0, -0.6, 0.8));
                }
                other => panic!("unexpected sample {:?}", other),
            }
        });
    }
}
