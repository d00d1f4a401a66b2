//! Specular Dielectric

use super::*;

/// Smooth dielectric interface that either reflects or refracts, chosen with
/// probability equal to the Fresnel reflectance.
#[derive(Copy, Clone, Debug)]
pub struct SpecularDielectric<'a> {
    /// Reflectance before Fresnel attenuation.
    reflectance: Option<&'a dyn Reflector>,

    /// Transmittance before Fresnel attenuation.
    transmittance: Option<&'a dyn Reflector>,

    /// The interface.
    fresnel: FresnelDielectric,
}

impl<'a> SpecularDielectric<'a> {
    /// Allocate a new `SpecularDielectric`.
    ///
    /// * `allocator`     - The BxDF allocator.
    /// * `reflectance`   - Reflectance before Fresnel attenuation.
    /// * `transmittance` - Transmittance before Fresnel attenuation.
    /// * `fresnel`       - The interface.
    pub fn alloc(
        allocator: &BxdfAllocator<'a>,
        reflectance: Option<&'a dyn Reflector>,
        transmittance: Option<&'a dyn Reflector>,
        fresnel: FresnelDielectric,
    ) -> &'a Bxdf<'a> {
        let model = allocator.allocate(Self {
            reflectance,
            transmittance,
            fresnel,
        });
        allocator.allocate(Bxdf::SpecularDielectric(model))
    }

    /// Picks reflection or refraction and returns the chosen direction with
    /// its Fresnel-weighted reflectance. Draws one sample value.
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
    ) -> Option<SpecularSample<'a>> {
        if incoming.z == 0.0 {
            return None;
        }

        let f = self.fresnel.evaluate(cos_theta(incoming));
        if sampler.next() < f {
            let reflectance = allocator.scale(self.reflectance, f)?;
            return Some(SpecularSample {
                hemisphere: Hemisphere::Brdf,
                reflectance,
                direction: mirror(incoming),
                differentials: differentials.map(|d| d.map(mirror)),
                pdf: Some(f),
            });
        }

        let (normal, eta) = if incoming.z > 0.0 {
            (Vector3f::new(0.0, 0.0, 1.0), self.fresnel.eta_i() / self.fresnel.eta_t())
        } else {
            (Vector3f::new(0.0, 0.0, -1.0), self.fresnel.eta_t() / self.fresnel.eta_i())
        };
        let direction = refract(incoming, &normal, eta)?;

        // Radiance is compressed or expanded by the squared relative index.
        let transmittance = allocator.unbounded_scale(self.transmittance, (1.0 - f) * eta * eta)?;

        Some(SpecularSample {
            hemisphere: Hemisphere::Btdf,
            reflectance: transmittance,
            direction,
            differentials: differentials.and_then(|d| d.try_map(|w| refract(w, &normal, eta))),
            pdf: Some(1.0 - f),
        })
    }
}

/// Returns a smooth dielectric, or `None` if both reflectances are absent or
/// an index of refraction is below 1 or not finite.
///
/// * `allocator`     - The BxDF allocator.
/// * `reflectance`   - Reflectance before Fresnel attenuation.
/// * `transmittance` - Transmittance before Fresnel attenuation.
/// * `eta_i`         - Index of refraction on the +z side.
/// * `eta_t`         - Index of refraction on the -z side.
pub fn make_specular_dielectric_bsdf<'a>(
    allocator: &BxdfAllocator<'a>,
    reflectance: Option<&'a dyn Reflector>,
    transmittance: Option<&'a dyn Reflector>,
    eta_i: Float,
    eta_t: Float,
) -> Option<&'a Bxdf<'a>> {
    if reflectance.is_none() && transmittance.is_none() {
        return None;
    }
    let Some(fresnel) = FresnelDielectric::new(eta_i, eta_t) else {
        debug!("Rejecting dielectric eta ({}, {})", eta_i, eta_t);
        return None;
    };
    Some(SpecularDielectric::alloc(allocator, reflectance, transmittance, fresnel))
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
    fn rejects_invalid_input() {
        with_allocators(|bxdfs, spectra| {
            let r = spectra.uniform(1.0);
            assert!(make_specular_dielectric_bsdf(bxdfs, None, None, 1.0, 1.5).is_none());
            assert!(make_specular_dielectric_bsdf(bxdfs, r, r, 1.0, 0.5).is_none());
            assert!(make_specular_dielectric_bsdf(bxdfs, r, r, Float::NAN, 1.5).is_none());
        });
    }

    #[test]
    fn branch_frequency_follows_fresnel() {
        with_allocators(|bxdfs, spectra| {
            let bxdf = make_specular_dielectric_bsdf(
                bxdfs,
                Some(&PERFECT_REFLECTOR),
                Some(&PERFECT_REFLECTOR),
                1.0,
                1.5,
            )
            .unwrap();
            let incoming = Vector3f::new(0.0, 0.0, 1.0);
            let normal = incoming;
            let mut rng = RNG::new(42);
            let mut sampler = Sampler::new(&mut rng);

            let mut reflected = 0;
            let n = 10_000;
            for _ in 0..n {
                match bxdf.sample(&incoming, None, &normal, &mut sampler, spectra) {
                    SampleResult::Specular(s) if s.hemisphere == Hemisphere::Brdf => {
                        reflected += 1;
                        assert!(approx_eq!(Float, s.pdf.unwrap(), 0.04, epsilon = 1e-5));
                        assert!(approx_eq!(Float, value(Some(s.reflectance)), 0.04, epsilon = 1e-5));
                    }
                    SampleResult::Specular(s) => {
                        assert!(approx_eq!(Float, s.direction.z, -1.0, epsilon = 1e-6));
                        assert!(approx_eq!(Float, s.pdf.unwrap(), 0.96, epsilon = 1e-5));
                        assert!(approx_eq!(Float, value(Some(s.reflectance)), 0.96 / 2.25, epsilon = 1e-5));
                    }
                    other => panic!("unexpected sample {:?}", other),
                }
            }
            let fraction = reflected as Float / n as Float;
            assert!((fraction - 0.04).abs() < 0.01);
        });
    }

    #[test]
    fn transmission_scales_by_relative_index() {
        with_allocators(|bxdfs, spectra| {
            let bxdf = make_specular_dielectric_bsdf(bxdfs, None, Some(&PERFECT_REFLECTOR), 1.0, 1.5).unwrap();
            let mut rng = RNG::new(19);
            let mut sampler = Sampler::new(&mut rng);

            // Entering the glass and leaving it at normal incidence.
            for (z, expected) in [(1.0, 0.96 / 2.25), (-1.0, 0.96 * 2.25)] {
                let incoming = Vector3f::new(0.0, 0.0, z);
                let mut transmitted = 0;
                for _ in 0..16 {
                    if let SampleResult::Specular(s) = bxdf.sample(&incoming, None, &incoming, &mut sampler, spectra) {
                        transmitted += 1;
                        assert_eq!(s.hemisphere, Hemisphere::Btdf);
                        assert!(approx_eq!(Float, value(Some(s.reflectance)), expected, epsilon = 1e-5));
                    }
                }
                assert!(transmitted > 0);
            }
        });
    }

    #[test]
    fn total_internal_reflection_always_reflects() {
        with_allocators(|bxdfs, spectra| {
            let bxdf = make_specular_dielectric_bsdf(
                bxdfs,
                Some(&PERFECT_REFLECTOR),
                Some(&PERFECT_REFLECTOR),
                1.0,
                1.5,
            )
            .unwrap();
            // Beyond the critical angle inside the denser medium.
            let incoming = Vector3f::new(0.9, 0.0, -0.3).normalize();
            let normal = Vector3f::new(0.0, 0.0, -1.0);
            let mut rng = RNG::new(7);
            let mut sampler = Sampler::new(&mut rng);

            for _ in 0..32 {
                match bxdf.sample(&incoming, None, &normal, &mut sampler, spectra) {
                    SampleResult::Specular(s) => {
                        assert_eq!(s.hemisphere, Hemisphere::Brdf);
                        assert!(s.direction.z < 0.0);
                    }
                    other => panic!("unexpected sample {:?}", other),
                }
            }
        });
    }

    #[test]
    fn refracted_differentials_follow_the_main_ray() {
        with_allocators(|bxdfs, spectra| {
            let bxdf = make_specular_dielectric_bsdf(bxdfs, None, Some(&PERFECT_REFLECTOR), 1.0, 1.5).unwrap();
            let incoming = Vector3f::new(0.0, 0.0, 1.0);
            let d = Differentials::new(
                Vector3f::new(0.05, 0.0, 1.0).normalize(),
                Vector3f::new(0.0, 0.05, 1.0).normalize(),
            );
            let mut rng = RNG::new(11);
            let mut sampler = Sampler::new(&mut rng);

            // Without a reflectance only refraction can be returned.
            for _ in 0..16 {
                if let SampleResult::Specular(s) = bxdf.sample(&incoming, Some(&d), &incoming, &mut sampler, spectra) {
                    assert_eq!(s.hemisphere, Hemisphere::Btdf);
                    let refracted = s.differentials.unwrap();
                    assert!(refracted.dx.z < 0.0 && refracted.dx.x < 0.0);
                    assert!(refracted.dy.z < 0.0 && refracted.dy.y < 0.0);
                }
            }
        });
    }
}
