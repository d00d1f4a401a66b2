//! Microfacet Transmission

use super::*;

/// Rough dielectric transmission through a surface of refracting microfacets.
#[derive(Copy, Clone, Debug)]
pub struct MicrofacetTransmission<'a> {
    /// Transmittance before Fresnel attenuation.
    transmittance: &'a dyn Reflector,

    /// Distribution of microfacet normals.
    distribution: &'a dyn MicrofacetDistribution,

    /// Fresnel policy of each microfacet.
    fresnel: FresnelDielectric,
}

impl<'a> MicrofacetTransmission<'a> {
    /// Allocate a new `MicrofacetTransmission`.
    ///
    /// * `allocator`     - The BxDF allocator.
    /// * `transmittance` - Transmittance before Fresnel attenuation.
    /// * `distribution`  - Distribution of microfacet normals.
    /// * `fresnel`       - The dielectric interface.
    pub fn alloc(
        allocator: &BxdfAllocator<'a>,
        transmittance: &'a dyn Reflector,
        distribution: &'a dyn MicrofacetDistribution,
        fresnel: FresnelDielectric,
    ) -> &'a Bxdf<'a> {
        let model = allocator.allocate(Self {
            transmittance,
            distribution,
            fresnel,
        });
        allocator.allocate(Bxdf::MicrofacetTransmission(model))
    }

    /// Returns the ratio of the index on the far side of `w` over the index
    /// on its own side.
    fn eta_across(&self, w: &Vector3f) -> Float {
        if cos_theta(w) > 0.0 {
            self.fresnel.eta_t() / self.fresnel.eta_i()
        } else {
            self.fresnel.eta_i() / self.fresnel.eta_t()
        }
    }

    /// Returns the generalized half vector of a refraction pair, oriented
    /// towards +z, or `None` if the pair cannot come from a single
    /// microfacet.
    fn half_vector(&self, incoming: &Vector3f, outgoing: &Vector3f) -> Option<(Vector3f, Float)> {
        let eta = self.eta_across(incoming);
        let wh = *incoming + *outgoing * eta;
        if wh.is_zero() {
            return None;
        }
        let wh = wh.normalize();
        let wh = if wh.z < 0.0 { -wh } else { wh };

        if incoming.dot(&wh) * outgoing.dot(&wh) > 0.0 {
            None
        } else {
            Some((wh, eta))
        }
    }

    /// Samples a visible microfacet normal and refracts through it. Draws two
    /// sample values.
    ///
    /// * `incoming` - The incoming direction.
    /// * `sampler`  - Source of sample values.
    pub fn sample(&self, incoming: &Vector3f, sampler: &mut Sampler) -> Option<Vector3f> {
        if incoming.z == 0.0 {
            return None;
        }

        let wh = self.distribution.sample_wh(incoming, &sampler.next_2d());
        if incoming.dot(&wh) < 0.0 {
            return None;
        }

        let outgoing = refract(incoming, &wh, 1.0 / self.eta_across(incoming))?;
        if same_hemisphere(incoming, &outgoing) || outgoing.z == 0.0 {
            None
        } else {
            Some(outgoing)
        }
    }

    /// Returns the density of sampling `outgoing`.
    ///
    /// * `incoming`   - The incoming direction.
    /// * `outgoing`   - The scattered direction.
    /// * `hemisphere` - The hemisphere being queried.
    pub fn pdf(&self, incoming: &Vector3f, outgoing: &Vector3f, hemisphere: Hemisphere) -> Float {
        if hemisphere != Hemisphere::Btdf {
            return 0.0;
        }

        let Some((wh, eta)) = self.half_vector(incoming, outgoing) else {
            return 0.0;
        };

        let sqrt_denom = incoming.dot(&wh) + eta * outgoing.dot(&wh);
        if sqrt_denom == 0.0 {
            return 0.0;
        }
        let dwh_dwo = abs((eta * eta * outgoing.dot(&wh)) / (sqrt_denom * sqrt_denom));
        self.distribution.pdf(incoming, &wh) * dwh_dwo
    }

    /// Returns the transmittance for a pair of directions.
    ///
    /// * `incoming`   - The incoming direction.
    /// * `outgoing`   - The scattered direction.
    /// * `hemisphere` - The hemisphere being queried.
    /// * `allocator`  - The spectral allocator.
    pub fn reflectance(
        &self,
        incoming: &Vector3f,
        outgoing: &Vector3f,
        hemisphere: Hemisphere,
        allocator: &SpectralAllocator<'a>,
    ) -> Option<&'a dyn Reflector> {
        if hemisphere != Hemisphere::Btdf {
            return None;
        }

        let cos_theta_i = cos_theta(incoming);
        let cos_theta_o = cos_theta(outgoing);
        if cos_theta_i == 0.0 || cos_theta_o == 0.0 {
            return None;
        }

        let (wh, eta) = self.half_vector(incoming, outgoing)?;
        let sqrt_denom = incoming.dot(&wh) + eta * outgoing.dot(&wh);
        if sqrt_denom == 0.0 {
            return None;
        }

        let attenuated = Fresnel::Dielectric(self.fresnel).attenuate_transmittance(
            Some(self.transmittance),
            incoming.dot(&wh),
            allocator,
        );

        // Radiance is compressed by η² when it crosses into the denser side.
        let factor = 1.0 / eta;
        let scale = abs(self.distribution.d(&wh)
            * self.distribution.g(incoming, outgoing)
            * eta
            * eta
            * outgoing.abs_dot(&wh)
            * incoming.abs_dot(&wh)
            * factor
            * factor
            / (cos_theta_i * cos_theta_o * sqrt_denom * sqrt_denom));
        allocator.unbounded_scale(attenuated, scale)
    }
}

/// Returns a rough dielectric BTDF, or `None` if `transmittance` is absent,
/// an index of refraction is below 1 or not finite, or a roughness is not
/// finite.
///
/// * `allocator`       - The BxDF allocator.
/// * `transmittance`   - Transmittance before Fresnel attenuation.
/// * `eta_i`           - Index of refraction on the +z side.
/// * `eta_t`           - Index of refraction on the -z side.
/// * `roughness_x`     - Roughness along x.
/// * `roughness_y`     - Roughness along y.
/// * `remap_roughness` - Whether to map perceptual roughness to alpha.
pub fn make_microfacet_dielectric_btdf<'a>(
    allocator: &BxdfAllocator<'a>,
    transmittance: Option<&'a dyn Reflector>,
    eta_i: Float,
    eta_t: Float,
    roughness_x: Float,
    roughness_y: Float,
    remap_roughness: bool,
) -> Option<&'a Bxdf<'a>> {
    let transmittance = transmittance?;
    let Some(fresnel) = FresnelDielectric::new(eta_i, eta_t) else {
        debug!("Rejecting dielectric eta ({}, {})", eta_i, eta_t);
        return None;
    };
    let distribution = alloc_distribution(allocator, roughness_x, roughness_y, remap_roughness)?;
    Some(MicrofacetTransmission::alloc(allocator, transmittance, distribution, fresnel))
}

/// Returns a rough dielectric with both reflection and transmission, or
/// `None` if both reflectances are absent or the parameters are invalid.
/// When only one of the two survives, it is returned on its own.
///
/// * `allocator`       - The BxDF allocator.
/// * `reflectance`     - Reflectance before Fresnel attenuation.
/// * `transmittance`   - Transmittance before Fresnel attenuation.
/// * `eta_i`           - Index of refraction on the +z side.
/// * `eta_t`           - Index of refraction on the -z side.
/// * `roughness_x`     - Roughness along x.
/// * `roughness_y`     - Roughness along y.
/// * `remap_roughness` - Whether to map perceptual roughness to alpha.
#[allow(clippy::too_many_arguments)]
pub fn make_microfacet_dielectric_bsdf<'a>(
    allocator: &BxdfAllocator<'a>,
    reflectance: Option<&'a dyn Reflector>,
    transmittance: Option<&'a dyn Reflector>,
    eta_i: Float,
    eta_t: Float,
    roughness_x: Float,
    roughness_y: Float,
    remap_roughness: bool,
) -> Option<&'a Bxdf<'a>> {
    let brdf = make_microfacet_dielectric_brdf(
        allocator,
        reflectance,
        eta_i,
        eta_t,
        roughness_x,
        roughness_y,
        remap_roughness,
    );
    let btdf = make_microfacet_dielectric_btdf(
        allocator,
        transmittance,
        eta_i,
        eta_t,
        roughness_x,
        roughness_y,
        remap_roughness,
    );
    make_composite_bxdf(allocator, &[brdf, btdf])
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflection::tests::{value, with_allocators};
    use crate::rng::RNG;

    #[test]
    fn rejects_invalid_input() {
        with_allocators(|bxdfs, spectra| {
            let t = spectra.uniform(1.0);
            assert!(make_microfacet_dielectric_btdf(bxdfs, None, 1.0, 1.5, 0.2, 0.2, false).is_none());
            assert!(make_microfacet_dielectric_btdf(bxdfs, t, 1.0, 0.5, 0.2, 0.2, false).is_none());
            assert!(make_microfacet_dielectric_bsdf(bxdfs, None, None, 1.0, 1.5, 0.2, 0.2, false).is_none());
        });
    }

    #[test]
    fn bsdf_with_one_side_is_that_side() {
        with_allocators(|bxdfs, spectra| {
            let bsdf = make_microfacet_dielectric_bsdf(bxdfs, None, spectra.uniform(1.0), 1.0, 1.5, 0.2, 0.2, false)
                .unwrap();
            assert!(matches!(bsdf, Bxdf::MicrofacetTransmission(_)));

            let both = make_microfacet_dielectric_bsdf(
                bxdfs,
                spectra.uniform(1.0),
                spectra.uniform(1.0),
                1.0,
                1.5,
                0.2,
                0.2,
                false,
            )
            .unwrap();
            assert!(matches!(both, Bxdf::Composite(_)));
        });
    }

    #[test]
    fn samples_transmit_with_positive_pdf() {
        with_allocators(|bxdfs, spectra| {
            let bxdf =
                make_microfacet_dielectric_btdf(bxdfs, spectra.uniform(1.0), 1.0, 1.5, 0.3, 0.3, false).unwrap();
            let normal = Vector3f::new(0.0, 0.0, 1.0);
            let mut rng = RNG::new(5);
            let mut sampler = Sampler::new(&mut rng);

            for incoming in [Vector3f::new(0.3, 0.2, 0.9).normalize(), Vector3f::new(0.1, -0.2, -0.9).normalize()] {
                let mut hits = 0;
                for _ in 0..32 {
                    if let Some(outgoing) = bxdf.sample(&incoming, None, &normal, &mut sampler, spectra).direction() {
                        hits += 1;
                        assert!(outgoing.z * incoming.z < 0.0);
                        assert!(bxdf.pdf_diffuse(&incoming, &outgoing, Hemisphere::Btdf) > 0.0);
                        let t = value(bxdf.reflectance_diffuse(&incoming, &outgoing, Hemisphere::Btdf, spectra));
                        assert!(t > 0.0 && t.is_finite());
                    }
                }
                assert!(hits > 0);
            }
        });
    }

    #[test]
    fn reflection_is_zero() {
        with_allocators(|bxdfs, spectra| {
            let bxdf =
                make_microfacet_dielectric_btdf(bxdfs, spectra.uniform(1.0), 1.0, 1.5, 0.3, 0.3, false).unwrap();
            let incoming = Vector3f::new(0.0, 0.0, 1.0);
            let outgoing = Vector3f::new(0.6, 0.0, 0.8);
            assert_eq!(bxdf.pdf_diffuse(&incoming, &outgoing, Hemisphere::Brdf), 0.0);
            assert!(bxdf.reflectance_diffuse(&incoming, &outgoing, Hemisphere::Brdf, spectra).is_none());
        });
    }
}
