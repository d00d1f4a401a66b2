//! Microfacet Reflection

use super::*;

/// Glossy reflection from a surface of mirror microfacets.
#[derive(Copy, Clone, Debug)]
pub struct MicrofacetReflection<'a> {
    /// Reflectance before Fresnel attenuation.
    reflectance: &'a dyn Reflector,

    /// Distribution of microfacet normals.
    distribution: &'a dyn MicrofacetDistribution,

    /// Fresnel policy of each microfacet.
    fresnel: Fresnel<'a>,
}

impl<'a> MicrofacetReflection<'a> {
    /// Allocate a new `MicrofacetReflection`.
    ///
    /// * `allocator`    - The BxDF allocator.
    /// * `reflectance`  - Reflectance before Fresnel attenuation.
    /// * `distribution` - Distribution of microfacet normals.
    /// * `fresnel`      - Fresnel policy of each microfacet.
    pub fn alloc(
        allocator: &BxdfAllocator<'a>,
        reflectance: &'a dyn Reflector,
        distribution: &'a dyn MicrofacetDistribution,
        fresnel: Fresnel<'a>,
    ) -> &'a Bxdf<'a> {
        let model = allocator.allocate(Self {
            reflectance,
            distribution,
            fresnel,
        });
        allocator.allocate(Bxdf::MicrofacetReflection(model))
    }

    /// Samples a visible microfacet normal and reflects about it. Draws two
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

        let outgoing = reflect(incoming, &wh);
        if same_hemisphere(incoming, &outgoing) {
            Some(outgoing)
        } else {
            None
        }
    }

    /// Returns the density of sampling `outgoing`.
    ///
    /// * `incoming`   - The incoming direction.
    /// * `outgoing`   - The scattered direction.
    /// * `hemisphere` - The hemisphere being queried.
    pub fn pdf(&self, incoming: &Vector3f, outgoing: &Vector3f, hemisphere: Hemisphere) -> Float {
        if hemisphere != Hemisphere::Brdf {
            return 0.0;
        }

        let wh = *incoming + *outgoing;
        if wh.is_zero() {
            return 0.0;
        }
        let wh = wh.normalize();

        let cos = incoming.abs_dot(&wh);
        if cos == 0.0 {
            0.0
        } else {
            self.distribution.pdf(incoming, &wh) / (4.0 * cos)
        }
    }

    /// Returns the reflectance D·G·F·R / (4 cos θi cos θo).
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
        if hemisphere != Hemisphere::Brdf {
            return None;
        }

        let cos_theta_i = abs_cos_theta(incoming);
        let cos_theta_o = abs_cos_theta(outgoing);
        let wh = *incoming + *outgoing;
        if cos_theta_i == 0.0 || cos_theta_o == 0.0 || wh.is_zero() {
            return None;
        }
        let wh = wh.normalize();

        // Orient the half vector with the normal so total internal reflection
        // is detected on the correct side.
        let cos_h = outgoing.dot(&wh.face_forward(&Vector3f::new(0.0, 0.0, 1.0)));
        let attenuated = self
            .fresnel
            .attenuate_reflectance(Some(self.reflectance), cos_h, allocator);

        let scale = self.distribution.d(&wh) * self.distribution.g(incoming, outgoing)
            / (4.0 * cos_theta_i * cos_theta_o);
        allocator.unbounded_scale(attenuated, scale)
    }
}

/// Returns a rough conductor BRDF, or `None` if `reflectance` is absent or a
/// roughness is not finite.
///
/// * `allocator`       - The BxDF allocator.
/// * `reflectance`     - Reflectance before Fresnel attenuation.
/// * `eta_i`           - Index of refraction of the incident medium.
/// * `eta_t`           - Index of refraction of the conductor.
/// * `k`               - Absorption coefficient of the conductor.
/// * `roughness_x`     - Roughness along x.
/// * `roughness_y`     - Roughness along y.
/// * `remap_roughness` - Whether to map perceptual roughness to alpha.
#[allow(clippy::too_many_arguments)]
pub fn make_microfacet_conductor_brdf<'a>(
    allocator: &BxdfAllocator<'a>,
    reflectance: Option<&'a dyn Reflector>,
    eta_i: Option<&'a dyn Spectrum>,
    eta_t: Option<&'a dyn Spectrum>,
    k: Option<&'a dyn Spectrum>,
    roughness_x: Float,
    roughness_y: Float,
    remap_roughness: bool,
) -> Option<&'a Bxdf<'a>> {
    let reflectance = reflectance?;
    let distribution = alloc_distribution(allocator, roughness_x, roughness_y, remap_roughness)?;
    let fresnel = Fresnel::Conductor(FresnelConductor::new(eta_i, eta_t, k));
    Some(MicrofacetReflection::alloc(allocator, reflectance, distribution, fresnel))
}

/// Returns a rough dielectric BRDF, or `None` if `reflectance` is absent, an
/// index of refraction is below 1 or not finite, or a roughness is not
/// finite.
///
/// * `allocator`       - The BxDF allocator.
/// * `reflectance`     - Reflectance before Fresnel attenuation.
/// * `eta_i`           - Index of refraction on the +z side.
/// * `eta_t`           - Index of refraction on the -z side.
/// * `roughness_x`     - Roughness along x.
/// * `roughness_y`     - Roughness along y.
/// * `remap_roughness` - Whether to map perceptual roughness to alpha.
pub fn make_microfacet_dielectric_brdf<'a>(
    allocator: &BxdfAllocator<'a>,
    reflectance: Option<&'a dyn Reflector>,
    eta_i: Float,
    eta_t: Float,
    roughness_x: Float,
    roughness_y: Float,
    remap_roughness: bool,
) -> Option<&'a Bxdf<'a>> {
    let reflectance = reflectance?;
    let Some(fresnel) = FresnelDielectric::new(eta_i, eta_t) else {
        debug!("Rejecting dielectric eta ({}, {})", eta_i, eta_t);
        return None;
    };
    let distribution = alloc_distribution(allocator, roughness_x, roughness_y, remap_roughness)?;
    Some(MicrofacetReflection::alloc(
        allocator,
        reflectance,
        distribution,
        Fresnel::Dielectric(fresnel),
    ))
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
