//! Ashikhmin-Shirley Glossy Reflection

use super::*;
use crate::sampling::*;

/// BRDF for layered surfaces such as varnished wood: a diffuse substrate
/// under a glossy coating whose Fresnel term follows Schlick's approximation.
#[derive(Copy, Clone, Debug)]
pub struct AshikhminShirley<'a> {
    /// Reflectance of the diffuse substrate.
    diffuse: Option<&'a dyn Reflector>,

    /// Reflectance of the coating at normal incidence.
    specular: Option<&'a dyn Reflector>,

    /// Distribution of coating microfacet normals.
    distribution: &'a dyn MicrofacetDistribution,
}

impl<'a> AshikhminShirley<'a> {
    /// Allocate a new `AshikhminShirley`.
    ///
    /// * `allocator`    - The BxDF allocator.
    /// * `diffuse`      - Reflectance of the diffuse substrate.
    /// * `specular`     - Reflectance of the coating at normal incidence.
    /// * `distribution` - Distribution of coating microfacet normals.
    pub fn alloc(
        allocator: &BxdfAllocator<'a>,
        diffuse: Option<&'a dyn Reflector>,
        specular: Option<&'a dyn Reflector>,
        distribution: &'a dyn MicrofacetDistribution,
    ) -> &'a Bxdf<'a> {
        let model = allocator.allocate(Self {
            diffuse,
            specular,
            distribution,
        });
        allocator.allocate(Bxdf::AshikhminShirley(model))
    }

    /// Samples either the substrate or the coating with equal probability.
    /// Draws two sample values; the first picks the lobe and is then reused.
    ///
    /// * `incoming` - The incoming direction.
    /// * `sampler`  - Source of sample values.
    pub fn sample(&self, incoming: &Vector3f, sampler: &mut Sampler) -> Option<Vector3f> {
        if incoming.z == 0.0 {
            return None;
        }

        let mut u = sampler.next_2d();
        if u.x < 0.5 {
            u.x = min(2.0 * u.x, ONE_MINUS_EPSILON);

            let mut outgoing = cosine_sample_hemisphere(&u);
            if incoming.z < 0.0 {
                outgoing.z = -outgoing.z;
            }
            Some(outgoing)
        } else {
            u.x = min(2.0 * (u.x - 0.5), ONE_MINUS_EPSILON);

            let wh = self.distribution.sample_wh(incoming, &u);
            let outgoing = reflect(incoming, &wh);
            if same_hemisphere(incoming, &outgoing) {
                Some(outgoing)
            } else {
                None
            }
        }
    }

    /// Returns the even mixture of the cosine and half-vector densities.
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

        let cos_h = incoming.dot(&wh);
        let pdf_wh = if cos_h == 0.0 {
            0.0
        } else {
            self.distribution.pdf(incoming, &wh) / (4.0 * cos_h)
        };
        0.5 * (abs_cos_theta(outgoing) * INV_PI + pdf_wh)
    }

    /// Returns the sum of the substrate and coating terms.
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
        if wh.is_zero() {
            return None;
        }
        let wh = wh.normalize();

        let diffuse_scale = (28.0 / (23.0 * PI))
            * (1.0 - pow5(1.0 - 0.5 * cos_theta_o))
            * (1.0 - pow5(1.0 - 0.5 * cos_theta_i));
        let diffuse = allocator.scale(
            allocator.scale_reflectors(self.diffuse, allocator.invert(self.specular)),
            diffuse_scale,
        );

        let cos_h = outgoing.abs_dot(&wh);
        let denom = 4.0 * cos_h * max(cos_theta_i, cos_theta_o);
        let specular = if denom == 0.0 {
            None
        } else {
            let schlick = allocator.add(
                self.specular,
                allocator.scale(allocator.invert(self.specular), pow5(1.0 - cos_h)),
            );
            allocator.unbounded_scale(schlick, self.distribution.d(&wh) / denom)
        };

        allocator.unbounded_add(diffuse, specular)
    }
}

/// Returns an Ashikhmin-Shirley BRDF, or `None` if both reflectances are
/// absent or a roughness is not finite.
///
/// * `allocator`       - The BxDF allocator.
/// * `diffuse`         - Reflectance of the diffuse substrate.
/// * `specular`        - Reflectance of the coating at normal incidence.
/// * `roughness_x`     - Roughness along x.
/// * `roughness_y`     - Roughness along y.
/// * `remap_roughness` - Whether to map perceptual roughness to alpha.
pub fn make_ashikhmin_shirley_brdf<'a>(
    allocator: &BxdfAllocator<'a>,
    diffuse: Option<&'a dyn Reflector>,
    specular: Option<&'a dyn Reflector>,
    roughness_x: Float,
    roughness_y: Float,
    remap_roughness: bool,
) -> Option<&'a Bxdf<'a>> {
    if diffuse.is_none() && specular.is_none() {
        return None;
    }
    let distribution = alloc_distribution(allocator, roughness_x, roughness_y, remap_roughness)?;
    Some(AshikhminShirley::alloc(allocator, diffuse, specular, distribution))
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
