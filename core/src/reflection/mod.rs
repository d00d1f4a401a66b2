//! Reflection and surface scattering models
//!
//! Every direction is expressed in the shading frame where +z is the
//! macroscopic normal. Both the incoming direction and the sampled direction
//! point away from the surface, so reflection keeps the sign of z and
//! transmission flips it.

use crate::geometry::*;
use crate::math::*;
use crate::microfacet::*;
use crate::rng::Sampler;
use crate::spectrum::*;

mod allocator;
mod ashikhmin_shirley;
mod attenuated;
mod bxdf_sample;
mod common;
mod composite;
mod fourier_bxdf;
mod fourier_reader;
mod fourier_table;
mod fresnel;
mod lambertian;
mod microfacet_reflection;
mod microfacet_transmission;
mod oren_nayar;
mod specular_dielectric;
mod specular_reflection;
mod transparent;

// Re-export
pub use allocator::*;
pub use ashikhmin_shirley::*;
pub use attenuated::*;
pub use bxdf_sample::*;
pub use common::*;
pub use composite::*;
pub use fourier_bxdf::*;
pub use fourier_table::*;
pub use fresnel::*;
pub use lambertian::*;
pub use microfacet_reflection::*;
pub use microfacet_transmission::*;
pub use oren_nayar::*;
pub use specular_dielectric::*;
pub use specular_reflection::*;
pub use transparent::*;

/// A scattering function allocated in an arena.
///
/// Models are either diffuse (pointwise evaluable through `pdf_diffuse()` and
/// `reflectance_diffuse()`) or specular (delta lobes that can only be
/// sampled). Combinators wrap other handles.
#[derive(Copy, Clone, Debug)]
pub enum Bxdf<'a> {
    AshikhminShirley(&'a AshikhminShirley<'a>),
    Attenuated(&'a Attenuated<'a>),
    Composite(&'a Composite<'a>),
    Fourier(&'a FourierBxdf<'a>),
    Lambertian(&'a Lambertian<'a>),
    MicrofacetReflection(&'a MicrofacetReflection<'a>),
    MicrofacetTransmission(&'a MicrofacetTransmission<'a>),
    OrenNayar(&'a OrenNayar<'a>),
    SpecularDielectric(&'a SpecularDielectric<'a>),
    SpecularReflection(&'a SpecularReflection<'a>),
    Transparent(&'a Transparent<'a>),
}

impl<'a> Bxdf<'a> {
    /// Returns the probability weight for choosing this function's diffuse
    /// lobes in a mixture, or `None` if it has no diffuse lobes.
    pub fn diffuse_pdf(&self) -> Option<Float> {
        match self {
            // Half of its samples come from the glossy lobe.
            Self::AshikhminShirley(_) => Some(0.5),
            Self::Fourier(_)
            | Self::Lambertian(_)
            | Self::MicrofacetReflection(_)
            | Self::MicrofacetTransmission(_)
            | Self::OrenNayar(_) => Some(1.0),
            Self::SpecularDielectric(_) | Self::SpecularReflection(_) | Self::Transparent(_) => None,
            Self::Attenuated(bxdf) => bxdf.diffuse_pdf(),
            Self::Composite(bxdf) => bxdf.diffuse_pdf(),
        }
    }

    /// Returns true if `pdf_diffuse()` and `reflectance_diffuse()` are
    /// meaningful.
    pub fn is_diffuse(&self) -> bool {
        self.diffuse_pdf().is_some()
    }

    /// Samples a scattered direction.
    ///
    /// Results whose side relative to `surface_normal` disagrees with their
    /// side relative to the shading normal are discarded.
    ///
    /// * `incoming`       - The incoming direction.
    /// * `differentials`  - Optional directions of offset rays.
    /// * `surface_normal` - Geometric normal in the shading frame.
    /// * `sampler`        - Source of sample values.
    /// * `allocator`      - The spectral allocator.
    pub fn sample(
        &self,
        incoming: &Vector3f,
        differentials: Option<&Differentials>,
        surface_normal: &Vector3f,
        sampler: &mut Sampler,
        allocator: &SpectralAllocator<'a>,
    ) -> SampleResult<'a> {
        let result = self.sample_unchecked(incoming, differentials, sampler, allocator);

        let (direction, hemisphere) = match &result {
            SampleResult::None => return result,
            SampleResult::Diffuse(s) => (s.direction, Hemisphere::between(incoming, &s.direction)),
            SampleResult::Specular(s) => (s.direction, Some(s.hemisphere)),
        };

        let geometric =
            Hemisphere::from_cosines(incoming.dot(surface_normal), direction.dot(surface_normal));
        if hemisphere.is_some() && hemisphere == geometric {
            result
        } else {
            SampleResult::None
        }
    }

    /// Samples a scattered direction without checking it against the
    /// geometric normal.
    pub(crate) fn sample_unchecked(
        &self,
        incoming: &Vector3f,
        differentials: Option<&Differentials>,
        sampler: &mut Sampler,
        allocator: &SpectralAllocator<'a>,
    ) -> SampleResult<'a> {
        match self {
            Self::SpecularDielectric(bxdf) => bxdf.sample(incoming, differentials, sampler, allocator).into(),
            Self::SpecularReflection(bxdf) => bxdf.sample(incoming, differentials).into(),
            Self::Transparent(bxdf) => bxdf.sample(incoming, differentials).into(),
            Self::Attenuated(bxdf) => bxdf.sample(incoming, differentials, sampler, allocator),
            Self::Composite(bxdf) => bxdf.sample(incoming, differentials, sampler, allocator),
            _ => self.sample_diffuse(incoming, sampler, allocator).into(),
        }
    }

    /// Samples a direction from the diffuse lobes only. Returns `None` for
    /// specular functions.
    ///
    /// * `incoming`  - The incoming direction.
    /// * `sampler`   - Source of sample values.
    /// * `allocator` - The spectral allocator.
    pub fn sample_diffuse(
        &self,
        incoming: &Vector3f,
        sampler: &mut Sampler,
        allocator: &SpectralAllocator<'a>,
    ) -> Option<Vector3f> {
        match self {
            Self::AshikhminShirley(bxdf) => bxdf.sample(incoming, sampler),
            Self::Fourier(bxdf) => bxdf.sample(incoming, sampler, allocator),
            Self::Lambertian(bxdf) => bxdf.sample(incoming, sampler),
            Self::MicrofacetReflection(bxdf) => bxdf.sample(incoming, sampler),
            Self::MicrofacetTransmission(bxdf) => bxdf.sample(incoming, sampler),
            Self::OrenNayar(bxdf) => bxdf.sample(incoming, sampler),
            Self::SpecularDielectric(_) | Self::SpecularReflection(_) | Self::Transparent(_) => None,
            Self::Attenuated(bxdf) => bxdf.bxdf().sample_diffuse(incoming, sampler, allocator),
            Self::Composite(bxdf) => bxdf.sample_diffuse(incoming, sampler, allocator),
        }
    }

    /// Returns the density of sampling `outgoing` from the diffuse lobes.
    /// Zero unless `hemisphere` matches the actual sides of the two
    /// directions.
    ///
    /// * `incoming`   - The incoming direction.
    /// * `outgoing`   - The scattered direction.
    /// * `hemisphere` - The hemisphere being queried.
    pub fn pdf_diffuse(&self, incoming: &Vector3f, outgoing: &Vector3f, hemisphere: Hemisphere) -> Float {
        if Hemisphere::between(incoming, outgoing) != Some(hemisphere) {
            return 0.0;
        }

        match self {
            Self::AshikhminShirley(bxdf) => bxdf.pdf(incoming, outgoing, hemisphere),
            Self::Fourier(bxdf) => bxdf.pdf(incoming, outgoing, hemisphere),
            Self::Lambertian(bxdf) => bxdf.pdf(incoming, outgoing, hemisphere),
            Self::MicrofacetReflection(bxdf) => bxdf.pdf(incoming, outgoing, hemisphere),
            Self::MicrofacetTransmission(bxdf) => bxdf.pdf(incoming, outgoing, hemisphere),
            Self::OrenNayar(bxdf) => bxdf.pdf(incoming, outgoing, hemisphere),
            Self::SpecularDielectric(_) | Self::SpecularReflection(_) | Self::Transparent(_) => 0.0,
            Self::Attenuated(bxdf) => bxdf.bxdf().pdf_diffuse(incoming, outgoing, hemisphere),
            Self::Composite(bxdf) => bxdf.pdf_diffuse(incoming, outgoing, hemisphere),
        }
    }

    /// Returns the reflectance of the diffuse lobes for a pair of directions.
    /// Absent unless `hemisphere` matches the actual sides of the two
    /// directions.
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
        if Hemisphere::between(incoming, outgoing) != Some(hemisphere) {
            return None;
        }

        match self {
            Self::AshikhminShirley(bxdf) => bxdf.reflectance(incoming, outgoing, hemisphere, allocator),
            Self::Fourier(bxdf) => bxdf.reflectance(incoming, outgoing, hemisphere, allocator),
            Self::Lambertian(bxdf) => bxdf.reflectance(incoming, outgoing, hemisphere, allocator),
            Self::MicrofacetReflection(bxdf) => bxdf.reflectance(incoming, outgoing, hemisphere, allocator),
            Self::MicrofacetTransmission(bxdf) => bxdf.reflectance(incoming, outgoing, hemisphere, allocator),
            Self::OrenNayar(bxdf) => bxdf.reflectance(incoming, outgoing, hemisphere, allocator),
            Self::SpecularDielectric(_) | Self::SpecularReflection(_) | Self::Transparent(_) => None,
            Self::Attenuated(bxdf) => bxdf.reflectance_diffuse(incoming, outgoing, hemisphere, allocator),
            Self::Composite(bxdf) => bxdf.reflectance_diffuse(incoming, outgoing, hemisphere, allocator),
        }
    }
}

/// Allocates a Trowbridge-Reitz distribution for a pair of roughness values.
/// Returns `None` if either roughness is not finite.
///
/// * `allocator`       - The BxDF allocator.
/// * `roughness_x`     - Roughness along x.
/// * `roughness_y`     - Roughness along y.
/// * `remap_roughness` - Whether to map perceptual roughness to alpha.
pub(crate) fn alloc_distribution<'a>(
    allocator: &BxdfAllocator<'a>,
    roughness_x: Float,
    roughness_y: Float,
    remap_roughness: bool,
) -> Option<&'a dyn MicrofacetDistribution> {
    if !roughness_x.is_finite() || !roughness_y.is_finite() {
        debug!("Rejecting roughness ({}, {})", roughness_x, roughness_y);
        return None;
    }

    let (alpha_x, alpha_y) = if remap_roughness {
        (
            TrowbridgeReitzDistribution::roughness_to_alpha(roughness_x),
            TrowbridgeReitzDistribution::roughness_to_alpha(roughness_y),
        )
    } else {
        (roughness_x, roughness_y)
    };

    let distribution: &'a TrowbridgeReitzDistribution =
        allocator.allocate(TrowbridgeReitzDistribution::new(alpha_x, alpha_y));
    Some(distribution)
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
