//! Probe for surface scattering models.
//!
//! Builds one scattering function per sample from a fresh arena, the way a
//! renderer does per shading point, and reports a Monte Carlo estimate of its
//! albedo for a fixed incoming direction.

#[macro_use]
extern crate log;

mod options;

use anyhow::{anyhow, bail, Context, Result};
use bxdf::geometry::*;
use bxdf::math::*;
use bxdf::memory::Arena;
use bxdf::reflection::*;
use bxdf::rng::*;
use bxdf::spectrum::*;
use clap::Parser;
use options::*;
use std::process::ExitCode;

fn main() -> ExitCode {
    // Initialize `env_logger`.
    env_logger::init();

    let options = Options::parse();
    match probe(&options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Running totals over the samples drawn.
#[derive(Debug, Default)]
struct Tally {
    /// Samples that scattered nothing.
    none: usize,

    /// Samples from pointwise-evaluable lobes.
    diffuse: usize,

    /// Samples from delta lobes.
    specular: usize,

    /// Sum of the albedo estimates.
    sum: f64,
}

/// Samples the configured model and prints the albedo estimate.
///
/// * `options` - The probe options.
fn probe(options: &Options) -> Result<()> {
    let table = match &options.fourier {
        Some(path) => Some(
            FourierTable::from_file(path)
                .with_context(|| format!("Unable to load Fourier table '{}'", path.display()))?,
        ),
        None => None,
    };
    if matches!(options.model, Model::Fourier | Model::FourierRgb) && table.is_none() {
        bail!("Model {:?} needs a table; pass --fourier <FILE>", options.model);
    }
    if options.samples == 0 {
        bail!("Nothing to do for 0 samples");
    }
    let bands = color_bands().ok_or_else(|| anyhow!("Invalid color band tables"))?;

    let elevation = options.elevation.to_radians();
    let incoming = Vector3f::new(elevation.cos(), 0.0, elevation.sin());
    let normal = Vector3f::new(0.0, 0.0, 1.0);
    debug!("Probing {:?} from {:?}", options.model, incoming);

    let mut arena = Arena::new();
    let mut rng = RNG::new(options.seed);
    let mut tally = Tally::default();

    for _ in 0..options.samples {
        {
            let bxdfs = BxdfAllocator::new(&arena);
            let spectra = SpectralAllocator::new(&arena);
            let bxdf = make_bxdf(options, table.as_ref(), &bands, &bxdfs, &spectra)
                .ok_or_else(|| anyhow!("Parameters do not describe a scattering function for {:?}", options.model))?;

            let mut sampler = Sampler::new(&mut rng);
            tally_sample(
                &mut tally,
                bxdf,
                &incoming,
                &normal,
                &mut sampler,
                &spectra,
                options.wavelength,
            );
        }
        arena.reset();
    }

    println!("model:     {:?}", options.model);
    println!("incoming:  ({:.4}, {:.4}, {:.4})", incoming.x, incoming.y, incoming.z);
    println!("samples:   {}", options.samples);
    println!("diffuse:   {}", tally.diffuse);
    println!("specular:  {}", tally.specular);
    println!("none:      {}", tally.none);
    println!("albedo:    {:.6}", tally.sum / options.samples as f64);
    Ok(())
}

/// Draws one sample and adds its contribution to `tally`.
fn tally_sample<'a>(
    tally: &mut Tally,
    bxdf: &Bxdf<'a>,
    incoming: &Vector3f,
    normal: &Vector3f,
    sampler: &mut Sampler,
    spectra: &SpectralAllocator<'a>,
    wavelength: Float,
) {
    let value = |r: Option<&dyn Reflector>| r.map_or(0.0, |r| r.reflectance(wavelength)) as f64;

    match bxdf.sample(incoming, None, normal, sampler, spectra) {
        SampleResult::None => tally.none += 1,
        SampleResult::Diffuse(sample) => {
            tally.diffuse += 1;
            let Some(hemisphere) = Hemisphere::between(incoming, &sample.direction) else {
                return;
            };
            let pdf = bxdf.pdf_diffuse(incoming, &sample.direction, hemisphere);
            if pdf > 0.0 {
                let f = value(bxdf.reflectance_diffuse(incoming, &sample.direction, hemisphere, spectra));
                tally.sum += f * abs_cos_theta(&sample.direction) as f64 / pdf as f64;
            }
        }
        SampleResult::Specular(sample) => {
            tally.specular += 1;
            tally.sum += value(Some(sample.reflectance)) / sample.pdf.unwrap_or(1.0) as f64;
        }
    }
}

/// Returns coarse red, green and blue band reflectors.
fn color_bands() -> Option<[SampledReflector; 3]> {
    let band = |values: Vec<Float>| SampledReflector::new(vec![400.0, 500.0, 600.0, 700.0], values);
    Some([
        band(vec![0.0, 0.0, 1.0, 1.0])?,
        band(vec![0.0, 1.0, 1.0, 0.0])?,
        band(vec![1.0, 1.0, 0.0, 0.0])?,
    ])
}

/// Builds the configured model, or `None` if its parameters are invalid.
fn make_bxdf<'a>(
    options: &Options,
    table: Option<&'a FourierTable>,
    bands: &'a [SampledReflector; 3],
    bxdfs: &BxdfAllocator<'a>,
    spectra: &SpectralAllocator<'a>,
) -> Option<&'a Bxdf<'a>> {
    let r = spectra.uniform(options.reflectance);
    let (roughness, remap) = (options.roughness, options.remap_roughness);
    let eta = options.eta;

    let bxdf = match options.model {
        Model::Lambertian => make_lambertian_brdf(bxdfs, r),
        Model::LambertianBtdf => make_lambertian_btdf(bxdfs, r),
        Model::OrenNayar => make_oren_nayar_brdf(bxdfs, r, options.sigma),
        Model::Conductor => {
            let eta_t: &'a dyn Spectrum = bxdfs.allocate(UniformSpectrum::new(eta)?);
            let k: &'a dyn Spectrum = bxdfs.allocate(UniformSpectrum::new(options.k)?);
            make_microfacet_conductor_brdf(bxdfs, r, None, Some(eta_t), Some(k), roughness, roughness, remap)
        }
        Model::RoughDielectric => make_microfacet_dielectric_brdf(bxdfs, r, 1.0, eta, roughness, roughness, remap),
        Model::RoughGlass => make_microfacet_dielectric_bsdf(bxdfs, r, r, 1.0, eta, roughness, roughness, remap),
        Model::AshikhminShirley => make_ashikhmin_shirley_brdf(
            bxdfs,
            r,
            spectra.uniform(options.specular),
            roughness,
            roughness,
            remap,
        ),
        Model::Plastic => {
            let coat = make_microfacet_dielectric_brdf(
                bxdfs,
                Some(&PERFECT_REFLECTOR),
                1.0,
                eta,
                roughness,
                roughness,
                remap,
            );
            make_composite_bxdf(bxdfs, &[make_lambertian_brdf(bxdfs, r), coat])
        }
        Model::Mirror => make_mirror_brdf(bxdfs, r),
        Model::Glass => make_specular_dielectric_bsdf(bxdfs, r, r, 1.0, eta),
        Model::Transparent => make_transparent_btdf(bxdfs, r),
        Model::Fourier => make_fourier_bxdf(bxdfs, table?),
        Model::FourierRgb => {
            let [red, green, blue]: [&'a dyn Reflector; 3] = [&bands[0], &bands[1], &bands[2]];
            make_fourier_bxdf_rgb(bxdfs, table?, Some(red), Some(green), Some(blue))
        }
    };

    make_attenuated_bxdf(bxdfs, bxdf, options.attenuation)
}
