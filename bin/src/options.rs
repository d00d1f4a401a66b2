//! Command line options

use bxdf::math::Float;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Scattering models the probe can build.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Model {
    Lambertian,
    LambertianBtdf,
    OrenNayar,
    Conductor,
    RoughDielectric,
    RoughGlass,
    AshikhminShirley,
    Plastic,
    Mirror,
    Glass,
    Transparent,
    Fourier,
    FourierRgb,
}

/// Probe options.
#[derive(Parser, Clone, Debug)]
#[command(author, version, about = "Estimates the albedo of a surface scattering model.", long_about = None)]
pub struct Options {
    /// The scattering model.
    #[arg(long, short = 'm', value_enum, default_value_t = Model::Lambertian)]
    pub model: Model,

    /// Uniform reflectance (and transmittance) of the model.
    #[arg(long, short = 'r', value_name = "FLOAT", default_value_t = 0.5)]
    pub reflectance: Float,

    /// Uniform reflectance of the Ashikhmin-Shirley coating.
    #[arg(long, value_name = "FLOAT", default_value_t = 0.04)]
    pub specular: Float,

    /// Microfacet roughness, used for both directions.
    #[arg(long, value_name = "FLOAT", default_value_t = 0.3)]
    pub roughness: Float,

    /// Map perceptual roughness to the distribution's alpha.
    #[arg(long)]
    pub remap_roughness: bool,

    /// Oren-Nayar facet slope deviation in degrees.
    #[arg(long, value_name = "DEGREES", default_value_t = 20.0)]
    pub sigma: Float,

    /// Index of refraction below the surface.
    #[arg(long, value_name = "FLOAT", default_value_t = 1.5)]
    pub eta: Float,

    /// Conductor absorption coefficient.
    #[arg(long, value_name = "FLOAT", default_value_t = 3.0)]
    pub k: Float,

    /// Scale applied to every reflectance of the model.
    #[arg(long, value_name = "FLOAT", default_value_t = 1.0)]
    pub attenuation: Float,

    /// Elevation of the incoming direction above the tangent plane in
    /// degrees; negative values are below the surface.
    #[arg(long, short = 'e', value_name = "DEGREES", default_value_t = 45.0, allow_hyphen_values = true)]
    pub elevation: Float,

    /// Number of samples to draw.
    #[arg(long, short = 'n', value_name = "NUM", default_value_t = 10_000)]
    pub samples: usize,

    /// Random sequence index.
    #[arg(long, short = 's', value_name = "NUM", default_value_t = 0)]
    pub seed: u64,

    /// Wavelength in nanometers at which reflectances are reported.
    #[arg(long, short = 'w', value_name = "NM", default_value_t = 550.0)]
    pub wavelength: Float,

    /// Measured Fourier table for the `fourier` models.
    #[arg(long, short = 'f', value_name = "FILE")]
    pub fourier: Option<PathBuf>,
}
