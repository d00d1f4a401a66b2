//! Random Number Generation and Sampling

mod pcg;
mod sampler;

// Re-export
pub use pcg::*;
pub use sampler::*;
