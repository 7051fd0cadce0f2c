//! Noise and mosaic simulation applied to the reconstructed sensor image.

mod remosaic;
mod renoise;
mod simulator;
pub mod types;

pub use remosaic::remosaic;
pub use renoise::renoise;
pub use simulator::{IdentitySimulator, NoiseMosaicSimulator, SensorSimulator};
pub use types::{CfaPattern, NoiseConfig, RemosaicConfig};
