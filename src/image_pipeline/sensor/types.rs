//! Sensor simulation configuration types

/// Colour filter array layout, named by the top-left 2x2 tile read row by row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CfaPattern {
    #[default]
    Rggb,
    Bggr,
    Grbg,
    Gbrg,
}

impl CfaPattern {
    /// Channel (0 = R, 1 = G, 2 = B) sampled by the filter at `(x, y)`.
    #[inline]
    pub fn channel_at(self, x: usize, y: usize) -> usize {
        let tile = match self {
            CfaPattern::Rggb => [[0, 1], [1, 2]],
            CfaPattern::Bggr => [[2, 1], [1, 0]],
            CfaPattern::Grbg => [[1, 0], [2, 1]],
            CfaPattern::Gbrg => [[1, 2], [0, 1]],
        };
        tile[y & 1][x & 1]
    }

    pub(crate) fn to_bayer(self) -> bayer::CFA {
        match self {
            CfaPattern::Rggb => bayer::CFA::RGGB,
            CfaPattern::Bggr => bayer::CFA::BGGR,
            CfaPattern::Grbg => bayer::CFA::GRBG,
            CfaPattern::Gbrg => bayer::CFA::GBRG,
        }
    }
}

/// Additive Gaussian sensor noise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseConfig {
    /// Standard deviation in normalized `[0, 1]` units
    pub sigma: f32,
    /// Base seed; each image derives its own stream from it
    pub seed: u64,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            sigma: 0.01,
            seed: 0,
        }
    }
}

/// Colour-filter-array resampling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemosaicConfig {
    pub cfa: CfaPattern,
    /// Re-interpolate full RGB after sampling (linear demosaic)
    pub demosaic: bool,
}
