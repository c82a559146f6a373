use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, ensure_finite};
use crate::landmap::LandMap;
use crate::shader::{fract, hash1, lerp};

const START_AMPLITUDE: f64 = 0.5;

/// Fractal Brownian motion over a hashed value-noise lattice.
///
/// Each round samples the lattice at the current frequency, then scales the
/// coordinates by `lacunarity` and the amplitude by `gain`. The result is
/// added to the grid; it does not depend on the random source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FractalBrownianMotion {
    pub octaves: u32,
    pub lacunarity: f32,
    pub gain: f32,
}

impl Default for FractalBrownianMotion {
    fn default() -> Self {
        Self {
            octaves: 6,
            lacunarity: 2.0,
            gain: 0.5,
        }
    }
}

impl FractalBrownianMotion {
    pub fn new(octaves: u32, lacunarity: f32, gain: f32) -> Result<Self> {
        let fbm = Self {
            octaves,
            lacunarity,
            gain,
        };
        fbm.validate()?;
        Ok(fbm)
    }

    pub fn validate(&self) -> Result<()> {
        ensure_finite("lacunarity", self.lacunarity)?;
        ensure_finite("gain", self.gain)
    }

    // Bilinear value noise with a cubic Hermite blend between lattice corners
    fn value_noise(x: f64, y: f64) -> f64 {
        let (ix, iy) = (x.floor(), y.floor());
        let (fx, fy) = (fract(x), fract(y));

        let a = hash1(ix, iy);
        let b = hash1(ix + 1.0, iy);
        let c = hash1(ix, iy + 1.0);
        let d = hash1(ix + 1.0, iy + 1.0);

        let ux = fx * fx * (3.0 - 2.0 * fx);
        let uy = fy * fy * (3.0 - 2.0 * fy);

        lerp(a, b, ux) + (c - a) * uy * (1.0 - ux) + (d - b) * ux * uy
    }

    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let (mut x, mut y) = (x, y);
        let mut amplitude = START_AMPLITUDE;
        let mut value = 0.0;
        for _ in 0..self.octaves {
            value += amplitude * Self::value_noise(x, y);
            x *= self.lacunarity as f64;
            y *= self.lacunarity as f64;
            amplitude *= self.gain as f64;
        }
        value
    }

    pub fn apply(&self, map: &mut LandMap) {
        let start = Instant::now();
        let size = map.size();
        for y in 0..size {
            for x in 0..size {
                let value = self.sample(x as f64, y as f64) as f32;
                let i = map.index(x, y);
                map.map_mut()[i] += value;
            }
        }
        debug!(
            octaves = self.octaves,
            lacunarity = self.lacunarity,
            gain = self.gain,
            elapsed = ?start.elapsed(),
            "fbm applied"
        );
    }
}
