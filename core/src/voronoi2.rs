use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, ensure_finite};
use crate::landmap::LandMap;
use crate::shader::{fract, hash3, smoothstep};

// Falloff radius, roughly √2: cells further away contribute nothing
const FALLOFF: f64 = 1.414;
// Search window around the sample's own cell (-2..=2 on each axis)
const REACH: i32 = 2;

/// Cell noise blending between Voronoi and value noise.
///
/// `u` controls how far each cell's feature point is jittered (0 = regular
/// grid, 1 = fully random); `v` controls the falloff sharpness (0 = nearest
/// cell dominates, 1 = smooth blend of all neighbours).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoroNoise {
    pub u: f32,
    pub v: f32,
}

impl Default for VoroNoise {
    fn default() -> Self {
        Self { u: 1.0, v: 1.0 }
    }
}

impl VoroNoise {
    pub fn new(u: f32, v: f32) -> Result<Self> {
        let noise = Self { u, v };
        noise.validate()?;
        Ok(noise)
    }

    pub fn validate(&self) -> Result<()> {
        ensure_finite("u", self.u)?;
        ensure_finite("v", self.v)
    }

    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let (px, py) = (x.floor(), y.floor());
        let (fx, fy) = (fract(x), fract(y));
        let u = self.u as f64;
        let k = 1.0 + 63.0 * (1.0 - self.v as f64).powi(6);

        let mut value = 0.0;
        let mut weight = 0.0;
        for j in -REACH..=REACH {
            for i in -REACH..=REACH {
                let (gx, gy) = (i as f64, j as f64);
                let [ox, oy, oz] = hash3(px + gx, py + gy);
                let dx = gx - fx + ox * u;
                let dy = gy - fy + oy * u;
                let distance = (dx * dx + dy * dy).sqrt();
                let w = (1.0 - smoothstep(0.0, FALLOFF, distance)).powf(k);
                value += oz * w;
                weight += w;
            }
        }

        if weight > 0.0 { value / weight } else { 0.0 }
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
        debug!(u = self.u, v = self.v, elapsed = ?start.elapsed(), "voronoise applied");
    }
}
