use std::time::Instant;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, ensure_finite, ensure_positive};
use crate::landmap::LandMap;

// Sample offsets are jittered once per application from this range
const JITTER: f32 = 1000.0;
const OCTAVES: usize = 5;
const PERSISTENCE: f32 = 0.5;

// Classic 2D gradient (Perlin) noise over a shuffled permutation table
pub struct GradientNoise {
    perm: [u8; 512], // permutation table (256 duplicated)
}

impl GradientNoise {
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut p: Vec<u8> = (0..=255).collect();
        p.shuffle(rng);
        // Duplicated so perm[i + 1] never needs a modulo
        let mut perm = [0u8; 512];
        for (i, slot) in perm.iter_mut().enumerate() {
            *slot = p[i & 255];
        }
        Self { perm }
    }

    // Fade function as defined by Ken Perlin: 6t^5 − 15t^4 + 10t^3
    #[inline]
    fn fade(t: f64) -> f64 {
        t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
    }

    #[inline]
    fn lerp(a: f64, b: f64, t: f64) -> f64 {
        a + t * (b - a)
    }

    // Picks one of eight gradient directions from the low bits of the hash
    #[inline]
    fn grad(hash: u8, x: f64, y: f64) -> f64 {
        let h = hash & 0xF;
        let u = if h < 8 { x } else { y };
        let v = if h < 8 { y } else { x };
        let sign_u = if (h & 1) == 0 { u } else { -u };
        let sign_v = if (h & 2) == 0 { v } else { -v };
        sign_u + sign_v
    }

    // Raw noise, roughly in [−1, 1]
    pub fn raw(&self, x: f64, y: f64) -> f64 {
        let xi = (x.floor() as i64 & 255) as usize;
        let yi = (y.floor() as i64 & 255) as usize;
        let xf = x - x.floor();
        let yf = y - y.floor();
        let u = Self::fade(xf);
        let v = Self::fade(yf);

        let p = &self.perm;
        let aa = p[p[xi] as usize + yi];
        let ab = p[p[xi] as usize + yi + 1];
        let ba = p[p[xi + 1] as usize + yi];
        let bb = p[p[xi + 1] as usize + yi + 1];

        let x1 = Self::lerp(Self::grad(aa, xf, yf), Self::grad(ba, xf - 1.0, yf), u);
        let x2 = Self::lerp(
            Self::grad(ab, xf, yf - 1.0),
            Self::grad(bb, xf - 1.0, yf - 1.0),
            u,
        );
        Self::lerp(x1, x2, v)
    }

    // Noise remapped into [0, 1]
    pub fn sample(&self, x: f32, y: f32) -> f32 {
        ((self.raw(x as f64, y as f64) + 1.0) * 0.5).clamp(0.0, 1.0) as f32
    }
}

// Sample coordinate for grid index `i`: jitter + i / size * scale
#[inline]
fn sample_coord(jitter: f32, i: usize, size: usize, scale: f32) -> f32 {
    jitter + i as f32 / size as f32 * scale
}

/// Adds single-octave gradient noise; values at or below `rounding` are
/// zeroed, which leaves plateaus between the bumps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerlinNoise {
    pub noise_scale: f32,
    #[serde(default = "PerlinNoise::default_rounding")]
    pub rounding: f32,
}

impl PerlinNoise {
    pub fn new(noise_scale: f32) -> Result<Self> {
        Self::with_rounding(noise_scale, Self::default_rounding())
    }

    pub fn with_rounding(noise_scale: f32, rounding: f32) -> Result<Self> {
        let noise = Self {
            noise_scale,
            rounding,
        };
        noise.validate()?;
        Ok(noise)
    }

    fn default_rounding() -> f32 {
        0.5
    }

    pub fn validate(&self) -> Result<()> {
        ensure_finite("noise_scale", self.noise_scale)?;
        ensure_finite("rounding", self.rounding)
    }

    pub fn apply<R: Rng + ?Sized>(&self, map: &mut LandMap, rng: &mut R) {
        let start = Instant::now();
        let jitter = rng.gen_range(-JITTER..JITTER);
        let gradient = GradientNoise::new(rng);
        let size = map.size();

        for y in 0..size {
            for x in 0..size {
                let sx = sample_coord(jitter, x, size, self.noise_scale);
                let sy = sample_coord(jitter, y, size, self.noise_scale);
                let mut noise = gradient.sample(sx, sy);
                if noise <= self.rounding {
                    noise = 0.0;
                }
                let i = map.index(x, y);
                map.map_mut()[i] += noise;
            }
        }
        debug!(
            noise_scale = self.noise_scale,
            rounding = self.rounding,
            elapsed = ?start.elapsed(),
            "perlin noise applied"
        );
    }
}

/// Adds five octaves of gradient noise. Amplitude and frequency both start
/// at `noise`; amplitude halves and frequency doubles per octave, and the
/// sum is divided by the total amplitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OctavePerlinNoise {
    pub noise_scale: f32,
    #[serde(default = "OctavePerlinNoise::default_noise")]
    pub noise: f32,
}

impl OctavePerlinNoise {
    pub fn new(noise_scale: f32) -> Result<Self> {
        Self::with_noise(noise_scale, Self::default_noise())
    }

    pub fn with_noise(noise_scale: f32, noise: f32) -> Result<Self> {
        let octave = Self { noise_scale, noise };
        octave.validate()?;
        Ok(octave)
    }

    fn default_noise() -> f32 {
        0.4
    }

    pub fn validate(&self) -> Result<()> {
        ensure_finite("noise_scale", self.noise_scale)?;
        // total amplitude is noise * (1 + 1/2 + ...) and must not be zero
        ensure_positive("noise", self.noise)
    }

    fn octave_sample(&self, gradient: &GradientNoise, x: f32, y: f32) -> f32 {
        let mut amplitude = self.noise;
        let mut frequency = self.noise;
        let mut max_amp = 0.0;
        let mut total = 0.0;

        for _ in 0..OCTAVES {
            total += amplitude * gradient.sample(x * frequency, y * frequency);
            max_amp += amplitude;
            amplitude *= PERSISTENCE;
            frequency *= 2.0;
        }

        total / max_amp
    }

    pub fn apply<R: Rng + ?Sized>(&self, map: &mut LandMap, rng: &mut R) {
        let start = Instant::now();
        let jitter = rng.gen_range(-JITTER..JITTER);
        let gradient = GradientNoise::new(rng);
        let size = map.size();

        for y in 0..size {
            for x in 0..size {
                let sx = sample_coord(jitter, x, size, self.noise_scale);
                let sy = sample_coord(jitter, y, size, self.noise_scale);
                let value = self.octave_sample(&gradient, sx, sy);
                let i = map.index(x, y);
                map.map_mut()[i] += value;
            }
        }
        debug!(
            noise_scale = self.noise_scale,
            noise = self.noise,
            elapsed = ?start.elapsed(),
            "octave perlin noise applied"
        );
    }
}
