use rand::Rng;

use crate::effect::Effect;
use crate::error::{Result, TerrainError};
use crate::fractal2::DiamondSquare;

/// Value returned by [`LandMap::height`] for coordinates outside the grid.
/// Not a valid elevation.
pub const SENTINEL: f32 = -1.0;

/// Level of the default 257×257 grid.
pub const DEFAULT_LEVEL: u32 = 8;

/// Largest accepted level (4097×4097 samples).
pub const MAX_LEVEL: u32 = 12;

// Corner seeds are drawn from this range and lifted by the max index
const CORNER_RANGE: std::ops::Range<f32> = 0.1..1.0;

/// Square heightfield of `size × size` samples, `size = 2^level + 1`.
/// Row-major: sample `(x, y)` lives at `x + size * y`.
#[derive(Debug, Clone, PartialEq)]
pub struct LandMap {
    size: usize,
    map: Vec<f32>,
}

impl LandMap {
    /// Zero-filled grid of `2^level + 1` samples per side.
    pub fn new(level: u32) -> Result<Self> {
        if level == 0 || level > MAX_LEVEL {
            return Err(TerrainError::InvalidLevel { level });
        }
        Ok(Self::zeroed((1usize << level) + 1))
    }

    /// Zero-filled grid with an explicit side length, which must be `2^n + 1`.
    pub fn with_size(size: usize) -> Result<Self> {
        if size < 3 || !(size - 1).is_power_of_two() {
            return Err(TerrainError::InvalidSize { size });
        }
        if (size - 1).trailing_zeros() > MAX_LEVEL {
            return Err(TerrainError::InvalidLevel {
                level: (size - 1).trailing_zeros(),
            });
        }
        Ok(Self::zeroed(size))
    }

    fn zeroed(size: usize) -> Self {
        Self {
            size,
            map: vec![0.0; size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn max_index(&self) -> usize {
        self.size - 1
    }

    /// Elevation at `(x, y)`, or [`SENTINEL`] when either coordinate is off-grid.
    pub fn height(&self, x: isize, y: isize) -> f32 {
        self.get(x, y).unwrap_or(SENTINEL)
    }

    /// Bounds-checked lookup without the sentinel convention.
    pub fn get(&self, x: isize, y: isize) -> Option<f32> {
        let max = self.max_index() as isize;
        if x < 0 || x > max || y < 0 || y > max {
            return None;
        }
        Some(self.map[self.index(x as usize, y as usize)])
    }

    /// Writes a sample. Callers keep `x` and `y` within `0..=max_index()`.
    pub fn set_height(&mut self, x: usize, y: usize, value: f32) {
        debug_assert!(
            x < self.size && y < self.size,
            "({x}, {y}) outside {0}×{0} grid",
            self.size
        );
        let index = self.index(x, y);
        self.map[index] = value;
    }

    #[inline]
    pub(crate) fn index(&self, x: usize, y: usize) -> usize {
        x + self.size * y
    }

    /// Raw row-major samples.
    pub fn values(&self) -> &[f32] {
        &self.map
    }

    pub(crate) fn map_mut(&mut self) -> &mut [f32] {
        &mut self.map
    }

    /// Swaps in a full replacement buffer, e.g. the output of a
    /// double-buffered pass.
    pub fn replace(&mut self, buffer: Vec<f32>) -> Result<()> {
        if buffer.len() != self.map.len() {
            return Err(TerrainError::SizeMismatch {
                expected: self.map.len(),
                found: buffer.len(),
            });
        }
        self.map = buffer;
        Ok(())
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f32]> {
        self.map.chunks_exact(self.size)
    }

    /// Smallest and largest sample.
    pub fn min_max(&self) -> (f32, f32) {
        self.map
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(min, max), &v| {
                (min.min(v), max.max(v))
            })
    }

    /// Seeds the four corners with `U[0.1, 1.0) + max_index` and runs
    /// diamond-square subdivision. Larger `deviation` gives rougher terrain.
    pub fn initialize<R: Rng + ?Sized>(&mut self, deviation: f32, rng: &mut R) -> &mut Self {
        let corner = rng.gen_range(CORNER_RANGE) + self.max_index() as f32;
        self.initialize_with_corner(corner, deviation, rng)
    }

    /// Same as [`LandMap::initialize`] with a caller-chosen corner height.
    pub fn initialize_with_corner<R: Rng + ?Sized>(
        &mut self,
        corner: f32,
        deviation: f32,
        rng: &mut R,
    ) -> &mut Self {
        DiamondSquare::new(deviation).generate(self, corner, rng);
        self
    }

    /// Applies `effect` immediately; the mutation is visible to whatever runs next.
    pub fn add_effect<R: Rng + ?Sized>(&mut self, effect: &Effect, rng: &mut R) -> Result<&mut Self> {
        effect.apply(self, rng)?;
        Ok(self)
    }
}

impl Default for LandMap {
    fn default() -> Self {
        Self::zeroed((1usize << DEFAULT_LEVEL) + 1)
    }
}

/// Mean of the on-grid samples; off-grid entries are skipped.
/// With no valid samples the mean is `0.0`.
pub(crate) fn average<const N: usize>(samples: [Option<f32>; N]) -> f32 {
    let (sum, count) = samples
        .iter()
        .flatten()
        .fold((0.0f32, 0u32), |(sum, count), &v| (sum + v, count + 1));
    if count == 0 { 0.0 } else { sum / count as f32 }
}
