use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::landmap::LandMap;

/// How a smoothing pass reads its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmoothMode {
    /// Every output is computed from the untouched input, then swapped in.
    #[default]
    Buffered,
    /// Writes back while scanning, so later cells see already-smoothed
    /// neighbours (row-major drift toward the bottom-right).
    InPlace,
}

/// Circular box blur: each cell becomes the mean of every cell within
/// Euclidean distance `amount`, itself included. `amount <= 1` is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Smooth {
    pub amount: u32,
    #[serde(default)]
    pub mode: SmoothMode,
}

impl Smooth {
    pub fn new(amount: u32) -> Self {
        Self {
            amount,
            mode: SmoothMode::Buffered,
        }
    }

    pub fn in_place(amount: u32) -> Self {
        Self {
            amount,
            mode: SmoothMode::InPlace,
        }
    }

    pub fn apply(&self, map: &mut LandMap) {
        if self.amount <= 1 {
            return;
        }
        let start = Instant::now();
        match self.mode {
            SmoothMode::Buffered => {
                let mut out = vec![0.0f32; map.values().len()];
                for y in 0..map.size() {
                    for x in 0..map.size() {
                        out[map.index(x, y)] = self.kernel_mean(map.values(), map.size(), x, y);
                    }
                }
                map.map_mut().copy_from_slice(&out);
            }
            SmoothMode::InPlace => {
                let size = map.size();
                for y in 0..size {
                    for x in 0..size {
                        let mean = self.kernel_mean(map.values(), size, x, y);
                        let i = map.index(x, y);
                        map.map_mut()[i] = mean;
                    }
                }
            }
        }
        debug!(amount = self.amount, mode = ?self.mode, elapsed = ?start.elapsed(), "smooth applied");
    }

    // Mean over the disc of radius `amount`, clipped to the grid.
    // The centre always counts, so the divisor is at least 1.
    fn kernel_mean(&self, values: &[f32], size: usize, x: usize, y: usize) -> f32 {
        let r = self.amount as usize;
        let r2 = r * r;
        let (x0, x1) = (x.saturating_sub(r), (x + r).min(size - 1));
        let (y0, y1) = (y.saturating_sub(r), (y + r).min(size - 1));

        let mut sum = 0.0f32;
        let mut count = 0u32;
        for ny in y0..=y1 {
            let dy = ny.abs_diff(y);
            for nx in x0..=x1 {
                let dx = nx.abs_diff(x);
                if dx * dx + dy * dy <= r2 {
                    sum += values[nx + size * ny];
                    count += 1;
                }
            }
        }
        sum / count as f32
    }
}
