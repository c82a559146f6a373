use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, TerrainError};
use crate::landmap::LandMap;

/// How the value range of the other grid is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendRange {
    /// True minimum and maximum of the other grid.
    #[default]
    Extrema,
    /// Min and max scanned from a starting value of zero, so the range
    /// always includes 0.
    ZeroSeeded,
}

/// Merges another grid into this one with a per-cell factor
/// `percent = other / |max - min|`:
/// `result = (1 - percent) * this + percent * other`.
///
/// `percent` is not clamped, so values outside the range extrapolate.
#[derive(Debug, Clone, PartialEq)]
pub struct Blend {
    other: LandMap,
    range: BlendRange,
}

impl Blend {
    pub fn new(other: LandMap) -> Self {
        Self::with_range(other, BlendRange::Extrema)
    }

    pub fn with_range(other: LandMap, range: BlendRange) -> Self {
        Self { other, range }
    }

    pub fn other(&self) -> &LandMap {
        &self.other
    }

    pub fn range(&self) -> BlendRange {
        self.range
    }

    fn value_range(&self) -> f32 {
        let (min, max) = match self.range {
            BlendRange::Extrema => self.other.min_max(),
            BlendRange::ZeroSeeded => {
                let (min, max) = self.other.min_max();
                (min.min(0.0), max.max(0.0))
            }
        };
        (max - min).abs()
    }

    pub fn apply(&self, map: &mut LandMap) -> Result<()> {
        if self.other.size() != map.size() {
            return Err(TerrainError::SizeMismatch {
                expected: map.size(),
                found: self.other.size(),
            });
        }
        let start = Instant::now();
        let range = self.value_range();
        // A flat other grid gives no usable factor; leave the terrain as is
        if !range.is_normal() {
            debug!(range, "blend skipped, other grid has no value range");
            return Ok(());
        }

        for (value, &other) in map.map_mut().iter_mut().zip(self.other.values()) {
            let percent = other / range;
            *value = (1.0 - percent) * *value + percent * other;
        }
        debug!(range = ?self.range, span = range, elapsed = ?start.elapsed(), "blend applied");
        Ok(())
    }
}
