use std::time::Instant;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, ensure_non_negative, ensure_positive};
use crate::landmap::LandMap;

const INITIAL_VELOCITY: f32 = 1.05;
const MAX_VELOCITY: f32 = 10.0;
// Height differences above this are treated as this steep
const SLOPE_LIMIT: f32 = 1.15;

// Neighbour order matters: ties go to the first one found
const NEIGHBOURS: [(isize, isize); 4] = [
    (0, -1), // north
    (0, 1),  // south
    (1, 0),  // east
    (-1, 0), // west
];

/// Particle-based hydraulic erosion.
///
/// Each drop starts on a random cell and walks `iterations` steps down the
/// steepest axis-aligned descent, eroding while it has spare capacity. Once
/// full it only takes what still fits, so a drop never carries more than
/// `carrying_capacity`. Off-grid neighbours read as the `-1` sentinel, so
/// border cells erode towards the edge and the drop is clamped back on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HydraulicErosion {
    pub carrying_capacity: f32,
    pub deposition_speed: f32,
    pub iterations: u32,
    pub drops: u32,
}

impl HydraulicErosion {
    pub fn new(
        carrying_capacity: f32,
        deposition_speed: f32,
        iterations: u32,
        drops: u32,
    ) -> Result<Self> {
        let erosion = Self {
            carrying_capacity,
            deposition_speed,
            iterations,
            drops,
        };
        erosion.validate()?;
        Ok(erosion)
    }

    pub fn validate(&self) -> Result<()> {
        ensure_positive("carrying_capacity", self.carrying_capacity)?;
        ensure_non_negative("deposition_speed", self.deposition_speed)
    }

    pub fn apply<R: Rng + ?Sized>(&self, map: &mut LandMap, rng: &mut R) {
        let start = Instant::now();
        let max = map.max_index();
        let mut suspended = 0.0f64;
        for _ in 0..self.drops {
            let x = rng.gen_range(0..=max);
            let y = rng.gen_range(0..=max);
            suspended += self.run_drop(map, x, y) as f64;
        }
        debug!(
            carrying_capacity = self.carrying_capacity,
            deposition_speed = self.deposition_speed,
            iterations = self.iterations,
            drops = self.drops,
            suspended,
            elapsed = ?start.elapsed(),
            "hydraulic erosion applied"
        );
    }

    /// Walks one drop from `(x, y)` and returns the sediment it still carries.
    /// Every height change on the grid is matched by the opposite change in
    /// carried sediment.
    pub fn run_drop(&self, map: &mut LandMap, x: usize, y: usize) -> f32 {
        let max = map.max_index();
        let capacity = self.carrying_capacity;
        let (mut x, mut y) = (x.min(max), y.min(max));
        let mut carried = 0.0f32;
        let velocity = INITIAL_VELOCITY.min(MAX_VELOCITY);

        for _ in 0..self.iterations {
            let i = map.index(x, y);
            let height = map.values()[i];

            let (dx, dy, lowest) = lowest_neighbour(map, x, y);
            // Local basin: the step is spent without moving
            if lowest >= height {
                continue;
            }

            let slope = SLOPE_LIMIT.min(height - lowest);
            let transport = self.deposition_speed * velocity * slope;

            let cell = &mut map.map_mut()[i];
            if carried > capacity {
                // Deposit arm; within a single drop the load is capped at capacity
                carried -= transport;
                *cell += transport;
            } else if carried + transport > capacity {
                // Pick up only what fits; the excess stays on the cell
                let taken = capacity - carried;
                carried = capacity;
                *cell -= taken;
            } else {
                carried += transport;
                *cell -= transport;
            }

            x = (x as isize + dx).clamp(0, max as isize) as usize;
            y = (y as isize + dy).clamp(0, max as isize) as usize;
        }

        carried
    }
}

// Lowest neighbour in N, S, E, W order, as (dx, dy, height).
// Off-grid neighbours take part with the sentinel height.
fn lowest_neighbour(map: &LandMap, x: usize, y: usize) -> (isize, isize, f32) {
    let (x, y) = (x as isize, y as isize);
    NEIGHBOURS
        .iter()
        .map(|&(dx, dy)| (dx, dy, map.height(x + dx, y + dy)))
        .fold((0, 0, f32::INFINITY), |best, candidate| {
            if candidate.2 < best.2 { candidate } else { best }
        })
}
