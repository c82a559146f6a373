use rand::Rng;
use tracing::trace;

use crate::landmap::{LandMap, average};

// Diamond–Square midpoint displacement over a 2^n + 1 grid
pub struct DiamondSquare {
    // Offsets at a given round are drawn from U(-1, 1) * deviation * size
    deviation: f32,
}

impl DiamondSquare {
    pub fn new(deviation: f32) -> Self {
        Self { deviation }
    }

    // Seeds the four corners with `corner` and subdivides until every sample is set
    pub fn generate<R: Rng + ?Sized>(&self, map: &mut LandMap, corner: f32, rng: &mut R) {
        let max = map.max_index();

        map.set_height(0, 0, corner);
        map.set_height(max, 0, corner);
        map.set_height(max, max, corner);
        map.set_height(0, max, corner);

        // Step is the current distance between two known points
        let mut step = max;
        loop {
            // Distance to the center from a corner
            let half = step / 2;
            if half < 1 {
                break;
            }
            let scale = self.deviation * step as f32;
            trace!(step, scale, "diamond-square round");

            // Square step: cell centers take the mean of their diagonal corners
            for y in (half..max).step_by(step) {
                for x in (half..max).step_by(step) {
                    let offset = rng.gen_range(-1.0f32..1.0) * scale;
                    square(map, x, y, half, offset);
                }
            }

            // Diamond step: edge midpoints take the mean of their orthogonal neighbours
            for y in (0..=max).step_by(half) {
                for x in ((y + half) % step..=max).step_by(step) {
                    let offset = rng.gen_range(-1.0f32..1.0) * scale;
                    diamond(map, x, y, half, offset);
                }
            }

            step = half;
        }
    }
}

fn square(map: &mut LandMap, x: usize, y: usize, half: usize, offset: f32) {
    let (x, y, h) = (x as isize, y as isize, half as isize);
    let avg = average([
        map.get(x - h, y - h),
        map.get(x + h, y - h),
        map.get(x + h, y + h),
        map.get(x - h, y + h),
    ]);
    map.set_height(x as usize, y as usize, avg + offset);
}

fn diamond(map: &mut LandMap, x: usize, y: usize, half: usize, offset: f32) {
    let (x, y, h) = (x as isize, y as isize, half as isize);
    // Edge points have one neighbour off-grid; it is left out of the mean
    let avg = average([
        map.get(x, y - h),
        map.get(x + h, y),
        map.get(x, y + h),
        map.get(x - h, y),
    ]);
    map.set_height(x as usize, y as usize, avg + offset);
}
