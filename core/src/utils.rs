use crate::landmap::LandMap;

// Floor for the value range so a flat grid does not divide by zero
const MIN_RANGE: f32 = 0.001;

// 2D height map: row‐major Vec<Vec<f32>> of size N×N
// access as `map[y][x]`.
pub type HeightMap2D = Vec<Vec<f32>>;

// Nested-row copy of the grid, for consumers that index `map[y][x]`
pub fn to_rows(map: &LandMap) -> HeightMap2D {
    map.rows().map(|row| row.to_vec()).collect()
}

// Row-major copy of every sample
pub fn flatten(map: &LandMap) -> Vec<f32> {
    map.values().to_vec()
}

// Samples rescaled into [0, 1] by the grid's own min and max.
// A gamma above 1 pushes mid heights down for contrast.
pub fn normalize(map: &LandMap, gamma: f32) -> Vec<f32> {
    let (min, max) = map.min_max();
    let range = (max - min).max(MIN_RANGE);
    map.values()
        .iter()
        .map(|&v| ((v - min) / range).clamp(0.0, 1.0).powf(gamma))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_spans_unit_range() {
        let mut map = LandMap::new(2).unwrap();
        for y in 0..5 {
            for x in 0..5 {
                map.set_height(x, y, (x * 10 + y) as f32 - 7.0);
            }
        }
        let n = normalize(&map, 1.0);
        let min = n.iter().cloned().fold(f32::INFINITY, f32::min);
        let max = n.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        assert_eq!(min, 0.0);
        assert!((max - 1.0).abs() < 1e-6);
    }

    #[test]
    fn normalize_flat_grid() {
        let map = LandMap::new(2).unwrap();
        assert!(normalize(&map, 1.2).iter().all(|&v| v == 0.0));
    }

    #[test]
    fn rows_match_flat() {
        let mut map = LandMap::new(1).unwrap();
        map.set_height(1, 2, 4.0);
        let rows = to_rows(&map);
        assert_eq!(rows[2][1], 4.0);
        assert_eq!(flatten(&map)[1 + 3 * 2], 4.0);
    }
}
