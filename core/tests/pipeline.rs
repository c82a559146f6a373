use landmap::{
    Blend, Effect, FractalBrownianMotion, HydraulicErosion, LandMap, OctavePerlinNoise,
    PerlinNoise, Pipeline, SENTINEL, Smooth, VoroNoise,
};
use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;

// Same chain as the interactive scene, scaled down for test speed
fn scene_pipeline() -> Pipeline {
    let mut pipeline = Pipeline::new();
    pipeline
        .push(FractalBrownianMotion::new(3, 2.0, 0.5).unwrap())
        .push(PerlinNoise::new(10.0).unwrap())
        .push(OctavePerlinNoise::new(10.0).unwrap())
        .push(HydraulicErosion::new(1.5, 0.2, 3, 2_000).unwrap())
        .push(Smooth::new(2));
    pipeline
}

fn generate(seed: u64) -> LandMap {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut map = LandMap::new(6).unwrap();
    map.initialize(0.4, &mut rng);
    scene_pipeline().run(&mut map, &mut rng).unwrap();
    map
}

fn bits(map: &LandMap) -> Vec<u32> {
    map.values().iter().map(|v| v.to_bits()).collect()
}

#[test]
fn seeded_generation_is_reproducible() {
    assert_eq!(bits(&generate(2025)), bits(&generate(2025)));
    assert_ne!(bits(&generate(2025)), bits(&generate(2026)));
}

#[test]
fn golden_five_by_five() {
    let mut map = LandMap::new(2).unwrap();
    map.initialize_with_corner(0.5 + 4.0, 0.0, &mut StdRng::seed_from_u64(0));
    for y in 0..5 {
        for x in 0..5 {
            assert_eq!(map.height(x, y), 4.5, "({x}, {y})");
        }
    }
}

#[test]
fn corner_is_unit_draw_plus_max_index() {
    let corner = StdRng::seed_from_u64(7).gen_range(0.1f32..1.0) + 4.0;
    let mut map = LandMap::new(2).unwrap();
    map.initialize(0.0, &mut StdRng::seed_from_u64(7));
    for (x, y) in [(0, 0), (4, 0), (0, 4), (4, 4)] {
        assert_eq!(map.height(x, y), corner);
    }
    // without deviation every sample averages back to the corner
    for v in map.values() {
        assert!((v - corner).abs() < 1e-5, "{v} vs {corner}");
    }
}

#[test]
fn sentinel_for_every_size() {
    for level in 1..=8 {
        let mut map = LandMap::new(level).unwrap();
        map.initialize(1.0, &mut StdRng::seed_from_u64(level as u64));
        let max = map.max_index() as isize;
        for i in [-1, 0, max / 2, max, max + 1] {
            assert_eq!(map.height(-1, i), SENTINEL);
            assert_eq!(map.height(max + 1, i), SENTINEL);
            assert_eq!(map.height(i, -1), SENTINEL);
            assert_eq!(map.height(i, max + 1), SENTINEL);
        }
    }
}

#[test]
fn order_of_effects_matters() {
    let mut rng = StdRng::seed_from_u64(8);
    let mut base = LandMap::new(5).unwrap();
    base.initialize(0.5, &mut rng);

    let noise: Effect = PerlinNoise::new(25.0).unwrap().into();
    let smooth: Effect = Smooth::new(3).into();

    let mut noise_first = base.clone();
    let mut r1 = StdRng::seed_from_u64(77);
    noise_first
        .add_effect(&noise, &mut r1)
        .unwrap()
        .add_effect(&smooth, &mut r1)
        .unwrap();

    let mut smooth_first = base.clone();
    let mut r2 = StdRng::seed_from_u64(77);
    smooth_first
        .add_effect(&smooth, &mut r2)
        .unwrap()
        .add_effect(&noise, &mut r2)
        .unwrap();

    let differs = (1..32)
        .flat_map(|y| (1..32).map(move |x| (x, y)))
        .any(|(x, y)| noise_first.height(x, y) != smooth_first.height(x, y));
    assert!(differs);
}

#[test]
fn zero_drop_erosion_and_unit_smooth_leave_grid_alone() {
    let mut map = generate(4);
    let before = bits(&map);
    let mut rng = StdRng::seed_from_u64(1);
    map.add_effect(&HydraulicErosion::new(2.0, 0.3, 3, 0).unwrap().into(), &mut rng)
        .unwrap()
        .add_effect(&Smooth::new(1).into(), &mut rng)
        .unwrap();
    assert_eq!(bits(&map), before);
}

#[test]
fn erosion_conserves_mass_over_many_drops() {
    let mut map = generate(10);
    let before: f64 = map.values().iter().map(|&v| v as f64).sum();
    let erosion = HydraulicErosion::new(1.0, 0.25, 3, 1).unwrap();
    let mut carried = 0.0f64;
    for i in 0..200 {
        carried += erosion.run_drop(&mut map, (i * 7) % 65, (i * 13) % 65) as f64;
    }
    let after: f64 = map.values().iter().map(|&v| v as f64).sum();
    assert!((before - after - carried).abs() < 1e-2);
}

#[test]
fn blend_with_own_copy_is_stable() {
    let mut map = generate(6);
    let copy = map.clone();
    map.add_effect(&Blend::new(copy.clone()).into(), &mut StdRng::seed_from_u64(0))
        .unwrap();
    for (a, b) in map.values().iter().zip(copy.values()) {
        assert!((a - b).abs() <= 1e-3 * b.abs().max(1.0));
    }
}

#[test]
fn voronoi_then_blend_of_two_sessions() {
    let mut rng = StdRng::seed_from_u64(21);
    let mut detail = LandMap::new(4).unwrap();
    detail.initialize(1.5, &mut rng);
    detail
        .add_effect(&VoroNoise::new(1.0, 0.5).unwrap().into(), &mut rng)
        .unwrap();

    let mut map = LandMap::new(4).unwrap();
    map.initialize(0.3, &mut rng);
    map.add_effect(&Blend::new(detail).into(), &mut rng).unwrap();
    assert!(map.values().iter().all(|v| v.is_finite()));
}
