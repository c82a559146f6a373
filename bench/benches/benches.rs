use criterion::{Criterion, criterion_group, criterion_main};
use landmap::{
    FractalBrownianMotion, HydraulicErosion, LandMap, OctavePerlinNoise, PerlinNoise, Pipeline,
    Smooth, VoroNoise, utils::normalize,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

const LEVEL: u32 = 8; // 257×257
const SEED: u64 = 2025;

fn initialized() -> LandMap {
    let mut map = LandMap::new(LEVEL).unwrap();
    map.initialize(0.5, &mut StdRng::seed_from_u64(SEED));
    map
}

fn bench_initialize(c: &mut Criterion) {
    c.bench_function("LandMap::initialize (diamond-square)", |b| {
        b.iter(|| {
            let mut rng = StdRng::seed_from_u64(SEED);
            let mut map = LandMap::new(LEVEL).unwrap();
            map.initialize(0.5, &mut rng);
            normalize(&map, 1.0)
        })
    });
}

fn bench_noise(c: &mut Criterion) {
    let base = initialized();
    let perlin = PerlinNoise::new(25.0).unwrap();
    let octave = OctavePerlinNoise::new(20.0).unwrap();
    let fbm = FractalBrownianMotion::default();
    let voronoi = VoroNoise::default();

    c.bench_function("PerlinNoise", |b| {
        b.iter(|| {
            let mut map = base.clone();
            perlin.apply(&mut map, &mut StdRng::seed_from_u64(SEED));
            map
        })
    });
    c.bench_function("OctavePerlinNoise", |b| {
        b.iter(|| {
            let mut map = base.clone();
            octave.apply(&mut map, &mut StdRng::seed_from_u64(SEED));
            map
        })
    });
    c.bench_function("FractalBrownianMotion (6 octaves)", |b| {
        b.iter(|| {
            let mut map = base.clone();
            fbm.apply(&mut map);
            map
        })
    });
    c.bench_function("VoroNoise", |b| {
        b.iter(|| {
            let mut map = base.clone();
            voronoi.apply(&mut map);
            map
        })
    });
}

fn bench_smooth(c: &mut Criterion) {
    let base = initialized();
    for amount in [2, 5] {
        c.bench_function(&format!("Smooth radius {amount}"), |b| {
            b.iter(|| {
                let mut map = base.clone();
                Smooth::new(amount).apply(&mut map);
                map
            })
        });
    }
}

fn bench_erosion(c: &mut Criterion) {
    let base = initialized();
    let erosion = HydraulicErosion::new(2.0, 0.15, 3, 100_000).unwrap();
    c.bench_function("HydraulicErosion (100k drops)", |b| {
        b.iter(|| {
            let mut map = base.clone();
            erosion.apply(&mut map, &mut StdRng::seed_from_u64(SEED));
            map
        })
    });
}

fn bench_full_pipeline(c: &mut Criterion) {
    let mut pipeline = Pipeline::new();
    pipeline
        .push(FractalBrownianMotion::default())
        .push(PerlinNoise::new(25.0).unwrap())
        .push(OctavePerlinNoise::new(20.0).unwrap())
        .push(HydraulicErosion::new(2.0, 0.15, 3, 100_000).unwrap())
        .push(Smooth::new(3));

    c.bench_function("initialize + fbm + perlin + octave + erosion + smooth", |b| {
        b.iter(|| {
            let mut rng = StdRng::seed_from_u64(SEED);
            let mut map = LandMap::new(LEVEL).unwrap();
            map.initialize(0.5, &mut rng);
            pipeline.run(&mut map, &mut rng).unwrap();
            map
        })
    });
}

criterion_group!(
    terrain_benchmarks,
    bench_initialize,
    bench_noise,
    bench_smooth,
    bench_erosion,
    bench_full_pipeline
);
criterion_main!(terrain_benchmarks);
