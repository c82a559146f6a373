//! Headless terrain generator.
//!
//! Run with:
//! ```
//! cargo run -p landmap-app --release -- --seed 2025 --out out/
//! ```

mod config;
mod mesh;
mod render;

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use landmap::LandMap;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use config::TerrainParams;
use mesh::TerrainMesh;

#[derive(Debug, Parser)]
#[command(name = "landmap", about = "Procedural heightfield terrain generator")]
struct Args {
    /// JSON file with generation settings; defaults are used when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for the random source (overrides the config)
    #[arg(long)]
    seed: Option<u64>,

    /// Grid level: size = 2^level + 1 (overrides the config)
    #[arg(long)]
    level: Option<u32>,

    /// Diamond-square roughness (overrides the config)
    #[arg(long)]
    deviation: Option<f32>,

    /// Output directory
    #[arg(long, default_value = "out")]
    out: PathBuf,

    /// Save a normalized grayscale snapshot after every pipeline step
    #[arg(long)]
    stages: bool,

    /// Mesh resolution before halving (overrides the config)
    #[arg(long)]
    mesh_size: Option<usize>,

    /// Mesh vertical scale (overrides the config)
    #[arg(long)]
    mesh_height: Option<f32>,
}

impl Args {
    fn params(&self) -> anyhow::Result<TerrainParams> {
        let mut params = match &self.config {
            Some(path) => TerrainParams::load(path)?,
            None => TerrainParams::default(),
        };
        if let Some(seed) = self.seed {
            params.seed = Some(seed);
        }
        if let Some(level) = self.level {
            params.level = level;
        }
        if let Some(deviation) = self.deviation {
            params.deviation = deviation;
        }
        if let Some(mesh_size) = self.mesh_size {
            params.mesh_size = mesh_size;
        }
        if let Some(mesh_height) = self.mesh_height {
            params.mesh_height = mesh_height;
        }
        params.validate()?;
        Ok(params)
    }
}

fn save_stage(map: &LandMap, out: &Path, index: usize, name: &str) -> anyhow::Result<()> {
    let path = out.join(format!("stage_{index:02}_{name}.png"));
    render::normalized_image(map)
        .save(&path)
        .with_context(|| format!("writing {}", path.display()))?;
    debug!("saved {}", path.display());
    Ok(())
}

fn generate(params: &TerrainParams, seed: u64, out: &Path, stages: bool) -> anyhow::Result<LandMap> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut map = LandMap::new(params.level)?;
    map.initialize(params.deviation, &mut rng);
    if stages {
        save_stage(&map, out, 0, "initialize")?;
    }

    for (i, step) in params.steps.iter().enumerate() {
        let effect = step.build(params.level, &mut rng)?;
        map.add_effect(&effect, &mut rng)
            .with_context(|| format!("applying step {i} ({})", effect.name()))?;
        if stages {
            save_stage(&map, out, i + 1, effect.name())?;
        }
    }
    Ok(map)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let params = args.params()?;
    let seed = params.seed.unwrap_or_else(rand::random);
    fs::create_dir_all(&args.out)
        .with_context(|| format!("creating {}", args.out.display()))?;

    info!(
        seed,
        level = params.level,
        deviation = params.deviation,
        steps = params.steps.len(),
        "generating terrain"
    );
    let start = Instant::now();
    let map = generate(&params, seed, &args.out, args.stages)?;
    let (min, max) = map.min_max();
    info!(
        elapsed_ms = start.elapsed().as_millis() as u64,
        min, max, "terrain generated"
    );

    let heightmap = args.out.join("heightmap.png");
    render::heightmap_image(&map, params.brightness_reference)
        .save(&heightmap)
        .with_context(|| format!("writing {}", heightmap.display()))?;
    info!("saved {}", heightmap.display());

    let preview = args.out.join("preview.png");
    render::shaded_preview(&map)
        .save(&preview)
        .with_context(|| format!("writing {}", preview.display()))?;
    info!("saved {}", preview.display());

    let mesh = TerrainMesh::build(
        &map,
        params.mesh_size,
        params.mesh_height,
        params.brightness_reference,
    );
    let obj = args.out.join("terrain.obj");
    let mut writer = BufWriter::new(
        File::create(&obj).with_context(|| format!("creating {}", obj.display()))?,
    );
    mesh.write_obj(&mut writer)
        .with_context(|| format!("writing {}", obj.display()))?;
    info!(
        vertices = mesh.vertices.len(),
        triangles = mesh.triangles.len() / 3,
        "saved {}",
        obj.display()
    );

    Ok(())
}
