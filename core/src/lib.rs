// landmap holds the heightfield grid, diamond-square seeding and every terrain effect
pub mod blend2;
pub mod effect;
pub mod erosion2;
pub mod error;
pub mod fbm2;
pub mod fractal2;
pub mod landmap;
pub mod perlin2;
pub mod shader;
pub mod smooth2;
pub mod utils;
pub mod voronoi2;

pub use blend2::{Blend, BlendRange};
pub use effect::{Effect, Pipeline};
pub use erosion2::HydraulicErosion;
pub use error::{Result, TerrainError};
pub use fbm2::FractalBrownianMotion;
pub use fractal2::DiamondSquare;
pub use landmap::{DEFAULT_LEVEL, LandMap, MAX_LEVEL, SENTINEL};
pub use perlin2::{GradientNoise, OctavePerlinNoise, PerlinNoise};
pub use smooth2::{Smooth, SmoothMode};
pub use voronoi2::VoroNoise;
