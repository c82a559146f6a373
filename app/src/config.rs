use std::fs;
use std::path::Path;

use anyhow::{Context, bail};
use landmap::{
    Blend, BlendRange, DEFAULT_LEVEL, Effect, FractalBrownianMotion, HydraulicErosion, LandMap,
    OctavePerlinNoise, PerlinNoise, Smooth, VoroNoise,
};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Generation settings, read from JSON. Every field has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainParams {
    // size = 2^level + 1
    pub level: u32,
    pub seed: Option<u64>,
    pub deviation: f32,
    pub steps: Vec<Step>,
    // value that maps to full white in the height-map image
    pub brightness_reference: f32,
    pub mesh_size: usize,
    pub mesh_height: f32,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            level: DEFAULT_LEVEL,
            seed: None,
            deviation: 0.5,
            steps: vec![
                Step::Fbm(FractalBrownianMotion::default()),
                Step::Perlin(PerlinNoise {
                    noise_scale: 25.0,
                    rounding: 0.5,
                }),
                Step::OctavePerlin(OctavePerlinNoise {
                    noise_scale: 20.0,
                    noise: 0.4,
                }),
                Step::Erosion(HydraulicErosion {
                    carrying_capacity: 2.0,
                    deposition_speed: 0.15,
                    iterations: 3,
                    drops: 200_000,
                }),
                Step::Smooth(Smooth::new(3)),
            ],
            brightness_reference: 500.0,
            mesh_size: 100,
            mesh_height: 100.0,
        }
    }
}

/// One pipeline step as written in the config file, tagged by `"effect"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum Step {
    Perlin(PerlinNoise),
    OctavePerlin(OctavePerlinNoise),
    Fbm(FractalBrownianMotion),
    Voronoi(VoroNoise),
    Smooth(Smooth),
    Erosion(HydraulicErosion),
    /// Blends in a second terrain built from its own deviation and steps.
    Blend {
        deviation: f32,
        #[serde(default)]
        range: BlendRange,
        #[serde(default)]
        steps: Vec<Step>,
    },
}

impl Step {
    pub fn validate(&self) -> anyhow::Result<()> {
        match self {
            Step::Perlin(e) => e.validate()?,
            Step::OctavePerlin(e) => e.validate()?,
            Step::Fbm(e) => e.validate()?,
            Step::Voronoi(e) => e.validate()?,
            Step::Smooth(_) => {}
            Step::Erosion(e) => e.validate()?,
            Step::Blend {
                deviation, steps, ..
            } => {
                validate_deviation(*deviation)?;
                for step in steps {
                    step.validate()?;
                }
            }
        }
        Ok(())
    }

    /// Turns the step into a runnable effect. A blend step generates its
    /// source terrain here, drawing from `rng`.
    pub fn build<R: Rng + ?Sized>(&self, level: u32, rng: &mut R) -> anyhow::Result<Effect> {
        let effect = match self {
            Step::Perlin(e) => Effect::Perlin(*e),
            Step::OctavePerlin(e) => Effect::OctavePerlin(*e),
            Step::Fbm(e) => Effect::Fbm(*e),
            Step::Voronoi(e) => Effect::Voronoi(*e),
            Step::Smooth(e) => Effect::Smooth(*e),
            Step::Erosion(e) => Effect::Erosion(*e),
            Step::Blend {
                deviation,
                range,
                steps,
            } => {
                let mut other = LandMap::new(level)?;
                other.initialize(*deviation, rng);
                for step in steps {
                    let effect = step.build(level, rng)?;
                    other.add_effect(&effect, rng)?;
                }
                Effect::Blend(Blend::with_range(other, *range))
            }
        };
        Ok(effect)
    }
}

fn validate_deviation(deviation: f32) -> anyhow::Result<()> {
    if !deviation.is_finite() || deviation < 0.0 {
        bail!("deviation must be a finite, non-negative number (got {deviation})");
    }
    Ok(())
}

impl TerrainParams {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let params: Self = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(params)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        LandMap::new(self.level).context("invalid level")?;
        validate_deviation(self.deviation)?;
        if !(self.brightness_reference.is_finite() && self.brightness_reference > 0.0) {
            bail!(
                "brightness_reference must be positive (got {})",
                self.brightness_reference
            );
        }
        if self.mesh_size < 4 {
            bail!("mesh_size must be at least 4 (got {})", self.mesh_size);
        }
        for (i, step) in self.steps.iter().enumerate() {
            step.validate()
                .with_context(|| format!("step {i} is invalid"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn default_params_are_valid() {
        let params = TerrainParams::default();
        params.validate().unwrap();
        assert_eq!(params.steps.len(), 5);
    }

    #[test]
    fn parses_tagged_steps() {
        let json = r#"{
            "level": 5,
            "seed": 7,
            "deviation": 0.8,
            "steps": [
                { "effect": "perlin", "noise_scale": 12.0 },
                { "effect": "smooth", "amount": 2, "mode": "in_place" },
                { "effect": "erosion", "carrying_capacity": 1.5, "deposition_speed": 0.2,
                  "iterations": 2, "drops": 1000 },
                { "effect": "blend", "deviation": 1.2, "range": "zero_seeded",
                  "steps": [ { "effect": "voronoi", "u": 1.0, "v": 0.5 } ] }
            ]
        }"#;
        let params: TerrainParams = serde_json::from_str(json).unwrap();
        params.validate().unwrap();
        assert_eq!(params.level, 5);
        assert_eq!(params.seed, Some(7));
        // omitted fields fall back to defaults
        assert_eq!(params.mesh_size, 100);
        assert_eq!(
            params.steps[0],
            Step::Perlin(PerlinNoise {
                noise_scale: 12.0,
                rounding: 0.5
            })
        );
        assert_eq!(params.steps[1], Step::Smooth(Smooth::in_place(2)));
    }

    #[test]
    fn rejects_invalid_steps() {
        let json = r#"{ "steps": [ { "effect": "erosion", "carrying_capacity": 0.0,
            "deposition_speed": 0.2, "iterations": 2, "drops": 10 } ] }"#;
        let params: TerrainParams = serde_json::from_str(json).unwrap();
        assert!(params.validate().is_err());

        let bad_level = TerrainParams {
            level: 0,
            ..TerrainParams::default()
        };
        assert!(bad_level.validate().is_err());
    }

    #[test]
    fn blend_step_builds_source_terrain() {
        let step = Step::Blend {
            deviation: 0.5,
            range: BlendRange::Extrema,
            steps: vec![Step::Smooth(Smooth::new(2))],
        };
        let effect = step.build(3, &mut StdRng::seed_from_u64(4)).unwrap();
        match effect {
            Effect::Blend(blend) => assert_eq!(blend.other().size(), 9),
            other => panic!("unexpected effect {}", other.name()),
        }
    }
}
