use rand::Rng;

use crate::blend2::Blend;
use crate::erosion2::HydraulicErosion;
use crate::error::Result;
use crate::fbm2::FractalBrownianMotion;
use crate::landmap::LandMap;
use crate::perlin2::{OctavePerlinNoise, PerlinNoise};
use crate::smooth2::Smooth;
use crate::voronoi2::VoroNoise;

/// One grid transformation with its own immutable configuration.
/// Effects that draw randomness take it from the handle passed to `apply`.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Perlin(PerlinNoise),
    OctavePerlin(OctavePerlinNoise),
    Fbm(FractalBrownianMotion),
    Voronoi(VoroNoise),
    Smooth(Smooth),
    Erosion(HydraulicErosion),
    Blend(Blend),
}

impl Effect {
    pub fn name(&self) -> &'static str {
        match self {
            Effect::Perlin(_) => "perlin",
            Effect::OctavePerlin(_) => "octave_perlin",
            Effect::Fbm(_) => "fbm",
            Effect::Voronoi(_) => "voronoi",
            Effect::Smooth(_) => "smooth",
            Effect::Erosion(_) => "erosion",
            Effect::Blend(_) => "blend",
        }
    }

    /// Mutates `map` in place. Only a blend against a grid of another size fails.
    pub fn apply<R: Rng + ?Sized>(&self, map: &mut LandMap, rng: &mut R) -> Result<()> {
        match self {
            Effect::Perlin(e) => e.apply(map, rng),
            Effect::OctavePerlin(e) => e.apply(map, rng),
            Effect::Fbm(e) => e.apply(map),
            Effect::Voronoi(e) => e.apply(map),
            Effect::Smooth(e) => e.apply(map),
            Effect::Erosion(e) => e.apply(map, rng),
            Effect::Blend(e) => e.apply(map)?,
        }
        Ok(())
    }
}

macro_rules! impl_from_effect {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for Effect {
                fn from(effect: $ty) -> Self {
                    Effect::$variant(effect)
                }
            }
        )*
    };
}

impl_from_effect!(
    Perlin(PerlinNoise),
    OctavePerlin(OctavePerlinNoise),
    Fbm(FractalBrownianMotion),
    Voronoi(VoroNoise),
    Smooth(Smooth),
    Erosion(HydraulicErosion),
    Blend(Blend),
);

/// Ordered list of effects. Order matters: each effect sees the output of
/// the one before it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pipeline {
    effects: Vec<Effect>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, effect: impl Into<Effect>) -> &mut Self {
        self.effects.push(effect.into());
        self
    }

    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Applies every effect in order, stopping at the first failure.
    pub fn run<R: Rng + ?Sized>(&self, map: &mut LandMap, rng: &mut R) -> Result<()> {
        self.effects
            .iter()
            .try_for_each(|effect| effect.apply(map, rng))
    }
}

impl FromIterator<Effect> for Pipeline {
    fn from_iter<I: IntoIterator<Item = Effect>>(iter: I) -> Self {
        Self {
            effects: iter.into_iter().collect(),
        }
    }
}
