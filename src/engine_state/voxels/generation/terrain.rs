//! Height-field terrain.
//!
//! The surface height of a column is a continuous noise sample scaled by an amplitude
//! multiplier. A second, much lower-frequency noise picks that multiplier from three
//! bands (flatland, hills, mountains). The multiplier is interpolated linearly between
//! band anchors so that regions blend into each other without steps.

use std::sync::Arc;

use super::{BiomeClassifier, BiomeDefinition, WorldNoise};
use crate::engine_state::{
    config::TerrainConfig,
    voxels::block::{BlockTypeSize, AIR},
};

/// Terrain-type values at which each band's multiplier applies in full.
const FLATLAND_ANCHOR: f64 = 0.3;
const HILLS_ANCHOR: f64 = 0.5;
const MOUNTAINS_ANCHOR: f64 = 0.7;

/// Number of subsurface layers under the surface block.
pub const SUBSURFACE_DEPTH: i32 = 3;

/// Pure height and material function over world columns.
#[derive(Clone, Debug)]
pub struct TerrainGenerator {
    config: TerrainConfig,
    noise: Arc<WorldNoise>,
    classifier: BiomeClassifier,
}

impl TerrainGenerator {
    /// Creates a terrain generator.
    pub fn new(config: TerrainConfig, noise: Arc<WorldNoise>, classifier: BiomeClassifier) -> Self {
        TerrainGenerator {
            config,
            noise,
            classifier,
        }
    }

    /// The classifier supplying surface materials.
    pub fn classifier(&self) -> &BiomeClassifier {
        &self.classifier
    }

    /// The shared noise fields.
    pub fn noise(&self) -> &Arc<WorldNoise> {
        &self.noise
    }

    /// Amplitude multiplier for a terrain-type value in `[0, 1]`.
    pub fn amplitude_multiplier(&self, terrain_type: f64) -> f64 {
        let flat = self.config.flatland_multiplier;
        let hills = self.config.hills_multiplier;
        let mountains = self.config.mountains_multiplier;

        if terrain_type <= FLATLAND_ANCHOR {
            flat
        } else if terrain_type <= HILLS_ANCHOR {
            let t = (terrain_type - FLATLAND_ANCHOR) / (HILLS_ANCHOR - FLATLAND_ANCHOR);
            lerp(flat, hills, t)
        } else if terrain_type <= MOUNTAINS_ANCHOR {
            let t = (terrain_type - HILLS_ANCHOR) / (MOUNTAINS_ANCHOR - HILLS_ANCHOR);
            lerp(hills, mountains, t)
        } else {
            mountains
        }
    }

    /// Surface height of the column at `(world_x, world_z)`: the first empty y.
    ///
    /// Always within `base_height ± max_multiplier`.
    pub fn height(&self, world_x: i32, world_z: i32) -> i32 {
        let (x, z) = (world_x as f64, world_z as f64);
        let height_sample = self.noise.height.sample(x, z);
        let terrain_type = self.noise.terrain_type.sample_unit(x, z);
        let multiplier = self.amplitude_multiplier(terrain_type);
        // trunc keeps |offset| <= multiplier.
        self.config.base_height + (height_sample * multiplier).trunc() as i32
    }

    /// Block id at a world position.
    pub fn voxel(&self, world_x: i32, world_y: i32, world_z: i32) -> BlockTypeSize {
        let height = self.height(world_x, world_z);
        if world_y >= height {
            return AIR;
        }
        let biome = self.classifier.classify(world_x, world_z).biome;
        Self::block_in_column(world_y, height, &biome)
    }

    /// Block id at `world_y` in a column with the given surface height and biome.
    pub fn block_in_column(world_y: i32, height: i32, biome: &BiomeDefinition) -> BlockTypeSize {
        if world_y >= height {
            AIR
        } else if world_y == height - 1 {
            biome.surface.id()
        } else if world_y >= height - 1 - SUBSURFACE_DEPTH {
            biome.subsurface.id()
        } else {
            biome.deep.id()
        }
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::{config::WorldConfig, voxels::generation::WorldGenerator};
    use proptest::prelude::*;

    fn generator(seed: u32) -> WorldGenerator {
        WorldGenerator::new(&WorldConfig {
            seed,
            ..WorldConfig::default()
        })
    }

    #[test]
    fn multiplier_is_continuous_and_monotonic() {
        let generator = generator(1);
        let terrain = generator.terrain();
        let mut previous = terrain.amplitude_multiplier(0.0);
        for step in 1..=1000 {
            let t = step as f64 / 1000.0;
            let current = terrain.amplitude_multiplier(t);
            assert!(current >= previous);
            // No jump larger than the steepest slope allows over one step.
            assert!(current - previous < 0.2);
            previous = current;
        }
        let config = TerrainConfig::default();
        assert_eq!(terrain.amplitude_multiplier(0.0), config.flatland_multiplier);
        assert_eq!(terrain.amplitude_multiplier(0.5), config.hills_multiplier);
        assert_eq!(terrain.amplitude_multiplier(1.0), config.mountains_multiplier);
    }

    #[test]
    fn column_layers() {
        let generator = generator(2);
        let terrain = generator.terrain();
        let (x, z) = (17, -40);
        let height = terrain.height(x, z);
        let biome = terrain.classifier().classify(x, z).biome;

        assert_eq!(terrain.voxel(x, height, z), AIR);
        assert_eq!(terrain.voxel(x, height + 10, z), AIR);
        assert_eq!(terrain.voxel(x, height - 1, z), biome.surface.id());
        for depth in 2..=4 {
            assert_eq!(terrain.voxel(x, height - depth, z), biome.subsurface.id());
        }
        assert_eq!(terrain.voxel(x, height - 5, z), biome.deep.id());
        assert_eq!(terrain.voxel(x, height - 50, z), biome.deep.id());
    }

    proptest! {
        #[test]
        fn height_is_deterministic_and_bounded(
            seed in any::<u32>(),
            x in -100_000i32..100_000,
            z in -100_000i32..100_000,
        ) {
            let a = generator(seed);
            let b = generator(seed);
            let config = TerrainConfig::default();
            let max = config.max_multiplier();
            let height = a.terrain().height(x, z);
            prop_assert_eq!(height, b.terrain().height(x, z));
            prop_assert!(height as f64 >= config.base_height as f64 - max);
            prop_assert!(height as f64 <= config.base_height as f64 + max);
        }
    }
}
