//! Climate sampling and biome archetypes.
//!
//! Temperature falls off with distance from an equator line and is perturbed by noise;
//! humidity is independent noise. The pair is bucketed into {cold, temperate, hot} x
//! {dry, wet}, giving six biomes, each with fixed surface materials and two candidate
//! foliage types.

use std::sync::Arc;

use super::{FoliageType, WorldNoise};
use crate::engine_state::{config::BiomeConfig, voxels::block::BlockType};

/// Weight of the noise term in the temperature formula.
const TEMPERATURE_NOISE_WEIGHT: f64 = 0.2;

/// The six biome archetypes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BiomeType {
    /// Cold and dry.
    Tundra,
    /// Cold and wet.
    Taiga,
    /// Temperate and dry.
    Plains,
    /// Temperate and wet.
    Forest,
    /// Hot and dry.
    Desert,
    /// Hot and wet.
    Swamp,
}

impl BiomeType {
    /// Picks a biome from climate buckets.
    pub fn from_climate(temperature: TemperatureBand, wet: bool) -> Self {
        match (temperature, wet) {
            (TemperatureBand::Cold, false) => BiomeType::Tundra,
            (TemperatureBand::Cold, true) => BiomeType::Taiga,
            (TemperatureBand::Temperate, false) => BiomeType::Plains,
            (TemperatureBand::Temperate, true) => BiomeType::Forest,
            (TemperatureBand::Hot, false) => BiomeType::Desert,
            (TemperatureBand::Hot, true) => BiomeType::Swamp,
        }
    }

    /// The block archetype of this biome.
    pub fn definition(self) -> BiomeDefinition {
        let (surface, subsurface, deep) = match self {
            BiomeType::Tundra => (BlockType::SNOW, BlockType::GRAVEL, BlockType::STONE),
            BiomeType::Taiga => (BlockType::PODZOL, BlockType::DIRT, BlockType::STONE),
            BiomeType::Plains => (BlockType::GRASS, BlockType::DIRT, BlockType::STONE),
            BiomeType::Forest => (BlockType::MOSS, BlockType::DIRT, BlockType::STONE),
            BiomeType::Desert => (BlockType::SAND, BlockType::SANDSTONE, BlockType::STONE),
            BiomeType::Swamp => (BlockType::MUD, BlockType::CLAY, BlockType::STONE),
        };
        BiomeDefinition {
            biome_type: self,
            surface,
            subsurface,
            deep,
        }
    }

    /// The two foliage types that may grow in this biome.
    pub fn foliage(self) -> [FoliageType; 2] {
        match self {
            BiomeType::Tundra => [FoliageType::FrostGrass, FoliageType::DeadBush],
            BiomeType::Taiga => [FoliageType::Fern, FoliageType::BerryBush],
            BiomeType::Plains => [FoliageType::TallGrass, FoliageType::Flower],
            BiomeType::Forest => [FoliageType::Fern, FoliageType::Mushroom],
            BiomeType::Desert => [FoliageType::DeadBush, FoliageType::Cactus],
            BiomeType::Swamp => [FoliageType::Reed, FoliageType::Mushroom],
        }
    }
}

/// Temperature bucket.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TemperatureBand {
    /// Below the cold threshold.
    Cold,
    /// Between the thresholds.
    Temperate,
    /// At or above the hot threshold.
    Hot,
}

/// The block archetype of a biome.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BiomeDefinition {
    /// Which biome this is.
    pub biome_type: BiomeType,
    /// Top block of a column.
    pub surface: BlockType,
    /// The few layers under the surface.
    pub subsurface: BlockType,
    /// Everything below the subsurface.
    pub deep: BlockType,
}

/// Result of classifying one column.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ClimateSample {
    /// The chosen biome archetype.
    pub biome: BiomeDefinition,
    /// Temperature in `[0, 1]`.
    pub temperature: f64,
    /// Humidity in `[0, 1]`.
    pub humidity: f64,
}

/// Deterministic climate classifier. Results are recomputed on every call, never cached.
#[derive(Clone, Debug)]
pub struct BiomeClassifier {
    config: BiomeConfig,
    noise: Arc<WorldNoise>,
}

impl BiomeClassifier {
    /// Creates a classifier over shared noise.
    pub fn new(config: BiomeConfig, noise: Arc<WorldNoise>) -> Self {
        BiomeClassifier { config, noise }
    }

    /// Temperature of a column in `[0, 1]`.
    pub fn temperature(&self, world_x: i32, world_z: i32) -> f64 {
        let distance = (world_z as f64 - self.config.equator_z).abs();
        let noise_term = self.noise.temperature.sample(world_x as f64, world_z as f64);
        (1.0 - distance * self.config.temperature_drop_per_unit
            + noise_term * TEMPERATURE_NOISE_WEIGHT
            + self.config.global_temperature_offset)
            .clamp(0.0, 1.0)
    }

    /// Humidity of a column in `[0, 1]`.
    pub fn humidity(&self, world_x: i32, world_z: i32) -> f64 {
        self.noise
            .humidity
            .sample_unit(world_x as f64, world_z as f64)
            .clamp(0.0, 1.0)
    }

    /// Buckets a temperature value.
    pub fn temperature_band(&self, temperature: f64) -> TemperatureBand {
        if temperature < self.config.cold_threshold {
            TemperatureBand::Cold
        } else if temperature < self.config.hot_threshold {
            TemperatureBand::Temperate
        } else {
            TemperatureBand::Hot
        }
    }

    /// Classifies the column at `(world_x, world_z)`.
    pub fn classify(&self, world_x: i32, world_z: i32) -> ClimateSample {
        let temperature = self.temperature(world_x, world_z);
        let humidity = self.humidity(world_x, world_z);
        let band = self.temperature_band(temperature);
        let wet = humidity >= self.config.wet_threshold;
        ClimateSample {
            biome: BiomeType::from_climate(band, wet).definition(),
            temperature,
            humidity,
        }
    }
}
