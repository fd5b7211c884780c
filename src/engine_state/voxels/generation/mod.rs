//! # World Generation
//!
//! Procedural content for the streamer: a height field ([`TerrainGenerator`]), climate
//! classification ([`BiomeClassifier`]) and foliage placement, combined into whole chunks
//! by [`WorldGenerator`].
//!
//! All randomness flows from one master seed through [`WorldNoise`], which is built once
//! per session and shared with every worker. Identical seeds and coordinates always
//! produce identical chunks.

use std::sync::Arc;

use cgmath::Point3;
use log::warn;
use noise::{NoiseFn, Perlin};

use super::chunk::{ChunkBuilder, ChunkData, CHUNK_DIMENSION};
use crate::engine_state::config::WorldConfig;

pub mod biome;
pub mod foliage;
pub mod terrain;

pub use biome::{BiomeClassifier, BiomeDefinition, BiomeType, ClimateSample};
pub use foliage::{FoliagePlacement, FoliageType};
pub use terrain::TerrainGenerator;

/// Salts used to derive independent seeds from the master seed.
const HEIGHT_SALT: u64 = 0x4845_4947_4854;
const TERRAIN_TYPE_SALT: u64 = 0x5459_5045;
const TEMPERATURE_SALT: u64 = 0x5445_4d50;
const HUMIDITY_SALT: u64 = 0x4855_4d49_44;
const FOLIAGE_SALT: u64 = 0x464f_4c49_4147_45;

/// Mixes a master seed with a salt (splitmix64 finaliser).
pub fn derive_seed(master: u32, salt: u64) -> u64 {
    let mut z = (master as u64).wrapping_add(salt).wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// A single seeded 2D noise field with its own sampling offset.
#[derive(Clone, Debug)]
pub struct NoiseField {
    perlin: Perlin,
    offset: [f64; 2],
    frequency: f64,
}

impl NoiseField {
    /// Creates a field seeded from `seed`. The coordinate offset is derived from the same
    /// seed so fields sharing a frequency still sample unrelated regions.
    pub fn new(seed: u64, frequency: f64) -> Self {
        let offset_x = ((seed >> 12) & 0xFFFF) as f64 + 0.371;
        let offset_z = ((seed >> 36) & 0xFFFF) as f64 + 0.613;
        NoiseField {
            perlin: Perlin::new(seed as u32),
            offset: [offset_x, offset_z],
            frequency,
        }
    }

    /// Samples the field at a world column. Results lie in `[-1, 1]`.
    pub fn sample(&self, world_x: f64, world_z: f64) -> f64 {
        self.perlin
            .get([
                world_x * self.frequency + self.offset[0],
                world_z * self.frequency + self.offset[1],
            ])
            .clamp(-1.0, 1.0)
    }

    /// Samples the field and remaps it to `[0, 1]`.
    pub fn sample_unit(&self, world_x: f64, world_z: f64) -> f64 {
        (self.sample(world_x, world_z) + 1.0) * 0.5
    }
}

/// Every noise field used by generation, created once per session.
#[derive(Clone, Debug)]
pub struct WorldNoise {
    /// The master seed everything derives from.
    pub seed: u32,
    /// Continuous surface height noise.
    pub height: NoiseField,
    /// Noise selecting flatland, hills or mountains.
    pub terrain_type: NoiseField,
    /// Temperature perturbation noise.
    pub temperature: NoiseField,
    /// Humidity noise.
    pub humidity: NoiseField,
    /// Seed for per-column foliage draws.
    pub foliage_seed: u64,
}

impl WorldNoise {
    /// Builds every field from the configured master seed and frequencies.
    pub fn new(config: &WorldConfig) -> Self {
        let seed = config.seed;
        WorldNoise {
            seed,
            height: NoiseField::new(
                derive_seed(seed, HEIGHT_SALT),
                config.terrain.height_frequency,
            ),
            terrain_type: NoiseField::new(
                derive_seed(seed, TERRAIN_TYPE_SALT),
                config.terrain.terrain_type_frequency,
            ),
            temperature: NoiseField::new(
                derive_seed(seed, TEMPERATURE_SALT),
                config.biome.temperature_frequency,
            ),
            humidity: NoiseField::new(
                derive_seed(seed, HUMIDITY_SALT),
                config.biome.humidity_frequency,
            ),
            foliage_seed: derive_seed(seed, FOLIAGE_SALT),
        }
    }
}

/// Column facts computed once per (x, z) while generating a chunk.
#[derive(Clone, Copy, Debug)]
struct ColumnPlan {
    height: i32,
    biome: BiomeDefinition,
    foliage: Option<FoliageType>,
}

/// Produces complete chunks from a seed.
#[derive(Clone, Debug)]
pub struct WorldGenerator {
    terrain: TerrainGenerator,
    foliage_density: f32,
}

impl WorldGenerator {
    /// Creates a generator and its shared noise from a configuration.
    pub fn new(config: &WorldConfig) -> Self {
        Self::with_noise(config, Arc::new(WorldNoise::new(config)))
    }

    /// Creates a generator around an existing noise set.
    pub fn with_noise(config: &WorldConfig, noise: Arc<WorldNoise>) -> Self {
        let classifier = BiomeClassifier::new(config.biome.clone(), noise.clone());
        WorldGenerator {
            terrain: TerrainGenerator::new(config.terrain.clone(), noise, classifier),
            foliage_density: config.biome.foliage_density,
        }
    }

    /// The height/material function.
    pub fn terrain(&self) -> &TerrainGenerator {
        &self.terrain
    }

    /// The climate classifier.
    pub fn classifier(&self) -> &BiomeClassifier {
        self.terrain.classifier()
    }

    /// Generates the chunk at `position` (in chunk coordinates).
    pub fn generate_chunk(&self, position: Point3<i32>) -> ChunkData {
        let base_x = position.x * CHUNK_DIMENSION;
        let base_y = position.y * CHUNK_DIMENSION;
        let base_z = position.z * CHUNK_DIMENSION;
        let seed = self.terrain.noise().foliage_seed;

        let mut columns = Vec::with_capacity((CHUNK_DIMENSION * CHUNK_DIMENSION) as usize);
        for k in 0..CHUNK_DIMENSION {
            for i in 0..CHUNK_DIMENSION {
                let (world_x, world_z) = (base_x + i, base_z + k);
                let height = self.terrain.height(world_x, world_z);
                let biome = self.classifier().classify(world_x, world_z).biome;
                let foliage = foliage::place_foliage(
                    world_x,
                    world_z,
                    seed,
                    self.foliage_density,
                    biome.biome_type,
                );
                columns.push(ColumnPlan {
                    height,
                    biome,
                    foliage,
                });
            }
        }

        let mut builder = ChunkBuilder::new();
        for k in 0..CHUNK_DIMENSION {
            for j in 0..CHUNK_DIMENSION {
                for i in 0..CHUNK_DIMENSION {
                    let column = &columns[(i + k * CHUNK_DIMENSION) as usize];
                    builder.push_block_type(TerrainGenerator::block_in_column(
                        base_y + j,
                        column.height,
                        &column.biome,
                    ));
                }
            }
        }

        // Foliage stands on the surface, in the first air voxel of the column.
        for k in 0..CHUNK_DIMENSION {
            for i in 0..CHUNK_DIMENSION {
                let column = &columns[(i + k * CHUNK_DIMENSION) as usize];
                let local_y = column.height - base_y;
                if let (Some(foliage), true) =
                    (column.foliage, (0..CHUNK_DIMENSION).contains(&local_y))
                {
                    builder.push_foliage(FoliagePlacement {
                        position: Point3::new(i as u8, local_y as u8, k as u8),
                        foliage,
                    });
                }
            }
        }

        if builder.rejected_writes() > 0 {
            warn!(
                "Chunk {:?} generated with {} rejected voxel writes",
                position,
                builder.rejected_writes()
            );
        }
        builder.return_chunk()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::AIR;

    fn config(seed: u32) -> WorldConfig {
        WorldConfig {
            seed,
            ..WorldConfig::default()
        }
    }

    #[test]
    fn derived_seeds_differ_per_field() {
        let seeds = [HEIGHT_SALT, TERRAIN_TYPE_SALT, TEMPERATURE_SALT, HUMIDITY_SALT, FOLIAGE_SALT]
            .map(|salt| derive_seed(7, salt));
        for (i, a) in seeds.iter().enumerate() {
            for b in &seeds[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert_ne!(derive_seed(7, HEIGHT_SALT), derive_seed(8, HEIGHT_SALT));
    }

    #[test]
    fn noise_samples_are_bounded() {
        let field = NoiseField::new(42, 0.05);
        for x in -50..50 {
            let value = field.sample(x as f64 * 3.7, x as f64 * -1.3);
            assert!((-1.0..=1.0).contains(&value));
            let unit = field.sample_unit(x as f64, 0.0);
            assert!((0.0..=1.0).contains(&unit));
        }
    }

    #[test]
    fn generation_is_deterministic() {
        let a = WorldGenerator::new(&config(11));
        let b = WorldGenerator::new(&config(11));
        let position = Point3::new(3, 0, -2);
        assert_eq!(a.generate_chunk(position), b.generate_chunk(position));
    }

    #[test]
    fn chunk_matches_voxel_function() {
        let generator = WorldGenerator::new(&config(5));
        let position = Point3::new(-1, 1, 2);
        let chunk = generator.generate_chunk(position);
        for (x, y, z) in [(0, 0, 0), (15, 15, 15), (3, 9, 12), (8, 1, 0)] {
            let expected = generator.terrain().voxel(
                position.x * CHUNK_DIMENSION + x,
                position.y * CHUNK_DIMENSION + y,
                position.z * CHUNK_DIMENSION + z,
            );
            assert_eq!(chunk.get(x, y, z), expected);
        }
    }

    #[test]
    fn high_chunks_are_empty_and_deep_chunks_full() {
        let generator = WorldGenerator::new(&config(3));
        assert!(generator.generate_chunk(Point3::new(0, 20, 0)).is_empty());
        let deep = generator.generate_chunk(Point3::new(0, -20, 0));
        assert_eq!(deep.solid_count(), 4096);
        assert!(deep.blocks().all(|(_, block)| block != AIR));
    }

    #[test]
    fn foliage_sits_on_the_surface() {
        let config = WorldConfig {
            biome: crate::engine_state::config::BiomeConfig {
                foliage_density: 1.0,
                ..Default::default()
            },
            ..config(9)
        };
        let generator = WorldGenerator::new(&config);
        let mut placements = 0;
        for y in -2..4 {
            let position = Point3::new(0, y, 0);
            let chunk = generator.generate_chunk(position);
            for placement in chunk.foliage() {
                let p = placement.position;
                assert_eq!(chunk.get(p.x as i32, p.y as i32, p.z as i32), AIR);
                let world_x = p.x as i32;
                let world_z = p.z as i32;
                let height = generator.terrain().height(world_x, world_z);
                assert_eq!(y * CHUNK_DIMENSION + p.y as i32, height);
                placements += 1;
            }
        }
        // Every column carries foliage at density 1.
        assert_eq!(placements, 256);
    }
}
