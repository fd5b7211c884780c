//! # Configuration
//!
//! Runtime settings for world generation and the streaming pipeline. Every field has a
//! default, so a configuration file only needs to name the values it changes:
//!
//! ```json
//! { "seed": 1234, "view_radius": 6, "terrain": { "mountains_multiplier": 48.0 } }
//! ```

use std::{fs, path::Path, time::Duration};

use serde::{Deserialize, Serialize};

use super::error::VoxelResult;

/// Top-level settings for a streaming session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Master seed; every noise field derives its own seed from this one.
    pub seed: u32,
    /// Chebyshev radius, in chunks, of the region kept generated and meshed.
    pub view_radius: i32,
    /// Chebyshev radius, in chunks, inside which collision bodies are attached.
    pub collision_radius: i32,
    /// Worker count override. `None` uses available parallelism minus one.
    pub worker_count: Option<usize>,
    /// Wall-clock budget for draining the upload queue each frame.
    pub upload_time_budget_ms: u64,
    /// Maximum number of mesh results delivered per frame.
    pub upload_count_budget: usize,
    /// How long an idle worker sleeps when both work queues are empty.
    pub idle_sleep_ms: u64,
    /// How long `shutdown` waits for workers before detaching them.
    pub shutdown_timeout_ms: u64,
    /// Height-field settings.
    pub terrain: TerrainConfig,
    /// Climate and foliage settings.
    pub biome: BiomeConfig,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            seed: 0,
            view_radius: 4,
            collision_radius: 1,
            worker_count: None,
            upload_time_budget_ms: 4,
            upload_count_budget: 8,
            idle_sleep_ms: 2,
            shutdown_timeout_ms: 2_000,
            terrain: TerrainConfig::default(),
            biome: BiomeConfig::default(),
        }
    }
}

impl WorldConfig {
    /// Parses a configuration from JSON text.
    pub fn from_json_str(json: &str) -> VoxelResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> VoxelResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Upload drain wall-clock budget.
    pub fn upload_time_budget(&self) -> Duration {
        Duration::from_millis(self.upload_time_budget_ms)
    }

    /// Worker idle sleep.
    pub fn idle_sleep(&self) -> Duration {
        Duration::from_millis(self.idle_sleep_ms)
    }

    /// Shutdown join timeout.
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }

    /// Number of background workers to spawn.
    ///
    /// One hardware thread is left for the coordinating main thread.
    pub fn resolved_worker_count(&self) -> usize {
        match self.worker_count {
            Some(count) => count.max(1),
            None => std::thread::available_parallelism()
                .map(|n| n.get().saturating_sub(1))
                .unwrap_or(1)
                .max(1),
        }
    }
}

/// Height-field settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// World y around which the surface oscillates.
    pub base_height: i32,
    /// Frequency of the continuous height noise.
    pub height_frequency: f64,
    /// Frequency of the terrain-type noise that picks the amplitude band.
    pub terrain_type_frequency: f64,
    /// Amplitude multiplier for flatland.
    pub flatland_multiplier: f64,
    /// Amplitude multiplier for hills.
    pub hills_multiplier: f64,
    /// Amplitude multiplier for mountains.
    pub mountains_multiplier: f64,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        TerrainConfig {
            base_height: 16,
            height_frequency: 0.01,
            terrain_type_frequency: 0.002,
            flatland_multiplier: 4.0,
            hills_multiplier: 16.0,
            mountains_multiplier: 40.0,
        }
    }
}

impl TerrainConfig {
    /// Largest amplitude any band can produce.
    pub fn max_multiplier(&self) -> f64 {
        self.flatland_multiplier
            .max(self.hills_multiplier)
            .max(self.mountains_multiplier)
    }
}

/// Climate and foliage settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BiomeConfig {
    /// World z of the line where temperature peaks.
    pub equator_z: f64,
    /// Temperature lost per block of distance from the equator line.
    pub temperature_drop_per_unit: f64,
    /// Constant added to every temperature sample.
    pub global_temperature_offset: f64,
    /// Frequency of the temperature noise term.
    pub temperature_frequency: f64,
    /// Frequency of the humidity noise.
    pub humidity_frequency: f64,
    /// Temperatures below this are cold.
    pub cold_threshold: f64,
    /// Temperatures at or above this are hot.
    pub hot_threshold: f64,
    /// Humidities at or above this are wet.
    pub wet_threshold: f64,
    /// Probability that a surface column carries foliage.
    pub foliage_density: f32,
}

impl Default for BiomeConfig {
    fn default() -> Self {
        BiomeConfig {
            equator_z: 0.0,
            temperature_drop_per_unit: 1.0 / 2048.0,
            global_temperature_offset: -0.25,
            temperature_frequency: 0.004,
            humidity_frequency: 0.003,
            cold_threshold: 0.33,
            hot_threshold: 0.66,
            wet_threshold: 0.5,
            foliage_density: 0.08,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = WorldConfig::from_json_str(
            r#"{ "seed": 99, "terrain": { "hills_multiplier": 20.0 } }"#,
        )
        .unwrap();
        assert_eq!(config.seed, 99);
        assert_eq!(config.terrain.hills_multiplier, 20.0);
        assert_eq!(config.terrain.base_height, TerrainConfig::default().base_height);
        assert_eq!(config.view_radius, WorldConfig::default().view_radius);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(WorldConfig::from_json_str("{ seed: ").is_err());
    }

    #[test]
    fn worker_count_is_never_zero() {
        let config = WorldConfig {
            worker_count: Some(0),
            ..WorldConfig::default()
        };
        assert_eq!(config.resolved_worker_count(), 1);
        assert!(WorldConfig::default().resolved_worker_count() >= 1);
    }
}
