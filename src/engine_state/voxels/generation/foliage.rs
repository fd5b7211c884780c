//! Foliage types and deterministic per-column placement.
//!
//! Each surface column draws from a generator seeded by hashing its world coordinates
//! with the world's foliage seed. The first draw gates on the configured density; the
//! second picks one of the biome's two foliage types.

use cgmath::Point3;

use super::BiomeType;

/// Billboard foliage kinds. The discriminant is the per-vertex foliage code.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FoliageType {
    /// Tall grass tufts.
    TallGrass = 0,
    /// Small flowers.
    Flower = 1,
    /// Ferns.
    Fern = 2,
    /// Berry bushes.
    BerryBush = 3,
    /// Mushrooms.
    Mushroom = 4,
    /// Dry shrubs.
    DeadBush = 5,
    /// Small cacti.
    Cactus = 6,
    /// Frosted grass.
    FrostGrass = 7,
    /// Reeds.
    Reed = 8,
}

impl FoliageType {
    /// Per-vertex code used to select the foliage texture.
    pub fn code(self) -> u32 {
        self as u32
    }
}

/// A foliage billboard attached to a chunk at generation time.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FoliagePlacement {
    /// Chunk-local voxel the billboard stands in.
    pub position: Point3<u8>,
    /// What grows there.
    pub foliage: FoliageType,
}

/// Hashes a world column together with the foliage seed.
pub fn column_hash(world_x: i32, world_z: i32, seed: u64) -> u64 {
    let mut h = seed ^ 0xCBF2_9CE4_8422_2325;
    for value in [world_x as u32 as u64, world_z as u32 as u64] {
        h ^= value;
        h = h.wrapping_mul(0x0000_0100_0000_01B3);
        h ^= h >> 29;
    }
    // fmix64
    h = (h ^ (h >> 33)).wrapping_mul(0xFF51_AFD7_ED55_8CCD);
    h = (h ^ (h >> 33)).wrapping_mul(0xC4CE_B9FE_1A85_EC53);
    h ^ (h >> 33)
}

/// Decides whether, and what, foliage grows on the column at `(world_x, world_z)`.
pub fn place_foliage(
    world_x: i32,
    world_z: i32,
    seed: u64,
    density: f32,
    biome: BiomeType,
) -> Option<FoliageType> {
    let mut rng = fastrand::Rng::with_seed(column_hash(world_x, world_z, seed));
    if rng.f32() >= density {
        return None;
    }
    let [first, second] = biome.foliage();
    Some(if rng.bool() { first } else { second })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placement_is_deterministic() {
        for x in -20..20 {
            for z in -20..20 {
                assert_eq!(
                    place_foliage(x, z, 77, 0.5, BiomeType::Plains),
                    place_foliage(x, z, 77, 0.5, BiomeType::Plains)
                );
            }
        }
    }

    #[test]
    fn density_gates_placement() {
        let columns = (-30..30).flat_map(|x| (-30..30).map(move |z| (x, z)));
        assert!(columns
            .clone()
            .all(|(x, z)| place_foliage(x, z, 1, 0.0, BiomeType::Forest).is_none()));
        assert!(columns
            .clone()
            .all(|(x, z)| place_foliage(x, z, 1, 1.0, BiomeType::Forest).is_some()));

        let placed = columns
            .filter(|&(x, z)| place_foliage(x, z, 1, 0.25, BiomeType::Forest).is_some())
            .count();
        // 3600 columns at 25%: comfortably inside these bounds.
        assert!((600..1200).contains(&placed), "placed {placed}");
    }

    #[test]
    fn only_biome_foliage_is_chosen() {
        let allowed = BiomeType::Desert.foliage();
        let mut seen = [false; 2];
        for x in 0..64 {
            let foliage = place_foliage(x, 3, 5, 1.0, BiomeType::Desert).unwrap();
            let slot = allowed.iter().position(|&f| f == foliage).unwrap();
            seen[slot] = true;
        }
        assert_eq!(seen, [true, true]);
    }

    #[test]
    fn hash_depends_on_both_coordinates_and_seed() {
        let base = column_hash(1, 2, 3);
        assert_ne!(base, column_hash(2, 1, 3));
        assert_ne!(base, column_hash(1, 2, 4));
    }
}
