//! Billboard geometry for foliage.
//!
//! Each placement becomes two vertical quads crossing diagonally through the voxel it
//! stands in. Both quads are indexed from both sides so they stay visible with backface
//! culling enabled.

use std::f32::consts::FRAC_1_SQRT_2;

use super::mesh::RenderGeometry;
use crate::engine_state::{
    rendering::Vertex, voxels::generation::foliage::FoliagePlacement,
};

const FRONT: [usize; 6] = [0, 1, 2, 0, 2, 3];
const BACK: [usize; 6] = [0, 2, 1, 0, 3, 2];
const TEX_COORDS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

/// Builds crossed-quad billboards for every placement.
pub fn mesh_foliage(placements: &[FoliagePlacement]) -> RenderGeometry {
    let mut geometry = RenderGeometry::new();
    for placement in placements {
        let [x, y, z] = [placement.position.x, placement.position.y, placement.position.z]
            .map(|c| c as f32);
        let material = placement.foliage.code();

        let diagonals = [
            ([x, z], [x + 1.0, z + 1.0], [-FRAC_1_SQRT_2, 0.0, FRAC_1_SQRT_2]),
            ([x + 1.0, z], [x, z + 1.0], [-FRAC_1_SQRT_2, 0.0, -FRAC_1_SQRT_2]),
        ];
        for (start, end, normal) in diagonals {
            let corners = [
                [start[0], y, start[1]],
                [end[0], y, end[1]],
                [end[0], y + 1.0, end[1]],
                [start[0], y + 1.0, start[1]],
            ];
            let first = geometry.vertices.len() as u32;
            geometry.vertices.extend(
                [0, 1, 2, 3].map(|i| Vertex::new(corners[i], normal, TEX_COORDS[i], material)),
            );
            geometry
                .indices
                .extend(FRONT.iter().chain(BACK.iter()).map(|&i| first + i as u32));
        }
    }
    geometry
}

#[cfg(test)]
mod tests {
    use cgmath::Point3;

    use super::*;
    use crate::engine_state::voxels::generation::foliage::FoliageType;

    #[test]
    fn one_billboard_per_placement() {
        let placements = [
            FoliagePlacement {
                position: Point3::new(3, 4, 5),
                foliage: FoliageType::Fern,
            },
            FoliagePlacement {
                position: Point3::new(0, 15, 0),
                foliage: FoliageType::Cactus,
            },
        ];
        let geometry = mesh_foliage(&placements);
        assert_eq!(geometry.vertices.len(), 16);
        assert_eq!(geometry.indices.len(), 48);
        assert!(geometry.vertices[..8]
            .iter()
            .all(|v| v.material == FoliageType::Fern.code()));
        assert!(geometry.vertices[8..]
            .iter()
            .all(|v| v.material == FoliageType::Cactus.code()));
        assert!(geometry.indices.iter().all(|&i| (i as usize) < 16));
    }

    #[test]
    fn billboard_fills_voxel_footprint() {
        let geometry = mesh_foliage(&[FoliagePlacement {
            position: Point3::new(2, 7, 9),
            foliage: FoliageType::TallGrass,
        }]);
        for v in &geometry.vertices {
            assert!((2.0..=3.0).contains(&v.position[0]));
            assert!((7.0..=8.0).contains(&v.position[1]));
            assert!((9.0..=10.0).contains(&v.position[2]));
        }
        assert!(mesh_foliage(&[]).is_empty());
    }
}
