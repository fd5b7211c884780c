//! Greedy meshing implementation for voxel rendering.
//!
//! This module implements the greedy meshing algorithm which combines adjacent coplanar
//! faces with the same block type into larger quads, reducing the number of vertices
//! needed to render a chunk.
//!
//! The chunk and a one-block border taken from its six neighbours are loaded into a
//! padded 18x18x18 solidity volume. For each axis a plane sweeps from just outside the
//! minus face (-1) to the last interior layer (15), comparing the cells on either side:
//!
//! - minus side solid, plus side empty: `+block` (face looking towards +axis)
//! - minus side empty, plus side solid: `-block` (face looking towards -axis)
//! - otherwise: no face
//!
//! A face belongs to the chunk holding its solid side, so a boundary face between two
//! chunks is emitted by exactly one of them. Each slice's mask is then merged row-major
//! into maximal same-valued rectangles.

use std::sync::Arc;

use bitvec::prelude::*;

use super::{face::Quad, mesh::RenderGeometry};
use crate::engine_state::{
    rendering::texture::MaterialProvider,
    voxels::{
        block::{BlockSide, BlockTypeSize},
        chunk::{
            ChunkData, CHUNK_DIMENSION, CHUNK_DIMENSION_WRAPPED, CHUNK_PLANE_SIZE_WRAPPED,
            CHUNK_SIZE_WRAPPED,
        },
    },
};

const DIM: usize = CHUNK_DIMENSION as usize;

/// Index into the padded volume; coordinates are already shifted by one.
fn wrapped_index(x: usize, y: usize, z: usize) -> usize {
    x + y * CHUNK_DIMENSION_WRAPPED + z * CHUNK_PLANE_SIZE_WRAPPED
}

/// Axis and direction of a face's normal.
fn side_axis(side: BlockSide) -> (usize, bool) {
    let normal = side.normal();
    let components = [normal.x, normal.y, normal.z];
    let axis = components.iter().position(|&c| c != 0).unwrap_or(0);
    (axis, components[axis] > 0)
}

/// Output of a greedy meshing pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GreedyMesh {
    /// Render geometry with per-vertex normals, tiled UVs and texture layers.
    pub geometry: RenderGeometry,
    /// Flattened triangle list, three corners per triangle, for physics.
    pub collision: Vec<[f32; 3]>,
}

/// Greedy mesher over one chunk and its face neighbours.
pub struct GreedyMesher<'a> {
    chunk: &'a ChunkData,
    solid: BitVec,
}

impl<'a> GreedyMesher<'a> {
    /// Loads `chunk` and the border layers of `neighbors` (in [`BlockSide::all`] order).
    /// A missing neighbour counts as empty space.
    pub fn new(chunk: &'a ChunkData, neighbors: &[Option<Arc<ChunkData>>; 6]) -> Self {
        let mut solid = bitvec![0; CHUNK_SIZE_WRAPPED];
        for (position, _) in chunk.blocks() {
            solid.set(wrapped_index(position.x + 1, position.y + 1, position.z + 1), true);
        }

        for (side, neighbor) in BlockSide::all().into_iter().zip(neighbors) {
            let Some(neighbor) = neighbor else { continue };
            let (axis, positive) = side_axis(side);
            let (padded_layer, source_layer) = if positive { (DIM + 1, 0) } else { (0, DIM - 1) };

            for a in 0..DIM {
                for b in 0..DIM {
                    let mut local = [0usize; 3];
                    local[axis] = source_layer;
                    local[(axis + 1) % 3] = a;
                    local[(axis + 2) % 3] = b;
                    if !neighbor.is_solid(local[0] as i32, local[1] as i32, local[2] as i32) {
                        continue;
                    }
                    let mut padded = local.map(|c| c + 1);
                    padded[axis] = padded_layer;
                    solid.set(wrapped_index(padded[0], padded[1], padded[2]), true);
                }
            }
        }

        GreedyMesher { chunk, solid }
    }

    /// Solidity at a chunk-local position in -1..=16 on every axis.
    fn solid_at(&self, position: [i32; 3]) -> bool {
        let [x, y, z] = position.map(|c| (c + 1) as usize);
        self.solid[wrapped_index(x, y, z)]
    }

    /// Builds the face mask for the plane between layer `xd` and `xd + 1` along `axis`.
    fn slice_mask(&self, axis: usize, xd: i32, mask: &mut [i32]) {
        let u_axis = (axis + 1) % 3;
        let v_axis = (axis + 2) % 3;
        let last = CHUNK_DIMENSION - 1;

        for v in 0..CHUNK_DIMENSION {
            for u in 0..CHUNK_DIMENSION {
                let mut minus = [0i32; 3];
                minus[axis] = xd;
                minus[u_axis] = u;
                minus[v_axis] = v;
                let mut plus = minus;
                plus[axis] += 1;

                let minus_solid = self.solid_at(minus);
                let plus_solid = self.solid_at(plus);
                let cell = &mut mask[u as usize + v as usize * DIM];
                *cell = if minus_solid && !plus_solid && xd >= 0 {
                    self.chunk.get(minus[0], minus[1], minus[2]) as i32
                } else if !minus_solid && plus_solid && xd < last {
                    -(self.chunk.get(plus[0], plus[1], plus[2]) as i32)
                } else {
                    0
                };
            }
        }
    }

    /// Merges every face whose normal lies along `axis` into maximal rectangles.
    pub fn quads_for_axis(&self, axis: usize) -> Vec<Quad> {
        let mut quads = Vec::new();
        let mut mask = vec![0i32; DIM * DIM];

        for xd in -1..CHUNK_DIMENSION {
            self.slice_mask(axis, xd, &mut mask);

            for v in 0..DIM {
                let mut u = 0;
                while u < DIM {
                    let value = mask[u + v * DIM];
                    if value == 0 {
                        u += 1;
                        continue;
                    }

                    let mut width = 1;
                    while u + width < DIM && mask[u + width + v * DIM] == value {
                        width += 1;
                    }

                    let mut height = 1;
                    'grow: while v + height < DIM {
                        let row = (v + height) * DIM;
                        for k in 0..width {
                            if mask[u + k + row] != value {
                                break 'grow;
                            }
                        }
                        height += 1;
                    }

                    quads.push(Quad {
                        axis,
                        slice: (xd + 1) as usize,
                        u,
                        v,
                        width,
                        height,
                        block: value.unsigned_abs() as BlockTypeSize,
                        positive: value > 0,
                    });

                    for row in v..v + height {
                        mask[u + row * DIM..u + width + row * DIM].fill(0);
                    }
                    u += width;
                }
            }
        }

        quads
    }

    /// Meshes the given axes, in order.
    pub fn mesh_axes(&self, axes: &[usize], materials: &dyn MaterialProvider) -> GreedyMesh {
        let mut mesh = GreedyMesh::default();
        for &axis in axes {
            for quad in self.quads_for_axis(axis) {
                let material = materials.texture_layer(quad.block, quad.side());
                mesh.geometry
                    .push_terrain_quad(&quad, material, &mut mesh.collision);
            }
        }
        mesh
    }

    /// Meshes all three axes.
    pub fn mesh(&self, materials: &dyn MaterialProvider) -> GreedyMesh {
        self.mesh_axes(&[0, 1, 2], materials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::{rendering::texture::BlockTextureTable, voxels::block::BlockType};

    const NONE: [Option<Arc<ChunkData>>; 6] = [None, None, None, None, None, None];

    fn all_quads(mesher: &GreedyMesher) -> Vec<Quad> {
        (0..3).flat_map(|axis| mesher.quads_for_axis(axis)).collect()
    }

    fn chunk_with(blocks: &[([i32; 3], BlockTypeSize)]) -> ChunkData {
        let mut chunk = ChunkData::new();
        for &([x, y, z], block) in blocks {
            chunk.set(x, y, z, block).unwrap();
        }
        chunk
    }

    #[test]
    fn empty_chunk_has_no_quads() {
        let chunk = ChunkData::new();
        let mesh = GreedyMesher::new(&chunk, &NONE).mesh(&BlockTextureTable::default());
        assert!(mesh.geometry.is_empty());
        assert!(mesh.collision.is_empty());
    }

    #[test]
    fn buried_solid_chunk_has_no_quads() {
        let stone = BlockType::STONE.id();
        let chunk = ChunkData::filled(stone);
        let neighbors = [(); 6].map(|_| Some(Arc::new(ChunkData::filled(stone))));
        let mesher = GreedyMesher::new(&chunk, &neighbors);
        assert!(all_quads(&mesher).is_empty());
    }

    #[test]
    fn lone_solid_chunk_has_six_full_faces() {
        let chunk = ChunkData::filled(BlockType::STONE.id());
        let quads = all_quads(&GreedyMesher::new(&chunk, &NONE));
        assert_eq!(quads.len(), 6);
        assert!(quads.iter().all(|q| q.width == 16 && q.height == 16));
    }

    #[test]
    fn single_voxel_yields_six_unit_quads() {
        let chunk = chunk_with(&[([0, 0, 0], BlockType::DIRT.id())]);
        let quads = all_quads(&GreedyMesher::new(&chunk, &NONE));
        assert_eq!(quads.len(), 6);
        assert!(quads.iter().all(|q| q.width == 1 && q.height == 1));

        let mut sides: Vec<_> = quads.iter().map(|q| q.side() as usize).collect();
        sides.sort_unstable();
        assert_eq!(sides, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn adjacent_voxels_merge() {
        let dirt = BlockType::DIRT.id();
        let chunk = chunk_with(&[([4, 4, 4], dirt), ([5, 4, 4], dirt)]);
        let mesher = GreedyMesher::new(&chunk, &NONE);
        let quads = all_quads(&mesher);
        // Two end caps along x plus one 2x1 quad on each of the other four sides.
        assert_eq!(quads.len(), 6);
        let merged: Vec<_> = quads.iter().filter(|q| q.axis != 0).collect();
        assert_eq!(merged.len(), 4);
        assert!(merged
            .iter()
            .all(|q| (q.width, q.height) == (2, 1) || (q.width, q.height) == (1, 2)));
    }

    #[test]
    fn different_types_do_not_merge() {
        let chunk = chunk_with(&[
            ([4, 4, 4], BlockType::DIRT.id()),
            ([5, 4, 4], BlockType::SAND.id()),
        ]);
        let quads = all_quads(&GreedyMesher::new(&chunk, &NONE));
        assert_eq!(quads.len(), 10);
    }

    #[test]
    fn axis_order_does_not_change_output_size() {
        let chunk = chunk_with(&[
            ([0, 0, 0], BlockType::STONE.id()),
            ([1, 0, 0], BlockType::STONE.id()),
            ([1, 1, 0], BlockType::GRASS.id()),
            ([7, 3, 9], BlockType::SAND.id()),
            ([15, 15, 15], BlockType::SNOW.id()),
        ]);
        let mesher = GreedyMesher::new(&chunk, &NONE);
        let materials = BlockTextureTable::default();
        let forward = mesher.mesh_axes(&[0, 1, 2], &materials);
        let backward = mesher.mesh_axes(&[2, 1, 0], &materials);
        let shuffled = mesher.mesh_axes(&[1, 2, 0], &materials);
        for other in [&backward, &shuffled] {
            assert_eq!(forward.geometry.quad_count(), other.geometry.quad_count());
            assert_eq!(forward.geometry.vertices.len(), other.geometry.vertices.len());
            assert_eq!(forward.collision.len(), other.collision.len());
        }
    }

    #[test]
    fn neighbour_hides_boundary_face() {
        let stone = BlockType::STONE.id();
        let chunk = chunk_with(&[([15, 3, 3], stone)]);
        let lone = all_quads(&GreedyMesher::new(&chunk, &NONE));
        assert!(lone.iter().any(|q| q.axis == 0 && q.positive && q.slice == 16));

        let mut neighbors = NONE;
        // RIGHT is +x
        neighbors[BlockSide::RIGHT as usize] = Some(Arc::new(chunk_with(&[([0, 3, 3], stone)])));
        let covered = all_quads(&GreedyMesher::new(&chunk, &neighbors));
        assert_eq!(covered.len(), 5);
        assert!(!covered.iter().any(|q| q.axis == 0 && q.positive));
    }

    #[test]
    fn faces_are_owned_by_the_solid_side() {
        // Solid neighbour against an empty chunk: the face belongs to the neighbour.
        let chunk = ChunkData::new();
        let mut neighbors = NONE;
        neighbors[BlockSide::LEFT as usize] =
            Some(Arc::new(ChunkData::filled(BlockType::STONE.id())));
        assert!(all_quads(&GreedyMesher::new(&chunk, &neighbors)).is_empty());
    }

    #[test]
    fn uvs_tile_and_materials_follow_the_side() {
        let grass = BlockType::GRASS.id();
        let chunk = chunk_with(&[([2, 2, 2], grass), ([3, 2, 2], grass), ([4, 2, 2], grass)]);
        let materials = BlockTextureTable::default();
        let mesh = GreedyMesher::new(&chunk, &NONE).mesh(&materials);

        let top: Vec<_> = mesh
            .geometry
            .vertices
            .iter()
            .filter(|v| v.normal == [0.0, 1.0, 0.0])
            .collect();
        assert_eq!(top.len(), 4);
        assert!(top.iter().all(|v| v.material == materials.texture_layer(grass, BlockSide::TOP)));
        let max_uv = top
            .iter()
            .fold(0.0f32, |acc, v| acc.max(v.tex_coords[0]).max(v.tex_coords[1]));
        assert_eq!(max_uv, 3.0);

        assert_eq!(mesh.collision.len(), mesh.geometry.indices.len());
    }
}
