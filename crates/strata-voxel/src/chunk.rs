//! Sparse per-chunk voxel storage for 16×16×16 volumes.
//!
//! A chunk keeps only the voxels that exist, keyed by their
//! [`encode`](crate::coords::encode)d relative position. Absence means air.
//! Chunks also carry non-owning links to their six face neighbors; those
//! links are maintained exclusively by [`ChunkStore`](crate::ChunkStore).

use glam::IVec3;
use rustc_hash::FxHashMap;

use crate::coords::{ChunkCoord, encode, in_chunk_bounds, relative_to_world};
use crate::face::Face;
use crate::pointer::VoxelPointer;

/// Non-owning reference to a chunk slot inside a [`ChunkStore`](crate::ChunkStore).
///
/// The generation is bumped whenever the slot is vacated, so a handle to a
/// deleted chunk never resolves to whatever chunk reuses the slot later.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChunkHandle {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

/// Voxel data and neighbor links for one chunk.
///
/// `V` is the caller's voxel type; this crate never interprets it.
#[derive(Clone, Debug)]
pub struct VoxelChunk<V> {
    coord: ChunkCoord,
    voxels: FxHashMap<u16, V>,
    neighbors: [Option<ChunkHandle>; 6],
    /// Set by the store on insertion.
    handle: Option<ChunkHandle>,
}

impl<V> VoxelChunk<V> {
    /// Creates an empty (all air) chunk for the given coordinate.
    pub fn new(coord: ChunkCoord) -> Self {
        Self {
            coord,
            voxels: FxHashMap::default(),
            neighbors: [None; 6],
            handle: None,
        }
    }

    /// Coordinate this chunk is addressed by.
    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    /// The handle this chunk was stored under, or `None` if it is not in a store.
    pub fn handle(&self) -> Option<ChunkHandle> {
        self.handle
    }

    /// Number of voxels present.
    pub fn len(&self) -> usize {
        self.voxels.len()
    }

    /// `true` if no voxel is present.
    pub fn is_empty(&self) -> bool {
        self.voxels.is_empty()
    }

    /// Returns a pointer to the voxel at `relative`.
    ///
    /// Returns `None` only if the chunk has not been inserted into a store.
    /// `relative` must lie inside the chunk.
    pub fn pointer(&self, relative: IVec3) -> Option<VoxelPointer> {
        self.handle.map(|handle| VoxelPointer::new(handle, relative))
    }

    /// Returns the voxel at `relative`, if present.
    pub fn get(&self, relative: IVec3) -> Option<&V> {
        self.voxels.get(&encode(relative))
    }

    /// Stores `voxel` at `relative`, returning the previous value.
    pub fn set(&mut self, relative: IVec3, voxel: V) -> Option<V> {
        self.voxels.insert(encode(relative), voxel)
    }

    /// Removes the voxel at `relative`, returning it if it existed.
    pub fn remove(&mut self, relative: IVec3) -> Option<V> {
        self.voxels.remove(&encode(relative))
    }

    /// `true` if a voxel is present at `relative`.
    pub fn contains(&self, relative: IVec3) -> bool {
        self.voxels.contains_key(&encode(relative))
    }

    /// Iterates over `(encoded position, voxel)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (u16, &V)> {
        self.voxels.iter().map(|(&k, v)| (k, v))
    }

    /// The neighbor linked through `face`, if any.
    pub fn neighbor(&self, face: Face) -> Option<ChunkHandle> {
        self.neighbors[face.index()]
    }

    /// World-space voxel position of a chunk-relative position.
    pub fn relative_to_world(&self, relative: IVec3) -> IVec3 {
        relative_to_world(self.coord, relative)
    }

    pub(crate) fn get_encoded(&self, encoded: u16) -> Option<&V> {
        self.voxels.get(&encoded)
    }

    pub(crate) fn insert_encoded(&mut self, encoded: u16, voxel: V) -> Option<V> {
        self.voxels.insert(encoded, voxel)
    }

    pub(crate) fn remove_encoded(&mut self, encoded: u16) -> Option<V> {
        self.voxels.remove(&encoded)
    }

    pub(crate) fn contains_encoded(&self, encoded: u16) -> bool {
        self.voxels.contains_key(&encoded)
    }

    pub(crate) fn set_neighbor(&mut self, face: Face, neighbor: Option<ChunkHandle>) {
        self.neighbors[face.index()] = neighbor;
    }

    pub(crate) fn attach(&mut self, coord: ChunkCoord, handle: ChunkHandle) {
        self.coord = coord;
        self.handle = Some(handle);
        self.neighbors = [None; 6];
    }

    pub(crate) fn detach(&mut self) {
        self.handle = None;
    }
}

impl<V: Clone> VoxelChunk<V> {
    /// Fills the inclusive box spanned by corners `a` and `b` with `voxel`.
    ///
    /// Corners may be given in any order. Voxels that already exist are kept.
    /// Returns the number of voxels written.
    pub fn fill_region(&mut self, a: IVec3, b: IVec3, voxel: V) -> usize {
        let min = a.min(b);
        let max = a.max(b);
        debug_assert!(in_chunk_bounds(min) && in_chunk_bounds(max));

        let mut written = 0;
        for z in min.z..=max.z {
            for y in min.y..=max.y {
                for x in min.x..=max.x {
                    let key = encode(IVec3::new(x, y, z));
                    if !self.voxels.contains_key(&key) {
                        self.voxels.insert(key, voxel.clone());
                        written += 1;
                    }
                }
            }
        }
        written
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::{CHUNK_SIZE, CHUNK_VOLUME};

    #[test]
    fn test_new_chunk_is_empty() {
        let chunk: VoxelChunk<u8> = VoxelChunk::new(ChunkCoord::new(1, 2, 3));
        assert!(chunk.is_empty());
        assert_eq!(chunk.coord(), ChunkCoord::new(1, 2, 3));
        assert!(chunk.pointer(IVec3::ZERO).is_none());
        for face in Face::ALL {
            assert!(chunk.neighbor(face).is_none());
        }
    }

    #[test]
    fn test_set_get_remove() {
        let mut chunk = VoxelChunk::new(ChunkCoord::default());
        let pos = IVec3::new(3, 4, 5);
        assert_eq!(chunk.set(pos, 7u8), None);
        assert_eq!(chunk.get(pos), Some(&7));
        assert_eq!(chunk.set(pos, 9), Some(7));
        assert!(chunk.contains(pos));
        assert_eq!(chunk.remove(pos), Some(9));
        assert!(!chunk.contains(pos));
        assert_eq!(chunk.remove(pos), None);
    }

    #[test]
    fn test_iter_yields_encoded_keys() {
        let mut chunk = VoxelChunk::new(ChunkCoord::default());
        let positions = [IVec3::new(0, 0, 0), IVec3::new(7, 1, 2), IVec3::new(3, 7, 5)];
        for (i, &pos) in positions.iter().enumerate() {
            chunk.set(pos, i as u8);
        }

        let mut seen: Vec<(u16, u8)> = chunk.iter().map(|(k, &v)| (k, v)).collect();
        seen.sort_unstable();
        let mut expected: Vec<(u16, u8)> = positions
            .iter()
            .enumerate()
            .map(|(i, &pos)| (encode(pos), i as u8))
            .collect();
        expected.sort_unstable();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_fill_region_any_corner_order() {
        let mut chunk = VoxelChunk::new(ChunkCoord::default());
        let written = chunk.fill_region(IVec3::new(3, 1, 2), IVec3::new(0, 0, 0), 1u8);
        assert_eq!(written, 4 * 2 * 3);
        assert_eq!(chunk.len(), 24);
        assert_eq!(chunk.get(IVec3::new(3, 1, 2)), Some(&1));
    }

    #[test]
    fn test_fill_region_keeps_existing() {
        let mut chunk = VoxelChunk::new(ChunkCoord::default());
        chunk.set(IVec3::new(1, 1, 1), 5u8);
        let written = chunk.fill_region(IVec3::ZERO, IVec3::splat(2), 1);
        assert_eq!(written, 26);
        assert_eq!(chunk.get(IVec3::new(1, 1, 1)), Some(&5));
    }

    #[test]
    fn test_fill_whole_chunk() {
        let mut chunk = VoxelChunk::new(ChunkCoord::default());
        chunk.fill_region(IVec3::ZERO, IVec3::splat(CHUNK_SIZE - 1), ());
        assert_eq!(chunk.len(), CHUNK_VOLUME);
    }

    #[test]
    fn test_relative_to_world_uses_origin() {
        let chunk: VoxelChunk<u8> = VoxelChunk::new(ChunkCoord::new(-1, 0, 2));
        assert_eq!(chunk.relative_to_world(IVec3::new(15, 0, 1)), IVec3::new(-1, 0, 33));
    }
}
