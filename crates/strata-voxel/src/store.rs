//! Central owner for all loaded chunks, keyed by [`ChunkCoord`].
//!
//! Chunks live in a slot arena; the coordinate index and every neighbor link
//! refer to them through [`ChunkHandle`]s. Inserting or removing a chunk
//! re-derives the links of its six potential neighbors, so the neighbor graph
//! is always bidirectional: if A links B through face F, B sits one unit away
//! along F and links A through `F.inverse()`.
//!
//! The store never decides *when* chunks are created or dropped.

use glam::{IVec3, Vec3};
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::chunk::{ChunkHandle, VoxelChunk};
use crate::coords::{
    CHUNK_SIZE, ChunkCoord, world_axis_to_chunk, world_to_chunk_coord, world_to_relative,
};
use crate::face::Face;
use crate::pointer::VoxelPointer;

/// Errors from misusing the store's insert/remove contract.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// `put` was called for a coordinate that already holds a chunk.
    #[error("chunk {0} is already loaded")]
    AlreadyLoaded(ChunkCoord),
    /// `delete` was called for a coordinate with no chunk.
    #[error("chunk {0} is not loaded")]
    NotLoaded(ChunkCoord),
}

struct Slot<V> {
    generation: u32,
    chunk: Option<VoxelChunk<V>>,
}

/// Owns every loaded chunk and keeps their neighbor links consistent.
pub struct ChunkStore<V> {
    slots: Vec<Slot<V>>,
    free: Vec<u32>,
    index: FxHashMap<ChunkCoord, ChunkHandle>,
}

impl<V> ChunkStore<V> {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            index: FxHashMap::default(),
        }
    }

    /// Number of loaded chunks.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// `true` if no chunk is loaded.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// `true` if a chunk is loaded at `coord`.
    pub fn has(&self, coord: ChunkCoord) -> bool {
        self.index.contains_key(&coord)
    }

    /// Handle of the chunk loaded at `coord`.
    pub fn handle_of(&self, coord: ChunkCoord) -> Option<ChunkHandle> {
        self.index.get(&coord).copied()
    }

    /// The chunk loaded at `coord`.
    pub fn get(&self, coord: ChunkCoord) -> Option<&VoxelChunk<V>> {
        self.chunk(self.handle_of(coord)?)
    }

    /// Mutable access to the chunk loaded at `coord`.
    pub fn get_mut(&mut self, coord: ChunkCoord) -> Option<&mut VoxelChunk<V>> {
        let handle = self.handle_of(coord)?;
        self.chunk_mut(handle)
    }

    /// Resolves a handle; `None` if the chunk has since been deleted.
    pub fn chunk(&self, handle: ChunkHandle) -> Option<&VoxelChunk<V>> {
        let slot = self.slots.get(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.chunk.as_ref()
    }

    /// Mutable [`chunk`](Self::chunk).
    pub fn chunk_mut(&mut self, handle: ChunkHandle) -> Option<&mut VoxelChunk<V>> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.chunk.as_mut()
    }

    /// Inserts `chunk` at `coord` and links it with every loaded face neighbor.
    ///
    /// The chunk is re-addressed to `coord` and any links it carried from a
    /// previous store are discarded.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AlreadyLoaded`] if `coord` is occupied.
    pub fn put(&mut self, coord: ChunkCoord, chunk: VoxelChunk<V>) -> Result<ChunkHandle, StoreError> {
        if self.has(coord) {
            return Err(StoreError::AlreadyLoaded(coord));
        }
        Ok(self.insert(coord, chunk))
    }

    /// Removes and returns the chunk at `coord`, clearing neighbors' back-links.
    ///
    /// The removed chunk keeps its own (now dangling) links.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotLoaded`] if no chunk is stored at `coord`.
    pub fn delete(&mut self, coord: ChunkCoord) -> Result<VoxelChunk<V>, StoreError> {
        let handle = self
            .index
            .remove(&coord)
            .ok_or(StoreError::NotLoaded(coord))?;

        let slot = &mut self.slots[handle.index as usize];
        let mut chunk = slot.chunk.take().ok_or(StoreError::NotLoaded(coord))?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        chunk.detach();

        for face in Face::ALL {
            if let Some(neighbor) = self.get_mut(coord.neighbor(face)) {
                neighbor.set_neighbor(face.inverse(), None);
            }
        }

        tracing::trace!("Unloaded chunk {coord} ({} remain)", self.index.len());
        Ok(chunk)
    }

    /// Iterates over all loaded chunks in no particular order.
    pub fn iter_all(&self) -> impl Iterator<Item = &VoxelChunk<V>> {
        self.slots.iter().filter_map(|slot| slot.chunk.as_ref())
    }

    /// Iterates over the loaded chunks among `coords`; unloaded ones are skipped.
    pub fn iter_subset<'a, I>(&'a self, coords: I) -> impl Iterator<Item = &'a VoxelChunk<V>> + 'a
    where
        I: IntoIterator<Item = &'a ChunkCoord>,
        I::IntoIter: 'a,
    {
        coords.into_iter().filter_map(|&coord| self.get(coord))
    }

    /// Returns a pointer to the voxel containing `world_pos`.
    ///
    /// `None` if the chunk is not loaded; otherwise the pointer is returned
    /// whether or not a voxel exists there.
    pub fn voxel_pointer(&self, world_pos: Vec3) -> Option<VoxelPointer> {
        let handle = self.handle_of(world_to_chunk_coord(world_pos))?;
        Some(VoxelPointer::new(handle, world_to_relative(world_pos)))
    }

    /// Like [`voxel_pointer`](Self::voxel_pointer), but creates and inserts
    /// the chunk with `factory` if it is missing.
    pub fn voxel_pointer_or_create<F>(&mut self, world_pos: Vec3, factory: F) -> VoxelPointer
    where
        F: FnOnce(ChunkCoord) -> VoxelChunk<V>,
    {
        let coord = world_to_chunk_coord(world_pos);
        let handle = match self.handle_of(coord) {
            Some(handle) => handle,
            None => self.insert(coord, factory(coord)),
        };
        VoxelPointer::new(handle, world_to_relative(world_pos))
    }

    /// Face neighbor of a position that lies outside loaded chunks.
    ///
    /// If stepping through `face` stays within the same (unloaded) chunk the
    /// answer is `None` without any lookup; otherwise the neighboring
    /// position is looked up in full.
    pub fn neighbor_of_unloaded(&self, world_pos: Vec3, face: Face) -> Option<VoxelPointer> {
        let axis = face.axis();
        let next = world_pos + face.offset().as_vec3();
        if world_axis_to_chunk(world_pos[axis]) == world_axis_to_chunk(next[axis]) {
            return None;
        }
        self.voxel_pointer(next)
    }

    fn insert(&mut self, coord: ChunkCoord, mut chunk: VoxelChunk<V>) -> ChunkHandle {
        let handle = match self.free.pop() {
            Some(index) => ChunkHandle {
                index,
                generation: self.slots[index as usize].generation,
            },
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    chunk: None,
                });
                ChunkHandle {
                    index: (self.slots.len() - 1) as u32,
                    generation: 0,
                }
            }
        };

        chunk.attach(coord, handle);
        for face in Face::ALL {
            if let Some(neighbor_handle) = self.handle_of(coord.neighbor(face)) {
                chunk.set_neighbor(face, Some(neighbor_handle));
                if let Some(neighbor) = self.chunk_mut(neighbor_handle) {
                    neighbor.set_neighbor(face.inverse(), Some(handle));
                }
            }
        }

        self.slots[handle.index as usize].chunk = Some(chunk);
        self.index.insert(coord, handle);
        tracing::trace!("Loaded chunk {coord} ({} total)", self.index.len());
        handle
    }
}

impl<V: Clone> ChunkStore<V> {
    /// Fills the inclusive world-space voxel box `a..=b` with `voxel`.
    ///
    /// Missing chunks are created with `factory`. Existing voxels are kept.
    /// Returns the number of voxels written.
    pub fn fill_region<F>(&mut self, a: IVec3, b: IVec3, voxel: V, mut factory: F) -> usize
    where
        F: FnMut(ChunkCoord) -> VoxelChunk<V>,
    {
        let min = a.min(b);
        let max = a.max(b);
        let min_chunk = world_to_chunk_coord(min.as_vec3());
        let max_chunk = world_to_chunk_coord(max.as_vec3());

        let mut written = 0;
        for cz in min_chunk.z..=max_chunk.z {
            for cy in min_chunk.y..=max_chunk.y {
                for cx in min_chunk.x..=max_chunk.x {
                    let coord = ChunkCoord::new(cx, cy, cz);
                    let origin = coord.origin();
                    let local_min = min.max(origin) - origin;
                    let local_max = max.min(origin + IVec3::splat(CHUNK_SIZE - 1)) - origin;

                    let handle = match self.handle_of(coord) {
                        Some(handle) => handle,
                        None => self.insert(coord, factory(coord)),
                    };
                    if let Some(chunk) = self.chunk_mut(handle) {
                        written += chunk.fill_region(local_min, local_max, voxel.clone());
                    }
                }
            }
        }
        written
    }
}

impl<V> Default for ChunkStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
