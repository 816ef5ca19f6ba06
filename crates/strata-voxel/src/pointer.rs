//! Voxel pointers: cached cursors into a chunk's sparse storage.
//!
//! A [`VoxelPointer`] remembers its chunk handle, relative position and
//! encoded key, so reading a voxel or stepping to a face neighbor inside the
//! same chunk needs no coordinate math beyond one addition. Crossing a chunk
//! boundary follows the chunk's neighbor link; an unlinked face yields `None`
//! even if a chunk is inserted there later.
//!
//! Pointers only hold a handle, so every operation takes the owning
//! [`ChunkStore`] explicitly. A pointer whose chunk has been deleted reads as
//! absent and ignores writes.

use glam::IVec3;

use crate::chunk::ChunkHandle;
use crate::coords::{CHUNK_SIZE, encode, in_chunk_bounds, signed_modulo};
use crate::face::Face;
use crate::store::ChunkStore;

/// Points at one voxel slot of one chunk. The slot may or may not hold a voxel.
#[derive(Clone, Copy, Debug)]
pub struct VoxelPointer {
    chunk: ChunkHandle,
    relative: IVec3,
    encoded: u16,
}

impl VoxelPointer {
    /// Creates a pointer at `relative` inside `chunk`.
    ///
    /// `relative` must lie in `[0, CHUNK_SIZE)` on every axis.
    pub fn new(chunk: ChunkHandle, relative: IVec3) -> Self {
        Self {
            chunk,
            relative,
            encoded: encode(relative),
        }
    }

    pub fn chunk(&self) -> ChunkHandle {
        self.chunk
    }

    pub fn relative(&self) -> IVec3 {
        self.relative
    }

    pub fn encoded(&self) -> u16 {
        self.encoded
    }

    /// Returns the voxel pointed at, or `None` for air or a deleted chunk.
    pub fn read<'s, V>(&self, store: &'s ChunkStore<V>) -> Option<&'s V> {
        store.chunk(self.chunk)?.get_encoded(self.encoded)
    }

    /// Returns `true` if a voxel is present at this position.
    pub fn exists<V>(&self, store: &ChunkStore<V>) -> bool {
        store
            .chunk(self.chunk)
            .is_some_and(|chunk| chunk.contains_encoded(self.encoded))
    }

    /// Stores `voxel` here, "creating" the voxel if it did not exist.
    ///
    /// Returns the previous value. Only the owning chunk's map is touched.
    pub fn write<V>(&self, store: &mut ChunkStore<V>, voxel: V) -> Option<V> {
        match store.chunk_mut(self.chunk) {
            Some(chunk) => chunk.insert_encoded(self.encoded, voxel),
            None => {
                tracing::warn!(
                    "VoxelPointer::write to unloaded chunk (relative {})",
                    self.relative
                );
                None
            }
        }
    }

    /// Removes the voxel here, returning it if it existed.
    pub fn remove<V>(&self, store: &mut ChunkStore<V>) -> Option<V> {
        store.chunk_mut(self.chunk)?.remove_encoded(self.encoded)
    }

    /// Returns the pointer to the voxel adjacent through `face`.
    ///
    /// Stays in the same chunk without any lookup when possible. Otherwise
    /// follows the chunk's neighbor link; returns `None` if the face is not
    /// linked.
    pub fn neighbor<V>(&self, store: &ChunkStore<V>, face: Face) -> Option<VoxelPointer> {
        let def = face.def();
        let mut relative = self.relative + def.offset;
        let axis_value = relative[def.axis];

        if (0..CHUNK_SIZE).contains(&axis_value) {
            return Some(Self {
                chunk: self.chunk,
                relative,
                encoded: (self.encoded as i32 + def.encoded_delta) as u16,
            });
        }

        let neighbor = store.chunk(self.chunk)?.neighbor(face)?;
        relative[def.axis] = signed_modulo(axis_value, CHUNK_SIZE);
        Some(Self::new(neighbor, relative))
    }

    /// Rebinds this pointer to another position in the same chunk.
    ///
    /// Moving outside the chunk is a caller bug.
    pub fn move_to(&mut self, relative: IVec3) {
        debug_assert!(in_chunk_bounds(relative), "move_to({relative}) leaves the chunk");
        self.relative = relative;
        self.encoded = encode(relative);
    }

    /// World-space voxel position, or `None` if the chunk was deleted.
    pub fn world_pos<V>(&self, store: &ChunkStore<V>) -> Option<IVec3> {
        store
            .chunk(self.chunk)
            .map(|chunk| chunk.relative_to_world(self.relative))
    }
}

/// Pointers are equal when they address the same key in the same chunk.
impl PartialEq for VoxelPointer {
    fn eq(&self, other: &Self) -> bool {
        self.encoded == other.encoded && self.chunk == other.chunk
    }
}

impl Eq for VoxelPointer {}

impl std::hash::Hash for VoxelPointer {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.chunk.hash(state);
        self.encoded.hash(state);
    }
}
