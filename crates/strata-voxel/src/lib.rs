//! Sparse chunked voxel storage: coordinate spaces, the six-face adjacency
//! model, per-chunk voxel maps, voxel pointers, and the neighbor-linked chunk store.

pub mod chunk;
pub mod coords;
pub mod face;
pub mod pointer;
pub mod store;

pub use chunk::{ChunkHandle, VoxelChunk};
pub use coords::{
    CHUNK_SIZE, CHUNK_VOLUME, ChunkCoord, ParseChunkCoordError, encode, relative_to_world,
    world_axis_to_chunk, world_to_chunk_coord, world_to_relative, world_to_voxel,
};
pub use face::{FACE_TABLE, Face, FaceDef};
pub use pointer::VoxelPointer;
pub use store::{ChunkStore, StoreError};
