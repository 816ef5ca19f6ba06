//! Coordinate spaces for the chunked voxel grid.
//!
//! Three spaces are in play:
//!
//! 1. **World space**: continuous `f32` positions; voxel `(x, y, z)` covers
//!    `[x, x + 1) × [y, y + 1) × [z, z + 1)`.
//! 2. **Chunk space**: integer [`ChunkCoord`]s, one unit per chunk edge.
//! 3. **Chunk-relative space**: integer positions in `[0, CHUNK_SIZE)` per
//!    axis, addressing a voxel inside one chunk.
//!
//! World positions are always floored before division or modulo so fractional
//! positions coming from physics normalize the same way every time.

use std::fmt;
use std::str::FromStr;

use glam::{IVec3, Vec3};
use thiserror::Error;

use crate::face::Face;

/// Side length of a chunk in voxels.
pub const CHUNK_SIZE: i32 = 16;

/// Total number of voxel slots in a chunk (16³).
pub const CHUNK_VOLUME: usize = (CHUNK_SIZE * CHUNK_SIZE * CHUNK_SIZE) as usize;

/// Weight of each axis in the mixed-radix [`encode`]d position.
pub const AXIS_WEIGHTS: [i32; 3] = [1, CHUNK_SIZE, CHUNK_SIZE * CHUNK_SIZE];

/// Identifies a chunk's position in chunk space.
///
/// The canonical string key is `"x,y,z"` (see the [`fmt::Display`] and
/// [`FromStr`] impls). The key is not stable across versions and is never
/// persisted by this crate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    /// Chunk-grid X coordinate.
    pub x: i32,
    /// Chunk-grid Y coordinate.
    pub y: i32,
    /// Chunk-grid Z coordinate.
    pub z: i32,
}

impl ChunkCoord {
    /// Creates a new chunk coordinate.
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Returns the coordinate offset by `(dx, dy, dz)`.
    pub fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// Returns the coordinate of the chunk adjacent through `face`.
    pub fn neighbor(self, face: Face) -> Self {
        let o = face.offset();
        self.offset(o.x, o.y, o.z)
    }

    /// Returns the world-space position of this chunk's minimum corner voxel.
    pub fn origin(self) -> IVec3 {
        self.as_ivec3() * CHUNK_SIZE
    }

    /// The coordinate as a plain vector, in chunk units.
    pub fn as_ivec3(self) -> IVec3 {
        IVec3::new(self.x, self.y, self.z)
    }
}

impl From<IVec3> for ChunkCoord {
    fn from(v: IVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.x, self.y, self.z)
    }
}

/// Error returned when a canonical chunk key cannot be parsed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseChunkCoordError {
    /// The key did not contain exactly three comma-separated components.
    #[error("expected 3 components in chunk key, found {0}")]
    WrongArity(usize),
    /// A component was not a valid integer.
    #[error("invalid chunk key component {0:?}")]
    InvalidComponent(String),
}

impl FromStr for ChunkCoord {
    type Err = ParseChunkCoordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').collect();
        if parts.len() != 3 {
            return Err(ParseChunkCoordError::WrongArity(parts.len()));
        }
        let mut out = [0i32; 3];
        for (slot, part) in out.iter_mut().zip(&parts) {
            *slot = part
                .trim()
                .parse()
                .map_err(|_| ParseChunkCoordError::InvalidComponent((*part).to_string()))?;
        }
        Ok(Self::new(out[0], out[1], out[2]))
    }
}

/// Modulo whose result always has the sign of the divisor.
///
/// `signed_modulo(-1, 16) == 15`.
pub fn signed_modulo(value: i32, divisor: i32) -> i32 {
    value.rem_euclid(divisor)
}

/// Floors each axis of a world position to the voxel containing it.
pub fn world_to_voxel(world_pos: Vec3) -> IVec3 {
    world_pos.floor().as_ivec3()
}

/// Chunk-space coordinate of a single world-space axis value.
pub fn world_axis_to_chunk(value: f32) -> i32 {
    (value.floor() as i32).div_euclid(CHUNK_SIZE)
}

/// Converts a world position to the coordinate of the chunk containing it.
pub fn world_to_chunk_coord(world_pos: Vec3) -> ChunkCoord {
    let v = world_to_voxel(world_pos);
    ChunkCoord::new(
        v.x.div_euclid(CHUNK_SIZE),
        v.y.div_euclid(CHUNK_SIZE),
        v.z.div_euclid(CHUNK_SIZE),
    )
}

/// Converts a world position to its chunk-relative voxel position.
///
/// Each axis of the result lies in `[0, CHUNK_SIZE)`, including for negative
/// world positions.
pub fn world_to_relative(world_pos: Vec3) -> IVec3 {
    let v = world_to_voxel(world_pos);
    IVec3::new(
        signed_modulo(v.x, CHUNK_SIZE),
        signed_modulo(v.y, CHUNK_SIZE),
        signed_modulo(v.z, CHUNK_SIZE),
    )
}

/// Reconstructs the world-space voxel position from chunk and relative parts.
pub fn relative_to_world(coord: ChunkCoord, relative: IVec3) -> IVec3 {
    coord.origin() + relative
}

/// Returns `true` if every axis of `relative` lies in `[0, CHUNK_SIZE)`.
pub fn in_chunk_bounds(relative: IVec3) -> bool {
    relative.cmpge(IVec3::ZERO).all() && relative.cmplt(IVec3::splat(CHUNK_SIZE)).all()
}

/// Packs a chunk-relative position into a sparse-map key.
///
/// Mixed-radix: X varies fastest, Z slowest.
pub fn encode(relative: IVec3) -> u16 {
    debug_assert!(in_chunk_bounds(relative), "relative position {relative} out of chunk");
    (relative.x * AXIS_WEIGHTS[0] + relative.y * AXIS_WEIGHTS[1] + relative.z * AXIS_WEIGHTS[2])
        as u16
}

/// Moves `position` by `delta` and reports which axes changed chunk.
///
/// Returns the per-axis chunk delta; all zeros means the position stayed in
/// the same chunk.
pub fn move_and_detect_chunk_switch(position: &mut Vec3, delta: Vec3) -> IVec3 {
    let mut chunk_delta = IVec3::ZERO;
    for axis in 0..3 {
        let old_chunk = world_axis_to_chunk(position[axis]);
        position[axis] += delta[axis];
        chunk_delta[axis] = world_axis_to_chunk(position[axis]) - old_chunk;
    }
    chunk_delta
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_chunk_coord_negative_positions_floor() {
        assert_eq!(world_to_chunk_coord(Vec3::new(-0.5, 0.0, 15.9)), ChunkCoord::new(-1, 0, 0));
        assert_eq!(world_to_chunk_coord(Vec3::new(-16.0, -17.0, 16.0)), ChunkCoord::new(-1, -2, 1));
    }

    #[test]
    fn test_relative_wraps_negative_values() {
        assert_eq!(world_to_relative(Vec3::new(-1.0, -0.25, -16.0)), IVec3::new(15, 15, 0));
        assert_eq!(world_to_relative(Vec3::new(17.5, 3.0, 31.99)), IVec3::new(1, 3, 15));
    }

    #[test]
    fn test_reconstruction_matches_floor() {
        let samples = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(-0.001, 5.5, -33.7),
            Vec3::new(123.4, -77.0, 16.0),
            Vec3::new(-16.0, -15.99, -1.0),
        ];
        for pos in samples {
            let rebuilt = relative_to_world(world_to_chunk_coord(pos), world_to_relative(pos));
            assert_eq!(rebuilt, world_to_voxel(pos), "mismatch for {pos}");
        }
    }

    #[test]
    fn test_encode_is_injective() {
        let mut seen = HashSet::new();
        for z in 0..CHUNK_SIZE {
            for y in 0..CHUNK_SIZE {
                for x in 0..CHUNK_SIZE {
                    assert!(seen.insert(encode(IVec3::new(x, y, z))));
                }
            }
        }
        assert_eq!(seen.len(), CHUNK_VOLUME);
        assert_eq!(encode(IVec3::new(15, 15, 15)) as usize, CHUNK_VOLUME - 1);
    }

    #[test]
    fn test_chunk_key_roundtrip() {
        let coord = ChunkCoord::new(-3, 0, 12);
        assert_eq!(coord.to_string(), "-3,0,12");
        assert_eq!("-3,0,12".parse::<ChunkCoord>(), Ok(coord));
    }

    #[test]
    fn test_chunk_key_rejects_garbage() {
        assert_eq!("1,2".parse::<ChunkCoord>(), Err(ParseChunkCoordError::WrongArity(2)));
        assert!(matches!(
            "1,x,2".parse::<ChunkCoord>(),
            Err(ParseChunkCoordError::InvalidComponent(_))
        ));
    }

    #[test]
    fn test_move_detects_chunk_switch() {
        let mut pos = Vec3::new(15.5, 0.5, -0.5);
        let delta = move_and_detect_chunk_switch(&mut pos, Vec3::new(0.75, 0.25, 0.75));
        assert_eq!(delta, IVec3::new(1, 0, 1));
        assert_eq!(pos, Vec3::new(16.25, 0.75, 0.25));

        let none = move_and_detect_chunk_switch(&mut pos, Vec3::new(0.5, 0.0, 0.0));
        assert_eq!(none, IVec3::ZERO);
    }
}
