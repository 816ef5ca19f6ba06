//! The six cube faces and their adjacency data.
//!
//! Every per-face quantity (offset, encoded delta, axis, sign, inverse,
//! orthogonal axes) lives in the static [`FACE_TABLE`], so lookups are a
//! single index and never recomputed.

use glam::{IVec3, Vec3};

use crate::coords::AXIS_WEIGHTS;

/// One of the six cardinal directions a voxel face can point.
///
/// The `repr(u8)` discriminant indexes [`FACE_TABLE`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Face {
    /// −X direction.
    NegX = 0,
    /// −Y direction.
    NegY = 1,
    /// −Z direction.
    NegZ = 2,
    /// +X direction.
    PosX = 3,
    /// +Y direction.
    PosY = 4,
    /// +Z direction.
    PosZ = 5,
}

/// Static record describing one face.
#[derive(Clone, Copy, Debug)]
pub struct FaceDef {
    /// Unit offset to the adjacent voxel.
    pub offset: IVec3,
    /// Change of the encoded position when stepping through this face.
    pub encoded_delta: i32,
    /// Axis the face is perpendicular to (0 = X, 1 = Y, 2 = Z).
    pub axis: usize,
    /// `0` for negative faces, `1` for positive faces.
    pub sign: i32,
    /// The face pointing the opposite way.
    pub inverse: Face,
    /// The two axes spanning the face plane, in ascending order.
    pub ortho_axes: [usize; 2],
    /// Short key (`"nx"`, `"py"`, ...).
    pub key: &'static str,
}

const fn face_def(axis: usize, positive: bool, inverse: Face, key: &'static str) -> FaceDef {
    let step = if positive { 1 } else { -1 };
    let offset = match axis {
        0 => IVec3::new(step, 0, 0),
        1 => IVec3::new(0, step, 0),
        _ => IVec3::new(0, 0, step),
    };
    let ortho_axes = match axis {
        0 => [1, 2],
        1 => [0, 2],
        _ => [0, 1],
    };
    FaceDef {
        offset,
        encoded_delta: step * AXIS_WEIGHTS[axis],
        axis,
        sign: if positive { 1 } else { 0 },
        inverse,
        ortho_axes,
        key,
    }
}

/// Face records indexed by `Face as usize`.
pub static FACE_TABLE: [FaceDef; 6] = [
    face_def(0, false, Face::PosX, "nx"),
    face_def(1, false, Face::PosY, "ny"),
    face_def(2, false, Face::PosZ, "nz"),
    face_def(0, true, Face::NegX, "px"),
    face_def(1, true, Face::NegY, "py"),
    face_def(2, true, Face::NegZ, "pz"),
];

/// `AXIS_FACES[axis][positive as usize]`.
const AXIS_FACES: [[Face; 2]; 3] = [
    [Face::NegX, Face::PosX],
    [Face::NegY, Face::PosY],
    [Face::NegZ, Face::PosZ],
];

impl Face {
    /// All six faces in table order.
    pub const ALL: [Face; 6] = [
        Self::NegX,
        Self::NegY,
        Self::NegZ,
        Self::PosX,
        Self::PosY,
        Self::PosZ,
    ];

    /// Returns the static record for this face.
    #[inline]
    pub fn def(self) -> &'static FaceDef {
        &FACE_TABLE[self as usize]
    }

    /// The face leading along `axis` in the positive or negative direction.
    #[inline]
    pub fn towards(axis: usize, positive: bool) -> Face {
        AXIS_FACES[axis][positive as usize]
    }

    /// Position in [`Face::ALL`] and in per-face arrays.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Unit voxel offset pointing out through this face.
    pub fn offset(self) -> IVec3 {
        self.def().offset
    }

    /// Change in encoded key when stepping through this face inside a chunk.
    pub fn encoded_delta(self) -> i32 {
        self.def().encoded_delta
    }

    /// Axis the face is perpendicular to (0 = X, 1 = Y, 2 = Z).
    pub fn axis(self) -> usize {
        self.def().axis
    }

    /// `0` for negative faces, `1` for positive ones.
    pub fn sign(self) -> i32 {
        self.def().sign
    }

    /// `-1` or `+1` along [`Face::axis`].
    pub fn direction(self) -> i32 {
        self.def().sign * 2 - 1
    }

    /// The opposite face.
    pub fn inverse(self) -> Face {
        self.def().inverse
    }

    /// The two axes lying in the face plane.
    pub fn ortho_axes(self) -> [usize; 2] {
        self.def().ortho_axes
    }

    /// Short name such as `"+x"`, used in logs.
    pub fn key(self) -> &'static str {
        self.def().key
    }

    /// Intersects the segment `start → end` with this face of the voxel
    /// containing `voxel_pos`.
    ///
    /// Returns the crossing point, or `None` if both endpoints lie on the same
    /// side of the face plane (including both lying on it) or the crossing
    /// falls outside the face's unit square.
    pub fn segment_intersection(self, voxel_pos: Vec3, start: Vec3, end: Vec3) -> Option<Vec3> {
        let FaceDef {
            axis, sign, ortho_axes, ..
        } = *self.def();

        let start_depth = start[axis];
        let end_depth = end[axis];
        let face_depth = voxel_pos[axis].floor() + sign as f32;
        if side_of(start_depth - face_depth) == side_of(end_depth - face_depth) {
            return None;
        }

        let t = (face_depth - start_depth) / (end_depth - start_depth);
        let pos = start.lerp(end, t);
        for ortho in ortho_axes {
            let local = pos[ortho] - voxel_pos[ortho].floor();
            if !(0.0..=1.0).contains(&local) {
                return None;
            }
        }
        Some(pos)
    }
}

/// Three-valued sign: `-1`, `0`, or `1`. Treats `-0.0` as zero.
fn side_of(value: f32) -> i8 {
    if value > 0.0 {
        1
    } else if value < 0.0 {
        -1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inverse_is_involution() {
        for face in Face::ALL {
            assert_eq!(face.inverse().inverse(), face);
            assert_eq!(face.offset() + face.inverse().offset(), IVec3::ZERO);
            assert_eq!(face.inverse().axis(), face.axis());
        }
    }

    #[test]
    fn test_table_index_matches_discriminant() {
        for (i, face) in Face::ALL.iter().enumerate() {
            assert_eq!(face.index(), i);
        }
    }

    #[test]
    fn test_towards_lookup() {
        assert_eq!(Face::towards(0, true), Face::PosX);
        assert_eq!(Face::towards(1, false), Face::NegY);
        assert_eq!(Face::towards(2, true), Face::PosZ);
    }

    #[test]
    fn test_encoded_delta_matches_offset() {
        for face in Face::ALL {
            let o = face.offset();
            let expected = o.x * AXIS_WEIGHTS[0] + o.y * AXIS_WEIGHTS[1] + o.z * AXIS_WEIGHTS[2];
            assert_eq!(face.encoded_delta(), expected, "{}", face.key());
        }
    }

    #[test]
    fn test_ortho_axes_exclude_face_axis() {
        for face in Face::ALL {
            assert!(!face.ortho_axes().contains(&face.axis()));
        }
    }

    #[test]
    fn test_segment_crosses_negative_face() {
        let hit = Face::NegZ.segment_intersection(
            Vec3::new(8.0, 8.0, 0.0),
            Vec3::new(8.5, 8.5, -0.5),
            Vec3::new(8.5, 8.5, 0.5),
        );
        let hit = hit.expect("segment crosses z = 0");
        assert!((hit.z - 0.0).abs() < 1e-6);
        assert!((hit.x - 8.5).abs() < 1e-6);
    }

    #[test]
    fn test_segment_outside_face_bounds() {
        let hit = Face::NegZ.segment_intersection(
            Vec3::new(8.0, 8.0, 0.0),
            Vec3::new(10.5, 8.5, -0.5),
            Vec3::new(10.5, 8.5, 0.5),
        );
        assert!(hit.is_none());
    }

    #[test]
    fn test_segment_on_same_side_misses() {
        let hit = Face::PosY.segment_intersection(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.5, 0.2, 0.5),
            Vec3::new(0.5, 0.8, 0.5),
        );
        assert!(hit.is_none());
    }

    #[test]
    fn test_segment_lying_on_plane_misses() {
        let hit = Face::NegX.segment_intersection(
            Vec3::new(3.0, 0.0, 0.0),
            Vec3::new(3.0, 0.2, 0.5),
            Vec3::new(3.0, 0.8, 0.5),
        );
        assert!(hit.is_none());
    }
}
