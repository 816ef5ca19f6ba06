//! Voxel-space queries built on top of `strata-voxel`: incremental ray
//! casting with face resolution, and axis-separated swept movement.

pub mod voxel_collision;
pub mod voxel_raycast;

pub use voxel_collision::{DEFAULT_VOXEL_MARGIN, MoveFeedback, VoxelBody, cuboid_sample_points};
pub use voxel_raycast::{FaceCollision, VoxelRayCaster};
