//! Axis-separated swept movement against voxel terrain ("move and slide").
//!
//! A [`VoxelBody`] is a reference point plus a set of sample points relative
//! to it that approximate the body's volume. Each axis is swept separately in
//! X, Y, Z order: every sample point tests one voxel at a time along the axis
//! of travel, and the nearest solid voxel caps the movement on that axis
//! minus a small margin. The remaining axes still move, which gives sliding
//! along walls and floors for free.

use glam::Vec3;
use strata_voxel::{ChunkStore, Face, VoxelPointer};

use crate::voxel_raycast::VoxelRayCaster;

/// Gap kept between a body and the voxel face that stopped it.
pub const DEFAULT_VOXEL_MARGIN: f32 = 0.02;

/// Which axes had their movement cut short by a solid voxel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MoveFeedback {
    pub prevented: [bool; 3],
}

impl MoveFeedback {
    /// `true` if a downward move was stopped, i.e. the body is standing on something.
    pub fn on_ground(&self, delta: Vec3) -> bool {
        self.prevented[1] && delta.y < 0.0
    }

    /// `true` if movement was cut short on any axis.
    pub fn any(&self) -> bool {
        self.prevented.iter().any(|&p| p)
    }
}

/// The eight corners of the box `min..=max`, relative to the body position.
pub fn cuboid_sample_points(min: Vec3, max: Vec3) -> [Vec3; 8] {
    [
        Vec3::new(min.x, min.y, min.z),
        Vec3::new(max.x, min.y, min.z),
        Vec3::new(min.x, max.y, min.z),
        Vec3::new(max.x, max.y, min.z),
        Vec3::new(min.x, min.y, max.z),
        Vec3::new(max.x, min.y, max.z),
        Vec3::new(min.x, max.y, max.z),
        Vec3::new(max.x, max.y, max.z),
    ]
}

/// A point-sampled body that moves through a [`ChunkStore`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VoxelBody {
    pub position: Vec3,
    pub margin: f32,
}

impl VoxelBody {
    /// A body at `position` using [`DEFAULT_VOXEL_MARGIN`].
    pub fn new(position: Vec3) -> Self {
        Self::with_margin(position, DEFAULT_VOXEL_MARGIN)
    }

    /// A body at `position` that stops `margin` short of solid faces.
    pub fn with_margin(position: Vec3, margin: f32) -> Self {
        Self { position, margin }
    }

    /// Moves the body by `delta`, stopping short of solid voxels.
    ///
    /// `samples` are offsets from [`position`](Self::position) that are tested
    /// for collisions. `is_solid` receives the visited voxel, or `None` outside
    /// loaded chunks. Each axis visits `ceil(|delta|)` whole voxels, so even a
    /// short move looks one voxel ahead.
    pub fn move_and_slide<V, F>(
        &mut self,
        store: &ChunkStore<V>,
        delta: Vec3,
        samples: &[Vec3],
        mut is_solid: F,
    ) -> MoveFeedback
    where
        F: FnMut(Option<VoxelPointer>) -> bool,
    {
        let mut feedback = MoveFeedback::default();
        let mut caster = VoxelRayCaster::new(store, self.position);

        for axis in 0..3 {
            let travel = delta[axis];
            if travel == 0.0 {
                continue;
            }
            let positive = travel > 0.0;
            let mut step = Vec3::ZERO;
            step[axis] = Face::towards(axis, positive).direction() as f32;
            let lookahead = travel.abs().ceil() as u32;

            let mut limit: Option<f32> = None;
            for &sample in samples {
                // Start from the voxel center so unit steps cross exactly one
                // boundary each; only the floored axis value matters below.
                let mut start = self.position + sample;
                start[axis] = start[axis].floor() + 0.5;
                caster.set_position(start);
                for _ in 0..lookahead {
                    let voxel = caster.step_voxel(step);
                    if !is_solid(voxel) {
                        continue;
                    }
                    let face = caster.position()[axis].floor() + if positive { 0.0 } else { 1.0 };
                    let candidate = face - sample[axis];
                    limit = Some(match limit {
                        Some(l) if positive => l.min(candidate),
                        Some(l) => l.max(candidate),
                        None => candidate,
                    });
                    break;
                }
            }

            let target = self.position[axis] + travel;
            let Some(limit) = limit else {
                self.position[axis] = target;
                continue;
            };

            let (cap, clamped) = if positive {
                let cap = limit - self.margin;
                (cap, cap < target)
            } else {
                let cap = limit + self.margin;
                (cap, cap > target)
            };
            if clamped {
                tracing::debug!(axis, from = self.position[axis], to = cap, "sweep clamped");
                self.position[axis] = cap;
                feedback.prevented[axis] = true;
            } else {
                self.position[axis] = target;
            }
        }

        feedback
    }
}

#[cfg(test)]
#[path = "voxel_collision_tests.rs"]
mod tests;
