//! Incremental voxel ray casting over a [`ChunkStore`].
//!
//! A [`VoxelRayCaster`] advances a point through the grid in small steps.
//! While the point is inside loaded chunks the caster *tracks* a
//! [`VoxelPointer`] and follows neighbor links, which costs no map lookups;
//! once it leaves loaded space it *floats* and only re-tracks when the point
//! crosses into a different chunk.
//!
//! [`VoxelRayCaster::step`] additionally resolves which voxel face the step
//! segment passed through. It tests a generous neighborhood (the exit voxel,
//! its six neighbors, and the start voxel's six neighbors) so that steps
//! straddling grid edges or corners cannot slip between diagonal voxels.

use glam::{IVec3, Vec3};
use strata_voxel::coords::move_and_detect_chunk_switch;
use strata_voxel::{ChunkStore, Face, VoxelPointer, world_to_voxel};

/// A face crossed by a ray step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceCollision {
    /// The voxel owning the face. `None` if it lies outside loaded chunks.
    pub voxel: Option<VoxelPointer>,
    /// World-space position of that voxel. Always known, even when `voxel`
    /// is `None`.
    pub voxel_pos: IVec3,
    /// Which face of the voxel was crossed.
    pub face: Face,
    /// Distance from the start of the step to the intersection.
    pub distance: f32,
    /// Exact crossing point in world space.
    pub intersection: Vec3,
}

impl FaceCollision {
    /// The voxel in front of the crossed face, e.g. where a block would be placed.
    pub fn adjacent<V>(&self, store: &ChunkStore<V>) -> Option<VoxelPointer> {
        self.voxel?.neighbor(store, self.face)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum CasterState {
    /// Inside a loaded chunk; `pointer` is the voxel containing `position`.
    Tracking { pointer: VoxelPointer, position: Vec3 },
    /// Outside loaded chunks.
    Floating { position: Vec3 },
}

impl CasterState {
    fn position(&self) -> Vec3 {
        match *self {
            Self::Tracking { position, .. } | Self::Floating { position } => position,
        }
    }
}

/// Walks a point through a chunk store. Ray termination is up to the caller.
pub struct VoxelRayCaster<'s, V> {
    store: &'s ChunkStore<V>,
    state: CasterState,
}

impl<'s, V> VoxelRayCaster<'s, V> {
    /// Creates a caster at `position`, tracking if that position is loaded.
    pub fn new(store: &'s ChunkStore<V>, position: Vec3) -> Self {
        Self {
            store,
            state: Self::state_for(store, position),
        }
    }

    /// Current world-space position.
    pub fn position(&self) -> Vec3 {
        self.state.position()
    }

    /// The voxel containing the current position, if it is loaded.
    pub fn pointer(&self) -> Option<VoxelPointer> {
        match self.state {
            CasterState::Tracking { pointer, .. } => Some(pointer),
            CasterState::Floating { .. } => None,
        }
    }

    pub fn is_tracking(&self) -> bool {
        matches!(self.state, CasterState::Tracking { .. })
    }

    /// Teleports the caster, re-deriving its state with a full lookup.
    pub fn set_position(&mut self, position: Vec3) {
        self.state = Self::state_for(self.store, position);
    }

    /// Re-derives tracking/floating state for the current position.
    ///
    /// Needed after chunks were inserted or removed around the caster.
    pub fn refresh_seek_position(&mut self) {
        self.set_position(self.position());
    }

    fn state_for(store: &ChunkStore<V>, position: Vec3) -> CasterState {
        match store.voxel_pointer(position) {
            Some(pointer) => CasterState::Tracking { pointer, position },
            None => CasterState::Floating { position },
        }
    }

    /// Moves the caster by `delta` and returns the voxel it now occupies.
    ///
    /// Each component of `delta` must have magnitude below 1 so no voxel is
    /// skipped; a unit step along a single axis is also fine. Face crossings
    /// are not resolved here, so diagonal moves can phase through corners.
    pub fn step_voxel(&mut self, delta: Vec3) -> Option<VoxelPointer> {
        match &mut self.state {
            CasterState::Tracking { pointer, position } => {
                let mut left_loaded = false;
                for axis in 0..3 {
                    let old = position[axis];
                    position[axis] += delta[axis];
                    // Rounding can carry a unit step across two boundaries.
                    let crossed = position[axis].floor() - old.floor();
                    if left_loaded || crossed == 0.0 {
                        continue;
                    }
                    let face = Face::towards(axis, crossed > 0.0);
                    for _ in 0..crossed.abs() as u32 {
                        match pointer.neighbor(self.store, face) {
                            Some(next) => *pointer = next,
                            None => {
                                left_loaded = true;
                                break;
                            }
                        }
                    }
                }
                if !left_loaded {
                    return Some(*pointer);
                }
                let position = *position;
                self.state = CasterState::Floating { position };
            }
            CasterState::Floating { position } => {
                if move_and_detect_chunk_switch(position, delta) == IVec3::ZERO {
                    // Still inside the same unloaded chunk.
                    return None;
                }
            }
        }

        let position = self.position();
        let pointer = self.store.voxel_pointer(position)?;
        self.state = CasterState::Tracking { pointer, position };
        Some(pointer)
    }

    /// Moves the caster by `delta`, reporting the nearest occluding face crossed.
    ///
    /// `is_occluding` is only consulted for candidates nearer than the best
    /// accepted so far; among equally distant candidates the first found wins.
    /// Returns `None` if the step stayed inside one loaded voxel or no
    /// candidate was accepted.
    pub fn step<F>(&mut self, delta: Vec3, mut is_occluding: F) -> Option<FaceCollision>
    where
        F: FnMut(&FaceCollision) -> bool,
    {
        let store = self.store;
        let start_voxel = self.pointer();
        let segment_start = self.position();
        let exit_voxel = self.step_voxel(delta);
        let segment_end = self.position();

        if start_voxel.is_some() && start_voxel == exit_voxel {
            return None;
        }

        let mut nearest: Option<FaceCollision> = None;
        let mut check_faces = |voxel: Option<VoxelPointer>, voxel_pos: Vec3| {
            for face in Face::ALL {
                let Some(intersection) = face.segment_intersection(voxel_pos, segment_start, segment_end)
                else {
                    continue;
                };
                let distance = segment_start.distance(intersection);
                if nearest.is_some_and(|best| distance >= best.distance) {
                    continue;
                }
                let collision = FaceCollision {
                    voxel,
                    voxel_pos: world_to_voxel(voxel_pos),
                    face,
                    distance,
                    intersection,
                };
                if is_occluding(&collision) {
                    nearest = Some(collision);
                }
            }
        };

        check_faces(exit_voxel, segment_end);
        for (origin, anchor) in [(exit_voxel, segment_end), (start_voxel, segment_start)] {
            for face in Face::ALL {
                let neighbor = match origin {
                    Some(pointer) => pointer.neighbor(store, face),
                    None => store.neighbor_of_unloaded(anchor, face),
                };
                check_faces(neighbor, anchor + face.offset().as_vec3());
            }
        }

        nearest
    }

    /// Repeats [`step`](Self::step) up to `max_steps` times along `direction`.
    ///
    /// Returns the first collision, or `None` if the reach ran out.
    pub fn cast<F>(&mut self, direction: Vec3, max_steps: u32, mut is_occluding: F) -> Option<FaceCollision>
    where
        F: FnMut(&FaceCollision) -> bool,
    {
        for _ in 0..max_steps {
            if let Some(hit) = self.step(direction, &mut is_occluding) {
                return Some(hit);
            }
        }
        None
    }
}
