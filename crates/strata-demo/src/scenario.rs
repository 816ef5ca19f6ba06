//! The demo world: a stone floor, a falling body, and a reach query.

use glam::{IVec3, Vec3};
use strata_config::{PhysicsConfig, WorldConfig};
use strata_physics::{FaceCollision, VoxelBody, VoxelRayCaster, cuboid_sample_points};
use strata_voxel::{ChunkStore, VoxelChunk, VoxelPointer};
use tracing::{debug, info};

/// Eye height above the body position, used as the reach ray origin.
const EYE_HEIGHT: f32 = 1.6;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Block {
    Stone,
    Marker,
}

/// Fills a square floor layer whose top surface sits at `floor_height`.
///
/// Returns the number of voxels written.
pub fn build_floor(store: &mut ChunkStore<Block>, world: &WorldConfig) -> usize {
    let y = world.floor_height - 1;
    let r = world.floor_radius;
    if r == 0 {
        return 0;
    }
    let written = store.fill_region(
        IVec3::new(-r, y, -r),
        IVec3::new(r - 1, y, r - 1),
        Block::Stone,
        VoxelChunk::new,
    );
    info!(voxels = written, chunks = store.len(), "built floor");
    written
}

fn is_solid(store: &ChunkStore<Block>) -> impl FnMut(Option<VoxelPointer>) -> bool + '_ {
    move |voxel: Option<VoxelPointer>| voxel.is_some_and(|p| p.exists(store))
}

/// Summary of a fall simulation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FallOutcome {
    pub position: Vec3,
    /// Tick on which the body first touched the ground, if it did.
    pub landed_at: Option<u32>,
}

/// Drops a box-shaped body from `spawn` under constant gravity.
pub fn simulate_fall(
    store: &ChunkStore<Block>,
    world: &WorldConfig,
    physics: &PhysicsConfig,
) -> FallOutcome {
    let samples = cuboid_sample_points(Vec3::from(physics.body_min), Vec3::from(physics.body_max));
    let mut body = VoxelBody::with_margin(Vec3::from(world.spawn), physics.voxel_margin);
    let mut velocity = Vec3::ZERO;
    let mut landed_at = None;

    for tick in 0..physics.fall_ticks {
        velocity.y -= physics.gravity;
        let feedback = body.move_and_slide(store, velocity, &samples, is_solid(store));
        if feedback.on_ground(velocity) {
            velocity.y = 0.0;
            if landed_at.is_none() {
                info!(tick, y = body.position.y, "body landed");
                landed_at = Some(tick);
            }
        }
        debug!(tick, position = %body.position, "tick");
    }

    FallOutcome {
        position: body.position,
        landed_at,
    }
}

/// Casts a straight-down reach ray from the body's eye.
pub fn look_down(
    store: &ChunkStore<Block>,
    body_position: Vec3,
    reach_steps: u32,
) -> Option<FaceCollision> {
    let eye = body_position + Vec3::Y * EYE_HEIGHT;
    let mut caster = VoxelRayCaster::new(store, eye);
    caster.cast(Vec3::NEG_Y, reach_steps, |hit| {
        hit.voxel.is_some_and(|p| p.exists(store))
    })
}

/// Places `block` in front of the hit face, creating the chunk there if
/// needed. Returns the placed position, or `None` if the slot is taken.
pub fn place_against(
    store: &mut ChunkStore<Block>,
    hit: &FaceCollision,
    block: Block,
) -> Option<IVec3> {
    let target = match hit.adjacent(store) {
        Some(target) => target,
        None => {
            let pos = (hit.voxel_pos + hit.face.offset()).as_vec3();
            store.voxel_pointer_or_create(pos, VoxelChunk::new)
        }
    };
    if target.exists(store) {
        return None;
    }
    target.write(store, block);
    target.world_pos(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_voxel::Face;

    fn small_world() -> WorldConfig {
        WorldConfig {
            spawn: [0.5, 4.0, 0.5],
            floor_height: 0,
            floor_radius: 4,
        }
    }

    #[test]
    fn test_build_floor_spans_four_chunks() {
        let mut store = ChunkStore::new();
        let written = build_floor(&mut store, &small_world());
        assert_eq!(written, 8 * 8);
        assert_eq!(store.len(), 4);
        assert!(store.voxel_pointer(Vec3::new(-4.0, -0.5, 3.5)).unwrap().exists(&store));
        assert!(store.voxel_pointer(Vec3::new(3.5, -1.0, -4.0)).unwrap().exists(&store));
    }

    #[test]
    fn test_body_lands_on_floor() {
        let mut store = ChunkStore::new();
        let world = small_world();
        build_floor(&mut store, &world);
        let physics = PhysicsConfig::default();

        let outcome = simulate_fall(&store, &world, &physics);
        assert!(outcome.landed_at.is_some());
        assert!((outcome.position.y - physics.voxel_margin).abs() < 1e-4, "{:?}", outcome);
        assert_eq!(outcome.position.x, 0.5);
    }

    #[test]
    fn test_body_without_floor_keeps_falling() {
        let store = ChunkStore::new();
        let physics = PhysicsConfig {
            fall_ticks: 5,
            ..PhysicsConfig::default()
        };
        let outcome = simulate_fall(&store, &small_world(), &physics);
        assert!(outcome.landed_at.is_none());
        assert!(outcome.position.y < 4.0);
    }

    #[test]
    fn test_look_down_and_place() {
        let mut store = ChunkStore::new();
        build_floor(&mut store, &small_world());
        let body = Vec3::new(1.5, 0.02, 1.5);

        let hit = look_down(&store, body, 8).expect("floor within reach");
        assert_eq!(hit.face, Face::PosY);
        assert_eq!(hit.voxel_pos, IVec3::new(1, -1, 1));

        let placed = place_against(&mut store, &hit, Block::Marker);
        assert_eq!(placed, Some(IVec3::new(1, 0, 1)));

        let hit = look_down(&store, body, 8).expect("marker within reach");
        assert_eq!(hit.voxel_pos, IVec3::new(1, 0, 1));
        assert_eq!(hit.voxel.and_then(|p| p.read(&store).copied()), Some(Block::Marker));
    }

    #[test]
    fn test_look_down_out_of_reach() {
        let mut store = ChunkStore::new();
        build_floor(&mut store, &small_world());
        assert!(look_down(&store, Vec3::new(1.5, 20.0, 1.5), 8).is_none());
    }
}
