use criterion::{Criterion, black_box, criterion_group, criterion_main};
use glam::{IVec3, Vec3};
use strata_physics::*;
use strata_voxel::{ChunkStore, VoxelChunk};

/// A 3×1×3 chunk slab with a solid floor at y = 0.
fn floor_world() -> ChunkStore<u8> {
    let mut store = ChunkStore::new();
    store.fill_region(IVec3::new(-16, -1, -16), IVec3::new(31, -1, 31), 1, VoxelChunk::new);
    for x in -1..=1 {
        for z in -1..=1 {
            store.voxel_pointer_or_create(Vec3::new(x as f32 * 16.0, 1.0, z as f32 * 16.0), VoxelChunk::new);
        }
    }
    store
}

fn bench_step_voxel_tracking(c: &mut Criterion) {
    let store = floor_world();
    c.bench_function("step_voxel_tracking_32", |bencher| {
        bencher.iter(|| {
            let mut caster = VoxelRayCaster::new(&store, Vec3::new(-15.5, 2.5, 0.5));
            for _ in 0..32 {
                black_box(caster.step_voxel(Vec3::new(0.9, 0.0, 0.3)));
            }
        })
    });
}

fn bench_cast_down(c: &mut Criterion) {
    let store = floor_world();
    c.bench_function("cast_down_reach_8", |bencher| {
        bencher.iter(|| {
            let mut caster = VoxelRayCaster::new(&store, black_box(Vec3::new(4.3, 3.7, 5.1)));
            black_box(caster.cast(Vec3::new(0.1, -0.5, 0.05), 8, |c| {
                c.voxel.is_some_and(|p| p.exists(&store))
            }))
        })
    });
}

fn bench_move_and_slide_cuboid(c: &mut Criterion) {
    let store = floor_world();
    let samples = cuboid_sample_points(Vec3::new(-0.3, 0.0, -0.3), Vec3::new(0.3, 1.8, 0.3));
    c.bench_function("move_and_slide_cuboid", |bencher| {
        bencher.iter(|| {
            let mut body = VoxelBody::new(Vec3::new(2.5, 1.0, 2.5));
            black_box(body.move_and_slide(&store, black_box(Vec3::new(0.4, -2.0, 0.3)), &samples, |p| {
                p.is_some_and(|p| p.exists(&store))
            }))
        })
    });
}

criterion_group!(
    benches,
    bench_step_voxel_tracking,
    bench_cast_down,
    bench_move_and_slide_cuboid
);
criterion_main!(benches);
