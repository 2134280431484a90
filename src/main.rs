// Headless walkmesh demo: a herd of wanderers roaming a rolling terrain.
//
// Pass a walkmesh blob path as the first argument to walk a mesh from
// disk; with no arguments a hilly terrain grid is generated in place.
// `--export <path>` writes the generated terrain out as a blob instead
// of simulating. Runs a fixed-timestep simulation and logs walker
// positions. No window, no renderer.

mod engine;

use bevy_ecs::prelude::*;
use glam::Vec3;
use rand::Rng;

use engine::{SurfaceAnchor, Transform, WalkMesh, WalkResult, Wander, systems};

// ============================================================================
// DEMO PARAMETERS
// ============================================================================

/// Number of wandering entities.
const WALKER_COUNT: usize = 32;
/// Simulation ticks per second.
const TICK_RATE: f32 = 60.0;
/// Total simulated time, seconds.
const RUN_SECONDS: f32 = 10.0;
/// Walker movement speed, world units per second.
const WALKER_SPEED: f32 = 1.5;

/// Grid resolution of the generated terrain (cells per side).
const TERRAIN_CELLS: usize = 24;
/// World size of the generated terrain (units per side).
const TERRAIN_SIZE: f32 = 20.0;

// ============================================================================
// DEMO TERRAIN
// ============================================================================

fn terrain_height(x: f32, y: f32) -> f32 {
    0.6 * (0.5 * x).sin() + 0.4 * (0.7 * y).cos()
}

/// Generate the rolling-hills arrays: a regular grid displaced by
/// `terrain_height`, triangulated with consistent winding, with smooth
/// area-weighted vertex normals.
fn terrain_arrays() -> (Vec<Vec3>, Vec<Vec3>, Vec<[u32; 3]>) {
    let n = TERRAIN_CELLS;
    let cell = TERRAIN_SIZE / n as f32;
    let half = TERRAIN_SIZE / 2.0;

    let mut positions = Vec::with_capacity((n + 1) * (n + 1));
    for gy in 0..=n {
        for gx in 0..=n {
            let x = gx as f32 * cell - half;
            let y = gy as f32 * cell - half;
            positions.push(Vec3::new(x, y, terrain_height(x, y)));
        }
    }

    let index = |gx: usize, gy: usize| (gy * (n + 1) + gx) as u32;
    let mut triangles = Vec::with_capacity(n * n * 2);
    for gy in 0..n {
        for gx in 0..n {
            let (i0, i1) = (index(gx, gy), index(gx + 1, gy));
            let (i2, i3) = (index(gx, gy + 1), index(gx + 1, gy + 1));
            triangles.push([i0, i1, i2]);
            triangles.push([i1, i3, i2]);
        }
    }

    // Smooth normals: accumulate area-weighted face normals per vertex
    // (cross product magnitude = 2x triangle area), then normalize.
    let mut accum = vec![Vec3::ZERO; positions.len()];
    for &[a, b, c] in &triangles {
        let pa = positions[a as usize];
        let pb = positions[b as usize];
        let pc = positions[c as usize];
        let weighted = (pb - pa).cross(pc - pa);
        accum[a as usize] += weighted;
        accum[b as usize] += weighted;
        accum[c as usize] += weighted;
    }
    let normals: Vec<Vec3> = accum.iter().map(|n| n.normalize_or_zero()).collect();

    (positions, normals, triangles)
}

fn demo_terrain() -> WalkResult<WalkMesh> {
    let (positions, normals, triangles) = terrain_arrays();
    WalkMesh::new(positions, normals, triangles)
}

/// Write the generated terrain out as a walkmesh blob.
fn export_terrain(path: &str) -> WalkResult<()> {
    let (positions, normals, triangles) = terrain_arrays();
    engine::loader::save(path, &positions, &normals, &triangles)
}

// ============================================================================
// WALKER SPAWNING
// ============================================================================

fn spawn_walkers(world: &mut World, mesh: &WalkMesh, count: usize) {
    let mut rng = rand::thread_rng();

    for _ in 0..count {
        // Probe near a random vertex and let locate pin it to the surface.
        let v = rng.gen_range(0..mesh.vertex_count() as u32);
        let jitter = Vec3::new(
            rng.gen_range(-0.5..0.5),
            rng.gen_range(-0.5..0.5),
            rng.gen_range(0.0..1.0),
        );
        let point = mesh.locate(mesh.position(v) + jitter);

        let angle = rng.gen_range(0.0..std::f32::consts::TAU);
        world.spawn((
            Transform {
                position: mesh.world_point(&point),
                up: mesh
                    .world_normal(&point)
                    .try_normalize()
                    .unwrap_or(Vec3::Z),
            },
            SurfaceAnchor { point },
            Wander {
                heading: Vec3::new(angle.cos(), angle.sin(), 0.0),
                speed: WALKER_SPEED,
            },
        ));
    }

    log::info!("spawned {count} walkers");
}

// ============================================================================
// MAIN
// ============================================================================

fn run() -> WalkResult<()> {
    let mut args = std::env::args().skip(1);
    let mesh = match args.next().as_deref() {
        Some("--export") => {
            let path = args.next().unwrap_or_else(|| "terrain.blob".into());
            export_terrain(&path)?;
            println!("wrote demo terrain to {path}");
            return Ok(());
        }
        Some(path) => {
            log::info!("loading walkmesh from {path}");
            engine::loader::load(path)?
        }
        None => {
            log::info!("no walkmesh given, generating demo terrain");
            demo_terrain()?
        }
    };
    log::info!(
        "walkmesh ready: {} vertices, {} triangles",
        mesh.vertex_count(),
        mesh.triangle_count()
    );

    let mut world = World::new();
    spawn_walkers(&mut world, &mesh, WALKER_COUNT);

    let dt = 1.0 / TICK_RATE;
    let ticks = (RUN_SECONDS * TICK_RATE) as usize;
    let mut rng = rand::thread_rng();

    for tick in 0..ticks {
        systems::wander_system(&mut world, &mut rng);
        systems::surface_walk_system(&mut world, &mesh, dt);

        if tick % TICK_RATE as usize == 0 {
            let mut query = world.query::<&Transform>();
            if let Some(transform) = query.iter(&world).next() {
                log::info!(
                    "t={:>4.1}s walker[0] at ({:+.2}, {:+.2}, {:+.2})",
                    tick as f32 * dt,
                    transform.position.x,
                    transform.position.y,
                    transform.position.z
                );
            }
        }
    }

    println!("simulated {WALKER_COUNT} walkers for {RUN_SECONDS}s ({ticks} ticks)");
    Ok(())
}

fn main() {
    env_logger::init();

    if let Err(err) = run() {
        log::error!("{err}");
        std::process::exit(1);
    }
}
