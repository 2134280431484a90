// Per-tick systems that drive entities across the walkmesh.
//
// The mesh is immutable shared state; each entity exclusively owns its
// anchor, so these are plain exclusive-World query loops run once per
// tick from the main loop.

use bevy_ecs::prelude::*;
use glam::{Quat, Vec3};
use rand::Rng;

use super::components::{SurfaceAnchor, Transform, Wander};
use super::walkmesh::{WalkMesh, WalkOutcome};

/// Maximum random heading change per tick, radians.
const MAX_TURN: f32 = 0.35;

/// Nudge every wanderer's heading by a random turn around its surface up
/// direction, then drop the out-of-plane component so steps stay roughly
/// tangential. The walk itself tolerates a non-tangent step, but tangent
/// headings keep speeds consistent on slopes.
pub fn wander_system(world: &mut World, rng: &mut impl Rng) {
    let mut query = world.query::<(&mut Wander, &Transform)>();
    for (mut wander, transform) in query.iter_mut(world) {
        let turn = rng.gen_range(-MAX_TURN..MAX_TURN);
        let rotated = Quat::from_axis_angle(transform.up, turn) * wander.heading;
        let tangent = rotated - transform.up * rotated.dot(transform.up);
        wander.heading = tangent.try_normalize().unwrap_or(wander.heading);
    }
}

/// Advance every anchored entity by `heading * speed * dt` along the
/// surface and write the result back into its transform.
pub fn surface_walk_system(world: &mut World, mesh: &WalkMesh, dt: f32) {
    let mut query = world.query::<(&mut Transform, &mut SurfaceAnchor, &mut Wander)>();
    for (mut transform, mut anchor, mut wander) in query.iter_mut(world) {
        let step = wander.heading * wander.speed * dt;
        match mesh.walk(&mut anchor.point, step) {
            WalkOutcome::Landed => {}
            WalkOutcome::ClampedAtBoundary => {
                // Turn around so the walker doesn't grind the edge.
                wander.heading = -wander.heading;
                log::debug!("walker clamped at mesh boundary");
            }
            WalkOutcome::DepthExceeded => {
                log::warn!("walk crossed too many edges in one tick, step truncated");
            }
        }

        transform.position = mesh.world_point(&anchor.point);
        transform.up = mesh
            .world_normal(&anchor.point)
            .try_normalize()
            .unwrap_or(Vec3::Z);
    }
}
