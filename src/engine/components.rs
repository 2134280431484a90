// ECS components for entities that live on the walkmesh.

use bevy_ecs::prelude::*;
use glam::Vec3;

use super::walkmesh::WalkPoint;

/// World-space placement of an entity, written back from its walk point
/// every tick.
#[derive(Component, Debug, Clone, Copy)]
pub struct Transform {
    pub position: Vec3,
    /// Surface up direction (normalized interpolated mesh normal).
    pub up: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            up: Vec3::Z,
        }
    }
}

/// Pins an entity to the walkmesh.
///
/// Exclusively owned: nothing other than this entity's update reads or
/// writes the walk point.
#[derive(Component, Debug, Clone, Copy)]
pub struct SurfaceAnchor {
    pub point: WalkPoint,
}

/// Wander steering state.
///
/// `heading` is kept unit length and roughly tangent to the surface; the
/// per-tick walk step is `heading * speed * dt`.
#[derive(Component, Debug, Clone, Copy)]
pub struct Wander {
    pub heading: Vec3,
    /// Movement speed in world units per second.
    pub speed: f32,
}
