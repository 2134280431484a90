// Walkmesh: a triangulated surface that entities walk on.
//
// The store owns flat vertex/normal/triangle arrays; everything else
// references them by index. A directed-edge -> opposite-vertex map built
// once at construction answers "which triangle is across this edge"
// during walks. Nothing here mutates the mesh after `new`.

use std::collections::HashMap;

use glam::Vec3;

use super::error::{WalkError, WalkResult};
use super::geometry::{MIN_TRIANGLE_AREA, barycentric, closest_point_on_triangle, triangle_area};

/// Edge crossings a single `walk` call may perform before giving up and
/// discarding the rest of the step. Guards against numerical oscillation
/// on pathological thin-triangle meshes.
pub const MAX_EDGE_CROSSINGS: usize = 10;

// ============================================================================
// WALK POINT
// ============================================================================

/// A location constrained to the walkmesh surface: a triangle index plus
/// barycentric weights within that triangle.
///
/// Weights sum to 1; a component of 0 means the point lies on the edge
/// (or vertex) opposite that corner. Created by `WalkMesh::locate`,
/// advanced in place by `WalkMesh::walk`. One per walking entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WalkPoint {
    /// Index into the mesh's triangle array.
    pub triangle: usize,
    /// Barycentric weights against that triangle's three corners.
    pub weights: Vec3,
}

/// How a `walk` call ended.
///
/// Movement continues silently in all three cases; callers that care
/// (steering, tests) can branch on the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkOutcome {
    /// The full step was applied; the point ended inside a triangle.
    Landed,
    /// The step ran off an edge with no neighboring triangle. The point
    /// is pinned on that edge and the rest of the step was dropped.
    ClampedAtBoundary,
    /// More than `MAX_EDGE_CROSSINGS` crossings in one call. The point is
    /// still valid but the rest of the step was dropped.
    DepthExceeded,
}

// ============================================================================
// MESH STORE
// ============================================================================

/// Immutable triangulated walking surface.
#[derive(Debug)]
pub struct WalkMesh {
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    triangles: Vec<[u32; 3]>,
    /// Directed edge (u, v) -> the third vertex of the triangle that
    /// contains u->v in that orientation. The reverse edge (v, u), when
    /// present, identifies the triangle across the shared boundary; when
    /// absent, (u, v) lies on the mesh boundary.
    next_vertex: HashMap<(u32, u32), u32>,
}

impl WalkMesh {
    /// Build a walkmesh from raw arrays, validating as we go.
    ///
    /// `positions` and `normals` are parallel per-vertex arrays. Rejects
    /// empty meshes, out-of-range indices, triangles that repeat a
    /// vertex, and duplicate directed edges: a non-manifold or
    /// inconsistently wound input would otherwise corrupt the adjacency
    /// map and misroute walks at runtime.
    pub fn new(
        positions: Vec<Vec3>,
        normals: Vec<Vec3>,
        triangles: Vec<[u32; 3]>,
    ) -> WalkResult<Self> {
        if triangles.is_empty() {
            return Err(WalkError::EmptyMesh);
        }
        if positions.len() != normals.len() {
            return Err(WalkError::NormalCountMismatch {
                positions: positions.len(),
                normals: normals.len(),
            });
        }

        let vertex_count = positions.len();
        let mut next_vertex = HashMap::with_capacity(triangles.len() * 3);
        for (ti, &[a, b, c]) in triangles.iter().enumerate() {
            for index in [a, b, c] {
                if index as usize >= vertex_count {
                    return Err(WalkError::IndexOutOfBounds {
                        triangle: ti,
                        index,
                        vertex_count,
                    });
                }
            }
            if a == b || b == c || c == a {
                return Err(WalkError::DegenerateTriangle { triangle: ti });
            }
            for (u, v, opposite) in [(a, b, c), (b, c, a), (c, a, b)] {
                if next_vertex.insert((u, v), opposite).is_some() {
                    return Err(WalkError::NonManifoldEdge { from: u, to: v });
                }
            }
        }

        Ok(Self {
            positions,
            normals,
            triangles,
            next_vertex,
        })
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Vertex indices of triangle `t`.
    #[inline]
    pub fn triangle(&self, t: usize) -> [u32; 3] {
        self.triangles[t]
    }

    /// Position of vertex `v`.
    #[inline]
    pub fn position(&self, v: u32) -> Vec3 {
        self.positions[v as usize]
    }

    /// Corner positions of triangle `t`.
    #[inline]
    fn corners(&self, t: usize) -> [Vec3; 3] {
        let [a, b, c] = self.triangles[t];
        [
            self.positions[a as usize],
            self.positions[b as usize],
            self.positions[c as usize],
        ]
    }

    // ========================================================================
    // LOCATE
    // ========================================================================

    /// Anchor an arbitrary world position to the nearest point on the
    /// mesh surface.
    ///
    /// Brute force: scans every triangle and keeps the first one whose
    /// closest point strictly beats the running minimum, so exact ties
    /// resolve to the earliest triangle in storage order. Near-zero-area
    /// triangles are skipped as candidates rather than failing the query.
    /// O(T) per call, meant for spawn/reset rather than per-tick use.
    pub fn locate(&self, point: Vec3) -> WalkPoint {
        let mut best_triangle = 0;
        let mut best_point = self.corners(0)[0];
        let mut best_dist = f32::MAX;

        for t in 0..self.triangles.len() {
            let corners = self.corners(t);
            if triangle_area(corners) < MIN_TRIANGLE_AREA {
                continue;
            }
            let candidate = closest_point_on_triangle(corners, point);
            let dist = candidate.distance_squared(point);
            if dist < best_dist {
                best_triangle = t;
                best_point = candidate;
                best_dist = dist;
            }
        }

        // Weights come from the projected surface point, not the query,
        // so they land in [0, 1] up to float error.
        let [a, b, c] = self.corners(best_triangle);
        WalkPoint {
            triangle: best_triangle,
            weights: barycentric(best_point, a, b, c),
        }
    }

    // ========================================================================
    // WORLD-SPACE PROJECTION
    // ========================================================================

    /// World-space position of a walk point.
    #[inline]
    pub fn world_point(&self, wp: &WalkPoint) -> Vec3 {
        let [a, b, c] = self.triangles[wp.triangle];
        wp.weights.x * self.positions[a as usize]
            + wp.weights.y * self.positions[b as usize]
            + wp.weights.z * self.positions[c as usize]
    }

    /// Interpolated surface normal at a walk point.
    ///
    /// NOT renormalized; callers that need a unit vector normalize it
    /// themselves.
    #[inline]
    pub fn world_normal(&self, wp: &WalkPoint) -> Vec3 {
        let [a, b, c] = self.triangles[wp.triangle];
        wp.weights.x * self.normals[a as usize]
            + wp.weights.y * self.normals[b as usize]
            + wp.weights.z * self.normals[c as usize]
    }

    // ========================================================================
    // WALK
    // ========================================================================

    /// Advance a walk point by a world-space displacement, hopping across
    /// triangle boundaries as needed.
    ///
    /// `step` does not have to be tangent to the current triangle; the
    /// barycentric solve re-projects it onto the surface. Steps are
    /// expected to be small relative to triangle size (one entity tick).
    pub fn walk(&self, wp: &mut WalkPoint, step: Vec3) -> WalkOutcome {
        let mut step = step;

        // Interior landing, boundary clamp, or crossing-budget exhaustion
        // are the only ways out.
        for _ in 0..=MAX_EDGE_CROSSINGS {
            let target = self.world_point(wp) + step;
            let [a, b, c] = self.triangles[wp.triangle];
            let next = barycentric(
                target,
                self.positions[a as usize],
                self.positions[b as usize],
                self.positions[c as usize],
            );

            if next.min_element() > 0.0 {
                wp.weights = next;
                return WalkOutcome::Landed;
            }

            // The target left through the edge opposite the first
            // negative component. Slot order x, y, z: a corner exit takes
            // whichever edge comes first, not the geometrically nearest.
            let (slot, v0, v1) = if next.x < 0.0 {
                (0, b, c)
            } else if next.y < 0.0 {
                (1, c, a)
            } else if next.z < 0.0 {
                (2, a, b)
            } else {
                // min == 0 with nothing negative: the target sits exactly
                // on an edge of this triangle. Take it.
                wp.weights = next;
                return WalkOutcome::Landed;
            };

            // Slide to where the step pierces that edge, then pin the
            // crossed component to exactly zero.
            let delta = next - wp.weights;
            let f = wp.weights[slot] / -delta[slot];
            wp.weights += delta * f;
            wp.weights[slot] = 0.0;

            let edge_point = self.world_point(wp);
            let reduced = target - edge_point;

            let Some(&third) = self.next_vertex.get(&(v1, v0)) else {
                // Mesh boundary: stay pinned on the edge, drop the rest.
                return WalkOutcome::ClampedAtBoundary;
            };
            let neighbor = self
                .triangles
                .iter()
                .position(|t| t.contains(&v0) && t.contains(&v1) && t.contains(&third));
            let Some(neighbor) = neighbor else {
                // Every adjacency entry is derived from a stored triangle,
                // so this scan cannot miss on a validated mesh.
                return WalkOutcome::ClampedAtBoundary;
            };

            // Re-anchor on the neighbor and keep going with what's left
            // of the step.
            wp.triangle = neighbor;
            let [a, b, c] = self.corners(neighbor);
            wp.weights = barycentric(edge_point, a, b, c);
            step = reduced;
        }

        WalkOutcome::DepthExceeded
    }
}

// ============================================================================
// TESTS
// ============================================================================
