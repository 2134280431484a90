// Pure triangle math: closest point and barycentric coordinates.
//
// Nothing here knows about the mesh: every function operates on corner
// positions handed in by the caller. walkmesh.rs builds locate/walk on top.

use glam::Vec3;

/// Triangles with less area than this are skipped as locate candidates;
/// the barycentric solve divides by the Gram determinant, which goes to
/// zero as the triangle flattens.
pub const MIN_TRIANGLE_AREA: f32 = 1e-8;

/// Area of the triangle spanned by `corners`.
#[inline]
pub fn triangle_area(corners: [Vec3; 3]) -> f32 {
    let [a, b, c] = corners;
    0.5 * (b - a).cross(c - a).length()
}

/// Closest point on the filled triangle `corners` to `query`.
///
/// Classifies `query` against the regions of the triangle's Voronoi
/// diagram (interior face and three edge regions, with the corner
/// regions falling out of the edge clamps) and projects accordingly.
/// The caller must not
/// pass a (near-)zero-area triangle; see `MIN_TRIANGLE_AREA`.
pub fn closest_point_on_triangle(corners: [Vec3; 3], query: Vec3) -> Vec3 {
    let [a, b, c] = corners;
    let edge0 = b - a;
    let edge1 = c - a;
    let to_a = a - query;

    let d00 = edge0.dot(edge0);
    let d01 = edge0.dot(edge1);
    let d11 = edge1.dot(edge1);
    let q0 = edge0.dot(to_a);
    let q1 = edge1.dot(to_a);

    let det = d00 * d11 - d01 * d01;
    let mut s = d01 * q1 - d11 * q0;
    let mut t = d01 * q0 - d00 * q1;

    if s + t < det {
        if s < 0.0 {
            if t < 0.0 {
                // Nearest the corner at `a`: clamp onto whichever of the
                // two incident edges faces the query.
                if q0 < 0.0 {
                    s = (-q0 / d00).clamp(0.0, 1.0);
                    t = 0.0;
                } else {
                    s = 0.0;
                    t = (-q1 / d11).clamp(0.0, 1.0);
                }
            } else {
                s = 0.0;
                t = (-q1 / d11).clamp(0.0, 1.0);
            }
        } else if t < 0.0 {
            s = (-q0 / d00).clamp(0.0, 1.0);
            t = 0.0;
        } else {
            // Interior: unnormalized coordinates just need the 1/det.
            let inv_det = 1.0 / det;
            s *= inv_det;
            t *= inv_det;
        }
    } else if s < 0.0 {
        let tmp0 = d01 + q0;
        let tmp1 = d11 + q1;
        if tmp1 > tmp0 {
            let numer = tmp1 - tmp0;
            let denom = d00 - 2.0 * d01 + d11;
            s = (numer / denom).clamp(0.0, 1.0);
            t = 1.0 - s;
        } else {
            s = 0.0;
            t = (-q1 / d11).clamp(0.0, 1.0);
        }
    } else if t < 0.0 {
        if d00 + q0 > d01 + q1 {
            let numer = d11 + q1 - d01 - q0;
            let denom = d00 - 2.0 * d01 + d11;
            s = (numer / denom).clamp(0.0, 1.0);
            t = 1.0 - s;
        } else {
            s = (-q0 / d00).clamp(0.0, 1.0);
            t = 0.0;
        }
    } else {
        let numer = d11 + q1 - d01 - q0;
        let denom = d00 - 2.0 * d01 + d11;
        s = (numer / denom).clamp(0.0, 1.0);
        t = 1.0 - s;
    }

    a + s * edge0 + t * edge1
}

/// Barycentric weights of `point` with respect to triangle `(a, b, c)`.
///
/// Solves the 2x2 Gram system, so the weights always sum to 1, but they
/// are deliberately NOT clamped to [0, 1]. A component goes negative when
/// `point` falls outside the triangle, which is exactly how the walk
/// detects edge crossings. Precondition: non-degenerate triangle.
pub fn barycentric(point: Vec3, a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    let v0 = b - a;
    let v1 = c - a;
    let v2 = point - a;

    let d00 = v0.dot(v0);
    let d01 = v0.dot(v1);
    let d11 = v1.dot(v1);
    let d20 = v2.dot(v0);
    let d21 = v2.dot(v1);

    let denom = d00 * d11 - d01 * d01;
    let v = (d11 * d20 - d01 * d21) / denom;
    let w = (d00 * d21 - d01 * d20) / denom;

    Vec3::new(1.0 - v - w, v, w)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CORNERS: [Vec3; 3] = [
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
    ];

    #[test]
    fn closest_point_above_interior_projects_down() {
        let p = closest_point_on_triangle(CORNERS, Vec3::new(0.25, 0.25, 3.0));
        assert!((p - Vec3::new(0.25, 0.25, 0.0)).length() < 1e-6);
    }

    #[test]
    fn closest_point_clamps_to_edge() {
        // Below the x-axis edge: clamps straight up onto it.
        let p = closest_point_on_triangle(CORNERS, Vec3::new(0.5, -2.0, 0.0));
        assert!((p - Vec3::new(0.5, 0.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn closest_point_clamps_to_corner() {
        let p = closest_point_on_triangle(CORNERS, Vec3::new(-1.0, -1.0, 0.0));
        assert!((p - Vec3::new(0.0, 0.0, 0.0)).length() < 1e-6);

        let p = closest_point_on_triangle(CORNERS, Vec3::new(3.0, -0.5, 0.0));
        assert!((p - Vec3::new(1.0, 0.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn barycentric_at_vertices_and_centroid() {
        let [a, b, c] = CORNERS;
        assert!((barycentric(a, a, b, c) - Vec3::new(1.0, 0.0, 0.0)).length() < 1e-6);
        assert!((barycentric(b, a, b, c) - Vec3::new(0.0, 1.0, 0.0)).length() < 1e-6);

        let centroid = (a + b + c) / 3.0;
        let w = barycentric(centroid, a, b, c);
        assert!((w - Vec3::splat(1.0 / 3.0)).length() < 1e-6);
    }

    #[test]
    fn barycentric_is_unclamped_outside() {
        let [a, b, c] = CORNERS;
        let w = barycentric(Vec3::new(2.0, 0.0, 0.0), a, b, c);
        assert!(w.x < 0.0);
        assert!((w.x + w.y + w.z - 1.0).abs() < 1e-5);
    }

    #[test]
    fn area_of_unit_right_triangle() {
        assert!((triangle_area(CORNERS) - 0.5).abs() < 1e-6);
    }
}
