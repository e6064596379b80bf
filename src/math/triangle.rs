//! Triangle geometry on the X/Z ground plane.
//!
//! Heights ride in the Y component; only X and Z take part in the
//! barycentric and containment math.

use crate::core::types::Vec3;

/// Twice-area threshold below which a triangle is treated as degenerate
const DEGENERATE_EPSILON: f32 = 1e-6;

/// Interpolated height (Y) of the plane through `a`, `b`, `c` at the X/Z
/// position of `p`.
///
/// Returns None for collinear or zero-area triangles, whose barycentric
/// coordinates are undefined.
pub fn triangle_height(a: Vec3, b: Vec3, c: Vec3, p: Vec3) -> Option<f32> {
    let v0 = b - a;
    let v1 = c - a;
    let v2 = p - a;
    let denom = v0.x * v1.z - v1.x * v0.z;
    if denom.abs() < DEGENERATE_EPSILON {
        return None;
    }
    let v = (v2.x * v1.z - v1.x * v2.z) / denom;
    let w = (v0.x * v2.z - v2.x * v0.z) / denom;
    let u = 1.0 - v - w;
    Some(a.y * u + b.y * v + c.y * w)
}

/// Half-plane containment test in X/Z.
///
/// Boundary points count as inside. The three edge tests use a fixed
/// comparison direction, so vertex order decides how points exactly on an
/// edge are classified.
pub fn triangle_contains_point(a: Vec3, b: Vec3, c: Vec3, p: Vec3) -> bool {
    let b1 = edge_side(p, a, b);
    let b2 = edge_side(p, b, c);
    let b3 = edge_side(p, c, a);
    b1 == b2 && b2 == b3
}

/// Which side of the edge `from -> to` the point lies on, `<= 0` inclusive
fn edge_side(p: Vec3, from: Vec3, to: Vec3) -> bool {
    (p.x - to.x) * (from.z - to.z) - (p.z - to.z) * (from.x - to.x) <= 0.0
}
