//! Polygon triangulation.
//!
//! Quads are split along their shorter diagonal. Larger polygons are ear
//! clipped in the plane of their Newell normal, falling back to a fan when
//! clipping cannot make progress (degenerate or self-intersecting input).
//! Every triangle keeps the winding of its source polygon.

use crate::math::Vec3;

/// Triangulate one polygon given its corner positions in winding order.
///
/// Returns triangles as triples of corner indices (`0..points.len()`).
pub fn triangulate_polygon(points: &[[f64; 3]]) -> Vec<[usize; 3]> {
    match points.len() {
        0..=2 => Vec::new(),
        3 => vec![[0, 1, 2]],
        4 => split_quad(points),
        _ => ear_clip(points).unwrap_or_else(|| fan(points.len())),
    }
}

fn split_quad(points: &[[f64; 3]]) -> Vec<[usize; 3]> {
    let p: Vec<Vec3> = points.iter().map(|p| Vec3::from(*p)).collect();
    if (p[0] - p[2]).norm_squared() <= (p[1] - p[3]).norm_squared() {
        vec![[0, 1, 2], [0, 2, 3]]
    } else {
        vec![[0, 1, 3], [1, 2, 3]]
    }
}

fn fan(n: usize) -> Vec<[usize; 3]> {
    (1..n - 1).map(|i| [0, i, i + 1]).collect()
}

fn newell_normal(points: &[Vec3]) -> Vec3 {
    let mut n = Vec3::zeros();
    for (i, a) in points.iter().enumerate() {
        let b = points[(i + 1) % points.len()];
        n.x += (a.y - b.y) * (a.z + b.z);
        n.y += (a.z - b.z) * (a.x + b.x);
        n.z += (a.x - b.x) * (a.y + b.y);
    }
    n
}

fn cross_2d(o: [f64; 2], a: [f64; 2], b: [f64; 2]) -> f64 {
    (a[0] - o[0]) * (b[1] - o[1]) - (a[1] - o[1]) * (b[0] - o[0])
}

/// Inside or on the boundary; a reflex vertex touching the candidate ear's
/// diagonal must block it.
fn inside_triangle(p: [f64; 2], a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> bool {
    let d1 = cross_2d(a, b, p);
    let d2 = cross_2d(b, c, p);
    let d3 = cross_2d(c, a, p);
    d1 >= 0.0 && d2 >= 0.0 && d3 >= 0.0
}

fn ear_clip(points: &[[f64; 3]]) -> Option<Vec<[usize; 3]>> {
    let p: Vec<Vec3> = points.iter().map(|p| Vec3::from(*p)).collect();
    let normal = newell_normal(&p);
    if normal.norm_squared() <= f64::EPSILON {
        return None;
    }

    // Drop the dominant axis and orient the 2D projection counter-clockwise.
    let abs = normal.abs();
    let (u, v, sign) = if abs.x >= abs.y && abs.x >= abs.z {
        (1, 2, normal.x.signum())
    } else if abs.y >= abs.z {
        (2, 0, normal.y.signum())
    } else {
        (0, 1, normal.z.signum())
    };
    let flat: Vec<[f64; 2]> = p.iter().map(|q| [q[u], q[v] * sign]).collect();

    let mut remaining: Vec<usize> = (0..points.len()).collect();
    let mut triangles = Vec::with_capacity(points.len() - 2);
    let mut guard = 0usize;
    let mut i = 0usize;

    while remaining.len() > 3 {
        if guard > remaining.len() {
            return None;
        }
        let n = remaining.len();
        let prev = remaining[(i + n - 1) % n];
        let curr = remaining[i % n];
        let next = remaining[(i + 1) % n];

        let convex = cross_2d(flat[prev], flat[curr], flat[next]) > 0.0;
        let is_ear = convex
            && remaining
                .iter()
                .filter(|&&k| k != prev && k != curr && k != next)
                .all(|&k| !inside_triangle(flat[k], flat[prev], flat[curr], flat[next]));

        if is_ear {
            triangles.push([prev, curr, next]);
            remaining.remove(i % n);
            guard = 0;
        } else {
            i += 1;
            guard += 1;
        }
    }

    triangles.push([remaining[0], remaining[1], remaining[2]]);
    Some(triangles)
}
