use nalgebra::{Point2, Vector2, Vector3};
use std::ops::{Add, Mul};

const EPSILON: f32 = 1e-6;

/// 2D cross product: which side of the directed edge `e` the point offset
/// `p` lies on. Positive means left-of-edge for the winding used here.
#[inline(always)]
pub fn edge_function(e: Vector2<f32>, p: Vector2<f32>) -> f32 {
    e.x * p.y - e.y * p.x
}

/// Raw edge-function values of a pixel center against the three directed
/// edges of a screen-space triangle. The value at index i is the weight
/// belonging to vertex i (the sub-area opposite it).
#[inline]
pub fn edge_weights(
    p: Point2<f32>,
    v0: Point2<f32>,
    v1: Point2<f32>,
    v2: Point2<f32>,
) -> (f32, f32, f32) {
    let w0 = edge_function(v2 - v1, p - v1);
    let w1 = edge_function(v0 - v2, p - v2);
    let w2 = edge_function(v1 - v0, p - v0);
    (w0, w1, w2)
}

/// Normalizes raw edge weights into barycentric coordinates summing to 1.
/// Returns `None` for a degenerate (near-zero area) triangle.
#[inline]
pub fn barycentric(w0: f32, w1: f32, w2: f32) -> Option<Vector3<f32>> {
    let total = w0 + w1 + w2;
    if total.abs() < EPSILON {
        return None;
    }
    let inv = 1.0 / total;
    Some(Vector3::new(w0 * inv, w1 * inv, w2 * inv))
}

/// Reciprocal-weighted depth used for the z-buffer test:
/// `1 / (l0/z0 + l1/z1 + l2/z2)`.
/// Returns `None` when any vertex depth is too close to zero.
#[inline]
pub fn screen_depth(bary: Vector3<f32>, z0: f32, z1: f32, z2: f32) -> Option<f32> {
    if z0.abs() < EPSILON || z1.abs() < EPSILON || z2.abs() < EPSILON {
        return None;
    }
    let sum = bary.x / z0 + bary.y / z1 + bary.z / z2;
    if sum.abs() < EPSILON {
        return None;
    }
    Some(1.0 / sum)
}

/// Barycentric weights corrected for perspective, plus the interpolated
/// camera-space depth of the fragment.
#[derive(Debug, Clone, Copy)]
pub struct CorrectedBarycentric {
    pub weights: Vector3<f32>,
    /// Perspective-correct camera-space depth; positive for visible fragments.
    pub view_depth: f32,
}

/// Computes perspective-correct barycentric weights from screen-space
/// barycentrics and the per-vertex camera-space depths (the retained
/// pre-divide w components):
///
/// ```text
/// view_depth = (w0*w1*w2) / (w1*w2*l0 + w0*w2*l1 + w0*w1*l2)
/// weight_i   = (product of other two w) * l_i * view_depth / (w0*w1*w2)
/// ```
///
/// The corrected weights sum to 1. Returns `None` on numerical
/// degeneracy or when the interpolated depth is not positive.
pub fn perspective_barycentric(
    bary: Vector3<f32>,
    w0: f32,
    w1: f32,
    w2: f32,
) -> Option<CorrectedBarycentric> {
    let w_product = w0 * w1 * w2;

    let f0 = w1 * w2 * bary.x;
    let f1 = w0 * w2 * bary.y;
    let f2 = w0 * w1 * bary.z;

    let denom = f0 + f1 + f2;
    if denom.abs() < EPSILON || w_product.abs() < EPSILON {
        return None;
    }

    let view_depth = w_product / denom;
    if view_depth <= 0.0 {
        return None;
    }

    let inv = 1.0 / denom;
    Some(CorrectedBarycentric {
        weights: Vector3::new(f0 * inv, f1 * inv, f2 * inv),
        view_depth,
    })
}

/// Weighted combination of a per-vertex attribute with (corrected or
/// screen-space) barycentric weights.
#[inline(always)]
pub fn interpolate<T>(a0: T, a1: T, a2: T, weights: &Vector3<f32>) -> T
where
    T: Copy + Add<Output = T> + Mul<f32, Output = T>,
{
    a0 * weights.x + a1 * weights.y + a2 * weights.z
}
