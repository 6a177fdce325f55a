use crate::core::geometry::VertexOut;
use nalgebra::Vector4;

/// The six planes bounding the screen-normalized volume
/// (x in [0,1], y in [0,1], z in [0,1]).
///
/// A plane is stored as (nx, ny, nz, offset); a vertex is inside when
/// `dot(n, position.xyz) + offset >= 0`.
const CLIP_PLANES: [Vector4<f32>; 6] = [
    Vector4::new(1.0, 0.0, 0.0, 0.0),  // left:   x >= 0
    Vector4::new(-1.0, 0.0, 0.0, 1.0), // right:  x <= 1
    Vector4::new(0.0, 1.0, 0.0, 0.0),  // top:    y >= 0
    Vector4::new(0.0, -1.0, 0.0, 1.0), // bottom: y <= 1
    Vector4::new(0.0, 0.0, 1.0, 0.0),  // near:   z >= 0
    Vector4::new(0.0, 0.0, -1.0, 1.0), // far:    z <= 1
];

#[inline]
fn plane_value(position: &Vector4<f32>, plane: &Vector4<f32>) -> f32 {
    position.x * plane.x + position.y * plane.y + position.z * plane.z + plane.w
}

/// Clips a triangle against all six volume planes (Sutherland–Hodgman).
///
/// Returns the surviving convex polygon, or an empty vector when the
/// triangle is entirely outside. Both polygon buffers are swapped between
/// plane stages to avoid reallocating.
pub fn clip_triangle(v0: &VertexOut, v1: &VertexOut, v2: &VertexOut) -> Vec<VertexOut> {
    let mut polygon: Vec<VertexOut> = Vec::with_capacity(9);
    let mut scratch: Vec<VertexOut> = Vec::with_capacity(9);
    polygon.push(*v0);
    polygon.push(*v1);
    polygon.push(*v2);

    for plane in &CLIP_PLANES {
        clip_polygon_against_plane(&polygon, &mut scratch, plane);
        std::mem::swap(&mut polygon, &mut scratch);

        // Anything thinner than a triangle is discarded wholesale.
        if polygon.len() < 3 {
            polygon.clear();
            return polygon;
        }
    }

    polygon
}

/// Fan triangulation of a convex polygon: vertex 0 paired with every
/// consecutive pair of the remaining vertices. Yields index triples into
/// the polygon slice.
pub fn fan_indices(polygon_len: usize) -> impl Iterator<Item = (usize, usize, usize)> {
    (1..polygon_len.saturating_sub(1)).map(|i| (0, i, i + 1))
}

fn clip_polygon_against_plane(
    input: &[VertexOut],
    output: &mut Vec<VertexOut>,
    plane: &Vector4<f32>,
) {
    output.clear();
    if input.is_empty() {
        return;
    }

    for i in 0..input.len() {
        let current = &input[i];
        let next = &input[(i + 1) % input.len()];

        let current_value = plane_value(&current.position, plane);
        let next_value = plane_value(&next.position, plane);

        if current_value >= 0.0 {
            output.push(*current);
        }

        // Edge straddles the plane: insert the intersection vertex.
        if (current_value >= 0.0) != (next_value >= 0.0) {
            output.push(intersect_edge(current, next, current_value, next_value));
        }
    }
}

/// Intersection of an edge with a plane at `t = v0 / (v0 - v1)`, linearly
/// interpolating every carried attribute. A near-zero denominator
/// degenerates to the first endpoint.
fn intersect_edge(
    v0: &VertexOut,
    v1: &VertexOut,
    v0_value: f32,
    v1_value: f32,
) -> VertexOut {
    let denominator = v0_value - v1_value;
    if denominator.abs() < 1e-6 {
        return *v0;
    }

    let t = v0_value / denominator;
    if !(0.0..=1.0).contains(&t) {
        return *v0;
    }

    VertexOut::lerp(v0, v1, t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Vector2, Vector3};

    fn vertex(x: f32, y: f32, z: f32) -> VertexOut {
        VertexOut {
            position: Vector4::new(x, y, z, 1.0),
            color: Vector3::new(1.0, 1.0, 1.0),
            uv: Vector2::new(x, y),
            normal: Vector3::z(),
            tangent: Vector3::x(),
            view_dir: Vector3::z(),
        }
    }

    #[test]
    fn fully_inside_triangle_passes_through_unchanged() {
        let v0 = vertex(0.2, 0.2, 0.5);
        let v1 = vertex(0.8, 0.2, 0.5);
        let v2 = vertex(0.5, 0.8, 0.5);

        let polygon = clip_triangle(&v0, &v1, &v2);
        assert_eq!(polygon.len(), 3);
        assert_eq!(polygon[0].position, v0.position);
        assert_eq!(polygon[1].position, v1.position);
        assert_eq!(polygon[2].position, v2.position);
    }

    #[test]
    fn fully_outside_triangle_is_discarded() {
        let v0 = vertex(-2.0, 0.2, 0.5);
        let v1 = vertex(-1.5, 0.2, 0.5);
        let v2 = vertex(-1.8, 0.8, 0.5);

        assert!(clip_triangle(&v0, &v1, &v2).is_empty());
    }

    #[test]
    fn straddling_triangle_is_trimmed_to_the_volume() {
        // One vertex pokes out to the left; the result is a quad.
        let v0 = vertex(-0.4, 0.5, 0.5);
        let v1 = vertex(0.6, 0.2, 0.5);
        let v2 = vertex(0.6, 0.8, 0.5);

        let polygon = clip_triangle(&v0, &v1, &v2);
        assert_eq!(polygon.len(), 4);
        for v in &polygon {
            assert!(v.position.x >= -1e-5);
        }
        // Interpolated uvs must stay inside the edge's uv span.
        for v in &polygon {
            assert!(v.uv.x >= -0.4 - 1e-5 && v.uv.x <= 0.6 + 1e-5);
        }
    }

    #[test]
    fn fan_covers_the_polygon() {
        let fan: Vec<_> = fan_indices(5).collect();
        assert_eq!(fan, vec![(0, 1, 2), (0, 2, 3), (0, 3, 4)]);
        assert!(fan_indices(2).next().is_none());
    }
}
