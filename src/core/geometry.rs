use nalgebra::{Point3, Vector2, Vector3, Vector4};

/// How the index buffer is turned into triangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveTopology {
    /// Indices are taken in consecutive groups of 3.
    TriangleList,
    /// Indices are taken in a sliding window of 3; every odd triangle
    /// swaps its 2nd/3rd index to keep a consistent winding.
    TriangleStrip,
}

/// A single authored vertex in object space.
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub color: Vector3<f32>,
    /// Texture coordinates (UV).
    pub uv: Vector2<f32>,
    pub normal: Vector3<f32>,
    /// Tangent vector for normal mapping.
    pub tangent: Vector3<f32>,
}

impl Vertex {
    pub fn new(position: Point3<f32>, normal: Vector3<f32>, uv: Vector2<f32>) -> Self {
        Self {
            position,
            color: Vector3::new(1.0, 1.0, 1.0),
            uv,
            normal,
            tangent: Vector3::zeros(),
        }
    }
}

/// A transformed vertex, recomputed from [`Vertex`] every frame.
///
/// `position.x` and `position.y` are screen-normalized (0..1 maps to the
/// viewport), `position.z` is normalized depth in 0..1, and `position.w`
/// retains the camera-space depth from *before* the perspective divide so
/// that attribute interpolation can undo the foreshortening. A vertex
/// behind the camera keeps its non-positive w as the invalid marker.
#[derive(Debug, Clone, Copy)]
pub struct VertexOut {
    pub position: Vector4<f32>,
    pub color: Vector3<f32>,
    pub uv: Vector2<f32>,
    pub normal: Vector3<f32>,
    pub tangent: Vector3<f32>,
    /// Direction from the camera origin to the world-space position.
    pub view_dir: Vector3<f32>,
}

impl VertexOut {
    /// Linear interpolation of every carried attribute, used by clipping.
    pub fn lerp(a: &Self, b: &Self, t: f32) -> Self {
        Self {
            position: a.position + (b.position - a.position) * t,
            color: a.color + (b.color - a.color) * t,
            uv: a.uv + (b.uv - a.uv) * t,
            normal: a.normal + (b.normal - a.normal) * t,
            tangent: a.tangent + (b.tangent - a.tangent) * t,
            view_dir: a.view_dir + (b.view_dir - a.view_dir) * t,
        }
    }
}
