use crate::core::geometry::{PrimitiveTopology, Vertex, VertexOut};
use crate::core::math::transform::TransformFactory;
use nalgebra::{Matrix4, Point3, Vector2, Vector3};

/// An indexed triangle mesh with its object-to-world transform.
///
/// `vertices_out` is scratch space refilled by the vertex transform pass
/// each frame; it is kept on the mesh so the allocation is reused.
#[derive(Debug)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub vertices_out: Vec<VertexOut>,
    pub indices: Vec<u32>,
    pub topology: PrimitiveTopology,
    pub world: Matrix4<f32>,

    yaw: f32,
    translation: Vector3<f32>,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>, topology: PrimitiveTopology) -> Self {
        Self {
            vertices,
            vertices_out: Vec::new(),
            indices,
            topology,
            world: Matrix4::identity(),
            yaw: 0.0,
            translation: Vector3::zeros(),
        }
    }

    pub fn translate(&mut self, translation: Vector3<f32>) {
        self.translation = translation;
        self.rebuild_world();
    }

    /// Spins the mesh around its own Y axis.
    pub fn rotate_y(&mut self, angle_rad: f32) {
        self.yaw += angle_rad;
        self.rebuild_world();
    }

    fn rebuild_world(&mut self) {
        self.world = TransformFactory::translation(&self.translation)
            * TransformFactory::rotation_y(self.yaw);
    }

    /// Number of triangles the index buffer produces under the current
    /// topology.
    pub fn triangle_count(&self) -> usize {
        match self.topology {
            PrimitiveTopology::TriangleList => self.indices.len() / 3,
            PrimitiveTopology::TriangleStrip => self.indices.len().saturating_sub(2),
        }
    }

    /// The index triple of triangle `i`.
    ///
    /// Strip triangles slide a window over the index buffer; every odd
    /// one swaps its 2nd/3rd index so all triangles keep the same
    /// winding. Returns `None` for a degenerate strip triangle (repeated
    /// index), which the rasterization pass skips.
    pub fn triangle(&self, i: usize) -> Option<(u32, u32, u32)> {
        let (i0, i1, i2) = match self.topology {
            PrimitiveTopology::TriangleList => {
                (self.indices[i * 3], self.indices[i * 3 + 1], self.indices[i * 3 + 2])
            }
            PrimitiveTopology::TriangleStrip => {
                let (a, b, c) = (self.indices[i], self.indices[i + 1], self.indices[i + 2]);
                if i % 2 == 0 { (a, b, c) } else { (a, c, b) }
            }
        };

        if i0 == i1 || i1 == i2 || i0 == i2 {
            return None;
        }
        Some((i0, i1, i2))
    }
}

/// A single hardcoded triangle in front of the origin, handy as a smoke
/// test scene when no model is configured.
pub fn create_test_triangle() -> Mesh {
    let vertices = vec![
        colored_vertex(0.0, 4.0, 2.0, Vector3::new(1.0, 0.0, 0.0)),
        colored_vertex(3.0, -2.0, 2.0, Vector3::new(0.0, 1.0, 0.0)),
        colored_vertex(-3.0, -2.0, 2.0, Vector3::new(0.0, 0.0, 1.0)),
    ];
    Mesh::new(vertices, vec![0, 1, 2], PrimitiveTopology::TriangleList)
}

fn colored_vertex(x: f32, y: f32, z: f32, color: Vector3<f32>) -> Vertex {
    let mut v = Vertex::new(
        Point3::new(x, y, z),
        Vector3::new(0.0, 0.0, -1.0),
        Vector2::new(0.5, 0.5),
    );
    v.color = color;
    v
}
