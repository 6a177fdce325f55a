use crate::core::geometry::{PrimitiveTopology, Vertex};
use crate::scene::mesh::Mesh;
use log::{info, warn};
use nalgebra::{Point3, Vector2, Vector3};
use std::path::Path;

/// Loads an OBJ file and returns a unified triangle-list Mesh.
///
/// Sub-meshes are merged into one vertex/index buffer. Tangents are
/// generated per triangle and averaged per vertex, since OBJ carries no
/// tangent data of its own.
pub fn load_obj(path: &str) -> Result<Mesh, String> {
    let path_obj = Path::new(path);
    if !path_obj.exists() {
        return Err(format!("File not found: {}", path));
    }

    info!("Loading OBJ file: {}", path);

    let load_options = tobj::LoadOptions {
        triangulate: true,
        single_index: true, // Unifies indices for Position/Normal/UV
        ..Default::default()
    };

    let (models, _materials) = tobj::load_obj(path_obj, &load_options)
        .map_err(|e| format!("Failed to load OBJ: {}", e))?;

    let mut vertices = Vec::new();
    let mut indices = Vec::new();
    let mut index_offset = 0;

    for model in models {
        let mesh = &model.mesh;
        let num_vertices = mesh.positions.len() / 3;

        let has_normals = !mesh.normals.is_empty();
        let has_texcoords = !mesh.texcoords.is_empty();

        if !has_normals {
            warn!(
                "Mesh '{}' is missing normals. Using default (0, 1, 0).",
                model.name
            );
        }
        if !has_texcoords {
            warn!(
                "Mesh '{}' is missing texture coordinates. Using (0, 0).",
                model.name
            );
        }

        for i in 0..num_vertices {
            let position = Point3::new(
                mesh.positions[i * 3],
                mesh.positions[i * 3 + 1],
                mesh.positions[i * 3 + 2],
            );

            let normal = if has_normals {
                Vector3::new(
                    mesh.normals[i * 3],
                    mesh.normals[i * 3 + 1],
                    mesh.normals[i * 3 + 2],
                )
            } else {
                Vector3::y()
            };

            let uv = if has_texcoords {
                Vector2::new(mesh.texcoords[i * 2], 1.0 - mesh.texcoords[i * 2 + 1])
            } else {
                Vector2::zeros()
            };

            vertices.push(Vertex::new(position, normal, uv));
        }

        // Offset merged indices past the vertices of previous sub-meshes.
        for index in &mesh.indices {
            indices.push(index + index_offset);
        }

        index_offset += num_vertices as u32;
    }

    generate_tangents(&mut vertices, &indices);

    info!(
        "OBJ loaded successfully. Total vertices: {}, Total indices: {}",
        vertices.len(),
        indices.len()
    );

    Ok(Mesh::new(vertices, indices, PrimitiveTopology::TriangleList))
}

/// Per-vertex tangents from the uv gradients of each triangle, averaged
/// over the faces sharing a vertex and then orthonormalized against the
/// vertex normal (Gram-Schmidt).
fn generate_tangents(vertices: &mut [Vertex], indices: &[u32]) {
    for triangle in indices.chunks_exact(3) {
        let (i0, i1, i2) = (
            triangle[0] as usize,
            triangle[1] as usize,
            triangle[2] as usize,
        );

        let edge1 = vertices[i1].position - vertices[i0].position;
        let edge2 = vertices[i2].position - vertices[i0].position;
        let duv1 = vertices[i1].uv - vertices[i0].uv;
        let duv2 = vertices[i2].uv - vertices[i0].uv;

        let determinant = duv1.x * duv2.y - duv2.x * duv1.y;
        if determinant.abs() < 1e-8 {
            continue; // Degenerate uv mapping contributes no tangent.
        }

        let r = 1.0 / determinant;
        let tangent = (edge1 * duv2.y - edge2 * duv1.y) * r;

        vertices[i0].tangent += tangent;
        vertices[i1].tangent += tangent;
        vertices[i2].tangent += tangent;
    }

    for vertex in vertices.iter_mut() {
        let projected = vertex.tangent - vertex.normal * vertex.normal.dot(&vertex.tangent);
        vertex.tangent = projected
            .try_normalize(1e-6)
            .unwrap_or_else(|| fallback_tangent(&vertex.normal));
    }
}

/// Any unit vector perpendicular to the normal, for vertices whose faces
/// all had degenerate uvs.
fn fallback_tangent(normal: &Vector3<f32>) -> Vector3<f32> {
    let axis = if normal.x.abs() < 0.9 {
        Vector3::x()
    } else {
        Vector3::y()
    };
    normal.cross(&axis).normalize()
}
