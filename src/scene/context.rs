use crate::scene::light::DirectionalLight;
use crate::scene::material::Material;
use crate::scene::mesh::Mesh;

/// Everything the renderer draws in one frame: the meshes, the material
/// they share and the single directional light.
pub struct Scene {
    pub meshes: Vec<Mesh>,
    pub material: Material,
    pub light: DirectionalLight,
}

impl Scene {
    pub fn new(meshes: Vec<Mesh>, material: Material, light: DirectionalLight) -> Self {
        Self {
            meshes,
            material,
            light,
        }
    }
}
