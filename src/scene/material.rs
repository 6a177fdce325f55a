use crate::scene::texture::Texture;
use nalgebra::Vector3;

/// The texture maps and constants of a shaded surface.
///
/// Only the diffuse map is mandatory; absent gloss/specular maps fall
/// back to a uniform exponent and white specular tint, an absent normal
/// map leaves the interpolated normal untouched.
#[derive(Debug, Clone)]
pub struct Material {
    pub diffuse: Texture,
    pub normal_map: Option<Texture>,
    pub gloss_map: Option<Texture>,
    pub specular_map: Option<Texture>,
    /// Maximum Phong exponent; the gloss map's red channel scales it per texel.
    pub shininess: f32,
}

impl Material {
    pub fn new(diffuse: Texture) -> Self {
        Self {
            diffuse,
            normal_map: None,
            gloss_map: None,
            specular_map: None,
            shininess: 25.0,
        }
    }

    /// A single-color material, used for fallbacks and tests.
    pub fn flat(color: Vector3<f32>) -> Self {
        Self::new(Texture::solid(color))
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::flat(Vector3::new(0.8, 0.8, 0.8))
    }
}
