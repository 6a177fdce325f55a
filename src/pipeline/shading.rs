use crate::scene::light::DirectionalLight;
use crate::scene::material::Material;
use nalgebra::{Vector2, Vector3};
use std::f32::consts::PI;

/// Which lighting terms contribute to a shaded fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadingMode {
    /// Raw cosine-lit grey (the observed area term alone).
    ObservedArea,
    /// Lambert diffuse scaled by the cosine term and light intensity.
    Diffuse,
    /// Phong specular term alone.
    Specular,
    /// Ambient + specular + diffuse.
    Combined,
}

impl ShadingMode {
    pub fn cycle(self) -> Self {
        match self {
            ShadingMode::Combined => ShadingMode::ObservedArea,
            ShadingMode::ObservedArea => ShadingMode::Diffuse,
            ShadingMode::Diffuse => ShadingMode::Specular,
            ShadingMode::Specular => ShadingMode::Combined,
        }
    }
}

/// What the rasterizer writes for a winning fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    /// Full pixel shading through the active [`ShadingMode`].
    Shaded,
    /// Depth buffer visualization, remapped from [0.8, 1] to [0, 1].
    Depth,
    /// Raw diffuse texture color, no lighting.
    Unlit,
    /// Interpolated vertex color, no texturing or lighting.
    VertexColor,
}

impl DisplayMode {
    pub fn cycle(self) -> Self {
        match self {
            DisplayMode::Shaded => DisplayMode::Depth,
            DisplayMode::Depth => DisplayMode::Unlit,
            DisplayMode::Unlit => DisplayMode::VertexColor,
            DisplayMode::VertexColor => DisplayMode::Shaded,
        }
    }
}

/// Interpolated per-fragment inputs to the shading stage. The unit-vector
/// attributes have already been renormalized after interpolation.
#[derive(Debug, Clone, Copy)]
pub struct Fragment {
    pub uv: Vector2<f32>,
    pub normal: Vector3<f32>,
    pub tangent: Vector3<f32>,
    pub view_dir: Vector3<f32>,
    pub color: Vector3<f32>,
}

/// Lambertian diffuse reflectance: `cd * kd / pi`.
#[inline]
pub fn lambert(cd: Vector3<f32>, kd: f32) -> Vector3<f32> {
    cd * (kd / PI)
}

/// Phong specular reflection for light direction `l` (surface to light is
/// `-l` already applied by the caller), view direction `v` and normal `n`.
#[inline]
pub fn phong(ks: Vector3<f32>, exponent: f32, l: &Vector3<f32>, v: &Vector3<f32>, n: &Vector3<f32>) -> Vector3<f32> {
    let reflect = l - n * (2.0 * n.dot(l).max(0.0));
    let cos_alpha = reflect.dot(v).max(0.0);
    ks * cos_alpha.powf(exponent)
}

/// Shades one fragment under the fixed directional light.
///
/// With normal mapping enabled and a map present, the interpolated normal
/// is perturbed through the tangent/bitangent/normal basis first. A
/// fragment facing away from the light contributes nothing in any mode,
/// including the ambient term of `Combined`.
pub fn shade_fragment(
    fragment: &Fragment,
    material: &Material,
    light: &DirectionalLight,
    mode: ShadingMode,
    use_normal_map: bool,
) -> Vector3<f32> {
    let mut normal = fragment.normal;

    if use_normal_map && let Some(map) = &material.normal_map {
        let binormal = normal.cross(&fragment.tangent);
        let sample = map.sample(fragment.uv.x, fragment.uv.y);
        // Channels are stored in [0,1]; remap to [-1,1] tangent space.
        normal = (fragment.tangent * (2.0 * sample.x - 1.0)
            + binormal * (2.0 * sample.y - 1.0)
            + normal * (2.0 * sample.z - 1.0))
            .normalize();
    }

    let cos_angle = normal.dot(&-light.direction);
    if cos_angle < 0.0 {
        return Vector3::zeros();
    }

    let observed_area = Vector3::new(cos_angle, cos_angle, cos_angle);

    match mode {
        ShadingMode::ObservedArea => observed_area,
        ShadingMode::Diffuse => {
            diffuse_term(fragment, material).component_mul(&observed_area) * light.intensity
        }
        ShadingMode::Specular => specular_term(fragment, material, light, &normal),
        ShadingMode::Combined => {
            light.ambient
                + specular_term(fragment, material, light, &normal)
                + diffuse_term(fragment, material).component_mul(&observed_area)
                    * light.intensity
        }
    }
}

fn diffuse_term(fragment: &Fragment, material: &Material) -> Vector3<f32> {
    lambert(material.diffuse.sample(fragment.uv.x, fragment.uv.y), 1.0)
}

fn specular_term(
    fragment: &Fragment,
    material: &Material,
    light: &DirectionalLight,
    normal: &Vector3<f32>,
) -> Vector3<f32> {
    let exponent = match &material.gloss_map {
        Some(map) => map.sample(fragment.uv.x, fragment.uv.y).x * material.shininess,
        None => material.shininess,
    };
    let ks = match &material.specular_map {
        Some(map) => map.sample(fragment.uv.x, fragment.uv.y),
        None => Vector3::new(1.0, 1.0, 1.0),
    };
    phong(ks, exponent, &-light.direction, &fragment.view_dir, normal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::texture::Texture;

    const TOL: f32 = 1e-2;

    fn lit_fragment() -> Fragment {
        Fragment {
            uv: Vector2::new(0.5, 0.5),
            normal: Vector3::new(0.0, 0.0, -1.0),
            tangent: Vector3::x(),
            view_dir: Vector3::z(),
            color: Vector3::new(1.0, 1.0, 1.0),
        }
    }

    fn head_on_light() -> DirectionalLight {
        DirectionalLight::new(Vector3::z(), 7.0, Vector3::new(0.025, 0.025, 0.025))
    }

    #[test]
    fn observed_area_is_the_cosine_as_grey() {
        let color = shade_fragment(
            &lit_fragment(),
            &Material::flat(Vector3::new(0.5, 0.5, 0.5)),
            &head_on_light(),
            ShadingMode::ObservedArea,
            false,
        );
        // Light hits the surface head on: cosine is 1.
        assert!((color - Vector3::new(1.0, 1.0, 1.0)).norm() < TOL);
    }

    #[test]
    fn backfacing_fragment_is_black_in_every_mode() {
        let mut fragment = lit_fragment();
        fragment.normal = Vector3::z(); // Facing away from the light.
        let light = head_on_light();
        let material = Material::flat(Vector3::new(1.0, 1.0, 1.0));

        for mode in [
            ShadingMode::ObservedArea,
            ShadingMode::Diffuse,
            ShadingMode::Specular,
            ShadingMode::Combined,
        ] {
            let color = shade_fragment(&fragment, &material, &light, mode, false);
            assert_eq!(color, Vector3::zeros());
        }
    }

    #[test]
    fn diffuse_mode_matches_lambert_times_cosine_and_intensity() {
        let fragment = lit_fragment();
        let light = head_on_light();
        let material = Material::flat(Vector3::new(0.6, 0.3, 0.9));

        let color = shade_fragment(&fragment, &material, &light, ShadingMode::Diffuse, false);
        let expected = lambert(Vector3::new(0.6, 0.3, 0.9), 1.0) * light.intensity;
        assert!((color - expected).norm() < TOL);
    }

    #[test]
    fn flat_normal_map_is_a_no_op() {
        let fragment = Fragment {
            normal: Vector3::new(0.3, -0.2, -0.9).normalize(),
            ..lit_fragment()
        };
        let light = DirectionalLight::default();

        let mut mapped = Material::flat(Vector3::new(0.7, 0.7, 0.7));
        mapped.normal_map = Some(Texture::solid(Vector3::new(0.5, 0.5, 1.0)));
        mapped.gloss_map = Some(Texture::solid(Vector3::new(0.4, 0.4, 0.4)));
        mapped.specular_map = Some(Texture::solid(Vector3::new(0.8, 0.8, 0.8)));
        let mut unmapped = mapped.clone();
        unmapped.normal_map = None;

        for mode in [
            ShadingMode::ObservedArea,
            ShadingMode::Diffuse,
            ShadingMode::Specular,
            ShadingMode::Combined,
        ] {
            let with_map = shade_fragment(&fragment, &mapped, &light, mode, true);
            let without = shade_fragment(&fragment, &unmapped, &light, mode, true);
            assert!(
                (with_map - without).norm() < TOL,
                "mode {mode:?}: {with_map:?} vs {without:?}"
            );
        }
    }

    #[test]
    fn combined_adds_ambient_on_top_of_diffuse_and_specular() {
        let fragment = lit_fragment();
        let light = head_on_light();
        let material = Material::flat(Vector3::new(0.5, 0.5, 0.5));

        let diffuse = shade_fragment(&fragment, &material, &light, ShadingMode::Diffuse, false);
        let specular = shade_fragment(&fragment, &material, &light, ShadingMode::Specular, false);
        let combined = shade_fragment(&fragment, &material, &light, ShadingMode::Combined, false);

        assert!((combined - (light.ambient + diffuse + specular)).norm() < TOL);
    }
}
