use nalgebra::Vector3;

/// The single directional light of the scene.
///
/// Intensity and ambient are global tuning parameters of the lighting
/// model rather than per-object state.
#[derive(Debug, Clone)]
pub struct DirectionalLight {
    /// Direction the light travels, normalized.
    pub direction: Vector3<f32>,
    pub intensity: f32,
    pub ambient: Vector3<f32>,
}

impl DirectionalLight {
    pub fn new(direction: Vector3<f32>, intensity: f32, ambient: Vector3<f32>) -> Self {
        Self {
            direction: direction.normalize(),
            intensity,
            ambient,
        }
    }
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            direction: Vector3::new(0.577, -0.577, 0.577),
            intensity: 7.0,
            ambient: Vector3::new(0.025, 0.025, 0.025),
        }
    }
}
