use crate::core::rasterizer::Winding;
use crate::pipeline::shading::{DisplayMode, ShadingMode};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub scene: SceneConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub light: LightConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            render: RenderConfig::default(),
            camera: CameraConfig::default(),
            scene: SceneConfig::default(),
            pipeline: PipelineConfig::default(),
            light: LightConfig::default(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let content =
            fs::read_to_string(path).map_err(|e| format!("Failed to read config file: {}", e))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse TOML: {}", e))
    }
}

#[derive(Debug, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "default_width")]
    pub width: usize,
    #[serde(default = "default_height")]
    pub height: usize,
    #[serde(default = "default_background")]
    pub background: [f32; 3],
    #[serde(default = "default_output")]
    pub output: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            background: default_background(),
            output: default_output(),
        }
    }
}

fn default_width() -> usize {
    800
}
fn default_height() -> usize {
    600
}
fn default_background() -> [f32; 3] {
    let grey = 100.0 / 255.0;
    [grey, grey, grey]
}
fn default_output() -> String {
    "output.png".to_string()
}

#[derive(Debug, Deserialize)]
pub struct CameraConfig {
    #[serde(default = "default_origin")]
    pub origin: [f32; 3],
    #[serde(default = "default_fov")]
    pub fov: f32,
    #[serde(default = "default_move_speed")]
    pub move_speed: f32,
    #[serde(default = "default_look_sensitivity")]
    pub look_sensitivity: f32,
    #[serde(default = "default_near")]
    pub near: f32,
    #[serde(default = "default_far")]
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            origin: default_origin(),
            fov: default_fov(),
            move_speed: default_move_speed(),
            look_sensitivity: default_look_sensitivity(),
            near: default_near(),
            far: default_far(),
        }
    }
}

fn default_origin() -> [f32; 3] {
    [0.0, 5.0, -64.0]
}
fn default_fov() -> f32 {
    45.0
}
fn default_move_speed() -> f32 {
    20.0
}
fn default_look_sensitivity() -> f32 {
    0.004
}
fn default_near() -> f32 {
    1.0
}
fn default_far() -> f32 {
    1000.0
}

#[derive(Debug, Deserialize)]
pub struct SceneConfig {
    /// OBJ model path; empty means the built-in test triangle.
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_diffuse")]
    pub diffuse_texture: String,
    pub normal_texture: Option<String>,
    pub gloss_texture: Option<String>,
    pub specular_texture: Option<String>,
    #[serde(default)]
    pub position: [f32; 3],
    /// Radians per second of the idle spin; 0 disables it.
    #[serde(default = "default_rotation_speed")]
    pub rotation_speed: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            diffuse_texture: default_diffuse(),
            normal_texture: Some("assets/vehicle_normal.png".to_string()),
            gloss_texture: Some("assets/vehicle_gloss.png".to_string()),
            specular_texture: Some("assets/vehicle_specular.png".to_string()),
            position: [0.0, 0.0, 0.0],
            rotation_speed: default_rotation_speed(),
        }
    }
}

fn default_model() -> String {
    "assets/vehicle.obj".to_string()
}
fn default_diffuse() -> String {
    "assets/vehicle_diffuse.png".to_string()
}
fn default_rotation_speed() -> f32 {
    std::f32::consts::FRAC_PI_4
}

#[derive(Debug, Deserialize)]
pub struct PipelineConfig {
    #[serde(default = "default_display_mode")]
    pub display_mode: String, // "shaded", "depth", "unlit", "vertex_color"
    #[serde(default = "default_shading_mode")]
    pub shading_mode: String, // "combined", "observed_area", "diffuse", "specular"
    #[serde(default = "default_winding")]
    pub winding: String, // "ccw", "cw"
    #[serde(default = "default_true")]
    pub use_normal_map: bool,
    #[serde(default = "default_false")]
    pub use_clipping: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            display_mode: default_display_mode(),
            shading_mode: default_shading_mode(),
            winding: default_winding(),
            use_normal_map: true,
            use_clipping: false,
        }
    }
}

impl PipelineConfig {
    pub fn display_mode(&self) -> Result<DisplayMode, String> {
        match self.display_mode.as_str() {
            "shaded" => Ok(DisplayMode::Shaded),
            "depth" => Ok(DisplayMode::Depth),
            "unlit" => Ok(DisplayMode::Unlit),
            "vertex_color" => Ok(DisplayMode::VertexColor),
            other => Err(format!("Unknown display mode: {}", other)),
        }
    }

    pub fn shading_mode(&self) -> Result<ShadingMode, String> {
        match self.shading_mode.as_str() {
            "combined" => Ok(ShadingMode::Combined),
            "observed_area" => Ok(ShadingMode::ObservedArea),
            "diffuse" => Ok(ShadingMode::Diffuse),
            "specular" => Ok(ShadingMode::Specular),
            other => Err(format!("Unknown shading mode: {}", other)),
        }
    }

    pub fn winding(&self) -> Result<Winding, String> {
        match self.winding.as_str() {
            "ccw" => Ok(Winding::CounterClockwise),
            "cw" => Ok(Winding::Clockwise),
            other => Err(format!("Unknown winding: {}", other)),
        }
    }
}

fn default_display_mode() -> String {
    "shaded".to_string()
}
fn default_shading_mode() -> String {
    "combined".to_string()
}
fn default_winding() -> String {
    "ccw".to_string()
}
fn default_false() -> bool {
    false
}
fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct LightConfig {
    #[serde(default = "default_light_direction")]
    pub direction: [f32; 3],
    #[serde(default = "default_intensity")]
    pub intensity: f32,
    #[serde(default = "default_ambient")]
    pub ambient: [f32; 3],
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            direction: default_light_direction(),
            intensity: default_intensity(),
            ambient: default_ambient(),
        }
    }
}

fn default_light_direction() -> [f32; 3] {
    [0.577, -0.577, 0.577]
}
fn default_intensity() -> f32 {
    7.0
}
fn default_ambient() -> [f32; 3] {
    [0.025, 0.025, 0.025]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_the_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.render.width, 800);
        assert_eq!(config.render.height, 600);
        assert_eq!(config.camera.origin, [0.0, 5.0, -64.0]);
        assert_eq!(config.light.intensity, 7.0);
        assert!(config.pipeline.display_mode().is_ok());
    }

    #[test]
    fn partial_toml_overrides_only_named_fields() {
        let toml_str = r#"
            [render]
            width = 1280

            [pipeline]
            display_mode = "depth"
            winding = "cw"
        "#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.render.width, 1280);
        assert_eq!(config.render.height, 600);
        assert_eq!(config.pipeline.display_mode().unwrap(), DisplayMode::Depth);
        assert_eq!(config.pipeline.winding().unwrap(), Winding::Clockwise);
        assert_eq!(config.pipeline.shading_mode().unwrap(), ShadingMode::Combined);
    }

    #[test]
    fn unknown_mode_strings_are_rejected() {
        let config: Config = toml::from_str("[pipeline]\ndisplay_mode = \"wireframe\"").unwrap();
        assert!(config.pipeline.display_mode().is_err());
    }
}
