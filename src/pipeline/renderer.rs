use crate::core::framebuffer::FrameBuffer;
use crate::core::rasterizer::Winding;
use crate::pipeline::passes::{present_pass, raster_pass, transform_pass};
use crate::pipeline::shading::{DisplayMode, ShadingMode};
use crate::scene::camera::Camera;
use crate::scene::context::Scene;
use nalgebra::Vector3;

/// Per-frame rendering switches.
///
/// Captured once at the start of a frame; the passes never observe a
/// mid-frame change.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub display_mode: DisplayMode,
    pub shading_mode: ShadingMode,
    pub winding: Winding,
    pub use_clipping: bool,
    pub use_normal_map: bool,
    pub clear_color: Vector3<f32>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            display_mode: DisplayMode::Shaded,
            shading_mode: ShadingMode::Combined,
            winding: Winding::CounterClockwise,
            use_clipping: false,
            use_normal_map: true,
            clear_color: Vector3::new(100.0 / 255.0, 100.0 / 255.0, 100.0 / 255.0),
        }
    }
}

/// Owns the framebuffer and runs the frame: clear, per-mesh vertex
/// transform, parallel rasterization.
pub struct Renderer {
    pub framebuffer: FrameBuffer,
}

impl Renderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            framebuffer: FrameBuffer::new(width, height),
        }
    }

    /// Renders one frame of the scene into the framebuffer.
    pub fn render(&mut self, scene: &mut Scene, camera: &Camera, options: &RenderOptions) {
        self.framebuffer.clear(options.clear_color);

        for mesh in &mut scene.meshes {
            transform_pass(mesh, camera);
        }
        for mesh in &scene.meshes {
            raster_pass(
                mesh,
                &self.framebuffer,
                &scene.material,
                &scene.light,
                options,
            );
        }
    }

    /// Packs the current framebuffer into a 0RGB u32 buffer.
    pub fn present(&self, out: &mut [u32]) {
        present_pass(&self.framebuffer, out);
    }
}
