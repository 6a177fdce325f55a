use crate::core::clipper::{clip_triangle, fan_indices};
use crate::core::framebuffer::FrameBuffer;
use crate::core::geometry::VertexOut;
use crate::core::math::interpolation::{
    barycentric, edge_weights, interpolate, perspective_barycentric, screen_depth,
};
use crate::pipeline::renderer::RenderOptions;
use crate::pipeline::shading::{DisplayMode, Fragment, shade_fragment};
use crate::scene::light::DirectionalLight;
use crate::scene::material::Material;
use nalgebra::{Point2, Vector3};

/// Which screen-space winding is treated as front-facing.
///
/// Screen y grows downward, so with counter-clockwise front faces a
/// visible triangle has a positive z cross product of its edges; the
/// rasterizer reduces the clockwise convention to the same code path by
/// swapping two vertices on entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winding {
    CounterClockwise,
    Clockwise,
}

/// Rasterizes triangles of one mesh into a shared framebuffer.
///
/// Borrowed state is immutable for the duration of a frame, so one
/// instance can be shared by every rasterization worker.
pub struct TriangleRasterizer<'a> {
    pub framebuffer: &'a FrameBuffer,
    pub material: &'a Material,
    pub light: &'a DirectionalLight,
    pub options: &'a RenderOptions,
}

impl<'a> TriangleRasterizer<'a> {
    /// Draws one triangle through the full pipeline tail: behind-camera
    /// rejection, optional clipping (or the whole-triangle bounding
    /// reject), backface cull, edge-function traversal, depth test,
    /// perspective-correct interpolation and shading.
    ///
    /// Every rejection is final for this triangle; nothing is retried.
    pub fn draw(&self, v0: &VertexOut, v1: &VertexOut, v2: &VertexOut) {
        // Any vertex behind the camera invalidates the whole triangle;
        // partial handling happens only through clipping of in-front
        // geometry.
        if v0.position.w <= 0.0 || v1.position.w <= 0.0 || v2.position.w <= 0.0 {
            return;
        }

        if self.options.use_clipping {
            let polygon = clip_triangle(v0, v1, v2);
            for (a, b, c) in fan_indices(polygon.len()) {
                self.raster_convex(&polygon[a], &polygon[b], &polygon[c]);
            }
        } else {
            if outside_volume(v0, v1, v2) {
                return;
            }
            self.raster_convex(v0, v1, v2);
        }
    }

    /// Rasterizes a triangle whose vertices are all in front of the
    /// camera (and inside the volume when clipping is active).
    fn raster_convex(&self, v0: &VertexOut, v1: &VertexOut, v2: &VertexOut) {
        // Normalize the winding convention to counter-clockwise front.
        let (v1, v2) = match self.options.winding {
            Winding::CounterClockwise => (v1, v2),
            Winding::Clockwise => (v2, v1),
        };

        let width = self.framebuffer.width as f32;
        let height = self.framebuffer.height as f32;

        // Scale the screen-normalized x,y into pixel space.
        let p0 = Point2::new(v0.position.x * width, v0.position.y * height);
        let p1 = Point2::new(v1.position.x * width, v1.position.y * height);
        let p2 = Point2::new(v2.position.x * width, v2.position.y * height);

        // Backface cull via the z component of the screen-space cross
        // product; non-positive means the face points away.
        let e1 = p1 - p0;
        let e2 = p2 - p0;
        if e1.x * e2.y - e1.y * e2.x <= 0.0 {
            return;
        }

        // Integer bounding box, clamped to the buffer.
        let min_x = (p0.x.min(p1.x).min(p2.x).floor().max(0.0)) as usize;
        let max_x = (p0.x.max(p1.x).max(p2.x).ceil().min(width)) as usize;
        let min_y = (p0.y.min(p1.y).min(p2.y).floor().max(0.0)) as usize;
        let max_y = (p0.y.max(p1.y).max(p2.y).ceil().min(height)) as usize;

        let (z0, z1, z2) = (v0.position.z, v1.position.z, v2.position.z);
        let (w0, w1, w2) = (v0.position.w, v1.position.w, v2.position.w);

        for py in min_y..max_y {
            for px in min_x..max_x {
                let pixel_center = Point2::new(px as f32 + 0.5, py as f32 + 0.5);

                let (e0w, e1w, e2w) = edge_weights(pixel_center, p0, p1, p2);
                if e0w < 0.0 || e1w < 0.0 || e2w < 0.0 {
                    continue;
                }
                let Some(bary) = barycentric(e0w, e1w, e2w) else {
                    continue;
                };

                // Reciprocal-weighted depth, shared by the z test and the
                // depth visualization.
                let Some(depth) = screen_depth(bary, z0, z1, z2) else {
                    continue;
                };
                if !(0.0..=1.0).contains(&depth) {
                    continue;
                }

                if !self.framebuffer.depth_test_and_update(px, py, depth) {
                    continue;
                }

                let Some(corrected) = perspective_barycentric(bary, w0, w1, w2) else {
                    continue;
                };
                let weights = &corrected.weights;

                let fragment = Fragment {
                    uv: interpolate(v0.uv, v1.uv, v2.uv, weights),
                    normal: interpolate(v0.normal, v1.normal, v2.normal, weights).normalize(),
                    tangent: interpolate(v0.tangent, v1.tangent, v2.tangent, weights)
                        .normalize(),
                    view_dir: interpolate(v0.view_dir, v1.view_dir, v2.view_dir, weights)
                        .normalize(),
                    color: interpolate(v0.color, v1.color, v2.color, weights),
                };

                let color = match self.options.display_mode {
                    DisplayMode::Shaded => shade_fragment(
                        &fragment,
                        self.material,
                        self.light,
                        self.options.shading_mode,
                        self.options.use_normal_map,
                    ),
                    DisplayMode::Depth => {
                        let value = remap(depth, 0.8, 1.0).clamp(0.0, 1.0);
                        Vector3::new(value, value, value)
                    }
                    DisplayMode::Unlit => {
                        self.material.diffuse.sample(fragment.uv.x, fragment.uv.y)
                    }
                    DisplayMode::VertexColor => fragment.color,
                };

                // Additive lighting terms can exceed 1; clamp before packing.
                self.framebuffer.set_pixel(
                    px,
                    py,
                    Vector3::new(
                        color.x.clamp(0.0, 1.0),
                        color.y.clamp(0.0, 1.0),
                        color.z.clamp(0.0, 1.0),
                    ),
                    depth,
                );
            }
        }
    }
}

/// Whole-triangle bounding reject used when clipping is disabled: the
/// triangle is discarded only when all three vertices fall outside the
/// normalized volume on the same side.
fn outside_volume(v0: &VertexOut, v1: &VertexOut, v2: &VertexOut) -> bool {
    let all = |f: &dyn Fn(&VertexOut) -> bool| f(v0) && f(v1) && f(v2);

    all(&|v| v.position.x < 0.0)
        || all(&|v| v.position.x > 1.0)
        || all(&|v| v.position.y < 0.0)
        || all(&|v| v.position.y > 1.0)
        || all(&|v| v.position.z < 0.0)
        || all(&|v| v.position.z > 1.0)
}

/// Linear remap of `value` from [start, stop] to [0, 1].
#[inline]
fn remap(value: f32, start: f32, stop: f32) -> f32 {
    (value - start) / (stop - start)
}
