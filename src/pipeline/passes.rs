use crate::core::framebuffer::FrameBuffer;
use crate::core::geometry::VertexOut;
use crate::core::math::transform::clip_to_screen_norm;
use crate::core::rasterizer::TriangleRasterizer;
use crate::pipeline::renderer::RenderOptions;
use crate::scene::camera::Camera;
use crate::scene::light::DirectionalLight;
use crate::scene::material::Material;
use crate::scene::mesh::Mesh;
use nalgebra::Vector3;
use rayon::prelude::*;

/// Projects every vertex of the mesh into screen-normalized space and
/// refills `mesh.vertices_out`.
///
/// Normals and tangents are carried to world space through the rotational
/// part of the world matrix (it contains no scale here), and the view
/// direction is taken from the camera origin to the world position.
pub fn transform_pass(mesh: &mut Mesh, camera: &Camera) {
    let world = mesh.world;
    let overall = camera.projection_matrix * camera.view_matrix * world;
    let normal_matrix = world.fixed_view::<3, 3>(0, 0).into_owned();
    let origin = camera.origin;

    let transformed: Vec<VertexOut> = mesh
        .vertices
        .par_iter()
        .map(|vertex| {
            let clip = overall * vertex.position.to_homogeneous();
            let world_position = world.transform_point(&vertex.position);

            VertexOut {
                position: clip_to_screen_norm(clip),
                color: vertex.color,
                uv: vertex.uv,
                normal: (normal_matrix * vertex.normal).normalize(),
                tangent: (normal_matrix * vertex.tangent)
                    .try_normalize(f32::EPSILON)
                    .unwrap_or_else(Vector3::zeros),
                view_dir: (world_position - origin).normalize(),
            }
        })
        .collect();

    mesh.vertices_out = transformed;
}

/// Rasterizes every triangle of the mesh into the framebuffer, one rayon
/// task per triangle. Degenerate strip triangles are skipped here.
pub fn raster_pass(
    mesh: &Mesh,
    framebuffer: &FrameBuffer,
    material: &Material,
    light: &DirectionalLight,
    options: &RenderOptions,
) {
    let rasterizer = TriangleRasterizer {
        framebuffer,
        material,
        light,
        options,
    };
    let vertices = &mesh.vertices_out;

    (0..mesh.triangle_count()).into_par_iter().for_each(|i| {
        if let Some((i0, i1, i2)) = mesh.triangle(i) {
            rasterizer.draw(
                &vertices[i0 as usize],
                &vertices[i1 as usize],
                &vertices[i2 as usize],
            );
        }
    });
}

/// Packs the framebuffer into 0RGB u32 pixels for presentation, one rayon
/// task per row.
pub fn present_pass(framebuffer: &FrameBuffer, out: &mut [u32]) {
    out.par_chunks_mut(framebuffer.width)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, pixel) in row.iter_mut().enumerate() {
                if let Some(color) = framebuffer.get_pixel(x, y) {
                    *pixel = pack_color(&color);
                }
            }
        });
}

#[inline]
fn pack_color(color: &Vector3<f32>) -> u32 {
    let r = (color.x.clamp(0.0, 1.0) * 255.0) as u32;
    let g = (color.y.clamp(0.0, 1.0) * 255.0) as u32;
    let b = (color.z.clamp(0.0, 1.0) * 255.0) as u32;
    (r << 16) | (g << 8) | b
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::mesh::create_test_triangle;
    use nalgebra::Point3;

    #[test]
    fn transform_pass_lands_the_test_triangle_on_screen() {
        let mut mesh = create_test_triangle();
        let camera = Camera::new(Point3::new(0.0, 0.0, -10.0), 45.0, 640, 480);
        transform_pass(&mut mesh, &camera);

        assert_eq!(mesh.vertices_out.len(), 3);
        for v in &mesh.vertices_out {
            assert!(v.position.w > 0.0);
            assert!((0.0..=1.0).contains(&v.position.x));
            assert!((0.0..=1.0).contains(&v.position.y));
        }
        // The apex is above the center, which is *smaller* y on screen.
        assert!(mesh.vertices_out[0].position.y < mesh.vertices_out[1].position.y);
    }

    #[test]
    fn transform_pass_normalizes_directions() {
        let mut mesh = create_test_triangle();
        mesh.rotate_y(1.2);
        let camera = Camera::new(Point3::new(0.0, 0.0, -10.0), 45.0, 640, 480);
        transform_pass(&mut mesh, &camera);

        for v in &mesh.vertices_out {
            assert!((v.normal.norm() - 1.0).abs() < 1e-5);
            assert!((v.view_dir.norm() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn pack_color_clamps_and_orders_channels() {
        assert_eq!(pack_color(&Vector3::new(1.0, 0.0, 0.0)), 0x00FF_0000);
        assert_eq!(pack_color(&Vector3::new(0.0, 1.0, 0.0)), 0x0000_FF00);
        assert_eq!(pack_color(&Vector3::new(0.0, 0.0, 2.5)), 0x0000_00FF);
        assert_eq!(pack_color(&Vector3::new(-1.0, 0.0, 0.0)), 0);
    }
}
