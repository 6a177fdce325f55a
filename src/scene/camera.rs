use crate::core::math::transform::TransformFactory;
use nalgebra::{Matrix4, Point3, Vector3};

/// Pitch is clamped just short of straight up/down so the forward vector
/// never becomes parallel to the world up axis.
const MAX_PITCH: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

/// Movement and look deltas gathered from whatever input frontend is
/// driving the camera. Decouples the camera from any windowing crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct CameraInput {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// Look delta in (yaw, pitch) screen pixels, if the user is dragging.
    pub look: Option<(f32, f32)>,
}

/// A free-flying perspective camera in the left-handed world.
///
/// The view and projection matrices are plain fields recomputed by
/// [`Camera::update`] every frame; readers never observe a stale matrix
/// as long as update runs before the render passes.
#[derive(Debug, Clone)]
pub struct Camera {
    pub origin: Point3<f32>,
    pub forward: Vector3<f32>,
    pub up: Vector3<f32>,
    pub right: Vector3<f32>,

    total_yaw: f32,
    total_pitch: f32,

    /// tan(fov / 2), precomputed from the configured field of view.
    fov_scale: f32,
    aspect_ratio: f32,
    pub near: f32,
    pub far: f32,

    pub move_speed: f32,
    pub look_sensitivity: f32,

    pub view_matrix: Matrix4<f32>,
    pub projection_matrix: Matrix4<f32>,
}

impl Camera {
    pub fn new(origin: Point3<f32>, fov_angle_deg: f32, width: usize, height: usize) -> Self {
        let mut camera = Self {
            origin,
            forward: Vector3::z(),
            up: Vector3::y(),
            right: Vector3::x(),
            total_yaw: 0.0,
            total_pitch: 0.0,
            fov_scale: (fov_angle_deg.to_radians() / 2.0).tan(),
            aspect_ratio: width as f32 / height as f32,
            near: 1.0,
            far: 1000.0,
            move_speed: 20.0,
            look_sensitivity: 0.004,
            view_matrix: Matrix4::identity(),
            projection_matrix: Matrix4::identity(),
        };
        camera.update(&CameraInput::default(), 0.0);
        camera
    }

    /// Applies one frame of input and recomputes the basis vectors and
    /// both matrices.
    pub fn update(&mut self, input: &CameraInput, delta_time: f32) {
        if let Some((yaw_delta, pitch_delta)) = input.look {
            self.total_yaw += yaw_delta * self.look_sensitivity;
            self.total_pitch =
                (self.total_pitch - pitch_delta * self.look_sensitivity).clamp(-MAX_PITCH, MAX_PITCH);
        }

        let rotation = TransformFactory::rotation_yaw_pitch(self.total_yaw, self.total_pitch);
        self.forward = rotation.transform_vector(&Vector3::z()).normalize();
        self.right = Vector3::y().cross(&self.forward).normalize();
        self.up = self.forward.cross(&self.right);

        let step = self.move_speed * delta_time;
        if input.forward {
            self.origin += self.forward * step;
        }
        if input.backward {
            self.origin -= self.forward * step;
        }
        if input.right {
            self.origin += self.right * step;
        }
        if input.left {
            self.origin -= self.right * step;
        }
        if input.up {
            self.origin += Vector3::y() * step;
        }
        if input.down {
            self.origin -= Vector3::y() * step;
        }

        self.view_matrix = TransformFactory::look_at_lh(&self.origin, &self.forward, &self.up);
        self.projection_matrix = TransformFactory::perspective_fov_lh(
            self.fov_scale,
            self.aspect_ratio,
            self.near,
            self.far,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f32 = 1e-5;

    #[test]
    fn basis_stays_orthonormal_after_looking_around() {
        let mut camera = Camera::new(Point3::new(0.0, 5.0, -64.0), 45.0, 800, 600);
        let input = CameraInput {
            look: Some((120.0, -45.0)),
            ..Default::default()
        };
        camera.update(&input, 0.016);

        assert!((camera.forward.norm() - 1.0).abs() < TOL);
        assert!((camera.right.norm() - 1.0).abs() < TOL);
        assert!(camera.forward.dot(&camera.right).abs() < TOL);
        assert!(camera.forward.dot(&camera.up).abs() < TOL);
    }

    #[test]
    fn pitch_is_clamped_short_of_vertical() {
        let mut camera = Camera::new(Point3::origin(), 45.0, 800, 600);
        let input = CameraInput {
            look: Some((0.0, -1e6)),
            ..Default::default()
        };
        camera.update(&input, 0.016);

        // Even after an absurd pitch delta the forward vector keeps a
        // horizontal component.
        assert!(camera.forward.xz().norm() > 0.005);
    }

    #[test]
    fn view_matrix_tracks_movement() {
        let mut camera = Camera::new(Point3::origin(), 45.0, 800, 600);
        let input = CameraInput {
            forward: true,
            ..Default::default()
        };
        camera.update(&input, 1.0);

        // A point ahead of the moved camera lands on the view z axis at
        // the reduced distance.
        let p = camera.view_matrix * Point3::new(0.0, 0.0, 100.0).to_homogeneous();
        assert!((p.z - (100.0 - camera.move_speed)).abs() < 1e-3);
    }

    #[test]
    fn projection_uses_the_configured_fov() {
        let camera = Camera::new(Point3::origin(), 90.0, 100, 100);
        // At 90 degrees fov a point at x = z sits exactly on the frustum
        // edge: clip x equals w.
        let clip = camera.projection_matrix * Point3::new(3.0, 0.0, 3.0).to_homogeneous();
        assert!((clip.x - clip.w).abs() < 1e-3);
    }
}
