use nalgebra::{Matrix4, Point3, Vector3, Vector4};

//=================================
// Transform Matrix Factory
//=================================

/// Factory for the transformation matrices of the pipeline.
/// The coordinate system is left-handed: the camera looks down +Z and
/// projected depth lands in [0, 1] (Direct3D convention).
pub struct TransformFactory;

#[rustfmt::skip]
impl TransformFactory {
    /// Creates a rotation matrix around the X-axis.
    pub fn rotation_x(angle_rad: f32) -> Matrix4<f32> {
        let c = angle_rad.cos();
        let s = angle_rad.sin();
        Matrix4::new(
            1.0, 0.0, 0.0, 0.0,
            0.0, c,  -s,   0.0,
            0.0, s,   c,   0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Creates a rotation matrix around the Y-axis.
    pub fn rotation_y(angle_rad: f32) -> Matrix4<f32> {
        let c = angle_rad.cos();
        let s = angle_rad.sin();
        Matrix4::new(
            c,   0.0, s,   0.0,
            0.0, 1.0, 0.0, 0.0,
           -s,   0.0, c,   0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Creates a rotation matrix around the Z-axis.
    pub fn rotation_z(angle_rad: f32) -> Matrix4<f32> {
        let c = angle_rad.cos();
        let s = angle_rad.sin();
        Matrix4::new(
            c,  -s,   0.0, 0.0,
            s,   c,   0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Creates a translation matrix.
    pub fn translation(translation: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new(
            1.0, 0.0, 0.0, translation.x,
            0.0, 1.0, 0.0, translation.y,
            0.0, 0.0, 1.0, translation.z,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Combined yaw (Y) then pitch (X) rotation, used to orient the camera
    /// forward vector from its accumulated angles.
    pub fn rotation_yaw_pitch(yaw_rad: f32, pitch_rad: f32) -> Matrix4<f32> {
        Self::rotation_y(yaw_rad) * Self::rotation_x(pitch_rad)
    }

    /// Creates a View matrix (Look-At, Left-Handed).
    /// Transforms world space coordinates to camera/view space, where the
    /// camera sits at the origin looking down +Z.
    pub fn look_at_lh(
        origin: &Point3<f32>,
        forward: &Vector3<f32>,
        up: &Vector3<f32>,
    ) -> Matrix4<f32> {
        let z_axis = forward.normalize();
        let x_axis = up.cross(&z_axis).normalize();
        let y_axis = z_axis.cross(&x_axis);

        let o = origin.coords;
        Matrix4::new(
            x_axis.x, x_axis.y, x_axis.z, -x_axis.dot(&o),
            y_axis.x, y_axis.y, y_axis.z, -y_axis.dot(&o),
            z_axis.x, z_axis.y, z_axis.z, -z_axis.dot(&o),
            0.0,      0.0,      0.0,      1.0,
        )
    }

    /// Creates a Perspective Projection matrix (Left-Handed).
    /// `fov_scale` is tan(fov / 2). View-space depth [near, far] maps to
    /// [0, 1] and the clip-space w component equals the view-space depth.
    pub fn perspective_fov_lh(
        fov_scale: f32,
        aspect_ratio: f32,
        near: f32,
        far: f32,
    ) -> Matrix4<f32> {
        let zf = far / (far - near);

        Matrix4::new(
            1.0 / (aspect_ratio * fov_scale), 0.0,             0.0, 0.0,
            0.0,                              1.0 / fov_scale, 0.0, 0.0,
            0.0,                              0.0,             zf,  -near * zf,
            0.0,                              0.0,             1.0, 0.0,
        )
    }
}

//=================================
// Core Transformation Functions
//=================================

/// Converts a clip-space position to the screen-normalized space stored in
/// `VertexOut`: x,y in [0, 1] (y flipped so it grows downward), z in
/// [0, 1], and w keeping the camera-space depth from before the divide.
///
/// A position with w <= 0 is behind the camera and is returned undivided;
/// its non-positive w is the invalid flag the rasterizer rejects on.
#[inline]
pub fn clip_to_screen_norm(clip: Vector4<f32>) -> Vector4<f32> {
    if clip.w <= f32::EPSILON {
        return clip;
    }
    let inv_w = 1.0 / clip.w;
    Vector4::new(
        (clip.x * inv_w) * 0.5 + 0.5,
        (1.0 - clip.y * inv_w) * 0.5,
        clip.z * inv_w,
        clip.w,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    const TOL: f32 = 1e-5;

    #[test]
    fn forward_point_at_unit_distance_projects_to_viewport_center() {
        // 90 degree fov, square viewport, near plane at 1.
        let fov_scale = (90.0_f32.to_radians() / 2.0).tan();
        let view = TransformFactory::look_at_lh(
            &Point3::origin(),
            &Vector3::z(),
            &Vector3::y(),
        );
        let proj = TransformFactory::perspective_fov_lh(fov_scale, 1.0, 1.0, 1000.0);

        let clip = proj * view * Point3::new(0.0, 0.0, 1.0).to_homogeneous();
        let screen = clip_to_screen_norm(clip);

        assert!((screen.x - 0.5).abs() < TOL);
        assert!((screen.y - 0.5).abs() < TOL);
        // On the near plane, so depth 0; w holds the camera-space depth.
        assert!(screen.z.abs() < TOL);
        assert!((screen.w - 1.0).abs() < TOL);
    }

    #[test]
    fn projected_depth_spans_zero_to_one() {
        let fov_scale = (45.0_f32.to_radians() / 2.0).tan();
        let proj = TransformFactory::perspective_fov_lh(fov_scale, 1.0, 1.0, 100.0);

        let near = clip_to_screen_norm(proj * Vector4::new(0.0, 0.0, 1.0, 1.0));
        let far = clip_to_screen_norm(proj * Vector4::new(0.0, 0.0, 100.0, 1.0));

        assert!(near.z.abs() < TOL);
        assert!((far.z - 1.0).abs() < TOL);
    }

    #[test]
    fn behind_camera_position_keeps_nonpositive_w() {
        let clip = Vector4::new(0.2, 0.1, -1.5, -1.5);
        let screen = clip_to_screen_norm(clip);
        assert!(screen.w <= 0.0);
        assert_eq!(screen, clip);
    }

    #[test]
    fn screen_y_grows_downward() {
        // NDC +y (up) must map below 0.5 => to the top of the screen (smaller y).
        let up = clip_to_screen_norm(Vector4::new(0.0, 0.5, 0.5, 1.0));
        let down = clip_to_screen_norm(Vector4::new(0.0, -0.5, 0.5, 1.0));
        assert!(up.y < 0.5);
        assert!(down.y > 0.5);
    }

    #[test]
    fn look_at_maps_forward_axis_to_view_z() {
        let origin = Point3::new(1.0, 2.0, 3.0);
        let forward = Vector3::new(0.0, 0.0, 1.0);
        let view = TransformFactory::look_at_lh(&origin, &forward, &Vector3::y());

        let p = view * Point3::new(1.0, 2.0, 7.0).to_homogeneous();
        assert!((p.x).abs() < TOL);
        assert!((p.y).abs() < TOL);
        assert!((p.z - 4.0).abs() < TOL);
    }
}
