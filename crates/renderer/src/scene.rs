use std::f32::consts::PI;

use glam::{EulerRot, Mat4, Quat, Vec3};
use params::AuroraParams;

use crate::camera::Camera;

/// Where the aurora plane sits in the world.
pub const PLANE_POSITION: Vec3 = Vec3::new(0.0, -1.0, 0.0);

/// Resting orientation of the plane, leaning back and turned slightly to the side.
/// The rotation parameters are offsets from it, so all-zero rotations show this view.
pub const BASE_TILT: [f32; 3] = [PI / 3.5, PI / 8.0, 0.0];

/// Model matrix for the plane: `rotation` added to [`BASE_TILT`], applied as
/// Euler angles in XYZ order.
pub fn model_matrix(rotation: [f32; 3]) -> Mat4 {
    let [x, y, z] = [0, 1, 2].map(|axis| BASE_TILT[axis] + rotation[axis]);
    Mat4::from_rotation_translation(Quat::from_euler(EulerRot::XYZ, x, y, z), PLANE_POSITION)
}

/// Everything one draw call consumes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInputs {
    pub time: f32,
    pub view_projection: Mat4,
    pub model: Mat4,
    pub params: AuroraParams,
}

impl FrameInputs {
    pub fn new(time: f32, camera: &Camera, params: AuroraParams) -> Self {
        Self {
            time,
            view_projection: camera.view_projection(),
            model: model_matrix(params.rotation()),
            params,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;

    fn assert_close(actual: Vec3, expected: Vec3) {
        assert!(
            actual.abs_diff_eq(expected, 1e-5),
            "expected {expected:?}, got {actual:?}"
        );
    }

    fn euler_xyz(x: f32, y: f32, z: f32) -> Mat4 {
        Mat4::from_translation(PLANE_POSITION)
            * Mat4::from_rotation_x(x)
            * Mat4::from_rotation_y(y)
            * Mat4::from_rotation_z(z)
    }

    #[test]
    fn plane_is_lowered_by_one_unit() {
        let model = model_matrix([0.3, -1.1, 2.0]);
        assert_close(model.transform_point3(Vec3::ZERO), PLANE_POSITION);
    }

    #[test]
    fn default_rotation_shows_the_resting_tilt() {
        let expected = euler_xyz(PI / 3.5, PI / 8.0, 0.0);
        assert!(model_matrix([0.0; 3]).abs_diff_eq(expected, 1e-5));
        assert!(!model_matrix([0.0; 3]).abs_diff_eq(Mat4::from_translation(PLANE_POSITION), 1e-3));
    }

    #[test]
    fn rotations_offset_the_tilt_in_xyz_order() {
        let rotation = [0.3, -1.1, 2.0];
        let expected = euler_xyz(
            BASE_TILT[0] + rotation[0],
            BASE_TILT[1] + rotation[1],
            BASE_TILT[2] + rotation[2],
        );
        assert!(model_matrix(rotation).abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn cancelling_the_tilt_faces_the_camera() {
        let model = model_matrix([-BASE_TILT[0], -BASE_TILT[1], 0.0]);
        assert_close(model.transform_point3(Vec3::X), Vec3::new(1.0, -1.0, 0.0));

        let model = model_matrix([FRAC_PI_2 - BASE_TILT[0], -BASE_TILT[1], 0.0]);
        assert_close(model.transform_point3(Vec3::Y), Vec3::new(0.0, -1.0, 1.0));
    }
}
