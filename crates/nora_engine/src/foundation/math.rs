//! Math utilities and types
//!
//! Thin aliases over nalgebra plus the handful of helpers the scene and the
//! built-in components need (Euler conversion, look-at, perspective).

pub use nalgebra::{
    Vector2, Vector3,
    Matrix3, Matrix4,
    Quaternion,
    Unit,
};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;
}

/// Math utility functions
pub mod utils {
    use super::*;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Clamp a value between min and max
    pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
        if value < min { min } else if value > max { max } else { value }
    }

    /// Linear interpolation
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }

    /// Rotation for Euler angles given in degrees, applied in Y * X * Z order.
    ///
    /// This is the convention scripts use for `local_rotation`: yaw around Y
    /// first, then pitch around X, then roll around Z.
    pub fn euler_degrees_to_quat(degrees: Vec3) -> Quat {
        let yaw = Quat::from_axis_angle(&Vec3::y_axis(), deg_to_rad(degrees.y));
        let pitch = Quat::from_axis_angle(&Vec3::x_axis(), deg_to_rad(degrees.x));
        let roll = Quat::from_axis_angle(&Vec3::z_axis(), deg_to_rad(degrees.z));
        yaw * pitch * roll
    }

    /// Translation column of an affine matrix
    pub fn translation_of(matrix: &Mat4) -> Vec3 {
        Vec3::new(matrix.m14, matrix.m24, matrix.m34)
    }

    /// Basis column `index` (0 = right, 1 = up, 2 = backward) of an affine matrix
    pub fn basis_of(matrix: &Mat4, index: usize) -> Vec3 {
        Vec3::new(matrix[(0, index)], matrix[(1, index)], matrix[(2, index)])
    }
}

/// Extension trait for Mat4 with additional convenience methods
pub trait Mat4Ext {
    /// Create a perspective projection matrix (OpenGL clip conventions)
    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4;

    /// Create a right-handed look-at view matrix
    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4;

    /// Rotation part of an affine matrix with its scale removed
    fn rotation_quat(&self) -> Quat;
}

impl Mat4Ext for Mat4 {
    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        Mat4::new_perspective(aspect, fov_y, near, far)
    }

    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
        Mat4::look_at_rh(&Point3::from(eye), &Point3::from(target), &up)
    }

    fn rotation_quat(&self) -> Quat {
        let right = utils::basis_of(self, 0);
        let up = utils::basis_of(self, 1);
        let back = utils::basis_of(self, 2);

        let (sx, sy, sz) = (right.magnitude(), up.magnitude(), back.magnitude());
        if sx <= f32::EPSILON || sy <= f32::EPSILON || sz <= f32::EPSILON {
            return Quat::identity();
        }

        let rotation = Mat3::from_columns(&[right / sx, up / sy, back / sz]);
        Quat::from_matrix(&rotation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::utils::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_euler_yaw_rotates_forward_towards_negative_x() {
        // 90 degrees of yaw turns -Z (forward) into -X in a right-handed Y-up frame
        let rotation = euler_degrees_to_quat(Vec3::new(0.0, 90.0, 0.0));
        let forward = rotation * Vec3::new(0.0, 0.0, -1.0);
        assert_relative_eq!(forward, Vec3::new(-1.0, 0.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_euler_order_is_yaw_then_pitch() {
        let euler = Vec3::new(30.0, 45.0, 0.0);
        let expected = Quat::from_axis_angle(&Vec3::y_axis(), deg_to_rad(45.0))
            * Quat::from_axis_angle(&Vec3::x_axis(), deg_to_rad(30.0));
        assert_relative_eq!(euler_degrees_to_quat(euler), expected, epsilon = 1e-6);
    }

    #[test]
    fn test_rotation_quat_ignores_scale() {
        let rotation = Quat::from_axis_angle(&Vec3::z_axis(), 0.4);
        let matrix = rotation.to_homogeneous() * Mat4::new_nonuniform_scaling(&Vec3::new(2.0, 3.0, 4.0));
        let extracted = matrix.rotation_quat();
        assert!(extracted.angle_to(&rotation) < 1e-4);
    }

    #[test]
    fn test_clamp_and_lerp() {
        assert_eq!(clamp(5.0, 0.0, 1.0), 1.0);
        assert_eq!(clamp(-5.0, 0.0, 1.0), 0.0);
        assert_relative_eq!(lerp(2.0, 4.0, 0.25), 2.5);
    }
}
