//! Local transform of an entity
//!
//! Rotation is stored the way scripts write it: Euler angles in degrees,
//! applied yaw (Y), then pitch (X), then roll (Z). The parent link is a plain
//! [`EntityId`]; it is only resolved, and only changed, through the scene so
//! that cycle checks always see the whole hierarchy.

use crate::ecs::entity::EntityId;
use crate::foundation::math::{utils, Mat4, Quat, Vec3};

/// Position, rotation and scale relative to the parent entity
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Position relative to the parent
    pub local_position: Vec3,

    /// Euler angles in degrees relative to the parent
    pub local_rotation: Vec3,

    /// Scale relative to the parent
    pub local_scale: Vec3,

    parent: Option<EntityId>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            local_position: Vec3::zeros(),
            local_rotation: Vec3::zeros(),
            local_scale: Vec3::new(1.0, 1.0, 1.0),
            parent: None,
        }
    }
}

impl Transform {
    /// Create identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create from position only
    pub fn from_position(position: Vec3) -> Self {
        Self {
            local_position: position,
            ..Default::default()
        }
    }

    /// Builder pattern: Set rotation from Euler angles in degrees
    pub fn with_rotation(mut self, degrees: Vec3) -> Self {
        self.local_rotation = degrees;
        self
    }

    /// Builder pattern: Set scale (uniform)
    pub fn with_uniform_scale(mut self, scale: f32) -> Self {
        self.local_scale = Vec3::new(scale, scale, scale);
        self
    }

    /// Builder pattern: Set scale (non-uniform)
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.local_scale = scale;
        self
    }

    /// Parent entity, if any
    pub fn parent(&self) -> Option<EntityId> {
        self.parent
    }

    pub(crate) fn set_parent_unchecked(&mut self, parent: Option<EntityId>) {
        self.parent = parent;
    }

    /// Local rotation as a quaternion
    pub fn local_rotation_quat(&self) -> Quat {
        utils::euler_degrees_to_quat(self.local_rotation)
    }

    /// Translation * rotation * scale, relative to the parent
    pub fn local_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.local_position)
            * self.local_rotation_quat().to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.local_scale)
    }

    /// Move by `offset` in parent space
    pub fn translate(&mut self, offset: Vec3) {
        self.local_position += offset;
    }

    /// Add `degrees` to the Euler rotation
    pub fn rotate(&mut self, degrees: Vec3) {
        self.local_rotation += degrees;
    }
}

/// Direction helpers for a composed (world or local) matrix
pub trait TransformAxes {
    /// +X basis column
    fn right_axis(&self) -> Vec3;
    /// +Y basis column
    fn up_axis(&self) -> Vec3;
    /// +Z basis column
    fn backward_axis(&self) -> Vec3;
    /// -Z basis column
    fn forward_axis(&self) -> Vec3;
    /// Translation column
    fn origin(&self) -> Vec3;
    /// Length of each basis column
    fn axis_scale(&self) -> Vec3;
}

impl TransformAxes for Mat4 {
    fn right_axis(&self) -> Vec3 {
        utils::basis_of(self, 0)
    }

    fn up_axis(&self) -> Vec3 {
        utils::basis_of(self, 1)
    }

    fn backward_axis(&self) -> Vec3 {
        utils::basis_of(self, 2)
    }

    fn forward_axis(&self) -> Vec3 {
        -utils::basis_of(self, 2)
    }

    fn origin(&self) -> Vec3 {
        utils::translation_of(self)
    }

    fn axis_scale(&self) -> Vec3 {
        Vec3::new(self.right_axis().magnitude(), self.up_axis().magnitude(), self.backward_axis().magnitude())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crate::foundation::math::Point3;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_transform_identity() {
        let transform = Transform::identity();

        assert_eq!(transform.local_position, Vec3::zeros());
        assert_eq!(transform.local_rotation, Vec3::zeros());
        assert_eq!(transform.local_scale, Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(transform.parent(), None);
        assert_relative_eq!(transform.local_matrix(), Mat4::identity(), epsilon = EPSILON);
    }

    #[test]
    fn test_local_matrix_is_trs() {
        let transform = Transform::from_position(Vec3::new(1.0, 2.0, 3.0))
            .with_rotation(Vec3::new(0.0, 90.0, 0.0))
            .with_uniform_scale(2.0);
        let matrix = transform.local_matrix();

        // Local +X axis, scaled by 2, rotated 90 degrees about Y ends up on -Z
        let point = matrix.transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(point.coords, Vec3::new(1.0, 2.0, 1.0), epsilon = EPSILON);
    }

    #[test]
    fn test_axes_follow_rotation_and_scale() {
        let matrix = Transform::identity()
            .with_rotation(Vec3::new(0.0, 90.0, 0.0))
            .with_scale(Vec3::new(1.0, 2.0, 3.0))
            .local_matrix();

        assert_relative_eq!(matrix.forward_axis().normalize(), Vec3::new(-1.0, 0.0, 0.0), epsilon = EPSILON);
        assert_relative_eq!(matrix.right_axis().normalize(), Vec3::new(0.0, 0.0, -1.0), epsilon = EPSILON);
        assert_relative_eq!(matrix.axis_scale(), Vec3::new(1.0, 2.0, 3.0), epsilon = EPSILON);
    }

    #[test]
    fn test_translate_and_rotate_accumulate() {
        let mut transform = Transform::identity();
        transform.translate(Vec3::new(1.0, 0.0, 0.0));
        transform.translate(Vec3::new(0.0, 1.0, 0.0));
        transform.rotate(Vec3::new(0.0, 10.0, 0.0));
        transform.rotate(Vec3::new(0.0, 5.0, 0.0));

        assert_eq!(transform.local_position, Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(transform.local_rotation, Vec3::new(0.0, 15.0, 0.0));
    }
}
