//! # Fly camera component
//!
//! Yaw/pitch camera whose eye is the owning entity's world position. The
//! orientation lives on the camera itself rather than on the transform, so
//! mouse-look never fights with scripted entity rotation.
//!
//! ## Coordinate System
//! Right-handed, Y-up. Yaw −90° with zero pitch looks down −Z.

use std::ops::RangeInclusive;

use crate::ecs::component::Component;
use crate::ecs::context::Context;
use crate::ecs::error::ComponentError;
use crate::foundation::math::{utils, Mat4, Mat4Ext, Vec3};

/// Default movement speed in units per second
pub const DEFAULT_SPEED: f32 = 2.5;
/// Default mouse sensitivity in degrees per pixel
pub const DEFAULT_SENSITIVITY: f32 = 0.1;
/// Default (and widest) field of view in degrees
pub const DEFAULT_ZOOM: f32 = 45.0;
/// Narrowest field of view in degrees
pub const MIN_ZOOM: f32 = 1.0;
/// Pitch limit used when pitch is constrained
pub const PITCH_LIMIT: f32 = 89.0;

/// Movement directions relative to where the camera looks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMovement {
    /// Along `front`
    Forward,
    /// Against `front`
    Backward,
    /// Against `right`
    Left,
    /// Along `right`
    Right,
}

/// Perspective camera driven by yaw and pitch
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Heading in degrees
    pub yaw: f32,
    /// Elevation in degrees
    pub pitch: f32,
    /// Vertical field of view in degrees
    pub zoom: f32,
    /// Up direction of the world
    pub world_up: Vec3,
    /// Units per second for [`movement_offset`](Self::movement_offset)
    pub movement_speed: f32,
    /// Degrees per pixel of mouse movement
    pub mouse_sensitivity: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,

    front: Vec3,
    right: Vec3,
    up: Vec3,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 1.0, 0.0), -90.0, 0.0)
    }
}

impl Camera {
    /// Create a camera with the given world up and orientation in degrees
    pub fn new(world_up: Vec3, yaw: f32, pitch: f32) -> Self {
        let mut camera = Self {
            yaw,
            pitch,
            zoom: DEFAULT_ZOOM,
            world_up,
            movement_speed: DEFAULT_SPEED,
            mouse_sensitivity: DEFAULT_SENSITIVITY,
            near: 0.1,
            far: 100.0,
            front: Vec3::new(0.0, 0.0, -1.0),
            right: Vec3::new(1.0, 0.0, 0.0),
            up: Vec3::new(0.0, 1.0, 0.0),
        };
        camera.update_vectors();
        camera
    }

    /// Direction the camera looks in
    pub fn front(&self) -> Vec3 {
        self.front
    }

    /// Camera right
    pub fn right(&self) -> Vec3 {
        self.right
    }

    /// Camera up
    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// Recompute `front`, `right` and `up` from yaw and pitch
    pub fn update_vectors(&mut self) {
        let yaw = utils::deg_to_rad(self.yaw);
        let pitch = utils::deg_to_rad(self.pitch);
        let front = Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos());

        self.front = front.normalize();
        self.right = self.front.cross(&self.world_up).normalize();
        self.up = self.right.cross(&self.front).normalize();
    }

    /// Offset to apply to the owner's position for one frame of movement
    pub fn movement_offset(&self, direction: CameraMovement, delta_time: f32) -> Vec3 {
        let velocity = self.movement_speed * delta_time;
        match direction {
            CameraMovement::Forward => self.front * velocity,
            CameraMovement::Backward => -self.front * velocity,
            CameraMovement::Left => -self.right * velocity,
            CameraMovement::Right => self.right * velocity,
        }
    }

    /// Turn by a mouse offset in pixels; `y_offset` is positive upwards.
    ///
    /// Pitch is clamped to `pitch_limits` when given.
    pub fn process_mouse_movement(&mut self, x_offset: f32, y_offset: f32, pitch_limits: Option<RangeInclusive<f32>>) {
        self.yaw += x_offset * self.mouse_sensitivity;
        self.pitch += y_offset * self.mouse_sensitivity;

        if let Some(limits) = pitch_limits {
            self.pitch = utils::clamp(self.pitch, *limits.start(), *limits.end());
        }
        self.update_vectors();
    }

    /// Zoom in by a scroll offset, keeping the field of view within `zoom_limits`
    pub fn process_mouse_scroll(&mut self, y_offset: f32, zoom_limits: RangeInclusive<f32>) {
        self.zoom = utils::clamp(self.zoom - y_offset, *zoom_limits.start(), *zoom_limits.end());
    }

    /// View matrix looking along `front` from `eye`
    pub fn view_matrix(&self, eye: Vec3) -> Mat4 {
        Mat4::look_at(eye, eye + self.front, self.up)
    }

    /// Perspective projection for the given aspect ratio
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective(utils::deg_to_rad(self.zoom), aspect, self.near, self.far)
    }
}

impl Component for Camera {
    fn update(&mut self, _ctx: &mut Context<'_>) -> Result<(), ComponentError> {
        // Scripts write yaw and pitch directly
        self.update_vectors();
        Ok(())
    }

    fn name(&self) -> &'static str {
        "Camera"
    }
}
