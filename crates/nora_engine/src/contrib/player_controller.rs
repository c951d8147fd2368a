//! First-person fly controller
//!
//! WASD moves the owning entity along the sibling [`Camera`]'s front and
//! right vectors; the mouse turns the camera and the scroll wheel zooms.
//! Speed and sensitivity come from the camera; the controller owns the
//! pitch and zoom limits.

use crate::ecs::components::camera::{CameraMovement, DEFAULT_ZOOM, MIN_ZOOM, PITCH_LIMIT};
use crate::ecs::components::Camera;
use crate::ecs::{Component, ComponentError, Context};
use crate::foundation::math::Vec3;
use crate::input::KeyCode;

const MOVEMENT_KEYS: [(KeyCode, CameraMovement); 4] = [
    (KeyCode::W, CameraMovement::Forward),
    (KeyCode::S, CameraMovement::Backward),
    (KeyCode::A, CameraMovement::Left),
    (KeyCode::D, CameraMovement::Right),
];

/// Keyboard and mouse control for an entity carrying a [`Camera`]
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerController {
    /// Clamp pitch to `min_pitch..=max_pitch`
    pub constrain_pitch: bool,
    /// Lowest pitch in degrees
    pub min_pitch: f32,
    /// Highest pitch in degrees
    pub max_pitch: f32,
    /// Narrowest field of view in degrees
    pub min_zoom: f32,
    /// Widest field of view in degrees
    pub max_zoom: f32,

    last_x: f64,
    last_y: f64,
    first_mouse: bool,
}

impl Default for PlayerController {
    fn default() -> Self {
        Self {
            constrain_pitch: true,
            min_pitch: -PITCH_LIMIT,
            max_pitch: PITCH_LIMIT,
            min_zoom: MIN_ZOOM,
            max_zoom: DEFAULT_ZOOM,
            last_x: 0.0,
            last_y: 0.0,
            first_mouse: true,
        }
    }
}

impl PlayerController {
    fn process_keyboard(&self, ctx: &mut Context<'_>) -> Result<(), ComponentError> {
        let delta_time = ctx.delta_time();
        let camera = ctx.require_component::<Camera>()?;
        let input = ctx.input();

        let offset = MOVEMENT_KEYS
            .iter()
            .filter(|(key, _)| input.is_key_pressed(*key))
            .fold(Vec3::zeros(), |offset, (_, direction)| {
                offset + camera.movement_offset(*direction, delta_time)
            });

        if offset != Vec3::zeros() {
            ctx.transform_mut()?.translate(offset);
        }
        Ok(())
    }

    fn process_mouse_movement(&mut self, ctx: &mut Context<'_>) -> Result<(), ComponentError> {
        let (x, y) = ctx.input().mouse_position();
        if self.first_mouse {
            self.last_x = x;
            self.last_y = y;
            self.first_mouse = false;
        }

        let x_offset = (x - self.last_x) as f32;
        // Window y grows downwards
        let y_offset = (self.last_y - y) as f32;
        self.last_x = x;
        self.last_y = y;

        if x_offset == 0.0 && y_offset == 0.0 {
            return Ok(());
        }

        let pitch_limits = self.constrain_pitch.then(|| self.min_pitch..=self.max_pitch);
        ctx.require_component_mut::<Camera>()?
            .process_mouse_movement(x_offset, y_offset, pitch_limits);
        Ok(())
    }

    fn process_mouse_scroll(&self, ctx: &mut Context<'_>) -> Result<(), ComponentError> {
        let (_, scroll_y) = ctx.input().scroll_delta();
        if scroll_y == 0.0 {
            return Ok(());
        }

        ctx.require_component_mut::<Camera>()?
            .process_mouse_scroll(scroll_y as f32, self.min_zoom..=self.max_zoom);
        Ok(())
    }
}

impl Component for PlayerController {
    fn start(&mut self, ctx: &mut Context<'_>) -> Result<(), ComponentError> {
        ctx.require_component::<Camera>()?;
        self.first_mouse = true;
        Ok(())
    }

    fn update(&mut self, ctx: &mut Context<'_>) -> Result<(), ComponentError> {
        self.process_keyboard(ctx)?;
        self.process_mouse_movement(ctx)?;
        self.process_mouse_scroll(ctx)
    }

    fn name(&self) -> &'static str {
        "PlayerController"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::{EcsError, Entity, EntityId, Scene};
    use crate::input::InputState;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-4;

    fn player_scene() -> (Scene, EntityId) {
        let mut scene = Scene::new();
        let id = scene.add_entity(
            Entity::new("player")
                .with_component(Camera::default())
                .with_component(PlayerController::default()),
        );
        (scene, id)
    }

    fn camera(scene: &Scene, id: EntityId) -> &Camera {
        scene.entity(id).and_then(|entity| entity.get_component::<Camera>()).expect("camera")
    }

    #[test]
    fn test_wasd_moves_along_camera_axes() {
        let (mut scene, id) = player_scene();
        let mut input = InputState::new();

        input.press_key(KeyCode::W);
        scene.tick_with_input(0.5, &input);
        assert_relative_eq!(scene.world_position(id).expect("player"), Vec3::new(0.0, 0.0, -1.25), epsilon = EPSILON);

        input.release_key(KeyCode::W);
        input.press_key(KeyCode::D);
        scene.tick_with_input(1.0, &input);
        assert_relative_eq!(scene.world_position(id).expect("player"), Vec3::new(2.5, 0.0, -1.25), epsilon = EPSILON);
    }

    #[test]
    fn test_camera_settings_drive_speed_and_sensitivity() {
        let (mut scene, id) = player_scene();
        {
            let camera = scene
                .entity_mut(id)
                .and_then(|entity| entity.get_component_mut::<Camera>())
                .expect("camera");
            camera.movement_speed = 4.0;
            camera.mouse_sensitivity = 0.5;
        }
        let mut input = InputState::new();

        input.press_key(KeyCode::S);
        input.move_mouse(0.0, 0.0);
        scene.tick_with_input(0.5, &input);
        assert_relative_eq!(scene.world_position(id).expect("player"), Vec3::new(0.0, 0.0, 2.0), epsilon = EPSILON);

        input.end_frame();
        input.release_key(KeyCode::S);
        input.move_mouse(4.0, 0.0);
        scene.tick_with_input(0.5, &input);
        assert_relative_eq!(camera(&scene, id).yaw, -88.0, epsilon = EPSILON);
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let (mut scene, id) = player_scene();
        let mut input = InputState::new();
        input.press_key(KeyCode::A);
        input.press_key(KeyCode::D);

        scene.tick_with_input(1.0, &input);

        assert_relative_eq!(scene.world_position(id).expect("player"), Vec3::zeros(), epsilon = EPSILON);
    }

    #[test]
    fn test_mouse_turns_camera_after_first_sample() {
        let (mut scene, id) = player_scene();
        let mut input = InputState::new();

        input.move_mouse(100.0, 100.0);
        scene.tick_with_input(0.016, &input);
        assert_relative_eq!(camera(&scene, id).yaw, -90.0);

        input.end_frame();
        input.move_mouse(110.0, 90.0);
        scene.tick_with_input(0.016, &input);

        let camera = camera(&scene, id);
        assert_relative_eq!(camera.yaw, -89.0, epsilon = EPSILON);
        assert_relative_eq!(camera.pitch, 1.0, epsilon = EPSILON);
    }

    #[test]
    fn test_pitch_and_zoom_are_clamped() {
        let (mut scene, id) = player_scene();
        let mut input = InputState::new();
        input.move_mouse(0.0, 10_000.0);
        scene.tick_with_input(0.016, &input);

        input.end_frame();
        input.move_mouse(0.0, 0.0);
        input.scroll(0.0, 5.0);
        scene.tick_with_input(0.016, &input);
        assert_eq!(camera(&scene, id).pitch, 89.0);
        assert_relative_eq!(camera(&scene, id).zoom, 40.0);

        input.end_frame();
        input.scroll(0.0, 100.0);
        scene.tick_with_input(0.016, &input);
        assert_eq!(camera(&scene, id).zoom, 1.0);
    }

    #[test]
    fn test_start_requires_camera() {
        let mut scene = Scene::new();
        scene.add_entity(Entity::new("no camera").with_component(PlayerController::default()));

        let report = scene.tick(0.016);

        assert!(report.failures.iter().any(|failure| matches!(
            failure,
            EcsError::LifecycleCallFailure { source, .. }
                if matches!(**source, ComponentError::Ecs(EcsError::ComponentNotFound { .. }))
        )));
    }
}
