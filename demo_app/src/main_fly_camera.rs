//! Fly camera demo
//!
//! A player entity carrying a camera and the contrib `PlayerController`
//! flies towards a cube. There is no window, so the app scripts the input a
//! player would give: hold W, sweep the mouse, scroll to zoom.

use nora_engine::contrib::PlayerController;
use nora_engine::foundation::logging;
use nora_engine::prelude::*;

const FRAMES: u64 = 180;

/// Logs the frame rate whenever its whole-number value changes
#[derive(Default)]
struct FpsDisplay {
    last_fps: u32,
}

impl Component for FpsDisplay {
    fn update(&mut self, ctx: &mut Context<'_>) -> Result<(), ComponentError> {
        let fps = ctx.time().fps.round() as u32;
        if fps != self.last_fps {
            log::info!("FPS: {fps}");
            self.last_fps = fps;
        }
        Ok(())
    }
}

/// Keeps the HUD text in sync with the player position
struct PositionReadout {
    player: EntityId,
}

impl Component for PositionReadout {
    fn update(&mut self, ctx: &mut Context<'_>) -> Result<(), ComponentError> {
        let position = ctx.scene().world_position(self.player)?;
        let text = format!("x {:.2}  y {:.2}  z {:.2}", position.x, position.y, position.z);
        ctx.require_component_mut::<Text>()?.set_text(text);
        Ok(())
    }
}

#[derive(Default)]
struct FlyCameraApp {
    player: Option<EntityId>,
}

impl FlyCameraApp {
    /// Input a player would produce on `frame`
    fn scripted_input(frame: u64) -> Vec<AppEvent> {
        let mut events = Vec::new();
        match frame {
            0 => events.push(AppEvent::KeyInput { key: KeyCode::W, pressed: true }),
            90 => events.push(AppEvent::KeyInput { key: KeyCode::W, pressed: false }),
            120 => events.push(AppEvent::MouseWheel { delta_x: 0.0, delta_y: 10.0 }),
            _ => {}
        }
        if (30..60).contains(&frame) {
            let x = 400.0 + (frame - 30) as f64 * 5.0;
            events.push(AppEvent::MouseMoved { x, y: 300.0 });
        }
        events
    }
}

impl Application for FlyCameraApp {
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
        engine.window.set_title("Fly Camera - Nora Engine Example");
        engine.window.background_color = Color::rgba(0.2, 0.3, 0.3, 1.0);

        let cube = engine.assets.add_mesh(MeshAsset::cube())?;
        let font = engine.assets.add_font("fonts/arial.ttf", 48)?;

        let player = engine.scene.add_entity(
            Entity::new("player")
                .with_transform(Transform::from_position(Vec3::new(0.0, 0.0, 3.0)))
                .with_component(FpsDisplay::default())
                .with_component(Camera::default())
                .with_component(PlayerController::default()),
        );
        engine.scene.add_entity(
            Entity::new("cube")
                .with_transform(Transform::identity().with_rotation(Vec3::new(0.0, 45.0, 0.0)))
                .with_component(MeshRenderer::new(cube).with_color(Color::rgb(0.8, 0.7, 0.5))),
        );
        engine.scene.add_entity(
            Entity::new("hud")
                .with_component(Text::new(font, "").at(10.0, 10.0))
                .with_component(PositionReadout { player }),
        );

        self.player = Some(player);
        Ok(())
    }

    fn update(&mut self, engine: &mut Engine, _delta_time: f32) -> Result<(), AppError> {
        // Events pushed here are applied before the next frame
        for event in Self::scripted_input(engine.frame_count()) {
            engine.push_event(event);
        }
        Ok(())
    }

    fn cleanup(&mut self, engine: &mut Engine) {
        let snapshot = engine.scene.render_snapshot();
        if let Some(camera) = &snapshot.camera {
            log::info!(
                "Camera at {:?}, fov {:.1} degrees, {} mesh(es), {} text item(s)",
                camera.position,
                camera.fov_degrees,
                snapshot.meshes.len(),
                snapshot.texts.len()
            );
        }
        if let Some(hud) = snapshot.texts.first() {
            log::info!("HUD: {}", hud.text);
        }

        let stats = engine.scene.stats();
        log::info!(
            "{} tick(s), {} entities, {} components, {} lifecycle failure(s)",
            stats.ticks,
            stats.entity_count,
            stats.component_count,
            stats.lifecycle_failures
        );
        if let Some(player) = self.player {
            if let Ok(position) = engine.scene.world_position(player) {
                log::info!("Player finished at {position:?}");
            }
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let config = EngineConfig::default()
        .with_title("Fly Camera")
        .with_fixed_frames(1.0 / 60.0, FRAMES);

    let mut app = FlyCameraApp::default();
    Engine::run(config, &mut app)?;
    Ok(())
}
