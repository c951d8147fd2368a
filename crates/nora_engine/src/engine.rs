//! Core engine implementation
//!
//! [`Engine`] is a headless frame driver: it owns the scene, input and window
//! state, measures (or fixes) frame time, and runs an [`Application`]
//! through its lifecycle. A windowing backend feeds it events with
//! [`Engine::push_event`].

use std::collections::VecDeque;

use crate::{
    application::{AppEvent, Application},
    assets::AssetRegistry,
    core::config::{ConfigError, EngineConfig},
    ecs::{Scene, TickReport},
    foundation::time::Timer,
    input::InputState,
    window::WindowState,
};
use thiserror::Error;

/// Main engine struct
///
/// The engine coordinates all subsystems and manages the main loop.
pub struct Engine {
    /// Scene containing all entities and their components
    pub scene: Scene,

    /// Mesh, texture and font descriptors
    pub assets: AssetRegistry,

    /// Window title, size and clear colour
    pub window: WindowState,

    /// Input state handed to components
    input: InputState,

    /// Events waiting for the next frame
    events: VecDeque<AppEvent>,

    /// Frame timing
    timer: Timer,

    /// Engine configuration
    config: EngineConfig,

    /// Whether the engine should continue running
    running: bool,

    /// Frames completed
    frames: u64,
}

impl Engine {
    /// Create a new engine instance
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        log::info!("Initializing engine '{}'...", config.window.title);

        if let Some(delta) = config.run.fixed_delta_time {
            if !delta.is_finite() || delta < 0.0 {
                return Err(EngineError::InvalidConfig(format!(
                    "fixed_delta_time must be a non-negative number, got {delta}"
                )));
            }
        }

        Ok(Self {
            scene: Scene::with_config(config.scene.clone()),
            assets: AssetRegistry::new(),
            window: WindowState::from_config(&config.window),
            input: InputState::new(),
            events: VecDeque::new(),
            timer: Timer::new(),
            config,
            running: true,
            frames: 0,
        })
    }

    /// Run the engine main loop with the given application
    pub fn run<T: Application>(config: EngineConfig, app: &mut T) -> Result<(), EngineError> {
        let mut engine = Self::new(config)?;
        engine.run_app(app)
    }

    /// Run `app` on this engine until it quits or the frame limit is reached
    pub fn run_app<T: Application>(&mut self, app: &mut T) -> Result<(), EngineError> {
        app.initialize(self)
            .map_err(|e| EngineError::ApplicationError(format!("App initialization: {e}")))?;

        self.scene.reset_clock();
        self.timer.reset_frame();
        self.running = true;
        log::info!("Starting main loop...");

        let result = self.main_loop(app);

        // Cleanup runs even when a frame failed
        app.cleanup(self);

        log::info!("Engine shutdown complete after {} frame(s)", self.frames);
        result
    }

    fn main_loop<T: Application>(&mut self, app: &mut T) -> Result<(), EngineError> {
        while self.running && !self.frame_limit_reached() {
            while let Some(event) = self.events.pop_front() {
                app.handle_event(self, event)
                    .map_err(|e| EngineError::ApplicationError(format!("App event: {e}")))?;
            }
            if !self.running {
                break;
            }

            let delta_time = self.next_delta_time();

            app.update(self, delta_time)
                .map_err(|e| EngineError::ApplicationError(format!("App update: {e}")))?;

            self.step(delta_time);
        }
        Ok(())
    }

    fn frame_limit_reached(&self) -> bool {
        self.config.run.max_frames.is_some_and(|max| self.frames >= max)
    }

    fn next_delta_time(&mut self) -> f32 {
        self.timer.update();
        self.config.run.fixed_delta_time.unwrap_or_else(|| self.timer.delta_time())
    }

    /// Tick the scene once with the current input, then clear per-frame input
    pub fn step(&mut self, delta_time: f32) -> TickReport {
        let report = self.scene.tick_with_input(delta_time, &self.input);
        self.input.end_frame();
        self.frames += 1;
        report
    }

    /// Queue an event for the next frame
    pub fn push_event(&mut self, event: AppEvent) {
        self.events.push_back(event);
    }

    /// Apply an event to input and window state
    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::WindowResized { width, height } => self.window.set_size(width, height),
            AppEvent::WindowCloseRequested => self.quit(),
            AppEvent::WindowFocused => self.window.set_focused(true),
            AppEvent::WindowUnfocused => self.window.set_focused(false),
            AppEvent::KeyInput { key, pressed: true } => self.input.press_key(key),
            AppEvent::KeyInput { key, pressed: false } => self.input.release_key(key),
            AppEvent::MouseButton { button, pressed: true } => self.input.press_button(button),
            AppEvent::MouseButton { button, pressed: false } => self.input.release_button(button),
            AppEvent::MouseMoved { x, y } => self.input.move_mouse(x, y),
            AppEvent::MouseWheel { delta_x, delta_y } => self.input.scroll(delta_x, delta_y),
        }
    }

    /// Request engine shutdown
    pub fn quit(&mut self) {
        log::info!("Engine shutdown requested");
        self.running = false;
    }

    /// Whether the main loop will run another frame
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Frames completed so far
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Get the input state
    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Get mutable access to the input state
    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    /// Engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

/// Engine-level errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Configuration values the engine cannot run with
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration file error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Application error
    #[error("Application error: {0}")]
    ApplicationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::AppError;
    use crate::ecs::{Component, ComponentError, Context, Entity};
    use crate::input::KeyCode;

    /// Counts how often it was updated and whether W was held
    #[derive(Default)]
    struct KeyWatcher {
        updates: u32,
        saw_w: u32,
    }

    impl Component for KeyWatcher {
        fn update(&mut self, ctx: &mut Context<'_>) -> Result<(), ComponentError> {
            self.updates += 1;
            if ctx.input().is_key_pressed(KeyCode::W) {
                self.saw_w += 1;
            }
            Ok(())
        }
    }

    #[derive(Default)]
    struct TestApp {
        initialized: bool,
        updates: u32,
        quit_after: Option<u32>,
        cleaned_up: bool,
        deltas: Vec<f32>,
    }

    impl Application for TestApp {
        fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
            self.initialized = true;
            engine.scene.add_entity(Entity::new("watcher").with_component(KeyWatcher::default()));
            engine.push_event(AppEvent::KeyInput { key: KeyCode::W, pressed: true });
            Ok(())
        }

        fn update(&mut self, engine: &mut Engine, delta_time: f32) -> Result<(), AppError> {
            self.updates += 1;
            self.deltas.push(delta_time);
            if self.quit_after == Some(self.updates) {
                engine.quit();
            }
            Ok(())
        }

        fn cleanup(&mut self, _engine: &mut Engine) {
            self.cleaned_up = true;
        }
    }

    fn watcher(engine: &Engine) -> (u32, u32) {
        let watcher = engine
            .scene
            .find_by_name("watcher")
            .and_then(|entity| entity.get_component::<KeyWatcher>())
            .expect("watcher");
        (watcher.updates, watcher.saw_w)
    }

    #[test]
    fn test_run_stops_at_frame_limit_with_fixed_delta() {
        let mut engine = Engine::new(EngineConfig::default().with_fixed_frames(0.02, 3)).expect("engine");
        let mut app = TestApp::default();

        engine.run_app(&mut app).expect("run");

        assert!(app.initialized && app.cleaned_up);
        assert_eq!(app.updates, 3);
        assert_eq!(app.deltas, vec![0.02; 3]);
        assert_eq!(engine.frame_count(), 3);
        assert_eq!(engine.scene.stats().ticks, 3);
        // W was pressed before the first frame and never released
        assert_eq!(watcher(&engine), (3, 3));
    }

    #[test]
    fn test_quit_ends_loop_after_current_frame() {
        let mut engine = Engine::new(EngineConfig::default().with_fixed_frames(0.01, 100)).expect("engine");
        let mut app = TestApp {
            quit_after: Some(2),
            ..TestApp::default()
        };

        engine.run_app(&mut app).expect("run");

        assert_eq!(app.updates, 2);
        assert_eq!(engine.frame_count(), 2);
        assert!(!engine.is_running());
    }

    #[test]
    fn test_close_event_stops_before_next_frame() {
        let mut engine = Engine::new(EngineConfig::default().with_fixed_frames(0.01, 10)).expect("engine");
        engine.push_event(AppEvent::WindowCloseRequested);
        let mut app = TestApp::default();

        engine.run_app(&mut app).expect("run");

        assert_eq!(app.updates, 0);
        assert!(app.cleaned_up);
    }

    #[test]
    fn test_events_update_input_and_window() {
        let mut engine = Engine::new(EngineConfig::default()).expect("engine");

        engine.handle_event(AppEvent::KeyInput { key: KeyCode::A, pressed: true });
        engine.handle_event(AppEvent::MouseMoved { x: 10.0, y: 10.0 });
        engine.handle_event(AppEvent::MouseMoved { x: 14.0, y: 7.0 });
        engine.handle_event(AppEvent::MouseWheel { delta_x: 0.0, delta_y: 2.0 });
        engine.handle_event(AppEvent::WindowResized { width: 1024, height: 768 });
        engine.handle_event(AppEvent::WindowUnfocused);

        assert!(engine.input().is_just_pressed(KeyCode::A));
        assert_eq!(engine.input().mouse_delta(), (4.0, -3.0));
        assert_eq!(engine.input().scroll_delta(), (0.0, 2.0));
        assert_eq!(engine.window.size(), (1024, 768));
        assert!(!engine.window.is_focused());

        engine.step(0.016);
        assert!(engine.input().is_key_pressed(KeyCode::A));
        assert!(!engine.input().is_just_pressed(KeyCode::A));
        assert_eq!(engine.input().mouse_delta(), (0.0, 0.0));
    }

    #[test]
    fn test_invalid_fixed_delta_is_rejected() {
        let mut config = EngineConfig::default();
        config.run.fixed_delta_time = Some(-0.5);

        assert!(matches!(Engine::new(config), Err(EngineError::InvalidConfig(_))));
    }
}
