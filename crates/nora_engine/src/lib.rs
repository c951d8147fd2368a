//! # Nora Engine
//!
//! Entity-component scripting core: scenes of entities, components with
//! `start`/`update` lifecycle hooks, parent-relative transforms and a
//! headless frame driver.
//!
//! ## Features
//!
//! - **Scenes**: ordered entities, each with one transform and any number of components
//! - **Lifecycle dispatch**: `start` once, then `update` every frame, in insertion order
//! - **Transform hierarchy**: world matrices composed through parent links on demand
//! - **Failure isolation**: a failing component is logged and never stops the frame
//! - **Render snapshots**: camera, mesh and text data for an external renderer
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use nora_engine::prelude::*;
//!
//! struct Spin;
//!
//! impl Component for Spin {
//!     fn update(&mut self, ctx: &mut Context<'_>) -> Result<(), ComponentError> {
//!         let degrees = 90.0 * ctx.delta_time();
//!         ctx.transform_mut()?.rotate(Vec3::new(0.0, degrees, 0.0));
//!         Ok(())
//!     }
//! }
//!
//! struct MyApp;
//!
//! impl Application for MyApp {
//!     fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
//!         engine.scene.add_entity(Entity::new("spinner").with_component(Spin));
//!         Ok(())
//!     }
//!
//!     fn update(&mut self, _engine: &mut Engine, _delta_time: f32) -> Result<(), AppError> {
//!         Ok(())
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = EngineConfig::default().with_fixed_frames(1.0 / 60.0, 120);
//!     let mut app = MyApp;
//!     Engine::run(config, &mut app)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Core engine modules
pub mod config;
pub mod core;

pub mod foundation;
pub mod ecs;
pub mod assets;
pub mod render;
pub mod input;
pub mod window;
pub mod contrib;

mod application;
mod engine;

pub use application::{Application, AppError, AppEvent};
pub use engine::{Engine, EngineError};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        Application, AppError, AppEvent,
        Engine, EngineError,
        assets::{AssetRegistry, FontHandle, MeshAsset, MeshHandle, TextureHandle},
        core::config::{Config, EngineConfig, SceneConfig, WindowConfig},
        ecs::{
            Component, ComponentError, ComponentId, Context, EcsError, Entity, EntityId,
            Scene, TickReport, Transform, TransformAxes,
            components::{Camera, MeshRenderer, Text},
        },
        foundation::{
            math::{Mat4, Quat, Vec2, Vec3},
            time::FrameTime,
        },
        input::{InputState, KeyCode, MouseButton},
        render::{Color, RenderSnapshot},
        window::WindowState,
    };
}
