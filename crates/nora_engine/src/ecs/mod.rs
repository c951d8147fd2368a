//! Entity-Component core
//!
//! A [`Scene`] owns [`Entity`]s; each entity owns a [`Transform`] and an
//! ordered list of [`Component`]s. Every tick the scene starts new components
//! once and then updates all started ones, in insertion order, handing each
//! hook a [`Context`] for reaching its owner and siblings.

pub mod component;
pub mod components;
pub mod context;
pub mod entity;
pub mod error;
pub mod scene;
pub mod scheduler;

#[cfg(test)]
mod tests;

pub use component::{Component, ComponentBox, ComponentId};
pub use components::{Transform, TransformAxes};
pub use context::Context;
pub use entity::{ComponentState, Entity, EntityId};
pub use error::{ComponentError, EcsError, LifecyclePhase};
pub use scene::{Scene, SceneStats};
pub use scheduler::TickReport;
