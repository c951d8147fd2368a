//! # Rendering interface
//!
//! The engine does not draw. It exposes colours for the window and
//! components, and a [`RenderSnapshot`] a renderer can sample between ticks.

pub mod color;
pub mod snapshot;

pub use color::Color;
pub use snapshot::{CameraSnapshot, InstanceData, MeshInstance, RenderSnapshot, TextItem};
