//! Built-in components
//!
//! [`Transform`] is not a component in the lifecycle sense: every entity owns
//! exactly one. The others are ordinary [`Component`](crate::ecs::Component)s.

pub mod camera;
pub mod mesh_renderer;
pub mod text;
pub mod transform;

pub use camera::{Camera, CameraMovement};
pub use mesh_renderer::MeshRenderer;
pub use text::Text;
pub use transform::{Transform, TransformAxes};
