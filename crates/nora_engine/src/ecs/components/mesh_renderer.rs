//! Mesh renderer component
//!
//! Pure data: which mesh to draw for the owning entity, with which texture
//! and tint. The renderer samples it through [`RenderSnapshot`](crate::render::RenderSnapshot).

use crate::assets::{MeshHandle, TextureHandle};
use crate::ecs::component::Component;
use crate::render::Color;

/// Draws a mesh at the owner's world transform
#[derive(Debug, Clone, PartialEq)]
pub struct MeshRenderer {
    /// Mesh to draw
    pub mesh: MeshHandle,
    /// Optional texture
    pub texture: Option<TextureHandle>,
    /// Tint multiplied with the texture
    pub color: Color,
    /// Hidden renderers are left out of snapshots
    pub visible: bool,
}

impl MeshRenderer {
    /// Untextured white mesh
    pub fn new(mesh: MeshHandle) -> Self {
        Self {
            mesh,
            texture: None,
            color: Color::WHITE,
            visible: true,
        }
    }

    /// Builder: set the texture
    pub fn with_texture(mut self, texture: TextureHandle) -> Self {
        self.texture = Some(texture);
        self
    }

    /// Builder: set the tint
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

impl Component for MeshRenderer {
    fn name(&self) -> &'static str {
        "MeshRenderer"
    }
}
