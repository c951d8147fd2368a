//! Read-only view of a scene for a renderer
//!
//! A [`RenderSnapshot`] is taken between ticks. It copies out everything a
//! renderer needs (camera, meshes with world matrices, text) so the renderer
//! never borrows the scene while drawing.

use bytemuck::{Pod, Zeroable};

use crate::assets::{FontHandle, MeshHandle, TextureHandle};
use crate::ecs::components::{Camera, MeshRenderer, Text, TransformAxes};
use crate::ecs::{EntityId, Scene};
use crate::foundation::math::{Mat4, Vec2, Vec3};
use crate::render::Color;

/// Per-instance data in the layout a vertex buffer expects
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct InstanceData {
    /// World matrix, column-major
    pub model: [[f32; 4]; 4],
    /// Tint colour
    pub color: [f32; 4],
}

impl InstanceData {
    /// Pack a world matrix and tint
    pub fn new(model: &Mat4, color: Color) -> Self {
        Self {
            model: (*model).into(),
            color: color.to_array(),
        }
    }
}

/// One mesh to draw
#[derive(Debug, Clone, PartialEq)]
pub struct MeshInstance {
    /// Entity the mesh belongs to
    pub entity: EntityId,
    /// Mesh to draw
    pub mesh: MeshHandle,
    /// Texture, if any
    pub texture: Option<TextureHandle>,
    /// GPU-ready instance data
    pub data: InstanceData,
}

/// Camera parameters at snapshot time
#[derive(Debug, Clone, PartialEq)]
pub struct CameraSnapshot {
    /// Entity carrying the camera
    pub entity: EntityId,
    /// Eye position in world space
    pub position: Vec3,
    /// World to view matrix
    pub view: Mat4,
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
}

impl CameraSnapshot {
    /// Projection for a viewport with the given aspect ratio
    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::new_perspective(aspect, self.fov_degrees.to_radians(), self.near, self.far)
    }
}

/// One string to draw
#[derive(Debug, Clone, PartialEq)]
pub struct TextItem {
    /// Entity the text belongs to
    pub entity: EntityId,
    /// String to draw
    pub text: String,
    /// Font to draw it with
    pub font: FontHandle,
    /// Colour
    pub color: Color,
    /// Screen position in pixels
    pub position: Vec2,
    /// Scale
    pub scale: f32,
}

/// Everything a renderer needs from one scene state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderSnapshot {
    /// First active camera, in entity order
    pub camera: Option<CameraSnapshot>,
    /// Visible meshes of active entities, in entity order
    pub meshes: Vec<MeshInstance>,
    /// Text of active entities, in entity order
    pub texts: Vec<TextItem>,
}

impl RenderSnapshot {
    /// Capture the current state of `scene`
    pub fn capture(scene: &Scene) -> Self {
        let mut snapshot = Self::default();

        for entity in scene.entities().filter(|entity| entity.is_active()) {
            let id = entity.id();
            let Ok(world) = scene.world_matrix(id) else {
                continue;
            };

            if snapshot.camera.is_none() {
                if let Some(camera) = entity.get_component::<Camera>() {
                    let position = world.origin();
                    snapshot.camera = Some(CameraSnapshot {
                        entity: id,
                        position,
                        view: camera.view_matrix(position),
                        fov_degrees: camera.zoom,
                        near: camera.near,
                        far: camera.far,
                    });
                }
            }

            snapshot.meshes.extend(
                entity
                    .get_components::<MeshRenderer>()
                    .filter(|renderer| renderer.visible)
                    .map(|renderer| MeshInstance {
                        entity: id,
                        mesh: renderer.mesh,
                        texture: renderer.texture,
                        data: InstanceData::new(&world, renderer.color),
                    }),
            );

            snapshot.texts.extend(entity.get_components::<Text>().map(|text| TextItem {
                entity: id,
                text: text.text.clone(),
                font: text.font,
                color: text.color,
                position: text.position,
                scale: text.scale,
            }));
        }

        snapshot
    }

    /// Instance data of every mesh, ready for upload
    pub fn instance_data(&self) -> Vec<InstanceData> {
        self.meshes.iter().map(|instance| instance.data).collect()
    }

    /// Instance data as raw bytes
    pub fn instance_bytes(&self) -> Vec<u8> {
        bytemuck::cast_slice(&self.instance_data()).to_vec()
    }
}

impl Scene {
    /// Snapshot of cameras, meshes and text for a renderer
    pub fn render_snapshot(&self) -> RenderSnapshot {
        RenderSnapshot::capture(self)
    }
}
