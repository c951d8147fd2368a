//! Dispatch context handed to lifecycle hooks
//!
//! A component never holds references into the scene. Instead every `start`
//! and `update` call receives a [`Context`] that knows which entity and which
//! component is running and resolves them on each access. The running
//! component is taken out of its entity for the duration of the call, so
//! typed lookups through the context only ever see its siblings.

use super::component::{Component, ComponentBox, ComponentId};
use super::components::{Transform, TransformAxes};
use super::entity::{Entity, EntityId};
use super::error::EcsError;
use super::scene::Scene;
use crate::foundation::math::{Mat4, Vec3};
use crate::foundation::time::FrameTime;
use crate::input::InputState;

/// Access to the scene from inside a lifecycle hook
pub struct Context<'a> {
    scene: &'a mut Scene,
    entity: EntityId,
    component: ComponentId,
    time: FrameTime,
    input: &'a InputState,
}

impl<'a> Context<'a> {
    pub(crate) fn new(
        scene: &'a mut Scene,
        entity: EntityId,
        component: ComponentId,
        time: FrameTime,
        input: &'a InputState,
    ) -> Self {
        Self { scene, entity, component, time, input }
    }

    /// Entity that owns the running component
    pub fn entity_id(&self) -> EntityId {
        self.entity
    }

    /// The running component
    pub fn component_id(&self) -> ComponentId {
        self.component
    }

    /// Timing of the frame being dispatched
    pub fn time(&self) -> FrameTime {
        self.time
    }

    /// Shorthand for `time().delta_time`
    pub fn delta_time(&self) -> f32 {
        self.time.delta_time
    }

    /// Input state for this frame
    pub fn input(&self) -> &InputState {
        self.input
    }

    /// The owning entity.
    ///
    /// Fails with [`EcsError::EntityNotFound`] once a hook has removed its own
    /// entity from the scene.
    pub fn entity(&self) -> Result<&Entity, EcsError> {
        self.scene.entity(self.entity).ok_or(EcsError::EntityNotFound(self.entity))
    }

    /// Mutable access to the owning entity
    pub fn entity_mut(&mut self) -> Result<&mut Entity, EcsError> {
        let id = self.entity;
        self.scene.entity_mut(id).ok_or(EcsError::EntityNotFound(id))
    }

    /// Owner's local transform
    pub fn transform(&self) -> Result<&Transform, EcsError> {
        self.entity().map(Entity::transform)
    }

    /// Owner's local transform, mutable
    pub fn transform_mut(&mut self) -> Result<&mut Transform, EcsError> {
        self.entity_mut().map(Entity::transform_mut)
    }

    /// Owner's world matrix, composed through its parents
    pub fn world_matrix(&self) -> Result<Mat4, EcsError> {
        self.scene.world_matrix(self.entity)
    }

    /// Owner's world position
    pub fn world_position(&self) -> Result<Vec3, EcsError> {
        self.world_matrix().map(|matrix| matrix.origin())
    }

    /// First sibling component of type `T`
    pub fn get_component<T: Component>(&self) -> Option<&T> {
        self.scene.entity(self.entity)?.get_component::<T>()
    }

    /// First sibling component of type `T`, mutable
    pub fn get_component_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.scene.entity_mut(self.entity)?.get_component_mut::<T>()
    }

    /// Sibling component the caller cannot work without
    pub fn require_component<T: Component>(&self) -> Result<&T, EcsError> {
        self.entity()?.require_component::<T>()
    }

    /// Mutable sibling component the caller cannot work without
    pub fn require_component_mut<T: Component>(&mut self) -> Result<&mut T, EcsError> {
        self.entity_mut()?.require_component_mut::<T>()
    }

    /// Attach a component to the owner. It starts on the next tick.
    pub fn add_component(&mut self, component: impl Into<ComponentBox>) -> Result<ComponentId, EcsError> {
        self.entity_mut()?.add_component(component)
    }

    /// Detach a component from the owner.
    ///
    /// Passing [`component_id`](Self::component_id) removes the running
    /// component itself; it is dropped when the hook returns.
    pub fn remove_component(&mut self, id: ComponentId) -> Option<ComponentBox> {
        self.scene.entity_mut(self.entity)?.remove_component(id)
    }

    /// The whole scene
    pub fn scene(&self) -> &Scene {
        self.scene
    }

    /// The whole scene, mutable. Entities added here start on the next tick.
    pub fn scene_mut(&mut self) -> &mut Scene {
        self.scene
    }
}
