//! # Scene
//!
//! Owns the entities of one world, in the order they were added, together
//! with the frame clock their components observe. Per-frame dispatch lives in
//! [`scheduler`](super::scheduler); this module covers ownership, queries and
//! the transform hierarchy.
//!
//! Parent links are stored as ids on each [`Transform`] and resolved here on
//! every access. World matrices are never cached.

use std::collections::HashMap;
use std::fmt;

use super::component::Component;
use super::components::{Transform, TransformAxes};
use super::entity::{Entity, EntityId};
use super::error::EcsError;
use crate::core::config::SceneConfig;
use crate::foundation::math::{Mat4, Mat4Ext, Quat, Vec3};
use crate::foundation::time::{FrameClock, FrameTime};

/// Cumulative statistics for a scene
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneStats {
    /// Entities currently in the scene
    pub entity_count: usize,

    /// Components attached to those entities
    pub component_count: usize,

    /// Ticks dispatched since the scene was created
    pub ticks: u64,

    /// Lifecycle calls that returned an error, over all ticks
    pub lifecycle_failures: u64,

    /// Smoothed frames per second
    pub fps: f32,

    /// Wall-clock duration of the last tick in milliseconds
    pub frame_time_ms: f32,
}

/// Ordered collection of entities plus the clock that drives them
pub struct Scene {
    pub(crate) entities: HashMap<EntityId, Entity>,
    pub(crate) order: Vec<EntityId>,
    pub(crate) clock: FrameClock,
    pub(crate) config: SceneConfig,
    pub(crate) ticks: u64,
    pub(crate) lifecycle_failures: u64,
    pub(crate) last_frame_ms: f32,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Create an empty scene with default settings
    pub fn new() -> Self {
        Self::with_config(SceneConfig::default())
    }

    /// Create an empty scene
    pub fn with_config(config: SceneConfig) -> Self {
        Self {
            entities: HashMap::new(),
            order: Vec::new(),
            clock: FrameClock::new(config.fps_smoothing),
            config,
            ticks: 0,
            lifecycle_failures: 0,
            last_frame_ms: 0.0,
        }
    }

    /// Dispatch settings
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Move an entity into the scene.
    ///
    /// Components that have not started yet are started on the next tick.
    pub fn add_entity(&mut self, mut entity: Entity) -> EntityId {
        let id = entity.id();
        entity.prune_orphaned_slots();
        entity.stamp_attached();
        log::debug!(
            "Adding {} '{}' with {} component(s)",
            id,
            entity.name(),
            entity.component_count()
        );

        self.entities.insert(id, entity);
        self.order.push(id);
        id
    }

    /// Take an entity out of the scene.
    ///
    /// None of its components receive further lifecycle calls, even later in
    /// the tick that removed it. Its children become roots, and its own
    /// parent link is cleared.
    pub fn remove_entity(&mut self, id: EntityId) -> Option<Entity> {
        let mut entity = self.entities.remove(&id)?;
        self.order.retain(|other| *other != id);

        for child in self.entities.values_mut() {
            if child.transform_parent() == Some(id) {
                child.set_transform_parent(None);
            }
        }
        entity.set_transform_parent(None);

        log::debug!("Removed {} '{}' from scene", id, entity.name());
        Some(entity)
    }

    /// Whether the entity is in this scene
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Look up an entity
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Look up an entity mutably
    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Entities in the order they were added
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.order.iter().filter_map(|id| self.entities.get(id))
    }

    /// Entity ids in the order they were added
    pub fn entity_ids(&self) -> &[EntityId] {
        &self.order
    }

    /// First entity with the given name
    pub fn find_by_name(&self, name: &str) -> Option<&Entity> {
        self.entities().find(|entity| entity.name() == name)
    }

    /// Entities that have at least one component of type `T`, in order
    pub fn entities_with_component<T: Component>(&self) -> impl Iterator<Item = &Entity> {
        self.entities().filter(|entity| entity.has_component::<T>())
    }

    /// Number of entities
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the scene has no entities
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Re-parent `child`.
    ///
    /// `None` makes it a root. Fails with [`EcsError::CyclicHierarchy`] if
    /// `parent` is `child` itself or one of its descendants; the hierarchy is
    /// left untouched on failure.
    pub fn set_parent(&mut self, child: EntityId, parent: Option<EntityId>) -> Result<(), EcsError> {
        if !self.contains(child) {
            return Err(EcsError::EntityNotFound(child));
        }

        if let Some(parent) = parent {
            if !self.contains(parent) {
                return Err(EcsError::EntityNotFound(parent));
            }
            if self.ancestors_and_self(parent).any(|ancestor| ancestor == child) {
                log::warn!("Refusing to parent {child} under {parent}: cycle");
                return Err(EcsError::CyclicHierarchy { child, parent });
            }
        }

        if let Some(entity) = self.entities.get_mut(&child) {
            entity.set_transform_parent(parent);
        }
        Ok(())
    }

    /// Resolved parent of an entity
    pub fn parent(&self, id: EntityId) -> Option<EntityId> {
        self.entities
            .get(&id)?
            .transform_parent()
            .filter(|parent| self.contains(*parent))
    }

    /// Direct children of an entity, in insertion order
    pub fn children(&self, id: EntityId) -> Vec<EntityId> {
        self.entities()
            .filter(|entity| entity.transform_parent() == Some(id))
            .map(Entity::id)
            .collect()
    }

    /// `id`, then its parent, grandparent and so on
    fn ancestors_and_self(&self, id: EntityId) -> impl Iterator<Item = EntityId> + '_ {
        std::iter::successors(Some(id), move |current| self.parent(*current))
    }

    /// World matrix: local matrices folded from the root down to `id`
    pub fn world_matrix(&self, id: EntityId) -> Result<Mat4, EcsError> {
        if !self.contains(id) {
            return Err(EcsError::EntityNotFound(id));
        }

        let world = self
            .ancestors_and_self(id)
            .filter_map(|ancestor| self.entities.get(&ancestor))
            .map(|entity| entity.transform().local_matrix())
            .fold(Mat4::identity(), |child_to_world, local| local * child_to_world);
        Ok(world)
    }

    /// World-space position
    pub fn world_position(&self, id: EntityId) -> Result<Vec3, EcsError> {
        self.world_matrix(id).map(|matrix| matrix.origin())
    }

    /// World-space rotation
    pub fn world_rotation(&self, id: EntityId) -> Result<Quat, EcsError> {
        self.world_matrix(id).map(|matrix| matrix.rotation_quat())
    }

    /// World-space scale: lengths of the world basis vectors
    pub fn world_scale(&self, id: EntityId) -> Result<Vec3, EcsError> {
        self.world_matrix(id).map(|matrix| matrix.axis_scale())
    }

    /// Local transform of an entity
    pub fn transform(&self, id: EntityId) -> Option<&Transform> {
        self.entity(id).map(Entity::transform)
    }

    /// Timing of the most recent tick
    pub fn time(&self) -> FrameTime {
        self.clock.now()
    }

    /// Restart frame counting and FPS smoothing
    pub fn reset_clock(&mut self) {
        self.clock.reset();
    }

    /// Current statistics
    pub fn stats(&self) -> SceneStats {
        SceneStats {
            entity_count: self.len(),
            component_count: self.entities.values().map(Entity::component_count).sum(),
            ticks: self.ticks,
            lifecycle_failures: self.lifecycle_failures,
            fps: self.clock.now().fps,
            frame_time_ms: self.last_frame_ms,
        }
    }
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene")
            .field("entities", &self.entities().collect::<Vec<_>>())
            .field("ticks", &self.ticks)
            .finish()
    }
}
