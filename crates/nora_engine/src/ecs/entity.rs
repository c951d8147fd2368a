//! Entity implementation
//!
//! An entity owns one [`Transform`] and an ordered list of components.
//! Components are kept in insertion order; typed lookups return the first
//! match in that order.

use std::any::{type_name, TypeId};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use super::component::{Component, ComponentBox, ComponentId};
use super::components::Transform;
use super::error::EcsError;

static NEXT_ENTITY_ID: AtomicU64 = AtomicU64::new(1);
static ATTACH_STAMP: AtomicU64 = AtomicU64::new(0);

/// Stamp for an entity joining a scene or a component joining an entity.
///
/// Strictly greater than every [`latest_attach_stamp`] read before it.
pub(crate) fn next_attach_stamp() -> u64 {
    ATTACH_STAMP.fetch_add(1, Ordering::Relaxed) + 1
}

/// Highest stamp handed out so far
pub(crate) fn latest_attach_stamp() -> u64 {
    ATTACH_STAMP.load(Ordering::Relaxed)
}

/// Entity identifier, unique for the lifetime of the process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u64);

impl EntityId {
    fn next() -> Self {
        Self(NEXT_ENTITY_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[cfg(test)]
    pub(crate) fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw numeric id
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity#{}", self.0)
    }
}

/// Lifecycle state of an attached component
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentState {
    /// Waiting for its `start` call
    Pending,
    /// `start` has run; receives `update` every frame
    Started,
    /// Taken out of dispatch after a failure
    Disabled,
    /// Detached while its own hook was running; dropped when the hook returns
    Removed,
}

pub(crate) struct ComponentSlot {
    pub(crate) id: ComponentId,
    pub(crate) type_id: TypeId,
    pub(crate) name: &'static str,
    pub(crate) state: ComponentState,
    pub(crate) attached: u64,
    /// `None` while the component is out on a lifecycle call
    pub(crate) behaviour: Option<Box<dyn Component>>,
}

impl ComponentSlot {
    fn is_visible(&self) -> bool {
        self.state != ComponentState::Removed && self.behaviour.is_some()
    }
}

/// A named object in a scene with a transform and a set of components
pub struct Entity {
    id: EntityId,
    name: String,
    active: bool,
    attached: u64,
    transform: Transform,
    slots: Vec<ComponentSlot>,
}

impl Entity {
    /// Create an empty, active entity
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: EntityId::next(),
            name: name.into(),
            active: true,
            attached: 0,
            transform: Transform::default(),
            slots: Vec::new(),
        }
    }

    /// Builder: start from the given local transform
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self.transform.set_parent_unchecked(None);
        self
    }

    /// Builder: attach a freshly constructed component
    pub fn with_component<C: Component>(mut self, component: C) -> Self {
        self.push_slot(ComponentBox::owned_by(self.id, component));
        self
    }

    /// Entity identifier
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Entity name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the entity
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Inactive entities receive neither `start` nor `update` calls
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Enable or disable lifecycle dispatch for this entity
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Local transform
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Mutable local transform
    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    /// Attach a component.
    ///
    /// Unowned components become owned by this entity. The component is
    /// started on the next tick of the scene this entity belongs to.
    pub fn add_component(&mut self, component: impl Into<ComponentBox>) -> Result<ComponentId, EcsError> {
        let mut boxed = component.into();
        match boxed.owner() {
            Some(owner) if owner != self.id => {
                return Err(EcsError::DuplicateOwnerAssignment {
                    component: boxed.id(),
                    current: owner,
                    requested: self.id,
                });
            }
            Some(_) => {}
            None => boxed.set_owner(self.id)?,
        }

        let id = boxed.id();
        log::debug!("Attached {} ({}) to {} '{}'", boxed.name(), id, self.id, self.name);
        self.push_slot(boxed);
        Ok(id)
    }

    fn push_slot(&mut self, boxed: ComponentBox) {
        let (id, _owner, type_id, behaviour) = boxed.into_parts();
        self.slots.push(ComponentSlot {
            id,
            type_id,
            name: behaviour.name(),
            state: ComponentState::Pending,
            attached: next_attach_stamp(),
            behaviour: Some(behaviour),
        });
    }

    /// Detach a component.
    ///
    /// Returns the component, still recording this entity as its owner. If
    /// the component is currently inside its own `start`/`update`, it is
    /// marked removed instead, dropped once the call returns, and `None` is
    /// returned. Either way it receives no further lifecycle calls.
    pub fn remove_component(&mut self, id: ComponentId) -> Option<ComponentBox> {
        let index = self.slots.iter().position(|slot| slot.id == id && slot.state != ComponentState::Removed)?;

        if self.slots[index].behaviour.is_none() {
            log::debug!("Removing in-flight {} from {}", id, self.id);
            self.slots[index].state = ComponentState::Removed;
            return None;
        }

        let slot = self.slots.remove(index);
        log::debug!("Removed {} ({}) from {}", slot.name, id, self.id);
        slot.behaviour
            .map(|behaviour| ComponentBox::from_parts(slot.id, Some(self.id), slot.type_id, behaviour))
    }

    /// Detach the first component of type `T`
    pub fn remove_component_of<T: Component>(&mut self) -> Option<ComponentBox> {
        let id = self.find_slot::<T>()?.id;
        self.remove_component(id)
    }

    fn find_slot<T: Component>(&self) -> Option<&ComponentSlot> {
        let wanted = TypeId::of::<T>();
        self.slots.iter().find(|slot| slot.type_id == wanted && slot.is_visible())
    }

    /// First attached component of type `T`, in insertion order
    pub fn get_component<T: Component>(&self) -> Option<&T> {
        self.find_slot::<T>()?
            .behaviour
            .as_deref()
            .and_then(|behaviour| behaviour.as_any().downcast_ref::<T>())
    }

    /// Mutable access to the first attached component of type `T`
    pub fn get_component_mut<T: Component>(&mut self) -> Option<&mut T> {
        let wanted = TypeId::of::<T>();
        self.slots
            .iter_mut()
            .find(|slot| slot.type_id == wanted && slot.is_visible())?
            .behaviour
            .as_deref_mut()
            .and_then(|behaviour| behaviour.as_any_mut().downcast_mut::<T>())
    }

    /// Like [`get_component`](Self::get_component) but treats absence as an error
    pub fn require_component<T: Component>(&self) -> Result<&T, EcsError> {
        let id = self.id;
        self.get_component::<T>().ok_or_else(|| EcsError::ComponentNotFound {
            entity: id,
            type_name: type_name::<T>(),
        })
    }

    /// Like [`get_component_mut`](Self::get_component_mut) but treats absence as an error
    pub fn require_component_mut<T: Component>(&mut self) -> Result<&mut T, EcsError> {
        let id = self.id;
        self.get_component_mut::<T>().ok_or_else(|| EcsError::ComponentNotFound {
            entity: id,
            type_name: type_name::<T>(),
        })
    }

    /// Whether a component of type `T` is attached
    pub fn has_component<T: Component>(&self) -> bool {
        self.find_slot::<T>().is_some()
    }

    /// All attached components of type `T`, in insertion order
    pub fn get_components<T: Component>(&self) -> impl Iterator<Item = &T> {
        let wanted = TypeId::of::<T>();
        self.slots
            .iter()
            .filter(move |slot| slot.type_id == wanted && slot.is_visible())
            .filter_map(|slot| slot.behaviour.as_deref())
            .filter_map(|behaviour| behaviour.as_any().downcast_ref::<T>())
    }

    /// Ids of attached components, in insertion order
    pub fn components(&self) -> Vec<ComponentId> {
        self.slots
            .iter()
            .filter(|slot| slot.state != ComponentState::Removed)
            .map(|slot| slot.id)
            .collect()
    }

    /// Number of attached components
    pub fn component_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.state != ComponentState::Removed).count()
    }

    /// Lifecycle state of an attached component
    pub fn component_state(&self, id: ComponentId) -> Option<ComponentState> {
        self.slot(id).map(|slot| slot.state)
    }

    /// Log name of an attached component
    pub fn component_name(&self, id: ComponentId) -> Option<&'static str> {
        self.slot(id).map(|slot| slot.name)
    }

    pub(crate) fn slot(&self, id: ComponentId) -> Option<&ComponentSlot> {
        self.slots.iter().find(|slot| slot.id == id)
    }

    pub(crate) fn slot_mut(&mut self, id: ComponentId) -> Option<&mut ComponentSlot> {
        self.slots.iter_mut().find(|slot| slot.id == id)
    }

    pub(crate) fn slots(&self) -> &[ComponentSlot] {
        &self.slots
    }

    /// Put a component back after its lifecycle call.
    ///
    /// Drops it instead if it was removed during the call.
    pub(crate) fn restore(&mut self, id: ComponentId, behaviour: Box<dyn Component>) {
        let Some(index) = self.slots.iter().position(|slot| slot.id == id) else {
            return;
        };

        if self.slots[index].state == ComponentState::Removed {
            self.slots.remove(index);
            log::debug!("Dropped {} removed during its own lifecycle call", id);
        } else {
            self.slots[index].behaviour = Some(behaviour);
        }
    }

    /// Forget slots whose component never came back from a lifecycle call.
    ///
    /// Only happens when an entity was removed from its scene by one of its
    /// own components.
    pub(crate) fn prune_orphaned_slots(&mut self) {
        self.slots.retain(|slot| slot.behaviour.is_some());
    }

    /// Stamp of the latest insertion into a scene
    pub(crate) fn attached(&self) -> u64 {
        self.attached
    }

    pub(crate) fn stamp_attached(&mut self) {
        self.attached = next_attach_stamp();
    }

    pub(crate) fn transform_parent(&self) -> Option<EntityId> {
        self.transform.parent()
    }

    pub(crate) fn set_transform_parent(&mut self, parent: Option<EntityId>) {
        self.transform.set_parent_unchecked(parent);
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("active", &self.active)
            .field("transform", &self.transform)
            .field("components", &self.slots.iter().map(|slot| slot.name).collect::<Vec<_>>())
            .finish()
    }
}
