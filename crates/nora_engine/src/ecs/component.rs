//! Component trait and the owner-tracking box entities store components in

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use super::context::Context;
use super::entity::EntityId;
use super::error::{ComponentError, EcsError};

static NEXT_COMPONENT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-wide unique identifier of one component instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(u64);

impl ComponentId {
    fn next() -> Self {
        Self(NEXT_COMPONENT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric id
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "component#{}", self.0)
    }
}

/// Upcasting helper so typed lookups can downcast `dyn Component`
pub trait AsAny: Any {
    /// `self` as `&dyn Any`
    fn as_any(&self) -> &dyn Any;
    /// `self` as `&mut dyn Any`
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Behaviour attached to an entity.
///
/// Both hooks are optional. `start` runs exactly once, on the first tick after
/// the component is attached to an entity that lives in a scene; `update` runs
/// on every following tick while the entity is active. Errors returned from
/// either hook are logged by the scene and never abort the frame.
pub trait Component: AsAny {
    /// Called once before the first `update`
    fn start(&mut self, _ctx: &mut Context<'_>) -> Result<(), ComponentError> {
        Ok(())
    }

    /// Called once per frame
    fn update(&mut self, _ctx: &mut Context<'_>) -> Result<(), ComponentError> {
        Ok(())
    }

    /// Name used in logs
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// A component together with the entity that owns it.
///
/// The owner is recorded the first time the box is attached and can never
/// change afterwards, so a component detached from one entity cannot be
/// smuggled into another.
pub struct ComponentBox {
    id: ComponentId,
    owner: Option<EntityId>,
    type_id: TypeId,
    behaviour: Box<dyn Component>,
}

impl ComponentBox {
    /// Box a component with no owner yet
    pub fn new<C: Component>(component: C) -> Self {
        Self {
            id: ComponentId::next(),
            owner: None,
            type_id: TypeId::of::<C>(),
            behaviour: Box::new(component),
        }
    }

    pub(crate) fn owned_by<C: Component>(owner: EntityId, component: C) -> Self {
        Self {
            owner: Some(owner),
            ..Self::new(component)
        }
    }

    /// Identity of this component instance
    pub fn id(&self) -> ComponentId {
        self.id
    }

    /// Entity this component belongs to, if it was ever attached
    pub fn owner(&self) -> Option<EntityId> {
        self.owner
    }

    /// Record the owning entity. Fails if an owner is already recorded.
    pub fn set_owner(&mut self, owner: EntityId) -> Result<(), EcsError> {
        if let Some(current) = self.owner {
            return Err(EcsError::OwnerAlreadySet {
                component: self.id,
                owner: current,
            });
        }
        self.owner = Some(owner);
        Ok(())
    }

    /// Name used in logs
    pub fn name(&self) -> &'static str {
        self.behaviour.name()
    }

    /// Whether the boxed component is a `T`
    pub fn is<T: Component>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// Borrow the component as a `T`
    pub fn downcast_ref<T: Component>(&self) -> Option<&T> {
        let behaviour: &dyn Component = self.behaviour.as_ref();
        behaviour.as_any().downcast_ref::<T>()
    }

    /// Mutably borrow the component as a `T`
    pub fn downcast_mut<T: Component>(&mut self) -> Option<&mut T> {
        let behaviour: &mut dyn Component = self.behaviour.as_mut();
        behaviour.as_any_mut().downcast_mut::<T>()
    }

    pub(crate) fn into_parts(self) -> (ComponentId, Option<EntityId>, TypeId, Box<dyn Component>) {
        (self.id, self.owner, self.type_id, self.behaviour)
    }

    pub(crate) fn from_parts(
        id: ComponentId,
        owner: Option<EntityId>,
        type_id: TypeId,
        behaviour: Box<dyn Component>,
    ) -> Self {
        Self { id, owner, type_id, behaviour }
    }
}

impl<C: Component> From<C> for ComponentBox {
    fn from(component: C) -> Self {
        Self::new(component)
    }
}

impl fmt::Debug for ComponentBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentBox")
            .field("id", &self.id)
            .field("owner", &self.owner)
            .field("name", &self.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Spinner {
        speed: f32,
    }

    impl Component for Spinner {}

    struct Marker;

    impl Component for Marker {
        fn name(&self) -> &'static str {
            "marker"
        }
    }

    #[test]
    fn test_owner_can_only_be_set_once() {
        let mut boxed = ComponentBox::new(Marker);
        let first = EntityId::from_raw(10);
        let second = EntityId::from_raw(11);

        boxed.set_owner(first).expect("first assignment");
        let err = boxed.set_owner(second).unwrap_err();

        assert!(matches!(err, EcsError::OwnerAlreadySet { owner, .. } if owner == first));
        assert_eq!(boxed.owner(), Some(first));
    }

    #[test]
    fn test_downcast_matches_concrete_type_only() {
        let mut boxed = ComponentBox::new(Spinner { speed: 2.0 });

        assert!(boxed.is::<Spinner>());
        assert!(!boxed.is::<Marker>());
        assert!(boxed.downcast_ref::<Marker>().is_none());

        boxed.downcast_mut::<Spinner>().expect("spinner").speed = 4.0;
        assert_eq!(boxed.downcast_ref::<Spinner>().map(|s| s.speed), Some(4.0));
    }

    #[test]
    fn test_names_default_to_type_name() {
        assert!(ComponentBox::new(Spinner { speed: 0.0 }).name().ends_with("Spinner"));
        assert_eq!(ComponentBox::new(Marker).name(), "marker");
    }

    #[test]
    fn test_ids_are_unique() {
        let a = ComponentBox::new(Marker);
        let b = ComponentBox::new(Marker);
        assert_ne!(a.id(), b.id());
    }
}
