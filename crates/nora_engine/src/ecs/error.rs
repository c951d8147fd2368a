//! Error types for scene structure and component lifecycle calls

use std::fmt;

use thiserror::Error;

use super::component::ComponentId;
use super::entity::EntityId;

/// Which lifecycle hook was running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecyclePhase {
    /// `Component::start`
    Start,
    /// `Component::update`
    Update,
}

impl fmt::Display for LifecyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => f.write_str("start"),
            Self::Update => f.write_str("update"),
        }
    }
}

/// Structural errors raised by entities and scenes
#[derive(Error, Debug)]
pub enum EcsError {
    /// Parenting `child` under `parent` would close a loop
    #[error("making {parent} the parent of {child} would create a cycle")]
    CyclicHierarchy {
        /// Entity being re-parented
        child: EntityId,
        /// Requested parent
        parent: EntityId,
    },

    /// `set_owner` called on a component that already has one
    #[error("{component} already belongs to {owner}")]
    OwnerAlreadySet {
        /// Component
        component: ComponentId,
        /// Its existing owner
        owner: EntityId,
    },

    /// A component owned by one entity was added to another
    #[error("{component} is owned by {current} and cannot be attached to {requested}")]
    DuplicateOwnerAssignment {
        /// Component
        component: ComponentId,
        /// Its existing owner
        current: EntityId,
        /// Entity it was being added to
        requested: EntityId,
    },

    /// A component the caller required is not attached
    #[error("{entity} has no component of type {type_name}")]
    ComponentNotFound {
        /// Entity that was searched
        entity: EntityId,
        /// Requested type
        type_name: &'static str,
    },

    /// The entity is not part of this scene
    #[error("{0} is not in the scene")]
    EntityNotFound(EntityId),

    /// A component's lifecycle hook returned an error
    #[error("{phase} of {component_name} ({component}) on {entity_name} ({entity}) failed: {source}")]
    LifecycleCallFailure {
        /// Owning entity
        entity: EntityId,
        /// Owning entity's name
        entity_name: String,
        /// Failing component
        component: ComponentId,
        /// Failing component's name
        component_name: &'static str,
        /// Hook that failed
        phase: LifecyclePhase,
        /// What the hook returned
        #[source]
        source: Box<ComponentError>,
    },
}

/// Error returned from `Component::start` / `Component::update`
#[derive(Error, Debug)]
pub enum ComponentError {
    /// Scene or entity access failed
    #[error(transparent)]
    Ecs(#[from] EcsError),

    /// Script-level failure
    #[error("{0}")]
    Script(String),
}

impl ComponentError {
    /// Script-level failure with a message
    pub fn script(message: impl Into<String>) -> Self {
        Self::Script(message.into())
    }
}
