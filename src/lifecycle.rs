//! Binding lifecycles decide when an instance is constructed and for how long
//! it is reused. [Factory](Lifecycle::Factory) bindings construct a fresh
//! instance on every resolution; [Singleton](Lifecycle::Singleton) bindings
//! construct once per *implementation* type and share that instance
//! process-wide, regardless of how many interfaces or containers bind to it.

use crate::container_registry::BindingDefinition;
use crate::instance::{ConstructorFn, InstanceAnyPtr};
use fxhash::FxHashMap;
#[cfg(test)]
use mockall::automock;
use std::any::TypeId;
use std::fmt::{Display, Formatter};
use std::sync::{Mutex, PoisonError};
use tracing::trace;

/// Name of the singleton lifecycle.
pub const SINGLETON: &str = "singleton";

/// Name of the factory lifecycle.
pub const FACTORY: &str = "factory";

/// Recognized binding lifecycles.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Lifecycle {
    Singleton,
    Factory,
}

impl Lifecycle {
    pub fn name(self) -> &'static str {
        match self {
            Self::Singleton => SINGLETON,
            Self::Factory => FACTORY,
        }
    }

    /// Parses a lifecycle name; `None` for unrecognized names.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            SINGLETON => Some(Self::Singleton),
            FACTORY => Some(Self::Factory),
            _ => None,
        }
    }
}

impl Display for Lifecycle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Storage consulted for singleton instances during resolution.
#[cfg_attr(test, automock)]
pub trait InstanceStore {
    /// Returns the cached instance for an implementation type, constructing
    /// and caching it first if absent. Construction is serialized, so at most
    /// one instance exists per implementation type; constructors passed on
    /// later calls for an already-cached type are ignored.
    fn get_or_construct(
        &self,
        implementation: TypeId,
        constructor: &ConstructorFn,
    ) -> InstanceAnyPtr;
}

/// Singleton cache keyed by implementation type, shared by every container
/// and interface of one injector.
#[derive(Default)]
pub struct SingletonCache {
    instances: Mutex<FxHashMap<TypeId, InstanceAnyPtr>>,
}

impl InstanceStore for SingletonCache {
    fn get_or_construct(
        &self,
        implementation: TypeId,
        constructor: &ConstructorFn,
    ) -> InstanceAnyPtr {
        // the lock is held across construction, so racing callers observe the
        // instance built by whichever caller got there first
        let mut instances = self
            .instances
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        instances
            .entry(implementation)
            .or_insert_with(|| (constructor)())
            .clone()
    }
}

/// Produces an instance for a binding according to its lifecycle.
pub(crate) fn resolve_instance(
    store: &dyn InstanceStore,
    definition: &BindingDefinition,
) -> InstanceAnyPtr {
    trace!(
        "Resolving {} as {}.",
        definition.interface.name,
        definition.lifecycle
    );

    match definition.lifecycle {
        Lifecycle::Factory => (definition.constructor)(),
        Lifecycle::Singleton => {
            store.get_or_construct(definition.implementation.id, &definition.constructor)
        }
    }
}
