//! Functionality related to storing bindings in named containers and
//! maintaining the ambient active set consulted during injection. Bindings
//! can be registered manually through an [Injector](crate::injector::Injector)
//! or statically via [SubmittedBinding].

use crate::binding::{BindingMetadata, TypeDesc};
use crate::error::BindingRegistryError;
use crate::instance::{CastFunction, ConstructorFn};
use crate::lifecycle::Lifecycle;
use derivative::Derivative;
use fxhash::FxHashMap;
use std::any::TypeId;
use tracing::debug;

/// Name of the distinguished container whose bindings mirror into the active
/// set as they are registered.
pub const DEFAULT_CONTAINER: &str = "default";

/// A validated binding stored in a container.
#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub struct BindingDefinition {
    pub interface: TypeDesc,
    pub implementation: TypeDesc,
    pub lifecycle: Lifecycle,

    #[derivative(Debug = "ignore")]
    pub constructor: ConstructorFn,

    pub cast: CastFunction,
}

type BindingMap = FxHashMap<TypeId, BindingDefinition>;

/// Named containers plus the ambient active set. The active set starts empty
/// and is only mutated by registration into [DEFAULT_CONTAINER] or by
/// [activation](BindingRegistry::activate).
#[derive(Default, Debug)]
pub(crate) struct BindingRegistry {
    containers: FxHashMap<String, BindingMap>,
    active: BindingMap,
}

impl BindingRegistry {
    /// Validates and stores a binding in the named container, creating the
    /// container if absent. Registering the same interface twice in one
    /// container overwrites. Bindings targeting [DEFAULT_CONTAINER] are also
    /// upserted into the active set immediately.
    pub(crate) fn register(
        &mut self,
        container: &str,
        metadata: BindingMetadata,
    ) -> Result<(), BindingRegistryError> {
        let lifecycle = metadata.validate()?;

        let definition = BindingDefinition {
            interface: metadata.interface,
            implementation: metadata.implementation,
            lifecycle,
            constructor: metadata.constructor,
            cast: metadata.cast,
        };

        debug!(
            "Registering {} -> {} ({}) in container '{}'.",
            definition.interface.name, definition.implementation.name, lifecycle, container
        );

        let bindings = self.containers.entry(container.to_string()).or_default();
        bindings.insert(definition.interface.id, definition.clone());

        if container == DEFAULT_CONTAINER {
            self.active.insert(definition.interface.id, definition);
        }

        Ok(())
    }

    /// Creates the named container if absent, so its existence is observable
    /// before any binding is added.
    pub(crate) fn create_container(&mut self, name: &str) {
        self.containers.entry(name.to_string()).or_default();
    }

    pub(crate) fn has_container(&self, name: &str) -> bool {
        self.containers.contains_key(name)
    }

    /// Merges the named container's bindings into the active set - bindings
    /// for interfaces present in the container overwrite, everything else
    /// stays active.
    pub(crate) fn activate(&mut self, name: &str) -> Result<(), BindingRegistryError> {
        let bindings = self
            .containers
            .get(name)
            .ok_or_else(|| BindingRegistryError::UnknownContainer(name.to_string()))?;

        debug!(
            "Activating container '{}' ({} bindings).",
            name,
            bindings.len()
        );

        self.active.extend(
            bindings
                .iter()
                .map(|(interface, definition)| (*interface, definition.clone())),
        );

        Ok(())
    }

    pub(crate) fn active_binding(&self, interface: TypeId) -> Option<BindingDefinition> {
        self.active.get(&interface).cloned()
    }
}

/// Binding submitted for static registration, collected by
/// [with_submitted_bindings](crate::injector::Injector::with_submitted_bindings):
///
/// ```ignore
/// inventory::submit! {
///     SubmittedBinding {
///         container: "default",
///         metadata: || BindingMetadata::of::<dyn Clock + Send + Sync, SystemClock, _>(
///             Lifecycle::Singleton,
///             || SystemClock,
///         ),
///     }
/// }
/// ```
pub struct SubmittedBinding {
    pub container: &'static str,
    pub metadata: fn() -> BindingMetadata,
}

inventory::collect!(SubmittedBinding);
