//! The [Injector] is the service object owning all container state: named
//! binding containers, the ambient active set and the singleton cache. Tests
//! and applications construct isolated instances instead of sharing implicit
//! globals; handles are cheap to clone and share the same state.

use crate::binding::{BindingMetadata, Implementation, Interface, InterfaceDowncast};
use crate::container_registry::{BindingRegistry, SubmittedBinding, DEFAULT_CONTAINER};
use crate::error::{BindingRegistryError, ResolutionError};
use crate::instance::{Construct, InstancePtr};
use crate::invoke::{InjectFn, Injected};
use crate::lifecycle::{resolve_instance, Lifecycle, SingletonCache};
use itertools::Itertools;
use std::any::{type_name, TypeId};
use std::sync::{PoisonError, RwLock};

#[derive(Default)]
struct InjectorState {
    registry: RwLock<BindingRegistry>,
    singletons: SingletonCache,
}

/// Entry point of the container. Binds interfaces to implementations in
/// named containers, resolves instances from the active set and wraps
/// callables for call-time parameter injection.
///
/// The active set starts empty. Bindings registered into the
/// [default](DEFAULT_CONTAINER) container become active immediately; other
/// containers take effect when [activated](Injector::activate), which merges
/// their bindings over the active set without clearing it.
#[derive(Clone, Default)]
pub struct Injector {
    state: InstancePtr<InjectorState>,
}

impl Injector {
    /// Creates an injector with no containers, no active bindings and an
    /// empty singleton cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an injector pre-populated with every [SubmittedBinding]
    /// registered via `inventory::submit!`.
    pub fn with_submitted_bindings() -> Result<Self, BindingRegistryError> {
        let injector = Self::new();

        let submitted = inventory::iter::<SubmittedBinding>
            .into_iter()
            .collect_vec();

        for binding in submitted {
            injector.register_metadata(binding.container, (binding.metadata)())?;
        }

        Ok(injector)
    }

    /// Registers a binding in the [default](DEFAULT_CONTAINER) container,
    /// making it active immediately. Registering the same interface again
    /// overwrites the binding (but never an already-cached singleton
    /// instance).
    ///
    /// Constructor arguments are closure captures. The constructor must not
    /// resolve through this injector.
    pub fn register<I, C, F>(
        &self,
        lifecycle: Lifecycle,
        constructor: F,
    ) -> Result<(), BindingRegistryError>
    where
        I: InterfaceDowncast<C> + ?Sized,
        C: Implementation,
        F: Construct<C>,
    {
        self.register_in::<I, C, F>(DEFAULT_CONTAINER, lifecycle, constructor)
    }

    /// Registers a binding scoped to the named container, creating the
    /// container if absent. Named containers only take effect once
    /// [activated](Injector::activate).
    pub fn register_in<I, C, F>(
        &self,
        container: &str,
        lifecycle: Lifecycle,
        constructor: F,
    ) -> Result<(), BindingRegistryError>
    where
        I: InterfaceDowncast<C> + ?Sized,
        C: Implementation,
        F: Construct<C>,
    {
        self.register_metadata(container, BindingMetadata::of::<I, C, F>(lifecycle, constructor))
    }

    /// Type-erased registration path; validates the metadata before storing
    /// it.
    pub fn register_metadata(
        &self,
        container: &str,
        metadata: BindingMetadata,
    ) -> Result<(), BindingRegistryError> {
        self.state
            .registry
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .register(container, metadata)
    }

    /// Returns a registration handle scoped to the named container. The
    /// container is created eagerly, so it can be activated before any
    /// binding is added.
    pub fn container(&self, name: &str) -> ContainerHandle {
        self.state
            .registry
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .create_container(name);

        ContainerHandle {
            injector: self.clone(),
            name: name.to_string(),
        }
    }

    pub fn has_container(&self, name: &str) -> bool {
        self.state
            .registry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .has_container(name)
    }

    /// Merges the named container's bindings into the active set (upsert per
    /// interface; the active set is never cleared). Fails with
    /// [UnknownContainer](BindingRegistryError::UnknownContainer) if no
    /// container with that name was ever created.
    pub fn activate(&self, name: &str) -> Result<(), BindingRegistryError> {
        self.state
            .registry
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .activate(name)
    }

    /// Resolves an instance of the given interface from the active set,
    /// honoring the binding's lifecycle.
    pub fn resolve<I>(&self) -> Result<InstancePtr<I>, ResolutionError>
    where
        I: Interface + ?Sized,
    {
        let definition = self
            .state
            .registry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .active_binding(TypeId::of::<I>())
            .ok_or(ResolutionError::NoActiveBinding {
                interface: type_name::<I>(),
            })?;

        let instance = resolve_instance(&self.state.singletons, &definition);

        (definition.cast)(instance)
            .ok()
            .and_then(|instance| instance.downcast::<InstancePtr<I>>().ok())
            .map(|instance| *instance)
            .ok_or(ResolutionError::IncompatibleBinding {
                interface: type_name::<I>(),
            })
    }

    /// Wraps a callable, capturing its parameter-type signature once. At each
    /// call, parameters not explicitly supplied by the caller are resolved
    /// from the active set; explicit values always win.
    pub fn wrap<F, P>(&self, function: F) -> Injected<F, P>
    where
        F: InjectFn<P>,
    {
        Injected::new(self.clone(), function)
    }
}

/// Registration handle bound to a named container, as returned by
/// [Injector::container].
pub struct ContainerHandle {
    injector: Injector,
    name: String,
}

impl ContainerHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registers a binding scoped to this handle's container.
    pub fn register<I, C, F>(
        &self,
        lifecycle: Lifecycle,
        constructor: F,
    ) -> Result<(), BindingRegistryError>
    where
        I: InterfaceDowncast<C> + ?Sized,
        C: Implementation,
        F: Construct<C>,
    {
        self.injector
            .register_in::<I, C, F>(&self.name, lifecycle, constructor)
    }
}
