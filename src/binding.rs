//! Core vocabulary of the container: interfaces, implementations and the
//! metadata describing a binding between them.
//!
//! An *interface* is a trait-object type used purely as a lookup key for
//! bindings. Declaring a trait injectable, together with the implementations
//! which can stand in for it, is done with the [interface!](crate::interface)
//! macro:
//!
//! ```
//! use apothecary_di::interface;
//!
//! trait Notifier {
//!     fn notify(&self, message: &str);
//! }
//!
//! struct EmailNotifier;
//!
//! impl Notifier for EmailNotifier {
//!     fn notify(&self, _message: &str) {}
//! }
//!
//! interface!(dyn Notifier => EmailNotifier);
//! ```
//!
//! The macro implements [Interface] for the trait-object type and
//! [InterfaceDowncast] for each listed implementation, which is what proves
//! at compile time that a registration pair is structurally legal. The
//! type-erased [BindingMetadata] path performs the same checks at runtime via
//! [BindingMetadata::validate].

use crate::error::BindingRegistryError;
use crate::instance::{CastFunction, Construct, ConstructorFn, InstanceAnyPtr, InstancePtr};
use crate::lifecycle::Lifecycle;
use derivative::Derivative;
use std::any::{type_name, Any, TypeId};

/// Marker trait for interface types - abstract contracts used as lookup keys
/// for bindings. Typically implemented for `dyn Trait` types via the
/// [interface!](crate::interface) macro.
pub trait Interface: 'static {}

/// Marker trait for concrete implementation types. Blanket-implemented for
/// everything which can be stored in an [InstanceAnyPtr].
#[cfg(feature = "threadsafe")]
pub trait Implementation: Send + Sync + 'static {}
#[cfg(feature = "threadsafe")]
impl<T: Send + Sync + 'static> Implementation for T {}

/// Marker trait for concrete implementation types. Blanket-implemented for
/// everything which can be stored in an [InstanceAnyPtr].
#[cfg(not(feature = "threadsafe"))]
pub trait Implementation: 'static {}
#[cfg(not(feature = "threadsafe"))]
impl<T: 'static> Implementation for T {}

/// Helper trait proving implementation `C` satisfies an interface, and
/// providing the instance cast from the type-erased pointer. Typically
/// generated by the [interface!](crate::interface) macro.
pub trait InterfaceDowncast<C: Implementation>: Interface {
    fn downcast(instance: InstanceAnyPtr) -> Result<InstancePtr<Self>, InstanceAnyPtr>;
}

/// Whether a type descriptor refers to an abstract contract or a concrete
/// implementation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TypeKind {
    Abstract,
    Concrete,
}

/// Runtime descriptor of a type taking part in a binding.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TypeDesc {
    pub id: TypeId,
    pub name: &'static str,
    pub kind: TypeKind,
}

impl TypeDesc {
    pub fn abstract_type<I: Interface + ?Sized>() -> Self {
        Self {
            id: TypeId::of::<I>(),
            name: type_name::<I>(),
            kind: TypeKind::Abstract,
        }
    }

    pub fn concrete_type<C: Implementation>() -> Self {
        Self {
            id: TypeId::of::<C>(),
            name: type_name::<C>(),
            kind: TypeKind::Concrete,
        }
    }
}

/// Type-erased registration information for a binding, as accepted by
/// [register_metadata](crate::injector::Injector::register_metadata) and
/// produced by the typed registration API via [BindingMetadata::of].
#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub struct BindingMetadata {
    pub interface: TypeDesc,
    pub implementation: TypeDesc,

    /// Capability set declared by the implementation - the interfaces it
    /// claims to satisfy. Registration fails unless the bound interface is a
    /// member.
    pub implements: Vec<TypeId>,

    /// Lifecycle by name; recognized names are listed in
    /// [crate::lifecycle].
    pub lifecycle: String,

    #[derivative(Debug = "ignore")]
    pub constructor: ConstructorFn,

    pub cast: CastFunction,
}

impl BindingMetadata {
    /// Builds metadata for a statically checked interface/implementation
    /// pair. Conformance is proven by the [InterfaceDowncast] bound, so
    /// [validate](BindingMetadata::validate) cannot fail for metadata built
    /// this way.
    pub fn of<I, C, F>(lifecycle: Lifecycle, constructor: F) -> Self
    where
        I: InterfaceDowncast<C> + ?Sized,
        C: Implementation,
        F: Construct<C>,
    {
        Self {
            interface: TypeDesc::abstract_type::<I>(),
            implementation: TypeDesc::concrete_type::<C>(),
            implements: vec![TypeId::of::<I>()],
            lifecycle: lifecycle.name().to_string(),
            constructor: InstancePtr::new(move || InstancePtr::new(constructor()) as InstanceAnyPtr),
            cast: interface_cast::<I, C>,
        }
    }

    /// Checks that this metadata describes a structurally legal binding and
    /// returns the parsed lifecycle. Pure check, no side effects.
    pub fn validate(&self) -> Result<Lifecycle, BindingRegistryError> {
        if self.interface.kind != TypeKind::Abstract {
            return Err(BindingRegistryError::InvalidInterface {
                interface: self.interface.name,
            });
        }

        if !self.implements.contains(&self.interface.id) {
            return Err(BindingRegistryError::ImplementationMismatch {
                implementation: self.implementation.name,
                interface: self.interface.name,
            });
        }

        Lifecycle::from_name(&self.lifecycle)
            .ok_or_else(|| BindingRegistryError::InvalidLifecycle(self.lifecycle.clone()))
    }
}

/// Cast function for a given interface/implementation pair. See
/// [CastFunction] for details on usage.
pub fn interface_cast<I, C>(instance: InstanceAnyPtr) -> Result<Box<dyn Any>, InstanceAnyPtr>
where
    I: InterfaceDowncast<C> + ?Sized,
    C: Implementation,
{
    I::downcast(instance).map(|instance| Box::new(instance) as Box<dyn Any>)
}

/// Declares a trait object as an injectable [Interface] and implements
/// [InterfaceDowncast] for each listed implementation.
///
/// With the `threadsafe` feature (the default), the interface type is
/// `dyn Trait + Send + Sync`; without it, plain `dyn Trait`.
#[cfg(feature = "threadsafe")]
#[macro_export]
macro_rules! interface {
    (dyn $interface:path => $($implementation:ty),+ $(,)?) => {
        impl $crate::binding::Interface for dyn $interface + Send + Sync {}

        $(
            impl $crate::binding::InterfaceDowncast<$implementation>
                for dyn $interface + Send + Sync
            {
                fn downcast(
                    instance: $crate::instance::InstanceAnyPtr,
                ) -> ::std::result::Result<
                    $crate::instance::InstancePtr<Self>,
                    $crate::instance::InstanceAnyPtr,
                > {
                    instance
                        .downcast::<$implementation>()
                        .map(|instance| instance as $crate::instance::InstancePtr<Self>)
                }
            }
        )+
    };
}

/// Declares a trait object as an injectable [Interface] and implements
/// [InterfaceDowncast] for each listed implementation.
///
/// With the `threadsafe` feature (the default), the interface type is
/// `dyn Trait + Send + Sync`; without it, plain `dyn Trait`.
#[cfg(not(feature = "threadsafe"))]
#[macro_export]
macro_rules! interface {
    (dyn $interface:path => $($implementation:ty),+ $(,)?) => {
        impl $crate::binding::Interface for dyn $interface {}

        $(
            impl $crate::binding::InterfaceDowncast<$implementation> for dyn $interface {
                fn downcast(
                    instance: $crate::instance::InstanceAnyPtr,
                ) -> ::std::result::Result<
                    $crate::instance::InstancePtr<Self>,
                    $crate::instance::InstanceAnyPtr,
                > {
                    instance
                        .downcast::<$implementation>()
                        .map(|instance| instance as $crate::instance::InstancePtr<Self>)
                }
            }
        )+
    };
}

#[cfg(test)]
mod tests {
    use crate::binding::{BindingMetadata, TypeDesc, TypeKind};
    use crate::error::BindingRegistryError;
    use crate::instance::{InstanceAnyPtr, InstancePtr};
    use crate::lifecycle::{Lifecycle, FACTORY, SINGLETON};
    use std::any::{Any, TypeId};

    fn cast(instance: InstanceAnyPtr) -> Result<Box<dyn Any>, InstanceAnyPtr> {
        Err(instance)
    }

    fn metadata(kind: TypeKind, implements: Vec<TypeId>, lifecycle: &str) -> BindingMetadata {
        BindingMetadata {
            interface: TypeDesc {
                id: TypeId::of::<i8>(),
                name: "i8",
                kind,
            },
            implementation: TypeDesc {
                id: TypeId::of::<u8>(),
                name: "u8",
                kind: TypeKind::Concrete,
            },
            implements,
            lifecycle: lifecycle.to_string(),
            constructor: InstancePtr::new(|| InstancePtr::new(0u8) as InstanceAnyPtr),
            cast,
        }
    }

    #[test]
    fn should_accept_conforming_binding() {
        let metadata = metadata(TypeKind::Abstract, vec![TypeId::of::<i8>()], SINGLETON);
        assert_eq!(metadata.validate().unwrap(), Lifecycle::Singleton);
    }

    #[test]
    fn should_reject_concrete_registration_target() {
        let metadata = metadata(TypeKind::Concrete, vec![TypeId::of::<i8>()], FACTORY);
        assert!(matches!(
            metadata.validate().unwrap_err(),
            BindingRegistryError::InvalidInterface { .. }
        ));
    }

    #[test]
    fn should_reject_nonconforming_implementation() {
        // the capability set names a different interface
        let metadata = metadata(TypeKind::Abstract, vec![TypeId::of::<i16>()], FACTORY);
        assert!(matches!(
            metadata.validate().unwrap_err(),
            BindingRegistryError::ImplementationMismatch { .. }
        ));
    }

    #[test]
    fn should_reject_unrecognized_lifecycle() {
        let metadata = metadata(TypeKind::Abstract, vec![TypeId::of::<i8>()], "per_request");
        assert_eq!(
            metadata.validate().unwrap_err(),
            BindingRegistryError::InvalidLifecycle("per_request".to_string())
        );
    }

    trait TestContract {
        fn value(&self) -> i32;
    }

    struct TestImpl;

    impl TestContract for TestImpl {
        fn value(&self) -> i32 {
            1
        }
    }

    crate::interface!(dyn TestContract => TestImpl);

    #[test]
    fn should_build_valid_metadata_from_typed_pair() {
        let metadata = BindingMetadata::of::<dyn TestContract + Send + Sync, TestImpl, _>(
            Lifecycle::Factory,
            || TestImpl,
        );

        assert_eq!(metadata.validate().unwrap(), Lifecycle::Factory);
        assert_eq!(metadata.interface.kind, TypeKind::Abstract);
        assert_eq!(
            metadata.interface.id,
            TypeId::of::<dyn TestContract + Send + Sync>()
        );
    }

    #[test]
    fn should_cast_constructed_instance_to_interface() {
        let metadata = BindingMetadata::of::<dyn TestContract + Send + Sync, TestImpl, _>(
            Lifecycle::Factory,
            || TestImpl,
        );

        let instance = (metadata.constructor)();
        let cast = (metadata.cast)(instance).unwrap();
        let instance = cast
            .downcast::<InstancePtr<dyn TestContract + Send + Sync>>()
            .unwrap();

        assert_eq!(instance.value(), 1);
    }
}
