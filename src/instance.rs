//! Type-erased instance pointers and constructor plumbing shared by the
//! container registry and the lifecycle resolver.

use std::any::Any;
#[cfg(not(feature = "threadsafe"))]
use std::rc::Rc;
#[cfg(feature = "threadsafe")]
use std::sync::Arc;

#[cfg(not(feature = "threadsafe"))]
pub type InstancePtr<T> = Rc<T>;
#[cfg(feature = "threadsafe")]
pub type InstancePtr<T> = Arc<T>;

#[cfg(not(feature = "threadsafe"))]
pub type InstanceAnyPtr = InstancePtr<dyn Any + 'static>;
#[cfg(feature = "threadsafe")]
pub type InstanceAnyPtr = InstancePtr<dyn Any + Send + Sync + 'static>;

/// Type-erased constructor stored in a binding. Constructor arguments are
/// closure captures, fixed at registration time.
#[cfg(not(feature = "threadsafe"))]
pub type ConstructorFn = InstancePtr<dyn Fn() -> InstanceAnyPtr>;
#[cfg(feature = "threadsafe")]
pub type ConstructorFn = InstancePtr<dyn Fn() -> InstanceAnyPtr + Send + Sync>;

/// Cast function associated with a binding, turning a type-erased instance
/// into a `Box<dyn Any>` containing an [InstancePtr] of the interface type.
/// On failure the original instance is handed back, so it is not lost.
pub type CastFunction = fn(instance: InstanceAnyPtr) -> Result<Box<dyn Any>, InstanceAnyPtr>;

/// Bound alias for constructor closures accepted by the typed registration
/// API.
#[cfg(feature = "threadsafe")]
pub trait Construct<C>: Fn() -> C + Send + Sync + 'static {}
#[cfg(feature = "threadsafe")]
impl<C, F: Fn() -> C + Send + Sync + 'static> Construct<C> for F {}

/// Bound alias for constructor closures accepted by the typed registration
/// API.
#[cfg(not(feature = "threadsafe"))]
pub trait Construct<C>: Fn() -> C + 'static {}
#[cfg(not(feature = "threadsafe"))]
impl<C, F: Fn() -> C + 'static> Construct<C> for F {}
