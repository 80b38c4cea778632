//! A small inversion-of-control container. Abstract interfaces are bound to
//! concrete implementations in named containers; wrapped callables get any
//! parameter typed by a bound interface supplied automatically at call time.
//!
//! The three moving parts:
//!
//! * named binding containers plus one ambient active set, owned by an
//!   [Injector](injector::Injector) - see [container_registry],
//! * singleton/factory [lifecycles](lifecycle) with a process-wide singleton
//!   cache keyed by implementation type,
//! * the [injection wrapper](invoke) which captures a callable's
//!   parameter-type signature once and fills unsupplied parameters from the
//!   active set on every call.
//!
//! ```
//! use apothecary_di::injector::Injector;
//! use apothecary_di::instance::InstancePtr;
//! use apothecary_di::interface;
//! use apothecary_di::invoke::{Arg, CallArgs};
//! use apothecary_di::lifecycle::Lifecycle;
//!
//! trait Adder {
//!     fn sum(&self, a: i64, b: i64) -> i64;
//! }
//!
//! struct PlainAdder;
//!
//! impl Adder for PlainAdder {
//!     fn sum(&self, a: i64, b: i64) -> i64 {
//!         a + b
//!     }
//! }
//!
//! // note Send + Sync in the interface type when using the default
//! // "threadsafe" feature
//! interface!(dyn Adder => PlainAdder);
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let injector = Injector::new();
//! injector.register::<dyn Adder + Send + Sync, _, _>(Lifecycle::Singleton, || PlainAdder)?;
//!
//! let sum = injector.wrap(
//!     |a: Arg<i64>, b: Arg<i64>, adder: InstancePtr<dyn Adder + Send + Sync>| {
//!         adder.sum(*a, *b)
//!     },
//! );
//!
//! // a and b are supplied explicitly, the adder is injected
//! assert_eq!(sum.call_with(CallArgs::new().with(1i64).with(2i64))?, 3);
//! # Ok(())
//! # }
//! ```

pub mod binding;
pub mod container_registry;
pub mod error;
pub mod injector;
pub mod instance;
pub mod invoke;
pub mod lifecycle;

pub use error::{BindingRegistryError, InvocationError, ResolutionError};
