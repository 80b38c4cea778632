//! Call-time parameter injection for wrapped callables.
//!
//! [Injector::wrap](crate::injector::Injector::wrap) turns a function or
//! closure into an [Injected] value whose parameter-type signature is
//! captured once at wrap time. Each call matches explicitly supplied
//! [CallArgs] to parameters by declared type; every parameter left unsupplied
//! is resolved from the active set. Explicit values always win over
//! injection, and a parameter which is neither supplied nor bound fails with
//! the call contract's own missing-argument error.
//!
//! Instance methods are wrapped through closures capturing the receiver, so
//! the receiver never takes part in type-based resolution:
//!
//! ```ignore
//! let calculator = Calculator::new(1, 2);
//! let wrapped = injector.wrap(move |adder: AdderPtr| calculator.sum_with(adder));
//! ```

use crate::binding::Interface;
use crate::error::{InvocationError, ResolutionError};
use crate::injector::Injector;
use crate::instance::InstancePtr;
use std::any::{type_name, Any, TypeId};
use std::marker::PhantomData;
use std::ops::Deref;
use tracing::trace;

/// Descriptor of a wrapped callable's declared parameter, captured once at
/// wrap time.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ParamSpec {
    pub type_id: TypeId,
    pub type_name: &'static str,
}

/// Explicit arguments supplied by the caller of a wrapped callable, matched
/// to parameters by declared type in declaration order.
#[derive(Default)]
pub struct CallArgs {
    values: Vec<Box<dyn Any>>,
}

impl CallArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an explicit argument value. For interface parameters, supply the
    /// instance pointer type the callable declares.
    pub fn with<T: Any>(mut self, value: T) -> Self {
        self.values.push(Box::new(value));
        self
    }

    pub(crate) fn take<T: Any>(&mut self) -> Option<T> {
        let index = self.values.iter().position(|value| value.is::<T>())?;
        self.values
            .remove(index)
            .downcast()
            .ok()
            .map(|value| *value)
    }
}

/// A parameter a wrapped callable can declare: an interface instance pointer
/// (injectable from the active set) or an explicit [Arg] value.
pub trait InjectedParam: Sized {
    fn spec() -> ParamSpec;

    fn produce(injector: &Injector, supplied: &mut CallArgs) -> Result<Self, InvocationError>;
}

impl<I> InjectedParam for InstancePtr<I>
where
    I: Interface + ?Sized,
{
    fn spec() -> ParamSpec {
        ParamSpec {
            type_id: TypeId::of::<I>(),
            type_name: type_name::<I>(),
        }
    }

    fn produce(injector: &Injector, supplied: &mut CallArgs) -> Result<Self, InvocationError> {
        if let Some(value) = supplied.take::<Self>() {
            return Ok(value);
        }

        trace!("Injecting parameter of type {}.", type_name::<I>());

        injector.resolve::<I>().map_err(|error| match error {
            // an unbound parameter surfaces as the call contract's own
            // missing-argument error
            ResolutionError::NoActiveBinding { .. } => InvocationError::MissingArgument {
                parameter: type_name::<I>(),
            },
            error => error.into(),
        })
    }
}

/// Plain value parameter, always supplied explicitly by the caller via
/// [CallArgs::with]. Never injected.
pub struct Arg<T>(pub T);

impl<T> Arg<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for Arg<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: Any> InjectedParam for Arg<T> {
    fn spec() -> ParamSpec {
        ParamSpec {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
        }
    }

    fn produce(_injector: &Injector, supplied: &mut CallArgs) -> Result<Self, InvocationError> {
        supplied
            .take::<T>()
            .map(Arg)
            .ok_or(InvocationError::MissingArgument {
                parameter: type_name::<T>(),
            })
    }
}

/// Callable wrappable by [Injector::wrap](crate::injector::Injector::wrap):
/// functions and closures whose every parameter implements [InjectedParam].
/// Implemented for arities up to 8.
pub trait InjectFn<P> {
    type Output;

    fn signature() -> Vec<ParamSpec>;

    fn invoke(&self, injector: &Injector, supplied: CallArgs)
        -> Result<Self::Output, InvocationError>;
}

/// A wrapped callable together with its parameter signature and the injector
/// whose active set supplies unfilled parameters.
pub struct Injected<F, P> {
    injector: Injector,
    function: F,
    signature: Vec<ParamSpec>,
    _params: PhantomData<fn(P)>,
}

impl<F, P> Injected<F, P>
where
    F: InjectFn<P>,
{
    pub(crate) fn new(injector: Injector, function: F) -> Self {
        Self {
            injector,
            function,
            signature: F::signature(),
            _params: PhantomData,
        }
    }

    /// Declared parameter types, in declaration order.
    pub fn signature(&self) -> &[ParamSpec] {
        &self.signature
    }

    /// Invokes the callable with no explicit arguments.
    pub fn call(&self) -> Result<F::Output, InvocationError> {
        self.call_with(CallArgs::new())
    }

    /// Invokes the callable; supplied values are matched to parameters by
    /// declared type and are never overridden by injection.
    pub fn call_with(&self, supplied: CallArgs) -> Result<F::Output, InvocationError> {
        self.function.invoke(&self.injector, supplied)
    }
}

macro_rules! impl_inject_fn {
    ($($param:ident),*) => {
        impl<Func, Out, $($param),*> InjectFn<($($param,)*)> for Func
        where
            Func: Fn($($param),*) -> Out,
            $($param: InjectedParam,)*
        {
            type Output = Out;

            fn signature() -> Vec<ParamSpec> {
                vec![$($param::spec()),*]
            }

            #[allow(non_snake_case, unused_variables, unused_mut)]
            fn invoke(
                &self,
                injector: &Injector,
                mut supplied: CallArgs,
            ) -> Result<Out, InvocationError> {
                $(let $param = <$param as InjectedParam>::produce(injector, &mut supplied)?;)*
                Ok((self)($($param),*))
            }
        }
    };
}

impl_inject_fn!();
impl_inject_fn!(P1);
impl_inject_fn!(P1, P2);
impl_inject_fn!(P1, P2, P3);
impl_inject_fn!(P1, P2, P3, P4);
impl_inject_fn!(P1, P2, P3, P4, P5);
impl_inject_fn!(P1, P2, P3, P4, P5, P6);
impl_inject_fn!(P1, P2, P3, P4, P5, P6, P7);
impl_inject_fn!(P1, P2, P3, P4, P5, P6, P7, P8);
