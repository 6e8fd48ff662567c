//! Type-erased callables carrying their own signature.
//!
//! Any `Fn(&T, A1, .., An) -> R` turns into a [`Callable`] whose parameter 0
//! is the receiver slot `&T`. Argument values are downcast and cloned out of
//! the call's [`Value`]s at invocation time; the shape has already been
//! checked at stub-install time, so failures here mean the caller passed
//! the wrong arguments.

use crate::signature::{Signature, TypeDescriptor};
use crate::value::{Output, Value};
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

type Invoke = dyn Fn(&dyn Any, &[Value]) -> Result<Vec<Output>, String> + Send + Sync;

/// A function value plus the shape it was built from.
#[derive(Clone)]
pub struct Callable {
    signature: Signature,
    invoke: Arc<Invoke>,
}

impl Callable {
    /// Erase a receiver-taking function.
    pub fn from_fn<F, M>(f: F) -> Self
    where
        F: IntoCallable<M>,
    {
        f.into_callable()
    }

    /// Erase a function that takes no receiver.
    ///
    /// The result never validates against a method, since every method's
    /// parameter 0 is its receiver.
    pub fn detached<F, M>(f: F) -> Self
    where
        F: IntoDetached<M>,
    {
        f.into_detached()
    }

    fn from_parts<I>(signature: Signature, invoke: I) -> Self
    where
        I: Fn(&dyn Any, &[Value]) -> Result<Vec<Output>, String> + Send + Sync + 'static,
    {
        Self {
            signature,
            invoke: Arc::new(invoke),
        }
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Invoke with `receiver` emulating the method receiver and `args` the rest.
    pub fn invoke(&self, receiver: &dyn Any, args: &[Value]) -> Result<Vec<Output>, String> {
        let expected = self.signature.arguments().len();
        if args.len() != expected {
            return Err(format!(
                "expected {} argument(s), got {}",
                expected,
                args.len()
            ));
        }
        (self.invoke)(receiver, args)
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callable")
            .field("signature", &format_args!("{}", self.signature))
            .finish()
    }
}

/// Conversion into a receiver-taking [`Callable`].
///
/// `Marker` only disambiguates the per-arity impls and is always inferred.
pub trait IntoCallable<Marker>: Send + Sync + 'static {
    fn into_callable(self) -> Callable;
}

/// Conversion into a receiver-less [`Callable`].
pub trait IntoDetached<Marker>: Send + Sync + 'static {
    fn into_detached(self) -> Callable;
}

impl IntoCallable<Callable> for Callable {
    fn into_callable(self) -> Callable {
        self
    }
}

fn take_arg<A: Any + Clone>(args: &[Value], position: usize) -> Result<A, String> {
    let value = &args[position];
    value.downcast_ref::<A>().cloned().ok_or_else(|| {
        format!(
            "argument #{} must be {}, found {}",
            position,
            std::any::type_name::<A>(),
            value.type_name()
        )
    })
}

fn outputs_of<R: Any + Send>(value: R) -> Vec<Output> {
    if TypeId::of::<R>() == TypeId::of::<()>() {
        Vec::new()
    } else {
        vec![Output::new(value)]
    }
}

macro_rules! impl_callables {
    ($($arg:ident $pos:tt),*) => {
        impl<F, T, $($arg,)* R> IntoCallable<fn(&T, $($arg,)*) -> R> for F
        where
            F: Fn(&T, $($arg,)*) -> R + Send + Sync + 'static,
            T: Any,
            $($arg: Any + Clone,)*
            R: Any + Send,
        {
            #[allow(unused_variables)]
            fn into_callable(self) -> Callable {
                let signature = Signature::new(
                    vec![TypeDescriptor::receiver::<T>(), $(TypeDescriptor::of::<$arg>(),)*],
                    Signature::returns_of::<R>(),
                );
                Callable::from_parts(signature, move |receiver: &dyn Any, args: &[Value]| {
                    let receiver = receiver.downcast_ref::<T>().ok_or_else(|| {
                        format!("receiver must be {}", std::any::type_name::<T>())
                    })?;
                    let out = (self)(receiver, $(take_arg::<$arg>(args, $pos)?,)*);
                    Ok(outputs_of(out))
                })
            }
        }

        impl<F, $($arg,)* R> IntoDetached<fn($($arg,)*) -> R> for F
        where
            F: Fn($($arg,)*) -> R + Send + Sync + 'static,
            $($arg: Any + Clone,)*
            R: Any + Send,
        {
            #[allow(unused_variables)]
            fn into_detached(self) -> Callable {
                let signature = Signature::new(
                    vec![$(TypeDescriptor::of::<$arg>(),)*],
                    Signature::returns_of::<R>(),
                );
                Callable::from_parts(signature, move |_receiver: &dyn Any, args: &[Value]| {
                    let out = (self)($(take_arg::<$arg>(args, $pos)?,)*);
                    Ok(outputs_of(out))
                })
            }
        }
    };
}

impl_callables!();
impl_callables!(A0 0);
impl_callables!(A0 0, A1 1);
impl_callables!(A0 0, A1 1, A2 2);
impl_callables!(A0 0, A1 1, A2 2, A3 3);
impl_callables!(A0 0, A1 1, A2 2, A3 3, A4 4);
impl_callables!(A0 0, A1 1, A2 2, A3 3, A4 4, A5 5);
impl_callables!(A0 0, A1 1, A2 2, A3 3, A4 4, A5 5, A6 6);
impl_callables!(A0 0, A1 1, A2 2, A3 3, A4 4, A5 5, A6 6, A7 7);
