use super::engine::MockEngine;
use crate::callable::IntoCallable;
use crate::subject::Subject;
use crate::value::{Output, Value};
use crate::Result;
use std::any::Any;

/// The engine's operations, for wrapper types that hold a [`MockEngine`].
///
/// A wrapper implements [`engine`](Mocked::engine) and gets every other
/// method by delegation. Its own passthrough methods then forward typed
/// calls:
///
/// ```
/// use method_stub::{args, MethodTable, MockEngine, Mocked, Subject};
///
/// struct Clock;
///
/// impl Clock {
///     fn now(&self) -> u64 {
///         1_700_000_000
///     }
/// }
///
/// impl Subject for Clock {
///     fn methods(table: &mut MethodTable<Self>) {
///         table.method("now", Clock::now);
///     }
/// }
///
/// struct ClockDouble {
///     engine: MockEngine<Clock>,
/// }
///
/// impl Mocked for ClockDouble {
///     type Subject = Clock;
///
///     fn engine(&self) -> &MockEngine<Clock> {
///         &self.engine
///     }
/// }
///
/// impl ClockDouble {
///     fn now(&self) -> u64 {
///         self.call_as("now", args![]).unwrap()
///     }
/// }
///
/// let double = ClockDouble { engine: MockEngine::for_wrapper::<ClockDouble>(Clock) };
/// double.stub("now", |_: &Clock| 42u64).unwrap();
/// assert_eq!(double.now(), 42);
/// assert_eq!(double.method_call_count("now"), 1);
/// ```
pub trait Mocked {
    type Subject: Subject;

    fn engine(&self) -> &MockEngine<Self::Subject>;

    fn stub<F, M>(&self, method: &str, stub: F) -> Result<()>
    where
        F: IntoCallable<M>,
    {
        self.engine().stub(method, stub)
    }

    fn is_stubbed(&self, method: &str) -> bool {
        self.engine().is_stubbed(method)
    }

    fn unstub(&self, method: &str) {
        self.engine().unstub(method)
    }

    fn all_call_args(&self, method: &str) -> Vec<Vec<Value>> {
        self.engine().all_call_args(method)
    }

    fn call_args(&self, method: &str, index: usize) -> Result<Vec<Value>> {
        self.engine().call_args(method, index)
    }

    fn last_call_args(&self, method: &str) -> Result<Vec<Value>> {
        self.engine().last_call_args(method)
    }

    fn method_call_count(&self, method: &str) -> usize {
        self.engine().method_call_count(method)
    }

    fn was_method_called_with(&self, method: &str, args: &[Value]) -> bool {
        self.engine().was_method_called_with(method, args)
    }

    fn call(&self, method: &str, args: Vec<Value>) -> Result<Vec<Output>> {
        self.engine().call(method, args)
    }

    fn call_as<R: Any>(&self, method: &str, args: Vec<Value>) -> Result<R> {
        self.engine().call_as(method, args)
    }
}
