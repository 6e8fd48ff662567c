use super::calls::CallLog;
use super::stubs::StubTable;
use crate::callable::{Callable, IntoCallable};
use crate::config::Config;
use crate::logging;
use crate::signature::{self, ShapeError, Signature};
use crate::subject::{MethodTable, Subject};
use crate::value::{Output, Value};
use crate::{MockError, Result};
use std::any::{self, Any};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct State {
    stubs: StubTable,
    calls: CallLog,
}

/// Intercepts calls to a subject's methods by name.
///
/// Each call goes to an installed stub if there is one, otherwise to the
/// subject's real method, and its arguments are recorded either way. One
/// mutex guards both the stub table and the call log; it is never held
/// while a stub or real method runs.
pub struct MockEngine<S: Subject> {
    subject: Arc<S>,
    wrapper: &'static str,
    methods: MethodTable<S>,
    config: Config,
    state: Mutex<State>,
}

impl<S: Subject> MockEngine<S> {
    pub fn new(subject: S) -> Self {
        Self::from_shared(Arc::new(subject))
    }

    /// Wrap a subject that the test also holds on to.
    pub fn from_shared(subject: Arc<S>) -> Self {
        Self::build(subject, any::type_name::<S>(), Config::default())
    }

    /// Wrap a subject on behalf of the wrapper type `W`.
    ///
    /// The wrapper's type name is kept for diagnostics.
    pub fn for_wrapper<W: ?Sized>(subject: S) -> Self {
        Self::build(Arc::new(subject), any::type_name::<W>(), Config::default())
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    fn build(subject: Arc<S>, wrapper: &'static str, config: Config) -> Self {
        let methods = MethodTable::<S>::of();
        logging::log_engine_created(any::type_name::<S>(), wrapper, methods.len());
        Self {
            subject,
            wrapper,
            methods,
            config,
            state: Mutex::new(State::default()),
        }
    }

    pub fn subject(&self) -> &S {
        &self.subject
    }

    pub fn subject_handle(&self) -> Arc<S> {
        Arc::clone(&self.subject)
    }

    pub fn wrapper_name(&self) -> &'static str {
        self.wrapper
    }

    pub fn methods(&self) -> &MethodTable<S> {
        &self.methods
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn subject_name() -> &'static str {
        any::type_name::<S>()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        // Guarded mutations are single inserts/removes/pushes and user code
        // never runs under the guard.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The real method's signature, receiver included.
    pub fn method_signature(&self, method: &str) -> Result<Signature> {
        self.methods
            .signature(method)
            .cloned()
            .ok_or_else(|| self.configuration_error(method, ShapeError::UnknownMethod))
    }

    fn configuration_error(&self, method: &str, source: ShapeError) -> MockError {
        MockError::Configuration {
            subject: Self::subject_name(),
            method: method.to_string(),
            source,
        }
    }

    /// Install `stub` in place of the real method `method`.
    ///
    /// The stub must take `&S` first and then exactly the real method's
    /// parameters, and return the same type. Replaces any earlier stub.
    pub fn stub<F, M>(&self, method: &str, stub: F) -> Result<()>
    where
        F: IntoCallable<M>,
    {
        self.install(method, stub.into_callable())
    }

    /// Install a stub passed as an untyped value; it must be a [`Callable`].
    pub fn stub_erased(&self, method: &str, stub: Box<dyn Any + Send + Sync>) -> Result<()> {
        match stub.downcast::<Callable>() {
            Ok(callable) => self.install(method, *callable),
            Err(_) => {
                let err = self.configuration_error(method, ShapeError::NotCallable);
                logging::log_stub_rejected(Self::subject_name(), method, "not callable");
                Err(err)
            }
        }
    }

    fn install(&self, method: &str, callable: Callable) -> Result<()> {
        if let Err(source) = self.validate(method, callable.signature()) {
            logging::log_stub_rejected(Self::subject_name(), method, &source.to_string());
            return Err(self.configuration_error(method, source));
        }
        let replaced = self.state().stubs.insert(method, callable);
        logging::log_stub_installed(Self::subject_name(), method, replaced);
        Ok(())
    }

    fn validate(&self, method: &str, stub: &Signature) -> std::result::Result<(), ShapeError> {
        let expected = self
            .methods
            .signature(method)
            .ok_or(ShapeError::UnknownMethod)?;
        signature::validate(expected, stub)
    }

    pub fn is_stubbed(&self, method: &str) -> bool {
        self.state().stubs.contains(method)
    }

    /// Remove the stub for `method`; a no-op if there is none.
    pub fn unstub(&self, method: &str) {
        let removed = self.state().stubs.remove(method);
        if removed {
            logging::log_stub_removed(Self::subject_name(), method);
        } else if self.config.dispatch.warn_on_missing_unstub {
            logging::log_unstub_missing(Self::subject_name(), method);
        }
    }

    pub fn stubbed_methods(&self) -> Vec<String> {
        self.state().stubs.names()
    }

    /// Every recorded argument tuple for `method`, oldest first.
    pub fn all_call_args(&self, method: &str) -> Vec<Vec<Value>> {
        self.state().calls.all(method).to_vec()
    }

    pub fn call_args(&self, method: &str, index: usize) -> Result<Vec<Value>> {
        let state = self.state();
        state
            .calls
            .get(method, index)
            .cloned()
            .ok_or_else(|| MockError::OutOfRange {
                method: method.to_string(),
                index,
                count: state.calls.count(method),
            })
    }

    pub fn last_call_args(&self, method: &str) -> Result<Vec<Value>> {
        self.state()
            .calls
            .last(method)
            .cloned()
            .ok_or_else(|| MockError::NoCalls {
                method: method.to_string(),
            })
    }

    pub fn method_call_count(&self, method: &str) -> usize {
        self.state().calls.count(method)
    }

    /// Whether some recorded call to `method` had exactly `args`.
    pub fn was_method_called_with(&self, method: &str, args: &[Value]) -> bool {
        self.state().calls.contains_call(method, args)
    }

    pub fn called_methods(&self) -> Vec<String> {
        self.state().calls.methods()
    }

    /// Dispatch `method` to its stub or real implementation.
    ///
    /// The subject is passed as the receiver ahead of `args`. The call is
    /// recorded once the callable returns, so recorded order is completion
    /// order. Calls rejected for bad arguments are not recorded.
    pub fn call(&self, method: &str, args: Vec<Value>) -> Result<Vec<Output>> {
        let stub = self.state().stubs.get(method).cloned();
        let stubbed = stub.is_some();
        let callable = match stub.as_ref() {
            Some(stub) => stub,
            None => self.methods.get(method).ok_or_else(|| {
                logging::log_unknown_method(Self::subject_name(), method);
                MockError::UnknownMethod {
                    subject: Self::subject_name(),
                    method: method.to_string(),
                }
            })?,
        };

        if self.config.dispatch.trace_calls {
            logging::log_dispatch(method, stubbed, args.len());
        }

        let receiver: &dyn Any = &*self.subject;
        let outputs = callable
            .invoke(receiver, &args)
            .map_err(|detail| MockError::InvalidArguments {
                method: method.to_string(),
                detail,
            })?;

        let count = self.state().calls.record(method, args);
        logging::log_call_recorded(method, count);
        Ok(outputs)
    }

    /// [`call`](Self::call) for passthroughs that know the return type.
    ///
    /// `R = ()` expects no return value; any other `R` expects exactly one.
    pub fn call_as<R: Any>(&self, method: &str, args: Vec<Value>) -> Result<R> {
        let mut outputs = self.call(method, args)?;
        let mismatch = |actual: String| MockError::ReturnMismatch {
            method: method.to_string(),
            expected: any::type_name::<R>().to_string(),
            actual,
        };

        match outputs.len() {
            0 => {
                let unit: Box<dyn Any> = Box::new(());
                unit.downcast::<R>()
                    .map(|r| *r)
                    .map_err(|_| mismatch("no value".to_string()))
            }
            1 => outputs
                .pop()
                .ok_or_else(|| mismatch("no value".to_string()))?
                .downcast::<R>()
                .map_err(|output| mismatch(output.type_name().to_string())),
            n => Err(mismatch(format!("{} values", n))),
        }
    }
}

impl<S: Subject> fmt::Debug for MockEngine<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state();
        f.debug_struct("MockEngine")
            .field("subject", &Self::subject_name())
            .field("wrapper", &self.wrapper)
            .field("methods", &self.methods.names())
            .field("stubbed", &state.stubs.names())
            .field("called", &state.calls.methods())
            .finish()
    }
}
