use crate::callable::{Callable, IntoCallable};
use crate::signature::Signature;
use std::any::{self, Any};
use std::collections::HashMap;
use std::marker::PhantomData;
use tracing::warn;

/// A type whose methods can be stubbed or called by name.
///
/// Rust has no runtime method lookup, so a subject lists its methods once:
///
/// ```
/// use method_stub::{MethodTable, Subject};
///
/// struct Calculator;
///
/// impl Calculator {
///     fn add(&self, a: i64, b: i64) -> i64 {
///         a + b
///     }
/// }
///
/// impl Subject for Calculator {
///     fn methods(table: &mut MethodTable<Self>) {
///         table.method("add", Calculator::add);
///     }
/// }
/// ```
pub trait Subject: Any + Send + Sync + Sized {
    fn methods(table: &mut MethodTable<Self>);
}

/// Name-to-method lookup for a subject type.
pub struct MethodTable<S> {
    methods: HashMap<String, Callable>,
    _subject: PhantomData<fn() -> S>,
}

impl<S: Subject> MethodTable<S> {
    /// Build the table by asking `S` to register its methods.
    pub fn of() -> Self {
        let mut table = Self {
            methods: HashMap::new(),
            _subject: PhantomData,
        };
        S::methods(&mut table);
        table
    }

    /// Register a real method.
    ///
    /// # Panics
    ///
    /// If `method`'s first parameter is not `&S`. A subject's method list is
    /// fixed code, so this is a bug in the `Subject` impl itself.
    pub fn method<F, M>(&mut self, name: &str, method: F) -> &mut Self
    where
        F: IntoCallable<M>,
    {
        let callable = method.into_callable();
        let receiver = callable.signature().receiver().map(|r| r.type_id());
        assert!(
            receiver == Some(std::any::TypeId::of::<S>()),
            "method `{}` registered on {} must take `&{}` as its first parameter",
            name,
            any::type_name::<S>(),
            any::type_name::<S>(),
        );
        if self.methods.insert(name.to_string(), callable).is_some() {
            warn!(
                subject = any::type_name::<S>(),
                method = name,
                "Method registered twice; keeping the later one"
            );
        }
        self
    }
}

impl<S> MethodTable<S> {
    pub fn get(&self, name: &str) -> Option<&Callable> {
        self.methods.get(name)
    }

    pub fn signature(&self, name: &str) -> Option<&Signature> {
        self.methods.get(name).map(Callable::signature)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    /// Method names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.methods.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}
