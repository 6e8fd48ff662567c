use crate::callable::Callable;
use std::collections::HashMap;

/// Installed stubs, keyed by method name.
///
/// Holds only callables that already passed shape validation; absence of a
/// name means calls fall through to the real method.
#[derive(Debug, Default)]
pub struct StubTable {
    stubs: HashMap<String, Callable>,
}

impl StubTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a stub, returning whether one was replaced
    pub fn insert(&mut self, method: &str, callable: Callable) -> bool {
        self.stubs.insert(method.to_string(), callable).is_some()
    }

    /// Remove a stub, returning whether one was present
    pub fn remove(&mut self, method: &str) -> bool {
        self.stubs.remove(method).is_some()
    }

    pub fn get(&self, method: &str) -> Option<&Callable> {
        self.stubs.get(method)
    }

    pub fn contains(&self, method: &str) -> bool {
        self.stubs.contains_key(method)
    }

    /// Stubbed method names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.stubs.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.stubs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stubs.is_empty()
    }
}
