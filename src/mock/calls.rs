use crate::value::Value;
use std::collections::HashMap;

/// Per-method history of argument tuples, in recording order.
///
/// Append-only: tuples are never reordered, mutated or dropped.
#[derive(Debug, Default)]
pub struct CallLog {
    calls: HashMap<String, Vec<Vec<Value>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a call, returning the method's new call count
    pub fn record(&mut self, method: &str, args: Vec<Value>) -> usize {
        let calls = self.calls.entry(method.to_string()).or_default();
        calls.push(args);
        calls.len()
    }

    /// All tuples for `method`; empty if it was never called
    pub fn all(&self, method: &str) -> &[Vec<Value>] {
        self.calls.get(method).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn get(&self, method: &str, index: usize) -> Option<&Vec<Value>> {
        self.all(method).get(index)
    }

    pub fn last(&self, method: &str) -> Option<&Vec<Value>> {
        self.all(method).last()
    }

    pub fn count(&self, method: &str) -> usize {
        self.all(method).len()
    }

    pub fn contains_call(&self, method: &str, args: &[Value]) -> bool {
        self.all(method).iter().any(|call| call.as_slice() == args)
    }

    /// Names of methods with at least one call, sorted
    pub fn methods(&self) -> Vec<String> {
        let mut names: Vec<String> = self.calls.keys().cloned().collect();
        names.sort();
        names
    }
}
