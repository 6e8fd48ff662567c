//! Opaque argument and return values.
//!
//! Arguments travel through the dispatcher as [`Value`]s so that a single
//! call log can hold tuples of arbitrary types. Return values come back as
//! [`Output`]s and are downcast by the wrapper that knows the real type.

use std::any::{self, Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// Anything usable as a recorded call argument.
///
/// Blanket-implemented; callers never implement it by hand.
pub trait Argument: Any + fmt::Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn dyn_eq(&self, other: &dyn Argument) -> bool;
    fn type_name(&self) -> &'static str;
}

impl<T> Argument for T
where
    T: Any + Clone + PartialEq + fmt::Debug + Send + Sync,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn dyn_eq(&self, other: &dyn Argument) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| self == other)
    }

    fn type_name(&self) -> &'static str {
        any::type_name::<T>()
    }
}

/// A shared, immutable argument value.
///
/// Cloning is cheap; the call log and the caller share the same allocation.
#[derive(Clone)]
pub struct Value(Arc<dyn Argument>);

impl Value {
    pub fn new<T>(value: T) -> Self
    where
        T: Any + Clone + PartialEq + fmt::Debug + Send + Sync,
    {
        Self(Arc::new(value))
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }

    pub fn is<T: Any>(&self) -> bool {
        self.value_type_id() == TypeId::of::<T>()
    }

    pub fn value_type_id(&self) -> TypeId {
        self.0.as_any().type_id()
    }

    pub fn type_name(&self) -> &'static str {
        self.0.type_name()
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.0.dyn_eq(other.0.as_ref())
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

/// Build an argument tuple from plain values.
///
/// ```
/// use method_stub::{args, Value};
/// let tuple: Vec<Value> = args![2i64, String::from("x")];
/// assert_eq!(tuple.len(), 2);
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::Value>::new()
    };
    ($($arg:expr),+ $(,)?) => {
        ::std::vec![$($crate::Value::new($arg)),+]
    };
}

/// A value returned from a stub or a real method.
pub struct Output {
    value: Box<dyn Any + Send>,
    type_name: &'static str,
}

impl Output {
    pub fn new<T: Any + Send>(value: T) -> Self {
        Self {
            value: Box::new(value),
            type_name: any::type_name::<T>(),
        }
    }

    /// Take the value out, or get `self` back if `T` is the wrong type.
    pub fn downcast<T: Any>(self) -> std::result::Result<T, Self> {
        let type_name = self.type_name;
        self.value
            .downcast::<T>()
            .map(|boxed| *boxed)
            .map_err(|value| Self { value, type_name })
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl fmt::Debug for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Output")
            .field("type", &self.type_name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_compare_structurally() {
        assert_eq!(Value::new(vec![1, 2, 3]), Value::new(vec![1, 2, 3]));
        assert_ne!(Value::new(vec![1, 2, 3]), Value::new(vec![3, 2, 1]));
    }

    #[test]
    fn test_values_of_different_types_are_never_equal() {
        assert_ne!(Value::new(1i32), Value::new(1i64));
        assert!(Value::new(1i64).is::<i64>());
        assert!(!Value::new(1i64).is::<i32>());
    }

    #[test]
    fn test_args_macro_preserves_order() {
        let tuple = args![1u8, "two".to_string(), 3.0f64];
        assert_eq!(tuple.len(), 3);
        assert_eq!(tuple[0].downcast_ref::<u8>(), Some(&1));
        assert_eq!(tuple[1].downcast_ref::<String>().map(String::as_str), Some("two"));
        assert_eq!(tuple[2].type_name(), "f64");
        assert!(args![].is_empty());
    }

    #[test]
    fn test_value_debug_is_transparent() {
        assert_eq!(format!("{:?}", Value::new("hi".to_string())), "\"hi\"");
    }

    #[test]
    fn test_output_downcast() {
        let output = Output::new(42i64);
        assert_eq!(output.type_name(), "i64");
        let output = output.downcast::<String>().unwrap_err();
        assert_eq!(output.downcast::<i64>().unwrap(), 42);
    }
}
