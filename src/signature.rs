//! Signature descriptors and stub shape validation.

use std::any::{self, Any, TypeId};
use std::fmt;

/// The type occupying one parameter or return slot.
#[derive(Clone, Copy)]
pub struct TypeDescriptor {
    id: TypeId,
    name: &'static str,
    receiver: bool,
}

impl TypeDescriptor {
    /// An owned value slot of type `T`.
    pub fn of<T: Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: any::type_name::<T>(),
            receiver: false,
        }
    }

    /// The borrowed receiver slot `&T`.
    pub fn receiver<T: Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: any::type_name::<&T>(),
            receiver: true,
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_receiver(&self) -> bool {
        self.receiver
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.receiver == other.receiver
    }
}

impl Eq for TypeDescriptor {}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Ordered parameter and return types of a callable.
///
/// For methods, parameter 0 is the receiver. A `()` return is recorded as
/// zero returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    params: Vec<TypeDescriptor>,
    returns: Vec<TypeDescriptor>,
}

impl Signature {
    pub fn new(params: Vec<TypeDescriptor>, returns: Vec<TypeDescriptor>) -> Self {
        Self { params, returns }
    }

    /// Describe the return type `R`: `()` is no return, anything else is one.
    pub fn returns_of<R: Any>() -> Vec<TypeDescriptor> {
        if TypeId::of::<R>() == TypeId::of::<()>() {
            Vec::new()
        } else {
            vec![TypeDescriptor::of::<R>()]
        }
    }

    pub fn params(&self) -> &[TypeDescriptor] {
        &self.params
    }

    pub fn returns(&self) -> &[TypeDescriptor] {
        &self.returns
    }

    /// The receiver slot, if parameter 0 is one.
    pub fn receiver(&self) -> Option<&TypeDescriptor> {
        self.params.first().filter(|p| p.is_receiver())
    }

    /// Parameters after the receiver, i.e. what a caller passes to `call`.
    pub fn arguments(&self) -> &[TypeDescriptor] {
        match self.receiver() {
            Some(_) => &self.params[1..],
            None => &self.params,
        }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fn(")?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", param)?;
        }
        write!(f, ")")?;
        match self.returns.as_slice() {
            [] => Ok(()),
            [single] => write!(f, " -> {}", single),
            many => {
                write!(f, " -> (")?;
                for (i, ret) in many.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", ret)?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Why a stub was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShapeError {
    #[error("stub value is not a callable")]
    NotCallable,

    #[error("no such method on the subject")]
    UnknownMethod,

    #[error("stub takes {actual} parameters but the method takes {expected} (including the receiver){}", receiver_hint(.missing_receiver, .receiver))]
    ParamCount {
        expected: usize,
        actual: usize,
        missing_receiver: bool,
        receiver: &'static str,
    },

    #[error("stub returns {actual} values but the method returns {expected}")]
    ReturnCount { expected: usize, actual: usize },

    #[error("parameter #{position} must be {expected}, found {actual}")]
    ParamType {
        position: usize,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("return #{position} must be {expected}, found {actual}")]
    ReturnType {
        position: usize,
        expected: &'static str,
        actual: &'static str,
    },
}

fn receiver_hint(missing: &bool, receiver: &str) -> String {
    if *missing {
        format!("; missing the receiver argument `{}` as parameter #0", receiver)
    } else {
        String::new()
    }
}

/// Check a stub's shape against the real method's shape.
///
/// Counts are checked before types so that a stub lacking its receiver is
/// reported as such rather than as a type mismatch at position 0.
pub fn validate(expected: &Signature, actual: &Signature) -> Result<(), ShapeError> {
    if expected.params.len() != actual.params.len() {
        let missing_receiver = expected.receiver().is_some() && actual.receiver().is_none();
        return Err(ShapeError::ParamCount {
            expected: expected.params.len(),
            actual: actual.params.len(),
            missing_receiver,
            receiver: expected.receiver().map_or("&Self", TypeDescriptor::name),
        });
    }
    if expected.returns.len() != actual.returns.len() {
        return Err(ShapeError::ReturnCount {
            expected: expected.returns.len(),
            actual: actual.returns.len(),
        });
    }

    for (position, (want, got)) in expected.params.iter().zip(&actual.params).enumerate() {
        if want != got {
            return Err(ShapeError::ParamType {
                position,
                expected: want.name(),
                actual: got.name(),
            });
        }
    }
    for (position, (want, got)) in expected.returns.iter().zip(&actual.returns).enumerate() {
        if want != got {
            return Err(ShapeError::ReturnType {
                position,
                expected: want.name(),
                actual: got.name(),
            });
        }
    }
    Ok(())
}
