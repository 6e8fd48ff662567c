pub mod callable;
pub mod config;
pub mod logging;
pub mod mock;
pub mod signature;
pub mod subject;
pub mod value;
use miette::Diagnostic;

pub use callable::{Callable, IntoCallable};
pub use config::Config;
pub use mock::{MockEngine, Mocked};
pub use signature::{ShapeError, Signature, TypeDescriptor};
pub use subject::{MethodTable, Subject};
pub use value::{Output, Value};

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, MockError>;

/// Error types for the mock engine
#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum MockError {
    #[error("Invalid stub for {subject}::{method}: {source}")]
    #[diagnostic(
        code(method_stub::configuration),
        help("A stub must take the subject (`&Subject`) as its first parameter, followed by exactly the real method's parameters, and return the real method's return type.")
    )]
    Configuration {
        subject: &'static str,
        method: String,
        #[source]
        source: ShapeError,
    },

    #[error("{subject} has no method named `{method}`")]
    #[diagnostic(
        code(method_stub::unknown_method),
        help("Register the method in `Subject::methods`, or install a stub for it before calling.")
    )]
    UnknownMethod {
        subject: &'static str,
        method: String,
    },

    #[error("No call to `{method}` at index {index} ({count} recorded)")]
    #[diagnostic(
        code(method_stub::out_of_range),
        help("Call indices are 0-based and ordered by completion. Use `method_call_count` to check how many calls were recorded.")
    )]
    OutOfRange {
        method: String,
        index: usize,
        count: usize,
    },

    #[error("No calls to `{method}` were made")]
    #[diagnostic(code(method_stub::no_calls))]
    NoCalls { method: String },

    #[error("Invalid arguments for `{method}`: {detail}")]
    #[diagnostic(
        code(method_stub::invalid_arguments),
        help("Arguments are matched by position and concrete type. Build them with `args![...]` using the exact parameter types.")
    )]
    InvalidArguments { method: String, detail: String },

    #[error("`{method}` returned {actual}, expected {expected}")]
    #[diagnostic(code(method_stub::return_mismatch))]
    ReturnMismatch {
        method: String,
        expected: String,
        actual: String,
    },

    #[error("Configuration error: {0}")]
    #[diagnostic(
        code(method_stub::config),
        help("Ensure the config file is valid TOML and accessible.")
    )]
    Config(String),
}
