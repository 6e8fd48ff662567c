//! Structured logging utilities for the mock engine.
//!
//! Engine code logs through these helpers so that event names and fields
//! stay consistent; all of them go through the `tracing` crate.

use crate::config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when neither `RUST_LOG` nor the config file sets one.
pub const DEFAULT_FILTER: &str = "method_stub=info";

/// Environment variable switching the subscriber to JSON output.
pub const JSON_ENV_VAR: &str = "METHOD_STUB_LOG_JSON";

/// Install a stderr subscriber.
///
/// `RUST_LOG` wins over `fallback_filter`. Output is JSON when
/// `METHOD_STUB_LOG_JSON` is set. Returns false if a global subscriber was
/// already installed, which is the normal case when several tests call it.
pub fn init(fallback_filter: &str) -> bool {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| fallback_filter.into());

    if std::env::var(JSON_ENV_VAR).is_ok() {
        let json_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true);

        tracing_subscriber::registry()
            .with(filter)
            .with(json_layer)
            .try_init()
            .is_ok()
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .try_init()
            .is_ok()
    }
}

/// Install a subscriber using the config file's `[logging] filter`.
pub fn init_from_config(config: &Config) -> bool {
    init(config.logging.filter.as_deref().unwrap_or(DEFAULT_FILTER))
}

/// Log engine construction.
pub fn log_engine_created(subject: &str, wrapper: &str, methods: usize) {
    tracing::debug!(subject, wrapper, methods, "Mock engine created");
}

/// Log a stub being installed.
pub fn log_stub_installed(subject: &str, method: &str, replaced: bool) {
    if replaced {
        tracing::debug!(subject, method, "Stub replaced");
    } else {
        tracing::debug!(subject, method, "Stub installed");
    }
}

/// Log a stub rejected by shape validation.
pub fn log_stub_rejected(subject: &str, method: &str, reason: &str) {
    tracing::warn!(subject, method, reason, "Stub rejected");
}

pub fn log_stub_removed(subject: &str, method: &str) {
    tracing::debug!(subject, method, "Stub removed");
}

/// Log an unstub that found nothing to remove.
pub fn log_unstub_missing(subject: &str, method: &str) {
    tracing::warn!(subject, method, "Unstub called for a method that is not stubbed");
}

/// Log the start of a dispatch.
pub fn log_dispatch(method: &str, stubbed: bool, arguments: usize) {
    tracing::debug!(method, stubbed, arguments, "Dispatching call");
}

/// Log a recorded call.
pub fn log_call_recorded(method: &str, count: usize) {
    tracing::trace!(method, count, "Call recorded");
}

/// Log a call to a method the subject does not have.
pub fn log_unknown_method(subject: &str, method: &str) {
    tracing::error!(subject, method, "Call to unknown method");
}
