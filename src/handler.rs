use crate::level::Level;
use crate::record::{Attr, LogRecord};
use std::error::Error;
use std::sync::Arc;

/// Pluggable backend for structured log records.
///
/// A handler decides which records it wants ([`enabled`](Handler::enabled)),
/// processes them ([`handle`](Handler::handle)) and can be specialised
/// into new handlers carrying extra attributes or a group namespace. The
/// [`HandlerLayer`](crate::layer::HandlerLayer) drives a handler from
/// `tracing` events.
pub trait Handler: Send + Sync {
    /// Report whether records of `level` would be processed.
    fn enabled(&self, level: Level) -> bool;

    /// Process a single record.
    ///
    /// **Returns**
    /// - `Ok(())` if the record was processed or intentionally skipped.
    /// - `Err(..)` if the backend failed. Callers log the failure and
    ///   carry on; a logging failure never halts the host program.
    fn handle(&self, record: &LogRecord) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Return a handler whose output always includes `attrs`.
    ///
    /// The receiver stays usable and unchanged.
    fn with_attrs(&self, attrs: &[Attr]) -> Arc<dyn Handler>;

    /// Return a handler that qualifies subsequent attribute keys with the
    /// group `name`. Nested groups are joined with `.`.
    fn with_group(&self, name: &str) -> Arc<dyn Handler>;
}
