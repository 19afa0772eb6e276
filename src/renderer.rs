use crate::level::LevelMethod;
use crate::record::Attr;
use std::sync::Arc;

/// Output backend that a [`ConsoleHandler`](crate::console_handler::ConsoleHandler)
/// forwards records to.
///
/// Implementations own the formatting and the output stream. Every method
/// receives the message and a flat, ordered list of key/value pairs; none
/// of them report failures back to the caller.
pub trait Renderer: Send + Sync {
    fn debug(&self, message: &str, fields: &[Attr]);
    fn info(&self, message: &str, fields: &[Attr]);
    fn warn(&self, message: &str, fields: &[Attr]);
    fn error(&self, message: &str, fields: &[Attr]);

    /// Output without a severity label, used for levels that have no
    /// dedicated method.
    fn print(&self, message: &str, fields: &[Attr]);

    /// Return a renderer with `fields` pre-bound. Bound fields are emitted
    /// before the per-call fields of every subsequent record.
    ///
    /// The receiver is left untouched.
    fn with(&self, fields: Vec<Attr>) -> Arc<dyn Renderer>;
}

/// Route a message to the renderer method named by `method`.
pub fn dispatch(renderer: &dyn Renderer, method: LevelMethod, message: &str, fields: &[Attr]) {
    match method {
        LevelMethod::Debug => renderer.debug(message, fields),
        LevelMethod::Info => renderer.info(message, fields),
        LevelMethod::Warn => renderer.warn(message, fields),
        LevelMethod::Error => renderer.error(message, fields),
        LevelMethod::Print => renderer.print(message, fields),
    }
}
