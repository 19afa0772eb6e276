use crate::record::Attr;
use crate::renderer::Renderer;
use std::sync::Arc;

/// A renderer that simply drops all output.
///
/// Useful for measuring the overhead of the handler itself without any
/// terminal I/O.
#[derive(Clone, Default)]
pub struct NoopRenderer;

impl Renderer for NoopRenderer {
    fn debug(&self, _message: &str, _fields: &[Attr]) {}
    fn info(&self, _message: &str, _fields: &[Attr]) {}
    fn warn(&self, _message: &str, _fields: &[Attr]) {}
    fn error(&self, _message: &str, _fields: &[Attr]) {}
    fn print(&self, _message: &str, _fields: &[Attr]) {}

    fn with(&self, _fields: Vec<Attr>) -> Arc<dyn Renderer> {
        Arc::new(NoopRenderer)
    }
}
