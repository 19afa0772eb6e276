use crate::level::LevelMethod;
use crate::record::Attr;
use crate::renderer::Renderer;
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};

/// One call observed by a [`CaptureRenderer`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Captured {
    pub method: LevelMethod,
    pub message: String,
    /// Bound fields followed by per-call fields.
    pub fields: Vec<Attr>,
}

impl Captured {
    /// Fields as `(key, value)` pairs, handy in assertions.
    pub fn pairs(&self) -> Vec<(&str, &serde_json::Value)> {
        self.fields.iter().map(|a| (a.key.as_str(), &a.value)).collect()
    }
}

/// Renderer that stores every call in memory instead of writing it.
///
/// Derived renderers (see [`Renderer::with`]) share the same buffer, so a
/// single instance observes everything a handler tree produces.
#[derive(Clone, Default)]
pub struct CaptureRenderer {
    entries: Arc<Mutex<Vec<Captured>>>,
    bound: Vec<Attr>,
}

impl CaptureRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all calls so far.
    pub fn entries(&self) -> Vec<Captured> {
        self.lock().clone()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Captured>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record(&self, method: LevelMethod, message: &str, fields: &[Attr]) {
        let mut all = Vec::with_capacity(self.bound.len() + fields.len());
        all.extend_from_slice(&self.bound);
        all.extend_from_slice(fields);
        self.lock().push(Captured {
            method,
            message: message.to_string(),
            fields: all,
        });
    }
}

impl Renderer for CaptureRenderer {
    fn debug(&self, message: &str, fields: &[Attr]) {
        self.record(LevelMethod::Debug, message, fields);
    }

    fn info(&self, message: &str, fields: &[Attr]) {
        self.record(LevelMethod::Info, message, fields);
    }

    fn warn(&self, message: &str, fields: &[Attr]) {
        self.record(LevelMethod::Warn, message, fields);
    }

    fn error(&self, message: &str, fields: &[Attr]) {
        self.record(LevelMethod::Error, message, fields);
    }

    fn print(&self, message: &str, fields: &[Attr]) {
        self.record(LevelMethod::Print, message, fields);
    }

    fn with(&self, fields: Vec<Attr>) -> Arc<dyn Renderer> {
        let mut bound = self.bound.clone();
        bound.extend(fields);
        Arc::new(CaptureRenderer {
            entries: Arc::clone(&self.entries),
            bound,
        })
    }
}
