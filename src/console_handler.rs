use crate::console::{ConsoleOptions, ConsoleRenderer};
use crate::handler::Handler;
use crate::level::Level;
use crate::record::{Attr, LogRecord};
use crate::renderer::{dispatch, Renderer};
use std::error::Error;
use std::sync::Arc;

/// [`Handler`] that forwards records to a [`Renderer`].
///
/// Records below `min_level` are dropped. Attribute keys are qualified with
/// the active group (`group.key`), and a record's source location is
/// appended as a trailing `source=file:line` field.
#[derive(Clone)]
pub struct ConsoleHandler {
    renderer: Arc<dyn Renderer>,
    min_level: Level,
    group: String,
}

impl ConsoleHandler {
    pub fn new(renderer: Arc<dyn Renderer>, min_level: Level) -> Self {
        Self {
            renderer,
            min_level,
            group: String::new(),
        }
    }

    /// Handler printing to stderr with `prefix` in front of every message.
    pub fn stderr(min_level: Level, prefix: impl Into<String>) -> Self {
        let options = ConsoleOptions {
            prefix: prefix.into(),
            ..ConsoleOptions::default()
        };
        Self::new(Arc::new(ConsoleRenderer::stderr(options)), min_level)
    }

    pub fn min_level(&self) -> Level {
        self.min_level
    }

    /// Active group prefix; empty when no group is set.
    pub fn group(&self) -> &str {
        &self.group
    }

    fn qualify(&self, attr: &Attr) -> Attr {
        if self.group.is_empty() {
            attr.clone()
        } else {
            Attr {
                key: format!("{}.{}", self.group, attr.key),
                value: attr.value.clone(),
            }
        }
    }
}

impl Handler for ConsoleHandler {
    fn enabled(&self, level: Level) -> bool {
        level >= self.min_level
    }

    fn handle(&self, record: &LogRecord) -> Result<(), Box<dyn Error + Send + Sync>> {
        if !self.enabled(record.level) {
            return Ok(());
        }

        let mut fields = Vec::with_capacity(record.num_attrs() + 1);
        fields.extend(record.attrs().map(|a| self.qualify(a)));

        if let Some(source) = &record.source {
            fields.push(Attr::new("source", source.to_string()));
        }

        dispatch(&*self.renderer, record.level.method(), &record.message, &fields);
        Ok(())
    }

    fn with_attrs(&self, attrs: &[Attr]) -> Arc<dyn Handler> {
        let fields = attrs.iter().map(|a| self.qualify(a)).collect();
        Arc::new(ConsoleHandler {
            renderer: self.renderer.with(fields),
            min_level: self.min_level,
            group: self.group.clone(),
        })
    }

    fn with_group(&self, name: &str) -> Arc<dyn Handler> {
        let group = if self.group.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", self.group, name)
        };
        Arc::new(ConsoleHandler {
            renderer: Arc::clone(&self.renderer),
            min_level: self.min_level,
            group,
        })
    }
}
