use crate::level::Level;
use serde::Serialize;
use std::fmt;

/// A single key/value attribute. Values are carried opaquely.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attr {
    pub key: String,
    pub value: serde_json::Value,
}

impl Attr {
    pub fn new(key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Attr { key: key.into(), value: value.into() }
    }
}

/// Location of the code that emitted a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Source {
    pub file: String,
    pub line: u32,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// One structured log event as seen by a [`Handler`](crate::handler::Handler).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogRecord {
    pub level: Level,
    pub message: String,
    attrs: Vec<Attr>,
    pub source: Option<Source>,
}

impl LogRecord {
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        LogRecord {
            level,
            message: message.into(),
            attrs: Vec::new(),
            source: None,
        }
    }

    /// Add an attribute. Keys are unique within a record: an existing key
    /// keeps its position and takes the new value.
    pub fn push_attr(&mut self, attr: Attr) {
        match self.attrs.iter_mut().find(|a| a.key == attr.key) {
            Some(existing) => existing.value = attr.value,
            None => self.attrs.push(attr),
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.push_attr(Attr::new(key, value));
        self
    }

    pub fn with_source(mut self, file: impl Into<String>, line: u32) -> Self {
        self.source = Some(Source { file: file.into(), line });
        self
    }

    /// Attributes in insertion order.
    pub fn attrs(&self) -> impl Iterator<Item = &Attr> {
        self.attrs.iter()
    }

    pub fn num_attrs(&self) -> usize {
        self.attrs.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn duplicate_keys_keep_first_position_and_last_value() {
        let record = LogRecord::new(Level::INFO, "hi")
            .with_attr("a", 1)
            .with_attr("b", 2)
            .with_attr("a", 3);

        let attrs: Vec<_> = record.attrs().cloned().collect();
        assert_eq!(attrs, vec![Attr::new("a", 3), Attr::new("b", 2)]);
        assert_eq!(record.num_attrs(), 2);
    }

    #[test]
    fn source_displays_as_file_colon_line() {
        let record = LogRecord::new(Level::WARN, "x").with_source("a.go", 42);
        assert_eq!(record.source.unwrap().to_string(), "a.go:42");
    }

    #[test]
    fn serializes_to_json() {
        let record = LogRecord::new(Level::ERROR, "disk full").with_attr("path", "/tmp");
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            json!({
                "level": "ERROR",
                "message": "disk full",
                "attrs": [{"key": "path", "value": "/tmp"}],
                "source": null,
            })
        );
    }
}
