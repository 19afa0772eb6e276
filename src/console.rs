use crate::level::LevelMethod;
use crate::record::Attr;
use crate::renderer::Renderer;
use chrono::Local;
use console::style;
use std::io::Write;
use std::sync::{Arc, Mutex};

/// Default `chrono` format for timestamps, e.g. `2024/01/15 10:30:00`.
pub const DEFAULT_TIME_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Display options for [`ConsoleRenderer`].
///
/// **Fields**
/// - `prefix`: text printed as `prefix:` before every message; empty
///   means none.
/// - `report_timestamp`: print a local timestamp at the start of each line.
/// - `time_format`: `chrono` format string for the timestamp.
/// - `colors`: style level labels, keys and prefix with ANSI escapes.
#[derive(Clone, Debug)]
pub struct ConsoleOptions {
    pub prefix: String,
    pub report_timestamp: bool,
    pub time_format: String,
    pub colors: bool,
}

impl Default for ConsoleOptions {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            report_timestamp: false,
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            colors: console::colors_enabled_stderr(),
        }
    }
}

/// Renderer that writes one human readable line per record:
///
/// ```text
/// 2024/01/15 10:30:00 WARN api: disk full path=/tmp source=src/main.rs:12
/// ```
///
/// The writer is shared between a renderer and everything derived from it,
/// and each line is written under its lock.
#[derive(Clone)]
pub struct ConsoleRenderer {
    writer: Arc<Mutex<Box<dyn Write + Send>>>,
    options: Arc<ConsoleOptions>,
    bound: Vec<Attr>,
}

impl ConsoleRenderer {
    pub fn new(writer: Box<dyn Write + Send>, options: ConsoleOptions) -> Self {
        Self {
            writer: Arc::new(Mutex::new(writer)),
            options: Arc::new(options),
            bound: Vec::new(),
        }
    }

    /// Renderer writing to the process's stderr.
    pub fn stderr(options: ConsoleOptions) -> Self {
        Self::new(Box::new(std::io::stderr()), options)
    }

    pub fn options(&self) -> &ConsoleOptions {
        &self.options
    }

    fn format_line(&self, method: LevelMethod, message: &str, fields: &[Attr]) -> String {
        let colors = self.options.colors;
        let mut parts: Vec<String> = Vec::with_capacity(4 + self.bound.len() + fields.len());

        if self.options.report_timestamp {
            parts.push(Local::now().format(&self.options.time_format).to_string());
        }

        if let Some((label, color)) = level_label(method) {
            parts.push(style(label).color256(color).bold().force_styling(colors).to_string());
        }

        if !self.options.prefix.is_empty() {
            let prefix = format!("{}:", self.options.prefix);
            parts.push(style(prefix).bold().force_styling(colors).to_string());
        }

        if !message.is_empty() {
            parts.push(message.to_string());
        }

        for attr in self.bound.iter().chain(fields) {
            let key = style(format!("{}=", attr.key)).dim().force_styling(colors);
            parts.push(format!("{}{}", key, format_value(&attr.value)));
        }

        parts.join(" ")
    }

    fn write_line(&self, method: LevelMethod, message: &str, fields: &[Attr]) {
        let line = self.format_line(method, message, fields);
        let mut writer = self.writer.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        // Output failures are not reported to callers.
        let _ = writeln!(writer, "{}", line);
        let _ = writer.flush();
    }
}

fn level_label(method: LevelMethod) -> Option<(&'static str, u8)> {
    match method {
        LevelMethod::Debug => Some(("DEBU", 63)),
        LevelMethod::Info => Some(("INFO", 86)),
        LevelMethod::Warn => Some(("WARN", 192)),
        LevelMethod::Error => Some(("ERRO", 204)),
        LevelMethod::Print => None,
    }
}

fn format_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) if needs_quoting(s) => {
            serde_json::to_string(s).unwrap_or_else(|_| format!("{:?}", s))
        }
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn needs_quoting(s: &str) -> bool {
    s.is_empty() || s.chars().any(|c| c.is_whitespace() || c == '=' || c == '"')
}

impl Renderer for ConsoleRenderer {
    fn debug(&self, message: &str, fields: &[Attr]) {
        self.write_line(LevelMethod::Debug, message, fields);
    }

    fn info(&self, message: &str, fields: &[Attr]) {
        self.write_line(LevelMethod::Info, message, fields);
    }

    fn warn(&self, message: &str, fields: &[Attr]) {
        self.write_line(LevelMethod::Warn, message, fields);
    }

    fn error(&self, message: &str, fields: &[Attr]) {
        self.write_line(LevelMethod::Error, message, fields);
    }

    fn print(&self, message: &str, fields: &[Attr]) {
        self.write_line(LevelMethod::Print, message, fields);
    }

    fn with(&self, fields: Vec<Attr>) -> Arc<dyn Renderer> {
        let mut bound = self.bound.clone();
        bound.extend(fields);
        Arc::new(ConsoleRenderer {
            writer: Arc::clone(&self.writer),
            options: Arc::clone(&self.options),
            bound,
        })
    }
}
