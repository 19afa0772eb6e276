use crate::handler::Handler;
use crate::level::Level;
use crate::record::{Attr, LogRecord};
use std::sync::Arc;
use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id, Record};
use tracing::{Event, Metadata, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

/// `tracing_subscriber` layer that turns events into [`LogRecord`]s and
/// hands them to a [`Handler`].
///
/// Spans contribute to the handler an event is delivered to: walking from
/// the root span, each span opens a group named after it (unless span
/// groups are disabled) and binds its own fields. Event callsites provide
/// the record's source location.
pub struct HandlerLayer {
    handler: Arc<dyn Handler>,
    add_source: bool,
    span_groups: bool,
}

/// Fields recorded on a span, stored in the span's extensions.
#[derive(Debug, Default)]
struct SpanAttrs(Vec<Attr>);

impl HandlerLayer {
    pub fn new(handler: Arc<dyn Handler>) -> Self {
        Self {
            handler,
            add_source: true,
            span_groups: true,
        }
    }

    /// Attach the event callsite's `file:line` as the record source.
    pub fn with_source(mut self, add_source: bool) -> Self {
        self.add_source = add_source;
        self
    }

    /// Open a group per enclosing span. When disabled, span fields are
    /// still bound but keys are not qualified by span names.
    pub fn with_span_groups(mut self, span_groups: bool) -> Self {
        self.span_groups = span_groups;
        self
    }

    fn record_from_event(&self, event: &Event<'_>) -> LogRecord {
        let meta = event.metadata();
        let mut attrs = Vec::new();
        let mut message = None;
        event.record(&mut FieldVisitor { attrs: &mut attrs, message: &mut message });

        let mut record = LogRecord::new(Level::from(*meta.level()), message.unwrap_or_default());
        for attr in attrs {
            record.push_attr(attr);
        }

        if self.add_source {
            if let (Some(file), Some(line)) = (meta.file(), meta.line()) {
                if line != 0 {
                    record = record.with_source(file, line);
                }
            }
        }
        record
    }
}

impl<S> Layer<S> for HandlerLayer
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    fn enabled(&self, metadata: &Metadata<'_>, _ctx: Context<'_, S>) -> bool {
        !metadata.is_event() || self.handler.enabled(Level::from(*metadata.level()))
    }

    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };

        let mut fields = Vec::new();
        let mut message = None;
        attrs.record(&mut FieldVisitor { attrs: &mut fields, message: &mut message });
        if let Some(message) = message {
            fields.push(Attr::new("message", message));
        }

        span.extensions_mut().insert(SpanAttrs(fields));
    }

    fn on_record(&self, id: &Id, values: &Record<'_>, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };

        let mut fields = Vec::new();
        let mut message = None;
        values.record(&mut FieldVisitor { attrs: &mut fields, message: &mut message });
        if let Some(message) = message {
            fields.push(Attr::new("message", message));
        }

        let mut extensions = span.extensions_mut();
        match extensions.get_mut::<SpanAttrs>() {
            Some(existing) => {
                for attr in fields {
                    match existing.0.iter_mut().find(|a| a.key == attr.key) {
                        Some(slot) => slot.value = attr.value,
                        None => existing.0.push(attr),
                    }
                }
            }
            None => extensions.insert(SpanAttrs(fields)),
        }
    }

    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let level = Level::from(*event.metadata().level());
        if !self.handler.enabled(level) {
            return;
        }

        let mut handler = Arc::clone(&self.handler);
        if let Some(scope) = ctx.event_scope(event) {
            for span in scope.from_root() {
                if self.span_groups {
                    handler = handler.with_group(span.name());
                }
                let extensions = span.extensions();
                if let Some(SpanAttrs(fields)) = extensions.get::<SpanAttrs>() {
                    if !fields.is_empty() {
                        handler = handler.with_attrs(fields);
                    }
                }
            }
        }

        let record = self.record_from_event(event);
        if let Err(e) = handler.handle(&record) {
            eprintln!("log handler failed: {}", e);
        }
    }
}

/// Collects `tracing` fields as [`Attr`]s, pulling out `message`.
pub struct FieldVisitor<'a> {
    pub attrs: &'a mut Vec<Attr>,
    pub message: &'a mut Option<String>,
}

impl<'a> FieldVisitor<'a> {
    fn push(&mut self, field: &Field, value: serde_json::Value) {
        self.attrs.push(Attr::new(field.name(), value));
    }
}

impl<'a> Visit for FieldVisitor<'a> {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            *self.message = Some(value.to_string());
        } else {
            self.push(field, serde_json::Value::String(value.to_string()));
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.push(field, serde_json::Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.push(field, serde_json::Value::from(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.push(field, serde_json::Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.push(field, serde_json::Value::from(value));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        // `info!("text")` delivers the message as format_args, i.e. via Debug.
        if field.name() == "message" {
            *self.message = Some(format!("{:?}", value));
        } else {
            self.push(field, serde_json::Value::String(format!("{:?}", value)));
        }
    }
}
