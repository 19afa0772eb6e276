use std::error::Error;
use std::sync::Arc;

use serde_json::json;
use tracing_console_handler::capture::CaptureRenderer;
use tracing_console_handler::level::LevelMethod;
use tracing_console_handler::{Attr, ConsoleHandler, Handler, HandlerLayer, Level, LogRecord};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

fn capture_layer(min_level: Level) -> (HandlerLayer, CaptureRenderer) {
    let capture = CaptureRenderer::new();
    let handler = ConsoleHandler::new(Arc::new(capture.clone()), min_level);
    (HandlerLayer::new(Arc::new(handler)), capture)
}

fn run<F: FnOnce()>(layer: HandlerLayer, f: F) {
    let subscriber = Registry::default().with(layer);
    tracing::subscriber::with_default(subscriber, f);
}

#[test]
fn warn_event_is_forwarded_with_fields() {
    let (layer, capture) = capture_layer(Level::INFO);

    run(layer.with_source(false), || {
        tracing::warn!(path = "/tmp", "disk full");
    });

    let entries = capture.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].method, LevelMethod::Warn);
    assert_eq!(entries[0].message, "disk full");
    assert_eq!(entries[0].pairs(), vec![("path", &json!("/tmp"))]);
}

#[test]
fn events_below_threshold_are_dropped() {
    let (layer, capture) = capture_layer(Level::INFO);

    run(layer, || {
        tracing::debug!("hidden");
        tracing::trace!("hidden too");
        tracing::info!("shown");
    });

    let entries = capture.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].message, "shown");
}

#[test]
fn callsite_location_becomes_trailing_source_field() {
    let (layer, capture) = capture_layer(Level::INFO);

    run(layer, || {
        tracing::error!(code = 500u64, "failed");
    });

    let entries = capture.entries();
    let fields = &entries[0].fields;
    assert_eq!(fields.len(), 2);
    assert_eq!(fields[0], Attr::new("code", 500));
    assert_eq!(fields[1].key, "source");

    let source = fields[1].value.as_str().unwrap();
    let (file, line) = source.rsplit_once(':').unwrap();
    assert!(file.ends_with("layer.rs"), "unexpected file {}", file);
    assert!(line.parse::<u32>().unwrap() > 0);
}

#[test]
fn formatted_messages_and_typed_values() {
    let (layer, capture) = capture_layer(Level::DEBUG);

    run(layer.with_source(false), || {
        tracing::debug!(ratio = 0.5, ok = true, delta = -3i64, list = ?vec![1, 2], "count {}", 3);
    });

    let entries = capture.entries();
    assert_eq!(entries[0].method, LevelMethod::Debug);
    assert_eq!(entries[0].message, "count 3");
    assert_eq!(
        entries[0].pairs(),
        vec![
            ("ratio", &json!(0.5)),
            ("ok", &json!(true)),
            ("delta", &json!(-3)),
            ("list", &json!("[1, 2]")),
        ]
    );
}

#[test]
fn spans_open_groups_and_bind_their_fields() {
    let (layer, capture) = capture_layer(Level::INFO);

    run(layer.with_source(false), || {
        let span = tracing::info_span!("req", id = 7u64);
        let _enter = span.enter();
        let inner = tracing::info_span!("db");
        let _inner = inner.enter();
        tracing::info!(user = "bob", "query");
    });

    let entries = capture.entries();
    assert_eq!(
        entries[0].pairs(),
        vec![("req.id", &json!(7)), ("req.db.user", &json!("bob"))]
    );
}

#[test]
fn span_groups_can_be_disabled() {
    let (layer, capture) = capture_layer(Level::INFO);

    run(layer.with_source(false).with_span_groups(false), || {
        let span = tracing::info_span!("req", id = 7u64);
        let _enter = span.enter();
        tracing::info!(user = "bob", "query");
    });

    assert_eq!(
        capture.entries()[0].pairs(),
        vec![("id", &json!(7)), ("user", &json!("bob"))]
    );
}

#[test]
fn fields_recorded_after_span_creation_are_included() {
    let (layer, capture) = capture_layer(Level::INFO);

    run(layer.with_source(false), || {
        let span = tracing::info_span!("job", attempt = tracing::field::Empty);
        span.record("attempt", 2u64);
        let _enter = span.enter();
        tracing::info!("retrying");
    });

    assert_eq!(capture.entries()[0].pairs(), vec![("job.attempt", &json!(2))]);
}

#[test]
fn events_outside_spans_are_not_affected_by_earlier_spans() {
    let (layer, capture) = capture_layer(Level::INFO);

    run(layer.with_source(false), || {
        {
            let span = tracing::info_span!("req", id = 1u64);
            let _enter = span.enter();
            tracing::info!("inside");
        }
        tracing::info!(k = 1u64, "outside");
    });

    let entries = capture.entries();
    assert_eq!(entries[1].pairs(), vec![("k", &json!(1))]);
}

#[test]
fn trace_level_routes_to_print_when_enabled() {
    let (layer, capture) = capture_layer(Level::TRACE);

    run(layer.with_source(false), || {
        tracing::trace!("very detailed");
    });

    let entries = capture.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].method, LevelMethod::Print);
}

struct FailingHandler;

impl Handler for FailingHandler {
    fn enabled(&self, _level: Level) -> bool {
        true
    }

    fn handle(&self, _record: &LogRecord) -> Result<(), Box<dyn Error + Send + Sync>> {
        Err("backend unavailable".into())
    }

    fn with_attrs(&self, _attrs: &[Attr]) -> Arc<dyn Handler> {
        Arc::new(FailingHandler)
    }

    fn with_group(&self, _name: &str) -> Arc<dyn Handler> {
        Arc::new(FailingHandler)
    }
}

#[test]
fn handler_failures_do_not_reach_the_caller() {
    run(HandlerLayer::new(Arc::new(FailingHandler)), || {
        tracing::error!("still fine");
    });
}
