use std::sync::Arc;

use tracing::{error, info};
use tracing_console_handler::record::Attr;
use tracing_console_handler::renderer::Renderer;
use tracing_console_handler::{ConsoleHandler, HandlerLayer, Level};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

/// Example of plugging a completely custom output backend under the
/// handler by implementing the `Renderer` trait directly. This one emits
/// one JSON object per line.
#[derive(Clone, Default)]
struct JsonLinesRenderer {
    bound: Vec<Attr>,
}

impl JsonLinesRenderer {
    fn emit(&self, level: &str, message: &str, fields: &[Attr]) {
        let mut object = serde_json::Map::new();
        object.insert("level".to_string(), level.into());
        object.insert("msg".to_string(), message.into());
        for attr in self.bound.iter().chain(fields) {
            object.insert(attr.key.clone(), attr.value.clone());
        }
        println!("{}", serde_json::Value::Object(object));
    }
}

impl Renderer for JsonLinesRenderer {
    fn debug(&self, message: &str, fields: &[Attr]) {
        self.emit("debug", message, fields);
    }

    fn info(&self, message: &str, fields: &[Attr]) {
        self.emit("info", message, fields);
    }

    fn warn(&self, message: &str, fields: &[Attr]) {
        self.emit("warn", message, fields);
    }

    fn error(&self, message: &str, fields: &[Attr]) {
        self.emit("error", message, fields);
    }

    fn print(&self, message: &str, fields: &[Attr]) {
        self.emit("", message, fields);
    }

    fn with(&self, fields: Vec<Attr>) -> Arc<dyn Renderer> {
        let mut bound = self.bound.clone();
        bound.extend(fields);
        Arc::new(JsonLinesRenderer { bound })
    }
}

fn main() {
    let handler = ConsoleHandler::new(Arc::new(JsonLinesRenderer::default()), Level::DEBUG);
    let subscriber = Registry::default().with(HandlerLayer::new(Arc::new(handler)));
    tracing::subscriber::set_global_default(subscriber).expect("set global subscriber");

    info!("custom renderer example started");
    error!(db = "my-custom-db", "simulated error rendered as json");
}
