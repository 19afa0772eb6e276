pub mod level;
pub mod record;
pub mod handler;
pub mod renderer;
pub mod console;
pub mod console_handler;
pub mod layer;

pub mod capture;
pub mod noop;

pub mod env;
pub mod init;

pub use console_handler::ConsoleHandler;
pub use handler::Handler;
pub use layer::HandlerLayer;
pub use level::Level;
pub use record::{Attr, LogRecord};
