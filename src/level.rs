use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Ordered log severity.
///
/// Levels are plain integers so that handlers can work with severities
/// between (or beyond) the four named ones. Larger means more severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Level(pub i32);

impl Level {
    pub const TRACE: Level = Level(-8);
    pub const DEBUG: Level = Level(-4);
    pub const INFO: Level = Level(0);
    pub const WARN: Level = Level(4);
    pub const ERROR: Level = Level(8);

    /// Renderer method a record of this level is dispatched to.
    pub fn method(self) -> LevelMethod {
        match self {
            Level::DEBUG => LevelMethod::Debug,
            Level::INFO => LevelMethod::Info,
            Level::WARN => LevelMethod::Warn,
            Level::ERROR => LevelMethod::Error,
            _ => LevelMethod::Print,
        }
    }
}

impl Default for Level {
    fn default() -> Self {
        Level::INFO
    }
}

impl From<tracing::Level> for Level {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::TRACE => Level::TRACE,
            tracing::Level::DEBUG => Level::DEBUG,
            tracing::Level::INFO => Level::INFO,
            tracing::Level::WARN => Level::WARN,
            tracing::Level::ERROR => Level::ERROR,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (base, anchor) = if *self < Level::INFO {
            ("DEBUG", Level::DEBUG)
        } else if *self < Level::WARN {
            ("INFO", Level::INFO)
        } else if *self < Level::ERROR {
            ("WARN", Level::WARN)
        } else {
            ("ERROR", Level::ERROR)
        };

        let offset = self.0 - anchor.0;
        if offset == 0 {
            f.write_str(base)
        } else {
            write!(f, "{}{:+}", base, offset)
        }
    }
}

impl Serialize for Level {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Error returned when a level string cannot be parsed.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum LevelParseError {
    #[error("unknown level name: {0:?}")]
    UnknownName(String),

    #[error("invalid level offset in {0:?}")]
    InvalidOffset(String),
}

/// Parses `DEBUG`, `info`, `WARN+2`, `error-1` and so on.
/// `warning` is accepted as an alias for `warn`.
impl FromStr for Level {
    type Err = LevelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (name, offset) = match trimmed.find(['+', '-']) {
            Some(idx) => (&trimmed[..idx], Some(&trimmed[idx..])),
            None => (trimmed, None),
        };

        let base = match name.to_ascii_lowercase().as_str() {
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" | "warning" => Level::WARN,
            "error" => Level::ERROR,
            _ => return Err(LevelParseError::UnknownName(s.to_string())),
        };

        match offset {
            None => Ok(base),
            Some(raw) => raw
                .parse::<i32>()
                .ok()
                .and_then(|delta| base.0.checked_add(delta))
                .map(Level)
                .ok_or_else(|| LevelParseError::InvalidOffset(s.to_string())),
        }
    }
}

/// The closed set of output methods a renderer exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelMethod {
    Debug,
    Info,
    Warn,
    Error,
    Print,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_levels_are_ordered() {
        assert!(Level::TRACE < Level::DEBUG);
        assert!(Level::DEBUG < Level::INFO);
        assert!(Level::INFO < Level::WARN);
        assert!(Level::WARN < Level::ERROR);
    }

    #[test]
    fn method_mapping_defaults_to_print() {
        assert_eq!(Level::DEBUG.method(), LevelMethod::Debug);
        assert_eq!(Level::INFO.method(), LevelMethod::Info);
        assert_eq!(Level::WARN.method(), LevelMethod::Warn);
        assert_eq!(Level::ERROR.method(), LevelMethod::Error);
        assert_eq!(Level(2).method(), LevelMethod::Print);
        assert_eq!(Level::TRACE.method(), LevelMethod::Print);
        assert_eq!(Level(12).method(), LevelMethod::Print);
    }

    #[test]
    fn display_uses_nearest_lower_name_with_offset() {
        assert_eq!(Level::INFO.to_string(), "INFO");
        assert_eq!(Level(6).to_string(), "WARN+2");
        assert_eq!(Level::TRACE.to_string(), "DEBUG-4");
        assert_eq!(Level(9).to_string(), "ERROR+1");
    }

    #[test]
    fn parse_accepts_names_and_offsets() {
        assert_eq!("info".parse::<Level>(), Ok(Level::INFO));
        assert_eq!("WARNING".parse::<Level>(), Ok(Level::WARN));
        assert_eq!(" Error ".parse::<Level>(), Ok(Level::ERROR));
        assert_eq!("WARN+2".parse::<Level>(), Ok(Level(6)));
        assert_eq!("debug-4".parse::<Level>(), Ok(Level::TRACE));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(
            "loud".parse::<Level>(),
            Err(LevelParseError::UnknownName("loud".to_string()))
        );
        assert_eq!(
            "info+x".parse::<Level>(),
            Err(LevelParseError::InvalidOffset("info+x".to_string()))
        );
    }

    #[test]
    fn converts_from_tracing_levels() {
        assert_eq!(Level::from(tracing::Level::TRACE), Level::TRACE);
        assert_eq!(Level::from(tracing::Level::WARN), Level::WARN);
        assert_eq!(Level::from(tracing::Level::ERROR), Level::ERROR);
    }

    #[test]
    fn serializes_as_display_string() {
        let v = serde_json::to_value(Level(6)).unwrap();
        assert_eq!(v, serde_json::Value::String("WARN+2".to_string()));
    }
}
