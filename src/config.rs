//! Configuration: persisted user settings and logging level handling

mod settings;

pub use settings::{Settings, ThemeChoice};

use tracing::Level;

use crate::constants::logging::{DEFAULT_LEVEL, LEVELS};

/// Map a level name to a tracing level, if it is one we accept
pub fn parse_level(name: &str) -> Option<Level> {
    match name.trim().to_ascii_lowercase().as_str() {
        "error" => Some(Level::ERROR),
        "warn" => Some(Level::WARN),
        "info" => Some(Level::INFO),
        "debug" => Some(Level::DEBUG),
        "trace" => Some(Level::TRACE),
        _ => None,
    }
}

/// Level name normalized to lowercase, or the default when unknown
pub fn normalize_level(name: &str) -> String {
    let lower = name.trim().to_ascii_lowercase();
    if LEVELS.contains(&lower.as_str()) {
        lower
    } else {
        DEFAULT_LEVEL.to_string()
    }
}
