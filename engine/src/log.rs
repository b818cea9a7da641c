use std::fmt;

use serde::{Deserialize, Serialize};

/// Styling hint for a log line; the renderer decides what each one looks like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogCategory {
    #[default]
    Default,
    Damage,
    Win,
    Loss,
    Special,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEvent {
    pub category: LogCategory,
    pub message: String,
}

impl LogEvent {
    pub fn new(category: LogCategory, message: impl Into<String>) -> Self {
        Self { category, message: message.into() }
    }

    pub fn plain(message: impl Into<String>) -> Self {
        Self::new(LogCategory::Default, message)
    }

    pub fn damage(message: impl Into<String>) -> Self {
        Self::new(LogCategory::Damage, message)
    }

    pub fn win(message: impl Into<String>) -> Self {
        Self::new(LogCategory::Win, message)
    }

    pub fn loss(message: impl Into<String>) -> Self {
        Self::new(LogCategory::Loss, message)
    }

    pub fn special(message: impl Into<String>) -> Self {
        Self::new(LogCategory::Special, message)
    }
}

impl fmt::Display for LogEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
