//! Log level definitions
//!
//! Levels form an open, ordered scale of signed integers. The named points
//! are spaced apart so that callers can define intermediate severities
//! (`LogLevel::new(1)` sits between `INFO` and `NOTICE` and renders as
//! `INFO+1`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LogLevel(i32);

/// Named points on the scale, ascending
const NAMED: [(LogLevel, &str); 8] = [
    (LogLevel::TRACE, "TRACE"),
    (LogLevel::DEBUG, "DEBUG"),
    (LogLevel::INFO, "INFO"),
    (LogLevel::NOTICE, "NOTICE"),
    (LogLevel::WARN, "WARN"),
    (LogLevel::ERROR, "ERROR"),
    (LogLevel::FATAL, "FATAL"),
    (LogLevel::PANIC, "PANIC"),
];

impl LogLevel {
    pub const TRACE: LogLevel = LogLevel(-8);
    pub const DEBUG: LogLevel = LogLevel(-4);
    pub const INFO: LogLevel = LogLevel(0);
    pub const NOTICE: LogLevel = LogLevel(2);
    pub const WARN: LogLevel = LogLevel(4);
    pub const ERROR: LogLevel = LogLevel(8);
    pub const FATAL: LogLevel = LogLevel(12);
    pub const PANIC: LogLevel = LogLevel(16);

    pub const fn new(value: i32) -> Self {
        LogLevel(value)
    }

    pub const fn value(&self) -> i32 {
        self.0
    }

    /// Name of the level if it is one of the named points on the scale
    pub fn name(&self) -> Option<&'static str> {
        NAMED
            .iter()
            .find(|(level, _)| level == self)
            .map(|(_, name)| *name)
    }

    pub fn is_named(&self) -> bool {
        self.name().is_some()
    }
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::INFO
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // nearest named level at or below this one, or TRACE for anything lower
        let (base, name) = NAMED
            .iter()
            .rev()
            .find(|(level, _)| level.0 <= self.0)
            .copied()
            .unwrap_or(NAMED[0]);

        let offset = i64::from(self.0) - i64::from(base.0);
        if offset == 0 {
            write!(f, "{}", name)
        } else {
            write!(f, "{}{:+}", name, offset)
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        let split = upper.find(['+', '-']).unwrap_or(upper.len());
        let (name, offset) = upper.split_at(split);

        let base = match name {
            "TRACE" => LogLevel::TRACE,
            "DEBUG" => LogLevel::DEBUG,
            "INFO" => LogLevel::INFO,
            "NOTICE" => LogLevel::NOTICE,
            "WARN" | "WARNING" => LogLevel::WARN,
            "ERROR" => LogLevel::ERROR,
            "FATAL" => LogLevel::FATAL,
            "PANIC" => LogLevel::PANIC,
            _ => return Err(format!("Invalid log level: '{}'", s)),
        };

        if offset.is_empty() {
            return Ok(base);
        }

        offset
            .parse::<i32>()
            .ok()
            .and_then(|delta| base.0.checked_add(delta))
            .map(LogLevel)
            .ok_or_else(|| format!("Invalid log level offset: '{}'", s))
    }
}

impl From<LogLevel> for String {
    fn from(level: LogLevel) -> Self {
        level.to_string()
    }
}

impl TryFrom<String> for LogLevel {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
