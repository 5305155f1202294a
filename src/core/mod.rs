//! Core logging types and traits

pub mod attrs;
pub mod error;
pub mod handler;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod record;
pub mod timestamp;
pub mod value;

pub use error::{Result, SinkError};
pub use handler::Handler;
pub use log_level::LogLevel;
pub use logger::Logger;
pub use metrics::DeliveryMetrics;
pub use record::{CallSite, Record};
pub use timestamp::TimestampFormat;
pub use value::{Attr, LogValuer, OpaqueValue, TextMarshaler, Value, ValueKind, MAX_RESOLVE_DEPTH};
