// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod api;
pub mod calendar;
pub mod chunk;
pub mod config;
pub mod metrics;
pub mod notify;
pub mod report;
pub mod scheduler;
pub mod translate;

// ---- Re-exports for stable public API ----
pub use crate::calendar::types::{CalendarSource, EconomicEvent, FilterCriteria, Impact};
pub use crate::chunk::split_message;
pub use crate::notify::ChannelSink;
pub use crate::report::{format_report, Report};
pub use crate::translate::Translator;
