//! Report rendering: terminal text, raw CSV sample dumps, JSON.

pub mod csv;
pub mod json;
mod terminal;

pub use terminal::{format_header, format_metric, format_report, format_timer, format_verification_failure};
