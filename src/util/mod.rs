//! Utility functions module
//!
//! Logging setup and small parsing/formatting helpers shared by the forms.

pub mod logging;
pub mod text;

// Re-export commonly used functions
pub use text::{format_points, parse_trimmed, parse_yes_no, yes_no};
