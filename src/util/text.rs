//! Parsing and formatting of form values.

use crate::{AppError, Result};
use std::str::FromStr;

/// Parse a number typed into a form, ignoring surrounding whitespace
pub fn parse_trimmed<T: FromStr>(field: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| AppError::Validation(format!("{} must be a number, got '{}'", field, value)))
}

/// Parse the "Yes"/"No" select value
pub fn parse_yes_no(value: &str) -> Result<bool> {
    match value {
        "Yes" => Ok(true),
        "No" => Ok(false),
        other => Err(AppError::Validation(format!(
            "expected 'Yes' or 'No', got '{}'",
            other
        ))),
    }
}

pub fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

/// Format points without a trailing ".0" for whole numbers
pub fn format_points(points: f64) -> String {
    if points.fract() == 0.0 {
        format!("{}", points as i64)
    } else {
        points.to_string()
    }
}
