// src/present.rs

//! Plain-text rendering of driver results for terminal output.

use core::fmt::Display;

/// Renders one query result as a single line.
///
/// Success gives `"{name}: {value}{unit}"`, failure gives
/// `"Failed to read {name}: {error}"` with the name lowercased.
pub fn format_result<T, E>(name: &str, result: &Result<T, E>, unit: &str) -> String
where
    T: Display,
    E: Display,
{
    match result {
        Ok(value) => format!("{}: {}{}", name, value, unit),
        Err(e) => format!("Failed to read {}: {}", name.to_lowercase(), e),
    }
}
