//! Default experiment names

use chrono::{DateTime, Local, TimeZone};

/// Prefix of generated experiment names
pub const NAME_PREFIX: &str = "THOR-exp";

/// Timestamp name such as `THOR-exp-2024_03_01_14_05_09`.
///
/// Fractional seconds are dropped; the result holds no path separators,
/// colons or periods.
pub fn timestamp_name<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("{}-{}", NAME_PREFIX, now.format("%Y_%m_%d_%H_%M_%S"))
}

/// The user's name if given, otherwise a timestamp name for the current time
pub fn experiment_name(name: Option<&str>) -> String {
    match name {
        Some(name) if !name.trim().is_empty() => name.to_string(),
        _ => timestamp_name(&Local::now()),
    }
}
