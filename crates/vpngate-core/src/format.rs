//! Display conversions for the server table
//!
//! Both conversions truncate with integer division. The traffic divisor is
//! 10^12 even though the column is labelled "gb"; the feed's counter unit is
//! not documented, so the conversion is kept as-is rather than guessed at.

/// Milliseconds in one day
pub const MILLIS_PER_DAY: u64 = 60 * 60 * 24 * 1000;

/// Divisor applied to the total traffic counter
pub const BYTES_PER_GB: u64 = 1000 * 1000 * 1000 * 1000;

/// Format uptime (milliseconds) as whole days
pub fn uptime_to_string(uptime_ms: u64) -> String {
    format!("{} days", uptime_ms / MILLIS_PER_DAY)
}

/// Format the total traffic counter as whole "gb"
pub fn traffic_to_string(traffic: u64) -> String {
    format!("{} gb", traffic / BYTES_PER_GB)
}
