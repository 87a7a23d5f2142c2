//! Core domain type definitions

use std::cmp::Ordering;
use std::fmt;

/// One VPN Gate relay as advertised by the server feed.
///
/// Records are immutable for the lifetime of a session: the table re-orders
/// them but never edits them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointRecord {
    pub host_name: String,
    pub ip: String,
    pub score: u64,
    /// Raw ping text. Usually an integer in milliseconds, but the feed uses
    /// `"-"` for relays it has not measured.
    pub ping: String,
    /// Advertised line speed in bits per second
    pub speed: u64,
    pub country_long: String,
    pub country_short: String,
    pub num_vpn_sessions: u64,
    /// Uptime in milliseconds
    pub uptime: u64,
    pub total_users: u64,
    pub total_traffic: u64,
    pub log_type: String,
    pub operator: String,
    pub message: String,
    /// Base64-encoded OpenVPN configuration
    pub config_base64: String,
}

impl EndpointRecord {
    /// Ping as an integer; unmeasured or malformed values count as zero
    pub fn ping_ms(&self) -> i64 {
        self.ping.trim().parse().unwrap_or(0)
    }
}

/// Column the server table is ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    Country,
    Ping,
    Speed,
    Score,
    Uptime,
    TotalUsers,
    TotalTraffic,
}

impl SortKey {
    /// All sortable columns, in display order
    pub const ALL: [SortKey; 7] = [
        SortKey::Country,
        SortKey::Ping,
        SortKey::Speed,
        SortKey::Score,
        SortKey::Uptime,
        SortKey::TotalUsers,
        SortKey::TotalTraffic,
    ];

    /// Key that toggles this column
    pub fn trigger(self) -> char {
        match self {
            SortKey::Country => 'c',
            SortKey::Ping => 'p',
            SortKey::Speed => 's',
            SortKey::Score => 'e',
            SortKey::Uptime => 'u',
            SortKey::TotalUsers => 't',
            SortKey::TotalTraffic => 'f',
        }
    }

    /// Reverse of [`SortKey::trigger`]
    pub fn from_trigger(c: char) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.trigger() == c)
    }

    /// Bare column label, including the trigger hint
    pub fn label(self) -> &'static str {
        match self {
            SortKey::Country => "Country(c)",
            SortKey::Ping => "Ping(p)",
            SortKey::Speed => "Speed(s)",
            SortKey::Score => "Score(e)",
            SortKey::Uptime => "Uptime(u)",
            SortKey::TotalUsers => "TotalUsers(t)",
            SortKey::TotalTraffic => "TotalTraffic(f)",
        }
    }

    /// Ascending comparison of two records under this key
    pub fn compare(self, a: &EndpointRecord, b: &EndpointRecord) -> Ordering {
        match self {
            SortKey::Country => a
                .country_short
                .to_ascii_lowercase()
                .cmp(&b.country_short.to_ascii_lowercase()),
            SortKey::Ping => a.ping_ms().cmp(&b.ping_ms()),
            SortKey::Speed => a.speed.cmp(&b.speed),
            SortKey::Score => a.score.cmp(&b.score),
            SortKey::Uptime => a.uptime.cmp(&b.uptime),
            SortKey::TotalUsers => a.total_users.cmp(&b.total_users),
            SortKey::TotalTraffic => a.total_traffic.cmp(&b.total_traffic),
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Ascending,
    Descending,
}

impl Direction {
    pub fn flipped(self) -> Self {
        match self {
            Direction::Ascending => Direction::Descending,
            Direction::Descending => Direction::Ascending,
        }
    }

    /// Glyph appended to the active column header
    pub fn glyph(self) -> char {
        match self {
            Direction::Ascending => '▲',
            Direction::Descending => '▼',
        }
    }
}

/// The single active (key, direction) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub key: SortKey,
    pub direction: Direction,
}

impl Default for SortOrder {
    fn default() -> Self {
        Self {
            key: SortKey::Score,
            direction: Direction::Descending,
        }
    }
}

impl SortOrder {
    /// Compare two records, honouring direction. Ties stay `Equal` in both
    /// directions so a stable sort keeps their relative order.
    pub fn compare(&self, a: &EndpointRecord, b: &EndpointRecord) -> Ordering {
        match self.direction {
            Direction::Ascending => self.key.compare(a, b),
            Direction::Descending => self.key.compare(b, a),
        }
    }
}

/// Lifecycle of the single tunnel process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Disconnecting,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
            ConnectionState::Disconnecting => "disconnecting",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(country: &str, ping: &str) -> EndpointRecord {
        EndpointRecord {
            country_short: country.to_string(),
            ping: ping.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_ping_sentinel_is_zero() {
        assert_eq!(record("JP", "-").ping_ms(), 0);
        assert_eq!(record("JP", "").ping_ms(), 0);
        assert_eq!(record("JP", "42").ping_ms(), 42);
    }

    #[test]
    fn test_country_compare_ignores_case() {
        let a = record("jp", "1");
        let b = record("JP", "1");
        assert_eq!(SortKey::Country.compare(&a, &b), Ordering::Equal);
    }

    #[test]
    fn test_trigger_roundtrip() {
        for key in SortKey::ALL {
            assert_eq!(SortKey::from_trigger(key.trigger()), Some(key));
        }
        assert_eq!(SortKey::from_trigger('x'), None);
    }

    #[test]
    fn test_default_sort_order() {
        let order = SortOrder::default();
        assert_eq!(order.key, SortKey::Score);
        assert_eq!(order.direction, Direction::Descending);
    }

    #[test]
    fn test_descending_keeps_ties_equal() {
        let order = SortOrder {
            key: SortKey::Ping,
            direction: Direction::Descending,
        };
        assert_eq!(
            order.compare(&record("JP", "-"), &record("KR", "0")),
            Ordering::Equal
        );
        assert_eq!(
            order.compare(&record("JP", "30"), &record("JP", "10")),
            Ordering::Less
        );
    }

    #[test]
    fn test_direction_glyphs_are_distinct() {
        assert_ne!(Direction::Ascending.glyph(), Direction::Descending.glyph());
        assert_eq!(Direction::Ascending.flipped(), Direction::Descending);
    }
}
