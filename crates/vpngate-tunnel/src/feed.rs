//! VPN Gate server list: HTTP fetch and CSV parsing
//!
//! The feed is a CSV document wrapped in marker lines:
//!
//! ```text
//! *vpn_servers
//! #HostName,IP,Score,Ping,Speed,CountryLong,CountryShort,NumVpnSessions,...
//! public-vpn-1,1.2.3.4,1000,12,90000000,Japan,JP,10,...
//! *
//! ```

use serde::Deserialize;
use vpngate_core::prelude::*;
use vpngate_core::EndpointRecord;

/// Public VPN Gate API endpoint
pub const DEFAULT_FEED_URL: &str = "http://www.vpngate.net/api/iphone";

/// Country filter value that keeps every server
pub const ALL_COUNTRIES: &str = "ALL";

const COLUMNS: [&str; 15] = [
    "HostName",
    "IP",
    "Score",
    "Ping",
    "Speed",
    "CountryLong",
    "CountryShort",
    "NumVpnSessions",
    "Uptime",
    "TotalUsers",
    "TotalTraffic",
    "LogType",
    "Operator",
    "Message",
    "OpenVPN_ConfigData_Base64",
];

/// Download and parse the server list
pub async fn fetch_servers(url: &str) -> Result<Vec<EndpointRecord>> {
    info!("Fetching server list from {}", url);

    let response = reqwest::get(url)
        .await
        .map_err(|e| Error::feed(format!("request to {} failed: {}", url, e)))?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::feed(format!("{} returned {}", url, status)));
    }

    let body = response
        .text()
        .await
        .map_err(|e| Error::feed(format!("failed to read response body: {}", e)))?;
    debug!("Feed body: {} bytes", body.len());

    let servers = parse_server_list(&body)?;
    info!("Parsed {} servers", servers.len());
    Ok(servers)
}

/// One feed row, keyed by the header names
#[derive(Debug, Deserialize)]
struct FeedRow {
    #[serde(rename = "HostName")]
    host_name: String,
    #[serde(rename = "IP")]
    ip: String,
    #[serde(rename = "Score")]
    score: u64,
    #[serde(rename = "Ping")]
    ping: String,
    #[serde(rename = "Speed")]
    speed: u64,
    #[serde(rename = "CountryLong")]
    country_long: String,
    #[serde(rename = "CountryShort")]
    country_short: String,
    // Informational only, kept as text so a bad value does not drop the row
    #[serde(rename = "NumVpnSessions")]
    num_vpn_sessions: String,
    #[serde(rename = "Uptime")]
    uptime: u64,
    #[serde(rename = "TotalUsers")]
    total_users: u64,
    #[serde(rename = "TotalTraffic")]
    total_traffic: u64,
    #[serde(rename = "LogType")]
    log_type: String,
    #[serde(rename = "Operator")]
    operator: String,
    #[serde(rename = "Message")]
    message: String,
    #[serde(rename = "OpenVPN_ConfigData_Base64")]
    config_base64: String,
}

impl From<FeedRow> for EndpointRecord {
    fn from(row: FeedRow) -> Self {
        Self {
            host_name: row.host_name,
            ip: row.ip,
            score: row.score,
            ping: row.ping,
            speed: row.speed,
            country_long: row.country_long,
            country_short: row.country_short,
            num_vpn_sessions: row.num_vpn_sessions.parse().unwrap_or(0),
            uptime: row.uptime,
            total_users: row.total_users,
            total_traffic: row.total_traffic,
            log_type: row.log_type,
            operator: row.operator,
            message: row.message,
            config_base64: row.config_base64,
        }
    }
}

/// Parse the feed body into records.
///
/// Malformed rows are skipped; a body without the `#HostName` header, or a
/// header missing a known column, is an error.
pub fn parse_server_list(body: &str) -> Result<Vec<EndpointRecord>> {
    let csv_text = strip_markers(body)?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Fields)
        .from_reader(csv_text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| Error::feed_parse(format!("unreadable header: {}", e)))?;
    if let Some(missing) = COLUMNS
        .iter()
        .find(|column| !headers.iter().any(|name| name == **column))
    {
        return Err(Error::feed_parse(format!("header has no {} column", missing)));
    }

    let mut servers = Vec::new();
    for row in reader.deserialize::<FeedRow>() {
        match row {
            Ok(row) => servers.push(row.into()),
            Err(e) => warn!("Skipping feed row: {}", e),
        }
    }

    Ok(servers)
}

/// Drop the `*` marker lines and blank lines, and the `#` in front of the
/// header, leaving plain CSV
fn strip_markers(body: &str) -> Result<String> {
    let mut lines = body
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty() && !line.starts_with('*'));

    let header = lines
        .next()
        .filter(|line| line.starts_with("#HostName"))
        .ok_or_else(|| Error::feed_parse("missing #HostName header"))?;

    let mut text = String::with_capacity(body.len());
    text.push_str(&header[1..]);
    for line in lines {
        text.push('\n');
        text.push_str(line);
    }
    Ok(text)
}

/// Keep servers in `country` (short code, any case). `"ALL"` keeps everything.
pub fn filter_by_country(records: Vec<EndpointRecord>, country: &str) -> Vec<EndpointRecord> {
    let country = country.trim();
    if country.eq_ignore_ascii_case(ALL_COUNTRIES) {
        return records;
    }
    records
        .into_iter()
        .filter(|r| r.country_short.eq_ignore_ascii_case(country))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "#HostName,IP,Score,Ping,Speed,CountryLong,CountryShort,NumVpnSessions,Uptime,TotalUsers,TotalTraffic,LogType,Operator,Message,OpenVPN_ConfigData_Base64";

    fn feed(rows: &[&str]) -> String {
        let mut body = format!("*vpn_servers\r\n{}\r\n", HEADER);
        for row in rows {
            body.push_str(row);
            body.push_str("\r\n");
        }
        body.push_str("*\r\n");
        body
    }

    #[test]
    fn test_parse_valid_rows() {
        let body = feed(&[
            "public-vpn-1,219.100.37.1,1205943,9,125184463,Japan,JP,38,2419180000,500000,90000000000000,2weeks,Daiyuu Nobori,,Y2xpZW50",
            "vpn2,1.2.3.4,10,-,100,Korea Republic of,KR,0,86400000,3,5,None,\"Op, Inc.\",hello,Y2xpZW50",
        ]);

        let servers = parse_server_list(&body).unwrap();
        assert_eq!(servers.len(), 2);

        let first = &servers[0];
        assert_eq!(first.host_name, "public-vpn-1");
        assert_eq!(first.ip, "219.100.37.1");
        assert_eq!(first.score, 1205943);
        assert_eq!(first.ping, "9");
        assert_eq!(first.country_short, "JP");
        assert_eq!(first.uptime, 2419180000);
        assert_eq!(first.total_traffic, 90000000000000);
        assert_eq!(first.config_base64, "Y2xpZW50");

        let second = &servers[1];
        assert_eq!(second.ping, "-");
        assert_eq!(second.operator, "Op, Inc.");
        assert_eq!(second.country_long, "Korea Republic of");
    }

    #[test]
    fn test_parse_skips_malformed_rows() {
        let body = feed(&[
            "short,row",
            "vpn,1.1.1.1,notanumber,1,1,Japan,JP,0,0,0,0,,,,AAAA",
            "ok,2.2.2.2,1,1,1,Japan,JP,0,0,0,0,,,,AAAA",
        ]);
        let servers = parse_server_list(&body).unwrap();
        assert_eq!(servers.len(), 1);
        assert_eq!(servers[0].host_name, "ok");
    }

    #[test]
    fn test_parse_missing_header() {
        let err = parse_server_list("*vpn_servers\nvpn,1.1.1.1\n*\n").unwrap_err();
        assert!(matches!(err, Error::FeedParse { .. }));

        let err = parse_server_list("").unwrap_err();
        assert!(matches!(err, Error::FeedParse { .. }));
    }

    #[test]
    fn test_parse_header_missing_column() {
        let err = parse_server_list("*vpn_servers\n#HostName,IP\n*\n").unwrap_err();
        assert!(matches!(err, Error::FeedParse { .. }));
    }

    #[test]
    fn test_parse_header_only() {
        let servers = parse_server_list(&feed(&[])).unwrap();
        assert!(servers.is_empty());
    }

    #[test]
    fn test_parse_quoted_field_spanning_lines() {
        let body = feed(&[
            "vpn,1.1.1.1,5,3,1,Japan,JP,0,0,0,0,,,\"first line\r\nsecond \"\"line\"\"\",AAAA",
            "ok,2.2.2.2,1,1,1,Japan,JP,x,0,0,0,,,,AAAA",
        ]);

        let servers = parse_server_list(&body).unwrap();
        assert_eq!(servers.len(), 2);
        assert_eq!(servers[0].message, "first line\nsecond \"line\"");
        assert_eq!(servers[0].config_base64, "AAAA");
        assert_eq!(servers[1].num_vpn_sessions, 0);
    }

    #[test]
    fn test_filter_by_country() {
        let records = vec![
            EndpointRecord {
                country_short: "JP".into(),
                ..Default::default()
            },
            EndpointRecord {
                country_short: "kr".into(),
                ..Default::default()
            },
            EndpointRecord {
                country_short: "jp".into(),
                ..Default::default()
            },
        ];

        assert_eq!(filter_by_country(records.clone(), "jp").len(), 2);
        assert_eq!(filter_by_country(records.clone(), "KR").len(), 1);
        assert_eq!(filter_by_country(records.clone(), "us").len(), 0);
        assert_eq!(filter_by_country(records, "all").len(), 3);
    }
}
