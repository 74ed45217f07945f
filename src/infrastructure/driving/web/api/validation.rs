use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

/// Prefixes accepted for monitored addresses (mainnet and testnet payment
/// addresses).
const ADDRESS_PREFIXES: [&str; 2] = ["addr1", "addr_test1"];
const MIN_BODY_LENGTH: usize = 5;

/// Shallow bech32-shape check: accepted prefix followed by at least five
/// lowercase base32-alphabet characters. Deliberately not a checksum
/// verification; it only has to keep garbage out of the query layer.
pub fn is_valid_address(address: &str) -> bool {
    ADDRESS_PREFIXES.iter().any(|prefix| {
        address
            .strip_prefix(prefix)
            .is_some_and(|body| {
                body.len() >= MIN_BODY_LENGTH
                    && body.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
            })
    })
}

/// Accepts a plain ISO date (`2024-01-31`, taken at midnight UTC) or a full
/// RFC 3339 timestamp.
pub fn parse_date_param(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    raw.parse::<NaiveDate>().ok().map(|date| date.and_time(NaiveTime::MIN))
}
