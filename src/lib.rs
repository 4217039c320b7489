//! # Esports Stats
//!
//! Match statistics, streaks and achievements for an esports team fan
//! dashboard.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (matches, derived stats, achievements)
//! - **calculate**: The stats engine: outcome classification, streaks,
//!   tournament breakdowns and achievement rules
//! - **feed**: Match feed normalization, HTTP client and match sources
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod calculate;
pub mod config;
pub mod feed;
pub mod models;

pub use models::*;

use std::time::Duration;

/// Parse a cache TTL such as "5m", "1h" or "90s". A bare number is taken
/// as seconds.
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    let (digits, unit_secs) = match s.char_indices().last()? {
        (i, 'h') => (&s[..i], 3600),
        (i, 'm') => (&s[..i], 60),
        (i, 's') => (&s[..i], 1),
        _ => (s, 1),
    };

    let n: u64 = digits.trim().parse().ok()?;
    n.checked_mul(unit_secs).map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration_units() {
        let cases = [
            ("5m", 300),
            ("1h", 3600),
            ("90s", 90),
            ("120", 120),
            (" 10m ", 600),
            ("0s", 0),
        ];
        for (input, secs) in cases {
            assert_eq!(parse_duration(input), Some(Duration::from_secs(secs)), "{input}");
        }
    }

    #[test]
    fn test_parse_duration_invalid() {
        for input in ["", "m", "soon", "5d", "-5m", "1.5h"] {
            assert_eq!(parse_duration(input), None, "{input}");
        }
    }

    #[test]
    fn test_parse_duration_overflow() {
        assert_eq!(parse_duration(&format!("{}h", u64::MAX)), None);
    }
}
