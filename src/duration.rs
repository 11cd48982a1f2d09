//! Compound unit-suffix durations such as `2h45m` or `1.5s`.
//!
//! [`parse`] accepts a sequence of decimal numbers, each followed by a unit
//! (`ns`, `us`, `µs`, `ms`, `s`, `m`, `h`). The bare string `0` is also
//! accepted. [`format`] produces the canonical form (`2h45m0s`, `1.5ms`, `0s`).
//!
//! The module doubles as a serde `with` module for [`std::time::Duration`]
//! fields:
//!
//! ```rust
//! use csgo_cfg::load;
//! use serde::{Deserialize, Serialize};
//! use std::time::Duration;
//!
//! #[derive(Serialize, Deserialize, Default)]
//! struct Round {
//!     #[serde(with = "csgo_cfg::duration")]
//!     freeze_time: Duration,
//! }
//!
//! let cfg = load(b"freeze_time 2h45m".as_slice()).unwrap();
//! let mut round = Round::default();
//! cfg.map_to(&mut round).unwrap();
//! assert_eq!(round.freeze_time, Duration::from_secs(2 * 3600 + 45 * 60));
//! ```

use serde::{de, Deserializer, Serializer};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// The text is not a valid duration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid duration {text:?}: {reason}")]
pub struct ParseDurationError {
    text: String,
    reason: &'static str,
}

const NANOS_PER_SEC: u128 = 1_000_000_000;

fn unit_nanos(unit: &str) -> Option<u128> {
    match unit {
        "ns" => Some(1),
        "us" | "µs" | "μs" => Some(1_000),
        "ms" => Some(1_000_000),
        "s" => Some(NANOS_PER_SEC),
        "m" => Some(60 * NANOS_PER_SEC),
        "h" => Some(3_600 * NANOS_PER_SEC),
        _ => None,
    }
}

/// Parses a duration like `2h45m`, `300ms` or `1.5s`.
///
/// ```rust
/// use std::time::Duration;
///
/// assert_eq!(csgo_cfg::duration::parse("1m30s").unwrap(), Duration::from_secs(90));
/// assert!(csgo_cfg::duration::parse("90").is_err());
/// ```
pub fn parse(text: &str) -> Result<Duration, ParseDurationError> {
    let fail = |reason| ParseDurationError {
        text: text.to_string(),
        reason,
    };
    let s = text.trim();
    if s == "0" {
        return Ok(Duration::ZERO);
    }
    if s.is_empty() {
        return Err(fail("empty"));
    }

    let mut total: u128 = 0;
    let mut rest = s;
    while !rest.is_empty() {
        let whole_len = rest.bytes().take_while(u8::is_ascii_digit).count();
        let whole = &rest[..whole_len];
        rest = &rest[whole_len..];

        let mut frac = "";
        if let Some(after_dot) = rest.strip_prefix('.') {
            let frac_len = after_dot.bytes().take_while(u8::is_ascii_digit).count();
            frac = &after_dot[..frac_len];
            rest = &after_dot[frac_len..];
        }
        if whole.is_empty() && frac.is_empty() {
            return Err(fail("expected a number"));
        }

        let unit_len = rest
            .char_indices()
            .find(|(_, c)| c.is_ascii_digit() || *c == '.')
            .map_or(rest.len(), |(i, _)| i);
        if unit_len == 0 {
            return Err(fail("missing unit"));
        }
        let scale = unit_nanos(&rest[..unit_len]).ok_or_else(|| fail("unknown unit"))?;
        rest = &rest[unit_len..];

        let whole: u128 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| fail("number out of range"))?
        };
        let mut amount = whole.checked_mul(scale).ok_or_else(|| fail("overflow"))?;
        if !frac.is_empty() {
            // Digits past nanosecond precision cannot change the result.
            let digits = &frac[..frac.len().min(18)];
            let numerator: u128 = digits.parse().map_err(|_| fail("number out of range"))?;
            amount += numerator * scale / 10u128.pow(digits.len() as u32);
        }
        total = total.checked_add(amount).ok_or_else(|| fail("overflow"))?;
    }

    let secs = u64::try_from(total / NANOS_PER_SEC).map_err(|_| fail("overflow"))?;
    Ok(Duration::new(secs, (total % NANOS_PER_SEC) as u32))
}

fn fraction(value: u128, unit: u128) -> String {
    let whole = value / unit;
    let rem = value % unit;
    if rem == 0 {
        return whole.to_string();
    }
    let width = unit.to_string().len() - 1;
    let digits = format!("{rem:0width$}");
    format!("{whole}.{}", digits.trim_end_matches('0'))
}

/// Formats a duration in its canonical compound form.
///
/// ```rust
/// use std::time::Duration;
///
/// assert_eq!(csgo_cfg::duration::format(Duration::from_secs(9900)), "2h45m0s");
/// assert_eq!(csgo_cfg::duration::format(Duration::from_micros(1500)), "1.5ms");
/// ```
#[must_use]
pub fn format(duration: Duration) -> String {
    let nanos = duration.as_nanos();
    match nanos {
        0 => "0s".to_string(),
        1..=999 => format!("{nanos}ns"),
        1_000..=999_999 => format!("{}µs", fraction(nanos, 1_000)),
        1_000_000..=999_999_999 => format!("{}ms", fraction(nanos, 1_000_000)),
        _ => {
            let secs = duration.as_secs();
            let (hours, minutes, seconds) = (secs / 3600, secs % 3600 / 60, secs % 60);
            let mut out = String::new();
            if hours > 0 {
                out.push_str(&format!("{hours}h"));
            }
            if hours > 0 || minutes > 0 {
                out.push_str(&format!("{minutes}m"));
            }
            let sub = u128::from(seconds) * NANOS_PER_SEC + u128::from(duration.subsec_nanos());
            out.push_str(&fraction(sub, NANOS_PER_SEC));
            out.push('s');
            out
        }
    }
}

/// Serializes a [`Duration`] field in its compound text form.
pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format(*duration))
}

/// Deserializes a [`Duration`] field from its compound text form.
pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    struct DurationVisitor;

    impl<'de> de::Visitor<'de> for DurationVisitor {
        type Value = Duration;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a duration such as 2h45m")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Duration, E> {
            parse(v).map_err(E::custom)
        }
    }

    deserializer.deserialize_str(DurationVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_units() {
        assert_eq!(parse("2h45m").unwrap(), Duration::from_secs(9900));
        assert_eq!(parse("300ms").unwrap(), Duration::from_millis(300));
        assert_eq!(parse("1.5s").unwrap(), Duration::from_millis(1500));
        assert_eq!(parse("10us").unwrap(), Duration::from_micros(10));
        assert_eq!(parse("10µs").unwrap(), Duration::from_micros(10));
        assert_eq!(parse("7ns").unwrap(), Duration::from_nanos(7));
        assert_eq!(parse(".5m").unwrap(), Duration::from_secs(30));
        assert_eq!(parse("0").unwrap(), Duration::ZERO);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for bad in ["", "h", "10", "10x", "-5s", "1..5s", "s10"] {
            assert!(parse(bad).is_err(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn test_format() {
        assert_eq!(format(Duration::ZERO), "0s");
        assert_eq!(format(Duration::from_nanos(12)), "12ns");
        assert_eq!(format(Duration::from_secs(90)), "1m30s");
        assert_eq!(format(Duration::from_millis(1500)), "1.5s");
        assert_eq!(format(Duration::from_secs(3600)), "1h0m0s");
    }

    #[test]
    fn test_format_parses_back() {
        for d in [
            Duration::from_nanos(1),
            Duration::from_micros(1234),
            Duration::from_millis(999),
            Duration::new(9900, 250_000_000),
        ] {
            assert_eq!(parse(&format(d)).unwrap(), d);
        }
    }
}
