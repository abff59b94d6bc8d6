//! Node identifier normalization.

use std::fmt;

use serde::Deserialize;
use serde::de::IgnoredAny;

/// A normalized graph node identifier.
///
/// Upstream graph documents mix integer, float and string identifiers
/// (`"stop_123"`, `"bixi_456"`). All of them collapse into a single `i64`
/// space at load time; see [`RawId::normalize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub i64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for NodeId {
    fn from(id: i64) -> Self {
        NodeId(id)
    }
}

/// An identifier exactly as it appeared in the source document.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Int(i64),
    Float(f64),
    Text(String),
    /// Null, booleans, objects: anything we can't interpret.
    Other(IgnoredAny),
}

impl Default for RawId {
    fn default() -> Self {
        RawId::Other(IgnoredAny)
    }
}

impl RawId {
    /// Collapse this identifier into a [`NodeId`].
    ///
    /// - integers pass through
    /// - floats truncate toward zero
    /// - strings go through [`parse_id_str`]
    /// - anything else is 0
    pub fn normalize(&self) -> NodeId {
        match self {
            RawId::Int(v) => NodeId(*v),
            RawId::Float(v) => NodeId(*v as i64),
            RawId::Text(s) => NodeId(parse_id_str(s)),
            RawId::Other(_) => NodeId(0),
        }
    }
}

impl From<RawId> for NodeId {
    fn from(raw: RawId) -> Self {
        raw.normalize()
    }
}

/// Parse a string identifier into an `i64`.
///
/// The first run of ASCII digits wins (`"stop_123"` → 123). Strings without
/// digits, or whose digit run overflows `i64`, fall back to a base-31 hash
/// over their code points. The hash never fails and is always non-negative.
/// It does not detect collisions.
pub fn parse_id_str(s: &str) -> i64 {
    match first_digit_run(s).and_then(|run| run.parse::<i64>().ok()) {
        Some(id) => id,
        None => {
            let hashed = hash_code_points(s);
            tracing::trace!(input = s, id = hashed, "hashed non-numeric node id");
            hashed
        }
    }
}

/// Returns the first maximal run of ASCII digits in `s`.
pub(crate) fn first_digit_run(s: &str) -> Option<&str> {
    let start = s.find(|c: char| c.is_ascii_digit())?;
    let rest = &s[start..];
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    Some(&rest[..end])
}

fn hash_code_points(s: &str) -> i64 {
    let hash = s.chars().fold(0i64, |acc, c| {
        acc.wrapping_mul(31).wrapping_add(i64::from(u32::from(c)))
    });
    // i64::MIN has no positive counterpart
    hash.checked_abs().unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(json: &str) -> RawId {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn integer_ids_pass_through() {
        assert_eq!(raw("42").normalize(), NodeId(42));
        assert_eq!(raw("-7").normalize(), NodeId(-7));
    }

    #[test]
    fn float_ids_truncate() {
        assert_eq!(raw("42.9").normalize(), NodeId(42));
    }

    #[test]
    fn numeric_strings_parse_directly() {
        assert_eq!(raw("\"123\"").normalize(), NodeId(123));
    }

    #[test]
    fn prefixed_strings_use_embedded_digits() {
        assert_eq!(parse_id_str("stop_123"), 123);
        assert_eq!(parse_id_str("bixi_456_north"), 456);
        assert_eq!(parse_id_str("n0042"), 42);
    }

    #[test]
    fn digit_free_strings_hash() {
        // "ab" = 97 * 31 + 98
        assert_eq!(parse_id_str("ab"), 97 * 31 + 98);
        assert_eq!(parse_id_str(""), 0);
    }

    #[test]
    fn overflowing_digit_run_falls_back_to_hash() {
        let id = parse_id_str("node_99999999999999999999999");
        assert!(id >= 0);
        assert_eq!(id, parse_id_str("node_99999999999999999999999"));
    }

    #[test]
    fn null_and_bool_normalize_to_zero() {
        assert_eq!(raw("null").normalize(), NodeId(0));
        assert_eq!(raw("true").normalize(), NodeId(0));
        assert_eq!(RawId::default().normalize(), NodeId(0));
    }

    #[test]
    fn first_digit_run_extraction() {
        assert_eq!(first_digit_run("abc"), None);
        assert_eq!(first_digit_run("a1b22"), Some("1"));
        assert_eq!(first_digit_run("50 mph"), Some("50"));
    }

    #[test]
    fn display() {
        assert_eq!(NodeId(17).to_string(), "17");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Same input, same id, every time.
        #[test]
        fn parse_is_deterministic(s in ".*") {
            prop_assert_eq!(parse_id_str(&s), parse_id_str(&s));
        }

        /// Digit-free input never fails and is never negative.
        #[test]
        fn alphabetic_input_is_non_negative(s in "[a-zA-Z_\\-éß]{0,64}") {
            prop_assert!(parse_id_str(&s) >= 0);
        }

        /// Any embedded non-negative integer is recovered.
        #[test]
        fn embedded_integer_recovered(prefix in "[a-z_]{0,8}", n in 0i64..=i64::MAX, suffix in "[a-z_]{0,8}") {
            let s = format!("{prefix}{n}{suffix}");
            prop_assert_eq!(parse_id_str(&s), n);
        }
    }
}
