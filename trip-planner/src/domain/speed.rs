//! Speed limit normalization.

use serde::Deserialize;
use serde::de::IgnoredAny;

use super::ids::first_digit_run;

/// Speed assumed when the source value can't be interpreted, in km/h.
pub const DEFAULT_SPEED_KMH: f64 = 50.0;

/// A `maxspeed` value exactly as it appeared in the source document.
///
/// OSM-derived graphs carry numbers, strings like `"50 mph"`, and lists of
/// either when a way was merged from several segments.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawSpeed {
    Number(f64),
    Text(String),
    List(Vec<RawSpeed>),
    Other(IgnoredAny),
}

impl Default for RawSpeed {
    fn default() -> Self {
        RawSpeed::Other(IgnoredAny)
    }
}

impl RawSpeed {
    /// Normalize to km/h, falling back to [`DEFAULT_SPEED_KMH`].
    ///
    /// Lists use their first element. The unit in a string is ignored.
    pub fn kmh(&self) -> f64 {
        match self {
            RawSpeed::Number(v) if v.is_finite() => *v,
            RawSpeed::Text(s) => parse_speed_str(s),
            RawSpeed::List(items) => items.first().map_or(DEFAULT_SPEED_KMH, RawSpeed::kmh),
            _ => DEFAULT_SPEED_KMH,
        }
    }
}

/// Parse the leading integer run of a speed string.
pub fn parse_speed_str(s: &str) -> f64 {
    first_digit_run(s)
        .and_then(|run| run.parse::<f64>().ok())
        .unwrap_or(DEFAULT_SPEED_KMH)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kmh(json: &str) -> f64 {
        serde_json::from_str::<RawSpeed>(json).unwrap().kmh()
    }

    #[test]
    fn numbers_pass_through() {
        assert_eq!(kmh("30"), 30.0);
        assert_eq!(kmh("42.5"), 42.5);
    }

    #[test]
    fn strings_use_leading_integer() {
        assert_eq!(kmh("\"50 mph\""), 50.0);
        assert_eq!(kmh("\"70\""), 70.0);
        assert_eq!(kmh("\"CA:urban 40\""), 40.0);
    }

    #[test]
    fn lists_use_first_element() {
        assert_eq!(kmh("[\"30\", \"40\"]"), 30.0);
        assert_eq!(kmh("[[25], 90]"), 25.0);
        assert_eq!(kmh("[]"), DEFAULT_SPEED_KMH);
    }

    #[test]
    fn unparseable_values_default() {
        assert_eq!(kmh("null"), DEFAULT_SPEED_KMH);
        assert_eq!(kmh("\"walk\""), DEFAULT_SPEED_KMH);
        assert_eq!(kmh("{\"a\": 1}"), DEFAULT_SPEED_KMH);
        assert_eq!(RawSpeed::default().kmh(), DEFAULT_SPEED_KMH);
    }
}
