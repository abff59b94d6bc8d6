//! Transport modes.

use std::fmt;

/// A way of getting around.
///
/// Parsing is total: unrecognized tags become [`TransportMode::Unknown`]
/// instead of failing, so a graph with an unexpected mode tag still loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportMode {
    Car,
    Walking,
    Biking,
    /// Docked bike-share (e.g. BIXI).
    BikeShare,
    PublicTransit,
    Unknown,
}

impl TransportMode {
    /// Parse a single mode token, case-insensitively.
    pub fn parse(token: &str) -> Self {
        match token.trim().to_ascii_lowercase().as_str() {
            "car" | "drive" | "driving" => TransportMode::Car,
            "walk" | "walking" | "foot" => TransportMode::Walking,
            "bike" | "biking" => TransportMode::Biking,
            "bixi" | "bikeshare" => TransportMode::BikeShare,
            "transit" | "publictransit" => TransportMode::PublicTransit,
            _ => TransportMode::Unknown,
        }
    }

    /// Parse an underscore-delimited composite tag such as `"car_walk"`.
    ///
    /// Empty tokens are dropped, so an empty tag yields no modes.
    pub fn parse_composite(tag: &str) -> Vec<Self> {
        tag.split('_')
            .filter(|token| !token.trim().is_empty())
            .map(Self::parse)
            .collect()
    }

    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportMode::Car => "car",
            TransportMode::Walking => "walking",
            TransportMode::Biking => "biking",
            TransportMode::BikeShare => "bikeshare",
            TransportMode::PublicTransit => "transit",
            TransportMode::Unknown => "unknown",
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_tokens() {
        assert_eq!(TransportMode::parse("car"), TransportMode::Car);
        assert_eq!(TransportMode::parse("WALK"), TransportMode::Walking);
        assert_eq!(TransportMode::parse("walking"), TransportMode::Walking);
        assert_eq!(TransportMode::parse("bike"), TransportMode::Biking);
        assert_eq!(TransportMode::parse("bixi"), TransportMode::BikeShare);
        assert_eq!(TransportMode::parse("transit"), TransportMode::PublicTransit);
    }

    #[test]
    fn unknown_token_is_sentinel() {
        assert_eq!(TransportMode::parse("zeppelin"), TransportMode::Unknown);
        assert_eq!(TransportMode::parse(""), TransportMode::Unknown);
    }

    #[test]
    fn composite_tags() {
        assert_eq!(
            TransportMode::parse_composite("car_walk"),
            vec![TransportMode::Car, TransportMode::Walking]
        );
        assert_eq!(
            TransportMode::parse_composite("car_zeppelin"),
            vec![TransportMode::Car, TransportMode::Unknown]
        );
        assert_eq!(
            TransportMode::parse_composite("walk"),
            vec![TransportMode::Walking]
        );
        assert!(TransportMode::parse_composite("").is_empty());
    }

    #[test]
    fn display_roundtrips_through_parse() {
        for mode in [
            TransportMode::Car,
            TransportMode::Walking,
            TransportMode::Biking,
            TransportMode::BikeShare,
            TransportMode::PublicTransit,
        ] {
            assert_eq!(TransportMode::parse(&mode.to_string()), mode);
        }
    }
}
