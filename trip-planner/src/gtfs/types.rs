//! GTFS record types.
//!
//! `Feed*` structs mirror CSV rows with every column optional and kept as
//! text; they are converted into the typed records once, at load.

use serde::Deserialize;

use crate::spatial::Coords;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub(crate) struct FeedStop {
    pub stop_id: String,
    pub stop_name: String,
    pub stop_lat: String,
    pub stop_lon: String,
    pub parent_station: String,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub(crate) struct FeedTrip {
    pub route_id: String,
    pub trip_id: String,
    pub direction_id: String,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub(crate) struct FeedStopTime {
    pub trip_id: String,
    pub stop_id: String,
    pub stop_sequence: String,
}

/// A stop or station.
#[derive(Debug, Clone, PartialEq)]
pub struct GtfsStop {
    pub id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Empty when the stop has no parent station.
    pub parent_station: String,
}

impl GtfsStop {
    pub fn coords(&self) -> Coords {
        (self.latitude, self.longitude)
    }
}

/// A single scheduled run of a route.
#[derive(Debug, Clone, PartialEq)]
pub struct GtfsTrip {
    pub id: String,
    pub route_id: String,
    /// 0 or 1 per the feed; anything unparseable is 0.
    pub direction: u8,
}

/// A visit of a trip to a stop.
#[derive(Debug, Clone, PartialEq)]
pub struct GtfsStopTime {
    pub trip_id: String,
    pub stop_id: String,
    pub sequence: u32,
}

/// The representative trip for a stop, as chosen by
/// [`GtfsIndex::choose_canonical_trip`](super::GtfsIndex::choose_canonical_trip).
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalTrip {
    pub trip_id: String,
    /// Empty if `trips.txt` has no row for the trip.
    pub route_id: String,
    pub direction: u8,
    pub stop_count: usize,
}

fn parse_or_zero<T: std::str::FromStr + Default>(raw: &str) -> T {
    raw.trim().parse().unwrap_or_default()
}

impl From<FeedStop> for GtfsStop {
    fn from(row: FeedStop) -> Self {
        Self {
            latitude: parse_or_zero(&row.stop_lat),
            longitude: parse_or_zero(&row.stop_lon),
            id: row.stop_id,
            name: row.stop_name,
            parent_station: row.parent_station,
        }
    }
}

impl From<FeedTrip> for GtfsTrip {
    fn from(row: FeedTrip) -> Self {
        Self {
            direction: parse_or_zero(&row.direction_id),
            id: row.trip_id,
            route_id: row.route_id,
        }
    }
}

impl From<FeedStopTime> for GtfsStopTime {
    fn from(row: FeedStopTime) -> Self {
        Self {
            sequence: parse_or_zero(&row.stop_sequence),
            trip_id: row.trip_id,
            stop_id: row.stop_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_numbers_degrade_to_zero() {
        let stop = GtfsStop::from(FeedStop {
            stop_id: "S1".into(),
            stop_lat: " 45.5 ".into(),
            stop_lon: "east".into(),
            ..Default::default()
        });
        assert_eq!(stop.latitude, 45.5);
        assert_eq!(stop.longitude, 0.0);

        let trip = GtfsTrip::from(FeedTrip {
            trip_id: "T1".into(),
            direction_id: "".into(),
            ..Default::default()
        });
        assert_eq!(trip.direction, 0);

        let stop_time = GtfsStopTime::from(FeedStopTime {
            stop_sequence: "-3".into(),
            ..Default::default()
        });
        assert_eq!(stop_time.sequence, 0);
    }
}
