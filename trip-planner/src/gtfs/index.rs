//! In-memory GTFS index.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::info;

use super::types::{FeedStop, FeedStopTime, FeedTrip};
use super::{CanonicalTrip, GtfsError, GtfsStop, GtfsStopTime, GtfsTrip};
use crate::spatial::haversine_m;

const STOPS_FILE: &str = "stops.txt";
const TRIPS_FILE: &str = "trips.txt";
const STOP_TIMES_FILE: &str = "stop_times.txt";

/// A read-only index over `stops.txt`, `trips.txt` and `stop_times.txt`.
///
/// Stop times for each trip are sorted by sequence once, at load.
#[derive(Debug, Default)]
pub struct GtfsIndex {
    stops_by_id: HashMap<String, GtfsStop>,
    trips_by_id: HashMap<String, GtfsTrip>,
    stop_times_by_trip: HashMap<String, Vec<GtfsStopTime>>,
    trips_by_stop: HashMap<String, Vec<String>>,
    routes_by_direction: HashMap<String, HashMap<u8, Vec<String>>>,
}

impl GtfsIndex {
    /// Load the feed in `dir`.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, GtfsError> {
        let dir = dir.as_ref();
        let open = |name: &str| {
            let path = dir.join(name);
            File::open(&path).map_err(|e| GtfsError::Load {
                message: e.to_string(),
                path,
            })
        };

        let index = Self::build(
            read_rows(open(STOPS_FILE)?, dir.join(STOPS_FILE))?,
            read_rows(open(TRIPS_FILE)?, dir.join(TRIPS_FILE))?,
            read_rows(open(STOP_TIMES_FILE)?, dir.join(STOP_TIMES_FILE))?,
        );
        info!(
            dir = %dir.display(),
            stops = index.stop_count(),
            trips = index.trip_count(),
            "loaded GTFS feed"
        );
        Ok(index)
    }

    /// Build an index from already-open readers, one per feed file.
    pub fn from_readers<S: Read, T: Read, ST: Read>(
        stops: S,
        trips: T,
        stop_times: ST,
    ) -> Result<Self, GtfsError> {
        Ok(Self::build(
            read_rows(stops, PathBuf::from(STOPS_FILE))?,
            read_rows(trips, PathBuf::from(TRIPS_FILE))?,
            read_rows(stop_times, PathBuf::from(STOP_TIMES_FILE))?,
        ))
    }

    fn build(stops: Vec<FeedStop>, trips: Vec<FeedTrip>, stop_times: Vec<FeedStopTime>) -> Self {
        let mut index = Self::default();

        for row in stops {
            if row.stop_id.is_empty() {
                continue;
            }
            let stop = GtfsStop::from(row);
            index.stops_by_id.insert(stop.id.clone(), stop);
        }

        for row in trips {
            if row.trip_id.is_empty() {
                continue;
            }
            let trip = GtfsTrip::from(row);
            index
                .routes_by_direction
                .entry(trip.route_id.clone())
                .or_default()
                .entry(trip.direction)
                .or_default()
                .push(trip.id.clone());
            index.trips_by_id.insert(trip.id.clone(), trip);
        }

        for row in stop_times {
            if row.trip_id.is_empty() || row.stop_id.is_empty() {
                continue;
            }
            let stop_time = GtfsStopTime::from(row);
            index
                .trips_by_stop
                .entry(stop_time.stop_id.clone())
                .or_default()
                .push(stop_time.trip_id.clone());
            index
                .stop_times_by_trip
                .entry(stop_time.trip_id.clone())
                .or_default()
                .push(stop_time);
        }

        for times in index.stop_times_by_trip.values_mut() {
            times.sort_by_key(|st| st.sequence);
        }
        for trips in index.trips_by_stop.values_mut() {
            trips.sort();
            trips.dedup();
        }

        index
    }

    pub fn stop(&self, stop_id: &str) -> Option<&GtfsStop> {
        self.stops_by_id.get(stop_id)
    }

    pub fn trip(&self, trip_id: &str) -> Option<&GtfsTrip> {
        self.trips_by_id.get(trip_id)
    }

    /// Stop times of a trip in ascending sequence order.
    pub fn stop_times(&self, trip_id: &str) -> &[GtfsStopTime] {
        self.stop_times_by_trip
            .get(trip_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Trips serving a stop, sorted by id.
    pub fn trips_for_stop(&self, stop_id: &str) -> &[String] {
        self.trips_by_stop
            .get(stop_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Trips of a route in one direction, in feed order.
    pub fn trips_for_route(&self, route_id: &str, direction: u8) -> &[String] {
        self.routes_by_direction
            .get(route_id)
            .and_then(|by_direction| by_direction.get(&direction))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn stop_count(&self) -> usize {
        self.stops_by_id.len()
    }

    pub fn trip_count(&self) -> usize {
        self.trips_by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops_by_id.is_empty()
    }

    /// Nearest stop to a point and its distance in meters.
    pub fn find_closest_stop(&self, lat: f64, lon: f64) -> Option<(&GtfsStop, f64)> {
        self.stops_by_id
            .values()
            .map(|stop| (stop, haversine_m((lat, lon), stop.coords())))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }

    /// The longest trip serving `stop_id`.
    ///
    /// Ties go to the lowest trip id.
    pub fn choose_canonical_trip(&self, stop_id: &str) -> Result<CanonicalTrip, GtfsError> {
        let no_trip = || GtfsError::NoTripForStop(stop_id.to_string());

        let mut best: Option<(&str, usize)> = None;
        for trip_id in self.trips_for_stop(stop_id) {
            let len = self.stop_times(trip_id).len();
            if best.is_none_or(|(_, best_len)| len > best_len) {
                best = Some((trip_id, len));
            }
        }
        let (trip_id, stop_count) = best.filter(|(_, len)| *len > 0).ok_or_else(no_trip)?;

        let (route_id, direction) = self
            .trip(trip_id)
            .map(|t| (t.route_id.clone(), t.direction))
            .unwrap_or_default();
        Ok(CanonicalTrip {
            trip_id: trip_id.to_string(),
            route_id,
            direction,
            stop_count,
        })
    }

    /// Stops visited by `trip_id` before `stop_id`, in visiting order, and
    /// the sequence number at which `stop_id` occurs.
    ///
    /// Stop ids absent from `stops.txt` are left out of the result.
    pub fn stops_before_in_same_trip(
        &self,
        stop_id: &str,
        trip_id: &str,
    ) -> Result<(Vec<&GtfsStop>, u32), GtfsError> {
        let times = self.stop_times(trip_id);
        if times.is_empty() {
            return Err(GtfsError::NoPattern(trip_id.to_string()));
        }

        let target = times
            .iter()
            .find(|st| st.stop_id == stop_id)
            .map(|st| st.sequence)
            .ok_or_else(|| GtfsError::StopNotInTrip {
                stop: stop_id.to_string(),
                trip: trip_id.to_string(),
            })?;

        let before = times
            .iter()
            .take_while(|st| st.sequence < target)
            .filter_map(|st| self.stop(&st.stop_id))
            .collect();
        Ok((before, target))
    }
}

fn read_rows<T: DeserializeOwned, R: Read>(reader: R, path: PathBuf) -> Result<Vec<T>, GtfsError> {
    let load_error = |message: String| GtfsError::Load {
        path: path.clone(),
        message,
    };

    let mut csv = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    // Feeds are not always UTF-8; bad bytes in a text field become U+FFFD.
    let headers = lossy(csv.byte_headers().map_err(|e| load_error(e.to_string()))?);
    if headers.iter().all(str::is_empty) {
        return Err(load_error("missing header".to_string()));
    }

    let mut rows = Vec::new();
    let mut record = csv::ByteRecord::new();
    while csv
        .read_byte_record(&mut record)
        .map_err(|e| load_error(e.to_string()))?
    {
        let row = lossy(&record)
            .deserialize(Some(&headers))
            .map_err(|e| load_error(e.to_string()))?;
        rows.push(row);
    }
    Ok(rows)
}

fn lossy(record: &csv::ByteRecord) -> csv::StringRecord {
    record.iter().map(String::from_utf8_lossy).collect()
}
