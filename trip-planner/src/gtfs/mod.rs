//! Static GTFS feed index.
//!
//! Only the three files needed to answer "which trip serves this stop and
//! what comes before it" are read: `stops.txt`, `trips.txt` and
//! `stop_times.txt`.

mod error;
mod index;
mod shared;
mod types;

pub use error::GtfsError;
pub use index::GtfsIndex;
pub use shared::SharedGtfsIndex;
pub use types::{CanonicalTrip, GtfsStop, GtfsStopTime, GtfsTrip};
