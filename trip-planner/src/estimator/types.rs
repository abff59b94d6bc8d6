//! OSRM route service response types.
//!
//! See: <http://project-osrm.org/docs/v5.24.0/api/#route-service>

use serde::Deserialize;

/// OSRM Route API response.
#[derive(Debug, Deserialize)]
pub struct OsrmRouteResponse {
    /// `"Ok"` on success, otherwise an error code such as `"NoRoute"`.
    pub code: String,

    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub routes: Vec<OsrmRoute>,
}

impl OsrmRouteResponse {
    pub fn is_ok(&self) -> bool {
        self.code == "Ok"
    }
}

/// One route alternative.
#[derive(Debug, Deserialize)]
pub struct OsrmRoute {
    /// Meters.
    pub distance: f64,
    /// Seconds.
    pub duration: f64,
    /// Polyline, present unless `overview=false`.
    #[serde(default)]
    pub geometry: Option<String>,
}
