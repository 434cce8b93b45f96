//! Track distance and elevation accumulation
//!
//! Walks an ordered sequence of trackpoints pair by pair, summing great-circle
//! distance and splitting elevation change into gain and loss.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::TrackError;

/// Mean Earth radius used by the Haversine formula
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// One recorded GPS sample along a route
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trackpoint {
    /// Latitude in degrees, [-90, 90]
    pub latitude: f64,
    /// Longitude in degrees, [-180, 180]
    pub longitude: f64,
    /// Elevation in metres above sea level, if the source recorded one
    pub elevation: Option<f64>,
}

impl Trackpoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            elevation: None,
        }
    }

    pub fn with_elevation(latitude: f64, longitude: f64, elevation: f64) -> Self {
        Self {
            latitude,
            longitude,
            elevation: Some(elevation),
        }
    }
}

/// Totals accumulated over a full track
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackSummary {
    /// Sum of pairwise great-circle distances in kilometres
    pub total_distance_km: f64,
    /// Sum of positive elevation deltas in metres
    pub total_elevation_gain_m: f64,
    /// Sum of absolute negative elevation deltas in metres
    pub total_elevation_loss_m: f64,
    /// Number of trackpoints consumed
    pub point_count: usize,
}

/// How a trackpoint without elevation takes part in gain/loss accumulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElevationPolicy {
    /// A missing elevation counts as 0 m
    #[default]
    TreatMissingAsZero,
    /// Segments touching a point without elevation add distance only
    SkipMissing,
}

impl std::str::FromStr for ElevationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "treat_missing_as_zero" | "zero" => Ok(ElevationPolicy::TreatMissingAsZero),
            "skip_missing" | "skip" => Ok(ElevationPolicy::SkipMissing),
            _ => Err(format!("Invalid elevation policy: {}", s)),
        }
    }
}

impl ElevationPolicy {
    fn delta(&self, from: Option<f64>, to: Option<f64>) -> Option<f64> {
        match self {
            ElevationPolicy::TreatMissingAsZero => Some(to.unwrap_or(0.0) - from.unwrap_or(0.0)),
            ElevationPolicy::SkipMissing => Some(to? - from?),
        }
    }
}

/// Great-circle distance between two trackpoints in kilometres
pub fn haversine_km(from: &Trackpoint, to: &Trackpoint) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let d_lat = (to.latitude - from.latitude).to_radians();
    let d_lon = (to.longitude - from.longitude).to_radians();

    // Rounding can push `a` past 1 for antipodal points
    let a = ((d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2))
        .min(1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Summarize a track, treating missing elevations as 0 m
pub fn summarize(points: &[Trackpoint]) -> Result<TrackSummary, TrackError> {
    summarize_with(points, ElevationPolicy::default())
}

/// Summarize a track with an explicit policy for missing elevations
pub fn summarize_with(
    points: &[Trackpoint],
    policy: ElevationPolicy,
) -> Result<TrackSummary, TrackError> {
    if points.len() < 2 {
        return Err(TrackError::InsufficientData {
            found: points.len(),
        });
    }

    let mut summary = TrackSummary {
        total_distance_km: 0.0,
        total_elevation_gain_m: 0.0,
        total_elevation_loss_m: 0.0,
        point_count: points.len(),
    };

    for pair in points.windows(2) {
        let (prev, curr) = (&pair[0], &pair[1]);

        summary.total_distance_km += haversine_km(prev, curr);

        if let Some(delta) = policy.delta(prev.elevation, curr.elevation) {
            if delta > 0.0 {
                summary.total_elevation_gain_m += delta;
            } else {
                summary.total_elevation_loss_m += delta.abs();
            }
        }
    }

    debug!(
        points = summary.point_count,
        distance_km = summary.total_distance_km,
        gain_m = summary.total_elevation_gain_m,
        loss_m = summary.total_elevation_loss_m,
        ?policy,
        "Track summarized"
    );

    Ok(summary)
}
