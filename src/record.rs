//! Earthquake event records and the accessors that validate them.
//!
//! [`Feature`] is the loose serde view of one GeoJSON feature as the feed
//! sends it. The accessors ([`magnitude_of`], [`location_of`], [`year_of`])
//! check field presence and shape, and [`Quake::try_from_feature`] uses them
//! to build the validated record the rest of the crate works with.

use std::fmt;

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{QuakeError, Result};

/// One entry of a GeoJSON `features` array.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub properties: Option<Properties>,
    #[serde(default)]
    pub geometry: Option<Geometry>,
}

impl Feature {
    /// Decodes the `index`-th element of `features`.
    ///
    /// # Errors
    ///
    /// [`QuakeError::MalformedRecord`] when a field has the wrong JSON type,
    /// e.g. a magnitude sent as a string.
    pub fn from_value(index: usize, value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| QuakeError::MalformedRecord {
            index,
            reason: e.to_string(),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Properties {
    #[serde(default)]
    pub mag: Option<f64>,
    /// Milliseconds since the Unix epoch.
    #[serde(default)]
    pub time: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Geometry {
    /// `[longitude, latitude, depth]`; depth is optional.
    #[serde(default)]
    pub coordinates: Option<Vec<f64>>,
}

/// A point on the globe, latitude first.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub const ORIGIN: Location = Location {
        latitude: 0.0,
        longitude: 0.0,
    };

    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}

/// Reads `properties.mag`.
///
/// # Errors
///
/// [`QuakeError::MissingField`] when the magnitude is absent or `null`.
pub fn magnitude_of(index: usize, feature: &Feature) -> Result<f64> {
    feature
        .properties
        .as_ref()
        .and_then(|p| p.mag)
        .ok_or(QuakeError::MissingField {
            index,
            field: "properties.mag",
        })
}

/// Reads `geometry.coordinates` as `(latitude, longitude)`, dropping depth.
///
/// # Errors
///
/// [`QuakeError::MissingField`] without a geometry or coordinates, and
/// [`QuakeError::MalformedRecord`] with fewer than two coordinates.
pub fn location_of(index: usize, feature: &Feature) -> Result<Location> {
    let geometry = feature.geometry.as_ref().ok_or(QuakeError::MissingField {
        index,
        field: "geometry",
    })?;

    let coordinates = geometry
        .coordinates
        .as_deref()
        .ok_or(QuakeError::MissingField {
            index,
            field: "geometry.coordinates",
        })?;

    match coordinates {
        [longitude, latitude, ..] => Ok(Location::new(*latitude, *longitude)),
        other => Err(QuakeError::MalformedRecord {
            index,
            reason: format!("expected at least 2 coordinates, found {}", other.len()),
        }),
    }
}

/// Converts `properties.time` to a timestamp, always in UTC.
pub fn time_of(index: usize, feature: &Feature) -> Result<DateTime<Utc>> {
    let millis = feature
        .properties
        .as_ref()
        .and_then(|p| p.time)
        .ok_or(QuakeError::MissingField {
            index,
            field: "properties.time",
        })?;

    DateTime::<Utc>::from_timestamp_millis(millis).ok_or_else(|| QuakeError::MalformedRecord {
        index,
        reason: format!("timestamp {millis} is out of range"),
    })
}

/// Calendar year of `properties.time`, evaluated in UTC.
pub fn year_of(index: usize, feature: &Feature) -> Result<i32> {
    Ok(time_of(index, feature)?.year())
}

/// A validated earthquake event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quake {
    pub magnitude: f64,
    pub location: Location,
    pub time: DateTime<Utc>,
}

impl Quake {
    pub fn new(magnitude: f64, location: Location, time: DateTime<Utc>) -> Self {
        Self {
            magnitude,
            location,
            time,
        }
    }

    /// Builds a record from the `index`-th feature of a response.
    pub fn try_from_feature(index: usize, feature: &Feature) -> Result<Self> {
        Ok(Self {
            magnitude: magnitude_of(index, feature)?,
            location: location_of(index, feature)?,
            time: time_of(index, feature)?,
        })
    }

    pub fn year(&self) -> i32 {
        self.time.year()
    }
}
