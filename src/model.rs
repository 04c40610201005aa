//! Application records shared between views and the backend.
//!
//! The backend owns the shape of these records. The client keeps the
//! fields it reads typed and carries everything else through untouched
//! in `extra`, so a record read from the backend and written back into
//! the store never loses data.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A cluster of stoplights at one intersection.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StoplightGroup {
    /// Backend identifier of the group.
    #[serde(rename = "groupID")]
    pub group_id: u64,
    pub lat: f64,
    pub lng: f64,
    /// Fields the client does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StoplightGroup {
    pub fn new(group_id: u64, lat: f64, lng: f64) -> Self {
        Self {
            group_id,
            lat,
            lng,
            extra: Map::new(),
        }
    }
}

/// A single stoplight belonging to a group.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Stoplight {
    pub id: u64,
    /// Owning group id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<u64>,
    /// Position of the light inside its group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
    /// Facing direction; the backend allows it to be blank.
    #[serde(
        default,
        deserialize_with = "deserialize_direction",
        skip_serializing_if = "Option::is_none"
    )]
    pub direction: Option<Direction>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Stoplight {
    /// A stoplight known only by its id.
    pub fn with_id(id: u64) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }
}

/// Compass direction a stoplight faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "N")]
    North,
    #[serde(rename = "NE")]
    Northeast,
    #[serde(rename = "E")]
    East,
    #[serde(rename = "SE")]
    Southeast,
    #[serde(rename = "S")]
    South,
    #[serde(rename = "SW")]
    Southwest,
    #[serde(rename = "W")]
    West,
    #[serde(rename = "NW")]
    Northwest,
}

fn deserialize_direction<'de, D>(deserializer: D) -> Result<Option<Direction>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(code) => Direction::deserialize(Value::String(code.to_string()))
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// A point on a route, serialized as `[lat, lng]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self { lat, lng }
    }
}

impl From<Coordinate> for (f64, f64) {
    fn from(c: Coordinate) -> Self {
        (c.lat, c.lng)
    }
}
