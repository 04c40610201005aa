//! GPX route extraction for the route form.
//!
//! Only point positions are read. Track points (`trkpt`) are preferred;
//! a document without any falls back to its route points (`rtept`).
//! Waypoints are ignored.

use quick_xml::events::attributes::AttrError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;

use crate::model::Coordinate;

#[derive(Debug, Error)]
pub enum GpxError {
    #[error("malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("malformed attribute: {0}")]
    Attribute(#[from] AttrError),

    #[error("document has no <gpx> root element")]
    NotGpx,

    #[error("<{element}> #{index} is missing the '{attribute}' attribute")]
    MissingAttribute {
        element: &'static str,
        index: usize,
        attribute: &'static str,
    },

    #[error("<{element}> #{index} has invalid {attribute} '{value}'")]
    InvalidCoordinate {
        element: &'static str,
        index: usize,
        attribute: &'static str,
        value: String,
    },
}

/// Points of the first kind present in the document, in document order.
pub fn parse_points(xml: &str) -> Result<Vec<Coordinate>, GpxError> {
    let mut reader = Reader::from_str(xml);
    let mut seen_root = false;
    let mut track = Vec::new();
    let mut route = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) => match e.local_name().as_ref() {
                b"gpx" => seen_root = true,
                b"trkpt" => track.push(point(&e, "trkpt", track.len())?),
                b"rtept" => route.push(point(&e, "rtept", route.len())?),
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    if !seen_root {
        return Err(GpxError::NotGpx);
    }

    tracing::debug!(track_points = track.len(), route_points = route.len(), "GPX parsed");
    Ok(if track.is_empty() { route } else { track })
}

fn point(e: &BytesStart<'_>, element: &'static str, index: usize) -> Result<Coordinate, GpxError> {
    let lat = coordinate(e, element, index, "lat", 90.0)?;
    let lng = coordinate(e, element, index, "lon", 180.0)?;
    Ok(Coordinate::new(lat, lng))
}

fn coordinate(
    e: &BytesStart<'_>,
    element: &'static str,
    index: usize,
    attribute: &'static str,
    limit: f64,
) -> Result<f64, GpxError> {
    let attr = e
        .try_get_attribute(attribute)?
        .ok_or(GpxError::MissingAttribute {
            element,
            index,
            attribute,
        })?;
    let raw = String::from_utf8_lossy(&attr.value).into_owned();
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value.abs() <= limit => Ok(value),
        _ => Err(GpxError::InvalidCoordinate {
            element,
            index,
            attribute,
            value: raw,
        }),
    }
}
