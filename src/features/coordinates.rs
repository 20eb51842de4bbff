use crate::PhotoLocatorError;
use crate::features::error::CoordinateError;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::OnceLock;

static RE_DMS: OnceLock<Regex> = OnceLock::new();

pub const MAP_LINK_BASE: &str = "https://www.google.com/maps?q=";

/// A latitude/longitude pair in signed decimal degrees.
///
/// Only constructed through [`Coordinates::new`], so a value of this type is always in range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    /// Range-checks a pair: latitude in `-90..=90`, longitude in `-180..=180`.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, PhotoLocatorError> {
        let lat_ok = latitude.is_finite() && (-90.0..=90.0).contains(&latitude);
        let lon_ok = longitude.is_finite() && (-180.0..=180.0).contains(&longitude);
        if !(lat_ok && lon_ok) {
            return Err(PhotoLocatorError::InvalidCoordinates {
                latitude,
                longitude,
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Google Maps link for this position, rounded to four decimals (~11 m).
    pub fn map_link(&self) -> String {
        format!("{MAP_LINK_BASE}{self}")
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4},{:.4}", self.latitude, self.longitude)
    }
}

fn parse_component(token: Option<regex::Match<'_>>) -> Result<f64, CoordinateError> {
    match token {
        Some(m) => m
            .as_str()
            .parse::<f64>()
            .map_err(|_| CoordinateError::Malformed(m.as_str().to_string())),
        None => Ok(0.0),
    }
}

/// Parses an exiftool style `: 40 deg 26' 46.00" N` value into signed decimal degrees.
///
/// Minutes and seconds are optional and count as zero when absent. `S` and `W` negate.
pub fn parse_dms(line: &str) -> Result<f64, CoordinateError> {
    let re = RE_DMS.get_or_init(|| {
        Regex::new(r#": ([0-9.]+) deg(?: ([0-9.]+)')?(?: ([0-9.]+)")? ([NSEW])"#).unwrap()
    });
    let caps = re.captures(line).ok_or(CoordinateError::NoMatch)?;

    let degrees = parse_component(caps.get(1))?;
    let minutes = parse_component(caps.get(2))?;
    let seconds = parse_component(caps.get(3))?;
    let magnitude = degrees + minutes / 60.0 + seconds / 3600.0;

    match &caps[4] {
        "S" | "W" => Ok(-magnitude),
        _ => Ok(magnitude),
    }
}
