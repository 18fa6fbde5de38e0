//! Geodesy and radio-link formulae for the amateur radio shack.
//!
//! This crate gathers the handful of closed-form calculations a station
//! dashboard needs: great-circle distance and initial bearing between two
//! stations, conversion between coordinates and [Maidenhead locators][QTH],
//! free-space path loss, and a simple link budget.
//!
//! Everything here is a pure function of its arguments. There is no state,
//! no I/O, and nothing to synchronise: all of it can be called concurrently
//! from as many threads as one likes.
//!
//! Inputs are validated once, at the type boundary. A [`GeoPoint`] or a
//! [`GridLocator`] that exists is known to be in range, so the operations
//! taking them cannot fail. Raw numbers (frequencies, powers, distances) are
//! checked by the operation consuming them. All failures are reported as
//! [`Error::InvalidInput`].
//!
//! ```
//! use georadio::{distance_km, initial_bearing_deg, GeoPoint};
//!
//! let bosa = GeoPoint::new(40.2958, 8.5006).unwrap();
//! let rome = GeoPoint::new(41.9028, 12.4964).unwrap();
//!
//! assert!((distance_km(bosa, rome) - 379.5).abs() < 0.1);
//! assert!(initial_bearing_deg(bosa, rome) < 90.0);
//! ```
//!
//! [QTH]: https://en.wikipedia.org/wiki/Maidenhead_Locator_System

#![forbid(unsafe_code)]
#![cfg_attr(feature = "cargo-clippy", deny(clippy_pedantic))]

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

pub mod formulae;
pub mod grid;
pub mod link;

pub use formulae::{atmospheric_loss_db, free_space_path_loss_db, round_to, watts_to_dbm};
pub use grid::{grid_to_lat_lon, lat_lon_to_grid, GridLocator};
pub use link::{link_budget, LinkBudgetInput, LinkBudgetResult, LinkQuality};

use formulae::haversine;

/// Mean Earth radius used by the great-circle formulae (km).
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// The one way things go wrong in here.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum Error {
    /// A numeric argument is outside its domain, or a locator is malformed.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Builds an [`Error::InvalidInput`], tracing the rejection when enabled.
pub(crate) fn invalid(reason: impl Into<String>) -> Error {
    let reason = reason.into();
    #[cfg(feature = "log")]
    log::debug!("rejected input: {}", reason);
    Error::InvalidInput(reason)
}

/// A position on the Earth's surface, in decimal degrees.
///
/// Latitude is within [-90, 90] and longitude within [-180, 180]; there is no
/// way to build a point outside of that.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "UncheckedPoint"))]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
}

impl GeoPoint {
    /// Validates and builds a point.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(invalid(format!("latitude {} outside [-90, 90]", latitude)));
        }

        if !(-180.0..=180.0).contains(&longitude) {
            return Err(invalid(format!(
                "longitude {} outside [-180, 180]",
                longitude
            )));
        }

        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// For values already known to be in range (decoded locators).
    pub(crate) fn new_unchecked(latitude: f64, longitude: f64) -> Self {
        debug_assert!((-90.0..=90.0).contains(&latitude));
        debug_assert!((-180.0..=180.0).contains(&longitude));
        Self {
            latitude,
            longitude,
        }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// (latitude, longitude) in radians.
    fn radians(&self) -> (f64, f64) {
        (self.latitude.to_radians(), self.longitude.to_radians())
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

/// Parses `"lat,lon"`, the way coordinates are typed on a command line.
impl FromStr for GeoPoint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (lat, lon) = s
            .split_once(',')
            .ok_or_else(|| invalid(format!("expected \"lat,lon\", got \"{}\"", s)))?;

        let parse = |field: &str, what: &str| {
            field
                .trim()
                .parse::<f64>()
                .map_err(|_| invalid(format!("{} \"{}\" is not a number", what, field.trim())))
        };

        Self::new(parse(lat, "latitude")?, parse(lon, "longitude")?)
    }
}

/// `geo` points are (x, y), that is (longitude, latitude).
impl From<GeoPoint> for geo::Point<f64> {
    fn from(p: GeoPoint) -> Self {
        geo::Point::new(p.longitude, p.latitude)
    }
}

impl TryFrom<geo::Point<f64>> for GeoPoint {
    type Error = Error;

    fn try_from(p: geo::Point<f64>) -> Result<Self> {
        Self::new(p.y(), p.x())
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct UncheckedPoint {
    latitude: f64,
    longitude: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<UncheckedPoint> for GeoPoint {
    type Error = Error;

    fn try_from(p: UncheckedPoint) -> Result<Self> {
        Self::new(p.latitude, p.longitude)
    }
}

/// Great-circle distance between two points (km).
///
/// Uses the [haversine formula][haversine] on a spherical Earth of radius
/// [`EARTH_RADIUS_KM`]. Good to about 0.5% against the ellipsoid, which is
/// plenty for pointing a beam or estimating path loss.
///
/// [haversine]: https://en.wikipedia.org/wiki/Haversine_formula
pub fn distance_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let (lat1, lon1) = a.radians();
    let (lat2, lon2) = b.radians();

    let h = haversine(lat2 - lat1) + lat1.cos() * lat2.cos() * haversine(lon2 - lon1);

    // rounding can push h a hair above 1 for antipodal points
    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

/// Initial bearing (forward azimuth) from `from` towards `to`, in degrees
/// clockwise from true north, within [0, 360).
///
/// This is the heading to set the rotator to. Along a great circle the
/// bearing changes as one goes, so this is only the heading at departure.
pub fn initial_bearing_deg(from: GeoPoint, to: GeoPoint) -> f64 {
    let (lat1, lon1) = from.radians();
    let (lat2, lon2) = to.radians();
    let delta_lon = lon2 - lon1;

    let y = delta_lon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * delta_lon.cos();

    (y.atan2(x).to_degrees() + 360.0) % 360.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon).unwrap()
    }

    #[test]
    fn rejects_out_of_range_points() {
        assert!(matches!(
            GeoPoint::new(95.0, 0.0),
            Err(Error::InvalidInput(_))
        ));
        assert!(GeoPoint::new(-90.5, 0.0).is_err());
        assert!(GeoPoint::new(0.0, 180.1).is_err());
        assert!(GeoPoint::new(0.0, -200.0).is_err());
        assert!(GeoPoint::new(f64::NAN, 0.0).is_err());
        assert!(GeoPoint::new(90.0, -180.0).is_ok());
    }

    #[test]
    fn parses_lat_lon_pairs() {
        let p: GeoPoint = "40.2958, 8.5006".parse().unwrap();
        assert_eq!(p.latitude(), 40.2958);
        assert_eq!(p.longitude(), 8.5006);

        assert!("40.2958".parse::<GeoPoint>().is_err());
        assert!("north,8.5".parse::<GeoPoint>().is_err());
        assert!("95,8.5".parse::<GeoPoint>().is_err());
    }

    #[test]
    fn converts_to_and_from_geo_points() {
        let p = point(40.2958, 8.5006);
        let g: geo::Point<f64> = p.into();
        assert_eq!(g.x(), 8.5006);
        assert_eq!(g.y(), 40.2958);
        assert_eq!(GeoPoint::try_from(g).unwrap(), p);

        assert!(GeoPoint::try_from(geo::Point::new(0.0, 95.0)).is_err());
    }

    #[test]
    fn distance_to_self_is_zero() {
        for &(lat, lon) in &[(0.0, 0.0), (40.2958, 8.5006), (-89.9, 179.9), (90.0, 0.0)] {
            let a = point(lat, lon);
            assert_eq!(distance_km(a, a), 0.0);
        }
    }

    #[test]
    fn distance_is_symmetric() {
        let pairs = [
            (point(40.2958, 8.5006), point(41.9028, 12.4964)),
            (point(-33.86, 151.21), point(51.5, -0.12)),
            (point(0.0, -179.0), point(0.0, 179.0)),
        ];

        for (a, b) in pairs.iter() {
            assert!((distance_km(*a, *b) - distance_km(*b, *a)).abs() < 1e-9);
        }
    }

    #[test]
    fn quarter_circumference() {
        let d = distance_km(point(0.0, 0.0), point(0.0, 90.0));
        assert!((d - 10007.543).abs() < 0.01, "{}", d);

        let d = distance_km(point(0.0, 0.0), point(90.0, 0.0));
        assert!((d - 10007.543).abs() < 0.01, "{}", d);
    }

    #[test]
    fn antipodes_are_half_circumference() {
        let d = distance_km(point(0.0, 0.0), point(0.0, 180.0));
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);
    }

    #[test]
    fn bearing_cardinal_points() {
        let origin = point(0.0, 0.0);
        let cases = [
            (point(10.0, 0.0), 0.0),
            (point(0.0, 90.0), 90.0),
            (point(-10.0, 0.0), 180.0),
            (point(0.0, -90.0), 270.0),
        ];

        for (to, expected) in cases.iter() {
            let b = initial_bearing_deg(origin, *to);
            assert!((b - expected).abs() < 1e-9, "{} != {}", b, expected);
        }
    }

    #[test]
    fn bearing_bosa_to_rome() {
        let bosa = point(40.2958, 8.5006);
        let rome = point(41.9028, 12.4964);
        assert!((initial_bearing_deg(bosa, rome) - 60.6083).abs() < 1e-4);

        // not the reciprocal: great circles bend
        assert!((initial_bearing_deg(rome, bosa) - 243.2359).abs() < 1e-4);
    }

    #[test]
    fn bearing_across_the_antimeridian() {
        let west = point(0.0, 179.0);
        let east = point(0.0, -179.0);
        assert!((initial_bearing_deg(west, east) - 90.0).abs() < 1e-9);
        assert!((initial_bearing_deg(east, west) - 270.0).abs() < 1e-9);
    }

    #[test]
    fn bearing_is_normalised() {
        let a = point(40.2958, 8.5006);
        for &(lat, lon) in &[(41.9, 12.5), (-33.86, 151.21), (51.5, -0.12), (40.0, 8.0)] {
            let b = initial_bearing_deg(a, point(lat, lon));
            assert!((0.0..360.0).contains(&b), "{}", b);
        }

        assert_eq!(initial_bearing_deg(a, a), 0.0);
    }
}
