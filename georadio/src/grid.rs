//! Maidenhead grid locators.
//!
//! A locator names a cell on a lon/lat grid, coarsest first, alternating
//! longitude and latitude at every level:
//!
//! | chars | name       | alphabet | lon × lat        |
//! |-------|------------|----------|------------------|
//! | 1–2   | field      | `A`–`R`  | 20° × 10°        |
//! | 3–4   | square     | `0`–`9`  | 2° × 1°          |
//! | 5–6   | sub-square | `A`–`X`  | 1/12° × 1/24°    |
//!
//! Counting starts from the antimeridian and the south pole, so `AA00aa` is
//! the cell whose south-west corner is at (-90, -180).
//!
//! See the [IARU description][IARU] for the gory details.
//!
//! [IARU]: https://www.iaru-r1.org/wp-content/uploads/2020/12/Maidenhead-Locator-System.pdf

use std::fmt;
use std::str::FromStr;

use crate::{invalid, Error, GeoPoint, Result};

/// Number of fields along each axis (letters `A` to `R`).
const FIELDS: u32 = 18;

/// Number of sub-squares per square along each axis (letters `A` to `X`).
const SUBSQUARES: u32 = 24;

/// Sub-squares per field along each axis: 10 squares of 24.
const STEPS_PER_FIELD: u32 = 10 * SUBSQUARES;

/// Size of one sub-square in degrees: 1/12° of longitude, 1/24° of latitude.
const STEP_LON: f64 = 2.0 / SUBSQUARES as f64;
const STEP_LAT: f64 = 1.0 / SUBSQUARES as f64;

/// Tolerance (in sub-square steps) for corners computed in floating point.
///
/// Without it, the corner of `JN58AB` comes back as a hair below its own
/// latitude and encodes as `JN58AA`.
const STEP_EPSILON: f64 = 1e-9;

/// A well-formed 4 or 6 character Maidenhead locator.
///
/// Parsing ignores case and surrounding whitespace; the code is kept in
/// uppercase.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct GridLocator {
    code: String,
}

impl GridLocator {
    /// Validates a locator.
    pub fn new(code: &str) -> Result<Self> {
        let code = code.trim();

        if !code.is_ascii() {
            return Err(invalid(format!("locator \"{}\" is not ASCII", code)));
        }

        if code.len() < 4 {
            return Err(invalid(format!(
                "locator \"{}\" is shorter than 4 characters",
                code
            )));
        }

        if code.len() != 4 && code.len() != 6 {
            return Err(invalid(format!(
                "locator \"{}\" must have 4 or 6 characters",
                code
            )));
        }

        let code = code.to_ascii_uppercase();
        for (i, c) in code.bytes().enumerate() {
            let ok = match i {
                0 | 1 => (b'A'..=b'R').contains(&c),
                2 | 3 => c.is_ascii_digit(),
                _ => (b'A'..=b'X').contains(&c),
            };

            if !ok {
                return Err(invalid(format!(
                    "locator \"{}\": unexpected '{}' at position {}",
                    code,
                    c as char,
                    i + 1
                )));
            }
        }

        Ok(Self { code })
    }

    pub fn as_str(&self) -> &str {
        &self.code
    }

    /// Whether the sub-square is given.
    pub fn has_subsquare(&self) -> bool {
        self.code.len() == 6
    }

    /// The field and square only (first 4 characters).
    pub fn square(&self) -> &str {
        &self.code[..4]
    }

    /// South-west corner of the cell.
    pub fn to_lat_lon(&self) -> GeoPoint {
        let c = self.code.as_bytes();
        let index = |i: usize, base: u8| f64::from(c[i] - base);

        let mut lon = index(0, b'A') * 20.0 - 180.0 + index(2, b'0') * 2.0;
        let mut lat = index(1, b'A') * 10.0 - 90.0 + index(3, b'0');

        if self.has_subsquare() {
            lon += index(4, b'A') * STEP_LON;
            lat += index(5, b'A') * STEP_LAT;
        }

        GeoPoint::new_unchecked(lat, lon)
    }
}

impl fmt::Display for GridLocator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.code)
    }
}

impl FromStr for GridLocator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for GridLocator {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Self::new(&s)
    }
}

impl From<GridLocator> for String {
    fn from(grid: GridLocator) -> Self {
        grid.code
    }
}

/// Decodes a locator string to the south-west corner of its cell.
///
/// `JN58` is the 2° × 1° square whose corner sits at 48° N, 10° E.
pub fn grid_to_lat_lon(code: &str) -> Result<GeoPoint> {
    Ok(GridLocator::new(code)?.to_lat_lon())
}

/// Encodes a point as a 6-character locator.
///
/// The point is shifted to longitude [0, 360) and latitude [0, 180) and
/// counted out in sub-square steps, from which the field, square, and
/// sub-square indices fall out by integer division. Points on the eastern
/// (+180°) or northern (+90°) edge belong to the last cell.
pub fn lat_lon_to_grid(p: GeoPoint) -> GridLocator {
    let last = FIELDS * STEPS_PER_FIELD - 1;
    let steps = |degrees: f64, step: f64| -> u32 {
        ((degrees / step + STEP_EPSILON).floor() as u32).min(last)
    };

    let lon = steps(p.longitude() + 180.0, STEP_LON);
    let lat = steps(p.latitude() + 90.0, STEP_LAT);

    let letter = |i: u32| char::from(b'A' + i as u8);
    let digit = |i: u32| char::from(b'0' + i as u8);

    let code: String = [
        letter(lon / STEPS_PER_FIELD),
        letter(lat / STEPS_PER_FIELD),
        digit(lon % STEPS_PER_FIELD / SUBSQUARES),
        digit(lat % STEPS_PER_FIELD / SUBSQUARES),
        letter(lon % SUBSQUARES),
        letter(lat % SUBSQUARES),
    ]
    .iter()
    .collect();

    GridLocator { code }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_squares_to_their_corner() {
        let p = grid_to_lat_lon("JN58").unwrap();
        assert_eq!(p.latitude(), 48.0);
        assert_eq!(p.longitude(), 10.0);

        let p = grid_to_lat_lon("AA00").unwrap();
        assert_eq!(p.latitude(), -90.0);
        assert_eq!(p.longitude(), -180.0);

        let p = grid_to_lat_lon("JN40").unwrap();
        assert_eq!(p.latitude(), 40.0);
        assert_eq!(p.longitude(), 8.0);
    }

    #[test]
    fn decodes_subsquares() {
        let p = grid_to_lat_lon("jn40ig").unwrap();
        assert!((p.longitude() - (8.0 + 8.0 / 12.0)).abs() < 1e-12);
        assert!((p.latitude() - (40.0 + 6.0 / 24.0)).abs() < 1e-12);

        let p = grid_to_lat_lon("RR99XX").unwrap();
        assert!((p.longitude() - (180.0 - 1.0 / 12.0)).abs() < 1e-12);
        assert!((p.latitude() - (90.0 - 1.0 / 24.0)).abs() < 1e-12);
    }

    #[test]
    fn encodes_known_stations() {
        // Bosa, Sardinia
        let bosa = GeoPoint::new(40.2958, 8.5006).unwrap();
        assert_eq!(lat_lon_to_grid(bosa).as_str(), "JN40GH");

        // ARRL HQ, Newington CT
        let w1aw = GeoPoint::new(41.714775, -72.727260).unwrap();
        assert_eq!(lat_lon_to_grid(w1aw).as_str(), "FN31PR");

        let origin = GeoPoint::new(0.0, 0.0).unwrap();
        assert_eq!(lat_lon_to_grid(origin).as_str(), "JJ00AA");
    }

    #[test]
    fn edges_fall_in_the_last_cell() {
        let ne = GeoPoint::new(90.0, 180.0).unwrap();
        assert_eq!(lat_lon_to_grid(ne).as_str(), "RR99XX");

        let sw = GeoPoint::new(-90.0, -180.0).unwrap();
        assert_eq!(lat_lon_to_grid(sw).as_str(), "AA00AA");
    }

    #[test]
    fn every_square_round_trips() {
        for f1 in b'A'..=b'R' {
            for f2 in b'A'..=b'R' {
                for d1 in b'0'..=b'9' {
                    for d2 in b'0'..=b'9' {
                        let code: String =
                            [f1, f2, d1, d2].iter().map(|&b| char::from(b)).collect();
                        let p = grid_to_lat_lon(&code).unwrap();
                        assert_eq!(lat_lon_to_grid(p).square(), code);
                    }
                }
            }
        }
    }

    #[test]
    fn subsquares_round_trip() {
        for code in &["JN58TD", "JN40GH", "FN31PR", "AA00AA", "RR99XX", "IO91WM", "QF56OD"] {
            let grid: GridLocator = code.parse().unwrap();
            assert_eq!(&lat_lon_to_grid(grid.to_lat_lon()), &grid);
        }

        for s1 in b'A'..=b'X' {
            for s2 in b'A'..=b'X' {
                let code: String = ['J', 'N', '5', '8', char::from(s1), char::from(s2)]
                    .iter()
                    .collect();
                let p = grid_to_lat_lon(&code).unwrap();
                assert_eq!(lat_lon_to_grid(p).as_str(), code);
            }
        }
    }

    #[test]
    fn points_round_trip_within_a_subsquare() {
        for &(lat, lon) in &[(40.2958, 8.5006), (-33.86, 151.21), (51.5, -0.12), (0.01, -0.01)] {
            let p = GeoPoint::new(lat, lon).unwrap();
            let corner = lat_lon_to_grid(p).to_lat_lon();
            assert!(lat - corner.latitude() >= 0.0 && lat - corner.latitude() < STEP_LAT);
            assert!(lon - corner.longitude() >= 0.0 && lon - corner.longitude() < STEP_LON);
        }
    }

    #[test]
    fn normalises_case_and_whitespace() {
        let grid: GridLocator = "  jn58td ".parse().unwrap();
        assert_eq!(grid.as_str(), "JN58TD");
        assert_eq!(grid.to_string(), "JN58TD");
        assert_eq!(grid.square(), "JN58");
        assert!(grid.has_subsquare());
    }

    #[test]
    fn rejects_malformed_locators() {
        let malformed = [
            "", "JN5", "JN58T", "JN58TDX", "SN58", "JS58", "J158", "JNA8", "JN5A", "JN58YA",
            "JN58A1", "JN58é",
        ];

        for code in &malformed {
            assert!(
                matches!(GridLocator::new(code), Err(Error::InvalidInput(_))),
                "{} should be rejected",
                code
            );
        }
    }
}
