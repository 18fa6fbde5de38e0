//! Radio-link formulae.
//!
//! Small, pure and well-known: decibel conversions, free-space path loss,
//! and the haversine. The link budget is assembled from these in [`link`].
//!
//! [`link`]: crate::link

use crate::{invalid, Result};

/// Constant term of the free-space path loss with distance in metres and
/// frequency in hertz: _20·log10(4π/c)_.
pub const FSPL_CONSTANT_DB: f64 = -147.55;

/// Typical atmospheric attenuation applied on top of free-space loss (dB/km).
pub const ATMOSPHERIC_LOSS_DB_PER_KM: f64 = 0.1;

/// Haversine of an angle in radians: _sin²(θ/2)_.
pub fn haversine(theta: f64) -> f64 {
    (theta / 2.0).sin().powi(2)
}

/// Free-space path loss (dB) for a frequency in MHz over a distance in km.
///
/// _FSPL = 20·log10(d) + 20·log10(f) − 147.55_, with _d_ in metres and _f_ in
/// hertz. See the [Friis transmission equation][friis].
///
/// At zero distance there is no path to lose anything over, and the
/// logarithm is undefined, so this returns 0 dB.
///
/// Atmospheric loss is _not_ included: see [`atmospheric_loss_db`].
///
/// [friis]: https://en.wikipedia.org/wiki/Free-space_path_loss
pub fn free_space_path_loss_db(frequency_mhz: f64, distance_km: f64) -> Result<f64> {
    if !(frequency_mhz > 0.0) || !frequency_mhz.is_finite() {
        return Err(invalid(format!(
            "frequency {} MHz must be positive",
            frequency_mhz
        )));
    }

    if !(distance_km >= 0.0) || !distance_km.is_finite() {
        return Err(invalid(format!(
            "distance {} km must not be negative",
            distance_km
        )));
    }

    if distance_km == 0.0 {
        return Ok(0.0);
    }

    let distance_m = distance_km * 1e3;
    let frequency_hz = frequency_mhz * 1e6;

    Ok(20.0 * distance_m.log10() + 20.0 * frequency_hz.log10() + FSPL_CONSTANT_DB)
}

/// Atmospheric attenuation over a distance in km (dB).
///
/// A flat [`ATMOSPHERIC_LOSS_DB_PER_KM`] per kilometre. This is added next to
/// the free-space loss, never folded into it.
pub fn atmospheric_loss_db(distance_km: f64) -> Result<f64> {
    if !(distance_km >= 0.0) || !distance_km.is_finite() {
        return Err(invalid(format!(
            "distance {} km must not be negative",
            distance_km
        )));
    }

    Ok(ATMOSPHERIC_LOSS_DB_PER_KM * distance_km)
}

/// Converts a power in watts to dBm.
pub fn watts_to_dbm(watts: f64) -> Result<f64> {
    if !(watts > 0.0) || !watts.is_finite() {
        return Err(invalid(format!("power {} W must be positive", watts)));
    }

    Ok(10.0 * (watts * 1e3).log10())
}

/// Rounds to a number of decimal places, for presentation.
///
/// Halves round away from zero.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

#[test]
fn test_haversine() {
    assert_eq!(haversine(0.0), 0.0);
    assert!((haversine(std::f64::consts::PI) - 1.0).abs() < 1e-15);
    assert!((haversine(std::f64::consts::FRAC_PI_2) - 0.5).abs() < 1e-15);
}

#[test]
fn test_free_space_path_loss() {
    // 20·5 + 20·log10(1.44e8) − 147.55
    let fspl = free_space_path_loss_db(144.0, 100.0).unwrap();
    assert!((fspl - 115.6172).abs() < 1e-3, "{}", fspl);

    // same thing in the km/MHz form: 32.45 + 20·log10(f) + 20·log10(d)
    let fspl = free_space_path_loss_db(432.0, 25.0).unwrap();
    let expected = 32.45 + 20.0 * 432f64.log10() + 20.0 * 25f64.log10();
    assert!((fspl - expected).abs() < 1e-9);

    // 6 dB per doubling of distance
    let near = free_space_path_loss_db(14.2, 1000.0).unwrap();
    let far = free_space_path_loss_db(14.2, 2000.0).unwrap();
    assert!((far - near - 6.0206).abs() < 1e-3);

    assert_eq!(free_space_path_loss_db(144.0, 0.0).unwrap(), 0.0);
}

#[test]
fn test_free_space_path_loss_domain() {
    assert!(free_space_path_loss_db(0.0, 10.0).is_err());
    assert!(free_space_path_loss_db(-144.0, 10.0).is_err());
    assert!(free_space_path_loss_db(f64::NAN, 10.0).is_err());
    assert!(free_space_path_loss_db(144.0, -1.0).is_err());
    assert!(free_space_path_loss_db(144.0, f64::INFINITY).is_err());
}

#[test]
fn test_atmospheric_loss() {
    assert_eq!(atmospheric_loss_db(0.0).unwrap(), 0.0);
    assert!((atmospheric_loss_db(120.0).unwrap() - 12.0).abs() < 1e-12);
    assert!(atmospheric_loss_db(-0.5).is_err());
}

#[test]
fn test_watts_to_dbm() {
    assert!((watts_to_dbm(1.0).unwrap() - 30.0).abs() < 1e-12);
    assert!((watts_to_dbm(0.001).unwrap() - 0.0).abs() < 1e-12);
    assert!((watts_to_dbm(100.0).unwrap() - 50.0).abs() < 1e-12);
    assert!(watts_to_dbm(0.0).is_err());
    assert!(watts_to_dbm(-5.0).is_err());
}

#[test]
fn test_round_to() {
    assert_eq!(round_to(101.56789, 2), 101.57);
    assert_eq!(round_to(101.56789, 1), 101.6);
    assert_eq!(round_to(-59.6276, 2), -59.63);
    assert_eq!(round_to(42.0, 0), 42.0);
}
