//! Amateur and weather satellites, with made-up pass predictions.
//!
//! There is no orbit propagation here (no TLEs, no SGP4): a pass is drawn at
//! random with timings that look right for the orbit it belongs to. The ISS,
//! being lower and faster, comes around sooner and stays up for less time than
//! the polar weather birds.

use std::fmt;
use std::ops::RangeInclusive;

use chrono::{Duration, NaiveDateTime};
use log::trace;
use rand::Rng;
use serde::Serialize;

/// Peak elevations drawn for a pass, in whole degrees.
pub const ELEVATION_RANGE_DEG: RangeInclusive<u32> = 15..=85;

/// Hours between consecutive upcoming passes.
pub const PASS_INTERVAL_H: RangeInclusive<i64> = 2..=4;

/// Upcoming passes listed per satellite in a report.
pub const UPCOMING_PASSES: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Orbit {
    /// Around 400 km, like the ISS.
    Low,
    /// Sun-synchronous weather satellites, 800 km or so.
    High,
}

impl Orbit {
    /// How far ahead the next rise is, in minutes.
    pub fn rise_delay_min(self) -> RangeInclusive<i64> {
        match self {
            Orbit::Low => 30..=90,
            Orbit::High => 60..=180,
        }
    }

    /// How long a pass lasts, in minutes.
    pub fn duration_min(self) -> RangeInclusive<i64> {
        match self {
            Orbit::Low => 8..=12,
            Orbit::High => 12..=15,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Satellite {
    pub name: &'static str,
    pub norad_id: u32,

    /// Downlink (MHz).
    pub frequency: f64,

    /// Uplink (MHz), for the ones we can talk back to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uplink: Option<f64>,

    pub modes: &'static [&'static str],
    pub active: bool,

    #[serde(skip)]
    pub orbit: Orbit,
}

pub const CATALOG: &[Satellite] = &[
    Satellite {
        name: "ISS",
        norad_id: 25544,
        frequency: 145.800,
        uplink: Some(145.200),
        modes: &["FM Voice", "SSTV", "Packet"],
        active: true,
        orbit: Orbit::Low,
    },
    Satellite {
        name: "NOAA 18",
        norad_id: 28654,
        frequency: 137.9125,
        uplink: None,
        modes: &["APT"],
        active: true,
        orbit: Orbit::High,
    },
    Satellite {
        name: "NOAA 19",
        norad_id: 33591,
        frequency: 137.1000,
        uplink: None,
        modes: &["APT"],
        active: true,
        orbit: Orbit::High,
    },
    Satellite {
        name: "METEOR-M2",
        norad_id: 40069,
        frequency: 137.1000,
        uplink: None,
        modes: &["LRPT"],
        active: true,
        orbit: Orbit::High,
    },
];

pub fn catalog() -> &'static [Satellite] {
    CATALOG
}

/// Looks a satellite up by name, ignoring case.
pub fn find(name: &str) -> Option<&'static Satellite> {
    CATALOG.iter().find(|s| s.name.eq_ignore_ascii_case(name))
}

/// One pass over the station.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Pass {
    pub rise: NaiveDateTime,
    pub culmination: NaiveDateTime,
    pub set: NaiveDateTime,

    /// Elevation at culmination (degrees).
    pub max_elevation: f64,

    /// Rise to set, in minutes.
    pub duration: i64,
}

impl Pass {
    pub fn new(rise: NaiveDateTime, duration_min: i64, max_elevation_deg: f64) -> Self {
        let duration = Duration::minutes(duration_min);
        Self {
            rise,
            culmination: rise + duration / 2,
            set: rise + duration,
            max_elevation: max_elevation_deg,
            duration: duration_min,
        }
    }

    /// Draws a pass rising at `rise`.
    pub fn sample_at<R: Rng + ?Sized>(orbit: Orbit, rise: NaiveDateTime, rng: &mut R) -> Self {
        let duration = rng.gen_range(orbit.duration_min());
        let elevation = rng.gen_range(ELEVATION_RANGE_DEG);
        Self::new(rise, duration, f64::from(elevation))
    }
}

/// The next pass of a satellite after `now`.
pub fn simulate_pass<R: Rng + ?Sized>(sat: &Satellite, now: NaiveDateTime, rng: &mut R) -> Pass {
    let rise = now + Duration::minutes(rng.gen_range(sat.orbit.rise_delay_min()));
    let pass = Pass::sample_at(sat.orbit, rise, rng);
    trace!(
        "{}: next pass at {}, {:.0}° max",
        sat.name,
        pass.rise,
        pass.max_elevation
    );
    pass
}

/// `count` passes following the one rising at `after`, a few hours apart.
pub fn upcoming_passes<R: Rng + ?Sized>(
    sat: &Satellite,
    after: NaiveDateTime,
    count: usize,
    rng: &mut R,
) -> Vec<Pass> {
    let mut rise = after;
    (0..count)
        .map(|_| {
            rise += Duration::hours(rng.gen_range(PASS_INTERVAL_H));
            Pass::sample_at(sat.orbit, rise, rng)
        })
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum SignalQuality {
    Weak,
    Fair,
    Good,
    Excellent,
}

impl SignalQuality {
    /// Expected signal strength at the receiver (dBm).
    pub fn strength_dbm(self) -> i32 {
        match self {
            SignalQuality::Excellent => -50,
            SignalQuality::Good => -65,
            SignalQuality::Fair => -75,
            SignalQuality::Weak => -85,
        }
    }
}

impl fmt::Display for SignalQuality {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Higher passes mean less path and less ground clutter.
pub fn signal_quality(elevation_deg: f64) -> SignalQuality {
    if elevation_deg > 60.0 {
        SignalQuality::Excellent
    } else if elevation_deg > 40.0 {
        SignalQuality::Good
    } else if elevation_deg > 20.0 {
        SignalQuality::Fair
    } else {
        SignalQuality::Weak
    }
}

/// What the dashboard shows for one satellite.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SatelliteReport {
    pub name: &'static str,
    pub norad_id: u32,
    pub frequency: f64,
    pub modes: &'static [&'static str],
    pub next_pass: Pass,
    pub signal_quality: SignalQuality,
    pub signal_strength: i32,
    pub upcoming_passes: Vec<Pass>,
}

impl SatelliteReport {
    pub fn sample<R: Rng + ?Sized>(sat: &Satellite, now: NaiveDateTime, rng: &mut R) -> Self {
        let next_pass = simulate_pass(sat, now, rng);
        let quality = signal_quality(next_pass.max_elevation);

        Self {
            name: sat.name,
            norad_id: sat.norad_id,
            frequency: sat.frequency,
            modes: sat.modes,
            next_pass,
            signal_quality: quality,
            signal_strength: quality.strength_dbm(),
            upcoming_passes: upcoming_passes(sat, next_pass.rise, UPCOMING_PASSES, rng),
        }
    }
}

/// Reports for every active satellite, in catalog order.
pub fn report<R: Rng + ?Sized>(now: NaiveDateTime, rng: &mut R) -> Vec<SatelliteReport> {
    CATALOG
        .iter()
        .filter(|s| s.active)
        .map(|s| SatelliteReport::sample(s, now, rng))
        .collect()
}
