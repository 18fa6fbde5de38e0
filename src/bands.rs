//! The amateur radio band plan.
//!
//! Allocations and power limits are the Italian ones (IARU Region 1).

use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;
use std::fmt;

/// Part of the spectrum a band belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Segment {
    Hf,
    Vhf,
    Uhf,
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Segment::Hf => "HF",
            Segment::Vhf => "VHF",
            Segment::Uhf => "UHF",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Mode {
    #[serde(rename = "CW")]
    Cw,
    #[serde(rename = "SSB")]
    Ssb,
    Digital,
    #[serde(rename = "FM")]
    Fm,
}

/// One allocation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Band {
    /// Conventional name, by wavelength (`"20m"`, `"70cm"`).
    pub name: &'static str,

    pub segment: Segment,

    /// Lower edge (MHz).
    pub low_mhz: f64,

    /// Upper edge (MHz).
    pub high_mhz: f64,

    pub modes: &'static [Mode],

    /// Maximum output power allowed (W).
    pub max_power_w: u32,
}

impl Band {
    /// Whether a frequency (MHz) falls within the band, edges included.
    pub fn contains(&self, frequency_mhz: f64) -> bool {
        (self.low_mhz..=self.high_mhz).contains(&frequency_mhz)
    }

    /// The range as written in the band plan, e.g. `14.000-14.350 MHz`.
    pub fn range(&self) -> String {
        format!("{:.3}-{:.3} MHz", self.low_mhz, self.high_mhz)
    }
}

/// Serialized with the printed [`range`](Band::range) next to its edges.
impl Serialize for Band {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut band = serializer.serialize_struct("Band", 7)?;
        band.serialize_field("name", self.name)?;
        band.serialize_field("segment", &self.segment)?;
        band.serialize_field("range", &self.range())?;
        band.serialize_field("low_mhz", &self.low_mhz)?;
        band.serialize_field("high_mhz", &self.high_mhz)?;
        band.serialize_field("modes", self.modes)?;
        band.serialize_field("max_power_w", &self.max_power_w)?;
        band.end()
    }
}

use Mode::*;

const CW_SSB_DIGITAL: &[Mode] = &[Cw, Ssb, Digital];
const ALL_MODES: &[Mode] = &[Cw, Ssb, Digital, Fm];

#[rustfmt::skip]
pub const BAND_PLAN: &[Band] = &[
    Band { name: "160m", segment: Segment::Hf, low_mhz: 1.830, high_mhz: 1.850, modes: CW_SSB_DIGITAL, max_power_w: 500 },
    Band { name: "80m", segment: Segment::Hf, low_mhz: 3.500, high_mhz: 3.800, modes: CW_SSB_DIGITAL, max_power_w: 500 },
    Band { name: "40m", segment: Segment::Hf, low_mhz: 7.000, high_mhz: 7.200, modes: CW_SSB_DIGITAL, max_power_w: 500 },
    Band { name: "30m", segment: Segment::Hf, low_mhz: 10.100, high_mhz: 10.150, modes: &[Cw, Digital], max_power_w: 150 },
    Band { name: "20m", segment: Segment::Hf, low_mhz: 14.000, high_mhz: 14.350, modes: CW_SSB_DIGITAL, max_power_w: 500 },
    Band { name: "17m", segment: Segment::Hf, low_mhz: 18.068, high_mhz: 18.168, modes: CW_SSB_DIGITAL, max_power_w: 500 },
    Band { name: "15m", segment: Segment::Hf, low_mhz: 21.000, high_mhz: 21.450, modes: CW_SSB_DIGITAL, max_power_w: 500 },
    Band { name: "12m", segment: Segment::Hf, low_mhz: 24.890, high_mhz: 24.990, modes: CW_SSB_DIGITAL, max_power_w: 500 },
    Band { name: "10m", segment: Segment::Hf, low_mhz: 28.000, high_mhz: 29.700, modes: ALL_MODES, max_power_w: 500 },
    Band { name: "6m", segment: Segment::Vhf, low_mhz: 50.000, high_mhz: 52.000, modes: ALL_MODES, max_power_w: 500 },
    Band { name: "2m", segment: Segment::Vhf, low_mhz: 144.000, high_mhz: 146.000, modes: ALL_MODES, max_power_w: 500 },
    Band { name: "70cm", segment: Segment::Uhf, low_mhz: 430.000, high_mhz: 440.000, modes: ALL_MODES, max_power_w: 500 },
    Band { name: "23cm", segment: Segment::Uhf, low_mhz: 1240.000, high_mhz: 1300.000, modes: ALL_MODES, max_power_w: 500 },
];

pub fn all() -> &'static [Band] {
    BAND_PLAN
}

pub fn by_segment(segment: Segment) -> impl Iterator<Item = &'static Band> {
    BAND_PLAN.iter().filter(move |b| b.segment == segment)
}

/// Looks a band up by name, ignoring case.
pub fn find(name: &str) -> Option<&'static Band> {
    BAND_PLAN.iter().find(|b| b.name.eq_ignore_ascii_case(name))
}

/// The band a frequency (MHz) is in, if any.
pub fn for_frequency(frequency_mhz: f64) -> Option<&'static Band> {
    BAND_PLAN.iter().find(|b| b.contains(frequency_mhz))
}
