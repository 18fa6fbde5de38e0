//! Simulated HF propagation.
//!
//! Real band conditions come from ionosonde and solar observatory data. We
//! don't have those here, so this module fakes them: the solar flux follows
//! a daily sine, the planetary K-index is drawn around a quiet value, and the
//! band conditions are derived from both with a crude empirical model.
//!
//! The numbers are for show. What matters is the shape: higher flux opens
//! the upper bands (the MUF goes up), geomagnetic storms (high K) close them
//! and raise the noise.
//!
//! All sampling takes the random generator as an argument.

use std::f64::consts::PI;
use std::fmt;

use chrono::{NaiveDateTime, Timelike};
use georadio::round_to;
use log::trace;
use rand::Rng;
use rand_distr::StandardNormal;
use serde::Serialize;

/// Solar flux around which the model is centred (sfu).
pub const BASE_SOLAR_FLUX: f64 = 120.0;

/// Mean of the simulated K-index.
pub const QUIET_K_INDEX: f64 = 3.0;

/// Noise floor on a quiet band (dBm).
pub const QUIET_NOISE_DBM: f64 = -120.0;

/// HF bands the model covers, with their MUF at the base flux and K = 0 (MHz).
pub const HF_BASE_MUF: &[(&str, f64)] = &[
    ("80m", 4.0),
    ("40m", 8.0),
    ("30m", 12.0),
    ("20m", 16.0),
    ("17m", 19.0),
    ("15m", 22.0),
    ("12m", 25.0),
    ("10m", 28.0),
];

/// Solar activity at some instant.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SolarConditions {
    /// 10.7 cm solar radio flux (sfu).
    pub solar_flux: f64,

    /// Planetary K-index, 0 (quiet) to 9 (extreme storm).
    pub k_index: f64,
}

impl SolarConditions {
    pub fn new(solar_flux: f64, k_index: f64) -> Self {
        Self {
            solar_flux,
            k_index,
        }
    }

    /// Draws conditions for an hour of the day (0–23).
    pub fn sample<R: Rng + ?Sized>(hour: u32, rng: &mut R) -> Self {
        let solar_flux = BASE_SOLAR_FLUX + (f64::from(hour) * PI / 12.0).sin() * 10.0;

        let z: f64 = rng.sample(StandardNormal);
        let k_index = (QUIET_K_INDEX + z).max(0.0).min(9.0);

        Self {
            solar_flux,
            k_index,
        }
    }

    /// Overall verdict, the same for every band.
    pub fn condition(&self) -> Condition {
        if self.k_index <= 3.0 && self.solar_flux >= 110.0 {
            Condition::Excellent
        } else if self.k_index <= 5.0 && self.solar_flux >= 90.0 {
            Condition::Good
        } else if self.k_index <= 7.0 {
            Condition::Fair
        } else {
            Condition::Poor
        }
    }

    /// Maximum usable frequency for a band of the given base MUF (MHz).
    ///
    /// Scales up by 0.5% per sfu above the base flux, and down by 5% per K.
    pub fn muf_mhz(&self, base_muf_mhz: f64) -> f64 {
        base_muf_mhz
            * (1.0 + (self.solar_flux - BASE_SOLAR_FLUX) / 200.0)
            * (1.0 - self.k_index / 20.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Condition {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl Condition {
    /// Range the simulated reliability is drawn from (%).
    pub fn reliability_range(self) -> (f64, f64) {
        match self {
            Condition::Excellent => (85.0, 100.0),
            Condition::Good => (70.0, 85.0),
            Condition::Fair => (50.0, 70.0),
            Condition::Poor => (20.0, 50.0),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BandCondition {
    pub band: &'static str,
    pub condition: Condition,

    /// Band noise (dBm).
    pub noise_level: f64,

    /// Maximum usable frequency (MHz).
    pub muf: f64,

    /// Chance of a contact getting through (%).
    pub reliability: f64,
}

/// Conditions on every modelled HF band, in band order, rounded to 0.1.
pub fn band_conditions<R: Rng + ?Sized>(
    solar: &SolarConditions,
    rng: &mut R,
) -> Vec<BandCondition> {
    let condition = solar.condition();
    let (low, high) = condition.reliability_range();

    HF_BASE_MUF
        .iter()
        .map(|&(band, base_muf)| {
            let noise = QUIET_NOISE_DBM + solar.k_index * 2.0 + rng.gen_range(-5.0..=5.0);
            let reliability = rng.gen_range(low..=high);

            BandCondition {
                band,
                condition,
                noise_level: round_to(noise, 1),
                muf: round_to(solar.muf_mhz(base_muf), 1),
                reliability: round_to(reliability, 1),
            }
        })
        .collect()
}

/// A snapshot for the dashboard.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PropagationReport {
    pub timestamp: NaiveDateTime,
    pub solar_flux: f64,
    pub k_index: f64,
    pub bands: Vec<BandCondition>,
}

impl PropagationReport {
    pub fn sample<R: Rng + ?Sized>(now: NaiveDateTime, rng: &mut R) -> Self {
        let solar = SolarConditions::sample(now.hour(), rng);
        trace!(
            "solar flux {:.1} sfu, K {:.1}",
            solar.solar_flux,
            solar.k_index
        );

        Self {
            timestamp: now,
            solar_flux: round_to(solar.solar_flux, 1),
            k_index: round_to(solar.k_index, 1),
            bands: band_conditions(&solar, rng),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn flux_follows_the_day() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!((SolarConditions::sample(0, &mut rng).solar_flux - 120.0).abs() < 1e-9);
        assert!((SolarConditions::sample(6, &mut rng).solar_flux - 130.0).abs() < 1e-9);
        assert!((SolarConditions::sample(18, &mut rng).solar_flux - 110.0).abs() < 1e-9);
    }

    #[test]
    fn k_index_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        let samples: Vec<f64> = (0..2000)
            .map(|i| SolarConditions::sample(i % 24, &mut rng).k_index)
            .collect();

        assert!(samples.iter().all(|k| (0.0..=9.0).contains(k)));

        let mean = samples.iter().sum::<f64>() / samples.len() as f64;
        assert!((mean - 3.0).abs() < 0.15, "{}", mean);
    }

    #[test]
    fn seeded_samples_repeat() {
        let a = SolarConditions::sample(10, &mut StdRng::seed_from_u64(9));
        let b = SolarConditions::sample(10, &mut StdRng::seed_from_u64(9));
        assert_eq!(a, b);
    }

    #[test]
    fn condition_thresholds() {
        assert_eq!(SolarConditions::new(110.0, 3.0).condition(), Condition::Excellent);
        assert_eq!(SolarConditions::new(109.9, 3.0).condition(), Condition::Good);
        assert_eq!(SolarConditions::new(150.0, 3.1).condition(), Condition::Good);
        assert_eq!(SolarConditions::new(89.0, 1.0).condition(), Condition::Fair);
        assert_eq!(SolarConditions::new(150.0, 7.0).condition(), Condition::Fair);
        assert_eq!(SolarConditions::new(150.0, 7.5).condition(), Condition::Poor);
    }

    #[test]
    fn muf_scales_with_flux_and_k() {
        let quiet = SolarConditions::new(120.0, 0.0);
        assert_eq!(quiet.muf_mhz(16.0), 16.0);

        // +20 sfu is +10%, K 4 is -20%
        let busy = SolarConditions::new(140.0, 4.0);
        assert!((busy.muf_mhz(16.0) - 16.0 * 1.1 * 0.8).abs() < 1e-9);
    }

    #[test]
    fn bands_cover_the_hf_plan() {
        for (band, _) in HF_BASE_MUF {
            assert!(crate::bands::find(band).is_some(), "{} not in band plan", band);
        }
    }

    #[test]
    fn band_conditions_stay_within_the_model() {
        let mut rng = StdRng::seed_from_u64(3);
        let solar = SolarConditions::new(125.0, 2.0);
        let bands = band_conditions(&solar, &mut rng);

        assert_eq!(bands.len(), HF_BASE_MUF.len());
        assert_eq!(bands[0].band, "80m");
        assert_eq!(bands[7].band, "10m");

        for b in &bands {
            assert_eq!(b.condition, Condition::Excellent);
            assert!((85.0..=100.0).contains(&b.reliability));
            assert!((-121.0..=-111.0).contains(&b.noise_level), "{}", b.noise_level);
        }

        // 28 · 1.025 · 0.9
        assert_eq!(bands[7].muf, 25.8);
    }

    #[test]
    fn report_is_rounded() {
        let now = NaiveDate::from_ymd_opt(2024, 3, 21)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap();
        let report = PropagationReport::sample(now, &mut StdRng::seed_from_u64(11));

        assert_eq!(report.timestamp, now);
        assert_eq!(report.solar_flux, round_to(report.solar_flux, 1));
        assert_eq!(report.k_index, round_to(report.k_index, 1));
        assert_eq!(report.bands.len(), 8);

        let json = serde_json::to_value(&report).unwrap();
        assert!(json["bands"][3]["muf"].is_number());
        assert_eq!(json["bands"][3]["band"], "20m");
    }
}
