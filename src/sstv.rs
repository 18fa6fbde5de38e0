//! Slow-scan TV activity: transmissions logged by operators, and a few
//! simulated signals to keep the waterfall interesting.

use chrono::{Duration, NaiveDateTime};
use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::board::{BoundedLog, Error};

/// How many live transmissions are kept.
pub const LOG_CAPACITY: usize = 10;

/// How long a live transmission stays on the air, in minutes.
pub const ACTIVE_MINUTES: i64 = 5;

pub const SSTV_MODES: &[&str] = &["Robot 36", "Martin M1", "Scottie S1"];

/// Callsigns heard on the simulated signals.
pub const SIMULATED_OPERATORS: &[&str] = &["IZ1ABC", "IK2XYZ", "IW3DEF"];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalReport {
    Excellent,
    Good,
    Fair,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalKind {
    Live,
    Simulated,
}

/// What an operator submits to go on the air. Every field is required.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct TransmissionRequest {
    pub frequency: Option<String>,
    pub mode: Option<String>,
    pub message: Option<String>,
    pub operator: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Transmission {
    /// Only live transmissions are numbered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub frequency: String,
    pub mode: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub message: String,
    pub operator: String,
    pub start_time: NaiveDateTime,
    pub active: bool,
    pub signal_quality: SignalReport,
    #[serde(rename = "type")]
    pub kind: SignalKind,
}

impl Transmission {
    /// Whether it started less than [`ACTIVE_MINUTES`] before `now`.
    pub fn is_on_air(&self, now: NaiveDateTime) -> bool {
        now - self.start_time < Duration::minutes(ACTIVE_MINUTES)
    }
}

/// Log of live transmissions.
#[derive(Clone, Debug)]
pub struct SstvLog {
    log: BoundedLog<Transmission>,
    next_id: u64,
}

impl Default for SstvLog {
    fn default() -> Self {
        Self {
            log: BoundedLog::new(LOG_CAPACITY),
            next_id: 1,
        }
    }
}

impl SstvLog {
    /// Puts a transmission on the air.
    ///
    /// Ids keep counting up across evictions, so they are never reused.
    pub fn transmit(
        &mut self,
        request: &TransmissionRequest,
        now: NaiveDateTime,
    ) -> Result<Transmission, Error> {
        let required = |field: &Option<String>, name: &'static str| {
            let value = field.as_deref().ok_or(Error::MissingField(name))?.trim();
            if value.is_empty() {
                Err(Error::MissingField(name))
            } else {
                Ok(value.to_string())
            }
        };

        let transmission = Transmission {
            id: Some(self.next_id),
            frequency: required(&request.frequency, "frequency")?,
            mode: required(&request.mode, "mode")?,
            message: required(&request.message, "message")?,
            operator: required(&request.operator, "operator")?,
            start_time: now,
            active: true,
            signal_quality: SignalReport::Excellent,
            kind: SignalKind::Live,
        };
        self.next_id += 1;

        if let Some(evicted) = self.log.push(transmission.clone()) {
            debug!("sstv log full, dropped transmission {:?}", evicted.id);
        }

        Ok(transmission)
    }

    /// Live transmissions still on the air, oldest first.
    pub fn active(&self, now: NaiveDateTime) -> Vec<&Transmission> {
        self.log.iter().filter(|t| t.is_on_air(now)).collect()
    }

    /// What the dashboard shows: live transmissions, then simulated ones.
    pub fn feed<R: Rng + ?Sized>(&self, now: NaiveDateTime, rng: &mut R) -> Vec<Transmission> {
        self.active(now)
            .into_iter()
            .cloned()
            .chain(simulated_signals(now, rng))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }
}

/// One or two made-up signals around 14.230 MHz, the 20m SSTV calling
/// frequency.
pub fn simulated_signals<R: Rng + ?Sized>(now: NaiveDateTime, rng: &mut R) -> Vec<Transmission> {
    let count = rng.gen_range(1..=2);
    (0..count)
        .map(|_| Transmission {
            id: None,
            frequency: format!("14.{}", rng.gen_range(230..=235)),
            mode: pick(SSTV_MODES, rng),
            message: String::new(),
            operator: pick(SIMULATED_OPERATORS, rng),
            start_time: now,
            active: true,
            signal_quality: *[SignalReport::Good, SignalReport::Fair, SignalReport::Excellent]
                .choose(rng)
                .unwrap_or(&SignalReport::Good),
            kind: SignalKind::Simulated,
        })
        .collect()
}

fn pick<R: Rng + ?Sized>(choices: &[&str], rng: &mut R) -> String {
    choices.choose(rng).copied().unwrap_or_default().to_string()
}
