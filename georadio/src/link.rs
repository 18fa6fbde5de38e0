//! A point-to-point link budget.
//!
//! Follows the power from the transmitter to the receiver: power in dBm,
//! plus antenna gains, minus path loss, compared against a fixed noise floor.
//! No feedline losses, fading margin or terrain. Use it to tell a hopeless
//! path from a comfortable one.

use std::fmt;

use crate::formulae::{atmospheric_loss_db, free_space_path_loss_db, round_to, watts_to_dbm};
use crate::{invalid, Result};

/// Receiver noise floor assumed for the SNR (dBm).
pub const NOISE_FLOOR_DBM: f64 = -102.0;

/// Coarse verdict on a link, from its SNR.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LinkQuality {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl LinkQuality {
    /// `>20 dB` excellent, `>10 dB` good, `>5 dB` fair, anything else poor.
    pub fn from_snr(snr_db: f64) -> Self {
        if snr_db > 20.0 {
            LinkQuality::Excellent
        } else if snr_db > 10.0 {
            LinkQuality::Good
        } else if snr_db > 5.0 {
            LinkQuality::Fair
        } else {
            LinkQuality::Poor
        }
    }
}

impl fmt::Display for LinkQuality {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            LinkQuality::Excellent => "Excellent",
            LinkQuality::Good => "Good",
            LinkQuality::Fair => "Fair",
            LinkQuality::Poor => "Poor",
        })
    }
}

/// Parameters of the link.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinkBudgetInput {
    /// Carrier frequency (MHz), positive.
    pub frequency_mhz: f64,

    /// Path length (km), zero or more.
    pub distance_km: f64,

    /// Transmitter output (W), positive.
    pub tx_power_w: f64,

    /// Transmit antenna gain (dBi).
    pub tx_gain_dbi: f64,

    /// Receive antenna gain (dBi).
    pub rx_gain_dbi: f64,
}

/// Where the power went.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinkBudgetResult {
    pub tx_power_dbm: f64,

    /// Free-space plus atmospheric loss (dB).
    pub path_loss_db: f64,

    pub rx_power_dbm: f64,

    /// Received power over [`NOISE_FLOOR_DBM`] (dB).
    pub snr_db: f64,

    pub link_quality: LinkQuality,
}

impl LinkBudgetResult {
    /// The same figures rounded for display. The quality is not re-derived.
    pub fn rounded(&self, decimals: u32) -> Self {
        Self {
            tx_power_dbm: round_to(self.tx_power_dbm, decimals),
            path_loss_db: round_to(self.path_loss_db, decimals),
            rx_power_dbm: round_to(self.rx_power_dbm, decimals),
            snr_db: round_to(self.snr_db, decimals),
            link_quality: self.link_quality,
        }
    }
}

/// Computes the budget.
///
/// ```text
/// tx      = 10·log10(P·1000)                        dBm
/// loss    = FSPL(f, d) + 0.1·d                      dB
/// rx      = tx + G_tx + G_rx − loss                 dBm
/// snr     = rx − (−102)                             dB
/// ```
///
/// Fails on a non-positive frequency or power, a negative distance, or gains
/// that aren't finite numbers.
pub fn link_budget(input: &LinkBudgetInput) -> Result<LinkBudgetResult> {
    if !input.tx_gain_dbi.is_finite() || !input.rx_gain_dbi.is_finite() {
        return Err(invalid(format!(
            "antenna gains {} / {} dBi must be finite",
            input.tx_gain_dbi, input.rx_gain_dbi
        )));
    }

    let fspl = free_space_path_loss_db(input.frequency_mhz, input.distance_km)?;
    let atmospheric = atmospheric_loss_db(input.distance_km)?;
    let tx_power_dbm = watts_to_dbm(input.tx_power_w)?;

    let path_loss_db = fspl + atmospheric;
    let rx_power_dbm = tx_power_dbm + input.tx_gain_dbi + input.rx_gain_dbi - path_loss_db;
    let snr_db = rx_power_dbm - NOISE_FLOOR_DBM;

    Ok(LinkBudgetResult {
        tx_power_dbm,
        path_loss_db,
        rx_power_dbm,
        snr_db,
        link_quality: LinkQuality::from_snr(snr_db),
    })
}
