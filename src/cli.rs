//! The command line.
//!
//! Every subcommand answers with a JSON document, which `main` pretty-prints.
//! Figures that come out of a formula are rounded to two decimals for display.

use std::path::PathBuf;

use chrono::NaiveDateTime;
use clap::{ArgAction, ArgGroup, Parser, Subcommand};
use georadio::{
    atmospheric_loss_db, distance_km, free_space_path_loss_db, grid_to_lat_lon,
    initial_bearing_deg, lat_lon_to_grid, link_budget, round_to, GeoPoint, LinkBudgetInput,
};
use log::debug;
use rand::Rng;
use serde_json::{json, Value};

use crate::bands::{self, Segment};
use crate::config::StationConfig;
use crate::propagation::PropagationReport;
use crate::satellites;
use crate::sstv::SstvLog;
use crate::Error;

/// Decimals kept in computed figures.
const DISPLAY_DECIMALS: u32 = 2;

#[derive(Parser, Debug)]
#[command(name = "radiodash", version, about = "Amateur radio station dashboard")]
pub struct Cli {
    #[arg(
        long,
        global = true,
        help = "Station config (TOML), defaults to ~/.config/radiodash/station.toml"
    )]
    pub config: Option<PathBuf>,
    #[arg(
        short,
        long,
        global = true,
        action = ArgAction::Count,
        help = "More logging, repeat for more"
    )]
    pub verbose: u8,
    #[arg(long, global = true, help = "Seed the simulations, for repeatable output")]
    pub seed: Option<u64>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Great-circle distance and beam heading
    Distance {
        #[arg(long, allow_hyphen_values = true, help = "LAT,LON, defaults to the station")]
        from: Option<GeoPoint>,
        #[arg(long, allow_hyphen_values = true, help = "LAT,LON")]
        to: GeoPoint,
    },
    /// Maidenhead locator to coordinates, or back
    #[command(group(ArgGroup::new("input").required(true).args(["code", "lat"])))]
    Grid {
        code: Option<String>,
        #[arg(long, allow_negative_numbers = true, requires = "lon")]
        lat: Option<f64>,
        #[arg(long, allow_negative_numbers = true, requires = "lat")]
        lon: Option<f64>,
    },
    /// Free-space path loss
    Fspl {
        #[arg(long, help = "MHz")]
        frequency: f64,
        #[arg(long, help = "km")]
        distance: f64,
    },
    /// Point-to-point link budget
    LinkBudget {
        #[arg(long, help = "MHz")]
        frequency: f64,
        #[arg(long, help = "km")]
        distance: f64,
        #[arg(long, help = "W")]
        tx_power: f64,
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true, help = "dBi")]
        tx_gain: f64,
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true, help = "dBi")]
        rx_gain: f64,
    },
    /// The band plan, or the band a frequency is in
    Bands {
        #[arg(long, help = "MHz")]
        frequency: Option<f64>,
    },
    /// Simulated HF conditions
    Propagation,
    /// Tracked satellites and their next passes
    Satellites,
    /// SSTV activity
    Sstv,
}

/// Runs a command against the station config.
pub fn execute<R: Rng + ?Sized>(
    command: &Command,
    config: &StationConfig,
    now: NaiveDateTime,
    rng: &mut R,
) -> Result<Value, Error> {
    debug!("running {:?}", command);

    Ok(match command {
        Command::Distance { from, to } => {
            let from = match from {
                Some(point) => *point,
                None => config.location()?,
            };

            json!({
                "from": from,
                "to": to,
                "distance_km": round_to(distance_km(from, *to), DISPLAY_DECIMALS),
                "azimuth_deg": round_to(initial_bearing_deg(from, *to), DISPLAY_DECIMALS),
            })
        }

        Command::Grid { code: Some(code), .. } => {
            let point = grid_to_lat_lon(code)?;
            json!({
                "grid": code.trim().to_ascii_uppercase(),
                "lat": point.latitude(),
                "lon": point.longitude(),
            })
        }

        Command::Grid { lat, lon, .. } => {
            // clap enforces both when there is no code
            let point = GeoPoint::new(lat.unwrap_or(f64::NAN), lon.unwrap_or(f64::NAN))?;
            json!({
                "lat": point.latitude(),
                "lon": point.longitude(),
                "grid": lat_lon_to_grid(point),
            })
        }

        Command::Fspl {
            frequency,
            distance,
        } => {
            let fspl = free_space_path_loss_db(*frequency, *distance)?;
            let atmospheric = atmospheric_loss_db(*distance)?;

            json!({
                "frequency_mhz": frequency,
                "distance_km": distance,
                "fspl_db": round_to(fspl, DISPLAY_DECIMALS),
                "atmospheric_loss_db": round_to(atmospheric, DISPLAY_DECIMALS),
                "total_loss_db": round_to(fspl + atmospheric, DISPLAY_DECIMALS),
            })
        }

        Command::LinkBudget {
            frequency,
            distance,
            tx_power,
            tx_gain,
            rx_gain,
        } => {
            let input = LinkBudgetInput {
                frequency_mhz: *frequency,
                distance_km: *distance,
                tx_power_w: *tx_power,
                tx_gain_dbi: *tx_gain,
                rx_gain_dbi: *rx_gain,
            };

            serde_json::to_value(link_budget(&input)?.rounded(DISPLAY_DECIMALS))?
        }

        Command::Bands {
            frequency: Some(frequency),
        } => json!({
            "frequency_mhz": frequency,
            "band": bands::for_frequency(*frequency),
        }),

        Command::Bands { frequency: None } => {
            let segment = |s| bands::by_segment(s).collect::<Vec<_>>();
            json!({
                "HF": segment(Segment::Hf),
                "VHF": segment(Segment::Vhf),
                "UHF": segment(Segment::Uhf),
            })
        }

        Command::Propagation => serde_json::to_value(PropagationReport::sample(now, rng))?,

        Command::Satellites => serde_json::to_value(satellites::report(now, rng))?,

        // nothing is live in a one-shot process, so this is the simulated feed
        Command::Sstv => serde_json::to_value(SstvLog::default().feed(now, rng))?,
    })
}
