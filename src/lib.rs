//! Radiodash: the services behind an amateur radio station dashboard.
//!
//! The geometry and RF arithmetic lives in the [`georadio`] crate. This crate
//! builds the rest of the dashboard on top of it:
//!
//!  - [`bands`]: the amateur band plan, with Italian power limits.
//!  - [`propagation`]: simulated HF band conditions from solar data.
//!  - [`satellites`]: the tracked satellites and simulated passes.
//!  - [`board`]: the guestbook, over a bounded in-memory log.
//!  - [`sstv`]: live and simulated SSTV transmissions.
//!  - [`config`]: where the station is.
//!  - [`cli`]: the command line surface tying it together.
//!
//! Nothing is persisted. Anything random takes its generator as an argument,
//! so a seeded generator reproduces a dashboard exactly.

#![forbid(unsafe_code)]
#![cfg_attr(feature = "cargo-clippy", deny(clippy_pedantic))]

use thiserror::Error;

pub mod bands;
pub mod board;
pub mod cli;
pub mod config;
pub mod propagation;
pub mod satellites;
pub mod sstv;

pub use georadio;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    InvalidInput(#[from] georadio::Error),
    #[error("configuration error")]
    Config(#[from] config::Error),
    #[error("json serialization error")]
    Json(#[from] serde_json::Error),
}
