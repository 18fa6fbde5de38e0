#![forbid(unsafe_code)]
#![cfg_attr(feature = "cargo-clippy", deny(clippy_pedantic))]

use std::error::Error as _;
use std::process::ExitCode;

use chrono::Local;
use clap::Parser;
use env_logger::{Builder, Target};
use log::LevelFilter;
use rand::rngs::StdRng;
use rand::SeedableRng;

use radiodash::cli::{self, Cli};
use radiodash::config::StationConfig;
use radiodash::Error;

fn run(cli: &Cli) -> Result<(), Error> {
    let config = StationConfig::load(cli.config.as_deref())?;

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let now = Local::now().naive_local();
    let output = cli::execute(&cli.command, &config, now, &mut rng)?;
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    Builder::new()
        .filter_level(level)
        .parse_default_env()
        .target(Target::Stderr)
        .format_timestamp_secs()
        .format_module_path(false)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let mut message = err.to_string();
            let mut source = err.source();
            while let Some(cause) = source {
                message.push_str(&format!(": {}", cause));
                source = cause.source();
            }

            eprintln!("radiodash: {}", message);
            ExitCode::FAILURE
        }
    }
}
