use std::process::ExitCode;

use clap::Parser;
use linux_embedded_hal::{Delay, I2CError, I2cdev};
use log::info;

use lidar_lite::{Error, LidarLite, Tracker};

mod args;

use args::Args;

fn diagnostic(message: impl std::fmt::Display) -> String {
    format!("lidar: {message}")
}

/// Final line printed before a failed exit. Goes straight to stderr so it
/// shows up whatever `RUST_LOG` says.
fn fatal(message: impl std::fmt::Display) -> ExitCode {
    eprintln!("{}", diagnostic(message));
    ExitCode::FAILURE
}

fn run(args: &Args, i2c: I2cdev) -> Result<(), Error<I2CError>> {
    let mut tracker = Tracker::new(LidarLite::new(i2c, Delay), args.tracker_config());

    if !args.skip_health_check {
        tracker.check_healthy()?;
    }

    info!("polling sensor on {}", args.bus);
    loop {
        let reading = tracker.poll()?;
        println!("{reading}");
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let i2c = match I2cdev::new(&args.bus) {
        Ok(i2c) => i2c,
        Err(e) => return fatal(format_args!("failed to open {}: {e}", args.bus)),
    };

    match run(&args, i2c) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => fatal(e),
    }
}
