use clap::Parser;
use lidar_nav::{NavConfig, Navigator};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Drives the robot away from obstacles seen by the lidar.
#[derive(Parser)]
#[command(disable_version_flag = true)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// The device path to the lidar serial port
    #[arg(long)]
    lidar_port: Option<String>,
    /// The device path to the drive controller serial port
    #[arg(long)]
    controller_port: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => NavConfig::from_file(path)?,
        None => NavConfig::default(),
    };
    if let Some(port) = args.lidar_port {
        config.lidar.port = port;
    }
    if let Some(port) = args.controller_port {
        config.sink.port = port;
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.logging.level))
        .init();

    let shutdown = Arc::new(AtomicBool::new(false));
    signal_hook::flag::register(signal_hook::consts::SIGINT, Arc::clone(&shutdown))?;
    signal_hook::flag::register(signal_hook::consts::SIGTERM, Arc::clone(&shutdown))?;

    let mut navigator = Navigator::open(&config)?;
    let n_scans = navigator.run(&shutdown);
    log::info!("Processed {} scans", n_scans);
    navigator.stop();
    Ok(())
}
