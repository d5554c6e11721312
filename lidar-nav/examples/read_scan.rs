use clap::{Arg, Command};
use lidar_nav::{classify, run_lidar, NavConfig};

fn get_port_name() -> String {
    let matches = Command::new("LiDAR data receiver.")
        .about("Reads scans from the LiDAR and prints the obstacle zones.")
        .disable_version_flag(true)
        .arg(
            Arg::new("port")
                .help("The device path to a serial port")
                .use_value_delimiter(false)
                .required(true),
        )
        .get_matches();

    let port_name: &String = matches.get_one("port").unwrap();
    port_name.to_string()
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut config = NavConfig::default();
    config.lidar.port = get_port_name();

    let (acquisition, scan_rx) = match run_lidar(&config) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Failed to start the lidar on \"{}\". Error: {}", config.lidar.port, e);
            std::process::exit(1);
        }
    };

    for scan in scan_rx.iter().take(100) {
        let zones = classify(&scan, &config.zones);
        let nearest = scan
            .iter()
            .map(|s| s.distance_mm)
            .fold(f64::INFINITY, f64::min);
        println!(
            "{:4} samples, nearest {:7.1} mm, front={} left={} right={}",
            scan.len(),
            nearest,
            zones.front,
            zones.left,
            zones.right
        );
    }

    acquisition.stop();
}
