mod acquisition;
mod arbiter;
mod classifier;
mod config;
mod constants;
mod error;
mod handoff;
mod navigator;
mod numeric;
mod packet;
mod serial;
mod sink;
mod source;
mod time;

use crate::constants::{
    HEADER_SIZE, LIDAR_ANS_LENGTH_DEVHEALTH, LIDAR_ANS_LENGTH_DEVINFO, LIDAR_ANS_TYPE_DEVHEALTH,
    LIDAR_ANS_TYPE_DEVINFO, LIDAR_CMD_GET_DEVICE_HEALTH, LIDAR_CMD_GET_DEVICE_INFO,
};
use crate::numeric::to_u32;
use crate::packet::validate_response_header;
use crate::serial::{read, send_command};
use crossbeam_channel::Receiver;
use lidar_nav_data::{DeviceHealth, DeviceInfo, HealthStatus, Scan};
use serialport::SerialPort;

pub use crate::acquisition::{Acquisition, AcquisitionStats};
pub use crate::arbiter::{decide, CommandArbiter, Decision};
pub use crate::classifier::classify;
pub use crate::config::{
    AcquisitionConfig, LidarConfig, LoggingConfig, ManeuverConfig, NavConfig, SinkConfig,
    ZoneConfig,
};
pub use crate::constants::{
    MAX_DISTANCE, POINTS_PER_UPDATE, REVERSE_HOLD_MS, SAFE_DISTANCE, SIDE_THRESHOLD, STOP_HOLD_MS,
};
pub use crate::error::NavError;
pub use crate::navigator::Navigator;
pub use crate::sink::{open_serial_sink, CommandSink, LineSink, SerialSink};
pub use crate::source::{RplidarSource, ScanSource};

pub fn check_device_health(port: &mut Box<dyn SerialPort>) -> Result<DeviceHealth, NavError> {
    send_command(port, LIDAR_CMD_GET_DEVICE_HEALTH)?;
    let header = read(port, HEADER_SIZE)?;
    validate_response_header(
        &header,
        Some(LIDAR_ANS_LENGTH_DEVHEALTH),
        LIDAR_ANS_TYPE_DEVHEALTH,
    )?;
    let health = read(port, LIDAR_ANS_LENGTH_DEVHEALTH as usize)?;

    let status = match health[0] {
        0 => HealthStatus::Good,
        1 => HealthStatus::Warning,
        _ => HealthStatus::Error,
    };
    Ok(DeviceHealth {
        status,
        error_code: to_u32(&health[1..3]) as u16,
    })
}

pub fn get_device_info(port: &mut Box<dyn SerialPort>) -> Result<DeviceInfo, NavError> {
    send_command(port, LIDAR_CMD_GET_DEVICE_INFO)?;
    let header = read(port, HEADER_SIZE)?;
    validate_response_header(
        &header,
        Some(LIDAR_ANS_LENGTH_DEVINFO),
        LIDAR_ANS_TYPE_DEVINFO,
    )?;
    let info = read(port, LIDAR_ANS_LENGTH_DEVINFO as usize)?;
    let mut serial_number = [0u8; 16];
    serial_number.copy_from_slice(&info[4..20]);
    Ok(DeviceInfo {
        model: info[0],
        firmware_major_version: info[2],
        firmware_minor_version: info[1],
        hardware_version: info[3],
        serial_number,
    })
}

/// Function to launch scan acquisition.
/// # Arguments
///
/// * `config` - Lidar port settings and the number of samples kept per scan.
pub fn run_lidar(config: &NavConfig) -> Result<(Acquisition, Receiver<Scan>), NavError> {
    config.validate()?;
    let source = RplidarSource::open(&config.lidar)?;
    Ok(Acquisition::start(
        source,
        config.acquisition.points_per_update,
    ))
}
