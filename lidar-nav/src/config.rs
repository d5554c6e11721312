//! Runtime configuration, loaded from a TOML file.
//!
//! Every section and field is optional; missing values fall back to the
//! defaults the robot was tuned with.

use crate::constants::{
    DEFAULT_BAUD_RATE, DEFAULT_MOTOR_PWM, FRONT_HALF_WIDTH, LEFT_BAND, MAX_BUFFER_BYTES,
    MAX_DISTANCE, MIN_SCAN_LEN, POINTS_PER_UPDATE, REVERSE_HOLD_MS, RIGHT_BAND, SAFE_DISTANCE,
    SIDE_THRESHOLD, STOP_HOLD_MS,
};
use crate::error::NavError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct NavConfig {
    pub lidar: LidarConfig,
    pub sink: SinkConfig,
    pub acquisition: AcquisitionConfig,
    pub zones: ZoneConfig,
    pub maneuver: ManeuverConfig,
    pub logging: LoggingConfig,
}

/// Rangefinder serial link.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LidarConfig {
    /// Serial port name such as `/dev/ttyUSB0`.
    pub port: String,
    pub baud_rate: u32,
    /// Motor duty cycle sent when the session opens.
    pub motor_pwm: u16,
    /// Input backlog, in bytes, above which the scan is restarted.
    pub max_buffer_bytes: usize,
    /// Revolutions with this many samples or fewer are discarded.
    pub min_scan_len: usize,
}

/// Serial link to the drive controller.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SinkConfig {
    pub port: String,
    pub baud_rate: u32,
    pub timeout_ms: u64,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AcquisitionConfig {
    /// Samples kept from the start of each revolution.
    pub points_per_update: usize,
}

/// Angular windows and distance thresholds of the watched sectors.
///
/// Angles are in degrees, distances in millimeters.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ZoneConfig {
    /// Samples at or beyond this range are ignored.
    pub max_distance: f64,
    /// Front obstacle threshold.
    pub safe_distance: f64,
    /// Left and right obstacle threshold.
    pub side_threshold: f64,
    /// The front sector spans this many degrees on each side of 0.
    pub front_half_width: f64,
    pub left_band: (f64, f64),
    pub right_band: (f64, f64),
}

/// Hold times of the reverse, stop, turn-right escape.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ManeuverConfig {
    pub reverse_hold_ms: u64,
    pub stop_hold_ms: u64,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter (trace, debug, info, warn, error). `RUST_LOG` wins.
    pub level: String,
}

impl NavConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<NavConfig, NavError> {
        let contents = std::fs::read_to_string(path)?;
        NavConfig::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<NavConfig, NavError> {
        let config: NavConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), NavError> {
        if self.acquisition.points_per_update == 0 {
            return Err(NavError::ConfigError(
                "points_per_update must be positive".to_string(),
            ));
        }
        let zones = &self.zones;
        for (name, (low, high)) in [("left_band", zones.left_band), ("right_band", zones.right_band)] {
            if !(0. ..360.).contains(&low) || !(0. ..360.).contains(&high) || low > high {
                return Err(NavError::ConfigError(format!(
                    "{name} must be an ascending pair of angles in [0, 360)"
                )));
            }
        }
        if !(0. ..180.).contains(&zones.front_half_width) {
            return Err(NavError::ConfigError(
                "front_half_width must be in [0, 180)".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for LidarConfig {
    fn default() -> Self {
        LidarConfig {
            port: "/dev/ttyUSB0".to_string(),
            baud_rate: DEFAULT_BAUD_RATE,
            motor_pwm: DEFAULT_MOTOR_PWM,
            max_buffer_bytes: MAX_BUFFER_BYTES,
            min_scan_len: MIN_SCAN_LEN,
        }
    }
}

impl Default for SinkConfig {
    fn default() -> Self {
        SinkConfig {
            port: "/dev/ttyUSB1".to_string(),
            baud_rate: DEFAULT_BAUD_RATE,
            timeout_ms: 1000,
        }
    }
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        AcquisitionConfig {
            points_per_update: POINTS_PER_UPDATE,
        }
    }
}

impl Default for ZoneConfig {
    fn default() -> Self {
        ZoneConfig {
            max_distance: MAX_DISTANCE,
            safe_distance: SAFE_DISTANCE,
            side_threshold: SIDE_THRESHOLD,
            front_half_width: FRONT_HALF_WIDTH,
            left_band: LEFT_BAND,
            right_band: RIGHT_BAND,
        }
    }
}

impl ManeuverConfig {
    pub fn reverse_hold(&self) -> Duration {
        Duration::from_millis(self.reverse_hold_ms)
    }

    pub fn stop_hold(&self) -> Duration {
        Duration::from_millis(self.stop_hold_ms)
    }
}

impl Default for ManeuverConfig {
    fn default() -> Self {
        ManeuverConfig {
            reverse_hold_ms: REVERSE_HOLD_MS,
            stop_hold_ms: STOP_HOLD_MS,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
        }
    }
}
