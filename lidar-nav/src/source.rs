use crate::config::LidarConfig;
use crate::constants::NODE_SIZE;
use crate::error::NavError;
use crate::packet::parse_node;
use crate::serial::{get_n_read, read, start_motor, start_scan, stop_motor, stop_scan_and_flush};
use crate::check_device_health;
use lidar_nav_data::{HealthStatus, Sample};
use serialport::SerialPort;
use std::collections::VecDeque;
use std::io;

/// A rangefinder session producing one sample set per revolution.
pub trait ScanSource: Send {
    /// Returns the next complete revolution, or `None` when the current one is
    /// still being received.
    fn poll_revolution(&mut self) -> Result<Option<Vec<Sample>>, NavError>;

    /// Stops scanning and rotation, then releases the device. The session
    /// cannot be restarted afterwards.
    fn cease(&mut self) -> Result<(), NavError>;
}

/// Legacy scan session of an RPLIDAR attached to a serial port.
pub struct RplidarSource {
    port: Option<Box<dyn SerialPort>>,
    buffer: VecDeque<u8>,
    revolution: Vec<Sample>,
    max_buffer_bytes: usize,
    min_scan_len: usize,
}

impl RplidarSource {
    /// Opens the serial port named in `config` and starts scanning.
    pub fn open(config: &LidarConfig) -> Result<RplidarSource, NavError> {
        let port = serialport::new(&config.port, config.baud_rate)
            .timeout(std::time::Duration::from_millis(10))
            .open()?;
        log::info!("Opened lidar on \"{}\"", config.port);
        RplidarSource::from_port(port, config)
    }

    /// Starts the motor, checks the device health and starts the scan.
    ///
    /// A refused session stops the device again before the error is returned.
    pub fn from_port(
        mut port: Box<dyn SerialPort>,
        config: &LidarConfig,
    ) -> Result<RplidarSource, NavError> {
        start_motor(&mut port, config.motor_pwm)?;

        if let Err(e) = RplidarSource::begin_scan(&mut port) {
            if let Err(release_error) = release(&mut port) {
                log::warn!("Failed to stop the refused lidar: {release_error}");
            }
            return Err(e);
        }
        log::info!("Lidar scan started");

        Ok(RplidarSource {
            port: Some(port),
            buffer: VecDeque::new(),
            revolution: Vec::new(),
            max_buffer_bytes: config.max_buffer_bytes,
            min_scan_len: config.min_scan_len,
        })
    }

    fn begin_scan(port: &mut Box<dyn SerialPort>) -> Result<(), NavError> {
        let health = check_device_health(port)?;
        match health.status {
            HealthStatus::Good => (),
            HealthStatus::Warning => log::warn!(
                "Lidar reports a health warning. Error code = {:#06X}",
                health.error_code
            ),
            HealthStatus::Error => return Err(NavError::DeviceHealthError(health.error_code)),
        }
        start_scan(port)
    }

    fn restart_scan(port: &mut Box<dyn SerialPort>) -> Result<(), NavError> {
        stop_scan_and_flush(port)?;
        start_scan(port)
    }

    /// Consumes buffered nodes until a revolution completes.
    fn assemble(&mut self) -> Result<Option<Vec<Sample>>, NavError> {
        while self.buffer.len() >= NODE_SIZE {
            let raw = self.buffer.drain(..NODE_SIZE).collect::<Vec<_>>();
            let node = parse_node(&raw)?;

            let completed = if node.new_scan {
                Some(std::mem::take(&mut self.revolution))
            } else {
                None
            };

            if node.distance_mm > 0. {
                self.revolution
                    .push(Sample::new(node.quality, node.angle_degree, node.distance_mm));
            }

            match completed {
                Some(samples) if samples.len() > self.min_scan_len => return Ok(Some(samples)),
                _ => continue,
            }
        }
        Ok(None)
    }
}

impl ScanSource for RplidarSource {
    fn poll_revolution(&mut self) -> Result<Option<Vec<Sample>>, NavError> {
        let port = match self.port.as_mut() {
            Some(port) => port,
            None => {
                return Err(NavError::IoError(io::Error::new(
                    io::ErrorKind::NotConnected,
                    "lidar session already ceased",
                )))
            }
        };

        let n_read = get_n_read(port)?;
        if n_read > self.max_buffer_bytes {
            log::warn!(
                "{} bytes waiting in the lidar input buffer. Dropping them and restarting the scan.",
                n_read
            );
            RplidarSource::restart_scan(port)?;
            self.buffer.clear();
            self.revolution.clear();
            return Ok(None);
        }
        if n_read > 0 {
            self.buffer.extend(read(port, n_read)?);
        }

        self.assemble()
    }

    fn cease(&mut self) -> Result<(), NavError> {
        let mut port = match self.port.take() {
            Some(port) => port,
            None => return Ok(()),
        };
        let released = release(&mut port);
        drop(port);
        log::info!("Lidar session released");
        released
    }
}

/// Stops scanning and the motor. The motor is stopped even if the scan stop
/// fails; the first error is returned.
fn release(port: &mut Box<dyn SerialPort>) -> Result<(), NavError> {
    let stopped = stop_scan_and_flush(port);
    let motor = stop_motor(port);
    stopped.and(motor)
}

impl Drop for RplidarSource {
    fn drop(&mut self) {
        if let Err(e) = self.cease() {
            log::warn!("Failed to release the lidar: {e}");
        }
    }
}
