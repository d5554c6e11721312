use crate::config::SinkConfig;
use crate::error::NavError;
use lidar_nav_data::Command;
use serialport::SerialPort;
use std::io::Write;

/// Destination of motion commands. Writes are fire-and-forget: nothing is
/// read back from the controller.
pub trait CommandSink: Send {
    fn send(&mut self, command: Command) -> Result<(), NavError>;
}

/// Writes each command as its one-byte code followed by a newline.
pub struct LineSink<W: Write + Send> {
    writer: W,
}

impl<W: Write + Send> LineSink<W> {
    pub fn new(writer: W) -> LineSink<W> {
        LineSink { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> CommandSink for LineSink<W> {
    fn send(&mut self, command: Command) -> Result<(), NavError> {
        self.writer.write_all(&[command.code(), b'\n'])?;
        self.writer.flush()?;
        Ok(())
    }
}

pub type SerialSink = LineSink<Box<dyn SerialPort>>;

/// Opens the drive controller port.
pub fn open_serial_sink(config: &SinkConfig) -> Result<SerialSink, NavError> {
    let port = serialport::new(&config.port, config.baud_rate)
        .timeout(std::time::Duration::from_millis(config.timeout_ms))
        .open()?;
    log::info!("Opened drive controller on \"{}\"", config.port);
    Ok(LineSink::new(port))
}
