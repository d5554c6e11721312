use crate::acquisition::Acquisition;
use crate::arbiter::CommandArbiter;
use crate::config::NavConfig;
use crate::error::NavError;
use crate::sink::{open_serial_sink, CommandSink};
use crate::source::{RplidarSource, ScanSource};
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError};
use lidar_nav_data::{Command, Scan};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

const SHUTDOWN_POLL_MS: u64 = 100;
const OBSERVER_CAPACITY: usize = 64;

/// A navigation session: scan acquisition feeding the command arbiter.
pub struct Navigator {
    acquisition: Acquisition,
    scan_rx: Receiver<Scan>,
    arbiter: CommandArbiter,
}

impl Navigator {
    /// Opens the lidar and the drive controller named in `config`.
    ///
    /// A missing drive controller is not an error: the session runs and
    /// decides, but transmits nothing.
    pub fn open(config: &NavConfig) -> Result<Navigator, NavError> {
        config.validate()?;
        let sink = match open_serial_sink(&config.sink) {
            Ok(sink) => Some(Box::new(sink) as Box<dyn CommandSink>),
            Err(e) => {
                log::warn!(
                    "Drive controller unavailable on \"{}\": {e}. Commands will not be sent.",
                    config.sink.port
                );
                None
            }
        };
        let source = RplidarSource::open(&config.lidar)?;
        Ok(Navigator::start(source, sink, config))
    }

    pub fn start<S>(source: S, sink: Option<Box<dyn CommandSink>>, config: &NavConfig) -> Navigator
    where
        S: ScanSource + 'static,
    {
        let arbiter = CommandArbiter::new(sink, config.zones.clone(), config.maneuver.clone());
        let (acquisition, scan_rx) =
            Acquisition::start(source, config.acquisition.points_per_update);
        Navigator {
            acquisition,
            scan_rx,
            arbiter,
        }
    }

    /// Stream of decided commands for a presentation layer.
    pub fn observe(&mut self) -> Receiver<Command> {
        let (tx, rx) = bounded(OBSERVER_CAPACITY);
        self.arbiter.set_observer(tx);
        rx
    }

    /// Decides on each delivered scan until `shutdown` is raised or the scan
    /// stream ends. Returns the number of scans processed.
    pub fn run(&mut self, shutdown: &AtomicBool) -> u64 {
        let mut n_scans = 0;
        while !shutdown.load(Ordering::Relaxed) {
            match self
                .scan_rx
                .recv_timeout(Duration::from_millis(SHUTDOWN_POLL_MS))
            {
                Ok(scan) => {
                    self.arbiter.classify_and_decide(&scan);
                    n_scans += 1;
                }
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => {
                    log::info!("Scan stream ended");
                    break;
                }
            }
        }
        n_scans
    }

    pub fn last_command(&self) -> Option<Command> {
        self.arbiter.last_command()
    }

    pub fn acquisition(&self) -> &Acquisition {
        &self.acquisition
    }

    /// Stops acquisition and releases the drive controller.
    pub fn stop(self) {
        self.acquisition.stop();
        log::info!(
            "Navigation stopped after {} scans ({} coalesced)",
            self.acquisition.stats().published(),
            self.acquisition.stats().replaced()
        );
        drop(self.arbiter.into_sink());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ManeuverConfig;
    use crate::sink::LineSink;
    use crate::time::sleep_ms;
    use lidar_nav_data::Sample;
    use std::collections::VecDeque;
    use std::io::{self, Write};
    use std::sync::atomic::AtomicUsize;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Hands out one revolution per call, spaced so none is coalesced, then
    /// fails like an unplugged device.
    struct PacedSource {
        revolutions: VecDeque<Vec<Sample>>,
        ceased: Arc<AtomicUsize>,
    }

    impl ScanSource for PacedSource {
        fn poll_revolution(&mut self) -> Result<Option<Vec<Sample>>, NavError> {
            sleep_ms(50);
            match self.revolutions.pop_front() {
                Some(samples) => Ok(Some(samples)),
                None => Err(NavError::TimeoutError()),
            }
        }

        fn cease(&mut self) -> Result<(), NavError> {
            self.ceased.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn paced(revolutions: Vec<Vec<(f64, f64)>>) -> (PacedSource, Arc<AtomicUsize>) {
        let ceased = Arc::new(AtomicUsize::new(0));
        let source = PacedSource {
            revolutions: revolutions
                .into_iter()
                .map(|points| {
                    points
                        .into_iter()
                        .map(|(angle, distance)| Sample::new(15, angle, distance))
                        .collect()
                })
                .collect(),
            ceased: Arc::clone(&ceased),
        };
        (source, ceased)
    }

    fn quick_config() -> NavConfig {
        NavConfig {
            maneuver: ManeuverConfig {
                reverse_hold_ms: 0,
                stop_hold_ms: 0,
            },
            ..NavConfig::default()
        }
    }

    #[test]
    fn test_run_until_stream_ends() {
        let (source, ceased) = paced(vec![
            vec![(180., 500.)],
            vec![(3., 300.)],
            vec![(357., 200.), (120., 100.)],
        ]);
        let buffer = SharedBuffer::default();
        let sink = Box::new(LineSink::new(buffer.clone())) as Box<dyn CommandSink>;
        let mut navigator = Navigator::start(source, Some(sink), &quick_config());
        let observed = navigator.observe();

        let n_scans = navigator.run(&AtomicBool::new(false));

        assert_eq!(n_scans, 3);
        assert_eq!(navigator.last_command(), Some(Command::Stop));
        assert_eq!(buffer.0.lock().unwrap().as_slice(), b"f\ns\n");
        assert_eq!(
            observed.try_iter().collect::<Vec<_>>(),
            vec![Command::Forward, Command::Stop, Command::Stop]
        );
        assert_eq!(ceased.load(Ordering::SeqCst), 1);

        navigator.stop();
        assert_eq!(ceased.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_run_without_sink() {
        let (source, _) = paced(vec![vec![(3., 300.)]]);
        let mut navigator = Navigator::start(source, None, &quick_config());
        assert_eq!(navigator.run(&AtomicBool::new(false)), 1);
        assert_eq!(navigator.last_command(), None);
        navigator.stop();
    }

    #[test]
    fn test_shutdown_flag() {
        let (source, ceased) = paced(vec![vec![(3., 300.)]; 100]);
        let mut navigator = Navigator::start(source, None, &quick_config());

        assert_eq!(navigator.run(&AtomicBool::new(true)), 0);
        assert!(navigator.acquisition().is_running());

        navigator.stop();
        assert_eq!(ceased.load(Ordering::SeqCst), 1);
    }
}
