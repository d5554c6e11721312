use crate::classifier::classify;
use crate::config::{ManeuverConfig, ZoneConfig};
use crate::sink::CommandSink;
use crossbeam_channel::{Sender, TrySendError};
use lidar_nav_data::{Command, Scan, ZoneState};

/// Outcome of the decision table for one scan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    /// Transmit a single command.
    Drive(Command),
    /// Blocked on all sides: reverse, hold, stop, hold, then turn right.
    Escape,
}

/// Maps a zone combination to a decision. First match wins.
pub fn decide(zones: ZoneState) -> Decision {
    match (zones.front, zones.left, zones.right) {
        (true, true, true) => Decision::Escape,
        (true, true, false) => Decision::Drive(Command::TurnRight),
        (true, false, true) => Decision::Drive(Command::TurnLeft),
        (true, false, false) => Decision::Drive(Command::Stop),
        (false, _, _) => Decision::Drive(Command::Forward),
    }
}

/// Owns the command sink and the last transmitted command.
///
/// A command is only transmitted when it differs from the last one that was
/// transmitted successfully. Failed writes are logged and leave the last
/// command untouched, so the next decision tries again.
pub struct CommandArbiter {
    sink: Option<Box<dyn CommandSink>>,
    last_command: Option<Command>,
    zones: ZoneConfig,
    maneuver: ManeuverConfig,
    observer: Option<Sender<Command>>,
}

impl CommandArbiter {
    /// Without a sink, decisions are still computed but nothing is transmitted.
    pub fn new(
        sink: Option<Box<dyn CommandSink>>,
        zones: ZoneConfig,
        maneuver: ManeuverConfig,
    ) -> CommandArbiter {
        CommandArbiter {
            sink,
            last_command: None,
            zones,
            maneuver,
            observer: None,
        }
    }

    /// Reports every decided command to `observer`, whether or not it gets
    /// transmitted. Commands are dropped when the observer lags behind.
    pub fn set_observer(&mut self, observer: Sender<Command>) {
        self.observer = Some(observer);
    }

    /// Last command written to the sink, `None` until the first success.
    pub fn last_command(&self) -> Option<Command> {
        self.last_command
    }

    pub fn has_sink(&self) -> bool {
        self.sink.is_some()
    }

    /// Releases the sink, ending the session.
    pub fn into_sink(self) -> Option<Box<dyn CommandSink>> {
        self.sink
    }

    /// Classifies `scan`, runs the decision and returns the command the robot
    /// is left with.
    pub fn classify_and_decide(&mut self, scan: &Scan) -> Command {
        let zones = classify(scan, &self.zones);
        let decision = decide(zones);
        log::debug!(
            "{} samples, front={} left={} right={} -> {:?}",
            scan.len(),
            zones.front,
            zones.left,
            zones.right,
            decision
        );
        self.execute(decision)
    }

    /// Carries out `decision`. The escape blocks the caller for the two hold
    /// times and cannot be interrupted.
    pub fn execute(&mut self, decision: Decision) -> Command {
        match decision {
            Decision::Drive(command) => {
                self.emit(command);
                command
            }
            Decision::Escape => {
                self.emit(Command::Reverse);
                self.hold(self.maneuver.reverse_hold());
                self.emit(Command::Stop);
                self.hold(self.maneuver.stop_hold());
                self.emit(Command::TurnRight);
                Command::TurnRight
            }
        }
    }

    fn hold(&self, duration: std::time::Duration) {
        // Nothing is moving without a controller.
        if self.sink.is_some() {
            std::thread::sleep(duration);
        }
    }

    /// Returns `true` if `command` was written to the sink.
    fn emit(&mut self, command: Command) -> bool {
        self.notify(command);

        let sink = match self.sink.as_mut() {
            Some(sink) => sink,
            None => return false,
        };
        if self.last_command == Some(command) {
            log::trace!("Suppressed repeated {command}");
            return false;
        }
        match sink.send(command) {
            Ok(()) => {
                log::info!("Sent {command}");
                self.last_command = Some(command);
                true
            }
            Err(e) => {
                log::warn!("Failed to send {command}: {e}");
                false
            }
        }
    }

    fn notify(&mut self, command: Command) {
        if let Some(observer) = &self.observer {
            if let Err(TrySendError::Disconnected(_)) = observer.try_send(command) {
                self.observer = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NavError;
    use lidar_nav_data::Sample;
    use std::io;
    use std::sync::{Arc, Mutex};
    use std::time::{Duration, Instant};

    #[derive(Clone, Default)]
    struct RecordingSink {
        sent: Arc<Mutex<Vec<Command>>>,
        failures_left: Arc<Mutex<usize>>,
    }

    impl RecordingSink {
        fn failing(times: usize) -> RecordingSink {
            let sink = RecordingSink::default();
            *sink.failures_left.lock().unwrap() = times;
            sink
        }

        fn sent(&self) -> Vec<Command> {
            self.sent.lock().unwrap().clone()
        }
    }

    impl CommandSink for RecordingSink {
        fn send(&mut self, command: Command) -> Result<(), NavError> {
            let mut failures_left = self.failures_left.lock().unwrap();
            if *failures_left > 0 {
                *failures_left -= 1;
                return Err(NavError::IoError(io::Error::new(
                    io::ErrorKind::BrokenPipe,
                    "unplugged",
                )));
            }
            self.sent.lock().unwrap().push(command);
            Ok(())
        }
    }

    fn no_holds() -> ManeuverConfig {
        ManeuverConfig {
            reverse_hold_ms: 0,
            stop_hold_ms: 0,
        }
    }

    fn arbiter_with(sink: &RecordingSink, maneuver: ManeuverConfig) -> CommandArbiter {
        CommandArbiter::new(
            Some(Box::new(sink.clone())),
            ZoneConfig::default(),
            maneuver,
        )
    }

    fn scan(points: &[(f64, f64)]) -> Scan {
        Scan::from_samples(
            points
                .iter()
                .map(|&(angle, distance)| Sample::new(15, angle, distance))
                .collect(),
        )
    }

    fn zones(front: bool, left: bool, right: bool) -> ZoneState {
        ZoneState { front, left, right }
    }

    const ALL_BLOCKED: [(f64, f64); 3] = [(0., 300.), (90., 200.), (270., 200.)];

    #[test]
    fn test_decision_table() {
        assert_eq!(decide(zones(true, true, true)), Decision::Escape);
        assert_eq!(
            decide(zones(true, true, false)),
            Decision::Drive(Command::TurnRight)
        );
        assert_eq!(
            decide(zones(true, false, true)),
            Decision::Drive(Command::TurnLeft)
        );
        assert_eq!(
            decide(zones(true, false, false)),
            Decision::Drive(Command::Stop)
        );
        for (left, right) in [(false, false), (true, false), (false, true), (true, true)] {
            assert_eq!(
                decide(zones(false, left, right)),
                Decision::Drive(Command::Forward)
            );
        }
    }

    #[test]
    fn test_front_obstacle_stops() {
        let sink = RecordingSink::default();
        let mut arbiter = arbiter_with(&sink, no_holds());
        assert_eq!(arbiter.classify_and_decide(&scan(&[(5., 300.)])), Command::Stop);
        assert_eq!(sink.sent(), vec![Command::Stop]);
        assert_eq!(arbiter.last_command(), Some(Command::Stop));
    }

    #[test]
    fn test_front_and_left_turns_right() {
        let sink = RecordingSink::default();
        let mut arbiter = arbiter_with(&sink, no_holds());
        let command = arbiter.classify_and_decide(&scan(&[(0., 300.), (90., 200.)]));
        assert_eq!(command, Command::TurnRight);
        assert_eq!(sink.sent(), vec![Command::TurnRight]);
    }

    #[test]
    fn test_side_obstacles_alone_go_forward() {
        let sink = RecordingSink::default();
        let mut arbiter = arbiter_with(&sink, no_holds());
        let command = arbiter.classify_and_decide(&scan(&[(90., 100.), (270., 100.), (5., 700.)]));
        assert_eq!(command, Command::Forward);
        assert_eq!(sink.sent(), vec![Command::Forward]);
    }

    #[test]
    fn test_repeated_decision_is_sent_once() {
        let sink = RecordingSink::default();
        let mut arbiter = arbiter_with(&sink, no_holds());
        arbiter.classify_and_decide(&scan(&[(180., 300.)]));
        arbiter.classify_and_decide(&scan(&[(45., 1000.)]));
        arbiter.classify_and_decide(&scan(&[(0., 200.), (280., 100.)]));
        arbiter.classify_and_decide(&scan(&[(355., 500.), (265., 100.)]));
        assert_eq!(sink.sent(), vec![Command::Forward, Command::TurnLeft]);
    }

    #[test]
    fn test_escape_sequence() {
        let sink = RecordingSink::default();
        let mut arbiter = arbiter_with(&sink, no_holds());
        let command = arbiter.classify_and_decide(&scan(&ALL_BLOCKED));
        assert_eq!(command, Command::TurnRight);
        assert_eq!(
            sink.sent(),
            vec![Command::Reverse, Command::Stop, Command::TurnRight]
        );
    }

    #[test]
    fn test_escape_steps_are_deduplicated() {
        let sink = RecordingSink::default();
        let mut arbiter = arbiter_with(&sink, no_holds());
        arbiter.execute(Decision::Drive(Command::Reverse));
        arbiter.classify_and_decide(&scan(&ALL_BLOCKED));
        // a second escape starts from turn-right, so every step is sent again
        arbiter.classify_and_decide(&scan(&ALL_BLOCKED));
        assert_eq!(
            sink.sent(),
            vec![
                Command::Reverse,
                Command::Stop,
                Command::TurnRight,
                Command::Reverse,
                Command::Stop,
                Command::TurnRight,
            ]
        );
    }

    #[test]
    fn test_escape_holds() {
        let sink = RecordingSink::default();
        let mut arbiter = arbiter_with(&sink, ManeuverConfig::default());
        let start = Instant::now();
        arbiter.execute(Decision::Escape);
        assert!(start.elapsed() >= Duration::from_millis(700));
        assert_eq!(sink.sent().len(), 3);
    }

    #[test]
    fn test_failed_write_is_retried() {
        let sink = RecordingSink::failing(1);
        let mut arbiter = arbiter_with(&sink, no_holds());

        arbiter.classify_and_decide(&scan(&[(5., 300.)]));
        assert!(sink.sent().is_empty());
        assert_eq!(arbiter.last_command(), None);

        arbiter.classify_and_decide(&scan(&[(5., 300.)]));
        assert_eq!(sink.sent(), vec![Command::Stop]);
        assert_eq!(arbiter.last_command(), Some(Command::Stop));
    }

    #[test]
    fn test_failed_step_keeps_previous_command() {
        let sink = RecordingSink::default();
        let mut arbiter = arbiter_with(&sink, no_holds());
        arbiter.execute(Decision::Drive(Command::Forward));

        *sink.failures_left.lock().unwrap() = 1;
        arbiter.execute(Decision::Drive(Command::Stop));
        assert_eq!(arbiter.last_command(), Some(Command::Forward));
        assert_eq!(sink.sent(), vec![Command::Forward]);
    }

    #[test]
    fn test_without_sink() {
        let mut arbiter =
            CommandArbiter::new(None, ZoneConfig::default(), ManeuverConfig::default());
        assert!(!arbiter.has_sink());
        assert_eq!(arbiter.classify_and_decide(&scan(&[])), Command::Forward);

        let start = Instant::now();
        assert_eq!(
            arbiter.classify_and_decide(&scan(&ALL_BLOCKED)),
            Command::TurnRight
        );
        assert!(start.elapsed() < Duration::from_millis(500));
        assert_eq!(arbiter.last_command(), None);
    }

    #[test]
    fn test_observer_receives_decisions() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let sink = RecordingSink::default();
        let mut arbiter = arbiter_with(&sink, no_holds());
        arbiter.set_observer(tx);

        arbiter.classify_and_decide(&scan(&[]));
        arbiter.classify_and_decide(&scan(&[]));
        arbiter.classify_and_decide(&scan(&ALL_BLOCKED));

        let observed = rx.try_iter().collect::<Vec<_>>();
        assert_eq!(
            observed,
            vec![
                Command::Forward,
                Command::Forward,
                Command::Reverse,
                Command::Stop,
                Command::TurnRight,
            ]
        );
        assert_eq!(sink.sent().len(), 4);

        drop(rx);
        arbiter.classify_and_decide(&scan(&[]));
        assert!(arbiter.observer.is_none());
    }
}
