use crate::handoff::{latest_slot, LatestSlot};
use crate::source::ScanSource;
use crate::time::sleep_ms;
use crossbeam_channel::{bounded, Receiver, Sender};
use crossbeam_utils::Backoff;
use lidar_nav_data::Scan;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

/// Counters kept by the read loop.
#[derive(Debug, Default)]
pub struct AcquisitionStats {
    published: AtomicU64,
    replaced: AtomicU64,
}

impl AcquisitionStats {
    /// Number of scans handed to the consumer slot.
    pub fn published(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }

    /// Number of scans overwritten before the consumer took them.
    pub fn replaced(&self) -> u64 {
        self.replaced.load(Ordering::Relaxed)
    }
}

/// Handle to the acquisition read loop.
///
/// The loop stops when `stop` is called, when the handle is dropped, or when
/// the source reports an error. In every case the source is ceased by the
/// read loop thread before it exits.
pub struct Acquisition {
    terminator_tx: Sender<bool>,
    reader_thread: Mutex<Option<JoinHandle<()>>>,
    stats: Arc<AcquisitionStats>,
}

impl Acquisition {
    /// Spawns the read loop over `source`. Each revolution is cut to its first
    /// `points_per_update` samples and published to the returned receiver,
    /// which holds at most one scan.
    pub fn start<S>(source: S, points_per_update: usize) -> (Acquisition, Receiver<Scan>)
    where
        S: ScanSource + 'static,
    {
        let (terminator_tx, terminator_rx) = bounded(1);
        let (slot, scan_rx) = latest_slot::<Scan>();
        let stats = Arc::new(AcquisitionStats::default());

        let loop_stats = Arc::clone(&stats);
        let reader_thread = std::thread::spawn(move || {
            read_revolutions(source, slot, terminator_rx, points_per_update, &loop_stats);
        });
        log::info!("Scan acquisition started");

        let acquisition = Acquisition {
            terminator_tx,
            reader_thread: Mutex::new(Some(reader_thread)),
            stats,
        };
        (acquisition, scan_rx)
    }

    /// Terminates the read loop and waits for its thread to exit.
    ///
    /// Safe to call repeatedly and from several threads. Every call returns
    /// only once the thread is gone.
    pub fn stop(&self) {
        let mut reader_thread = self
            .reader_thread
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let thread = match reader_thread.take() {
            Some(thread) => thread,
            None => return,
        };
        // Full or disconnected both mean the loop is already on its way out.
        let _ = self.terminator_tx.try_send(true);
        if thread.join().is_err() {
            log::warn!("Scan acquisition thread panicked");
        }
        log::info!("Scan acquisition stopped");
    }

    /// Whether the read loop thread is still alive.
    pub fn is_running(&self) -> bool {
        self.reader_thread
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .as_ref()
            .map_or(false, |thread| !thread.is_finished())
    }

    pub fn stats(&self) -> &AcquisitionStats {
        &self.stats
    }
}

impl Drop for Acquisition {
    fn drop(&mut self) {
        self.stop();
    }
}

fn read_revolutions<S: ScanSource>(
    mut source: S,
    slot: LatestSlot<Scan>,
    terminator_rx: Receiver<bool>,
    points_per_update: usize,
    stats: &AcquisitionStats,
) {
    let backoff = Backoff::new();
    loop {
        if do_terminate(&terminator_rx) {
            break;
        }

        match source.poll_revolution() {
            Ok(Some(samples)) => {
                let scan = Scan::truncated(samples, points_per_update);
                if slot.publish(scan) {
                    stats.replaced.fetch_add(1, Ordering::Relaxed);
                }
                stats.published.fetch_add(1, Ordering::Relaxed);
                backoff.reset();
            }
            Ok(None) => {
                if backoff.is_completed() {
                    sleep_ms(1);
                } else {
                    backoff.snooze();
                }
            }
            Err(e) => {
                // Device faults end the stream the same way a stop request does.
                log::warn!("Lidar read loop ended: {e}");
                break;
            }
        }
    }

    if let Err(e) = source.cease() {
        log::warn!("Failed to cease the lidar session: {e}");
    }
}

fn do_terminate(terminator_rx: &Receiver<bool>) -> bool {
    terminator_rx.try_recv().unwrap_or(false)
}
