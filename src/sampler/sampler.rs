//! Background sampling loop and its start/stop lifecycle.
//!
//! The loop thread owns the [`SampleTree`] outright. `stop` wakes the loop,
//! joins it and receives the tree back by value, so nothing can still be
//! inserting while the tree is serialized.

use super::schedule::{time_until_next_run, DelaySource, FixedDelay};
use super::sink::{DirectorySink, SinkFactory};
use super::snapshot::StackSnapshotProvider;
use crate::output::write_json;
use crate::tree::SampleTree;
use crate::utils::config::{sample_file_name, SamplerConfig};
use crate::utils::error::{OutputError, SamplerError};
use chrono::Utc;
use log::{debug, info, warn};
use std::mem;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Instant;

static SAMPLER_SEQ: AtomicU64 = AtomicU64::new(0);

/// Lifecycle state of a sampler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplerState {
    Stopped,
    Running,
}

/// Collaborators handed to the loop thread and returned on join
struct Collaborators {
    provider: Box<dyn StackSnapshotProvider>,
    delay: Box<dyn DelaySource>,
}

struct LoopOutcome {
    tree: SampleTree,
    cycles: u64,
    parts: Collaborators,
}

struct Worker {
    handle: JoinHandle<LoopOutcome>,
    wake: Sender<()>,
}

enum Slot {
    Idle(Collaborators),
    Running(Worker),
    // the loop thread panicked or never started; collaborators are gone
    Lost,
}

/// Periodically snapshots every live thread's stack into a sample tree.
///
/// `start` and `stop` may be called from any thread; a double start or
/// double stop is rejected. Each successful `stop` writes one
/// `performance-sample-<epoch millis>.json` to the sink and resets the tree.
pub struct Sampler {
    running: Arc<AtomicBool>,
    sink: Box<dyn SinkFactory>,
    slot: Mutex<Slot>,
}

impl Sampler {
    pub fn new<P, D, S>(provider: P, delay: D, sink: S) -> Self
    where
        P: StackSnapshotProvider + 'static,
        D: DelaySource + 'static,
        S: SinkFactory + 'static,
    {
        Self {
            running: Arc::new(AtomicBool::new(false)),
            sink: Box::new(sink),
            slot: Mutex::new(Slot::Idle(Collaborators {
                provider: Box::new(provider),
                delay: Box::new(delay),
            })),
        }
    }

    /// Sample at a fixed interval and write into a directory
    pub fn from_config<P>(config: &SamplerConfig, provider: P) -> Self
    where
        P: StackSnapshotProvider + 'static,
    {
        Self::new(
            provider,
            FixedDelay(config.interval),
            DirectorySink::new(&config.output_dir),
        )
    }

    pub fn state(&self) -> SamplerState {
        if self.is_running() {
            SamplerState::Running
        } else {
            SamplerState::Stopped
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Spawn the sampling thread with an empty tree.
    ///
    /// # Errors
    /// * `SamplerError::AlreadyRunning` - a run is in progress
    /// * `SamplerError::SpawnFailed` - the OS refused the thread
    /// * `SamplerError::WorkerPanicked` - an earlier run lost the collaborators
    pub fn start(&self) -> Result<(), SamplerError> {
        let mut slot = self.lock_slot();

        if self.running.swap(true, Ordering::SeqCst) {
            return Err(SamplerError::AlreadyRunning);
        }

        let parts = match mem::replace(&mut *slot, Slot::Lost) {
            Slot::Idle(parts) => parts,
            other => {
                *slot = other;
                self.running.store(false, Ordering::SeqCst);
                return Err(SamplerError::WorkerPanicked);
            }
        };

        let (wake, wake_rx) = mpsc::channel();
        let running = Arc::clone(&self.running);
        let name = format!("stack-sampler-{}", SAMPLER_SEQ.fetch_add(1, Ordering::Relaxed));

        let handle = thread::Builder::new()
            .name(name.clone())
            .spawn(move || run_loop(parts, running, wake_rx))
            .map_err(|e| {
                self.running.store(false, Ordering::SeqCst);
                SamplerError::SpawnFailed(e)
            })?;

        *slot = Slot::Running(Worker { handle, wake });
        info!("Sampling started on thread {}", name);

        Ok(())
    }

    /// Stop sampling and write the collected tree.
    ///
    /// Waits for the in-flight cycle (if any) to finish, then serializes.
    /// Returns the generated sink name.
    ///
    /// # Errors
    /// * `SamplerError::AlreadyStopped` - not running
    /// * `SamplerError::WorkerPanicked` - the loop thread died; samples are lost
    /// * `SamplerError::FlushFailed` - the sink could not be opened or written
    pub fn stop(&self) -> Result<String, SamplerError> {
        let mut slot = self.lock_slot();

        if !self.running.swap(false, Ordering::SeqCst) {
            return Err(SamplerError::AlreadyStopped);
        }

        let worker = match mem::replace(&mut *slot, Slot::Lost) {
            Slot::Running(worker) => worker,
            other => {
                *slot = other;
                return Err(SamplerError::AlreadyStopped);
            }
        };

        let outcome = worker.shutdown()?;
        *slot = Slot::Idle(outcome.parts);
        drop(slot);

        let tree = outcome.tree;
        info!(
            "Sampling stopped after {} cycles ({} samples)",
            outcome.cycles,
            tree.total_samples()
        );

        let name = sample_file_name(Utc::now().timestamp_millis());
        self.flush(&name, &tree)
            .map_err(|source| SamplerError::FlushFailed {
                name: name.clone(),
                source,
            })?;

        info!("Samples flushed to {}", name);
        Ok(name)
    }

    fn flush(&self, name: &str, tree: &SampleTree) -> Result<(), OutputError> {
        let out = self.sink.create(name).map_err(OutputError::WriteFailed)?;
        write_json(tree, out)
    }

    fn lock_slot(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for Sampler {
    fn drop(&mut self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            return;
        }

        let slot = self.slot.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Slot::Running(worker) = mem::replace(slot, Slot::Lost) {
            match worker.shutdown() {
                Ok(outcome) => warn!(
                    "Sampler dropped while running; discarding {} samples",
                    outcome.tree.total_samples()
                ),
                Err(e) => warn!("Sampler dropped while running: {}", e),
            }
        }
    }
}

impl Worker {
    fn shutdown(self) -> Result<LoopOutcome, SamplerError> {
        // the loop may already have exited and dropped the receiver
        let _ = self.wake.send(());
        self.handle.join().map_err(|_| SamplerError::WorkerPanicked)
    }
}

fn run_loop(mut parts: Collaborators, running: Arc<AtomicBool>, wake: Receiver<()>) -> LoopOutcome {
    let mut tree = SampleTree::new();
    let mut cycles = 0u64;

    while running.load(Ordering::SeqCst) {
        let cycle_start = Instant::now();

        let inserted = sample_once(parts.provider.as_mut(), &mut tree);
        cycles += 1;
        debug!("Sampling cycle {}: {} stacks", cycles, inserted);

        let delay = parts.delay.next_delay();
        let pause = time_until_next_run(cycle_start, delay, Instant::now());

        match wake.recv_timeout(pause) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    debug!("Sampling loop exiting after {} cycles", cycles);
    LoopOutcome { tree, cycles, parts }
}

/// Take one snapshot and insert every available stack, in thread-id order.
///
/// Returns the number of stacks inserted.
pub(crate) fn sample_once(provider: &mut dyn StackSnapshotProvider, tree: &mut SampleTree) -> usize {
    let mut stacks = provider.snapshot();
    stacks.sort_by_key(|stack| stack.thread_id);

    let mut inserted = 0;
    for stack in stacks {
        match stack.frames {
            Ok(frames) => {
                tree.insert(frames);
                inserted += 1;
            }
            Err(e) => debug!("Skipping thread {} this cycle: {}", stack.thread_id, e),
        }
    }
    inserted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::snapshot::ThreadStack;
    use crate::utils::error::CaptureError;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sample_once_skips_unavailable_threads() {
        let mut provider = || {
            vec![
                ThreadStack::captured(2, ["main", "b"]),
                ThreadStack::unavailable(1, CaptureError::ThreadExited),
                ThreadStack::captured(0, ["main", "a"]),
            ]
        };
        let mut tree = SampleTree::new();

        let inserted = sample_once(&mut provider, &mut tree);

        assert_eq!(inserted, 2);
        assert_eq!(tree.total_samples(), 2);
        let main = tree.root().call("main").unwrap();
        assert_eq!(main.call("a").unwrap().samples, 1);
        assert_eq!(main.call("b").unwrap().samples, 1);
    }

    #[test]
    fn test_initial_state_is_stopped() {
        let sink = |_: &str| -> std::io::Result<Box<dyn std::io::Write>> {
            Ok(Box::new(std::io::sink()))
        };
        let sampler = Sampler::new(
            Vec::<ThreadStack>::new,
            FixedDelay(std::time::Duration::from_millis(1)),
            sink,
        );
        assert_eq!(sampler.state(), SamplerState::Stopped);
        assert!(matches!(sampler.stop(), Err(SamplerError::AlreadyStopped)));
    }
}
