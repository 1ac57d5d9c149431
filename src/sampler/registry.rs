//! In-process stack publication.
//!
//! Threads register with a [`FrameRegistry`] and mark the frames they are
//! executing with RAII guards. The registry is a [`StackSnapshotProvider`]:
//! a snapshot copies each registered thread's current frame list.
//!
//! ```ignore
//! let registry = FrameRegistry::new();
//! let handle = registry.register();
//! let _main = handle.enter("main");
//! {
//!     let _parse = handle.enter("parse_input");
//!     // samples taken here see ["main", "parse_input"]
//! }
//! ```

use super::snapshot::{StackSnapshotProvider, ThreadStack};
use crate::utils::error::CaptureError;
use log::debug;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

type FrameStack = Mutex<Vec<String>>;

#[derive(Default)]
struct RegistryInner {
    next_id: AtomicU64,
    threads: Mutex<BTreeMap<u64, Weak<FrameStack>>>,
}

/// Shared table of instrumented threads and their current frames
#[derive(Clone, Default)]
pub struct FrameRegistry {
    inner: Arc<RegistryInner>,
}

impl FrameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a thread. Dropping the handle unregisters it; the next
    /// snapshot reports the thread as exited once and forgets it.
    pub fn register(&self) -> ThreadHandle {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let frames = Arc::new(Mutex::new(Vec::new()));

        lock(&self.inner.threads).insert(id, Arc::downgrade(&frames));
        debug!("Registered thread {} for sampling", id);

        ThreadHandle { id, frames }
    }

    /// Number of registered threads, including exited ones not yet pruned
    pub fn len(&self) -> usize {
        lock(&self.inner.threads).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StackSnapshotProvider for FrameRegistry {
    fn snapshot(&mut self) -> Vec<ThreadStack> {
        let mut threads = lock(&self.inner.threads);
        let mut stacks = Vec::with_capacity(threads.len());

        threads.retain(|&id, frames| match frames.upgrade() {
            Some(stack) => {
                let stack = lock(&stack);
                // idle threads have nothing to attribute
                if !stack.is_empty() {
                    stacks.push(ThreadStack::captured(id, stack.iter().cloned()));
                }
                true
            }
            None => {
                stacks.push(ThreadStack::unavailable(id, CaptureError::ThreadExited));
                false
            }
        });

        stacks
    }
}

/// A registered thread's view of the registry
pub struct ThreadHandle {
    id: u64,
    frames: Arc<FrameStack>,
}

impl ThreadHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Push `label` until the returned guard is dropped.
    ///
    /// Dropping a guard also pops every frame entered after it.
    #[must_use = "the frame is popped as soon as the guard is dropped"]
    pub fn enter(&self, label: impl Into<String>) -> FrameGuard<'_> {
        let mut frames = lock(&self.frames);
        let depth = frames.len();
        frames.push(label.into());
        FrameGuard {
            handle: self,
            depth,
        }
    }

    pub fn depth(&self) -> usize {
        lock(&self.frames).len()
    }
}

/// Restores the stack to the depth it had before its frame was entered
pub struct FrameGuard<'h> {
    handle: &'h ThreadHandle,
    depth: usize,
}

impl Drop for FrameGuard<'_> {
    fn drop(&mut self) {
        lock(&self.handle.frames).truncate(self.depth);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
