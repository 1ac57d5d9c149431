//! Stack snapshot collaborator used by the sampling loop.

use crate::utils::error::CaptureError;

/// One thread's stack as seen in a single snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadStack {
    /// Stable identifier; snapshots are inserted in ascending id order
    pub thread_id: u64,

    /// Frame labels, outermost (entry point) first
    pub frames: Result<Vec<String>, CaptureError>,
}

impl ThreadStack {
    pub fn captured<I, S>(thread_id: u64, frames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            thread_id,
            frames: Ok(frames.into_iter().map(Into::into).collect()),
        }
    }

    pub fn unavailable(thread_id: u64, error: CaptureError) -> Self {
        Self {
            thread_id,
            frames: Err(error),
        }
    }
}

/// Enumerates the call stacks of all live threads.
///
/// Called from the sampler's own thread once per cycle. A thread whose stack
/// cannot be read should be reported as unavailable, not left out silently.
pub trait StackSnapshotProvider: Send {
    fn snapshot(&mut self) -> Vec<ThreadStack>;
}

impl<F> StackSnapshotProvider for F
where
    F: FnMut() -> Vec<ThreadStack> + Send,
{
    fn snapshot(&mut self) -> Vec<ThreadStack> {
        self()
    }
}
