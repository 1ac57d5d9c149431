//! Live stack sampling.
//!
//! A [`Sampler`] runs one background thread that, every cycle:
//! 1. Asks its [`StackSnapshotProvider`] for every live thread's stack
//! 2. Inserts the available stacks into its private sample tree
//! 3. Sleeps until `cycle start + DelaySource::next_delay()`
//!
//! On `stop` the tree is handed back from the thread and written through a
//! [`SinkFactory`].

pub mod registry;
pub mod sampler;
pub mod schedule;
pub mod sink;
pub mod snapshot;

// Re-export main types
pub use registry::{FrameGuard, FrameRegistry, ThreadHandle};
pub use sampler::{Sampler, SamplerState};
pub use schedule::{time_until_next_run, DelaySource, FixedDelay};
pub use sink::{DirectorySink, SinkFactory};
pub use snapshot::{StackSnapshotProvider, ThreadStack};
