//! Collective reductions across domain partitions.
//!
//! The parabolic timestep must be identical on every partition of a
//! decomposed domain, so the local inverse-timestep bound is combined with a
//! blocking global maximum before `dt` is formed.
//!
//! - [`SinglePartition`]: one partition, the reduction is the identity
//! - [`ThreadGroup`]: in-process partitions running on separate threads
//!
//! # Example
//!
//! ```
//! use rkl_rs::comm::{GlobalReduce, ThreadGroup};
//!
//! let comms = ThreadGroup::new(3);
//! let handles: Vec<_> = comms
//!     .into_iter()
//!     .map(|comm| std::thread::spawn(move || comm.global_max(comm.rank() as f64)))
//!     .collect();
//!
//! for handle in handles {
//!     assert_eq!(handle.join().unwrap(), 2.0);
//! }
//! ```

use std::sync::{Arc, Barrier};

use parking_lot::Mutex;

/// A blocking maximum over all partitions.
///
/// Every partition must call [`global_max`](GlobalReduce::global_max) the
/// same number of times; a NaN on any partition makes the result NaN.
pub trait GlobalReduce: Send + Sync {
    /// Maximum of `local` over all partitions.
    fn global_max(&self, local: f64) -> f64;

    /// Index of this partition.
    fn rank(&self) -> usize {
        0
    }

    /// Number of partitions.
    fn size(&self) -> usize {
        1
    }
}

/// The whole domain lives in one partition.
#[derive(Clone, Copy, Debug, Default)]
pub struct SinglePartition;

impl GlobalReduce for SinglePartition {
    #[inline]
    fn global_max(&self, local: f64) -> f64 {
        local
    }
}

struct Shared {
    barrier: Barrier,
    slots: Mutex<Vec<f64>>,
}

/// Factory for a set of thread-backed communicators.
pub struct ThreadGroup;

impl ThreadGroup {
    /// Create `size` communicators sharing one reduction slot array.
    ///
    /// Move one communicator into each partition's thread.
    pub fn new(size: usize) -> Vec<ThreadCommunicator> {
        assert!(size > 0, "Need at least one partition");
        let shared = Arc::new(Shared {
            barrier: Barrier::new(size),
            slots: Mutex::new(vec![f64::NEG_INFINITY; size]),
        });
        (0..size)
            .map(|rank| ThreadCommunicator {
                rank,
                size,
                shared: Arc::clone(&shared),
            })
            .collect()
    }
}

/// One partition's endpoint of a [`ThreadGroup`].
pub struct ThreadCommunicator {
    rank: usize,
    size: usize,
    shared: Arc<Shared>,
}

impl std::fmt::Debug for ThreadCommunicator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThreadCommunicator")
            .field("rank", &self.rank)
            .field("size", &self.size)
            .finish()
    }
}

impl GlobalReduce for ThreadCommunicator {
    fn global_max(&self, local: f64) -> f64 {
        self.shared.slots.lock()[self.rank] = local;
        self.shared.barrier.wait();

        let result = self
            .shared
            .slots
            .lock()
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, nan_max);

        // Nobody may overwrite a slot until every partition has read.
        self.shared.barrier.wait();
        result
    }

    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }
}

/// Maximum that propagates NaN instead of discarding it.
#[inline]
pub(crate) fn nan_max(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.max(b)
    }
}
