//! Contract between the hook engine and the class-component host.
//!
//! The host constructs [`Instance`](crate::Instance)s, calls `render` and the
//! lifecycle entry points at its own defined moments, and services re-render
//! requests through a [`RenderScheduler`].

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-unique identity of one component instance.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(u64);

impl InstanceId {
    pub(crate) fn next() -> Self {
        static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(1);
        Self(NEXT_INSTANCE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "instance-{}", self.0)
    }
}

/// The host's re-render trigger.
///
/// Called after state updates are merged into an instance and when a context
/// the instance consumes receives a new value. Implementations must not render
/// synchronously from inside this call: the engine supports one render at a
/// time, so the request should be queued and serviced once control returns to
/// the host.
pub trait RenderScheduler {
    /// Request that the host re-render `instance`.
    fn request_render(&self, instance: InstanceId);
}

impl<F: Fn(InstanceId)> RenderScheduler for F {
    fn request_render(&self, instance: InstanceId) {
        self(instance)
    }
}
