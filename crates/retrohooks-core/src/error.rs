use crate::slot_store::{HookId, SlotKind};
use std::fmt;

/// Faults reported by an [`Instance`](crate::Instance) render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookError {
    /// A render was started while another instance was still rendering.
    ReentrantRender,
    /// An updating pass called a different number of hooks than the mount.
    HookCountMismatch { expected: usize, actual: usize },
    /// The slot at `id` was created by a different hook kind or value type.
    SlotKindMismatch {
        id: HookId,
        expected: SlotKind,
        found: SlotKind,
    },
    /// The slot at `id` has the right kind but holds a different value type.
    SlotTypeMismatch {
        id: HookId,
        kind: SlotKind,
        expected: &'static str,
    },
    /// An updating pass reached a hook that has no slot yet.
    MissingSlot { id: HookId, expected: SlotKind },
    /// The instance was already unmounted.
    Unmounted,
}

impl fmt::Display for HookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookError::ReentrantRender => {
                write!(f, "render started while another instance is rendering")
            }
            HookError::HookCountMismatch { expected, actual } => write!(
                f,
                "render called {actual} hooks but the mount pass called {expected}"
            ),
            HookError::SlotKindMismatch {
                id,
                expected,
                found,
            } => write!(f, "hook {id} expected a {expected} slot but found {found}"),
            HookError::SlotTypeMismatch { id, kind, expected } => {
                write!(f, "{kind} hook {id} expected a slot holding `{expected}`")
            }
            HookError::MissingSlot { id, expected } => {
                write!(f, "hook {id} expected a {expected} slot but none exists")
            }
            HookError::Unmounted => write!(f, "instance is unmounted"),
        }
    }
}

impl std::error::Error for HookError {}
