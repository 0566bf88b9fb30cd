//! Thread-local dispatch state: which instance is rendering, in which phase,
//! and how many hooks it has called so far.
//!
//! Hooks locate their storage through this state instead of an explicit
//! handle. Exactly one render pass may be active per thread.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::HookError;
use crate::instance::InstanceCore;
use crate::slot_store::HookId;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    /// First render of an instance: hooks create their slots.
    Mounting,
    /// Any later render: hooks replay against existing slots.
    Updating,
}

impl Phase {
    pub fn is_mounting(self) -> bool {
        self == Phase::Mounting
    }
}

struct ActivePass {
    instance: Rc<InstanceCore>,
    phase: Phase,
    call_index: usize,
}

thread_local! {
    static ACTIVE_PASS: RefCell<Option<ActivePass>> = const { RefCell::new(None) };
}

/// Guard that clears the active pass on drop, including on unwind.
#[must_use = "RenderPassGuard ends the render pass on drop"]
pub(crate) struct RenderPassGuard {
    _private: (),
}

impl RenderPassGuard {
    /// Hooks called so far in this pass.
    pub(crate) fn hook_count(&self) -> usize {
        ACTIVE_PASS.with(|pass| pass.borrow().as_ref().map_or(0, |pass| pass.call_index))
    }
}

impl Drop for RenderPassGuard {
    fn drop(&mut self) {
        ACTIVE_PASS.with(|pass| {
            pass.borrow_mut().take();
        });
    }
}

/// Makes `instance` current with a fresh call index.
pub(crate) fn enter(
    instance: &Rc<InstanceCore>,
    phase: Phase,
) -> Result<RenderPassGuard, HookError> {
    ACTIVE_PASS.with(|pass| {
        let mut pass = pass.borrow_mut();
        if pass.is_some() {
            return Err(HookError::ReentrantRender);
        }
        *pass = Some(ActivePass {
            instance: Rc::clone(instance),
            phase,
            call_index: 0,
        });
        Ok(RenderPassGuard { _private: () })
    })
}

/// What a hook needs to find its slot.
pub(crate) struct HookFrame {
    pub(crate) instance: Rc<InstanceCore>,
    pub(crate) id: HookId,
    pub(crate) phase: Phase,
}

/// Claims the next call-order id for the calling hook.
///
/// # Panics
/// Panics if no instance is rendering.
pub(crate) fn next_hook(hook: &'static str) -> HookFrame {
    ACTIVE_PASS.with(|pass| {
        let mut pass = pass.borrow_mut();
        let pass = pass
            .as_mut()
            .unwrap_or_else(|| panic!("{hook}: called outside of a component render"));
        pass.call_index += 1;
        HookFrame {
            instance: Rc::clone(&pass.instance),
            id: HookId::new(pass.call_index),
            phase: pass.phase,
        }
    })
}

/// The rendering instance and phase, without claiming an id.
///
/// # Panics
/// Panics if no instance is rendering.
pub(crate) fn current(hook: &'static str) -> (Rc<InstanceCore>, Phase) {
    ACTIVE_PASS.with(|pass| {
        let pass = pass.borrow();
        let pass = pass
            .as_ref()
            .unwrap_or_else(|| panic!("{hook}: called outside of a component render"));
        (Rc::clone(&pass.instance), pass.phase)
    })
}

/// Whether a component render is in progress on this thread.
pub fn is_rendering() -> bool {
    ACTIVE_PASS.with(|pass| pass.borrow().is_some())
}

/// Phase of the render in progress, if any.
pub fn current_phase() -> Option<Phase> {
    ACTIVE_PASS.with(|pass| pass.borrow().as_ref().map(|pass| pass.phase))
}

/// Id of the most recently called hook in the render in progress.
pub fn try_current_hook_id() -> Option<HookId> {
    ACTIVE_PASS.with(|pass| {
        pass.borrow()
            .as_ref()
            .filter(|pass| pass.call_index > 0)
            .map(|pass| HookId::new(pass.call_index))
    })
}
