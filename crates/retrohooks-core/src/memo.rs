use std::any::type_name;
use std::fmt;
use std::rc::Rc;

use crate::deps::{should_rerun, Deps};
use crate::dispatch_context::{self, HookFrame, Phase};
use crate::ref_box::RefBox;
use crate::slot_store::{MemoSlot, Slot, SlotKind};

/// Memo hook.
///
/// Runs `producer` on mount and whenever `deps` is `None` or differs from the
/// previous render; otherwise returns a clone of the cached result. Wrap the
/// result in `Rc` when identity matters.
pub fn use_memo<T: Clone + 'static>(producer: impl FnOnce() -> T, deps: Option<Deps>) -> T {
    let frame = dispatch_context::next_hook("use_memo");
    memo_hook(frame, producer, deps)
}

fn memo_hook<T: Clone + 'static>(
    frame: HookFrame,
    producer: impl FnOnce() -> T,
    deps: Option<Deps>,
) -> T {
    let HookFrame {
        instance,
        id,
        phase,
    } = frame;
    if phase == Phase::Updating {
        let cached = instance.read_slot(id, SlotKind::Memo, type_name::<T>(), |slot| {
            let Slot::Memo(memo) = slot else {
                return None;
            };
            let result = memo.result::<T>()?;
            if should_rerun(deps.as_ref(), memo.deps()) {
                Some(None)
            } else {
                Some(Some(result.clone()))
            }
        });
        if let Some(Some(result)) = cached {
            return result;
        }
    }
    let result = producer();
    instance.put_slot(id, Slot::Memo(MemoSlot::new(result.clone(), deps)));
    result
}

/// A memoized function value returned by [`use_callback`].
pub struct Callback<A, O = ()> {
    callback: Rc<dyn Fn(A) -> O>,
}

impl<A, O> Clone for Callback<A, O> {
    fn clone(&self) -> Self {
        Self {
            callback: Rc::clone(&self.callback),
        }
    }
}

impl<A, O> Callback<A, O> {
    pub fn new(callback: impl Fn(A) -> O + 'static) -> Self {
        Self {
            callback: Rc::new(callback),
        }
    }

    pub fn emit(&self, argument: A) -> O {
        (self.callback)(argument)
    }

    /// Whether both handles wrap the same function value.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.callback, &other.callback)
    }
}

impl<A, O> PartialEq for Callback<A, O> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<A, O> fmt::Debug for Callback<A, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callback")
            .field("ptr", &Rc::as_ptr(&self.callback).cast::<()>())
            .finish()
    }
}

/// Callback hook: [`use_memo`] of the function value itself. The returned
/// handle stays pointer-identical while `deps` is unchanged.
pub fn use_callback<A: 'static, O: 'static>(
    callback: impl Fn(A) -> O + 'static,
    deps: Option<Deps>,
) -> Callback<A, O> {
    let frame = dispatch_context::next_hook("use_callback");
    memo_hook(frame, move || Callback::new(callback), deps)
}

/// Imperative-handle hook.
///
/// Computes the handle through the memo hook and writes it into `target` on
/// every render, whether or not the memo recomputed.
pub fn use_imperative_handle<H: Clone + 'static>(
    target: &RefBox<Option<H>>,
    create: impl FnOnce() -> H,
    deps: Option<Deps>,
) {
    let frame = dispatch_context::next_hook("use_imperative_handle");
    let handle = memo_hook(frame, create, deps);
    target.set_current(Some(handle));
}

#[cfg(test)]
#[path = "tests/memo_tests.rs"]
mod tests;
