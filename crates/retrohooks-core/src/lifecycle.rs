use std::cell::RefCell;
use std::rc::Rc;

/// Points in the host lifecycle where hook callbacks are attached.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LifecyclePoint {
    /// After the first render has been committed.
    DidMount,
    /// After every later render has been committed.
    DidUpdate,
    /// Right before the instance is destroyed.
    WillUnmount,
}

pub(crate) type LifecycleCallback = Rc<dyn Fn()>;

/// The three nullable callback slots of an instance.
///
/// Each slot holds at most one callback. Injecting into an occupied slot
/// chains the new callback after the existing one, so every effect of a
/// component keeps firing in declaration order.
#[derive(Default)]
pub(crate) struct LifecycleSlots {
    did_mount: RefCell<Option<LifecycleCallback>>,
    did_update: RefCell<Option<LifecycleCallback>>,
    will_unmount: RefCell<Option<LifecycleCallback>>,
}

impl LifecycleSlots {
    fn slot(&self, point: LifecyclePoint) -> &RefCell<Option<LifecycleCallback>> {
        match point {
            LifecyclePoint::DidMount => &self.did_mount,
            LifecyclePoint::DidUpdate => &self.did_update,
            LifecyclePoint::WillUnmount => &self.will_unmount,
        }
    }

    pub(crate) fn inject(&self, point: LifecyclePoint, callback: LifecycleCallback) {
        let mut slot = self.slot(point).borrow_mut();
        let chained: LifecycleCallback = match slot.take() {
            Some(previous) => Rc::new(move || {
                previous();
                callback();
            }),
            None => callback,
        };
        *slot = Some(chained);
    }

    /// Invokes the callback at `point`, if any. Returns whether one was set.
    pub(crate) fn fire(&self, point: LifecyclePoint) -> bool {
        // Clone out of the cell so callbacks may inject or fire other slots.
        let callback = self.slot(point).borrow().clone();
        match callback {
            Some(callback) => {
                callback();
                true
            }
            None => false,
        }
    }

    pub(crate) fn is_set(&self, point: LifecyclePoint) -> bool {
        self.slot(point).borrow().is_some()
    }

    pub(crate) fn clear(&self) {
        self.did_mount.borrow_mut().take();
        self.did_update.borrow_mut().take();
        self.will_unmount.borrow_mut().take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_slot_does_not_fire() {
        let slots = LifecycleSlots::default();
        assert!(!slots.fire(LifecyclePoint::DidMount));
        assert!(!slots.is_set(LifecyclePoint::DidUpdate));
    }

    #[test]
    fn injected_callbacks_chain_in_order() {
        let slots = LifecycleSlots::default();
        let log = Rc::new(RefCell::new(Vec::new()));
        for label in ["first", "second", "third"] {
            let log = Rc::clone(&log);
            slots.inject(
                LifecyclePoint::WillUnmount,
                Rc::new(move || log.borrow_mut().push(label)),
            );
        }
        assert!(slots.fire(LifecyclePoint::WillUnmount));
        assert_eq!(*log.borrow(), vec!["first", "second", "third"]);
        assert!(!slots.fire(LifecyclePoint::DidMount));
    }

    #[test]
    fn clear_empties_every_slot() {
        let slots = LifecycleSlots::default();
        slots.inject(LifecyclePoint::DidMount, Rc::new(|| {}));
        slots.inject(LifecyclePoint::DidUpdate, Rc::new(|| {}));
        slots.clear();
        assert!(!slots.is_set(LifecyclePoint::DidMount));
        assert!(!slots.is_set(LifecyclePoint::DidUpdate));
    }
}
