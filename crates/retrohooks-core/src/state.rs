//! State and reducer hooks, and the state bag they read from.

use std::any::{type_name, Any};
use std::fmt;
use std::marker::PhantomData;
use std::rc::{Rc, Weak};

use crate::collections::map::HashMap;
use crate::dispatch_context::{self, HookFrame, Phase};
use crate::instance::InstanceCore;
use crate::slot_store::{HookId, Slot, SlotKind, StateSlot};

/// Latest state value per hook id. Values are replaced wholesale; nothing is
/// accumulated.
#[derive(Default)]
pub(crate) struct StateBag {
    values: HashMap<HookId, Box<dyn Any>>,
}

impl StateBag {
    pub(crate) fn insert<T: 'static>(&mut self, id: HookId, value: T) {
        self.values.insert(id, Box::new(value));
    }

    pub(crate) fn get<T: Clone + 'static>(&self, id: HookId) -> Option<T> {
        self.values.get(&id)?.downcast_ref::<T>().cloned()
    }

    pub(crate) fn merge(&mut self, update: StateUpdate) {
        for (id, value) in update.entries {
            self.values.insert(id, value);
        }
    }
}

/// A partial state update, `{id: value, ...}`, applied with merge semantics:
/// ids not mentioned keep their value, and the last entry per id wins.
#[derive(Default)]
pub struct StateUpdate {
    entries: Vec<(HookId, Box<dyn Any>)>,
}

impl StateUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<T: 'static>(mut self, id: HookId, value: T) -> Self {
        self.entries.push((id, Box::new(value)));
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for StateUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|(id, _)| id))
            .finish()
    }
}

/// Updater returned by [`use_state`].
///
/// Every setter for the same hook is interchangeable: it always writes the
/// instance's live state bag by id and never consults a value captured at an
/// earlier render. Setters outliving their instance do nothing.
pub struct StateSetter<T> {
    instance: Weak<InstanceCore>,
    id: HookId,
    _marker: PhantomData<fn(T)>,
}

impl<T> Clone for StateSetter<T> {
    fn clone(&self) -> Self {
        Self {
            instance: Weak::clone(&self.instance),
            id: self.id,
            _marker: PhantomData,
        }
    }
}

impl<T> PartialEq for StateSetter<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && Weak::ptr_eq(&self.instance, &other.instance)
    }
}

impl<T> Eq for StateSetter<T> {}

impl<T> fmt::Debug for StateSetter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateSetter").field("id", &self.id).finish()
    }
}

impl<T: 'static> StateSetter<T> {
    fn new(instance: &Rc<InstanceCore>, id: HookId) -> Self {
        Self {
            instance: Rc::downgrade(instance),
            id,
            _marker: PhantomData,
        }
    }

    pub fn id(&self) -> HookId {
        self.id
    }

    /// Stores `value` and requests a re-render.
    pub fn set(&self, value: T) {
        match self.instance.upgrade() {
            Some(instance) => instance.set_state(StateUpdate::new().with(self.id, value)),
            None => log::debug!("state setter {} outlived its instance", self.id),
        }
    }
}

impl<T: Clone + 'static> StateSetter<T> {
    /// Computes the next value from the value currently in the state bag,
    /// which includes updates made since the last render.
    pub fn update(&self, f: impl FnOnce(&T) -> T) {
        let Some(instance) = self.instance.upgrade() else {
            log::debug!("state setter {} outlived its instance", self.id);
            return;
        };
        let Some(current) = instance.with_state(|bag| bag.get::<T>(self.id)) else {
            return;
        };
        instance.set_state(StateUpdate::new().with(self.id, f(&current)));
    }
}

/// State hook. `init` runs only on mount.
///
/// Returns the current value and a setter. On mount the value is `init()`;
/// on later renders it is whatever the most recent setter call stored.
pub fn use_state<T: Clone + 'static>(init: impl FnOnce() -> T) -> (T, StateSetter<T>) {
    let frame = dispatch_context::next_hook("use_state");
    state_hook(frame, init)
}

/// [`use_state`] with an eagerly supplied initial value.
pub fn use_state_value<T: Clone + 'static>(initial: T) -> (T, StateSetter<T>) {
    use_state(move || initial)
}

fn state_hook<T: Clone + 'static>(
    frame: HookFrame,
    init: impl FnOnce() -> T,
) -> (T, StateSetter<T>) {
    let HookFrame {
        instance,
        id,
        phase,
    } = frame;
    let setter = StateSetter::new(&instance, id);
    if phase == Phase::Updating {
        let current = instance.read_slot(id, SlotKind::State, type_name::<T>(), |slot| {
            match slot {
                Slot::State(state) if state.holds::<T>() => Some(()),
                _ => None,
            }
        });
        if current.is_some() {
            if let Some(value) = instance.with_state(|bag| bag.get::<T>(id)) {
                return (value, setter);
            }
            log::warn!("state hook {id} holds a foreign value type; re-initializing");
        }
    }
    let value = init();
    instance.put_slot(id, Slot::State(StateSlot::of::<T>()));
    instance.with_state(|bag| bag.insert(id, value.clone()));
    (value, setter)
}

/// Dispatcher returned by [`use_reducer`].
pub struct Dispatch<A> {
    dispatch: Rc<dyn Fn(A)>,
}

impl<A> Clone for Dispatch<A> {
    fn clone(&self) -> Self {
        Self {
            dispatch: Rc::clone(&self.dispatch),
        }
    }
}

impl<A> Dispatch<A> {
    /// Applies the reducer to the state seen by the render that produced this
    /// dispatcher and stores the result.
    ///
    /// Dispatches are not chained: two calls before the next render both
    /// start from that same state, so the last one wins.
    pub fn dispatch(&self, action: A) {
        (self.dispatch)(action)
    }
}

/// Reducer hook.
///
/// On mount, `initial_action` (if any) is applied to `initial` before the
/// state is stored. Later renders ignore both.
pub fn use_reducer<S, A>(
    reducer: impl Fn(&S, A) -> S + 'static,
    initial: S,
    initial_action: Option<A>,
) -> (S, Dispatch<A>)
where
    S: Clone + 'static,
    A: 'static,
{
    let frame = dispatch_context::next_hook("use_reducer");
    let initial = match (frame.phase, initial_action) {
        (Phase::Mounting, Some(action)) => reducer(&initial, action),
        _ => initial,
    };
    let (state, setter) = state_hook(frame, move || initial);
    let seen = state.clone();
    let dispatch = Dispatch {
        dispatch: Rc::new(move |action| setter.set(reducer(&seen, action))),
    };
    (state, dispatch)
}

#[cfg(test)]
#[path = "tests/state_tests.rs"]
mod tests;
