//! Per-instance hook storage addressed by call order.

use crate::deps::Deps;
use crate::effect::EffectSlot;
use std::any::{Any, TypeId};
use std::fmt;

/// Call-order identity of a hook within one render pass. Ids start at 1.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HookId(usize);

impl HookId {
    pub(crate) fn new(index: usize) -> Self {
        debug_assert!(index > 0, "hook ids are 1-based");
        Self(index)
    }

    pub fn get(self) -> usize {
        self.0
    }

    fn position(self) -> usize {
        self.0 - 1
    }
}

impl fmt::Display for HookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SlotKind {
    State,
    Effect,
    Memo,
    Ref,
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SlotKind::State => "state",
            SlotKind::Effect => "effect",
            SlotKind::Memo => "memo",
            SlotKind::Ref => "ref",
        };
        f.write_str(name)
    }
}

/// Marker for a state hook. The value lives in the instance's state bag under
/// the same id.
pub(crate) struct StateSlot {
    type_id: TypeId,
}

impl StateSlot {
    pub(crate) fn of<T: 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
        }
    }

    pub(crate) fn holds<T: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }
}

pub(crate) struct MemoSlot {
    result: Box<dyn Any>,
    deps: Option<Deps>,
}

impl MemoSlot {
    pub(crate) fn new<T: 'static>(result: T, deps: Option<Deps>) -> Self {
        Self {
            result: Box::new(result),
            deps,
        }
    }

    pub(crate) fn result<T: 'static>(&self) -> Option<&T> {
        self.result.downcast_ref::<T>()
    }

    pub(crate) fn deps(&self) -> Option<&Deps> {
        self.deps.as_ref()
    }
}

pub(crate) enum Slot {
    State(StateSlot),
    Effect(EffectSlot),
    Memo(MemoSlot),
    /// Holds a `RefBox<T>`.
    Ref(Box<dyn Any>),
}

impl Slot {
    pub(crate) fn kind(&self) -> SlotKind {
        match self {
            Slot::State(_) => SlotKind::State,
            Slot::Effect(_) => SlotKind::Effect,
            Slot::Memo(_) => SlotKind::Memo,
            Slot::Ref(_) => SlotKind::Ref,
        }
    }
}

/// Append-only during mount; slots are overwritten in place afterwards.
#[derive(Default)]
pub(crate) struct SlotStore {
    slots: Vec<Slot>,
}

impl SlotStore {
    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn get_mut(&mut self, id: HookId) -> Option<&mut Slot> {
        self.slots.get_mut(id.position())
    }

    /// Stores `slot` at `id`, replacing whatever was there.
    pub(crate) fn put(&mut self, id: HookId, slot: Slot) {
        let position = id.position();
        if position < self.slots.len() {
            self.slots[position] = slot;
        } else {
            debug_assert_eq!(position, self.slots.len(), "slots are assigned in call order");
            self.slots.push(slot);
        }
    }

    #[cfg(test)]
    pub(crate) fn kinds(&self) -> Vec<SlotKind> {
        self.slots.iter().map(Slot::kind).collect()
    }
}
