use std::any::type_name;

use crate::dispatch_context::{self, Phase};
use crate::ref_box::RefBox;
use crate::slot_store::{Slot, SlotKind};

/// Ref hook.
///
/// Creates a box holding `initial` on mount and returns that same box on
/// every later render; `initial` is ignored after the first call.
pub fn use_ref<T: 'static>(initial: T) -> RefBox<T> {
    let frame = dispatch_context::next_hook("use_ref");
    if frame.phase == Phase::Updating {
        let existing = frame.instance.read_slot(
            frame.id,
            SlotKind::Ref,
            type_name::<T>(),
            |slot| match slot {
                Slot::Ref(boxed) => boxed.downcast_ref::<RefBox<T>>().cloned(),
                _ => None,
            },
        );
        if let Some(existing) = existing {
            return existing;
        }
    }
    let created = RefBox::new(initial);
    frame
        .instance
        .put_slot(frame.id, Slot::Ref(Box::new(created.clone())));
    created
}
