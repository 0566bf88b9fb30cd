//! The instance adapter: persistent storage for one component instance and the
//! entry points the host calls at its lifecycle moments.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::collections::map::HashMap;
use crate::component::HookComponent;
use crate::config::HookOptions;
use crate::dispatch_context::{self, Phase};
use crate::effect::EffectBinding;
use crate::error::HookError;
use crate::host::{InstanceId, RenderScheduler};
use crate::lifecycle::{LifecycleCallback, LifecyclePoint, LifecycleSlots};
use crate::ref_box::RefBox;
use crate::slot_store::{HookId, Slot, SlotKind, SlotStore};
use crate::state::{StateBag, StateUpdate};

/// Type-independent half of an instance, reachable from the dispatcher while
/// the instance renders and from state setters afterwards.
pub(crate) struct InstanceCore {
    id: InstanceId,
    name: Rc<str>,
    options: HookOptions,
    slots: RefCell<SlotStore>,
    state: RefCell<StateBag>,
    lifecycle: LifecycleSlots,
    effect_bindings: RefCell<HashMap<HookId, Rc<EffectBinding>>>,
    scheduler: Rc<dyn RenderScheduler>,
    mount_hook_count: Cell<Option<usize>>,
    violation: RefCell<Option<HookError>>,
    unsubscribers: RefCell<Vec<Box<dyn FnOnce()>>>,
    unmounted: Cell<bool>,
}

impl InstanceCore {
    fn new(name: Rc<str>, options: HookOptions, scheduler: Rc<dyn RenderScheduler>) -> Self {
        Self {
            id: InstanceId::next(),
            name,
            options,
            slots: RefCell::new(SlotStore::default()),
            state: RefCell::new(StateBag::default()),
            lifecycle: LifecycleSlots::default(),
            effect_bindings: RefCell::new(HashMap::default()),
            scheduler,
            mount_hook_count: Cell::new(None),
            violation: RefCell::new(None),
            unsubscribers: RefCell::new(Vec::new()),
            unmounted: Cell::new(false),
        }
    }

    pub(crate) fn id(&self) -> InstanceId {
        self.id
    }

    pub(crate) fn options(&self) -> HookOptions {
        self.options
    }

    pub(crate) fn is_unmounted(&self) -> bool {
        self.unmounted.get()
    }

    /// Merges `update` into the state bag and asks the host to re-render.
    pub(crate) fn set_state(&self, update: StateUpdate) {
        if self.unmounted.get() {
            log::debug!(
                "{} ({}): ignoring state update after unmount",
                self.name,
                self.id
            );
            return;
        }
        let merged = update.len();
        self.state.borrow_mut().merge(update);
        log::debug!(
            "{} ({}): merged {merged} state entries, requesting render",
            self.name,
            self.id
        );
        self.scheduler.request_render(self.id);
    }

    pub(crate) fn request_render(&self) {
        if self.unmounted.get() {
            return;
        }
        self.scheduler.request_render(self.id);
    }

    pub(crate) fn with_state<R>(&self, f: impl FnOnce(&mut StateBag) -> R) -> R {
        f(&mut self.state.borrow_mut())
    }

    /// Runs `read` against the slot at `id`.
    ///
    /// `read` returns `None` when the slot does not belong to the calling hook
    /// (wrong kind or value type); that case, and a missing slot, are reported
    /// as violations and yield `None` so the hook can re-create the slot.
    pub(crate) fn read_slot<T>(
        &self,
        id: HookId,
        expected: SlotKind,
        expected_type: &'static str,
        read: impl FnOnce(&mut Slot) -> Option<T>,
    ) -> Option<T> {
        let violation = {
            let mut slots = self.slots.borrow_mut();
            match slots.get_mut(id) {
                None => HookError::MissingSlot { id, expected },
                Some(slot) => {
                    let found = slot.kind();
                    if let Some(value) = read(slot) {
                        return Some(value);
                    }
                    if found == expected {
                        HookError::SlotTypeMismatch {
                            id,
                            kind: expected,
                            expected: expected_type,
                        }
                    } else {
                        HookError::SlotKindMismatch {
                            id,
                            expected,
                            found,
                        }
                    }
                }
            }
        };
        self.report(violation);
        None
    }

    pub(crate) fn put_slot(&self, id: HookId, slot: Slot) {
        self.slots.borrow_mut().put(id, slot);
    }

    pub(crate) fn inject_lifecycle(&self, point: LifecyclePoint, callback: LifecycleCallback) {
        self.lifecycle.inject(point, callback);
    }

    pub(crate) fn effect_binding(&self, id: HookId) -> Option<Rc<EffectBinding>> {
        self.effect_bindings.borrow().get(&id).cloned()
    }

    pub(crate) fn bind_effect(&self, id: HookId, binding: Rc<EffectBinding>) {
        self.effect_bindings.borrow_mut().insert(id, binding);
    }

    pub(crate) fn add_unsubscriber(&self, unsubscribe: Box<dyn FnOnce()>) {
        self.unsubscribers.borrow_mut().push(unsubscribe);
    }

    fn report(&self, violation: HookError) {
        log::warn!(
            "{} ({}): {violation}; re-creating the slot",
            self.name,
            self.id
        );
        if self.options.is_strict() {
            let mut recorded = self.violation.borrow_mut();
            if recorded.is_none() {
                *recorded = Some(violation);
            }
        }
    }

    fn finish_pass(&self, phase: Phase, hook_count: usize) -> Result<(), HookError> {
        log::trace!(
            "{} ({}): {phase:?} pass finished after {hook_count} hooks",
            self.name,
            self.id
        );
        match phase {
            Phase::Mounting => self.mount_hook_count.set(Some(hook_count)),
            Phase::Updating => {
                let expected = self.mount_hook_count.get().unwrap_or(0);
                if self.options.is_strict() && expected != hook_count {
                    let mut recorded = self.violation.borrow_mut();
                    if recorded.is_none() {
                        *recorded = Some(HookError::HookCountMismatch {
                            expected,
                            actual: hook_count,
                        });
                    }
                }
            }
        }
        match self.violation.borrow_mut().take() {
            Some(violation) => Err(violation),
            None => Ok(()),
        }
    }

    fn unmount(&self) {
        if self.unmounted.replace(true) {
            return;
        }
        log::trace!("{} ({}): unmounting", self.name, self.id);
        self.lifecycle.fire(LifecyclePoint::WillUnmount);
        self.lifecycle.clear();
        self.effect_bindings.borrow_mut().clear();
        let unsubscribers = std::mem::take(&mut *self.unsubscribers.borrow_mut());
        for unsubscribe in unsubscribers {
            unsubscribe();
        }
    }
}

/// Runs one render pass of `render` with `core` current.
fn run_pass<R>(
    core: &Rc<InstanceCore>,
    phase: Phase,
    render: impl FnOnce() -> R,
) -> Result<R, HookError> {
    log::trace!("{} ({}): {phase:?} pass", core.name, core.id);
    let guard = dispatch_context::enter(core, phase)?;
    let output = render();
    let hook_count = guard.hook_count();
    drop(guard);
    core.finish_pass(phase, hook_count)?;
    Ok(output)
}

/// One mounted component, created by [`HookComponent::instantiate`].
///
/// The host drives it through [`Instance::render`] and the
/// `component_did_mount` / `component_did_update` /
/// `component_will_unmount` entry points.
pub struct Instance<P, R, H = ()> {
    core: Rc<InstanceCore>,
    component: HookComponent<P, R, H>,
    props: P,
    forwarded_ref: Option<RefBox<Option<H>>>,
    mount_output: Option<R>,
}

impl<P, R, H> Instance<P, R, H> {
    /// Runs the mounting pass immediately and caches its output for the first
    /// `render` call.
    pub(crate) fn construct(
        component: HookComponent<P, R, H>,
        props: P,
        forwarded_ref: Option<RefBox<Option<H>>>,
        scheduler: Rc<dyn RenderScheduler>,
    ) -> Result<Self, HookError> {
        let core = Rc::new(InstanceCore::new(
            component.name_rc(),
            component.options(),
            scheduler,
        ));
        let render = component.render_fn();
        let output = run_pass(&core, Phase::Mounting, || {
            render(&props, forwarded_ref.as_ref())
        })?;
        Ok(Self {
            core,
            component,
            props,
            forwarded_ref,
            mount_output: Some(output),
        })
    }

    /// Produces the render output.
    ///
    /// The first call returns the output cached at construction without
    /// running the render function again. Every later call runs an updating
    /// pass.
    pub fn render(&mut self) -> Result<R, HookError> {
        if self.core.is_unmounted() {
            return Err(HookError::Unmounted);
        }
        if let Some(output) = self.mount_output.take() {
            log::trace!(
                "{} ({}): returning mount output",
                self.core.name,
                self.core.id
            );
            return Ok(output);
        }
        let render = self.component.render_fn();
        let props = &self.props;
        let forwarded_ref = self.forwarded_ref.as_ref();
        run_pass(&self.core, Phase::Updating, || render(props, forwarded_ref))
    }

    pub fn id(&self) -> InstanceId {
        self.core.id
    }

    pub fn component(&self) -> &HookComponent<P, R, H> {
        &self.component
    }

    pub fn props(&self) -> &P {
        &self.props
    }

    /// Replaces the props used by the next render.
    pub fn set_props(&mut self, props: P) {
        self.props = props;
    }

    pub fn forwarded_ref(&self) -> Option<&RefBox<Option<H>>> {
        self.forwarded_ref.as_ref()
    }

    pub fn set_forwarded_ref(&mut self, forwarded_ref: Option<RefBox<Option<H>>>) {
        self.forwarded_ref = forwarded_ref;
    }

    /// Merge-and-rerender entry point: applies every entry of `update` to the
    /// state bag (last write per id wins) and requests a render from the host.
    pub fn set_state(&self, update: StateUpdate) {
        self.core.set_state(update);
    }

    /// Latest value stored for the state hook `id`.
    pub fn state_value<T: Clone + 'static>(&self, id: HookId) -> Option<T> {
        self.core.with_state(|bag| bag.get::<T>(id))
    }

    /// Whether the first `render` call is still pending.
    pub fn is_mounting(&self) -> bool {
        self.mount_output.is_some()
    }

    pub fn is_unmounted(&self) -> bool {
        self.core.is_unmounted()
    }

    /// Number of slots created so far.
    pub fn slot_count(&self) -> usize {
        self.core.slots.borrow().len()
    }

    pub fn has_lifecycle(&self, point: LifecyclePoint) -> bool {
        self.core.lifecycle.is_set(point)
    }

    /// Host hook: the first render has been committed.
    pub fn component_did_mount(&self) {
        if !self.core.is_unmounted() {
            self.core.lifecycle.fire(LifecyclePoint::DidMount);
        }
    }

    /// Host hook: a later render has been committed.
    pub fn component_did_update(&self) {
        if !self.core.is_unmounted() {
            self.core.lifecycle.fire(LifecyclePoint::DidUpdate);
        }
    }

    /// Host hook: the instance is about to be destroyed. Fires every pending
    /// cleanup and drops context subscriptions. Later calls, and the eventual
    /// drop, do nothing.
    pub fn component_will_unmount(&self) {
        self.core.unmount();
    }
}

impl<P, R, H> Drop for Instance<P, R, H> {
    /// Dropping an instance that was never unmounted still fires its pending
    /// cleanups and drops its context subscriptions.
    fn drop(&mut self) {
        self.core.unmount();
    }
}

#[cfg(test)]
#[path = "tests/instance_tests.rs"]
mod tests;
