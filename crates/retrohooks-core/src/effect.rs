//! Effect hooks.
//!
//! An effect is never run during render. On mount the hook attaches an effect
//! runner to the instance's lifecycle slots (post-mount and, unless the effect
//! is mount-only, post-update) and its cleanup runner (pre-unmount). Each
//! runner holds a `current` callback. Updating passes only re-arm or disarm
//! the effect runner's `current`; the host fires it later.
//!
//! Lifecycle callbacks are registered once per hook id. A slot re-created
//! after a call-order change rebinds the existing callbacks to the new runner
//! and runs the superseded runner's pending cleanup.

use std::any::type_name;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::config::EffectCleanup;
use crate::deps::{should_rerun, Deps};
use crate::dispatch_context::{self, HookFrame, Phase};
use crate::instance::InstanceCore;
use crate::lifecycle::LifecyclePoint;
use crate::slot_store::{Slot, SlotKind};

/// Cleanup callback returned from an effect.
pub struct Cleanup(Box<dyn FnOnce()>);

impl Cleanup {
    pub fn new(cleanup: impl FnOnce() + 'static) -> Self {
        Self(Box::new(cleanup))
    }

    fn run(self) {
        (self.0)()
    }
}

/// Values an effect may return.
pub trait IntoCleanup {
    fn into_cleanup(self) -> Option<Cleanup>;
}

impl IntoCleanup for () {
    fn into_cleanup(self) -> Option<Cleanup> {
        None
    }
}

impl IntoCleanup for Cleanup {
    fn into_cleanup(self) -> Option<Cleanup> {
        Some(self)
    }
}

impl IntoCleanup for Option<Cleanup> {
    fn into_cleanup(self) -> Option<Cleanup> {
        self
    }
}

type RawEffect = Box<dyn FnOnce() -> Option<Cleanup>>;

#[derive(Default)]
struct CleanupRunner {
    current: RefCell<Option<Cleanup>>,
}

impl CleanupRunner {
    fn run(&self) {
        let cleanup = self.current.borrow_mut().take();
        if let Some(cleanup) = cleanup {
            cleanup.run();
        }
    }

    /// Replaces the pending cleanup. A replaced cleanup never runs.
    fn replace(&self, cleanup: Option<Cleanup>) {
        *self.current.borrow_mut() = cleanup;
    }
}

struct EffectRunner {
    current: RefCell<Option<RawEffect>>,
    mount_only: bool,
    cleanup: Rc<CleanupRunner>,
    policy: EffectCleanup,
}

impl EffectRunner {
    fn run(&self) {
        let effect = self.current.borrow_mut().take();
        if let Some(effect) = effect {
            if self.policy == EffectCleanup::BeforeNextRun {
                self.cleanup.run();
            }
            self.cleanup.replace(effect());
        }
        if self.mount_only {
            self.current.borrow_mut().take();
        }
    }

    fn arm(&self, effect: RawEffect) {
        *self.current.borrow_mut() = Some(effect);
    }

    fn disarm(&self) {
        self.current.borrow_mut().take();
    }
}

/// Lifecycle registration of one effect id. Its callbacks are injected once
/// per id and always drive the runner currently bound to it.
pub(crate) struct EffectBinding {
    runner: RefCell<Rc<EffectRunner>>,
    on_update: Cell<bool>,
}

impl EffectBinding {
    fn runner(&self) -> Rc<EffectRunner> {
        Rc::clone(&self.runner.borrow())
    }

    /// Binds `runner` and returns the one it replaces.
    fn rebind(&self, runner: Rc<EffectRunner>) -> Rc<EffectRunner> {
        self.runner.replace(runner)
    }
}

pub(crate) struct EffectSlot {
    runner: Rc<EffectRunner>,
    deps: Option<Deps>,
}

/// Effect hook.
///
/// `deps` decides when the effect fires again after an update:
/// - `None`: after every update;
/// - `deps![]`: never; the effect fires once after mount;
/// - `deps![a, b]`: after updates where any position changed since the
///   previous render.
///
/// A returned [`Cleanup`] runs when the instance unmounts. With the default
/// [`EffectCleanup::OnUnmountOnly`] policy a cleanup returned by an earlier
/// firing is dropped without running when the effect fires again.
pub fn use_effect<F, C>(effect: F, deps: Option<Deps>)
where
    F: FnOnce() -> C + 'static,
    C: IntoCleanup,
{
    let frame = dispatch_context::next_hook("use_effect");
    let raw: RawEffect = Box::new(move || effect().into_cleanup());
    effect_hook(frame, raw, deps);
}

/// Synonym of [`use_effect`]; layout timing is not modeled separately.
pub fn use_layout_effect<F, C>(effect: F, deps: Option<Deps>)
where
    F: FnOnce() -> C + 'static,
    C: IntoCleanup,
{
    use_effect(effect, deps)
}

/// Synonym of [`use_effect`]; mutation timing is not modeled separately.
pub fn use_mutation_effect<F, C>(effect: F, deps: Option<Deps>)
where
    F: FnOnce() -> C + 'static,
    C: IntoCleanup,
{
    use_effect(effect, deps)
}

fn effect_hook(frame: HookFrame, raw: RawEffect, deps: Option<Deps>) {
    let HookFrame {
        instance,
        id,
        phase,
    } = frame;
    let mount_only = deps.as_ref().is_some_and(Deps::is_empty);

    if phase == Phase::Updating {
        let existing = instance.read_slot(
            id,
            SlotKind::Effect,
            type_name::<EffectSlot>(),
            |slot| {
                let Slot::Effect(effect) = slot else {
                    return None;
                };
                if mount_only {
                    return Some(None);
                }
                let fire = should_rerun(deps.as_ref(), effect.deps.as_ref());
                effect.deps = deps.clone();
                Some(Some((Rc::clone(&effect.runner), fire)))
            },
        );
        if let Some(decision) = existing {
            if let Some((runner, fire)) = decision {
                if fire {
                    runner.arm(raw);
                } else {
                    log::debug!("effect {id}: dependencies unchanged, skipping");
                    runner.disarm();
                }
            }
            return;
        }
    }

    let runner = Rc::new(EffectRunner {
        current: RefCell::new(Some(raw)),
        mount_only,
        cleanup: Rc::new(CleanupRunner::default()),
        policy: instance.options().effect_cleanup,
    });
    instance.put_slot(
        id,
        Slot::Effect(EffectSlot {
            runner: Rc::clone(&runner),
            deps,
        }),
    );

    if let Some(binding) = instance.effect_binding(id) {
        // Slot re-created after a call-order change: reuse the id's lifecycle
        // callbacks and retire the runner they drove.
        let superseded = binding.rebind(runner);
        log::debug!("effect {id}: slot re-created, running superseded cleanup");
        superseded.cleanup.run();
        if !binding.on_update.get() {
            inject_on_update(&instance, &binding);
        }
        return;
    }

    let binding = Rc::new(EffectBinding {
        runner: RefCell::new(runner),
        on_update: Cell::new(false),
    });
    let on_mount = Rc::clone(&binding);
    instance.inject_lifecycle(
        LifecyclePoint::DidMount,
        Rc::new(move || on_mount.runner().run()),
    );
    // A mount-only effect created by an updating pass still has to fire once,
    // and only the post-update slot will be fired from now on.
    if !mount_only || phase == Phase::Updating {
        inject_on_update(&instance, &binding);
    }
    let on_unmount = Rc::clone(&binding);
    instance.inject_lifecycle(
        LifecyclePoint::WillUnmount,
        Rc::new(move || on_unmount.runner().cleanup.run()),
    );
    instance.bind_effect(id, binding);
}

fn inject_on_update(instance: &InstanceCore, binding: &Rc<EffectBinding>) {
    binding.on_update.set(true);
    let on_update = Rc::clone(binding);
    instance.inject_lifecycle(
        LifecyclePoint::DidUpdate,
        Rc::new(move || on_update.runner().run()),
    );
}

#[cfg(test)]
#[path = "tests/effect_tests.rs"]
mod tests;
