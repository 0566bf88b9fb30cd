use super::*;
use crate::test_support::{mount, update};
use crate::{
    deps, use_memo, use_ref, use_state, with_hooks, CheckMode, HookComponent, HookOptions,
    LifecyclePoint,
};
use std::cell::RefCell;

thread_local! {
    static EFFECT_LOG: RefCell<Vec<String>> = RefCell::new(Vec::new());
}

fn record(entry: impl Into<String>) {
    EFFECT_LOG.with(|log| log.borrow_mut().push(entry.into()));
}

fn take_log() -> Vec<String> {
    EFFECT_LOG.with(|log| std::mem::take(&mut *log.borrow_mut()))
}

#[test]
fn mount_only_effect_fires_once_and_cleans_up_once() {
    take_log();
    let component: HookComponent<(), _> = with_hooks(|_: &(), _| {
        let (count, set_count) = use_state(|| 0);
        use_effect(
            || {
                record("effect");
                Cleanup::new(|| record("cleanup"))
            },
            deps![],
        );
        (count, set_count)
    });
    let (mut instance, (_, set_count), _) = mount(&component, ());
    assert_eq!(take_log(), vec!["effect"]);
    assert!(!instance.has_lifecycle(LifecyclePoint::DidUpdate));

    for value in 1..=3 {
        set_count.set(value);
        update(&mut instance);
    }
    assert!(take_log().is_empty());

    instance.component_will_unmount();
    instance.component_will_unmount();
    assert_eq!(take_log(), vec!["cleanup"]);
}

#[test]
fn effect_without_deps_fires_after_every_commit() {
    take_log();
    let component: HookComponent<(), _> = with_hooks(|_: &(), _| {
        use_effect(|| record("run"), None);
    });
    let (mut instance, _, _) = mount(&component, ());
    update(&mut instance);
    update(&mut instance);
    assert_eq!(take_log(), vec!["run", "run", "run"]);
}

#[test]
fn effect_refires_only_when_a_dependency_changes() {
    take_log();
    let component: HookComponent<(u32, &'static str), _> =
        with_hooks(|props: &(u32, &'static str), _| {
            let (a, b) = *props;
            use_effect(move || record(format!("{a}-{b}")), deps![a, b]);
        });
    let (mut instance, _, _) = mount(&component, (1, "x"));
    assert_eq!(take_log(), vec!["1-x"]);

    update(&mut instance);
    assert!(take_log().is_empty());

    instance.set_props((2, "x"));
    update(&mut instance);
    assert_eq!(take_log(), vec!["2-x"]);

    update(&mut instance);
    assert!(take_log().is_empty());

    instance.set_props((2, "y"));
    update(&mut instance);
    assert_eq!(take_log(), vec!["2-y"]);
}

#[test]
fn refiring_discards_the_previous_cleanup_by_default() {
    take_log();
    let component: HookComponent<u32, _> = with_hooks(|value: &u32, _| {
        let value = *value;
        use_effect(
            move || {
                record(format!("effect {value}"));
                Cleanup::new(move || record(format!("cleanup {value}")))
            },
            deps![value],
        );
    });
    let (mut instance, _, _) = mount(&component, 1);
    instance.set_props(2);
    update(&mut instance);
    instance.component_will_unmount();
    assert_eq!(take_log(), vec!["effect 1", "effect 2", "cleanup 2"]);
}

#[test]
fn before_next_run_policy_cleans_up_before_refiring() {
    take_log();
    let component: HookComponent<u32, _> = with_hooks(|value: &u32, _| {
        let value = *value;
        use_effect(
            move || {
                record(format!("effect {value}"));
                Cleanup::new(move || record(format!("cleanup {value}")))
            },
            deps![value],
        );
    })
    .with_options(HookOptions::default().with_effect_cleanup(EffectCleanup::BeforeNextRun));
    let (mut instance, _, _) = mount(&component, 1);
    instance.set_props(2);
    update(&mut instance);
    instance.component_will_unmount();
    assert_eq!(
        take_log(),
        vec!["effect 1", "cleanup 1", "effect 2", "cleanup 2"]
    );
}

#[test]
fn several_effects_fire_in_declaration_order() {
    take_log();
    let component: HookComponent<(), _> = with_hooks(|_: &(), _| {
        use_effect(
            || {
                record("first");
                Cleanup::new(|| record("first cleanup"))
            },
            deps![],
        );
        use_layout_effect(
            || {
                record("second");
                Cleanup::new(|| record("second cleanup"))
            },
            None,
        );
        use_mutation_effect(|| record("third"), deps![]);
    });
    let (mut instance, _, _) = mount(&component, ());
    assert_eq!(take_log(), vec!["first", "second", "third"]);

    update(&mut instance);
    assert_eq!(take_log(), vec!["second"]);

    instance.component_will_unmount();
    assert_eq!(take_log(), vec!["first cleanup", "second cleanup"]);
}

#[test]
fn effects_do_not_run_during_render() {
    take_log();
    let component: HookComponent<(), _> = with_hooks(|_: &(), _| {
        use_effect(|| record("run"), None);
    });
    let scheduler = std::rc::Rc::new(crate::test_support::TestScheduler::default());
    let mut instance = component
        .instantiate((), None, scheduler)
        .expect("mount pass");
    instance.render().expect("first render");
    assert!(take_log().is_empty());
    instance.component_did_mount();
    assert_eq!(take_log(), vec!["run"]);
}

#[test]
fn scenario_state_mount_only_effect_and_ref() {
    take_log();
    let component: HookComponent<(), _> = with_hooks(|_: &(), _| {
        let (count, set_count) = use_state(|| 0);
        use_effect(|| record("mounted"), deps![]);
        let node = use_ref::<Option<String>>(None);
        (count, set_count, node)
    });
    let (mut instance, (count, set_count, node), _) = mount(&component, ());
    assert_eq!(count, 0);
    assert_eq!(take_log(), vec!["mounted"]);
    assert_eq!(node.current(), None);

    set_count.set(5);
    let (count, _, next_node) = update(&mut instance);
    assert_eq!(count, 5);
    assert!(take_log().is_empty());
    assert!(node.ptr_eq(&next_node));
}

#[test]
fn dropping_a_mounted_instance_runs_pending_cleanups() {
    take_log();
    let component: HookComponent<(), ()> = with_hooks(|_: &(), _| {
        use_effect(
            || {
                record("effect");
                Cleanup::new(|| record("cleanup"))
            },
            deps![],
        );
    });
    let (instance, _, _) = mount(&component, ());
    drop(instance);
    assert_eq!(take_log(), vec!["effect", "cleanup"]);
}

#[test]
fn explicit_unmount_then_drop_cleans_up_once() {
    take_log();
    let component: HookComponent<(), ()> = with_hooks(|_: &(), _| {
        use_effect(|| Cleanup::new(|| record("cleanup")), None);
    });
    let (instance, _, _) = mount(&component, ());
    instance.component_will_unmount();
    drop(instance);
    assert_eq!(take_log(), vec!["cleanup"]);
}

#[test]
fn recreated_effect_slots_reuse_their_lifecycle_callbacks() {
    take_log();
    let component: HookComponent<bool, ()> = with_hooks(|as_effect: &bool, _| {
        if *as_effect {
            use_effect(
                || {
                    record("effect");
                    Cleanup::new(|| record("cleanup"))
                },
                None,
            );
        } else {
            use_memo(|| 0u8, None);
        }
    })
    .with_options(HookOptions::default().with_check_mode(CheckMode::Lenient));
    let (mut instance, _, _) = mount(&component, true);
    assert_eq!(take_log(), vec!["effect"]);

    for _ in 0..3 {
        instance.set_props(false);
        update(&mut instance);
        assert!(take_log().is_empty());

        instance.set_props(true);
        update(&mut instance);
        assert_eq!(take_log(), vec!["cleanup", "effect"]);
    }

    instance.component_will_unmount();
    assert_eq!(take_log(), vec!["cleanup"]);
}

#[test]
fn mount_only_effect_created_by_an_update_fires_once() {
    take_log();
    let component: HookComponent<bool, ()> = with_hooks(|as_effect: &bool, _| {
        if *as_effect {
            use_effect(|| record("effect"), deps![]);
        } else {
            use_ref(());
        }
    })
    .with_options(HookOptions::default().with_check_mode(CheckMode::Lenient));
    let (mut instance, _, _) = mount(&component, false);
    instance.set_props(true);
    update(&mut instance);
    update(&mut instance);
    assert_eq!(take_log(), vec!["effect"]);
}
