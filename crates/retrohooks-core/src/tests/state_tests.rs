use super::*;
use crate::test_support::{mount, update};
use crate::{with_hooks, HookComponent};
use std::cell::Cell;

#[test]
fn state_returns_initial_value_then_latest_set_value() {
    let component: HookComponent<(), _> = with_hooks(|_: &(), _| use_state(|| 0));
    let (mut instance, (value, setter), _) = mount(&component, ());
    assert_eq!(value, 0);

    let (value, _) = update(&mut instance);
    assert_eq!(value, 0);

    setter.set(5);
    let (value, _) = update(&mut instance);
    assert_eq!(value, 5);

    let (value, _) = update(&mut instance);
    assert_eq!(value, 5);
}

#[test]
fn initializer_runs_only_on_mount() {
    let calls = Rc::new(Cell::new(0));
    let component: HookComponent<(), _> = with_hooks({
        let calls = Rc::clone(&calls);
        move |_: &(), _| {
            let calls = Rc::clone(&calls);
            use_state(move || {
                calls.set(calls.get() + 1);
                "ready".to_string()
            })
            .0
        }
    });
    let (mut instance, value, _) = mount(&component, ());
    assert_eq!(value, "ready");
    update(&mut instance);
    update(&mut instance);
    assert_eq!(calls.get(), 1);
}

#[test]
fn updates_to_different_ids_are_all_applied_before_render() {
    let component: HookComponent<(), _> = with_hooks(|_: &(), _| {
        let first = use_state_value(1);
        let second = use_state_value("a");
        (first, second)
    });
    let (mut instance, ((_, set_first), (_, set_second)), scheduler) = mount(&component, ());

    set_first.set(10);
    set_second.set("b");
    set_first.set(20);
    assert_eq!(scheduler.request_count(), 3);

    let ((first, _), (second, _)) = update(&mut instance);
    assert_eq!(first, 20);
    assert_eq!(second, "b");
}

#[test]
fn setters_are_interchangeable_across_renders() {
    let component: HookComponent<(), _> = with_hooks(|_: &(), _| use_state_value(0u8).1);
    let (mut instance, mounted_setter, _) = mount(&component, ());
    let updated_setter = update(&mut instance);
    assert_eq!(mounted_setter, updated_setter);

    mounted_setter.set(3);
    assert_eq!(instance.state_value::<u8>(updated_setter.id()), Some(3));
}

#[test]
fn setter_update_reads_the_live_state_bag() {
    let component: HookComponent<(), _> = with_hooks(|_: &(), _| use_state_value(1));
    let (mut instance, (_, setter), _) = mount(&component, ());

    setter.update(|value| value + 1);
    setter.update(|value| value * 10);

    let (value, _) = update(&mut instance);
    assert_eq!(value, 20);
}

#[test]
fn reducer_dispatches_before_render_overwrite_instead_of_accumulating() {
    let component: HookComponent<(), _> =
        with_hooks(|_: &(), _| use_reducer(|state: &i32, action: i32| state + action, 0, None));
    let (mut instance, (state, dispatch), _) = mount(&component, ());
    assert_eq!(state, 0);

    dispatch.dispatch(3);
    dispatch.dispatch(4);

    let (state, dispatch) = update(&mut instance);
    assert_eq!(state, 4);

    dispatch.dispatch(1);
    let (state, _) = update(&mut instance);
    assert_eq!(state, 5);
}

#[test]
fn reducer_applies_initial_action_on_mount_only() {
    let reductions = Rc::new(Cell::new(0));
    let component: HookComponent<(), _> = with_hooks({
        let reductions = Rc::clone(&reductions);
        move |_: &(), _| {
            let reductions = Rc::clone(&reductions);
            use_reducer(
                move |state: &Vec<&'static str>, action: &'static str| {
                    reductions.set(reductions.get() + 1);
                    let mut next = state.clone();
                    next.push(action);
                    next
                },
                Vec::new(),
                Some("init"),
            )
            .0
        }
    });
    let (mut instance, state, _) = mount(&component, ());
    assert_eq!(state, vec!["init"]);

    let state = update(&mut instance);
    assert_eq!(state, vec!["init"]);
    assert_eq!(reductions.get(), 1);
}

#[test]
fn updates_after_unmount_are_ignored() {
    let component: HookComponent<(), _> = with_hooks(|_: &(), _| use_state_value(0).1);
    let (instance, setter, scheduler) = mount(&component, ());
    instance.component_will_unmount();

    setter.set(9);
    assert_eq!(scheduler.request_count(), 0);
    assert_eq!(instance.state_value::<i32>(setter.id()), Some(0));
}

#[test]
fn setter_outliving_its_instance_does_nothing() {
    let component: HookComponent<(), _> = with_hooks(|_: &(), _| use_state_value(0).1);
    let (instance, setter, scheduler) = mount(&component, ());
    drop(instance);

    setter.set(1);
    setter.update(|value| value + 1);
    assert_eq!(scheduler.request_count(), 0);
}

#[test]
fn state_update_merges_last_write_per_id() {
    let mut bag = StateBag::default();
    let id = HookId::new(1);
    bag.insert(id, 1);
    bag.merge(StateUpdate::new().with(id, 2).with(id, 3));
    assert_eq!(bag.get::<i32>(id), Some(3));
    assert_eq!(bag.get::<u8>(id), None);
}
