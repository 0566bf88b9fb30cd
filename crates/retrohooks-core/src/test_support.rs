use std::cell::RefCell;
use std::rc::Rc;

use crate::{HookComponent, Instance, InstanceId, RenderScheduler};

#[derive(Default)]
pub(crate) struct TestScheduler {
    requests: RefCell<Vec<InstanceId>>,
}

impl TestScheduler {
    pub(crate) fn take_requests(&self) -> Vec<InstanceId> {
        std::mem::take(&mut *self.requests.borrow_mut())
    }

    pub(crate) fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }
}

impl RenderScheduler for TestScheduler {
    fn request_render(&self, instance: InstanceId) {
        self.requests.borrow_mut().push(instance);
    }
}

/// Constructs, renders and commits `component` the way a host mounts it.
pub(crate) fn mount<P, R>(
    component: &HookComponent<P, R>,
    props: P,
) -> (Instance<P, R>, R, Rc<TestScheduler>) {
    let scheduler = Rc::new(TestScheduler::default());
    let mut instance = component
        .instantiate(props, None, scheduler.clone())
        .expect("mount pass");
    let output = instance.render().expect("first render");
    instance.component_did_mount();
    (instance, output, scheduler)
}

/// Re-renders and commits an update.
pub(crate) fn update<P, R>(instance: &mut Instance<P, R>) -> R {
    let output = instance.render().expect("update render");
    instance.component_did_update();
    output
}
