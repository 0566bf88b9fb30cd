use retrohooks_core::{
    HookComponent, HookError, Instance, InstanceId, RefBox, RenderScheduler,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

const MAX_PUMP_ROUNDS: usize = 100;

/// Render requests collected from instances, serviced by the owning rule.
///
/// Requests for an instance that is already queued are coalesced, matching a
/// host that batches state updates until its next render.
#[derive(Default)]
pub struct RenderQueue {
    pending: RefCell<Vec<InstanceId>>,
    requests: Cell<usize>,
}

impl RenderQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Instances waiting for a render.
    pub fn pending(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Every request received, including coalesced ones.
    pub fn total_requests(&self) -> usize {
        self.requests.get()
    }

    pub fn take(&self) -> Vec<InstanceId> {
        std::mem::take(&mut *self.pending.borrow_mut())
    }
}

impl RenderScheduler for RenderQueue {
    fn request_render(&self, instance: InstanceId) {
        self.requests.set(self.requests.get() + 1);
        let mut pending = self.pending.borrow_mut();
        if !pending.contains(&instance) {
            pending.push(instance);
        }
    }
}

/// Headless class-component host for exercising one hook component in tests.
///
/// `HookTestRule` plays the host's part of the contract: it constructs the
/// instance, calls `render` followed by `component_did_mount` or
/// `component_did_update`, services re-render requests, and unmounts.
pub struct HookTestRule<P, R, H = ()> {
    component: HookComponent<P, R, H>,
    queue: Rc<RenderQueue>,
    instance: Option<Instance<P, R, H>>,
    output: Option<R>,
    render_count: usize,
}

impl<P, R, H> HookTestRule<P, R, H> {
    pub fn new(component: HookComponent<P, R, H>) -> Self {
        Self {
            component,
            queue: Rc::new(RenderQueue::new()),
            instance: None,
            output: None,
            render_count: 0,
        }
    }

    /// Mount the component and commit its first render. A previously mounted
    /// instance is unmounted first.
    pub fn mount(&mut self, props: P) -> Result<&R, HookError> {
        self.mount_with_ref(props, None)
    }

    pub fn mount_with_ref(
        &mut self,
        props: P,
        forwarded_ref: Option<RefBox<Option<H>>>,
    ) -> Result<&R, HookError> {
        self.unmount();
        let mut instance =
            self.component
                .instantiate(props, forwarded_ref, self.queue.clone())?;
        let output = instance.render()?;
        self.render_count += 1;
        instance.component_did_mount();
        log::debug!("mounted {}", self.component.display_name());
        self.instance = Some(instance);
        Ok(&*self.output.insert(output))
    }

    /// Re-render as the host does when the parent updates.
    pub fn rerender(&mut self) -> Result<&R, HookError> {
        self.commit_update()
    }

    /// Replace the props and re-render.
    pub fn set_props(&mut self, props: P) -> Result<&R, HookError> {
        self.instance_mut().set_props(props);
        self.rerender()
    }

    /// Service queued render requests until none remain. Returns the number of
    /// renders performed.
    pub fn pump_until_idle(&mut self) -> Result<usize, HookError> {
        let mut renders = 0;
        for _ in 0..MAX_PUMP_ROUNDS {
            if self.queue.take().is_empty() {
                return Ok(renders);
            }
            if self.instance.as_ref().map_or(true, Instance::is_unmounted) {
                continue;
            }
            self.commit_update()?;
            renders += 1;
        }
        panic!("pump_until_idle looped too many times!");
    }

    /// Unmount the current instance, firing its cleanups.
    pub fn unmount(&mut self) {
        if let Some(instance) = self.instance.take() {
            instance.component_will_unmount();
            log::debug!("unmounted {}", self.component.display_name());
        }
    }

    /// Output of the most recent render.
    pub fn output(&self) -> Option<&R> {
        self.output.as_ref()
    }

    pub fn render_count(&self) -> usize {
        self.render_count
    }

    pub fn pending_renders(&self) -> usize {
        self.queue.pending()
    }

    pub fn scheduler(&self) -> Rc<RenderQueue> {
        Rc::clone(&self.queue)
    }

    pub fn instance(&self) -> Option<&Instance<P, R, H>> {
        self.instance.as_ref()
    }

    pub fn is_mounted(&self) -> bool {
        self.instance.is_some()
    }

    fn instance_mut(&mut self) -> &mut Instance<P, R, H> {
        self.instance
            .as_mut()
            .expect("HookTestRule: component is not mounted")
    }

    fn commit_update(&mut self) -> Result<&R, HookError> {
        let instance = self
            .instance
            .as_mut()
            .expect("HookTestRule: component is not mounted");
        let output = instance.render()?;
        instance.component_did_update();
        self.render_count += 1;
        Ok(&*self.output.insert(output))
    }
}

impl<P, R, H> Drop for HookTestRule<P, R, H> {
    fn drop(&mut self) {
        if let Some(instance) = self.instance.take() {
            instance.component_will_unmount();
        }
    }
}

/// Convenience helper for tests that only need temporary access to a
/// `HookTestRule`.
pub fn run_test_component<P, R, H, T>(
    component: HookComponent<P, R, H>,
    f: impl FnOnce(&mut HookTestRule<P, R, H>) -> T,
) -> T {
    let mut rule = HookTestRule::new(component);
    f(&mut rule)
}

#[cfg(test)]
#[path = "tests/testing_tests.rs"]
mod tests;
