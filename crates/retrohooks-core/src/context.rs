//! Ambient values shared with consuming components.
//!
//! A [`Context`] holds one current value. [`use_context`] reads it directly
//! and, on the consumer's mount pass, subscribes the instance so that
//! [`Context::provide`] schedules a re-render of every mounted consumer.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::dispatch_context;
use crate::host::InstanceId;
use crate::instance::InstanceCore;

struct Subscriber {
    id: InstanceId,
    instance: Weak<InstanceCore>,
}

struct ContextInner<T> {
    current: RefCell<T>,
    subscribers: RefCell<Vec<Subscriber>>,
    version: Cell<u64>,
}

pub struct Context<T> {
    inner: Rc<ContextInner<T>>,
}

impl<T> Clone for Context<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> PartialEq for Context<T> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T> Eq for Context<T> {}

impl<T: fmt::Debug> fmt::Debug for Context<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("current", &*self.inner.current.borrow())
            .field("subscribers", &self.inner.subscribers.borrow().len())
            .finish()
    }
}

impl<T: Clone + 'static> Context<T> {
    pub fn new(default: T) -> Self {
        Self {
            inner: Rc::new(ContextInner {
                current: RefCell::new(default),
                subscribers: RefCell::new(Vec::new()),
                version: Cell::new(0),
            }),
        }
    }

    /// The value most recently provided, or the default.
    pub fn current(&self) -> T {
        self.inner.current.borrow().clone()
    }

    /// Number of values provided since creation.
    pub fn version(&self) -> u64 {
        self.inner.version.get()
    }

    /// Stores `value` and requests a render of every subscribed instance.
    pub fn provide(&self, value: T) {
        *self.inner.current.borrow_mut() = value;
        self.inner.version.set(self.inner.version.get() + 1);
        let consumers: Vec<Rc<InstanceCore>> = {
            let mut subscribers = self.inner.subscribers.borrow_mut();
            subscribers.retain(|subscriber| subscriber.instance.strong_count() > 0);
            subscribers
                .iter()
                .filter_map(|subscriber| subscriber.instance.upgrade())
                .collect()
        };
        log::debug!("context provided, notifying {} consumers", consumers.len());
        for consumer in consumers {
            consumer.request_render();
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.borrow().len()
    }

    fn subscribe(&self, instance: &Rc<InstanceCore>) {
        let id = instance.id();
        {
            let mut subscribers = self.inner.subscribers.borrow_mut();
            if subscribers.iter().any(|subscriber| subscriber.id == id) {
                return;
            }
            subscribers.push(Subscriber {
                id,
                instance: Rc::downgrade(instance),
            });
        }
        let inner: Weak<ContextInner<T>> = Rc::downgrade(&self.inner);
        instance.add_unsubscriber(Box::new(move || {
            if let Some(inner) = inner.upgrade() {
                inner
                    .subscribers
                    .borrow_mut()
                    .retain(|subscriber| subscriber.id != id);
            }
        }));
        log::debug!("{id} subscribed to context");
    }
}

/// Context hook.
///
/// Returns the context's current value. The mount pass also subscribes the
/// instance, once per context however often it reads it; later calls only
/// read. The hook claims no slot.
pub fn use_context<T: Clone + 'static>(context: &Context<T>) -> T {
    let (instance, phase) = dispatch_context::current("use_context");
    if phase.is_mounting() {
        context.subscribe(&instance);
    }
    context.current()
}

#[cfg(test)]
#[path = "tests/context_tests.rs"]
mod tests;
