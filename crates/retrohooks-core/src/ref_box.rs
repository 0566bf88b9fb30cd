use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

/// Mutable box returned by [`use_ref`](crate::use_ref).
///
/// Cloning a `RefBox` clones the handle, not the value: every clone observes
/// the same `current`. The box handed out on mount is the same one returned on
/// every later render of that instance, so [`RefBox::ptr_eq`] holds across
/// renders.
pub struct RefBox<T> {
    inner: Rc<RefCell<T>>,
}

impl<T> Clone for RefBox<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> RefBox<T> {
    pub fn new(current: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(current)),
        }
    }

    /// Run `f` with an immutable reference to `current`.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let borrow = self.inner.borrow();
        f(&borrow)
    }

    /// Run `f` with a mutable reference to `current`.
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut borrow = self.inner.borrow_mut();
        f(&mut borrow)
    }

    pub fn borrow(&self) -> Ref<'_, T> {
        self.inner.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, T> {
        self.inner.borrow_mut()
    }

    /// Overwrite `current`, returning the previous value.
    pub fn set_current(&self, current: T) -> T {
        self.inner.replace(current)
    }

    /// Whether both handles point at the same box.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T: Clone> RefBox<T> {
    pub fn current(&self) -> T {
        self.inner.borrow().clone()
    }
}

impl<T: Default> Default for RefBox<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for RefBox<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefBox")
            .field("current", &*self.inner.borrow())
            .finish()
    }
}
