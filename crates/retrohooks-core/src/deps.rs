//! Dependency sequences for effects and memoized values.
//!
//! A [`Deps`] value records one fingerprint per dependency, in call order.
//! Two sequences are compared position by position: the hook re-runs when any
//! position of the *new* sequence differs from the same position of the
//! previous one. Positions that only exist in the previous sequence are never
//! looked at, so a sequence that shrinks between renders with an unchanged
//! prefix compares as unchanged.

use crate::collections::hasher;
use smallvec::SmallVec;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// Fingerprint of one dependency value.
pub type Key = u64;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Deps {
    keys: SmallVec<[Key; 4]>,
}

impl Deps {
    /// An empty sequence. Passing it to an effect makes the effect mount-only.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Appends a dependency compared by value.
    pub fn with<T: Hash + ?Sized>(mut self, value: &T) -> Self {
        self.push(value);
        self
    }

    /// Appends a dependency compared by pointer identity.
    pub fn with_ptr<T: ?Sized>(mut self, value: &Rc<T>) -> Self {
        self.push_ptr(value);
        self
    }

    pub fn push<T: Hash + ?Sized>(&mut self, value: &T) {
        self.keys.push(fingerprint(value));
    }

    pub fn push_ptr<T: ?Sized>(&mut self, value: &Rc<T>) {
        let address = Rc::as_ptr(value) as *const () as usize;
        self.keys.push(fingerprint(&address));
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Returns `true` when any position of `self` differs from `previous`.
    ///
    /// A missing previous sequence behaves like an empty one, so every
    /// position counts as changed.
    pub fn changed_since(&self, previous: Option<&Deps>) -> bool {
        self.keys.iter().enumerate().any(|(index, key)| {
            previous.and_then(|prev| prev.keys.get(index)) != Some(key)
        })
    }
}

/// Whether a hook guarded by `next` must re-run, given the dependencies it
/// stored last time. Absent dependencies always re-run.
pub(crate) fn should_rerun(next: Option<&Deps>, previous: Option<&Deps>) -> bool {
    match next {
        None => true,
        Some(next) => next.changed_since(previous),
    }
}

fn fingerprint<T: Hash + ?Sized>(value: &T) -> Key {
    let mut state = hasher::new();
    value.hash(&mut state);
    state.finish()
}

/// Builds an `Option<Deps>` for the hook functions.
///
/// `deps![]` yields an empty sequence (mount-only effects), `deps![a, b]`
/// fingerprints each expression by reference. Pass `None` instead to make a
/// hook re-run on every render.
#[macro_export]
macro_rules! deps {
    () => {
        ::core::option::Option::Some($crate::Deps::empty())
    };
    ($($dep:expr),+ $(,)?) => {
        ::core::option::Option::Some($crate::Deps::empty()$(.with(&$dep))+)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_values_are_unchanged() {
        let previous = Deps::empty().with(&1).with("a");
        let next = Deps::empty().with(&1).with("a");
        assert!(!next.changed_since(Some(&previous)));
    }

    #[test]
    fn any_position_change_is_detected() {
        let previous = Deps::empty().with(&1).with(&2);
        assert!(Deps::empty().with(&1).with(&3).changed_since(Some(&previous)));
        assert!(Deps::empty().with(&0).with(&2).changed_since(Some(&previous)));
    }

    #[test]
    fn growing_sequence_counts_new_positions_as_changed() {
        let previous = Deps::empty().with(&1);
        let next = Deps::empty().with(&1).with(&2);
        assert!(next.changed_since(Some(&previous)));
    }

    #[test]
    fn shrinking_sequence_with_same_prefix_is_unchanged() {
        let previous = Deps::empty().with(&1).with(&2);
        let next = Deps::empty().with(&1);
        assert!(!next.changed_since(Some(&previous)));
    }

    #[test]
    fn missing_previous_sequence_changes_every_position() {
        assert!(Deps::empty().with(&1).changed_since(None));
        assert!(!Deps::empty().changed_since(None));
    }

    #[test]
    fn pointer_dependencies_compare_identity() {
        let a = Rc::new(5);
        let b = Rc::new(5);
        let previous = Deps::empty().with_ptr(&a);
        assert!(!Deps::empty().with_ptr(&a.clone()).changed_since(Some(&previous)));
        assert!(Deps::empty().with_ptr(&b).changed_since(Some(&previous)));
    }

    #[test]
    fn absent_dependencies_always_rerun() {
        let previous = Deps::empty().with(&1);
        assert!(should_rerun(None, Some(&previous)));
        assert!(!should_rerun(Some(&previous.clone()), Some(&previous)));
    }

    #[test]
    fn deps_macro_builds_sequences() {
        assert_eq!(deps![], Some(Deps::empty()));
        let built = deps![1u8, "x"].expect("deps present");
        assert_eq!(built, Deps::empty().with(&1u8).with(&"x"));
    }
}
