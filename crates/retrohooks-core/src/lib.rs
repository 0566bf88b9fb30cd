#![doc = r"Hook dispatch engine for running function components on a class-component host."]
#![allow(clippy::missing_const_for_thread_local)]

pub extern crate self as retrohooks_core;

mod collections;
pub mod component;
pub mod config;
pub mod context;
pub mod deps;
pub mod dispatch_context;
pub mod effect;
pub mod error;
pub mod host;
pub mod instance;
pub mod lifecycle;
pub mod memo;
pub mod ref_box;
mod reference;
mod slot_store;
pub mod state;

pub use component::{with_hooks, with_hooks_named, HookComponent, RenderFn};
pub use config::{CheckMode, EffectCleanup, HookOptions};
pub use context::{use_context, Context};
pub use deps::{Deps, Key};
pub use dispatch_context::{current_phase, is_rendering, try_current_hook_id, Phase};
pub use effect::{use_effect, use_layout_effect, use_mutation_effect, Cleanup, IntoCleanup};
pub use error::HookError;
pub use host::{InstanceId, RenderScheduler};
pub use instance::Instance;
pub use lifecycle::LifecyclePoint;
pub use memo::{use_callback, use_imperative_handle, use_memo, Callback};
pub use ref_box::RefBox;
pub use reference::use_ref;
pub use slot_store::{HookId, SlotKind};
pub use state::{
    use_reducer, use_state, use_state_value, Dispatch, StateSetter, StateUpdate,
};

#[cfg(test)]
pub(crate) mod test_support;
