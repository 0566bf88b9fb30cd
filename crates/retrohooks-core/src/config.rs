//! Per-component dispatcher options.

/// How strictly the dispatcher checks the call-order protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckMode {
    /// Violations go unreported. A slot whose kind or value type no longer
    /// matches the hook reading it is re-created in place and a warning is
    /// logged.
    Lenient,
    /// Same recovery as `Lenient`, but the first violation of a render pass
    /// (hook count or slot kind) is returned from `Instance::render`.
    Strict,
}

impl Default for CheckMode {
    fn default() -> Self {
        if cfg!(feature = "strict-hooks") {
            CheckMode::Strict
        } else {
            CheckMode::Lenient
        }
    }
}

/// When an effect's cleanup callback runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EffectCleanup {
    /// Cleanup runs only when the instance unmounts. A cleanup returned by an
    /// earlier firing is discarded when the effect fires again.
    #[default]
    OnUnmountOnly,
    /// The pending cleanup runs right before the effect fires again, and on
    /// unmount.
    BeforeNextRun,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HookOptions {
    pub check_mode: CheckMode,
    pub effect_cleanup: EffectCleanup,
}

impl HookOptions {
    pub fn strict() -> Self {
        Self {
            check_mode: CheckMode::Strict,
            ..Self::default()
        }
    }

    pub fn with_check_mode(mut self, check_mode: CheckMode) -> Self {
        self.check_mode = check_mode;
        self
    }

    pub fn with_effect_cleanup(mut self, effect_cleanup: EffectCleanup) -> Self {
        self.effect_cleanup = effect_cleanup;
        self
    }

    pub(crate) fn is_strict(&self) -> bool {
        self.check_mode == CheckMode::Strict
    }
}
