use std::fmt;
use std::rc::Rc;

use crate::config::HookOptions;
use crate::error::HookError;
use crate::host::RenderScheduler;
use crate::instance::Instance;
use crate::ref_box::RefBox;

/// Signature of a hook-using render function: props plus the forwarded
/// reference, passed positionally.
pub type RenderFn<P, R, H> = dyn Fn(&P, Option<&RefBox<Option<H>>>) -> R;

/// A function component wrapped for the class-component host.
///
/// Cloning is cheap; clones share the render function.
pub struct HookComponent<P, R, H = ()> {
    render: Rc<RenderFn<P, R, H>>,
    name: Rc<str>,
    options: HookOptions,
}

impl<P, R, H> Clone for HookComponent<P, R, H> {
    fn clone(&self) -> Self {
        Self {
            render: Rc::clone(&self.render),
            name: Rc::clone(&self.name),
            options: self.options,
        }
    }
}

impl<P, R, H> HookComponent<P, R, H> {
    /// Name of the wrapped render function.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name shown for the wrapper, `WithHooks(<name>)`.
    pub fn display_name(&self) -> String {
        format!("WithHooks({})", self.name)
    }

    pub fn options(&self) -> HookOptions {
        self.options
    }

    pub fn with_options(mut self, options: HookOptions) -> Self {
        self.options = options;
        self
    }

    /// Constructs an instance and runs its mounting pass.
    ///
    /// `forwarded_ref` travels beside the props and reaches the render
    /// function as its second argument.
    pub fn instantiate(
        &self,
        props: P,
        forwarded_ref: Option<RefBox<Option<H>>>,
        scheduler: Rc<dyn RenderScheduler>,
    ) -> Result<Instance<P, R, H>, HookError> {
        Instance::construct(self.clone(), props, forwarded_ref, scheduler)
    }

    pub(crate) fn render_fn(&self) -> Rc<RenderFn<P, R, H>> {
        Rc::clone(&self.render)
    }

    pub(crate) fn name_rc(&self) -> Rc<str> {
        Rc::clone(&self.name)
    }
}

impl<P, R, H> fmt::Debug for HookComponent<P, R, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookComponent")
            .field("name", &self.name)
            .field("options", &self.options)
            .finish()
    }
}

/// Wraps `render` so the class-component host can mount it, naming it after
/// the render function.
pub fn with_hooks<P, R, H, F>(render: F) -> HookComponent<P, R, H>
where
    F: Fn(&P, Option<&RefBox<Option<H>>>) -> R + 'static,
{
    with_hooks_named(function_name::<F>(), render)
}

/// Like [`with_hooks`] with an explicit name.
pub fn with_hooks_named<P, R, H, F>(name: &str, render: F) -> HookComponent<P, R, H>
where
    F: Fn(&P, Option<&RefBox<Option<H>>>) -> R + 'static,
{
    HookComponent {
        render: Rc::new(render),
        name: Rc::from(name),
        options: HookOptions::default(),
    }
}

/// Last path segment of `F`'s type name. Closures resolve to the function
/// that defines them.
fn function_name<F>() -> &'static str {
    let mut path = std::any::type_name::<F>();
    if let Some(generics) = path.find('<') {
        path = &path[..generics];
    }
    let mut segments = path.rsplit("::");
    segments
        .find(|segment| !segment.is_empty() && !segment.starts_with('{'))
        .unwrap_or(path)
}
