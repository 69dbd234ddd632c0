//! Post-render hook registry
//!
//! Feature modules register one hook per view at startup. After a fragment is
//! injected into the content region, the hook for that view runs once and may
//! hand back a controller that owns the view's client-side state.

use std::collections::HashMap;
use std::fmt;

use sv_core::prelude::*;
use sv_core::{NavTarget, ViewId};

use crate::features::FeatureController;
use crate::shell::ContentRegion;

/// Everything a hook gets to see about the render that triggered it
#[derive(Debug, Clone)]
pub struct RenderContext {
    /// Generation of the navigation that produced the fragment
    pub generation: u64,
    pub target: NavTarget,
    /// Stable handle to the shell's content region
    pub region: ContentRegion,
}

/// Callback run after a view's fragment has been injected
///
/// Hooks must be `Send + Sync` so the registry can live inside `AppState`.
pub trait PostRenderHook: Send + Sync + fmt::Debug {
    /// Name for logging
    fn name(&self) -> &str;

    /// Set up the view; return a controller if the view has live state
    fn on_render(&self, ctx: &RenderContext) -> Option<FeatureController>;
}

/// ViewId → hook
#[derive(Debug, Default)]
pub struct HookRegistry {
    hooks: HashMap<ViewId, Box<dyn PostRenderHook>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `hook` for `view`, replacing any earlier one
    pub fn register(&mut self, view: ViewId, hook: Box<dyn PostRenderHook>) {
        debug!("Registering post-render hook '{}' for {}", hook.name(), view);
        if let Some(old) = self.hooks.insert(view, hook) {
            warn!("Replaced post-render hook '{}' for {}", old.name(), view);
        }
    }

    pub fn contains(&self, view: ViewId) -> bool {
        self.hooks.contains_key(&view)
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Run the hook registered for the rendered view, if any
    pub fn run(&self, ctx: &RenderContext) -> Option<FeatureController> {
        let hook = self.hooks.get(&ctx.target.view)?;
        trace!("Running post-render hook '{}'", hook.name());
        hook.on_render(ctx)
    }
}
