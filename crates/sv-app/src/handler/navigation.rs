//! Router outcomes, fragment results and feature data

use sv_core::prelude::*;
use sv_core::NavTarget;

use super::{UpdateAction, UpdateResult};
use crate::hooks::RenderContext;
use crate::message::FetchFailure;
use crate::router::{LoadOutcome, NavOutcome};
use crate::state::AppState;

/// Turn a router outcome into the action the event loop has to run
pub(crate) fn apply_outcome(state: &mut AppState, outcome: NavOutcome) -> UpdateResult {
    match outcome {
        NavOutcome::Ignored => UpdateResult::none(),
        NavOutcome::Fetch(request) => {
            state.reset_view();
            UpdateResult::action(UpdateAction::FetchFragment {
                generation: request.generation,
                target: request.target,
                path: request.path,
            })
        }
        NavOutcome::Close(close) => {
            state.reset_view();
            UpdateResult::action(UpdateAction::CompleteClose {
                generation: close.generation,
                after: close.duration,
            })
        }
    }
}

pub(crate) fn handle_fragment_loaded(
    state: &mut AppState,
    generation: u64,
    target: NavTarget,
    result: std::result::Result<String, FetchFailure>,
) -> UpdateResult {
    let target = match state.router.on_fragment_loaded(generation, target, result) {
        LoadOutcome::Rendered(target) => target,
        LoadOutcome::Stale | LoadOutcome::Failed(_) => return UpdateResult::none(),
    };

    let ctx = RenderContext {
        generation,
        target,
        region: state.router.shell_mut().ensure_structure(),
    };

    state.feature = state.hooks.run(&ctx);
    let path = state.feature.as_mut().and_then(|feature| feature.start());

    match path {
        Some(path) => UpdateResult::action(UpdateAction::FetchFeatureData { generation, path }),
        None => UpdateResult::none(),
    }
}

pub(crate) fn handle_close_finished(state: &mut AppState, generation: u64) -> UpdateResult {
    if state.router.on_close_finished(generation) {
        state.reset_view();
    }
    UpdateResult::none()
}

pub(crate) fn handle_feature_data(
    state: &mut AppState,
    generation: u64,
    path: String,
    result: std::result::Result<serde_json::Value, FetchFailure>,
) -> UpdateResult {
    match state.feature.as_mut() {
        Some(feature) if feature.generation() == generation => {
            feature.apply(&path, result);
        }
        _ => {
            debug!(
                "Dropping stale feature data for {} (generation {})",
                path, generation
            );
        }
    }
    UpdateResult::none()
}

/// Issue a feature data request for `path`, if any
pub(crate) fn feature_request(state: &AppState, path: Option<String>) -> UpdateResult {
    match (path, state.feature.as_ref()) {
        (Some(path), Some(feature)) => UpdateResult::action(UpdateAction::FetchFeatureData {
            generation: feature.generation(),
            path,
        }),
        _ => UpdateResult::none(),
    }
}
