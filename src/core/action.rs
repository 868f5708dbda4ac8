//! # Actions
//!
//! Everything that can happen in Atlas becomes an `Action`.
//! User presses Enter on a list row? That's `Action::Select`.
//! A background fetch finishes? That's `Action::ResolutionCompleted`.
//!
//! The `update()` function takes the current state and an action,
//! then returns the new state plus an `Effect` describing I/O the caller
//! should perform. No side effects here. Network happens elsewhere.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! This makes everything testable: feed actions, assert on state.

use log::{debug, warn};

use crate::api::types::CountrySummary;
use crate::core::state::{App, CountryViewModel, Resolution};

#[derive(Debug)]
pub enum Action {
    /// The startup directory fetch succeeded.
    DirectoryLoaded(Vec<CountrySummary>),
    /// The startup directory fetch failed. Carries the error for the log.
    DirectoryFailed(String),
    /// The committed selection changed. `None` clears it.
    Select(Option<String>),
    /// A resolution run finished its first fetch and is now fanning out to
    /// border countries.
    DetailFetched { generation: u64 },
    /// A resolution run produced a complete view model.
    ResolutionCompleted {
        generation: u64,
        view: CountryViewModel,
    },
    /// A resolution run failed at some fetch step.
    ResolutionFailed { generation: u64, error: String },
    Quit,
}

/// I/O the event loop must perform after a state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    Quit,
    /// Spawn a detail-resolution run for `code`, tagged with `generation`.
    Resolve { code: String, generation: u64 },
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::DirectoryLoaded(countries) => {
            app.status_message = format!("{} countries", countries.len());
            app.directory = countries;
            app.directory_error = None;
            Effect::None
        }

        Action::DirectoryFailed(error) => {
            warn!("Directory load failed: {error}");
            app.directory.clear();
            app.directory_error = Some(error);
            app.status_message = String::from("Country list unavailable");
            Effect::None
        }

        Action::Select(code) => {
            // Every selection change starts a new generation; results from
            // superseded runs no longer match and get dropped on arrival.
            app.generation += 1;
            app.selected = code.clone();
            match code {
                None => {
                    app.resolution = Resolution::Idle;
                    Effect::None
                }
                Some(code) => {
                    app.resolution = Resolution::FetchingDetail;
                    Effect::Resolve {
                        code,
                        generation: app.generation,
                    }
                }
            }
        }

        Action::DetailFetched { generation } => {
            if generation == app.generation
                && app.resolution == Resolution::FetchingDetail
            {
                app.resolution = Resolution::FetchingBorders;
            }
            Effect::None
        }

        Action::ResolutionCompleted { generation, view } => {
            if generation != app.generation {
                debug!(
                    "Discarding stale resolution result (generation {generation}, current {})",
                    app.generation
                );
                return Effect::None;
            }
            app.resolution = Resolution::Resolved(view);
            Effect::None
        }

        Action::ResolutionFailed { generation, error } => {
            if generation != app.generation {
                debug!(
                    "Discarding stale resolution failure (generation {generation}, current {})",
                    app.generation
                );
                return Effect::None;
            }
            warn!("Resolution failed: {error}");
            app.resolution = Resolution::Failed;
            Effect::None
        }

        Action::Quit => Effect::Quit,
    }
}
