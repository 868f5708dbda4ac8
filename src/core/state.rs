//! # Application State
//!
//! Core business state for Atlas. This module contains domain logic only -
//! no TUI-specific types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── directory: Vec<CountrySummary>  // selectable country list
//! ├── directory_error: Option<String> // directory load failed
//! ├── selected: Option<String>        // committed country code
//! ├── resolution: Resolution          // detail pipeline state machine
//! ├── generation: u64                 // selection version counter
//! └── status_message: String          // status bar text
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.
//! This keeps things predictable, so no surprise mutations.

use crate::api::types::CountrySummary;

/// Display-ready detail for one country, border codes already replaced by
/// their resolved names. Rebuilt from scratch on every resolution; the
/// reducer swaps it in atomically, never edits it in place.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryViewModel {
    pub name: String,
    pub capital: String,
    pub population: u64,
    /// Resolved border-country names, in the order the detail record listed
    /// their codes.
    pub border_names: Vec<String>,
}

/// State machine for one detail-resolution run.
///
/// `Idle → FetchingDetail → FetchingBorders → Resolved`, or `Failed` from
/// either fetching state. Clearing the selection returns to `Idle`
/// immediately. A view model only ever lives inside `Resolved`, so clearing
/// or failing a run also drops any previously displayed detail.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Idle,
    FetchingDetail,
    FetchingBorders,
    Resolved(CountryViewModel),
    Failed,
}

pub struct App {
    pub directory: Vec<CountrySummary>,
    pub directory_error: Option<String>,
    pub selected: Option<String>,
    pub resolution: Resolution,
    /// Bumped on every `Select`. Resolution results carry the generation they
    /// were spawned with; stale ones are discarded instead of overwriting a
    /// newer selection's state.
    pub generation: u64,
    pub status_message: String,
}

impl App {
    pub fn new() -> Self {
        Self {
            directory: Vec::new(),
            directory_error: None,
            selected: None,
            resolution: Resolution::Idle,
            generation: 0,
            status_message: String::from("Loading country list..."),
        }
    }

    /// The currently displayed detail, present only when the active
    /// selection's resolution completed successfully.
    pub fn view_model(&self) -> Option<&CountryViewModel> {
        match &self.resolution {
            Resolution::Resolved(view) => Some(view),
            _ => None,
        }
    }

    pub fn is_resolving(&self) -> bool {
        matches!(
            self.resolution,
            Resolution::FetchingDetail | Resolution::FetchingBorders
        )
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
