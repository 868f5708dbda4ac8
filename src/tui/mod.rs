//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Redraw Strategy
//!
//! The event loop uses conditional redraw to avoid unnecessary work:
//!
//! - **Animating** (directory load, resolution in flight): draws every ~80ms
//!   for a smooth spinner.
//! - **Idle**: sleeps up to 500ms, only redraws on events or terminal resize.
//!
//! ## Background work
//!
//! All network activity happens on spawned tokio tasks that report back as
//! Actions over an mpsc channel. Resolution tasks are tagged with the
//! generation they were spawned for; the reducer discards results whose tag
//! no longer matches the current selection. Superseded runs are not aborted,
//! their results just land in the void.

mod event;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use ratatui::widgets::ListState;

use crate::api::{CountryProvider, RestCountriesClient};
use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::resolver::{self, ResolutionUpdate};
use crate::core::state::App;
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

const PAGE_JUMP: isize = 10;

/// TUI-specific presentation state (not part of core business logic).
///
/// The highlight cursor is presentation only: moving it fires no network
/// activity. Only Enter commits a selection.
pub struct TuiState {
    pub cursor: usize,
    pub list_state: ListState,
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            cursor: 0,
            list_state: ListState::default(),
        }
    }

    /// Moves the highlight cursor by `delta`, clamped to the directory.
    pub fn move_cursor(&mut self, delta: isize, directory_len: usize) {
        if directory_len == 0 {
            self.list_state.select(None);
            return;
        }
        let max = directory_len as isize - 1;
        self.cursor = (self.cursor as isize + delta).clamp(0, max) as usize;
        self.list_state.select(Some(self.cursor));
    }
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Mouse capture lets scroll wheel events move the list cursor
        execute!(stdout(), EnableMouseCapture)?;
        info!("Terminal modes enabled (mouse capture)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableMouseCapture);
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let provider: Arc<dyn CountryProvider> =
        Arc::new(RestCountriesClient::new(Some(config.base_url)));
    let mut app = App::new();
    let mut tui = TuiState::new();

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();

    spawn_directory_load(provider.clone(), tx.clone());

    // Animation timer
    let start_time = std::time::Instant::now();
    let mut needs_redraw = true; // Force first frame

    loop {
        let directory_loading = app.directory.is_empty() && app.directory_error.is_none();
        let animating = app.is_resolving() || directory_loading;

        if animating {
            needs_redraw = true;
        }

        // Only draw when something changed
        if needs_redraw {
            let elapsed = start_time.elapsed().as_secs_f32();
            let spinner_frame = (elapsed * 12.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, spinner_frame))?;
            needs_redraw = false;
        }

        // Dynamic poll timeout: short when animating (~12fps), long when idle
        let timeout = if animating {
            std::time::Duration::from_millis(80)
        } else {
            std::time::Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);

        // Process first event + drain ALL pending events before next draw
        let mut should_quit = false;
        if first_event.is_some() {
            needs_redraw = true;
        }
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            match event {
                // Resize just needs a redraw (already flagged above)
                TuiEvent::Resize => {}

                TuiEvent::Quit => {
                    if update(&mut app, Action::Quit) == Effect::Quit {
                        should_quit = true;
                    }
                }

                TuiEvent::CursorUp => tui.move_cursor(-1, app.directory.len()),
                TuiEvent::CursorDown => tui.move_cursor(1, app.directory.len()),
                TuiEvent::PageUp => tui.move_cursor(-PAGE_JUMP, app.directory.len()),
                TuiEvent::PageDown => tui.move_cursor(PAGE_JUMP, app.directory.len()),

                TuiEvent::Submit => {
                    // With an empty directory there is nothing to commit, so
                    // a failed directory load makes resolution unreachable.
                    if let Some(country) = app.directory.get(tui.cursor) {
                        let code = country.code.clone();
                        let effect = update(&mut app, Action::Select(Some(code)));
                        handle_effect(effect, &provider, &tx, &mut should_quit);
                    }
                }

                TuiEvent::Escape => {
                    let effect = update(&mut app, Action::Select(None));
                    handle_effect(effect, &provider, &tx, &mut should_quit);
                }
            }
        }

        if should_quit {
            break;
        }

        // Handle background task actions (directory load, resolution runs)
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {action:?}");
            let effect = update(&mut app, action);
            handle_effect(effect, &provider, &tx, &mut should_quit);
        }

        if should_quit {
            break;
        }
    }

    ratatui::restore();
    Ok(())
}

fn handle_effect(
    effect: Effect,
    provider: &Arc<dyn CountryProvider>,
    tx: &mpsc::Sender<Action>,
    should_quit: &mut bool,
) {
    match effect {
        Effect::None => {}
        Effect::Quit => *should_quit = true,
        Effect::Resolve { code, generation } => {
            spawn_resolution(provider.clone(), code, generation, tx.clone());
        }
    }
}

fn spawn_directory_load(provider: Arc<dyn CountryProvider>, tx: mpsc::Sender<Action>) {
    info!("Spawning directory load");
    tokio::spawn(async move {
        let action = match provider.fetch_directory().await {
            Ok(countries) => {
                info!("Directory loaded: {} countries", countries.len());
                Action::DirectoryLoaded(countries)
            }
            Err(e) => Action::DirectoryFailed(e.to_string()),
        };
        if tx.send(action).is_err() {
            warn!("Failed to send directory action: receiver dropped");
        }
    });
}

fn spawn_resolution(
    provider: Arc<dyn CountryProvider>,
    code: String,
    generation: u64,
    tx: mpsc::Sender<Action>,
) {
    info!("Spawning resolution for {code} (generation {generation})");

    // Async channel for progress updates from the resolver
    let (update_tx, mut update_rx) = tokio::sync::mpsc::channel::<ResolutionUpdate>(8);

    // Clone tx for the resolver task
    let tx_resolve = tx.clone();

    // Spawn the resolver pipeline task
    tokio::spawn(async move {
        if let Err(e) = resolver::resolve_country(provider.as_ref(), &code, update_tx).await {
            info!("Resolution for {code} failed: {e}");
            if tx_resolve
                .send(Action::ResolutionFailed {
                    generation,
                    error: e.to_string(),
                })
                .is_err()
            {
                warn!("Failed to send resolution failure: receiver dropped");
            }
        }
    });

    // Spawn a task to forward progress updates to the Action channel,
    // stamping each with this run's generation
    tokio::spawn(async move {
        while let Some(update) = update_rx.recv().await {
            let action = match update {
                ResolutionUpdate::DetailFetched => Action::DetailFetched { generation },
                ResolutionUpdate::Resolved(view) => {
                    Action::ResolutionCompleted { generation, view }
                }
            };
            if tx.send(action).is_err() {
                warn!("Failed to forward resolution update: receiver dropped");
                return;
            }
        }
    });
}
