//! TUI Application module

mod async_ops;
mod events;
mod state;
mod ui;

pub use state::AppState;
pub use state::Screen;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use std::io::stdout;
use std::time::Duration;
use tokio::runtime::Runtime;

use crate::auth::SettingsStore;
use crate::config::Config;
use crate::session::{SignInEvent, Session};

use async_ops::{AsyncCommand, AsyncHandle, AsyncResult, Failure, Request, spawn_worker};
use state::{Dialog, DialogAction};

/// Run the TUI application
pub fn run() -> Result<()> {
    let rt = Runtime::new()?;

    let config = Config::load()?;
    let store = SettingsStore::open()?;
    let session = Session::restore(&store)?;

    let async_handle = rt.block_on(async { spawn_worker(config.clone(), store) });

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let mut state = AppState::new(config, session.state().is_signed_in());
    state.sign_in = session.state().clone();
    if state.screen == Screen::Home {
        let _ = async_handle.cmd_tx.blocking_send(AsyncCommand::LoadProfile);
        state.loading = true;
        state.set_status("Loading account...");
    }

    let result = run_app(&mut terminal, &mut state, async_handle);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    state: &mut AppState,
    mut async_handle: AsyncHandle,
) -> Result<()> {
    loop {
        // Process any async results
        while let Ok(result) = async_handle.result_rx.try_recv() {
            if let Some(cmd) = handle_async_result(state, result) {
                let _ = async_handle.cmd_tx.blocking_send(cmd);
            }
        }

        terminal.draw(|frame| ui::render(frame, state))?;

        if event::poll(Duration::from_millis(50))?
            && let Event::Key(key) = event::read()?
            && let Some(cmd) = events::handle_key(state, key)
        {
            let _ = async_handle.cmd_tx.blocking_send(cmd);
        }

        // Tick for animations
        state.tick();

        if state.should_quit {
            let _ = async_handle.cmd_tx.blocking_send(AsyncCommand::Shutdown);
            break;
        }
    }

    // Save config on exit
    state.config.save().context("Failed to save settings")?;

    Ok(())
}

const SIGN_OUT_MESSAGE: &str =
    "We might have to sign you out...\n\nIf this persists, please contact us on GitHub.";

fn handle_async_result(state: &mut AppState, result: AsyncResult) -> Option<AsyncCommand> {
    match result {
        AsyncResult::DeviceCode(code) => {
            state.set_status(format!("Enter {} at {}", code.user_code, code.verification_uri));
            state.set_device_code(code);
            None
        }
        AsyncResult::SignedIn(token) => {
            state.advance_sign_in(SignInEvent::Granted(token));
            state.sign_in_qr.clear();
            state.screen = Screen::Home;
            state.set_status("✓ Signed in");
            state.loading = true;
            Some(AsyncCommand::LoadProfile)
        }
        AsyncResult::SignInFailed { message } => {
            state.advance_sign_in(SignInEvent::Failed(message.clone()));
            state.sign_in_qr.clear();
            state.loading = false;
            state.clear_status();
            state.show_dialog(Dialog::new("Uh oh...", message, DialogAction::Close));
            None
        }
        AsyncResult::Profile(profile) => {
            state.set_profile(profile);
            state.loading = false;
            state.clear_status();
            None
        }
        AsyncResult::Notifications(list) => {
            let unread = crate::models::Notification::unread_count(&list);
            state.set_notifications(list);
            state.loading = false;
            state.set_status(format!("{unread} Unread"));
            None
        }
        AsyncResult::MarkedRead { id } => {
            if let Some(n) = state.notifications.iter_mut().find(|n| n.id == id) {
                n.unread = false;
            }
            state.set_status("✓ Marked as read");
            None
        }
        AsyncResult::Repos(repos) => {
            state.set_repos(repos);
            state.loading = false;
            state.clear_status();
            None
        }
        AsyncResult::Repo { repo, events } => {
            // answers for a repository the user already left are dropped
            if state.is_pending_repo(&repo.full_name) {
                state.set_repo(repo, events);
                state.loading = false;
            } else {
                tracing::debug!("Dropping stale detail for {}", repo.full_name);
            }
            None
        }
        AsyncResult::SignedOut => {
            state.reset_account();
            state.set_status("Signed out");
            None
        }
        AsyncResult::Failed { request, failure } => {
            handle_failure(state, request, failure);
            None
        }
    }
}

fn handle_failure(state: &mut AppState, request: Request, failure: Failure) {
    state.loading = false;
    state.clear_status();

    let dialog = match (&failure, request) {
        (Failure::Unauthorized(detail), _) => {
            state.reset_account();
            Dialog::new(
                "Uh oh...",
                format!("{SIGN_OUT_MESSAGE}\n\n{detail}"),
                DialogAction::SignIn,
            )
        }
        (_, Request::MarkRead) => Dialog::new(
            "Error",
            "Failed to mark notification as read. Please try again.",
            DialogAction::Close,
        ),
        (Failure::Offline(_), Request::Profile) => Dialog::new(
            "Unable to Connect",
            "Cannot load account. Check your connection and try again.",
            DialogAction::Close,
        ),
        (Failure::Other(detail), Request::Profile) => {
            Dialog::new("Cannot load account", detail.clone(), DialogAction::Close)
        }
        (Failure::Offline(detail), _) => {
            Dialog::new("Unable to Connect", detail.clone(), DialogAction::Back)
        }
        (Failure::Other(detail), _) => Dialog::new("Uh oh...", detail.clone(), DialogAction::Back),
    };
    state.show_dialog(dialog);
}
