//! Event handling

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::async_ops::AsyncCommand;
use super::state::{AppState, Mode, Screen, SettingsRow};
use crate::session::{SignInEvent, SignInState};
use crate::theme::Theme;

/// Handle key events, returning an optional async command
pub fn handle_key(state: &mut AppState, key: KeyEvent) -> Option<AsyncCommand> {
    if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return None;
    }

    // A dialog swallows everything until dismissed
    if state.dialog.is_some() {
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
            state.dismiss_dialog();
        }
        return None;
    }

    match state.mode {
        Mode::ThemePicker => {
            handle_theme_picker_key(state, key);
            return None;
        }
        Mode::Help => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Enter) {
                state.mode = Mode::Normal;
            }
            return None;
        }
        Mode::Normal => {}
    }

    match key.code {
        KeyCode::Char('q') => {
            state.should_quit = true;
            return None;
        }
        KeyCode::Char('?') | KeyCode::F(1) => {
            state.mode = Mode::Help;
            return None;
        }
        _ => {}
    }

    if state.screen == Screen::SignIn {
        return handle_sign_in_key(state, key);
    }

    // Tab navigation once signed in
    match (key.modifiers, key.code) {
        (_, KeyCode::Tab) => {
            let screen = state.cycle_tab(true);
            return enter_screen(state, screen);
        }
        (_, KeyCode::BackTab) => {
            let screen = state.cycle_tab(false);
            return enter_screen(state, screen);
        }
        (_, KeyCode::Char(c @ '1'..='4')) => {
            let screen = Screen::TABS[c as usize - '1' as usize];
            state.screen = screen;
            return enter_screen(state, screen);
        }
        _ => {}
    }

    match state.screen {
        Screen::SignIn => None,
        Screen::Home => handle_home_key(state, key),
        Screen::Notifications => handle_notifications_key(state, key),
        Screen::Repos => handle_repos_key(state, key),
        Screen::RepoDetail => handle_repo_detail_key(state, key),
        Screen::Settings => handle_settings_key(state, key),
    }
}

/// Load what a freshly entered screen shows
pub fn enter_screen(state: &mut AppState, screen: Screen) -> Option<AsyncCommand> {
    state.clear_status();
    let cmd = match screen {
        Screen::Home if state.profile.is_none() => Some(AsyncCommand::LoadProfile),
        Screen::Notifications => Some(AsyncCommand::LoadNotifications),
        Screen::Repos if state.repos.is_empty() => Some(AsyncCommand::LoadRepos),
        _ => None,
    };
    if cmd.is_some() {
        state.loading = true;
    }
    cmd
}

fn handle_sign_in_key(state: &mut AppState, key: KeyEvent) -> Option<AsyncCommand> {
    match key.code {
        KeyCode::Enter => match state.sign_in {
            SignInState::SignedOut | SignInState::Failed { .. } => {
                state.advance_sign_in(SignInEvent::Begin);
                state.loading = true;
                state.set_status("Requesting sign-in code...");
                Some(AsyncCommand::SignIn)
            }
            _ => None,
        },
        KeyCode::Char('o') => {
            if let SignInState::AwaitingAuthorization { code } = &state.sign_in {
                let url = code.verification_uri.clone();
                if open::that(&url).is_ok() {
                    state.set_status("✓ Opened in browser");
                } else {
                    state.set_status(format!("Open {url} in a browser"));
                }
            }
            None
        }
        KeyCode::Esc if state.sign_in.is_in_progress() => {
            state.sign_in = SignInState::SignedOut;
            state.sign_in_qr.clear();
            state.loading = false;
            state.set_status("Sign-in cancelled");
            Some(AsyncCommand::CancelSignIn)
        }
        _ => None,
    }
}

fn handle_home_key(state: &mut AppState, key: KeyEvent) -> Option<AsyncCommand> {
    match key.code {
        KeyCode::Enter | KeyCode::Char('s') => {
            state.show_profile_qr = !state.show_profile_qr;
            None
        }
        KeyCode::Char('o') => {
            if let Some(profile) = &state.profile {
                let _ = open::that(&profile.profile_url);
                state.set_status("✓ Opened in browser");
            }
            None
        }
        KeyCode::Char('r') => {
            state.loading = true;
            Some(AsyncCommand::LoadProfile)
        }
        _ => None,
    }
}

fn handle_notifications_key(state: &mut AppState, key: KeyEvent) -> Option<AsyncCommand> {
    match key.code {
        KeyCode::Down | KeyCode::Char('j') => {
            state.move_selection(true);
            None
        }
        KeyCode::Up | KeyCode::Char('k') => {
            state.move_selection(false);
            None
        }
        KeyCode::Char('m') => {
            let id = state.selected_notification()?.id.clone();
            state.loading = true;
            state.set_status("Marking as read...");
            Some(AsyncCommand::MarkRead { id })
        }
        KeyCode::Char('o') => {
            if let Some(n) = state.selected_notification() {
                let _ = open::that(n.repository_url());
                state.set_status("✓ Opened in browser");
            }
            None
        }
        KeyCode::Char('r') => {
            state.loading = true;
            Some(AsyncCommand::LoadNotifications)
        }
        KeyCode::Esc => {
            state.clear_status();
            None
        }
        _ => None,
    }
}

fn handle_repos_key(state: &mut AppState, key: KeyEvent) -> Option<AsyncCommand> {
    match key.code {
        KeyCode::Down | KeyCode::Char('j') => {
            state.move_selection(true);
            None
        }
        KeyCode::Up | KeyCode::Char('k') => {
            state.move_selection(false);
            None
        }
        KeyCode::Char('g') => {
            state.selected_repo = 0;
            None
        }
        KeyCode::Char('G') => {
            state.selected_repo = state.repos.len().saturating_sub(1);
            None
        }
        KeyCode::Enter => {
            let full_name = state.selected_repo()?.full_name.clone();
            state.close_repo();
            state.screen = Screen::RepoDetail;
            state.request_repo(&full_name);
            Some(AsyncCommand::LoadRepo { full_name })
        }
        KeyCode::Char('o') => {
            if let Some(repo) = state.selected_repo() {
                let _ = open::that(&repo.html_url);
                state.set_status("✓ Opened in browser");
            }
            None
        }
        KeyCode::Char('r') => {
            state.loading = true;
            Some(AsyncCommand::LoadRepos)
        }
        _ => None,
    }
}

fn handle_repo_detail_key(state: &mut AppState, key: KeyEvent) -> Option<AsyncCommand> {
    match key.code {
        KeyCode::Down | KeyCode::Char('j') => {
            state.move_selection(true);
            None
        }
        KeyCode::Up | KeyCode::Char('k') => {
            state.move_selection(false);
            None
        }
        KeyCode::Enter | KeyCode::Char(' ') => {
            state.toggle_selected_event();
            None
        }
        KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('h') => {
            state.close_repo();
            state.loading = false;
            state.screen = Screen::Repos;
            None
        }
        KeyCode::Char('o') => {
            if let Some(repo) = &state.repo {
                let _ = open::that(&repo.html_url);
                state.set_status("✓ Opened in browser");
            }
            None
        }
        KeyCode::Char('r') => {
            let full_name = state.repo.as_ref()?.full_name.clone();
            state.request_repo(&full_name);
            Some(AsyncCommand::LoadRepo { full_name })
        }
        _ => None,
    }
}

fn handle_settings_key(state: &mut AppState, key: KeyEvent) -> Option<AsyncCommand> {
    match key.code {
        KeyCode::Down | KeyCode::Char('j') => {
            state.move_selection(true);
            None
        }
        KeyCode::Up | KeyCode::Char('k') => {
            state.move_selection(false);
            None
        }
        KeyCode::Left | KeyCode::Char('h') if on_accent_row(state) => {
            state.cycle_accent(false);
            None
        }
        KeyCode::Right | KeyCode::Char('l') if on_accent_row(state) => {
            state.cycle_accent(true);
            None
        }
        KeyCode::Enter => match state.current_settings_row() {
            SettingsRow::Accent => {
                state.cycle_accent(true);
                None
            }
            SettingsRow::Theme => {
                open_theme_picker(state);
                None
            }
            SettingsRow::SignOut => {
                state.set_status("Signing out...");
                Some(AsyncCommand::SignOut)
            }
        },
        KeyCode::Char('t') => {
            open_theme_picker(state);
            None
        }
        _ => None,
    }
}

fn on_accent_row(state: &AppState) -> bool {
    state.current_settings_row() == SettingsRow::Accent
}

fn open_theme_picker(state: &mut AppState) {
    state.theme_picker_index = Theme::all()
        .iter()
        .position(|t| *t == state.theme.inner())
        .unwrap_or(0);
    state.mode = Mode::ThemePicker;
}

fn handle_theme_picker_key(state: &mut AppState, key: KeyEvent) {
    let themes = Theme::all();
    let len = themes.len();

    match key.code {
        KeyCode::Esc => {
            // Cancel - restore configured theme
            state.theme = state.config.theme;
            state.mode = Mode::Normal;
        }
        KeyCode::Enter => {
            let selected_theme = Theme::from(themes[state.theme_picker_index]);
            state.theme = selected_theme;
            state.config.theme = selected_theme;

            state.mode = Mode::Normal;
            state.set_status(format!("✓ Theme set to {}", selected_theme.name()));
        }
        KeyCode::Down | KeyCode::Char('j') => {
            state.theme_picker_index = (state.theme_picker_index + 1) % len;
            // Preview theme
            state.theme = Theme::from(themes[state.theme_picker_index]);
        }
        KeyCode::Up | KeyCode::Char('k') => {
            state.theme_picker_index = state.theme_picker_index.checked_sub(1).unwrap_or(len - 1);
            state.theme = Theme::from(themes[state.theme_picker_index]);
        }
        KeyCode::Home | KeyCode::Char('g') => {
            state.theme_picker_index = 0;
            state.theme = Theme::from(themes[state.theme_picker_index]);
        }
        KeyCode::End | KeyCode::Char('G') => {
            state.theme_picker_index = len - 1;
            state.theme = Theme::from(themes[state.theme_picker_index]);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::state::{Dialog, DialogAction};
    use crate::config::Config;
    use crate::models::Notification;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn notification(id: &str) -> Notification {
        let json = format!(
            r#"{{"id":"{id}","unread":true,"reason":"mention","updated_at":"2024-03-01T12:30:05Z",
                "subject":{{"title":"t","type":"Issue"}},"repository":{{"full_name":"o/r"}}}}"#
        );
        serde_json::from_str::<crate::api::types::NotificationThread>(&json)
            .unwrap()
            .into()
    }

    #[test]
    fn test_enter_starts_sign_in_once() {
        let mut state = AppState::new(Config::default(), false);
        assert!(matches!(
            handle_key(&mut state, press(KeyCode::Enter)),
            Some(AsyncCommand::SignIn)
        ));
        assert_eq!(state.sign_in, SignInState::RequestingCode);
        assert!(handle_key(&mut state, press(KeyCode::Enter)).is_none());

        assert!(matches!(
            handle_key(&mut state, press(KeyCode::Esc)),
            Some(AsyncCommand::CancelSignIn)
        ));
        assert_eq!(state.sign_in, SignInState::SignedOut);
    }

    #[test]
    fn test_tabs_are_locked_while_signed_out() {
        let mut state = AppState::new(Config::default(), false);
        assert!(handle_key(&mut state, press(KeyCode::Tab)).is_none());
        assert_eq!(state.screen, Screen::SignIn);
    }

    #[test]
    fn test_mark_read_sends_selected_id() {
        let mut state = AppState::new(Config::default(), true);
        state.screen = Screen::Notifications;
        state.set_notifications(vec![notification("1"), notification("2")]);

        handle_key(&mut state, press(KeyCode::Char('j')));
        match handle_key(&mut state, press(KeyCode::Char('m'))) {
            Some(AsyncCommand::MarkRead { id }) => assert_eq!(id, "2"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_mark_read_on_empty_list() {
        let mut state = AppState::new(Config::default(), true);
        state.screen = Screen::Notifications;
        assert!(handle_key(&mut state, press(KeyCode::Char('m'))).is_none());
    }

    #[test]
    fn test_dialog_swallows_keys() {
        let mut state = AppState::new(Config::default(), true);
        state.show_dialog(Dialog::new("Error", "nope", DialogAction::Close));
        assert!(handle_key(&mut state, press(KeyCode::Char('q'))).is_none());
        assert!(!state.should_quit);
        handle_key(&mut state, press(KeyCode::Enter));
        assert!(state.dialog.is_none());
    }

    #[test]
    fn test_tab_entering_notifications_loads_them() {
        let mut state = AppState::new(Config::default(), true);
        assert!(matches!(
            handle_key(&mut state, press(KeyCode::Tab)),
            Some(AsyncCommand::LoadNotifications)
        ));
        assert_eq!(state.screen, Screen::Notifications);
        assert!(state.loading);
    }

    #[test]
    fn test_settings_sign_out_row() {
        let mut state = AppState::new(Config::default(), true);
        state.screen = Screen::Settings;
        handle_key(&mut state, press(KeyCode::Down));
        handle_key(&mut state, press(KeyCode::Down));
        assert_eq!(state.current_settings_row(), SettingsRow::SignOut);
        assert!(matches!(
            handle_key(&mut state, press(KeyCode::Enter)),
            Some(AsyncCommand::SignOut)
        ));
    }

    #[test]
    fn test_theme_picker_escape_restores_theme() {
        let mut state = AppState::new(Config::default(), true);
        state.screen = Screen::Settings;
        let original = state.theme;
        handle_key(&mut state, press(KeyCode::Char('t')));
        assert_eq!(state.mode, Mode::ThemePicker);
        handle_key(&mut state, press(KeyCode::Down));
        assert_ne!(state.theme, original);
        handle_key(&mut state, press(KeyCode::Esc));
        assert_eq!(state.theme, original);
        assert_eq!(state.mode, Mode::Normal);
    }
}
