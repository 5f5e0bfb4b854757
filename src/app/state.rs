//! Application state

use std::collections::HashSet;

use crate::api::DeviceCode;
use crate::config::Config;
use crate::models::{Notification, Profile, RepoEvent, Repository};
use crate::qr;
use crate::session::{SignInEvent, SignInState};
use crate::theme::{Accent, Theme, ThemeColors};

/// Top-level screens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    /// Device-flow sign in
    #[default]
    SignIn,
    /// Profile statistics
    Home,
    /// Notification inbox
    Notifications,
    /// Repository list
    Repos,
    /// One repository and its events
    RepoDetail,
    /// Accent, theme and sign out
    Settings,
}

impl Screen {
    /// Screens reachable with Tab once signed in
    pub const TABS: [Self; 4] = [Self::Home, Self::Notifications, Self::Repos, Self::Settings];

    /// Tab this screen belongs to
    pub fn tab_index(self) -> Option<usize> {
        match self {
            Self::RepoDetail => Some(2),
            other => Self::TABS.iter().position(|s| *s == other),
        }
    }

    /// Label shown in the tab bar
    pub fn title(self) -> &'static str {
        match self {
            Self::SignIn => "Sign in",
            Self::Home => "Home",
            Self::Notifications => "Notifications",
            Self::Repos | Self::RepoDetail => "Repos",
            Self::Settings => "Settings",
        }
    }
}

/// Overlay mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// No overlay
    #[default]
    Normal,
    /// Key binding help
    Help,
    /// Theme list with live preview
    ThemePicker,
}

/// What happens when a dialog is dismissed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogAction {
    /// Just close it
    Close,
    /// Go to the sign-in screen
    SignIn,
    /// Leave the screen that failed to load
    Back,
}

/// Single-button modal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialog {
    /// Heading in the border
    pub title: String,
    /// Body text, wrapped to the dialog width
    pub message: String,
    /// What dismissing it does
    pub on_dismiss: DialogAction,
}

impl Dialog {
    /// Build a dialog
    pub fn new(
        title: impl Into<String>,
        message: impl Into<String>,
        on_dismiss: DialogAction,
    ) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            on_dismiss,
        }
    }
}

/// Rows of the settings screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsRow {
    /// Accent swatches
    Accent,
    /// Theme picker
    Theme,
    /// Sign out button
    SignOut,
}

impl SettingsRow {
    /// Rows in display order
    pub const ALL: [Self; 3] = [Self::Accent, Self::Theme, Self::SignOut];
}

/// Application state
pub struct AppState {
    /// Configuration
    pub config: Config,
    /// Whether to quit
    pub should_quit: bool,
    /// Current theme
    pub theme: Theme,
    /// Current accent color
    pub accent: Accent,
    /// Visible screen
    pub screen: Screen,
    /// Overlay mode
    pub mode: Mode,
    /// Modal dialog, drawn above everything
    pub dialog: Option<Dialog>,

    /// Device-flow progress
    pub sign_in: SignInState,
    /// QR of the verification URL
    pub sign_in_qr: Vec<String>,

    /// Signed-in user's profile
    pub profile: Option<Profile>,
    /// QR of the profile URL
    pub profile_qr: Vec<String>,
    /// Show the profile QR instead of the stats
    pub show_profile_qr: bool,

    /// Notification inbox
    pub notifications: Vec<Notification>,
    /// Selected notification index
    pub selected_notification: usize,

    /// Repositories, most recently updated first
    pub repos: Vec<Repository>,
    /// Selected repository index
    pub selected_repo: usize,

    /// Repository on the detail screen
    pub repo: Option<Repository>,
    /// `owner/name` of the detail request in flight
    pub pending_repo: Option<String>,
    /// Its recent events
    pub events: Vec<RepoEvent>,
    /// Selected event index
    pub selected_event: usize,
    /// Ids of expanded events
    pub expanded_events: HashSet<String>,

    /// Selected settings row
    pub settings_row: usize,
    /// Theme picker cursor
    pub theme_picker_index: usize,

    /// Status message (bottom bar)
    pub status: String,
    /// Is loading?
    pub loading: bool,

    /// Tick counter for animations
    tick: u64,
}

impl AppState {
    /// Create a new app state
    pub fn new(config: Config, signed_in: bool) -> Self {
        let theme = config.theme;
        let accent = config.accent_color;

        Self {
            config,
            should_quit: false,
            theme,
            accent,
            screen: if signed_in { Screen::Home } else { Screen::SignIn },
            mode: Mode::Normal,
            dialog: None,
            sign_in: SignInState::SignedOut,
            sign_in_qr: Vec::new(),
            profile: None,
            profile_qr: Vec::new(),
            show_profile_qr: false,
            notifications: Vec::new(),
            selected_notification: 0,
            repos: Vec::new(),
            selected_repo: 0,
            repo: None,
            pending_repo: None,
            events: Vec::new(),
            selected_event: 0,
            expanded_events: HashSet::new(),
            settings_row: 0,
            theme_picker_index: 0,
            status: String::new(),
            loading: false,
            tick: 0,
        }
    }

    /// Colors for the current theme and accent
    pub fn colors(&self) -> ThemeColors {
        self.theme.colors(self.accent)
    }

    /// Tick for animations
    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    /// Get current tick
    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Set status message
    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status = msg.into();
    }

    /// Clear status message
    pub fn clear_status(&mut self) {
        self.status.clear();
    }

    /// Show a modal dialog
    pub fn show_dialog(&mut self, dialog: Dialog) {
        self.loading = false;
        self.dialog = Some(dialog);
    }

    /// Close the dialog and run its action
    pub fn dismiss_dialog(&mut self) {
        let Some(dialog) = self.dialog.take() else {
            return;
        };
        match dialog.on_dismiss {
            DialogAction::Close => {}
            DialogAction::SignIn => self.screen = Screen::SignIn,
            DialogAction::Back => {
                self.screen = match self.screen {
                    Screen::RepoDetail => Screen::Repos,
                    Screen::SignIn => Screen::SignIn,
                    _ => Screen::Home,
                };
            }
        }
    }

    /// Feed an event into the sign-in state machine
    pub fn advance_sign_in(&mut self, event: SignInEvent) {
        match self.sign_in.next(event.clone()) {
            Some(next) => self.sign_in = next,
            None => tracing::debug!("Ignoring {event:?} while {:?}", self.sign_in),
        }
    }

    /// A device code arrived
    pub fn set_device_code(&mut self, code: DeviceCode) {
        self.sign_in_qr = qr::render_lines(&code.verification_uri).unwrap_or_default();
        self.advance_sign_in(SignInEvent::CodeReceived(code));
    }

    /// Drop everything tied to the signed-in account
    pub fn reset_account(&mut self) {
        self.sign_in = SignInState::SignedOut;
        self.sign_in_qr.clear();
        self.profile = None;
        self.profile_qr.clear();
        self.show_profile_qr = false;
        self.notifications.clear();
        self.selected_notification = 0;
        self.repos.clear();
        self.selected_repo = 0;
        self.close_repo();
        self.loading = false;
        self.screen = Screen::SignIn;
    }

    /// Profile loaded
    pub fn set_profile(&mut self, profile: Profile) {
        self.profile_qr = qr::render_lines(&profile.profile_url).unwrap_or_default();
        self.profile = Some(profile);
    }

    /// Replace the notification list, keeping the cursor in range
    pub fn set_notifications(&mut self, notifications: Vec<Notification>) {
        self.notifications = notifications;
        self.selected_notification = self
            .selected_notification
            .min(self.notifications.len().saturating_sub(1));
    }

    /// Replace the repository list
    pub fn set_repos(&mut self, repos: Vec<Repository>) {
        self.repos = repos;
        self.selected_repo = self.selected_repo.min(self.repos.len().saturating_sub(1));
    }

    /// Remember which repository the detail screen is waiting for
    pub fn request_repo(&mut self, full_name: &str) {
        self.pending_repo = Some(full_name.to_string());
        self.loading = true;
    }

    /// Whether a detail result belongs to the request in flight
    pub fn is_pending_repo(&self, full_name: &str) -> bool {
        self.screen == Screen::RepoDetail
            && self
                .pending_repo
                .as_deref()
                .is_some_and(|p| p.eq_ignore_ascii_case(full_name))
    }

    /// Show a repository and its events
    pub fn set_repo(&mut self, repo: Repository, events: Vec<RepoEvent>) {
        self.pending_repo = None;
        self.repo = Some(repo);
        self.events = events;
        self.selected_event = 0;
        self.expanded_events.clear();
    }

    /// Forget the repository on the detail screen
    pub fn close_repo(&mut self) {
        self.repo = None;
        self.pending_repo = None;
        self.events.clear();
        self.selected_event = 0;
        self.expanded_events.clear();
    }

    /// Notification under the cursor
    pub fn selected_notification(&self) -> Option<&Notification> {
        self.notifications.get(self.selected_notification)
    }

    /// Repository under the cursor
    pub fn selected_repo(&self) -> Option<&Repository> {
        self.repos.get(self.selected_repo)
    }

    /// Expand or collapse the selected event; plain events stay collapsed
    pub fn toggle_selected_event(&mut self) {
        let Some(event) = self.events.get(self.selected_event) else {
            return;
        };
        if !event.is_expandable() {
            return;
        }
        if !self.expanded_events.remove(&event.id) {
            self.expanded_events.insert(event.id.clone());
        }
    }

    /// Whether an event shows its details
    pub fn is_expanded(&self, event: &RepoEvent) -> bool {
        self.expanded_events.contains(&event.id)
    }

    /// Move the cursor of the list on the current screen
    pub fn move_selection(&mut self, down: bool) {
        let (index, len) = match self.screen {
            Screen::Notifications => (&mut self.selected_notification, self.notifications.len()),
            Screen::Repos => (&mut self.selected_repo, self.repos.len()),
            Screen::RepoDetail => (&mut self.selected_event, self.events.len()),
            Screen::Settings => (&mut self.settings_row, SettingsRow::ALL.len()),
            Screen::SignIn | Screen::Home => return,
        };
        if len == 0 {
            return;
        }
        *index = if down {
            (*index + 1).min(len - 1)
        } else {
            index.saturating_sub(1)
        };
    }

    /// Settings row under the cursor
    pub fn current_settings_row(&self) -> SettingsRow {
        SettingsRow::ALL[self.settings_row.min(SettingsRow::ALL.len() - 1)]
    }

    /// Step through the accent swatches
    pub fn cycle_accent(&mut self, forward: bool) {
        let palette = Accent::palette();
        let current = self.accent.palette_index();
        let next = match (current, forward) {
            (Some(i), true) => (i + 1) % palette.len(),
            (Some(i), false) => i.checked_sub(1).unwrap_or(palette.len() - 1),
            (None, _) => 0,
        };
        self.accent = palette[next];
        self.config.accent_color = self.accent;
    }

    /// Switch to a tab by offset from the current one
    pub fn cycle_tab(&mut self, forward: bool) -> Screen {
        let len = Screen::TABS.len();
        let current = self.screen.tab_index().unwrap_or(0);
        let next = if forward {
            (current + 1) % len
        } else {
            current.checked_sub(1).unwrap_or(len - 1)
        };
        self.screen = Screen::TABS[next];
        self.screen
    }
}
