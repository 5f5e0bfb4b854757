//! # hubwatch
//!
//! GitHub at a glance, from your terminal.
//!
//! ## Overview
//!
//! hubwatch signs in to GitHub with the OAuth device flow and then shows your
//! profile statistics, your notifications (which can be marked read) and
//! your repositories with their recent activity.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    App / CLI commands                       │
//! │   Sync TUI loop + tokio worker, or one-shot subcommands     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!          ┌───────────────────┼───────────────────┐
//!          ▼                   ▼                   ▼
//! ┌─────────────────┐ ┌─────────────────┐ ┌─────────────────┐
//! │     Session     │ │       API       │ │       UI        │
//! │                 │ │                 │ │                 │
//! │ • Device flow   │ │ • REST client   │ │ • Screens       │
//! │ • Restore       │ │ • Wire types    │ │ • Dialogs       │
//! │ • Sign out      │ │ • Error mapping │ │ • QR codes      │
//! └─────────────────┘ └─────────────────┘ └─────────────────┘
//!          │                   │                   │
//!          └───────────────────┴───────────────────┘
//!                              │
//!          ┌───────────────────┼───────────────────┐
//!          ▼                   ▼                   ▼
//! ┌─────────────────┐ ┌─────────────────┐ ┌─────────────────┐
//! │     Config      │ │      Auth       │ │     Models      │
//! │                 │ │                 │ │                 │
//! │ • TOML file     │ │ • Encrypted     │ │ • Profile       │
//! │ • Theme/accent  │ │   settings      │ │ • Notification  │
//! │ • OAuth app     │ │ • Access token  │ │ • Repo, Event   │
//! └─────────────────┘ └─────────────────┘ └─────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`api`] - GitHub REST client and OAuth device flow
//! - [`app`] - TUI application state and event loop
//! - [`auth`] - Encrypted key-value settings store
//! - [`config`] - Configuration management
//! - [`models`] - View models (Profile, Notification, Repository, `RepoEvent`)
//! - [`qr`] - QR codes rendered as terminal text
//! - [`session`] - Sign-in state machine
//! - [`theme`] - Theme support via ratatui-themes
//!
//! ## Example
//!
//! ```no_run
//! use hubwatch::app;
//!
//! fn main() -> anyhow::Result<()> {
//!     app::run()
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/hubwatch/0.1.0")]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::trivially_copy_pass_by_ref)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::missing_const_for_fn)]

pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod models;
pub mod paths;
pub mod qr;
pub mod session;
pub mod theme;

// Re-export main types for convenience
pub use api::{AccessToken, ApiError, DeviceFlow, GitHubClient};
pub use app::AppState;
pub use config::Config;
pub use models::{Notification, Profile, RepoEvent, Repository};
pub use session::{Session, SignInState};
pub use theme::{Accent, Theme, ThemeColors};

// Re-export theme types from ratatui-themes crate
pub use ratatui_themes::{ThemeName, ThemePalette};

/// ASCII logo for the application
pub const LOGO: &str = r"
   __          __                  __       __
  / /  __ __  / /  _    __ ___ _  / /_ ____/ /
 / _ \/ // / / _ \| |/|/ // _ `/ / __// __/ _ \
/_//_/\_,_/ /_.__/|__,__/ \_,_/  \__/ \__/_//_/
";

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
