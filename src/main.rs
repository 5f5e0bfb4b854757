//! hubwatch - A glanceable GitHub companion for your terminal
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use tokio::runtime::Runtime;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use hubwatch::api::{ApiError, DeviceFlow, GitHubClient};
use hubwatch::auth::SettingsStore;
use hubwatch::models::{Notification, relative_time};
use hubwatch::session::Session;
use hubwatch::{Config, qr};

fn main() -> Result<()> {
    // Initialize logging (RUST_LOG=debug for verbose output)
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let command = parse_args(std::env::args().skip(1).collect())?;
    match command {
        // The TUI owns its runtime
        Command::Run => hubwatch::app::run(),
        Command::Help => {
            print_help();
            Ok(())
        }
        Command::Version => {
            print_version();
            Ok(())
        }
        other => Runtime::new()?.block_on(run_cli(other)),
    }
}

/// CLI commands
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Run,
    Login,
    Logout,
    Whoami,
    Notifications,
    Read { id: String },
    Repos,
    Repo { full_name: String },
    Help,
    Version,
}

fn parse_args(args: Vec<String>) -> Result<Command> {
    let Some(first) = args.first() else {
        return Ok(Command::Run);
    };

    match first.as_str() {
        "-h" | "--help" | "help" => Ok(Command::Help),
        "-v" | "--version" | "version" => Ok(Command::Version),
        "login" => Ok(Command::Login),
        "logout" => Ok(Command::Logout),
        "whoami" | "me" => Ok(Command::Whoami),
        "notifications" | "n" => Ok(Command::Notifications),
        "read" => {
            let id = args
                .get(1)
                .ok_or_else(|| anyhow!("Missing notification id\nExample: hubwatch read 1234567"))?
                .clone();
            Ok(Command::Read { id })
        }
        "repos" => Ok(Command::Repos),
        "repo" => {
            let full_name = args.get(1).cloned().ok_or_else(|| {
                anyhow!("Missing repository\nExample: hubwatch repo rust-lang/rust")
            })?;
            Ok(Command::Repo { full_name })
        }
        other => Err(anyhow!(
            "Unknown command: {other}\nRun 'hubwatch --help' for usage"
        )),
    }
}

fn print_help() {
    let config_path = Config::default_path()
        .map_or_else(|_| "Unknown".to_string(), |p| p.display().to_string());

    println!(
        r#"{}
hubwatch - GitHub at a glance

USAGE:
    hubwatch                           Launch TUI
    hubwatch [COMMAND]

COMMANDS:
    login                              Sign in with GitHub (device flow)
    logout                             Forget the stored token
    whoami                             Show profile statistics
    notifications                      List notifications
    read <id>                          Mark a notification as read
    repos                              List repositories, recently updated first
    repo <owner/name>                  Show a repository and its recent events

OPTIONS:
    -h, --help                         Show this help message
    -v, --version                      Show version information

KEYBINDINGS (TUI):
    Tab / 1-4     Switch screen
    j/k           Move selection
    Enter         Sign in / open repo / expand event
    m             Mark notification read
    s             Share account QR
    o             Open in browser
    r             Refresh
    ?             Help

CONFIG:
    {}
    Set {} to use another directory.
"#,
        hubwatch::LOGO,
        config_path,
        hubwatch::paths::HOME_ENV,
    );
}

fn print_version() {
    println!("hubwatch {}", hubwatch::VERSION);
}

async fn run_cli(command: Command) -> Result<()> {
    let config = Config::load()?;
    let store = SettingsStore::open()?;

    match command {
        Command::Login => login(&config, &store).await,
        Command::Logout => {
            Session::restore(&store)?.sign_out(&store)?;
            println!("✓ Signed out");
            Ok(())
        }
        Command::Whoami => whoami(&config, &store).await,
        Command::Notifications => notifications(&config, &store).await,
        Command::Read { id } => {
            let client = client(&config, &store)?;
            signed_out_on_401(client.mark_notification_read(&id).await, &store)?;
            println!("✓ Marked notification {id} as read");
            Ok(())
        }
        Command::Repos => repos(&config, &store).await,
        Command::Repo { full_name } => repo(&config, &store, &full_name).await,
        Command::Run | Command::Help | Command::Version => Ok(()),
    }
}

fn client(config: &Config, store: &SettingsStore) -> Result<GitHubClient> {
    let session = Session::restore(store)?;
    let token = session
        .token()
        .cloned()
        .ok_or_else(|| anyhow!("Not signed in. Run 'hubwatch login' first"))?;
    GitHubClient::from_config(config, token).context("Failed to create GitHub client")
}

/// A rejected token is cleared so the next run starts from sign-in
fn signed_out_on_401<T>(result: Result<T, ApiError>, store: &SettingsStore) -> Result<T> {
    match result {
        Err(e) if e.is_unauthorized() => {
            store.clear_token()?;
            Err(anyhow!(
                "GitHub rejected the stored token, you have been signed out.\n\
                 Run 'hubwatch login' to sign in again"
            ))
        }
        other => Ok(other?),
    }
}

async fn login(config: &Config, store: &SettingsStore) -> Result<()> {
    let flow = DeviceFlow::from_config(config)?;
    let mut session = Session::default();

    println!("Signing in with GitHub...");
    session
        .sign_in(&flow, store, |code| {
            println!("\nOpen {} and enter the code:\n", code.verification_uri);
            println!("    {}\n", code.user_code);
            if let Ok(lines) = qr::render_lines(&code.verification_uri) {
                for line in lines {
                    println!("  {line}");
                }
            }
            let _ = open::that(&code.verification_uri);
            println!("\nWaiting for authorization...");
        })
        .await?;

    let client = client(config, store)?;
    let profile = signed_out_on_401(client.user().await, store)?;
    println!("\n✓ Signed in as {}", profile.handle());
    Ok(())
}

async fn whoami(config: &Config, store: &SettingsStore) -> Result<()> {
    let client = client(config, store)?;
    let profile = signed_out_on_401(client.user().await, store)?;

    println!("{} ({})", profile.name, profile.handle());
    if let Some(bio) = &profile.bio {
        println!("{bio}");
    }
    println!("{}", "─".repeat(40));
    println!("Public Repos  {}", profile.public_repos);
    println!("Followers     {}", profile.followers);
    println!("Following     {}", profile.following);
    println!("{}", profile.joined_label());
    println!("{}", profile.profile_url);
    Ok(())
}

async fn notifications(config: &Config, store: &SettingsStore) -> Result<()> {
    let client = client(config, store)?;
    let list = signed_out_on_401(client.notifications().await, store)?;

    println!("{} Unread", Notification::unread_count(&list));
    println!("{}", "─".repeat(60));
    for n in &list {
        let marker = if n.unread { "●" } else { " " };
        println!("\n{marker} {}", n.title);
        println!("  {} · {} · {}", n.kind, n.repository, n.reason);
        println!("  {}  [id {}]", n.updated_label(), n.id);
    }
    Ok(())
}

async fn repos(config: &Config, store: &SettingsStore) -> Result<()> {
    let client = client(config, store)?;
    let repos = signed_out_on_401(client.repositories().await, store)?;
    let now = chrono::Utc::now();

    for repo in &repos {
        let updated = repo
            .updated_at
            .map(|t| relative_time(t, now))
            .unwrap_or_default();
        let lock = if repo.private { " 🔒" } else { "" };
        println!("\n{}{lock}", repo.full_name);
        println!("  {}", repo.description_or_default());
        println!("  ★ {}  ⑂ {}  {}", repo.stars, repo.forks, updated);
    }
    Ok(())
}

async fn repo(config: &Config, store: &SettingsStore, full_name: &str) -> Result<()> {
    let client = client(config, store)?;
    let (repo, events) = tokio::join!(client.repository(full_name), client.repo_events(full_name));
    let repo = signed_out_on_401(repo, store)?;
    let events = signed_out_on_401(events, store)?;

    println!("{}", repo.name);
    println!("by {}", repo.owner);
    println!("\"{}\"", repo.description_or_default());
    println!("★ Stars: {}   ⑂ Forks: {}", repo.stars, repo.forks);
    println!("\nRecent Events");
    println!("{}", "─".repeat(60));
    for event in &events {
        let branch = event
            .branch
            .as_deref()
            .map(|b| format!("  ⎇ {b}"))
            .unwrap_or_default();
        println!("\n{} by {}{branch}", event.display_kind(), event.actor);
        println!("  {}", event.created_label());
        for line in event.detail_lines() {
            println!("    {line}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_parse_args() {
        assert_eq!(parse_args(args(&[])).unwrap(), Command::Run);
        assert_eq!(parse_args(args(&["login"])).unwrap(), Command::Login);
        assert_eq!(parse_args(args(&["--version"])).unwrap(), Command::Version);
        assert_eq!(
            parse_args(args(&["read", "42"])).unwrap(),
            Command::Read { id: "42".into() }
        );
        assert_eq!(
            parse_args(args(&["repo", "octo/hello"])).unwrap(),
            Command::Repo {
                full_name: "octo/hello".into()
            }
        );
    }

    #[test]
    fn test_parse_args_errors() {
        assert!(parse_args(args(&["read"])).is_err());
        assert!(parse_args(args(&["repo"])).is_err());
        let err = parse_args(args(&["frobnicate"])).unwrap_err();
        assert!(err.to_string().contains("Unknown command: frobnicate"));
    }
}
