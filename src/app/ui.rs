//! UI rendering for the TUI

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs, Wrap},
};
use unicode_width::UnicodeWidthStr;

use super::state::{AppState, Mode, Screen, SettingsRow};
use crate::models::{Notification, relative_time};
use crate::session::SignInState;
use crate::theme::{Accent, Theme, ThemeColors};

/// Spinner animation frames
const SPINNER: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Main render function
pub fn render(frame: &mut Frame, state: &AppState) {
    let colors = state.colors();

    let area = frame.area();
    let bg_block = Block::default().style(Style::default().bg(colors.bg));
    frame.render_widget(bg_block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tabs
            Constraint::Min(0),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    render_tabs(frame, state, &colors, chunks[0]);
    match state.screen {
        Screen::SignIn => render_sign_in(frame, state, &colors, chunks[1]),
        Screen::Home => render_home(frame, state, &colors, chunks[1]),
        Screen::Notifications => render_notifications(frame, state, &colors, chunks[1]),
        Screen::Repos => render_repos(frame, state, &colors, chunks[1]),
        Screen::RepoDetail => render_repo_detail(frame, state, &colors, chunks[1]),
        Screen::Settings => render_settings(frame, state, &colors, chunks[1]),
    }
    render_status_bar(frame, state, &colors, chunks[2]);

    match state.mode {
        Mode::Help => render_help_popup(frame, &colors),
        Mode::ThemePicker => render_theme_picker(frame, state, &colors),
        Mode::Normal => {}
    }

    if state.dialog.is_some() {
        render_dialog(frame, state, &colors);
    }
}

fn spinner(state: &AppState) -> &'static str {
    SPINNER[(state.current_tick() / 2) as usize % SPINNER.len()]
}

fn panel<'a>(colors: &ThemeColors, title: impl Into<Line<'a>>) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(colors.block_focus())
        .title(title)
        .title_style(colors.heading())
}

fn render_tabs(frame: &mut Frame, state: &AppState, colors: &ThemeColors, area: Rect) {
    if state.screen == Screen::SignIn {
        let title = Paragraph::new(Line::from(vec![
            Span::styled(" hubwatch ", colors.heading()),
            Span::styled(format!("v{}", crate::VERSION), colors.text_muted()),
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(colors.block()),
        );
        frame.render_widget(title, area);
        return;
    }

    let titles: Vec<Line> = Screen::TABS
        .iter()
        .enumerate()
        .map(|(i, screen)| {
            let marker = if state.screen.tab_index() == Some(i) { "●" } else { "○" };
            Line::from(format!("{marker}  {}", screen.title()))
        })
        .collect();

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(colors.block())
                .title(" hubwatch ")
                .title_style(colors.heading()),
        )
        .select(state.screen.tab_index().unwrap_or(0))
        .style(colors.tab())
        .highlight_style(colors.tab_active())
        .divider(Span::styled(" │ ", colors.text_muted()));

    frame.render_widget(tabs, area);
}

/// Center a block of QR lines horizontally, drawn in the accent color
fn qr_lines<'a>(lines: &'a [String], colors: &ThemeColors) -> Vec<Line<'a>> {
    lines
        .iter()
        .map(|l| Line::styled(l.as_str(), colors.text_primary()).centered())
        .collect()
}

fn render_sign_in(frame: &mut Frame, state: &AppState, colors: &ThemeColors, area: Rect) {
    let mut lines = vec![
        Line::from(""),
        Line::styled("Sign in with GitHub", colors.heading()).centered(),
        Line::from(""),
    ];

    match &state.sign_in {
        SignInState::SignedOut => {
            lines.push(
                Line::styled(
                    "hubwatch uses GitHub's device flow: you approve it in a browser.",
                    colors.text_muted(),
                )
                .centered(),
            );
            lines.push(Line::from(""));
            lines.push(
                Line::from(vec![
                    Span::styled("[Enter]", colors.key_hint()),
                    Span::styled(" Sign in", colors.text()),
                ])
                .centered(),
            );
        }
        SignInState::RequestingCode => {
            lines.push(
                Line::styled(
                    format!("{} Requesting code...", spinner(state)),
                    colors.text_secondary(),
                )
                .centered(),
            );
        }
        SignInState::AwaitingAuthorization { code } => {
            lines.push(Line::styled("Enter this code:", colors.text_muted()).centered());
            lines.push(
                Line::styled(
                    code.user_code.clone(),
                    colors.heading().add_modifier(Modifier::REVERSED),
                )
                .centered(),
            );
            lines.push(Line::from(""));
            lines.push(
                Line::from(vec![
                    Span::styled("at ", colors.text_muted()),
                    Span::styled(code.verification_uri.clone(), colors.text_info()),
                ])
                .centered(),
            );
            lines.push(Line::from(""));
            lines.extend(qr_lines(&state.sign_in_qr, colors));
            lines.push(Line::from(""));
            lines.push(
                Line::styled(
                    format!("{} Waiting for authorization...", spinner(state)),
                    colors.text_secondary(),
                )
                .centered(),
            );
            lines.push(
                Line::from(vec![
                    Span::styled("[o]", colors.key_hint()),
                    Span::styled(" Open in browser  ", colors.text_muted()),
                    Span::styled("[Esc]", colors.key_hint()),
                    Span::styled(" Cancel", colors.text_muted()),
                ])
                .centered(),
            );
        }
        SignInState::SignedIn { .. } => {
            lines.push(Line::styled("✓ Signed in", colors.text_success()).centered());
        }
        SignInState::Failed { message } => {
            lines.push(Line::styled(message.clone(), colors.text_error()).centered());
            lines.push(Line::from(""));
            lines.push(
                Line::from(vec![
                    Span::styled("[Enter]", colors.key_hint()),
                    Span::styled(" Try again", colors.text()),
                ])
                .centered(),
            );
        }
    }

    let paragraph = Paragraph::new(lines)
        .block(panel(colors, " Sign in "))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn render_home(frame: &mut Frame, state: &AppState, colors: &ThemeColors, area: Rect) {
    let Some(profile) = &state.profile else {
        let text = if state.loading {
            format!("{} Loading account...", spinner(state))
        } else {
            "No account loaded. Press r to retry.".to_string()
        };
        let paragraph = Paragraph::new(vec![
            Line::from(""),
            Line::styled(text, colors.text_muted()).centered(),
        ])
        .block(panel(colors, " Home "));
        frame.render_widget(paragraph, area);
        return;
    };

    let mut lines = vec![
        Line::from(""),
        Line::styled(profile.name.clone(), colors.heading()).centered(),
        Line::styled(profile.handle(), colors.text_muted()).centered(),
        Line::from(""),
    ];

    if state.show_profile_qr {
        lines.extend(qr_lines(&state.profile_qr, colors));
        lines.push(Line::from(""));
        lines.push(Line::styled(profile.profile_url.clone(), colors.text_info()).centered());
    } else {
        if let Some(bio) = &profile.bio {
            lines.push(Line::styled(bio.clone(), colors.text()).centered());
            lines.push(Line::from(""));
        }
        let stat = |label: &'static str, value: u32| {
            Line::from(vec![
                Span::styled(format!("{label}: "), colors.text_muted()),
                Span::styled(value.to_string(), colors.text_primary().add_modifier(Modifier::BOLD)),
            ])
            .centered()
        };
        lines.push(stat("Public Repos", profile.public_repos));
        lines.push(stat("Followers", profile.followers));
        lines.push(stat("Following", profile.following));
        lines.push(Line::from(""));
        lines.push(Line::styled(profile.joined_label(), colors.text_muted()).centered());
    }

    lines.push(Line::from(""));
    let toggle = if state.show_profile_qr { " Hide QR  " } else { " Share Account QR  " };
    lines.push(
        Line::from(vec![
            Span::styled("[s]", colors.key_hint()),
            Span::styled(toggle, colors.text_muted()),
            Span::styled("[o]", colors.key_hint()),
            Span::styled(" Open profile", colors.text_muted()),
        ])
        .centered(),
    );

    let paragraph = Paragraph::new(lines)
        .block(panel(colors, " Home "))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn empty_message<'a>(state: &AppState, colors: &ThemeColors, text: &'a str) -> Paragraph<'a> {
    let line = if state.loading {
        Line::styled(format!("{} Loading...", spinner(state)), colors.text_muted())
    } else {
        Line::styled(text, colors.text_muted())
    };
    Paragraph::new(vec![Line::from(""), line.centered()])
}

fn render_notifications(frame: &mut Frame, state: &AppState, colors: &ThemeColors, area: Rect) {
    let unread = Notification::unread_count(&state.notifications);
    let block = panel(colors, format!(" 🔔 Notifications ({unread} Unread) "));

    if state.notifications.is_empty() {
        let empty = empty_message(state, colors, "You're all caught up").block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = state
        .notifications
        .iter()
        .map(|n| {
            let marker = if n.unread { "● " } else { "  " };
            let title_style = if n.unread {
                colors.text().add_modifier(Modifier::BOLD)
            } else {
                colors.text_muted()
            };
            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(marker, colors.text_primary()),
                    Span::styled(n.title.clone(), title_style),
                ]),
                Line::from(vec![
                    Span::styled(format!("  {} · ", n.kind), colors.text_secondary()),
                    Span::styled(n.repository.clone(), colors.text_info()),
                    Span::styled(format!(" · {}", n.reason), colors.text_muted()),
                ]),
                Line::styled(format!("  {}", n.updated_label()), colors.text_muted()),
                Line::from(""),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(colors.selected());
    let mut list_state = ListState::default().with_selected(Some(state.selected_notification));
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn render_repos(frame: &mut Frame, state: &AppState, colors: &ThemeColors, area: Rect) {
    let block = panel(colors, format!(" 📦 Repos ({}) ", state.repos.len()));

    if state.repos.is_empty() {
        frame.render_widget(empty_message(state, colors, "No repositories").block(block), area);
        return;
    }

    let now = chrono::Utc::now();
    let items: Vec<ListItem> = state
        .repos
        .iter()
        .map(|repo| {
            let mut title = vec![Span::styled(
                repo.full_name.clone(),
                colors.text().add_modifier(Modifier::BOLD),
            )];
            if repo.private {
                title.push(Span::styled(" 🔒", colors.text_warning()));
            }

            let mut meta = vec![
                Span::styled(format!("  ★ {}", repo.stars), colors.stars()),
                Span::styled(format!("  ⑂ {}", repo.forks), colors.forks()),
            ];
            if let Some(language) = &repo.language {
                meta.push(Span::styled(format!("  {language}"), colors.text_secondary()));
            }
            if let Some(updated) = repo.updated_at {
                meta.push(Span::styled(
                    format!("  updated {}", relative_time(updated, now)),
                    colors.text_muted(),
                ));
            }

            ListItem::new(vec![
                Line::from(title),
                Line::styled(format!("  {}", repo.description_or_default()), colors.text_muted()),
                Line::from(meta),
                Line::from(""),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(colors.selected());
    let mut list_state = ListState::default().with_selected(Some(state.selected_repo));
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn render_repo_detail(frame: &mut Frame, state: &AppState, colors: &ThemeColors, area: Rect) {
    let Some(repo) = &state.repo else {
        let block = panel(colors, " Repository ");
        frame.render_widget(empty_message(state, colors, "Nothing to show").block(block), area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(7), Constraint::Min(0)])
        .split(area);

    let header = Paragraph::new(vec![
        Line::styled(repo.name.clone(), colors.heading()),
        Line::from(vec![
            Span::styled("by ", colors.text_muted()),
            Span::styled(repo.owner.clone(), colors.text_info()),
        ]),
        Line::styled(format!("\"{}\"", repo.description_or_default()), colors.text()),
        Line::from(vec![
            Span::styled(format!("★ Stars: {}", repo.stars), colors.stars()),
            Span::styled(format!("   ⑂ Forks: {}", repo.forks), colors.forks()),
            Span::styled(format!("   Issues: {}", repo.open_issues), colors.text_muted()),
        ]),
        Line::styled(repo.visibility.clone(), colors.text_muted()),
    ])
    .block(panel(colors, format!(" {} ", repo.full_name)))
    .wrap(Wrap { trim: true });
    frame.render_widget(header, chunks[0]);

    let block = panel(colors, " Recent Events ");
    if state.events.is_empty() {
        let empty = empty_message(state, colors, "No recent events").block(block);
        frame.render_widget(empty, chunks[1]);
        return;
    }

    let items: Vec<ListItem> = state
        .events
        .iter()
        .map(|event| {
            let expanded = state.is_expanded(event);
            let marker = match (event.is_expandable(), expanded) {
                (false, _) => "  ",
                (true, false) => "▸ ",
                (true, true) => "▾ ",
            };
            let mut summary = vec![
                Span::styled(marker, colors.text_primary()),
                Span::styled(
                    event.display_kind().to_string(),
                    colors.text().add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!(" by {}", event.actor), colors.text_secondary()),
            ];
            if let Some(branch) = &event.branch {
                summary.push(Span::styled(format!("  ⎇ {branch}"), colors.text_info()));
            }

            let mut lines = vec![
                Line::from(summary),
                Line::styled(format!("  {}", event.created_label()), colors.text_muted()),
            ];
            if expanded {
                lines.extend(
                    event
                        .detail_lines()
                        .into_iter()
                        .map(|l| Line::styled(format!("    {l}"), colors.text())),
                );
            }
            lines.push(Line::from(""));
            ListItem::new(lines)
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(colors.selected());
    let mut list_state = ListState::default().with_selected(Some(state.selected_event));
    frame.render_stateful_widget(list, chunks[1], &mut list_state);
}

fn render_settings(frame: &mut Frame, state: &AppState, colors: &ThemeColors, area: Rect) {
    let items: Vec<ListItem> = SettingsRow::ALL
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let cursor = if i == state.settings_row { "▸ " } else { "  " };
            let line = match row {
                SettingsRow::Accent => {
                    let mut spans = vec![
                        Span::styled(cursor, colors.text_primary()),
                        Span::styled("Accent color  ", colors.text()),
                    ];
                    for swatch in Accent::palette() {
                        let block = if *swatch == state.accent { "[██]" } else { " ██ " };
                        spans.push(Span::styled(block, Style::default().fg(swatch.color())));
                    }
                    spans.push(Span::styled(format!("  {}", state.accent), colors.text_muted()));
                    Line::from(spans)
                }
                SettingsRow::Theme => Line::from(vec![
                    Span::styled(cursor, colors.text_primary()),
                    Span::styled("Theme         ", colors.text()),
                    Span::styled(state.theme.name(), colors.text_secondary()),
                ]),
                SettingsRow::SignOut => Line::from(vec![
                    Span::styled(cursor, colors.text_primary()),
                    Span::styled("Sign out", colors.text_error()),
                ]),
            };
            ListItem::new(vec![line, Line::from("")])
        })
        .collect();

    let hints = Line::from(vec![
        Span::styled(" ←→", colors.key_hint()),
        Span::styled(" accent  ", colors.text_muted()),
        Span::styled("↵", colors.key_hint()),
        Span::styled(" select ", colors.text_muted()),
    ]);

    let list = List::new(items).block(panel(colors, " ⚙ Settings ").title_bottom(hints));
    frame.render_widget(list, area);
}

fn render_status_bar(frame: &mut Frame, state: &AppState, colors: &ThemeColors, area: Rect) {
    let loading_indicator = if state.loading {
        format!("{} ", spinner(state))
    } else {
        String::new()
    };

    let content = if !state.status.is_empty() {
        vec![
            Span::styled(" ", Style::default()),
            Span::styled(loading_indicator, colors.text_secondary()),
            Span::styled(state.status.as_str(), colors.text_secondary()),
        ]
    } else if state.screen == Screen::SignIn {
        vec![
            Span::styled(" ", Style::default()),
            Span::styled(loading_indicator, colors.text_secondary()),
            Span::styled("Enter", colors.key_hint()),
            Span::styled(": sign in  ", colors.text_muted()),
            Span::styled("?", colors.key_hint()),
            Span::styled(": help  ", colors.text_muted()),
            Span::styled("q", colors.key_hint()),
            Span::styled(": quit", colors.text_muted()),
        ]
    } else {
        vec![
            Span::styled(" ", Style::default()),
            Span::styled(loading_indicator, colors.text_secondary()),
            Span::styled("Tab", colors.key_hint()),
            Span::styled(": screens  ", colors.text_muted()),
            Span::styled("r", colors.key_hint()),
            Span::styled(": refresh  ", colors.text_muted()),
            Span::styled("?", colors.key_hint()),
            Span::styled(": help  ", colors.text_muted()),
            Span::styled("q", colors.key_hint()),
            Span::styled(": quit", colors.text_muted()),
        ]
    };

    let status =
        Paragraph::new(Line::from(content)).style(Style::default().bg(colors.bg_secondary));
    frame.render_widget(status, area);
}

fn help_section<'a>(
    colors: &ThemeColors,
    title: &'a str,
    keys: &[(&'a str, &'a str)],
) -> Vec<Line<'a>> {
    let mut lines = vec![Line::styled(format!("  {title}"), colors.heading())];
    for (key, what) in keys {
        lines.push(Line::from(vec![
            Span::styled(format!("    {key:<10}"), colors.key_hint()),
            Span::styled(*what, colors.text()),
        ]));
    }
    lines.push(Line::from(""));
    lines
}

fn render_help_popup(frame: &mut Frame, colors: &ThemeColors) {
    let popup_area = centered_rect(50, 70, frame.area());

    let bg_block = Block::default().style(Style::default().bg(colors.bg_secondary));
    frame.render_widget(Clear, popup_area);
    frame.render_widget(bg_block, popup_area);

    let mut lines = vec![Line::from("")];
    lines.extend(help_section(
        colors,
        "Navigation",
        &[
            ("Tab/S-Tab", "Next / previous screen"),
            ("1-4", "Jump to screen"),
            ("j/k ↑/↓", "Move selection"),
            ("Esc", "Back"),
        ],
    ));
    lines.extend(help_section(
        colors,
        "Actions",
        &[
            ("Enter", "Sign in / open repo / expand event"),
            ("m", "Mark notification read"),
            ("o", "Open in browser"),
            ("s", "Share account QR"),
            ("r", "Refresh"),
        ],
    ));
    lines.extend(help_section(
        colors,
        "General",
        &[("t", "Theme (in settings)"), ("?", "Toggle help"), ("q", "Quit")],
    ));

    let help = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(colors.block_focus())
            .title(" ❓ Help ")
            .title_style(colors.heading())
            .title_bottom(Line::from(" Esc close ").centered()),
    );
    frame.render_widget(help, popup_area);
}

fn render_theme_picker(frame: &mut Frame, state: &AppState, colors: &ThemeColors) {
    let popup_area = centered_rect(50, 70, frame.area());

    let bg_block = Block::default().style(Style::default().bg(colors.bg));
    frame.render_widget(Clear, popup_area);
    frame.render_widget(bg_block, popup_area);

    let themes = Theme::all();
    let items: Vec<ListItem> = themes
        .iter()
        .enumerate()
        .map(|(i, theme_name)| {
            let palette = theme_name.palette();
            let selected = i == state.theme_picker_index;

            let preview = format!(
                "  {} {} ",
                if selected { "▸" } else { " " },
                theme_name.display_name()
            );

            let style = if selected {
                Style::default()
                    .fg(palette.accent)
                    .bg(palette.selection)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(palette.fg).bg(colors.bg)
            };

            ListItem::new(Line::from(vec![
                Span::styled(preview, style),
                Span::styled("█", Style::default().fg(palette.accent).bg(colors.bg)),
                Span::styled("█", Style::default().fg(palette.secondary).bg(colors.bg)),
                Span::styled("█", Style::default().fg(palette.success).bg(colors.bg)),
                Span::styled("█", Style::default().fg(palette.warning).bg(colors.bg)),
            ]))
        })
        .collect();

    let theme_list = List::new(items)
        .style(Style::default().bg(colors.bg))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors.primary))
                .border_type(BorderType::Rounded)
                .style(Style::default().bg(colors.bg))
                .title(format!(
                    " 🎨 Select Theme ({}/{}) ",
                    state.theme_picker_index + 1,
                    themes.len()
                ))
                .title_bottom(Line::from(" ↑↓ navigate │ ↵ apply │ Esc cancel ").centered()),
        );

    let mut list_state = ListState::default().with_selected(Some(state.theme_picker_index));
    frame.render_stateful_widget(theme_list, popup_area, &mut list_state);
}

fn render_dialog(frame: &mut Frame, state: &AppState, colors: &ThemeColors) {
    let Some(dialog) = &state.dialog else {
        return;
    };
    let area = frame.area();

    let title_width = u16::try_from(dialog.title.width() + 6).unwrap_or(u16::MAX);
    let width = (area.width * 60 / 100).max(title_width).min(area.width);
    let text_width = usize::from(width.saturating_sub(4)).max(1);
    let wrapped: Vec<String> = dialog
        .message
        .lines()
        .flat_map(|line| {
            if line.is_empty() {
                vec![String::new()]
            } else {
                textwrap::wrap(line, text_width)
                    .into_iter()
                    .map(std::borrow::Cow::into_owned)
                    .collect()
            }
        })
        .collect();

    // text + blank + button + borders
    let height = u16::try_from(wrapped.len() + 4)
        .unwrap_or(u16::MAX)
        .min(area.height);
    let popup_area = Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    };

    frame.render_widget(Clear, popup_area);

    let mut lines: Vec<Line> = wrapped
        .into_iter()
        .map(|l| Line::styled(l, colors.text()))
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::styled(" OK ", colors.selected()).alignment(Alignment::Center));

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(colors.error))
            .style(Style::default().bg(colors.bg_secondary))
            .title(format!(" {} ", dialog.title))
            .title_style(colors.text_error().add_modifier(Modifier::BOLD)),
    );
    frame.render_widget(paragraph, popup_area);
}

/// Helper function to create a centered rect
const fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_width = r.width * percent_x / 100;
    let popup_height = r.height * percent_y / 100;
    Rect {
        x: r.x + (r.width.saturating_sub(popup_width)) / 2,
        y: r.y + (r.height.saturating_sub(popup_height)) / 2,
        width: popup_width,
        height: popup_height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::state::{Dialog, DialogAction};
    use crate::config::Config;
    use ratatui::{Terminal, backend::TestBackend};

    fn draw(state: &AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|frame| render(frame, state)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(usize::from(buffer.area.width))
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_sign_in_screen() {
        let state = AppState::new(Config::default(), false);
        let screen = draw(&state);
        assert!(screen.contains("Sign in with GitHub"));
        assert!(screen.contains("[Enter]"));
    }

    #[test]
    fn test_dialog_is_drawn() {
        let mut state = AppState::new(Config::default(), true);
        state.show_dialog(Dialog::new(
            "Error",
            "Failed to mark notification as read. Please try again.",
            DialogAction::Close,
        ));
        let screen = draw(&state);
        assert!(screen.contains(" Error "));
        assert!(screen.contains("Failed to mark notification as read."));
        assert!(screen.contains(" OK "));
    }

    #[test]
    fn test_qr_lines_are_centered_in_accent() {
        let mut state = AppState::new(Config::default(), true);
        state.accent = Accent::palette()[3];
        let colors = state.colors();
        let lines = vec!["██".to_string()];
        let rendered = qr_lines(&lines, &colors);
        assert_eq!(rendered[0].alignment, Some(Alignment::Center));
        assert_eq!(rendered[0].style.fg, Some(Accent::palette()[3].color()));
        assert_eq!(rendered[0].width(), "██".width());
    }
}
