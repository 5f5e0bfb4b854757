//! Theme configuration and colors.
//!
//! Base palettes come from the `ratatui-themes` crate. On top of the palette
//! the user picks one of six accent colors, which drives headings, the
//! selection bar and QR codes.

use ratatui::style::{Color, Modifier, Style};
use ratatui_themes::{ThemeName, ThemePalette};
use serde::{Deserialize, Serialize};

/// Theme wrapper around `ThemeName` from ratatui-themes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Theme(pub ThemeName);

impl Theme {
    /// Get all available theme names.
    #[must_use]
    pub const fn all() -> &'static [ThemeName] {
        ThemeName::all()
    }

    /// Get the display name for the theme.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.0.display_name()
    }

    /// Get the color palette for this theme, tinted with an accent
    #[must_use]
    pub fn colors(&self, accent: Accent) -> ThemeColors {
        ThemeColors::from_palette(self.0.palette(), accent)
    }

    /// Get the inner `ThemeName`
    #[must_use]
    pub const fn inner(&self) -> ThemeName {
        self.0
    }
}

impl From<ThemeName> for Theme {
    fn from(name: ThemeName) -> Self {
        Self(name)
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Accent swatches offered in settings
const PALETTE: [Accent; 6] = [
    Accent::rgb(0x00, 0xFA, 0x9A),
    Accent::rgb(0x87, 0xDB, 0xFF),
    Accent::rgb(0xFF, 0x50, 0x36),
    Accent::rgb(0x57, 0x36, 0xFF),
    Accent::rgb(0xFF, 0x36, 0x36),
    Accent::rgb(0xE1, 0x36, 0xFF),
];

/// User-selected accent color, stored as `#RRGGBB` in the config file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Accent {
    r: u8,
    g: u8,
    b: u8,
}

impl Accent {
    /// Build an accent from its channels
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// The swatches shown in the settings screen
    pub const fn palette() -> &'static [Self] {
        &PALETTE
    }

    /// Parse `#RRGGBB` (the leading `#` is optional, case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Uppercase `#RRGGBB` form
    pub fn hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Terminal color
    pub const fn color(&self) -> Color {
        Color::Rgb(self.r, self.g, self.b)
    }

    /// Position in the palette, if this is one of the swatches
    pub fn palette_index(&self) -> Option<usize> {
        PALETTE.iter().position(|a| a == self)
    }
}

impl Default for Accent {
    fn default() -> Self {
        PALETTE[0]
    }
}

impl TryFrom<String> for Accent {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
            .ok_or_else(|| format!("invalid accent color '{value}', expected #RRGGBB"))
    }
}

impl From<Accent> for String {
    fn from(accent: Accent) -> Self {
        accent.hex()
    }
}

impl std::fmt::Display for Accent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.hex())
    }
}

/// Extended color palette for UI elements.
#[derive(Debug, Clone)]
pub struct ThemeColors {
    /// Primary background color
    pub bg: Color,
    /// Secondary background for panels/cards
    pub bg_secondary: Color,
    /// Primary foreground/text color
    pub fg: Color,
    /// Muted text color (lowest contrast)
    pub fg_muted: Color,

    /// User accent
    pub primary: Color,
    /// Secondary accent color from the palette
    pub secondary: Color,

    /// Success state color (green)
    pub success: Color,
    /// Warning state color (yellow/orange)
    pub warning: Color,
    /// Error state color (red)
    pub error: Color,
    /// Info state color (blue)
    pub info: Color,

    /// Border color (unfocused)
    pub border: Color,
    /// Selection/highlight background
    pub selection: Color,

    /// Star counter
    pub stars: Color,
    /// Fork counter
    pub forks: Color,
}

impl ThemeColors {
    /// Create `ThemeColors` from a `ThemePalette` and the user's accent
    #[must_use]
    pub fn from_palette(p: ThemePalette, accent: Accent) -> Self {
        Self {
            bg: p.bg,
            bg_secondary: Self::adjust_brightness(p.bg, 10),
            fg: p.fg,
            fg_muted: p.muted,

            primary: accent.color(),
            secondary: p.secondary,

            success: p.success,
            warning: p.warning,
            error: p.error,
            info: p.info,

            border: p.muted,
            selection: p.selection,

            stars: Color::Rgb(0xFF, 0xAA, 0x00),
            forks: Color::Rgb(0x00, 0x99, 0xFF),
        }
    }

    /// Adjust color brightness
    fn adjust_brightness(color: Color, amount: u8) -> Color {
        if let Color::Rgb(r, g, b) = color {
            Color::Rgb(
                r.saturating_add(amount),
                g.saturating_add(amount),
                b.saturating_add(amount),
            )
        } else {
            color
        }
    }

    // Style helpers

    /// Default text style
    #[must_use]
    pub fn text(&self) -> Style {
        Style::default().fg(self.fg)
    }

    /// Muted text style
    #[must_use]
    pub fn text_muted(&self) -> Style {
        Style::default().fg(self.fg_muted)
    }

    /// Primary accent style
    #[must_use]
    pub fn text_primary(&self) -> Style {
        Style::default().fg(self.primary)
    }

    /// Secondary accent style
    #[must_use]
    pub fn text_secondary(&self) -> Style {
        Style::default().fg(self.secondary)
    }

    /// Success style
    #[must_use]
    pub fn text_success(&self) -> Style {
        Style::default().fg(self.success)
    }

    /// Warning style
    #[must_use]
    pub fn text_warning(&self) -> Style {
        Style::default().fg(self.warning)
    }

    /// Error style
    #[must_use]
    pub fn text_error(&self) -> Style {
        Style::default().fg(self.error)
    }

    /// Info style
    #[must_use]
    pub fn text_info(&self) -> Style {
        Style::default().fg(self.info)
    }

    /// Heading style (accent, bold)
    #[must_use]
    pub fn heading(&self) -> Style {
        self.text_primary().add_modifier(Modifier::BOLD)
    }

    /// Block border style
    #[must_use]
    pub fn block(&self) -> Style {
        Style::default().fg(self.border)
    }

    /// Focused block border style
    #[must_use]
    pub fn block_focus(&self) -> Style {
        Style::default().fg(self.primary)
    }

    /// Selected item style
    #[must_use]
    pub fn selected(&self) -> Style {
        Style::default()
            .bg(self.selection)
            .fg(self.fg)
            .add_modifier(Modifier::BOLD)
    }

    /// Tab style
    #[must_use]
    pub fn tab(&self) -> Style {
        Style::default().fg(self.fg_muted)
    }

    /// Active tab style
    #[must_use]
    pub fn tab_active(&self) -> Style {
        Style::default()
            .fg(self.primary)
            .add_modifier(Modifier::BOLD)
    }

    /// Key hint style (for shortcuts)
    #[must_use]
    pub fn key_hint(&self) -> Style {
        Style::default()
            .fg(self.secondary)
            .add_modifier(Modifier::BOLD)
    }

    /// Star counter style
    #[must_use]
    pub fn stars(&self) -> Style {
        Style::default().fg(self.stars)
    }

    /// Fork counter style
    #[must_use]
    pub fn forks(&self) -> Style {
        Style::default().fg(self.forks)
    }
}
