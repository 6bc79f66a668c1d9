//! Orchard color palette and styles.
//!
//! Tier colors follow a traffic light: green, amber, red.

use ratatui::style::{Color, Modifier, Style};

use crate::domain::RiskTier;

/// Orchard theme color palette.
pub struct OrchardTheme;

impl OrchardTheme {
    // === Primary Colors ===

    /// Almond green
    pub const PRIMARY: Color = Color::Rgb(101, 163, 13); // #65A30D

    /// Lighter green for highlights
    pub const PRIMARY_LIGHT: Color = Color::Rgb(163, 230, 53); // #A3E635

    /// Darker green for the header bar
    pub const PRIMARY_DARK: Color = Color::Rgb(63, 98, 18); // #3F6212

    /// Light slate for borders
    pub const SECONDARY_LIGHT: Color = Color::Rgb(148, 163, 184); // #94A3B8

    // === Semantic Colors ===

    pub const SUCCESS: Color = Color::Rgb(16, 185, 129); // #10B981
    pub const WARNING: Color = Color::Rgb(251, 191, 36); // #FBBF24
    pub const DANGER: Color = Color::Rgb(244, 63, 94); // #F43F5E

    // === Background Colors ===

    pub const BG_DARK: Color = Color::Rgb(28, 25, 23); // #1C1917

    // === Text Colors ===

    pub const TEXT_PRIMARY: Color = Color::Rgb(250, 250, 249); // #FAFAF9
    pub const TEXT_SECONDARY: Color = Color::Rgb(168, 162, 158); // #A8A29E
    pub const TEXT_MUTED: Color = Color::Rgb(120, 113, 108); // #78716C

    // === Preset Styles ===

    /// Style for titles
    #[must_use]
    pub fn title() -> Style {
        Style::default()
            .fg(Self::TEXT_PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for subtitles
    #[must_use]
    pub fn subtitle() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn text() -> Style {
        Style::default().fg(Self::TEXT_PRIMARY)
    }

    #[must_use]
    pub fn text_secondary() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    #[must_use]
    pub fn text_muted() -> Style {
        Style::default().fg(Self::TEXT_MUTED)
    }

    #[must_use]
    pub fn success() -> Style {
        Style::default().fg(Self::SUCCESS)
    }

    #[must_use]
    pub fn danger() -> Style {
        Style::default().fg(Self::DANGER)
    }

    /// Style for focused elements
    #[must_use]
    pub fn focused() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    /// Text cursor in the selected field
    #[must_use]
    pub fn cursor() -> Style {
        Style::default().fg(Self::PRIMARY_LIGHT)
    }

    #[must_use]
    pub fn border() -> Style {
        Style::default().fg(Self::SECONDARY_LIGHT)
    }

    #[must_use]
    pub fn border_focused() -> Style {
        Style::default().fg(Self::PRIMARY)
    }

    /// Style for the header bar
    #[must_use]
    pub fn header() -> Style {
        Style::default()
            .fg(Self::TEXT_PRIMARY)
            .bg(Self::PRIMARY_DARK)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for key hints
    #[must_use]
    pub fn key_hint() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for key descriptions
    #[must_use]
    pub fn key_desc() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    /// Traffic-light style of a risk tier
    #[must_use]
    pub fn risk_tier(tier: RiskTier) -> Style {
        let (r, g, b) = tier.color();
        Style::default().fg(Color::Rgb(r, g, b))
    }

    /// Background fill for a gauge band
    #[must_use]
    pub fn band(tier: RiskTier) -> Style {
        let (r, g, b) = tier.color();
        Style::default().fg(Color::Rgb(r, g, b)).bg(Self::BG_DARK)
    }
}
