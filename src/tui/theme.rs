//! Light and dark palettes for the studio

use ratatui::style::{Color, Modifier, Style};

use crate::settings::ThemePreference;
use crate::ui::{CORAL, ELECTRIC_PURPLE, ELECTRIC_YELLOW, ERROR_RED, NEON_CYAN, SUCCESS_GREEN};

// ═══════════════════════════════════════════════════════════════════════════════
// Dark Surfaces
// ═══════════════════════════════════════════════════════════════════════════════

const BG_DARK: Color = Color::Rgb(22, 22, 30);
const BG_HIGHLIGHT_DARK: Color = Color::Rgb(40, 42, 54);
const TEXT_PRIMARY_DARK: Color = Color::Rgb(248, 248, 242);
const TEXT_DIM_DARK: Color = Color::Rgb(98, 114, 164);
const TEXT_MUTED_DARK: Color = Color::Rgb(68, 71, 90);

// ═══════════════════════════════════════════════════════════════════════════════
// Light Surfaces
// ═══════════════════════════════════════════════════════════════════════════════

const BG_LIGHT: Color = Color::Rgb(250, 248, 252);
const BG_HIGHLIGHT_LIGHT: Color = Color::Rgb(232, 226, 242);
const TEXT_PRIMARY_LIGHT: Color = Color::Rgb(40, 42, 54);
const TEXT_DIM_LIGHT: Color = Color::Rgb(98, 104, 140);
const TEXT_MUTED_LIGHT: Color = Color::Rgb(190, 190, 204);

/// Colors for one theme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub highlight: Color,
    pub text: Color,
    pub dim: Color,
    pub muted: Color,
    pub accent: Color,
    pub focus: Color,
    pub count: Color,
    pub warning: Color,
    pub success: Color,
    pub error: Color,
}

const DARK: Palette = Palette {
    background: BG_DARK,
    highlight: BG_HIGHLIGHT_DARK,
    text: TEXT_PRIMARY_DARK,
    dim: TEXT_DIM_DARK,
    muted: TEXT_MUTED_DARK,
    accent: ELECTRIC_PURPLE,
    focus: NEON_CYAN,
    count: CORAL,
    warning: ELECTRIC_YELLOW,
    success: SUCCESS_GREEN,
    error: ERROR_RED,
};

// Neon tones wash out on white, so the light palette darkens them
const LIGHT: Palette = Palette {
    background: BG_LIGHT,
    highlight: BG_HIGHLIGHT_LIGHT,
    text: TEXT_PRIMARY_LIGHT,
    dim: TEXT_DIM_LIGHT,
    muted: TEXT_MUTED_LIGHT,
    accent: Color::Rgb(142, 36, 170),
    focus: Color::Rgb(0, 128, 128),
    count: Color::Rgb(196, 38, 124),
    warning: Color::Rgb(166, 112, 0),
    success: Color::Rgb(24, 140, 64),
    error: Color::Rgb(198, 40, 40),
};

impl Palette {
    pub fn for_theme(theme: ThemePreference) -> Self {
        match theme {
            ThemePreference::Dark => DARK,
            ThemePreference::Light => LIGHT,
        }
    }

    pub fn base(&self) -> Style {
        Style::default().fg(self.text).bg(self.background)
    }

    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn dimmed(&self) -> Style {
        Style::default().fg(self.dim)
    }

    pub fn disabled(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn key(&self) -> Style {
        Style::default().fg(self.focus).add_modifier(Modifier::BOLD)
    }

    pub fn border(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.focus)
        } else {
            Style::default().fg(self.muted)
        }
    }

    pub fn cursor(&self) -> Style {
        Style::default().bg(self.highlight).fg(self.focus)
    }

    pub fn selected(&self) -> Style {
        Style::default()
            .fg(self.success)
            .add_modifier(Modifier::BOLD)
    }

    pub fn success(&self) -> Style {
        Style::default().fg(self.success)
    }

    pub fn warning(&self) -> Style {
        Style::default().fg(self.warning)
    }

    pub fn error(&self) -> Style {
        Style::default().fg(self.error).add_modifier(Modifier::BOLD)
    }

    pub fn count(&self) -> Style {
        Style::default().fg(self.count)
    }
}
