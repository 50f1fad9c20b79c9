//! Named color palettes for the board renderer.
//!
//! Every drawable entity takes its color from the active theme so the
//! scenes never hardcode RGB values.

use crate::game::AppleKind;
use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// Selectable palette. The choice persists in the player profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Theme {
    Classic,
    Midnight,
    Ember,
}

impl Theme {
    pub const ALL: [Theme; 3] = [Theme::Classic, Theme::Midnight, Theme::Ember];

    pub fn name(&self) -> &'static str {
        match self {
            Theme::Classic => "Classic",
            Theme::Midnight => "Midnight",
            Theme::Ember => "Ember",
        }
    }

    /// The next palette in cycling order.
    pub fn next(&self) -> Theme {
        let idx = Theme::ALL.iter().position(|t| t == self).unwrap_or(0);
        Theme::ALL[(idx + 1) % Theme::ALL.len()]
    }

    /// Resolved colors for one frame.
    pub fn colors(&self) -> ThemeColors {
        match self {
            Theme::Classic => ThemeColors {
                background: Color::Rgb(12, 12, 18),
                border: Color::Rgb(80, 80, 80),
                player_head: Color::Rgb(100, 255, 100),
                player_bright: (50.0, 220.0, 50.0),
                player_dim: (20.0, 80.0, 20.0),
                npc: Color::Rgb(200, 90, 220),
                npc_head: Color::Rgb(240, 130, 255),
                obstacle: Color::Rgb(110, 110, 110),
                apple_normal: Color::Rgb(255, 80, 40),
                apple_gold: Color::Rgb(255, 210, 60),
                apple_speed: Color::Rgb(80, 180, 255),
                apple_ghost: Color::Rgb(190, 190, 230),
            },
            Theme::Midnight => ThemeColors {
                background: Color::Rgb(5, 8, 20),
                border: Color::Rgb(60, 70, 110),
                player_head: Color::Rgb(120, 220, 255),
                player_bright: (60.0, 170.0, 230.0),
                player_dim: (25.0, 60.0, 90.0),
                npc: Color::Rgb(220, 160, 70),
                npc_head: Color::Rgb(255, 200, 110),
                obstacle: Color::Rgb(70, 80, 100),
                apple_normal: Color::Rgb(255, 100, 120),
                apple_gold: Color::Rgb(250, 220, 90),
                apple_speed: Color::Rgb(130, 255, 210),
                apple_ghost: Color::Rgb(180, 180, 210),
            },
            Theme::Ember => ThemeColors {
                background: Color::Rgb(20, 10, 8),
                border: Color::Rgb(110, 70, 50),
                player_head: Color::Rgb(255, 200, 90),
                player_bright: (230.0, 140.0, 40.0),
                player_dim: (100.0, 50.0, 20.0),
                npc: Color::Rgb(120, 190, 120),
                npc_head: Color::Rgb(160, 240, 160),
                obstacle: Color::Rgb(90, 70, 60),
                apple_normal: Color::Rgb(255, 70, 50),
                apple_gold: Color::Rgb(255, 230, 110),
                apple_speed: Color::Rgb(110, 190, 255),
                apple_ghost: Color::Rgb(210, 190, 180),
            },
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::Classic
    }
}

/// Concrete colors for every drawable entity.
#[derive(Debug, Clone, Copy)]
pub struct ThemeColors {
    pub background: Color,
    pub border: Color,
    pub player_head: Color,
    /// Gradient endpoints for the player body, brightest at the head.
    pub player_bright: (f64, f64, f64),
    pub player_dim: (f64, f64, f64),
    pub npc: Color,
    pub npc_head: Color,
    pub obstacle: Color,
    pub apple_normal: Color,
    pub apple_gold: Color,
    pub apple_speed: Color,
    pub apple_ghost: Color,
}

impl ThemeColors {
    pub fn apple(&self, kind: AppleKind) -> Color {
        match kind {
            AppleKind::Normal => self.apple_normal,
            AppleKind::Gold => self.apple_gold,
            AppleKind::Speed => self.apple_speed,
            AppleKind::Ghost => self.apple_ghost,
        }
    }

    /// Interpolated body color for segment `index` of a `len`-segment snake.
    pub fn player_body(&self, index: usize, len: usize) -> Color {
        let t = index as f64 / (len - 1).max(1) as f64;
        let r = (self.player_bright.0 * (1.0 - t) + self.player_dim.0 * t) as u8;
        let g = (self.player_bright.1 * (1.0 - t) + self.player_dim.1 * t) as u8;
        let b = (self.player_bright.2 * (1.0 - t) + self.player_dim.2 * t) as u8;
        Color::Rgb(r, g, b)
    }
}
