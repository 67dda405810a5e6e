//! Theme loading: btop-style `theme[key]="value"` and hex → ratatui Color.

use ratatui::style::Color;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Token colours, one per palette index.
pub const TOKEN_COLORS: usize = matchtui::engine::MAX_PALETTE_SIZE as usize;

/// Candy palette and UI colours.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Token colours, indexed by token id.
    pub tokens: [Color; TOKEN_COLORS],
    /// Playfield background.
    pub bg: Color,
    /// Board outline.
    pub div_line: Color,
    /// Text (score, moves).
    pub main_fg: Color,
    pub title: Color,
    /// Selected-cell overlay.
    pub highlight: Color,
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

impl Default for Theme {
    fn default() -> Self {
        Self::candy_default()
    }
}

const CANDY: [Color; TOKEN_COLORS] = [
    Color::Rgb(0xFF, 0x69, 0xB4), // hot pink
    Color::Rgb(0x98, 0xFF, 0x98), // mint
    Color::Rgb(0xFF, 0x45, 0x00), // orange red
    Color::Rgb(0x93, 0x70, 0xDB), // purple
    Color::Rgb(0xFF, 0xFF, 0x99), // pale yellow
    Color::Rgb(0x87, 0xCE, 0xEB), // sky blue
    Color::Rgb(0xFF, 0xA0, 0x7A), // salmon
    Color::Rgb(0x40, 0xE0, 0xD0), // turquoise
];

const HIGH_CONTRAST: [Color; TOKEN_COLORS] = [
    Color::Rgb(0x00, 0xFF, 0x00),
    Color::Rgb(0xFF, 0xFF, 0x00),
    Color::Rgb(0xFF, 0x00, 0x00),
    Color::Rgb(0x00, 0x88, 0xFF),
    Color::Rgb(0xFF, 0x00, 0xFF),
    Color::Rgb(0x00, 0xFF, 0xFF),
    Color::Rgb(0xFF, 0xFF, 0xFF),
    Color::Rgb(0xFF, 0x88, 0x00),
];

// Paul Tol's vibrant scheme plus two neutrals.
const COLORBLIND: [Color; TOKEN_COLORS] = [
    Color::Rgb(0x00, 0x77, 0xBB),
    Color::Rgb(0xEE, 0x77, 0x33),
    Color::Rgb(0x00, 0x99, 0x88),
    Color::Rgb(0xCC, 0x33, 0x11),
    Color::Rgb(0xEE, 0x33, 0x77),
    Color::Rgb(0xBB, 0xBB, 0x00),
    Color::Rgb(0x33, 0xBB, 0xEE),
    Color::Rgb(0xBB, 0xBB, 0xBB),
];

const GOLD: Color = Color::Rgb(0xFF, 0xD7, 0x00);

impl Theme {
    /// Candy colours on a dark background with gold outlines.
    pub fn candy_default() -> Self {
        Self {
            tokens: CANDY,
            bg: Color::Rgb(0x1E, 0x1E, 0x2E),
            div_line: GOLD,
            main_fg: Color::Rgb(0xE0, 0xE0, 0xE0),
            title: GOLD,
            highlight: GOLD,
        }
    }

    /// Load theme from a btop-style file: `theme[key]="value"` or `theme[key]='value'`.
    /// Falls back to candy defaults if path is None or the file is missing.
    /// `palette` selects colour variant: Normal (theme), HighContrast, or Colorblind.
    pub fn load(path: Option<&Path>, palette: crate::Palette) -> Result<Self, ThemeError> {
        let path = match path {
            Some(p) if p.exists() => p,
            _ => return Ok(Self::default_for_palette(palette)),
        };
        let s = std::fs::read_to_string(path)?;
        let map = parse_theme_file(&s);
        let mut theme = Self::from_map(&map);
        theme.apply_palette(palette);
        Ok(theme)
    }

    /// Default theme for a palette when no file is loaded.
    pub fn default_for_palette(palette: crate::Palette) -> Self {
        let mut t = Self::candy_default();
        t.apply_palette(palette);
        t
    }

    /// Override token colours for high-contrast or colorblind play.
    pub fn apply_palette(&mut self, palette: crate::Palette) {
        match palette {
            crate::Palette::Normal => {}
            crate::Palette::HighContrast => self.tokens = HIGH_CONTRAST,
            crate::Palette::Colorblind => self.tokens = COLORBLIND,
        }
    }

    fn from_map(map: &HashMap<String, String>) -> Self {
        let get = |key: &str| map.get(key).and_then(|v| parse_hex(v).ok());
        let defaults = Self::candy_default();
        let mut tokens = defaults.tokens;
        for (i, slot) in tokens.iter_mut().enumerate() {
            if let Some(c) = get(&format!("token{i}")) {
                *slot = c;
            }
        }
        Self {
            tokens,
            bg: get("bg").or_else(|| get("meter_bg")).unwrap_or(defaults.bg),
            div_line: get("div_line").unwrap_or(defaults.div_line),
            main_fg: get("main_fg").unwrap_or(defaults.main_fg),
            title: get("title").unwrap_or(defaults.title),
            highlight: get("highlight").or_else(|| get("hi_fg")).unwrap_or(defaults.highlight),
        }
    }

    /// Colour for a token id.
    #[inline]
    pub fn token_color(&self, token: u8) -> Color {
        self.tokens[(token as usize) % TOKEN_COLORS]
    }
}

/// Mix `a` towards `b` by `t` in 0.0..=1.0. Non-RGB colours are returned unchanged.
pub fn blend(a: Color, b: Color, t: f32) -> Color {
    match (a, b) {
        (Color::Rgb(r1, g1, b1), Color::Rgb(r2, g2, b2)) => {
            let mix = |x: u8, y: u8| (f32::from(x) + (f32::from(y) - f32::from(x)) * t).round() as u8;
            Color::Rgb(mix(r1, r2), mix(g1, g2), mix(b1, b2))
        }
        _ => a,
    }
}

/// Parse btop-style theme file into key -> value map.
fn parse_theme_file(s: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in s.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(stripped) = line.strip_prefix("theme[") {
            if let Some(end) = stripped.find(']') {
                let key = stripped[..end].trim();
                let rest = stripped[end + 1..].trim();
                if let Some(eq) = rest.find('=') {
                    let value = rest[eq + 1..]
                        .trim()
                        .trim_matches('"')
                        .trim_matches('\'')
                        .to_string();
                    if !value.is_empty() {
                        map.insert(key.to_string(), value);
                    }
                }
            }
        }
    }
    map
}

/// Parse hex colour "#RRGGBB" or "#RGB" into ratatui Color.
pub fn parse_hex(s: &str) -> Result<Color, ThemeError> {
    let s = s.trim().trim_start_matches('#');
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&s[range], 16).map_err(|_| ThemeError::InvalidHex(s.to_string()))
    };
    let (r, g, b) = match s.len() {
        6 if s.is_ascii() => (channel(0..2)?, channel(2..4)?, channel(4..6)?),
        3 if s.is_ascii() => (channel(0..1)? * 17, channel(1..2)? * 17, channel(2..3)? * 17),
        _ => return Err(ThemeError::InvalidHex(s.to_string())),
    };
    Ok(Color::Rgb(r, g, b))
}
