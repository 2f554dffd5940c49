// SPDX-FileCopyrightText: 2026 the notemap authors
// SPDX-License-Identifier: MIT

use std::{env, error::Error, fmt};

use ratatui::style::{Color, Modifier, Style};

use crate::model::{LinkKind, PALETTE_SIZE};
use crate::render::CellStyle;

/// Maps renderer cell styles onto terminal styles.
///
/// A palette override can be supplied via `NOTEMAP_PALETTE` as eight
/// comma-separated `#RRGGBB` node colors.
#[derive(Debug, Clone, Default)]
pub(crate) struct TuiTheme {
    node_palette: Option<[Color; PALETTE_SIZE as usize]>,
}

const DEFAULT_NODE_PALETTE: [Color; PALETTE_SIZE as usize] = [
    Color::Cyan,
    Color::LightGreen,
    Color::Yellow,
    Color::LightMagenta,
    Color::LightBlue,
    Color::LightRed,
    Color::LightCyan,
    Color::White,
];

impl TuiTheme {
    pub(crate) fn from_env() -> Result<Self, ThemeError> {
        let node_palette = palette_override_from_env()?;
        Ok(Self { node_palette })
    }

    fn node_color(&self, color: u8) -> Color {
        let idx = (color % PALETTE_SIZE) as usize;
        match &self.node_palette {
            Some(palette) => palette[idx],
            None => DEFAULT_NODE_PALETTE[idx],
        }
    }

    fn edge_color(kind: LinkKind) -> Color {
        match kind {
            LinkKind::Internal => Color::Gray,
            LinkKind::Tag => Color::DarkGray,
            LinkKind::Similarity => Color::Blue,
            LinkKind::Hierarchical => Color::Green,
        }
    }

    pub(crate) fn cell_style(&self, style: CellStyle) -> Style {
        match style {
            CellStyle::Blank => Style::default(),
            CellStyle::Edge { kind } => Style::default().fg(Self::edge_color(kind)),
            CellStyle::Node {
                color,
                selected,
                hovered,
            } => {
                let mut out = Style::default().fg(self.node_color(color));
                if selected {
                    out = out.add_modifier(Modifier::REVERSED | Modifier::BOLD);
                } else if hovered {
                    out = out.add_modifier(Modifier::BOLD);
                }
                out
            }
            CellStyle::Label => Style::default().fg(Color::White),
            CellStyle::Chrome => Style::default().fg(Color::DarkGray),
        }
    }

    pub(crate) fn error_style(&self) -> Style {
        Style::default().fg(Color::Red)
    }

    pub(crate) fn status_style(&self) -> Style {
        Style::default().fg(Color::Gray)
    }

    pub(crate) fn status_key_style(&self) -> Style {
        Style::default().fg(Color::Cyan)
    }
}

fn palette_override_from_env() -> Result<Option<[Color; PALETTE_SIZE as usize]>, ThemeError> {
    let value = match env::var("NOTEMAP_PALETTE") {
        Ok(value) => value,
        Err(env::VarError::NotPresent) => return Ok(None),
        Err(env::VarError::NotUnicode(_)) => {
            return Err(ThemeError::InvalidEnv {
                name: "NOTEMAP_PALETTE".to_string(),
                value: "<non-unicode>".to_string(),
            });
        }
    };

    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    parse_palette_csv(trimmed).map(Some).map_err(|error| ThemeError::InvalidEnv {
        name: "NOTEMAP_PALETTE".to_string(),
        value: format!("{trimmed} ({error})"),
    })
}

fn parse_palette_csv(value: &str) -> Result<[Color; PALETTE_SIZE as usize], String> {
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    if parts.len() != PALETTE_SIZE as usize {
        return Err(format!(
            "expected {} comma-separated colors, got {}",
            PALETTE_SIZE,
            parts.len()
        ));
    }

    let mut palette = [Color::Reset; PALETTE_SIZE as usize];
    for (idx, part) in parts.iter().enumerate() {
        palette[idx] = parse_hex_color(part)?;
    }
    Ok(palette)
}

fn parse_hex_color(value: &str) -> Result<Color, String> {
    let trimmed = value.trim();
    let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);
    if hex.len() != 6 || !hex.chars().all(|ch| ch.is_ascii_hexdigit()) {
        return Err(format!("invalid hex color: {trimmed} (expected #RRGGBB)"));
    }
    let rgb = u32::from_str_radix(hex, 16).map_err(|_| format!("invalid hex color: {trimmed}"))?;
    Ok(Color::Rgb(
        ((rgb >> 16) & 0xFF) as u8,
        ((rgb >> 8) & 0xFF) as u8,
        (rgb & 0xFF) as u8,
    ))
}

#[derive(Debug, Clone)]
pub(crate) enum ThemeError {
    InvalidEnv { name: String, value: String },
}

impl fmt::Display for ThemeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEnv { name, value } => write!(f, "invalid env {name}={value}"),
        }
    }
}

impl Error for ThemeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_csv_parses_eight_colors() {
        let palette = parse_palette_csv(
            "#111111,#222222,#333333,#444444,#555555,#666666,#777777,#888888",
        )
        .expect("palette");
        assert_eq!(palette[0], Color::Rgb(0x11, 0x11, 0x11));
        assert_eq!(palette[7], Color::Rgb(0x88, 0x88, 0x88));
    }

    #[test]
    fn palette_csv_rejects_wrong_arity() {
        let err = parse_palette_csv("#111111,#222222").unwrap_err();
        assert!(err.contains("expected"));
    }

    #[test]
    fn node_colors_wrap_around_the_palette() {
        let theme = TuiTheme::default();
        assert_eq!(theme.node_color(0), theme.node_color(PALETTE_SIZE));
    }
}
