// SPDX-FileCopyrightText: 2026 the notemap authors
// SPDX-License-Identifier: MIT

use crate::model::LinkKind;

/// Per-cell styling class. The shell maps these onto terminal styles; the
/// renderer itself stays backend-free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellStyle {
    #[default]
    Blank,
    Edge {
        kind: LinkKind,
    },
    Node {
        color: u8,
        selected: bool,
        hovered: bool,
    },
    Label,
    Chrome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub style: CellStyle,
}

/// A fixed-size character grid, the renderer's output surface.
#[derive(Debug, Clone, PartialEq)]
pub struct CellGrid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl CellGrid {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![
                Cell {
                    ch: ' ',
                    style: CellStyle::Blank
                };
                width * height
            ],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&Cell> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(&self.cells[y * self.width + x])
    }

    /// Out-of-bounds writes are silently clipped; the simulation routinely
    /// pushes nodes past the visible canvas.
    pub fn set(&mut self, x: i32, y: i32, ch: char, style: CellStyle) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return;
        }
        self.cells[y * self.width + x] = Cell { ch, style };
    }

    pub fn write_str(&mut self, x: i32, y: i32, text: &str, style: CellStyle) {
        for (offset, ch) in text.chars().enumerate() {
            self.set(x + offset as i32, y, ch, style);
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width.max(1))
    }

    /// Plain-text dump with trailing blanks trimmed, for tests.
    pub fn to_text(&self) -> String {
        let mut lines: Vec<String> = self
            .rows()
            .map(|row| {
                row.iter()
                    .map(|cell| cell.ch)
                    .collect::<String>()
                    .trim_end_matches(' ')
                    .to_owned()
            })
            .collect();
        while matches!(lines.last(), Some(line) if line.is_empty()) {
            lines.pop();
        }
        lines.join("\n")
    }
}

pub(crate) fn truncate_with_ellipsis(text: &str, max_len: usize) -> String {
    if max_len == 0 {
        return String::new();
    }
    if text.chars().count() <= max_len {
        return text.to_owned();
    }
    if max_len == 1 {
        return "…".to_owned();
    }
    let mut out: String = text.chars().take(max_len - 1).collect();
    out.push('…');
    out
}
