//! Map renderers.
//!
//! A [`MapRenderer`] turns a raw [`CellGrid`] into something a display can
//! consume.  Two renderers ship with the crate:
//!
//! - [`AsciiRenderer`] – one text row per grid row, +Y up, unset cells shown
//!   as a placeholder glyph.  Used by `Frame`'s `Display` impl.
//! - [`OccupancyRenderer`] – classifies every cell as
//!   [`Occupancy::Occupied`], [`Occupancy::Free`] or [`Occupancy::Unknown`]
//!   by comparing its state tag with a configured "occupied" tag.
//!
//! # Example
//!
//! ```rust
//! use hawkeye_mapping::render::{MapRenderer, Occupancy, OccupancyRenderer};
//! use hawkeye_types::MapObject;
//!
//! let cells = vec![vec![Some(MapObject::new("1")), Some(MapObject::new("0")), None]];
//! let grid = OccupancyRenderer::default().render(&cells);
//! assert_eq!(grid[0], vec![Occupancy::Occupied, Occupancy::Free, Occupancy::Unknown]);
//! ```

use hawkeye_types::{CellGrid, MapObject};

/// Something that can draw a cell grid.
pub trait MapRenderer {
    type Output;

    /// Render `cells` (height-major, `cells[y][x]`).
    fn render(&self, cells: &CellGrid) -> Self::Output;

    /// Short name of the rendering style, e.g. `"ascii"`.
    fn render_type(&self) -> &str;
}

// ────────────────────────────────────────────────────────────────────────────
// AsciiRenderer
// ────────────────────────────────────────────────────────────────────────────

/// Renders each set cell as its state tag, top row (`y = height - 1`) first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AsciiRenderer {
    /// Printed for cells that were never written.
    pub unset_glyph: char,
}

impl AsciiRenderer {
    pub fn new(unset_glyph: char) -> Self {
        Self { unset_glyph }
    }
}

impl Default for AsciiRenderer {
    fn default() -> Self {
        Self::new('?')
    }
}

impl MapRenderer for AsciiRenderer {
    type Output = String;

    fn render(&self, cells: &CellGrid) -> String {
        let mut out = String::new();
        for row in cells.iter().rev() {
            for cell in row {
                match cell {
                    Some(cell) => out.push_str(cell.state()),
                    None => out.push(self.unset_glyph),
                }
            }
            out.push('\n');
        }
        out
    }

    fn render_type(&self) -> &str {
        "ascii"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// OccupancyRenderer
// ────────────────────────────────────────────────────────────────────────────

/// Classification of one cell for occupancy displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Occupancy {
    Occupied,
    Free,
    /// Never observed.
    Unknown,
}

impl Occupancy {
    /// Single-character form used by text displays.
    pub fn glyph(self) -> char {
        match self {
            Occupancy::Occupied => '#',
            Occupancy::Free => '.',
            Occupancy::Unknown => ' ',
        }
    }
}

/// Maps cells whose state equals `occupied_tag` to [`Occupancy::Occupied`]
/// and every other set cell to [`Occupancy::Free`].
///
/// Output rows keep the input order (`grid[y][x]`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupancyRenderer {
    pub occupied_tag: String,
}

impl OccupancyRenderer {
    pub fn new(occupied_tag: impl Into<String>) -> Self {
        Self {
            occupied_tag: occupied_tag.into(),
        }
    }

    fn classify(&self, cell: Option<&MapObject>) -> Occupancy {
        match cell {
            Some(c) if c.state() == self.occupied_tag => Occupancy::Occupied,
            Some(_) => Occupancy::Free,
            None => Occupancy::Unknown,
        }
    }
}

impl Default for OccupancyRenderer {
    fn default() -> Self {
        Self::new("1")
    }
}

impl MapRenderer for OccupancyRenderer {
    type Output = Vec<Vec<Occupancy>>;

    fn render(&self, cells: &CellGrid) -> Vec<Vec<Occupancy>> {
        cells
            .iter()
            .map(|row| row.iter().map(|c| self.classify(c.as_ref())).collect())
            .collect()
    }

    fn render_type(&self) -> &str {
        "occupancy"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> CellGrid {
        vec![
            vec![Some(MapObject::new("a")), None],
            vec![Some(MapObject::new("1")), Some(MapObject::new("b"))],
        ]
    }

    #[test]
    fn ascii_prints_last_row_first() {
        assert_eq!(AsciiRenderer::default().render(&grid()), "1b\na?\n");
    }

    #[test]
    fn ascii_uses_configured_unset_glyph() {
        let out = AsciiRenderer::new('~').render(&grid());
        assert!(out.ends_with("a~\n"));
    }

    #[test]
    fn occupancy_classifies_by_tag() {
        let out = OccupancyRenderer::default().render(&grid());
        assert_eq!(out[0], vec![Occupancy::Free, Occupancy::Unknown]);
        assert_eq!(out[1], vec![Occupancy::Occupied, Occupancy::Free]);
    }

    #[test]
    fn occupancy_with_custom_tag() {
        let out = OccupancyRenderer::new("b").render(&grid());
        assert_eq!(out[1][1], Occupancy::Occupied);
        assert_eq!(out[1][0], Occupancy::Free);
    }

    #[test]
    fn render_types_are_named() {
        assert_eq!(AsciiRenderer::default().render_type(), "ascii");
        assert_eq!(OccupancyRenderer::default().render_type(), "occupancy");
        assert_eq!(Occupancy::Occupied.glyph(), '#');
    }

    #[test]
    fn empty_grid_renders_empty() {
        assert_eq!(AsciiRenderer::default().render(&Vec::new()), "");
        assert!(OccupancyRenderer::default().render(&Vec::new()).is_empty());
    }
}
