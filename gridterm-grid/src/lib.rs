//! Component A (Cell Grid) and Component B (Scrollback Ring) of the gridterm
//! terminal emulator core: a plain-old-data cell grid suitable for bulk GPU
//! upload, plus the bounded retired-line ring that feeds it.
//!
//! This crate intentionally knows nothing about PTYs, escape sequences, or
//! widgets — it is the leaf of the dependency graph (see the design notes on
//! cyclic-shape avoidance) so that it stays a POD structure any other
//! component can read or write through narrow setters.

pub mod cell;
pub mod grid;
pub mod rect;
pub mod scrollback;

pub use cell::{
    Cell, CellStyle, UnderlineStyle, GLYPH_CUSTOM_END, GLYPH_CUSTOM_START, GLYPH_SPACE,
    GLYPH_WIDE_CONT, GLYPH_WIDGET, SHADER_GLYPH_END, SHADER_GLYPH_START,
};
pub use grid::{Grid, MAX_COLS, MAX_ROWS};
pub use rect::Rect;
pub use scrollback::{ScrollbackLine, ScrollbackRing, StyleRun};
