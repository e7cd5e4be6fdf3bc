//! Component C: PTY lifecycle, ANSI/VT decoding, and the cell-grid sync step.
//!
//! [`Terminal`] is the entry point: it owns the PTY, the private [`screen`]
//! planes the decoder mutates, and the scrollback ring, and it syncs decoded
//! state into a [`gridterm_grid::Grid`] each [`Terminal::drain_pty`] call.

pub mod color;
pub mod decoder;
pub mod error;
pub mod pty;
pub mod screen;
pub mod selection;
pub mod terminal;

pub use color::SgrColor;
pub use decoder::MouseMode;
pub use error::TermError;
pub use selection::{Selection, SelectionMode};
pub use terminal::{SpecialKey, Terminal, BLINK_INTERVAL_MS};
