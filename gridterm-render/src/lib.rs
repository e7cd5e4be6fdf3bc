//! Component E: single-pass GPU cell renderer.
//!
//! [`CellRenderer`] draws the whole grid — text, MSDF glyphs, emoji, and
//! procedural shader-glyphs — in one fullscreen-triangle draw call, reading
//! packed [`gridterm_grid::Cell`] data from a storage buffer. Widgets render
//! afterward, in the same command encoder, via `gridterm_widgets`.

pub mod error;
pub mod pipeline;
pub mod renderer;
pub mod types;

pub use error::RenderError;
pub use renderer::CellRenderer;
pub use types::{FontResources, Uniforms};
