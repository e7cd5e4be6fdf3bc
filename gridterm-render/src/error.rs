//! Typed error type for gridterm-render.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("grid dimensions ({cols}x{rows}) exceed the device's max storage buffer binding size ({limit} bytes)")]
    GridTooLarge { cols: u16, rows: u16, limit: u64 },
}
