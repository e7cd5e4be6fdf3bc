//! Component D: the widget manager and its private OSC 99999 protocol.
//!
//! A widget is a grid-addressed sub-renderer created/updated/destroyed by the
//! PTY stream itself rather than by the window layer — see [`widget::Widget`]
//! for the contract and [`manager::WidgetManager`] for the registry that
//! drives it.

#[cfg(feature = "debug-widget-frames")]
pub mod debug_frame;
pub mod error;
pub mod gpu;
pub mod manager;
pub mod osc;
pub mod plugin;
pub mod record;
pub mod widget;

pub use error::WidgetError;
pub use gpu::{GpuContext, PixelRect};
pub use manager::{OscResponse, WidgetManager};
pub use osc::{base94_decode, base94_encode, OscCommand, Selector, VENDOR_ID};
pub use plugin::{CustomGlyphPlugin, Plugin, WidgetFactory};
pub use record::{PositionMode, Screen, SizeSpec, WidgetRecord};
pub use widget::{KeyAction, Mods, Widget};
