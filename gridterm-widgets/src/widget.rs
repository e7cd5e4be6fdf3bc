//! The widget contract (§4.3).

use crate::gpu::{GpuContext, PixelRect};

/// Keyboard/mouse modifier bits, forwarded from the (external) window layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Mods {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub logo: bool,
}

/// Mirrors a typical "press/release/repeat" key action enum from a window toolkit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Press,
    Release,
    Repeat,
}

/// A grid-addressed sub-renderer instantiated by a [`crate::plugin::Plugin`].
///
/// Implementations are the black-box collaborators described in §1 (e.g. the
/// ImGui-based overlay widget) — this crate only defines and drives the
/// contract, it does not ship any non-trivial widget implementations itself.
pub trait Widget: Send {
    /// Initialise (or re-initialise, for `U` updates) from a decoded payload.
    fn init(&mut self, payload: &[u8]) -> anyhow::Result<()>;

    /// Release any resources. Called once, right before the widget is dropped.
    fn dispose(&mut self) {}

    /// Draw into the shared frame target. Implementations issue their own
    /// sub-commands into `encoder`, compositing with alpha over the existing
    /// image (the grid pass has already run with `loadOp = Load` semantics
    /// preserved for whatever the widget draws next).
    fn render(
        &mut self,
        gpu: &dyn GpuContext,
        encoder: &mut wgpu::CommandEncoder,
        frame_view: &wgpu::TextureView,
        screen_size: (u32, u32),
        pixel_rect: PixelRect,
    ) -> anyhow::Result<()>;

    fn on_resize(&mut self, _new_pixel_w: u32, _new_pixel_h: u32) {}

    /// `local_x`/`local_y` are relative to the widget's top-left pixel.
    fn on_mouse_move(&mut self, _local_x: f32, _local_y: f32) -> bool {
        false
    }

    /// `button == -1, pressed == false` is a synthetic "focus lost" notification.
    fn on_mouse_button(&mut self, _button: i32, _pressed: bool) -> bool {
        false
    }

    fn on_mouse_scroll(&mut self, _dx: f32, _dy: f32, _mods: Mods) -> bool {
        false
    }

    fn on_key(&mut self, _key: i32, _scancode: i32, _action: KeyAction, _mods: Mods) -> bool {
        false
    }

    fn on_char(&mut self, _codepoint: u32) -> bool {
        false
    }

    fn wants_keyboard(&self) -> bool {
        false
    }

    fn wants_mouse(&self) -> bool {
        false
    }
}
