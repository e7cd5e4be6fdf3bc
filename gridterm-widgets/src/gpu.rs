//! The abstract GPU context a widget renders through.
//!
//! Device/surface acquisition is an external collaborator (§1): this core
//! only ever consumes a `wgpu::Device` / `wgpu::Queue` / surface format that
//! the host already created, never creates a surface or adapter itself.

/// Everything a widget (or the cell renderer) needs to issue GPU work into
/// the frame the host is currently compositing.
pub trait GpuContext {
    fn device(&self) -> &wgpu::Device;
    fn queue(&self) -> &wgpu::Queue;
    fn surface_format(&self) -> wgpu::TextureFormat;
}

/// A widget's on-screen rectangle in physical pixels, already resolved from
/// its cell-space rectangle and the current cell size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl PixelRect {
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.x + self.w && y >= self.y && y < self.y + self.h
    }
}
