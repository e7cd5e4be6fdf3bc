//! Uniform payload and the external font-atlas handles the renderer samples
//! but does not itself generate (§1: atlas packing is an external collaborator).

use bytemuck::{Pod, Zeroable};

/// Per-frame uniforms, written with a single `writeBuffer` call (§4.4).
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
#[repr(C)]
pub struct Uniforms {
    pub screen_size: [f32; 2],
    pub cell_size: [f32; 2],
    pub grid_size: [u32; 2],
    pub msdf_pixel_range: f32,
    pub scale_factor: f32,
    pub cursor_col: u32,
    pub cursor_row: u32,
    pub cursor_visible: u32,
    pub _pad: u32,
}

/// Glyph atlases, metadata buffers, and cell metrics supplied by the host's
/// font layer. The core never rasterizes a font or packs an atlas itself.
pub struct FontResources {
    pub msdf_atlas_view: wgpu::TextureView,
    pub msdf_sampler: wgpu::Sampler,
    pub glyph_metadata_buffer: wgpu::Buffer,
    pub emoji_atlas_view: wgpu::TextureView,
    pub emoji_sampler: wgpu::Sampler,
    pub emoji_metadata_buffer: wgpu::Buffer,
    pub msdf_pixel_range: f32,
}
