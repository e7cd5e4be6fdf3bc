//! [`CellRenderer`]: owns the pipeline, uniform buffer, and cell storage
//! buffer, and records the grid draw pass each frame.

use bytemuck::bytes_of;
use gridterm_grid::Grid;
use gridterm_widgets::GpuContext;
use wgpu::util::DeviceExt;

use crate::error::RenderError;
use crate::pipeline::{create_bind_group, create_bind_group_layout, create_cell_pipeline};
use crate::types::{FontResources, Uniforms};

/// Bytes per packed [`gridterm_grid::Cell`] as laid out in the storage buffer: 3 u32 words.
const CELL_WORDS: u64 = 3;

pub struct CellRenderer {
    bind_group_layout: wgpu::BindGroupLayout,
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    cell_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    font: FontResources,
    cols: u16,
    rows: u16,
    cell_size: (f32, f32),
}

impl CellRenderer {
    pub fn new(
        gpu: &dyn GpuContext,
        font: FontResources,
        cell_size: (f32, f32),
        cols: u16,
        rows: u16,
    ) -> Result<Self, RenderError> {
        let device = gpu.device();
        check_grid_fits(device, cols, rows)?;

        let bind_group_layout = create_bind_group_layout(device);
        let pipeline = create_cell_pipeline(device, gpu.surface_format(), &bind_group_layout);

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("gridterm uniform buffer"),
            size: std::mem::size_of::<Uniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let cell_buffer = create_cell_buffer(device, cols, rows);
        let bind_group =
            create_bind_group(device, &bind_group_layout, &uniform_buffer, &cell_buffer, &font);

        Ok(Self {
            bind_group_layout,
            pipeline,
            uniform_buffer,
            cell_buffer,
            bind_group,
            font,
            cols,
            rows,
            cell_size,
        })
    }

    /// Swaps in a freshly loaded font atlas (e.g. after a DPI change) and rebuilds the bind group.
    pub fn set_font(&mut self, gpu: &dyn GpuContext, font: FontResources) {
        self.font = font;
        self.bind_group = create_bind_group(
            gpu.device(),
            &self.bind_group_layout,
            &self.uniform_buffer,
            &self.cell_buffer,
            &self.font,
        );
    }

    pub fn resize(&mut self, gpu: &dyn GpuContext, cols: u16, rows: u16) -> Result<(), RenderError> {
        if cols == self.cols && rows == self.rows {
            return Ok(());
        }
        check_grid_fits(gpu.device(), cols, rows)?;
        self.cols = cols;
        self.rows = rows;
        self.cell_buffer = create_cell_buffer(gpu.device(), cols, rows);
        self.bind_group = create_bind_group(
            gpu.device(),
            &self.bind_group_layout,
            &self.uniform_buffer,
            &self.cell_buffer,
            &self.font,
        );
        Ok(())
    }

    /// Draws the grid pass. Uploads the full cell buffer whenever the grid has damage,
    /// since partial storage-buffer writes gain nothing over one contiguous `writeBuffer`
    /// at this scale (per §4.4). Clears the target; the caller records the widget pass
    /// afterward in the same encoder with `LoadOp::Load`.
    pub fn render(
        &mut self,
        gpu: &dyn GpuContext,
        grid: &Grid,
        cursor: (u16, u16, bool),
        scale_factor: f32,
        screen_size: (u32, u32),
        encoder: &mut wgpu::CommandEncoder,
        frame_view: &wgpu::TextureView,
    ) -> Result<(), RenderError> {
        if grid.full_damage() || !grid.damage_rects().is_empty() {
            let raw = pack_cells(grid);
            gpu.queue().write_buffer(&self.cell_buffer, 0, &raw);
        }

        let uniforms = Uniforms {
            screen_size: [screen_size.0 as f32, screen_size.1 as f32],
            cell_size: [self.cell_size.0, self.cell_size.1],
            grid_size: [self.cols as u32, self.rows as u32],
            msdf_pixel_range: self.font.msdf_pixel_range,
            scale_factor,
            cursor_col: cursor.0 as u32,
            cursor_row: cursor.1 as u32,
            cursor_visible: cursor.2 as u32,
            _pad: 0,
        };
        gpu.queue()
            .write_buffer(&self.uniform_buffer, 0, bytes_of(&uniforms));

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("gridterm cell pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: frame_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: 0.1,
                        g: 0.1,
                        b: 0.1,
                        a: 1.0,
                    }),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.draw(0..3, 0..1);

        Ok(())
    }
}

fn check_grid_fits(device: &wgpu::Device, cols: u16, rows: u16) -> Result<(), RenderError> {
    let limit = device.limits().max_storage_buffer_binding_size as u64;
    let size = (cols as u64) * (rows as u64) * CELL_WORDS * 4;
    if size > limit {
        return Err(RenderError::GridTooLarge { cols, rows, limit });
    }
    Ok(())
}

fn create_cell_buffer(device: &wgpu::Device, cols: u16, rows: u16) -> wgpu::Buffer {
    let count = (cols as u64) * (rows as u64) * CELL_WORDS;
    let zeros = vec![0u32; count.max(1) as usize];
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("gridterm cell storage buffer"),
        contents: bytemuck::cast_slice(&zeros),
        usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
    })
}

fn pack_cells(grid: &Grid) -> Vec<u32> {
    let mut out = Vec::with_capacity(grid.cells().len() * 3);
    for cell in grid.cells() {
        let fg = u32::from_le_bytes(cell.fg);
        let bg_style = u32::from_le_bytes([cell.bg[0], cell.bg[1], cell.bg[2], cell.style]);
        out.push(cell.glyph_index);
        out.push(fg);
        out.push(bg_style);
    }
    out
}
