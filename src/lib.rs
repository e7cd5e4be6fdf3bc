//! `gridterm`: GPU-accelerated terminal emulator core.
//!
//! [`Engine`] composes the four components into the per-frame pipeline: drain
//! the PTY into the grid, update widgets, draw the cell pass, then draw the
//! widget pass in the same command encoder with `LoadOp::Load`.

use gridterm_render::{CellRenderer, FontResources};
use gridterm_term::{SelectionMode, SpecialKey, Terminal};
use gridterm_widgets::{GpuContext, WidgetManager};

/// Ties [`Terminal`], [`WidgetManager`], and [`CellRenderer`] together.
pub struct Engine {
    terminal: Terminal,
    widgets: WidgetManager,
    renderer: CellRenderer,
}

impl Engine {
    pub fn new(
        shell_spec: &str,
        cols: u16,
        rows: u16,
        cell_size: (f32, f32),
        font: FontResources,
        gpu: &dyn GpuContext,
    ) -> anyhow::Result<Self> {
        let terminal = Terminal::start(shell_spec, cols, rows)?;
        let mut widgets = WidgetManager::new();
        widgets.set_cell_size(cell_size.0, cell_size.1);
        let renderer = CellRenderer::new(gpu, font, cell_size, cols, rows)?;

        Ok(Self {
            terminal,
            widgets,
            renderer,
        })
    }

    pub fn terminal(&self) -> &Terminal {
        &self.terminal
    }

    pub fn widgets(&self) -> &WidgetManager {
        &self.widgets
    }

    pub fn widgets_mut(&mut self) -> &mut WidgetManager {
        &mut self.widgets
    }

    /// Pumps pending PTY output into the grid. Returns `true` if the child process exited.
    pub fn drain_pty(&mut self) -> anyhow::Result<bool> {
        Ok(self.terminal.drain_pty(&mut self.widgets)?)
    }

    pub fn update(&mut self, dt_seconds: f32) {
        self.widgets.update(dt_seconds);
    }

    pub fn resize(&mut self, gpu: &dyn GpuContext, cols: u16, rows: u16) -> anyhow::Result<()> {
        self.terminal.resize(cols, rows, &mut self.widgets)?;
        self.renderer.resize(gpu, cols, rows)?;
        Ok(())
    }

    pub fn send_key(&mut self, c: char) -> anyhow::Result<()> {
        Ok(self.terminal.send_key(c)?)
    }

    pub fn send_special_key(&mut self, key: SpecialKey) -> anyhow::Result<()> {
        Ok(self.terminal.send_special_key(key)?)
    }

    pub fn scroll_up(&mut self, n: u16) {
        self.terminal.scroll_up(n, &mut self.widgets);
    }

    pub fn scroll_down(&mut self, n: u16) {
        self.terminal.scroll_down(n, &mut self.widgets);
    }

    pub fn start_selection(&mut self, mode: SelectionMode, col: u16, row: i64) {
        self.terminal.start_selection(mode, col, row);
    }

    pub fn extend_selection(&mut self, col: u16, row: i64) {
        self.terminal.extend_selection(col, row);
    }

    pub fn selected_text(&self) -> Option<String> {
        self.terminal.selected_text()
    }

    /// Records the grid pass followed by the widget pass into `encoder`, in that
    /// order, against the same `frame_view` — the widget pass loads rather than clears.
    pub fn render(
        &mut self,
        gpu: &dyn GpuContext,
        scale_factor: f32,
        screen_size: (u32, u32),
        encoder: &mut wgpu::CommandEncoder,
        frame_view: &wgpu::TextureView,
    ) -> anyhow::Result<()> {
        let (cursor_col, cursor_row) = self.terminal.cursor();
        let cursor_visible = self.terminal.cursor_visible();

        self.renderer.render(
            gpu,
            self.terminal.grid(),
            (cursor_col, cursor_row, cursor_visible),
            scale_factor,
            screen_size,
            encoder,
            frame_view,
        )?;

        self.widgets
            .render_widgets(gpu, encoder, frame_view, screen_size)?;

        Ok(())
    }
}
