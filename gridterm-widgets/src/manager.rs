//! The widget manager: plugin registry, lifecycle, input routing, and the
//! grid-marking bridge back to the cell grid (§4.3).

use std::collections::HashMap;

use gridterm_grid::{Grid, GLYPH_CUSTOM_END, GLYPH_CUSTOM_START};
use rand::Rng;

use crate::error::WidgetError;
use crate::gpu::{GpuContext, PixelRect};
use crate::osc::{self, OscCommand, Selector};
use crate::plugin::{CustomGlyphPlugin, Plugin, WidgetFactory};
use crate::record::{PositionMode, Screen, SizeSpec, WidgetRecord};
use crate::widget::{KeyAction, Mods, Widget};

/// A `(plugin_name, widget_id)` pair — the manager's internal address for a
/// live widget instance; the hash_id is the address OSC callers use.
type Location = (String, u16);

fn position_key(row: u16, col: u16) -> u64 {
    ((row as u64) << 32) | col as u64
}

/// A live single-cell widget bound to one custom-glyph codepoint + grid
/// position (§4.3 "Custom-glyph plugins").
struct CustomGlyphInstance {
    glyph_index: u32,
    widget: Box<dyn Widget>,
}

fn mark_grid_cells(grid: &mut Grid, record: &WidgetRecord) {
    let (col, row, w, h) = record.cell_rect();
    for r in row..row.saturating_add(h) {
        for c in col..col.saturating_add(w) {
            grid.set_widget_id(c, r, record.id + 1);
        }
    }
}

fn clear_grid_cells(grid: &mut Grid, record: &WidgetRecord) {
    let (col, row, w, h) = record.cell_rect();
    for r in row..row.saturating_add(h) {
        for c in col..col.saturating_add(w) {
            grid.clear_widget_id(c, r);
        }
    }
}

/// Result of handling an OSC 99999 command that expects a textual reply
/// written back to the PTY as a response OSC (§6).
pub struct OscResponse {
    pub text: String,
    /// For `R`-mode creates: the number of blank lines the caller should
    /// advance the cursor by so the new widget doesn't overlap prior output.
    pub advance_lines: u16,
}

pub struct WidgetManager {
    plugins: HashMap<String, Plugin>,
    custom_glyph_plugins: Vec<CustomGlyphPlugin>,
    hash_to_location: HashMap<String, Location>,
    free_ids: Vec<u16>,
    next_id: u16,
    focused: Option<Location>,
    hovered: Option<Location>,
    is_alt_screen: bool,
    custom_glyph_positions: HashMap<u64, CustomGlyphInstance>,
    next_custom_glyph_index: u32,
    cell_size: (f32, f32),
    #[cfg(feature = "debug-widget-frames")]
    debug_frame: Option<crate::debug_frame::DebugFrameRenderer>,
}

impl Default for WidgetManager {
    fn default() -> Self {
        Self::new()
    }
}

impl WidgetManager {
    pub fn new() -> Self {
        Self {
            plugins: HashMap::new(),
            custom_glyph_plugins: Vec::new(),
            hash_to_location: HashMap::new(),
            free_ids: Vec::new(),
            next_id: 0,
            focused: None,
            hovered: None,
            is_alt_screen: false,
            custom_glyph_positions: HashMap::new(),
            next_custom_glyph_index: GLYPH_CUSTOM_START,
            cell_size: (8.0, 16.0),
            #[cfg(feature = "debug-widget-frames")]
            debug_frame: None,
        }
    }

    /// Hands out the next reserved custom-glyph index, wrapping back to
    /// `GLYPH_CUSTOM_START` at `GLYPH_CUSTOM_END` so a wide registered
    /// codepoint range can never spill into the adjacent sentinel ranges.
    fn alloc_custom_glyph_index(&mut self) -> u32 {
        let idx = self.next_custom_glyph_index;
        self.next_custom_glyph_index = if idx >= GLYPH_CUSTOM_END {
            GLYPH_CUSTOM_START
        } else {
            idx + 1
        };
        idx
    }

    pub fn set_cell_size(&mut self, w: f32, h: f32) {
        self.cell_size = (w, h);
    }

    pub fn register_plugin(&mut self, name: impl Into<String>, factory: WidgetFactory) {
        let name = name.into();
        self.plugins
            .entry(name.clone())
            .or_insert_with(|| Plugin::new(name, factory));
    }

    pub fn register_custom_glyph_plugin(
        &mut self,
        name: impl Into<String>,
        range: (u32, u32),
        factory: WidgetFactory,
    ) -> Result<(), WidgetError> {
        let (lo, hi) = range;
        for existing in &self.custom_glyph_plugins {
            let (elo, ehi) = existing.range;
            if lo <= ehi && elo <= hi {
                return Err(WidgetError::OverlappingGlyphRange(lo, hi));
            }
        }
        self.custom_glyph_plugins
            .push(CustomGlyphPlugin::new(name, range, factory));
        Ok(())
    }

    fn alloc_id(&mut self) -> u16 {
        self.free_ids.pop().unwrap_or_else(|| {
            let id = self.next_id;
            self.next_id += 1;
            id
        })
    }

    fn fresh_hash_id(&self) -> String {
        const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
        let mut rng = rand::rng();
        loop {
            let candidate: String = (0..8)
                .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
                .collect();
            if !self.hash_to_location.contains_key(&candidate) {
                return candidate;
            }
        }
    }

    /// Parse and apply a `99999;...` OSC payload (the prefix already stripped).
    /// `cursor` / `term_size` are needed to resolve `R`-mode creates.
    pub fn handle_osc(
        &mut self,
        payload: &str,
        grid: &mut Grid,
        cursor: (u16, u16),
        term_size: (u16, u16),
    ) -> Option<OscResponse> {
        let cmd = osc::parse(payload)?;
        match cmd {
            OscCommand::Create {
                plugin,
                mode,
                x,
                y,
                size,
                payload,
            } => self.create_widget(&plugin, mode, x, y, size, &payload, grid, cursor, term_size),
            OscCommand::Update { id, payload } => {
                self.update_widget(&id, &payload);
                None
            }
            OscCommand::Destroy { id } => {
                self.destroy_widget(&id, grid);
                None
            }
            OscCommand::List { all } => Some(OscResponse {
                text: self.list_json(all),
                advance_lines: 0,
            }),
            OscCommand::Plugins => Some(OscResponse {
                text: self.plugins_json(),
                advance_lines: 0,
            }),
            OscCommand::Stop(sel) => {
                self.set_running(&sel, false);
                None
            }
            OscCommand::Start(sel) => {
                self.set_running(&sel, true);
                None
            }
            OscCommand::Kill(sel) => {
                self.kill_selector(&sel, grid);
                None
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn create_widget(
        &mut self,
        plugin_name: &str,
        mode: PositionMode,
        x: i32,
        y: i32,
        size: SizeSpec,
        payload: &[u8],
        grid: &mut Grid,
        cursor: (u16, u16),
        term_size: (u16, u16),
    ) -> Option<OscResponse> {
        let (origin_x, origin_y) = match mode {
            PositionMode::Absolute => (x, y),
            PositionMode::Relative => (cursor.0 as i32 + x, cursor.1 as i32 + y),
        };
        let (w, h) = size.resolve(
            origin_x.max(0) as u16,
            origin_y.max(0) as u16,
            term_size.0,
            term_size.1,
        );

        if !self.plugins.contains_key(plugin_name) {
            return None;
        }

        let id = self.alloc_id();
        let hash_id = self.fresh_hash_id();
        let screen = if self.is_alt_screen {
            Screen::Alt
        } else {
            Screen::Main
        };

        let plugin = self.plugins.get_mut(plugin_name).expect("checked above");
        let mut instance = plugin.create_instance();
        if instance.init(payload).is_err() {
            self.free_ids.push(id);
            return None;
        }

        let record = WidgetRecord {
            id,
            hash_id: hash_id.clone(),
            plugin_name: plugin_name.to_string(),
            position_mode: mode,
            x: origin_x,
            y: origin_y,
            w,
            h,
            screen,
            visible: true,
            running: true,
            focused: false,
        };
        plugin.widgets.insert(id, (record.clone(), instance));

        mark_grid_cells(grid, &record);
        self.hash_to_location
            .insert(hash_id.clone(), (plugin_name.to_string(), id));

        let advance_lines = if matches!(mode, PositionMode::Relative) {
            (origin_y + h as i32 - cursor.1 as i32).max(0) as u16
        } else {
            0
        };

        Some(OscResponse {
            text: hash_id,
            advance_lines,
        })
    }

    fn update_widget(&mut self, hash_id: &str, payload: &[u8]) {
        if let Some((plugin_name, id)) = self.hash_to_location.get(hash_id).cloned() {
            if let Some(plugin) = self.plugins.get_mut(&plugin_name) {
                if let Some((_, instance)) = plugin.widgets.get_mut(&id) {
                    let _ = instance.init(payload);
                }
            }
        }
    }

    fn destroy_widget(&mut self, hash_id: &str, grid: &mut Grid) {
        let Some((plugin_name, id)) = self.hash_to_location.remove(hash_id) else {
            return;
        };
        if let Some(plugin) = self.plugins.get_mut(&plugin_name) {
            if let Some((record, mut instance)) = plugin.widgets.remove(&id) {
                clear_grid_cells(grid, &record);
                instance.dispose();
            }
        }
        self.free_ids.push(id);
        if self.focused.as_ref() == Some(&(plugin_name.clone(), id)) {
            self.focused = None;
        }
        if self.hovered.as_ref() == Some(&(plugin_name, id)) {
            self.hovered = None;
        }
    }

    fn set_running(&mut self, selector: &Selector, running: bool) {
        self.for_each_matching_mut(selector, |record, _| record.running = running);
    }

    fn kill_selector(&mut self, selector: &Selector, grid: &mut Grid) {
        let targets: Vec<String> = self
            .hash_to_location
            .iter()
            .filter(|(_, (plugin_name, id))| {
                self.matches(selector, plugin_name, *id)
            })
            .map(|(hash_id, _)| hash_id.clone())
            .collect();
        for hash_id in targets {
            self.destroy_widget(&hash_id, grid);
        }
    }

    fn matches(&self, selector: &Selector, plugin_name: &str, id: u16) -> bool {
        Self::selector_matches(selector, plugin_name, id, &self.hash_to_location)
    }

    fn for_each_matching_mut(&mut self, selector: &Selector, mut f: impl FnMut(&mut WidgetRecord, &str)) {
        for (plugin_name, plugin) in self.plugins.iter_mut() {
            for (record, _) in plugin.widgets.values_mut() {
                if Self::selector_matches(selector, plugin_name, record.id, &self.hash_to_location) {
                    f(record, plugin_name);
                }
            }
        }
    }

    fn selector_matches(
        selector: &Selector,
        plugin_name: &str,
        id: u16,
        hash_to_location: &HashMap<String, Location>,
    ) -> bool {
        match selector {
            Selector::All => true,
            Selector::Plugin(name) => name == plugin_name,
            Selector::Id(hash_id) => hash_to_location
                .get(hash_id)
                .map(|(p, i)| p == plugin_name && *i == id)
                .unwrap_or(false),
        }
    }

    /// Re-flow `Relative` widgets after a scrollback push (§4.3 "Scroll re-flow").
    pub fn on_scroll(&mut self, delta: i32, grid: &mut Grid) {
        for plugin in self.plugins.values_mut() {
            for (record, _) in plugin.widgets.values_mut() {
                if record.position_mode == PositionMode::Relative {
                    clear_grid_cells(grid, record);
                    record.y -= delta;
                    mark_grid_cells(grid, record);
                }
            }
        }
    }

    pub fn on_resize(&mut self, cols: u16, rows: u16) {
        for plugin in self.plugins.values_mut() {
            for (record, instance) in plugin.widgets.values_mut() {
                let w = record.w.min(cols);
                let h = record.h.min(rows);
                instance.on_resize(
                    (w as f32 * self.cell_size.0) as u32,
                    (h as f32 * self.cell_size.1) as u32,
                );
            }
        }
    }

    pub fn on_alt_screen_change(&mut self, is_alt: bool) {
        if self.is_alt_screen == is_alt {
            return;
        }
        self.is_alt_screen = is_alt;
        self.focused = None;
        self.hovered = None;
    }

    pub fn is_alt_screen(&self) -> bool {
        self.is_alt_screen
    }

    fn locate(&self, px: f32, py: f32) -> Option<(Location, PixelRect)> {
        let target_screen = if self.is_alt_screen {
            Screen::Alt
        } else {
            Screen::Main
        };
        for (plugin_name, plugin) in self.plugins.iter() {
            for (record, _) in plugin.widgets.values() {
                if !record.visible || record.screen != target_screen {
                    continue;
                }
                let rect = PixelRect {
                    x: record.x.max(0) as f32 * self.cell_size.0,
                    y: record.y.max(0) as f32 * self.cell_size.1,
                    w: record.w as f32 * self.cell_size.0,
                    h: record.h as f32 * self.cell_size.1,
                };
                if rect.contains(px, py) {
                    return Some(((plugin_name.clone(), record.id), rect));
                }
            }
        }
        None
    }

    fn instance_mut(&mut self, loc: &Location) -> Option<&mut Box<dyn crate::widget::Widget>> {
        self.plugins
            .get_mut(&loc.0)
            .and_then(|p| p.widgets.get_mut(&loc.1))
            .map(|(_, w)| w)
    }

    /// Returns `true` if a widget consumed the move (hover routing + focus
    /// priority per §4.3).
    pub fn on_mouse_move(&mut self, px: f32, py: f32) -> bool {
        let hit = self.locate(px, py);
        let new_hovered = hit.as_ref().map(|(loc, _)| loc.clone());
        if new_hovered != self.hovered {
            self.hovered = new_hovered;
        }
        match hit {
            Some((loc, rect)) => {
                let (lx, ly) = (px - rect.x, py - rect.y);
                self.instance_mut(&loc)
                    .map(|w| w.on_mouse_move(lx, ly))
                    .unwrap_or(false)
            }
            None => false,
        }
    }

    pub fn on_mouse_button(&mut self, px: f32, py: f32, button: i32, pressed: bool) -> bool {
        let hit = self.locate(px, py);
        let new_focus = hit.as_ref().map(|(loc, _)| loc.clone());
        if pressed && new_focus != self.focused {
            if let Some(old) = self.focused.take() {
                if let Some(w) = self.instance_mut(&old) {
                    w.on_mouse_button(-1, false);
                }
            }
            self.focused = new_focus.clone();
        }
        match hit {
            Some((loc, rect)) => {
                self.instance_mut(&loc)
                    .map(|w| {
                        w.on_mouse_move(px - rect.x, py - rect.y);
                        w.on_mouse_button(button, pressed)
                    })
                    .unwrap_or(false)
            }
            None => false,
        }
    }

    pub fn on_mouse_scroll(&mut self, px: f32, py: f32, dx: f32, dy: f32, mods: Mods) -> bool {
        self.locate(px, py)
            .and_then(|(loc, _)| self.instance_mut(&loc))
            .map(|w| w.on_mouse_scroll(dx, dy, mods))
            .unwrap_or(false)
    }

    pub fn on_key(&mut self, key: i32, scancode: i32, action: KeyAction, mods: Mods) -> bool {
        let focused = self.focused.clone();
        focused
            .and_then(|loc| self.instance_mut(&loc))
            .map(|w| w.on_key(key, scancode, action, mods))
            .unwrap_or(false)
    }

    pub fn on_char(&mut self, codepoint: u32) -> bool {
        let focused = self.focused.clone();
        focused
            .and_then(|loc| self.instance_mut(&loc))
            .map(|w| w.on_char(codepoint))
            .unwrap_or(false)
    }

    pub fn focused_wants_keyboard(&self) -> bool {
        let Some((plugin_name, id)) = &self.focused else {
            return false;
        };
        self.plugins
            .get(plugin_name)
            .and_then(|p| p.widgets.get(id))
            .map(|(_, w)| w.wants_keyboard())
            .unwrap_or(false)
    }

    pub fn clear_focus(&mut self) {
        if let Some(old) = self.focused.take() {
            if let Some(w) = self.instance_mut(&old) {
                w.on_mouse_button(-1, false);
            }
        }
    }

    /// Custom-glyph dispatch: called on every cell write. Lazily creates a
    /// single-cell widget bound to `codepoint` at `(row, col)`, replacing
    /// whatever custom glyph previously lived there, and returns the
    /// reserved glyph index the cell should render with.
    pub fn on_cell_sync(&mut self, row: u16, col: u16, codepoint: u32) -> Option<u32> {
        let key = position_key(row, col);
        if self.custom_glyph_positions.contains_key(&key) {
            self.on_cell_clear(row, col);
        }

        let plugin = self
            .custom_glyph_plugins
            .iter()
            .find(|p| p.claims(codepoint))?;
        let mut widget = plugin.create_instance();
        if widget.init(&codepoint.to_be_bytes()).is_err() {
            log::warn!("failed to create custom glyph widget for U+{codepoint:04X}");
            return None;
        }

        let glyph_index = self.alloc_custom_glyph_index();
        log::debug!("custom glyph widget for U+{codepoint:04X} at ({col},{row}) -> index 0x{glyph_index:04X}");
        self.custom_glyph_positions.insert(
            key,
            CustomGlyphInstance {
                glyph_index,
                widget,
            },
        );
        Some(glyph_index)
    }

    pub fn on_cell_clear(&mut self, row: u16, col: u16) {
        if let Some(mut instance) = self.custom_glyph_positions.remove(&position_key(row, col)) {
            instance.widget.dispose();
        }
    }

    pub fn update(&mut self, _dt: f32) {}

    pub fn render_widgets(
        &mut self,
        gpu: &dyn GpuContext,
        encoder: &mut wgpu::CommandEncoder,
        frame_view: &wgpu::TextureView,
        screen_size: (u32, u32),
    ) -> anyhow::Result<()> {
        let target_screen = if self.is_alt_screen {
            Screen::Alt
        } else {
            Screen::Main
        };
        #[cfg(feature = "debug-widget-frames")]
        let mut rendered_rects = Vec::new();
        for plugin in self.plugins.values_mut() {
            for (record, instance) in plugin.widgets.values_mut() {
                if !record.visible || !record.running || record.screen != target_screen {
                    continue;
                }
                let rect = PixelRect {
                    x: record.x.max(0) as f32 * self.cell_size.0,
                    y: record.y.max(0) as f32 * self.cell_size.1,
                    w: record.w as f32 * self.cell_size.0,
                    h: record.h as f32 * self.cell_size.1,
                };
                instance.render(gpu, encoder, frame_view, screen_size, rect)?;
                #[cfg(feature = "debug-widget-frames")]
                rendered_rects.push(rect);
            }
        }
        for (&key, instance) in self.custom_glyph_positions.iter_mut() {
            let (row, col) = ((key >> 32) as u16, key as u16);
            let rect = PixelRect {
                x: col as f32 * self.cell_size.0,
                y: row as f32 * self.cell_size.1,
                w: self.cell_size.0,
                h: self.cell_size.1,
            };
            instance.widget.render(gpu, encoder, frame_view, screen_size, rect)?;
            #[cfg(feature = "debug-widget-frames")]
            rendered_rects.push(rect);
        }

        #[cfg(feature = "debug-widget-frames")]
        if !rendered_rects.is_empty() {
            let renderer = self.debug_frame.get_or_insert_with(|| {
                crate::debug_frame::DebugFrameRenderer::new(gpu.device(), gpu.surface_format())
            });
            for rect in rendered_rects {
                renderer.draw(gpu, encoder, frame_view, screen_size, rect);
            }
        }

        Ok(())
    }

    fn list_json(&self, all: bool) -> String {
        let mut entries = Vec::new();
        for plugin in self.plugins.values() {
            for (record, _) in plugin.widgets.values() {
                if !all && !record.visible {
                    continue;
                }
                entries.push(format!(
                    "{{\"id\":\"{}\",\"plugin\":\"{}\",\"x\":{},\"y\":{},\"w\":{},\"h\":{},\"running\":{}}}",
                    record.hash_id, record.plugin_name, record.x, record.y, record.w, record.h, record.running
                ));
            }
        }
        format!("[{}]", entries.join(","))
    }

    fn plugins_json(&self) -> String {
        let names: Vec<String> = self
            .plugins
            .keys()
            .map(|n| format!("\"{n}\""))
            .collect();
        format!("[{}]", names.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::Widget;

    struct Probe {
        inited: bool,
    }

    impl Widget for Probe {
        fn init(&mut self, _payload: &[u8]) -> anyhow::Result<()> {
            self.inited = true;
            Ok(())
        }

        fn render(
            &mut self,
            _gpu: &dyn GpuContext,
            _encoder: &mut wgpu::CommandEncoder,
            _frame_view: &wgpu::TextureView,
            _screen_size: (u32, u32),
            _pixel_rect: PixelRect,
        ) -> anyhow::Result<()> {
            Ok(())
        }

        fn wants_mouse(&self) -> bool {
            true
        }
    }

    fn factory() -> WidgetFactory {
        Box::new(|| Box::new(Probe { inited: false }))
    }

    #[test]
    fn create_and_destroy_marks_and_clears_grid() {
        let mut mgr = WidgetManager::new();
        mgr.register_plugin("probe", factory());
        let mut grid = Grid::new(80, 24);

        let resp = mgr
            .handle_osc("probe;A;2;2;3;3;", &mut grid, (0, 0), (80, 24))
            .unwrap();
        assert_eq!(resp.advance_lines, 0);
        let hash_id = resp.text;
        assert_eq!(hash_id.len(), 8);
        assert_eq!(grid.get_widget_id(2, 2), 1);
        assert_eq!(grid.get_widget_id(4, 4), 1);

        let destroy_payload = format!("probe;D;{hash_id}");
        assert!(mgr
            .handle_osc(&destroy_payload, &mut grid, (0, 0), (80, 24))
            .is_none());
        assert_eq!(grid.get_widget_id(2, 2), 0);
    }

    #[test]
    fn relative_create_advances_by_height_past_cursor() {
        let mut mgr = WidgetManager::new();
        mgr.register_plugin("probe", factory());
        let mut grid = Grid::new(80, 24);
        let resp = mgr
            .handle_osc("probe;R;0;0;4;3;", &mut grid, (10, 5), (80, 24))
            .unwrap();
        assert_eq!(resp.advance_lines, 3);
    }

    #[test]
    fn list_reports_created_widgets() {
        let mut mgr = WidgetManager::new();
        mgr.register_plugin("probe", factory());
        let mut grid = Grid::new(80, 24);
        mgr.handle_osc("probe;A;0;0;1;1;", &mut grid, (0, 0), (80, 24));
        let resp = mgr.handle_osc("list", &mut grid, (0, 0), (80, 24)).unwrap();
        assert!(resp.text.contains("\"plugin\":\"probe\""));
    }

    #[test]
    fn mouse_click_focuses_widget_under_cursor() {
        let mut mgr = WidgetManager::new();
        mgr.register_plugin("probe", factory());
        mgr.set_cell_size(10.0, 20.0);
        let mut grid = Grid::new(80, 24);
        mgr.handle_osc("probe;A;0;0;2;2;", &mut grid, (0, 0), (80, 24));
        assert!(mgr.on_mouse_button(5.0, 5.0, 0, true));
        assert!(mgr.focused.is_some());
    }

    #[test]
    fn custom_glyph_sync_creates_and_clears_a_widget() {
        let mut mgr = WidgetManager::new();
        mgr.register_custom_glyph_plugin("box-drawing", (0x2500, 0x257F), factory())
            .unwrap();

        let idx = mgr.on_cell_sync(3, 7, 0x2500).unwrap();
        assert!((GLYPH_CUSTOM_START..=GLYPH_CUSTOM_END).contains(&idx));
        assert_eq!(mgr.custom_glyph_positions.len(), 1);

        // Overwriting the same cell with a different claimed codepoint
        // disposes the old widget and creates a fresh one rather than
        // leaking the original instance.
        let idx2 = mgr.on_cell_sync(3, 7, 0x2501).unwrap();
        assert_eq!(mgr.custom_glyph_positions.len(), 1);
        assert_ne!(idx, idx2);

        mgr.on_cell_clear(3, 7);
        assert!(mgr.custom_glyph_positions.is_empty());
    }

    #[test]
    fn custom_glyph_index_wraps_instead_of_overflowing_sentinels() {
        let mut mgr = WidgetManager::new();
        mgr.next_custom_glyph_index = GLYPH_CUSTOM_END;
        mgr.register_custom_glyph_plugin("wide", (0x4E00, 0x9FFF), factory())
            .unwrap();

        let first = mgr.on_cell_sync(0, 0, 0x4E00).unwrap();
        assert_eq!(first, GLYPH_CUSTOM_END);
        let second = mgr.on_cell_sync(0, 1, 0x4E01).unwrap();
        assert_eq!(second, GLYPH_CUSTOM_START);
    }
}
