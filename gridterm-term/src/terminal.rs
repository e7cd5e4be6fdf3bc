//! The top-level terminal: ties the PTY, the decoder, the cell grid, and
//! scrollback together and exposes the public per-frame API (§4.2).

use gridterm_grid::{
    Cell, CellStyle, Grid, Rect, ScrollbackLine, ScrollbackRing, UnderlineStyle, GLYPH_SPACE,
    GLYPH_WIDE_CONT,
};
use gridterm_widgets::WidgetManager;

use crate::decoder::{Decoder, TermEvent};
use crate::error::TermError;
use crate::pty::Pty;
use crate::screen::{CellAttr, ScreenCell, CONTINUATION};
use crate::selection::{selected_text, Point, RowSource, Selection, SelectionMode};

/// Cursor blink phase interval (§4.2).
pub const BLINK_INTERVAL_MS: u64 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialKey {
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Insert,
    Delete,
    Backspace,
    Tab,
    Escape,
    Enter,
    F(u8),
}

pub struct Terminal {
    decoder: Decoder,
    parser: vte::Parser,
    pty: Pty,
    grid: Grid,
    scrollback: ScrollbackRing,
    selection: Option<Selection>,
    blink_elapsed_ms: u64,
    blink_on: bool,
    title: String,
}

impl Terminal {
    pub fn start(shell_spec: &str, cols: u16, rows: u16) -> Result<Self, TermError> {
        let pty = Pty::start(shell_spec, cols, rows)?;
        Ok(Self {
            decoder: Decoder::new(cols, rows),
            parser: vte::Parser::new(),
            pty,
            grid: Grid::new(cols, rows),
            scrollback: ScrollbackRing::new(ScrollbackRing::DEFAULT_CAPACITY),
            selection: None,
            blink_elapsed_ms: 0,
            blink_on: true,
            title: String::new(),
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn cursor(&self) -> (u16, u16) {
        (self.decoder.active().cursor_col, self.decoder.active().cursor_row)
    }

    pub fn cursor_visible(&self) -> bool {
        self.decoder.cursor_visible && self.blink_on
    }

    /// Non-blocking: read whatever the PTY has buffered, advance the
    /// decoder, sync into the grid, and dispatch queued events. Returns
    /// `true` once the child process has exited.
    pub fn drain_pty(&mut self, widgets: &mut WidgetManager) -> Result<bool, TermError> {
        let bytes = self.pty.drain();
        if !bytes.is_empty() {
            self.parser.advance(&mut self.decoder, &bytes);
        }
        self.sync_to_grid(widgets);
        self.handle_events(widgets)?;
        Ok(self.pty.has_exited())
    }

    fn sync_to_grid(&mut self, widgets: &mut WidgetManager) {
        let (cols, rows) = (self.decoder.active().cols(), self.decoder.active().rows());
        let full = self.decoder.full_redraw;
        let rows_to_sync: Vec<u16> = if full {
            (0..rows).collect()
        } else {
            self.decoder.take_dirty_rows().into_iter().collect()
        };
        for row in rows_to_sync {
            for col in 0..cols {
                let sc = self.decoder.active().cell(col, row);
                let selected = self
                    .selection
                    .as_ref()
                    .is_some_and(|sel| sel.contains(col, row as i64));
                let cell = build_cell(col, row, sc, widgets, selected);
                self.grid.set_cell(col, row, cell);
            }
            self.grid.mark_damage(Rect::new(0, row, cols, 1));
        }
        if full {
            self.grid.mark_full_damage();
        }
        self.decoder.full_redraw = false;
    }

    fn handle_events(&mut self, widgets: &mut WidgetManager) -> Result<(), TermError> {
        let events: Vec<TermEvent> = self.decoder.events.drain(..).collect();
        for event in events {
            match event {
                TermEvent::PushLine(cells) => {
                    let chars: Vec<u32> = cells.iter().map(|c| c.codepoint).collect();
                    let packed: Vec<Cell> = cells.iter().map(|c| pack_attr(c.attr)).collect();
                    self.scrollback
                        .push(ScrollbackLine::from_cells(&chars, &packed));
                    widgets.on_scroll(1, &mut self.grid);
                }
                TermEvent::PopLine => {
                    self.scrollback.pop();
                    widgets.on_scroll(-1, &mut self.grid);
                }
                TermEvent::AltScreenChanged(is_alt) => {
                    widgets.on_alt_screen_change(is_alt);
                    self.grid.mark_full_damage();
                    self.decoder.full_redraw = true;
                }
                TermEvent::Bell => log::debug!("bell"),
                TermEvent::TitleChanged(title) => self.title = title,
                TermEvent::Osc(payload) => {
                    let cursor = self.cursor();
                    let term_size = (self.decoder.active().cols(), self.decoder.active().rows());
                    if let Some(resp) = widgets.handle_osc(&payload, &mut self.grid, cursor, term_size) {
                        self.reply_osc(&resp)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn reply_osc(&mut self, resp: &gridterm_widgets::OscResponse) -> Result<(), TermError> {
        let encoded = gridterm_widgets::base94_encode(resp.text.as_bytes());
        let msg = format!("\x1b]99999;{encoded}\x07");
        self.pty.write_all(msg.as_bytes())?;
        for _ in 0..resp.advance_lines {
            self.decoder.active_mut().line_feed();
        }
        if resp.advance_lines > 0 {
            self.decoder.active_mut().carriage_return();
            self.decoder.full_redraw = true;
        }
        Ok(())
    }

    pub fn resize(&mut self, cols: u16, rows: u16, widgets: &mut WidgetManager) -> Result<(), TermError> {
        self.pty.resize(cols, rows)?;
        self.decoder.resize(cols, rows);
        self.grid.resize(cols, rows);
        widgets.on_resize(cols, rows);
        Ok(())
    }

    pub fn send_raw(&mut self, bytes: &[u8]) -> Result<(), TermError> {
        self.pty.write_all(bytes)
    }

    pub fn send_key(&mut self, c: char) -> Result<(), TermError> {
        let mut buf = [0u8; 4];
        self.pty.write_all(c.encode_utf8(&mut buf).as_bytes())
    }

    pub fn send_special_key(&mut self, key: SpecialKey) -> Result<(), TermError> {
        let app = self.decoder.app_cursor_keys;
        let bytes: Vec<u8> = match key {
            SpecialKey::Up => if app { b"\x1bOA".to_vec() } else { b"\x1b[A".to_vec() },
            SpecialKey::Down => if app { b"\x1bOB".to_vec() } else { b"\x1b[B".to_vec() },
            SpecialKey::Right => if app { b"\x1bOC".to_vec() } else { b"\x1b[C".to_vec() },
            SpecialKey::Left => if app { b"\x1bOD".to_vec() } else { b"\x1b[D".to_vec() },
            SpecialKey::Home => b"\x1b[H".to_vec(),
            SpecialKey::End => b"\x1b[F".to_vec(),
            SpecialKey::PageUp => b"\x1b[5~".to_vec(),
            SpecialKey::PageDown => b"\x1b[6~".to_vec(),
            SpecialKey::Insert => b"\x1b[2~".to_vec(),
            SpecialKey::Delete => b"\x1b[3~".to_vec(),
            SpecialKey::Backspace => b"\x7f".to_vec(),
            SpecialKey::Tab => b"\t".to_vec(),
            SpecialKey::Escape => b"\x1b".to_vec(),
            SpecialKey::Enter => b"\r".to_vec(),
            SpecialKey::F(n) => function_key_bytes(n),
        };
        self.pty.write_all(&bytes)
    }

    /// Advance the cursor blink phase by `elapsed_ms`; returns whether the
    /// visible phase flipped (§4.2, 500ms interval).
    pub fn update_blink(&mut self, elapsed_ms: u64) -> bool {
        self.blink_elapsed_ms += elapsed_ms;
        if self.blink_elapsed_ms >= BLINK_INTERVAL_MS {
            self.blink_elapsed_ms -= BLINK_INTERVAL_MS;
            self.blink_on = !self.blink_on;
            true
        } else {
            false
        }
    }

    /// Pop retired lines back onto the top of the main screen, shifting the
    /// rest of the screen down (history recall — not a PTY-driven scroll).
    pub fn scroll_up(&mut self, n: u16, widgets: &mut WidgetManager) {
        let cols = self.decoder.main.cols();
        let rows = self.decoder.main.rows();
        for _ in 0..n {
            let Some(line) = self.scrollback.pop() else { break };
            for row in (1..rows).rev() {
                for c in 0..cols {
                    let above = self.decoder.main.cell(c, row - 1);
                    self.decoder.main.set_cell(c, row, above);
                }
            }
            restore_line(&mut self.decoder.main, 0, &line);
        }
        widgets.on_scroll(-(n as i32), &mut self.grid);
        self.decoder.full_redraw = true;
    }

    /// Push the main screen's top rows back into scrollback, shifting the
    /// rest of the screen up (inverse of [`Terminal::scroll_up`]).
    pub fn scroll_down(&mut self, n: u16, widgets: &mut WidgetManager) {
        let cols = self.decoder.main.cols();
        let rows = self.decoder.main.rows();
        for _ in 0..n {
            let top_row: Vec<ScreenCell> = (0..cols).map(|c| self.decoder.main.cell(c, 0)).collect();
            let chars: Vec<u32> = top_row.iter().map(|c| c.codepoint).collect();
            let packed: Vec<Cell> = top_row.iter().map(|c| pack_attr(c.attr)).collect();
            self.scrollback.push(ScrollbackLine::from_cells(&chars, &packed));
            for row in 0..rows - 1 {
                for c in 0..cols {
                    let below = self.decoder.main.cell(c, row + 1);
                    self.decoder.main.set_cell(c, row, below);
                }
            }
            for c in 0..cols {
                self.decoder.main.set_cell(c, rows - 1, ScreenCell::default());
            }
        }
        widgets.on_scroll(n as i32, &mut self.grid);
        self.decoder.full_redraw = true;
    }

    pub fn start_selection(&mut self, mode: SelectionMode, col: u16, row: i64) {
        self.selection = Some(Selection::start(mode, Point { col, row }));
        self.decoder.full_redraw = true;
    }

    pub fn extend_selection(&mut self, col: u16, row: i64) {
        if let Some(sel) = &mut self.selection {
            sel.extend(Point { col, row });
            self.decoder.full_redraw = true;
        }
    }

    pub fn clear_selection(&mut self) {
        if self.selection.take().is_some() {
            self.decoder.full_redraw = true;
        }
    }

    pub fn selected_text(&self) -> Option<String> {
        self.selection
            .as_ref()
            .map(|sel| selected_text(sel, self))
    }
}

impl RowSource for Terminal {
    fn row_text(&self, row: i64) -> String {
        if row >= 0 {
            self.decoder.main.row_text(row as u16, 0, self.decoder.main.cols())
        } else {
            let offset = (-row - 1) as usize;
            self.scrollback
                .line_from_bottom(offset)
                .map(|line| {
                    line.chars
                        .iter()
                        .filter(|&&cp| cp != CONTINUATION)
                        .filter_map(|&cp| char::from_u32(cp))
                        .collect()
                })
                .unwrap_or_default()
        }
    }

    fn row_len(&self, row: i64) -> u16 {
        self.row_text(row).chars().count() as u16
    }
}

fn function_key_bytes(n: u8) -> Vec<u8> {
    match n {
        1 => b"\x1bOP".to_vec(),
        2 => b"\x1bOQ".to_vec(),
        3 => b"\x1bOR".to_vec(),
        4 => b"\x1bOS".to_vec(),
        5 => b"\x1b[15~".to_vec(),
        6 => b"\x1b[17~".to_vec(),
        7 => b"\x1b[18~".to_vec(),
        8 => b"\x1b[19~".to_vec(),
        9 => b"\x1b[20~".to_vec(),
        10 => b"\x1b[21~".to_vec(),
        11 => b"\x1b[23~".to_vec(),
        12 => b"\x1b[24~".to_vec(),
        _ => Vec::new(),
    }
}

fn pack_attr(attr: CellAttr) -> Cell {
    let mut style = CellStyle::new();
    style.set_bold(attr.bold);
    style.set_italic(attr.italic);
    style.set_strikethrough(attr.strike);
    style.set_underline(match attr.underline {
        1 => UnderlineStyle::Single,
        2 => UnderlineStyle::Double,
        3 => UnderlineStyle::Curly,
        _ => UnderlineStyle::None,
    });
    let mut fg = attr.fg.resolve_fg();
    let mut bg = attr.bg.resolve_bg();
    if attr.reverse {
        std::mem::swap(&mut fg, &mut bg);
    }
    Cell {
        glyph_index: GLYPH_SPACE,
        fg: [fg[0], fg[1], fg[2], 255],
        bg,
        style: style.0,
    }
}

fn build_cell(col: u16, row: u16, sc: ScreenCell, widgets: &mut WidgetManager, selected: bool) -> Cell {
    if sc.codepoint == CONTINUATION {
        return Cell {
            glyph_index: GLYPH_WIDE_CONT,
            ..Cell::default()
        };
    }
    let mut cell = pack_attr(sc.attr);
    cell.glyph_index = if let Some(custom) = widgets.on_cell_sync(row, col, sc.codepoint) {
        custom
    } else if sc.codepoint == ' ' as u32 {
        GLYPH_SPACE
    } else {
        sc.codepoint
    };
    if selected {
        invert_colors(&mut cell);
    }
    cell
}

/// Swaps fg/bg in place, the way `pack_attr` already does for SGR reverse
/// video (§4.2 selection highlight).
fn invert_colors(cell: &mut Cell) {
    let fg = [cell.fg[0], cell.fg[1], cell.fg[2]];
    cell.fg = [cell.bg[0], cell.bg[1], cell.bg[2], cell.fg[3]];
    cell.bg = fg;
}

fn restore_line(screen: &mut crate::screen::VtScreen, row: u16, line: &ScrollbackLine) {
    let attrs = line.expand_attrs();
    for (col, (&codepoint, (fg, bg, style))) in line.chars.iter().zip(attrs.iter()).enumerate() {
        let underline = match (style >> 2) & 0b11 {
            1 => 1,
            2 => 2,
            3 => 3,
            _ => 0,
        };
        let attr = CellAttr {
            fg: crate::color::SgrColor::Rgb(fg[0], fg[1], fg[2]),
            bg: crate::color::SgrColor::Rgb(bg[0], bg[1], bg[2]),
            bold: style & CellStyle::BOLD != 0,
            italic: style & CellStyle::ITALIC != 0,
            underline,
            strike: style & CellStyle::STRIKETHROUGH != 0,
            reverse: false,
        };
        screen.set_cell(col as u16, row, ScreenCell { codepoint, attr });
    }
}
