//! The decoder's private per-screen cell plane (§4.6): not the GPU-facing
//! Grid — this is what `feed()` mutates directly, synced into the Grid
//! afterward by the terminal's damage-sync step.

use crate::color::SgrColor;

/// Sentinel codepoint for the right half of a wide character.
pub const CONTINUATION: u32 = 0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellAttr {
    pub fg: SgrColor,
    pub bg: SgrColor,
    pub bold: bool,
    pub italic: bool,
    /// 0 = none, 1 = single, 2 = double, 3 = curly (§4.6 SGR 4:2/4:3).
    pub underline: u8,
    pub strike: bool,
    pub reverse: bool,
}

impl Default for CellAttr {
    fn default() -> Self {
        Self {
            fg: SgrColor::Default,
            bg: SgrColor::Default,
            bold: false,
            italic: false,
            underline: 0,
            strike: false,
            reverse: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenCell {
    pub codepoint: u32,
    pub attr: CellAttr,
}

impl Default for ScreenCell {
    fn default() -> Self {
        Self {
            codepoint: ' ' as u32,
            attr: CellAttr::default(),
        }
    }
}

/// A single screen plane (main or alt) plus cursor/scroll-region/tab-stop state.
pub struct VtScreen {
    cols: u16,
    rows: u16,
    cells: Vec<ScreenCell>,
    pub cursor_col: u16,
    pub cursor_row: u16,
    /// Deferred-wrap flag: xterm defers autowrap until the *next* printable
    /// character so a full-width last column doesn't eagerly wrap.
    pub pending_wrap: bool,
    pub scroll_top: u16,
    pub scroll_bottom: u16,
    tab_stops: Vec<bool>,
    saved_cursor: Option<(u16, u16)>,
}

impl VtScreen {
    pub fn new(cols: u16, rows: u16) -> Self {
        let cols = cols.max(1);
        let rows = rows.max(1);
        Self {
            cols,
            rows,
            cells: vec![ScreenCell::default(); cols as usize * rows as usize],
            cursor_col: 0,
            cursor_row: 0,
            pending_wrap: false,
            scroll_top: 0,
            scroll_bottom: rows - 1,
            tab_stops: Self::default_tab_stops(cols),
            saved_cursor: None,
        }
    }

    fn default_tab_stops(cols: u16) -> Vec<bool> {
        (0..cols).map(|c| c % 8 == 0).collect()
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    #[inline]
    fn index(&self, col: u16, row: u16) -> Option<usize> {
        if col < self.cols && row < self.rows {
            Some(row as usize * self.cols as usize + col as usize)
        } else {
            None
        }
    }

    pub fn cell(&self, col: u16, row: u16) -> ScreenCell {
        self.index(col, row)
            .map(|i| self.cells[i])
            .unwrap_or_default()
    }

    pub fn set_cell(&mut self, col: u16, row: u16, cell: ScreenCell) {
        if let Some(i) = self.index(col, row) {
            self.cells[i] = cell;
        }
    }

    pub fn row_text(&self, row: u16, col_start: u16, col_end: u16) -> String {
        let mut s = String::new();
        for c in col_start..col_end.min(self.cols) {
            let cp = self.cell(c, row).codepoint;
            if cp == CONTINUATION {
                continue;
            }
            if let Some(ch) = char::from_u32(cp) {
                s.push(ch);
            }
        }
        s
    }

    /// Resize, preserving the top-left overlap (mirrors the Grid's policy).
    pub fn resize(&mut self, new_cols: u16, new_rows: u16) {
        let new_cols = new_cols.max(1);
        let new_rows = new_rows.max(1);
        let mut new_cells = vec![ScreenCell::default(); new_cols as usize * new_rows as usize];
        let copy_cols = self.cols.min(new_cols);
        let copy_rows = self.rows.min(new_rows);
        for row in 0..copy_rows {
            for col in 0..copy_cols {
                new_cells[row as usize * new_cols as usize + col as usize] =
                    self.cell(col, row);
            }
        }
        self.cols = new_cols;
        self.rows = new_rows;
        self.cells = new_cells;
        self.cursor_col = self.cursor_col.min(new_cols - 1);
        self.cursor_row = self.cursor_row.min(new_rows - 1);
        self.scroll_top = 0;
        self.scroll_bottom = new_rows - 1;
        self.tab_stops = Self::default_tab_stops(new_cols);
        self.pending_wrap = false;
    }

    pub fn save_cursor(&mut self) {
        self.saved_cursor = Some((self.cursor_col, self.cursor_row));
    }

    pub fn restore_cursor(&mut self) {
        if let Some((c, r)) = self.saved_cursor {
            self.cursor_col = c;
            self.cursor_row = r;
        }
    }

    /// Write one already-width-resolved glyph at the cursor, handling
    /// autowrap and advancing the cursor. Returns the `(col, row)` touched
    /// (and the continuation cell's column, for width 2) for damage tracking.
    pub fn print(&mut self, codepoint: u32, width: usize, attr: CellAttr, autowrap: bool) -> Vec<(u16, u16)> {
        let mut touched = Vec::with_capacity(2);
        if self.pending_wrap && autowrap {
            self.cursor_col = 0;
            self.line_feed();
            self.pending_wrap = false;
        }
        let col = self.cursor_col;
        let row = self.cursor_row;
        self.set_cell(col, row, ScreenCell { codepoint, attr });
        touched.push((col, row));
        if width == 2 {
            self.set_cell(
                col + 1,
                row,
                ScreenCell {
                    codepoint: CONTINUATION,
                    attr,
                },
            );
            touched.push((col + 1, row));
        }
        let advance = width.max(1) as u16;
        if col + advance >= self.cols {
            self.cursor_col = self.cols - 1;
            self.pending_wrap = autowrap;
        } else {
            self.cursor_col = col + advance;
        }
        touched
    }

    pub fn line_feed(&mut self) {
        let _ = self.line_feed_returning_evicted(false);
    }

    /// Line-feed, returning evicted rows when `full_screen` scrolling (no
    /// active `DECSTBM` region) pushed a line out the top — the caller
    /// forwards those into scrollback.
    pub fn line_feed_returning_evicted(&mut self, full_screen: bool) -> Vec<Vec<ScreenCell>> {
        if self.cursor_row == self.scroll_bottom {
            let evicted = self.scroll_up_region(1);
            if full_screen {
                evicted
            } else {
                Vec::new()
            }
        } else {
            if self.cursor_row + 1 < self.rows {
                self.cursor_row += 1;
            }
            Vec::new()
        }
    }

    pub fn reverse_line_feed(&mut self) {
        if self.cursor_row == self.scroll_top {
            self.scroll_down_region(1);
        } else if self.cursor_row > 0 {
            self.cursor_row -= 1;
        }
    }

    pub fn carriage_return(&mut self) {
        self.cursor_col = 0;
        self.pending_wrap = false;
    }

    pub fn tab(&mut self) {
        let mut c = self.cursor_col + 1;
        while c < self.cols && !self.tab_stops.get(c as usize).copied().unwrap_or(false) {
            c += 1;
        }
        self.cursor_col = c.min(self.cols - 1);
    }

    pub fn backspace(&mut self) {
        if self.cursor_col > 0 {
            self.cursor_col -= 1;
        }
    }

    /// Scroll the region `[scroll_top, scroll_bottom]` up by `n`, evicting
    /// the top `n` rows of the region. Returns evicted rows so the caller can
    /// forward full-screen evictions into scrollback (§4.2 `push_line`).
    pub fn scroll_up_region(&mut self, n: u16) -> Vec<Vec<ScreenCell>> {
        let n = n.min(self.scroll_bottom - self.scroll_top + 1);
        let mut evicted = Vec::new();
        for _ in 0..n {
            let top_row: Vec<ScreenCell> = (0..self.cols).map(|c| self.cell(c, self.scroll_top)).collect();
            evicted.push(top_row);
            for row in self.scroll_top..self.scroll_bottom {
                for col in 0..self.cols {
                    let below = self.cell(col, row + 1);
                    self.set_cell(col, row, below);
                }
            }
            for col in 0..self.cols {
                self.set_cell(col, self.scroll_bottom, ScreenCell::default());
            }
        }
        evicted
    }

    pub fn scroll_down_region(&mut self, n: u16) {
        let n = n.min(self.scroll_bottom - self.scroll_top + 1);
        for _ in 0..n {
            let mut row = self.scroll_bottom;
            while row > self.scroll_top {
                for col in 0..self.cols {
                    let above = self.cell(col, row - 1);
                    self.set_cell(col, row, above);
                }
                row -= 1;
            }
            for col in 0..self.cols {
                self.set_cell(col, self.scroll_top, ScreenCell::default());
            }
        }
    }

    pub fn insert_lines(&mut self, n: u16) {
        if self.cursor_row < self.scroll_top || self.cursor_row > self.scroll_bottom {
            return;
        }
        let saved_top = self.scroll_top;
        self.scroll_top = self.cursor_row;
        self.scroll_down_region(n);
        self.scroll_top = saved_top;
    }

    pub fn delete_lines(&mut self, n: u16) {
        if self.cursor_row < self.scroll_top || self.cursor_row > self.scroll_bottom {
            return;
        }
        let saved_top = self.scroll_top;
        self.scroll_top = self.cursor_row;
        self.scroll_up_region(n);
        self.scroll_top = saved_top;
    }

    pub fn insert_chars(&mut self, n: u16) {
        let row = self.cursor_row;
        let mut col = self.cols.saturating_sub(1);
        while col > self.cursor_col + n.saturating_sub(1) && col >= n {
            let src = self.cell(col - n, row);
            self.set_cell(col, row, src);
            if col == 0 {
                break;
            }
            col -= 1;
        }
        for c in self.cursor_col..(self.cursor_col + n).min(self.cols) {
            self.set_cell(c, row, ScreenCell::default());
        }
    }

    pub fn delete_chars(&mut self, n: u16) {
        let row = self.cursor_row;
        for col in self.cursor_col..self.cols {
            let src_col = col + n;
            let src = if src_col < self.cols {
                self.cell(src_col, row)
            } else {
                ScreenCell::default()
            };
            self.set_cell(col, row, src);
        }
    }

    pub fn erase_chars(&mut self, n: u16) {
        let row = self.cursor_row;
        for c in self.cursor_col..(self.cursor_col + n).min(self.cols) {
            self.set_cell(c, row, ScreenCell::default());
        }
    }

    /// ED: `0` cursor-to-end, `1` start-to-cursor, `2`/`3` whole screen.
    pub fn erase_display(&mut self, mode: u16) {
        match mode {
            0 => {
                self.erase_line_from_cursor();
                for row in (self.cursor_row + 1)..self.rows {
                    self.clear_row(row);
                }
            }
            1 => {
                for row in 0..self.cursor_row {
                    self.clear_row(row);
                }
                self.erase_line_to_cursor();
            }
            _ => {
                for row in 0..self.rows {
                    self.clear_row(row);
                }
            }
        }
    }

    /// EL: `0` cursor-to-end, `1` start-to-cursor, `2` whole line.
    pub fn erase_line(&mut self, mode: u16) {
        match mode {
            0 => self.erase_line_from_cursor(),
            1 => self.erase_line_to_cursor(),
            _ => self.clear_row(self.cursor_row),
        }
    }

    fn erase_line_from_cursor(&mut self) {
        let row = self.cursor_row;
        for c in self.cursor_col..self.cols {
            self.set_cell(c, row, ScreenCell::default());
        }
    }

    fn erase_line_to_cursor(&mut self) {
        let row = self.cursor_row;
        for c in 0..=self.cursor_col.min(self.cols - 1) {
            self.set_cell(c, row, ScreenCell::default());
        }
    }

    fn clear_row(&mut self, row: u16) {
        for c in 0..self.cols {
            self.set_cell(c, row, ScreenCell::default());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_char_writes_continuation_sentinel() {
        let mut s = VtScreen::new(10, 5);
        s.print('中' as u32, 2, CellAttr::default(), true);
        assert_eq!(s.cell(1, 0).codepoint, CONTINUATION);
        assert_eq!(s.cursor_col, 2);
    }

    #[test]
    fn autowrap_defers_to_next_print() {
        let mut s = VtScreen::new(4, 3);
        for _ in 0..4 {
            s.print('a' as u32, 1, CellAttr::default(), true);
        }
        assert_eq!(s.cursor_row, 0);
        assert!(s.pending_wrap);
        s.print('b' as u32, 1, CellAttr::default(), true);
        assert_eq!(s.cursor_row, 1);
        assert_eq!(s.cursor_col, 1);
    }

    #[test]
    fn scroll_up_region_evicts_top_row() {
        let mut s = VtScreen::new(3, 3);
        s.print('a' as u32, 1, CellAttr::default(), true);
        let evicted = s.scroll_up_region(1);
        assert_eq!(evicted.len(), 1);
        assert_eq!(evicted[0][0].codepoint, 'a' as u32);
        assert_eq!(s.cell(0, 0).codepoint, ' ' as u32);
    }

    #[test]
    fn resize_preserves_overlap_and_clamps_cursor() {
        let mut s = VtScreen::new(5, 5);
        s.cursor_col = 4;
        s.cursor_row = 4;
        s.resize(3, 3);
        assert_eq!((s.cursor_col, s.cursor_row), (2, 2));
    }
}
