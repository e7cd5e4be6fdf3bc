//! The `vte::Perform` implementation and its event queue (§4.6).
//!
//! `Decoder` owns the two screen planes directly and mutates them inline for
//! anything it can resolve on its own (cursor motion, printing, erasing).
//! Anything that needs the grid or the widget manager — which `Decoder` does
//! not own, to keep `Parser::advance` the single re-entry point — is queued
//! as a [`TermEvent`] and drained by `Terminal::drain_pty` after `advance`
//! returns.

use std::collections::{BTreeSet, VecDeque};

use unicode_width::UnicodeWidthChar;
use vte::{Params, Perform};

use crate::color::SgrColor;
use crate::screen::{CellAttr, ScreenCell, VtScreen};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseMode {
    Off,
    X10,
    Normal,
    ButtonEvent,
    AnyEvent,
}

#[derive(Debug)]
pub enum TermEvent {
    /// A main-screen line scrolled off the top and should enter scrollback.
    PushLine(Vec<ScreenCell>),
    /// The user-invoked reverse-scroll popped a line back off scrollback.
    PopLine,
    AltScreenChanged(bool),
    Bell,
    TitleChanged(String),
    /// A `99999;...` OSC payload, prefix already stripped.
    Osc(String),
}

pub struct Decoder {
    pub main: VtScreen,
    pub alt: VtScreen,
    pub alt_active: bool,
    pub cursor_visible: bool,
    pub mouse_mode: MouseMode,
    pub sgr_mouse: bool,
    pub bracketed_paste: bool,
    pub autowrap: bool,
    pub app_cursor_keys: bool,
    attr: CellAttr,
    dirty_rows: BTreeSet<u16>,
    pub full_redraw: bool,
    pub events: VecDeque<TermEvent>,
}

impl Decoder {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            main: VtScreen::new(cols, rows),
            alt: VtScreen::new(cols, rows),
            alt_active: false,
            cursor_visible: true,
            mouse_mode: MouseMode::Off,
            sgr_mouse: false,
            bracketed_paste: false,
            autowrap: true,
            app_cursor_keys: false,
            attr: CellAttr::default(),
            dirty_rows: BTreeSet::new(),
            full_redraw: true,
            events: VecDeque::new(),
        }
    }

    pub fn active(&self) -> &VtScreen {
        if self.alt_active {
            &self.alt
        } else {
            &self.main
        }
    }

    pub fn active_mut(&mut self) -> &mut VtScreen {
        if self.alt_active {
            &mut self.alt
        } else {
            &mut self.main
        }
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.main.resize(cols, rows);
        self.alt.resize(cols, rows);
        self.full_redraw = true;
        self.dirty_rows.clear();
    }

    /// Drain and clear the set of rows touched since the last sync.
    pub fn take_dirty_rows(&mut self) -> BTreeSet<u16> {
        std::mem::take(&mut self.dirty_rows)
    }

    fn mark_row(&mut self, row: u16) {
        self.dirty_rows.insert(row);
    }

    fn reset_sgr(&mut self) {
        self.attr = CellAttr::default();
    }

    fn apply_sgr(&mut self, params: &Params) {
        if params.is_empty() {
            self.reset_sgr();
            return;
        }
        // `vte` groups colon-joined subparameters (`4:3`) into one slice per
        // top-level parameter, distinct from semicolon-separated ones (`4;3`
        // arrives as two single-element groups). Match on whole groups so
        // the two don't collapse into each other.
        let groups: Vec<&[u16]> = params.iter().collect();
        let mut i = 0;
        while i < groups.len() {
            let group = groups[i];
            let head = group.first().copied().unwrap_or(0);
            match group {
                [4, 2] => self.attr.underline = 2,
                [4, 3] => self.attr.underline = 3,
                [4, ..] => self.attr.underline = 1,
                _ => match head {
                    0 => self.reset_sgr(),
                    1 => self.attr.bold = true,
                    3 => self.attr.italic = true,
                    9 => self.attr.strike = true,
                    7 => self.attr.reverse = true,
                    21 => self.attr.underline = 2,
                    22 => self.attr.bold = false,
                    23 => self.attr.italic = false,
                    24 => self.attr.underline = 0,
                    27 => self.attr.reverse = false,
                    29 => self.attr.strike = false,
                    30..=37 => self.attr.fg = SgrColor::Named((head - 30) as u8),
                    38 => {
                        if let Some((color, extra)) = self.parse_extended_color(group, &groups[i + 1..]) {
                            self.attr.fg = color;
                            i += extra;
                        }
                    }
                    39 => self.attr.fg = SgrColor::Default,
                    40..=47 => self.attr.bg = SgrColor::Named((head - 40) as u8),
                    48 => {
                        if let Some((color, extra)) = self.parse_extended_color(group, &groups[i + 1..]) {
                            self.attr.bg = color;
                            i += extra;
                        }
                    }
                    49 => self.attr.bg = SgrColor::Default,
                    90..=97 => self.attr.fg = SgrColor::Named((head - 90 + 8) as u8),
                    100..=107 => self.attr.bg = SgrColor::Named((head - 100 + 8) as u8),
                    _ => {}
                },
            }
            i += 1;
        }
    }

    /// Parses the subparameters of a `38`/`48` group. `group` is the `38`/`48`
    /// group itself; when the colon form packs subparams into it directly
    /// (`38:5:1`) they're read from there, otherwise they're read from the
    /// following semicolon-separated groups (`38;5;1`) and `extra` reports
    /// how many of those were consumed.
    fn parse_extended_color(&self, group: &[u16], following: &[&[u16]]) -> Option<(SgrColor, usize)> {
        if group.len() > 1 {
            return match group[1] {
                5 => group.get(2).map(|idx| (SgrColor::Indexed(*idx as u8), 0)),
                2 if group.len() >= 5 => Some((
                    SgrColor::Rgb(group[2] as u8, group[3] as u8, group[4] as u8),
                    0,
                )),
                _ => None,
            };
        }
        match following.first()?.first()? {
            5 => following
                .get(1)
                .and_then(|g| g.first())
                .map(|idx| (SgrColor::Indexed(*idx as u8), 2)),
            2 if following.len() >= 4 => Some((
                SgrColor::Rgb(
                    following[1].first().copied().unwrap_or(0) as u8,
                    following[2].first().copied().unwrap_or(0) as u8,
                    following[3].first().copied().unwrap_or(0) as u8,
                ),
                4,
            )),
            _ => None,
        }
    }

    fn set_private_mode(&mut self, code: u16, enabled: bool) {
        match code {
            1 => self.app_cursor_keys = enabled,
            7 => self.autowrap = enabled,
            25 => self.cursor_visible = enabled,
            1000 => self.mouse_mode = if enabled { MouseMode::X10 } else { MouseMode::Off },
            1002 => self.mouse_mode = if enabled { MouseMode::ButtonEvent } else { MouseMode::Off },
            1003 => self.mouse_mode = if enabled { MouseMode::AnyEvent } else { MouseMode::Off },
            1006 => self.sgr_mouse = enabled,
            2004 => self.bracketed_paste = enabled,
            47 | 1047 => self.switch_alt_screen(enabled),
            1049 => {
                if enabled {
                    self.main.save_cursor();
                } else {
                    self.main.restore_cursor();
                }
                self.switch_alt_screen(enabled);
            }
            _ => {}
        }
    }

    fn switch_alt_screen(&mut self, enable: bool) {
        if self.alt_active == enable {
            return;
        }
        self.alt_active = enable;
        if enable {
            let (cols, rows) = (self.main.cols(), self.main.rows());
            self.alt = VtScreen::new(cols, rows);
        }
        self.full_redraw = true;
        self.events.push_back(TermEvent::AltScreenChanged(enable));
    }
}

impl Perform for Decoder {
    fn print(&mut self, c: char) {
        let width = c.width().unwrap_or(1).max(1);
        let attr = self.attr;
        let autowrap = self.autowrap;
        let row = self.active().cursor_row;
        let touched = self.active_mut().print(c as u32, width, attr, autowrap);
        for (_, r) in touched {
            self.mark_row(r);
        }
        // Row may have changed if autowrap advanced to a new line first.
        self.mark_row(row);
    }

    fn execute(&mut self, byte: u8) {
        match byte {
            0x07 => self.events.push_back(TermEvent::Bell),
            0x08 => self.active_mut().backspace(),
            0x09 => self.active_mut().tab(),
            0x0a | 0x0b | 0x0c => {
                let full_screen = !self.alt_active
                    && self.active().scroll_top == 0
                    && self.active().scroll_bottom == self.active().rows() - 1
                    && self.active().cursor_row == self.active().scroll_bottom;
                let evicted = self.active_mut().line_feed_returning_evicted(full_screen);
                for line in evicted {
                    self.events.push_back(TermEvent::PushLine(line));
                }
                self.full_redraw = true;
            }
            0x0d => self.active_mut().carriage_return(),
            _ => {}
        }
    }

    fn osc_dispatch(&mut self, params: &[&[u8]], _bell_terminated: bool) {
        if params.is_empty() {
            return;
        }
        let cmd = String::from_utf8_lossy(params[0]);
        match cmd.as_ref() {
            "99999" => {
                let payload = params[1..]
                    .iter()
                    .map(|p| String::from_utf8_lossy(p).into_owned())
                    .collect::<Vec<_>>()
                    .join(";");
                self.events.push_back(TermEvent::Osc(payload));
            }
            "0" | "1" | "2" => {
                if let Some(title) = params.get(1) {
                    self.events.push_back(TermEvent::TitleChanged(
                        String::from_utf8_lossy(title).into_owned(),
                    ));
                }
            }
            _ => {}
        }
    }

    fn csi_dispatch(&mut self, params: &Params, intermediates: &[u8], _ignore: bool, action: char) {
        let p = |idx: usize, default: u16| -> u16 {
            params
                .iter()
                .nth(idx)
                .and_then(|s| s.first().copied())
                .filter(|v| *v != 0)
                .unwrap_or(default)
        };
        let private = intermediates.first() == Some(&b'?');
        match action {
            'A' => self.active_mut().cursor_row = self.active().cursor_row.saturating_sub(p(0, 1)),
            'B' => {
                let r = (self.active().cursor_row + p(0, 1)).min(self.active().rows() - 1);
                self.active_mut().cursor_row = r;
            }
            'C' => {
                let c = (self.active().cursor_col + p(0, 1)).min(self.active().cols() - 1);
                self.active_mut().cursor_col = c;
            }
            'D' => self.active_mut().cursor_col = self.active().cursor_col.saturating_sub(p(0, 1)),
            'E' => {
                let r = (self.active().cursor_row + p(0, 1)).min(self.active().rows() - 1);
                self.active_mut().cursor_row = r;
                self.active_mut().cursor_col = 0;
            }
            'F' => {
                self.active_mut().cursor_row = self.active().cursor_row.saturating_sub(p(0, 1));
                self.active_mut().cursor_col = 0;
            }
            'G' => {
                let c = p(0, 1).saturating_sub(1).min(self.active().cols() - 1);
                self.active_mut().cursor_col = c;
            }
            'd' => {
                let r = p(0, 1).saturating_sub(1).min(self.active().rows() - 1);
                self.active_mut().cursor_row = r;
            }
            'H' | 'f' => {
                let row = p(0, 1).saturating_sub(1).min(self.active().rows() - 1);
                let col = p(1, 1).saturating_sub(1).min(self.active().cols() - 1);
                self.active_mut().cursor_row = row;
                self.active_mut().cursor_col = col;
            }
            'J' => {
                self.active_mut().erase_display(p(0, 0));
                self.full_redraw = true;
            }
            'K' => {
                let row = self.active().cursor_row;
                self.active_mut().erase_line(p(0, 0));
                self.mark_row(row);
            }
            'L' => {
                self.active_mut().insert_lines(p(0, 1));
                self.full_redraw = true;
            }
            'M' => {
                self.active_mut().delete_lines(p(0, 1));
                self.full_redraw = true;
            }
            '@' => {
                let row = self.active().cursor_row;
                self.active_mut().insert_chars(p(0, 1));
                self.mark_row(row);
            }
            'P' => {
                let row = self.active().cursor_row;
                self.active_mut().delete_chars(p(0, 1));
                self.mark_row(row);
            }
            'X' => {
                let row = self.active().cursor_row;
                self.active_mut().erase_chars(p(0, 1));
                self.mark_row(row);
            }
            'S' => {
                let n = p(0, 1);
                let full_screen = !self.alt_active
                    && self.active().scroll_top == 0
                    && self.active().scroll_bottom == self.active().rows() - 1;
                let evicted = self.active_mut().scroll_up_region(n);
                if full_screen {
                    for line in evicted {
                        self.events.push_back(TermEvent::PushLine(line));
                    }
                }
                self.full_redraw = true;
            }
            'T' => {
                self.active_mut().scroll_down_region(p(0, 1));
                self.full_redraw = true;
            }
            'r' => {
                let top = p(0, 1).saturating_sub(1);
                let bottom = p(1, self.active().rows()).saturating_sub(1).min(self.active().rows() - 1);
                if top < bottom {
                    self.active_mut().scroll_top = top;
                    self.active_mut().scroll_bottom = bottom;
                }
                self.active_mut().cursor_col = 0;
                self.active_mut().cursor_row = 0;
            }
            'm' => self.apply_sgr(params),
            'h' if private => {
                for sp in params.iter() {
                    if let Some(code) = sp.first() {
                        self.set_private_mode(*code, true);
                    }
                }
            }
            'l' if private => {
                for sp in params.iter() {
                    if let Some(code) = sp.first() {
                        self.set_private_mode(*code, false);
                    }
                }
            }
            _ => {}
        }
    }

    fn esc_dispatch(&mut self, _intermediates: &[u8], _ignore: bool, byte: u8) {
        match byte {
            b'7' => self.active_mut().save_cursor(),
            b'8' => self.active_mut().restore_cursor(),
            b'M' => self.active_mut().reverse_line_feed(),
            b'c' => {
                let (cols, rows) = (self.active().cols(), self.active().rows());
                *self.active_mut() = VtScreen::new(cols, rows);
                self.full_redraw = true;
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(bytes: &[u8]) -> Decoder {
        let mut decoder = Decoder::new(80, 24);
        let mut parser = vte::Parser::new();
        parser.advance(&mut decoder, bytes);
        decoder
    }

    #[test]
    fn colon_subparam_sets_curly_underline_not_italic() {
        let decoder = feed(b"\x1b[4:3m");
        assert_eq!(decoder.attr.underline, 3);
        assert!(!decoder.attr.italic);
    }

    #[test]
    fn colon_subparam_sets_double_underline() {
        let decoder = feed(b"\x1b[4:2m");
        assert_eq!(decoder.attr.underline, 2);
    }

    #[test]
    fn semicolon_params_stay_independent() {
        let decoder = feed(b"\x1b[4;3m");
        assert_eq!(decoder.attr.underline, 1);
        assert!(decoder.attr.italic);
    }

    #[test]
    fn colon_extended_fg_indexed() {
        let decoder = feed(b"\x1b[38:5:196m");
        assert_eq!(decoder.attr.fg, SgrColor::Indexed(196));
    }

    #[test]
    fn semicolon_extended_fg_rgb() {
        let decoder = feed(b"\x1b[38;2;10;20;30m");
        assert_eq!(decoder.attr.fg, SgrColor::Rgb(10, 20, 30));
        // A trailing param after the consumed RGB triple still applies.
        let decoder = feed(b"\x1b[38;2;10;20;30;1m");
        assert!(decoder.attr.bold);
    }
}
