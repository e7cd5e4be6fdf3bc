//! SGR color resolution: ANSI 16 / 256-indexed / truecolor → packed RGB(A).

/// The xterm 16-color table (non-bright 0-7, bright 8-15).
const ANSI_16: [[u8; 3]; 16] = [
    [0x00, 0x00, 0x00],
    [0xcd, 0x00, 0x00],
    [0x00, 0xcd, 0x00],
    [0xcd, 0xcd, 0x00],
    [0x00, 0x00, 0xee],
    [0xcd, 0x00, 0xcd],
    [0x00, 0xcd, 0xcd],
    [0xe5, 0xe5, 0xe5],
    [0x7f, 0x7f, 0x7f],
    [0xff, 0x00, 0x00],
    [0x00, 0xff, 0x00],
    [0xff, 0xff, 0x00],
    [0x5c, 0x5c, 0xff],
    [0xff, 0x00, 0xff],
    [0x00, 0xff, 0xff],
    [0xff, 0xff, 0xff],
];

pub const DEFAULT_FG: [u8; 3] = [0xe5, 0xe5, 0xe5];
pub const DEFAULT_BG: [u8; 3] = [0x00, 0x00, 0x00];

/// Resolve a 0-255 SGR color index to RGB, covering the 16-color table, the
/// 6x6x6 color cube (16-231), and the 24-step grayscale ramp (232-255).
pub fn indexed(idx: u8) -> [u8; 3] {
    if idx < 16 {
        return ANSI_16[idx as usize];
    }
    if idx < 232 {
        let idx = idx - 16;
        let r = idx / 36;
        let g = (idx / 6) % 6;
        let b = idx % 6;
        let scale = |v: u8| if v == 0 { 0 } else { 55 + v * 40 };
        return [scale(r), scale(g), scale(b)];
    }
    let level = 8 + (idx - 232) * 10;
    [level, level, level]
}

/// One resolved SGR color target: either an ANSI index, 256-color index, or
/// 24-bit truecolor spec, parsed from the CSI `38`/`48` subparameter grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SgrColor {
    Named(u8),
    Indexed(u8),
    Rgb(u8, u8, u8),
    Default,
}

impl SgrColor {
    pub fn resolve_fg(self) -> [u8; 3] {
        self.resolve(DEFAULT_FG)
    }

    pub fn resolve_bg(self) -> [u8; 3] {
        self.resolve(DEFAULT_BG)
    }

    fn resolve(self, default: [u8; 3]) -> [u8; 3] {
        match self {
            SgrColor::Named(n) => ANSI_16[(n & 0x0f) as usize],
            SgrColor::Indexed(i) => indexed(i),
            SgrColor::Rgb(r, g, b) => [r, g, b],
            SgrColor::Default => default,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_corners_match_xterm() {
        assert_eq!(indexed(16), [0, 0, 0]);
        assert_eq!(indexed(231), [0xff, 0xff, 0xff]);
    }

    #[test]
    fn grayscale_ramp_endpoints() {
        assert_eq!(indexed(232), [8, 8, 8]);
        assert_eq!(indexed(255), [238, 238, 238]);
    }

    #[test]
    fn named_colors_cover_full_table() {
        assert_eq!(SgrColor::Named(1).resolve_fg(), ANSI_16[1]);
        assert_eq!(SgrColor::Named(9).resolve_fg(), ANSI_16[9]);
    }
}
