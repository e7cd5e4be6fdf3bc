//! The packed per-cell GPU payload and the glyph-index address space it lives in.

use bytemuck::{Pod, Zeroable};

/// Wide-character continuation sentinel: the renderer must sample the cell to the left.
pub const GLYPH_WIDE_CONT: u32 = 0x00FFFE;

/// "A widget owns this cell" sentinel: the renderer draws background only.
pub const GLYPH_WIDGET: u32 = 0x00FFFF;

/// Reserved range for per-position custom glyphs claimed by a custom-glyph plugin.
pub const GLYPH_CUSTOM_START: u32 = 0xF000;
pub const GLYPH_CUSTOM_END: u32 = 0xFFFD;

/// Procedural "shader glyph" range — Unicode Plane 16 Private Use Area-B.
/// The codepoint *is* the glyph index; the fragment shader dispatches on it directly.
pub const SHADER_GLYPH_START: u32 = 0x100000;
pub const SHADER_GLYPH_END: u32 = 0x10FFFD;

/// Default glyph index used for a space / blank cell.
pub const GLYPH_SPACE: u32 = 0;

#[inline]
pub fn is_shader_glyph(glyph_index: u32) -> bool {
    (SHADER_GLYPH_START..=SHADER_GLYPH_END).contains(&glyph_index)
}

#[inline]
pub fn is_custom_glyph(glyph_index: u32) -> bool {
    (GLYPH_CUSTOM_START..=GLYPH_CUSTOM_END).contains(&glyph_index) || is_shader_glyph(glyph_index)
}

/// Underline rendering style, packed into bits 2-3 of [`Cell::style`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum UnderlineStyle {
    None = 0,
    Single = 1,
    Double = 2,
    Curly = 3,
}

impl UnderlineStyle {
    fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            1 => Self::Single,
            2 => Self::Double,
            3 => Self::Curly,
            _ => Self::None,
        }
    }
}

/// Style bit-field: bit 0 bold, bit 1 italic, bits 2-3 underline style, bit 4
/// strike-through, bit 5 emoji (render from the emoji atlas instead of MSDF).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CellStyle(pub u8);

impl CellStyle {
    pub const BOLD: u8 = 0b0000_0001;
    pub const ITALIC: u8 = 0b0000_0010;
    pub const STRIKETHROUGH: u8 = 0b0001_0000;
    pub const EMOJI: u8 = 0b0010_0000;

    pub fn new() -> Self {
        Self(0)
    }

    pub fn bold(&self) -> bool {
        self.0 & Self::BOLD != 0
    }
    pub fn italic(&self) -> bool {
        self.0 & Self::ITALIC != 0
    }
    pub fn strikethrough(&self) -> bool {
        self.0 & Self::STRIKETHROUGH != 0
    }
    pub fn emoji(&self) -> bool {
        self.0 & Self::EMOJI != 0
    }
    pub fn underline(&self) -> UnderlineStyle {
        UnderlineStyle::from_bits(self.0 >> 2)
    }

    pub fn set_bold(&mut self, v: bool) {
        self.set_bit(Self::BOLD, v);
    }
    pub fn set_italic(&mut self, v: bool) {
        self.set_bit(Self::ITALIC, v);
    }
    pub fn set_strikethrough(&mut self, v: bool) {
        self.set_bit(Self::STRIKETHROUGH, v);
    }
    pub fn set_emoji(&mut self, v: bool) {
        self.set_bit(Self::EMOJI, v);
    }
    pub fn set_underline(&mut self, style: UnderlineStyle) {
        self.0 = (self.0 & !0b0000_1100) | ((style as u8) << 2);
    }

    fn set_bit(&mut self, mask: u8, v: bool) {
        if v {
            self.0 |= mask;
        } else {
            self.0 &= !mask;
        }
    }
}

/// A single packed terminal cell, exactly 12 bytes, suitable for direct
/// upload into a GPU read-only storage buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct Cell {
    pub glyph_index: u32,
    pub fg: [u8; 4],
    pub bg: [u8; 3],
    pub style: u8,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            glyph_index: GLYPH_SPACE,
            fg: [255, 255, 255, 255],
            bg: [0, 0, 0],
            style: 0,
        }
    }
}

impl Cell {
    pub fn style(&self) -> CellStyle {
        CellStyle(self.style)
    }

    pub fn set_style(&mut self, style: CellStyle) {
        self.style = style.0;
    }

    pub fn is_widget(&self) -> bool {
        self.glyph_index == GLYPH_WIDGET
    }

    pub fn is_wide_continuation(&self) -> bool {
        self.glyph_index == GLYPH_WIDE_CONT
    }
}

const _: () = assert!(std::mem::size_of::<Cell>() == 12);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_is_twelve_bytes() {
        assert_eq!(std::mem::size_of::<Cell>(), 12);
    }

    #[test]
    fn style_bits_round_trip() {
        let mut s = CellStyle::new();
        s.set_bold(true);
        s.set_italic(true);
        s.set_underline(UnderlineStyle::Curly);
        s.set_strikethrough(true);
        s.set_emoji(true);
        assert!(s.bold());
        assert!(s.italic());
        assert_eq!(s.underline(), UnderlineStyle::Curly);
        assert!(s.strikethrough());
        assert!(s.emoji());

        s.set_bold(false);
        assert!(!s.bold());
        assert!(s.italic(), "unsetting bold must not disturb other bits");
    }

    #[test]
    fn glyph_space_ranges() {
        assert!(is_shader_glyph(SHADER_GLYPH_START));
        assert!(is_shader_glyph(SHADER_GLYPH_END));
        assert!(!is_shader_glyph(SHADER_GLYPH_END + 1));
        assert!(is_custom_glyph(GLYPH_CUSTOM_START));
        assert!(is_custom_glyph(SHADER_GLYPH_START));
        assert!(!is_custom_glyph(GLYPH_WIDGET));
    }
}
