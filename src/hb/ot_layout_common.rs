//! Bits shared by GSUB and GPOS lookups.

#[allow(dead_code)]
pub mod lookup_flags {
    pub const RIGHT_TO_LEFT: u16 = 0x0001;
    pub const IGNORE_BASE_GLYPHS: u16 = 0x0002;
    pub const IGNORE_LIGATURES: u16 = 0x0004;
    pub const IGNORE_MARKS: u16 = 0x0008;
    pub const IGNORE_FLAGS: u16 = 0x000E;
    pub const USE_MARK_FILTERING_SET: u16 = 0x0010;
    pub const MARK_ATTACHMENT_TYPE_MASK: u16 = 0xFF00;
}

#[cfg(test)]
mod tests {
    use super::lookup_flags::*;

    #[test]
    fn ignore_flags_match_glyph_classes() {
        use crate::hb::buffer::GlyphPropsFlags;
        assert_eq!(IGNORE_BASE_GLYPHS, GlyphPropsFlags::BASE_GLYPH.bits());
        assert_eq!(IGNORE_LIGATURES, GlyphPropsFlags::LIGATURE.bits());
        assert_eq!(IGNORE_MARKS, GlyphPropsFlags::MARK.bits());
        assert_eq!(IGNORE_FLAGS, GlyphPropsFlags::CLASS_MASK.bits());
    }
}
