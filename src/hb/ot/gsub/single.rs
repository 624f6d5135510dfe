use crate::hb::ot_layout_gsubgpos::OT::hb_ot_apply_context_t;
use crate::hb::ot_layout_gsubgpos::{Apply, WouldApply, WouldApplyContext};
use read_fonts::tables::gsub::{SingleSubstFormat1, SingleSubstFormat2};
use read_fonts::types::GlyphId;

impl WouldApply for SingleSubstFormat1<'_> {
    fn would_apply(&self, ctx: &WouldApplyContext) -> bool {
        ctx.glyphs.len() == 1
            && self
                .coverage()
                .is_ok_and(|coverage| coverage.get(ctx.glyphs[0]).is_some())
    }
}

impl Apply for SingleSubstFormat1<'_> {
    fn apply(&self, ctx: &mut hb_ot_apply_context_t) -> Option<()> {
        let glyph = ctx.buffer.cur(0).glyph_id;
        self.coverage().ok()?.get(glyph)?;
        // Glyph ids wrap around modulo 65536.
        let substitute = (glyph as i32).wrapping_add(i32::from(self.delta_glyph_id())) & 0xFFFF;
        ctx.replace_glyph(GlyphId::new(substitute as u32));
        Some(())
    }
}

impl WouldApply for SingleSubstFormat2<'_> {
    fn would_apply(&self, ctx: &WouldApplyContext) -> bool {
        ctx.glyphs.len() == 1
            && self
                .coverage()
                .is_ok_and(|coverage| coverage.get(ctx.glyphs[0]).is_some())
    }
}

impl Apply for SingleSubstFormat2<'_> {
    fn apply(&self, ctx: &mut hb_ot_apply_context_t) -> Option<()> {
        let index = self.coverage().ok()?.get(ctx.buffer.cur(0).as_glyph())?;
        let substitute = self.substitute_glyph_ids().get(usize::from(index))?.get();
        ctx.replace_glyph(substitute.into());
        Some(())
    }
}
