use crate::hb::buffer::GlyphInfo;
use crate::hb::ot::covered;
use crate::hb::ot_layout::MAX_NESTING_LEVEL;
use crate::hb::ot_layout_gsubgpos::OT::hb_ot_apply_context_t;
use crate::hb::ot_layout_gsubgpos::{
    match_backtrack, match_lookahead, Apply, WouldApply, WouldApplyContext,
};
use read_fonts::tables::gsub::ReverseChainSingleSubstFormat1;

impl WouldApply for ReverseChainSingleSubstFormat1<'_> {
    fn would_apply(&self, ctx: &WouldApplyContext) -> bool {
        ctx.glyphs.len() == 1
            && self
                .coverage()
                .is_ok_and(|coverage| coverage.get(ctx.glyphs[0]).is_some())
    }
}

impl Apply for ReverseChainSingleSubstFormat1<'_> {
    fn apply(&self, ctx: &mut hb_ot_apply_context_t) -> Option<()> {
        // Cannot be reached through a context lookup.
        if ctx.nesting_level_left != MAX_NESTING_LEVEL {
            return None;
        }

        let index = self.coverage().ok()?.get(ctx.buffer.cur(0).as_glyph())?;
        let substitute = self.substitute_glyph_ids().get(usize::from(index))?.get();

        let backtrack_coverages = self.backtrack_coverages();
        let lookahead_coverages = self.lookahead_coverages();
        let backtrack = |info: &GlyphInfo, index: u16| {
            covered(backtrack_coverages.get(usize::from(index)), info.as_glyph())
        };
        let lookahead = |info: &GlyphInfo, index: u16| {
            covered(lookahead_coverages.get(usize::from(index)), info.as_glyph())
        };

        let mut start_index = 0;
        let mut end_index = 0;
        if match_backtrack(
            ctx,
            backtrack_coverages.len() as u16,
            &backtrack,
            &mut start_index,
        ) && match_lookahead(
            ctx,
            lookahead_coverages.len() as u16,
            &lookahead,
            ctx.buffer.idx + 1,
            &mut end_index,
        ) {
            ctx.buffer
                .unsafe_to_break_from_outbuffer(Some(start_index), Some(end_index));
            // The cursor stays put, the reverse driver moves it.
            ctx.replace_glyph_inplace(substitute.into());
            Some(())
        } else {
            ctx.buffer
                .unsafe_to_concat_from_outbuffer(Some(start_index), Some(end_index));
            None
        }
    }
}
