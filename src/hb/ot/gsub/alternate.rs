use crate::hb::ot_layout_gsubgpos::OT::hb_ot_apply_context_t;
use crate::hb::ot_layout_gsubgpos::{Apply, WouldApply, WouldApplyContext};
use crate::hb::ot_map::HB_OT_MAP_MAX_VALUE;
use read_fonts::tables::gsub::AlternateSubstFormat1;

impl WouldApply for AlternateSubstFormat1<'_> {
    fn would_apply(&self, ctx: &WouldApplyContext) -> bool {
        ctx.glyphs.len() == 1
            && self
                .coverage()
                .is_ok_and(|coverage| coverage.get(ctx.glyphs[0]).is_some())
    }
}

impl Apply for AlternateSubstFormat1<'_> {
    fn apply(&self, ctx: &mut hb_ot_apply_context_t) -> Option<()> {
        let index = self.coverage().ok()?.get(ctx.buffer.cur(0).as_glyph())?;
        let set = self.alternate_sets().get(usize::from(index)).ok()?;
        let alternates = set.alternate_glyph_ids();
        let count = alternates.len() as u32;
        if count == 0 {
            return None;
        }

        // The feature value selects the alternate. This breaks if two
        // features enabled the lookup together.
        let lookup_mask = ctx.lookup_mask();
        let shift = lookup_mask.trailing_zeros();
        let mut alt_index = (lookup_mask & ctx.buffer.cur(0).mask) >> shift;

        if alt_index == HB_OT_MAP_MAX_VALUE && ctx.random {
            // Random state changes, so nothing here is safe to break.
            let len = ctx.buffer.len;
            ctx.buffer.unsafe_to_break(Some(0), Some(len));
            alt_index = ctx.random_number() % count + 1;
        }

        if alt_index == 0 || alt_index > count {
            return None;
        }

        let glyph = alternates.get(alt_index as usize - 1)?.get();
        ctx.replace_glyph(glyph.into());
        Some(())
    }
}
