use crate::hb::buffer::GlyphPropsFlags;
use crate::hb::ot_layout_gsubgpos::OT::hb_ot_apply_context_t;
use crate::hb::ot_layout_gsubgpos::{Apply, WouldApply, WouldApplyContext};
use read_fonts::tables::gsub::MultipleSubstFormat1;

impl WouldApply for MultipleSubstFormat1<'_> {
    fn would_apply(&self, ctx: &WouldApplyContext) -> bool {
        ctx.glyphs.len() == 1
            && self
                .coverage()
                .is_ok_and(|coverage| coverage.get(ctx.glyphs[0]).is_some())
    }
}

impl Apply for MultipleSubstFormat1<'_> {
    fn apply(&self, ctx: &mut hb_ot_apply_context_t) -> Option<()> {
        let index = self.coverage().ok()?.get(ctx.buffer.cur(0).as_glyph())?;
        let sequence = self.sequences().get(usize::from(index)).ok()?;
        let substitutes = sequence.substitute_glyph_ids();

        match substitutes {
            // Empty sequences are invalid but Uniscribe deletes the glyph.
            [] => ctx.buffer.delete_glyph(),
            // In place, and not counted as multiplied.
            [single] => ctx.replace_glyph(single.get().into()),
            _ => {
                let class = if ctx.buffer.cur(0).is_ligature() {
                    GlyphPropsFlags::BASE_GLYPH
                } else {
                    GlyphPropsFlags::empty()
                };
                // Marks attached to a ligature keep their component.
                let lig_id = ctx.buffer.cur(0).lig_id();

                for (i, substitute) in substitutes.iter().enumerate() {
                    if lig_id == 0 {
                        ctx.buffer.cur_mut(0).set_lig_props_for_component(i as u8);
                    }
                    ctx.output_glyph_for_component(substitute.get().into(), class);
                }

                ctx.buffer.skip_glyph();
            }
        }

        Some(())
    }
}
