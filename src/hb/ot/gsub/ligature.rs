use crate::hb::buffer::GlyphInfo;
use crate::hb::ot_layout_gsubgpos::OT::hb_ot_apply_context_t;
use crate::hb::ot_layout_gsubgpos::{
    ligate_input, match_input, Apply, WouldApply, WouldApplyContext,
};
use read_fonts::tables::gsub::{Ligature, LigatureSet, LigatureSubstFormat1};
use read_fonts::types::GlyphId;

impl WouldApply for Ligature<'_> {
    fn would_apply(&self, ctx: &WouldApplyContext) -> bool {
        let components = self.component_glyph_ids();
        ctx.glyphs.len() == components.len() + 1
            && components
                .iter()
                .zip(&ctx.glyphs[1..])
                .all(|(component, &glyph)| GlyphId::from(component.get()) == glyph)
    }
}

impl Apply for Ligature<'_> {
    fn apply(&self, ctx: &mut hb_ot_apply_context_t) -> Option<()> {
        let lig_glyph = GlyphId::from(self.ligature_glyph());
        let components = self.component_glyph_ids();

        // A one-component ligature is a plain substitution.
        if components.is_empty() {
            ctx.replace_glyph(lig_glyph);
            return Some(());
        }

        let match_component = |info: &GlyphInfo, index: u16| {
            components
                .get(usize::from(index))
                .is_some_and(|component| info.glyph_id == u32::from(component.get().to_u16()))
        };

        let mut match_end = 0;
        let mut total_component_count = 0;
        if !match_input(
            ctx,
            components.len() as u16,
            &match_component,
            &mut match_end,
            Some(&mut total_component_count),
        ) {
            ctx.buffer
                .unsafe_to_concat(Some(ctx.buffer.idx), Some(match_end));
            return None;
        }

        ligate_input(
            ctx,
            components.len() + 1,
            match_end,
            total_component_count,
            lig_glyph,
        );
        Some(())
    }
}

impl WouldApply for LigatureSet<'_> {
    fn would_apply(&self, ctx: &WouldApplyContext) -> bool {
        self.ligatures()
            .iter()
            .filter_map(Result::ok)
            .any(|ligature| ligature.would_apply(ctx))
    }
}

impl Apply for LigatureSet<'_> {
    fn apply(&self, ctx: &mut hb_ot_apply_context_t) -> Option<()> {
        // Ligatures are ordered by preference, the first match wins.
        self.ligatures()
            .iter()
            .filter_map(Result::ok)
            .find_map(|ligature| ligature.apply(ctx))
    }
}

impl WouldApply for LigatureSubstFormat1<'_> {
    fn would_apply(&self, ctx: &WouldApplyContext) -> bool {
        self.coverage()
            .ok()
            .and_then(|coverage| coverage.get(ctx.glyphs[0]))
            .and_then(|index| self.ligature_sets().get(usize::from(index)).ok())
            .is_some_and(|set| set.would_apply(ctx))
    }
}

impl Apply for LigatureSubstFormat1<'_> {
    fn apply(&self, ctx: &mut hb_ot_apply_context_t) -> Option<()> {
        let index = self.coverage().ok()?.get(ctx.buffer.cur(0).as_glyph())?;
        self.ligature_sets()
            .get(usize::from(index))
            .ok()?
            .apply(ctx)
    }
}
