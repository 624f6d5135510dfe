use super::ValueResolver;
use crate::hb::ot_layout_gsubgpos::OT::hb_ot_apply_context_t;
use crate::hb::ot_layout_gsubgpos::Apply;
use read_fonts::tables::gpos::{SinglePosFormat1, SinglePosFormat2};

impl Apply for SinglePosFormat1<'_> {
    fn apply(&self, ctx: &mut hb_ot_apply_context_t) -> Option<()> {
        self.coverage().ok()?.get(ctx.buffer.cur(0).as_glyph())?;
        let value = ValueResolver::new(self.value_record().clone(), self.offset_data());
        let idx = ctx.buffer.idx;
        value.apply(ctx, idx);
        ctx.buffer.idx += 1;
        Some(())
    }
}

impl Apply for SinglePosFormat2<'_> {
    fn apply(&self, ctx: &mut hb_ot_apply_context_t) -> Option<()> {
        let index = self.coverage().ok()?.get(ctx.buffer.cur(0).as_glyph())?;
        let record = self.value_records().get(usize::from(index)).ok()?;
        let value = ValueResolver::new(record, self.offset_data());
        let idx = ctx.buffer.idx;
        value.apply(ctx, idx);
        ctx.buffer.idx += 1;
        Some(())
    }
}
