use super::anchor_position;
use crate::hb::buffer::{GlyphInfo, HB_BUFFER_SCRATCH_FLAG_HAS_GPOS_ATTACHMENT};
use crate::hb::ot_layout_common::lookup_flags;
use crate::hb::ot_layout_gpos_table::attach_type;
use crate::hb::ot_layout_gsubgpos::OT::hb_ot_apply_context_t;
use crate::hb::ot_layout_gsubgpos::{match_t, skipping_iterator_t, Apply, MatchSource};
use read_fonts::tables::gpos::{
    AnchorTable, MarkArray, MarkBasePosFormat1, MarkLigPosFormat1, MarkMarkPosFormat1,
};

impl Apply for MarkBasePosFormat1<'_> {
    fn apply(&self, ctx: &mut hb_ot_apply_context_t) -> Option<()> {
        let mark_index = self
            .mark_coverage()
            .ok()?
            .get(ctx.buffer.cur(0).as_glyph())?;
        let base_coverage = self.base_coverage().ok()?;

        let idx = find_base(ctx, |info, i| {
            accept(info, i) || base_coverage.get(info[i].as_glyph()).is_some()
        })?;

        let Some(base_index) = base_coverage.get(ctx.buffer.info[idx].as_glyph()) else {
            ctx.buffer
                .unsafe_to_concat_from_outbuffer(Some(idx), Some(ctx.buffer.idx + 1));
            return None;
        };

        let mark_array = self.mark_array().ok()?;
        let (mark_class, mark_anchor) = mark_record(&mark_array, mark_index)?;

        let base_array = self.base_array().ok()?;
        let base_record = base_array
            .base_records()
            .get(usize::from(base_index))
            .ok()?;
        // No anchor for this class leaves the mark to later subtables.
        let base_anchor = base_record
            .base_anchors(base_array.offset_data())
            .get(usize::from(mark_class))?
            .ok()?;

        attach_mark(ctx, &mark_anchor, &base_anchor, idx)
    }
}

impl Apply for MarkLigPosFormat1<'_> {
    fn apply(&self, ctx: &mut hb_ot_apply_context_t) -> Option<()> {
        let mark_index = self
            .mark_coverage()
            .ok()?
            .get(ctx.buffer.cur(0).as_glyph())?;

        let idx = find_base(ctx, |_, _| true)?;

        let Some(lig_index) = self
            .ligature_coverage()
            .ok()?
            .get(ctx.buffer.info[idx].as_glyph())
        else {
            ctx.buffer
                .unsafe_to_concat_from_outbuffer(Some(idx), Some(ctx.buffer.idx + 1));
            return None;
        };

        let lig_attach = self
            .ligature_array()
            .ok()?
            .ligature_attaches()
            .get(usize::from(lig_index))
            .ok()?;

        let comp_count = lig_attach.component_count();
        if comp_count == 0 {
            ctx.buffer
                .unsafe_to_concat_from_outbuffer(Some(idx), Some(ctx.buffer.idx + 1));
            return None;
        }

        // A mark from the same ligature goes on its own component, anything
        // else on the last one.
        let lig_id = ctx.buffer.info[idx].lig_id();
        let mark_id = ctx.buffer.cur(0).lig_id();
        let mark_comp = u16::from(ctx.buffer.cur(0).lig_comp());
        let comp_index = if lig_id != 0 && lig_id == mark_id && mark_comp > 0 {
            mark_comp.min(comp_count) - 1
        } else {
            comp_count - 1
        };

        let mark_array = self.mark_array().ok()?;
        let (mark_class, mark_anchor) = mark_record(&mark_array, mark_index)?;

        let component = lig_attach
            .component_records()
            .get(usize::from(comp_index))
            .ok()?;
        let lig_anchor = component
            .ligature_anchors(lig_attach.offset_data())
            .get(usize::from(mark_class))?
            .ok()?;

        attach_mark(ctx, &mark_anchor, &lig_anchor, idx)
    }
}

impl Apply for MarkMarkPosFormat1<'_> {
    fn apply(&self, ctx: &mut hb_ot_apply_context_t) -> Option<()> {
        let mark1_index = self
            .mark1_coverage()
            .ok()?
            .get(ctx.buffer.cur(0).as_glyph())?;

        // The closest preceding mark, stopping at anything else.
        let lookup_props = ctx.lookup_props & !u32::from(lookup_flags::IGNORE_FLAGS);
        let mut unsafe_from = 0;
        let found = {
            let mut iter = skipping_iterator_t::new(ctx, false, None);
            iter.reset(ctx.buffer.idx);
            iter.set_lookup_props(lookup_props);
            iter.prev(Some(&mut unsafe_from)).then(|| iter.index())
        };
        let Some(j) = found else {
            ctx.buffer
                .unsafe_to_concat_from_outbuffer(Some(unsafe_from), Some(ctx.buffer.idx + 1));
            return None;
        };

        let prev = ctx.buffer.info[j];
        let cur = *ctx.buffer.cur(0);
        let (id1, comp1) = (cur.lig_id(), cur.lig_comp());
        let (id2, comp2) = (prev.lig_id(), prev.lig_comp());
        let matches = if id1 == id2 {
            // Same base, or same component of a ligature.
            id1 == 0 || comp1 == comp2
        } else {
            // One of the marks may itself be a ligature.
            (id1 > 0 && comp1 == 0) || (id2 > 0 && comp2 == 0)
        };

        let mark2_index = if prev.is_mark() && matches {
            self.mark2_coverage().ok()?.get(prev.as_glyph())
        } else {
            None
        };
        let Some(mark2_index) = mark2_index else {
            ctx.buffer
                .unsafe_to_concat_from_outbuffer(Some(j), Some(ctx.buffer.idx + 1));
            return None;
        };

        let mark1_array = self.mark1_array().ok()?;
        let (mark_class, mark_anchor) = mark_record(&mark1_array, mark1_index)?;

        let mark2_array = self.mark2_array().ok()?;
        let mark2_record = mark2_array
            .mark2_records()
            .get(usize::from(mark2_index))
            .ok()?;
        let mark2_anchor = mark2_record
            .mark2_anchors(mark2_array.offset_data())
            .get(usize::from(mark_class))?
            .ok()?;

        attach_mark(ctx, &mark_anchor, &mark2_anchor, j)
    }
}

fn mark_record<'a>(mark_array: &MarkArray<'a>, index: u16) -> Option<(u16, AnchorTable<'a>)> {
    let record = mark_array.mark_records().get(usize::from(index))?;
    let anchor = record.mark_anchor(mark_array.offset_data()).ok()?;
    Some((record.mark_class(), anchor))
}

/// Searches backwards for the glyph a mark attaches to, skipping marks.
///
/// The result is remembered in the context, so that a run of marks does not
/// scan the same glyphs again.
fn find_base(
    ctx: &mut hb_ot_apply_context_t,
    accept: impl Fn(&[GlyphInfo], usize) -> bool,
) -> Option<usize> {
    if ctx.last_base_until > ctx.buffer.idx as u32 {
        ctx.last_base_until = 0;
        ctx.last_base = -1;
    }

    let mut last_base = ctx.last_base;
    {
        let mut iter = skipping_iterator_t::new(ctx, false, None);
        iter.set_lookup_props(u32::from(lookup_flags::IGNORE_MARKS));

        let mut j = ctx.buffer.idx;
        while j > ctx.last_base_until as usize {
            let mut matched = iter.match_at(j - 1, MatchSource::Info);
            if matched == match_t::MATCH && !accept(&ctx.buffer.info, j - 1) {
                matched = match_t::SKIP;
            }

            if matched == match_t::MATCH {
                last_base = j as i32 - 1;
                break;
            }

            j -= 1;
        }
    }

    ctx.last_base = last_base;
    ctx.last_base_until = ctx.buffer.idx as u32;

    if last_base == -1 {
        ctx.buffer
            .unsafe_to_concat_from_outbuffer(Some(0), Some(ctx.buffer.idx + 1));
        return None;
    }

    Some(last_base as usize)
}

/// Whether a glyph may take marks. Only the first glyph of a multiple
/// substitution does, unless the sequence itself contains a mark.
fn accept(info: &[GlyphInfo], idx: usize) -> bool {
    !info[idx].multiplied()
        || info[idx].lig_comp() == 0
        || idx == 0
        || info[idx - 1].is_mark()
        || !info[idx - 1].multiplied()
        || info[idx].lig_id() != info[idx - 1].lig_id()
        || info[idx].lig_comp() != info[idx - 1].lig_comp() + 1
}

fn attach_mark(
    ctx: &mut hb_ot_apply_context_t,
    mark_anchor: &AnchorTable,
    base_anchor: &AnchorTable,
    glyph_pos: usize,
) -> Option<()> {
    let idx = ctx.buffer.idx;
    ctx.buffer.unsafe_to_break(Some(glyph_pos), Some(idx + 1));

    let font = ctx.font;
    let (mark_x, mark_y) = anchor_position(font, mark_anchor, ctx.buffer.cur(0).glyph_id);
    let (base_x, base_y) = anchor_position(font, base_anchor, ctx.buffer.info[glyph_pos].glyph_id);

    let pos = ctx.buffer.cur_pos_mut();
    pos.x_offset = base_x - mark_x;
    pos.y_offset = base_y - mark_y;
    pos.set_attach_type(attach_type::MARK);
    pos.set_attach_chain((glyph_pos as isize - idx as isize) as i16);

    ctx.buffer.scratch_flags |= HB_BUFFER_SCRATCH_FLAG_HAS_GPOS_ATTACHMENT;
    ctx.buffer.idx += 1;
    Some(())
}
