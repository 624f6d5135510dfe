use core::cmp::Ordering;

use super::ValueResolver;
use crate::hb::ot::glyph_class;
use crate::hb::ot_layout_gsubgpos::OT::hb_ot_apply_context_t;
use crate::hb::ot_layout_gsubgpos::{skipping_iterator_t, Apply};
use read_fonts::tables::gpos::{PairPosFormat1, PairPosFormat2, PairValueRecord};

impl Apply for PairPosFormat1<'_> {
    fn apply(&self, ctx: &mut hb_ot_apply_context_t) -> Option<()> {
        let index = self.coverage().ok()?.get(ctx.buffer.cur(0).as_glyph())?;
        let second = next_glyph_index(ctx)?;
        let second_glyph = ctx.buffer.info[second].glyph_id;

        let set = self.pair_sets().get(usize::from(index)).ok()?;
        let Some(record) = find_pair(&set.pair_value_records(), second_glyph) else {
            ctx.buffer
                .unsafe_to_concat(Some(ctx.buffer.idx), Some(second + 1));
            return None;
        };

        // Device offsets are relative to the pair set.
        let data = set.offset_data();
        apply_pair(
            ctx,
            second,
            ValueResolver::new(record.value_record1().clone(), data),
            ValueResolver::new(record.value_record2().clone(), data),
        )
    }
}

fn find_pair<'a>(
    records: &read_fonts::array::ComputedArray<'a, PairValueRecord>,
    second_glyph: u32,
) -> Option<PairValueRecord> {
    let mut lo = 0;
    let mut hi = records.len();
    while lo < hi {
        let mid = (lo + hi) / 2;
        let record = records.get(mid).ok()?;
        match record.second_glyph().to_u32().cmp(&second_glyph) {
            Ordering::Less => lo = mid + 1,
            Ordering::Greater => hi = mid,
            Ordering::Equal => return Some(record),
        }
    }
    None
}

impl Apply for PairPosFormat2<'_> {
    fn apply(&self, ctx: &mut hb_ot_apply_context_t) -> Option<()> {
        let first_glyph = ctx.buffer.cur(0).as_glyph();
        self.coverage().ok()?.get(first_glyph)?;
        let second = next_glyph_index(ctx)?;
        let second_glyph = ctx.buffer.info[second].as_glyph();

        let class1 = glyph_class(self.class_def1(), first_glyph);
        let class2 = glyph_class(self.class_def2(), second_glyph);
        if class1 >= self.class1_count() || class2 >= self.class2_count() {
            ctx.buffer
                .unsafe_to_concat(Some(ctx.buffer.idx), Some(second + 1));
            return None;
        }

        let record = self
            .class1_records()
            .get(usize::from(class1))
            .and_then(|class1_record| class1_record.class2_records().get(usize::from(class2)))
            .ok()?;

        let data = self.offset_data();
        apply_pair(
            ctx,
            second,
            ValueResolver::new(record.value_record1().clone(), data),
            ValueResolver::new(record.value_record2().clone(), data),
        )
    }
}

/// Finds the glyph the current one pairs with.
fn next_glyph_index(ctx: &mut hb_ot_apply_context_t) -> Option<usize> {
    let mut unsafe_to = 0;
    let found = {
        let mut iter = skipping_iterator_t::new(ctx, false, None);
        iter.reset(ctx.buffer.idx);
        iter.next(Some(&mut unsafe_to)).then(|| iter.index())
    };

    if found.is_none() {
        ctx.buffer
            .unsafe_to_concat(Some(ctx.buffer.idx), Some(unsafe_to));
    }
    found
}

fn apply_pair(
    ctx: &mut hb_ot_apply_context_t,
    second: usize,
    first_value: ValueResolver,
    second_value: ValueResolver,
) -> Option<()> {
    let first = ctx.buffer.idx;
    let applied_first = first_value.apply(ctx, first);
    let applied_second = second_value.apply(ctx, second);

    if applied_first || applied_second {
        ctx.buffer.unsafe_to_break(Some(first), Some(second + 1));
    } else {
        ctx.buffer.unsafe_to_concat(Some(first), Some(second + 1));
    }

    // A value for the second glyph consumes it.
    let mut next = second;
    if !second_value.is_empty() {
        next += 1;
        ctx.buffer.unsafe_to_break(Some(first), Some(next + 1));
    }

    ctx.buffer.idx = next;
    Some(())
}
