//! The legacy `kern` table.
//!
//! Only the pair formats (0, 2 and 3) are applied. Format 1 subtables drive an
//! AAT state machine and are skipped.

use log::trace;
use read_fonts::tables::kern::{Subtable, SubtableKind};
use read_fonts::types::GlyphId;

use super::buffer::*;
use super::ot_layout::TableIndex;
use super::ot_layout_common::lookup_flags;
use super::ot_layout_gpos_table::attach_type;
use super::ot_layout_gsubgpos::{skipping_iterator_t, OT::hb_ot_apply_context_t};
use super::ot_shape_plan::hb_ot_shape_plan_t;
use super::{hb_font_t, hb_mask_t};

fn subtable_kerning(subtable: &Subtable, left: u32, right: u32) -> i32 {
    let (left, right) = (GlyphId::new(left), GlyphId::new(right));
    let kerning = match subtable.kind() {
        Ok(SubtableKind::Format0(t)) => t.kerning(left, right),
        Ok(SubtableKind::Format2(t)) => t.kerning(left, right),
        Ok(SubtableKind::Format3(t)) => t.kerning(left, right),
        _ => None,
    };
    kerning.unwrap_or(0)
}

fn is_pair_subtable(subtable: &Subtable) -> bool {
    matches!(
        subtable.kind(),
        Ok(SubtableKind::Format0(_) | SubtableKind::Format2(_) | SubtableKind::Format3(_))
    )
}

pub fn hb_ot_layout_has_kerning(font: &hb_font_t) -> bool {
    font.face
        .ot
        .kern
        .as_ref()
        .is_some_and(|kern| kern.subtables().flatten().any(|st| is_pair_subtable(&st)))
}

pub fn hb_ot_layout_has_cross_kerning(font: &hb_font_t) -> bool {
    font.face.ot.kern.as_ref().is_some_and(|kern| {
        kern.subtables()
            .flatten()
            .any(|st| st.is_cross_stream() && is_pair_subtable(&st))
    })
}

/// Pair kerning between two glyphs, summed over all plain subtables of the
/// requested orientation. Values are in font units.
pub(crate) fn hb_font_get_glyph_kerning(
    font: &hb_font_t,
    left: u32,
    right: u32,
    horizontal: bool,
) -> i32 {
    let Some(kern) = font.face.ot.kern.as_ref() else {
        return 0;
    };
    kern.subtables()
        .flatten()
        .filter(|st| {
            !st.is_variable() && !st.is_cross_stream() && st.is_horizontal() == horizontal
        })
        .map(|st| subtable_kerning(&st, left, right))
        .sum()
}

pub fn hb_ot_layout_kern(plan: &hb_ot_shape_plan_t, font: &hb_font_t, buffer: &mut hb_buffer_t) {
    let Some(kern) = font.face.ot.kern.as_ref() else {
        return;
    };

    if !plan.requested_kerning {
        return;
    }

    trace!("start table kern");

    let mut seen_cross_stream = false;
    for subtable in kern.subtables() {
        let Ok(subtable) = subtable else { continue };

        if subtable.is_variable() || !is_pair_subtable(&subtable) {
            continue;
        }

        if buffer.direction.is_horizontal() != subtable.is_horizontal() {
            continue;
        }

        let is_cross_stream = subtable.is_cross_stream();
        if !seen_cross_stream && is_cross_stream {
            seen_cross_stream = true;

            // Attach all glyphs into a chain.
            let forward = buffer.direction.is_forward();
            for pos in &mut buffer.pos[..buffer.len] {
                pos.set_attach_type(attach_type::CURSIVE);
                pos.set_attach_chain(if forward { -1 } else { 1 });
                // HAS_GPOS_ATTACHMENT is left unset: only a non-zero
                // attachment needs post-positioning.
            }
        }

        machine_kern(font, buffer, plan.kern_mask, is_cross_stream, |left, right| {
            subtable_kerning(&subtable, left, right)
        });
    }

    trace!("end table kern");
}

/// Applies a pair kerning function to every pair of glyphs with `kern_mask`
/// set, skipping marks in between. `get_kerning` returns font units.
pub(crate) fn machine_kern<F>(
    font: &hb_font_t,
    buffer: &mut hb_buffer_t,
    kern_mask: hb_mask_t,
    cross_stream: bool,
    get_kerning: F,
) where
    F: Fn(u32, u32) -> i32,
{
    buffer.unsafe_to_concat(None, None);

    let mut ctx = hb_ot_apply_context_t::new(TableIndex::GPOS, font, buffer);
    ctx.set_lookup_mask(kern_mask);
    ctx.lookup_props = u32::from(lookup_flags::IGNORE_MARKS);

    let horizontal = ctx.buffer.direction.is_horizontal();

    let mut i = 0;
    while i < ctx.buffer.len {
        if (ctx.buffer.info[i].mask & kern_mask) == 0 {
            i += 1;
            continue;
        }

        let j = {
            let mut iter = skipping_iterator_t::new(&ctx, false, None);
            iter.reset(i);
            let mut unsafe_to = 0;
            if !iter.next(Some(&mut unsafe_to)) {
                None
            } else {
                Some(iter.index())
            }
        };

        let Some(j) = j else {
            i += 1;
            continue;
        };

        let kern = get_kerning(ctx.buffer.info[i].glyph_id, ctx.buffer.info[j].glyph_id);
        let kern = if horizontal != cross_stream {
            font.em_scale_x(kern)
        } else {
            font.em_scale_y(kern)
        };

        if kern != 0 {
            let buffer = &mut *ctx.buffer;
            let pos = &mut buffer.pos;
            if horizontal {
                if cross_stream {
                    pos[j].y_offset = kern;
                    buffer.scratch_flags |= HB_BUFFER_SCRATCH_FLAG_HAS_GPOS_ATTACHMENT;
                } else {
                    let kern1 = kern >> 1;
                    let kern2 = kern - kern1;
                    pos[i].x_advance += kern1;
                    pos[j].x_advance += kern2;
                    pos[j].x_offset += kern2;
                }
            } else if cross_stream {
                pos[j].x_offset = kern;
                buffer.scratch_flags |= HB_BUFFER_SCRATCH_FLAG_HAS_GPOS_ATTACHMENT;
            } else {
                let kern1 = kern >> 1;
                let kern2 = kern - kern1;
                pos[i].y_advance += kern1;
                pos[j].y_advance += kern2;
                pos[j].y_offset += kern2;
            }

            buffer.unsafe_to_break(Some(i), Some(j + 1));
        }

        i = j;
    }
}
