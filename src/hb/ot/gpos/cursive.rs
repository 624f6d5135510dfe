use super::anchor_position;
use crate::hb::buffer::{GlyphPosition, HB_BUFFER_SCRATCH_FLAG_HAS_GPOS_ATTACHMENT};
use crate::hb::ot_layout_common::lookup_flags;
use crate::hb::ot_layout_gpos_table::attach_type;
use crate::hb::ot_layout_gsubgpos::OT::hb_ot_apply_context_t;
use crate::hb::ot_layout_gsubgpos::{skipping_iterator_t, Apply};
use crate::hb::common::Direction;
use read_fonts::tables::gpos::{AnchorTable, CursivePosFormat1};
use read_fonts::types::GlyphId;

impl Apply for CursivePosFormat1<'_> {
    fn apply(&self, ctx: &mut hb_ot_apply_context_t) -> Option<()> {
        let data = self.offset_data();
        let records = self.entry_exit_record();
        let coverage = self.coverage().ok()?;

        let record_of = |glyph: u32| {
            let index = coverage.get(GlyphId::new(glyph))?;
            records.get(usize::from(index))
        };

        let this_record = record_of(ctx.buffer.cur(0).glyph_id)?;
        let entry_anchor: AnchorTable = this_record.entry_anchor(data)?.ok()?;

        let mut unsafe_from = 0;
        let found = {
            let mut iter = skipping_iterator_t::new(ctx, false, None);
            iter.reset(ctx.buffer.idx);
            iter.prev(Some(&mut unsafe_from)).then(|| iter.index())
        };
        let Some(i) = found else {
            ctx.buffer
                .unsafe_to_concat_from_outbuffer(Some(unsafe_from), Some(ctx.buffer.idx + 1));
            return None;
        };

        let exit_anchor = record_of(ctx.buffer.info[i].glyph_id)
            .and_then(|record| record.exit_anchor(data))
            .and_then(Result::ok);
        let Some(exit_anchor) = exit_anchor else {
            ctx.buffer
                .unsafe_to_concat_from_outbuffer(Some(i), Some(ctx.buffer.idx + 1));
            return None;
        };

        let j = ctx.buffer.idx;
        ctx.buffer.unsafe_to_break(Some(i), Some(j + 1));

        let font = ctx.font;
        let (exit_x, exit_y) = anchor_position(font, &exit_anchor, ctx.buffer.info[i].glyph_id);
        let (entry_x, entry_y) =
            anchor_position(font, &entry_anchor, ctx.buffer.info[j].glyph_id);

        let direction = ctx.buffer.direction;
        let pos = &mut ctx.buffer.pos;

        // Main direction.
        match direction {
            Direction::LeftToRight => {
                pos[i].x_advance = exit_x + pos[i].x_offset;
                let d = entry_x + pos[j].x_offset;
                pos[j].x_advance -= d;
                pos[j].x_offset -= d;
            }
            Direction::RightToLeft => {
                let d = exit_x + pos[i].x_offset;
                pos[i].x_advance -= d;
                pos[i].x_offset -= d;
                pos[j].x_advance = entry_x + pos[j].x_offset;
            }
            Direction::TopToBottom => {
                pos[i].y_advance = exit_y + pos[i].y_offset;
                let d = entry_y + pos[j].y_offset;
                pos[j].y_advance -= d;
                pos[j].y_offset -= d;
            }
            Direction::BottomToTop => {
                let d = exit_y + pos[i].y_offset;
                pos[i].y_advance -= d;
                pos[i].y_offset -= d;
                pos[j].y_advance = entry_y;
            }
            Direction::Invalid => {}
        }

        // Cross direction. The child is aligned against its parent, which
        // stays on the baseline. Right-to-left is the common case.
        let mut child = i;
        let mut parent = j;
        let mut x_offset = entry_x - exit_x;
        let mut y_offset = entry_y - exit_y;
        if ctx.lookup_props as u16 & lookup_flags::RIGHT_TO_LEFT == 0 {
            core::mem::swap(&mut child, &mut parent);
            x_offset = -x_offset;
            y_offset = -y_offset;
        }

        // A child already attached elsewhere brings its old chain along.
        reverse_cursive_minor_offset(pos, child, direction, parent);

        let chain = parent as isize - child as isize;
        let Ok(chain) = i16::try_from(chain) else {
            ctx.buffer.idx += 1;
            return Some(());
        };

        pos[child].set_attach_type(attach_type::CURSIVE);
        pos[child].set_attach_chain(chain);
        if direction.is_horizontal() {
            pos[child].y_offset = y_offset;
        } else {
            pos[child].x_offset = x_offset;
        }

        // The parent must not stay attached to its new child.
        if pos[parent].attach_chain() == -pos[child].attach_chain() {
            pos[parent].set_attach_chain(0);
            if direction.is_horizontal() {
                pos[parent].y_offset = 0;
            } else {
                pos[parent].x_offset = 0;
            }
        }

        ctx.buffer.scratch_flags |= HB_BUFFER_SCRATCH_FLAG_HAS_GPOS_ATTACHMENT;
        ctx.buffer.idx += 1;
        Some(())
    }
}

fn reverse_cursive_minor_offset(
    pos: &mut [GlyphPosition],
    i: usize,
    direction: Direction,
    new_parent: usize,
) {
    let chain = pos[i].attach_chain();
    let kind = pos[i].attach_type();
    if chain == 0 || kind & attach_type::CURSIVE == 0 {
        return;
    }

    pos[i].set_attach_chain(0);

    let j = (i as isize + isize::from(chain)) as usize;
    // Stop at the new parent, it may be on the old chain.
    if j == new_parent || j >= pos.len() {
        return;
    }

    reverse_cursive_minor_offset(pos, j, direction, new_parent);

    if direction.is_horizontal() {
        pos[j].y_offset = -pos[i].y_offset;
    } else {
        pos[j].x_offset = -pos[i].x_offset;
    }

    pos[j].set_attach_chain(-chain);
    pos[j].set_attach_type(kind);
}
