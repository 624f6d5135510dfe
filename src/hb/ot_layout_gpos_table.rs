use log::trace;

use super::buffer::*;
use super::common::Direction;
use super::face::hb_font_t;
use super::ot_layout::*;
use super::ot_shape_plan::hb_ot_shape_plan_t;

pub fn position(plan: &hb_ot_shape_plan_t, font: &hb_font_t, buffer: &mut hb_buffer_t) {
    trace!(
        "start table GPOS script tag {:?}",
        plan.ot_map.chosen_script(TableIndex::GPOS)
    );
    apply_layout_table(plan, font, buffer, TableIndex::GPOS);
    trace!("end table GPOS");
}

/// Kinds of attachment recorded in `GlyphPosition::attach_type`.
pub mod attach_type {
    pub const MARK: u8 = 1;
    pub const CURSIVE: u8 = 2;
}

/// Adds the offsets of the glyph `i` is attached to, resolving that glyph's
/// own attachment first.
///
/// Every visited chain is cleared before recursing, which breaks cycles.
fn propagate_attachment_offsets(
    pos: &mut [GlyphPosition],
    len: usize,
    i: usize,
    direction: Direction,
    nesting_level: usize,
) {
    let chain = pos[i].attach_chain();
    let kind = pos[i].attach_type();
    if chain == 0 {
        return;
    }

    pos[i].set_attach_chain(0);

    let j = (i as isize + isize::from(chain)) as usize;
    if j >= len || nesting_level == 0 {
        return;
    }

    propagate_attachment_offsets(pos, len, j, direction, nesting_level - 1);

    match kind {
        attach_type::CURSIVE => {
            if direction.is_horizontal() {
                pos[i].y_offset += pos[j].y_offset;
            } else {
                pos[i].x_offset += pos[j].x_offset;
            }
        }
        attach_type::MARK => {
            pos[i].x_offset += pos[j].x_offset;
            pos[i].y_offset += pos[j].y_offset;

            // The mark follows its base. Its offset is made relative to
            // its own origin by taking out the advances in between.
            if j < i {
                if direction.is_forward() {
                    for k in j..i {
                        pos[i].x_offset -= pos[k].x_advance;
                        pos[i].y_offset -= pos[k].y_advance;
                    }
                } else {
                    for k in j + 1..i + 1 {
                        pos[i].x_offset += pos[k].x_advance;
                        pos[i].y_offset += pos[k].y_advance;
                    }
                }
            }
        }
        _ => {}
    }
}

pub mod GPOS {
    use super::*;

    pub fn position_start(_: &hb_font_t, buffer: &mut hb_buffer_t) {
        let len = buffer.len;
        for pos in &mut buffer.pos[..len] {
            pos.set_attach_chain(0);
            pos.set_attach_type(0);
        }
    }

    pub fn position_finish_advances(_: &hb_font_t, buffer: &mut hb_buffer_t) {
        buffer.assert_gsubgpos_vars();
    }

    pub fn position_finish_offsets(_: &hb_font_t, buffer: &mut hb_buffer_t) {
        buffer.assert_gsubgpos_vars();

        if buffer.scratch_flags & HB_BUFFER_SCRATCH_FLAG_HAS_GPOS_ATTACHMENT == 0 {
            return;
        }

        let len = buffer.len;
        let direction = buffer.direction;
        for i in 0..len {
            propagate_attachment_offsets(&mut buffer.pos, len, i, direction, MAX_NESTING_LEVEL);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn positions(advances: &[i32]) -> Vec<GlyphPosition> {
        advances
            .iter()
            .map(|&x_advance| GlyphPosition {
                x_advance,
                ..GlyphPosition::default()
            })
            .collect()
    }

    #[test]
    fn mark_offset_is_relative_to_base() {
        let mut pos = positions(&[500, 0]);
        pos[1].x_offset = 100;
        pos[1].set_attach_type(attach_type::MARK);
        pos[1].set_attach_chain(-1);

        propagate_attachment_offsets(&mut pos, 2, 1, Direction::LeftToRight, MAX_NESTING_LEVEL);
        assert_eq!(pos[1].x_offset, 100 - 500);
        assert_eq!(pos[1].attach_chain(), 0);
    }

    #[test]
    fn mark_on_mark_accumulates() {
        let mut pos = positions(&[500, 0, 0]);
        pos[1].x_offset = 10;
        pos[1].set_attach_type(attach_type::MARK);
        pos[1].set_attach_chain(-1);
        pos[2].y_offset = 20;
        pos[2].set_attach_type(attach_type::MARK);
        pos[2].set_attach_chain(-1);

        propagate_attachment_offsets(&mut pos, 3, 2, Direction::LeftToRight, MAX_NESTING_LEVEL);
        assert_eq!(pos[1].x_offset, 10 - 500);
        assert_eq!(pos[2].x_offset, 10 - 500);
        assert_eq!(pos[2].y_offset, 20);
    }

    #[test]
    fn attachment_cycle_terminates() {
        let mut pos = positions(&[100, 100]);
        pos[0].set_attach_type(attach_type::CURSIVE);
        pos[0].set_attach_chain(1);
        pos[1].set_attach_type(attach_type::CURSIVE);
        pos[1].set_attach_chain(-1);

        for i in 0..2 {
            propagate_attachment_offsets(&mut pos, 2, i, Direction::LeftToRight, MAX_NESTING_LEVEL);
        }
        assert_eq!(pos[0].attach_chain(), 0);
        assert_eq!(pos[1].attach_chain(), 0);
    }
}
