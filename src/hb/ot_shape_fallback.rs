//! Positioning for fonts without GPOS: marks placed from glyph extents,
//! legacy pair kerning and the widths of Unicode space characters.

use read_fonts::types::GlyphId;

use super::buffer::{hb_buffer_t, GlyphPosition};
use super::common::Direction;
use super::face::hb_glyph_extents_t;
use super::hb_font_t;
use super::kerning::{hb_font_get_glyph_kerning, machine_kern};
use super::ot_shape_plan::hb_ot_shape_plan_t;
use super::unicode::hb_unicode_funcs_t as t;
use super::unicode::{combining_class, modified_combining_class as mcc, GeneralCategory};

fn recategorize_combining_class(u: u32, mut klass: u8) -> u8 {
    use combining_class::*;

    if klass >= 200 {
        return klass;
    }

    // Thai / Lao need some per-character work.
    if (u & !0xFF) == 0x0E00 {
        if klass == 0 {
            match u {
                0x0E31 | 0x0E34 | 0x0E35 | 0x0E36 | 0x0E37 | 0x0E47 | 0x0E4C | 0x0E4D | 0x0E4E => {
                    klass = AboveRight
                }
                0x0EB1 | 0x0EB4 | 0x0EB5 | 0x0EB6 | 0x0EB7 | 0x0EBB | 0x0ECC | 0x0ECD => {
                    klass = Above
                }
                0x0EBC => klass = Below,
                _ => {}
            }
        } else if u == 0x0E3A {
            // Thai virama is below-right.
            klass = BelowRight;
        }
    }

    match klass {
        // Hebrew
        mcc::CCC10 | mcc::CCC11 | mcc::CCC12 | mcc::CCC13 | mcc::CCC14 | mcc::CCC15
        | mcc::CCC16 | mcc::CCC17 | mcc::CCC18 | mcc::CCC20 | mcc::CCC22 => Below,
        mcc::CCC23 => AttachedAbove,
        mcc::CCC24 => AboveRight,
        mcc::CCC25 | mcc::CCC19 => AboveLeft,
        mcc::CCC26 => Above,
        // Dagesh stays where it is.
        mcc::CCC21 => klass,

        // Arabic and Syriac
        mcc::CCC27 | mcc::CCC28 | mcc::CCC30 | mcc::CCC31 | mcc::CCC33 | mcc::CCC34
        | mcc::CCC35 | mcc::CCC36 => Above,
        mcc::CCC29 | mcc::CCC32 => Below,

        // Thai
        mcc::CCC103 => BelowRight,
        mcc::CCC107 => AboveRight,

        // Lao
        mcc::CCC118 => Below,
        mcc::CCC122 => Above,

        // Tibetan
        mcc::CCC129 => Below,
        mcc::CCC130 => Above,
        mcc::CCC132 => Below,

        _ => klass,
    }
}

pub fn _hb_ot_shape_fallback_mark_position_recategorize_marks(
    _: &hb_ot_shape_plan_t,
    _: &hb_font_t,
    buffer: &mut hb_buffer_t,
) {
    let len = buffer.len;
    for info in &mut buffer.info[..len] {
        if info.general_category() == GeneralCategory::NON_SPACING_MARK {
            let class = info.modified_combining_class();
            let class = recategorize_combining_class(info.glyph_id, class);
            info.set_modified_combining_class(class);
        }
    }
}

fn zero_mark_advances(
    buffer: &mut hb_buffer_t,
    start: usize,
    end: usize,
    adjust_offsets_when_zeroing: bool,
) {
    for i in start..end {
        if buffer.info[i].general_category() != GeneralCategory::NON_SPACING_MARK {
            continue;
        }
        let pos = &mut buffer.pos[i];
        if adjust_offsets_when_zeroing {
            pos.x_offset -= pos.x_advance;
            pos.y_offset -= pos.y_advance;
        }
        pos.x_advance = 0;
        pos.y_advance = 0;
    }
}

fn position_mark(
    font: &hb_font_t,
    direction: Direction,
    glyph: u32,
    pos: &mut GlyphPosition,
    base_extents: &mut hb_glyph_extents_t,
    class: u8,
) {
    use combining_class::*;

    let Some(mark_extents) = font.glyph_extents(GlyphId::new(glyph)) else {
        return;
    };

    let y_gap = font.scale().1 / 16;

    pos.x_offset = 0;
    pos.y_offset = 0;

    // Left and right marks are not positioned.

    // X positioning
    let center = base_extents.x_bearing + (base_extents.width - mark_extents.width) / 2
        - mark_extents.x_bearing;
    match class {
        DoubleBelow | DoubleAbove if direction == Direction::LeftToRight => {
            pos.x_offset += base_extents.x_bearing + base_extents.width
                - mark_extents.width / 2
                - mark_extents.x_bearing;
        }
        DoubleBelow | DoubleAbove if direction == Direction::RightToLeft => {
            pos.x_offset +=
                base_extents.x_bearing - mark_extents.width / 2 - mark_extents.x_bearing;
        }
        AttachedBelowLeft | BelowLeft | AboveLeft => {
            // Left align.
            pos.x_offset += base_extents.x_bearing - mark_extents.x_bearing;
        }
        AttachedAboveRight | BelowRight | AboveRight => {
            // Right align.
            pos.x_offset += base_extents.x_bearing + base_extents.width
                - mark_extents.width
                - mark_extents.x_bearing;
        }
        _ => {
            // Center align.
            pos.x_offset += center;
        }
    }

    // Y positioning
    match class {
        DoubleBelow | BelowLeft | Below | BelowRight | AttachedBelowLeft | AttachedBelow => {
            if !matches!(class, AttachedBelowLeft | AttachedBelow) {
                // Add gap.
                base_extents.height -= y_gap;
            }

            pos.y_offset = base_extents.y_bearing + base_extents.height - mark_extents.y_bearing;

            // Never shift up "below" marks.
            if (y_gap > 0) == (pos.y_offset > 0) {
                base_extents.height -= pos.y_offset;
                pos.y_offset = 0;
            }

            base_extents.height += mark_extents.height;
        }
        DoubleAbove | AboveLeft | Above | AboveRight | AttachedAbove | AttachedAboveRight => {
            if !matches!(class, AttachedAbove | AttachedAboveRight) {
                // Add gap.
                base_extents.y_bearing += y_gap;
                base_extents.height -= y_gap;
            }

            pos.y_offset = base_extents.y_bearing - (mark_extents.y_bearing + mark_extents.height);

            // Don't shift down "above" marks too much.
            if (y_gap > 0) != (pos.y_offset > 0) {
                let correction = -pos.y_offset / 2;
                base_extents.y_bearing += correction;
                base_extents.height -= correction;
                pos.y_offset += correction;
            }

            base_extents.y_bearing -= mark_extents.height;
            base_extents.height += mark_extents.height;
        }
        _ => {}
    }
}

fn position_around_base(
    plan: &hb_ot_shape_plan_t,
    font: &hb_font_t,
    buffer: &mut hb_buffer_t,
    base: usize,
    end: usize,
    adjust_offsets_when_zeroing: bool,
) {
    let mut horizontal_dir = Direction::Invalid;

    buffer.unsafe_to_break(Some(base), Some(end));

    let base_glyph = GlyphId::new(buffer.info[base].glyph_id);
    let Some(mut base_extents) = font.glyph_extents(base_glyph) else {
        // If extents don't work, zero marks and go home.
        zero_mark_advances(buffer, base + 1, end, adjust_offsets_when_zeroing);
        return;
    };

    base_extents.y_bearing += buffer.pos[base].y_offset;
    // Use horizontal advance for horizontal positioning.
    // Also works for zero-ink glyphs.
    base_extents.x_bearing = 0;
    base_extents.width = font.get_glyph_h_advance(base_glyph);

    let lig_id = buffer.info[base].lig_id() as u32;
    let num_lig_components = buffer.info[base].lig_num_comps() as i32;

    let mut x_offset = 0;
    let mut y_offset = 0;
    if buffer.direction.is_forward() {
        x_offset -= buffer.pos[base].x_advance;
        y_offset -= buffer.pos[base].y_advance;
    }

    let mut last_lig_component: i32 = -1;
    let mut last_combining_class: u8 = 255;
    let mut component_extents = base_extents;
    let mut cluster_extents = base_extents;

    for i in base + 1..end {
        let this_combining_class = buffer.info[i].modified_combining_class();
        if this_combining_class != 0 {
            if num_lig_components > 1 {
                let this_lig_id = buffer.info[i].lig_id() as u32;
                let mut this_lig_component = buffer.info[i].lig_comp() as i32 - 1;

                // Conditions for attaching to the last component.
                if lig_id == 0 || lig_id != this_lig_id || this_lig_component >= num_lig_components
                {
                    this_lig_component = num_lig_components - 1;
                }

                if last_lig_component != this_lig_component {
                    last_lig_component = this_lig_component;
                    last_combining_class = 255;
                    component_extents = base_extents;

                    if horizontal_dir == Direction::Invalid {
                        horizontal_dir = if plan.direction.is_horizontal() {
                            plan.direction
                        } else {
                            plan.script
                                .and_then(Direction::from_script)
                                .unwrap_or(Direction::LeftToRight)
                        };
                    }

                    component_extents.x_bearing += if horizontal_dir == Direction::LeftToRight {
                        (this_lig_component * component_extents.width) / num_lig_components
                    } else {
                        ((num_lig_components - 1 - this_lig_component) * component_extents.width)
                            / num_lig_components
                    };

                    component_extents.width /= num_lig_components;
                }
            }

            if last_combining_class != this_combining_class {
                last_combining_class = this_combining_class;
                cluster_extents = component_extents;
            }

            let direction = buffer.direction;
            let glyph = buffer.info[i].glyph_id;
            position_mark(
                font,
                direction,
                glyph,
                &mut buffer.pos[i],
                &mut cluster_extents,
                this_combining_class,
            );

            let pos = &mut buffer.pos[i];
            pos.x_advance = 0;
            pos.y_advance = 0;
            pos.x_offset += x_offset;
            pos.y_offset += y_offset;
        } else if buffer.direction.is_forward() {
            x_offset -= buffer.pos[i].x_advance;
            y_offset -= buffer.pos[i].y_advance;
        } else {
            x_offset += buffer.pos[i].x_advance;
            y_offset += buffer.pos[i].y_advance;
        }
    }
}

fn position_cluster(
    plan: &hb_ot_shape_plan_t,
    font: &hb_font_t,
    buffer: &mut hb_buffer_t,
    start: usize,
    end: usize,
    adjust_offsets_when_zeroing: bool,
) {
    if end - start < 2 {
        return;
    }

    // Find the base glyph
    let mut i = start;
    while i < end {
        if !buffer.info[i].is_unicode_mark() {
            // Find mark glyphs
            let mut j = i + 1;
            while j < end && buffer.info[j].is_unicode_mark() {
                j += 1;
            }

            position_around_base(plan, font, buffer, i, j, adjust_offsets_when_zeroing);
            i = j - 1;
        }
        i += 1;
    }
}

pub fn _hb_ot_shape_fallback_mark_position(
    plan: &hb_ot_shape_plan_t,
    font: &hb_font_t,
    buffer: &mut hb_buffer_t,
    adjust_offsets_when_zeroing: bool,
) {
    buffer.assert_gsubgpos_vars();

    let mut start = 0;
    for i in 1..buffer.len {
        if !buffer.info[i].is_unicode_mark() {
            position_cluster(plan, font, buffer, start, i, adjust_offsets_when_zeroing);
            start = i;
        }
    }

    position_cluster(plan, font, buffer, start, buffer.len, adjust_offsets_when_zeroing);
}

/// Pair kerning taken from the font itself, for fonts whose layout tables
/// provide none.
pub fn _hb_ot_shape_fallback_kern(
    plan: &hb_ot_shape_plan_t,
    font: &hb_font_t,
    buffer: &mut hb_buffer_t,
) {
    let horizontal = buffer.direction.is_horizontal();
    machine_kern(font, buffer, plan.kern_mask, false, |left, right| {
        hb_font_get_glyph_kerning(font, left, right, horizontal)
    });
}

/// Gives space characters that were mapped to the plain space glyph the
/// width their Unicode definition asks for.
pub fn _hb_ot_shape_fallback_spaces(
    _: &hb_ot_shape_plan_t,
    font: &hb_font_t,
    buffer: &mut hb_buffer_t,
) {
    let horizontal = buffer.direction.is_horizontal();
    let (x_scale, y_scale) = font.scale();

    let advance_of = |u: u32| {
        font.get_nominal_glyph(u).map(|glyph| {
            if horizontal {
                font.get_glyph_h_advance(glyph)
            } else {
                font.get_glyph_v_advance(glyph)
            }
        })
    };

    let len = buffer.len;
    for (info, pos) in buffer.info[..len].iter().zip(&mut buffer.pos[..len]) {
        if !info.is_unicode_space() || info.ligated() {
            continue;
        }

        let space_type = info.unicode_space_fallback_type();
        match space_type {
            t::SPACE_EM
            | t::SPACE_EM_2
            | t::SPACE_EM_3
            | t::SPACE_EM_4
            | t::SPACE_EM_5
            | t::SPACE_EM_6
            | t::SPACE_EM_16 => {
                let n = i32::from(space_type);
                if horizontal {
                    pos.x_advance = (x_scale + n / 2) / n;
                } else {
                    pos.y_advance = -(y_scale + n / 2) / n;
                }
            }
            t::SPACE_4_EM_18 => {
                if horizontal {
                    pos.x_advance = (i64::from(x_scale) * 4 / 18) as i32;
                } else {
                    pos.y_advance = (i64::from(-y_scale) * 4 / 18) as i32;
                }
            }
            t::SPACE_FIGURE => {
                if let Some(advance) = ('0'..='9').find_map(|c| advance_of(c as u32)) {
                    if horizontal {
                        pos.x_advance = advance;
                    } else {
                        pos.y_advance = advance;
                    }
                }
            }
            t::SPACE_PUNCTUATION => {
                if let Some(advance) = advance_of('.' as u32).or_else(|| advance_of(',' as u32)) {
                    if horizontal {
                        pos.x_advance = advance;
                    } else {
                        pos.y_advance = advance;
                    }
                }
            }
            t::SPACE_NARROW => {
                // Half of the regular space; fonts disagree wildly on anything
                // closer to the Unicode description.
                if horizontal {
                    pos.x_advance /= 2;
                } else {
                    pos.y_advance /= 2;
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hebrew_points_get_positional_classes() {
        // sheva
        assert_eq!(recategorize_combining_class(0x05B0, mcc::CCC10), combining_class::Below);
        // shin dot
        assert_eq!(recategorize_combining_class(0x05C1, mcc::CCC24), combining_class::AboveRight);
        // dagesh keeps its class
        assert_eq!(recategorize_combining_class(0x05BC, mcc::CCC21), mcc::CCC21);
    }

    #[test]
    fn arabic_harakat_split_above_and_below() {
        assert_eq!(recategorize_combining_class(0x064E, mcc::CCC30), combining_class::Above);
        assert_eq!(recategorize_combining_class(0x0650, mcc::CCC32), combining_class::Below);
    }

    #[test]
    fn thai_and_lao_marks() {
        assert_eq!(recategorize_combining_class(0x0E31, 0), combining_class::AboveRight);
        assert_eq!(recategorize_combining_class(0x0EBC, 0), combining_class::Below);
        assert_eq!(recategorize_combining_class(0x0E3A, combining_class::Virama), combining_class::BelowRight);
        assert_eq!(recategorize_combining_class(0x0E38, mcc::CCC103), combining_class::BelowRight);
    }

    #[test]
    fn positional_classes_are_kept() {
        assert_eq!(recategorize_combining_class(0x0301, combining_class::Above), combining_class::Above);
        assert_eq!(recategorize_combining_class(0x0041, 0), 0);
    }
}
