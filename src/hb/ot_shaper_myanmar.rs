use super::buffer::*;
use super::common::hb_codepoint_t;
use super::ot_map::*;
use super::ot_shape::hb_ot_shape_planner_t;
use super::ot_shape_normalize::HB_OT_SHAPE_NORMALIZATION_MODE_COMPOSED_DIACRITICS_NO_SHORT_CIRCUIT;
use super::ot_shape_plan::hb_ot_shape_plan_t;
use super::ot_shaper::*;
use super::ot_shaper_indic::ot_category_t::*;
use super::ot_shaper_indic::ot_position_t::*;
use super::ot_shaper_indic::{category_flag, Category, Position};
use super::ot_shaper_myanmar_machine::{find_syllables_myanmar, SyllableType};
use super::ot_shaper_syllabic::{insert_dotted_circles, syllabic_clear_var, DottedCircle};
use super::{hb_font_t, hb_tag_t};

pub static MYANMAR_SHAPER: hb_ot_shaper_t = hb_ot_shaper_t {
    name: "myanmar",
    collect_features: Some(collect_features),
    override_features: None,
    create_data: None,
    preprocess_text: None,
    postprocess_glyphs: None,
    normalization_preference: HB_OT_SHAPE_NORMALIZATION_MODE_COMPOSED_DIACRITICS_NO_SHORT_CIRCUIT,
    decompose: None,
    compose: None,
    setup_masks: Some(setup_masks),
    gpos_tag: None,
    reorder_marks: None,
    zero_width_marks: HB_OT_SHAPE_ZERO_WIDTH_MARKS_BY_GDEF_EARLY,
    fallback_position: false,
};

// Basic features, applied in order, one at a time, after reordering.
const MYANMAR_BASIC_FEATURES: &[hb_tag_t] = &[
    hb_tag_t::new(b"rphf"),
    hb_tag_t::new(b"pref"),
    hb_tag_t::new(b"blwf"),
    hb_tag_t::new(b"pstf"),
];

// Other features, applied all at once after clearing syllables.
const MYANMAR_OTHER_FEATURES: &[hb_tag_t] = &[
    hb_tag_t::new(b"pres"),
    hb_tag_t::new(b"abvs"),
    hb_tag_t::new(b"blws"),
    hb_tag_t::new(b"psts"),
];

const CONSONANT_FLAGS_MYANMAR: u64 = category_flag(OT_C)
    | category_flag(OT_CS)
    | category_flag(OT_Ra)
    | category_flag(OT_IV)
    | category_flag(OT_GB)
    | category_flag(OT_DOTTEDCIRCLE);

impl GlyphInfo {
    fn myanmar_category(&self) -> Category {
        self.ot_shaper_var_u8_category()
    }

    fn set_myanmar_category(&mut self, c: Category) {
        self.set_ot_shaper_var_u8_category(c)
    }

    fn myanmar_position(&self) -> Position {
        self.ot_shaper_var_u8_auxiliary()
    }

    fn set_myanmar_position(&mut self, c: Position) {
        self.set_ot_shaper_var_u8_auxiliary(c)
    }

    fn is_consonant_myanmar(&self) -> bool {
        self.is_one_of(CONSONANT_FLAGS_MYANMAR)
    }
}

fn get_myanmar_category(u: hb_codepoint_t) -> Category {
    match u {
        0x1004 | 0x101B | 0x105A => OT_Ra,
        0x1000..=0x1020 | 0x103F | 0x104E | 0x1050..=0x1051 | 0x105B..=0x105D => OT_C,
        0x1021..=0x102A | 0x1052..=0x1055 => OT_IV,
        0x102B..=0x102C | 0x1056..=0x1057 | 0x1062 | 0x1067..=0x1068 | 0x1083 => OT_VPst,
        0x102D..=0x102E | 0x1033..=0x1035 | 0x1071..=0x1074 | 0x1085..=0x1086 | 0x109D => {
            OT_VAbv
        }
        0x102F..=0x1030 | 0x1058..=0x1059 => OT_VBlw,
        0x1031 | 0x1084 => OT_VPre,
        0x1032 | 0x1036 => OT_A,
        0x1037 => OT_DB,
        0x1038 | 0x1087..=0x108D | 0x108F | 0x109A..=0x109C => OT_SM,
        0x1039 => OT_H,
        0x103A => OT_As,
        0x103B | 0x105E..=0x105F => OT_MY,
        0x103C => OT_MR,
        0x103D | 0x1082 => OT_MW,
        0x103E => OT_MH,
        0x1060 => OT_ML,
        0x1063..=0x1064 | 0x1069..=0x106D | 0xAA7B => OT_PT,
        0x1061 | 0x1065..=0x1066 | 0x106E..=0x1070 | 0x1075..=0x1081 | 0x108E => OT_C,
        0xAA60..=0xAA6F | 0xA9E0..=0xA9E4 | 0xA9E7..=0xA9EF | 0xA9FA..=0xA9FE => OT_C,
        0xA9E5 => OT_VAbv,
        0x1040..=0x1049 | 0x1090..=0x1099 | 0xA9F0..=0xA9F9 => OT_GB,
        0x002D | 0x00A0 | 0x00D7 | 0x2012..=0x2015 | 0x2022 | 0x25FB..=0x25FE => OT_GB,
        0xFE00..=0xFE0F => OT_VS,
        0x200C => OT_ZWNJ,
        0x200D => OT_ZWJ,
        0x25CC => OT_DOTTEDCIRCLE,
        _ => OT_X,
    }
}

fn collect_features(planner: &mut hb_ot_shape_planner_t) {
    // Do this before any lookups have been applied.
    planner.ot_map.add_gsub_pause(Some(setup_syllables));

    planner
        .ot_map
        .enable_feature(hb_tag_t::new(b"locl"), F_PER_SYLLABLE, 1);
    // Not required by the script model, but fonts use it.
    planner
        .ot_map
        .enable_feature(hb_tag_t::new(b"ccmp"), F_PER_SYLLABLE, 1);

    planner.ot_map.add_gsub_pause(Some(reorder));

    for &tag in MYANMAR_BASIC_FEATURES {
        planner
            .ot_map
            .enable_feature(tag, F_MANUAL_ZWJ.union(F_PER_SYLLABLE), 1);
        planner.ot_map.add_gsub_pause(None);
    }

    planner.ot_map.add_gsub_pause(Some(syllabic_clear_var));

    for &tag in MYANMAR_OTHER_FEATURES {
        planner.ot_map.enable_feature(tag, F_MANUAL_ZWJ, 1);
    }
}

fn setup_masks(_: &hb_ot_shape_plan_t, _: &hb_font_t, buffer: &mut hb_buffer_t) {
    buffer.allocate_var(GlyphInfo::OT_SHAPER_VAR_U8_CATEGORY_VAR);
    buffer.allocate_var(GlyphInfo::OT_SHAPER_VAR_U8_AUXILIARY_VAR);

    // No masks, only the categories. Positions are assigned when reordering.
    for info in buffer.info_slice_mut() {
        info.set_myanmar_category(get_myanmar_category(info.glyph_id));
    }
}

fn setup_syllables(_: &hb_ot_shape_plan_t, _: &hb_font_t, buffer: &mut hb_buffer_t) -> bool {
    buffer.allocate_var(GlyphInfo::SYLLABLE_VAR);
    find_syllables_myanmar(buffer);
    foreach_syllable!(buffer, start, end, {
        buffer.unsafe_to_break(Some(start), Some(end));
    });
    false
}

fn reorder(_: &hb_ot_shape_plan_t, font: &hb_font_t, buffer: &mut hb_buffer_t) -> bool {
    let ret = insert_dotted_circles(
        font,
        buffer,
        &DottedCircle {
            broken_syllable_type: SyllableType::BrokenCluster as u8,
            category: OT_DOTTEDCIRCLE,
            repha_category: None,
            position: None,
        },
    );

    foreach_syllable!(buffer, start, end, {
        reorder_syllable(start, end, buffer);
    });

    buffer.deallocate_var(GlyphInfo::OT_SHAPER_VAR_U8_CATEGORY_VAR);
    buffer.deallocate_var(GlyphInfo::OT_SHAPER_VAR_U8_AUXILIARY_VAR);
    ret
}

fn reorder_syllable(start: usize, end: usize, buffer: &mut hb_buffer_t) {
    let syllable_type = buffer.info[start].syllable() & 0x0F;
    if syllable_type == SyllableType::ConsonantSyllable as u8
        || syllable_type == SyllableType::BrokenCluster as u8
    {
        initial_reordering_consonant_syllable(start, end, buffer);
    }
}

// Rules from:
// https://docs.microsoft.com/en-us/typography/script-development/myanmar
fn initial_reordering_consonant_syllable(start: usize, end: usize, buffer: &mut hb_buffer_t) {
    let mut base = end;
    let mut has_reph = false;

    let mut limit = start;
    if start + 3 <= end
        && buffer.info[start].myanmar_category() == OT_Ra
        && buffer.info[start + 1].myanmar_category() == OT_As
        && buffer.info[start + 2].myanmar_category() == OT_H
    {
        limit += 3;
        base = start;
        has_reph = true;
    }

    if !has_reph {
        base = limit;
    }

    if let Some(i) = (limit..end).find(|&i| buffer.info[i].is_consonant_myanmar()) {
        base = i;
    }

    // Assign positions.
    let mut i = start;
    let kinzi_end = start + if has_reph { 3 } else { 0 };
    while i < kinzi_end {
        buffer.info[i].set_myanmar_position(POS_AFTER_MAIN);
        i += 1;
    }

    while i < base {
        buffer.info[i].set_myanmar_position(POS_PRE_C);
        i += 1;
    }

    if i < end {
        buffer.info[i].set_myanmar_position(POS_BASE_C);
        i += 1;
    }

    let mut pos = POS_AFTER_MAIN;
    while i < end {
        let category = buffer.info[i].myanmar_category();
        let position = if category == OT_MR {
            // Pre-base reordering.
            POS_PRE_C
        } else if category == OT_VPre {
            // Left matra.
            POS_PRE_M
        } else if category == OT_VS {
            buffer.info[i - 1].myanmar_position()
        } else if pos == POS_AFTER_MAIN && category == OT_VBlw {
            pos = POS_BELOW_C;
            pos
        } else if pos == POS_BELOW_C && category == OT_A {
            POS_BEFORE_SUB
        } else if pos == POS_BELOW_C && category == OT_VBlw {
            pos
        } else if pos == POS_BELOW_C {
            pos = POS_AFTER_SUB;
            pos
        } else {
            pos
        };

        buffer.info[i].set_myanmar_position(position);
        i += 1;
    }

    buffer.sort(start, end, |a, b| a.myanmar_position() > b.myanmar_position());

    // Flip the left-matra sequence so that the E vowel comes first.
    let mut first_left_matra = end;
    let mut last_left_matra = end;
    for i in start..end {
        if buffer.info[i].myanmar_position() == POS_PRE_M {
            if first_left_matra == end {
                first_left_matra = i;
            }
            last_left_matra = i;
        }
    }

    if first_left_matra < last_left_matra {
        buffer.reverse_range(first_left_matra, last_left_matra + 1);

        // Reverse back each vowel with its variation selectors.
        let mut i = first_left_matra;
        for j in i..=last_left_matra {
            if buffer.info[j].myanmar_category() == OT_VPre {
                buffer.reverse_range(i, j + 1);
                i = j + 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories() {
        assert_eq!(get_myanmar_category(0x1000), OT_C);
        assert_eq!(get_myanmar_category(0x1004), OT_Ra);
        assert_eq!(get_myanmar_category(0x1031), OT_VPre);
        assert_eq!(get_myanmar_category(0x103A), OT_As);
        assert_eq!(get_myanmar_category(0x103C), OT_MR);
        assert_eq!(get_myanmar_category(0x1040), OT_GB);
        assert_eq!(get_myanmar_category(0xFE00), OT_VS);
    }
}
