use alloc::boxed::Box;
use core::any::Any;

use super::buffer::*;
use super::common::hb_codepoint_t;
use super::ot_map::*;
use super::ot_shape::hb_ot_shape_planner_t;
use super::ot_shape_normalize::*;
use super::ot_shape_plan::hb_ot_shape_plan_t;
use super::ot_shaper::*;
use super::ot_shaper_indic::ot_category_t::*;
use super::ot_shaper_indic::Category;
use super::ot_shaper_khmer_machine::{find_syllables_khmer, SyllableType};
use super::ot_shaper_syllabic::{insert_dotted_circles, syllabic_clear_var, DottedCircle};
use super::unicode::{self, CharExt};
use super::{hb_font_t, hb_mask_t, hb_tag_t};

pub static KHMER_SHAPER: hb_ot_shaper_t = hb_ot_shaper_t {
    name: "khmer",
    collect_features: Some(collect_features),
    override_features: Some(override_features),
    create_data: Some(data_create_khmer),
    preprocess_text: None,
    postprocess_glyphs: None,
    normalization_preference: HB_OT_SHAPE_NORMALIZATION_MODE_COMPOSED_DIACRITICS_NO_SHORT_CIRCUIT,
    decompose: Some(decompose),
    compose: Some(compose),
    setup_masks: Some(setup_masks),
    gpos_tag: None,
    reorder_marks: None,
    zero_width_marks: HB_OT_SHAPE_ZERO_WIDTH_MARKS_NONE,
    fallback_position: false,
};

const KHMER_FEATURES: &[(hb_tag_t, hb_ot_map_feature_flags_t)] = &[
    // Basic features, applied all at once before reordering.
    (hb_tag_t::new(b"pref"), F_MANUAL_JOINERS.union(F_PER_SYLLABLE)),
    (hb_tag_t::new(b"blwf"), F_MANUAL_JOINERS.union(F_PER_SYLLABLE)),
    (hb_tag_t::new(b"abvf"), F_MANUAL_JOINERS.union(F_PER_SYLLABLE)),
    (hb_tag_t::new(b"pstf"), F_MANUAL_JOINERS.union(F_PER_SYLLABLE)),
    (hb_tag_t::new(b"cfar"), F_MANUAL_JOINERS.union(F_PER_SYLLABLE)),
    // Other features.
    (hb_tag_t::new(b"pres"), F_GLOBAL_MANUAL_JOINERS),
    (hb_tag_t::new(b"abvs"), F_GLOBAL_MANUAL_JOINERS),
    (hb_tag_t::new(b"blws"), F_GLOBAL_MANUAL_JOINERS),
    (hb_tag_t::new(b"psts"), F_GLOBAL_MANUAL_JOINERS),
];

const KHMER_BASIC_FEATURES: usize = 5;

// Indices into KHMER_FEATURES.
const KHMER_PREF: usize = 0;
const KHMER_BLWF: usize = 1;
const KHMER_ABVF: usize = 2;
const KHMER_PSTF: usize = 3;
const KHMER_CFAR: usize = 4;

struct khmer_shape_plan_t {
    mask_array: [hb_mask_t; KHMER_FEATURES.len()],
}

fn data_create_khmer(plan: &hb_ot_shape_plan_t) -> Box<dyn Any + Send + Sync> {
    let mut mask_array = [0; KHMER_FEATURES.len()];
    for (mask, &(tag, flags)) in mask_array.iter_mut().zip(KHMER_FEATURES) {
        *mask = if flags.contains(F_GLOBAL) {
            0
        } else {
            plan.ot_map.get_1_mask(tag)
        };
    }

    Box::new(khmer_shape_plan_t { mask_array })
}

impl GlyphInfo {
    fn khmer_category(&self) -> Category {
        self.ot_shaper_var_u8_category()
    }

    fn set_khmer_category(&mut self, c: Category) {
        self.set_ot_shaper_var_u8_category(c)
    }
}

fn get_khmer_category(u: hb_codepoint_t) -> Category {
    match u {
        0x179A => OT_Ra,
        0x1780..=0x17A2 => OT_C,
        0x17A3..=0x17B3 => OT_V,
        0x17B6 => OT_VPst,
        0x17B7..=0x17BA => OT_VAbv,
        0x17BB..=0x17BD => OT_VBlw,
        0x17BE => OT_VAbv,
        0x17BF..=0x17C0 => OT_VPst,
        0x17C1..=0x17C3 => OT_VPre,
        0x17C4..=0x17C5 => OT_VPst,
        0x17C9 | 0x17CA | 0x17CC => OT_Robatic,
        0x17C6 | 0x17CB | 0x17CD..=0x17D1 => OT_Xgroup,
        0x17C7 | 0x17C8 | 0x17D3 | 0x17DD => OT_Ygroup,
        0x17D2 => OT_H,
        0x17E0..=0x17E9 | 0x00A0 => OT_PLACEHOLDER,
        0x200C => OT_ZWNJ,
        0x200D => OT_ZWJ,
        0x25CC => OT_DOTTEDCIRCLE,
        _ => OT_X,
    }
}

fn collect_features(planner: &mut hb_ot_shape_planner_t) {
    // Do this before any lookups have been applied.
    planner.ot_map.add_gsub_pause(Some(setup_syllables));
    planner.ot_map.add_gsub_pause(Some(reorder));

    // Uniscribe does not pause between the basic features.
    planner
        .ot_map
        .enable_feature(hb_tag_t::new(b"locl"), F_PER_SYLLABLE, 1);
    planner
        .ot_map
        .enable_feature(hb_tag_t::new(b"ccmp"), F_PER_SYLLABLE, 1);

    for &(tag, flags) in &KHMER_FEATURES[..KHMER_BASIC_FEATURES] {
        planner.ot_map.add_feature(tag, flags, 1);
    }

    planner.ot_map.add_gsub_pause(Some(syllabic_clear_var));

    for &(tag, flags) in &KHMER_FEATURES[KHMER_BASIC_FEATURES..] {
        planner.ot_map.add_feature(tag, flags, 1);
    }
}

fn override_features(planner: &mut hb_ot_shape_planner_t) {
    // 'clig' is a required Khmer shaping feature.
    planner
        .ot_map
        .enable_feature(hb_tag_t::new(b"clig"), F_NONE, 1);
    // Uniscribe does not apply 'liga' for Khmer.
    planner.ot_map.disable_feature(hb_tag_t::new(b"liga"));
}

fn setup_masks(_: &hb_ot_shape_plan_t, _: &hb_font_t, buffer: &mut hb_buffer_t) {
    buffer.allocate_var(GlyphInfo::OT_SHAPER_VAR_U8_CATEGORY_VAR);

    // Masks are set up during reordering; only save the categories here.
    for info in buffer.info_slice_mut() {
        info.set_khmer_category(get_khmer_category(info.glyph_id));
    }
}

fn setup_syllables(_: &hb_ot_shape_plan_t, _: &hb_font_t, buffer: &mut hb_buffer_t) -> bool {
    buffer.allocate_var(GlyphInfo::SYLLABLE_VAR);
    find_syllables_khmer(buffer);
    foreach_syllable!(buffer, start, end, {
        buffer.unsafe_to_break(Some(start), Some(end));
    });
    false
}

fn reorder(plan: &hb_ot_shape_plan_t, font: &hb_font_t, buffer: &mut hb_buffer_t) -> bool {
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

    if let Some(khmer_plan) = plan.data::<khmer_shape_plan_t>() {
        foreach_syllable!(buffer, start, end, {
            reorder_syllable(khmer_plan, start, end, buffer);
        });
    }

    buffer.deallocate_var(GlyphInfo::OT_SHAPER_VAR_U8_CATEGORY_VAR);
    ret
}

fn reorder_syllable(
    khmer_plan: &khmer_shape_plan_t,
    start: usize,
    end: usize,
    buffer: &mut hb_buffer_t,
) {
    let syllable_type = buffer.info[start].syllable() & 0x0F;
    if syllable_type == SyllableType::ConsonantSyllable as u8
        || syllable_type == SyllableType::BrokenCluster as u8
    {
        reorder_consonant_syllable(khmer_plan, start, end, buffer);
    }
}

fn reorder_consonant_syllable(
    khmer_plan: &khmer_shape_plan_t,
    start: usize,
    end: usize,
    buffer: &mut hb_buffer_t,
) {
    let masks = &khmer_plan.mask_array;

    // Post-base forms may apply to anything after the first glyph.
    let post_base = masks[KHMER_BLWF] | masks[KHMER_ABVF] | masks[KHMER_PSTF];
    for info in &mut buffer.info[start + 1..end] {
        info.mask |= post_base;
    }

    let mut num_coengs = 0;
    let mut i = start + 1;
    while i < end {
        let category = buffer.info[i].khmer_category();
        // Only the first two coengs are considered for a pre-base Ro.
        if category == OT_H && num_coengs <= 2 && i + 1 < end {
            num_coengs += 1;

            if buffer.info[i + 1].khmer_category() == OT_Ra {
                buffer.info[i].mask |= masks[KHMER_PREF];
                buffer.info[i + 1].mask |= masks[KHMER_PREF];

                // Move the Coeng,Ro sequence to the start.
                buffer.merge_clusters(start, i + 2);
                buffer.info[start..i + 2].rotate_right(2);

                // Everything after the Coeng,Ro may form 'cfar'.
                if masks[KHMER_CFAR] != 0 {
                    for info in &mut buffer.info[i + 2..end] {
                        info.mask |= masks[KHMER_CFAR];
                    }
                }

                num_coengs = 2;
            }
        } else if category == OT_VPre {
            // Move the left matra piece to the start.
            buffer.merge_clusters(start, i + 1);
            buffer.info[start..=i].rotate_right(1);
        }

        i += 1;
    }
}

fn decompose(
    _: &hb_ot_shape_normalize_context_t,
    ab: hb_codepoint_t,
) -> Option<(hb_codepoint_t, hb_codepoint_t)> {
    // Split matras keep the full vowel sign as their second part so it
    // still finds its glyph.
    match ab {
        0x17BE | 0x17BF | 0x17C0 | 0x17C4 | 0x17C5 => Some((0x17C1, ab)),
        _ => unicode::decompose(ab),
    }
}

fn compose(
    _: &hb_ot_shape_normalize_context_t,
    a: hb_codepoint_t,
    b: hb_codepoint_t,
) -> Option<hb_codepoint_t> {
    // Avoid recomposing split matras.
    if a.general_category().is_mark() {
        return None;
    }

    unicode::compose(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories() {
        assert_eq!(get_khmer_category(0x1780), OT_C);
        assert_eq!(get_khmer_category(0x179A), OT_Ra);
        assert_eq!(get_khmer_category(0x17D2), OT_H);
        assert_eq!(get_khmer_category(0x17C1), OT_VPre);
        assert_eq!(get_khmer_category(0x17CC), OT_Robatic);
        assert_eq!(get_khmer_category(0x0041), OT_X);
    }
}
