use alloc::boxed::Box;
use core::any::Any;

use super::algs::*;
use super::buffer::*;
use super::common::hb_codepoint_t;
use super::ot_layout::_hb_clear_substitution_flags;
use super::ot_map::*;
use super::ot_shape::hb_ot_shape_planner_t;
use super::ot_shape_normalize::*;
use super::ot_shape_plan::hb_ot_shape_plan_t;
use super::ot_shaper::*;
use super::ot_shaper_syllabic::{insert_dotted_circles, syllabic_clear_var, DottedCircle};
use super::ot_shaper_use_machine::{find_syllables_use, SyllableType};
use super::ot_shaper_use_table::get_category;
use super::ot_shaper_vowel_constraints::preprocess_text_vowel_constraints;
use super::unicode::{self, CharExt};
use super::{hb_font_t, hb_mask_t, hb_tag_t};

pub static UNIVERSAL_SHAPER: hb_ot_shaper_t = hb_ot_shaper_t {
    name: "use",
    collect_features: Some(collect_features),
    override_features: None,
    create_data: Some(data_create_use),
    preprocess_text: Some(preprocess_text),
    postprocess_glyphs: None,
    normalization_preference: HB_OT_SHAPE_NORMALIZATION_MODE_COMPOSED_DIACRITICS_NO_SHORT_CIRCUIT,
    decompose: None,
    compose: Some(compose),
    setup_masks: Some(setup_masks),
    gpos_tag: None,
    reorder_marks: None,
    zero_width_marks: HB_OT_SHAPE_ZERO_WIDTH_MARKS_BY_GDEF_EARLY,
    fallback_position: false,
};

/// Universal Shaping Engine character categories.
#[allow(dead_code)]
pub mod category {
    pub const OTHER: u8 = 0;
    pub const BASE: u8 = 1;
    pub const BASE_NUM: u8 = 4;
    pub const BASE_OTHER: u8 = 5;
    pub const CONS_SUB: u8 = 11;
    pub const HALANT: u8 = 12;
    pub const HALANT_NUM: u8 = 13;
    pub const ZWNJ: u8 = 14;
    pub const REPHA: u8 = 18;
    pub const SYM: u8 = 19;
    pub const VOWEL_PRE: u8 = 22;
    pub const VOWEL_MOD_PRE: u8 = 23;
    pub const CONS_FINAL_ABOVE: u8 = 24;
    pub const CONS_FINAL_BELOW: u8 = 25;
    pub const CONS_FINAL_POST: u8 = 26;
    pub const CONS_MED_ABOVE: u8 = 27;
    pub const CONS_MED_BELOW: u8 = 28;
    pub const CONS_MED_POST: u8 = 29;
    pub const CONS_MED_PRE: u8 = 30;
    pub const CONS_MOD_ABOVE: u8 = 31;
    pub const CONS_MOD_BELOW: u8 = 32;
    pub const VOWEL_ABOVE: u8 = 33;
    pub const VOWEL_BELOW: u8 = 34;
    pub const VOWEL_POST: u8 = 35;
    pub const VOWEL_MOD_ABOVE: u8 = 37;
    pub const VOWEL_MOD_BELOW: u8 = 38;
    pub const VOWEL_MOD_POST: u8 = 39;
    pub const SYM_MOD_ABOVE: u8 = 41;
    pub const SYM_MOD_BELOW: u8 = 42;
    pub const CONS_WITH_STACKER: u8 = 43;
    pub const HALANT_OR_VOWEL_MODIFIER: u8 = 44;
    pub const CONS_FINAL_MOD_ABOVE: u8 = 45;
    pub const CONS_FINAL_MOD_BELOW: u8 = 46;
    pub const CONS_FINAL_MOD_POST: u8 = 47;
    pub const SAKOT: u8 = 48;
    pub const HIEROGLYPH: u8 = 49;
    pub const HIEROGLYPH_JOINER: u8 = 50;
    pub const HIEROGLYPH_SEGMENT_BEGIN: u8 = 51;
    pub const HIEROGLYPH_SEGMENT_END: u8 = 52;
}

use category::*;

// Basic features, applied all at once before reordering.
const BASIC_FEATURES: &[hb_tag_t] = &[
    hb_tag_t::new(b"rkrf"),
    hb_tag_t::new(b"abvf"),
    hb_tag_t::new(b"blwf"),
    hb_tag_t::new(b"half"),
    hb_tag_t::new(b"pstf"),
    hb_tag_t::new(b"vatu"),
    hb_tag_t::new(b"cjct"),
];

// In the order of `JoiningForm`.
const TOPOGRAPHICAL_FEATURES: &[hb_tag_t] = &[
    hb_tag_t::new(b"isol"),
    hb_tag_t::new(b"init"),
    hb_tag_t::new(b"medi"),
    hb_tag_t::new(b"fina"),
];

// Other features, applied all at once after reordering and clearing
// syllables.
const OTHER_FEATURES: &[hb_tag_t] = &[
    hb_tag_t::new(b"abvs"),
    hb_tag_t::new(b"blws"),
    hb_tag_t::new(b"haln"),
    hb_tag_t::new(b"pres"),
    hb_tag_t::new(b"psts"),
];

#[derive(Clone, Copy, PartialEq)]
enum JoiningForm {
    Isol = 0,
    Init,
    Medi,
    Fina,
}

const POST_BASE_FLAGS64: u64 = rb_flag64(CONS_FINAL_ABOVE as u32)
    | rb_flag64(CONS_FINAL_BELOW as u32)
    | rb_flag64(CONS_FINAL_POST as u32)
    | rb_flag64(CONS_MED_ABOVE as u32)
    | rb_flag64(CONS_MED_BELOW as u32)
    | rb_flag64(CONS_MED_POST as u32)
    | rb_flag64(CONS_MED_PRE as u32)
    | rb_flag64(VOWEL_ABOVE as u32)
    | rb_flag64(VOWEL_BELOW as u32)
    | rb_flag64(VOWEL_POST as u32)
    | rb_flag64(VOWEL_PRE as u32)
    | rb_flag64(VOWEL_MOD_ABOVE as u32)
    | rb_flag64(VOWEL_MOD_BELOW as u32)
    | rb_flag64(VOWEL_MOD_POST as u32)
    | rb_flag64(VOWEL_MOD_PRE as u32);

struct use_shape_plan_t {
    rphf_mask: hb_mask_t,
}

fn data_create_use(plan: &hb_ot_shape_plan_t) -> Box<dyn Any + Send + Sync> {
    Box::new(use_shape_plan_t {
        rphf_mask: plan.ot_map.get_1_mask(hb_tag_t::new(b"rphf")),
    })
}

impl GlyphInfo {
    pub(crate) fn use_category(&self) -> u8 {
        self.ot_shaper_var_u8_category()
    }

    fn set_use_category(&mut self, c: u8) {
        self.set_ot_shaper_var_u8_category(c)
    }

    fn is_halant_use(&self) -> bool {
        matches!(self.use_category(), HALANT | HALANT_OR_VOWEL_MODIFIER) && !self.ligated()
    }
}

fn collect_features(planner: &mut hb_ot_shape_planner_t) {
    // Do this before any lookups have been applied.
    planner.ot_map.add_gsub_pause(Some(setup_syllables));

    // Default glyph pre-processing group.
    planner
        .ot_map
        .enable_feature(hb_tag_t::new(b"locl"), F_PER_SYLLABLE, 1);
    planner
        .ot_map
        .enable_feature(hb_tag_t::new(b"ccmp"), F_PER_SYLLABLE, 1);
    planner
        .ot_map
        .enable_feature(hb_tag_t::new(b"nukt"), F_PER_SYLLABLE, 1);
    planner.ot_map.enable_feature(
        hb_tag_t::new(b"akhn"),
        F_MANUAL_ZWJ.union(F_PER_SYLLABLE),
        1,
    );

    // Reordering group.
    planner
        .ot_map
        .add_gsub_pause(Some(_hb_clear_substitution_flags));
    planner.ot_map.add_feature(
        hb_tag_t::new(b"rphf"),
        F_MANUAL_ZWJ.union(F_PER_SYLLABLE),
        1,
    );
    planner.ot_map.add_gsub_pause(Some(record_rphf));
    planner
        .ot_map
        .add_gsub_pause(Some(_hb_clear_substitution_flags));
    planner.ot_map.enable_feature(
        hb_tag_t::new(b"pref"),
        F_MANUAL_ZWJ.union(F_PER_SYLLABLE),
        1,
    );
    planner.ot_map.add_gsub_pause(Some(record_pref));

    // Orthographic unit shaping group.
    for &tag in BASIC_FEATURES {
        planner
            .ot_map
            .enable_feature(tag, F_MANUAL_ZWJ.union(F_PER_SYLLABLE), 1);
    }

    planner.ot_map.add_gsub_pause(Some(reorder));
    planner.ot_map.add_gsub_pause(Some(syllabic_clear_var));

    // Topographical features.
    for &tag in TOPOGRAPHICAL_FEATURES {
        planner.ot_map.add_feature(tag, F_NONE, 1);
    }
    planner.ot_map.add_gsub_pause(None);

    // Standard typographic presentation.
    for &tag in OTHER_FEATURES {
        planner.ot_map.enable_feature(tag, F_MANUAL_ZWJ, 1);
    }
}

fn preprocess_text(_: &hb_ot_shape_plan_t, _: &hb_font_t, buffer: &mut hb_buffer_t) {
    preprocess_text_vowel_constraints(buffer);
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

fn setup_masks(_: &hb_ot_shape_plan_t, _: &hb_font_t, buffer: &mut hb_buffer_t) {
    buffer.allocate_var(GlyphInfo::OT_SHAPER_VAR_U8_CATEGORY_VAR);

    // Masks are set up later, in a pause; only save the categories here.
    for info in buffer.info_slice_mut() {
        info.set_use_category(get_category(info.glyph_id));
    }
}

fn setup_syllables(plan: &hb_ot_shape_plan_t, _: &hb_font_t, buffer: &mut hb_buffer_t) -> bool {
    buffer.allocate_var(GlyphInfo::SYLLABLE_VAR);
    find_syllables_use(buffer);
    foreach_syllable!(buffer, start, end, {
        buffer.unsafe_to_break(Some(start), Some(end));
    });
    setup_rphf_mask(plan, buffer);
    setup_topographical_masks(plan, buffer);
    false
}

fn setup_rphf_mask(plan: &hb_ot_shape_plan_t, buffer: &mut hb_buffer_t) {
    let Some(use_plan) = plan.data::<use_shape_plan_t>() else {
        return;
    };

    let mask = use_plan.rphf_mask;
    if mask == 0 {
        return;
    }

    foreach_syllable!(buffer, start, end, {
        let limit = if buffer.info[start].use_category() == REPHA {
            1
        } else {
            (end - start).min(3)
        };

        for info in &mut buffer.info[start..start + limit] {
            info.mask |= mask;
        }
    });
}

fn setup_topographical_masks(plan: &hb_ot_shape_plan_t, buffer: &mut hb_buffer_t) {
    let mut masks = [0; 4];
    let mut all_masks = 0;
    for (mask, &tag) in masks.iter_mut().zip(TOPOGRAPHICAL_FEATURES) {
        *mask = plan.ot_map.get_1_mask(tag);
        if *mask == plan.ot_map.global_mask() {
            *mask = 0;
        }
        all_masks |= *mask;
    }

    if all_masks == 0 {
        return;
    }

    let other_masks = !all_masks;

    let mut last_start = 0;
    let mut last_form = None;
    foreach_syllable!(buffer, start, end, {
        let syllable_type = buffer.info[start].syllable() & 0x0F;
        if syllable_type == SyllableType::IndependentCluster as u8
            || syllable_type == SyllableType::SymbolCluster as u8
            || syllable_type == SyllableType::HieroglyphCluster as u8
            || syllable_type == SyllableType::NonCluster as u8
        {
            // These don't join.
            last_form = None;
        } else {
            let join = matches!(last_form, Some(JoiningForm::Fina | JoiningForm::Isol));

            if join {
                // Fix up the previous syllable's form.
                let form = if last_form == Some(JoiningForm::Fina) {
                    JoiningForm::Medi
                } else {
                    JoiningForm::Init
                };
                for info in &mut buffer.info[last_start..start] {
                    info.mask = (info.mask & other_masks) | masks[form as usize];
                }
            }

            // Form for this syllable.
            let form = if join {
                JoiningForm::Fina
            } else {
                JoiningForm::Isol
            };
            for info in &mut buffer.info[start..end] {
                info.mask = (info.mask & other_masks) | masks[form as usize];
            }
            last_form = Some(form);
        }

        last_start = start;
    });
}

fn record_rphf(plan: &hb_ot_shape_plan_t, _: &hb_font_t, buffer: &mut hb_buffer_t) -> bool {
    let Some(use_plan) = plan.data::<use_shape_plan_t>() else {
        return false;
    };

    let mask = use_plan.rphf_mask;
    if mask == 0 {
        return false;
    }

    foreach_syllable!(buffer, start, end, {
        // Mark a substituted repha as REPHA.
        let mut i = start;
        while i < end && buffer.info[i].mask & mask != 0 {
            if buffer.info[i].substituted() {
                buffer.info[i].set_use_category(REPHA);
                break;
            }
            i += 1;
        }
    });

    false
}

fn record_pref(_: &hb_ot_shape_plan_t, _: &hb_font_t, buffer: &mut hb_buffer_t) -> bool {
    foreach_syllable!(buffer, start, end, {
        // A substituted pref behaves like a pre-base vowel.
        if let Some(info) = buffer.info[start..end].iter_mut().find(|i| i.substituted()) {
            info.set_use_category(VOWEL_PRE);
        }
    });

    false
}

fn reorder(_: &hb_ot_shape_plan_t, font: &hb_font_t, buffer: &mut hb_buffer_t) -> bool {
    let ret = insert_dotted_circles(
        font,
        buffer,
        &DottedCircle {
            broken_syllable_type: SyllableType::BrokenCluster as u8,
            category: BASE,
            repha_category: Some(REPHA),
            position: None,
        },
    );

    foreach_syllable!(buffer, start, end, {
        reorder_syllable(start, end, buffer);
    });

    buffer.deallocate_var(GlyphInfo::OT_SHAPER_VAR_U8_CATEGORY_VAR);
    ret
}

fn reorder_syllable(start: usize, end: usize, buffer: &mut hb_buffer_t) {
    let syllable_type = u32::from(buffer.info[start].syllable() & 0x0F);
    // Only a few syllable types need reordering.
    let reordered = rb_flag(SyllableType::ViramaTerminatedCluster as u32)
        | rb_flag(SyllableType::SakotTerminatedCluster as u32)
        | rb_flag(SyllableType::StandardCluster as u32)
        | rb_flag(SyllableType::BrokenCluster as u32);
    if rb_flag_unsafe(syllable_type) & reordered == 0 {
        return;
    }

    // Move a repha forward, to just before the first post-base glyph or to
    // the end.
    if buffer.info[start].use_category() == REPHA && end - start > 1 {
        for i in start + 1..end {
            let info = &buffer.info[i];
            let is_post_base_glyph = rb_flag64_unsafe(u32::from(info.use_category()))
                & POST_BASE_FLAGS64
                != 0
                || info.is_halant_use();

            if is_post_base_glyph || i == end - 1 {
                let target = if is_post_base_glyph { i - 1 } else { i };
                buffer.merge_clusters(start, target + 1);
                buffer.info[start..=target].rotate_left(1);
                break;
            }
        }
    }

    // Move pre-base vowels back, to just after the last halant or to the
    // start.
    let mut j = start;
    for i in start..end {
        let info = &buffer.info[i];
        let flag = rb_flag_unsafe(u32::from(info.use_category()));
        if info.is_halant_use() {
            j = i + 1;
        } else if flag & (rb_flag(VOWEL_PRE as u32) | rb_flag(VOWEL_MOD_PRE as u32)) != 0
            // Only move the first component of a multiple substitution.
            && info.lig_comp() == 0
            && j < i
        {
            buffer.merge_clusters(j, i + 1);
            buffer.info[j..=i].rotate_right(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glyphs(categories: &[u8], syllable_type: SyllableType) -> hb_buffer_t {
        let mut buffer = hb_buffer_t::new();
        for i in 0..categories.len() as u32 {
            buffer.add(0x41 + i, i);
        }
        let len = buffer.len;
        for (info, &category) in buffer.info[..len].iter_mut().zip(categories) {
            info.set_use_category(category);
            info.set_syllable((1 << 4) | syllable_type as u8);
        }
        buffer
    }

    fn order(buffer: &hb_buffer_t) -> alloc::vec::Vec<u32> {
        buffer.info[..buffer.len].iter().map(|i| i.glyph_id).collect()
    }

    #[test]
    fn repha_moves_before_first_post_base_glyph() {
        let mut buffer = glyphs(
            &[REPHA, BASE, CONS_SUB, VOWEL_ABOVE],
            SyllableType::StandardCluster,
        );
        reorder_syllable(0, 4, &mut buffer);
        assert_eq!(order(&buffer), [0x42, 0x43, 0x41, 0x44]);
    }

    #[test]
    fn prebase_vowel_moves_after_halant() {
        let mut buffer = glyphs(
            &[BASE, HALANT, BASE, VOWEL_PRE],
            SyllableType::StandardCluster,
        );
        reorder_syllable(0, 4, &mut buffer);
        assert_eq!(order(&buffer), [0x41, 0x42, 0x44, 0x43]);
    }

    #[test]
    fn independent_cluster_is_left_alone() {
        let mut buffer = glyphs(&[REPHA, BASE], SyllableType::IndependentCluster);
        reorder_syllable(0, 2, &mut buffer);
        assert_eq!(order(&buffer), [0x41, 0x42]);
    }
}
