use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::Any;

use log::trace;
use read_fonts::types::GlyphId;
use unicode_joining_type::{get_joining_group, get_joining_type, JoiningGroup, JoiningType};

use super::buffer::*;
use super::common::{hb_codepoint_t, script, Script};
use super::ot_layout::TableIndex;
use super::ot_layout_common::lookup_flags;
use super::ot_layout_gsubgpos::{ligate_input, match_input, OT::hb_ot_apply_context_t};
use super::ot_map::*;
use super::ot_shape::hb_ot_shape_planner_t;
use super::ot_shape_normalize::HB_OT_SHAPE_NORMALIZATION_MODE_DEFAULT;
use super::ot_shape_plan::hb_ot_shape_plan_t;
use super::ot_shaper::*;
use super::ot_shaper_arabic_table::*;
use super::unicode::{modified_combining_class as mcc, CharExt, GeneralCategory};
use super::{hb_font_t, hb_mask_t, hb_tag_t};

pub static ARABIC_SHAPER: hb_ot_shaper_t = hb_ot_shaper_t {
    name: "arabic",
    collect_features: Some(collect_features),
    override_features: None,
    create_data: Some(data_create_arabic),
    preprocess_text: None,
    postprocess_glyphs: Some(postprocess_glyphs),
    normalization_preference: HB_OT_SHAPE_NORMALIZATION_MODE_DEFAULT,
    decompose: None,
    compose: None,
    setup_masks: Some(setup_masks),
    gpos_tag: None,
    reorder_marks: Some(reorder_marks),
    zero_width_marks: HB_OT_SHAPE_ZERO_WIDTH_MARKS_BY_GDEF_LATE,
    fallback_position: true,
};

impl GlyphInfo {
    fn arabic_shaping_action(&self) -> u8 {
        self.ot_shaper_var_u8_auxiliary()
    }

    fn set_arabic_shaping_action(&mut self, action: u8) {
        self.set_ot_shaper_var_u8_auxiliary(action)
    }
}

// Joining classes, used as columns of the state table.
const JOINING_TYPE_U: u8 = 0;
const JOINING_TYPE_L: u8 = 1;
const JOINING_TYPE_R: u8 = 2;
const JOINING_TYPE_D: u8 = 3;
const JOINING_TYPE_C: u8 = JOINING_TYPE_D;
const JOINING_GROUP_ALAPH: u8 = 4;
const JOINING_GROUP_DALATH_RISH: u8 = 5;
const NUM_STATE_MACHINE_COLS: usize = 6;
const JOINING_TYPE_T: u8 = 7;

fn get_joining_class(u: hb_codepoint_t, gc: GeneralCategory) -> u8 {
    let Some(c) = char::from_u32(u) else {
        return JOINING_TYPE_U;
    };

    match get_joining_group(c) {
        JoiningGroup::Alaph => return JOINING_GROUP_ALAPH,
        JoiningGroup::DalathRish => return JOINING_GROUP_DALATH_RISH,
        _ => {}
    }

    match get_joining_type(c) {
        JoiningType::LeftJoining => JOINING_TYPE_L,
        JoiningType::RightJoining => JOINING_TYPE_R,
        JoiningType::DualJoining => JOINING_TYPE_D,
        JoiningType::JoinCausing => JOINING_TYPE_C,
        JoiningType::Transparent => JOINING_TYPE_T,
        // ZWNJ and a few other format characters are explicitly
        // non-joining, so only marks fall back to transparent.
        JoiningType::NonJoining => {
            if gc == GeneralCategory::NON_SPACING_MARK || gc == GeneralCategory::ENCLOSING_MARK {
                JOINING_TYPE_T
            } else {
                JOINING_TYPE_U
            }
        }
        _ => JOINING_TYPE_U,
    }
}

fn feature_is_syriac(tag: hb_tag_t) -> bool {
    matches!(tag.to_be_bytes()[3], b'2' | b'3')
}

const ARABIC_FEATURES: &[hb_tag_t] = &[
    hb_tag_t::new(b"isol"),
    hb_tag_t::new(b"fina"),
    hb_tag_t::new(b"fin2"),
    hb_tag_t::new(b"fin3"),
    hb_tag_t::new(b"medi"),
    hb_tag_t::new(b"med2"),
    hb_tag_t::new(b"init"),
];

// Shaping actions, in the order of ARABIC_FEATURES.
mod action {
    pub const ISOL: u8 = 0;
    pub const FINA: u8 = 1;
    pub const FIN2: u8 = 2;
    pub const FIN3: u8 = 3;
    pub const MEDI: u8 = 4;
    pub const MED2: u8 = 5;
    pub const INIT: u8 = 6;
    pub const NONE: u8 = 7;

    // Pieces produced by `stch`, recorded after the feature ran.
    pub const STCH_FIXED: u8 = 8;
    pub const STCH_REPEATING: u8 = 9;
}

const HB_BUFFER_SCRATCH_FLAG_ARABIC_HAS_STCH: u32 = HB_BUFFER_SCRATCH_FLAG_SHAPER0;

#[derive(Clone, Copy)]
struct StateTableEntry {
    prev_action: u8,
    curr_action: u8,
    next_state: u16,
}

const fn e(prev_action: u8, curr_action: u8, next_state: u16) -> StateTableEntry {
    StateTableEntry {
        prev_action,
        curr_action,
        next_state,
    }
}

#[rustfmt::skip]
const STATE_TABLE: &[[StateTableEntry; NUM_STATE_MACHINE_COLS]] = {
    use action::*;
    &[
        //   jt_U,              jt_L,              jt_R,              jt_D,              jg_ALAPH,          jg_DALATH_RISH

        // State 0: prev was U, not willing to join.
        [e(NONE, NONE, 0), e(NONE, ISOL, 2), e(NONE, ISOL, 1), e(NONE, ISOL, 2), e(NONE, ISOL, 1), e(NONE, ISOL, 6)],

        // State 1: prev was R or ISOL/ALAPH, not willing to join.
        [e(NONE, NONE, 0), e(NONE, ISOL, 2), e(NONE, ISOL, 1), e(NONE, ISOL, 2), e(NONE, FIN2, 5), e(NONE, ISOL, 6)],

        // State 2: prev was D/L in ISOL form, willing to join.
        [e(NONE, NONE, 0), e(NONE, ISOL, 2), e(INIT, FINA, 1), e(INIT, FINA, 3), e(INIT, FINA, 4), e(INIT, FINA, 6)],

        // State 3: prev was D in FINA form, willing to join.
        [e(NONE, NONE, 0), e(NONE, ISOL, 2), e(MEDI, FINA, 1), e(MEDI, FINA, 3), e(MEDI, FINA, 4), e(MEDI, FINA, 6)],

        // State 4: prev was FINA ALAPH, not willing to join.
        [e(NONE, NONE, 0), e(NONE, ISOL, 2), e(MED2, ISOL, 1), e(MED2, ISOL, 2), e(MED2, FIN2, 5), e(MED2, ISOL, 6)],

        // State 5: prev was FIN2/FIN3 ALAPH, not willing to join.
        [e(NONE, NONE, 0), e(NONE, ISOL, 2), e(ISOL, ISOL, 1), e(ISOL, ISOL, 2), e(ISOL, FIN2, 5), e(ISOL, ISOL, 6)],

        // State 6: prev was DALATH/RISH, not willing to join.
        [e(NONE, NONE, 0), e(NONE, ISOL, 2), e(NONE, ISOL, 1), e(NONE, ISOL, 2), e(NONE, FIN3, 5), e(NONE, ISOL, 6)],
    ]
};

// States that can still hand an action back to the previous character.
fn state_has_prev_action(state: u16) -> bool {
    (2..=5).contains(&state)
}

fn collect_features(planner: &mut hb_ot_shape_planner_t) {
    // Features are applied in the order the Arabic shaping model lists them,
    // with pauses in between. The pause between the positional features and
    // rlig is required; the others keep contextual lookups from seeing
    // half-applied forms.
    planner
        .ot_map
        .enable_feature(hb_tag_t::new(b"stch"), F_NONE, 1);
    planner.ot_map.add_gsub_pause(Some(record_stch));

    planner
        .ot_map
        .enable_feature(hb_tag_t::new(b"ccmp"), F_MANUAL_ZWJ, 1);
    planner
        .ot_map
        .enable_feature(hb_tag_t::new(b"locl"), F_MANUAL_ZWJ, 1);

    planner.ot_map.add_gsub_pause(None);

    for &feature in ARABIC_FEATURES {
        let has_fallback = planner.script == Some(script::ARABIC) && !feature_is_syriac(feature);
        let flags = if has_fallback { F_HAS_FALLBACK } else { F_NONE };
        planner.ot_map.add_feature(feature, flags, 1);
        planner.ot_map.add_gsub_pause(None);
    }

    planner.ot_map.add_gsub_pause(None);

    // A ZWJ also means "don't ligate" in Arabic, so the ligating features run
    // with manual ZWJ handling.
    planner
        .ot_map
        .enable_feature(hb_tag_t::new(b"rlig"), F_MANUAL_ZWJ | F_HAS_FALLBACK, 1);

    if planner.script == Some(script::ARABIC) {
        planner.ot_map.add_gsub_pause(Some(arabic_fallback_shape));
    }

    // No pause after rclt.
    planner
        .ot_map
        .enable_feature(hb_tag_t::new(b"rclt"), F_MANUAL_ZWJ, 1);
    planner
        .ot_map
        .enable_feature(hb_tag_t::new(b"calt"), F_MANUAL_ZWJ, 1);
    planner.ot_map.add_gsub_pause(None);

    // 'cswh' is off by default.
    planner
        .ot_map
        .enable_feature(hb_tag_t::new(b"mset"), F_NONE, 1);
}

fn data_create_arabic(plan: &hb_ot_shape_plan_t) -> Box<dyn Any + Send + Sync> {
    Box::new(arabic_shape_plan_t::new(plan))
}

pub struct arabic_shape_plan_t {
    /// One mask per shaping action. `action::NONE` maps to the trailing zero.
    mask_array: [hb_mask_t; ARABIC_FEATURES.len() + 1],
    /// The font lacks some positional feature, so presentation forms from
    /// the cmap stand in.
    do_fallback: bool,
    has_stch: bool,
    script: Option<Script>,
}

impl arabic_shape_plan_t {
    pub fn new(plan: &hb_ot_shape_plan_t) -> Self {
        let mut mask_array = [0; ARABIC_FEATURES.len() + 1];
        let mut do_fallback = plan.script == Some(script::ARABIC);
        for (i, &feature) in ARABIC_FEATURES.iter().enumerate() {
            mask_array[i] = plan.ot_map.get_1_mask(feature);
            do_fallback =
                do_fallback && (feature_is_syriac(feature) || plan.ot_map.needs_fallback(feature));
        }

        arabic_shape_plan_t {
            mask_array,
            do_fallback,
            has_stch: plan.ot_map.get_1_mask(hb_tag_t::new(b"stch")) != 0,
            script: plan.script,
        }
    }
}

fn arabic_joining(buffer: &mut hb_buffer_t) {
    let mut prev: Option<usize> = None;
    let mut state = 0;

    // Check pre-context.
    for i in 0..buffer.context_len[0] {
        let c = buffer.context[0][i];
        let this_type = get_joining_class(c, c.general_category());
        if this_type == JOINING_TYPE_T {
            continue;
        }

        state = STATE_TABLE[state][this_type as usize].next_state as usize;
        break;
    }

    for i in 0..buffer.len {
        let this_type = get_joining_class(buffer.info[i].glyph_id, buffer.info[i].general_category());
        if this_type == JOINING_TYPE_T {
            buffer.info[i].set_arabic_shaping_action(action::NONE);
            continue;
        }

        let entry = STATE_TABLE[state][this_type as usize];
        match prev {
            Some(prev) if entry.prev_action != action::NONE => {
                buffer.info[prev].set_arabic_shaping_action(entry.prev_action);
                buffer.safe_to_insert_tatweel(Some(prev), Some(i + 1));
            }
            Some(prev) => {
                if this_type >= JOINING_TYPE_R || state_has_prev_action(state as u16) {
                    buffer.unsafe_to_concat(Some(prev), Some(i + 1));
                }
            }
            None => {
                if this_type >= JOINING_TYPE_R {
                    buffer.unsafe_to_concat_from_outbuffer(Some(0), Some(i + 1));
                }
            }
        }

        buffer.info[i].set_arabic_shaping_action(entry.curr_action);

        prev = Some(i);
        state = entry.next_state as usize;
    }

    // Check post-context.
    for i in 0..buffer.context_len[1] {
        let c = buffer.context[1][i];
        let this_type = get_joining_class(c, c.general_category());
        if this_type == JOINING_TYPE_T {
            continue;
        }

        let entry = STATE_TABLE[state][this_type as usize];
        if let Some(prev) = prev {
            if entry.prev_action != action::NONE {
                buffer.info[prev].set_arabic_shaping_action(entry.prev_action);
                buffer.safe_to_insert_tatweel(Some(prev), Some(buffer.len));
            } else if state_has_prev_action(state as u16) {
                buffer.unsafe_to_concat(Some(prev), Some(buffer.len));
            }
        }

        break;
    }
}

fn mongolian_variation_selectors(buffer: &mut hb_buffer_t) {
    // Free variation selectors take the form of the letter they follow.
    for i in 1..buffer.len {
        let u = buffer.info[i].glyph_id;
        if (0x180B..=0x180D).contains(&u) || u == 0x180F {
            let a = buffer.info[i - 1].arabic_shaping_action();
            buffer.info[i].set_arabic_shaping_action(a);
        }
    }
}

fn setup_masks(plan: &hb_ot_shape_plan_t, _: &hb_font_t, buffer: &mut hb_buffer_t) {
    let Some(arabic_plan) = plan.data::<arabic_shape_plan_t>() else {
        return;
    };

    buffer.allocate_var(GlyphInfo::OT_SHAPER_VAR_U8_AUXILIARY_VAR);

    arabic_joining(buffer);
    if arabic_plan.script == Some(script::MONGOLIAN) {
        mongolian_variation_selectors(buffer);
    }

    let len = buffer.len;
    for info in &mut buffer.info[..len] {
        info.mask |= arabic_plan.mask_array[info.arabic_shaping_action() as usize];
    }
}

// Stretching with `stch`, as used by Syriac abbreviation marks and the
// Arabic subtending marks.

fn is_stch(action: u8) -> bool {
    matches!(action, action::STCH_FIXED | action::STCH_REPEATING)
}

/// Runs right after `stch`: every glyph a multiple substitution produced
/// becomes a tile. Odd components repeat, even ones are drawn once.
fn record_stch(plan: &hb_ot_shape_plan_t, _: &hb_font_t, buffer: &mut hb_buffer_t) -> bool {
    let Some(arabic_plan) = plan.data::<arabic_shape_plan_t>() else {
        return false;
    };

    if !arabic_plan.has_stch {
        return false;
    }

    let len = buffer.len;
    let mut found = false;
    for info in &mut buffer.info[..len] {
        if info.multiplied() {
            let action = if info.lig_comp() % 2 != 0 {
                action::STCH_REPEATING
            } else {
                action::STCH_FIXED
            };
            info.set_arabic_shaping_action(action);
            found = true;
        }
    }

    if found {
        buffer.scratch_flags |= HB_BUFFER_SCRATCH_FLAG_ARABIC_HAS_STCH;
    }

    false
}

fn is_word_category(gc: GeneralCategory) -> bool {
    matches!(
        gc,
        GeneralCategory::UNASSIGNED
            | GeneralCategory::PRIVATE_USE
            | GeneralCategory::MODIFIER_LETTER
            | GeneralCategory::OTHER_LETTER
            | GeneralCategory::SPACING_MARK
            | GeneralCategory::ENCLOSING_MARK
            | GeneralCategory::NON_SPACING_MARK
            | GeneralCategory::DECIMAL_NUMBER
            | GeneralCategory::LETTER_NUMBER
            | GeneralCategory::OTHER_NUMBER
            | GeneralCategory::CURRENCY_SYMBOL
            | GeneralCategory::MODIFIER_SYMBOL
            | GeneralCategory::MATH_SYMBOL
            | GeneralCategory::OTHER_SYMBOL
    )
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum StchStep {
    Measure,
    Cut,
}

/// Repeats the repeating tiles of every stretch until they cover the rest of
/// the word in front of them.
///
/// The buffer is in visual order here, so the word extends to the left of a
/// stretch. The first pass counts the extra glyphs needed, the second one
/// writes the buffer back to front with the copies in place.
fn apply_stch(font: &hb_font_t, buffer: &mut hb_buffer_t) {
    if buffer.scratch_flags & HB_BUFFER_SCRATCH_FLAG_ARABIC_HAS_STCH == 0 {
        return;
    }

    let sign: i32 = if font.scale().0 < 0 { -1 } else { 1 };
    let mut extra_glyphs_needed = 0;

    for step in [StchStep::Measure, StchStep::Cut] {
        let count = buffer.len;
        let new_len = count + extra_glyphs_needed;
        let mut j = new_len;
        let mut i = count;
        while i > 0 {
            if !is_stch(buffer.info[i - 1].arabic_shaping_action()) {
                if step == StchStep::Cut {
                    j -= 1;
                    buffer.info[j] = buffer.info[i - 1];
                    buffer.pos[j] = buffer.pos[i - 1];
                }
                i -= 1;
                continue;
            }

            let mut w_total = 0;
            let mut w_fixed = 0;
            let mut w_repeating = 0;
            let mut n_repeating = 0;

            let end = i;
            while i > 0 && is_stch(buffer.info[i - 1].arabic_shaping_action()) {
                i -= 1;
                let width = font.get_glyph_h_advance(buffer.info[i].as_glyph());
                if buffer.info[i].arabic_shaping_action() == action::STCH_FIXED {
                    w_fixed += width;
                } else {
                    w_repeating += width;
                    n_repeating += 1;
                }
            }
            let start = i;

            let mut context = i;
            while context > 0 {
                let info = &buffer.info[context - 1];
                if is_stch(info.arabic_shaping_action())
                    || !(info.is_default_ignorable() || is_word_category(info.general_category()))
                {
                    break;
                }
                context -= 1;
                w_total += buffer.pos[context].x_advance;
            }

            trace!(
                "arabic: {} stretch at ({}, {}, {}), word width {}, fixed {}, repeating {}",
                if step == StchStep::Measure { "measuring" } else { "cutting" },
                context,
                start,
                end,
                w_total,
                w_fixed,
                w_repeating
            );

            // Extra copies of each repeating tile.
            let mut n_copies: i32 = 0;
            let w_remaining = w_total - w_fixed;
            if sign * w_remaining > sign * w_repeating && sign * w_repeating > 0 {
                n_copies = (sign * w_remaining) / (sign * w_repeating) - 1;
            }

            // One more copy, squeezed together, fits better than a gap.
            let mut extra_repeat_overlap = 0;
            let shortfall = sign * w_remaining - sign * w_repeating * (n_copies + 1);
            if shortfall > 0 && n_repeating > 0 {
                n_copies += 1;
                let excess = (n_copies + 1) * sign * w_repeating - sign * w_remaining;
                if excess > 0 {
                    extra_repeat_overlap = excess / (n_copies * n_repeating);
                }
            }

            if step == StchStep::Measure {
                extra_glyphs_needed += (n_copies * n_repeating) as usize;
                continue;
            }

            buffer.unsafe_to_break(Some(context), Some(end));
            let mut x_offset = 0;
            for k in (start + 1..=end).rev() {
                let width = font.get_glyph_h_advance(buffer.info[k - 1].as_glyph());

                let mut repeat = 1;
                if buffer.info[k - 1].arabic_shaping_action() == action::STCH_REPEATING {
                    repeat += n_copies;
                }

                for n in 0..repeat {
                    x_offset -= width;
                    if n > 0 {
                        x_offset += extra_repeat_overlap;
                    }
                    buffer.pos[k - 1].x_offset = x_offset;
                    j -= 1;
                    buffer.info[j] = buffer.info[k - 1];
                    buffer.pos[j] = buffer.pos[k - 1];
                }
            }
        }

        match step {
            StchStep::Measure => {
                if !buffer.ensure(count + extra_glyphs_needed) {
                    break;
                }
            }
            StchStep::Cut => {
                debug_assert_eq!(j, 0);
                buffer.len = new_len;
            }
        }
    }
}

fn postprocess_glyphs(_: &hb_ot_shape_plan_t, font: &hb_font_t, buffer: &mut hb_buffer_t) {
    apply_stch(font, buffer);
    buffer.deallocate_var(GlyphInfo::OT_SHAPER_VAR_U8_AUXILIARY_VAR);
}

// Marks that combine with the preceding mark rather than the base.
const MODIFIER_COMBINING_MARKS: &[u32] = &[
    0x0654, // ARABIC HAMZA ABOVE
    0x0655, // ARABIC HAMZA BELOW
    0x0658, // ARABIC MARK NOON GHUNNA
    0x06DC, // ARABIC SMALL HIGH SEEN
    0x06E3, // ARABIC SMALL LOW SEEN
    0x06E7, // ARABIC SMALL HIGH YEH
    0x06E8, // ARABIC SMALL HIGH NOON
    0x08CA, // ARABIC SMALL HIGH FARSI YEH
    0x08CB, // ARABIC SMALL HIGH YEH BARREE WITH TWO DOTS BELOW
    0x08CD, // ARABIC SMALL HIGH ZAH
    0x08CE, // ARABIC LARGE ROUND DOT ABOVE
    0x08CF, // ARABIC LARGE ROUND DOT BELOW
    0x08D3, // ARABIC SMALL LOW WAW
    0x08F3, // ARABIC SMALL HIGH WAW
];

fn info_is_mcm(info: &GlyphInfo) -> bool {
    MODIFIER_COMBINING_MARKS.contains(&info.glyph_id)
}

/// Moves modifier combining marks of class 220 and 230 to the front of their
/// mark run, so they attach right after the base.
fn reorder_marks(_: &hb_ot_shape_plan_t, buffer: &mut hb_buffer_t, mut start: usize, end: usize) {
    let mut i = start;
    for cc in [220u8, 230] {
        while i < end && buffer.info[i].modified_combining_class() < cc {
            i += 1;
        }

        if i == end {
            break;
        }

        if buffer.info[i].modified_combining_class() > cc {
            continue;
        }

        let mut j = i;
        while j < end
            && buffer.info[j].modified_combining_class() == cc
            && info_is_mcm(&buffer.info[j])
        {
            j += 1;
        }

        if i == j {
            continue;
        }

        trace!("arabic: moving marks {}..{} to {}", i, j, start);

        buffer.merge_clusters(start, j);
        buffer.info[start..j].rotate_right(j - i);

        // Renumber so the run stays sorted for the normalizer's CGJ logic.
        // Both values sort before every Arabic class and fold back to
        // below/above during fallback mark positioning.
        let new_start = start + j - i;
        let new_cc = if cc == 220 { mcc::CCC22 } else { mcc::CCC26 };
        while start < new_start {
            buffer.info[start].set_modified_combining_class(new_cc);
            start += 1;
        }

        i = j;
    }
}

const FALLBACK_FEATURES: [hb_tag_t; 4] = [
    hb_tag_t::new(b"isol"),
    hb_tag_t::new(b"fina"),
    hb_tag_t::new(b"init"),
    hb_tag_t::new(b"medi"),
];

/// Positional forms and lam-alef ligatures taken from the presentation form
/// blocks of the font's cmap.
struct arabic_fallback_plan_t {
    /// Per positional feature: its mask and sorted `(glyph, substitute)`
    /// pairs.
    singles: Vec<(hb_mask_t, Vec<(u32, u32)>)>,
    rlig_mask: hb_mask_t,
    /// `(first, second, ligature)` glyphs.
    ligatures: Vec<(u32, u32, u32)>,
}

impl arabic_fallback_plan_t {
    fn new(plan: &hb_ot_shape_plan_t, font: &hb_font_t) -> Self {
        let glyph = |u: u32| font.get_nominal_glyph(u).map(|g| g.to_u32());

        let mut singles = Vec::new();
        for (form, &feature) in FALLBACK_FEATURES.iter().enumerate() {
            let mask = plan.ot_map.get_1_mask(feature);
            if mask == 0 {
                continue;
            }

            let mut pairs: Vec<(u32, u32)> = (SHAPING_TABLE_FIRST..=SHAPING_TABLE_LAST)
                .filter_map(|u| {
                    let s = SHAPING_TABLE[(u - SHAPING_TABLE_FIRST) as usize][form];
                    if s == 0 {
                        return None;
                    }
                    let (u_glyph, s_glyph) = (glyph(u)?, glyph(u32::from(s))?);
                    (u_glyph != s_glyph).then_some((u_glyph, s_glyph))
                })
                .collect();

            if pairs.is_empty() {
                continue;
            }

            pairs.sort_by_key(|&(g, _)| g);
            pairs.dedup_by_key(|&mut (g, _)| g);
            singles.push((mask, pairs));
        }

        let rlig_mask = plan.ot_map.get_1_mask(hb_tag_t::new(b"rlig"));
        let ligatures = if rlig_mask != 0 {
            LIGATURE_TABLE
                .iter()
                .filter_map(|&(first, second, ligature)| {
                    Some((
                        glyph(u32::from(first))?,
                        glyph(u32::from(second))?,
                        glyph(u32::from(ligature))?,
                    ))
                })
                .collect()
        } else {
            Vec::new()
        };

        arabic_fallback_plan_t {
            singles,
            rlig_mask,
            ligatures,
        }
    }

    fn is_empty(&self) -> bool {
        self.singles.is_empty() && self.ligatures.is_empty()
    }

    fn shape(&self, font: &hb_font_t, buffer: &mut hb_buffer_t) {
        let mut ctx = hb_ot_apply_context_t::new(TableIndex::GSUB, font, buffer);

        for (mask, pairs) in &self.singles {
            ctx.set_lookup_mask(*mask);
            for i in 0..ctx.buffer.len {
                let info = &ctx.buffer.info[i];
                if info.mask & mask == 0 || info.is_mark() {
                    continue;
                }
                if let Ok(k) = pairs.binary_search_by_key(&info.glyph_id, |&(g, _)| g) {
                    ctx.buffer.idx = i;
                    ctx.replace_glyph_inplace(GlyphId::new(pairs[k].1));
                }
            }
        }

        if self.ligatures.is_empty() {
            return;
        }

        // Lam-alef ligatures match across marks, like a lookup flagged
        // IgnoreMarks.
        ctx.set_lookup_mask(self.rlig_mask);
        ctx.lookup_props = u32::from(lookup_flags::IGNORE_MARKS);
        ctx.buffer.clear_output();
        ctx.buffer.idx = 0;
        while ctx.buffer.idx < ctx.buffer.len && ctx.buffer.successful {
            if !self.ligate_at(&mut ctx) {
                ctx.buffer.next_glyph();
            }
        }
        ctx.buffer.sync();
    }

    fn ligate_at(&self, ctx: &mut hb_ot_apply_context_t) -> bool {
        let cur = *ctx.buffer.cur(0);
        if cur.mask & self.rlig_mask == 0 || cur.is_mark() {
            return false;
        }

        for &(first, second, lig) in &self.ligatures {
            if first != cur.glyph_id {
                continue;
            }

            let match_second = |info: &GlyphInfo, _: u16| info.glyph_id == second;
            let mut match_end = 0;
            let mut total_component_count = 0;
            if match_input(
                ctx,
                1,
                &match_second,
                &mut match_end,
                Some(&mut total_component_count),
            ) {
                ligate_input(ctx, 2, match_end, total_component_count, GlyphId::new(lig));
                return true;
            }
        }

        false
    }
}

fn arabic_fallback_shape(
    plan: &hb_ot_shape_plan_t,
    font: &hb_font_t,
    buffer: &mut hb_buffer_t,
) -> bool {
    let Some(arabic_plan) = plan.data::<arabic_shape_plan_t>() else {
        return false;
    };

    if !arabic_plan.do_fallback {
        return false;
    }

    let fallback_plan = arabic_fallback_plan_t::new(plan, font);
    if fallback_plan.is_empty() {
        return false;
    }

    trace!("arabic: applying presentation form fallback");
    fallback_plan.shape(font, buffer);
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn joining_actions(text: &[u32]) -> Vec<u8> {
        let mut buffer = hb_buffer_t::new();
        for (i, &u) in text.iter().enumerate() {
            buffer.add(u, i as u32);
        }
        let mut scratch = buffer.scratch_flags;
        let len = buffer.len;
        for info in &mut buffer.info[..len] {
            info.init_unicode_props(&mut scratch);
        }
        arabic_joining(&mut buffer);
        buffer.info[..buffer.len].iter().map(|i| i.arabic_shaping_action()).collect()
    }

    #[test]
    fn beh_beh_beh_joins_through() {
        assert_eq!(
            joining_actions(&[0x0628, 0x0628, 0x0628]),
            vec![action::INIT, action::MEDI, action::FINA]
        );
    }

    #[test]
    fn alef_does_not_join_left() {
        // alef is right-joining, so the following beh starts a new word form
        assert_eq!(
            joining_actions(&[0x0628, 0x0627, 0x0628]),
            vec![action::INIT, action::FINA, action::ISOL]
        );
    }

    #[test]
    fn marks_are_transparent() {
        assert_eq!(
            joining_actions(&[0x0628, 0x064E, 0x0628]),
            vec![action::INIT, action::NONE, action::FINA]
        );
    }

    #[test]
    fn zwnj_breaks_joining() {
        assert_eq!(
            joining_actions(&[0x0628, 0x200C, 0x0628]),
            vec![action::ISOL, action::NONE, action::ISOL]
        );
    }

    #[test]
    fn syriac_feature_tags() {
        assert!(feature_is_syriac(hb_tag_t::new(b"fin2")));
        assert!(!feature_is_syriac(hb_tag_t::new(b"fina")));
    }

    #[test]
    fn shaping_table_covers_lam() {
        let lam = SHAPING_TABLE[(0x0644 - SHAPING_TABLE_FIRST) as usize];
        assert_eq!(lam, [0xFEDD, 0xFEDE, 0xFEDF, 0xFEE0]);
    }
}
