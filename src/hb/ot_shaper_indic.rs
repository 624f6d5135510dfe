use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::Any;
use core::cmp;

use read_fonts::types::GlyphId;

use super::algs::*;
use super::buffer::*;
use super::common::{hb_codepoint_t, script, Script};
use super::ot_layout::TableIndex;
use super::ot_layout_gsubgpos::WouldApplyContext;
use super::ot_map::*;
use super::ot_shape::hb_ot_shape_planner_t;
use super::ot_shape_normalize::*;
use super::ot_shape_plan::hb_ot_shape_plan_t;
use super::ot_shaper::*;
use super::ot_shaper_indic_machine::{find_syllables_indic, SyllableType};
use super::ot_shaper_indic_table::table_lookup;
use super::ot_shaper_syllabic::{insert_dotted_circles, DottedCircle};
use super::ot_shaper_vowel_constraints::preprocess_text_vowel_constraints;
use super::unicode::{self, CharExt, GeneralCategory};
use super::{hb_font_t, hb_mask_t, hb_tag_t};

pub static INDIC_SHAPER: hb_ot_shaper_t = hb_ot_shaper_t {
    name: "indic",
    collect_features: Some(collect_features),
    override_features: Some(override_features),
    create_data: Some(data_create_indic),
    preprocess_text: Some(preprocess_text),
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

pub type Category = u8;

/// Syllable categories shared by the Indic, Khmer and Myanmar shapers.
///
/// The values are part of the syllable grammars; the Khmer and Myanmar
/// machines reuse the Indic numbering and add their own categories.
#[allow(dead_code)]
pub mod ot_category_t {
    pub const OT_X: u8 = 0;
    pub const OT_C: u8 = 1;
    pub const OT_V: u8 = 2;
    pub const OT_N: u8 = 3;
    pub const OT_H: u8 = 4;
    pub const OT_ZWNJ: u8 = 5;
    pub const OT_ZWJ: u8 = 6;
    pub const OT_M: u8 = 7;
    pub const OT_SM: u8 = 8;
    pub const OT_A: u8 = 9;
    pub const OT_VD: u8 = OT_A;
    pub const OT_PLACEHOLDER: u8 = 10;
    pub const OT_GB: u8 = OT_PLACEHOLDER;
    pub const OT_DOTTEDCIRCLE: u8 = 11;
    /// Register shifter.
    pub const OT_RS: u8 = 12;
    /// Atomically encoded repha.
    pub const OT_Repha: u8 = 14;
    pub const OT_Ra: u8 = 15;
    /// Consonant medial.
    pub const OT_CM: u8 = 16;
    /// Avagraha and friends, which take marks.
    pub const OT_Symbol: u8 = 17;
    /// Consonant with stacker.
    pub const OT_CS: u8 = 18;

    pub const OT_VAbv: u8 = 20;
    pub const OT_VBlw: u8 = 21;
    pub const OT_VPre: u8 = 22;
    pub const OT_VPst: u8 = 23;

    // Khmer.
    pub const OT_Robatic: u8 = 25;
    pub const OT_Xgroup: u8 = 26;
    pub const OT_Ygroup: u8 = 27;

    // Myanmar.
    pub const OT_As: u8 = 32;
    pub const OT_MH: u8 = 35;
    pub const OT_MR: u8 = 36;
    pub const OT_MW: u8 = 37;
    pub const OT_MY: u8 = 38;
    pub const OT_PT: u8 = 39;
    pub const OT_VS: u8 = 40;
    pub const OT_ML: u8 = 41;
    /// Independent vowel; only the Myanmar grammar tells it from `OT_V`.
    pub const OT_IV: u8 = OT_V;
    /// Dot below.
    pub const OT_DB: u8 = OT_N;
}

pub type Position = u8;

/// Where a character ends up relative to the base consonant. Reordering
/// sorts a syllable by these.
#[allow(dead_code)]
pub mod ot_position_t {
    pub const POS_START: u8 = 0;

    pub const POS_RA_TO_BECOME_REPH: u8 = 1;
    pub const POS_PRE_M: u8 = 2;
    pub const POS_PRE_C: u8 = 3;

    pub const POS_BASE_C: u8 = 4;
    pub const POS_AFTER_MAIN: u8 = 5;

    pub const POS_ABOVE_C: u8 = 6;

    pub const POS_BEFORE_SUB: u8 = 7;
    pub const POS_BELOW_C: u8 = 8;
    pub const POS_AFTER_SUB: u8 = 9;

    pub const POS_BEFORE_POST: u8 = 10;
    pub const POS_POST_C: u8 = 11;
    pub const POS_AFTER_POST: u8 = 12;

    pub const POS_SMVD: u8 = 13;

    pub const POS_END: u8 = 14;
}

use ot_category_t::*;
use ot_position_t::*;

const INDIC_FEATURES: &[(hb_tag_t, hb_ot_map_feature_flags_t)] = &[
    // Basic features, applied one at a time after initial reordering.
    (hb_tag_t::new(b"nukt"), F_GLOBAL_MANUAL_JOINERS.union(F_PER_SYLLABLE)),
    (hb_tag_t::new(b"akhn"), F_GLOBAL_MANUAL_JOINERS.union(F_PER_SYLLABLE)),
    (hb_tag_t::new(b"rphf"), F_MANUAL_JOINERS.union(F_PER_SYLLABLE)),
    (hb_tag_t::new(b"rkrf"), F_GLOBAL_MANUAL_JOINERS.union(F_PER_SYLLABLE)),
    (hb_tag_t::new(b"pref"), F_MANUAL_JOINERS.union(F_PER_SYLLABLE)),
    (hb_tag_t::new(b"blwf"), F_MANUAL_JOINERS.union(F_PER_SYLLABLE)),
    (hb_tag_t::new(b"abvf"), F_MANUAL_JOINERS.union(F_PER_SYLLABLE)),
    (hb_tag_t::new(b"half"), F_MANUAL_JOINERS.union(F_PER_SYLLABLE)),
    (hb_tag_t::new(b"pstf"), F_MANUAL_JOINERS.union(F_PER_SYLLABLE)),
    (hb_tag_t::new(b"vatu"), F_GLOBAL_MANUAL_JOINERS.union(F_PER_SYLLABLE)),
    (hb_tag_t::new(b"cjct"), F_GLOBAL_MANUAL_JOINERS.union(F_PER_SYLLABLE)),
    // Other features, applied together after final reordering.
    (hb_tag_t::new(b"init"), F_MANUAL_JOINERS.union(F_PER_SYLLABLE)),
    (hb_tag_t::new(b"pres"), F_GLOBAL_MANUAL_JOINERS.union(F_PER_SYLLABLE)),
    (hb_tag_t::new(b"abvs"), F_GLOBAL_MANUAL_JOINERS.union(F_PER_SYLLABLE)),
    (hb_tag_t::new(b"blws"), F_GLOBAL_MANUAL_JOINERS.union(F_PER_SYLLABLE)),
    (hb_tag_t::new(b"psts"), F_GLOBAL_MANUAL_JOINERS.union(F_PER_SYLLABLE)),
    (hb_tag_t::new(b"haln"), F_GLOBAL_MANUAL_JOINERS.union(F_PER_SYLLABLE)),
];

const INDIC_BASIC_FEATURES: usize = 11;

// Indices into INDIC_FEATURES.
mod indic_feature {
    pub const RPHF: usize = 2;
    pub const PREF: usize = 4;
    pub const BLWF: usize = 5;
    pub const ABVF: usize = 6;
    pub const HALF: usize = 7;
    pub const PSTF: usize = 8;
    pub const INIT: usize = 11;
}

pub(crate) const fn category_flag(c: Category) -> u64 {
    rb_flag64(c as u32)
}

// Vowels and placeholders are treated as consonants. Vowels never occur in
// consonant syllables, so the consonant logic also serves vowel syllables.
const CONSONANT_FLAGS: u64 = category_flag(OT_C)
    | category_flag(OT_CS)
    | category_flag(OT_Ra)
    | category_flag(OT_CM)
    | category_flag(OT_V)
    | category_flag(OT_PLACEHOLDER)
    | category_flag(OT_DOTTEDCIRCLE);

const JOINER_FLAGS: u64 = category_flag(OT_ZWJ) | category_flag(OT_ZWNJ);

#[derive(Clone, Copy, PartialEq)]
enum RephPosition {
    AfterMain,
    BeforeSub,
    AfterSub,
    BeforePost,
    AfterPost,
}

#[derive(Clone, Copy, PartialEq)]
enum RephMode {
    /// Reph formed out of an initial Ra,H sequence.
    Implicit,
    /// Reph formed out of an initial Ra,H,ZWJ sequence.
    Explicit,
    /// Encoded repha character that needs reordering.
    LogRepha,
}

#[derive(Clone, Copy, PartialEq)]
enum BlwfMode {
    /// Below-forms apply to pre-base and post-base consonants.
    PreAndPost,
    /// Below-forms apply to post-base consonants only.
    PostOnly,
}

#[derive(Clone, Copy)]
struct IndicConfig {
    script: Option<Script>,
    has_old_spec: bool,
    virama: u32,
    reph_pos: RephPosition,
    reph_mode: RephMode,
    blwf_mode: BlwfMode,
}

impl IndicConfig {
    const fn new(
        script: Option<Script>,
        has_old_spec: bool,
        virama: u32,
        reph_pos: RephPosition,
        reph_mode: RephMode,
        blwf_mode: BlwfMode,
    ) -> Self {
        IndicConfig {
            script,
            has_old_spec,
            virama,
            reph_pos,
            reph_mode,
            blwf_mode,
        }
    }
}

#[rustfmt::skip]
const INDIC_CONFIGS: &[IndicConfig] = &[
    IndicConfig::new(None, false, 0, RephPosition::BeforePost, RephMode::Implicit, BlwfMode::PreAndPost),
    IndicConfig::new(Some(script::DEVANAGARI), true, 0x094D, RephPosition::BeforePost, RephMode::Implicit, BlwfMode::PreAndPost),
    IndicConfig::new(Some(script::BENGALI), true, 0x09CD, RephPosition::AfterSub, RephMode::Implicit, BlwfMode::PreAndPost),
    IndicConfig::new(Some(script::GURMUKHI), true, 0x0A4D, RephPosition::BeforeSub, RephMode::Implicit, BlwfMode::PreAndPost),
    IndicConfig::new(Some(script::GUJARATI), true, 0x0ACD, RephPosition::BeforePost, RephMode::Implicit, BlwfMode::PreAndPost),
    IndicConfig::new(Some(script::ORIYA), true, 0x0B4D, RephPosition::AfterMain, RephMode::Implicit, BlwfMode::PreAndPost),
    IndicConfig::new(Some(script::TAMIL), true, 0x0BCD, RephPosition::AfterPost, RephMode::Implicit, BlwfMode::PreAndPost),
    IndicConfig::new(Some(script::TELUGU), true, 0x0C4D, RephPosition::AfterPost, RephMode::Explicit, BlwfMode::PostOnly),
    IndicConfig::new(Some(script::KANNADA), true, 0x0CCD, RephPosition::AfterPost, RephMode::Implicit, BlwfMode::PostOnly),
    IndicConfig::new(Some(script::MALAYALAM), true, 0x0D4D, RephPosition::AfterMain, RephMode::LogRepha, BlwfMode::PreAndPost),
    IndicConfig::new(Some(script::SINHALA), false, 0x0DCA, RephPosition::AfterPost, RephMode::Explicit, BlwfMode::PreAndPost),
];

/// The GSUB lookups of one feature, for asking whether they would
/// substitute a glyph sequence.
struct IndicWouldSubstituteFeature {
    lookups: Vec<u16>,
    zero_context: bool,
}

impl IndicWouldSubstituteFeature {
    fn new(map: &hb_ot_map_t, feature_tag: hb_tag_t, zero_context: bool) -> Self {
        let lookups = map
            .get_feature_stage(TableIndex::GSUB, feature_tag)
            .map(|stage| {
                map.stage_lookups(TableIndex::GSUB, stage)
                    .iter()
                    .map(|lookup| lookup.index)
                    .collect()
            })
            .unwrap_or_default();
        IndicWouldSubstituteFeature {
            lookups,
            zero_context,
        }
    }

    fn would_substitute(&self, font: &hb_font_t, glyphs: &[GlyphId]) -> bool {
        let ctx = WouldApplyContext {
            glyphs,
            zero_context: self.zero_context,
        };
        self.lookups.iter().any(|&index| {
            font.ot_tables
                .lookup(TableIndex::GSUB, index)
                .is_some_and(|lookup| lookup.would_apply(&ctx))
        })
    }
}

struct indic_shape_plan_t {
    config: IndicConfig,
    is_old_spec: bool,
    rphf: IndicWouldSubstituteFeature,
    pref: IndicWouldSubstituteFeature,
    blwf: IndicWouldSubstituteFeature,
    pstf: IndicWouldSubstituteFeature,
    vatu: IndicWouldSubstituteFeature,
    mask_array: [hb_mask_t; INDIC_FEATURES.len()],
}

impl indic_shape_plan_t {
    fn new(plan: &hb_ot_shape_plan_t) -> Self {
        let config = INDIC_CONFIGS[1..]
            .iter()
            .find(|c| c.script == plan.script)
            .copied()
            .unwrap_or(INDIC_CONFIGS[0]);

        // Old-spec script tags are the ones not ending in '2'.
        let is_old_spec = config.has_old_spec
            && plan
                .ot_map
                .chosen_script(TableIndex::GSUB)
                .map_or(true, |tag| tag.to_be_bytes()[3] != b'2');

        // Zero-context matching for new-spec and single-spec scripts, but
        // Malayalam allows context in both specs.
        let zero_context = is_old_spec && plan.script != Some(script::MALAYALAM);

        let mut mask_array = [0; INDIC_FEATURES.len()];
        for (mask, &(tag, flags)) in mask_array.iter_mut().zip(INDIC_FEATURES) {
            *mask = if flags.contains(F_GLOBAL) {
                0
            } else {
                plan.ot_map.get_1_mask(tag)
            };
        }

        let feature = |tag: &[u8; 4]| {
            IndicWouldSubstituteFeature::new(&plan.ot_map, hb_tag_t::new(tag), zero_context)
        };

        indic_shape_plan_t {
            config,
            is_old_spec,
            rphf: feature(b"rphf"),
            pref: feature(b"pref"),
            blwf: feature(b"blwf"),
            pstf: feature(b"pstf"),
            vatu: feature(b"vatu"),
            mask_array,
        }
    }
}

fn data_create_indic(plan: &hb_ot_shape_plan_t) -> Box<dyn Any + Send + Sync> {
    Box::new(indic_shape_plan_t::new(plan))
}

impl GlyphInfo {
    pub(crate) fn indic_category(&self) -> Category {
        self.ot_shaper_var_u8_category()
    }

    pub(crate) fn set_indic_category(&mut self, c: Category) {
        self.set_ot_shaper_var_u8_category(c)
    }

    pub(crate) fn indic_position(&self) -> Position {
        self.ot_shaper_var_u8_auxiliary()
    }

    pub(crate) fn set_indic_position(&mut self, c: Position) {
        self.set_ot_shaper_var_u8_auxiliary(c)
    }

    pub(crate) fn is_one_of(&self, flags: u64) -> bool {
        // If it ligated, all bets are off.
        if self.ligated() {
            return false;
        }
        rb_flag64_unsafe(u32::from(self.indic_category())) & flags != 0
    }

    pub(crate) fn is_indic_joiner(&self) -> bool {
        self.is_one_of(JOINER_FLAGS)
    }

    fn is_consonant(&self) -> bool {
        self.is_one_of(CONSONANT_FLAGS)
    }

    pub(crate) fn is_halant(&self) -> bool {
        self.is_one_of(category_flag(OT_H))
    }

    fn set_indic_properties(&mut self) {
        let (cat, pos) = get_categories(self.glyph_id);
        self.set_indic_category(cat);
        self.set_indic_position(pos);
    }
}

fn is_ra(u: hb_codepoint_t) -> bool {
    matches!(
        u,
        0x0930 | 0x09B0 | 0x09F0 | 0x0A30 | 0x0AB0 | 0x0B30 | 0x0BB0 | 0x0C30 | 0x0CB0 | 0x0D30
            | 0x0DBB
    )
}

/// Which script block of the nine major scripts `u` is in, as an index
/// into the matra position tables below.
fn block(u: hb_codepoint_t) -> Option<usize> {
    match u & !0x7F {
        0x0900 => Some(0),
        0x0980 => Some(1),
        0x0A00 => Some(2),
        0x0A80 => Some(3),
        0x0B00 => Some(4),
        0x0B80 => Some(5),
        0x0C00 => Some(6),
        0x0C80 => Some(7),
        0x0D00 => Some(8),
        0x0D80 => Some(9),
        _ => None,
    }
}

fn matra_position_indic(u: hb_codepoint_t, side: Position) -> Position {
    let block = block(u);
    match side {
        POS_PRE_C => POS_PRE_M,
        POS_POST_C => match block {
            Some(0) => POS_AFTER_SUB,
            Some(1..=5) | Some(8) => POS_AFTER_POST,
            Some(6) if u <= 0x0C42 => POS_BEFORE_SUB,
            Some(7) if !(0x0CC3..=0x0CD6).contains(&u) => POS_BEFORE_SUB,
            _ => POS_AFTER_SUB,
        },
        POS_ABOVE_C => match block {
            Some(2) => POS_AFTER_POST,
            Some(4) => POS_AFTER_MAIN,
            Some(6) | Some(7) => POS_BEFORE_SUB,
            _ => POS_AFTER_SUB,
        },
        POS_BELOW_C => match block {
            Some(2) | Some(3) | Some(5) | Some(8) => POS_AFTER_POST,
            Some(6) | Some(7) => POS_BEFORE_SUB,
            _ => POS_AFTER_SUB,
        },
        _ => side,
    }
}

/// Category and position of a character for the Indic shaper.
pub(crate) fn get_categories(u: hb_codepoint_t) -> (Category, Position) {
    let (mut cat, mut pos) = table_lookup(u);

    match u {
        0x0953..=0x0954 => cat = OT_SM,
        0x0A72..=0x0A73 | 0x1CF5..=0x1CF6 => cat = OT_C,
        0x1CE2..=0x1CE8 | 0x1CED => cat = OT_A,
        0xA8F2..=0xA8F7 | 0x1CE9..=0x1CEC | 0x1CEE..=0x1CF1 => cat = OT_Symbol,
        0x0A51 => {
            cat = OT_M;
            pos = POS_BELOW_C;
        }
        0x11301 | 0x11303 => cat = OT_SM,
        0x1133B | 0x1133C | 0x0AFB | 0x0B55 => cat = OT_N,
        0x0980 | 0x09FC | 0x0C80 | 0x2010..=0x2011 => cat = OT_PLACEHOLDER,
        0x25CC => cat = OT_DOTTEDCIRCLE,
        _ => {}
    }

    if category_flag(cat) & CONSONANT_FLAGS != 0 {
        pos = POS_BASE_C;
        if cat == OT_C && is_ra(u) {
            cat = OT_Ra;
        }
    } else if cat == OT_M {
        pos = matra_position_indic(u, pos);
    } else if category_flag(cat) & (category_flag(OT_SM) | category_flag(OT_A) | category_flag(OT_Symbol))
        != 0
    {
        pos = POS_SMVD;
    }

    // Oriya bindu is a before-sub mark.
    if u == 0x0B01 {
        pos = POS_BEFORE_SUB;
    }

    (cat, pos)
}

fn collect_features(planner: &mut hb_ot_shape_planner_t) {
    // Do this before any lookups have been applied.
    planner.ot_map.add_gsub_pause(Some(setup_syllables));

    planner
        .ot_map
        .enable_feature(hb_tag_t::new(b"locl"), F_PER_SYLLABLE, 1);
    // Not required for Indic, but fonts that use it expect it early.
    planner
        .ot_map
        .enable_feature(hb_tag_t::new(b"ccmp"), F_PER_SYLLABLE, 1);

    planner.ot_map.add_gsub_pause(Some(initial_reordering));

    for &(tag, flags) in &INDIC_FEATURES[..INDIC_BASIC_FEATURES] {
        planner.ot_map.add_feature(tag, flags, 1);
        planner.ot_map.add_gsub_pause(None);
    }

    planner.ot_map.add_gsub_pause(Some(final_reordering));

    for &(tag, flags) in &INDIC_FEATURES[INDIC_BASIC_FEATURES..] {
        planner.ot_map.add_feature(tag, flags, 1);
    }
}

fn override_features(planner: &mut hb_ot_shape_planner_t) {
    planner.ot_map.disable_feature(hb_tag_t::new(b"liga"));
    planner.ot_map.add_gsub_pause(None);
}

fn preprocess_text(_: &hb_ot_shape_plan_t, _: &hb_font_t, buffer: &mut hb_buffer_t) {
    preprocess_text_vowel_constraints(buffer);
}

fn decompose(
    ctx: &hb_ot_shape_normalize_context_t,
    ab: hb_codepoint_t,
) -> Option<(hb_codepoint_t, hb_codepoint_t)> {
    match ab {
        // DEVANAGARI LETTER RRA, BENGALI LETTER RRA and RHA, TAMIL LETTER AU
        0x0931 | 0x09DC | 0x09DD | 0x0B94 => return None,
        // Sinhala split vowels decompose into the kombuva and the vowel
        // itself when the font forms the second part with 'pstf'.
        0x0DDA | 0x0DDC..=0x0DDE => {
            let indic_plan = ctx.plan.data::<indic_shape_plan_t>();
            let glyph = ctx.font.get_nominal_glyph(ab);
            if let (Some(indic_plan), Some(glyph)) = (indic_plan, glyph) {
                if indic_plan.pstf.would_substitute(ctx.font, &[glyph]) {
                    return Some((0x0DD9, ab));
                }
            }
        }
        _ => {}
    }

    unicode::decompose(ab)
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

    // Composition exclusion that should still recompose.
    if a == 0x09AF && b == 0x09BC {
        return Some(0x09DF);
    }

    unicode::compose(a, b)
}

fn setup_masks(_: &hb_ot_shape_plan_t, _: &hb_font_t, buffer: &mut hb_buffer_t) {
    buffer.allocate_var(GlyphInfo::OT_SHAPER_VAR_U8_CATEGORY_VAR);
    buffer.allocate_var(GlyphInfo::OT_SHAPER_VAR_U8_AUXILIARY_VAR);

    // Masks are set up later, during reordering. Only save the properties
    // here.
    for info in buffer.info_slice_mut() {
        info.set_indic_properties();
    }
}

fn setup_syllables(_: &hb_ot_shape_plan_t, _: &hb_font_t, buffer: &mut hb_buffer_t) -> bool {
    buffer.allocate_var(GlyphInfo::SYLLABLE_VAR);
    find_syllables_indic(buffer);
    foreach_syllable!(buffer, start, end, {
        buffer.unsafe_to_break(Some(start), Some(end));
    });
    false
}

fn initial_reordering(plan: &hb_ot_shape_plan_t, font: &hb_font_t, buffer: &mut hb_buffer_t) -> bool {
    let Some(indic_plan) = plan.data::<indic_shape_plan_t>() else {
        return false;
    };

    update_consonant_positions(indic_plan, font, buffer);
    let ret = insert_dotted_circles(
        font,
        buffer,
        &DottedCircle {
            broken_syllable_type: SyllableType::BrokenCluster as u8,
            category: OT_DOTTEDCIRCLE,
            repha_category: Some(OT_Repha),
            position: Some(POS_END),
        },
    );

    foreach_syllable!(buffer, start, end, {
        initial_reordering_syllable(indic_plan, font, start, end, buffer);
    });

    ret
}

fn update_consonant_positions(
    indic_plan: &indic_shape_plan_t,
    font: &hb_font_t,
    buffer: &mut hb_buffer_t,
) {
    if indic_plan.config.virama == 0 {
        return;
    }

    let Some(virama) = font.get_nominal_glyph(indic_plan.config.virama) else {
        return;
    };

    for info in buffer.info_slice_mut() {
        if info.indic_position() == POS_BASE_C {
            let consonant = info.as_glyph();
            info.set_indic_position(consonant_position_from_font(
                indic_plan, font, consonant, virama,
            ));
        }
    }
}

fn consonant_position_from_font(
    indic_plan: &indic_shape_plan_t,
    font: &hb_font_t,
    consonant: GlyphId,
    virama: GlyphId,
) -> Position {
    // Old-spec fonts order Consonant,Virama and new-spec ones Virama,
    // Consonant, but some fonts copied old-spec lookups into new-spec
    // tables. Match both orders.
    let either = |feature: &IndicWouldSubstituteFeature| {
        feature.would_substitute(font, &[virama, consonant])
            || feature.would_substitute(font, &[consonant, virama])
    };

    if either(&indic_plan.blwf) || either(&indic_plan.vatu) {
        return POS_BELOW_C;
    }

    if either(&indic_plan.pstf) || either(&indic_plan.pref) {
        return POS_POST_C;
    }

    POS_BASE_C
}

fn initial_reordering_syllable(
    indic_plan: &indic_shape_plan_t,
    font: &hb_font_t,
    start: usize,
    end: usize,
    buffer: &mut hb_buffer_t,
) {
    let syllable_type = buffer.info[start].syllable() & 0x0F;

    // Vowels look like consonants and dotted circles are in place by now,
    // so all of these go through the consonant logic.
    if syllable_type == SyllableType::ConsonantSyllable as u8
        || syllable_type == SyllableType::VowelSyllable as u8
        || syllable_type == SyllableType::StandaloneCluster as u8
        || syllable_type == SyllableType::BrokenCluster as u8
    {
        initial_reordering_consonant_syllable(indic_plan, font, start, end, buffer);
    }
}

fn initial_reordering_consonant_syllable(
    indic_plan: &indic_shape_plan_t,
    font: &hb_font_t,
    start: usize,
    end: usize,
    buffer: &mut hb_buffer_t,
) {
    // Legacy Kannada: Ra,H,ZWJ behaves like Ra,ZWJ,H.
    if buffer.script == Some(script::KANNADA)
        && start + 3 <= end
        && buffer.info[start].is_one_of(category_flag(OT_Ra))
        && buffer.info[start + 1].is_one_of(category_flag(OT_H))
        && buffer.info[start + 2].is_one_of(category_flag(OT_ZWJ))
    {
        buffer.merge_clusters(start + 1, start + 3);
        buffer.info.swap(start + 1, start + 2);
    }

    // 1. Find the base consonant: walking back from the end, the first
    // consonant without a below-base or post-base form, or the first
    // consonant of the syllable. An initial Ra,H that forms a reph is not a
    // candidate when there are other consonants.
    let mut base = end;
    let mut has_reph = false;

    {
        let mut limit = start;
        let reph_mode = indic_plan.config.reph_mode;
        if indic_plan.mask_array[indic_feature::RPHF] != 0
            && start + 3 <= end
            && ((reph_mode == RephMode::Implicit && !buffer.info[start + 2].is_indic_joiner())
                || (reph_mode == RephMode::Explicit
                    && buffer.info[start + 2].indic_category() == OT_ZWJ))
        {
            let glyphs = [
                buffer.info[start].as_glyph(),
                buffer.info[start + 1].as_glyph(),
                buffer.info[start + 2].as_glyph(),
            ];
            if indic_plan.rphf.would_substitute(font, &glyphs[..2])
                || (reph_mode == RephMode::Explicit
                    && indic_plan.rphf.would_substitute(font, &glyphs))
            {
                limit += 2;
                while limit < end && buffer.info[limit].is_indic_joiner() {
                    limit += 1;
                }
                base = start;
                has_reph = true;
            }
        } else if reph_mode == RephMode::LogRepha
            && buffer.info[start].indic_category() == OT_Repha
        {
            limit += 1;
            while limit < end && buffer.info[limit].is_indic_joiner() {
                limit += 1;
            }
            base = start;
            has_reph = true;
        }

        let mut i = end;
        let mut seen_below = false;
        loop {
            i -= 1;
            if buffer.info[i].is_consonant() {
                let pos = buffer.info[i].indic_position();
                if pos != POS_BELOW_C && (pos != POS_POST_C || seen_below) {
                    base = i;
                    break;
                }
                if pos == POS_BELOW_C {
                    seen_below = true;
                }

                // Pre-base-reordering Ra is marked POS_POST_C and skipped
                // above.
                base = i;
            } else if start < i
                && buffer.info[i].indic_category() == OT_ZWJ
                && buffer.info[i - 1].indic_category() == OT_H
            {
                // A ZWJ after a halant asks for an explicit half form and
                // stops the search. Before a halant it asks for a subjoined
                // form, so the search goes on.
                break;
            }

            if i <= limit {
                break;
            }
        }

        // Without another consonant no reph forms and Ra is the base.
        if has_reph && base == start && limit - base <= 2 {
            has_reph = false;
        }
    }

    // 2. and 3. Matras are already decomposed and marks canonically
    // ordered by normalization.

    for i in start..base {
        let pos = buffer.info[i].indic_position();
        buffer.info[i].set_indic_position(cmp::min(POS_PRE_C, pos));
    }

    if base < end {
        buffer.info[base].set_indic_position(POS_BASE_C);
    }

    if has_reph {
        buffer.info[start].set_indic_position(POS_RA_TO_BECOME_REPH);
    }

    // Old-spec: move the first post-base halant after the last consonant.
    // Kannada only does this without a halant there already.
    if indic_plan.is_old_spec {
        let disallow_double_halants = buffer.script == Some(script::KANNADA);
        for i in base + 1..end {
            if buffer.info[i].indic_category() == OT_H {
                let mut j = end - 1;
                while j > i {
                    if buffer.info[j].is_consonant()
                        || (disallow_double_halants && buffer.info[j].indic_category() == OT_H)
                    {
                        break;
                    }
                    j -= 1;
                }

                if buffer.info[j].indic_category() != OT_H && j > i {
                    buffer.info[i..=j].rotate_left(1);
                }

                break;
            }
        }
    }

    // Attach misc marks to the previous char so they move with it.
    {
        let mut last_pos = POS_START;
        for i in start..end {
            let attached = category_flag(buffer.info[i].indic_category())
                & (category_flag(OT_ZWJ)
                    | category_flag(OT_ZWNJ)
                    | category_flag(OT_N)
                    | category_flag(OT_RS)
                    | category_flag(OT_CM)
                    | category_flag(OT_H))
                != 0;
            if attached {
                buffer.info[i].set_indic_position(last_pos);

                // A halant does not follow a left matra.
                if buffer.info[i].indic_category() == OT_H
                    && buffer.info[i].indic_position() == POS_PRE_M
                {
                    for j in (start + 1..=i).rev() {
                        if buffer.info[j - 1].indic_position() != POS_PRE_M {
                            let pos = buffer.info[j - 1].indic_position();
                            buffer.info[i].set_indic_position(pos);
                            break;
                        }
                    }
                }
            } else if buffer.info[i].indic_position() != POS_SMVD {
                last_pos = buffer.info[i].indic_position();
            }
        }
    }

    // Post-base consonants own everything since the last consonant or
    // matra.
    {
        let mut last = base;
        for i in base + 1..end {
            if buffer.info[i].is_consonant() {
                for j in last + 1..i {
                    if buffer.info[j].indic_position() < POS_SMVD {
                        let pos = buffer.info[i].indic_position();
                        buffer.info[j].set_indic_position(pos);
                    }
                }
                last = i;
            } else if buffer.info[i].indic_category() == OT_M {
                last = i;
            }
        }
    }

    {
        // The syllable byte temporarily records each glyph's original offset.
        let syllable = buffer.info[start].syllable();
        for i in start..end {
            buffer.info[i].set_syllable((i - start) as u8);
        }

        buffer.info[start..end].sort_by_key(|info| info.indic_position());

        base = (start..end)
            .find(|&i| buffer.info[i].indic_position() == POS_BASE_C)
            .unwrap_or(end);

        // Post-base glyphs may shuffle arbitrarily. Old-spec moves halants
        // around, so merge everything after the base; otherwise merge
        // only the permutation cycles. Pre-base clusters are merged in
        // final reordering, so nothing before the base is merged here.
        if indic_plan.is_old_spec || end - start > 127 {
            buffer.merge_clusters(base, end);
        } else {
            for i in base..end {
                if buffer.info[i].syllable() != 255 {
                    let mut min = i;
                    let mut max = i;
                    let mut j = start + usize::from(buffer.info[i].syllable());
                    while j != i {
                        min = cmp::min(min, j);
                        max = cmp::max(max, j);
                        let next = start + usize::from(buffer.info[j].syllable());
                        buffer.info[j].set_syllable(255);
                        j = next;
                    }

                    buffer.merge_clusters(cmp::max(base, min), max + 1);
                }
            }
        }

        for info in &mut buffer.info[start..end] {
            info.set_syllable(syllable);
        }
    }

    // Set up masks.
    {
        for info in &mut buffer.info[start..end] {
            if info.indic_position() != POS_RA_TO_BECOME_REPH {
                break;
            }
            info.mask |= indic_plan.mask_array[indic_feature::RPHF];
        }

        let mut mask = indic_plan.mask_array[indic_feature::HALF];
        if !indic_plan.is_old_spec && indic_plan.config.blwf_mode == BlwfMode::PreAndPost {
            mask |= indic_plan.mask_array[indic_feature::BLWF];
        }
        for info in &mut buffer.info[start..base] {
            info.mask |= mask;
        }

        let mask = indic_plan.mask_array[indic_feature::BLWF]
            | indic_plan.mask_array[indic_feature::ABVF]
            | indic_plan.mask_array[indic_feature::PSTF];
        for info in &mut buffer.info[cmp::min(base + 1, end)..end] {
            info.mask |= mask;
        }
    }

    // Old-spec Devanagari eyelash Ra: 'blwf' also applies to Ra,H below
    // half forms, unless a ZWJ asks for the eyelash form.
    if indic_plan.is_old_spec && buffer.script == Some(script::DEVANAGARI) {
        for i in start..base.saturating_sub(1) {
            if buffer.info[i].indic_category() == OT_Ra
                && buffer.info[i + 1].indic_category() == OT_H
                && (i + 2 == base || buffer.info[i + 2].indic_category() != OT_ZWJ)
            {
                buffer.info[i].mask |= indic_plan.mask_array[indic_feature::BLWF];
                buffer.info[i + 1].mask |= indic_plan.mask_array[indic_feature::BLWF];
            }
        }
    }

    const PREF_LEN: usize = 2;
    if indic_plan.mask_array[indic_feature::PREF] != 0 && base + PREF_LEN < end {
        // Mark a Halant,Ra sequence for pre-base reordering.
        for i in base + 1..end - PREF_LEN + 1 {
            let glyphs = [buffer.info[i].as_glyph(), buffer.info[i + 1].as_glyph()];
            if indic_plan.pref.would_substitute(font, &glyphs) {
                buffer.info[i].mask |= indic_plan.mask_array[indic_feature::PREF];
                buffer.info[i + 1].mask |= indic_plan.mask_array[indic_feature::PREF];
                break;
            }
        }
    }

    // A ZWNJ disables 'half' back to the previous consonant. Joiners block
    // 'cjct' just by being there.
    for i in start + 1..end {
        if buffer.info[i].is_indic_joiner() {
            let non_joiner = buffer.info[i].indic_category() == OT_ZWNJ;
            let mut j = i;
            loop {
                j -= 1;

                if non_joiner {
                    buffer.info[j].mask &= !indic_plan.mask_array[indic_feature::HALF];
                }

                if j <= start || buffer.info[j].is_consonant() {
                    break;
                }
            }
        }
    }
}

fn final_reordering(plan: &hb_ot_shape_plan_t, font: &hb_font_t, buffer: &mut hb_buffer_t) -> bool {
    if buffer.is_empty() {
        return false;
    }

    if let Some(indic_plan) = plan.data::<indic_shape_plan_t>() {
        // Ligation and multiple substitution may have lost the halant
        // category of a virama glyph; recover it.
        let virama_glyph = (indic_plan.config.virama != 0)
            .then(|| font.get_nominal_glyph(indic_plan.config.virama))
            .flatten()
            .map(|g| g.to_u32());

        foreach_syllable!(buffer, start, end, {
            final_reordering_syllable(indic_plan, virama_glyph, start, end, buffer);
        });
    }

    buffer.deallocate_var(GlyphInfo::OT_SHAPER_VAR_U8_CATEGORY_VAR);
    buffer.deallocate_var(GlyphInfo::OT_SHAPER_VAR_U8_AUXILIARY_VAR);
    false
}

fn final_reordering_syllable(
    indic_plan: &indic_shape_plan_t,
    virama_glyph: Option<u32>,
    start: usize,
    end: usize,
    buffer: &mut hb_buffer_t,
) {
    if let Some(virama_glyph) = virama_glyph {
        for info in &mut buffer.info[start..end] {
            if info.glyph_id == virama_glyph && info.ligated() && info.multiplied() {
                info.set_indic_category(OT_H);
                info.clear_ligated_and_multiplied();
            }
        }
    }

    // 4. Final reordering, after the basic shaping features.
    let pref_mask = indic_plan.mask_array[indic_feature::PREF];
    let mut try_pref = pref_mask != 0;

    let mut base = start;
    while base < end {
        if buffer.info[base].indic_position() >= POS_BASE_C {
            if try_pref && base + 1 < end {
                for i in base + 1..end {
                    if buffer.info[i].mask & pref_mask != 0 {
                        if !(buffer.info[i].substituted()
                            && buffer.info[i].ligated_and_didnt_multiply())
                        {
                            // A 'pref' candidate that formed nothing; the
                            // base is around here.
                            base = i;
                            while base < end && buffer.info[base].is_halant() {
                                base += 1;
                            }
                            if base < end {
                                buffer.info[base].set_indic_position(POS_BASE_C);
                            }
                            try_pref = false;
                        }
                        break;
                    }
                }
            }

            // Malayalam skips over unformed below (but not post) forms.
            if buffer.script == Some(script::MALAYALAM) {
                let mut i = base + 1;
                while i < end {
                    while i < end && buffer.info[i].is_indic_joiner() {
                        i += 1;
                    }
                    if i == end || !buffer.info[i].is_halant() {
                        break;
                    }
                    i += 1;
                    while i < end && buffer.info[i].is_indic_joiner() {
                        i += 1;
                    }
                    if i < end
                        && buffer.info[i].is_consonant()
                        && buffer.info[i].indic_position() == POS_BELOW_C
                    {
                        base = i;
                        buffer.info[base].set_indic_position(POS_BASE_C);
                    }
                    i += 1;
                }
            }

            if start < base && base < end && buffer.info[base].indic_position() > POS_BASE_C {
                base -= 1;
            }
            break;
        }
        base += 1;
    }

    if base == end && start < base && buffer.info[base - 1].is_one_of(category_flag(OT_ZWJ)) {
        base -= 1;
    }

    if base < end {
        while start < base
            && buffer.info[base].is_one_of(category_flag(OT_N) | category_flag(OT_H))
        {
            base -= 1;
        }
    }

    // Reorder matras. A pre-base matra moves closer to the main consonant:
    // after the last standalone halant, unless a ZWJ follows that halant.
    if start + 1 < end && start < base {
        // If we lost track of the base, position before the last glyph.
        let mut new_pos = if base == end { base - 2 } else { base - 1 };

        // Malayalam and Tamil 'half' forms are chillus or explicit viramas;
        // matras go after them.
        if buffer.script != Some(script::MALAYALAM) && buffer.script != Some(script::TAMIL) {
            loop {
                while new_pos > start
                    && !buffer.info[new_pos]
                        .is_one_of(category_flag(OT_M) | category_flag(OT_H))
                {
                    new_pos -= 1;
                }

                // Only a halant that doesn't belong to the matra itself.
                if buffer.info[new_pos].is_halant()
                    && buffer.info[new_pos].indic_position() != POS_PRE_M
                {
                    if new_pos + 1 < end
                        && buffer.info[new_pos + 1].indic_category() == OT_ZWJ
                        && new_pos > start
                    {
                        new_pos -= 1;
                        continue;
                    }
                } else {
                    new_pos = start;
                }

                break;
            }
        }

        if start < new_pos && buffer.info[new_pos].indic_position() != POS_PRE_M {
            for i in (start + 1..=new_pos).rev() {
                if buffer.info[i - 1].indic_position() == POS_PRE_M {
                    let old_pos = i - 1;
                    if old_pos < base && base <= new_pos {
                        base -= 1;
                    }

                    buffer.info[old_pos..=new_pos].rotate_left(1);

                    // Merged after the move.
                    buffer.merge_clusters(new_pos, cmp::min(end, base + 1));

                    new_pos -= 1;
                }
            }
        } else {
            for i in start..base {
                if buffer.info[i].indic_position() == POS_PRE_M {
                    buffer.merge_clusters(i, cmp::min(end, base + 1));
                    break;
                }
            }
        }
    }

    // Reorder reph. A Ra,H reph moves only if it ligated; an encoded repha
    // moves only if it did not.
    if start + 1 < end
        && buffer.info[start].indic_position() == POS_RA_TO_BECOME_REPH
        && ((buffer.info[start].indic_category() == OT_Repha)
            ^ buffer.info[start].ligated_and_didnt_multiply())
    {
        let new_reph_pos = reph_target(indic_plan.config.reph_pos, start, end, base, buffer);

        buffer.merge_clusters(start, new_reph_pos + 1);
        buffer.info[start..=new_reph_pos].rotate_left(1);

        if start < base && base <= new_reph_pos {
            base -= 1;
        }
    }

    // Reorder a pre-base-reordering consonant, but only one 'pref' formed.
    if try_pref && base + 1 < end {
        for i in base + 1..end {
            if buffer.info[i].mask & pref_mask != 0 {
                if buffer.info[i].ligated_and_didnt_multiply() {
                    // Same target as for a pre-base matra, else right before
                    // the main consonant.
                    let mut new_pos = base;
                    if buffer.script != Some(script::MALAYALAM)
                        && buffer.script != Some(script::TAMIL)
                    {
                        while new_pos > start
                            && !buffer.info[new_pos - 1]
                                .is_one_of(category_flag(OT_M) | category_flag(OT_H))
                        {
                            new_pos -= 1;
                        }
                    }

                    if new_pos > start
                        && buffer.info[new_pos - 1].is_halant()
                        && new_pos < end
                        && buffer.info[new_pos].is_indic_joiner()
                    {
                        new_pos += 1;
                    }

                    let old_pos = i;
                    buffer.merge_clusters(new_pos, old_pos + 1);
                    buffer.info[new_pos..=old_pos].rotate_right(1);
                }
                break;
            }
        }
    }

    // Apply 'init' to a left matra at word start.
    if buffer.info[start].indic_position() == POS_PRE_M {
        let word_start = start == 0
            || rb_flag_unsafe(u32::from(buffer.info[start - 1].general_category().to_u8()))
                & rb_flag_range(
                    u32::from(GeneralCategory::FORMAT.to_u8()),
                    u32::from(GeneralCategory::NON_SPACING_MARK.to_u8()),
                )
                == 0;
        if word_start {
            buffer.info[start].mask |= indic_plan.mask_array[indic_feature::INIT];
        } else {
            buffer.unsafe_to_break(Some(start - 1), Some(start + 1));
        }
    }
}

/// Where the reph goes in final reordering, by the script's reph position.
fn reph_target(
    reph_pos: RephPosition,
    start: usize,
    end: usize,
    base: usize,
    buffer: &hb_buffer_t,
) -> usize {
    // After the first explicit halant between the reph and the main
    // consonant, or after a joiner following it.
    let after_first_halant = |buffer: &hb_buffer_t| {
        let mut pos = start + 1;
        while pos < base && !buffer.info[pos].is_halant() {
            pos += 1;
        }
        if pos < base && buffer.info[pos].is_halant() {
            if pos + 1 < base && buffer.info[pos + 1].is_indic_joiner() {
                pos += 1;
            }
            return Some(pos);
        }
        None
    };

    if reph_pos != RephPosition::AfterPost {
        if let Some(pos) = after_first_halant(buffer) {
            return pos;
        }

        if reph_pos == RephPosition::AfterMain {
            let mut pos = base;
            while pos + 1 < end && buffer.info[pos + 1].indic_position() <= POS_AFTER_MAIN {
                pos += 1;
            }
            if pos < end {
                return pos;
            }
        }

        if reph_pos == RephPosition::AfterSub {
            let mut pos = base;
            while pos + 1 < end
                && rb_flag_unsafe(u32::from(buffer.info[pos + 1].indic_position()))
                    & (rb_flag(u32::from(POS_POST_C))
                        | rb_flag(u32::from(POS_AFTER_POST))
                        | rb_flag(u32::from(POS_SMVD)))
                    == 0
            {
                pos += 1;
            }
            if pos < end {
                return pos;
            }
        }
    }

    // Before the first post-base matra or sign with a later position.
    if let Some(pos) = after_first_halant(buffer) {
        return pos;
    }

    // Otherwise at the end of the syllable, before any trailing signs.
    let mut pos = end - 1;
    while pos > start && buffer.info[pos].indic_position() == POS_SMVD {
        pos -= 1;
    }

    // A reph ending up after a Matra,Halant goes before that halant so it
    // can interact with the matra.
    if buffer.info[pos].is_halant() {
        let mut i = base + 1;
        while i < pos {
            if buffer.info[i].indic_category() == OT_M {
                pos -= 1;
            }
            i += 1;
        }
    }

    pos
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn devanagari_categories() {
        assert_eq!(get_categories(0x0915), (OT_C, POS_BASE_C));
        assert_eq!(get_categories(0x0930), (OT_Ra, POS_BASE_C));
        assert_eq!(get_categories(0x093F), (OT_M, POS_PRE_M));
        assert_eq!(get_categories(0x0940), (OT_M, POS_AFTER_SUB));
        assert_eq!(get_categories(0x0902), (OT_SM, POS_SMVD));
        assert_eq!(get_categories(0x25CC), (OT_DOTTEDCIRCLE, POS_BASE_C));
    }

    #[test]
    fn matra_positions_per_script() {
        // Bengali AA sign sits after post-base forms.
        assert_eq!(get_categories(0x09BE).1, POS_AFTER_POST);
        // Telugu vowel signs before the split point stay before subjoined.
        assert_eq!(matra_position_indic(0x0C3E, POS_POST_C), POS_BEFORE_SUB);
        assert_eq!(matra_position_indic(0x0C43, POS_POST_C), POS_AFTER_SUB);
        assert_eq!(get_categories(0x0B01).1, POS_BEFORE_SUB);
    }
}
