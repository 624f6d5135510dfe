//! Script-specific shaper hooks and their selection.

use alloc::boxed::Box;
use core::any::Any;

use super::buffer::{hb_buffer_t, GlyphInfo};
use super::common::{hb_codepoint_t, hb_tag_t, script, Direction, Script};
use super::face::hb_font_t;
use super::ot_shape::hb_ot_shape_planner_t;
use super::ot_shape_normalize::*;
use super::ot_shape_plan::hb_ot_shape_plan_t;
use super::{
    ot_shaper_arabic, ot_shaper_hangul, ot_shaper_hebrew, ot_shaper_indic, ot_shaper_khmer,
    ot_shaper_myanmar, ot_shaper_thai, ot_shaper_use,
};

impl GlyphInfo {
    // Shaper-private storage. Syllabic shapers keep the character category
    // and position here, Arabic its joining action, Hangul its jamo feature.
    declare_buffer_var!(
        u8,
        2,
        2,
        OT_SHAPER_VAR_U8_CATEGORY_VAR,
        ot_shaper_var_u8_category,
        set_ot_shaper_var_u8_category
    );
    declare_buffer_var!(
        u8,
        2,
        3,
        OT_SHAPER_VAR_U8_AUXILIARY_VAR,
        ot_shaper_var_u8_auxiliary,
        set_ot_shaper_var_u8_auxiliary
    );
}

pub type hb_ot_shape_zero_width_marks_type_t = u32;
pub const HB_OT_SHAPE_ZERO_WIDTH_MARKS_NONE: u32 = 0;
pub const HB_OT_SHAPE_ZERO_WIDTH_MARKS_BY_GDEF_EARLY: u32 = 1;
pub const HB_OT_SHAPE_ZERO_WIDTH_MARKS_BY_GDEF_LATE: u32 = 2;

/// The capabilities of one complex shaper.
///
/// Every hook is optional; `None` means the generic behavior.
pub struct hb_ot_shaper_t {
    /// Shown in diagnostics.
    pub name: &'static str,

    /// Called during plan construction to add features and pauses.
    pub collect_features: Option<fn(&mut hb_ot_shape_planner_t)>,

    /// Called after user features are added, so the shaper can force
    /// features on or off.
    pub override_features: Option<fn(&mut hb_ot_shape_planner_t)>,

    /// Builds per-plan data, available later through
    /// [`hb_ot_shape_plan_t::data`].
    pub create_data: Option<fn(&hb_ot_shape_plan_t) -> Box<dyn Any + Send + Sync>>,

    /// Called before normalization, with Unicode code points in the buffer.
    pub preprocess_text: Option<fn(&hb_ot_shape_plan_t, &hb_font_t, &mut hb_buffer_t)>,

    /// Called after positioning, with glyphs in the buffer.
    pub postprocess_glyphs: Option<fn(&hb_ot_shape_plan_t, &hb_font_t, &mut hb_buffer_t)>,

    pub normalization_preference: hb_ot_shape_normalization_mode_t,

    /// Overrides canonical decomposition during normalization.
    pub decompose: Option<fn(&hb_ot_shape_normalize_context_t, hb_codepoint_t) -> Option<(hb_codepoint_t, hb_codepoint_t)>>,

    /// Overrides canonical composition during normalization.
    pub compose: Option<fn(&hb_ot_shape_normalize_context_t, hb_codepoint_t, hb_codepoint_t) -> Option<hb_codepoint_t>>,

    /// Sets feature masks per glyph, after normalization.
    pub setup_masks: Option<fn(&hb_ot_shape_plan_t, &hb_font_t, &mut hb_buffer_t)>,

    /// Script tag GPOS must have been chosen for, or GPOS is skipped.
    pub gpos_tag: Option<hb_tag_t>,

    /// Reorders a run of marks after canonical ordering.
    pub reorder_marks: Option<fn(&hb_ot_shape_plan_t, &mut hb_buffer_t, usize, usize)>,

    pub zero_width_marks: hb_ot_shape_zero_width_marks_type_t,

    pub fallback_position: bool,
}

pub static DEFAULT_SHAPER: hb_ot_shaper_t = hb_ot_shaper_t {
    name: "default",
    collect_features: None,
    override_features: None,
    create_data: None,
    preprocess_text: None,
    postprocess_glyphs: None,
    normalization_preference: HB_OT_SHAPE_NORMALIZATION_MODE_DEFAULT,
    decompose: None,
    compose: None,
    setup_masks: None,
    gpos_tag: None,
    reorder_marks: None,
    zero_width_marks: HB_OT_SHAPE_ZERO_WIDTH_MARKS_BY_GDEF_LATE,
    fallback_position: true,
};

/// Legacy Myanmar fonts: features run in order, nothing is reordered.
pub static MYANMAR_ZAWGYI_SHAPER: hb_ot_shaper_t = hb_ot_shaper_t {
    name: "zawgyi",
    collect_features: None,
    override_features: None,
    create_data: None,
    preprocess_text: None,
    postprocess_glyphs: None,
    normalization_preference: HB_OT_SHAPE_NORMALIZATION_MODE_NONE,
    decompose: None,
    compose: None,
    setup_masks: None,
    gpos_tag: None,
    reorder_marks: None,
    zero_width_marks: HB_OT_SHAPE_ZERO_WIDTH_MARKS_NONE,
    fallback_position: false,
};

/// Picks the shaper for a script, given the script tag GSUB settled on.
pub fn hb_ot_shape_complex_categorize(
    script: Option<Script>,
    direction: Direction,
    chosen_gsub_script: Option<hb_tag_t>,
) -> &'static hb_ot_shaper_t {
    let Some(script) = script else {
        return &DEFAULT_SHAPER;
    };

    let is_fallback_script = |tag: Option<hb_tag_t>| {
        tag == Some(hb_tag_t::new(b"DFLT")) || tag == Some(hb_tag_t::new(b"latn"))
    };

    match script {
        // Unicode-1.1 additions
        script::ARABIC

        // Unicode-3.0 additions
        | script::SYRIAC => {
            // Fallback shaping still produces presentation forms for these two,
            // so they get the Arabic shaper even without a script in GSUB.
            if direction.is_horizontal() {
                &ot_shaper_arabic::ARABIC_SHAPER
            } else {
                &DEFAULT_SHAPER
            }
        }

        script::MONGOLIAN
        | script::NKO
        | script::PHAGS_PA
        | script::MANDAIC
        | script::MANICHAEAN
        | script::PSALTER_PAHLAVI
        | script::ADLAM
        | script::HANIFI_ROHINGYA
        | script::SOGDIAN => {
            if !is_fallback_script(chosen_gsub_script) && direction.is_horizontal() {
                &ot_shaper_arabic::ARABIC_SHAPER
            } else {
                &DEFAULT_SHAPER
            }
        }

        script::THAI | script::LAO => &ot_shaper_thai::THAI_SHAPER,

        script::HANGUL => &ot_shaper_hangul::HANGUL_SHAPER,

        script::HEBREW => &ot_shaper_hebrew::HEBREW_SHAPER,

        script::BENGALI
        | script::DEVANAGARI
        | script::GUJARATI
        | script::GURMUKHI
        | script::KANNADA
        | script::MALAYALAM
        | script::ORIYA
        | script::TAMIL
        | script::TELUGU
        | script::SINHALA => {
            // A font designed for 'DFLT' (or where 'latn' was picked
            // arbitrarily) gets the default shaper. The newest '*3' tags
            // follow the Universal Shaping Engine model.
            if is_fallback_script(chosen_gsub_script) {
                &DEFAULT_SHAPER
            } else if chosen_gsub_script.is_some_and(|tag| tag.to_be_bytes()[3] == b'3') {
                &ot_shaper_use::UNIVERSAL_SHAPER
            } else {
                &ot_shaper_indic::INDIC_SHAPER
            }
        }

        script::KHMER => &ot_shaper_khmer::KHMER_SHAPER,

        script::MYANMAR => {
            // 'mymr' predates the Myanmar shaping model; fonts made for it
            // expect their features applied without reordering.
            if is_fallback_script(chosen_gsub_script) {
                &DEFAULT_SHAPER
            } else if chosen_gsub_script == Some(hb_tag_t::new(b"mymr")) {
                &MYANMAR_ZAWGYI_SHAPER
            } else {
                &ot_shaper_myanmar::MYANMAR_SHAPER
            }
        }

        script::MYANMAR_ZAWGYI => &MYANMAR_ZAWGYI_SHAPER,

        script::TIBETAN

        // Unicode-3.2 additions
        | script::BUHID
        | script::HANUNOO
        | script::TAGALOG
        | script::TAGBANWA

        // Unicode-4.0 additions
        | script::LIMBU
        | script::TAI_LE

        // Unicode-4.1 additions
        | script::BUGINESE
        | script::KHAROSHTHI
        | script::SYLOTI_NAGRI
        | script::NEW_TAI_LUE

        // Unicode-5.0 additions
        | script::BALINESE

        // Unicode-5.1 additions
        | script::CHAM
        | script::KAYAH_LI
        | script::LEPCHA
        | script::REJANG
        | script::SAURASHTRA
        | script::SUNDANESE

        // Unicode-5.2 additions
        | script::JAVANESE
        | script::KAITHI
        | script::MEETEI_MAYEK
        | script::TAI_THAM
        | script::TAI_VIET

        // Unicode-6.0 additions
        | script::BATAK
        | script::BRAHMI

        // Unicode-6.1 additions
        | script::CHAKMA
        | script::SHARADA
        | script::TAKRI

        // Unicode-7.0 additions
        | script::DUPLOYAN
        | script::GRANTHA
        | script::KHOJKI
        | script::KHUDAWADI
        | script::MAHAJANI
        | script::MODI
        | script::SIDDHAM
        | script::TIRHUTA

        // Unicode-8.0 additions
        | script::AHOM

        // Unicode-9.0 additions
        | script::BHAIKSUKI
        | script::MARCHEN
        | script::NEWA

        // Unicode-10.0 additions
        | script::MASARAM_GONDI
        | script::SOYOMBO
        | script::ZANABAZAR_SQUARE

        // Unicode-11.0 additions
        | script::DOGRA
        | script::GUNJALA_GONDI
        | script::MAKASAR

        // Unicode-12.0 additions
        | script::NANDINAGARI

        // Unicode-13.0 additions
        | script::DIVES_AKURU
        | script::KHITAN_SMALL_SCRIPT

        // Unicode-14.0 additions
        | script::TOTO

        // Unicode-15.0 additions
        | script::KAWI

        | script::EGYPTIAN_HIEROGLYPHS
        | script::SIGNWRITING => {
            if is_fallback_script(chosen_gsub_script) {
                &DEFAULT_SHAPER
            } else {
                &ot_shaper_use::UNIVERSAL_SHAPER
            }
        }

        _ => &DEFAULT_SHAPER,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pick(script: Script, gsub: Option<&[u8; 4]>) -> &'static hb_ot_shaper_t {
        hb_ot_shape_complex_categorize(
            Some(script),
            Direction::from_script(script).unwrap_or(Direction::LeftToRight),
            gsub.map(hb_tag_t::new),
        )
    }

    #[test]
    fn latin_uses_default() {
        assert!(core::ptr::eq(pick(script::LATIN, Some(b"latn")), &DEFAULT_SHAPER));
        assert!(core::ptr::eq(pick(script::LATIN, None), &DEFAULT_SHAPER));
    }

    #[test]
    fn arabic_falls_back_without_script() {
        assert!(core::ptr::eq(
            pick(script::ARABIC, None),
            &ot_shaper_arabic::ARABIC_SHAPER
        ));
        assert!(core::ptr::eq(pick(script::NKO, Some(b"DFLT")), &DEFAULT_SHAPER));
        assert!(core::ptr::eq(
            pick(script::NKO, Some(b"nko ")),
            &ot_shaper_arabic::ARABIC_SHAPER
        ));
    }

    #[test]
    fn indic_versions() {
        assert!(core::ptr::eq(
            pick(script::DEVANAGARI, Some(b"dev2")),
            &ot_shaper_indic::INDIC_SHAPER
        ));
        assert!(core::ptr::eq(
            pick(script::DEVANAGARI, Some(b"dev3")),
            &ot_shaper_use::UNIVERSAL_SHAPER
        ));
        assert!(core::ptr::eq(pick(script::DEVANAGARI, Some(b"DFLT")), &DEFAULT_SHAPER));
    }

    #[test]
    fn myanmar_versions() {
        assert!(core::ptr::eq(
            pick(script::MYANMAR, Some(b"mym2")),
            &ot_shaper_myanmar::MYANMAR_SHAPER
        ));
        assert!(core::ptr::eq(
            pick(script::MYANMAR, Some(b"mymr")),
            &MYANMAR_ZAWGYI_SHAPER
        ));
    }

    #[test]
    fn tibetan_uses_use() {
        assert!(core::ptr::eq(
            pick(script::TIBETAN, Some(b"tibt")),
            &ot_shaper_use::UNIVERSAL_SHAPER
        ));
    }
}
