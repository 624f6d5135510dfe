use super::buffer::hb_buffer_t;
use super::common::hb_codepoint_t;
use super::ot_shape_normalize::*;
use super::ot_shape_plan::hb_ot_shape_plan_t;
use super::ot_shaper::*;
use super::unicode::{self, combining_class, modified_combining_class as mcc};
use super::hb_tag_t;

pub static HEBREW_SHAPER: hb_ot_shaper_t = hb_ot_shaper_t {
    name: "hebrew",
    collect_features: None,
    override_features: None,
    create_data: None,
    preprocess_text: None,
    postprocess_glyphs: None,
    normalization_preference: HB_OT_SHAPE_NORMALIZATION_MODE_AUTO,
    decompose: None,
    compose: Some(compose_hebrew),
    setup_masks: None,
    gpos_tag: Some(hb_tag_t::new(b"hebr")),
    reorder_marks: Some(reorder_marks_hebrew),
    zero_width_marks: HB_OT_SHAPE_ZERO_WIDTH_MARKS_BY_GDEF_LATE,
    fallback_position: true,
};

/// Moves a sheva or hiriq that follows patah or qamats behind a meteg or
/// other below mark, the order fonts expect for these sequences.
fn reorder_marks_hebrew(_: &hb_ot_shape_plan_t, buffer: &mut hb_buffer_t, start: usize, end: usize) {
    for i in start + 2..end {
        let c0 = buffer.info[i - 2].modified_combining_class();
        let c1 = buffer.info[i - 1].modified_combining_class();
        let c2 = buffer.info[i].modified_combining_class();

        let patah_or_qamats = c0 == mcc::CCC17 || c0 == mcc::CCC18;
        let sheva_or_hiriq = c1 == mcc::CCC10 || c1 == mcc::CCC14;
        let meteg_or_below = c2 == mcc::CCC22 || c2 == combining_class::Below;

        if patah_or_qamats && sheva_or_hiriq && meteg_or_below {
            buffer.merge_clusters(i - 1, i + 1);
            buffer.info.swap(i - 1, i);
            break;
        }
    }
}

/// Letters U+05D0..=U+05EA with dagesh. Zero where Unicode encodes no form.
const DAGESH_FORMS: [u16; 27] = [
    0xFB30, 0xFB31, 0xFB32, 0xFB33, 0xFB34, 0xFB35, 0xFB36, 0x0000, 0xFB38, 0xFB39, 0xFB3A,
    0xFB3B, 0xFB3C, 0x0000, 0xFB3E, 0x0000, 0xFB40, 0xFB41, 0x0000, 0xFB43, 0xFB44, 0x0000,
    0xFB46, 0xFB47, 0xFB48, 0xFB49, 0xFB4A,
];

/// `(base, mark, presentation form)` pairs excluded from canonical
/// composition.
const PRESENTATION_FORMS: &[(u32, u32, u32)] = &[
    (0x05D9, 0x05B4, 0xFB1D), // yod + hiriq
    (0x05D9, 0x05B7, 0xFB1F), // yod + patah
    (0x05D0, 0x05B7, 0xFB2E), // alef + patah
    (0x05D0, 0x05B8, 0xFB2F), // alef + qamats
    (0x05D5, 0x05B9, 0xFB4B), // vav + holam
    (0xFB2A, 0x05BC, 0xFB2C), // shin with shin dot + dagesh
    (0xFB2B, 0x05BC, 0xFB2D), // shin with sin dot + dagesh
    (0x05D1, 0x05BF, 0xFB4C), // bet + rafe
    (0x05DB, 0x05BF, 0xFB4D), // kaf + rafe
    (0x05E4, 0x05BF, 0xFB4E), // pe + rafe
    (0x05E9, 0x05C1, 0xFB2A), // shin + shin dot
    (0xFB49, 0x05C1, 0xFB2C), // shin with dagesh + shin dot
    (0x05E9, 0x05C2, 0xFB2B), // shin + sin dot
    (0xFB49, 0x05C2, 0xFB2D), // shin with dagesh + sin dot
];

fn compose_hebrew(
    ctx: &hb_ot_shape_normalize_context_t,
    a: hb_codepoint_t,
    b: hb_codepoint_t,
) -> Option<hb_codepoint_t> {
    if let Some(ab) = unicode::compose(a, b) {
        return Some(ab);
    }

    // Fonts with mark positioning handle the decomposed sequences themselves.
    if ctx.plan.has_gpos_mark {
        return None;
    }

    presentation_form(a, b)
}

fn presentation_form(a: hb_codepoint_t, b: hb_codepoint_t) -> Option<hb_codepoint_t> {
    if b == 0x05BC && (0x05D0..=0x05EA).contains(&a) {
        let form = DAGESH_FORMS[(a - 0x05D0) as usize];
        return (form != 0).then_some(u32::from(form));
    }

    PRESENTATION_FORMS
        .iter()
        .find(|&&(base, mark, _)| base == a && mark == b)
        .map(|&(_, _, form)| form)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dagesh_forms() {
        assert_eq!(presentation_form(0x05D1, 0x05BC), Some(0xFB31));
        // het has no dagesh form
        assert_eq!(presentation_form(0x05D7, 0x05BC), None);
        assert_eq!(presentation_form(0xFB2A, 0x05BC), Some(0xFB2C));
    }

    #[test]
    fn shin_dots() {
        assert_eq!(presentation_form(0x05E9, 0x05C1), Some(0xFB2A));
        assert_eq!(presentation_form(0x05E9, 0x05C2), Some(0xFB2B));
        assert_eq!(presentation_form(0x05E9, 0x05B4), None);
    }
}
