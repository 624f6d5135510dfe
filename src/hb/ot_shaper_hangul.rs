use alloc::boxed::Box;
use core::any::Any;

use super::buffer::*;
use super::common::hb_codepoint_t;
use super::ot_map::F_NONE;
use super::ot_shape::hb_ot_shape_planner_t;
use super::ot_shape_normalize::HB_OT_SHAPE_NORMALIZATION_MODE_NONE;
use super::ot_shape_plan::hb_ot_shape_plan_t;
use super::ot_shaper::*;
use super::{hb_font_t, hb_mask_t, hb_tag_t};

pub static HANGUL_SHAPER: hb_ot_shaper_t = hb_ot_shaper_t {
    name: "hangul",
    collect_features: Some(collect_features),
    override_features: Some(override_features),
    create_data: Some(data_create_hangul),
    preprocess_text: Some(preprocess_text),
    postprocess_glyphs: None,
    normalization_preference: HB_OT_SHAPE_NORMALIZATION_MODE_NONE,
    decompose: None,
    compose: None,
    setup_masks: Some(setup_masks),
    gpos_tag: None,
    reorder_marks: None,
    zero_width_marks: HB_OT_SHAPE_ZERO_WIDTH_MARKS_NONE,
    fallback_position: false,
};

// Jamo feature indices. Zero means "no jamo feature".
const LJMO: u8 = 1;
const VJMO: u8 = 2;
const TJMO: u8 = 3;

const HANGUL_FEATURES: [hb_tag_t; 3] = [
    hb_tag_t::new(b"ljmo"),
    hb_tag_t::new(b"vjmo"),
    hb_tag_t::new(b"tjmo"),
];

impl GlyphInfo {
    fn hangul_shaping_feature(&self) -> u8 {
        self.ot_shaper_var_u8_auxiliary()
    }

    fn set_hangul_shaping_feature(&mut self, feature: u8) {
        self.set_ot_shaper_var_u8_auxiliary(feature);
    }
}

struct hangul_shape_plan_t {
    mask_array: [hb_mask_t; 4],
}

fn collect_features(planner: &mut hb_ot_shape_planner_t) {
    for tag in HANGUL_FEATURES {
        planner.ot_map.add_feature(tag, F_NONE, 1);
    }
}

fn override_features(planner: &mut hb_ot_shape_planner_t) {
    // Uniscribe does not apply 'calt' for Hangul, and certain fonts
    // (Noto Sans CJK, Source Sans Han, etc) apply all of jamo lookups
    // in calt, which is not desirable.
    planner.ot_map.disable_feature(hb_tag_t::new(b"calt"));
}

fn data_create_hangul(plan: &hb_ot_shape_plan_t) -> Box<dyn Any + Send + Sync> {
    let mut mask_array = [0; 4];
    for (mask, tag) in mask_array[1..].iter_mut().zip(HANGUL_FEATURES) {
        *mask = plan.ot_map.get_1_mask(tag);
    }
    Box::new(hangul_shape_plan_t { mask_array })
}

const L_BASE: u32 = 0x1100;
const V_BASE: u32 = 0x1161;
const T_BASE: u32 = 0x11A7;
const L_COUNT: u32 = 19;
const V_COUNT: u32 = 21;
const T_COUNT: u32 = 28;
const S_BASE: u32 = 0xAC00;
const N_COUNT: u32 = V_COUNT * T_COUNT;
const S_COUNT: u32 = L_COUNT * N_COUNT;

fn is_combining_l(u: hb_codepoint_t) -> bool {
    (L_BASE..L_BASE + L_COUNT).contains(&u)
}

fn is_combining_v(u: hb_codepoint_t) -> bool {
    (V_BASE..V_BASE + V_COUNT).contains(&u)
}

fn is_combining_t(u: hb_codepoint_t) -> bool {
    (T_BASE + 1..T_BASE + T_COUNT).contains(&u)
}

fn is_combined_s(u: hb_codepoint_t) -> bool {
    (S_BASE..S_BASE + S_COUNT).contains(&u)
}

fn is_l(u: hb_codepoint_t) -> bool {
    matches!(u, 0x1100..=0x115F | 0xA960..=0xA97C)
}

fn is_v(u: hb_codepoint_t) -> bool {
    matches!(u, 0x1160..=0x11A7 | 0xD7B0..=0xD7C6)
}

fn is_t(u: hb_codepoint_t) -> bool {
    matches!(u, 0x11A8..=0x11FF | 0xD7CB..=0xD7FB)
}

fn is_hangul_tone(u: hb_codepoint_t) -> bool {
    (0x302E..=0x302F).contains(&u)
}

fn is_zero_width_char(font: &hb_font_t, u: hb_codepoint_t) -> bool {
    font.get_nominal_glyph(u)
        .is_some_and(|glyph| font.get_glyph_h_advance(glyph) == 0)
}

fn has_glyph(font: &hb_font_t, u: hb_codepoint_t) -> bool {
    font.get_nominal_glyph(u).is_some()
}

/// Composes `<L,V,T?>` jamo runs into precomposed syllables the font
/// supports, decomposes precomposed syllables it doesn't, and tags the jamo
/// left over with their positional feature. Tone marks move in front of
/// their syllable.
fn preprocess_text(_: &hb_ot_shape_plan_t, font: &hb_font_t, buffer: &mut hb_buffer_t) {
    buffer.allocate_var(GlyphInfo::OT_SHAPER_VAR_U8_AUXILIARY_VAR);
    let len = buffer.len;
    for info in &mut buffer.info[..len] {
        info.set_hangul_shaping_feature(0);
    }

    buffer.clear_output();
    // Extent of the most recently seen syllable; valid only if start < end.
    let mut start = 0;
    let mut end = 0;
    let count = buffer.len;
    buffer.idx = 0;

    while buffer.idx < count && buffer.successful {
        let u = buffer.cur(0).glyph_id;

        if is_hangul_tone(u) {
            if start < end && end == buffer.out_len {
                // Tone mark follows a valid syllable; move it in front, unless
                // it's zero width.
                buffer.unsafe_to_break_from_outbuffer(Some(start), Some(buffer.idx));
                buffer.next_glyph();
                if !is_zero_width_char(font, u) {
                    buffer.merge_out_clusters(start, end + 1);
                    buffer.out_info_mut()[start..=end].rotate_right(1);
                }
            } else if !buffer.flags.contains(BufferFlags::DO_NOT_INSERT_DOTTED_CIRCLE)
                && has_glyph(font, 0x25CC)
            {
                // No valid syllable as base for the tone mark.
                let chars = if is_zero_width_char(font, u) {
                    [0x25CC, u]
                } else {
                    [u, 0x25CC]
                };
                buffer.replace_glyphs(1, 2, &chars);
            } else {
                buffer.next_glyph();
            }

            start = buffer.out_len;
            end = buffer.out_len;
            continue;
        }

        // Potential syllable start; only used if end moves past it.
        start = buffer.out_len;

        if is_l(u) && buffer.idx + 1 < count {
            let l = u;
            let v = buffer.cur(1).glyph_id;
            if is_v(v) {
                // Have <L,V> or <L,V,T>.
                let mut t = 0;
                let mut tindex = 0;
                if buffer.idx + 2 < count {
                    t = buffer.cur(2).glyph_id;
                    if is_t(t) {
                        // Only used if is_combining_t(t).
                        tindex = t.wrapping_sub(T_BASE);
                    } else {
                        t = 0;
                    }
                }

                let syllable_len = if t != 0 { 3 } else { 2 };
                buffer.unsafe_to_break(Some(buffer.idx), Some(buffer.idx + syllable_len));

                if is_combining_l(l) && is_combining_v(v) && (t == 0 || is_combining_t(t)) {
                    let s = S_BASE + (l - L_BASE) * N_COUNT + (v - V_BASE) * T_COUNT + tindex;
                    if has_glyph(font, s) {
                        buffer.replace_glyphs(syllable_len, 1, &[s]);
                        end = start + 1;
                        continue;
                    }
                }

                // Old Hangul without a precomposed character, or a font that
                // lacks the precomposed glyph.
                buffer.cur_mut(0).set_hangul_shaping_feature(LJMO);
                buffer.next_glyph();
                buffer.cur_mut(0).set_hangul_shaping_feature(VJMO);
                buffer.next_glyph();
                if t != 0 {
                    buffer.cur_mut(0).set_hangul_shaping_feature(TJMO);
                    buffer.next_glyph();
                }
                end = start + syllable_len;

                if !buffer.successful {
                    break;
                }

                if buffer.cluster_level == HB_BUFFER_CLUSTER_LEVEL_MONOTONE_GRAPHEMES {
                    buffer.merge_out_clusters(start, end);
                }
                continue;
            }
        } else if is_combined_s(u) {
            // Have <LV>, <LVT>, or <LV,T>.
            let s = u;
            let s_has_glyph = has_glyph(font, s);
            let lindex = (s - S_BASE) / N_COUNT;
            let nindex = (s - S_BASE) % N_COUNT;
            let vindex = nindex / T_COUNT;
            let tindex = nindex % T_COUNT;

            let next_is = |buffer: &hb_buffer_t, pred: fn(hb_codepoint_t) -> bool| {
                buffer.idx + 1 < count && pred(buffer.cur(1).glyph_id)
            };

            if tindex == 0 && next_is(buffer, is_combining_t) {
                // <LV,T>, try to combine.
                let new_s = s + buffer.cur(1).glyph_id - T_BASE;
                if has_glyph(font, new_s) {
                    buffer.replace_glyphs(2, 1, &[new_s]);
                    end = start + 1;
                    continue;
                }
                buffer.unsafe_to_break(Some(buffer.idx), Some(buffer.idx + 2));
            }

            // Decompose if the font lacks <LV> or <LVT>, or for a
            // non-combining <LV,T>.
            if !s_has_glyph || (tindex == 0 && next_is(buffer, is_t)) {
                let decomposed = [L_BASE + lindex, V_BASE + vindex, T_BASE + tindex];
                if has_glyph(font, decomposed[0])
                    && has_glyph(font, decomposed[1])
                    && (tindex == 0 || has_glyph(font, decomposed[2]))
                {
                    let mut s_len = if tindex != 0 { 3 } else { 2 };
                    buffer.replace_glyphs(1, s_len, &decomposed);

                    // A non-combining T that caused the decomposition joins
                    // the syllable.
                    if s_has_glyph && tindex == 0 {
                        buffer.next_glyph();
                        s_len += 1;
                    }

                    if !buffer.successful {
                        break;
                    }

                    end = start + s_len;
                    let info = buffer.out_info_mut();
                    info[start].set_hangul_shaping_feature(LJMO);
                    info[start + 1].set_hangul_shaping_feature(VJMO);
                    if start + 2 < end {
                        info[start + 2].set_hangul_shaping_feature(TJMO);
                    }

                    if buffer.cluster_level == HB_BUFFER_CLUSTER_LEVEL_MONOTONE_GRAPHEMES {
                        buffer.merge_out_clusters(start, end);
                    }
                    continue;
                } else if tindex == 0 && next_is(buffer, is_t) {
                    buffer.unsafe_to_break(Some(buffer.idx), Some(buffer.idx + 2));
                }
            }

            if s_has_glyph {
                // Not decomposed; advance past it below.
                end = start + 1;
            }
        }

        // No recognizable syllable; end <= start blocks tone-mark
        // reordering.
        buffer.next_glyph();
    }

    buffer.sync();
}

fn setup_masks(plan: &hb_ot_shape_plan_t, _: &hb_font_t, buffer: &mut hb_buffer_t) {
    if let Some(hangul_plan) = plan.data::<hangul_shape_plan_t>() {
        let len = buffer.len;
        for info in &mut buffer.info[..len] {
            info.mask |= hangul_plan.mask_array[usize::from(info.hangul_shaping_feature())];
        }
    }

    buffer.deallocate_var(GlyphInfo::OT_SHAPER_VAR_U8_AUXILIARY_VAR);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jamo_classes() {
        assert!(is_l(0x1100) && is_combining_l(0x1100));
        assert!(is_l(0xA960) && !is_combining_l(0xA960));
        assert!(is_v(0x1161) && is_combining_v(0x1161));
        assert!(is_v(0x1160) && !is_combining_v(0x1160));
        assert!(is_t(0x11A8) && is_combining_t(0x11A8));
        assert!(!is_combining_t(T_BASE));
        assert!(is_hangul_tone(0x302E));
    }

    #[test]
    fn syllable_arithmetic() {
        // GA + K = GAG
        let s = S_BASE + (0x1100 - L_BASE) * N_COUNT + (0x1161 - V_BASE) * T_COUNT;
        assert_eq!(s, 0xAC00);
        assert_eq!(s + 0x11A8 - T_BASE, 0xAC01);
        assert!(is_combined_s(0xD7A3));
        assert!(!is_combined_s(0xD7A4));
    }
}
