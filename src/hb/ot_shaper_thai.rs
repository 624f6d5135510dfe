use super::buffer::*;
use super::common::{hb_codepoint_t, script};
use super::ot_layout::TableIndex;
use super::ot_shape_normalize::HB_OT_SHAPE_NORMALIZATION_MODE_DEFAULT;
use super::ot_shape_plan::hb_ot_shape_plan_t;
use super::ot_shaper::*;
use super::unicode::GeneralCategory;
use super::hb_font_t;

pub static THAI_SHAPER: hb_ot_shaper_t = hb_ot_shaper_t {
    name: "thai",
    collect_features: None,
    override_features: None,
    create_data: None,
    preprocess_text: Some(preprocess_text),
    postprocess_glyphs: None,
    normalization_preference: HB_OT_SHAPE_NORMALIZATION_MODE_DEFAULT,
    decompose: None,
    compose: None,
    setup_masks: None,
    gpos_tag: None,
    reorder_marks: None,
    zero_width_marks: HB_OT_SHAPE_ZERO_WIDTH_MARKS_BY_GDEF_LATE,
    fallback_position: false,
};

// PUA shaping, for old fonts without Thai lookups.

#[derive(Clone, Copy, PartialEq, Debug)]
enum Consonant {
    NC = 0,
    AC,
    RC,
    DC,
    NotConsonant,
}

fn get_consonant_type(u: hb_codepoint_t) -> Consonant {
    match u {
        0x0E1B | 0x0E1D | 0x0E1F => Consonant::AC,
        0x0E0D | 0x0E10 => Consonant::RC,
        0x0E0E | 0x0E0F => Consonant::DC,
        0x0E01..=0x0E2E => Consonant::NC,
        _ => Consonant::NotConsonant,
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
enum Mark {
    AV = 0,
    BV,
    T,
    NotMark,
}

fn get_mark_type(u: hb_codepoint_t) -> Mark {
    match u {
        0x0E31 | 0x0E34..=0x0E37 | 0x0E47 | 0x0E4D..=0x0E4E => Mark::AV,
        0x0E38..=0x0E3A => Mark::BV,
        0x0E48..=0x0E4C => Mark::T,
        _ => Mark::NotMark,
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
enum Action {
    NOP,
    /// Shift combining mark down.
    SD,
    /// Shift combining mark left.
    SL,
    /// Shift combining mark down-left.
    SDL,
    /// Remove descender from base.
    RD,
}

/// `(character, Windows PUA, Macintosh PUA)`
type PuaMapping = (u16, u16, u16);

const SD_MAPPINGS: &[PuaMapping] = &[
    (0x0E48, 0xF70A, 0xF88B), // MAI EK
    (0x0E49, 0xF70B, 0xF88E), // MAI THO
    (0x0E4A, 0xF70C, 0xF891), // MAI TRI
    (0x0E4B, 0xF70D, 0xF894), // MAI CHATTAWA
    (0x0E4C, 0xF70E, 0xF897), // THANTHAKHAT
    (0x0E38, 0xF718, 0xF89B), // SARA U
    (0x0E39, 0xF719, 0xF89C), // SARA UU
    (0x0E3A, 0xF71A, 0xF89D), // PHINTHU
];

const SDL_MAPPINGS: &[PuaMapping] = &[
    (0x0E48, 0xF705, 0xF88C), // MAI EK
    (0x0E49, 0xF706, 0xF88F), // MAI THO
    (0x0E4A, 0xF707, 0xF892), // MAI TRI
    (0x0E4B, 0xF708, 0xF895), // MAI CHATTAWA
    (0x0E4C, 0xF709, 0xF898), // THANTHAKHAT
];

const SL_MAPPINGS: &[PuaMapping] = &[
    (0x0E48, 0xF713, 0xF88A), // MAI EK
    (0x0E49, 0xF714, 0xF88D), // MAI THO
    (0x0E4A, 0xF715, 0xF890), // MAI TRI
    (0x0E4B, 0xF716, 0xF893), // MAI CHATTAWA
    (0x0E4C, 0xF717, 0xF896), // THANTHAKHAT
    (0x0E31, 0xF710, 0xF884), // MAI HAN-AKAT
    (0x0E34, 0xF701, 0xF885), // SARA I
    (0x0E35, 0xF702, 0xF886), // SARA II
    (0x0E36, 0xF703, 0xF887), // SARA UE
    (0x0E37, 0xF704, 0xF888), // SARA UEE
    (0x0E47, 0xF712, 0xF889), // MAITAIKHU
    (0x0E4D, 0xF711, 0xF899), // NIKHAHIT
];

const RD_MAPPINGS: &[PuaMapping] = &[
    (0x0E0D, 0xF70F, 0xF89A), // YO YING
    (0x0E10, 0xF700, 0xF89E), // THO THAN
];

fn pua_shape(u: hb_codepoint_t, action: Action, font: &hb_font_t) -> hb_codepoint_t {
    let mappings = match action {
        Action::NOP => return u,
        Action::SD => SD_MAPPINGS,
        Action::SL => SL_MAPPINGS,
        Action::SDL => SDL_MAPPINGS,
        Action::RD => RD_MAPPINGS,
    };

    let Some(&(_, win_pua, mac_pua)) = mappings.iter().find(|m| u32::from(m.0) == u) else {
        return u;
    };

    [win_pua, mac_pua]
        .into_iter()
        .map(u32::from)
        .find(|&pua| font.get_nominal_glyph(pua).is_some())
        .unwrap_or(u)
}

// Cluster above looks like:
const T0: u8 = 0; //  ⣤
const T1: u8 = 1; //     ⣼
const T2: u8 = 2; //        ⣾
const T3: u8 = 3; //           ⣿

/// Indexed by consonant type, the last entry for non-consonants.
const ABOVE_START_STATE: [u8; 5] = [T0, T1, T0, T0, T3];

/// `(action, next state)` per state and mark type `AV`, `BV`, `T`.
const ABOVE_STATE_MACHINE: [[(Action, u8); 3]; 4] = [
    /*T0*/ [(Action::NOP, T3), (Action::NOP, T0), (Action::SD, T3)],
    /*T1*/ [(Action::SL, T2), (Action::NOP, T1), (Action::SDL, T2)],
    /*T2*/ [(Action::NOP, T3), (Action::NOP, T2), (Action::SL, T3)],
    /*T3*/ [(Action::NOP, T3), (Action::NOP, T3), (Action::NOP, T3)],
];

const B0: u8 = 0; // No descender
const B1: u8 = 1; // Removable descender
const B2: u8 = 2; // Strict descender

const BELOW_START_STATE: [u8; 5] = [B0, B0, B1, B2, B2];

const BELOW_STATE_MACHINE: [[(Action, u8); 3]; 3] = [
    /*B0*/ [(Action::NOP, B0), (Action::NOP, B2), (Action::NOP, B0)],
    /*B1*/ [(Action::NOP, B1), (Action::RD, B2), (Action::NOP, B1)],
    /*B2*/ [(Action::NOP, B2), (Action::SD, B2), (Action::NOP, B2)],
];

fn do_pua_shaping(font: &hb_font_t, buffer: &mut hb_buffer_t) {
    let mut above_state = ABOVE_START_STATE[Consonant::NotConsonant as usize];
    let mut below_state = BELOW_START_STATE[Consonant::NotConsonant as usize];
    let mut base = 0;

    for i in 0..buffer.len {
        let mt = get_mark_type(buffer.info[i].glyph_id);

        if mt == Mark::NotMark {
            let ct = get_consonant_type(buffer.info[i].glyph_id) as usize;
            above_state = ABOVE_START_STATE[ct];
            below_state = BELOW_START_STATE[ct];
            base = i;
            continue;
        }

        let (above_action, above_next) = ABOVE_STATE_MACHINE[above_state as usize][mt as usize];
        let (below_action, below_next) = BELOW_STATE_MACHINE[below_state as usize][mt as usize];
        above_state = above_next;
        below_state = below_next;

        // At least one of the two actions is NOP.
        let action = if above_action != Action::NOP {
            above_action
        } else {
            below_action
        };

        buffer.unsafe_to_break(Some(base), Some(i));
        if action == Action::RD {
            buffer.info[base].glyph_id = pua_shape(buffer.info[base].glyph_id, action, font);
        } else {
            buffer.info[i].glyph_id = pua_shape(buffer.info[i].glyph_id, action, font);
        }
    }
}

// Lao code points are the Thai ones plus 0x80.

fn is_sara_am(u: hb_codepoint_t) -> bool {
    (u & !0x0080) == 0x0E33
}

fn nikhahit_from_sara_am(u: hb_codepoint_t) -> hb_codepoint_t {
    u - 0x0E33 + 0x0E4D
}

fn sara_aa_from_sara_am(u: hb_codepoint_t) -> hb_codepoint_t {
    u - 1
}

fn is_tone_mark(u: hb_codepoint_t) -> bool {
    let u = u & !0x0080;
    matches!(u, 0x0E34..=0x0E37 | 0x0E47..=0x0E4E | 0x0E31)
}

/// Decomposes SARA AM into NIKHAHIT and SARA AA, moving the NIKHAHIT in
/// front of any tone marks before it. Fonts without Thai GSUB then get
/// their marks moved into place through PUA glyphs.
fn preprocess_text(plan: &hb_ot_shape_plan_t, font: &hb_font_t, buffer: &mut hb_buffer_t) {
    buffer.clear_output();
    buffer.idx = 0;
    while buffer.idx < buffer.len && buffer.successful {
        let u = buffer.cur(0).glyph_id;
        if !is_sara_am(u) {
            buffer.next_glyph();
            continue;
        }

        buffer.output_glyph(nikhahit_from_sara_am(u));
        {
            let out_len = buffer.out_len;
            let nikhahit = &mut buffer.out_info_mut()[out_len - 1];
            nikhahit.set_continuation();
            // Zeroed like any other mark.
            nikhahit.set_general_category(GeneralCategory::NON_SPACING_MARK);
        }
        buffer.replace_glyph(sara_aa_from_sara_am(u));
        if !buffer.successful {
            break;
        }

        let end = buffer.out_len;
        let mut start = end - 2;
        while start > 0 && is_tone_mark(buffer.out_info()[start - 1].glyph_id) {
            start -= 1;
        }

        if start + 2 < end {
            buffer.merge_out_clusters(start, end);
            buffer.out_info_mut()[start..end - 1].rotate_right(1);
        } else if start > 0 && buffer.cluster_level == HB_BUFFER_CLUSTER_LEVEL_MONOTONE_GRAPHEMES {
            // The nikhahit is combining, so it joins the previous cluster.
            buffer.merge_out_clusters(start - 1, end);
        }
    }
    buffer.sync();

    if plan.script == Some(script::THAI) && !plan.ot_map.found_script(TableIndex::GSUB) {
        do_pua_shaping(font, buffer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sara_am_parts() {
        assert!(is_sara_am(0x0E33));
        assert!(is_sara_am(0x0EB3));
        assert!(!is_sara_am(0x0E32));
        assert_eq!(nikhahit_from_sara_am(0x0E33), 0x0E4D);
        assert_eq!(nikhahit_from_sara_am(0x0EB3), 0x0ECD);
        assert_eq!(sara_aa_from_sara_am(0x0EB3), 0x0EB2);
    }

    #[test]
    fn tone_marks() {
        assert!(is_tone_mark(0x0E48));
        assert!(is_tone_mark(0x0EC8));
        assert!(!is_tone_mark(0x0E38));
    }

    #[test]
    fn classification() {
        assert_eq!(get_consonant_type(0x0E1B), Consonant::AC);
        assert_eq!(get_consonant_type(0x0E0D), Consonant::RC);
        assert_eq!(get_consonant_type(0x0E01), Consonant::NC);
        assert_eq!(get_consonant_type(0x0E40), Consonant::NotConsonant);
        assert_eq!(get_mark_type(0x0E34), Mark::AV);
        assert_eq!(get_mark_type(0x0E39), Mark::BV);
        assert_eq!(get_mark_type(0x0E49), Mark::T);
    }

    #[test]
    fn ascender_consonant_shifts_tone_left() {
        let start = ABOVE_START_STATE[Consonant::AC as usize];
        assert_eq!(ABOVE_STATE_MACHINE[start as usize][Mark::T as usize].0, Action::SDL);
        let start = BELOW_START_STATE[Consonant::RC as usize];
        assert_eq!(BELOW_STATE_MACHINE[start as usize][Mark::BV as usize].0, Action::RD);
    }
}
