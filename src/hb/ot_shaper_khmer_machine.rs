//! Syllable grammar of the Khmer shaper.

use super::buffer::hb_buffer_t;
use super::ot_shaper_indic::ot_category_t::*;
use super::ot_shaper_syllabic::{one_of, Pattern, SyllableMachine};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyllableType {
    ConsonantSyllable = 0,
    BrokenCluster,
    NonKhmerCluster,
}

const C: Pattern = one_of(&[OT_C, OT_Ra, OT_V]);
const H: Pattern = one_of(&[OT_H]);
const JOINER: Pattern = one_of(&[OT_ZWJ, OT_ZWNJ]);
const ROBATIC: Pattern = one_of(&[OT_Robatic]);
const VPRE: Pattern = one_of(&[OT_VPre]);
const VBLW: Pattern = one_of(&[OT_VBlw]);
const VABV: Pattern = one_of(&[OT_VAbv]);
const VPST: Pattern = one_of(&[OT_VPst]);

// c ((ZWJ|ZWNJ)? Robatic)?
const CN: Pattern = Pattern::Seq(&[
    C,
    Pattern::Opt(&Pattern::Seq(&[Pattern::Opt(&JOINER), ROBATIC])),
]);

// (joiner* Xgroup)*
const XGROUP: Pattern = Pattern::Star(&Pattern::Seq(&[
    Pattern::Star(&JOINER),
    one_of(&[OT_Xgroup]),
]));

const YGROUP: Pattern = Pattern::Star(&one_of(&[OT_Ygroup]));

const MATRA_GROUP: Pattern = Pattern::Seq(&[
    Pattern::Opt(&VPRE),
    XGROUP,
    Pattern::Opt(&VBLW),
    XGROUP,
    Pattern::Opt(&Pattern::Seq(&[Pattern::Opt(&JOINER), VABV])),
    XGROUP,
    Pattern::Opt(&VPST),
]);

const SYLLABLE_TAIL: Pattern = Pattern::Seq(&[
    XGROUP,
    MATRA_GROUP,
    XGROUP,
    Pattern::Opt(&Pattern::Seq(&[H, C])),
    YGROUP,
]);

const BROKEN_CLUSTER: Pattern = Pattern::Seq(&[
    Pattern::Star(&Pattern::Seq(&[H, CN])),
    Pattern::Alt(&[H, SYLLABLE_TAIL]),
]);

const CONSONANT_SYLLABLE: Pattern = Pattern::Seq(&[
    Pattern::Alt(&[CN, one_of(&[OT_PLACEHOLDER, OT_DOTTEDCIRCLE])]),
    BROKEN_CLUSTER,
]);

static KHMER_MACHINE: SyllableMachine = SyllableMachine {
    rules: &[
        (CONSONANT_SYLLABLE, SyllableType::ConsonantSyllable as u8),
        (BROKEN_CLUSTER, SyllableType::BrokenCluster as u8),
    ],
    other: SyllableType::NonKhmerCluster as u8,
    broken: SyllableType::BrokenCluster as u8,
};

pub fn find_syllables_khmer(buffer: &mut hb_buffer_t) {
    KHMER_MACHINE.find_syllables(buffer);
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn kinds(cats: &[u8]) -> Vec<(usize, u8)> {
        KHMER_MACHINE
            .scan(cats)
            .into_iter()
            .map(|(range, kind)| (range.len(), kind))
            .collect()
    }

    #[test]
    fn coeng_subscript_with_prebase_vowel() {
        // KA COENG RO E
        assert_eq!(
            kinds(&[OT_C, OT_H, OT_Ra, OT_VPre]),
            [(4, SyllableType::ConsonantSyllable as u8)]
        );
    }

    #[test]
    fn split_vowel_sign_after_consonant() {
        assert_eq!(
            kinds(&[OT_C, OT_VPre, OT_VAbv, OT_C]),
            [
                (3, SyllableType::ConsonantSyllable as u8),
                (1, SyllableType::ConsonantSyllable as u8)
            ]
        );
    }

    #[test]
    fn leading_vowel_sign_is_broken() {
        assert_eq!(
            kinds(&[OT_VBlw, OT_X]),
            [
                (1, SyllableType::BrokenCluster as u8),
                (1, SyllableType::NonKhmerCluster as u8)
            ]
        );
    }
}
