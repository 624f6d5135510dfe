//! Syllable grammar of the Myanmar shaper.

use super::buffer::hb_buffer_t;
use super::ot_shaper_indic::ot_category_t::*;
use super::ot_shaper_syllabic::{one_of, Pattern, SyllableMachine};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyllableType {
    ConsonantSyllable = 0,
    BrokenCluster,
    NonMyanmarCluster,
}

const J: Pattern = one_of(&[OT_ZWJ, OT_ZWNJ]);
const H: Pattern = one_of(&[OT_H]);
const AS: Pattern = one_of(&[OT_As]);
const A: Pattern = one_of(&[OT_A]);
const DB: Pattern = one_of(&[OT_DB]);
const VS: Pattern = one_of(&[OT_VS]);
const MH: Pattern = one_of(&[OT_MH]);
const ML: Pattern = one_of(&[OT_ML]);
const MW: Pattern = one_of(&[OT_MW]);
const VABV: Pattern = one_of(&[OT_VAbv]);

// Kinzi: Ra As H
const K: Pattern = Pattern::Seq(&[one_of(&[OT_Ra]), AS, H]);

// (DB As?)?
const DOT_BELOW: Pattern = Pattern::Opt(&Pattern::Seq(&[DB, Pattern::Opt(&AS)]));

const MEDIAL_GROUP: Pattern = Pattern::Seq(&[
    Pattern::Opt(&one_of(&[OT_MY])),
    Pattern::Opt(&AS),
    Pattern::Opt(&one_of(&[OT_MR])),
    Pattern::Opt(&Pattern::Seq(&[
        Pattern::Alt(&[
            Pattern::Seq(&[MW, Pattern::Opt(&MH), Pattern::Opt(&ML)]),
            Pattern::Seq(&[MH, Pattern::Opt(&ML)]),
            ML,
        ]),
        Pattern::Opt(&AS),
    ])),
]);

const MAIN_VOWEL_GROUP: Pattern = Pattern::Seq(&[
    Pattern::Star(&Pattern::Seq(&[one_of(&[OT_VPre]), Pattern::Opt(&VS)])),
    Pattern::Star(&VABV),
    Pattern::Star(&one_of(&[OT_VBlw])),
    Pattern::Star(&A),
    DOT_BELOW,
]);

const POST_VOWEL_GROUP: Pattern = Pattern::Seq(&[
    one_of(&[OT_VPst]),
    Pattern::Opt(&MH),
    Pattern::Opt(&ML),
    Pattern::Star(&AS),
    Pattern::Star(&VABV),
    Pattern::Star(&A),
    DOT_BELOW,
]);

const PWO_TONE_GROUP: Pattern = Pattern::Seq(&[
    one_of(&[OT_PT]),
    Pattern::Star(&A),
    Pattern::Opt(&DB),
    Pattern::Opt(&AS),
]);

const COMPLEX_SYLLABLE_TAIL: Pattern = Pattern::Seq(&[
    Pattern::Star(&AS),
    MEDIAL_GROUP,
    MAIN_VOWEL_GROUP,
    Pattern::Star(&POST_VOWEL_GROUP),
    Pattern::Star(&PWO_TONE_GROUP),
    Pattern::Star(&one_of(&[OT_SM])),
    Pattern::Opt(&J),
]);

const SYLLABLE_TAIL: Pattern = Pattern::Seq(&[
    Pattern::Star(&Pattern::Seq(&[H, one_of(&[OT_C, OT_Ra, OT_IV]), Pattern::Opt(&VS)])),
    Pattern::Alt(&[H, COMPLEX_SYLLABLE_TAIL]),
]);

const CONSONANT_SYLLABLE: Pattern = Pattern::Seq(&[
    Pattern::Opt(&Pattern::Alt(&[K, one_of(&[OT_CS])])),
    one_of(&[OT_C, OT_Ra, OT_IV, OT_GB, OT_DOTTEDCIRCLE]),
    Pattern::Opt(&VS),
    SYLLABLE_TAIL,
]);

const BROKEN_CLUSTER: Pattern = Pattern::Seq(&[Pattern::Opt(&K), Pattern::Opt(&VS), SYLLABLE_TAIL]);

static MYANMAR_MACHINE: SyllableMachine = SyllableMachine {
    rules: &[
        (CONSONANT_SYLLABLE, SyllableType::ConsonantSyllable as u8),
        // A lone joiner stays outside any cluster.
        (J, SyllableType::NonMyanmarCluster as u8),
        (BROKEN_CLUSTER, SyllableType::BrokenCluster as u8),
    ],
    other: SyllableType::NonMyanmarCluster as u8,
    broken: SyllableType::BrokenCluster as u8,
};

pub fn find_syllables_myanmar(buffer: &mut hb_buffer_t) {
    MYANMAR_MACHINE.find_syllables(buffer);
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn kinds(cats: &[u8]) -> Vec<(usize, u8)> {
        MYANMAR_MACHINE
            .scan(cats)
            .into_iter()
            .map(|(range, kind)| (range.len(), kind))
            .collect()
    }

    #[test]
    fn kinzi_syllable() {
        // NGA ASAT VIRAMA KA
        assert_eq!(
            kinds(&[OT_Ra, OT_As, OT_H, OT_C]),
            [(4, SyllableType::ConsonantSyllable as u8)]
        );
    }

    #[test]
    fn medials_and_vowels() {
        // KA MEDIAL-RA E AA ASAT
        assert_eq!(
            kinds(&[OT_C, OT_MR, OT_VPre, OT_VPst, OT_As]),
            [(5, SyllableType::ConsonantSyllable as u8)]
        );
    }

    #[test]
    fn lone_joiner_is_not_broken() {
        assert_eq!(
            kinds(&[OT_ZWJ, OT_VAbv]),
            [
                (1, SyllableType::NonMyanmarCluster as u8),
                (1, SyllableType::BrokenCluster as u8)
            ]
        );
    }
}
