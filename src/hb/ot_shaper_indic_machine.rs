//! Syllable grammar of the Indic shaper.

use super::buffer::hb_buffer_t;
use super::ot_shaper_indic::ot_category_t::*;
use super::ot_shaper_syllabic::{one_of, Pattern, SyllableMachine};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyllableType {
    ConsonantSyllable = 0,
    VowelSyllable,
    StandaloneCluster,
    SymbolCluster,
    BrokenCluster,
    NonIndicCluster,
}

const C: Pattern = one_of(&[OT_C, OT_Ra]);
const N: Pattern = one_of(&[OT_N]);
const H: Pattern = one_of(&[OT_H]);
const ZWJ: Pattern = one_of(&[OT_ZWJ]);
const ZWNJ: Pattern = one_of(&[OT_ZWNJ]);
const Z: Pattern = one_of(&[OT_ZWJ, OT_ZWNJ]);
const RA: Pattern = one_of(&[OT_Ra]);
const SM: Pattern = one_of(&[OT_SM]);
const A: Pattern = one_of(&[OT_A]);
const M: Pattern = one_of(&[OT_M]);
const V: Pattern = one_of(&[OT_V]);
const CM: Pattern = one_of(&[OT_CM]);
const REPHA_OR_CS: Pattern = one_of(&[OT_Repha, OT_CS]);

// ((ZWNJ? RS)? (N N?)?)
const N_GROUP: Pattern = Pattern::Seq(&[
    Pattern::Opt(&Pattern::Seq(&[Pattern::Opt(&ZWNJ), one_of(&[OT_RS])])),
    Pattern::Opt(&Pattern::Seq(&[N, Pattern::Opt(&N)])),
]);

const REPH: Pattern = Pattern::Alt(&[Pattern::Seq(&[RA, H]), one_of(&[OT_Repha])]);

const CN: Pattern = Pattern::Seq(&[C, Pattern::Opt(&ZWJ), Pattern::Opt(&N_GROUP)]);

const FORCED_RAKAR: Pattern = Pattern::Seq(&[ZWJ, H, ZWJ, RA]);

const SYMBOL: Pattern = Pattern::Seq(&[one_of(&[OT_Symbol]), Pattern::Opt(&N)]);

const MATRA_GROUP: Pattern = Pattern::Seq(&[
    Pattern::Star(&Z),
    M,
    Pattern::Opt(&N),
    Pattern::Opt(&Pattern::Alt(&[H, FORCED_RAKAR])),
]);

const SYLLABLE_TAIL: Pattern = Pattern::Seq(&[
    Pattern::Opt(&Pattern::Seq(&[
        Pattern::Opt(&Z),
        SM,
        Pattern::Opt(&SM),
        Pattern::Opt(&ZWNJ),
    ])),
    Pattern::Star(&A),
]);

const HALANT_GROUP: Pattern = Pattern::Seq(&[
    Pattern::Opt(&Z),
    H,
    Pattern::Opt(&Pattern::Seq(&[ZWJ, Pattern::Opt(&N)])),
]);

const FINAL_HALANT_GROUP: Pattern = Pattern::Alt(&[HALANT_GROUP, Pattern::Seq(&[H, ZWNJ])]);

const HALANT_OR_MATRA_GROUP: Pattern =
    Pattern::Alt(&[FINAL_HALANT_GROUP, Pattern::Repeat(&MATRA_GROUP, 0, 4)]);

const COMPLEX_SYLLABLE_TAIL: Pattern = Pattern::Seq(&[
    Pattern::Repeat(&Pattern::Seq(&[HALANT_GROUP, CN]), 0, 4),
    Pattern::Opt(&CM),
    HALANT_OR_MATRA_GROUP,
    SYLLABLE_TAIL,
]);

const CONSONANT_SYLLABLE: Pattern = Pattern::Seq(&[
    Pattern::Opt(&REPHA_OR_CS),
    CN,
    COMPLEX_SYLLABLE_TAIL,
]);

const VOWEL_SYLLABLE: Pattern = Pattern::Seq(&[
    Pattern::Opt(&REPH),
    V,
    Pattern::Opt(&N_GROUP),
    Pattern::Alt(&[ZWJ, COMPLEX_SYLLABLE_TAIL]),
]);

const STANDALONE_CLUSTER: Pattern = Pattern::Seq(&[
    Pattern::Alt(&[
        Pattern::Seq(&[Pattern::Opt(&REPHA_OR_CS), one_of(&[OT_PLACEHOLDER])]),
        Pattern::Seq(&[Pattern::Opt(&REPH), one_of(&[OT_DOTTEDCIRCLE])]),
    ]),
    Pattern::Opt(&N_GROUP),
    COMPLEX_SYLLABLE_TAIL,
]);

const SYMBOL_CLUSTER: Pattern = Pattern::Seq(&[SYMBOL, SYLLABLE_TAIL]);

const BROKEN_CLUSTER: Pattern = Pattern::Seq(&[
    Pattern::Opt(&REPH),
    Pattern::Opt(&N_GROUP),
    COMPLEX_SYLLABLE_TAIL,
]);

static INDIC_MACHINE: SyllableMachine = SyllableMachine {
    rules: &[
        (CONSONANT_SYLLABLE, SyllableType::ConsonantSyllable as u8),
        (VOWEL_SYLLABLE, SyllableType::VowelSyllable as u8),
        (STANDALONE_CLUSTER, SyllableType::StandaloneCluster as u8),
        (SYMBOL_CLUSTER, SyllableType::SymbolCluster as u8),
        (BROKEN_CLUSTER, SyllableType::BrokenCluster as u8),
    ],
    other: SyllableType::NonIndicCluster as u8,
    broken: SyllableType::BrokenCluster as u8,
};

pub fn find_syllables_indic(buffer: &mut hb_buffer_t) {
    INDIC_MACHINE.find_syllables(buffer);
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn kinds(cats: &[u8]) -> Vec<(usize, u8)> {
        INDIC_MACHINE
            .scan(cats)
            .into_iter()
            .map(|(range, kind)| (range.len(), kind))
            .collect()
    }

    #[test]
    fn conjunct_with_matra() {
        // KA VIRAMA SSA I-MATRA
        assert_eq!(
            kinds(&[OT_C, OT_H, OT_C, OT_M]),
            [(4, SyllableType::ConsonantSyllable as u8)]
        );
    }

    #[test]
    fn reph_before_consonant() {
        assert_eq!(
            kinds(&[OT_Ra, OT_H, OT_C, OT_M, OT_SM]),
            [(5, SyllableType::ConsonantSyllable as u8)]
        );
    }

    #[test]
    fn vowel_and_consonant() {
        assert_eq!(
            kinds(&[OT_V, OT_SM, OT_C]),
            [
                (2, SyllableType::VowelSyllable as u8),
                (1, SyllableType::ConsonantSyllable as u8)
            ]
        );
    }

    #[test]
    fn lone_matra_is_broken() {
        assert_eq!(
            kinds(&[OT_M, OT_X]),
            [
                (1, SyllableType::BrokenCluster as u8),
                (1, SyllableType::NonIndicCluster as u8)
            ]
        );
    }

    #[test]
    fn at_most_four_matras() {
        let cats = [OT_C, OT_M, OT_M, OT_M, OT_M, OT_M];
        assert_eq!(
            kinds(&cats),
            [
                (5, SyllableType::ConsonantSyllable as u8),
                (1, SyllableType::BrokenCluster as u8)
            ]
        );
    }

    #[test]
    fn long_joiner_run() {
        let mut cats = alloc::vec![OT_C];
        cats.extend(core::iter::repeat(OT_ZWJ).take(20000));
        let found = kinds(&cats);
        assert_eq!(found.len(), 20000);
        assert_eq!(found[0], (2, SyllableType::ConsonantSyllable as u8));
        assert!(found[1..]
            .iter()
            .all(|&k| k == (1, SyllableType::NonIndicCluster as u8)));
    }
}
