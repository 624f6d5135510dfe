//! Syllable grammar of the Universal Shaping Engine.

use alloc::vec::Vec;

use super::buffer::*;
use super::ot_shaper_syllabic::{one_of, Pattern, SyllableMachine, SyllableSerial};
use super::ot_shaper_use::category::*;
use super::GlyphInfo;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyllableType {
    IndependentCluster = 0,
    ViramaTerminatedCluster,
    SakotTerminatedCluster,
    StandardCluster,
    NumberJoinerTerminatedCluster,
    NumeralCluster,
    SymbolCluster,
    HieroglyphCluster,
    BrokenCluster,
    NonCluster,
}

const B: Pattern = one_of(&[BASE]);
const N: Pattern = one_of(&[BASE_NUM]);
const HN: Pattern = one_of(&[HALANT_NUM]);
const SK: Pattern = one_of(&[SAKOT]);
const G: Pattern = one_of(&[HIEROGLYPH]);
const SE: Pattern = one_of(&[HIEROGLYPH_SEGMENT_END]);
const SB: Pattern = one_of(&[HIEROGLYPH_SEGMENT_BEGIN]);
const CMABV: Pattern = one_of(&[CONS_MOD_ABOVE]);
const CMBLW: Pattern = one_of(&[CONS_MOD_BELOW]);
const SMABV: Pattern = one_of(&[SYM_MOD_ABOVE]);
const SMBLW: Pattern = one_of(&[SYM_MOD_BELOW]);

// h = H | HVM | Sk
const HALANT_LIKE: Pattern = one_of(&[HALANT, HALANT_OR_VOWEL_MODIFIER, SAKOT]);

// CMAbv* CMBlw* ((h B | SUB) CMAbv? CMBlw*)*
const CONSONANT_MODIFIERS: Pattern = Pattern::Seq(&[
    Pattern::Star(&CMABV),
    Pattern::Star(&CMBLW),
    Pattern::Star(&Pattern::Seq(&[
        Pattern::Alt(&[Pattern::Seq(&[HALANT_LIKE, B]), one_of(&[CONS_SUB])]),
        Pattern::Opt(&CMABV),
        Pattern::Star(&CMBLW),
    ])),
]);

const MEDIAL_CONSONANTS: Pattern = Pattern::Seq(&[
    Pattern::Opt(&one_of(&[CONS_MED_PRE])),
    Pattern::Opt(&one_of(&[CONS_MED_ABOVE])),
    Pattern::Opt(&one_of(&[CONS_MED_BELOW])),
    Pattern::Opt(&one_of(&[CONS_MED_POST])),
]);

const DEPENDENT_VOWELS: Pattern = Pattern::Seq(&[
    Pattern::Star(&one_of(&[VOWEL_PRE])),
    Pattern::Star(&one_of(&[VOWEL_ABOVE])),
    Pattern::Star(&one_of(&[VOWEL_BELOW])),
    Pattern::Star(&one_of(&[VOWEL_POST])),
]);

const VOWEL_MODIFIERS: Pattern = Pattern::Seq(&[
    Pattern::Opt(&one_of(&[HALANT_OR_VOWEL_MODIFIER])),
    Pattern::Star(&one_of(&[VOWEL_MOD_PRE])),
    Pattern::Star(&one_of(&[VOWEL_MOD_ABOVE])),
    Pattern::Star(&one_of(&[VOWEL_MOD_BELOW])),
    Pattern::Star(&one_of(&[VOWEL_MOD_POST])),
]);

const FINAL_CONSONANTS: Pattern = Pattern::Seq(&[
    Pattern::Star(&one_of(&[CONS_FINAL_ABOVE])),
    Pattern::Star(&one_of(&[CONS_FINAL_BELOW])),
    Pattern::Star(&one_of(&[CONS_FINAL_POST])),
]);

// FMAbv* FMBlw* | FMPst?
const FINAL_MODIFIERS: Pattern = Pattern::Alt(&[
    Pattern::Seq(&[
        Pattern::Star(&one_of(&[CONS_FINAL_MOD_ABOVE])),
        Pattern::Star(&one_of(&[CONS_FINAL_MOD_BELOW])),
    ]),
    Pattern::Opt(&one_of(&[CONS_FINAL_MOD_POST])),
]);

// (R | CS)? (B | GB)
const COMPLEX_SYLLABLE_START: Pattern = Pattern::Seq(&[
    Pattern::Opt(&one_of(&[REPHA, CONS_WITH_STACKER])),
    one_of(&[BASE, BASE_OTHER]),
]);

const COMPLEX_SYLLABLE_MIDDLE: Pattern = Pattern::Seq(&[
    CONSONANT_MODIFIERS,
    MEDIAL_CONSONANTS,
    DEPENDENT_VOWELS,
    VOWEL_MODIFIERS,
    Pattern::Star(&Pattern::Seq(&[SK, B])),
]);

const COMPLEX_SYLLABLE_TAIL: Pattern =
    Pattern::Seq(&[COMPLEX_SYLLABLE_MIDDLE, FINAL_CONSONANTS, FINAL_MODIFIERS]);

// (HN N)* HN
const NUMBER_JOINER_TERMINATED_CLUSTER_TAIL: Pattern =
    Pattern::Seq(&[Pattern::Star(&Pattern::Seq(&[HN, N])), HN]);

// (HN N)+
const NUMERAL_CLUSTER_TAIL: Pattern = Pattern::Seq(&[
    HN,
    N,
    Pattern::Star(&Pattern::Seq(&[HN, N])),
]);

// SMAbv+ SMBlw* | SMBlw+
const SYMBOL_CLUSTER_TAIL: Pattern = Pattern::Alt(&[
    Pattern::Seq(&[SMABV, Pattern::Star(&SMABV), Pattern::Star(&SMBLW)]),
    Pattern::Seq(&[SMBLW, Pattern::Star(&SMBLW)]),
]);

const VIRAMA_TERMINATED_CLUSTER_TAIL: Pattern = Pattern::Seq(&[CONSONANT_MODIFIERS, HALANT_LIKE]);

const SAKOT_TERMINATED_CLUSTER_TAIL: Pattern = Pattern::Seq(&[COMPLEX_SYLLABLE_MIDDLE, SK]);

const VIRAMA_TERMINATED_CLUSTER: Pattern =
    Pattern::Seq(&[COMPLEX_SYLLABLE_START, VIRAMA_TERMINATED_CLUSTER_TAIL]);

const SAKOT_TERMINATED_CLUSTER: Pattern =
    Pattern::Seq(&[COMPLEX_SYLLABLE_START, SAKOT_TERMINATED_CLUSTER_TAIL]);

const STANDARD_CLUSTER: Pattern = Pattern::Seq(&[COMPLEX_SYLLABLE_START, COMPLEX_SYLLABLE_TAIL]);

const BROKEN_CLUSTER: Pattern = Pattern::Seq(&[
    Pattern::Opt(&one_of(&[REPHA])),
    Pattern::Alt(&[
        COMPLEX_SYLLABLE_TAIL,
        SAKOT_TERMINATED_CLUSTER_TAIL,
        SYMBOL_CLUSTER_TAIL,
        VIRAMA_TERMINATED_CLUSTER_TAIL,
        NUMBER_JOINER_TERMINATED_CLUSTER_TAIL,
        NUMERAL_CLUSTER_TAIL,
    ]),
]);

const NUMBER_JOINER_TERMINATED_CLUSTER: Pattern =
    Pattern::Seq(&[N, NUMBER_JOINER_TERMINATED_CLUSTER_TAIL]);

const NUMERAL_CLUSTER: Pattern = Pattern::Seq(&[N, Pattern::Opt(&NUMERAL_CLUSTER_TAIL)]);

const SYMBOL_CLUSTER: Pattern = Pattern::Seq(&[
    one_of(&[OTHER, BASE_OTHER]),
    Pattern::Opt(&SYMBOL_CLUSTER_TAIL),
]);

// SB+ | SB* G SE* (J SE* (G SE*)?)*
const HIEROGLYPH_CLUSTER: Pattern = Pattern::Alt(&[
    Pattern::Seq(&[SB, Pattern::Star(&SB)]),
    Pattern::Seq(&[
        Pattern::Star(&SB),
        G,
        Pattern::Star(&SE),
        Pattern::Star(&Pattern::Seq(&[
            one_of(&[HIEROGLYPH_JOINER]),
            Pattern::Star(&SE),
            Pattern::Opt(&Pattern::Seq(&[G, Pattern::Star(&SE)])),
        ])),
    ]),
]);

static USE_MACHINE: SyllableMachine = SyllableMachine {
    rules: &[
        (one_of(&[OTHER]), SyllableType::IndependentCluster as u8),
        (VIRAMA_TERMINATED_CLUSTER, SyllableType::ViramaTerminatedCluster as u8),
        (SAKOT_TERMINATED_CLUSTER, SyllableType::SakotTerminatedCluster as u8),
        (STANDARD_CLUSTER, SyllableType::StandardCluster as u8),
        (
            NUMBER_JOINER_TERMINATED_CLUSTER,
            SyllableType::NumberJoinerTerminatedCluster as u8,
        ),
        (NUMERAL_CLUSTER, SyllableType::NumeralCluster as u8),
        (SYMBOL_CLUSTER, SyllableType::SymbolCluster as u8),
        (HIEROGLYPH_CLUSTER, SyllableType::HieroglyphCluster as u8),
        (BROKEN_CLUSTER, SyllableType::BrokenCluster as u8),
    ],
    other: SyllableType::NonCluster as u8,
    broken: SyllableType::BrokenCluster as u8,
};

/// Default ignorables of category `O` are invisible to the grammar, and so
/// is a ZWNJ in front of a mark.
fn is_skipped(infos: &[GlyphInfo], i: usize) -> bool {
    let info = &infos[i];
    let category = info.use_category();

    if category == OTHER && info.is_default_ignorable() {
        return true;
    }

    if category == ZWNJ {
        let next = infos[i + 1..]
            .iter()
            .find(|next| !(next.use_category() == OTHER && next.is_default_ignorable()));
        return next.is_some_and(|next| next.is_unicode_mark());
    }

    false
}

pub fn find_syllables_use(buffer: &mut hb_buffer_t) {
    let len = buffer.len;

    // Original index of every glyph the grammar sees.
    let kept: Vec<usize> = (0..len)
        .filter(|&i| !is_skipped(&buffer.info[..len], i))
        .collect();
    let cats: Vec<u8> = kept
        .iter()
        .map(|&i| buffer.info[i].use_category())
        .collect();

    for info in &mut buffer.info[..len] {
        info.set_syllable(0);
    }

    let mut serial = SyllableSerial::default();
    for (range, kind) in USE_MACHINE.scan(&cats) {
        if kind == USE_MACHINE.broken {
            buffer.scratch_flags |= HB_BUFFER_SCRATCH_FLAG_HAS_BROKEN_SYLLABLE;
        }

        // Skipped glyphs join the syllable before them.
        let start = kept[range.start];
        let end = kept.get(range.end).copied().unwrap_or(len);
        let syllable = serial.next(kind);
        for info in &mut buffer.info[start..end] {
            info.set_syllable(syllable);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(cats: &[u8]) -> Vec<(usize, u8)> {
        USE_MACHINE
            .scan(cats)
            .into_iter()
            .map(|(range, kind)| (range.len(), kind))
            .collect()
    }

    #[test]
    fn standard_cluster_with_subjoined_consonant() {
        assert_eq!(
            kinds(&[BASE, CONS_SUB, VOWEL_ABOVE, VOWEL_MOD_ABOVE]),
            [(4, SyllableType::StandardCluster as u8)]
        );
    }

    #[test]
    fn virama_terminated() {
        assert_eq!(
            kinds(&[BASE, HALANT]),
            [(2, SyllableType::ViramaTerminatedCluster as u8)]
        );
        assert_eq!(
            kinds(&[BASE, HALANT, BASE]),
            [(3, SyllableType::StandardCluster as u8)]
        );
    }

    #[test]
    fn repha_starts_a_cluster() {
        assert_eq!(
            kinds(&[REPHA, BASE, VOWEL_PRE]),
            [(3, SyllableType::StandardCluster as u8)]
        );
    }

    #[test]
    fn numbers_and_symbols() {
        assert_eq!(
            kinds(&[BASE_NUM, HALANT_NUM, BASE_NUM]),
            [(3, SyllableType::NumeralCluster as u8)]
        );
        assert_eq!(
            kinds(&[OTHER, SYM_MOD_ABOVE]),
            [(2, SyllableType::SymbolCluster as u8)]
        );
        assert_eq!(kinds(&[OTHER]), [(1, SyllableType::IndependentCluster as u8)]);
    }

    #[test]
    fn stray_vowel_sign_is_broken() {
        assert_eq!(
            kinds(&[VOWEL_BELOW, BASE]),
            [
                (1, SyllableType::BrokenCluster as u8),
                (1, SyllableType::StandardCluster as u8)
            ]
        );
    }

    #[test]
    fn hieroglyphs() {
        assert_eq!(
            kinds(&[HIEROGLYPH, HIEROGLYPH_JOINER, HIEROGLYPH]),
            [(3, SyllableType::HieroglyphCluster as u8)]
        );
    }
}
