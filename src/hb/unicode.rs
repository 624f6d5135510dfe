//! Unicode character properties used during shaping.
//!
//! Property data comes from the `unicode-*` crates; this module adapts it to
//! the HarfBuzz conventions (general category numbering, modified combining
//! classes, space fallback types).

use smallvec::SmallVec;
use unicode_general_category::GeneralCategory as UcdCategory;
use unicode_script::UnicodeScript;

use super::common::{hb_codepoint_t, script, Script};

// Space estimates based on:
// https://unicode.org/charts/PDF/U2000.pdf
// https://docs.microsoft.com/en-us/typography/develop/character-design-standards/whitespace
pub mod hb_unicode_funcs_t {
    pub type space_t = u8;
    pub const NOT_SPACE: u8 = 0;
    pub const SPACE_EM: u8 = 1;
    pub const SPACE_EM_2: u8 = 2;
    pub const SPACE_EM_3: u8 = 3;
    pub const SPACE_EM_4: u8 = 4;
    pub const SPACE_EM_5: u8 = 5;
    pub const SPACE_EM_6: u8 = 6;
    pub const SPACE_EM_16: u8 = 16;
    pub const SPACE_4_EM_18: u8 = 17; // 4/18th of an EM!
    pub const SPACE: u8 = 18;
    pub const SPACE_FIGURE: u8 = 19;
    pub const SPACE_PUNCTUATION: u8 = 20;
    pub const SPACE_NARROW: u8 = 21;
}

/// General category, numbered the way HarfBuzz numbers it.
///
/// The numeric value is stored in the low five bits of the glyph's
/// `unicode_props`, so the order matters.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct GeneralCategory(pub u8);

#[allow(unused)]
impl GeneralCategory {
    pub const CONTROL: Self = Self(0);
    pub const FORMAT: Self = Self(1);
    pub const UNASSIGNED: Self = Self(2);
    pub const PRIVATE_USE: Self = Self(3);
    pub const SURROGATE: Self = Self(4);
    pub const LOWERCASE_LETTER: Self = Self(5);
    pub const MODIFIER_LETTER: Self = Self(6);
    pub const OTHER_LETTER: Self = Self(7);
    pub const TITLECASE_LETTER: Self = Self(8);
    pub const UPPERCASE_LETTER: Self = Self(9);
    pub const SPACING_MARK: Self = Self(10);
    pub const ENCLOSING_MARK: Self = Self(11);
    pub const NON_SPACING_MARK: Self = Self(12);
    pub const DECIMAL_NUMBER: Self = Self(13);
    pub const LETTER_NUMBER: Self = Self(14);
    pub const OTHER_NUMBER: Self = Self(15);
    pub const CONNECT_PUNCTUATION: Self = Self(16);
    pub const DASH_PUNCTUATION: Self = Self(17);
    pub const CLOSE_PUNCTUATION: Self = Self(18);
    pub const FINAL_PUNCTUATION: Self = Self(19);
    pub const INITIAL_PUNCTUATION: Self = Self(20);
    pub const OTHER_PUNCTUATION: Self = Self(21);
    pub const OPEN_PUNCTUATION: Self = Self(22);
    pub const CURRENCY_SYMBOL: Self = Self(23);
    pub const MODIFIER_SYMBOL: Self = Self(24);
    pub const MATH_SYMBOL: Self = Self(25);
    pub const OTHER_SYMBOL: Self = Self(26);
    pub const LINE_SEPARATOR: Self = Self(27);
    pub const PARAGRAPH_SEPARATOR: Self = Self(28);
    pub const SPACE_SEPARATOR: Self = Self(29);

    #[allow(unreachable_patterns)]
    fn from_ucd(gc: UcdCategory) -> Self {
        match gc {
            UcdCategory::Control => Self::CONTROL,
            UcdCategory::Format => Self::FORMAT,
            UcdCategory::Unassigned => Self::UNASSIGNED,
            UcdCategory::PrivateUse => Self::PRIVATE_USE,
            UcdCategory::Surrogate => Self::SURROGATE,
            UcdCategory::LowercaseLetter => Self::LOWERCASE_LETTER,
            UcdCategory::ModifierLetter => Self::MODIFIER_LETTER,
            UcdCategory::OtherLetter => Self::OTHER_LETTER,
            UcdCategory::TitlecaseLetter => Self::TITLECASE_LETTER,
            UcdCategory::UppercaseLetter => Self::UPPERCASE_LETTER,
            UcdCategory::SpacingMark => Self::SPACING_MARK,
            UcdCategory::EnclosingMark => Self::ENCLOSING_MARK,
            UcdCategory::NonspacingMark => Self::NON_SPACING_MARK,
            UcdCategory::DecimalNumber => Self::DECIMAL_NUMBER,
            UcdCategory::LetterNumber => Self::LETTER_NUMBER,
            UcdCategory::OtherNumber => Self::OTHER_NUMBER,
            UcdCategory::ConnectorPunctuation => Self::CONNECT_PUNCTUATION,
            UcdCategory::DashPunctuation => Self::DASH_PUNCTUATION,
            UcdCategory::ClosePunctuation => Self::CLOSE_PUNCTUATION,
            UcdCategory::FinalPunctuation => Self::FINAL_PUNCTUATION,
            UcdCategory::InitialPunctuation => Self::INITIAL_PUNCTUATION,
            UcdCategory::OtherPunctuation => Self::OTHER_PUNCTUATION,
            UcdCategory::OpenPunctuation => Self::OPEN_PUNCTUATION,
            UcdCategory::CurrencySymbol => Self::CURRENCY_SYMBOL,
            UcdCategory::ModifierSymbol => Self::MODIFIER_SYMBOL,
            UcdCategory::MathSymbol => Self::MATH_SYMBOL,
            UcdCategory::OtherSymbol => Self::OTHER_SYMBOL,
            UcdCategory::LineSeparator => Self::LINE_SEPARATOR,
            UcdCategory::ParagraphSeparator => Self::PARAGRAPH_SEPARATOR,
            UcdCategory::SpaceSeparator => Self::SPACE_SEPARATOR,
            _ => Self::UNASSIGNED,
        }
    }

    pub fn to_u8(self) -> u8 {
        self.0
    }

    pub fn is_mark(&self) -> bool {
        matches!(
            *self,
            Self::SPACING_MARK | Self::ENCLOSING_MARK | Self::NON_SPACING_MARK
        )
    }

    pub fn is_letter(&self) -> bool {
        matches!(
            *self,
            Self::LOWERCASE_LETTER
                | Self::MODIFIER_LETTER
                | Self::OTHER_LETTER
                | Self::TITLECASE_LETTER
                | Self::UPPERCASE_LETTER
        )
    }
}

#[allow(dead_code, non_upper_case_globals)]
pub mod combining_class {
    pub const NotReordered: u8 = 0;
    pub const Overlay: u8 = 1;
    pub const Nukta: u8 = 7;
    pub const KanaVoicing: u8 = 8;
    pub const Virama: u8 = 9;

    pub const AttachedBelowLeft: u8 = 200;
    pub const AttachedBelow: u8 = 202;
    pub const AttachedAbove: u8 = 214;
    pub const AttachedAboveRight: u8 = 216;
    pub const BelowLeft: u8 = 218;
    pub const Below: u8 = 220;
    pub const BelowRight: u8 = 222;
    pub const Left: u8 = 224;
    pub const Right: u8 = 226;
    pub const AboveLeft: u8 = 228;
    pub const Above: u8 = 230;
    pub const AboveRight: u8 = 232;
    pub const DoubleBelow: u8 = 233;
    pub const DoubleAbove: u8 = 234;

    pub const IotaSubscript: u8 = 240;

    pub const Invalid: u8 = 255;
}

/// Combining classes after HarfBuzz's reshuffling.
///
/// Hebrew fixed-position classes 10..26 follow the SBL Hebrew ordering,
/// Arabic shadda moves before the other harakat, Telugu length marks drop
/// to zero and Thai/Lao/Tibetan vowels get reordered against their viramas.
#[allow(dead_code)]
pub mod modified_combining_class {
    // Hebrew
    pub const CCC10: u8 = 22; // sheva
    pub const CCC11: u8 = 15; // hataf segol
    pub const CCC12: u8 = 16; // hataf patah
    pub const CCC13: u8 = 17; // hataf qamats
    pub const CCC14: u8 = 23; // hiriq
    pub const CCC15: u8 = 18; // tsere
    pub const CCC16: u8 = 19; // segol
    pub const CCC17: u8 = 20; // patah
    pub const CCC18: u8 = 21; // qamats & qamats qatan
    pub const CCC19: u8 = 14; // holam & holam haser for vav
    pub const CCC20: u8 = 24; // qubuts
    pub const CCC21: u8 = 12; // dagesh
    pub const CCC22: u8 = 25; // meteg
    pub const CCC23: u8 = 13; // rafe
    pub const CCC24: u8 = 10; // shin dot
    pub const CCC25: u8 = 11; // sin dot
    pub const CCC26: u8 = 26; // point varika

    // Arabic
    pub const CCC27: u8 = 28; // fathatan
    pub const CCC28: u8 = 29; // dammatan
    pub const CCC29: u8 = 30; // kasratan
    pub const CCC30: u8 = 31; // fatha
    pub const CCC31: u8 = 32; // damma
    pub const CCC32: u8 = 33; // kasra
    pub const CCC33: u8 = 27; // shadda
    pub const CCC34: u8 = 34; // sukun
    pub const CCC35: u8 = 35; // superscript alef

    // Syriac
    pub const CCC36: u8 = 36; // superscript alaph

    // Telugu
    pub const CCC84: u8 = 0; // length mark
    pub const CCC91: u8 = 0; // ai length mark

    // Thai
    pub const CCC103: u8 = 3; // sara u / sara uu
    pub const CCC107: u8 = 107; // mai *

    // Lao
    pub const CCC118: u8 = 118; // sign u / sign uu
    pub const CCC122: u8 = 122; // mai *

    // Tibetan
    pub const CCC129: u8 = 129; // sign aa
    pub const CCC130: u8 = 132; // sign i
    pub const CCC132: u8 = 131; // sign u
}

fn modify_combining_class(ccc: u8) -> u8 {
    use modified_combining_class as m;
    match ccc {
        10 => m::CCC10,
        11 => m::CCC11,
        12 => m::CCC12,
        13 => m::CCC13,
        14 => m::CCC14,
        15 => m::CCC15,
        16 => m::CCC16,
        17 => m::CCC17,
        18 => m::CCC18,
        19 => m::CCC19,
        20 => m::CCC20,
        21 => m::CCC21,
        22 => m::CCC22,
        23 => m::CCC23,
        24 => m::CCC24,
        25 => m::CCC25,
        26 => m::CCC26,
        27 => m::CCC27,
        28 => m::CCC28,
        29 => m::CCC29,
        30 => m::CCC30,
        31 => m::CCC31,
        32 => m::CCC32,
        33 => m::CCC33,
        34 => m::CCC34,
        35 => m::CCC35,
        36 => m::CCC36,
        84 => m::CCC84,
        91 => m::CCC91,
        103 => m::CCC103,
        107 => m::CCC107,
        118 => m::CCC118,
        122 => m::CCC122,
        129 => m::CCC129,
        130 => m::CCC130,
        132 => m::CCC132,
        _ => ccc,
    }
}

// Extended_Pictographic ranges from emoji-data.txt.
#[rustfmt::skip]
static EXTENDED_PICTOGRAPHIC: &[(u32, u32)] = &[
    (0x00A9, 0x00A9), (0x00AE, 0x00AE), (0x203C, 0x203C), (0x2049, 0x2049),
    (0x2122, 0x2122), (0x2139, 0x2139), (0x2194, 0x2199), (0x21A9, 0x21AA),
    (0x231A, 0x231B), (0x2328, 0x2328), (0x2388, 0x2388), (0x23CF, 0x23CF),
    (0x23E9, 0x23F3), (0x23F8, 0x23FA), (0x24C2, 0x24C2), (0x25AA, 0x25AB),
    (0x25B6, 0x25B6), (0x25C0, 0x25C0), (0x25FB, 0x25FE), (0x2600, 0x2605),
    (0x2607, 0x2612), (0x2614, 0x2685), (0x2690, 0x2705), (0x2708, 0x2712),
    (0x2714, 0x2714), (0x2716, 0x2716), (0x271D, 0x271D), (0x2721, 0x2721),
    (0x2728, 0x2728), (0x2733, 0x2734), (0x2744, 0x2744), (0x2747, 0x2747),
    (0x274C, 0x274C), (0x274E, 0x274E), (0x2753, 0x2755), (0x2757, 0x2757),
    (0x2763, 0x2767), (0x2795, 0x2797), (0x27A1, 0x27A1), (0x27B0, 0x27B0),
    (0x27BF, 0x27BF), (0x2934, 0x2935), (0x2B05, 0x2B07), (0x2B1B, 0x2B1C),
    (0x2B50, 0x2B50), (0x2B55, 0x2B55), (0x3030, 0x3030), (0x303D, 0x303D),
    (0x3297, 0x3297), (0x3299, 0x3299), (0x1F000, 0x1F0FF), (0x1F10D, 0x1F10F),
    (0x1F12F, 0x1F12F), (0x1F16C, 0x1F171), (0x1F17E, 0x1F17F), (0x1F18E, 0x1F18E),
    (0x1F191, 0x1F19A), (0x1F1AD, 0x1F1E5), (0x1F201, 0x1F20F), (0x1F21A, 0x1F21A),
    (0x1F22F, 0x1F22F), (0x1F232, 0x1F23A), (0x1F23C, 0x1F23F), (0x1F249, 0x1F3FA),
    (0x1F400, 0x1F53D), (0x1F546, 0x1F64F), (0x1F680, 0x1F6FF), (0x1F774, 0x1F77F),
    (0x1F7D5, 0x1F7FF), (0x1F80C, 0x1F80F), (0x1F848, 0x1F84F), (0x1F85A, 0x1F85F),
    (0x1F888, 0x1F88F), (0x1F8AE, 0x1F8FF), (0x1F90C, 0x1F93A), (0x1F93C, 0x1F945),
    (0x1F947, 0x1FAFF), (0x1FC00, 0x1FFFD),
];

pub trait CharExt {
    fn script(self) -> Script;
    fn general_category(self) -> GeneralCategory;
    fn space_fallback(self) -> hb_unicode_funcs_t::space_t;
    fn combining_class(self) -> u8;
    fn modified_combining_class(self) -> u8;
    fn mirrored(self) -> Option<hb_codepoint_t>;
    fn is_emoji_extended_pictographic(self) -> bool;
    fn is_default_ignorable(self) -> bool;
    fn is_variation_selector(self) -> bool;
    fn vertical(self) -> Option<hb_codepoint_t>;
}

impl CharExt for hb_codepoint_t {
    fn script(self) -> Script {
        let Some(c) = char::from_u32(self) else {
            return script::UNKNOWN;
        };
        let name = c.script().short_name();
        Script::from_iso15924_tag(crate::hb::common::tag_from_str_lossy(name))
            .unwrap_or(script::UNKNOWN)
    }

    fn general_category(self) -> GeneralCategory {
        match char::from_u32(self) {
            Some(c) => {
                GeneralCategory::from_ucd(unicode_general_category::get_general_category(c))
            }
            None => GeneralCategory::UNASSIGNED,
        }
    }

    fn space_fallback(self) -> hb_unicode_funcs_t::space_t {
        use hb_unicode_funcs_t::*;

        // All GC=Zs chars that can use a fallback.
        match self {
            0x0020 | 0x00A0 => SPACE,
            0x2000 | 0x2002 => SPACE_EM_2,
            0x2001 | 0x2003 | 0x3000 => SPACE_EM,
            0x2004 => SPACE_EM_3,
            0x2005 => SPACE_EM_4,
            0x2006 => SPACE_EM_6,
            0x2007 => SPACE_FIGURE,
            0x2008 => SPACE_PUNCTUATION,
            0x2009 => SPACE_EM_5,
            0x200A => SPACE_EM_16,
            0x202F => SPACE_NARROW,
            0x205F => SPACE_4_EM_18,
            // Includes OGHAM SPACE MARK.
            _ => NOT_SPACE,
        }
    }

    fn combining_class(self) -> u8 {
        char::from_u32(self).map_or(0, unicode_normalization::char::canonical_combining_class)
    }

    fn modified_combining_class(self) -> u8 {
        match self {
            // SAKOT goes after any tone marks.
            0x1A60 => 254,
            // PADMA goes after any vowel marks.
            0x0FC6 => 254,
            // TSA -PHRU goes before U+0F74.
            0x0F39 => 127,
            _ => modify_combining_class(self.combining_class()),
        }
    }

    fn mirrored(self) -> Option<hb_codepoint_t> {
        let c = char::from_u32(self)?;
        unicode_bidi_mirroring::get_mirrored(c).map(u32::from)
    }

    fn is_emoji_extended_pictographic(self) -> bool {
        EXTENDED_PICTOGRAPHIC
            .binary_search_by(|&(start, end)| {
                if end < self {
                    core::cmp::Ordering::Less
                } else if start > self {
                    core::cmp::Ordering::Greater
                } else {
                    core::cmp::Ordering::Equal
                }
            })
            .is_ok()
    }

    /// Default_Ignorable_Code_Point, minus U+115F, U+1160, U+3164 and U+FFA0
    /// (fonts draw these as regular spacing glyphs) and U+1BCA0..1BCA3.
    fn is_default_ignorable(self) -> bool {
        let ch = self;
        match ch >> 16 {
            0 => match ch >> 8 {
                0x00 => ch == 0x00AD,
                0x03 => ch == 0x034F,
                0x06 => ch == 0x061C,
                0x17 => (0x17B4..=0x17B5).contains(&ch),
                0x18 => (0x180B..=0x180F).contains(&ch),
                0x20 => {
                    (0x200B..=0x200F).contains(&ch)
                        || (0x202A..=0x202E).contains(&ch)
                        || (0x2060..=0x206F).contains(&ch)
                }
                0xFE => (0xFE00..=0xFE0F).contains(&ch) || ch == 0xFEFF,
                0xFF => (0xFFF0..=0xFFF8).contains(&ch),
                _ => false,
            },
            0x01 => (0x1D173..=0x1D17A).contains(&ch),
            0x0E => (0xE0000..=0xE0FFF).contains(&ch),
            _ => false,
        }
    }

    fn is_variation_selector(self) -> bool {
        // Mongolian free variation selectors are handled by the Arabic shaper.
        (0xFE00..=0xFE0F).contains(&self) || (0xE0100..=0xE01EF).contains(&self)
    }

    fn vertical(self) -> Option<hb_codepoint_t> {
        let v = match self {
            0x2013 => 0xFE32, // EN DASH
            0x2014 => 0xFE31, // EM DASH
            0x2025 => 0xFE30, // TWO DOT LEADER
            0x2026 => 0xFE19, // HORIZONTAL ELLIPSIS
            0x3001 => 0xFE11, // IDEOGRAPHIC COMMA
            0x3002 => 0xFE12, // IDEOGRAPHIC FULL STOP
            0x3008 => 0xFE3F,
            0x3009 => 0xFE40,
            0x300A => 0xFE3D,
            0x300B => 0xFE3E,
            0x300C => 0xFE41,
            0x300D => 0xFE42,
            0x300E => 0xFE43,
            0x300F => 0xFE44,
            0x3010 => 0xFE3B,
            0x3011 => 0xFE3C,
            0x3014 => 0xFE39,
            0x3015 => 0xFE3A,
            0x3016 => 0xFE17,
            0x3017 => 0xFE18,
            0xFE4F => 0xFE34, // WAVY LOW LINE
            0xFF01 => 0xFE15, // FULLWIDTH EXCLAMATION MARK
            0xFF08 => 0xFE35,
            0xFF09 => 0xFE36,
            0xFF0C => 0xFE10, // FULLWIDTH COMMA
            0xFF1A => 0xFE13, // FULLWIDTH COLON
            0xFF1B => 0xFE14, // FULLWIDTH SEMICOLON
            0xFF1F => 0xFE16, // FULLWIDTH QUESTION MARK
            0xFF3B => 0xFE47,
            0xFF3D => 0xFE48,
            0xFF3F => 0xFE33, // FULLWIDTH LOW LINE
            0xFF5B => 0xFE37,
            0xFF5D => 0xFE38,
            _ => return None,
        };
        Some(v)
    }
}

const S_BASE: u32 = 0xAC00;
const L_BASE: u32 = 0x1100;
const V_BASE: u32 = 0x1161;
const T_BASE: u32 = 0x11A7;
const L_COUNT: u32 = 19;
const V_COUNT: u32 = 21;
const T_COUNT: u32 = 28;
const N_COUNT: u32 = V_COUNT * T_COUNT;
const S_COUNT: u32 = L_COUNT * N_COUNT;

/// Canonical pairwise composition. Composition exclusions never compose.
pub fn compose(a: hb_codepoint_t, b: hb_codepoint_t) -> Option<hb_codepoint_t> {
    if let Some(ab) = compose_hangul(a, b) {
        return Some(ab);
    }

    let a = char::from_u32(a)?;
    let b = char::from_u32(b)?;
    unicode_normalization::char::compose(a, b).map(u32::from)
}

fn compose_hangul(a: hb_codepoint_t, b: hb_codepoint_t) -> Option<hb_codepoint_t> {
    let (l, v) = (a, b);
    if (L_BASE..L_BASE + L_COUNT).contains(&l) && (V_BASE..V_BASE + V_COUNT).contains(&v) {
        Some(S_BASE + (l - L_BASE) * N_COUNT + (v - V_BASE) * T_COUNT)
    } else if (S_BASE..=S_BASE + S_COUNT - T_COUNT).contains(&l)
        && (T_BASE + 1..T_BASE + T_COUNT).contains(&v)
        && (l - S_BASE) % T_COUNT == 0
    {
        Some(l + (v - T_BASE))
    } else {
        None
    }
}

/// Single-step canonical decomposition.
///
/// Returns `(a, 0)` for singleton decompositions.
pub fn decompose(ab: hb_codepoint_t) -> Option<(hb_codepoint_t, hb_codepoint_t)> {
    if let Some(pair) = decompose_hangul(ab) {
        return Some(pair);
    }

    let c = char::from_u32(ab)?;
    let mut full: SmallVec<[char; 4]> = SmallVec::new();
    unicode_normalization::char::decompose_canonical(c, |d| full.push(d));

    match full.as_slice() {
        [] => None,
        [only] if *only == c => None,
        [only] => Some((u32::from(*only), 0)),
        [init @ .., last] => {
            // The full decomposition is recursive; fold the leading part back
            // to recover the immediate first component.
            let mut a = init[0];
            for &d in &init[1..] {
                a = unicode_normalization::char::compose(a, d)?;
            }
            match unicode_normalization::char::compose(a, *last) {
                Some(x) if x == c => Some((u32::from(a), u32::from(*last))),
                // Singleton decomposition to a character that itself decomposes.
                Some(x) => Some((u32::from(x), 0)),
                // Composition exclusion.
                None => Some((u32::from(a), u32::from(*last))),
            }
        }
    }
}

pub fn decompose_hangul(ab: hb_codepoint_t) -> Option<(hb_codepoint_t, hb_codepoint_t)> {
    let si = ab.wrapping_sub(S_BASE);
    if si >= S_COUNT {
        return None;
    }

    if si % T_COUNT != 0 {
        // LV,T
        Some((S_BASE + (si / T_COUNT) * T_COUNT, T_BASE + (si % T_COUNT)))
    } else {
        // L,V
        Some((L_BASE + (si / N_COUNT), V_BASE + (si % N_COUNT) / T_COUNT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn general_category_numbering() {
        assert_eq!(('a' as u32).general_category(), GeneralCategory::LOWERCASE_LETTER);
        assert_eq!(0x0301u32.general_category(), GeneralCategory::NON_SPACING_MARK);
        assert_eq!(0x200Du32.general_category(), GeneralCategory::FORMAT);
        assert_eq!(0x0020u32.general_category(), GeneralCategory::SPACE_SEPARATOR);
        assert!(0x093Fu32.general_category().is_mark());
    }

    #[test]
    fn modified_classes() {
        // Hebrew dagesh reorders before the vowel points.
        assert_eq!(0x05BCu32.modified_combining_class(), 12);
        // Arabic shadda moves before fatha.
        assert!(0x0651u32.modified_combining_class() < 0x064Eu32.modified_combining_class());
        // Telugu length mark drops to zero.
        assert_eq!(0x0C55u32.modified_combining_class(), 0);
        assert_eq!(0x1A60u32.modified_combining_class(), 254);
        assert_eq!(0x0301u32.modified_combining_class(), combining_class::Above);
    }

    #[test]
    fn scripts() {
        assert_eq!(0x0627u32.script(), script::ARABIC);
        assert_eq!(('A' as u32).script(), script::LATIN);
        assert_eq!(0x0020u32.script(), script::COMMON);
        assert_eq!(0x0301u32.script(), script::INHERITED);
    }

    #[test]
    fn mirroring() {
        assert_eq!(('(' as u32).mirrored(), Some(')' as u32));
        assert_eq!(('a' as u32).mirrored(), None);
    }

    #[test]
    fn ignorables() {
        assert!(0x200Du32.is_default_ignorable());
        assert!(0x00ADu32.is_default_ignorable());
        assert!(0xE0041u32.is_default_ignorable());
        assert!(!0x3164u32.is_default_ignorable());
        assert!(!('a' as u32).is_default_ignorable());
    }

    #[test]
    fn emoji() {
        assert!(0x1F600u32.is_emoji_extended_pictographic());
        assert!(0x00A9u32.is_emoji_extended_pictographic());
        assert!(!('a' as u32).is_emoji_extended_pictographic());
    }

    #[test]
    fn pairwise_decomposition() {
        assert_eq!(decompose(0x00C1), Some((0x0041, 0x0301)));
        // U+1E09 LATIN SMALL LETTER C WITH CEDILLA AND ACUTE
        assert_eq!(decompose(0x1E09), Some((0x00E7, 0x0301)));
        // ANGSTROM SIGN is a singleton.
        assert_eq!(decompose(0x212B), Some((0x00C5, 0)));
        // DEVANAGARI LETTER QA is excluded from composition.
        assert_eq!(decompose(0x0958), Some((0x0915, 0x093C)));
        assert_eq!(decompose('a' as u32), None);
    }

    #[test]
    fn pairwise_composition() {
        assert_eq!(compose(0x0041, 0x0301), Some(0x00C1));
        assert_eq!(compose(0x0915, 0x093C), None);
        assert_eq!(compose(0x0041, 0x0042), None);
    }

    #[test]
    fn hangul() {
        // GA + A
        assert_eq!(compose(0x1100, 0x1161), Some(0xAC00));
        // GA + final KIYEOK
        assert_eq!(compose(0xAC00, 0x11A8), Some(0xAC01));
        assert_eq!(decompose(0xAC01), Some((0xAC00, 0x11A8)));
        assert_eq!(decompose(0xAC00), Some((0x1100, 0x1161)));
    }
}
