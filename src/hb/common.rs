use alloc::string::String;
use core::ops::{Bound, RangeBounds};

use read_fonts::collections::int_set::Domain;
use read_fonts::types::Tag;

use super::text_parser::TextParser;

pub type hb_codepoint_t = u32;
pub type hb_mask_t = u32;
pub type hb_tag_t = Tag;

/// Errors produced when parsing the textual forms of shaping inputs.
#[derive(Clone, Copy, PartialEq, Eq, Debug, thiserror::Error)]
pub enum ParseError {
    #[error("invalid direction")]
    Direction,
    #[error("invalid script")]
    Script,
    #[error("invalid language")]
    Language,
    #[error("invalid feature")]
    Feature,
    #[error("invalid variation")]
    Variation,
}

pub trait TagExt {
    fn default_script() -> Self;
    fn default_language() -> Self;
    #[cfg(test)]
    fn to_lowercase(&self) -> Self;
    fn to_uppercase(&self) -> Self;
}

impl TagExt for Tag {
    #[inline]
    fn default_script() -> Self {
        Tag::new(b"DFLT")
    }

    #[inline]
    fn default_language() -> Self {
        Tag::new(b"dflt")
    }

    #[cfg(test)]
    #[inline]
    fn to_lowercase(&self) -> Self {
        let b = self.to_be_bytes();
        Tag::new(&[
            b[0].to_ascii_lowercase(),
            b[1].to_ascii_lowercase(),
            b[2].to_ascii_lowercase(),
            b[3].to_ascii_lowercase(),
        ])
    }

    #[inline]
    fn to_uppercase(&self) -> Self {
        let b = self.to_be_bytes();
        Tag::new(&[
            b[0].to_ascii_uppercase(),
            b[1].to_ascii_uppercase(),
            b[2].to_ascii_uppercase(),
            b[3].to_ascii_uppercase(),
        ])
    }
}

/// Builds a tag from a string, padding with spaces or truncating to four bytes.
///
/// An empty string maps to the null tag.
pub(crate) fn tag_from_str_lossy(s: &str) -> Tag {
    if s.is_empty() {
        return Tag::from_u32(0);
    }
    let mut bytes = [b' '; 4];
    for (dst, src) in bytes.iter_mut().zip(s.as_bytes()) {
        *dst = *src;
    }
    Tag::new(&bytes)
}

/// Defines the direction in which text is to be read.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Direction {
    /// Initial, unset direction.
    #[default]
    Invalid,
    /// Text is set horizontally from left to right.
    LeftToRight,
    /// Text is set horizontally from right to left.
    RightToLeft,
    /// Text is set vertically from top to bottom.
    TopToBottom,
    /// Text is set vertically from bottom to top.
    BottomToTop,
}

impl Direction {
    #[inline]
    pub(crate) fn is_horizontal(self) -> bool {
        matches!(self, Direction::LeftToRight | Direction::RightToLeft)
    }

    #[inline]
    pub(crate) fn is_vertical(self) -> bool {
        matches!(self, Direction::TopToBottom | Direction::BottomToTop)
    }

    #[inline]
    pub(crate) fn is_forward(self) -> bool {
        matches!(self, Direction::LeftToRight | Direction::TopToBottom)
    }

    #[inline]
    pub(crate) fn is_backward(self) -> bool {
        matches!(self, Direction::RightToLeft | Direction::BottomToTop)
    }

    #[inline]
    pub(crate) fn reverse(self) -> Self {
        match self {
            Direction::LeftToRight => Direction::RightToLeft,
            Direction::RightToLeft => Direction::LeftToRight,
            Direction::TopToBottom => Direction::BottomToTop,
            Direction::BottomToTop => Direction::TopToBottom,
            Direction::Invalid => Direction::Invalid,
        }
    }

    /// HB: hb_script_get_horizontal_direction
    pub(crate) fn from_script(script: Script) -> Option<Self> {
        match script {
            script::ARABIC
            | script::HEBREW
            | script::SYRIAC
            | script::THAANA
            | script::CYPRIOT
            | script::KHAROSHTHI
            | script::PHOENICIAN
            | script::NKO
            | script::LYDIAN
            | script::AVESTAN
            | script::IMPERIAL_ARAMAIC
            | script::INSCRIPTIONAL_PAHLAVI
            | script::INSCRIPTIONAL_PARTHIAN
            | script::OLD_SOUTH_ARABIAN
            | script::OLD_TURKIC
            | script::SAMARITAN
            | script::MANDAIC
            | script::MEROITIC_CURSIVE
            | script::MEROITIC_HIEROGLYPHS
            | script::MANICHAEAN
            | script::MENDE_KIKAKUI
            | script::NABATAEAN
            | script::OLD_NORTH_ARABIAN
            | script::PALMYRENE
            | script::PSALTER_PAHLAVI
            | script::HATRAN
            | script::ADLAM
            | script::HANIFI_ROHINGYA
            | script::OLD_SOGDIAN
            | script::SOGDIAN
            | script::ELYMAIC
            | script::CHORASMIAN
            | script::YEZIDI
            | script::OLD_UYGHUR => Some(Direction::RightToLeft),

            // Scripts that can be written in either direction.
            script::OLD_HUNGARIAN | script::OLD_ITALIC | script::RUNIC => None,

            _ => Some(Direction::LeftToRight),
        }
    }
}

impl core::str::FromStr for Direction {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Matches HarfBuzz: only the first letter is significant.
        match s.as_bytes().first().map(u8::to_ascii_lowercase) {
            Some(b'l') => Ok(Direction::LeftToRight),
            Some(b'r') => Ok(Direction::RightToLeft),
            Some(b't') => Ok(Direction::TopToBottom),
            Some(b'b') => Ok(Direction::BottomToTop),
            _ => Err(ParseError::Direction),
        }
    }
}

/// A script, identified by its ISO 15924 tag.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Script(pub(crate) Tag);

impl Script {
    #[inline]
    pub(crate) const fn from_bytes(bytes: &[u8; 4]) -> Self {
        Script(Tag::new(bytes))
    }

    /// Converts an ISO 15924 script tag to a corresponding `Script`.
    pub fn from_iso15924_tag(tag: Tag) -> Option<Script> {
        if tag.to_u32() == 0 {
            return None;
        }

        // Be lenient, adjust case (one capital letter followed by three small letters).
        let tag = Tag::from_u32((tag.to_u32() & 0xDFDFDFDF) | 0x00202020);

        match &tag.to_be_bytes() {
            // These graduated from the 'Q' private-area codes, but
            // the old code is still aliased by Unicode, and the Qaai
            // one in use by ICU.
            b"Qaai" => return Some(script::INHERITED),
            b"Qaac" => return Some(script::COPTIC),

            // Script variants from https://unicode.org/iso15924/
            b"Aran" => return Some(script::ARABIC),
            b"Cyrs" => return Some(script::CYRILLIC),
            b"Geok" => return Some(script::GEORGIAN),
            b"Hans" | b"Hant" => return Some(script::HAN),
            b"Jamo" => return Some(script::HANGUL),
            b"Latf" | b"Latg" => return Some(script::LATIN),
            b"Syre" | b"Syrj" | b"Syrn" => return Some(script::SYRIAC),
            _ => {}
        }

        Some(Script(tag))
    }

    /// Returns script's tag.
    #[inline]
    pub fn tag(&self) -> Tag {
        self.0
    }
}

impl core::str::FromStr for Script {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = tag_from_str_lossy(s);
        Script::from_iso15924_tag(tag).ok_or(ParseError::Script)
    }
}

/// Predefined scripts.
pub mod script {
    #![allow(missing_docs)]

    use super::Script;

    // Special values.
    pub const COMMON: Script = Script::from_bytes(b"Zyyy");
    pub const INHERITED: Script = Script::from_bytes(b"Zinh");
    pub const UNKNOWN: Script = Script::from_bytes(b"Zzzz");

    pub const ADLAM: Script = Script::from_bytes(b"Adlm");
    pub const AHOM: Script = Script::from_bytes(b"Ahom");
    pub const ARABIC: Script = Script::from_bytes(b"Arab");
    pub const AVESTAN: Script = Script::from_bytes(b"Avst");
    pub const BALINESE: Script = Script::from_bytes(b"Bali");
    pub const BATAK: Script = Script::from_bytes(b"Batk");
    pub const BENGALI: Script = Script::from_bytes(b"Beng");
    pub const BHAIKSUKI: Script = Script::from_bytes(b"Bhks");
    pub const BRAHMI: Script = Script::from_bytes(b"Brah");
    pub const BUGINESE: Script = Script::from_bytes(b"Bugi");
    pub const BUHID: Script = Script::from_bytes(b"Buhd");
    pub const CHAKMA: Script = Script::from_bytes(b"Cakm");
    pub const CHAM: Script = Script::from_bytes(b"Cham");
    pub const CHORASMIAN: Script = Script::from_bytes(b"Chrs");
    pub const COPTIC: Script = Script::from_bytes(b"Copt");
    pub const CYPRIOT: Script = Script::from_bytes(b"Cprt");
    pub const CYRILLIC: Script = Script::from_bytes(b"Cyrl");
    pub const DEVANAGARI: Script = Script::from_bytes(b"Deva");
    pub const DIVES_AKURU: Script = Script::from_bytes(b"Diak");
    pub const DOGRA: Script = Script::from_bytes(b"Dogr");
    pub const DUPLOYAN: Script = Script::from_bytes(b"Dupl");
    pub const EGYPTIAN_HIEROGLYPHS: Script = Script::from_bytes(b"Egyp");
    pub const ELYMAIC: Script = Script::from_bytes(b"Elym");
    pub const GEORGIAN: Script = Script::from_bytes(b"Geor");
    pub const GRANTHA: Script = Script::from_bytes(b"Gran");
    pub const GREEK: Script = Script::from_bytes(b"Grek");
    pub const GUJARATI: Script = Script::from_bytes(b"Gujr");
    pub const GUNJALA_GONDI: Script = Script::from_bytes(b"Gong");
    pub const GURMUKHI: Script = Script::from_bytes(b"Guru");
    pub const HAN: Script = Script::from_bytes(b"Hani");
    pub const HANGUL: Script = Script::from_bytes(b"Hang");
    pub const HANIFI_ROHINGYA: Script = Script::from_bytes(b"Rohg");
    pub const HANUNOO: Script = Script::from_bytes(b"Hano");
    pub const HATRAN: Script = Script::from_bytes(b"Hatr");
    pub const HEBREW: Script = Script::from_bytes(b"Hebr");
    pub const HIRAGANA: Script = Script::from_bytes(b"Hira");
    pub const IMPERIAL_ARAMAIC: Script = Script::from_bytes(b"Armi");
    pub const INSCRIPTIONAL_PAHLAVI: Script = Script::from_bytes(b"Phli");
    pub const INSCRIPTIONAL_PARTHIAN: Script = Script::from_bytes(b"Prti");
    pub const JAVANESE: Script = Script::from_bytes(b"Java");
    pub const KAITHI: Script = Script::from_bytes(b"Kthi");
    pub const KANNADA: Script = Script::from_bytes(b"Knda");
    pub const KATAKANA: Script = Script::from_bytes(b"Kana");
    pub const KAWI: Script = Script::from_bytes(b"Kawi");
    pub const KAYAH_LI: Script = Script::from_bytes(b"Kali");
    pub const KHAROSHTHI: Script = Script::from_bytes(b"Khar");
    pub const KHITAN_SMALL_SCRIPT: Script = Script::from_bytes(b"Kits");
    pub const KHMER: Script = Script::from_bytes(b"Khmr");
    pub const KHOJKI: Script = Script::from_bytes(b"Khoj");
    pub const KHUDAWADI: Script = Script::from_bytes(b"Sind");
    pub const LAO: Script = Script::from_bytes(b"Laoo");
    pub const LATIN: Script = Script::from_bytes(b"Latn");
    pub const LEPCHA: Script = Script::from_bytes(b"Lepc");
    pub const LIMBU: Script = Script::from_bytes(b"Limb");
    pub const LYDIAN: Script = Script::from_bytes(b"Lydi");
    pub const MAHAJANI: Script = Script::from_bytes(b"Mahj");
    pub const MAKASAR: Script = Script::from_bytes(b"Maka");
    pub const MALAYALAM: Script = Script::from_bytes(b"Mlym");
    pub const MANDAIC: Script = Script::from_bytes(b"Mand");
    pub const MANICHAEAN: Script = Script::from_bytes(b"Mani");
    pub const MARCHEN: Script = Script::from_bytes(b"Marc");
    pub const MASARAM_GONDI: Script = Script::from_bytes(b"Gonm");
    pub const MEETEI_MAYEK: Script = Script::from_bytes(b"Mtei");
    pub const MENDE_KIKAKUI: Script = Script::from_bytes(b"Mend");
    pub const MEROITIC_CURSIVE: Script = Script::from_bytes(b"Merc");
    pub const MEROITIC_HIEROGLYPHS: Script = Script::from_bytes(b"Mero");
    pub const MODI: Script = Script::from_bytes(b"Modi");
    pub const MONGOLIAN: Script = Script::from_bytes(b"Mong");
    pub const MYANMAR: Script = Script::from_bytes(b"Mymr");
    /// Private-use tag for Myanmar text in the Zawgyi encoding.
    pub const MYANMAR_ZAWGYI: Script = Script::from_bytes(b"Qaag");
    pub const NABATAEAN: Script = Script::from_bytes(b"Nbat");
    pub const NANDINAGARI: Script = Script::from_bytes(b"Nand");
    pub const NEWA: Script = Script::from_bytes(b"Newa");
    pub const NEW_TAI_LUE: Script = Script::from_bytes(b"Talu");
    pub const NKO: Script = Script::from_bytes(b"Nkoo");
    pub const OLD_HUNGARIAN: Script = Script::from_bytes(b"Hung");
    pub const OLD_ITALIC: Script = Script::from_bytes(b"Ital");
    pub const OLD_NORTH_ARABIAN: Script = Script::from_bytes(b"Narb");
    pub const OLD_SOGDIAN: Script = Script::from_bytes(b"Sogo");
    pub const OLD_SOUTH_ARABIAN: Script = Script::from_bytes(b"Sarb");
    pub const OLD_TURKIC: Script = Script::from_bytes(b"Orkh");
    pub const OLD_UYGHUR: Script = Script::from_bytes(b"Ougr");
    pub const ORIYA: Script = Script::from_bytes(b"Orya");
    pub const PALMYRENE: Script = Script::from_bytes(b"Palm");
    pub const PHAGS_PA: Script = Script::from_bytes(b"Phag");
    pub const PHOENICIAN: Script = Script::from_bytes(b"Phnx");
    pub const PSALTER_PAHLAVI: Script = Script::from_bytes(b"Phlp");
    pub const REJANG: Script = Script::from_bytes(b"Rjng");
    pub const RUNIC: Script = Script::from_bytes(b"Runr");
    pub const SAMARITAN: Script = Script::from_bytes(b"Samr");
    pub const SAURASHTRA: Script = Script::from_bytes(b"Saur");
    pub const SHARADA: Script = Script::from_bytes(b"Shrd");
    pub const SIDDHAM: Script = Script::from_bytes(b"Sidd");
    pub const SIGNWRITING: Script = Script::from_bytes(b"Sgnw");
    pub const SINHALA: Script = Script::from_bytes(b"Sinh");
    pub const SOGDIAN: Script = Script::from_bytes(b"Sogd");
    pub const SOYOMBO: Script = Script::from_bytes(b"Soyo");
    pub const SUNDANESE: Script = Script::from_bytes(b"Sund");
    pub const SYLOTI_NAGRI: Script = Script::from_bytes(b"Sylo");
    pub const SYRIAC: Script = Script::from_bytes(b"Syrc");
    pub const TAGALOG: Script = Script::from_bytes(b"Tglg");
    pub const TAGBANWA: Script = Script::from_bytes(b"Tagb");
    pub const TAI_LE: Script = Script::from_bytes(b"Tale");
    pub const TAI_THAM: Script = Script::from_bytes(b"Lana");
    pub const TAI_VIET: Script = Script::from_bytes(b"Tavt");
    pub const TAKRI: Script = Script::from_bytes(b"Takr");
    pub const TAMIL: Script = Script::from_bytes(b"Taml");
    pub const TELUGU: Script = Script::from_bytes(b"Telu");
    pub const THAANA: Script = Script::from_bytes(b"Thaa");
    pub const THAI: Script = Script::from_bytes(b"Thai");
    pub const TIBETAN: Script = Script::from_bytes(b"Tibt");
    pub const TIFINAGH: Script = Script::from_bytes(b"Tfng");
    pub const TIRHUTA: Script = Script::from_bytes(b"Tirh");
    pub const TOTO: Script = Script::from_bytes(b"Toto");
    pub const YEZIDI: Script = Script::from_bytes(b"Yezi");
    pub const ZANABAZAR_SQUARE: Script = Script::from_bytes(b"Zanb");
}

/// A BCP 47 language tag, stored lowercased.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Language(String);

impl Language {
    /// Returns the language as a string.
    #[inline]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl core::str::FromStr for Language {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ParseError::Language);
        }
        Ok(Language(s.to_ascii_lowercase()))
    }
}

/// A feature tag with an accompanying range and value.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Feature {
    /// The tag of the feature.
    pub tag: Tag,
    /// The value of the feature. 0 disables, 1 enables, larger values
    /// select an alternate.
    pub value: u32,
    /// The cluster to start applying this feature setting (inclusive).
    pub start: u32,
    /// The cluster to end applying this feature setting (exclusive).
    pub end: u32,
}

impl Feature {
    /// Create a new `Feature` struct.
    pub fn new(tag: Tag, value: u32, range: impl RangeBounds<usize>) -> Feature {
        let start = match range.start_bound() {
            Bound::Included(&included) => included as u32,
            Bound::Excluded(&excluded) => excluded as u32 + 1,
            Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            Bound::Included(&included) => included as u32 + 1,
            Bound::Excluded(&excluded) => excluded as u32,
            Bound::Unbounded => u32::MAX,
        };

        Feature {
            tag,
            value,
            start,
            end,
        }
    }

    #[inline]
    pub(crate) fn is_global(&self) -> bool {
        self.start == 0 && self.end == u32::MAX
    }
}

impl core::str::FromStr for Feature {
    type Err = ParseError;

    /// Parses a `Feature` from a string.
    ///
    /// Accepts the same syntax as HarfBuzz:
    ///
    /// ```text
    /// kern          enable kern everywhere
    /// +kern         same
    /// -kern         disable kern everywhere
    /// kern=0        same
    /// kern[5:]      enable kern from cluster 5 onwards
    /// aalt[3:5]=2   use the second alternate on clusters 3 and 4
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        fn parse(s: &str) -> Option<Feature> {
            if s.is_empty() {
                return None;
            }

            let mut p = TextParser::new(s);

            // Parse prefix.
            let mut value = 1;
            match p.curr_byte()? {
                b'-' => {
                    value = 0;
                    p.advance(1);
                }
                b'+' => {
                    value = 1;
                    p.advance(1);
                }
                _ => {}
            }

            // Parse tag.
            p.skip_spaces();
            let quote = p.consume_quote();

            let tag = p.consume_tag()?;

            // Force closing quote.
            if let Some(quote) = quote {
                p.consume_byte(quote)?;
            }

            // Parse indices.
            p.skip_spaces();

            let (start, end) = if p.consume_byte(b'[').is_some() {
                let start_opt = p.consume_i32();
                let start = start_opt.unwrap_or(0) as u32;

                let end = if matches!(p.curr_byte(), Some(b':') | Some(b';')) {
                    p.advance(1);
                    p.consume_i32().unwrap_or(-1) as u32
                } else if start_opt.is_some() && start != u32::MAX {
                    start + 1
                } else {
                    u32::MAX
                };

                p.consume_byte(b']')?;

                (start, end)
            } else {
                (0, u32::MAX)
            };

            // Parse postfix.
            let had_equal = p.consume_byte(b'=').is_some();
            let value1 = p
                .consume_i32()
                .or_else(|| p.consume_bool().map(|b| b as i32));

            if had_equal && value1.is_none() {
                return None;
            };

            if let Some(value1) = value1 {
                value = value1 as u32;
            }

            p.skip_spaces();

            if !p.at_end() {
                return None;
            }

            Some(Feature {
                tag,
                value,
                start,
                end,
            })
        }

        parse(s).ok_or(ParseError::Feature)
    }
}

/// A variation value.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Variation {
    /// The tag of the variation axis.
    pub tag: Tag,
    /// The value of the variation axis, in user space.
    pub value: f32,
}

impl core::str::FromStr for Variation {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        fn parse(s: &str) -> Option<Variation> {
            if s.is_empty() {
                return None;
            }

            let mut p = TextParser::new(s);

            p.skip_spaces();
            let quote = p.consume_quote();

            let tag = p.consume_tag()?;

            if let Some(quote) = quote {
                p.consume_byte(quote)?;
            }

            p.skip_spaces();
            let _ = p.consume_byte(b'=');
            p.skip_spaces();
            let value = p.consume_f32()?;
            p.skip_spaces();

            if !p.at_end() {
                return None;
            }

            Some(Variation { tag, value })
        }

        parse(s).ok_or(ParseError::Variation)
    }
}

#[cfg(test)]
mod tests_features {
    use super::*;
    use core::str::FromStr;

    macro_rules! test {
        ($name:ident, $text:expr, $tag:expr, $value:expr, $range:expr) => {
            #[test]
            fn $name() {
                assert_eq!(
                    Feature::from_str($text).unwrap(),
                    Feature::new(Tag::new($tag), $value, $range)
                );
            }
        };
    }

    test!(parse_01, "kern", b"kern", 1, ..);
    test!(parse_02, "+kern", b"kern", 1, ..);
    test!(parse_03, "-kern", b"kern", 0, ..);
    test!(parse_04, "kern=0", b"kern", 0, ..);
    test!(parse_05, "kern=1", b"kern", 1, ..);
    test!(parse_06, "kern=2", b"kern", 2, ..);
    test!(parse_07, "kern[]", b"kern", 1, ..);
    test!(parse_08, "kern[:]", b"kern", 1, ..);
    test!(parse_09, "kern[5:]", b"kern", 1, 5..);
    test!(parse_10, "kern[:5]", b"kern", 1, ..=4);
    test!(parse_11, "kern[3:5]", b"kern", 1, 3..=4);
    test!(parse_12, "kern[3]", b"kern", 1, 3..=3);
    test!(parse_13, "aalt[3:5]=2", b"aalt", 2, 3..=4);
    test!(parse_14, "kern=on", b"kern", 1, ..);
    test!(parse_15, "kern=off", b"kern", 0, ..);
    test!(parse_16, "\"liga\"", b"liga", 1, ..);
    test!(parse_17, "-'liga'", b"liga", 0, ..);
    test!(parse_18, "kern ", b"kern", 1, ..);

    #[test]
    fn parse_errors() {
        assert_eq!(Feature::from_str(""), Err(ParseError::Feature));
        assert_eq!(Feature::from_str("kern="), Err(ParseError::Feature));
        assert_eq!(Feature::from_str("kern[3:5"), Err(ParseError::Feature));
        assert_eq!(Feature::from_str("\"liga"), Err(ParseError::Feature));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::str::FromStr;

    #[test]
    fn short_tags_are_space_padded() {
        assert_eq!(tag_from_str_lossy("ss"), Tag::new(b"ss  "));
        assert_eq!(tag_from_str_lossy("kernel"), Tag::new(b"kern"));
        assert_eq!(tag_from_str_lossy("").to_u32(), 0);
    }

    #[test]
    fn direction_from_first_letter() {
        assert_eq!(Direction::from_str("ltr"), Ok(Direction::LeftToRight));
        assert_eq!(Direction::from_str("RTL"), Ok(Direction::RightToLeft));
        assert_eq!(Direction::from_str("t"), Ok(Direction::TopToBottom));
        assert_eq!(Direction::from_str("btt"), Ok(Direction::BottomToTop));
        assert!(Direction::from_str("xyz").is_err());
    }

    #[test]
    fn script_case_is_normalized() {
        assert_eq!(Script::from_str("arab"), Ok(script::ARABIC));
        assert_eq!(Script::from_str("LATN"), Ok(script::LATIN));
        assert_eq!(Script::from_str("Qaai"), Ok(script::INHERITED));
        assert!(Script::from_str("").is_err());
    }

    #[test]
    fn script_direction() {
        assert_eq!(
            Direction::from_script(script::HEBREW),
            Some(Direction::RightToLeft)
        );
        assert_eq!(
            Direction::from_script(script::THAI),
            Some(Direction::LeftToRight)
        );
        assert_eq!(Direction::from_script(script::RUNIC), None);
    }

    #[test]
    fn language_is_lowercased() {
        assert_eq!(Language::from_str("EN-us").unwrap().as_str(), "en-us");
        assert!(Language::from_str("").is_err());
    }

    #[test]
    fn parse_variation() {
        let v = Variation::from_str("wght=500").unwrap();
        assert_eq!(v.tag, Tag::new(b"wght"));
        assert_eq!(v.value, 500.0);

        let v = Variation::from_str("'wdth' 75.5").unwrap();
        assert_eq!(v.tag, Tag::new(b"wdth"));
        assert_eq!(v.value, 75.5);

        assert!(Variation::from_str("wght=").is_err());
    }
}
