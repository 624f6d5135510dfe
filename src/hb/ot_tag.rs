//! Conversion of scripts and BCP 47 languages to OpenType tags.

use smallvec::SmallVec;

use super::common::{hb_tag_t, script, Language, Script, TagExt};

pub type TagList = SmallVec<[hb_tag_t; 3]>;

/// Returns the OpenType script tags, in order of preference, and the
/// language system tags for a script and language pair.
pub fn tags_from_script_and_language(
    script: Option<Script>,
    language: Option<&Language>,
) -> (TagList, TagList) {
    let mut script_tags = TagList::new();
    let mut language_tags = TagList::new();
    let mut needs_script = true;

    if let Some(language) = language {
        let lang_str = language.as_str();
        let (primary, private_use) = split_private_use(lang_str);

        if let Some(private_use) = private_use {
            if let Some(tag) = parse_private_use_subtag(private_use, "-hbsc", false) {
                script_tags.push(tag);
                needs_script = false;
            }

            if let Some(tag) = parse_private_use_subtag(private_use, "-hbot", true) {
                language_tags.push(tag);
            }
        }

        if language_tags.is_empty() {
            tags_from_language(primary, &mut language_tags);
        }
    }

    if needs_script {
        all_tags_from_script(script, &mut script_tags);
    }

    (script_tags, language_tags)
}

// Splits `lang` into the part before a private use subtag and the subtag.
fn split_private_use(lang: &str) -> (&str, Option<&str>) {
    if lang.starts_with("x-") {
        return ("", Some(lang));
    }

    match lang.find("-x-") {
        Some(index) => (&lang[..index], Some(&lang[index..])),
        None => (lang, None),
    }
}

fn parse_private_use_subtag(subtag: &str, prefix: &str, uppercase: bool) -> Option<hb_tag_t> {
    let start = subtag.find(prefix)? + prefix.len();
    let rest = subtag.get(start..)?;

    let mut tag = [b' '; 4];
    if let Some(hex) = rest.strip_prefix('-') {
        // -hbot-AABBCCDD form.
        let hex = hex.get(..8)?;
        let value = u32::from_str_radix(hex, 16).ok()?;
        tag = value.to_be_bytes();
    } else {
        let len = rest
            .bytes()
            .take(4)
            .take_while(u8::is_ascii_alphanumeric)
            .count();
        if len == 0 {
            return None;
        }

        for (dst, src) in tag.iter_mut().zip(rest.bytes().take(len)) {
            *dst = if uppercase {
                src.to_ascii_uppercase()
            } else {
                src.to_ascii_lowercase()
            };
        }
    }

    let tag = hb_tag_t::new(&tag);
    // `DFLT` is never a language or a lowercase script.
    if tag.to_uppercase() == hb_tag_t::default_script() {
        return Some(hb_tag_t::default_script());
    }

    Some(tag)
}

fn tags_from_language(lang: &str, tags: &mut TagList) {
    if lang.is_empty() {
        return;
    }

    if let Some(tag) = tag_from_complex_language(lang) {
        tags.push(tag);
        return;
    }

    let mut subtags = lang.split('-');
    let mut primary = subtags.next().unwrap_or_default();

    // If there is an extended language subtag, use it.
    if let Some(extlang) = subtags.next() {
        if extlang.len() == 3 && extlang.bytes().all(|c| c.is_ascii_alphabetic()) {
            primary = extlang;
        }
    }

    if let Ok(index) = LANGUAGES.binary_search_by(|(language, _)| language.cmp(&primary)) {
        let mut first = index;
        while first > 0 && LANGUAGES[first - 1].0 == primary {
            first -= 1;
        }

        tags.extend(
            LANGUAGES[first..]
                .iter()
                .take_while(|(language, _)| *language == primary)
                .take(tags.inline_size())
                .map(|(_, tag)| hb_tag_t::new(tag)),
        );
        return;
    }

    // Assume it's ISO 639-3 and upper-case it.
    if primary.len() == 3 && primary.bytes().all(|c| c.is_ascii_alphabetic()) {
        let b = primary.as_bytes();
        tags.push(hb_tag_t::new(&[
            b[0].to_ascii_uppercase(),
            b[1].to_ascii_uppercase(),
            b[2].to_ascii_uppercase(),
            b' ',
        ]));
    }
}

// Languages whose tag depends on more than the primary subtag.
fn tag_from_complex_language(lang: &str) -> Option<hb_tag_t> {
    let mut subtags = lang.split('-');
    if subtags.next()? != "zh" {
        return None;
    }

    let mut tag = b"ZHS ";
    for subtag in subtags {
        match subtag {
            "hk" | "mo" => return Some(hb_tag_t::new(b"ZHH ")),
            "tw" | "hant" => tag = b"ZHT ",
            _ => {}
        }
    }

    Some(hb_tag_t::new(tag))
}

fn all_tags_from_script(script: Option<Script>, tags: &mut TagList) {
    let Some(script) = script else {
        return;
    };

    if let Some(new_tag) = new_tag_from_script(script) {
        // Myanmar maps to 'mym2', but there is no 'mym3'.
        if new_tag != hb_tag_t::new(b"mym2") {
            let mut bytes = new_tag.to_be_bytes();
            bytes[3] = b'3';
            tags.push(hb_tag_t::new(&bytes));
        }

        tags.push(new_tag);
    }

    if let Some(old_tag) = old_tag_from_script(script) {
        tags.push(old_tag);
    }
}

fn new_tag_from_script(script: Script) -> Option<hb_tag_t> {
    let tag = match script {
        script::BENGALI => b"bng2",
        script::DEVANAGARI => b"dev2",
        script::GUJARATI => b"gjr2",
        script::GURMUKHI => b"gur2",
        script::KANNADA => b"knd2",
        script::MALAYALAM => b"mlm2",
        script::ORIYA => b"ory2",
        script::TAMIL => b"tml2",
        script::TELUGU => b"tel2",
        script::MYANMAR => b"mym2",
        _ => return None,
    };

    Some(hb_tag_t::new(tag))
}

fn old_tag_from_script(script: Script) -> Option<hb_tag_t> {
    let tag = match &script.tag().to_be_bytes() {
        // KATAKANA and HIRAGANA both map to 'kana'.
        b"Hira" => *b"kana",
        // Spaces at the end are preserved, unlike ISO 15924.
        b"Laoo" => *b"lao ",
        b"Yiii" => *b"yi  ",
        b"Nkoo" => *b"nko ",
        b"Vaii" => *b"vai ",
        b"Zyyy" | b"Zinh" | b"Zzzz" => return None,
        // Else, just change the first char to lowercase.
        bytes => {
            let mut bytes = *bytes;
            bytes[0] = bytes[0].to_ascii_lowercase();
            bytes
        }
    };

    Some(hb_tag_t::new(&tag))
}

/// Returns the script matching an OpenType script tag.
pub fn tag_to_script(tag: hb_tag_t) -> Option<Script> {
    let bytes = tag.to_be_bytes();
    if matches!(bytes[3], b'2' | b'3') {
        let mut new_tag = bytes;
        new_tag[3] = b'2';
        return [
            script::BENGALI,
            script::DEVANAGARI,
            script::GUJARATI,
            script::GURMUKHI,
            script::KANNADA,
            script::MALAYALAM,
            script::ORIYA,
            script::TAMIL,
            script::TELUGU,
            script::MYANMAR,
        ]
        .into_iter()
        .find(|&script| new_tag_from_script(script) == Some(hb_tag_t::new(&new_tag)));
    }

    if tag == hb_tag_t::default_script() {
        return None;
    }

    // Trailing spaces are replaced by repeating the last letter, 'nko ' -> 'Nkoo'.
    let mut bytes = bytes;
    if bytes[2] == b' ' {
        bytes[2] = bytes[1];
    }
    if bytes[3] == b' ' {
        bytes[3] = bytes[2];
    }
    bytes[0] = bytes[0].to_ascii_uppercase();
    Script::from_iso15924_tag(hb_tag_t::new(&bytes))
}

// Sorted by language.
const LANGUAGES: &[(&str, &[u8; 4])] = &[
    ("af", b"AFK "),
    ("am", b"AMH "),
    ("ar", b"ARA "),
    ("as", b"ASM "),
    ("az", b"AZE "),
    ("be", b"BEL "),
    ("bg", b"BGR "),
    ("bn", b"BEN "),
    ("bo", b"TIB "),
    ("br", b"BRE "),
    ("bs", b"BOS "),
    ("ca", b"CAT "),
    ("cs", b"CSY "),
    ("cy", b"WEL "),
    ("da", b"DAN "),
    ("de", b"DEU "),
    ("dv", b"DIV "),
    ("dz", b"DZN "),
    ("el", b"ELL "),
    ("en", b"ENG "),
    ("eo", b"NTO "),
    ("es", b"ESP "),
    ("et", b"ETI "),
    ("eu", b"EUQ "),
    ("fa", b"FAR "),
    ("fi", b"FIN "),
    ("fo", b"FOS "),
    ("fr", b"FRA "),
    ("ga", b"IRI "),
    ("gd", b"GAE "),
    ("gl", b"GAL "),
    ("gu", b"GUJ "),
    ("ha", b"HAU "),
    ("he", b"IWR "),
    ("hi", b"HIN "),
    ("hr", b"HRV "),
    ("hu", b"HUN "),
    ("hy", b"HYE0"),
    ("hy", b"HYE "),
    ("id", b"IND "),
    ("ig", b"IGB "),
    ("is", b"ISL "),
    ("it", b"ITA "),
    ("ja", b"JAN "),
    ("jv", b"JAV "),
    ("ka", b"KAT "),
    ("kk", b"KAZ "),
    ("km", b"KHM "),
    ("kn", b"KAN "),
    ("ko", b"KOR "),
    ("ku", b"KUR "),
    ("ky", b"KIR "),
    ("la", b"LAT "),
    ("lo", b"LAO "),
    ("lt", b"LTH "),
    ("lv", b"LVI "),
    ("mk", b"MKD "),
    ("ml", b"MAL "),
    ("ml", b"MLR "),
    ("mn", b"MNG "),
    ("mr", b"MAR "),
    ("ms", b"MLY "),
    ("mt", b"MTS "),
    ("my", b"BRM "),
    ("ne", b"NEP "),
    ("nl", b"NLD "),
    ("no", b"NOR "),
    ("or", b"ORI "),
    ("pa", b"PAN "),
    ("pl", b"PLK "),
    ("ps", b"PAS "),
    ("pt", b"PTG "),
    ("ro", b"ROM "),
    ("ru", b"RUS "),
    ("sa", b"SAN "),
    ("sd", b"SND "),
    ("si", b"SNH "),
    ("sk", b"SKY "),
    ("sl", b"SLV "),
    ("so", b"SML "),
    ("sq", b"SQI "),
    ("sr", b"SRB "),
    ("sv", b"SVE "),
    ("sw", b"SWK "),
    ("ta", b"TAM "),
    ("te", b"TEL "),
    ("tg", b"TAJ "),
    ("th", b"THA "),
    ("ti", b"TGY "),
    ("tk", b"TKM "),
    ("tl", b"TGL "),
    ("tr", b"TRK "),
    ("ug", b"UYG "),
    ("uk", b"UKR "),
    ("ur", b"URD "),
    ("uz", b"UZB "),
    ("vi", b"VIT "),
    ("yi", b"JII "),
    ("yo", b"YBA "),
    ("zu", b"ZUL "),
];

#[cfg(test)]
mod tests {
    use super::*;
    use core::str::FromStr;

    fn tags(script: Option<Script>, lang: &str) -> (TagList, TagList) {
        let lang = Language::from_str(lang).ok();
        tags_from_script_and_language(script, lang.as_ref())
    }

    fn tag(bytes: &[u8; 4]) -> hb_tag_t {
        hb_tag_t::new(bytes)
    }

    #[test]
    fn language_table_is_sorted() {
        assert!(LANGUAGES.windows(2).all(|w| w[0].0 <= w[1].0));
    }

    #[test]
    fn indic_scripts_prefer_new_tags() {
        let (scripts, _) = tags_from_script_and_language(Some(script::DEVANAGARI), None);
        assert_eq!(scripts.as_slice(), &[tag(b"dev3"), tag(b"dev2"), tag(b"deva")]);

        let (scripts, _) = tags_from_script_and_language(Some(script::MYANMAR), None);
        assert_eq!(scripts.as_slice(), &[tag(b"mym2"), tag(b"mymr")]);
    }

    #[test]
    fn old_tags() {
        let (scripts, _) = tags_from_script_and_language(Some(script::LAO), None);
        assert_eq!(scripts.as_slice(), &[tag(b"lao ")]);
        let (scripts, _) = tags_from_script_and_language(Some(script::HIRAGANA), None);
        assert_eq!(scripts.as_slice(), &[tag(b"kana")]);
        let (scripts, _) = tags_from_script_and_language(Some(script::COMMON), None);
        assert!(scripts.is_empty());
    }

    #[test]
    fn languages() {
        assert_eq!(tags(None, "en-US").1.as_slice(), &[tag(b"ENG ")]);
        assert_eq!(tags(None, "fa").1.as_slice(), &[tag(b"FAR ")]);
        assert_eq!(tags(None, "hy").1.as_slice(), &[tag(b"HYE0"), tag(b"HYE ")]);
        assert_eq!(tags(None, "zh-Hant").1.as_slice(), &[tag(b"ZHT ")]);
        assert_eq!(tags(None, "zh-HK").1.as_slice(), &[tag(b"ZHH ")]);
        assert_eq!(tags(None, "zh").1.as_slice(), &[tag(b"ZHS ")]);
        // Unknown three letter codes are assumed to be ISO 639-3.
        assert_eq!(tags(None, "xyz").1.as_slice(), &[tag(b"XYZ ")]);
        assert!(tags(None, "qq").1.is_empty());
    }

    #[test]
    fn private_use_subtags() {
        let (scripts, langs) = tags(Some(script::LATIN), "x-hbscabc-hbotdef");
        assert_eq!(scripts.as_slice(), &[tag(b"abc ")]);
        assert_eq!(langs.as_slice(), &[tag(b"DEF ")]);

        let (scripts, langs) = tags(Some(script::LATIN), "fr-x-hbot-41424344");
        assert_eq!(scripts.as_slice(), &[tag(b"latn")]);
        assert_eq!(langs.as_slice(), &[tag(b"ABCD")]);
    }

    #[test]
    fn tags_back_to_scripts() {
        assert_eq!(tag_to_script(tag(b"dev3")), Some(script::DEVANAGARI));
        assert_eq!(tag_to_script(tag(b"mym2")), Some(script::MYANMAR));
        assert_eq!(tag_to_script(tag(b"nko ")), Some(script::NKO));
        assert_eq!(tag_to_script(tag(b"arab")), Some(script::ARABIC));
        assert_eq!(tag_to_script(tag(b"DFLT")), None);
    }
}
