//! Complex shapers on fonts with only a `cmap`, where all the work is the
//! shaper's own reordering, composition and fallback.

use crate::font::{layout_table, lookup, multiple_subst, FontBuilder};
use crate::shape;

fn cmap_font(glyphs: &[(&'static str, u32)]) -> Vec<u8> {
    let mut b = FontBuilder::new(1000);
    b.glyph(".notdef", None, 500);
    for &(name, codepoint) in glyphs {
        b.glyph(name, Some(codepoint), 500);
    }
    b.build()
}

#[test]
fn indic_pre_base_matra() {
    let font = cmap_font(&[("ka", 0x0915), ("imatra", 0x093F), ("dottedcircle", 0x25CC)]);
    assert_eq!(
        shape(&font, "\u{0915}\u{093F}", "--no-positions"),
        "imatra=0|ka=0"
    );
}

#[test]
fn indic_broken_cluster_gets_dotted_circle() {
    let font = cmap_font(&[("ka", 0x0915), ("imatra", 0x093F), ("dottedcircle", 0x25CC)]);
    assert_eq!(
        shape(&font, "\u{093F}", "--no-positions"),
        "imatra=0|dottedcircle=0"
    );
}

#[test]
fn khmer_pre_base_vowel() {
    let font = cmap_font(&[("ka", 0x1780), ("e", 0x17C1)]);
    assert_eq!(
        shape(&font, "\u{1780}\u{17C1}", "--no-positions"),
        "e=0|ka=0"
    );
}

#[test]
fn khmer_coeng_ro_moves_first() {
    let font = cmap_font(&[("ka", 0x1780), ("ro", 0x179A), ("coeng", 0x17D2)]);
    assert_eq!(
        shape(&font, "\u{1780}\u{17D2}\u{179A}", "--no-positions"),
        "coeng=0|ro=0|ka=0"
    );
}

#[test]
fn myanmar_pre_base_vowel() {
    let font = cmap_font(&[("ka", 0x1000), ("e", 0x1031)]);
    assert_eq!(
        shape(&font, "\u{1000}\u{1031}", "--no-positions"),
        "e=0|ka=0"
    );
}

#[test]
fn use_pre_base_vowel() {
    // Buginese KA and vowel sign E.
    let font = cmap_font(&[("ka", 0x1A00), ("e", 0x1A19)]);
    assert_eq!(
        shape(&font, "\u{1A00}\u{1A19}", "--no-positions"),
        "e=0|ka=0"
    );
}

#[test]
fn hangul_jamo_compose() {
    let font = cmap_font(&[("kiyeok", 0x1100), ("a", 0x1161), ("ga", 0xAC00)]);
    assert_eq!(shape(&font, "\u{1100}\u{1161}", "--no-positions"), "ga=0");

    // Without the syllable glyph the jamo stay apart.
    let font = cmap_font(&[("kiyeok", 0x1100), ("a", 0x1161)]);
    assert_eq!(
        shape(&font, "\u{1100}\u{1161}", "--no-positions"),
        "kiyeok=0|a=0"
    );
}

#[test]
fn thai_sara_am_decomposes() {
    let font = cmap_font(&[
        ("kokai", 0x0E01),
        ("saraaa", 0x0E32),
        ("saraam", 0x0E33),
        ("nikhahit", 0x0E4D),
    ]);
    assert_eq!(
        shape(&font, "\u{0E01}\u{0E33}", "--no-positions"),
        "kokai=0|nikhahit=0|saraaa=0"
    );
}

#[test]
fn arabic_lam_alef_across_mark() {
    let font = cmap_font(&[
        ("alef", 0x0627),
        ("lam", 0x0644),
        ("fatha", 0x064E),
        ("alef.fina", 0xFE8E),
        ("lam.init", 0xFEDF),
        ("lamalef", 0xFEFB),
    ]);
    assert_eq!(
        shape(&font, "\u{0644}\u{064E}\u{0627}", "--no-positions"),
        "fatha=0|lamalef=0"
    );
    assert_eq!(
        shape(&font, "\u{0644}\u{0627}", "--no-positions"),
        "lamalef=0"
    );
}

#[test]
fn arabic_stretch_fills_word() {
    let mut b = FontBuilder::new(1000);
    b.glyph(".notdef", None, 500);
    let _beh = b.glyph("beh", Some(0x0628), 500);
    let abbr = b.glyph("abbr", Some(0x070F), 0);
    let start = b.glyph("stch.a", None, 100);
    let middle = b.glyph("stch.r", None, 100);
    let end = b.glyph("stch.b", None, 100);
    b.table(
        b"GSUB",
        layout_table(
            &[*b"DFLT", *b"arab"],
            &[(*b"stch", 0)],
            vec![lookup(
                2,
                0,
                vec![multiple_subst(&[(abbr, &[start, middle, end])])],
            )],
        ),
    );
    let font = b.build();

    // The word is 1000 wide; the two fixed tiles take 200 and the repeating
    // one is drawn eight times.
    assert_eq!(
        shape(
            &font,
            "\u{070F}\u{0628}\u{0628}",
            "--script=arab --direction=rtl"
        ),
        "beh=4+500|beh=2+500|\
         stch.b=0@-1000,0+100|\
         stch.r=0@-900,0+100|stch.r=0@-800,0+100|stch.r=0@-700,0+100|\
         stch.r=0@-600,0+100|stch.r=0@-500,0+100|stch.r=0@-400,0+100|\
         stch.r=0@-300,0+100|stch.r=0@-200,0+100|\
         stch.a=0@-100,0+100"
    );

    // Without stch nothing is repeated.
    assert_eq!(
        shape(
            &font,
            "\u{070F}\u{0628}\u{0628}",
            "--script=arab --direction=rtl --features=-stch --no-positions"
        ),
        "beh=4|beh=2|abbr=0"
    );
}
