use crate::{shape, test_font};

use std::str::FromStr;

use ot_shaper::{
    Direction, Face, FaceError, Feature, Font, ShapePlan, ShapePlanKey, UnicodeBuffer,
};

#[test]
fn ligature_1() {
    assert_eq!(shape(&test_font(), "fi", "--no-glyph-names"), "4=0+500");
}

#[test]
fn ligature_2() {
    assert_eq!(shape(&test_font(), "fi", ""), "f_i=0+500");
}

#[test]
fn ligature_disabled() {
    assert_eq!(
        shape(&test_font(), "fi", "--features=-liga"),
        "f=0+300|i=1+250"
    );
}

#[test]
fn mark_attachment() {
    assert_eq!(
        shape(&test_font(), "A\u{0301}", "--no-glyph-names"),
        "5=0+600|6=0@-400,200+0"
    );
}

#[test]
fn arabic_joining() {
    assert_eq!(
        shape(&test_font(), "\u{0643}\u{062A}\u{0628}", ""),
        "beh.fina=4+320|teh.medi=2+310|kaf.init=0+300"
    );
}

#[test]
fn arabic_isolated() {
    assert_eq!(
        shape(&test_font(), "\u{0643} \u{0628}", "--no-glyph-names"),
        "20=3+420|1=2+250|18=0+400"
    );
}

#[test]
fn fraction_slash() {
    assert_eq!(
        shape(&test_font(), "1\u{2044}2", "--no-glyph-names"),
        "12=0+350|14=1+80|13=4+350"
    );
}

#[test]
fn ascii_slash_is_not_a_fraction() {
    assert_eq!(
        shape(&test_font(), "1/2", "--no-glyph-names"),
        "8=0+500|10=1+300|9=2+500"
    );
}

#[test]
fn ascii_slash_with_user_frac() {
    assert_eq!(
        shape(&test_font(), "1/2", "--no-glyph-names --features=frac"),
        "12=0+350|14=1+80|13=2+350"
    );
}

#[test]
fn dotted_circle_at_beginning_of_text() {
    assert_eq!(
        shape(&test_font(), "\u{0301}", "--no-glyph-names --bot"),
        "7=0+500|6=0@-350,200+0"
    );
}

#[test]
fn no_dotted_circle_mid_text() {
    assert_eq!(shape(&test_font(), "\u{0301}", "--no-glyph-names"), "6=0+0");
}

#[test]
fn no_dotted_circle_with_pre_context() {
    assert_eq!(
        shape(
            &test_font(),
            "\u{0301}",
            "--no-glyph-names --bot --unicodes-before=U+0041"
        ),
        "6=0+0"
    );
}

#[test]
fn zwj_does_not_block_auto_joiner_lookups() {
    assert_eq!(
        shape(&test_font(), "a\u{200D}b", ""),
        "a.alt=0+500|space=0+0|b=4+500"
    );
}

#[test]
fn zwj_blocks_manual_joiner_lookups() {
    assert_eq!(
        shape(
            &test_font(),
            "a\u{200D}b",
            "--no-glyph-names --script=arab --direction=rtl"
        ),
        "16=4+500|1=0+0|15=0+500"
    );
}

#[test]
fn remove_default_ignorables() {
    assert_eq!(
        shape(
            &test_font(),
            "a\u{200D}b",
            "--no-glyph-names --remove-default-ignorables"
        ),
        "17=0+500|16=4+500"
    );
}

#[test]
fn kerning() {
    assert_eq!(
        shape(&test_font(), "AA", "--no-glyph-names"),
        "5=0+550|5=1+600"
    );
}

#[test]
fn kerning_disabled() {
    assert_eq!(
        shape(&test_font(), "AA", "--no-glyph-names --features=-kern"),
        "5=0+600|5=1+600"
    );
}

#[test]
fn kerning_range() {
    assert_eq!(
        shape(&test_font(), "AAA", "--no-glyph-names --features=-kern[2:]"),
        "5=0+550|5=1+600|5=2+600"
    );
}

#[test]
fn serialize_without_positions() {
    assert_eq!(shape(&test_font(), "fiA", "--no-positions"), "f_i=0|A=2");
}

#[test]
fn serialize_without_clusters() {
    assert_eq!(shape(&test_font(), "fiA", "--no-clusters"), "f_i+500|A+600");
}

#[test]
fn unmapped_character() {
    assert_eq!(shape(&test_font(), "x", ""), ".notdef=0+500");
}

#[test]
fn empty_text() {
    assert_eq!(shape(&test_font(), "", ""), "");
}

#[test]
fn reused_plan() {
    let data = test_font();
    let face = Face::from_slice(&data, 0).unwrap();
    let font = Font::new(&face);
    let plan = ShapePlan::new(
        &font,
        Direction::LeftToRight,
        Some(ot_shaper::script::LATIN),
        None,
        &[],
    );

    let mut buffer = UnicodeBuffer::new();
    for text in ["fi", "AA"] {
        buffer.push_str(text);
        buffer.set_direction(Direction::LeftToRight);
        buffer.set_script(ot_shaper::script::LATIN);
        let glyphs = ot_shaper::shape_with_plan(&font, &plan, &[], buffer);
        let expected = if text == "fi" { "4=0+500" } else { "5=0+550|5=1+600" };
        assert_eq!(
            glyphs.serialize(&font, ot_shaper::SerializeFlags::NO_GLYPH_NAMES),
            expected
        );
        buffer = glyphs.clear();
    }
}

#[test]
fn plan_key_selects_cached_plan() {
    let data = test_font();
    let face = Face::from_slice(&data, 0).unwrap();
    let font = Font::new(&face);
    let features = [Feature::from_str("-kern[2:4]").unwrap()];
    let plan = ShapePlan::new(
        &font,
        Direction::LeftToRight,
        Some(ot_shaper::script::LATIN),
        None,
        &features,
    );

    let other_range = [Feature::from_str("-kern[5:]").unwrap()];
    let key = ShapePlanKey::new(Some(ot_shaper::script::LATIN), Direction::LeftToRight)
        .font(&font)
        .features(&other_range);
    assert!(key.matches(&plan));

    let rtl = ShapePlanKey::new(Some(ot_shaper::script::LATIN), Direction::RightToLeft)
        .font(&font)
        .features(&features);
    assert!(!rtl.matches(&plan));

    let no_features =
        ShapePlanKey::new(Some(ot_shaper::script::LATIN), Direction::LeftToRight).font(&font);
    assert!(!no_features.matches(&plan));
}

#[test]
fn malformed_font() {
    assert!(matches!(
        Face::from_slice(b"not a font", 0),
        Err(FaceError::Malformed(_))
    ));
}

#[test]
fn face_index_out_of_range() {
    let data = test_font();
    assert!(matches!(
        Face::from_slice(&data, 1),
        Err(FaceError::IndexOutOfRange(1))
    ));
}
