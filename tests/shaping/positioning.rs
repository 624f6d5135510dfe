use std::str::FromStr;

use ot_shaper::{Face, Font, SerializeFlags, UnicodeBuffer, Variation};

use crate::font::{
    anchor, cursive_pos, device, fvar, gdef, gdef_with_variations, layout_table,
    ligature_subst, lookup, mark_attachment, mark_lig_pos, pair_pos_class,
    single_pos_with_device, variation_index, FontBuilder,
};
use crate::shape;

const SCRIPTS: [[u8; 4]; 2] = [*b"DFLT", *b"latn"];

fn shape_with_font(font: &Font, text: &str) -> String {
    let mut buffer = UnicodeBuffer::new();
    buffer.push_str(text);
    buffer.guess_segment_properties();
    ot_shaper::shape(font, &[], buffer).serialize(font, SerializeFlags::default())
}

#[test]
fn cursive_attachment() {
    let mut b = FontBuilder::new(1000);
    b.glyph(".notdef", None, 500);
    let a = b.glyph("a", Some(0x61), 600);
    let b_ = b.glyph("b", Some(0x62), 500);
    b.table(
        b"GPOS",
        layout_table(
            &SCRIPTS,
            &[(*b"curs", 0)],
            vec![lookup(
                3,
                0,
                vec![cursive_pos(&[
                    (a, None, Some((500, 100))),
                    (b_, Some((50, 0)), None),
                ])],
            )],
        ),
    );
    let font = b.build();

    // The exit of `a` meets the entry of `b`.
    assert_eq!(shape(&font, "ab", ""), "a=0+500|b=1@-50,100+450");
    assert_eq!(shape(&font, "ba", ""), "b=0+500|a=1+600");
}

#[test]
fn mark_to_ligature() {
    let mut b = FontBuilder::new(1000);
    b.glyph(".notdef", None, 500);
    let f = b.glyph("f", Some(0x66), 300);
    let i = b.glyph("i", Some(0x69), 250);
    let f_i = b.glyph("f_i", None, 500);
    let acute = b.glyph("acutecomb", Some(0x301), 200);
    b.table(
        b"GDEF",
        gdef(&[(f, i, 1), (f_i, f_i, 2), (acute, acute, 3)]),
    );
    b.table(
        b"GSUB",
        layout_table(
            &SCRIPTS,
            &[(*b"liga", 0)],
            vec![lookup(4, 0x0008, vec![ligature_subst(&[f, i], f_i)])],
        ),
    );
    b.table(
        b"GPOS",
        layout_table(
            &SCRIPTS,
            &[(*b"mark", 0)],
            vec![lookup(
                5,
                0,
                vec![mark_lig_pos(
                    &[(acute, 50, 500)],
                    &[(f_i, &[(100, 600), (400, 600)])],
                )],
            )],
        ),
    );
    let font = b.build();

    // The mark follows the component it was typed after.
    assert_eq!(
        shape(&font, "f\u{0301}i", ""),
        "f_i=0+500|acutecomb=0@-450,100+0"
    );
    assert_eq!(
        shape(&font, "fi\u{0301}", ""),
        "f_i=0+500|acutecomb=0@-150,100+0"
    );
}

#[test]
fn mark_to_mark() {
    let mut b = FontBuilder::new(1000);
    b.glyph(".notdef", None, 500);
    let cap_a = b.glyph("A", Some(0x41), 600);
    let acute = b.glyph("acutecomb", Some(0x301), 200);
    let grave = b.glyph("gravecomb", Some(0x300), 200);
    b.table(
        b"GDEF",
        gdef(&[(cap_a, cap_a, 1), (acute, grave, 3)]),
    );
    b.table(
        b"GPOS",
        layout_table(
            &SCRIPTS,
            &[(*b"mark", 0), (*b"mkmk", 1)],
            vec![
                lookup(
                    4,
                    0,
                    vec![mark_attachment(
                        &[(acute, anchor(100, 500))],
                        &[(cap_a, anchor(300, 700))],
                    )],
                ),
                lookup(
                    6,
                    0,
                    vec![mark_attachment(
                        &[(grave, anchor(100, 500))],
                        &[(acute, anchor(100, 800))],
                    )],
                ),
            ],
        ),
    );
    let font = b.build();

    assert_eq!(
        shape(&font, "A\u{0301}\u{0300}", ""),
        "A=0+600|acutecomb=0@-400,200+0|gravecomb=0@-400,500+0"
    );
}

#[test]
fn pair_adjustment_by_class() {
    let mut b = FontBuilder::new(1000);
    b.glyph(".notdef", None, 500);
    let cap_a = b.glyph("A", Some(0x41), 600);
    let cap_v = b.glyph("V", Some(0x56), 600);
    let cap_w = b.glyph("W", Some(0x57), 600);
    b.table(
        b"GPOS",
        layout_table(
            &SCRIPTS,
            &[(*b"kern", 0)],
            vec![lookup(
                2,
                0,
                vec![pair_pos_class(
                    &[(cap_a, cap_a, 1)],
                    &[(cap_v, cap_w, 1)],
                    &[&[0, 0], &[0, -80]],
                )],
            )],
        ),
    );
    let font = b.build();

    assert_eq!(
        shape(&font, "AVAW", ""),
        "A=0+520|V=1+600|A=2+520|W=3+600"
    );
    assert_eq!(shape(&font, "AA", ""), "A=0+600|A=1+600");
    assert_eq!(shape(&font, "VA", ""), "V=0+600|A=1+600");
}

#[test]
fn hinting_device_needs_ppem() {
    let mut b = FontBuilder::new(1000);
    b.glyph(".notdef", None, 500);
    let cap_a = b.glyph("A", Some(0x41), 600);
    b.table(
        b"GPOS",
        layout_table(
            &SCRIPTS,
            &[(*b"kern", 0)],
            vec![lookup(
                1,
                0,
                vec![single_pos_with_device(&[cap_a], 0, device(12, &[3]))],
            )],
        ),
    );
    let data = b.build();
    let face = Face::from_slice(&data, 0).unwrap();

    let mut font = Font::new(&face);
    assert_eq!(shape_with_font(&font, "A"), "A=0+600");

    // Three pixels at 12 ppem, in a 1000 unit em.
    font.set_ppem(12, 12);
    assert_eq!(shape_with_font(&font, "A"), "A=0+850");

    // Sizes outside the table get nothing.
    font.set_ppem(13, 13);
    assert_eq!(shape_with_font(&font, "A"), "A=0+600");
}

#[test]
fn variation_delta_follows_axis() {
    let mut b = FontBuilder::new(1000);
    b.glyph(".notdef", None, 500);
    let cap_a = b.glyph("A", Some(0x41), 600);
    b.table(b"fvar", fvar(*b"wght", 100, 900));
    b.table(
        b"GDEF",
        gdef_with_variations(&[(cap_a, cap_a, 1)], &[100]),
    );
    b.table(
        b"GPOS",
        layout_table(
            &SCRIPTS,
            &[(*b"kern", 0)],
            vec![lookup(
                1,
                0,
                vec![single_pos_with_device(&[cap_a], 0, variation_index(0, 0))],
            )],
        ),
    );
    let data = b.build();
    let face = Face::from_slice(&data, 0).unwrap();

    let mut font = Font::new(&face);
    assert_eq!(shape_with_font(&font, "A"), "A=0+600");

    font.set_variations(&[Variation::from_str("wght=900").unwrap()]);
    assert_eq!(shape_with_font(&font, "A"), "A=0+700");

    font.set_variations(&[Variation::from_str("wght=500").unwrap()]);
    assert_eq!(shape_with_font(&font, "A"), "A=0+650");
}
