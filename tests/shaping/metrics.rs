use ot_shaper::{Face, Font, GlyphExtents, GlyphId};

use crate::font::{anchor, anchor_point, gdef, layout_table, lookup, mark_attachment, vorg, FontBuilder};
use crate::shape;

const SCRIPTS: [[u8; 4]; 2] = [*b"DFLT", *b"latn"];

const BOX: [(i16, i16); 4] = [(50, 0), (550, 0), (550, 700), (50, 700)];

/// `.notdef` and a 600 unit wide `box` glyph with a rectangular outline,
/// mapped from `x`.
fn box_font() -> FontBuilder {
    let mut b = FontBuilder::new(1000);
    b.glyph(".notdef", None, 500);
    let gid = b.glyph("box", Some(0x78), 600);
    b.outline(gid, &BOX);
    b
}

const BOX_GID: GlyphId = GlyphId::new(1);

#[test]
fn extents_from_glyf() {
    let data = box_font().build();
    let face = Face::from_slice(&data, 0).unwrap();
    let font = Font::new(&face);
    assert_eq!(
        font.glyph_extents(BOX_GID),
        Some(GlyphExtents {
            x_bearing: 50,
            y_bearing: 700,
            width: 500,
            height: -700,
        })
    );
    // An empty glyph has empty extents.
    assert_eq!(
        font.glyph_extents(GlyphId::new(0)),
        Some(GlyphExtents::default())
    );
}

#[test]
fn origins_without_vertical_metrics() {
    let data = box_font().build();
    let face = Face::from_slice(&data, 0).unwrap();
    let font = Font::new(&face);
    assert_eq!(font.glyph_h_origin(BOX_GID), (0, 0));
    // Half the advance across, the ascender up.
    assert_eq!(font.glyph_v_origin(BOX_GID), (300, 800));
}

#[test]
fn origins_from_vmtx() {
    let mut b = box_font();
    b.vertical_metrics(1, 1000, 150);
    let data = b.build();
    let face = Face::from_slice(&data, 0).unwrap();
    let font = Font::new(&face);
    // The top side bearing sits above the outline top at 700.
    assert_eq!(font.glyph_v_origin(BOX_GID), (300, 850));
    // The horizontal origin is synthesized from the vertical one.
    assert_eq!(font.glyph_h_origin(BOX_GID), (0, 50));
}

#[test]
fn origins_from_vorg() {
    let mut b = box_font();
    b.vertical_metrics(1, 1000, 150);
    b.table(b"VORG", vorg(880, &[]));
    let data = b.build();
    let face = Face::from_slice(&data, 0).unwrap();
    let font = Font::new(&face);
    assert_eq!(font.glyph_v_origin(BOX_GID), (300, 880));
    assert_eq!(font.glyph_h_origin(BOX_GID), (0, 80));

    assert_eq!(
        shape(&data, "x", "--direction=ttb"),
        "box=0@-300,-880+0,-1000"
    );
}

#[test]
fn scaled_advances() {
    let data = box_font().build();
    let face = Face::from_slice(&data, 0).unwrap();
    let mut font = Font::new(&face);
    font.set_scale(2000, 2000);

    let mut buffer = ot_shaper::UnicodeBuffer::new();
    buffer.push_str("xx");
    buffer.guess_segment_properties();
    let glyphs = ot_shaper::shape(&font, &[], buffer);
    let advances: Vec<i32> = glyphs.glyph_positions().iter().map(|p| p.x_advance).collect();
    assert_eq!(advances, [1200, 1200]);
    assert_eq!(
        font.glyph_extents(BOX_GID).map(|e| e.width),
        Some(1000)
    );
}

fn anchor_point_font() -> Vec<u8> {
    let mut b = FontBuilder::new(1000);
    b.glyph(".notdef", None, 500);
    let cap_a = b.glyph("A", Some(0x41), 600);
    let acute = b.glyph("acutecomb", Some(0x301), 200);
    b.outline(cap_a, &BOX);
    b.table(b"GDEF", gdef(&[(cap_a, cap_a, 1), (acute, acute, 3)]));
    b.table(
        b"GPOS",
        layout_table(
            &SCRIPTS,
            &[(*b"mark", 0)],
            vec![lookup(
                4,
                0,
                vec![mark_attachment(
                    &[(acute, anchor(100, 500))],
                    &[(cap_a, anchor_point(300, 700, 2))],
                )],
            )],
        ),
    );
    b.build()
}

fn shape_mark(font: &Font) -> String {
    let mut buffer = ot_shaper::UnicodeBuffer::new();
    buffer.push_str("A\u{0301}");
    buffer.guess_segment_properties();
    ot_shaper::shape(font, &[], buffer).serialize(font, Default::default())
}

#[test]
fn anchor_snaps_to_contour_point_when_hinting() {
    let data = anchor_point_font();
    let face = Face::from_slice(&data, 0).unwrap();
    let mut font = Font::new(&face);

    assert_eq!(shape_mark(&font), "A=0+600|acutecomb=0@-400,200+0");

    // Point 2 of the outline is at (550, 700).
    font.set_ppem(16, 16);
    assert_eq!(shape_mark(&font), "A=0+600|acutecomb=0@-150,200+0");
}
