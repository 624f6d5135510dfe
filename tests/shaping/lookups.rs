use crate::font::{
    alternate_subst, chain_context, context_classes, context_glyphs, layout_table, lookup,
    multiple_subst, reverse_chain_subst, single_subst, FontBuilder, GlyphId,
};
use crate::shape;

const SCRIPTS: [[u8; 4]; 2] = [*b"DFLT", *b"latn"];

/// `.notdef` plus `a` to `d`, all 500 units wide.
fn letters() -> (FontBuilder, [GlyphId; 4]) {
    let mut b = FontBuilder::new(1000);
    b.glyph(".notdef", None, 500);
    let a = b.glyph("a", Some(0x61), 500);
    let b_ = b.glyph("b", Some(0x62), 500);
    let c = b.glyph("c", Some(0x63), 500);
    let d = b.glyph("d", Some(0x64), 500);
    (b, [a, b_, c, d])
}

fn gsub_font(features: &[([u8; 4], u16)], lookups: Vec<Vec<u8>>) -> Vec<u8> {
    let (mut b, _) = letters();
    b.table(b"GSUB", layout_table(&SCRIPTS, features, lookups));
    b.build()
}

#[test]
fn multiple_substitution() {
    let (_, [a, b, c, _]) = letters();
    let font = gsub_font(
        &[(*b"ccmp", 0)],
        vec![lookup(2, 0, vec![multiple_subst(&[(a, &[b, c])])])],
    );
    assert_eq!(shape(&font, "a", ""), "b=0+500|c=0+500");
    assert_eq!(shape(&font, "da", "--no-positions"), "d=0|b=1|c=1");
}

#[test]
fn alternate_substitution() {
    let (_, [a, b, c, _]) = letters();
    let font = gsub_font(
        &[(*b"salt", 0)],
        vec![lookup(3, 0, vec![alternate_subst(&[(a, &[b, c])])])],
    );
    assert_eq!(shape(&font, "a", "--no-positions"), "a=0");
    assert_eq!(shape(&font, "a", "--no-positions --features=salt"), "b=0");
    assert_eq!(shape(&font, "a", "--no-positions --features=salt=2"), "c=0");
    // Out of range alternates leave the glyph alone.
    assert_eq!(shape(&font, "a", "--no-positions --features=salt=3"), "a=0");
}

#[test]
fn reverse_chaining_substitution() {
    let (_, [a, b, c, _]) = letters();
    let font = gsub_font(
        &[(*b"calt", 0)],
        vec![lookup(8, 0, vec![reverse_chain_subst(&[], &[&[c]], &[(a, b)])])],
    );
    // Applied from the end, so the first `a` already sees a `b` after it.
    assert_eq!(shape(&font, "aac", "--no-positions"), "a=0|b=1|c=2");
    assert_eq!(shape(&font, "ca", "--no-positions"), "c=0|a=1");
}

#[test]
fn context_by_glyphs() {
    let (_, [a, b, c, _]) = letters();
    let font = gsub_font(
        &[(*b"ccmp", 0)],
        vec![
            lookup(5, 0, vec![context_glyphs(&[(a, &[b], &[(1, 1)])])]),
            lookup(1, 0, vec![single_subst(&[(b, c)])]),
        ],
    );
    assert_eq!(shape(&font, "ab", "--no-positions"), "a=0|c=1");
    assert_eq!(shape(&font, "bb", "--no-positions"), "b=0|b=1");
    assert_eq!(shape(&font, "aab", "--no-positions"), "a=0|a=1|c=2");
}

#[test]
fn context_by_classes() {
    let (_, [a, b, c, d]) = letters();
    let font = gsub_font(
        &[(*b"ccmp", 0)],
        vec![
            lookup(
                5,
                0,
                vec![context_classes(
                    &[a],
                    &[(a, a, 1), (b, c, 2)],
                    &[(1, &[2], &[(0, 1)])],
                )],
            ),
            lookup(1, 0, vec![single_subst(&[(a, d)])]),
        ],
    );
    assert_eq!(shape(&font, "ab", "--no-positions"), "d=0|b=1");
    assert_eq!(shape(&font, "ac", "--no-positions"), "d=0|c=1");
    assert_eq!(shape(&font, "aa", "--no-positions"), "a=0|a=1");
}

#[test]
fn self_recursive_lookup_stops_at_nesting_limit() {
    let (_, [a, b, _, _]) = letters();
    let font = gsub_font(
        &[(*b"ccmp", 0)],
        vec![
            lookup(6, 0, vec![chain_context(&[], &[&[a]], &[], &[(0, 0), (0, 1)])]),
            lookup(1, 0, vec![single_subst(&[(a, b)])]),
        ],
    );
    assert_eq!(shape(&font, "a", "--no-positions"), "b=0");
}

#[test]
fn operation_budget_stops_runaway_lookups() {
    let (_, [a, b, _, _]) = letters();
    let records = [(0u16, 0u16); 40];
    let font = gsub_font(
        &[(*b"ccmp", 0), (*b"liga", 1)],
        vec![
            lookup(5, 0, vec![context_glyphs(&[(a, &[], &records)])]),
            lookup(1, 0, vec![single_subst(&[(a, b)])]),
        ],
    );
    // Once the budget is gone no further lookup runs.
    assert_eq!(shape(&font, "a", "--no-positions"), "a=0");
    assert_eq!(shape(&font, "a", "--no-positions --features=-ccmp"), "b=0");
}
