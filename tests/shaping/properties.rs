use crate::{shape_buffer, test_font};

use ot_shaper::GlyphBuffer;

const MIXED: &str = "fi A\u{0301}A 1\u{2044}2 a\u{200D}b";

fn clusters(buffer: &GlyphBuffer) -> Vec<u32> {
    buffer.glyph_infos().iter().map(|info| info.cluster).collect()
}

#[test]
fn clusters_are_monotonic_ltr() {
    let (buffer, _) = shape_buffer(&test_font(), MIXED, "");
    let clusters = clusters(&buffer);
    assert!(clusters.windows(2).all(|w| w[0] <= w[1]), "{clusters:?}");
}

#[test]
fn clusters_are_monotonic_rtl() {
    let text = "\u{0643}\u{062A}\u{0628} \u{0628}\u{0643}";
    let (buffer, _) = shape_buffer(&test_font(), text, "");
    let clusters = clusters(&buffer);
    assert!(clusters.windows(2).all(|w| w[0] >= w[1]), "{clusters:?}");
}

#[test]
fn clusters_are_text_boundaries() {
    let (buffer, _) = shape_buffer(&test_font(), MIXED, "");
    for cluster in clusters(&buffer) {
        assert!(MIXED.is_char_boundary(cluster as usize), "{cluster}");
    }
}

#[test]
fn every_character_is_covered() {
    let (buffer, _) = shape_buffer(&test_font(), MIXED, "");
    let clusters = clusters(&buffer);
    // Each character belongs to the nearest cluster at or before it.
    for (offset, _) in MIXED.char_indices() {
        assert!(
            clusters.iter().any(|&c| c as usize <= offset),
            "byte {offset} is not covered by {clusters:?}"
        );
    }
    assert_eq!(clusters.first().copied(), Some(0));
}

#[test]
fn cluster_glyphs_are_contiguous() {
    let (buffer, _) = shape_buffer(&test_font(), MIXED, "--cluster-level=1");
    let clusters = clusters(&buffer);
    let mut seen = Vec::new();
    for (i, &cluster) in clusters.iter().enumerate() {
        if i > 0 && clusters[i - 1] == cluster {
            continue;
        }
        assert!(!seen.contains(&cluster), "{clusters:?}");
        seen.push(cluster);
    }
}

#[test]
fn output_is_deterministic() {
    let font = test_font();
    let (_, first) = shape_buffer(&font, MIXED, "--show-flags");
    let (_, second) = shape_buffer(&font, MIXED, "--show-flags");
    assert_eq!(first, second);
}

#[test]
fn safe_to_break_splits_reshape_identically() {
    let font = test_font();
    let text = "fiAAfi";
    let (whole, _) = shape_buffer(&font, text, "");
    let expected: Vec<_> = whole
        .glyph_infos()
        .iter()
        .zip(whole.glyph_positions())
        .map(|(info, pos)| (info.glyph_id, info.cluster, pos.x_advance, pos.x_offset))
        .collect();

    let mut checked = 0;
    for info in whole.glyph_infos() {
        if info.cluster == 0 || info.unsafe_to_break() {
            continue;
        }

        let split = info.cluster as usize;
        let (left, _) = shape_buffer(&font, &text[..split], "");
        let (right, _) = shape_buffer(&font, &text[split..], "");

        let mut joined: Vec<_> = left
            .glyph_infos()
            .iter()
            .zip(left.glyph_positions())
            .map(|(info, pos)| (info.glyph_id, info.cluster, pos.x_advance, pos.x_offset))
            .collect();
        joined.extend(
            right
                .glyph_infos()
                .iter()
                .zip(right.glyph_positions())
                .map(|(info, pos)| {
                    (
                        info.glyph_id,
                        info.cluster + split as u32,
                        pos.x_advance,
                        pos.x_offset,
                    )
                }),
        );

        assert_eq!(joined, expected, "split at byte {split}");
        checked += 1;
    }

    assert!(checked > 0);
}

#[test]
fn kerned_pair_is_unsafe_to_break() {
    let (buffer, _) = shape_buffer(&test_font(), "AA", "");
    let infos = buffer.glyph_infos();
    assert!(!infos[0].unsafe_to_break());
    assert!(infos[1].unsafe_to_break());
}
