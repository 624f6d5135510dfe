//! Dotted circles between independent vowels and dependent signs that
//! must not follow them.

use super::buffer::hb_buffer_t;

// (independent vowel, dependent sign) sequences that look like another
// independent vowel.
#[rustfmt::skip]
static FORBIDDEN_PAIRS: &[(u32, u32)] = &[
    (0x0905, 0x093A), (0x0905, 0x093B), (0x0905, 0x093E), (0x0905, 0x0945), (0x0905, 0x0946),
    (0x0905, 0x0949), (0x0905, 0x094A), (0x0905, 0x094B), (0x0905, 0x094C), (0x0905, 0x094F),
    (0x0905, 0x0956), (0x0905, 0x0957), (0x0906, 0x093A), (0x0906, 0x0945), (0x0906, 0x0946),
    (0x0906, 0x0947), (0x0906, 0x0948), (0x0909, 0x0941), (0x090F, 0x0945), (0x090F, 0x0946),
    (0x090F, 0x0947), (0x0985, 0x09BE), (0x098B, 0x09C3), (0x098C, 0x09E2), (0x0A05, 0x0A3E),
    (0x0A05, 0x0A48), (0x0A05, 0x0A4C), (0x0A72, 0x0A3F), (0x0A72, 0x0A40), (0x0A72, 0x0A47),
    (0x0A73, 0x0A41), (0x0A73, 0x0A42), (0x0A73, 0x0A4B), (0x0A85, 0x0ABE), (0x0A85, 0x0AC5),
    (0x0A85, 0x0AC7), (0x0A85, 0x0AC8), (0x0A85, 0x0AC9), (0x0A85, 0x0ACB), (0x0A85, 0x0ACC),
    (0x0AC5, 0x0ABE), (0x0B05, 0x0B3E), (0x0B0F, 0x0B57), (0x0B13, 0x0B57), (0x0C12, 0x0C4C),
    (0x0C12, 0x0C55), (0x0C3F, 0x0C55), (0x0C46, 0x0C55), (0x0C4A, 0x0C55), (0x0C89, 0x0CBE),
    (0x0C8B, 0x0CBE), (0x0C92, 0x0CCC), (0x0D07, 0x0D57), (0x0D09, 0x0D57), (0x0D0E, 0x0D46),
    (0x0D12, 0x0D3E), (0x0D12, 0x0D57), (0x0D85, 0x0DCF), (0x0D85, 0x0DD0), (0x0D85, 0x0DD1),
    (0x0D8B, 0x0DDF), (0x0D8D, 0x0DD8), (0x0D8F, 0x0DDF), (0x0D91, 0x0DCA), (0x0D91, 0x0DD9),
    (0x0D91, 0x0DDA), (0x0D91, 0x0DDC), (0x0D91, 0x0DDD), (0x0D94, 0x0DDF),
];

fn is_forbidden(first: u32, second: u32) -> bool {
    FORBIDDEN_PAIRS.binary_search(&(first, second)).is_ok()
}

fn output_dotted_circle(buffer: &mut hb_buffer_t) {
    buffer.output_glyph(0x25CC);
    let out_len = buffer.out_len;
    if out_len > 0 {
        buffer.out_info_mut()[out_len - 1].reset_continuation();
    }
}

/// Breaks up the forbidden sequences with U+25CC so the font does not
/// render them as a single vowel.
pub fn preprocess_text_vowel_constraints(buffer: &mut hb_buffer_t) {
    if buffer
        .flags
        .contains(super::buffer::BufferFlags::DO_NOT_INSERT_DOTTED_CIRCLE)
    {
        return;
    }

    buffer.clear_output();
    buffer.idx = 0;
    let count = buffer.len;
    while buffer.idx + 1 < count && buffer.successful {
        let first = buffer.cur(0).glyph_id;
        let second = buffer.cur(1).glyph_id;

        // Devanagari reph followed by letter I.
        if first == 0x0930
            && second == 0x094D
            && buffer.idx + 2 < count
            && buffer.cur(2).glyph_id == 0x0907
        {
            buffer.next_glyph();
            buffer.next_glyph();
            output_dotted_circle(buffer);
            continue;
        }

        buffer.next_glyph();
        if is_forbidden(first, second) {
            output_dotted_circle(buffer);
        }
    }

    buffer.sync();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_sorted() {
        assert!(FORBIDDEN_PAIRS.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn devanagari_a_with_aa_sign() {
        assert!(is_forbidden(0x0905, 0x093E));
        assert!(!is_forbidden(0x0915, 0x093E));
    }
}
