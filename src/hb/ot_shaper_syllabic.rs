//! Helpers shared by the shapers that segment text into syllables.

use alloc::vec::Vec;
use core::ops::Range;

use smallvec::SmallVec;

use super::algs::rb_flag64_unsafe;
use super::buffer::*;
use super::ot_shape_plan::hb_ot_shape_plan_t;
use super::{hb_font_t, GlyphInfo};

/// How a shaper wants a dotted circle to look in its own categories.
pub(crate) struct DottedCircle {
    /// Syllable type (low nibble of the syllable serial) that marks a broken
    /// cluster.
    pub broken_syllable_type: u8,
    pub category: u8,
    /// A leading repha keeps its place in front of the dotted circle.
    pub repha_category: Option<u8>,
    pub position: Option<u8>,
}

/// Gives every broken syllable a U+25CC base to attach its marks to.
///
/// Returns whether anything was inserted. Nothing happens when the font lacks
/// a dotted circle glyph or the buffer forbids insertion.
pub(crate) fn insert_dotted_circles(
    font: &hb_font_t,
    buffer: &mut hb_buffer_t,
    circle: &DottedCircle,
) -> bool {
    if buffer.flags.contains(BufferFlags::DO_NOT_INSERT_DOTTED_CIRCLE) {
        return false;
    }

    if buffer.scratch_flags & HB_BUFFER_SCRATCH_FLAG_HAS_BROKEN_SYLLABLE == 0 {
        return false;
    }

    let Some(glyph) = font.get_nominal_glyph(0x25CC) else {
        return false;
    };

    let mut template = GlyphInfo {
        glyph_id: glyph.to_u32(),
        ..GlyphInfo::default()
    };
    template.set_ot_shaper_var_u8_category(circle.category);
    if let Some(position) = circle.position {
        template.set_ot_shaper_var_u8_auxiliary(position);
    }

    buffer.clear_output();
    buffer.idx = 0;

    let mut last_syllable = 0;
    while buffer.idx < buffer.len {
        let syllable = buffer.cur(0).syllable();
        if last_syllable == syllable || (syllable & 0x0F) != circle.broken_syllable_type {
            buffer.next_glyph();
            continue;
        }

        last_syllable = syllable;

        let mut info = template;
        info.cluster = buffer.cur(0).cluster;
        info.mask = buffer.cur(0).mask;
        info.set_syllable(syllable);

        if let Some(repha) = circle.repha_category {
            while buffer.idx < buffer.len
                && buffer.cur(0).syllable() == last_syllable
                && buffer.cur(0).ot_shaper_var_u8_category() == repha
            {
                buffer.next_glyph();
            }
        }

        buffer.output_info(info);
    }

    buffer.sync();
    true
}

/// GSUB pause that releases the syllable variable once reordering is done.
pub(crate) fn syllabic_clear_var(
    _: &hb_ot_shape_plan_t,
    _: &hb_font_t,
    buffer: &mut hb_buffer_t,
) -> bool {
    let len = buffer.len;
    for info in &mut buffer.info[..len] {
        info.set_syllable(0);
    }
    buffer.deallocate_var(GlyphInfo::SYLLABLE_VAR);
    false
}

/// A regular expression over character categories.
///
/// Patterns are built as constants and matched with a set of candidate end
/// positions, so every alternative is explored and the longest overall match
/// wins.
#[derive(Clone, Copy)]
pub(crate) enum Pattern {
    /// One character whose category bit is set in the mask.
    One(u64),
    Seq(&'static [Pattern]),
    Alt(&'static [Pattern]),
    Opt(&'static Pattern),
    Star(&'static Pattern),
    /// Between `min` and `max` repetitions, inclusive.
    Repeat(&'static Pattern, u8, u8),
}

type Ends = SmallVec<[usize; 8]>;

/// Pattern matching any of the given categories.
pub(crate) const fn one_of(categories: &[u8]) -> Pattern {
    let mut mask = 0u64;
    let mut i = 0;
    while i < categories.len() {
        mask |= 1 << categories[i];
        i += 1;
    }
    Pattern::One(mask)
}

impl Pattern {
    fn advance(&self, cats: &[u8], from: &[usize]) -> Ends {
        match *self {
            Pattern::One(mask) => from
                .iter()
                .filter(|&&p| {
                    p < cats.len() && mask & rb_flag64_unsafe(u32::from(cats[p])) != 0
                })
                .map(|&p| p + 1)
                .collect(),
            Pattern::Seq(items) => {
                let mut ends: Ends = from.iter().copied().collect();
                for item in items {
                    if ends.is_empty() {
                        break;
                    }
                    ends = item.advance(cats, &ends);
                }
                ends
            }
            Pattern::Alt(items) => {
                let mut ends = Ends::new();
                for item in items {
                    merge_ends(&mut ends, &item.advance(cats, from));
                }
                ends
            }
            Pattern::Opt(inner) => {
                let mut ends: Ends = from.iter().copied().collect();
                merge_ends(&mut ends, &inner.advance(cats, from));
                ends
            }
            Pattern::Star(inner) => {
                let mut ends: Ends = from.iter().copied().collect();
                let mut frontier = ends.clone();
                while !frontier.is_empty() {
                    frontier = inner
                        .advance(cats, &frontier)
                        .into_iter()
                        .filter(|p| ends.binary_search(p).is_err())
                        .collect();
                    merge_ends(&mut ends, &frontier);
                }
                ends
            }
            Pattern::Repeat(inner, min, max) => {
                let mut current: Ends = from.iter().copied().collect();
                for _ in 0..min {
                    current = inner.advance(cats, &current);
                }
                let mut ends = current.clone();
                for _ in min..max {
                    if current.is_empty() {
                        break;
                    }
                    current = inner.advance(cats, &current);
                    merge_ends(&mut ends, &current);
                }
                ends
            }
        }
    }

    /// Length of the longest match anchored at the start of `cats`.
    pub(crate) fn longest_match(&self, cats: &[u8]) -> Option<usize> {
        self.advance(cats, &[0]).last().copied()
    }
}

// Both sides are sorted; the result stays sorted and free of duplicates.
fn merge_ends(into: &mut Ends, other: &[usize]) {
    for &p in other {
        if let Err(i) = into.binary_search(&p) {
            into.insert(i, p);
        }
    }
}

/// Upper bound on the length of one syllable.
///
/// Matching only ever looks this far ahead, so a long run of joiners or marks
/// is split into several syllables and scanning stays linear in the buffer
/// length.
pub(crate) const MAX_SYLLABLE_LEN: usize = 64;

/// A longest-match scanner over categories.
///
/// At every position the longest rule match is taken, the earlier rule on a
/// tie. A character no rule matches becomes a syllable of type `other` on its
/// own.
pub(crate) struct SyllableMachine {
    pub rules: &'static [(Pattern, u8)],
    pub other: u8,
    /// Type whose syllables get a dotted circle later.
    pub broken: u8,
}

impl SyllableMachine {
    /// Splits `cats` into syllables.
    pub(crate) fn scan(&self, cats: &[u8]) -> Vec<(Range<usize>, u8)> {
        let mut syllables = Vec::new();
        let mut p = 0;
        while p < cats.len() {
            let window = &cats[p..cats.len().min(p + MAX_SYLLABLE_LEN)];
            let mut best: Option<(usize, u8)> = None;
            for &(pattern, kind) in self.rules {
                if let Some(len) = pattern.longest_match(window) {
                    if len > 0 && best.map_or(true, |(best_len, _)| len > best_len) {
                        best = Some((len, kind));
                    }
                }
            }

            let (len, kind) = best.unwrap_or((1, self.other));
            syllables.push((p..p + len, kind));
            p += len;
        }
        syllables
    }

    /// Scans the shaper categories stored in the buffer and numbers the
    /// syllables found.
    pub(crate) fn find_syllables(&self, buffer: &mut hb_buffer_t) {
        let len = buffer.len;
        let cats: Vec<u8> = buffer.info[..len]
            .iter()
            .map(|info| info.ot_shaper_var_u8_category())
            .collect();

        let mut serial = SyllableSerial::default();
        for (range, kind) in self.scan(&cats) {
            if kind == self.broken {
                buffer.scratch_flags |= HB_BUFFER_SCRATCH_FLAG_HAS_BROKEN_SYLLABLE;
            }
            let syllable = serial.next(kind);
            for info in &mut buffer.info[range] {
                info.set_syllable(syllable);
            }
        }
    }
}

/// Hands out syllable numbers: a 4-bit serial in the high nibble that skips
/// zero, and the syllable type in the low one.
pub(crate) struct SyllableSerial(u8);

impl Default for SyllableSerial {
    fn default() -> Self {
        SyllableSerial(1)
    }
}

impl SyllableSerial {
    pub(crate) fn next(&mut self, kind: u8) -> u8 {
        let syllable = (self.0 << 4) | (kind & 0x0F);
        self.0 += 1;
        if self.0 == 16 {
            self.0 = 1;
        }
        syllable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: u8 = 1;
    const B: u8 = 2;
    const C: u8 = 3;

    const P_A: Pattern = one_of(&[A]);
    const P_B: Pattern = one_of(&[B]);
    const P_C: Pattern = one_of(&[C]);

    #[test]
    fn alternatives_are_all_explored() {
        // (A B?)* C matches A A B A C entirely, even though a greedy matcher
        // would have to backtrack.
        const INNER: Pattern = Pattern::Seq(&[P_A, Pattern::Opt(&P_B)]);
        const PAT: Pattern = Pattern::Seq(&[Pattern::Star(&INNER), P_C]);
        assert_eq!(PAT.longest_match(&[A, A, B, A, C]), Some(5));
        assert_eq!(PAT.longest_match(&[A, B, B, C]), None);
    }

    #[test]
    fn bounded_repeat() {
        const PAT: Pattern = Pattern::Repeat(&P_A, 1, 2);
        assert_eq!(PAT.longest_match(&[A, A, A]), Some(2));
        assert_eq!(PAT.longest_match(&[B]), None);
    }

    #[test]
    fn scanner_prefers_longest_then_first() {
        static RULES: &[(Pattern, u8)] = &[
            (Pattern::Seq(&[P_A, P_B]), 0),
            (Pattern::Seq(&[P_A, Pattern::Opt(&P_B)]), 1),
            (Pattern::Star(&P_C), 2),
        ];
        let machine = SyllableMachine {
            rules: RULES,
            other: 5,
            broken: 4,
        };
        let found = machine.scan(&[A, B, A, C, C, B]);
        assert_eq!(found, [(0..2, 0), (2..3, 1), (3..5, 2), (5..6, 5)]);
    }

    #[test]
    fn long_runs_are_split() {
        static RULES: &[(Pattern, u8)] = &[(Pattern::Star(&P_C), 2)];
        let machine = SyllableMachine {
            rules: RULES,
            other: 5,
            broken: 4,
        };
        let cats = alloc::vec![C; 200];
        let lengths: Vec<usize> = machine.scan(&cats).into_iter().map(|(r, _)| r.len()).collect();
        assert_eq!(lengths, [64, 64, 64, 8]);
    }

    #[test]
    fn serial_wraps_past_zero() {
        let mut serial = SyllableSerial::default();
        assert_eq!(serial.next(3), 0x13);
        for _ in 0..14 {
            serial.next(0);
        }
        assert_eq!(serial.next(1), 0x11);
    }
}
