//! A compact, lossy summary of a glyph set.
//!
//! Each lane keeps one bit per bucket of glyph ids, with a different bucket
//! width per lane. `may_have` answers "no" only when the glyph is definitely
//! absent.

use read_fonts::tables::layout::CoverageTable;

/// Bucket widths, as right shifts applied to the glyph id.
const LANE_SHIFTS: [u32; 3] = [4, 0, 6];
const LANE_BITS: u32 = u64::BITS;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Lane(u64);

impl Lane {
    #[inline]
    fn bit(g: u32, shift: u32) -> u64 {
        1u64 << ((g >> shift) & (LANE_BITS - 1))
    }

    #[inline]
    fn is_full(self) -> bool {
        self.0 == u64::MAX
    }

    fn insert_range(&mut self, first: u32, last: u32, shift: u32) {
        let (a, b) = (first >> shift, last >> shift);
        if b.wrapping_sub(a) >= LANE_BITS - 1 {
            self.0 = u64::MAX;
            return;
        }
        let lo = Self::bit(first, shift);
        let hi = Self::bit(last, shift);
        // All bits from `lo` up to and including `hi`, wrapping around the lane.
        let span = if hi >= lo {
            (hi - lo) + hi
        } else {
            !(lo - 1) | (hi | (hi - 1))
        };
        self.0 |= span;
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct hb_set_digest_t {
    lanes: [Lane; 3],
}

impl hb_set_digest_t {
    pub fn new() -> Self {
        Self::default()
    }

    /// A digest that claims to contain every glyph.
    pub fn full() -> Self {
        Self {
            lanes: [Lane(u64::MAX); 3],
        }
    }

    pub fn from_coverage(coverage: &CoverageTable) -> Self {
        let mut digest = Self::new();
        digest.add_coverage(coverage);
        digest
    }

    pub fn add(&mut self, g: u32) {
        for (lane, shift) in self.lanes.iter_mut().zip(LANE_SHIFTS) {
            lane.0 |= Lane::bit(g, shift);
        }
    }

    pub fn add_range(&mut self, first: u32, last: u32) {
        if self.lanes.iter().all(|lane| lane.is_full()) {
            return;
        }
        for (lane, shift) in self.lanes.iter_mut().zip(LANE_SHIFTS) {
            lane.insert_range(first, last, shift);
        }
    }

    pub fn add_coverage(&mut self, coverage: &CoverageTable) {
        match coverage {
            CoverageTable::Format1(table) => {
                for glyph in table.glyph_array() {
                    self.add(glyph.get().to_u32());
                }
            }
            CoverageTable::Format2(table) => {
                for range in table.range_records() {
                    self.add_range(
                        range.start_glyph_id().to_u32(),
                        range.end_glyph_id().to_u32(),
                    );
                }
            }
        }
    }

    pub fn union(&mut self, other: &Self) {
        for (lane, theirs) in self.lanes.iter_mut().zip(other.lanes) {
            lane.0 |= theirs.0;
        }
    }

    #[inline]
    pub fn may_have(&self, g: u32) -> bool {
        self.lanes
            .iter()
            .zip(LANE_SHIFTS)
            .all(|(lane, shift)| lane.0 & Lane::bit(g, shift) != 0)
    }

    pub fn may_intersect(&self, other: &Self) -> bool {
        self.lanes
            .iter()
            .zip(other.lanes.iter())
            .all(|(a, b)| a.0 & b.0 != 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_has_nothing() {
        let digest = hb_set_digest_t::new();
        assert!(!digest.may_have(0));
        assert!(!digest.may_have(1234));
    }

    #[test]
    fn single_glyphs_are_remembered() {
        let mut digest = hb_set_digest_t::new();
        for g in [3, 70, 4096, 65535] {
            digest.add(g);
        }
        for g in [3, 70, 4096, 65535] {
            assert!(digest.may_have(g));
        }
        // Shares no bucket with any inserted glyph in the exact lane.
        assert!(!digest.may_have(5));
    }

    #[test]
    fn ranges_cover_every_member() {
        let mut digest = hb_set_digest_t::new();
        digest.add_range(100, 180);
        for g in 100..=180 {
            assert!(digest.may_have(g), "{g}");
        }
        assert!(!digest.may_have(1000));
    }

    #[test]
    fn wrapping_range() {
        let mut digest = hb_set_digest_t::new();
        // Crosses a 64-glyph boundary in the exact lane.
        digest.add_range(60, 68);
        for g in 60..=68 {
            assert!(digest.may_have(g), "{g}");
        }
    }

    #[test]
    fn huge_ranges_saturate() {
        let mut digest = hb_set_digest_t::new();
        digest.add_range(0, 0xFFFF);
        assert_eq!(digest, hb_set_digest_t::full());
        assert!(digest.may_have(31337));
    }

    #[test]
    fn intersection() {
        let mut a = hb_set_digest_t::new();
        a.add(10);
        let mut b = hb_set_digest_t::new();
        b.add(10);
        b.add(500);
        assert!(a.may_intersect(&b));

        let mut c = hb_set_digest_t::new();
        c.add(11);
        assert!(!a.may_intersect(&c));

        a.union(&c);
        assert!(a.may_have(11));
    }
}
