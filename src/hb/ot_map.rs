//! Feature to mask and lookup mapping.
//!
//! The builder collects features and pauses requested by the shaper, then
//! [`hb_ot_map_builder_t::compile`] assigns mask bits and gathers the
//! lookups of every stage of GSUB and GPOS.

use alloc::vec::Vec;
use core::cmp::Ordering;

use super::buffer::{glyph_flag, hb_buffer_t};
use super::common::{hb_mask_t, hb_tag_t, Language, Script};
use super::face::hb_font_t;
use super::ot::LayoutTable;
use super::ot_layout::TableIndex;
use super::ot_shape_plan::hb_ot_shape_plan_t;
use super::ot_tag;
use read_fonts::collections::int_set::Domain;

pub const HB_OT_MAP_MAX_BITS: u32 = 8;
pub const HB_OT_MAP_MAX_VALUE: u32 = (1 << HB_OT_MAP_MAX_BITS) - 1;

bitflags::bitflags! {
    #[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
    pub struct hb_ot_map_feature_flags_t: u32 {
        /// Applies to all characters; no mask bit is allocated for a
        /// binary global feature.
        const GLOBAL            = 1 << 0;
        /// Keep the mask bit even when the font lacks the feature.
        const HAS_FALLBACK      = 1 << 1;
        /// Don't skip over ZWNJ when matching context.
        const MANUAL_ZWNJ       = 1 << 2;
        /// Don't skip over ZWJ when matching input.
        const MANUAL_ZWJ        = 1 << 3;
        const MANUAL_JOINERS    = Self::MANUAL_ZWNJ.bits() | Self::MANUAL_ZWJ.bits();
        const GLOBAL_MANUAL_JOINERS = Self::GLOBAL.bits() | Self::MANUAL_JOINERS.bits();
        const GLOBAL_HAS_FALLBACK = Self::GLOBAL.bits() | Self::HAS_FALLBACK.bits();
        /// Look the feature up in the table-wide feature list when the
        /// language system doesn't have it.
        const GLOBAL_SEARCH     = 1 << 4;
        /// Pick alternates randomly.
        const RANDOM            = 1 << 5;
        /// Contexts must not cross syllable boundaries.
        const PER_SYLLABLE      = 1 << 6;
    }
}

pub const F_NONE: hb_ot_map_feature_flags_t = hb_ot_map_feature_flags_t::empty();
pub const F_GLOBAL: hb_ot_map_feature_flags_t = hb_ot_map_feature_flags_t::GLOBAL;
pub const F_HAS_FALLBACK: hb_ot_map_feature_flags_t = hb_ot_map_feature_flags_t::HAS_FALLBACK;
pub const F_MANUAL_ZWNJ: hb_ot_map_feature_flags_t = hb_ot_map_feature_flags_t::MANUAL_ZWNJ;
pub const F_MANUAL_ZWJ: hb_ot_map_feature_flags_t = hb_ot_map_feature_flags_t::MANUAL_ZWJ;
pub const F_MANUAL_JOINERS: hb_ot_map_feature_flags_t = hb_ot_map_feature_flags_t::MANUAL_JOINERS;
pub const F_GLOBAL_MANUAL_JOINERS: hb_ot_map_feature_flags_t =
    hb_ot_map_feature_flags_t::GLOBAL_MANUAL_JOINERS;
pub const F_GLOBAL_HAS_FALLBACK: hb_ot_map_feature_flags_t =
    hb_ot_map_feature_flags_t::GLOBAL_HAS_FALLBACK;
pub const F_GLOBAL_SEARCH: hb_ot_map_feature_flags_t = hb_ot_map_feature_flags_t::GLOBAL_SEARCH;
pub const F_RANDOM: hb_ot_map_feature_flags_t = hb_ot_map_feature_flags_t::RANDOM;
pub const F_PER_SYLLABLE: hb_ot_map_feature_flags_t = hb_ot_map_feature_flags_t::PER_SYLLABLE;

/// Callback run between two stages. Returns `true` when it changed the
/// glyphs of the buffer.
pub type pause_func_t = fn(&hb_ot_shape_plan_t, &hb_font_t, &mut hb_buffer_t) -> bool;

#[derive(Clone, Copy, Debug)]
pub struct feature_map_t {
    pub tag: hb_tag_t,
    pub index: [Option<u16>; 2],
    pub stage: [usize; 2],
    pub shift: u32,
    pub mask: hb_mask_t,
    // mask for value=1, for quick access
    pub _1_mask: hb_mask_t,
    pub needs_fallback: bool,
    pub auto_zwnj: bool,
    pub auto_zwj: bool,
    pub random: bool,
    pub per_syllable: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct lookup_map_t {
    pub index: u16,
    pub auto_zwnj: bool,
    pub auto_zwj: bool,
    pub random: bool,
    pub per_syllable: bool,
    pub mask: hb_mask_t,
}

#[derive(Clone, Copy)]
pub struct stage_map_t {
    // Cumulative.
    pub last_lookup: usize,
    pub pause_func: Option<pause_func_t>,
}

/// The compiled feature map of a shape plan.
#[derive(Default)]
pub struct hb_ot_map_t {
    global_mask: hb_mask_t,
    chosen_script: [Option<hb_tag_t>; 2],
    found_script: [bool; 2],
    features: Vec<feature_map_t>,
    lookups: [Vec<lookup_map_t>; 2],
    stages: [Vec<stage_map_t>; 2],
    feature_variations: [Option<u32>; 2],
}

impl hb_ot_map_t {
    pub const MAX_BITS: u32 = HB_OT_MAP_MAX_BITS;
    pub const MAX_VALUE: u32 = HB_OT_MAP_MAX_VALUE;

    #[inline]
    pub fn global_mask(&self) -> hb_mask_t {
        self.global_mask
    }

    #[inline]
    pub fn chosen_script(&self, table_index: TableIndex) -> Option<hb_tag_t> {
        self.chosen_script[table_index]
    }

    #[inline]
    pub fn found_script(&self, table_index: TableIndex) -> bool {
        self.found_script[table_index]
    }

    #[inline]
    pub fn feature_variations(&self) -> &[Option<u32>; 2] {
        &self.feature_variations
    }

    #[inline]
    pub fn get_map(&self, feature_tag: hb_tag_t) -> Option<&feature_map_t> {
        self.features
            .binary_search_by(|map| map.tag.cmp(&feature_tag))
            .ok()
            .map(|index| &self.features[index])
    }

    #[inline]
    pub fn needs_fallback(&self, feature_tag: hb_tag_t) -> bool {
        self.get_map(feature_tag)
            .is_some_and(|map| map.needs_fallback)
    }

    /// Returns the mask of a feature and the shift of its value.
    #[inline]
    pub fn get_mask(&self, feature_tag: hb_tag_t) -> (hb_mask_t, u32) {
        self.get_map(feature_tag)
            .map(|map| (map.mask, map.shift))
            .unwrap_or((0, 0))
    }

    #[inline]
    pub fn get_1_mask(&self, feature_tag: hb_tag_t) -> hb_mask_t {
        self.get_map(feature_tag).map_or(0, |map| map._1_mask)
    }

    #[inline]
    pub fn get_feature_index(&self, table_index: TableIndex, feature_tag: hb_tag_t) -> Option<u16> {
        self.get_map(feature_tag)
            .and_then(|map| map.index[table_index])
    }

    #[inline]
    pub fn get_feature_stage(&self, table_index: TableIndex, feature_tag: hb_tag_t) -> Option<usize> {
        self.get_map(feature_tag).map(|map| map.stage[table_index])
    }

    #[inline]
    pub fn stages(&self, table_index: TableIndex) -> &[stage_map_t] {
        &self.stages[table_index]
    }

    pub fn stage_lookups(&self, table_index: TableIndex, stage: usize) -> &[lookup_map_t] {
        let stages = &self.stages[table_index];
        let lookups = &self.lookups[table_index];
        if stage > stages.len() {
            return &[];
        }

        let start = if stage == 0 {
            0
        } else {
            stages[stage - 1].last_lookup
        };
        let end = stages
            .get(stage)
            .map_or(lookups.len(), |stage| stage.last_lookup);
        lookups.get(start..end).unwrap_or(&[])
    }

    /// All lookups of one table, in application order.
    pub fn lookups(&self, table_index: TableIndex) -> &[lookup_map_t] {
        &self.lookups[table_index]
    }
}

#[derive(Clone, Copy)]
struct feature_info_t {
    tag: hb_tag_t,
    // sequence number, used for stable sorting only
    seq: usize,
    max_value: u32,
    flags: hb_ot_map_feature_flags_t,
    // for non-global features, what the unset glyphs take
    default_value: u32,
    stage: [usize; 2],
}

#[derive(Clone, Copy)]
struct stage_info_t {
    index: usize,
    pause_func: Option<pause_func_t>,
}

pub struct hb_ot_map_builder_t<'a> {
    tables: [Option<LayoutTable<'a>>; 2],
    feature_variations: [Option<u32>; 2],
    chosen_script: [Option<hb_tag_t>; 2],
    found_script: [bool; 2],
    script_index: [Option<u16>; 2],
    language_index: [Option<u16>; 2],
    current_stage: [usize; 2],
    feature_infos: Vec<feature_info_t>,
    stages: [Vec<stage_info_t>; 2],
}

impl<'a> hb_ot_map_builder_t<'a> {
    pub fn new(font: &hb_font_t<'a>, script: Option<Script>, language: Option<&Language>) -> Self {
        let tables = [
            font.ot_tables.layout_table(TableIndex::GSUB),
            font.ot_tables.layout_table(TableIndex::GPOS),
        ];
        Self::with_tables(tables, font.ot_tables.feature_variations, script, language)
    }

    pub(crate) fn with_tables(
        tables: [Option<LayoutTable<'a>>; 2],
        feature_variations: [Option<u32>; 2],
        script: Option<Script>,
        language: Option<&Language>,
    ) -> Self {
        // Fetch script/language indices for GSUB/GPOS. We need these later to
        // skip features not available in either table and not waste
        // precious bits for them.
        let (script_tags, language_tags) = ot_tag::tags_from_script_and_language(script, language);

        let mut chosen_script = [None; 2];
        let mut found_script = [false; 2];
        let mut script_index = [None; 2];
        let mut language_index = [None; 2];

        for table_index in TableIndex::iter() {
            let Some(table) = &tables[table_index] else {
                continue;
            };

            if let Some((found, index, tag)) = table.select_script(&script_tags) {
                chosen_script[table_index] = Some(tag);
                found_script[table_index] = found;
                script_index[table_index] = Some(index);
                language_index[table_index] = table.select_script_language(index, &language_tags);
            }
        }

        Self {
            tables,
            feature_variations,
            chosen_script,
            found_script,
            script_index,
            language_index,
            current_stage: [0; 2],
            feature_infos: Vec::new(),
            stages: [Vec::new(), Vec::new()],
        }
    }

    #[inline]
    pub fn chosen_script(&self, table_index: TableIndex) -> Option<hb_tag_t> {
        self.chosen_script[table_index]
    }

    #[inline]
    pub fn found_script(&self, table_index: TableIndex) -> bool {
        self.found_script[table_index]
    }

    #[inline]
    pub fn has_feature(&self, tag: hb_tag_t) -> bool {
        TableIndex::iter().any(|table_index| self.find_feature(table_index, tag).is_some())
    }

    pub fn add_feature(&mut self, tag: hb_tag_t, flags: hb_ot_map_feature_flags_t, value: u32) {
        if tag.to_u32() == 0 {
            return;
        }

        let seq = self.feature_infos.len();
        self.feature_infos.push(feature_info_t {
            tag,
            seq,
            max_value: value,
            flags,
            default_value: if flags.contains(F_GLOBAL) { value } else { 0 },
            stage: self.current_stage,
        });
    }

    #[inline]
    pub fn enable_feature(&mut self, tag: hb_tag_t, flags: hb_ot_map_feature_flags_t, value: u32) {
        self.add_feature(tag, flags | F_GLOBAL, value);
    }

    #[inline]
    pub fn disable_feature(&mut self, tag: hb_tag_t) {
        self.add_feature(tag, F_GLOBAL, 0);
    }

    #[inline]
    pub fn add_gsub_pause(&mut self, pause: Option<pause_func_t>) {
        self.add_pause(TableIndex::GSUB, pause);
    }

    #[inline]
    pub fn add_gpos_pause(&mut self, pause: Option<pause_func_t>) {
        self.add_pause(TableIndex::GPOS, pause);
    }

    fn add_pause(&mut self, table_index: TableIndex, pause: Option<pause_func_t>) {
        self.stages[table_index].push(stage_info_t {
            index: self.current_stage[table_index],
            pause_func: pause,
        });

        self.current_stage[table_index] += 1;
    }

    fn find_feature(&self, table_index: TableIndex, tag: hb_tag_t) -> Option<u16> {
        let table = self.tables[table_index].as_ref()?;
        let script_index = self.script_index[table_index]?;
        table.find_language_feature(script_index, self.language_index[table_index], tag)
    }

    fn required_feature(&self, table_index: TableIndex) -> Option<(u16, hb_tag_t)> {
        let table = self.tables[table_index].as_ref()?;
        let script_index = self.script_index[table_index]?;
        table.get_required_language_feature(script_index, self.language_index[table_index])
    }

    pub fn compile(&mut self) -> hb_ot_map_t {
        // We default to applying the required feature in stage 0. If the
        // required feature has a tag that is known to the shaper, we apply
        // it in the stage of that tag.
        let mut required_feature_stage = [0usize; 2];
        let required_feature = [
            self.required_feature(TableIndex::GSUB),
            self.required_feature(TableIndex::GPOS),
        ];

        let global_bit_shift = glyph_flag::DEFINED.count_ones();
        let global_bit_mask = 1u32 << global_bit_shift;

        let mut map = hb_ot_map_t {
            global_mask: global_bit_mask,
            chosen_script: self.chosen_script,
            found_script: self.found_script,
            feature_variations: self.feature_variations,
            ..hb_ot_map_t::default()
        };

        self.merge_feature_infos();

        // Allocate bits now.
        let mut next_bit = global_bit_shift + 1;

        for info in &self.feature_infos {
            let uses_global_bit = info.flags.contains(F_GLOBAL) && info.max_value == 1;
            let bits_needed = if uses_global_bit {
                0
            } else {
                // Limit bits per feature.
                HB_OT_MAP_MAX_BITS.min(bit_storage(info.max_value))
            };

            if info.max_value == 0 || next_bit + bits_needed > 32 {
                // Feature disabled, or not enough bits.
                continue;
            }

            let mut found = false;
            let mut feature_index = [None; 2];
            for table_index in TableIndex::iter() {
                if required_feature[table_index].is_some_and(|(_, tag)| tag == info.tag) {
                    required_feature_stage[table_index] = info.stage[table_index];
                }

                feature_index[table_index] = self.find_feature(table_index, info.tag);
                found |= feature_index[table_index].is_some();
            }

            if !found && info.flags.contains(F_GLOBAL_SEARCH) {
                for table_index in TableIndex::iter() {
                    feature_index[table_index] = self.tables[table_index]
                        .as_ref()
                        .and_then(|table| table.feature_index(info.tag));
                    found |= feature_index[table_index].is_some();
                }
            }

            if !found && !info.flags.contains(F_HAS_FALLBACK) {
                continue;
            }

            let (shift, mask) = if uses_global_bit {
                (global_bit_shift, global_bit_mask)
            } else {
                let shift = next_bit;
                let mask = (1u32 << (next_bit + bits_needed)).wrapping_sub(1 << next_bit);
                next_bit += bits_needed;
                map.global_mask |= (info.default_value << shift) & mask;
                (shift, mask)
            };

            map.features.push(feature_map_t {
                tag: info.tag,
                index: feature_index,
                stage: info.stage,
                shift,
                mask,
                _1_mask: (1 << shift) & mask,
                needs_fallback: !found,
                auto_zwnj: !info.flags.contains(F_MANUAL_ZWNJ),
                auto_zwj: !info.flags.contains(F_MANUAL_ZWJ),
                random: info.flags.contains(F_RANDOM),
                per_syllable: info.flags.contains(F_PER_SYLLABLE),
            });
        }

        // Done with these.
        self.feature_infos.clear();

        self.add_gsub_pause(None);
        self.add_gpos_pause(None);

        for table_index in TableIndex::iter() {
            // Collect lookup indices for features.
            let mut stage_index = 0;
            let mut last_num_lookups = 0;

            for stage in 0..self.current_stage[table_index] {
                if let Some((feature_index, _)) = required_feature[table_index] {
                    if required_feature_stage[table_index] == stage {
                        self.add_lookups(
                            &mut map,
                            table_index,
                            feature_index,
                            global_bit_mask,
                            F_NONE,
                        );
                    }
                }

                for i in 0..map.features.len() {
                    let feature = map.features[i];
                    if feature.stage[table_index] != stage {
                        continue;
                    }
                    let Some(feature_index) = feature.index[table_index] else {
                        continue;
                    };

                    let mut flags = F_NONE;
                    flags.set(F_MANUAL_ZWNJ, !feature.auto_zwnj);
                    flags.set(F_MANUAL_ZWJ, !feature.auto_zwj);
                    flags.set(F_RANDOM, feature.random);
                    flags.set(F_PER_SYLLABLE, feature.per_syllable);
                    self.add_lookups(&mut map, table_index, feature_index, feature.mask, flags);
                }

                // Sort lookups and merge duplicates.
                let lookups = &mut map.lookups[table_index];
                if last_num_lookups < lookups.len() {
                    lookups[last_num_lookups..].sort_by_key(|lookup| lookup.index);

                    let mut j = last_num_lookups;
                    for i in j + 1..lookups.len() {
                        if lookups[i].index != lookups[j].index {
                            j += 1;
                            lookups[j] = lookups[i];
                        } else {
                            lookups[j].mask |= lookups[i].mask;
                            lookups[j].auto_zwnj &= lookups[i].auto_zwnj;
                            lookups[j].auto_zwj &= lookups[i].auto_zwj;
                        }
                    }

                    lookups.truncate(j + 1);
                }

                last_num_lookups = lookups.len();

                if let Some(info) = self.stages[table_index].get(stage_index) {
                    if info.index == stage {
                        map.stages[table_index].push(stage_map_t {
                            last_lookup: last_num_lookups,
                            pause_func: info.pause_func,
                        });
                        stage_index += 1;
                    }
                }
            }
        }

        map
    }

    // Sorts by tag and merges duplicates.
    fn merge_feature_infos(&mut self) {
        if self.feature_infos.is_empty() {
            return;
        }

        self.feature_infos.sort_by(|a, b| match a.tag.cmp(&b.tag) {
            Ordering::Equal => a.seq.cmp(&b.seq),
            ordering => ordering,
        });

        let infos = &mut self.feature_infos;
        let mut j = 0;
        for i in 1..infos.len() {
            if infos[i].tag != infos[j].tag {
                j += 1;
                infos[j] = infos[i];
                continue;
            }

            let feature = infos[i];
            if feature.flags.contains(F_GLOBAL) {
                infos[j].flags |= F_GLOBAL;
                infos[j].max_value = feature.max_value;
                infos[j].default_value = feature.default_value;
            } else {
                infos[j].flags.remove(F_GLOBAL);
                infos[j].max_value = infos[j].max_value.max(feature.max_value);
                // Inherit default_value from j.
            }

            infos[j].flags |= feature.flags & F_HAS_FALLBACK;
            infos[j].stage[0] = infos[j].stage[0].min(feature.stage[0]);
            infos[j].stage[1] = infos[j].stage[1].min(feature.stage[1]);
        }

        infos.truncate(j + 1);
    }

    fn add_lookups(
        &self,
        map: &mut hb_ot_map_t,
        table_index: TableIndex,
        feature_index: u16,
        mask: hb_mask_t,
        flags: hb_ot_map_feature_flags_t,
    ) {
        let Some(table) = &self.tables[table_index] else {
            return;
        };

        let variation_index = self.feature_variations[table_index];
        for index in table.feature_lookups(feature_index, variation_index) {
            map.lookups[table_index].push(lookup_map_t {
                index,
                auto_zwnj: !flags.contains(F_MANUAL_ZWNJ),
                auto_zwj: !flags.contains(F_MANUAL_ZWJ),
                random: flags.contains(F_RANDOM),
                per_syllable: flags.contains(F_PER_SYLLABLE),
                mask,
            });
        }
    }
}

// Number of bits needed to store `v`.
fn bit_storage(v: u32) -> u32 {
    u32::BITS - v.leading_zeros()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> hb_ot_map_builder_t<'static> {
        hb_ot_map_builder_t::with_tables([None, None], [None, None], None, None)
    }

    #[test]
    fn bit_storage_counts_bits() {
        assert_eq!(bit_storage(0), 0);
        assert_eq!(bit_storage(1), 1);
        assert_eq!(bit_storage(2), 2);
        assert_eq!(bit_storage(255), 8);
        assert_eq!(bit_storage(256), 9);
    }

    #[test]
    fn features_missing_from_font_are_dropped() {
        let mut builder = builder();
        builder.enable_feature(hb_tag_t::new(b"liga"), F_NONE, 1);
        builder.add_feature(hb_tag_t::new(b"frac"), F_NONE, 1);
        let map = builder.compile();
        assert_eq!(map.get_1_mask(hb_tag_t::new(b"liga")), 0);
        assert_eq!(map.get_1_mask(hb_tag_t::new(b"frac")), 0);
        assert_eq!(map.global_mask(), 1 << 3);
    }

    #[test]
    fn fallback_features_get_bits() {
        let mut builder = builder();
        builder.enable_feature(hb_tag_t::new(b"kern"), F_HAS_FALLBACK, 1);
        builder.add_feature(hb_tag_t::new(b"mark"), F_HAS_FALLBACK, 1);
        builder.enable_feature(hb_tag_t::new(b"rand"), F_HAS_FALLBACK | F_RANDOM, HB_OT_MAP_MAX_VALUE);
        let map = builder.compile();

        // Global binary features share the global bit.
        let (kern_mask, kern_shift) = map.get_mask(hb_tag_t::new(b"kern"));
        assert_eq!(kern_mask, 1 << 3);
        assert_eq!(kern_shift, 3);
        assert!(map.needs_fallback(hb_tag_t::new(b"kern")));

        // `mark` sorts before `rand` and gets the first free bit.
        assert_eq!(map.get_mask(hb_tag_t::new(b"mark")), (1 << 4, 4));
        assert_eq!(map.global_mask() & (1 << 4), 0);

        // `rand` needs eight bits and defaults to its maximum value.
        let (rand_mask, rand_shift) = map.get_mask(hb_tag_t::new(b"rand"));
        assert_eq!(rand_shift, 5);
        assert_eq!(rand_mask, 0xFF << 5);
        assert_eq!(map.global_mask() & rand_mask, rand_mask);
        assert_eq!(map.get_1_mask(hb_tag_t::new(b"rand")), 1 << 5);
    }

    #[test]
    fn duplicate_features_are_merged() {
        let mut builder = builder();
        builder.add_feature(hb_tag_t::new(b"aalt"), F_HAS_FALLBACK, 3);
        builder.add_gsub_pause(None);
        builder.enable_feature(hb_tag_t::new(b"aalt"), F_NONE, 1);
        let map = builder.compile();

        // The later global setting wins, and the earliest stage is kept.
        let feature = map.get_map(hb_tag_t::new(b"aalt")).unwrap();
        assert_eq!(feature.mask, 1 << 3);
        assert_eq!(feature.stage[TableIndex::GSUB as usize], 0);
    }

    #[test]
    fn disabled_features_get_no_bits() {
        let mut builder = builder();
        builder.add_feature(hb_tag_t::new(b"kern"), F_HAS_FALLBACK, 1);
        builder.disable_feature(hb_tag_t::new(b"kern"));
        let map = builder.compile();
        assert!(map.get_map(hb_tag_t::new(b"kern")).is_none());
    }

    #[test]
    fn compile_is_deterministic() {
        let build = || {
            let mut builder = builder();
            for tag in [b"ccmp", b"abvs", b"zero", b"blws"] {
                builder.add_feature(hb_tag_t::new(tag), F_HAS_FALLBACK, 1);
            }
            let map = builder.compile();
            map.features.iter().map(|f| (f.tag, f.mask)).collect::<Vec<_>>()
        };
        assert_eq!(build(), build());
    }

    #[test]
    fn every_stage_is_closed() {
        let mut builder = builder();
        builder.add_gsub_pause(None);
        builder.add_gsub_pause(None);
        let map = builder.compile();
        assert_eq!(map.stages(TableIndex::GSUB).len(), 3);
        assert_eq!(map.stages(TableIndex::GPOS).len(), 1);
        assert!(map.stage_lookups(TableIndex::GSUB, 1).is_empty());
    }
}
