//! Access to the OpenType layout tables (GSUB, GPOS and GDEF) and the legacy `kern` table.
//!
//! [`OtCache`] is built once per face and owns the parsed lookups.
//! [`OtTables`] is the per-font view that adds variation coordinates.

use alloc::vec::Vec;

use read_fonts::tables::gdef::Gdef;
use read_fonts::tables::gpos::Gpos;
use read_fonts::tables::kern::Kern;
use read_fonts::tables::gsub::{ClassDef, FeatureList, FeatureVariations, Gsub, ScriptList};
use read_fonts::tables::layout::{Condition, CoverageTable, Feature, LangSys, Script};
use read_fonts::tables::variations::{DeltaSetIndex, ItemVariationStore};
use read_fonts::types::{F2Dot14, GlyphId, GlyphId16};
use read_fonts::{FontRef, ReadError, TableProvider};

use super::buffer::GlyphPropsFlags;
use super::common::TagExt;
use super::hb_tag_t;
use super::ot_layout::TableIndex;
use super::set_digest::hb_set_digest_t;
use lookup::{LookupCache, LookupInfo};

pub mod contextual;
pub mod gpos;
pub mod gsub;
pub mod lookup;

/// Parsed layout tables of a face.
pub struct OtCache<'a> {
    pub(crate) gsub: Option<Gsub<'a>>,
    pub(crate) gpos: Option<Gpos<'a>>,
    pub(crate) gdef: GdefTable<'a>,
    pub(crate) gsub_lookups: LookupCache<'a>,
    pub(crate) gpos_lookups: LookupCache<'a>,
    pub(crate) kern: Option<Kern<'a>>,
}

impl<'a> OtCache<'a> {
    pub fn new(font: &FontRef<'a>) -> Self {
        let gsub = font.gsub().ok();
        let gpos = font.gpos().ok();
        let gsub_lookups = gsub
            .as_ref()
            .map(LookupCache::from_gsub)
            .unwrap_or_default();
        let gpos_lookups = gpos
            .as_ref()
            .map(LookupCache::from_gpos)
            .unwrap_or_default();
        Self {
            gsub,
            gpos,
            gdef: GdefTable::new(font),
            gsub_lookups,
            gpos_lookups,
            kern: font.kern().ok(),
        }
    }

    pub(crate) fn lookups(&self, table_index: TableIndex) -> &LookupCache<'a> {
        match table_index {
            TableIndex::GSUB => &self.gsub_lookups,
            TableIndex::GPOS => &self.gpos_lookups,
        }
    }

    pub(crate) fn layout_table(&self, table_index: TableIndex) -> Option<LayoutTable<'a>> {
        match table_index {
            TableIndex::GSUB => self.gsub.clone().map(LayoutTable::Gsub),
            TableIndex::GPOS => self.gpos.clone().map(LayoutTable::Gpos),
        }
    }
}

#[derive(Default)]
pub(crate) struct GdefTable<'a> {
    table: Option<Gdef<'a>>,
    classes: Option<ClassDef<'a>>,
    mark_classes: Option<ClassDef<'a>>,
    mark_sets: Vec<(hb_set_digest_t, Option<CoverageTable<'a>>)>,
}

impl<'a> GdefTable<'a> {
    fn new(font: &FontRef<'a>) -> Self {
        let Ok(gdef) = font.gdef() else {
            return Self::default();
        };
        let classes = gdef.glyph_class_def().transpose().ok().flatten();
        let mark_classes = gdef.mark_attach_class_def().transpose().ok().flatten();
        let mut mark_sets = Vec::new();
        if let Some(Ok(sets)) = gdef.mark_glyph_sets_def() {
            for coverage in sets.coverages().iter() {
                let coverage = coverage.ok();
                let digest = coverage
                    .as_ref()
                    .map(hb_set_digest_t::from_coverage)
                    .unwrap_or_default();
                mark_sets.push((digest, coverage));
            }
        }
        Self {
            table: Some(gdef),
            classes,
            mark_classes,
            mark_sets,
        }
    }
}

/// Layout tables of a font instance.
pub struct OtTables<'a> {
    pub(crate) cache: &'a OtCache<'a>,
    pub(crate) coords: Vec<F2Dot14>,
    var_store: Option<ItemVariationStore<'a>>,
    /// Feature variation record selected by the coordinates, per table.
    pub(crate) feature_variations: [Option<u32>; 2],
}

impl<'a> OtTables<'a> {
    pub fn new(cache: &'a OtCache<'a>, coords: Vec<F2Dot14>) -> Self {
        let has_variations = coords.iter().any(|coord| *coord != F2Dot14::ZERO);
        let var_store = if has_variations {
            cache
                .gdef
                .table
                .as_ref()
                .and_then(|gdef| gdef.item_var_store().transpose().ok().flatten())
        } else {
            None
        };
        let mut feature_variations = [None; 2];
        for table_index in [TableIndex::GSUB, TableIndex::GPOS] {
            feature_variations[table_index as usize] = cache
                .layout_table(table_index)
                .and_then(|table| table.feature_variation_index(&coords));
        }
        Self {
            cache,
            coords,
            var_store,
            feature_variations,
        }
    }

    pub(crate) fn has_glyph_classes(&self) -> bool {
        self.cache.gdef.classes.is_some()
    }

    pub(crate) fn has_gsub(&self) -> bool {
        self.cache.gsub.is_some()
    }

    pub(crate) fn has_gpos(&self) -> bool {
        self.cache.gpos.is_some()
    }

    pub(crate) fn glyph_class(&self, glyph: GlyphId) -> u16 {
        self.cache
            .gdef
            .classes
            .as_ref()
            .map_or(0, |classes| GlyphId16::try_from(glyph).map_or(0, |glyph| classes.get(glyph)))
    }

    fn glyph_mark_attachment_class(&self, glyph: GlyphId) -> u16 {
        self.cache
            .gdef
            .mark_classes
            .as_ref()
            .map_or(0, |classes| GlyphId16::try_from(glyph).map_or(0, |glyph| classes.get(glyph)))
    }

    /// GDEF class of a glyph, in the layout of [`GlyphPropsFlags`], with the
    /// mark attachment class in the high byte.
    pub(crate) fn glyph_props(&self, glyph: GlyphId) -> u16 {
        match self.glyph_class(glyph) {
            1 => GlyphPropsFlags::BASE_GLYPH.bits(),
            2 => GlyphPropsFlags::LIGATURE.bits(),
            3 => {
                let class = self.glyph_mark_attachment_class(glyph);
                (class << 8) | GlyphPropsFlags::MARK.bits()
            }
            _ => 0,
        }
    }

    pub(crate) fn is_mark_glyph(&self, glyph: u32, set_index: u16) -> bool {
        let Some((digest, coverage)) = self.cache.gdef.mark_sets.get(set_index as usize) else {
            return false;
        };
        digest.may_have(glyph)
            && coverage
                .as_ref()
                .is_some_and(|coverage| coverage.get(GlyphId::new(glyph)).is_some())
    }

    pub(crate) fn lookup(&self, table_index: TableIndex, index: u16) -> Option<&'a LookupInfo<'a>> {
        self.cache.lookups(table_index).get(index)
    }

    pub(crate) fn lookup_count(&self, table_index: TableIndex) -> u16 {
        self.cache.lookups(table_index).len() as u16
    }

    pub(crate) fn layout_table(&self, table_index: TableIndex) -> Option<LayoutTable<'a>> {
        self.cache.layout_table(table_index)
    }

    pub(crate) fn has_variations(&self) -> bool {
        self.var_store.is_some()
    }

    pub(crate) fn has_nonzero_coords(&self) -> bool {
        self.coords.iter().any(|coord| *coord != F2Dot14::ZERO)
    }

    /// Delta for a device table that refers into the GDEF variation store.
    pub(crate) fn variation_delta(&self, outer: u16, inner: u16) -> f32 {
        let Some(store) = self.var_store.as_ref() else {
            return 0.0;
        };
        store
            .compute_delta(DeltaSetIndex { outer, inner }, &self.coords)
            .map(|delta| delta as f32)
            .unwrap_or_default()
    }
}

/// Either of the two lookup based layout tables.
#[derive(Clone)]
pub enum LayoutTable<'a> {
    Gsub(Gsub<'a>),
    Gpos(Gpos<'a>),
}

impl<'a> LayoutTable<'a> {
    fn script_list(&self) -> Option<ScriptList<'a>> {
        match self {
            Self::Gsub(gsub) => gsub.script_list().ok(),
            Self::Gpos(gpos) => gpos.script_list().ok(),
        }
    }

    fn feature_list(&self) -> Option<FeatureList<'a>> {
        match self {
            Self::Gsub(gsub) => gsub.feature_list().ok(),
            Self::Gpos(gpos) => gpos.feature_list().ok(),
        }
    }

    fn feature_variations(&self) -> Option<FeatureVariations<'a>> {
        let variations = match self {
            Self::Gsub(gsub) => gsub.feature_variations(),
            Self::Gpos(gpos) => gpos.feature_variations(),
        };
        variations.transpose().ok().flatten()
    }

    fn script(&self, index: u16) -> Option<Script<'a>> {
        let list = self.script_list()?;
        let record = list.script_records().get(index as usize)?;
        record.script(list.offset_data()).ok()
    }

    fn langsys(&self, script_index: u16, langsys_index: Option<u16>) -> Option<LangSys<'a>> {
        let script = self.script(script_index)?;
        match langsys_index {
            Some(index) => script
                .lang_sys_records()
                .get(index as usize)?
                .lang_sys(script.offset_data())
                .ok(),
            None => script.default_lang_sys().transpose().ok().flatten(),
        }
    }

    pub(crate) fn feature(&self, index: u16) -> Option<Feature<'a>> {
        let list = self.feature_list()?;
        let record = list.feature_records().get(index as usize)?;
        record.feature(list.offset_data()).ok()
    }

    fn feature_tag(&self, index: u16) -> Option<hb_tag_t> {
        let list = self.feature_list()?;
        let record = list.feature_records().get(index as usize)?;
        Some(record.feature_tag())
    }

    /// Lookup indices of a feature, after applying a feature variation
    /// substitution when one is active.
    pub(crate) fn feature_lookups(&self, feature_index: u16, variation_index: Option<u32>) -> Vec<u16> {
        let feature = variation_index
            .and_then(|index| self.feature_substitution(index, feature_index))
            .or_else(|| self.feature(feature_index));
        feature
            .map(|feature| {
                feature
                    .lookup_list_indices()
                    .iter()
                    .map(|index| index.get())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Index of the first feature variation record whose condition set is
    /// satisfied by `coords`.
    pub(crate) fn feature_variation_index(&self, coords: &[F2Dot14]) -> Option<u32> {
        let variations = self.feature_variations()?;
        let data = variations.offset_data();
        for (index, record) in variations.feature_variation_records().iter().enumerate() {
            // A null condition set matches everything.
            if record.condition_set_offset().is_null() {
                return Some(index as u32);
            }
            let Some(Ok(condition_set)) = record.condition_set(data) else {
                continue;
            };
            let matched = condition_set.conditions().iter().all(|condition| match condition {
                Ok(Condition::Format1AxisRange(range)) => {
                    let coord = coords
                        .get(range.axis_index() as usize)
                        .copied()
                        .unwrap_or_default();
                    range.filter_range_min_value() <= coord && coord <= range.filter_range_max_value()
                }
                _ => false,
            });
            if matched {
                return Some(index as u32);
            }
        }
        None
    }

    fn feature_substitution(&self, variation_index: u32, feature_index: u16) -> Option<Feature<'a>> {
        let variations = self.feature_variations()?;
        let record = variations
            .feature_variation_records()
            .get(variation_index as usize)?;
        let substitution = record
            .feature_table_substitution(variations.offset_data())?
            .ok()?;
        let records = substitution.substitutions();
        let found = records
            .binary_search_by_key(&feature_index, |record| record.feature_index())
            .ok()?;
        records
            .get(found)?
            .alternate_feature(substitution.offset_data())
            .ok()
    }

    /// Index of a feature in the table-wide feature list.
    pub(crate) fn feature_index(&self, tag: hb_tag_t) -> Option<u16> {
        self.feature_list()?
            .feature_records()
            .iter()
            .position(|record| record.feature_tag() == tag)
            .map(|index| index as u16)
    }

    /// Picks the first script of `script_tags` present in the table.
    ///
    /// Falls back to `DFLT`, `dflt` and `latn`. The returned flag tells
    /// whether one of the requested tags was found.
    pub(crate) fn select_script(&self, script_tags: &[hb_tag_t]) -> Option<(bool, u16, hb_tag_t)> {
        let list = self.script_list()?;
        let find = |tag: hb_tag_t| {
            list.script_records()
                .binary_search_by_key(&tag, |record| record.script_tag())
                .ok()
                .map(|index| index as u16)
        };
        for &tag in script_tags {
            if let Some(index) = find(tag) {
                return Some((true, index, tag));
            }
        }
        for tag in [
            hb_tag_t::default_script(),
            hb_tag_t::default_language(),
            hb_tag_t::new(b"latn"),
        ] {
            if let Some(index) = find(tag) {
                return Some((false, index, tag));
            }
        }
        None
    }

    pub(crate) fn select_script_language(&self, script_index: u16, lang_tags: &[hb_tag_t]) -> Option<u16> {
        let script = self.script(script_index)?;
        let find = |tag: hb_tag_t| {
            script
                .lang_sys_records()
                .binary_search_by_key(&tag, |record| record.lang_sys_tag())
                .ok()
                .map(|index| index as u16)
        };
        lang_tags
            .iter()
            .find_map(|&tag| find(tag))
            .or_else(|| find(hb_tag_t::default_language()))
    }

    pub(crate) fn get_required_language_feature(
        &self,
        script_index: u16,
        lang_index: Option<u16>,
    ) -> Option<(u16, hb_tag_t)> {
        let sys = self.langsys(script_index, lang_index)?;
        let index = sys.required_feature_index();
        if index == 0xFFFF {
            return None;
        }
        Some((index, self.feature_tag(index)?))
    }

    /// Index of `feature_tag` among the features of a language system.
    pub(crate) fn find_language_feature(
        &self,
        script_index: u16,
        lang_index: Option<u16>,
        feature_tag: hb_tag_t,
    ) -> Option<u16> {
        let sys = self.langsys(script_index, lang_index)?;
        sys.feature_indices()
            .iter()
            .map(|index| index.get())
            .find(|&index| self.feature_tag(index) == Some(feature_tag))
    }
}

pub(crate) fn coverage_index(coverage: Result<CoverageTable, ReadError>, glyph: GlyphId) -> Option<u16> {
    coverage.ok()?.get(glyph)
}

pub(crate) fn covered(coverage: Result<CoverageTable, ReadError>, glyph: GlyphId) -> bool {
    coverage_index(coverage, glyph).is_some()
}

pub(crate) fn glyph_class(class_def: Result<ClassDef, ReadError>, glyph: GlyphId) -> u16 {
    class_def
        .map(|class_def| GlyphId16::try_from(glyph).map_or(0, |glyph| class_def.get(glyph)))
        .unwrap_or(0)
}
