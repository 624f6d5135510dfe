//! Lookups and their subtables, parsed once per face.

use alloc::vec::Vec;

use read_fonts::tables::gpos::{
    CursivePosFormat1, Gpos, MarkBasePosFormat1, MarkLigPosFormat1, MarkMarkPosFormat1, PairPos,
    PairPosFormat1, PairPosFormat2, SinglePos, SinglePosFormat1, SinglePosFormat2,
};
use read_fonts::tables::gsub::{
    AlternateSubstFormat1, ExtensionSubstFormat1, Gsub, LigatureSubstFormat1,
    MultipleSubstFormat1, ReverseChainSingleSubstFormat1, SingleSubst, SingleSubstFormat1,
    SingleSubstFormat2,
};
use read_fonts::tables::layout::{
    ChainedSequenceContext, ChainedSequenceContextFormat1, ChainedSequenceContextFormat2,
    ChainedSequenceContextFormat3, CoverageTable, Lookup, LookupFlag, SequenceContext,
    SequenceContextFormat1, SequenceContextFormat2, SequenceContextFormat3,
};
use read_fonts::{FontData, FontRead, Offset, ReadError};

use crate::hb::ot_layout_gsubgpos::{Apply, WouldApply, WouldApplyContext, OT::hb_ot_apply_context_t};
use crate::hb::set_digest::hb_set_digest_t;

/// Every lookup of one GSUB or GPOS table.
#[derive(Default)]
pub struct LookupCache<'a> {
    lookups: Vec<Option<LookupInfo<'a>>>,
}

impl<'a> LookupCache<'a> {
    pub(crate) fn from_gsub(gsub: &Gsub<'a>) -> Self {
        let Ok(list) = gsub.lookup_list() else {
            return Self::default();
        };
        let data = list.offset_data();
        let lookups = list
            .lookup_offsets()
            .iter()
            .map(|offset| {
                let data = data.split_off(offset.get().to_usize())?;
                LookupInfo::parse(data, true).ok()
            })
            .collect();
        Self { lookups }
    }

    pub(crate) fn from_gpos(gpos: &Gpos<'a>) -> Self {
        let Ok(list) = gpos.lookup_list() else {
            return Self::default();
        };
        let data = list.offset_data();
        let lookups = list
            .lookup_offsets()
            .iter()
            .map(|offset| {
                let data = data.split_off(offset.get().to_usize())?;
                LookupInfo::parse(data, false).ok()
            })
            .collect();
        Self { lookups }
    }

    pub fn len(&self) -> usize {
        self.lookups.len()
    }

    pub fn get(&self, index: u16) -> Option<&LookupInfo<'a>> {
        self.lookups.get(index as usize)?.as_ref()
    }
}

/// A parsed lookup.
pub struct LookupInfo<'a> {
    /// Lookup flags in the low 16 bits, mark filtering set in the high 16.
    pub props: u32,
    pub is_subst: bool,
    /// Reverse chaining lookups walk the buffer backwards, in place.
    pub is_reversed: bool,
    pub subtables: Vec<SubtableInfo<'a>>,
    /// Union of the primary coverages of all subtables.
    pub digest: hb_set_digest_t,
}

pub struct SubtableInfo<'a> {
    pub subtable: Subtable<'a>,
    pub digest: hb_set_digest_t,
}

impl<'a> LookupInfo<'a> {
    fn parse(data: FontData<'a>, is_subst: bool) -> Result<Self, ReadError> {
        let lookup: Lookup<()> = Lookup::read(data)?;
        let flag = lookup.lookup_flag();
        let mut props = u32::from(flag.to_bits());
        if flag.to_bits() & LookupFlag::USE_MARK_FILTERING_SET.to_bits() != 0 {
            props |= u32::from(lookup.mark_filtering_set().unwrap_or_default()) << 16;
        }

        let mut info = LookupInfo {
            props,
            is_subst,
            is_reversed: false,
            subtables: Vec::new(),
            digest: hb_set_digest_t::new(),
        };

        let lookup_type = lookup.lookup_type() as u8;
        for offset in lookup.subtable_offsets() {
            let Some(subtable_data) = data.split_off(offset.get().to_usize()) else {
                continue;
            };
            // Broken subtables are dropped, the rest of the lookup still applies.
            let Ok(subtable) = Subtable::read(subtable_data, is_subst, lookup_type) else {
                continue;
            };
            let digest = subtable
                .coverage()
                .map(|coverage| hb_set_digest_t::from_coverage(&coverage))
                .unwrap_or_default();
            info.is_reversed |= matches!(subtable, Subtable::ReverseChainContext(_));
            info.digest.union(&digest);
            info.subtables.push(SubtableInfo { subtable, digest });
        }

        Ok(info)
    }

    #[inline]
    pub fn props(&self) -> u32 {
        self.props
    }

    #[inline]
    pub fn is_reverse(&self) -> bool {
        self.is_reversed
    }

    /// Tries each subtable in order at the current buffer position.
    pub(crate) fn apply(&self, ctx: &mut hb_ot_apply_context_t) -> Option<()> {
        let glyph = ctx.buffer.cur(0).glyph_id;
        if !self.digest.may_have(glyph) {
            return None;
        }
        self.subtables
            .iter()
            .filter(|info| info.digest.may_have(glyph))
            .find_map(|info| info.subtable.apply(ctx))
    }

    pub(crate) fn would_apply(&self, ctx: &WouldApplyContext) -> bool {
        let Some(first) = ctx.glyphs.first() else {
            return false;
        };
        let glyph = first.to_u32();
        self.digest.may_have(glyph)
            && self
                .subtables
                .iter()
                .filter(|info| info.digest.may_have(glyph))
                .any(|info| info.subtable.would_apply(ctx))
    }
}

/// All lookup subtable kinds, with extensions already resolved.
#[derive(Clone)]
pub enum Subtable<'a> {
    SingleSubst1(SingleSubstFormat1<'a>),
    SingleSubst2(SingleSubstFormat2<'a>),
    MultipleSubst1(MultipleSubstFormat1<'a>),
    AlternateSubst1(AlternateSubstFormat1<'a>),
    LigatureSubst1(LigatureSubstFormat1<'a>),
    ReverseChainContext(ReverseChainSingleSubstFormat1<'a>),
    SinglePos1(SinglePosFormat1<'a>),
    SinglePos2(SinglePosFormat2<'a>),
    PairPos1(PairPosFormat1<'a>),
    PairPos2(PairPosFormat2<'a>),
    CursivePos1(CursivePosFormat1<'a>),
    MarkBasePos1(MarkBasePosFormat1<'a>),
    MarkLigPos1(MarkLigPosFormat1<'a>),
    MarkMarkPos1(MarkMarkPosFormat1<'a>),
    Context1(SequenceContextFormat1<'a>),
    Context2(SequenceContextFormat2<'a>),
    Context3(SequenceContextFormat3<'a>),
    ChainContext1(ChainedSequenceContextFormat1<'a>),
    ChainContext2(ChainedSequenceContextFormat2<'a>),
    ChainContext3(ChainedSequenceContextFormat3<'a>),
}

impl<'a> Subtable<'a> {
    fn read(data: FontData<'a>, is_subst: bool, lookup_type: u8) -> Result<Self, ReadError> {
        Ok(match (is_subst, lookup_type) {
            (true, 1) => match SingleSubst::read(data)? {
                SingleSubst::Format1(table) => Self::SingleSubst1(table),
                SingleSubst::Format2(table) => Self::SingleSubst2(table),
            },
            (true, 2) => Self::MultipleSubst1(MultipleSubstFormat1::read(data)?),
            (true, 3) => Self::AlternateSubst1(AlternateSubstFormat1::read(data)?),
            (true, 4) => Self::LigatureSubst1(LigatureSubstFormat1::read(data)?),
            (true, 8) => Self::ReverseChainContext(ReverseChainSingleSubstFormat1::read(data)?),
            (false, 1) => match SinglePos::read(data)? {
                SinglePos::Format1(table) => Self::SinglePos1(table),
                SinglePos::Format2(table) => Self::SinglePos2(table),
            },
            (false, 2) => match PairPos::read(data)? {
                PairPos::Format1(table) => Self::PairPos1(table),
                PairPos::Format2(table) => Self::PairPos2(table),
            },
            (false, 3) => Self::CursivePos1(CursivePosFormat1::read(data)?),
            (false, 4) => Self::MarkBasePos1(MarkBasePosFormat1::read(data)?),
            (false, 5) => Self::MarkLigPos1(MarkLigPosFormat1::read(data)?),
            (false, 6) => Self::MarkMarkPos1(MarkMarkPosFormat1::read(data)?),
            (true, 5) | (false, 7) => match SequenceContext::read(data)? {
                SequenceContext::Format1(table) => Self::Context1(table),
                SequenceContext::Format2(table) => Self::Context2(table),
                SequenceContext::Format3(table) => Self::Context3(table),
            },
            (true, 6) | (false, 8) => match ChainedSequenceContext::read(data)? {
                ChainedSequenceContext::Format1(table) => Self::ChainContext1(table),
                ChainedSequenceContext::Format2(table) => Self::ChainContext2(table),
                ChainedSequenceContext::Format3(table) => Self::ChainContext3(table),
            },
            (true, 7) | (false, 9) => {
                // Both extension formats share this layout.
                let extension = ExtensionSubstFormat1::<()>::read(data)?;
                let inner_type = extension.extension_lookup_type() as u8;
                if inner_type == lookup_type {
                    return Err(ReadError::MalformedData("nested extension"));
                }
                let inner = data
                    .split_off(extension.extension_offset().to_usize())
                    .ok_or(ReadError::OutOfBounds)?;
                return Self::read(inner, is_subst, inner_type);
            }
            _ => return Err(ReadError::MalformedData("unknown lookup type")),
        })
    }

    /// The coverage table that decides whether the subtable can start at a glyph.
    fn coverage(&self) -> Result<CoverageTable<'a>, ReadError> {
        match self {
            Self::SingleSubst1(table) => table.coverage(),
            Self::SingleSubst2(table) => table.coverage(),
            Self::MultipleSubst1(table) => table.coverage(),
            Self::AlternateSubst1(table) => table.coverage(),
            Self::LigatureSubst1(table) => table.coverage(),
            Self::ReverseChainContext(table) => table.coverage(),
            Self::SinglePos1(table) => table.coverage(),
            Self::SinglePos2(table) => table.coverage(),
            Self::PairPos1(table) => table.coverage(),
            Self::PairPos2(table) => table.coverage(),
            Self::CursivePos1(table) => table.coverage(),
            Self::MarkBasePos1(table) => table.mark_coverage(),
            Self::MarkLigPos1(table) => table.mark_coverage(),
            Self::MarkMarkPos1(table) => table.mark1_coverage(),
            Self::Context1(table) => table.coverage(),
            Self::Context2(table) => table.coverage(),
            Self::Context3(table) => table.coverages().get(0),
            Self::ChainContext1(table) => table.coverage(),
            Self::ChainContext2(table) => table.coverage(),
            Self::ChainContext3(table) => table.input_coverages().get(0),
        }
    }

    fn would_apply(&self, ctx: &WouldApplyContext) -> bool {
        match self {
            Self::SingleSubst1(table) => table.would_apply(ctx),
            Self::SingleSubst2(table) => table.would_apply(ctx),
            Self::MultipleSubst1(table) => table.would_apply(ctx),
            Self::AlternateSubst1(table) => table.would_apply(ctx),
            Self::LigatureSubst1(table) => table.would_apply(ctx),
            Self::ReverseChainContext(table) => table.would_apply(ctx),
            Self::Context1(table) => table.would_apply(ctx),
            Self::Context2(table) => table.would_apply(ctx),
            Self::Context3(table) => table.would_apply(ctx),
            Self::ChainContext1(table) => table.would_apply(ctx),
            Self::ChainContext2(table) => table.would_apply(ctx),
            Self::ChainContext3(table) => table.would_apply(ctx),
            _ => false,
        }
    }
}

impl Apply for Subtable<'_> {
    fn apply(&self, ctx: &mut hb_ot_apply_context_t) -> Option<()> {
        match self {
            Self::SingleSubst1(table) => table.apply(ctx),
            Self::SingleSubst2(table) => table.apply(ctx),
            Self::MultipleSubst1(table) => table.apply(ctx),
            Self::AlternateSubst1(table) => table.apply(ctx),
            Self::LigatureSubst1(table) => table.apply(ctx),
            Self::ReverseChainContext(table) => table.apply(ctx),
            Self::SinglePos1(table) => table.apply(ctx),
            Self::SinglePos2(table) => table.apply(ctx),
            Self::PairPos1(table) => table.apply(ctx),
            Self::PairPos2(table) => table.apply(ctx),
            Self::CursivePos1(table) => table.apply(ctx),
            Self::MarkBasePos1(table) => table.apply(ctx),
            Self::MarkLigPos1(table) => table.apply(ctx),
            Self::MarkMarkPos1(table) => table.apply(ctx),
            Self::Context1(table) => table.apply(ctx),
            Self::Context2(table) => table.apply(ctx),
            Self::Context3(table) => table.apply(ctx),
            Self::ChainContext1(table) => table.apply(ctx),
            Self::ChainContext2(table) => table.apply(ctx),
            Self::ChainContext3(table) => table.apply(ctx),
        }
    }
}
