//! Matching of glyph patterns.

use read_fonts::types::GlyphId;
use smallvec::SmallVec;

use super::buffer::{hb_buffer_t, GlyphInfo, GlyphPropsFlags};
use super::face::hb_font_t;
use super::hb_mask_t;
use super::ot_layout::*;
use super::ot_layout_common::lookup_flags;
use super::unicode::GeneralCategory;
use read_fonts::tables::layout::SequenceLookupRecord;

pub(crate) type MatchPositions = SmallVec<[u32; 8]>;

/// Predicate comparing a buffer glyph against the `index`-th element of a
/// pattern.
pub(crate) type MatchFunc<'a> = &'a dyn Fn(&GlyphInfo, u16) -> bool;

/// Matches the current glyph and the ones after it.
///
/// On success `ctx.match_positions` holds the buffer indices of every input
/// component, including the first one.
pub(crate) fn match_input(
    ctx: &mut hb_ot_apply_context_t,
    input_len: u16,
    match_func: MatchFunc,
    end_position: &mut usize,
    p_total_component_count: Option<&mut u8>,
) -> bool {
    // Ligatures cannot be formed across glyphs attached to different
    // components of previous ligatures, e.g. in LAM,SHADDA,LAM,FATHA,HEH
    // after LAM,LAM,HEH ligated, SHADDA,FATHA must not ligate. Marks that
    // belong to the ligating glyph itself are fine, as are marks of an
    // ignored ligature base.
    #[derive(PartialEq)]
    enum Ligbase {
        NotChecked,
        MayNotSkip,
        MaySkip,
    }

    let count = usize::from(input_len) + 1;
    if count > MAX_CONTEXT_LENGTH {
        return false;
    }

    let first = *ctx.buffer.cur(0);
    let mut positions = MatchPositions::new();
    positions.push(ctx.buffer.idx as u32);

    if count == 1 {
        *end_position = ctx.buffer.idx + 1;
        ctx.match_positions = positions;
        if let Some(total) = p_total_component_count {
            *total = first.lig_num_comps();
        }
        return true;
    }

    let first_lig_id = first.lig_id();
    let first_lig_comp = first.lig_comp();
    let mut total_component_count = first.lig_num_comps();
    let mut ligbase = Ligbase::NotChecked;

    {
        let mut iter = skipping_iterator_t::new(ctx, false, Some(match_func));
        iter.reset(ctx.buffer.idx);

        for _ in 1..count {
            let mut unsafe_to = 0;
            if !iter.next(Some(&mut unsafe_to)) {
                *end_position = unsafe_to;
                return false;
            }

            positions.push(iter.index() as u32);

            let this = ctx.buffer.info[iter.index()];
            let this_lig_id = this.lig_id();
            let this_lig_comp = this.lig_comp();

            if first_lig_id != 0 && first_lig_comp != 0 {
                // Components attached to a previous ligature component must all
                // be attached to that same component, unless that base is
                // itself ignored.
                if first_lig_id != this_lig_id || first_lig_comp != this_lig_comp {
                    if ligbase == Ligbase::NotChecked {
                        let out = ctx.buffer.out_info();
                        let mut j = ctx.buffer.out_len;
                        let mut found = false;
                        while j > 0 && out[j - 1].lig_id() == first_lig_id {
                            j -= 1;
                            if out[j].lig_comp() == 0 {
                                found = true;
                                break;
                            }
                        }

                        ligbase = if found && iter.may_skip(&out[j]) == may_skip_t::SKIP_YES {
                            Ligbase::MaySkip
                        } else {
                            Ligbase::MayNotSkip
                        };
                    }

                    if ligbase == Ligbase::MayNotSkip {
                        return false;
                    }
                }
            } else if this_lig_id != 0 && this_lig_comp != 0 && this_lig_id != first_lig_id {
                // Otherwise no component may belong to another ligature.
                return false;
            }

            total_component_count = total_component_count.wrapping_add(this.lig_num_comps());
        }

        *end_position = iter.index() + 1;
    }

    if let Some(total) = p_total_component_count {
        *total = total_component_count;
    }
    ctx.match_positions = positions;
    true
}

pub(crate) fn match_backtrack(
    ctx: &hb_ot_apply_context_t,
    backtrack_len: u16,
    match_func: MatchFunc,
    match_start: &mut usize,
) -> bool {
    if backtrack_len == 0 {
        *match_start = ctx.buffer.backtrack_len();
        return true;
    }

    let mut iter = skipping_iterator_t::new(ctx, true, Some(match_func));
    iter.reset(ctx.buffer.backtrack_len());

    for _ in 0..backtrack_len {
        let mut unsafe_from = 0;
        if !iter.prev(Some(&mut unsafe_from)) {
            *match_start = unsafe_from;
            return false;
        }
    }

    *match_start = iter.index();
    true
}

pub(crate) fn match_lookahead(
    ctx: &hb_ot_apply_context_t,
    lookahead_len: u16,
    match_func: MatchFunc,
    start_index: usize,
    end_index: &mut usize,
) -> bool {
    if lookahead_len == 0 {
        *end_index = start_index;
        return true;
    }

    let mut iter = skipping_iterator_t::new(ctx, true, Some(match_func));
    iter.reset(start_index.saturating_sub(1));

    for _ in 0..lookahead_len {
        let mut unsafe_to = 0;
        if !iter.next(Some(&mut unsafe_to)) {
            *end_index = unsafe_to;
            return false;
        }
    }

    *end_index = iter.index() + 1;
    true
}

#[derive(PartialEq, Eq, Copy, Clone)]
pub enum match_t {
    MATCH,
    NOT_MATCH,
    SKIP,
}

#[derive(PartialEq, Eq, Copy, Clone)]
enum may_match_t {
    MATCH_NO,
    MATCH_YES,
    MATCH_MAYBE,
}

#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub enum may_skip_t {
    SKIP_NO,
    SKIP_YES,
    SKIP_MAYBE,
}

/// Decides which glyphs a lookup may match or must skip.
#[derive(Clone, Copy, Default)]
pub struct matcher_t {
    lookup_props: u32,
    mask: hb_mask_t,
    ignore_zwnj: bool,
    ignore_zwj: bool,
    ignore_hidden: bool,
    per_syllable: bool,
}

impl matcher_t {
    fn new(ctx: &hb_ot_apply_context_t, context_match: bool) -> Self {
        matcher_t {
            lookup_props: ctx.lookup_props,
            // GPOS always skips ZWNJ. GSUB context matching does when asked to.
            ignore_zwnj: ctx.table_index == TableIndex::GPOS || (context_match && ctx.auto_zwnj),
            ignore_zwj: context_match || ctx.auto_zwj,
            // Hidden glyphs like CGJ only block GSUB.
            ignore_hidden: ctx.table_index == TableIndex::GPOS,
            mask: if context_match {
                u32::MAX
            } else {
                ctx.lookup_mask()
            },
            per_syllable: ctx.table_index == TableIndex::GSUB && ctx.per_syllable,
        }
    }

    fn may_match(
        &self,
        info: &GlyphInfo,
        glyph_data: u16,
        match_func: Option<MatchFunc>,
        syllable: u8,
    ) -> may_match_t {
        if (info.mask & self.mask) == 0
            || (self.per_syllable && syllable != 0 && syllable != info.syllable())
        {
            return may_match_t::MATCH_NO;
        }

        match match_func {
            Some(f) if f(info, glyph_data) => may_match_t::MATCH_YES,
            Some(_) => may_match_t::MATCH_NO,
            None => may_match_t::MATCH_MAYBE,
        }
    }

    fn may_skip(&self, info: &GlyphInfo, font: &hb_font_t) -> may_skip_t {
        if !check_glyph_property(font, info, self.lookup_props) {
            return may_skip_t::SKIP_YES;
        }

        if info.is_default_ignorable()
            && (self.ignore_zwnj || !info.is_zwnj())
            && (self.ignore_zwj || !info.is_zwj())
            && (self.ignore_hidden || !info.is_hidden())
        {
            return may_skip_t::SKIP_MAYBE;
        }

        may_skip_t::SKIP_NO
    }
}

/// Walks the buffer from a start position, skipping the glyphs the current
/// lookup ignores.
///
/// Borrows the buffer immutably: callers record what they matched and write
/// it back once the iterator is gone.
pub struct skipping_iterator_t<'a> {
    buffer: &'a hb_buffer_t,
    font: &'a hb_font_t<'a>,
    matcher: matcher_t,
    match_func: Option<MatchFunc<'a>>,
    glyph_data: u16,
    buf_idx: usize,
    buf_len: usize,
    syllable: u8,
}

#[derive(Clone, Copy)]
pub(crate) enum MatchSource {
    Info,
    OutInfo,
}

impl<'a> skipping_iterator_t<'a> {
    pub fn new(
        ctx: &'a hb_ot_apply_context_t,
        context_match: bool,
        match_func: Option<MatchFunc<'a>>,
    ) -> Self {
        skipping_iterator_t {
            buffer: &*ctx.buffer,
            font: ctx.font,
            matcher: matcher_t::new(ctx, context_match),
            match_func,
            glyph_data: 0,
            buf_idx: ctx.buffer.idx,
            buf_len: ctx.buffer.len,
            syllable: 0,
        }
    }

    /// Overrides the lookup flags, e.g. to apply the `kern` table with
    /// marks ignored.
    pub fn set_lookup_props(&mut self, lookup_props: u32) {
        self.matcher.lookup_props = lookup_props;
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.buf_idx
    }

    pub fn reset(&mut self, start_index: usize) {
        self.buf_idx = start_index;
        self.buf_len = self.buffer.len;
        self.glyph_data = 0;
        self.syllable = if self.buffer.idx == start_index && start_index < self.buffer.len {
            self.buffer.cur(0).syllable()
        } else {
            0
        };
    }

    pub fn may_skip(&self, info: &GlyphInfo) -> may_skip_t {
        self.matcher.may_skip(info, self.font)
    }

    pub fn next(&mut self, unsafe_to: Option<&mut usize>) -> bool {
        while self.buf_idx + 1 < self.buf_len {
            self.buf_idx += 1;

            match self.match_at(self.buf_idx, MatchSource::Info) {
                match_t::MATCH => {
                    self.glyph_data += 1;
                    return true;
                }
                match_t::NOT_MATCH => {
                    if let Some(unsafe_to) = unsafe_to {
                        *unsafe_to = self.buf_idx + 1;
                    }
                    return false;
                }
                match_t::SKIP => continue,
            }
        }

        if let Some(unsafe_to) = unsafe_to {
            *unsafe_to = self.buf_idx + 1;
        }
        false
    }

    pub fn prev(&mut self, unsafe_from: Option<&mut usize>) -> bool {
        while self.buf_idx > 0 {
            self.buf_idx -= 1;

            match self.match_at(self.buf_idx, MatchSource::OutInfo) {
                match_t::MATCH => {
                    self.glyph_data += 1;
                    return true;
                }
                match_t::NOT_MATCH => {
                    if let Some(unsafe_from) = unsafe_from {
                        *unsafe_from = self.buf_idx.max(1) - 1;
                    }
                    return false;
                }
                match_t::SKIP => continue,
            }
        }

        if let Some(unsafe_from) = unsafe_from {
            *unsafe_from = 0;
        }
        false
    }

    pub(crate) fn match_at(&self, idx: usize, source: MatchSource) -> match_t {
        let info = match source {
            MatchSource::Info => &self.buffer.info[idx],
            MatchSource::OutInfo => &self.buffer.out_info()[idx],
        };

        let skip = self.may_skip(info);
        if skip == may_skip_t::SKIP_YES {
            return match_t::SKIP;
        }

        let matched = self
            .matcher
            .may_match(info, self.glyph_data, self.match_func, self.syllable);
        if matched == may_match_t::MATCH_YES
            || (matched == may_match_t::MATCH_MAYBE && skip == may_skip_t::SKIP_NO)
        {
            return match_t::MATCH;
        }

        if skip == may_skip_t::SKIP_NO {
            return match_t::NOT_MATCH;
        }

        match_t::SKIP
    }
}

/// Applies the nested lookups of a matched (chain) context rule.
pub(crate) fn apply_lookup(
    ctx: &mut hb_ot_apply_context_t,
    input_len: usize,
    match_end: usize,
    lookups: &[SequenceLookupRecord],
) {
    let mut count = (input_len + 1).min(ctx.match_positions.len());

    // Positions are converted to indices into the output buffer.
    let mut end: isize = {
        let backtrack_len = ctx.buffer.backtrack_len();
        let delta = backtrack_len as isize - ctx.buffer.idx as isize;

        for position in ctx.match_positions.iter_mut().take(count) {
            *position = (*position as isize + delta) as u32;
        }

        backtrack_len as isize + match_end as isize - ctx.buffer.idx as isize
    };

    for record in lookups {
        if !ctx.buffer.successful {
            break;
        }

        let idx = usize::from(record.sequence_index());
        if idx >= count {
            continue;
        }

        let orig_len = ctx.buffer.backtrack_len() + ctx.buffer.lookahead_len();

        // Earlier nested lookups may have deleted many glyphs.
        if ctx.match_positions[idx] as usize >= orig_len {
            continue;
        }

        if !ctx.buffer.move_to(ctx.match_positions[idx] as usize) {
            break;
        }

        if ctx.buffer.max_ops <= 0 {
            break;
        }

        if ctx.recurse(record.lookup_list_index()).is_none() {
            continue;
        }

        let new_len = ctx.buffer.backtrack_len() + ctx.buffer.lookahead_len();
        let mut delta = new_len as isize - orig_len as isize;
        if delta == 0 {
            continue;
        }

        // A growing buffer is assumed to have gained glyphs right after the
        // current position. A shrinking one lost match positions after it.
        end += delta;
        if end < ctx.match_positions[idx] as isize {
            // Never rewind past the current position.
            delta += ctx.match_positions[idx] as isize - end;
            end = ctx.match_positions[idx] as isize;
        }

        let mut next = idx + 1;

        if delta > 0 {
            if delta as usize + count > MAX_CONTEXT_LENGTH {
                break;
            }
            ctx.match_positions.resize(delta as usize + count, 0);
        } else {
            delta = delta.max(next as isize - count as isize);
            next = (next as isize - delta) as usize;
        }

        ctx.match_positions
            .copy_within(next..count, (next as isize + delta) as usize);
        next = (next as isize + delta) as usize;
        count = (count as isize + delta) as usize;
        ctx.match_positions.truncate(count);

        for j in idx + 1..next {
            ctx.match_positions[j] = ctx.match_positions[j - 1] + 1;
        }

        for position in ctx.match_positions.iter_mut().take(count).skip(next) {
            *position = (*position as isize + delta) as u32;
        }
    }

    ctx.buffer.move_to(end.max(0) as usize);
}

/// Find out whether a lookup would be applied.
pub trait WouldApply {
    /// Whether the lookup would be applied.
    fn would_apply(&self, ctx: &WouldApplyContext) -> bool;
}

/// Apply a lookup.
pub trait Apply {
    /// Apply the lookup at the current buffer position.
    ///
    /// Returns `Some` if it did, in which case the buffer cursor has moved.
    fn apply(&self, ctx: &mut hb_ot_apply_context_t) -> Option<()>;
}

pub struct WouldApplyContext<'a> {
    pub glyphs: &'a [GlyphId],
    pub zero_context: bool,
}

fn match_properties_mark(font: &hb_font_t, info: &GlyphInfo, glyph_props: u16, match_props: u32) -> bool {
    // With mark filtering sets, the high word of match_props holds the set
    // index.
    if match_props as u16 & lookup_flags::USE_MARK_FILTERING_SET != 0 {
        let set_index = (match_props >> 16) as u16;
        return font.ot_tables.is_mark_glyph(info.glyph_id, set_index);
    }

    // The second byte selects the mark attachment type to keep.
    if match_props as u16 & lookup_flags::MARK_ATTACHMENT_TYPE_MASK != 0 {
        return (match_props as u16 & lookup_flags::MARK_ATTACHMENT_TYPE_MASK)
            == (glyph_props & lookup_flags::MARK_ATTACHMENT_TYPE_MASK);
    }

    true
}

/// Whether a lookup with the given flags may look at this glyph.
#[inline]
pub(crate) fn check_glyph_property(font: &hb_font_t, info: &GlyphInfo, match_props: u32) -> bool {
    let glyph_props = info.glyph_props();

    // E.g. a ligature glyph under IgnoreLigatures.
    if glyph_props & match_props as u16 & lookup_flags::IGNORE_FLAGS != 0 {
        return false;
    }

    if glyph_props & GlyphPropsFlags::MARK.bits() != 0 {
        return match_properties_mark(font, info, glyph_props, match_props);
    }

    true
}

pub mod OT {
    use super::*;
    use log::trace;

    pub struct hb_ot_apply_context_t<'a> {
        pub table_index: TableIndex,
        pub font: &'a hb_font_t<'a>,
        pub buffer: &'a mut hb_buffer_t,
        lookup_mask: hb_mask_t,
        pub per_syllable: bool,
        pub lookup_index: u16,
        pub lookup_props: u32,
        pub nesting_level_left: usize,
        pub auto_zwnj: bool,
        pub auto_zwj: bool,
        pub random: bool,
        pub random_state: u32,
        pub new_syllables: Option<u8>,
        pub last_base: i32,
        pub last_base_until: u32,
        pub(crate) match_positions: MatchPositions,
    }

    impl<'a> hb_ot_apply_context_t<'a> {
        pub fn new(
            table_index: TableIndex,
            font: &'a hb_font_t<'a>,
            buffer: &'a mut hb_buffer_t,
        ) -> Self {
            Self {
                table_index,
                font,
                buffer,
                lookup_mask: 1,
                per_syllable: false,
                lookup_index: u16::MAX,
                lookup_props: 0,
                nesting_level_left: MAX_NESTING_LEVEL,
                auto_zwnj: true,
                auto_zwj: true,
                random: false,
                random_state: 1,
                new_syllables: None,
                last_base: -1,
                last_base_until: 0,
                match_positions: MatchPositions::new(),
            }
        }

        /// minstd_rand.
        pub fn random_number(&mut self) -> u32 {
            self.random_state = self.random_state.wrapping_mul(48271) % (i32::MAX as u32);
            self.random_state
        }

        pub fn set_lookup_mask(&mut self, mask: hb_mask_t) {
            self.lookup_mask = mask;
            self.last_base = -1;
            self.last_base_until = 0;
        }

        pub fn lookup_mask(&self) -> hb_mask_t {
            self.lookup_mask
        }

        pub fn recurse(&mut self, sub_lookup_index: u16) -> Option<()> {
            if self.nesting_level_left == 0 {
                trace!(
                    "nesting limit reached at lookup {}, skipping lookup {}",
                    self.lookup_index,
                    sub_lookup_index
                );
                return None;
            }

            self.buffer.max_ops -= 1;
            if self.buffer.max_ops < 0 {
                trace!("max_ops exhausted in lookup {}", self.lookup_index);
                self.buffer.successful = false;
                return None;
            }

            let font = self.font;
            let lookup = font.ot_tables.lookup(self.table_index, sub_lookup_index)?;

            self.nesting_level_left -= 1;
            let saved_props = self.lookup_props;
            let saved_index = self.lookup_index;
            let saved_match_positions = self.match_positions.clone();

            self.lookup_index = sub_lookup_index;
            self.lookup_props = lookup.props();
            let applied = lookup.apply(self);

            self.lookup_props = saved_props;
            self.lookup_index = saved_index;
            self.match_positions = saved_match_positions;
            self.nesting_level_left += 1;
            applied
        }

        fn set_glyph_class(
            &mut self,
            glyph_id: GlyphId,
            class_guess: GlyphPropsFlags,
            ligature: bool,
            component: bool,
        ) {
            self.buffer.digest.add(glyph_id.to_u32());

            if let Some(syllable) = self.new_syllables {
                self.buffer.cur_mut(0).set_syllable(syllable);
            }

            let has_glyph_classes = self.font.ot_tables.has_glyph_classes();
            let gdef_props = self.font.ot_tables.glyph_props(glyph_id);

            let cur = self.buffer.cur_mut(0);
            let mut props = cur.glyph_props() | GlyphPropsFlags::SUBSTITUTED.bits();

            if ligature {
                // Only the last of ligation and multiplication counts.
                props |= GlyphPropsFlags::LIGATED.bits();
                props &= !GlyphPropsFlags::MULTIPLIED.bits();
            }

            if component {
                props |= GlyphPropsFlags::MULTIPLIED.bits();
            }

            if has_glyph_classes {
                props &= GlyphPropsFlags::PRESERVE.bits();
                cur.set_glyph_props(props | gdef_props);
            } else if !class_guess.is_empty() {
                props &= GlyphPropsFlags::PRESERVE.bits();
                cur.set_glyph_props(props | class_guess.bits());
            } else {
                cur.set_glyph_props(props);
            }
        }

        pub fn replace_glyph(&mut self, glyph_id: GlyphId) {
            self.set_glyph_class(glyph_id, GlyphPropsFlags::empty(), false, false);
            self.buffer.replace_glyph(glyph_id.to_u32());
        }

        pub fn replace_glyph_inplace(&mut self, glyph_id: GlyphId) {
            self.set_glyph_class(glyph_id, GlyphPropsFlags::empty(), false, false);
            self.buffer.cur_mut(0).glyph_id = glyph_id.to_u32();
        }

        pub fn replace_glyph_with_ligature(&mut self, glyph_id: GlyphId, class_guess: GlyphPropsFlags) {
            self.set_glyph_class(glyph_id, class_guess, true, false);
            self.buffer.replace_glyph(glyph_id.to_u32());
        }

        pub fn output_glyph_for_component(&mut self, glyph_id: GlyphId, class_guess: GlyphPropsFlags) {
            self.set_glyph_class(glyph_id, class_guess, false, true);
            self.buffer.output_glyph(glyph_id.to_u32());
        }
    }
}

use OT::hb_ot_apply_context_t;

/// Replaces the matched input with one ligature glyph.
///
/// `count` and `match_end` include the first glyph.
pub(crate) fn ligate_input(
    ctx: &mut hb_ot_apply_context_t,
    count: usize,
    match_end: usize,
    total_component_count: u8,
    lig_glyph: GlyphId,
) {
    // A base ligating with marks stays a base so later marks can attach.
    // If all components are marks this is a mark ligature: it keeps its old
    // lig_id so it can still attach to a ligature component in GPOS.
    // Marks attached to components of inner ligatures, possibly following
    // the last component, are re-pointed at the new component numbers.
    let positions = ctx.match_positions.clone();
    let count = count.min(positions.len());
    if count == 0 {
        return;
    }

    let buffer = &mut *ctx.buffer;
    buffer.merge_clusters(buffer.idx, match_end);

    let mut is_base_ligature = buffer.info[positions[0] as usize].is_base_glyph();
    let mut is_mark_ligature = buffer.info[positions[0] as usize].is_mark();
    for &position in &positions[1..count] {
        if !buffer.info[position as usize].is_mark() {
            is_base_ligature = false;
            is_mark_ligature = false;
        }
    }

    let is_ligature = !is_base_ligature && !is_mark_ligature;
    let class = if is_ligature {
        GlyphPropsFlags::LIGATURE
    } else {
        GlyphPropsFlags::empty()
    };
    let lig_id = if is_ligature {
        buffer.allocate_lig_id()
    } else {
        0
    };

    let first = buffer.cur_mut(0);
    let mut last_lig_id = first.lig_id();
    let mut last_num_comps = first.lig_num_comps();
    let mut comps_so_far = last_num_comps;

    if is_ligature {
        first.set_lig_props_for_ligature(lig_id, total_component_count);
        if first.general_category() == GeneralCategory::NON_SPACING_MARK {
            first.set_general_category(GeneralCategory::OTHER_LETTER);
        }
    }

    ctx.replace_glyph_with_ligature(lig_glyph, class);
    let buffer = &mut *ctx.buffer;

    for &position in &positions[1..count] {
        while buffer.idx < position as usize && buffer.successful {
            if is_ligature {
                let cur = buffer.cur_mut(0);
                let mut this_comp = cur.lig_comp();
                if this_comp == 0 {
                    this_comp = last_num_comps;
                }
                let new_lig_comp = comps_so_far
                    .saturating_sub(last_num_comps)
                    .wrapping_add(this_comp.min(last_num_comps));
                cur.set_lig_props_for_mark(lig_id, new_lig_comp);
            }
            buffer.next_glyph();
        }

        if buffer.idx >= buffer.len {
            break;
        }

        let cur = buffer.cur(0);
        last_lig_id = cur.lig_id();
        last_num_comps = cur.lig_num_comps();
        comps_so_far = comps_so_far.wrapping_add(last_num_comps);

        // Skip the component itself, it is merged into the ligature.
        buffer.idx += 1;
    }

    if !is_mark_ligature && last_lig_id != 0 {
        // Re-adjust components of any marks following.
        for i in buffer.idx..buffer.len {
            let info = &mut buffer.info[i];
            if last_lig_id != info.lig_id() {
                break;
            }

            let this_comp = info.lig_comp();
            if this_comp == 0 {
                break;
            }

            let new_lig_comp = comps_so_far
                .saturating_sub(last_num_comps)
                .wrapping_add(this_comp.min(last_num_comps));
            info.set_lig_props_for_mark(lig_id, new_lig_comp);
        }
    }
}
