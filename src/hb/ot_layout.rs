//! OpenType layout.

use core::ops::{Index, IndexMut};

use log::trace;

use super::buffer::*;
use super::face::hb_font_t;
use super::ot::lookup::LookupInfo;
use super::ot_layout_gsubgpos::{check_glyph_property, OT};
use super::ot_shape_plan::hb_ot_shape_plan_t;
use super::unicode::{hb_unicode_funcs_t, GeneralCategory};

impl GlyphInfo {
    declare_buffer_var!(u16, 1, 0, GLYPH_PROPS_VAR, glyph_props, set_glyph_props);
    declare_buffer_var!(u8, 1, 2, LIG_PROPS_VAR, lig_props, set_lig_props);
    declare_buffer_var!(u8, 1, 3, SYLLABLE_VAR, syllable, set_syllable);
    declare_buffer_var!(u16, 2, 0, UNICODE_PROPS_VAR, unicode_props, set_unicode_props);
}

impl hb_buffer_t {
    pub(crate) fn allocate_unicode_vars(&mut self) {
        self.allocate_var(GlyphInfo::UNICODE_PROPS_VAR);
    }

    pub(crate) fn deallocate_unicode_vars(&mut self) {
        self.deallocate_var(GlyphInfo::UNICODE_PROPS_VAR);
    }

    pub(crate) fn allocate_gsubgpos_vars(&mut self) {
        self.allocate_var(GlyphInfo::LIG_PROPS_VAR);
        self.allocate_var(GlyphInfo::GLYPH_PROPS_VAR);
    }

    pub(crate) fn deallocate_gsubgpos_vars(&mut self) {
        self.deallocate_var(GlyphInfo::LIG_PROPS_VAR);
        self.deallocate_var(GlyphInfo::GLYPH_PROPS_VAR);
    }

    pub(crate) fn assert_gsubgpos_vars(&self) {
        self.assert_var(GlyphInfo::LIG_PROPS_VAR);
        self.assert_var(GlyphInfo::GLYPH_PROPS_VAR);
    }

    pub(crate) fn assert_unicode_vars(&self) {
        self.assert_var(GlyphInfo::UNICODE_PROPS_VAR);
    }
}

pub const MAX_NESTING_LEVEL: usize = 6;
pub const MAX_CONTEXT_LENGTH: usize = 64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableIndex {
    GSUB = 0,
    GPOS = 1,
}

impl TableIndex {
    pub fn iter() -> impl Iterator<Item = TableIndex> {
        [Self::GSUB, Self::GPOS].iter().copied()
    }
}

impl<T> Index<TableIndex> for [T] {
    type Output = T;

    fn index(&self, table_index: TableIndex) -> &Self::Output {
        &self[table_index as usize]
    }
}

impl<T> IndexMut<TableIndex> for [T] {
    fn index_mut(&mut self, table_index: TableIndex) -> &mut Self::Output {
        &mut self[table_index as usize]
    }
}

/// Sets GDEF glyph classes on the buffer before GSUB runs.
pub fn hb_ot_layout_substitute_start(font: &hb_font_t, buffer: &mut hb_buffer_t) {
    let len = buffer.len;
    for info in &mut buffer.info[..len] {
        info.set_glyph_props(font.ot_tables.glyph_props(info.as_glyph()));
        info.set_lig_props(0);
    }
}

pub fn hb_ot_layout_has_glyph_classes(font: &hb_font_t) -> bool {
    font.ot_tables.has_glyph_classes()
}

/// Applies the lookups of every stage of one table, running the stage pause
/// callbacks in between.
pub fn apply_layout_table(
    plan: &hb_ot_shape_plan_t,
    font: &hb_font_t,
    buffer: &mut hb_buffer_t,
    table_index: TableIndex,
) {
    buffer.update_digest();

    let mut ctx = OT::hb_ot_apply_context_t::new(table_index, font, buffer);

    for (stage_index, stage) in plan.ot_map.stages(table_index).iter().enumerate() {
        trace!("start {:?} stage {}", table_index, stage_index);

        for lookup_map in plan.ot_map.stage_lookups(table_index, stage_index) {
            let Some(lookup) = font.ot_tables.lookup(table_index, lookup_map.index) else {
                continue;
            };

            if !lookup.digest.may_intersect(&ctx.buffer.digest) {
                continue;
            }

            trace!("start lookup {}", lookup_map.index);
            ctx.lookup_index = lookup_map.index;
            ctx.set_lookup_mask(lookup_map.mask);
            ctx.auto_zwj = lookup_map.auto_zwj;
            ctx.auto_zwnj = lookup_map.auto_zwnj;
            ctx.random = lookup_map.random;
            ctx.per_syllable = lookup_map.per_syllable;

            apply_string(&mut ctx, lookup);
            trace!("end lookup {}", lookup_map.index);
        }

        if let Some(func) = stage.pause_func {
            if func(plan, font, ctx.buffer) {
                ctx.buffer.update_digest();
            }
        }

        trace!("end {:?} stage {}", table_index, stage_index);
    }
}

fn apply_string(ctx: &mut OT::hb_ot_apply_context_t, lookup: &LookupInfo) {
    if ctx.buffer.is_empty() || ctx.lookup_mask() == 0 {
        return;
    }

    ctx.lookup_props = lookup.props();

    if !lookup.is_reverse() {
        // GSUB writes to the output buffer, GPOS works in place.
        let in_place = ctx.table_index == TableIndex::GPOS;
        if !in_place {
            ctx.buffer.clear_output();
        }
        ctx.buffer.idx = 0;
        apply_forward(ctx, lookup);

        if !in_place {
            ctx.buffer.sync();
        }
    } else {
        // Reverse chaining substitutions work in place, backwards.
        debug_assert!(!ctx.buffer.have_output);
        ctx.buffer.idx = ctx.buffer.len - 1;
        apply_backward(ctx, lookup);
    }
}

fn may_apply_at_cursor(ctx: &OT::hb_ot_apply_context_t, lookup: &LookupInfo) -> bool {
    let cur = ctx.buffer.cur(0);
    lookup.digest.may_have(cur.glyph_id)
        && (cur.mask & ctx.lookup_mask()) != 0
        && check_glyph_property(ctx.font, cur, ctx.lookup_props)
}

fn apply_forward(ctx: &mut OT::hb_ot_apply_context_t, lookup: &LookupInfo) -> bool {
    let mut ret = false;
    while ctx.buffer.idx < ctx.buffer.len && ctx.buffer.successful {
        if may_apply_at_cursor(ctx, lookup) && lookup.apply(ctx).is_some() {
            ret = true;
        } else {
            ctx.buffer.next_glyph();
        }
    }
    ret
}

fn apply_backward(ctx: &mut OT::hb_ot_apply_context_t, lookup: &LookupInfo) -> bool {
    let mut ret = false;
    loop {
        if may_apply_at_cursor(ctx, lookup) {
            ret |= lookup.apply(ctx).is_some();
        }

        if ctx.buffer.idx == 0 {
            break;
        }
        ctx.buffer.idx -= 1;
    }
    ret
}

// unicode_props is two bytes. The low byte holds a modified general
// category (5 bits) and the IGNORABLE, HIDDEN and CONTINUATION bits. The
// high byte depends on the category: the modified combining class for
// marks, ZWJ/ZWNJ/VS bits for Cf, the space fallback type for Zs.
//
// Variation selectors are Mn but have their category changed to Cf and the
// CF_VS bit set, so they can be told apart from other marks.

impl GlyphInfo {
    /// Computes the Unicode properties of the code point this glyph holds.
    pub(crate) fn init_unicode_props(&mut self, scratch_flags: &mut hb_buffer_scratch_flags_t) {
        use super::unicode::CharExt;

        let u = self.glyph_id;
        let gen_cat = u.general_category();
        let mut props = u16::from(gen_cat.to_u8());

        if u >= 0x80 {
            *scratch_flags |= HB_BUFFER_SCRATCH_FLAG_HAS_NON_ASCII;

            if u.is_default_ignorable() {
                *scratch_flags |= HB_BUFFER_SCRATCH_FLAG_HAS_DEFAULT_IGNORABLES;
                props |= UnicodeProps::IGNORABLE.bits();

                match u {
                    0x200C => props |= UnicodeProps::CF_ZWNJ.bits(),
                    0x200D => props |= UnicodeProps::CF_ZWJ.bits(),
                    // Mongolian free variation selectors and TAG characters
                    // are hidden but must not be ignored during matching.
                    0x180B..=0x180D | 0x180F | 0xE0020..=0xE007F => {
                        props |= UnicodeProps::HIDDEN.bits();
                    }
                    // COMBINING GRAPHEME JOINER.
                    0x034F => {
                        *scratch_flags |= HB_BUFFER_SCRATCH_FLAG_HAS_CGJ;
                        props |= UnicodeProps::HIDDEN.bits();
                    }
                    _ => {}
                }
            }

            if gen_cat.is_mark() {
                props |= UnicodeProps::CONTINUATION.bits();
                props |= u16::from(u.modified_combining_class()) << 8;
            }
        }

        self.set_unicode_props(props);
    }

    #[inline]
    pub(crate) fn set_general_category(&mut self, gen_cat: GeneralCategory) {
        // Clears the top byte.
        let n = u16::from(gen_cat.to_u8())
            | (self.unicode_props() & (0xFF & !UnicodeProps::GENERAL_CATEGORY.bits()));
        self.set_unicode_props(n);
    }

    #[inline]
    pub(crate) fn general_category(&self) -> GeneralCategory {
        let n = self.unicode_props() & UnicodeProps::GENERAL_CATEGORY.bits();
        GeneralCategory(n as u8)
    }

    #[inline]
    pub(crate) fn is_unicode_mark(&self) -> bool {
        self.general_category().is_mark()
    }

    #[inline]
    pub(crate) fn set_modified_combining_class(&mut self, modified_class: u8) {
        if !self.is_unicode_mark() {
            return;
        }
        let n = (u16::from(modified_class) << 8) | (self.unicode_props() & 0xFF);
        self.set_unicode_props(n);
    }

    #[inline]
    pub(crate) fn modified_combining_class(&self) -> u8 {
        if self.is_unicode_mark() {
            (self.unicode_props() >> 8) as u8
        } else {
            0
        }
    }

    #[inline]
    pub(crate) fn is_unicode_space(&self) -> bool {
        self.general_category() == GeneralCategory::SPACE_SEPARATOR
    }

    #[inline]
    pub(crate) fn set_unicode_space_fallback_type(&mut self, s: hb_unicode_funcs_t::space_t) {
        if !self.is_unicode_space() {
            return;
        }
        let n = (u16::from(s) << 8) | (self.unicode_props() & 0xFF);
        self.set_unicode_props(n);
    }

    #[inline]
    pub(crate) fn unicode_space_fallback_type(&self) -> hb_unicode_funcs_t::space_t {
        if self.is_unicode_space() {
            (self.unicode_props() >> 8) as u8
        } else {
            hb_unicode_funcs_t::NOT_SPACE
        }
    }

    #[inline]
    pub(crate) fn is_variation_selector(&self) -> bool {
        self.general_category() == GeneralCategory::FORMAT
            && (self.unicode_props() & UnicodeProps::CF_VS.bits()) != 0
    }

    #[inline]
    pub(crate) fn set_variation_selector(&mut self, customize: bool) {
        if customize {
            self.set_general_category(GeneralCategory::FORMAT);
            self.set_unicode_props(self.unicode_props() | UnicodeProps::CF_VS.bits());
        } else {
            self.set_general_category(GeneralCategory::NON_SPACING_MARK);
        }
    }

    #[inline]
    pub(crate) fn is_default_ignorable(&self) -> bool {
        let n = self.unicode_props() & UnicodeProps::IGNORABLE.bits();
        n != 0 && !self.substituted()
    }

    #[inline]
    pub(crate) fn clear_default_ignorable(&mut self) {
        let n = self.unicode_props() & !UnicodeProps::IGNORABLE.bits();
        self.set_unicode_props(n);
    }

    #[inline]
    pub(crate) fn is_hidden(&self) -> bool {
        (self.unicode_props() & UnicodeProps::HIDDEN.bits()) != 0
    }

    #[inline]
    pub(crate) fn unhide(&mut self) {
        let n = self.unicode_props() & !UnicodeProps::HIDDEN.bits();
        self.set_unicode_props(n);
    }

    #[inline]
    pub(crate) fn set_continuation(&mut self) {
        let n = self.unicode_props() | UnicodeProps::CONTINUATION.bits();
        self.set_unicode_props(n);
    }

    #[inline]
    pub(crate) fn reset_continuation(&mut self) {
        let n = self.unicode_props() & !UnicodeProps::CONTINUATION.bits();
        self.set_unicode_props(n);
    }

    #[inline]
    pub(crate) fn is_continuation(&self) -> bool {
        self.unicode_props() & UnicodeProps::CONTINUATION.bits() != 0
    }

    #[inline]
    pub(crate) fn is_unicode_format(&self) -> bool {
        self.general_category() == GeneralCategory::FORMAT
    }

    #[inline]
    pub(crate) fn is_zwnj(&self) -> bool {
        self.is_unicode_format() && (self.unicode_props() & UnicodeProps::CF_ZWNJ.bits() != 0)
    }

    #[inline]
    pub(crate) fn is_zwj(&self) -> bool {
        self.is_unicode_format() && (self.unicode_props() & UnicodeProps::CF_ZWJ.bits() != 0)
    }

    #[inline]
    pub(crate) fn is_joiner(&self) -> bool {
        self.is_unicode_format()
            && (self.unicode_props()
                & (UnicodeProps::CF_ZWNJ.bits() | UnicodeProps::CF_ZWJ.bits())
                != 0)
    }

    #[inline]
    pub(crate) fn flip_joiners(&mut self) {
        if !self.is_unicode_format() {
            return;
        }
        let n = self.unicode_props() ^ (UnicodeProps::CF_ZWNJ.bits() | UnicodeProps::CF_ZWJ.bits());
        self.set_unicode_props(n);
    }
}

// lig_props, aka lig_id / lig_comp.
//
// When a ligature forms, the ligature glyph and the marks inside it get a
// fresh lig_id. The ligature records its component count, the marks the
// component they sit on. Multiple substitution outputs get lig_id 0 and
// component numbers 0, 1, 2... so MarkBase can attach to the first one.
// MarkMark only attaches marks of the same component of the same ligature.
impl GlyphInfo {
    const IS_LIG_BASE: u8 = 0x10;

    #[inline]
    pub(crate) fn set_lig_props_for_ligature(&mut self, lig_id: u8, lig_num_comps: u8) {
        self.set_lig_props((lig_id << 5) | Self::IS_LIG_BASE | (lig_num_comps & 0x0F));
    }

    #[inline]
    pub(crate) fn set_lig_props_for_mark(&mut self, lig_id: u8, lig_comp: u8) {
        self.set_lig_props((lig_id << 5) | (lig_comp & 0x0F));
    }

    #[inline]
    pub(crate) fn set_lig_props_for_component(&mut self, comp: u8) {
        self.set_lig_props_for_mark(0, comp);
    }

    #[inline]
    pub(crate) fn lig_id(&self) -> u8 {
        self.lig_props() >> 5
    }

    #[inline]
    fn ligated_internal(&self) -> bool {
        self.lig_props() & Self::IS_LIG_BASE != 0
    }

    #[inline]
    pub(crate) fn lig_comp(&self) -> u8 {
        if self.ligated_internal() {
            0
        } else {
            self.lig_props() & 0x0F
        }
    }

    #[inline]
    pub(crate) fn lig_num_comps(&self) -> u8 {
        if self.glyph_props() & GlyphPropsFlags::LIGATURE.bits() != 0 && self.ligated_internal() {
            self.lig_props() & 0x0F
        } else {
            1
        }
    }

    #[inline]
    pub(crate) fn is_base_glyph(&self) -> bool {
        self.glyph_props() & GlyphPropsFlags::BASE_GLYPH.bits() != 0
    }

    #[inline]
    pub(crate) fn is_ligature(&self) -> bool {
        self.glyph_props() & GlyphPropsFlags::LIGATURE.bits() != 0
    }

    #[inline]
    pub(crate) fn is_mark(&self) -> bool {
        self.glyph_props() & GlyphPropsFlags::MARK.bits() != 0
    }

    #[inline]
    pub(crate) fn substituted(&self) -> bool {
        self.glyph_props() & GlyphPropsFlags::SUBSTITUTED.bits() != 0
    }

    #[inline]
    pub(crate) fn ligated(&self) -> bool {
        self.glyph_props() & GlyphPropsFlags::LIGATED.bits() != 0
    }

    #[inline]
    pub(crate) fn multiplied(&self) -> bool {
        self.glyph_props() & GlyphPropsFlags::MULTIPLIED.bits() != 0
    }

    #[inline]
    pub(crate) fn ligated_and_didnt_multiply(&self) -> bool {
        self.ligated() && !self.multiplied()
    }

    #[inline]
    pub(crate) fn clear_ligated_and_multiplied(&mut self) {
        let n = self.glyph_props() & !(GlyphPropsFlags::LIGATED | GlyphPropsFlags::MULTIPLIED).bits();
        self.set_glyph_props(n);
    }

    #[inline]
    pub(crate) fn clear_substituted(&mut self) {
        let n = self.glyph_props() & !GlyphPropsFlags::SUBSTITUTED.bits();
        self.set_glyph_props(n);
    }
}

pub(crate) fn _hb_grapheme_group_func(_: &GlyphInfo, b: &GlyphInfo) -> bool {
    b.is_continuation()
}

pub fn _hb_ot_layout_reverse_graphemes(buffer: &mut hb_buffer_t) {
    // Grapheme monotonicity is already handled by the grouping, only
    // MONOTONE_CHARACTERS needs merging.
    let merge = buffer.cluster_level == HB_BUFFER_CLUSTER_LEVEL_MONOTONE_CHARACTERS;
    buffer.reverse_groups(_hb_grapheme_group_func, merge);
}

/// Pause callback letting later stages see substituted glyphs as fresh input.
pub fn _hb_clear_substitution_flags(
    _: &hb_ot_shape_plan_t,
    _: &hb_font_t,
    buffer: &mut hb_buffer_t,
) -> bool {
    let len = buffer.len;
    for info in &mut buffer.info[..len] {
        info.clear_substituted();
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info_for(c: char) -> (GlyphInfo, hb_buffer_scratch_flags_t) {
        let mut info = GlyphInfo {
            glyph_id: c as u32,
            ..GlyphInfo::default()
        };
        let mut flags = HB_BUFFER_SCRATCH_FLAG_DEFAULT;
        info.init_unicode_props(&mut flags);
        (info, flags)
    }

    #[test]
    fn ascii_sets_no_scratch_flags() {
        let (info, flags) = info_for('a');
        assert_eq!(flags, HB_BUFFER_SCRATCH_FLAG_DEFAULT);
        assert_eq!(info.general_category(), GeneralCategory::LOWERCASE_LETTER);
        assert!(!info.is_default_ignorable());
    }

    #[test]
    fn joiners_are_ignorable() {
        let (zwj, flags) = info_for('\u{200D}');
        assert!(zwj.is_zwj() && !zwj.is_zwnj());
        assert!(zwj.is_default_ignorable());
        assert_ne!(flags & HB_BUFFER_SCRATCH_FLAG_HAS_DEFAULT_IGNORABLES, 0);

        let (mut zwnj, _) = info_for('\u{200C}');
        assert!(zwnj.is_zwnj() && zwnj.is_joiner());
        zwnj.flip_joiners();
        assert!(zwnj.is_zwj());
    }

    #[test]
    fn cgj_is_hidden() {
        let (cgj, flags) = info_for('\u{034F}');
        assert!(cgj.is_hidden());
        assert_ne!(flags & HB_BUFFER_SCRATCH_FLAG_HAS_CGJ, 0);
    }

    #[test]
    fn marks_continue_graphemes() {
        let (acute, _) = info_for('\u{0301}');
        assert!(acute.is_unicode_mark());
        assert!(acute.is_continuation());
        assert_eq!(acute.modified_combining_class(), 230);
    }

    #[test]
    fn lig_props_round_trip_through_accessors() {
        let mut info = GlyphInfo::default();
        info.set_glyph_props(GlyphPropsFlags::LIGATURE.bits());
        info.set_lig_props_for_ligature(3, 2);
        assert_eq!(info.lig_id(), 3);
        assert_eq!(info.lig_comp(), 0);
        assert_eq!(info.lig_num_comps(), 2);

        info.set_glyph_props(GlyphPropsFlags::MARK.bits());
        info.set_lig_props_for_mark(3, 2);
        assert_eq!(info.lig_comp(), 2);
        assert_eq!(info.lig_num_comps(), 1);
    }

    #[test]
    fn variation_selector_becomes_format() {
        let (mut vs, _) = info_for('\u{FE0F}');
        vs.set_variation_selector(true);
        assert!(vs.is_variation_selector());
        vs.set_variation_selector(false);
        assert!(!vs.is_variation_selector());
        assert_eq!(vs.general_category(), GeneralCategory::NON_SPACING_MARK);
    }
}
