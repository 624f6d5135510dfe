//! (Chained) sequence context lookups, shared by GSUB and GPOS.

use super::covered;
use crate::hb::buffer::GlyphInfo;
use crate::hb::ot_layout_gsubgpos::OT::hb_ot_apply_context_t;
use crate::hb::ot_layout_gsubgpos::{
    apply_lookup, match_backtrack, match_input, match_lookahead, Apply, MatchFunc, WouldApply,
    WouldApplyContext,
};
use read_fonts::tables::gsub::ClassDef;
use read_fonts::tables::layout::{
    ChainedClassSequenceRule, ChainedSequenceContextFormat1, ChainedSequenceContextFormat2,
    ChainedSequenceContextFormat3, ChainedSequenceRule, ClassSequenceRule, SequenceContextFormat1,
    SequenceContextFormat2, SequenceContextFormat3, SequenceLookupRecord, SequenceRule,
};
use read_fonts::types::{BigEndian, GlyphId, GlyphId16};
use read_fonts::ReadError;

impl WouldApply for SequenceContextFormat1<'_> {
    fn would_apply(&self, ctx: &WouldApplyContext) -> bool {
        let Some(index) = self.coverage().ok().and_then(|c| c.get(ctx.glyphs[0])) else {
            return false;
        };
        let Some(Ok(set)) = self.seq_rule_sets().get(usize::from(index)) else {
            return false;
        };
        set.seq_rules()
            .iter()
            .filter_map(Result::ok)
            .any(|rule| rule.would_apply(ctx, &match_glyph))
    }
}

impl Apply for SequenceContextFormat1<'_> {
    fn apply(&self, ctx: &mut hb_ot_apply_context_t) -> Option<()> {
        let index = self.coverage().ok()?.get(ctx.buffer.cur(0).as_glyph())?;
        let set = self.seq_rule_sets().get(usize::from(index))?.ok()?;
        apply_rules(ctx, set.seq_rules().iter(), &match_glyph)
    }
}

impl WouldApply for SequenceContextFormat2<'_> {
    fn would_apply(&self, ctx: &WouldApplyContext) -> bool {
        let class_def = self.class_def().ok();
        let class = class_of(&class_def, ctx.glyphs[0].to_u32());
        let Some(Ok(set)) = self.class_seq_rule_sets().get(usize::from(class)) else {
            return false;
        };
        let matches = match_class(&class_def);
        set.class_seq_rules()
            .iter()
            .filter_map(Result::ok)
            .any(|rule| rule.would_apply(ctx, &matches))
    }
}

impl Apply for SequenceContextFormat2<'_> {
    fn apply(&self, ctx: &mut hb_ot_apply_context_t) -> Option<()> {
        let glyph = ctx.buffer.cur(0).glyph_id;
        self.coverage().ok()?.get(glyph)?;
        let class_def = self.class_def().ok();
        let class = class_of(&class_def, glyph);
        let set = self.class_seq_rule_sets().get(usize::from(class))?.ok()?;
        let matched = apply_rules(ctx, set.class_seq_rules().iter(), &match_class(&class_def));
        matched
    }
}

impl WouldApply for SequenceContextFormat3<'_> {
    fn would_apply(&self, ctx: &WouldApplyContext) -> bool {
        let coverages = self.coverages();
        let input = |info: &GlyphInfo, index: u16| {
            covered(coverages.get(usize::from(index) + 1), info.as_glyph())
        };
        !coverages.is_empty() && would_match_input(ctx, coverages.len() - 1, &input)
    }
}

impl Apply for SequenceContextFormat3<'_> {
    fn apply(&self, ctx: &mut hb_ot_apply_context_t) -> Option<()> {
        let coverages = self.coverages();
        coverages.get(0).ok()?.get(ctx.buffer.cur(0).as_glyph())?;

        let input = |info: &GlyphInfo, index: u16| {
            covered(coverages.get(usize::from(index) + 1), info.as_glyph())
        };
        let input_len = coverages.len().saturating_sub(1) as u16;
        context_apply(ctx, input_len, &input, self.seq_lookup_records())
    }
}

impl WouldApply for ChainedSequenceContextFormat1<'_> {
    fn would_apply(&self, ctx: &WouldApplyContext) -> bool {
        let Some(index) = self.coverage().ok().and_then(|c| c.get(ctx.glyphs[0])) else {
            return false;
        };
        let Some(Ok(set)) = self.chained_seq_rule_sets().get(usize::from(index)) else {
            return false;
        };
        set.chained_seq_rules()
            .iter()
            .filter_map(Result::ok)
            .any(|rule| rule.would_apply_chain(ctx, &match_glyph))
    }
}

impl Apply for ChainedSequenceContextFormat1<'_> {
    fn apply(&self, ctx: &mut hb_ot_apply_context_t) -> Option<()> {
        let index = self.coverage().ok()?.get(ctx.buffer.cur(0).as_glyph())?;
        let set = self.chained_seq_rule_sets().get(usize::from(index))?.ok()?;
        apply_chain_rules(
            ctx,
            set.chained_seq_rules().iter(),
            [&match_glyph, &match_glyph, &match_glyph],
        )
    }
}

impl WouldApply for ChainedSequenceContextFormat2<'_> {
    fn would_apply(&self, ctx: &WouldApplyContext) -> bool {
        let input_classes = self.input_class_def().ok();
        let class = class_of(&input_classes, ctx.glyphs[0].to_u32());
        let Some(Ok(set)) = self.chained_class_seq_rule_sets().get(usize::from(class)) else {
            return false;
        };
        let matches = match_class(&input_classes);
        set.chained_class_seq_rules()
            .iter()
            .filter_map(Result::ok)
            .any(|rule| rule.would_apply_chain(ctx, &matches))
    }
}

impl Apply for ChainedSequenceContextFormat2<'_> {
    fn apply(&self, ctx: &mut hb_ot_apply_context_t) -> Option<()> {
        let glyph = ctx.buffer.cur(0).glyph_id;
        self.coverage().ok()?.get(glyph)?;

        let backtrack_classes = self.backtrack_class_def().ok();
        let input_classes = self.input_class_def().ok();
        let lookahead_classes = self.lookahead_class_def().ok();

        let class = class_of(&input_classes, glyph);
        let set = self
            .chained_class_seq_rule_sets()
            .get(usize::from(class))?
            .ok()?;

        let backtrack = match_class(&backtrack_classes);
        let input = match_class(&input_classes);
        let lookahead = match_class(&lookahead_classes);
        apply_chain_rules(
            ctx,
            set.chained_class_seq_rules().iter(),
            [&backtrack, &input, &lookahead],
        )
    }
}

impl WouldApply for ChainedSequenceContextFormat3<'_> {
    fn would_apply(&self, ctx: &WouldApplyContext) -> bool {
        if ctx.zero_context
            && !(self.backtrack_coverage_offsets().is_empty()
                && self.lookahead_coverage_offsets().is_empty())
        {
            return false;
        }

        let coverages = self.input_coverages();
        let input = |info: &GlyphInfo, index: u16| {
            covered(coverages.get(usize::from(index) + 1), info.as_glyph())
        };
        !coverages.is_empty() && would_match_input(ctx, coverages.len() - 1, &input)
    }
}

impl Apply for ChainedSequenceContextFormat3<'_> {
    fn apply(&self, ctx: &mut hb_ot_apply_context_t) -> Option<()> {
        let input_coverages = self.input_coverages();
        input_coverages
            .get(0)
            .ok()?
            .get(ctx.buffer.cur(0).as_glyph())?;

        let backtrack_coverages = self.backtrack_coverages();
        let lookahead_coverages = self.lookahead_coverages();

        let backtrack = |info: &GlyphInfo, index: u16| {
            covered(backtrack_coverages.get(usize::from(index)), info.as_glyph())
        };
        let input = |info: &GlyphInfo, index: u16| {
            covered(input_coverages.get(usize::from(index) + 1), info.as_glyph())
        };
        let lookahead = |info: &GlyphInfo, index: u16| {
            covered(lookahead_coverages.get(usize::from(index)), info.as_glyph())
        };

        chain_context_apply(
            ctx,
            (backtrack_coverages.len() as u16, &backtrack),
            (input_coverages.len().saturating_sub(1) as u16, &input),
            (lookahead_coverages.len() as u16, &lookahead),
            self.seq_lookup_records(),
        )
    }
}

/// Rule value matching a glyph id.
fn match_glyph(info: &GlyphInfo, value: u16) -> bool {
    info.glyph_id == u32::from(value)
}

fn class_of(class_def: &Option<ClassDef>, glyph: u32) -> u16 {
    class_def.as_ref().map_or(0, |class_def| {
        GlyphId16::try_from(GlyphId::from(glyph)).map_or(0, |glyph| class_def.get(glyph))
    })
}

/// Rule value matching a glyph class. Without a class definition every
/// glyph is in class 0.
fn match_class<'a>(class_def: &'a Option<ClassDef<'a>>) -> impl Fn(&GlyphInfo, u16) -> bool + 'a {
    move |info, value| class_of(class_def, info.glyph_id) == value
}

fn would_match_input(ctx: &WouldApplyContext, input_len: usize, match_func: MatchFunc) -> bool {
    ctx.glyphs.len() == input_len + 1
        && ctx.glyphs[1..].iter().enumerate().all(|(i, glyph)| {
            let info = GlyphInfo {
                glyph_id: glyph.to_u32(),
                ..GlyphInfo::default()
            };
            match_func(&info, i as u16)
        })
}

fn context_apply(
    ctx: &mut hb_ot_apply_context_t,
    input_len: u16,
    input: MatchFunc,
    lookups: &[SequenceLookupRecord],
) -> Option<()> {
    let mut match_end = 0;
    if match_input(ctx, input_len, input, &mut match_end, None) {
        ctx.buffer
            .unsafe_to_break(Some(ctx.buffer.idx), Some(match_end));
        apply_lookup(ctx, usize::from(input_len), match_end, lookups);
        Some(())
    } else {
        ctx.buffer
            .unsafe_to_concat(Some(ctx.buffer.idx), Some(match_end));
        None
    }
}

fn chain_context_apply(
    ctx: &mut hb_ot_apply_context_t,
    backtrack: (u16, MatchFunc),
    input: (u16, MatchFunc),
    lookahead: (u16, MatchFunc),
    lookups: &[SequenceLookupRecord],
) -> Option<()> {
    let mut start_index = ctx.buffer.out_len;
    let mut end_index = ctx.buffer.idx;
    let mut match_end = 0;

    if !match_input(ctx, input.0, input.1, &mut match_end, None) {
        ctx.buffer
            .unsafe_to_concat(Some(ctx.buffer.idx), Some(end_index));
        return None;
    }

    end_index = match_end;
    if !match_lookahead(ctx, lookahead.0, lookahead.1, match_end, &mut end_index) {
        ctx.buffer
            .unsafe_to_concat(Some(ctx.buffer.idx), Some(end_index));
        return None;
    }

    if !match_backtrack(ctx, backtrack.0, backtrack.1, &mut start_index) {
        ctx.buffer
            .unsafe_to_concat_from_outbuffer(Some(start_index), Some(end_index));
        return None;
    }

    ctx.buffer
        .unsafe_to_break_from_outbuffer(Some(start_index), Some(end_index));
    apply_lookup(ctx, usize::from(input.0), match_end, lookups);
    Some(())
}

fn apply_rules<'a, R: ContextRule<'a>>(
    ctx: &mut hb_ot_apply_context_t,
    rules: impl Iterator<Item = Result<R, ReadError>>,
    matches: MatchFunc,
) -> Option<()> {
    rules
        .filter_map(Result::ok)
        .find_map(|rule| rule.apply(ctx, matches))
}

fn apply_chain_rules<'a, R: ChainContextRule<'a>>(
    ctx: &mut hb_ot_apply_context_t,
    rules: impl Iterator<Item = Result<R, ReadError>>,
    matches: [MatchFunc; 3],
) -> Option<()> {
    rules
        .filter_map(Result::ok)
        .find_map(|rule| rule.apply_chain(ctx, matches))
}

trait RuleValue: Copy {
    fn to_u16(self) -> u16;
}

impl RuleValue for BigEndian<GlyphId16> {
    fn to_u16(self) -> u16 {
        self.get().to_u16()
    }
}

impl RuleValue for BigEndian<u16> {
    fn to_u16(self) -> u16 {
        self.get()
    }
}

/// A rule whose input is a sequence of glyphs or glyph classes, not counting
/// the first glyph.
trait ContextRule<'a> {
    type Value: RuleValue + 'a;

    fn input(&self) -> &'a [Self::Value];
    fn lookup_records(&self) -> &'a [SequenceLookupRecord];

    fn would_apply(&self, ctx: &WouldApplyContext, matches: MatchFunc) -> bool {
        let input = self.input();
        let f = |info: &GlyphInfo, index: u16| {
            input
                .get(usize::from(index))
                .is_some_and(|value| matches(info, value.to_u16()))
        };
        would_match_input(ctx, input.len(), &f)
    }

    fn apply(&self, ctx: &mut hb_ot_apply_context_t, matches: MatchFunc) -> Option<()> {
        let input = self.input();
        let f = |info: &GlyphInfo, index: u16| {
            input
                .get(usize::from(index))
                .is_some_and(|value| matches(info, value.to_u16()))
        };
        context_apply(ctx, input.len() as u16, &f, self.lookup_records())
    }
}

trait ChainContextRule<'a>: ContextRule<'a> {
    /// Closest glyph first.
    fn backtrack(&self) -> &'a [Self::Value];
    fn lookahead(&self) -> &'a [Self::Value];

    fn would_apply_chain(&self, ctx: &WouldApplyContext, matches: MatchFunc) -> bool {
        (!ctx.zero_context || (self.backtrack().is_empty() && self.lookahead().is_empty()))
            && self.would_apply(ctx, matches)
    }

    fn apply_chain(&self, ctx: &mut hb_ot_apply_context_t, matches: [MatchFunc; 3]) -> Option<()> {
        let [backtrack_matches, input_matches, lookahead_matches] = matches;
        let (backtrack, input, lookahead) = (self.backtrack(), self.input(), self.lookahead());

        let backtrack_f = |info: &GlyphInfo, index: u16| {
            backtrack
                .get(usize::from(index))
                .is_some_and(|value| backtrack_matches(info, value.to_u16()))
        };
        let input_f = |info: &GlyphInfo, index: u16| {
            input
                .get(usize::from(index))
                .is_some_and(|value| input_matches(info, value.to_u16()))
        };
        let lookahead_f = |info: &GlyphInfo, index: u16| {
            lookahead
                .get(usize::from(index))
                .is_some_and(|value| lookahead_matches(info, value.to_u16()))
        };

        chain_context_apply(
            ctx,
            (backtrack.len() as u16, &backtrack_f),
            (input.len() as u16, &input_f),
            (lookahead.len() as u16, &lookahead_f),
            self.lookup_records(),
        )
    }
}

impl<'a> ContextRule<'a> for SequenceRule<'a> {
    type Value = BigEndian<GlyphId16>;

    fn input(&self) -> &'a [Self::Value] {
        self.input_sequence()
    }

    fn lookup_records(&self) -> &'a [SequenceLookupRecord] {
        self.seq_lookup_records()
    }
}

impl<'a> ContextRule<'a> for ClassSequenceRule<'a> {
    type Value = BigEndian<u16>;

    fn input(&self) -> &'a [Self::Value] {
        self.input_sequence()
    }

    fn lookup_records(&self) -> &'a [SequenceLookupRecord] {
        self.seq_lookup_records()
    }
}

impl<'a> ContextRule<'a> for ChainedSequenceRule<'a> {
    type Value = BigEndian<GlyphId16>;

    fn input(&self) -> &'a [Self::Value] {
        self.input_sequence()
    }

    fn lookup_records(&self) -> &'a [SequenceLookupRecord] {
        self.seq_lookup_records()
    }
}

impl<'a> ChainContextRule<'a> for ChainedSequenceRule<'a> {
    fn backtrack(&self) -> &'a [Self::Value] {
        self.backtrack_sequence()
    }

    fn lookahead(&self) -> &'a [Self::Value] {
        self.lookahead_sequence()
    }
}

impl<'a> ContextRule<'a> for ChainedClassSequenceRule<'a> {
    type Value = BigEndian<u16>;

    fn input(&self) -> &'a [Self::Value] {
        self.input_sequence()
    }

    fn lookup_records(&self) -> &'a [SequenceLookupRecord] {
        self.seq_lookup_records()
    }
}

impl<'a> ChainContextRule<'a> for ChainedClassSequenceRule<'a> {
    fn backtrack(&self) -> &'a [Self::Value] {
        self.backtrack_sequence()
    }

    fn lookahead(&self) -> &'a [Self::Value] {
        self.lookahead_sequence()
    }
}
