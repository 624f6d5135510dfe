use super::buffer::*;
use super::common::hb_codepoint_t;
use super::face::hb_font_t;
use super::ot_shape_plan::hb_ot_shape_plan_t;
use super::unicode::{hb_unicode_funcs_t, CharExt};

// HIGHLEVEL DESIGN:
//
// This file exports one main function: _hb_ot_shape_normalize().
//
// This function closely reflects the Unicode Normalization Algorithm,
// yet it's different.
//
// Each shaper specifies whether it prefers decomposed (NFD) or composed
// (NFC). The logic however tries to use whatever the font can support.
//
// In general what happens is that: each grapheme is decomposed in a chain
// of 1:2 decompositions, marks reordered, and then recomposed if desired,
// so far it's like Unicode Normalization. However, the decomposition and
// recomposition only happens if the font supports the resulting characters.
//
// The goals are:
//
//   - Try to render all canonically equivalent strings similarly. To really
//     achieve this we have to always do the full decomposition and then
//     selectively recompose from there. It's kinda too expensive though, so
//     we skip some cases. For example, if composed is desired, we simply
//     don't touch 1-character clusters that are supported by the font, even
//     though their NFC may be different.
//
//   - When a font has a precomposed character for a sequence but the
//     'ccmp' feature in the font is not adequate, use the precomposed
//     character which typically has better mark positioning.
//
//   - When a font does not support a combining mark, but supports it
//     precomposed with previous base, use that. This needs the itemizer to
//     have this knowledge too. We need to provide assistance to the
//     itemizer.
//
//   - When a font does not support a character but supports its canonical
//     decomposition, well, use the decomposition.
//
//   - The complex shapers can customize the compose and decompose functions
//     to offload some of their requirements to the normalizer. For example,
//     the Indic shaper may want to disallow recomposing of two matras.

pub type hb_ot_shape_normalization_mode_t = u32;
pub const HB_OT_SHAPE_NORMALIZATION_MODE_NONE: u32 = 0;
pub const HB_OT_SHAPE_NORMALIZATION_MODE_DECOMPOSED: u32 = 1;
/// Never composes base-to-base.
pub const HB_OT_SHAPE_NORMALIZATION_MODE_COMPOSED_DIACRITICS: u32 = 2;
/// Always fully decomposes and then recomposes back.
pub const HB_OT_SHAPE_NORMALIZATION_MODE_COMPOSED_DIACRITICS_NO_SHORT_CIRCUIT: u32 = 3;
pub const HB_OT_SHAPE_NORMALIZATION_MODE_AUTO: u32 = 4;
pub const HB_OT_SHAPE_NORMALIZATION_MODE_DEFAULT: u32 = HB_OT_SHAPE_NORMALIZATION_MODE_AUTO;

const HB_OT_SHAPE_MAX_COMBINING_MARKS: usize = 32;

/// What shaper hooks see while the normalizer runs.
pub struct hb_ot_shape_normalize_context_t<'a> {
    pub plan: &'a hb_ot_shape_plan_t,
    pub font: &'a hb_font_t<'a>,
    decompose: fn(&hb_ot_shape_normalize_context_t, hb_codepoint_t) -> Option<(hb_codepoint_t, hb_codepoint_t)>,
    compose: fn(&hb_ot_shape_normalize_context_t, hb_codepoint_t, hb_codepoint_t) -> Option<hb_codepoint_t>,
}

impl hb_ot_shape_normalize_context_t<'_> {
    #[inline]
    fn decompose(&self, ab: hb_codepoint_t) -> Option<(hb_codepoint_t, hb_codepoint_t)> {
        (self.decompose)(self, ab)
    }

    #[inline]
    fn compose(&self, a: hb_codepoint_t, b: hb_codepoint_t) -> Option<hb_codepoint_t> {
        (self.compose)(self, a, b)
    }
}

fn decompose_unicode(
    _: &hb_ot_shape_normalize_context_t,
    ab: hb_codepoint_t,
) -> Option<(hb_codepoint_t, hb_codepoint_t)> {
    super::unicode::decompose(ab)
}

fn compose_unicode(
    _: &hb_ot_shape_normalize_context_t,
    a: hb_codepoint_t,
    b: hb_codepoint_t,
) -> Option<hb_codepoint_t> {
    super::unicode::compose(a, b)
}

#[inline]
fn info_cc(info: &GlyphInfo) -> u8 {
    info.modified_combining_class()
}

fn set_glyph(info: &mut GlyphInfo, font: &hb_font_t) {
    if let Some(glyph) = font.get_nominal_glyph(info.glyph_id) {
        info.set_glyph_index(glyph.to_u32());
    }
}

fn output_char(buffer: &mut hb_buffer_t, unichar: hb_codepoint_t, glyph: u32) {
    // This is very confusing indeed.
    buffer.cur_mut(0).set_glyph_index(glyph);
    buffer.output_glyph(unichar);
    let mut flags = buffer.scratch_flags;
    buffer.prev_mut().init_unicode_props(&mut flags);
    buffer.scratch_flags = flags;
}

fn next_char(buffer: &mut hb_buffer_t, glyph: u32) {
    buffer.cur_mut(0).set_glyph_index(glyph);
    buffer.next_glyph();
}

fn skip_char(buffer: &mut hb_buffer_t) {
    buffer.skip_glyph();
}

/// Returns 0 if didn't decompose, number of resulting characters otherwise.
fn decompose(
    ctx: &hb_ot_shape_normalize_context_t,
    buffer: &mut hb_buffer_t,
    shortest: bool,
    ab: hb_codepoint_t,
) -> u32 {
    let Some((a, b)) = ctx.decompose(ab) else {
        return 0;
    };

    let b_glyph = if b != 0 {
        match ctx.font.get_nominal_glyph(b) {
            Some(glyph) => glyph.to_u32(),
            None => return 0,
        }
    } else {
        0
    };

    let a_glyph = ctx.font.get_nominal_glyph(a).map(|glyph| glyph.to_u32());

    if shortest {
        if let Some(a_glyph) = a_glyph {
            // Output a and b.
            output_char(buffer, a, a_glyph);
            if b != 0 {
                output_char(buffer, b, b_glyph);
                return 2;
            }
            return 1;
        }
    }

    let ret = decompose(ctx, buffer, shortest, a);
    if ret != 0 {
        if b != 0 {
            output_char(buffer, b, b_glyph);
            return ret + 1;
        }
        return ret;
    }

    if let Some(a_glyph) = a_glyph {
        output_char(buffer, a, a_glyph);
        if b != 0 {
            output_char(buffer, b, b_glyph);
            return 2;
        }
        return 1;
    }

    0
}

fn decompose_current_character(
    ctx: &hb_ot_shape_normalize_context_t,
    buffer: &mut hb_buffer_t,
    shortest: bool,
) {
    let u = buffer.cur(0).glyph_id;

    if shortest {
        if let Some(glyph) = ctx.font.get_nominal_glyph(u) {
            next_char(buffer, glyph.to_u32());
            return;
        }
    }

    if decompose(ctx, buffer, shortest, u) > 0 {
        skip_char(buffer);
        return;
    }

    if !shortest {
        if let Some(glyph) = ctx.font.get_nominal_glyph(u) {
            next_char(buffer, glyph.to_u32());
            return;
        }
    }

    if buffer.cur(0).is_unicode_space() {
        let space_type = u.space_fallback();
        if space_type != hb_unicode_funcs_t::NOT_SPACE {
            let space_glyph = ctx
                .font
                .get_nominal_glyph(0x0020)
                .map(|glyph| glyph.to_u32())
                .or(buffer.invisible);

            if let Some(space_glyph) = space_glyph {
                buffer.cur_mut(0).set_unicode_space_fallback_type(space_type);
                next_char(buffer, space_glyph);
                buffer.scratch_flags |= HB_BUFFER_SCRATCH_FLAG_HAS_SPACE_FALLBACK;
                return;
            }
        }
    }

    // U+2011 is the only sensible character that is a no-break version of
    // another character and not a space. The space ones are handled already.
    // Handle this lone one.
    if u == 0x2011 {
        if let Some(other_glyph) = ctx.font.get_nominal_glyph(0x2010) {
            next_char(buffer, other_glyph.to_u32());
            return;
        }
    }

    let not_found = buffer.not_found;
    next_char(buffer, not_found);
}

fn handle_variation_selector_cluster(
    ctx: &hb_ot_shape_normalize_context_t,
    buffer: &mut hb_buffer_t,
    end: usize,
) {
    // Currently if there's a variation-selector we give-up on normalization,
    // it's just too hard.
    let font = ctx.font;
    while buffer.idx < end - 1 && buffer.successful {
        if buffer.cur(1).glyph_id.is_variation_selector() {
            let base = buffer.cur(0).glyph_id;
            let selector = buffer.cur(1).glyph_id;
            if let Some(glyph) = font.get_variation_glyph(base, selector) {
                buffer.cur_mut(0).set_glyph_index(glyph.to_u32());
                buffer.replace_glyphs(2, 1, &[base]);
            } else {
                // Just pass on the two characters separately, let GSUB do its magic.
                set_glyph(buffer.cur_mut(0), font);
                buffer.next_glyph();

                buffer.scratch_flags |= HB_BUFFER_SCRATCH_FLAG_HAS_VARIATION_SELECTOR_FALLBACK;
                buffer.cur_mut(0).set_variation_selector(true);

                set_glyph(buffer.cur_mut(0), font);
                buffer.next_glyph();
            }

            // Skip any further variation selectors.
            while buffer.idx < end
                && buffer.successful
                && buffer.cur(0).glyph_id.is_variation_selector()
            {
                set_glyph(buffer.cur_mut(0), font);
                buffer.next_glyph();
            }
        } else {
            set_glyph(buffer.cur_mut(0), font);
            buffer.next_glyph();
        }
    }

    if buffer.idx < end {
        set_glyph(buffer.cur_mut(0), font);
        buffer.next_glyph();
    }
}

fn decompose_multi_char_cluster(
    ctx: &hb_ot_shape_normalize_context_t,
    buffer: &mut hb_buffer_t,
    end: usize,
    short_circuit: bool,
) {
    if buffer.info[buffer.idx..end]
        .iter()
        .any(|info| info.glyph_id.is_variation_selector())
    {
        handle_variation_selector_cluster(ctx, buffer, end);
        return;
    }

    while buffer.idx < end && buffer.successful {
        decompose_current_character(ctx, buffer, short_circuit);
    }
}

/// Maps the leading run of `idx..end` the font supports directly, returning
/// how many characters it covered.
fn map_simple_clusters(buffer: &mut hb_buffer_t, font: &hb_font_t, end: usize) -> usize {
    let start = buffer.idx;
    let mut done = 0;
    for info in &mut buffer.info[start..end] {
        match font.get_nominal_glyph(info.glyph_id) {
            Some(glyph) => info.set_glyph_index(glyph.to_u32()),
            None => break,
        }
        done += 1;
    }
    done
}

/// Decomposes, reorders and optionally recomposes the code points in the
/// buffer, recording the nominal glyph of each one.
pub fn _hb_ot_shape_normalize(
    plan: &hb_ot_shape_plan_t,
    buffer: &mut hb_buffer_t,
    font: &hb_font_t,
) {
    if buffer.is_empty() {
        return;
    }

    buffer.assert_unicode_vars();

    let mut mode = plan.shaper.normalization_preference;
    if mode == HB_OT_SHAPE_NORMALIZATION_MODE_AUTO {
        // Fonts with GPOS mark positioning could take decomposed text, but
        // composed diacritics have proven to be the safer choice for both.
        mode = HB_OT_SHAPE_NORMALIZATION_MODE_COMPOSED_DIACRITICS;
    }

    let ctx = hb_ot_shape_normalize_context_t {
        plan,
        font,
        decompose: plan.shaper.decompose.unwrap_or(decompose_unicode),
        compose: plan.shaper.compose.unwrap_or(compose_unicode),
    };

    let always_short_circuit = mode == HB_OT_SHAPE_NORMALIZATION_MODE_NONE;
    let might_short_circuit = always_short_circuit
        || (mode != HB_OT_SHAPE_NORMALIZATION_MODE_DECOMPOSED
            && mode != HB_OT_SHAPE_NORMALIZATION_MODE_COMPOSED_DIACRITICS_NO_SHORT_CIRCUIT);

    // We do a fairly straightforward yet custom normalization process in three
    // separate rounds: decompose, reorder, recompose (if desired). Currently
    // this makes two buffer swaps. We can make it faster by moving the last
    // two rounds into the inner loop for the first round, but it's more
    // readable this way.

    // First round, decompose
    let mut all_simple = true;
    {
        buffer.clear_output();
        let count = buffer.len;
        buffer.idx = 0;
        loop {
            let mut end = buffer.idx + 1;
            while end < count && !buffer.info[end].is_unicode_mark() {
                end += 1;
            }

            if end < count {
                // Leave one base for the marks to cluster with.
                end -= 1;
            }

            // From idx to end are simple clusters.
            if might_short_circuit {
                let done = map_simple_clusters(buffer, font, end);
                buffer.next_glyphs(done);
            }

            while buffer.idx < end && buffer.successful {
                decompose_current_character(&ctx, buffer, might_short_circuit);
            }

            if buffer.idx == count || !buffer.successful {
                break;
            }

            all_simple = false;

            // Find all the marks now.
            end = buffer.idx + 1;
            while end < count && buffer.info[end].is_unicode_mark() {
                end += 1;
            }

            // idx to end is one non-simple cluster.
            decompose_multi_char_cluster(&ctx, buffer, end, always_short_circuit);

            if buffer.idx >= count || !buffer.successful {
                break;
            }
        }

        buffer.sync();
    }

    // Second round, reorder (inplace)
    if !all_simple {
        let count = buffer.len;
        let mut i = 0;
        while i < count {
            if info_cc(&buffer.info[i]) == 0 {
                i += 1;
                continue;
            }

            let mut end = i + 1;
            while end < count && info_cc(&buffer.info[end]) != 0 {
                end += 1;
            }

            // We are going to do a O(n^2). Only do this if the sequence is short.
            if end - i <= HB_OT_SHAPE_MAX_COMBINING_MARKS {
                buffer.sort(i, end, |a, b| info_cc(a) > info_cc(b));

                if let Some(reorder_marks) = plan.shaper.reorder_marks {
                    reorder_marks(plan, buffer, i, end);
                }
            }

            i = end + 1;
        }
    }

    if buffer.scratch_flags & HB_BUFFER_SCRATCH_FLAG_HAS_CGJ != 0 {
        // For all CGJ, check if it prevented any reordering at all.
        // If it did NOT, then make it skippable.
        // https://github.com/harfbuzz/harfbuzz/issues/554
        for i in 1..buffer.len.saturating_sub(1) {
            if buffer.info[i].glyph_id == 0x034F
                && (info_cc(&buffer.info[i + 1]) == 0
                    || info_cc(&buffer.info[i - 1]) <= info_cc(&buffer.info[i + 1]))
            {
                buffer.info[i].unhide();
            }
        }
    }

    // Third round, recompose
    if !all_simple
        && (mode == HB_OT_SHAPE_NORMALIZATION_MODE_COMPOSED_DIACRITICS
            || mode == HB_OT_SHAPE_NORMALIZATION_MODE_COMPOSED_DIACRITICS_NO_SHORT_CIRCUIT)
    {
        // As noted in the comment earlier, we don't try to combine
        // ccc=0 chars with their previous Starter.

        buffer.clear_output();
        let count = buffer.len;
        let mut starter = 0;
        buffer.next_glyph();
        while buffer.idx < count && buffer.successful {
            // We don't try to compose a non-mark character with it's preceding
            // starter. This is both an optimization to avoid trying to compose
            // every two neighboring glyphs in most scripts AND a desired
            // feature for Hangul. Apparently Hangul fonts are not designed to
            // mix-and-match pre-composed syllables and Jamo.
            let cur = *buffer.cur(0);
            if cur.is_unicode_mark()
                // If there's anything between the starter and this char, they
                // should have CCC smaller than this character's.
                && (starter == buffer.out_len - 1 || info_cc(buffer.prev()) < info_cc(&cur))
            {
                let a = buffer.out_info()[starter].glyph_id;
                if let Some(composed) = ctx.compose(a, cur.glyph_id) {
                    // And the font has glyph for the composite.
                    if let Some(glyph) = font.get_nominal_glyph(composed) {
                        // Composes.
                        buffer.next_glyph(); // Copy to out-buffer.
                        if !buffer.successful {
                            return;
                        }

                        buffer.merge_out_clusters(starter, buffer.out_len);
                        buffer.out_len -= 1; // Remove the second composable.

                        // Modify starter and carry on.
                        let mut flags = buffer.scratch_flags;
                        let info = &mut buffer.out_info_mut()[starter];
                        info.glyph_id = composed;
                        info.set_glyph_index(glyph.to_u32());
                        info.init_unicode_props(&mut flags);
                        buffer.scratch_flags = flags;

                        continue;
                    }
                }
            }

            // Blocked, or doesn't compose.
            buffer.next_glyph();

            if info_cc(buffer.prev()) == 0 {
                starter = buffer.out_len - 1;
            }
        }

        buffer.sync();
    }
}
