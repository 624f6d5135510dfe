use log::debug;

use super::buffer::*;
use super::common::{hb_codepoint_t, hb_tag_t, Direction, Feature, Language, Script};
use super::face::hb_font_t;
use super::kerning::{hb_ot_layout_has_cross_kerning, hb_ot_layout_has_kerning, hb_ot_layout_kern};
use super::ot_layout::*;
use super::ot_layout_gpos_table::GPOS;
use super::ot_map::*;
use super::ot_shape_fallback::*;
use super::ot_shape_normalize::_hb_ot_shape_normalize;
use super::ot_shape_plan::hb_ot_shape_plan_t;
use super::ot_shaper::*;
use super::unicode::{CharExt, GeneralCategory};
use super::{ot_layout_gpos_table, ot_layout_gsub_table};

/// Collects features and shaper decisions for a plan under construction.
pub struct hb_ot_shape_planner_t<'a> {
    pub font: &'a hb_font_t<'a>,
    pub direction: Direction,
    pub script: Option<Script>,
    pub language: Option<Language>,
    pub ot_map: hb_ot_map_builder_t<'a>,
    pub script_zero_marks: bool,
    pub script_fallback_mark_positioning: bool,
    pub shaper: &'static hb_ot_shaper_t,
}

impl<'a> hb_ot_shape_planner_t<'a> {
    pub fn new(
        font: &'a hb_font_t<'a>,
        direction: Direction,
        script: Option<Script>,
        language: Option<&Language>,
    ) -> Self {
        let ot_map = hb_ot_map_builder_t::new(font, script, language);

        let shaper = hb_ot_shape_complex_categorize(
            script,
            direction,
            ot_map.chosen_script(TableIndex::GSUB),
        );

        let script_zero_marks = shaper.zero_width_marks != HB_OT_SHAPE_ZERO_WIDTH_MARKS_NONE;
        let script_fallback_mark_positioning = shaper.fallback_position;

        hb_ot_shape_planner_t {
            font,
            direction,
            script,
            language: language.cloned(),
            ot_map,
            script_zero_marks,
            script_fallback_mark_positioning,
            shaper,
        }
    }

    pub fn collect_features(&mut self, user_features: &[Feature]) {
        const COMMON_FEATURES: &[(hb_tag_t, hb_ot_map_feature_flags_t)] = &[
            (hb_tag_t::new(b"abvm"), F_GLOBAL),
            (hb_tag_t::new(b"blwm"), F_GLOBAL),
            (hb_tag_t::new(b"ccmp"), F_GLOBAL),
            (hb_tag_t::new(b"locl"), F_GLOBAL),
            (hb_tag_t::new(b"mark"), F_GLOBAL_MANUAL_JOINERS),
            (hb_tag_t::new(b"mkmk"), F_GLOBAL_MANUAL_JOINERS),
            (hb_tag_t::new(b"rlig"), F_GLOBAL),
        ];

        const HORIZONTAL_FEATURES: &[(hb_tag_t, hb_ot_map_feature_flags_t)] = &[
            (hb_tag_t::new(b"calt"), F_GLOBAL),
            (hb_tag_t::new(b"clig"), F_GLOBAL),
            (hb_tag_t::new(b"curs"), F_GLOBAL),
            (hb_tag_t::new(b"dist"), F_GLOBAL),
            (hb_tag_t::new(b"kern"), F_GLOBAL_HAS_FALLBACK),
            (hb_tag_t::new(b"liga"), F_GLOBAL),
            (hb_tag_t::new(b"rclt"), F_GLOBAL),
        ];

        let empty = F_NONE;

        self.ot_map.enable_feature(hb_tag_t::new(b"rvrn"), empty, 1);
        self.ot_map.add_gsub_pause(None);

        match self.direction {
            Direction::LeftToRight => {
                self.ot_map.enable_feature(hb_tag_t::new(b"ltra"), empty, 1);
                self.ot_map.enable_feature(hb_tag_t::new(b"ltrm"), empty, 1);
            }
            Direction::RightToLeft => {
                self.ot_map.enable_feature(hb_tag_t::new(b"rtla"), empty, 1);
                self.ot_map.add_feature(hb_tag_t::new(b"rtlm"), empty, 1);
            }
            _ => {}
        }

        // Automatic fractions.
        self.ot_map.add_feature(hb_tag_t::new(b"frac"), empty, 1);
        self.ot_map.add_feature(hb_tag_t::new(b"numr"), empty, 1);
        self.ot_map.add_feature(hb_tag_t::new(b"dnom"), empty, 1);

        // Random!
        self.ot_map
            .enable_feature(hb_tag_t::new(b"rand"), F_RANDOM, hb_ot_map_t::MAX_VALUE);

        self.ot_map.enable_feature(hb_tag_t::new(b"Harf"), empty, 1); // Considered required.
        self.ot_map.enable_feature(hb_tag_t::new(b"HARF"), empty, 1); // Considered discretionary.

        if let Some(func) = self.shaper.collect_features {
            func(self);
        }

        self.ot_map.enable_feature(hb_tag_t::new(b"Buzz"), empty, 1); // Considered required.
        self.ot_map.enable_feature(hb_tag_t::new(b"BUZZ"), empty, 1); // Considered discretionary.

        for &(tag, flags) in COMMON_FEATURES {
            self.ot_map.add_feature(tag, flags, 1);
        }

        if self.direction.is_horizontal() {
            for &(tag, flags) in HORIZONTAL_FEATURES {
                self.ot_map.add_feature(tag, flags, 1);
            }
        } else {
            // Only `vert` is applied in vertical runs, looked up under any
            // script or language system of the font.
            self.ot_map
                .enable_feature(hb_tag_t::new(b"vert"), F_GLOBAL_SEARCH, 1);
        }

        for feature in user_features {
            let flags = if feature.is_global() { F_GLOBAL } else { empty };
            self.ot_map.add_feature(feature.tag, flags, feature.value);
        }

        if let Some(func) = self.shaper.override_features {
            func(self);
        }
    }

    pub fn compile(mut self, user_features: &[Feature]) -> hb_ot_shape_plan_t {
        let ot_map = self.ot_map.compile();

        let frac_mask = ot_map.get_1_mask(hb_tag_t::new(b"frac"));
        let numr_mask = ot_map.get_1_mask(hb_tag_t::new(b"numr"));
        let dnom_mask = ot_map.get_1_mask(hb_tag_t::new(b"dnom"));
        let has_frac = frac_mask != 0 || (numr_mask != 0 && dnom_mask != 0);
        let user_frac = user_features
            .iter()
            .any(|f| f.tag == hb_tag_t::new(b"frac") && f.value != 0);

        let rtlm_mask = ot_map.get_1_mask(hb_tag_t::new(b"rtlm"));
        let has_vert = ot_map.get_1_mask(hb_tag_t::new(b"vert")) != 0;

        let horizontal = self.direction.is_horizontal();
        let kern_tag = if horizontal {
            hb_tag_t::new(b"kern")
        } else {
            hb_tag_t::new(b"vkrn")
        };
        let kern_mask = ot_map.get_mask(kern_tag).0;
        let requested_kerning = kern_mask != 0;

        let has_gpos_kern = ot_map.get_feature_index(TableIndex::GPOS, kern_tag).is_some();
        let disable_gpos = self.shaper.gpos_tag.is_some()
            && self.shaper.gpos_tag != ot_map.chosen_script(TableIndex::GPOS);

        // Decide who provides glyph classes. GDEF or Unicode.
        let fallback_glyph_classes = !hb_ot_layout_has_glyph_classes(self.font);

        // Decide who does positioning. GPOS, kern, or fallback.
        let apply_gpos = !disable_gpos && self.font.ot_tables.has_gpos();
        let apply_kern =
            (!has_gpos_kern || !apply_gpos) && hb_ot_layout_has_kerning(self.font);
        let apply_fallback_kern = !(apply_gpos || apply_kern);

        let zero_marks = self.script_zero_marks;
        let has_gpos_mark = ot_map.get_1_mask(hb_tag_t::new(b"mark")) != 0;

        let adjust_mark_positioning_when_zeroing =
            !apply_gpos && (!apply_kern || !hb_ot_layout_has_cross_kerning(self.font));

        let fallback_mark_positioning =
            adjust_mark_positioning_when_zeroing && self.script_fallback_mark_positioning;

        debug!(
            "plan for {:?} {:?}: shaper {}, gpos {}, kern {}, fallback kern {}",
            self.script,
            self.direction,
            self.shaper.name,
            apply_gpos,
            apply_kern,
            apply_fallback_kern
        );

        let mut plan = hb_ot_shape_plan_t {
            direction: self.direction,
            script: self.script,
            language: self.language.take(),
            shaper: self.shaper,
            ot_map,
            data: None,
            frac_mask,
            numr_mask,
            dnom_mask,
            rtlm_mask,
            kern_mask,
            requested_kerning,
            has_frac,
            user_frac,
            has_vert,
            has_gpos_mark,
            zero_marks,
            fallback_glyph_classes,
            fallback_mark_positioning,
            adjust_mark_positioning_when_zeroing,
            apply_gpos,
            apply_fallback_kern,
            apply_kern,
            user_features: user_features.iter().copied().collect(),
        };

        if let Some(func) = self.shaper.create_data {
            plan.data = Some(func(&plan));
        }

        plan
    }
}

impl hb_ot_shape_plan_t {
    fn substitute(&self, font: &hb_font_t, buffer: &mut hb_buffer_t) {
        ot_layout_gsub_table::substitute(self, font, buffer);
    }

    fn position(&self, font: &hb_font_t, buffer: &mut hb_buffer_t) {
        if self.apply_gpos {
            ot_layout_gpos_table::position(self, font, buffer);
        } else if self.apply_kern {
            hb_ot_layout_kern(self, font, buffer);
        } else if self.apply_fallback_kern {
            _hb_ot_shape_fallback_kern(self, font, buffer);
        }
    }
}

struct hb_ot_shape_context_t<'a> {
    plan: &'a hb_ot_shape_plan_t,
    font: &'a hb_font_t<'a>,
    buffer: &'a mut hb_buffer_t,
    user_features: &'a [Feature],
    // Transient stuff
    target_direction: Direction,
}

/// Runs every shaping stage over a buffer of code points, leaving glyphs and
/// positions in it.
pub(crate) fn shape_internal(
    plan: &hb_ot_shape_plan_t,
    font: &hb_font_t,
    buffer: &mut hb_buffer_t,
    user_features: &[Feature],
) {
    debug!(
        "shaping {} chars with the {} shaper, script {:?}, direction {:?}, language {:?}",
        buffer.len,
        plan.shaper.name,
        plan.script,
        buffer.direction,
        plan.language.as_ref().map(Language::as_str)
    );

    let mut c = hb_ot_shape_context_t {
        plan,
        font,
        target_direction: buffer.direction,
        buffer,
        user_features,
    };

    c.buffer.enter();
    c.buffer.allocate_unicode_vars();

    initialize_masks(&mut c);
    set_unicode_props(c.buffer);
    insert_dotted_circle(c.buffer, c.font);

    form_clusters(c.buffer);

    ensure_native_direction(c.buffer);

    if let Some(func) = c.plan.shaper.preprocess_text {
        func(c.plan, c.font, c.buffer);
    }

    substitute_pre(&mut c);
    position(&mut c);
    substitute_post(&mut c);

    propagate_flags(c.buffer);

    c.buffer.deallocate_unicode_vars();
    c.buffer.direction = c.target_direction;
    c.buffer.leave();

    if !c.buffer.successful {
        debug!("shaping ran out of buffer budget, output may be incomplete");
    }
}

fn initialize_masks(c: &mut hb_ot_shape_context_t) {
    let global_mask = c.plan.ot_map.global_mask();
    c.buffer.reset_masks(global_mask);
}

fn set_unicode_props(buffer: &mut hb_buffer_t) {
    // Implement enough of Unicode Graphemes here that shaping in
    // reverse-direction wouldn't break graphemes. Namely, we mark all marks
    // and ZWJ and ZWJ,Extended_Pictographic sequences as continuations. The
    // foreach_grapheme() macro uses this bit.
    let len = buffer.len;
    let mut scratch = buffer.scratch_flags;

    let mut i = 0;
    while i < len {
        let info = &mut buffer.info[i];
        info.init_unicode_props(&mut scratch);

        let gen_cat = info.general_category();
        if matches!(
            gen_cat,
            GeneralCategory::LOWERCASE_LETTER
                | GeneralCategory::OTHER_LETTER
                | GeneralCategory::TITLECASE_LETTER
                | GeneralCategory::UPPERCASE_LETTER
                | GeneralCategory::SPACE_SEPARATOR
        ) {
            i += 1;
            continue;
        }

        let u = buffer.info[i].glyph_id;
        if gen_cat == GeneralCategory::MODIFIER_SYMBOL && (0x1F3FB..=0x1F3FF).contains(&u) {
            // Emoji skin tone modifiers.
            buffer.info[i].set_continuation();
        } else if i != 0 && is_regional_indicator(u) {
            // Regional indicators pair up into flags.
            let prev = &buffer.info[i - 1];
            if is_regional_indicator(prev.glyph_id) && !prev.is_continuation() {
                buffer.info[i].set_continuation();
            }
        } else if buffer.info[i].is_zwj() {
            buffer.info[i].set_continuation();
            if i + 1 < len && buffer.info[i + 1].glyph_id.is_emoji_extended_pictographic() {
                i += 1;
                buffer.info[i].init_unicode_props(&mut scratch);
                buffer.info[i].set_continuation();
            }
        } else if (0xFF9E..=0xFF9F).contains(&u) || (0xE0020..=0xE007F).contains(&u) {
            // Halfwidth katakana sound marks and tags extend the grapheme
            // without being marks.
            buffer.info[i].set_continuation();
        }

        i += 1;
    }

    buffer.scratch_flags = scratch;
}

fn is_regional_indicator(u: hb_codepoint_t) -> bool {
    (0x1F1E6..=0x1F1FF).contains(&u)
}

fn insert_dotted_circle(buffer: &mut hb_buffer_t, font: &hb_font_t) {
    if buffer.flags.contains(BufferFlags::DO_NOT_INSERT_DOTTED_CIRCLE) {
        return;
    }

    if !buffer.flags.contains(BufferFlags::BEGINNING_OF_TEXT)
        || buffer.context_len[0] != 0
        || buffer.len == 0
        || !buffer.info[0].is_unicode_mark()
    {
        return;
    }

    if font.get_nominal_glyph(0x25CC).is_none() {
        return;
    }

    let mut info = GlyphInfo {
        glyph_id: 0x25CC,
        mask: buffer.cur(0).mask,
        cluster: buffer.cur(0).cluster,
        var1: 0,
        var2: 0,
    };
    info.init_unicode_props(&mut buffer.scratch_flags);

    buffer.clear_output();
    buffer.idx = 0;
    buffer.output_info(info);
    buffer.sync();
}

fn form_clusters(buffer: &mut hb_buffer_t) {
    if buffer.scratch_flags & HB_BUFFER_SCRATCH_FLAG_HAS_NON_ASCII == 0 {
        return;
    }

    if hb_buffer_cluster_level_is_graphemes(buffer.cluster_level) {
        foreach_grapheme!(buffer, start, end, { buffer.merge_clusters(start, end) });
    } else {
        foreach_grapheme!(buffer, start, end, {
            buffer.unsafe_to_break(Some(start), Some(end));
        });
    }
}

fn ensure_native_direction(buffer: &mut hb_buffer_t) {
    let dir = buffer.direction;
    let mut hor = buffer
        .script
        .and_then(Direction::from_script)
        .unwrap_or_default();

    // Numeric runs in natively-RTL scripts are actually native-LTR, so we
    // reset the horiz_dir if the run contains at least one decimal-number
    // char, and no letter chars (ideally we should be checking for chars
    // with strong directionality but hb-unicode currently lacks bidi
    // categories).
    //
    // This allows digit sequences in Arabic etc to be shaped in "native"
    // direction, so that features like ligatures and mark-positioning work
    // as intended.
    if hor == Direction::RightToLeft && dir == Direction::LeftToRight {
        let mut found_number = false;
        let mut found_letter = false;
        for info in buffer.info_slice() {
            let gc = info.general_category();
            if gc == GeneralCategory::DECIMAL_NUMBER {
                found_number = true;
            } else if gc.is_letter() {
                found_letter = true;
                break;
            }
        }
        if found_number && !found_letter {
            hor = Direction::LeftToRight;
        }
    }

    // TODO vertical:
    // The only BTT vertical script is Ogham, but it's not clear to me
    // whether OpenType Ogham fonts are supposed to be implemented BTT or
    // not. Need to research that first.
    if (dir.is_horizontal() && dir != hor && hor != Direction::Invalid)
        || (dir.is_vertical() && dir != Direction::TopToBottom)
    {
        _hb_ot_layout_reverse_graphemes(buffer);
        buffer.direction = buffer.direction.reverse();
    }
}

// Substitute

fn substitute_pre(c: &mut hb_ot_shape_context_t) {
    substitute_default(c);
    c.buffer.allocate_gsubgpos_vars();
    substitute_plan(c);
}

fn substitute_default(c: &mut hb_ot_shape_context_t) {
    rotate_chars(c);

    c.buffer.allocate_var(GlyphInfo::GLYPH_INDEX_VAR);

    _hb_ot_shape_normalize(c.plan, c.buffer, c.font);

    setup_masks(c);

    // This is unfortunate to go here, but necessary...
    if c.plan.fallback_mark_positioning {
        _hb_ot_shape_fallback_mark_position_recategorize_marks(c.plan, c.font, c.buffer);
    }

    map_glyphs_fast(c.buffer);

    c.buffer.deallocate_var(GlyphInfo::GLYPH_INDEX_VAR);
}

fn substitute_plan(c: &mut hb_ot_shape_context_t) {
    hb_ot_layout_substitute_start(c.font, c.buffer);

    if c.plan.fallback_glyph_classes {
        synthesize_glyph_classes(c.buffer);
    }

    c.plan.substitute(c.font, c.buffer);
}

fn substitute_post(c: &mut hb_ot_shape_context_t) {
    hide_default_ignorables(c.buffer, c.font);

    if let Some(func) = c.plan.shaper.postprocess_glyphs {
        func(c.plan, c.font, c.buffer);
    }
}

fn rotate_chars(c: &mut hb_ot_shape_context_t) {
    let len = c.buffer.len;

    if c.target_direction.is_backward() {
        let rtlm_mask = c.plan.rtlm_mask;

        for info in &mut c.buffer.info[..len] {
            match info.glyph_id.mirrored() {
                Some(mirrored) if c.font.get_nominal_glyph(mirrored).is_some() => {
                    info.glyph_id = mirrored;
                }
                _ => info.mask |= rtlm_mask,
            }
        }
    }

    if c.target_direction.is_vertical() && !c.plan.has_vert {
        for info in &mut c.buffer.info[..len] {
            if let Some(vertical) = info.glyph_id.vertical() {
                if c.font.get_nominal_glyph(vertical).is_some() {
                    info.glyph_id = vertical;
                }
            }
        }
    }
}

fn is_fraction_slash(u: hb_codepoint_t, user_frac: bool) -> bool {
    u == 0x2044 || (user_frac && (u == 0x2215 || u == 0x002F))
}

fn setup_masks_fraction(c: &mut hb_ot_shape_context_t) {
    let buffer = &mut *c.buffer;
    if !c.plan.has_frac
        || (buffer.scratch_flags & HB_BUFFER_SCRATCH_FLAG_HAS_NON_ASCII == 0 && !c.plan.user_frac)
    {
        return;
    }

    let (pre_mask, post_mask) = if buffer.direction.is_forward() {
        (
            c.plan.numr_mask | c.plan.frac_mask,
            c.plan.frac_mask | c.plan.dnom_mask,
        )
    } else {
        (
            c.plan.frac_mask | c.plan.dnom_mask,
            c.plan.numr_mask | c.plan.frac_mask,
        )
    };

    let len = buffer.len;
    let mut i = 0;
    while i < len {
        if !is_fraction_slash(buffer.info[i].glyph_id, c.plan.user_frac) {
            i += 1;
            continue;
        }

        let mut start = i;
        let mut end = i + 1;

        while start > 0
            && buffer.info[start - 1].general_category() == GeneralCategory::DECIMAL_NUMBER
        {
            start -= 1;
        }

        while end < len && buffer.info[end].general_category() == GeneralCategory::DECIMAL_NUMBER
        {
            end += 1;
        }

        if start == i || end == i + 1 {
            if start == i {
                buffer.unsafe_to_concat(Some(start), Some(start + 1));
            }
            if end == i + 1 {
                buffer.unsafe_to_concat(Some(end - 1), Some(end));
            }
            i += 1;
            continue;
        }

        buffer.unsafe_to_break(Some(start), Some(end));

        for info in &mut buffer.info[start..i] {
            info.mask |= pre_mask;
        }

        buffer.info[i].mask |= c.plan.frac_mask;

        for info in &mut buffer.info[i + 1..end] {
            info.mask |= post_mask;
        }

        i = end;
    }
}

fn setup_masks(c: &mut hb_ot_shape_context_t) {
    setup_masks_fraction(c);

    if let Some(func) = c.plan.shaper.setup_masks {
        func(c.plan, c.font, c.buffer);
    }

    for feature in c.user_features {
        if !feature.is_global() {
            let (mask, shift) = c.plan.ot_map.get_mask(feature.tag);
            c.buffer
                .set_masks(feature.value << shift, mask, feature.start, feature.end);
        }
    }
}

fn map_glyphs_fast(buffer: &mut hb_buffer_t) {
    // Normalization process sets up glyph_index(), we just copy it.
    let len = buffer.len;
    for info in &mut buffer.info[..len] {
        info.glyph_id = info.glyph_index();
    }
}

fn synthesize_glyph_classes(buffer: &mut hb_buffer_t) {
    let len = buffer.len;
    for info in &mut buffer.info[..len] {
        // Never mark default-ignorables as marks.
        // They won't get in the way of lookups anyway,
        // but having them as mark will cause them to be skipped
        // over if the lookup-flag says so, but at least for the
        // Mongolian variation selectors, looks like Uniscribe
        // marks them as non-mark. Some Mongolian fonts without
        // GDEF rely on this.
        //
        // https://github.com/harfbuzz/harfbuzz/issues/234
        let class = if info.general_category() != GeneralCategory::NON_SPACING_MARK
            || info.is_default_ignorable()
        {
            GlyphPropsFlags::BASE_GLYPH
        } else {
            GlyphPropsFlags::MARK
        };

        info.set_glyph_props(class.bits());
    }
}

fn zero_width_default_ignorables(buffer: &mut hb_buffer_t) {
    if buffer.scratch_flags & HB_BUFFER_SCRATCH_FLAG_HAS_DEFAULT_IGNORABLES == 0
        || buffer.flags.contains(BufferFlags::PRESERVE_DEFAULT_IGNORABLES)
        || buffer.flags.contains(BufferFlags::REMOVE_DEFAULT_IGNORABLES)
    {
        return;
    }

    let len = buffer.len;
    for (info, pos) in buffer.info[..len].iter().zip(&mut buffer.pos[..len]) {
        if info.is_default_ignorable() {
            pos.x_advance = 0;
            pos.y_advance = 0;
            pos.x_offset = 0;
            pos.y_offset = 0;
        }
    }
}

fn hide_default_ignorables(buffer: &mut hb_buffer_t, font: &hb_font_t) {
    if buffer.scratch_flags & HB_BUFFER_SCRATCH_FLAG_HAS_DEFAULT_IGNORABLES == 0
        || buffer.flags.contains(BufferFlags::PRESERVE_DEFAULT_IGNORABLES)
    {
        return;
    }

    let len = buffer.len;
    let invisible = buffer
        .invisible
        .or_else(|| font.get_nominal_glyph(u32::from(' ')).map(|gid| gid.to_u32()));

    match invisible {
        Some(invisible) if !buffer.flags.contains(BufferFlags::REMOVE_DEFAULT_IGNORABLES) => {
            // Replace default-ignorables with a zero-advance invisible glyph.
            for info in &mut buffer.info[..len] {
                if info.is_default_ignorable() {
                    info.glyph_id = invisible;
                }
            }
        }
        _ => buffer.delete_glyphs_inplace(GlyphInfo::is_default_ignorable),
    }
}

fn propagate_flags(buffer: &mut hb_buffer_t) {
    // Propagate cluster-level glyph flags to be the same on all cluster
    // glyphs. Simplifies using them.
    if buffer.scratch_flags & HB_BUFFER_SCRATCH_FLAG_HAS_GLYPH_FLAGS == 0 {
        return;
    }

    // If we are producing SAFE_TO_INSERT_TATWEEL, then do two things:
    //
    // - If the places that the Arabic shaper marked as SAFE_TO_INSERT_TATWEEL,
    //   are UNSAFE_TO_BREAK, then clear the SAFE_TO_INSERT_TATWEEL,
    // - Any place that is SAFE_TO_INSERT_TATWEEL, is also now UNSAFE_TO_BREAK.
    //
    // We couldn't make this interaction earlier. It has to be done here.
    let flip_tatweel = buffer
        .flags
        .contains(BufferFlags::PRODUCE_SAFE_TO_INSERT_TATWEEL);

    let clear_concat = !buffer.flags.contains(BufferFlags::PRODUCE_UNSAFE_TO_CONCAT);

    foreach_cluster!(buffer, start, end, {
        let mut mask = 0;
        for info in &buffer.info[start..end] {
            mask |= info.mask & glyph_flag::DEFINED;
        }

        if flip_tatweel {
            if mask & glyph_flag::UNSAFE_TO_BREAK != 0 {
                mask &= !glyph_flag::SAFE_TO_INSERT_TATWEEL;
            }
            if mask & glyph_flag::SAFE_TO_INSERT_TATWEEL != 0 {
                mask |= glyph_flag::UNSAFE_TO_BREAK | glyph_flag::UNSAFE_TO_CONCAT;
            }
        }

        if clear_concat {
            mask &= !glyph_flag::UNSAFE_TO_CONCAT;
        }

        for info in &mut buffer.info[start..end] {
            info.mask = (info.mask & !glyph_flag::DEFINED) | mask;
        }
    });
}

// Position

fn position(c: &mut hb_ot_shape_context_t) {
    c.buffer.clear_positions();

    position_default(c);

    position_complex(c);

    if c.buffer.direction.is_backward() {
        c.buffer.reverse();
    }

    c.buffer.deallocate_gsubgpos_vars();
}

fn position_default(c: &mut hb_ot_shape_context_t) {
    let len = c.buffer.len;

    if c.buffer.direction.is_horizontal() {
        for (info, pos) in c.buffer.info[..len].iter().zip(&mut c.buffer.pos[..len]) {
            pos.x_advance = c.font.get_glyph_h_advance(info.as_glyph());
        }
    } else {
        for (info, pos) in c.buffer.info[..len].iter().zip(&mut c.buffer.pos[..len]) {
            let glyph = info.as_glyph();
            pos.y_advance = c.font.get_glyph_v_advance(glyph);
            c.font.subtract_glyph_v_origin(glyph, pos);
        }
    }

    if c.buffer.scratch_flags & HB_BUFFER_SCRATCH_FLAG_HAS_SPACE_FALLBACK != 0 {
        _hb_ot_shape_fallback_spaces(c.plan, c.font, c.buffer);
    }
}

fn position_complex(c: &mut hb_ot_shape_context_t) {
    // If the font has no GPOS and direction is forward, then when
    // zeroing mark widths, we shift the mark with it, such that the
    // mark is positioned hanging over the previous glyph. When
    // direction is backward we don't shift and it will end up
    // hanging over the next glyph after the final reordering.
    //
    // Note: If fallback positioning happens, we don't care about
    // this as it will be overridden.
    let adjust_offsets_when_zeroing =
        c.plan.adjust_mark_positioning_when_zeroing && c.buffer.direction.is_forward();

    GPOS::position_start(c.font, c.buffer);

    if c.plan.zero_marks
        && c.plan.shaper.zero_width_marks == HB_OT_SHAPE_ZERO_WIDTH_MARKS_BY_GDEF_EARLY
    {
        zero_mark_widths_by_gdef(c.buffer, adjust_offsets_when_zeroing);
    }

    c.plan.position(c.font, c.buffer);

    if c.plan.zero_marks
        && c.plan.shaper.zero_width_marks == HB_OT_SHAPE_ZERO_WIDTH_MARKS_BY_GDEF_LATE
    {
        zero_mark_widths_by_gdef(c.buffer, adjust_offsets_when_zeroing);
    }

    // Finish off. Has to follow a certain order.
    GPOS::position_finish_advances(c.font, c.buffer);
    zero_width_default_ignorables(c.buffer);
    GPOS::position_finish_offsets(c.font, c.buffer);

    if c.plan.fallback_mark_positioning {
        _hb_ot_shape_fallback_mark_position(
            c.plan,
            c.font,
            c.buffer,
            adjust_offsets_when_zeroing,
        );
    }
}

fn zero_mark_widths_by_gdef(buffer: &mut hb_buffer_t, adjust_offsets: bool) {
    let len = buffer.len;
    for (info, pos) in buffer.info[..len].iter().zip(&mut buffer.pos[..len]) {
        if info.is_mark() {
            if adjust_offsets {
                pos.x_offset -= pos.x_advance;
                pos.y_offset -= pos.y_advance;
            }

            pos.x_advance = 0;
            pos.y_advance = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn buffer_of(text: &str) -> hb_buffer_t {
        let mut buffer = hb_buffer_t::new();
        for (i, c) in text.chars().enumerate() {
            buffer.add(c as u32, i as u32);
        }
        buffer.allocate_unicode_vars();
        set_unicode_props(&mut buffer);
        buffer
    }

    #[test]
    fn zwj_joins_emoji_into_one_grapheme() {
        let buffer = buffer_of("\u{1F469}\u{200D}\u{1F4BB}x");
        let info = buffer.info_slice();
        assert!(!info[0].is_continuation());
        assert!(info[1].is_continuation());
        assert!(info[2].is_continuation());
        assert!(!info[3].is_continuation());
    }

    #[test]
    fn regional_indicators_pair_up() {
        let buffer = buffer_of("\u{1F1EF}\u{1F1F5}\u{1F1FA}\u{1F1F8}");
        let flags: Vec<bool> = buffer.info_slice().iter().map(|i| i.is_continuation()).collect();
        assert_eq!(flags, [false, true, false, true]);
    }

    #[test]
    fn numbers_in_rtl_scripts_stay_ltr() {
        let mut buffer = buffer_of("123");
        buffer.script = Some(super::super::common::script::ARABIC);
        buffer.direction = Direction::LeftToRight;
        ensure_native_direction(&mut buffer);
        assert_eq!(buffer.direction, Direction::LeftToRight);

        let mut buffer = buffer_of("\u{0628}1");
        buffer.script = Some(super::super::common::script::ARABIC);
        buffer.direction = Direction::LeftToRight;
        ensure_native_direction(&mut buffer);
        assert_eq!(buffer.direction, Direction::RightToLeft);
    }

    #[test]
    fn ascii_slash_needs_user_frac() {
        assert!(is_fraction_slash(0x2044, false));
        assert!(!is_fraction_slash(u32::from('/'), false));
        assert!(is_fraction_slash(u32::from('/'), true));
    }
}
