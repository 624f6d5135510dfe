use alloc::string::String;
use alloc::vec::Vec;
use core::cmp::min;
use core::convert::TryFrom;

use read_fonts::types::GlyphId;

use super::common::{hb_codepoint_t, hb_mask_t, script, Direction, Language, Script};
use super::face::hb_font_t;
use super::set_digest::hb_set_digest_t;
use super::unicode::CharExt;

pub(crate) const CONTEXT_LENGTH: usize = 5;

pub const HB_BUFFER_MAX_LEN_FACTOR: usize = 64;
pub const HB_BUFFER_MAX_LEN_MIN: usize = 16384;
pub const HB_BUFFER_MAX_LEN_DEFAULT: usize = 0x3FFF_FFFF;

pub const HB_BUFFER_MAX_OPS_FACTOR: i32 = 1024;
pub const HB_BUFFER_MAX_OPS_MIN: i32 = 16384;
pub const HB_BUFFER_MAX_OPS_DEFAULT: i32 = 0x1FFF_FFFF;

pub type hb_buffer_scratch_flags_t = u32;
pub const HB_BUFFER_SCRATCH_FLAG_DEFAULT: u32 = 0x0000_0000;
pub const HB_BUFFER_SCRATCH_FLAG_HAS_NON_ASCII: u32 = 0x0000_0001;
pub const HB_BUFFER_SCRATCH_FLAG_HAS_DEFAULT_IGNORABLES: u32 = 0x0000_0002;
pub const HB_BUFFER_SCRATCH_FLAG_HAS_SPACE_FALLBACK: u32 = 0x0000_0004;
pub const HB_BUFFER_SCRATCH_FLAG_HAS_GPOS_ATTACHMENT: u32 = 0x0000_0008;
pub const HB_BUFFER_SCRATCH_FLAG_HAS_CGJ: u32 = 0x0000_0010;
pub const HB_BUFFER_SCRATCH_FLAG_HAS_GLYPH_FLAGS: u32 = 0x0000_0020;
pub const HB_BUFFER_SCRATCH_FLAG_HAS_BROKEN_SYLLABLE: u32 = 0x0000_0040;
pub const HB_BUFFER_SCRATCH_FLAG_HAS_VARIATION_SELECTOR_FALLBACK: u32 = 0x0000_0080;

// Reserved for shapers' internal use.
pub const HB_BUFFER_SCRATCH_FLAG_SHAPER0: u32 = 0x0100_0000;
pub const HB_BUFFER_SCRATCH_FLAG_SHAPER1: u32 = 0x0200_0000;
pub const HB_BUFFER_SCRATCH_FLAG_SHAPER2: u32 = 0x0400_0000;
pub const HB_BUFFER_SCRATCH_FLAG_SHAPER3: u32 = 0x0800_0000;

pub type hb_buffer_cluster_level_t = u32;
pub const HB_BUFFER_CLUSTER_LEVEL_MONOTONE_GRAPHEMES: u32 = 0;
pub const HB_BUFFER_CLUSTER_LEVEL_MONOTONE_CHARACTERS: u32 = 1;
pub const HB_BUFFER_CLUSTER_LEVEL_CHARACTERS: u32 = 2;
pub const HB_BUFFER_CLUSTER_LEVEL_DEFAULT: u32 = HB_BUFFER_CLUSTER_LEVEL_MONOTONE_GRAPHEMES;

#[inline]
pub(crate) fn hb_buffer_cluster_level_is_monotone(level: hb_buffer_cluster_level_t) -> bool {
    level != HB_BUFFER_CLUSTER_LEVEL_CHARACTERS
}

#[inline]
pub(crate) fn hb_buffer_cluster_level_is_graphemes(level: hb_buffer_cluster_level_t) -> bool {
    level == HB_BUFFER_CLUSTER_LEVEL_MONOTONE_GRAPHEMES
}

/// Computes the allocation bits of a buffer variable.
///
/// `var1` owns bits 0..4 and `var2` bits 4..8, one bit per byte.
pub(crate) const fn buffer_var_bits(size: usize, var: u8, index: u8) -> u8 {
    let width = (1u16 << size) - 1;
    let shift = (var as usize - 1) * 4 + index as usize * size;
    (width << shift) as u8
}

macro_rules! declare_buffer_var {
    ($ty:ty, $var:literal, $index:literal, $var_index:ident, $getter:ident, $setter:ident) => {
        pub(crate) const $var_index: u8 =
            crate::hb::buffer::buffer_var_bits(core::mem::size_of::<$ty>(), $var, $index);

        #[inline]
        pub(crate) fn $getter(&self) -> $ty {
            const LEN: usize = core::mem::size_of::<u32>() / core::mem::size_of::<$ty>();
            let v: &[$ty; LEN] = bytemuck::cast_ref(self.var_u32($var));
            v[$index]
        }

        #[inline]
        pub(crate) fn $setter(&mut self, value: $ty) {
            const LEN: usize = core::mem::size_of::<u32>() / core::mem::size_of::<$ty>();
            let v: &mut [$ty; LEN] = bytemuck::cast_mut(self.var_u32_mut($var));
            v[$index] = value;
        }
    };
}

/// Flags attached to output glyphs.
pub mod glyph_flag {
    /// If the text is broken at the start of the cluster this glyph belongs
    /// to, both sides have to be shaped again.
    ///
    /// Its absence means breaking before this cluster and shaping the two
    /// halves independently gives the same result as shaping the whole.
    pub const UNSAFE_TO_BREAK: u32 = 0x0000_0001;
    /// If the text on either side of the start of this cluster changes, the
    /// other side may shape differently. Only produced when
    /// [`BufferFlags::PRODUCE_UNSAFE_TO_CONCAT`](crate::BufferFlags) is set.
    ///
    /// Always implied by [`UNSAFE_TO_BREAK`].
    pub const UNSAFE_TO_CONCAT: u32 = 0x0000_0002;
    /// A tatweel can be inserted before this cluster to elongate the run.
    pub const SAFE_TO_INSERT_TATWEEL: u32 = 0x0000_0004;
    /// All currently defined flags.
    pub const DEFINED: u32 = 0x0000_0007;
}

bitflags::bitflags! {
    /// Public view of the per-glyph flags.
    #[derive(Clone, Copy, Default, Debug, PartialEq, Eq, Hash)]
    pub struct GlyphFlags: u32 {
        const UNSAFE_TO_BREAK = glyph_flag::UNSAFE_TO_BREAK;
        const UNSAFE_TO_CONCAT = glyph_flag::UNSAFE_TO_CONCAT;
        const SAFE_TO_INSERT_TATWEEL = glyph_flag::SAFE_TO_INSERT_TATWEEL;
    }
}

/// The position of a glyph, relative to the current point.
#[repr(C)]
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct GlyphPosition {
    /// How much the line advances after drawing this glyph in horizontal text.
    pub x_advance: i32,
    /// How much the line advances after drawing this glyph in vertical text.
    pub y_advance: i32,
    /// How much the glyph moves on the X-axis before drawing it. This does
    /// not affect how much the line advances.
    pub x_offset: i32,
    /// How much the glyph moves on the Y-axis before drawing it. This does
    /// not affect how much the line advances.
    pub y_offset: i32,
    pub(crate) var: u32,
}

unsafe impl bytemuck::Zeroable for GlyphPosition {}
unsafe impl bytemuck::Pod for GlyphPosition {}

impl GlyphPosition {
    #[inline]
    pub(crate) fn var_u32(&self, _: u8) -> &u32 {
        &self.var
    }

    #[inline]
    pub(crate) fn var_u32_mut(&mut self, _: u8) -> &mut u32 {
        &mut self.var
    }

    // Glyph this one attaches to, relative to the current glyph. Negative for
    // going back, positive for going forward.
    declare_buffer_var!(i16, 1, 0, ATTACH_CHAIN_VAR, attach_chain, set_attach_chain);
    // Only meaningful when attach_chain is non-zero.
    declare_buffer_var!(u8, 1, 2, ATTACH_TYPE_VAR, attach_type, set_attach_type);
}

/// A glyph, or before substitution a code point, in the buffer.
#[repr(C)]
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct GlyphInfo {
    /// Glyph id after shaping. Holds a Unicode code point before.
    pub glyph_id: u32,
    pub(crate) mask: hb_mask_t,
    /// Index of the start of the cluster in the input text.
    ///
    /// See <https://harfbuzz.github.io/clusters.html>.
    pub cluster: u32,
    pub(crate) var1: u32,
    pub(crate) var2: u32,
}

unsafe impl bytemuck::Zeroable for GlyphInfo {}
unsafe impl bytemuck::Pod for GlyphInfo {}

impl GlyphInfo {
    /// The glyph flags of this glyph.
    #[inline]
    pub fn glyph_flags(&self) -> GlyphFlags {
        GlyphFlags::from_bits_truncate(self.mask & glyph_flag::DEFINED)
    }

    /// See [`GlyphFlags::UNSAFE_TO_BREAK`].
    #[inline]
    pub fn unsafe_to_break(&self) -> bool {
        self.mask & glyph_flag::UNSAFE_TO_BREAK != 0
    }

    /// See [`GlyphFlags::UNSAFE_TO_CONCAT`].
    #[inline]
    pub fn unsafe_to_concat(&self) -> bool {
        self.mask & glyph_flag::UNSAFE_TO_CONCAT != 0
    }

    /// See [`GlyphFlags::SAFE_TO_INSERT_TATWEEL`].
    #[inline]
    pub fn safe_to_insert_tatweel(&self) -> bool {
        self.mask & glyph_flag::SAFE_TO_INSERT_TATWEEL != 0
    }

    #[inline]
    pub(crate) fn as_codepoint(&self) -> hb_codepoint_t {
        self.glyph_id
    }

    #[inline]
    pub(crate) fn as_char(&self) -> char {
        char::try_from(self.glyph_id).unwrap_or(char::REPLACEMENT_CHARACTER)
    }

    #[inline]
    pub(crate) fn as_glyph(&self) -> GlyphId {
        GlyphId::new(self.glyph_id)
    }

    #[inline]
    pub(crate) fn var_u32(&self, var: u8) -> &u32 {
        if var == 1 {
            &self.var1
        } else {
            &self.var2
        }
    }

    #[inline]
    pub(crate) fn var_u32_mut(&mut self, var: u8) -> &mut u32 {
        if var == 1 {
            &mut self.var1
        } else {
            &mut self.var2
        }
    }

    // Used during normalization to remember the glyph of a character.
    declare_buffer_var!(u32, 1, 0, GLYPH_INDEX_VAR, glyph_index, set_glyph_index);
}

bitflags::bitflags! {
    #[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
    pub struct UnicodeProps: u16 {
        const GENERAL_CATEGORY  = 0x001F;
        const IGNORABLE         = 0x0020;
        // MONGOLIAN FREE VARIATION SELECTOR 1..4, or TAG characters, or CGJ.
        const HIDDEN            = 0x0040;
        const CONTINUATION      = 0x0080;

        // If GEN_CAT=FORMAT, top byte masks:
        const CF_ZWJ            = 0x0100;
        const CF_ZWNJ           = 0x0200;
        const CF_VS             = 0x0400;
    }
}

bitflags::bitflags! {
    #[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
    pub struct GlyphPropsFlags: u16 {
        // The following three match LookupFlags::Ignore* numbers.
        const BASE_GLYPH    = 0x02;
        const LIGATURE      = 0x04;
        const MARK          = 0x08;
        const CLASS_MASK    = Self::BASE_GLYPH.bits() | Self::LIGATURE.bits() | Self::MARK.bits();

        // The following are used internally; not derived from GDEF.
        const SUBSTITUTED   = 0x10;
        const LIGATED       = 0x20;
        const MULTIPLIED    = 0x40;

        const PRESERVE      = Self::SUBSTITUTED.bits() | Self::LIGATED.bits() | Self::MULTIPLIED.bits();
    }
}

bitflags::bitflags! {
    /// Flags controlling how a buffer is shaped.
    ///
    /// The bit values match HarfBuzz.
    #[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BufferFlags: u32 {
        /// The buffer starts a paragraph, so special handling of the start of
        /// text applies (for example dotted circle insertion).
        const BEGINNING_OF_TEXT             = 0x0000_0001;
        /// The buffer ends a paragraph, similar to `BEGINNING_OF_TEXT`.
        const END_OF_TEXT                   = 0x0000_0002;
        /// Use the font's glyphs for `Default_Ignorable` characters instead of
        /// hiding them. Takes precedence over `REMOVE_DEFAULT_IGNORABLES`.
        const PRESERVE_DEFAULT_IGNORABLES   = 0x0000_0004;
        /// Remove `Default_Ignorable` characters from the output instead of
        /// hiding them behind a zero-advance space glyph.
        const REMOVE_DEFAULT_IGNORABLES     = 0x0000_0008;
        /// Never insert a dotted circle for broken character sequences.
        const DO_NOT_INSERT_DOTTED_CIRCLE   = 0x0000_0010;
        /// Check the shaping result for consistency after shaping.
        const VERIFY                        = 0x0000_0020;
        /// Compute `UNSAFE_TO_CONCAT` glyph flags.
        const PRODUCE_UNSAFE_TO_CONCAT      = 0x0000_0040;
        /// Compute `SAFE_TO_INSERT_TATWEEL` glyph flags.
        const PRODUCE_SAFE_TO_INSERT_TATWEEL = 0x0000_0080;
    }
}

bitflags::bitflags! {
    /// Flags for [`GlyphBuffer::serialize`].
    #[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SerializeFlags: u8 {
        /// Do not serialize glyph cluster.
        const NO_CLUSTERS       = 0b0000_0001;
        /// Do not serialize glyph position information.
        const NO_POSITIONS      = 0b0000_0010;
        /// Do no serialize glyph name.
        const NO_GLYPH_NAMES    = 0b0000_0100;
        /// Serialize glyph extents.
        const GLYPH_EXTENTS     = 0b0000_1000;
        /// Serialize glyph flags.
        const GLYPH_FLAGS       = 0b0001_0000;
        /// Do not serialize glyph advances. Glyph offsets then reflect
        /// absolute glyph positions.
        const NO_ADVANCES       = 0b0010_0000;
    }
}

/// How input clusters are merged during shaping.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Debug)]
pub enum BufferClusterLevel {
    /// Clusters are merged to grapheme boundaries and stay monotone.
    #[default]
    MonotoneGraphemes,
    /// Marks keep their own cluster but clusters stay monotone.
    MonotoneCharacters,
    /// Clusters are not merged; unsafe-to-break flags are set instead.
    Characters,
}

impl BufferClusterLevel {
    fn to_hb(self) -> hb_buffer_cluster_level_t {
        match self {
            Self::MonotoneGraphemes => HB_BUFFER_CLUSTER_LEVEL_MONOTONE_GRAPHEMES,
            Self::MonotoneCharacters => HB_BUFFER_CLUSTER_LEVEL_MONOTONE_CHARACTERS,
            Self::Characters => HB_BUFFER_CLUSTER_LEVEL_CHARACTERS,
        }
    }

    fn from_hb(level: hb_buffer_cluster_level_t) -> Self {
        match level {
            HB_BUFFER_CLUSTER_LEVEL_MONOTONE_CHARACTERS => Self::MonotoneCharacters,
            HB_BUFFER_CLUSTER_LEVEL_CHARACTERS => Self::Characters,
            _ => Self::MonotoneGraphemes,
        }
    }
}

pub struct hb_buffer_t {
    // Information about how the text in the buffer should be treated.
    pub flags: BufferFlags,
    pub cluster_level: hb_buffer_cluster_level_t,
    pub replacement: hb_codepoint_t,
    pub invisible: Option<u32>,
    pub not_found: u32,

    // Buffer contents.
    pub direction: Direction,
    pub script: Option<Script>,
    pub language: Option<Language>,

    /// Allocations successful.
    pub successful: bool,
    /// Whether we have an output buffer going on.
    pub have_output: bool,
    /// Whether the output lives in the `pos` storage.
    pub have_separate_output: bool,
    /// Whether we have positions.
    pub have_positions: bool,

    pub idx: usize,
    pub len: usize,
    pub out_len: usize,

    pub info: Vec<GlyphInfo>,
    pub pos: Vec<GlyphPosition>,

    /// Glyphs that may be present in the buffer.
    pub digest: hb_set_digest_t,

    // Text before / after the main buffer contents, always in Unicode and
    // ordered outward. Index 0 is the pre-context, 1 the post-context.
    pub context: [[hb_codepoint_t; CONTEXT_LENGTH]; 2],
    pub context_len: [usize; 2],

    // Managed by enter / leave.
    pub serial: u8,
    pub scratch_flags: hb_buffer_scratch_flags_t,
    /// Maximum allowed len.
    pub max_len: usize,
    /// Maximum allowed operations.
    pub max_ops: i32,

    #[cfg(debug_assertions)]
    allocated_var_bits: u8,
}

impl Default for hb_buffer_t {
    fn default() -> Self {
        Self::new()
    }
}

impl hb_buffer_t {
    pub const DEFAULT_REPLACEMENT_CODEPOINT: hb_codepoint_t = 0xFFFD;

    pub fn new() -> Self {
        hb_buffer_t {
            flags: BufferFlags::empty(),
            cluster_level: HB_BUFFER_CLUSTER_LEVEL_DEFAULT,
            replacement: Self::DEFAULT_REPLACEMENT_CODEPOINT,
            invisible: None,
            not_found: 0,
            direction: Direction::Invalid,
            script: None,
            language: None,
            successful: true,
            have_output: false,
            have_separate_output: false,
            have_positions: false,
            idx: 0,
            len: 0,
            out_len: 0,
            info: Vec::new(),
            pos: Vec::new(),
            digest: hb_set_digest_t::new(),
            context: [[0; CONTEXT_LENGTH]; 2],
            context_len: [0, 0],
            serial: 0,
            scratch_flags: HB_BUFFER_SCRATCH_FLAG_DEFAULT,
            max_len: HB_BUFFER_MAX_LEN_DEFAULT,
            max_ops: HB_BUFFER_MAX_OPS_DEFAULT,
            #[cfg(debug_assertions)]
            allocated_var_bits: 0,
        }
    }

    #[inline]
    pub fn info_slice(&self) -> &[GlyphInfo] {
        &self.info[..self.len]
    }

    #[inline]
    pub fn info_slice_mut(&mut self) -> &mut [GlyphInfo] {
        &mut self.info[..self.len]
    }

    #[inline]
    pub fn out_info(&self) -> &[GlyphInfo] {
        if self.have_separate_output {
            bytemuck::cast_slice(self.pos.as_slice())
        } else {
            &self.info
        }
    }

    #[inline]
    pub fn out_info_mut(&mut self) -> &mut [GlyphInfo] {
        if self.have_separate_output {
            bytemuck::cast_slice_mut(self.pos.as_mut_slice())
        } else {
            &mut self.info
        }
    }

    #[inline]
    fn set_out_info(&mut self, i: usize, info: GlyphInfo) {
        self.out_info_mut()[i] = info;
    }

    #[inline]
    pub fn cur(&self, i: usize) -> &GlyphInfo {
        &self.info[self.idx + i]
    }

    #[inline]
    pub fn cur_mut(&mut self, i: usize) -> &mut GlyphInfo {
        let idx = self.idx + i;
        &mut self.info[idx]
    }

    #[inline]
    pub fn cur_pos_mut(&mut self) -> &mut GlyphPosition {
        let i = self.idx;
        &mut self.pos[i]
    }

    #[inline]
    pub fn prev(&self) -> &GlyphInfo {
        let idx = self.out_len.saturating_sub(1);
        &self.out_info()[idx]
    }

    #[inline]
    pub fn prev_mut(&mut self) -> &mut GlyphInfo {
        let idx = self.out_len.saturating_sub(1);
        &mut self.out_info_mut()[idx]
    }

    #[inline]
    pub fn backtrack_len(&self) -> usize {
        if self.have_output {
            self.out_len
        } else {
            self.idx
        }
    }

    #[inline]
    pub fn lookahead_len(&self) -> usize {
        self.len - self.idx
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    fn next_serial(&mut self) -> u8 {
        self.serial = self.serial.wrapping_add(1);
        if self.serial == 0 {
            self.serial += 1;
        }
        self.serial
    }

    pub fn allocate_lig_id(&mut self) -> u8 {
        let mut lig_id = self.next_serial() & 0x07;
        if lig_id == 0 {
            // In case of overflow.
            lig_id = self.next_serial() & 0x07;
        }
        lig_id
    }

    pub fn allocate_var(&mut self, bits: u8) {
        #[cfg(debug_assertions)]
        {
            self.allocated_var_bits |= bits;
        }
        #[cfg(not(debug_assertions))]
        let _ = bits;
    }

    pub fn deallocate_var(&mut self, bits: u8) {
        #[cfg(debug_assertions)]
        {
            debug_assert_eq!(
                self.allocated_var_bits & bits,
                bits,
                "deallocating an unallocated buffer var"
            );
            self.allocated_var_bits &= !bits;
        }
        #[cfg(not(debug_assertions))]
        let _ = bits;
    }

    pub fn assert_var(&self, bits: u8) {
        #[cfg(debug_assertions)]
        debug_assert_eq!(
            self.allocated_var_bits & bits,
            bits,
            "buffer var used without allocation"
        );
        #[cfg(not(debug_assertions))]
        let _ = bits;
    }

    fn deallocate_var_all(&mut self) {
        #[cfg(debug_assertions)]
        {
            self.allocated_var_bits = 0;
        }
    }

    /// Recomputes the set of glyphs present in the buffer.
    pub fn digest(&self) -> hb_set_digest_t {
        let mut digest = hb_set_digest_t::new();
        for info in self.info_slice() {
            digest.add(info.glyph_id);
        }
        digest
    }

    pub fn update_digest(&mut self) {
        self.digest = self.digest();
    }

    pub fn clear(&mut self) {
        self.direction = Direction::Invalid;
        self.script = None;
        self.language = None;

        self.successful = true;
        self.have_output = false;
        self.have_positions = false;
        self.have_separate_output = false;

        self.idx = 0;
        self.info.clear();
        self.pos.clear();
        self.len = 0;
        self.out_len = 0;

        self.context = [[0; CONTEXT_LENGTH]; 2];
        self.context_len = [0, 0];

        self.serial = 0;
        self.scratch_flags = HB_BUFFER_SCRATCH_FLAG_DEFAULT;
        self.digest = hb_set_digest_t::new();
        self.deallocate_var_all();
    }

    pub fn add(&mut self, codepoint: hb_codepoint_t, cluster: u32) {
        if !self.ensure(self.len + 1) {
            return;
        }

        let i = self.len;
        self.info[i] = GlyphInfo {
            glyph_id: codepoint,
            mask: 0,
            cluster,
            var1: 0,
            var2: 0,
        };

        self.len += 1;
    }

    #[inline]
    pub fn reverse(&mut self) {
        if self.is_empty() {
            return;
        }

        self.reverse_range(0, self.len);
    }

    pub fn reverse_range(&mut self, start: usize, end: usize) {
        if end.saturating_sub(start) < 2 {
            return;
        }

        self.info[start..end].reverse();
        if self.have_positions {
            self.pos[start..end].reverse();
        }
    }

    /// Reverses each group in place, then the whole buffer, so that groups
    /// keep their internal order.
    pub fn reverse_groups<F>(&mut self, group: F, merge_clusters: bool)
    where
        F: Fn(&GlyphInfo, &GlyphInfo) -> bool,
    {
        if self.is_empty() {
            return;
        }

        let mut start = 0;
        let mut i = 1;
        while i < self.len {
            if !group(&self.info[i - 1], &self.info[i]) {
                if merge_clusters {
                    self.merge_clusters(start, i);
                }
                self.reverse_range(start, i);
                start = i;
            }
            i += 1;
        }

        if merge_clusters {
            self.merge_clusters(start, i);
        }
        self.reverse_range(start, i);

        self.reverse();
    }

    pub fn reverse_clusters(&mut self) {
        self.reverse_groups(_cluster_group_func, false);
    }

    pub fn group_end<F>(&self, mut start: usize, group: F) -> usize
    where
        F: Fn(&GlyphInfo, &GlyphInfo) -> bool,
    {
        start += 1;

        while start < self.len && group(&self.info[start - 1], &self.info[start]) {
            start += 1;
        }

        start
    }

    pub fn reset_clusters(&mut self) {
        for (i, info) in self.info[..self.len].iter_mut().enumerate() {
            info.cluster = i as u32;
        }
    }

    pub fn guess_segment_properties(&mut self) {
        if self.script.is_none() {
            for info in self.info_slice() {
                match info.glyph_id.script() {
                    script::COMMON | script::INHERITED | script::UNKNOWN => {}
                    s => {
                        self.script = Some(s);
                        break;
                    }
                }
            }
        }

        if self.direction == Direction::Invalid {
            if let Some(script) = self.script {
                self.direction = Direction::from_script(script).unwrap_or_default();
            }

            if self.direction == Direction::Invalid {
                self.direction = Direction::LeftToRight;
            }
        }
    }

    /// Makes the output array the new input array.
    #[doc(alias = "swap_buffers")]
    pub fn sync(&mut self) -> bool {
        debug_assert!(self.have_output);
        debug_assert!(self.idx <= self.len);

        let mut ret = false;
        if self.successful {
            self.next_glyphs(self.len - self.idx);
        }

        if self.successful {
            if self.have_separate_output {
                let info: Vec<GlyphPosition> = bytemuck::cast_vec(core::mem::take(&mut self.info));
                let pos: Vec<GlyphInfo> = bytemuck::cast_vec(core::mem::take(&mut self.pos));
                self.pos = info;
                self.info = pos;
            }
            self.len = self.out_len;
            ret = true;
        }

        self.have_output = false;
        self.have_separate_output = false;
        self.out_len = 0;
        self.idx = 0;
        ret
    }

    pub fn clear_output(&mut self) {
        self.have_output = true;
        self.have_positions = false;

        self.idx = 0;
        self.out_len = 0;
        self.have_separate_output = false;
    }

    pub fn clear_positions(&mut self) {
        self.have_output = false;
        self.have_positions = true;

        self.out_len = 0;
        self.have_separate_output = false;

        let len = self.len;
        if self.pos.len() < len {
            self.pos.resize(len, GlyphPosition::default());
        }
        for pos in &mut self.pos[..len] {
            *pos = GlyphPosition::default();
        }
    }

    pub fn replace_glyphs(&mut self, num_in: usize, num_out: usize, glyph_data: &[u32]) {
        if !self.make_room_for(num_in, num_out) {
            return;
        }

        debug_assert!(self.idx + num_in <= self.len);

        self.merge_clusters(self.idx, self.idx + num_in);

        let orig_info = if self.idx < self.len {
            self.info[self.idx]
        } else {
            *self.prev()
        };

        for (i, glyph) in glyph_data.iter().take(num_out).enumerate() {
            let mut info = orig_info;
            info.glyph_id = *glyph;
            self.set_out_info(self.out_len + i, info);
        }

        self.idx += num_in;
        self.out_len += num_out;
    }

    pub fn replace_glyph(&mut self, glyph_index: u32) {
        if self.have_separate_output || self.out_len != self.idx {
            if !self.make_room_for(1, 1) {
                return;
            }

            self.set_out_info(self.out_len, self.info[self.idx]);
        }

        let out_len = self.out_len;
        self.out_info_mut()[out_len].glyph_id = glyph_index;

        self.idx += 1;
        self.out_len += 1;
    }

    pub fn output_glyph(&mut self, glyph_index: u32) {
        if !self.make_room_for(0, 1) {
            return;
        }

        if self.idx == self.len && self.out_len == 0 {
            return;
        }

        let out_len = self.out_len;
        let mut info = if self.idx < self.len {
            self.info[self.idx]
        } else {
            self.out_info()[out_len - 1]
        };
        info.glyph_id = glyph_index;
        self.set_out_info(out_len, info);

        self.out_len += 1;
    }

    pub fn output_info(&mut self, glyph_info: GlyphInfo) {
        if !self.make_room_for(0, 1) {
            return;
        }

        self.set_out_info(self.out_len, glyph_info);
        self.out_len += 1;
    }

    /// Copies glyph at idx to output but doesn't advance idx.
    pub fn copy_glyph(&mut self) {
        if !self.make_room_for(0, 1) {
            return;
        }

        self.set_out_info(self.out_len, self.info[self.idx]);
        self.out_len += 1;
    }

    /// Copies glyph at idx to output and advance idx.
    ///
    /// If there's no output, just advance idx.
    pub fn next_glyph(&mut self) {
        if self.have_output {
            if self.have_separate_output || self.out_len != self.idx {
                if !self.make_room_for(1, 1) {
                    return;
                }

                self.set_out_info(self.out_len, self.info[self.idx]);
            }

            self.out_len += 1;
        }

        self.idx += 1;
    }

    /// Copies n glyphs at idx to output and advance idx.
    ///
    /// If there's no output, just advance idx.
    pub fn next_glyphs(&mut self, n: usize) {
        if self.have_output {
            if self.have_separate_output || self.out_len != self.idx {
                if !self.make_room_for(n, n) {
                    return;
                }

                for i in 0..n {
                    self.set_out_info(self.out_len + i, self.info[self.idx + i]);
                }
            }

            self.out_len += n;
        }

        self.idx += n;
    }

    /// Advance idx without copying to output.
    #[inline]
    pub fn skip_glyph(&mut self) {
        self.idx += 1;
    }

    pub fn reset_masks(&mut self, mask: hb_mask_t) {
        for info in &mut self.info[..self.len] {
            info.mask = mask;
        }
    }

    pub fn set_masks(
        &mut self,
        mut value: hb_mask_t,
        mask: hb_mask_t,
        cluster_start: u32,
        cluster_end: u32,
    ) {
        if mask == 0 {
            return;
        }

        let not_mask = !mask;
        value &= mask;

        if cluster_start == 0 && cluster_end == u32::MAX {
            for info in &mut self.info[..self.len] {
                info.mask = (info.mask & not_mask) | value;
            }
            return;
        }

        for info in &mut self.info[..self.len] {
            if cluster_start <= info.cluster && info.cluster < cluster_end {
                info.mask = (info.mask & not_mask) | value;
            }
        }
    }

    pub fn merge_clusters(&mut self, start: usize, end: usize) {
        if end.saturating_sub(start) < 2 {
            return;
        }

        self.merge_clusters_impl(start, end);
    }

    fn merge_clusters_impl(&mut self, mut start: usize, mut end: usize) {
        if !hb_buffer_cluster_level_is_monotone(self.cluster_level) {
            self.unsafe_to_break(Some(start), Some(end));
            return;
        }

        self.max_ops -= (end - start) as i32;
        if self.max_ops < 0 {
            self.successful = false;
        }

        let mut cluster = self.info[start].cluster;
        for i in start + 1..end {
            cluster = min(cluster, self.info[i].cluster);
        }

        // Extend end
        if cluster != self.info[end - 1].cluster {
            while end < self.len && self.info[end - 1].cluster == self.info[end].cluster {
                end += 1;
            }
        }

        // Extend start
        if cluster != self.info[start].cluster {
            while self.idx < start && self.info[start - 1].cluster == self.info[start].cluster {
                start -= 1;
            }
        }

        // If we hit the start of buffer, continue in out-buffer.
        if self.idx == start && self.info[start].cluster != cluster {
            let start_cluster = self.info[start].cluster;
            let mut i = self.out_len;
            while i != 0 && self.out_info()[i - 1].cluster == start_cluster {
                set_cluster(&mut self.out_info_mut()[i - 1], cluster, 0);
                i -= 1;
            }
        }

        for info in &mut self.info[start..end] {
            set_cluster(info, cluster, 0);
        }
    }

    pub fn merge_out_clusters(&mut self, mut start: usize, mut end: usize) {
        if !hb_buffer_cluster_level_is_monotone(self.cluster_level) {
            return;
        }

        if end.saturating_sub(start) < 2 {
            return;
        }

        self.max_ops -= (end - start) as i32;
        if self.max_ops < 0 {
            self.successful = false;
        }

        let mut cluster = self.out_info()[start].cluster;
        for i in start + 1..end {
            cluster = min(cluster, self.out_info()[i].cluster);
        }

        // Extend start
        while start != 0 && self.out_info()[start - 1].cluster == self.out_info()[start].cluster {
            start -= 1;
        }

        // Extend end
        while end < self.out_len && self.out_info()[end - 1].cluster == self.out_info()[end].cluster
        {
            end += 1;
        }

        // If we hit the end of out-buffer, continue in buffer.
        if end == self.out_len {
            let last_cluster = self.out_info()[end - 1].cluster;
            let mut i = self.idx;
            while i < self.len && self.info[i].cluster == last_cluster {
                set_cluster(&mut self.info[i], cluster, 0);
                i += 1;
            }
        }

        for info in &mut self.out_info_mut()[start..end] {
            set_cluster(info, cluster, 0);
        }
    }

    /// Merge clusters for deleting current glyph, and skip it.
    pub fn delete_glyph(&mut self) {
        let cluster = self.info[self.idx].cluster;

        if (self.idx + 1 < self.len && cluster == self.info[self.idx + 1].cluster)
            || (self.out_len != 0 && cluster == self.out_info()[self.out_len - 1].cluster)
        {
            // Cluster survives; do nothing.
            self.skip_glyph();
            return;
        }

        if self.out_len != 0 {
            // Merge cluster backward.
            if cluster < self.out_info()[self.out_len - 1].cluster {
                let mask = self.info[self.idx].mask;
                let old_cluster = self.out_info()[self.out_len - 1].cluster;

                let mut i = self.out_len;
                while i != 0 && self.out_info()[i - 1].cluster == old_cluster {
                    set_cluster(&mut self.out_info_mut()[i - 1], cluster, mask);
                    i -= 1;
                }
            }

            self.skip_glyph();
            return;
        }

        if self.idx + 1 < self.len {
            // Merge cluster forward.
            self.merge_clusters(self.idx, self.idx + 2);
        }

        self.skip_glyph();
    }

    /// Removes glyphs matching `filter` without the output buffer, keeping
    /// positions aligned.
    pub fn delete_glyphs_inplace(&mut self, filter: impl Fn(&GlyphInfo) -> bool) {
        let mut j = 0;

        for i in 0..self.len {
            if filter(&self.info[i]) {
                // Same cluster logic as delete_glyph().
                let cluster = self.info[i].cluster;
                if i + 1 < self.len && cluster == self.info[i + 1].cluster {
                    // Cluster survives; do nothing.
                    continue;
                }

                if j != 0 {
                    // Merge cluster backward.
                    if cluster < self.info[j - 1].cluster {
                        let mask = self.info[i].mask;
                        let old_cluster = self.info[j - 1].cluster;

                        let mut k = j;
                        while k > 0 && self.info[k - 1].cluster == old_cluster {
                            set_cluster(&mut self.info[k - 1], cluster, mask);
                            k -= 1;
                        }
                    }
                    continue;
                }

                if i + 1 < self.len {
                    // Merge cluster forward.
                    self.merge_clusters(i, i + 2);
                }

                continue;
            }

            if j != i {
                self.info[j] = self.info[i];
                self.pos[j] = self.pos[i];
            }

            j += 1;
        }

        self.len = j;
    }

    pub fn unsafe_to_break(&mut self, start: Option<usize>, end: Option<usize>) {
        self._set_glyph_flags(
            glyph_flag::UNSAFE_TO_BREAK | glyph_flag::UNSAFE_TO_CONCAT,
            start,
            end,
            true,
            false,
        );
    }

    pub fn safe_to_insert_tatweel(&mut self, start: Option<usize>, end: Option<usize>) {
        if !self
            .flags
            .contains(BufferFlags::PRODUCE_SAFE_TO_INSERT_TATWEEL)
        {
            self.unsafe_to_break(start, end);
            return;
        }

        self._set_glyph_flags(glyph_flag::SAFE_TO_INSERT_TATWEEL, start, end, true, false);
    }

    pub fn unsafe_to_concat(&mut self, start: Option<usize>, end: Option<usize>) {
        if !self.flags.contains(BufferFlags::PRODUCE_UNSAFE_TO_CONCAT) {
            return;
        }

        self._set_glyph_flags(glyph_flag::UNSAFE_TO_CONCAT, start, end, false, false);
    }

    pub fn unsafe_to_break_from_outbuffer(&mut self, start: Option<usize>, end: Option<usize>) {
        self._set_glyph_flags(
            glyph_flag::UNSAFE_TO_BREAK | glyph_flag::UNSAFE_TO_CONCAT,
            start,
            end,
            true,
            true,
        );
    }

    pub fn unsafe_to_concat_from_outbuffer(&mut self, start: Option<usize>, end: Option<usize>) {
        if !self.flags.contains(BufferFlags::PRODUCE_UNSAFE_TO_CONCAT) {
            return;
        }

        self._set_glyph_flags(glyph_flag::UNSAFE_TO_CONCAT, start, end, false, true);
    }

    /// Adds glyph flags in mask to infos with clusters between start and end.
    ///
    /// The start index is into the out-buffer when `from_out_buffer` is set.
    /// When `interior` is set, the cluster with the minimum value is skipped.
    fn _set_glyph_flags(
        &mut self,
        mask: hb_mask_t,
        start: Option<usize>,
        end: Option<usize>,
        interior: bool,
        from_out_buffer: bool,
    ) {
        let start = start.unwrap_or(0);
        let end = min(end.unwrap_or(self.len), self.len);

        if interior && !from_out_buffer && end.saturating_sub(start) < 2 {
            return;
        }

        self.scratch_flags |= HB_BUFFER_SCRATCH_FLAG_HAS_GLYPH_FLAGS;

        let level = self.cluster_level;
        if !from_out_buffer || !self.have_output {
            if !interior {
                for info in &mut self.info[start..end] {
                    info.mask |= mask;
                }
            } else {
                let cluster = _infos_find_min_cluster(&self.info[start..end], u32::MAX);
                _infos_set_glyph_flags(&mut self.info[start..end], cluster, mask, level);
            }
        } else {
            debug_assert!(start <= self.out_len);
            debug_assert!(self.idx <= end);

            let (idx, out_len) = (self.idx, self.out_len);
            if !interior {
                for info in &mut self.out_info_mut()[start..out_len] {
                    info.mask |= mask;
                }
                for info in &mut self.info[idx..end] {
                    info.mask |= mask;
                }
            } else {
                let mut cluster = _infos_find_min_cluster(&self.info[idx..end], u32::MAX);
                cluster = _infos_find_min_cluster(&self.out_info()[start..out_len], cluster);

                _infos_set_glyph_flags(&mut self.out_info_mut()[start..out_len], cluster, mask, level);
                _infos_set_glyph_flags(&mut self.info[idx..end], cluster, mask, level);
            }
        }
    }

    pub fn move_to(&mut self, i: usize) -> bool {
        if !self.have_output {
            debug_assert!(i <= self.len);
            self.idx = i;
            return true;
        }

        if !self.successful {
            return false;
        }

        debug_assert!(i <= self.out_len + (self.len - self.idx));

        if self.out_len < i {
            let count = i - self.out_len;
            if !self.make_room_for(count, count) {
                return false;
            }

            for j in 0..count {
                self.set_out_info(self.out_len + j, self.info[self.idx + j]);
            }

            self.idx += count;
            self.out_len += count;
        } else if self.out_len > i {
            // Tricky part: rewinding...
            let count = self.out_len - i;

            if self.idx < count && !self.shift_forward(count - self.idx) {
                return false;
            }

            debug_assert!(self.idx >= count);

            self.idx -= count;
            self.out_len -= count;

            for j in 0..count {
                self.info[self.idx + j] = self.out_info()[self.out_len + j];
            }
        }

        true
    }

    pub fn ensure(&mut self, size: usize) -> bool {
        if size <= self.info.len() {
            return true;
        }

        if size > self.max_len {
            self.successful = false;
            return false;
        }

        let new_len = size.max(self.info.len() * 2).max(32).min(self.max_len);
        self.info.resize(new_len, GlyphInfo::default());
        self.pos.resize(new_len, GlyphPosition::default());
        true
    }

    pub fn set_len(&mut self, len: usize) {
        if self.ensure(len) {
            self.len = len;
        }
    }

    fn make_room_for(&mut self, num_in: usize, num_out: usize) -> bool {
        if !self.ensure(self.out_len + num_out) {
            return false;
        }

        if !self.have_separate_output && self.out_len + num_out > self.idx + num_in {
            debug_assert!(self.have_output);

            self.have_separate_output = true;
            for i in 0..self.out_len {
                self.set_out_info(i, self.info[i]);
            }
        }

        true
    }

    fn shift_forward(&mut self, count: usize) -> bool {
        debug_assert!(self.have_output);
        if !self.ensure(self.len + count) {
            return false;
        }

        self.max_ops -= (self.len - self.idx) as i32;
        if self.max_ops < 0 {
            self.successful = false;
            return false;
        }

        self.info
            .copy_within(self.idx..self.len, self.idx + count);

        if self.idx + count > self.len {
            // Under failure we might expose this area. At least clean it up.
            for info in &mut self.info[self.len..self.idx + count] {
                *info = GlyphInfo::default();
            }
        }

        self.len += count;
        self.idx += count;
        true
    }

    /// Stable insertion sort of `start..end`, merging the clusters of moved
    /// glyphs. `cmp(a, b)` returns true when `a` sorts after `b`.
    pub fn sort(&mut self, start: usize, end: usize, cmp: impl Fn(&GlyphInfo, &GlyphInfo) -> bool) {
        debug_assert!(!self.have_positions);

        for i in start + 1..end {
            let mut j = i;
            while j > start && cmp(&self.info[j - 1], &self.info[i]) {
                j -= 1;
            }

            if i == j {
                continue;
            }

            // Move item i to occupy place for item j, shift what's in between.
            self.merge_clusters(j, i + 1);

            let t = self.info[i];
            self.info.copy_within(j..i, j + 1);
            self.info[j] = t;
        }
    }

    // Called around shape()
    pub(crate) fn enter(&mut self) {
        self.deallocate_var_all();
        self.serial = 0;
        self.scratch_flags = HB_BUFFER_SCRATCH_FLAG_DEFAULT;

        if let Some(len) = self.len.checked_mul(HB_BUFFER_MAX_LEN_FACTOR) {
            self.max_len = len.max(HB_BUFFER_MAX_LEN_MIN);
        }

        if let Ok(len) = i32::try_from(self.len) {
            if let Some(ops) = len.checked_mul(HB_BUFFER_MAX_OPS_FACTOR) {
                self.max_ops = ops.max(HB_BUFFER_MAX_OPS_MIN);
            }
        }
    }

    // Called around shape()
    pub(crate) fn leave(&mut self) {
        self.max_len = HB_BUFFER_MAX_LEN_DEFAULT;
        self.max_ops = HB_BUFFER_MAX_OPS_DEFAULT;
        self.deallocate_var_all();
        self.serial = 0;
    }

    fn clear_context(&mut self, side: usize) {
        self.context_len[side] = 0;
    }

    fn push_str(&mut self, text: &str) {
        if !self.ensure(self.len + text.chars().count()) {
            return;
        }

        for (i, c) in text.char_indices() {
            self.add(c as u32, i as u32);
        }
    }

    fn push_utf16(&mut self, text: &[u16]) {
        if !self.ensure(self.len + text.len()) {
            return;
        }

        let mut cluster = 0;
        for c in char::decode_utf16(text.iter().copied()) {
            let (u, width) = match c {
                Ok(c) => (c as u32, c.len_utf16()),
                Err(_) => (self.replacement, 1),
            };
            self.add(u, cluster as u32);
            cluster += width;
        }
    }

    fn push_codepoints(&mut self, text: &[u32]) {
        if !self.ensure(self.len + text.len()) {
            return;
        }

        for (i, &u) in text.iter().enumerate() {
            let u = if char::from_u32(u).is_some() {
                u
            } else {
                self.replacement
            };
            self.add(u, i as u32);
        }
    }

    fn set_pre_context(&mut self, text: &str) {
        self.clear_context(0);
        for (i, c) in text.chars().rev().enumerate().take(CONTEXT_LENGTH) {
            self.context[0][i] = c as u32;
            self.context_len[0] += 1;
        }
    }

    fn set_post_context(&mut self, text: &str) {
        self.clear_context(1);
        for (i, c) in text.chars().enumerate().take(CONTEXT_LENGTH) {
            self.context[1][i] = c as u32;
            self.context_len[1] += 1;
        }
    }

    pub fn next_syllable(&self, mut start: usize) -> usize {
        if start >= self.len {
            return start;
        }

        let syllable = self.info[start].syllable();
        start += 1;
        while start < self.len && syllable == self.info[start].syllable() {
            start += 1;
        }

        start
    }
}

pub(crate) fn set_cluster(info: &mut GlyphInfo, cluster: u32, mask: hb_mask_t) {
    if info.cluster != cluster {
        info.mask = (info.mask & !glyph_flag::DEFINED) | (mask & glyph_flag::DEFINED);
    }

    info.cluster = cluster;
}

fn _infos_find_min_cluster(infos: &[GlyphInfo], cluster: u32) -> u32 {
    infos
        .iter()
        .fold(cluster, |cluster, info| min(cluster, info.cluster))
}

fn _infos_set_glyph_flags(
    infos: &mut [GlyphInfo],
    cluster: u32,
    mask: hb_mask_t,
    cluster_level: hb_buffer_cluster_level_t,
) {
    let (Some(first), Some(last)) = (infos.first(), infos.last()) else {
        return;
    };
    let cluster_first = first.cluster;
    let cluster_last = last.cluster;

    if cluster_level == HB_BUFFER_CLUSTER_LEVEL_CHARACTERS
        || (cluster != cluster_first && cluster != cluster_last)
    {
        for info in infos.iter_mut() {
            if info.cluster != cluster {
                info.mask |= mask;
            }
        }
        return;
    }

    // Monotone clusters
    if cluster == cluster_first {
        for info in infos.iter_mut().rev() {
            if info.cluster == cluster_first {
                break;
            }
            info.mask |= mask;
        }
    } else {
        for info in infos.iter_mut() {
            if info.cluster == cluster_last {
                break;
            }
            info.mask |= mask;
        }
    }
}

pub(crate) fn _cluster_group_func(a: &GlyphInfo, b: &GlyphInfo) -> bool {
    a.cluster == b.cluster
}

macro_rules! foreach_cluster {
    ($buffer:expr, $start:ident, $end:ident, $($body:tt)*) => {
        foreach_group!($buffer, $start, $end, crate::hb::buffer::_cluster_group_func, $($body)*)
    };
}

macro_rules! foreach_group {
    ($buffer:expr, $start:ident, $end:ident, $group_func:expr, $($body:tt)*) => {{
        let count = $buffer.len;
        let mut $start = 0;
        let mut $end = if count > 0 { $buffer.group_end(0, $group_func) } else { 0 };

        while $start < count {
            $($body)*;
            $start = $end;
            $end = $buffer.group_end($start, $group_func);
        }
    }};
}

macro_rules! foreach_syllable {
    ($buffer:expr, $start:ident, $end:ident, $($body:tt)*) => {{
        let mut $start = 0;
        let mut $end = $buffer.next_syllable(0);
        while $start < $buffer.len {
            $($body)*;
            $start = $end;
            $end = $buffer.next_syllable($start);
        }
    }};
}

macro_rules! foreach_grapheme {
    ($buffer:expr, $start:ident, $end:ident, $($body:tt)*) => {
        foreach_group!($buffer, $start, $end, crate::hb::ot_layout::_hb_grapheme_group_func, $($body)*)
    };
}

/// A buffer that contains an input string ready for shaping.
pub struct UnicodeBuffer(pub(crate) hb_buffer_t);

impl UnicodeBuffer {
    /// Create a new `UnicodeBuffer`.
    #[inline]
    pub fn new() -> UnicodeBuffer {
        UnicodeBuffer(hb_buffer_t::new())
    }

    /// Returns the number of code points in the buffer.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len
    }

    /// Returns `true` if the buffer contains no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Pushes a string to a buffer. Clusters are UTF-8 byte offsets.
    #[inline]
    pub fn push_str(&mut self, str: &str) {
        self.0.push_str(str);
    }

    /// Pushes UTF-16 text. Clusters are code unit offsets and unpaired
    /// surrogates become the replacement code point.
    #[inline]
    pub fn push_utf16(&mut self, text: &[u16]) {
        self.0.push_utf16(text);
    }

    /// Pushes raw code points. Clusters are indices and invalid values
    /// become the replacement code point.
    #[inline]
    pub fn push_codepoints(&mut self, text: &[u32]) {
        self.0.push_codepoints(text);
    }

    /// Sets the pre-context for this buffer.
    #[inline]
    pub fn set_pre_context(&mut self, str: &str) {
        self.0.set_pre_context(str)
    }

    /// Sets the post-context for this buffer.
    #[inline]
    pub fn set_post_context(&mut self, str: &str) {
        self.0.set_post_context(str)
    }

    /// Appends a character to a buffer with the given cluster value.
    #[inline]
    pub fn add(&mut self, codepoint: char, cluster: u32) {
        self.0.add(codepoint as u32, cluster);
        self.0.context_len[1] = 0;
    }

    /// Set the text direction of the buffer's contents.
    #[inline]
    pub fn set_direction(&mut self, direction: Direction) {
        self.0.direction = direction;
    }

    /// Returns the buffer's text direction.
    #[inline]
    pub fn direction(&self) -> Direction {
        self.0.direction
    }

    /// Set the script.
    #[inline]
    pub fn set_script(&mut self, script: Script) {
        self.0.script = Some(script);
    }

    /// Get the script, `Zzzz` when unset.
    #[inline]
    pub fn script(&self) -> Script {
        self.0.script.unwrap_or(script::UNKNOWN)
    }

    /// Set the buffer language.
    #[inline]
    pub fn set_language(&mut self, lang: Language) {
        self.0.language = Some(lang);
    }

    /// Get the buffer language.
    #[inline]
    pub fn language(&self) -> Option<Language> {
        self.0.language.clone()
    }

    /// Guess the segment properties (direction and script) for the buffer
    /// from its contents.
    #[inline]
    pub fn guess_segment_properties(&mut self) {
        self.0.guess_segment_properties()
    }

    /// Set the flags for this buffer.
    #[inline]
    pub fn set_flags(&mut self, flags: BufferFlags) {
        self.0.flags = flags;
    }

    /// Get the flags for this buffer.
    #[inline]
    pub fn flags(&self) -> BufferFlags {
        self.0.flags
    }

    /// Set the cluster level of the buffer.
    #[inline]
    pub fn set_cluster_level(&mut self, cluster_level: BufferClusterLevel) {
        self.0.cluster_level = cluster_level.to_hb();
    }

    /// Retrieve the cluster level of the buffer.
    #[inline]
    pub fn cluster_level(&self) -> BufferClusterLevel {
        BufferClusterLevel::from_hb(self.0.cluster_level)
    }

    /// Sets the glyph used for invisible characters. When unset, the space
    /// glyph is used.
    #[inline]
    pub fn set_invisible_glyph(&mut self, glyph: u32) {
        self.0.invisible = Some(glyph);
    }

    /// Sets the glyph used for characters the font cannot map.
    #[inline]
    pub fn set_not_found_glyph(&mut self, glyph: u32) {
        self.0.not_found = glyph;
    }

    /// Sets the code point substituted for invalid input.
    #[inline]
    pub fn set_replacement_codepoint(&mut self, codepoint: u32) {
        self.0.replacement = codepoint;
    }

    /// Resets clusters to code point indices.
    #[inline]
    pub fn reset_clusters(&mut self) {
        self.0.reset_clusters();
    }

    /// Clear the contents of the buffer.
    #[inline]
    pub fn clear(&mut self) {
        self.0.clear()
    }
}

impl core::fmt::Debug for UnicodeBuffer {
    fn fmt(&self, fmt: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        fmt.debug_struct("UnicodeBuffer")
            .field("direction", &self.direction())
            .field("language", &self.language())
            .field("script", &self.script())
            .field("cluster_level", &self.cluster_level())
            .finish()
    }
}

impl Default for UnicodeBuffer {
    fn default() -> UnicodeBuffer {
        UnicodeBuffer::new()
    }
}

/// A buffer that contains the results of the shaping process.
pub struct GlyphBuffer(pub(crate) hb_buffer_t);

impl GlyphBuffer {
    /// Returns the number of glyphs.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len
    }

    /// Returns `true` if the buffer contains no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the glyph infos.
    #[inline]
    pub fn glyph_infos(&self) -> &[GlyphInfo] {
        &self.0.info[0..self.0.len]
    }

    /// Get the glyph positions.
    #[inline]
    pub fn glyph_positions(&self) -> &[GlyphPosition] {
        &self.0.pos[0..self.0.len]
    }

    /// Clears the content of the glyph buffer and returns an empty
    /// `UnicodeBuffer` reusing the existing allocation.
    #[inline]
    pub fn clear(mut self) -> UnicodeBuffer {
        self.0.clear();
        UnicodeBuffer(self.0)
    }

    /// Converts the glyph buffer content into a string in HarfBuzz's text
    /// format, without the enclosing brackets.
    pub fn serialize(&self, font: &hb_font_t, flags: SerializeFlags) -> String {
        self.serialize_impl(font, flags).unwrap_or_default()
    }

    fn serialize_impl(
        &self,
        font: &hb_font_t,
        flags: SerializeFlags,
    ) -> Result<String, core::fmt::Error> {
        use core::fmt::Write;

        let mut s = String::with_capacity(64);

        let info = self.glyph_infos();
        let pos = self.glyph_positions();
        let mut x = 0;
        let mut y = 0;
        for (info, pos) in info.iter().zip(pos) {
            if !flags.contains(SerializeFlags::NO_GLYPH_NAMES) {
                match font.glyph_name(info.as_glyph()) {
                    Some(name) => s.push_str(&name),
                    None => write!(&mut s, "gid{}", info.glyph_id)?,
                }
            } else {
                write!(&mut s, "{}", info.glyph_id)?;
            }

            if !flags.contains(SerializeFlags::NO_CLUSTERS) {
                write!(&mut s, "={}", info.cluster)?;
            }

            if !flags.contains(SerializeFlags::NO_POSITIONS) {
                if x + pos.x_offset != 0 || y + pos.y_offset != 0 {
                    write!(&mut s, "@{},{}", x + pos.x_offset, y + pos.y_offset)?;
                }

                if !flags.contains(SerializeFlags::NO_ADVANCES) {
                    write!(&mut s, "+{}", pos.x_advance)?;
                    if pos.y_advance != 0 {
                        write!(&mut s, ",{}", pos.y_advance)?;
                    }
                }
            }

            if flags.contains(SerializeFlags::GLYPH_FLAGS)
                && info.mask & glyph_flag::DEFINED != 0
            {
                write!(&mut s, "#{:X}", info.mask & glyph_flag::DEFINED)?;
            }

            if flags.contains(SerializeFlags::GLYPH_EXTENTS) {
                let extents = font.glyph_extents(info.as_glyph()).unwrap_or_default();
                write!(
                    &mut s,
                    "<{},{},{},{}>",
                    extents.x_bearing, extents.y_bearing, extents.width, extents.height
                )?;
            }

            if flags.contains(SerializeFlags::NO_ADVANCES) {
                x += pos.x_advance;
                y += pos.y_advance;
            }

            s.push('|');
        }

        // Remove last `|`.
        s.pop();

        Ok(s)
    }
}

impl core::fmt::Debug for GlyphBuffer {
    fn fmt(&self, fmt: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        fmt.debug_struct("GlyphBuffer")
            .field("glyph_positions", &self.glyph_positions())
            .field("glyph_infos", &self.glyph_infos())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer_from(clusters: &[u32]) -> hb_buffer_t {
        let mut buffer = hb_buffer_t::new();
        for (i, &cluster) in clusters.iter().enumerate() {
            buffer.add(0x61 + i as u32, cluster);
        }
        buffer
    }

    fn clusters(buffer: &hb_buffer_t) -> Vec<u32> {
        buffer.info_slice().iter().map(|i| i.cluster).collect()
    }

    fn glyphs(buffer: &hb_buffer_t) -> Vec<u32> {
        buffer.info_slice().iter().map(|i| i.glyph_id).collect()
    }

    #[test]
    fn var_bits() {
        assert_eq!(buffer_var_bits(2, 1, 0), 0b0000_0011);
        assert_eq!(buffer_var_bits(1, 1, 2), 0b0000_0100);
        assert_eq!(buffer_var_bits(1, 1, 3), 0b0000_1000);
        assert_eq!(buffer_var_bits(2, 2, 0), 0b0011_0000);
        assert_eq!(buffer_var_bits(1, 2, 3), 0b1000_0000);
        assert_eq!(buffer_var_bits(4, 1, 0), 0b0000_1111);
    }

    #[test]
    fn attach_vars_share_one_word() {
        let mut pos = GlyphPosition::default();
        pos.set_attach_chain(-3);
        pos.set_attach_type(2);
        assert_eq!(pos.attach_chain(), -3);
        assert_eq!(pos.attach_type(), 2);
        pos.set_attach_chain(0);
        assert_eq!(pos.attach_type(), 2);
    }

    #[test]
    fn sync_swaps_arrays() {
        let mut buffer = buffer_from(&[0, 1, 2]);
        buffer.clear_output();
        buffer.next_glyph();
        // One glyph becomes three, which forces a separate output array.
        buffer.replace_glyphs(1, 3, &[10, 11, 12]);
        buffer.next_glyph();
        assert!(buffer.have_separate_output);
        assert!(buffer.sync());
        assert_eq!(glyphs(&buffer), [0x61, 10, 11, 12, 0x63]);
        assert_eq!(clusters(&buffer), [0, 1, 1, 1, 2]);
        assert!(!buffer.have_output);
    }

    #[test]
    fn output_glyph_inherits_cluster() {
        let mut buffer = buffer_from(&[0, 5]);
        buffer.clear_output();
        buffer.next_glyph();
        buffer.output_glyph(99);
        buffer.next_glyph();
        buffer.sync();
        assert_eq!(glyphs(&buffer), [0x61, 99, 0x62]);
        assert_eq!(clusters(&buffer), [0, 5, 5]);
    }

    #[test]
    fn merge_clusters_extends_to_neighbours() {
        let mut buffer = buffer_from(&[0, 1, 2, 2, 3]);
        buffer.merge_clusters(1, 3);
        assert_eq!(clusters(&buffer), [0, 1, 1, 1, 3]);
    }

    #[test]
    fn merge_clusters_at_characters_level_marks_instead() {
        let mut buffer = buffer_from(&[0, 1, 2]);
        buffer.cluster_level = HB_BUFFER_CLUSTER_LEVEL_CHARACTERS;
        buffer.merge_clusters(0, 3);
        assert_eq!(clusters(&buffer), [0, 1, 2]);
        let flags: Vec<bool> = buffer.info_slice().iter().map(|i| i.unsafe_to_break()).collect();
        assert_eq!(flags, [false, true, true]);
    }

    #[test]
    fn delete_glyph_merges_backward() {
        let mut buffer = buffer_from(&[0, 1, 2]);
        buffer.clear_output();
        buffer.next_glyph();
        buffer.next_glyph();
        buffer.delete_glyph();
        buffer.sync();
        assert_eq!(glyphs(&buffer), [0x61, 0x62]);
        assert_eq!(clusters(&buffer), [0, 1]);

        let mut buffer = buffer_from(&[0, 2, 1]);
        buffer.clear_output();
        buffer.next_glyph();
        buffer.next_glyph();
        buffer.delete_glyph();
        buffer.sync();
        assert_eq!(clusters(&buffer), [0, 1]);
    }

    #[test]
    fn delete_first_glyph_merges_forward() {
        let mut buffer = buffer_from(&[0, 1, 2]);
        buffer.clear_output();
        buffer.delete_glyph();
        buffer.sync();
        assert_eq!(glyphs(&buffer), [0x62, 0x63]);
        assert_eq!(clusters(&buffer), [0, 2]);
    }

    #[test]
    fn delete_inplace_keeps_positions_aligned() {
        let mut buffer = buffer_from(&[0, 1, 2, 3]);
        buffer.clear_positions();
        for (i, pos) in buffer.pos[..4].iter_mut().enumerate() {
            pos.x_advance = i as i32 * 10;
        }
        buffer.delete_glyphs_inplace(|info| info.glyph_id == 0x62);
        assert_eq!(buffer.len, 3);
        assert_eq!(glyphs(&buffer), [0x61, 0x63, 0x64]);
        assert_eq!(clusters(&buffer), [0, 2, 3]);
        let advances: Vec<i32> = buffer.pos[..3].iter().map(|p| p.x_advance).collect();
        assert_eq!(advances, [0, 20, 30]);
    }

    #[test]
    fn move_to_rewinds() {
        let mut buffer = buffer_from(&[0, 1, 2, 3]);
        buffer.clear_output();
        buffer.next_glyph();
        buffer.next_glyph();
        buffer.next_glyph();
        assert!(buffer.move_to(1));
        assert_eq!(buffer.out_len, 1);
        assert_eq!(buffer.cur(0).glyph_id, 0x62);
        assert!(buffer.move_to(3));
        assert_eq!(buffer.out_len, 3);
        assert_eq!(buffer.cur(0).glyph_id, 0x64);
        buffer.sync();
        assert_eq!(glyphs(&buffer), [0x61, 0x62, 0x63, 0x64]);
    }

    #[test]
    fn reverse_twice_is_identity() {
        let mut buffer = buffer_from(&[0, 1, 1, 2]);
        let before = glyphs(&buffer);
        buffer.reverse();
        assert_eq!(clusters(&buffer), [2, 1, 1, 0]);
        buffer.reverse();
        assert_eq!(glyphs(&buffer), before);
    }

    #[test]
    fn reverse_clusters_keeps_cluster_order() {
        let mut buffer = buffer_from(&[0, 1, 1, 2]);
        buffer.reverse_clusters();
        assert_eq!(glyphs(&buffer), [0x64, 0x62, 0x63, 0x61]);
    }

    #[test]
    fn sort_merges_moved_range() {
        let mut buffer = buffer_from(&[0, 1, 2]);
        buffer.info[0].glyph_id = 3;
        buffer.info[1].glyph_id = 1;
        buffer.info[2].glyph_id = 2;
        buffer.sort(0, 3, |a, b| a.glyph_id > b.glyph_id);
        assert_eq!(glyphs(&buffer), [1, 2, 3]);
        assert_eq!(clusters(&buffer), [0, 0, 0]);
    }

    #[test]
    fn unsafe_to_break_skips_min_cluster() {
        let mut buffer = buffer_from(&[0, 0, 1, 2]);
        buffer.unsafe_to_break(Some(0), Some(4));
        let flags: Vec<bool> = buffer.info_slice().iter().map(|i| i.unsafe_to_break()).collect();
        assert_eq!(flags, [false, false, true, true]);
        assert_ne!(buffer.scratch_flags & HB_BUFFER_SCRATCH_FLAG_HAS_GLYPH_FLAGS, 0);
    }

    #[test]
    fn unsafe_to_concat_needs_flag() {
        let mut buffer = buffer_from(&[0, 1]);
        buffer.unsafe_to_concat(Some(0), Some(2));
        assert!(!buffer.info[1].unsafe_to_concat());

        buffer.flags = BufferFlags::PRODUCE_UNSAFE_TO_CONCAT;
        buffer.unsafe_to_concat(Some(0), Some(2));
        assert!(buffer.info[0].unsafe_to_concat());
        assert!(buffer.info[1].unsafe_to_concat());
    }

    #[test]
    fn limits_scale_with_length() {
        let mut buffer = buffer_from(&[0; 10]);
        buffer.enter();
        assert_eq!(buffer.max_len, HB_BUFFER_MAX_LEN_MIN);
        assert_eq!(buffer.max_ops, HB_BUFFER_MAX_OPS_MIN);
        buffer.leave();
        assert_eq!(buffer.max_len, HB_BUFFER_MAX_LEN_DEFAULT);
    }

    #[test]
    fn exceeding_max_len_fails() {
        let mut buffer = hb_buffer_t::new();
        buffer.max_len = 4;
        for i in 0..6 {
            buffer.add(0x61, i);
        }
        assert!(!buffer.successful);
        assert_eq!(buffer.len, 4);
    }

    #[test]
    fn lig_ids_are_never_zero() {
        let mut buffer = hb_buffer_t::new();
        for _ in 0..64 {
            let id = buffer.allocate_lig_id();
            assert!((1..8).contains(&id));
        }
    }

    #[test]
    fn push_str_uses_byte_offsets() {
        let mut buffer = UnicodeBuffer::new();
        buffer.push_str("aé€");
        assert_eq!(clusters(&buffer.0), [0, 1, 3]);
    }

    #[test]
    fn push_utf16_replaces_lone_surrogates() {
        let mut buffer = UnicodeBuffer::new();
        buffer.push_utf16(&[0x61, 0xD800, 0xD83D, 0xDE00]);
        assert_eq!(glyphs(&buffer.0), [0x61, 0xFFFD, 0x1F600]);
        assert_eq!(clusters(&buffer.0), [0, 1, 2]);
    }

    #[test]
    fn context_is_ordered_outward() {
        let mut buffer = UnicodeBuffer::new();
        buffer.set_pre_context("abcdefg");
        buffer.set_post_context("xyz");
        assert_eq!(buffer.0.context_len, [5, 3]);
        assert_eq!(buffer.0.context[0][0], 'g' as u32);
        assert_eq!(buffer.0.context[1][0], 'x' as u32);
    }

    #[test]
    fn guess_segment_properties() {
        let mut buffer = UnicodeBuffer::new();
        buffer.push_str("123 שלום");
        buffer.guess_segment_properties();
        assert_eq!(buffer.script(), script::HEBREW);
        assert_eq!(buffer.direction(), Direction::RightToLeft);

        let mut buffer = UnicodeBuffer::new();
        buffer.push_str("123");
        buffer.guess_segment_properties();
        assert_eq!(buffer.script(), script::UNKNOWN);
        assert_eq!(buffer.direction(), Direction::LeftToRight);
    }
}
