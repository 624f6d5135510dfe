use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core_maths::CoreFloat;

use read_fonts::tables::cmap::{Cmap, Cmap14, CmapSubtable, MapVariant, PlatformId};
use read_fonts::tables::glyf::{Glyf, Glyph};
use read_fonts::tables::hmtx::Hmtx;
use read_fonts::tables::loca::Loca;
use read_fonts::tables::vmtx::Vmtx;
use read_fonts::tables::vorg::Vorg;
use read_fonts::types::{F2Dot14, GlyphId, GlyphId16, Tag};
use read_fonts::{FontRef, ReadError, TableProvider};

use super::common::{hb_codepoint_t, Variation};
use super::ot::{OtCache, OtTables};

// https://docs.microsoft.com/en-us/typography/opentype/spec/cmap#windows-platform-platform-id--3
const WINDOWS_SYMBOL_ENCODING: u16 = 0;
const WINDOWS_UNICODE_BMP_ENCODING: u16 = 1;
const WINDOWS_UNICODE_FULL_ENCODING: u16 = 10;

// https://docs.microsoft.com/en-us/typography/opentype/spec/name#platform-specific-encoding-and-language-ids-unicode-platform-platform-id--0
const UNICODE_1_0_ENCODING: u16 = 0;
const UNICODE_1_1_ENCODING: u16 = 1;
const UNICODE_ISO_ENCODING: u16 = 2;
const UNICODE_2_0_BMP_ENCODING: u16 = 3;
const UNICODE_2_0_FULL_ENCODING: u16 = 4;
const UNICODE_FULL_ENCODING: u16 = 6;

const OS2_USE_TYPO_METRICS: u16 = 1 << 7;

/// An error returned when a font cannot be opened.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FaceError {
    /// The data is not a font file or a font collection.
    #[error("malformed font data: {0}")]
    Malformed(String),
    /// The face index is out of range for a font collection.
    #[error("face index {0} is out of range")]
    IndexOutOfRange(u32),
}

impl From<ReadError> for FaceError {
    fn from(err: ReadError) -> Self {
        FaceError::Malformed(err.to_string())
    }
}

/// Glyph bounding box, in font output units.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct hb_glyph_extents_t {
    pub x_bearing: i32,
    pub y_bearing: i32,
    pub width: i32,
    pub height: i32,
}

#[derive(Clone, Copy, Default, Debug)]
pub(crate) struct hb_font_extents_t {
    pub ascender: i32,
    pub descender: i32,
    pub line_gap: i32,
}

#[derive(Clone)]
enum CodepointSubtable<'a> {
    Format0(read_fonts::tables::cmap::Cmap0<'a>),
    Format4(read_fonts::tables::cmap::Cmap4<'a>),
    Format6(read_fonts::tables::cmap::Cmap6<'a>),
    Format12(read_fonts::tables::cmap::Cmap12<'a>),
    Format13(read_fonts::tables::cmap::Cmap13<'a>),
}

impl CodepointSubtable<'_> {
    fn map(&self, cp: u32) -> Option<GlyphId> {
        let gid = match self {
            Self::Format0(t) => {
                let gid = *t.glyph_id_array().get(usize::try_from(cp).ok()?)?;
                GlyphId::new(u32::from(gid))
            }
            Self::Format4(t) => t.map_codepoint(cp)?,
            Self::Format6(t) => {
                let index = cp.checked_sub(u32::from(t.first_code()))?;
                GlyphId::new(u32::from(t.glyph_id_array().get(index as usize)?.get()))
            }
            Self::Format12(t) => t.map_codepoint(cp)?,
            Self::Format13(t) => {
                let groups = t.groups();
                let index = groups
                    .binary_search_by(|group| {
                        if group.end_char_code() < cp {
                            core::cmp::Ordering::Less
                        } else if group.start_char_code() > cp {
                            core::cmp::Ordering::Greater
                        } else {
                            core::cmp::Ordering::Equal
                        }
                    })
                    .ok()?;
                GlyphId::new(groups[index].glyph_id())
            }
        };
        (gid.to_u32() != 0).then_some(gid)
    }
}

/// The selected character mapping of a face.
#[derive(Clone, Default)]
struct Charmap<'a> {
    subtable: Option<CodepointSubtable<'a>>,
    variations: Option<Cmap14<'a>>,
    is_symbol: bool,
    is_mac_roman: bool,
}

impl<'a> Charmap<'a> {
    fn new(font: &FontRef<'a>) -> Self {
        let Ok(cmap) = font.cmap() else {
            return Self::default();
        };
        let mut charmap = Self::default();
        if let Some((platform, encoding, subtable)) = find_best_cmap_subtable(&cmap) {
            charmap.is_mac_roman = platform == PlatformId::Macintosh;
            charmap.is_symbol =
                platform == PlatformId::Windows && encoding == WINDOWS_SYMBOL_ENCODING;
            charmap.subtable = Some(subtable);
        }
        let data = cmap.offset_data();
        charmap.variations = cmap
            .encoding_records()
            .iter()
            .filter_map(|record| record.subtable(data).ok())
            .find_map(|subtable| match subtable {
                CmapSubtable::Format14(t) => Some(t),
                _ => None,
            });
        charmap
    }

    fn map(&self, cp: u32) -> Option<GlyphId> {
        let subtable = self.subtable.as_ref()?;
        if self.is_mac_roman {
            return subtable.map(unicode_to_mac_roman(cp)?);
        }
        subtable.map(cp).or_else(|| {
            // Symbol fonts duplicate U+F000..F0FF at U+0000..U+00FF.
            if self.is_symbol && cp <= 0x00FF {
                subtable.map(cp + 0xF000)
            } else {
                None
            }
        })
    }
}

fn find_best_cmap_subtable<'a>(cmap: &Cmap<'a>) -> Option<(PlatformId, u16, CodepointSubtable<'a>)> {
    const ORDER: &[(PlatformId, u16)] = &[
        // Prefer symbol if available.
        (PlatformId::Windows, WINDOWS_SYMBOL_ENCODING),
        (PlatformId::Windows, WINDOWS_UNICODE_FULL_ENCODING),
        (PlatformId::Unicode, UNICODE_FULL_ENCODING),
        (PlatformId::Unicode, UNICODE_2_0_FULL_ENCODING),
        (PlatformId::Windows, WINDOWS_UNICODE_BMP_ENCODING),
        (PlatformId::Unicode, UNICODE_2_0_BMP_ENCODING),
        (PlatformId::Unicode, UNICODE_ISO_ENCODING),
        (PlatformId::Unicode, UNICODE_1_1_ENCODING),
        (PlatformId::Unicode, UNICODE_1_0_ENCODING),
        (PlatformId::Macintosh, 0),
    ];
    ORDER.iter().find_map(|&(platform, encoding)| {
        find_cmap_subtable(cmap, platform, encoding).map(|t| (platform, encoding, t))
    })
}

fn find_cmap_subtable<'a>(
    cmap: &Cmap<'a>,
    platform_id: PlatformId,
    encoding_id: u16,
) -> Option<CodepointSubtable<'a>> {
    let offset_data = cmap.offset_data();
    cmap.encoding_records()
        .iter()
        .filter(|record| record.platform_id() == platform_id && record.encoding_id() == encoding_id)
        .filter_map(|record| record.subtable(offset_data).ok())
        .find_map(|subtable| match subtable {
            CmapSubtable::Format0(t) => Some(CodepointSubtable::Format0(t)),
            CmapSubtable::Format4(t) => Some(CodepointSubtable::Format4(t)),
            CmapSubtable::Format6(t) => Some(CodepointSubtable::Format6(t)),
            CmapSubtable::Format12(t) => Some(CodepointSubtable::Format12(t)),
            CmapSubtable::Format13(t) => Some(CodepointSubtable::Format13(t)),
            _ => None,
        })
}

/// Mac Roman code points 0x80..=0xFF.
const MAC_ROMAN_HIGH: [u16; 128] = [
    0x00C4, 0x00C5, 0x00C7, 0x00C9, 0x00D1, 0x00D6, 0x00DC, 0x00E1, 0x00E0, 0x00E2, 0x00E4,
    0x00E3, 0x00E5, 0x00E7, 0x00E9, 0x00E8, 0x00EA, 0x00EB, 0x00ED, 0x00EC, 0x00EE, 0x00EF,
    0x00F1, 0x00F3, 0x00F2, 0x00F4, 0x00F6, 0x00F5, 0x00FA, 0x00F9, 0x00FB, 0x00FC, 0x2020,
    0x00B0, 0x00A2, 0x00A3, 0x00A7, 0x2022, 0x00B6, 0x00DF, 0x00AE, 0x00A9, 0x2122, 0x00B4,
    0x00A8, 0x2260, 0x00C6, 0x00D8, 0x221E, 0x00B1, 0x2264, 0x2265, 0x00A5, 0x00B5, 0x2202,
    0x2211, 0x220F, 0x03C0, 0x222B, 0x00AA, 0x00BA, 0x03A9, 0x00E6, 0x00F8, 0x00BF, 0x00A1,
    0x00AC, 0x221A, 0x0192, 0x2248, 0x2206, 0x00AB, 0x00BB, 0x2026, 0x00A0, 0x00C0, 0x00C3,
    0x00D5, 0x0152, 0x0153, 0x2013, 0x2014, 0x201C, 0x201D, 0x2018, 0x2019, 0x00F7, 0x25CA,
    0x00FF, 0x0178, 0x2044, 0x20AC, 0x2039, 0x203A, 0xFB01, 0xFB02, 0x2021, 0x00B7, 0x201A,
    0x201E, 0x2030, 0x00C2, 0x00CA, 0x00C1, 0x00CB, 0x00C8, 0x00CD, 0x00CE, 0x00CF, 0x00CC,
    0x00D3, 0x00D4, 0xF8FF, 0x00D2, 0x00DA, 0x00DB, 0x00D9, 0x0131, 0x02C6, 0x02DC, 0x00AF,
    0x02D8, 0x02D9, 0x02DA, 0x00B8, 0x02DD, 0x02DB, 0x02C7,
];

fn unicode_to_mac_roman(cp: u32) -> Option<u32> {
    if cp < 0x80 {
        return Some(cp);
    }
    MAC_ROMAN_HIGH
        .iter()
        .position(|&u| u32::from(u) == cp)
        .map(|i| 0x80 + i as u32)
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct VariationAxis {
    pub tag: Tag,
    pub min_value: f32,
    pub default_value: f32,
    pub max_value: f32,
}

/// A font face: the immutable, shareable part of a font.
///
/// All lookups of the layout tables are parsed once, up front.
pub struct hb_face_t<'a> {
    pub(crate) font: FontRef<'a>,
    pub(crate) ot: OtCache<'a>,
    charmap: Charmap<'a>,
    metrics: MetricsTables<'a>,
    pub(crate) units_per_em: u16,
    pub(crate) num_glyphs: u32,
    pub(crate) axes: Vec<VariationAxis>,
}

/// Tables glyph metrics and outlines are read from. Any of them may be
/// missing.
#[derive(Default)]
struct MetricsTables<'a> {
    hmtx: Option<Hmtx<'a>>,
    vmtx: Option<Vmtx<'a>>,
    vorg: Option<Vorg<'a>>,
    loca: Option<Loca<'a>>,
    glyf: Option<Glyf<'a>>,
}

impl<'a> MetricsTables<'a> {
    fn new(font: &FontRef<'a>, loca_long: bool) -> Self {
        MetricsTables {
            hmtx: font.hmtx().ok(),
            vmtx: font.vmtx().ok(),
            vorg: font.vorg().ok(),
            loca: font.loca(loca_long).ok(),
            glyf: font.glyf().ok(),
        }
    }
}

impl<'a> hb_face_t<'a> {
    /// Opens the face at `index` of a font file or collection.
    pub fn from_slice(data: &'a [u8], index: u32) -> Result<Self, FaceError> {
        let font = match FontRef::from_index(data, index) {
            Ok(font) => font,
            Err(ReadError::InvalidCollectionIndex(_)) => {
                return Err(FaceError::IndexOutOfRange(index))
            }
            Err(err) => return Err(err.into()),
        };
        let head = font.head()?;
        let units_per_em = head.units_per_em();
        let loca_long = head.index_to_loc_format() == 1;
        let num_glyphs = font.maxp().map(|maxp| u32::from(maxp.num_glyphs()))?;
        let axes = font
            .fvar()
            .and_then(|fvar| fvar.axes())
            .map(|axes| {
                axes.iter()
                    .map(|axis| VariationAxis {
                        tag: axis.axis_tag(),
                        min_value: axis.min_value().to_f32(),
                        default_value: axis.default_value().to_f32(),
                        max_value: axis.max_value().to_f32(),
                    })
                    .collect()
            })
            .unwrap_or_default();
        let ot = OtCache::new(&font);
        let charmap = Charmap::new(&font);
        let metrics = MetricsTables::new(&font, loca_long);
        Ok(hb_face_t {
            font,
            ot,
            charmap,
            metrics,
            units_per_em: if units_per_em == 0 { 1000 } else { units_per_em },
            num_glyphs,
            axes,
        })
    }

    /// Returns the number of design units per em.
    pub fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    /// Returns the number of glyphs in the face.
    pub fn glyph_count(&self) -> u32 {
        self.num_glyphs
    }

    pub(crate) fn has_table(&self, tag: Tag) -> bool {
        self.font.table_data(tag).is_some()
    }

    /// Normalizes user-space axis values through `fvar` and `avar`.
    pub(crate) fn normalize_variations(&self, variations: &[Variation]) -> Vec<F2Dot14> {
        let mut coords = alloc::vec![F2Dot14::ZERO; self.axes.len()];
        for variation in variations {
            // Later values win; every axis with the same tag is set.
            for (i, axis) in self.axes.iter().enumerate() {
                if axis.tag == variation.tag {
                    coords[i] = F2Dot14::from_f32(normalize_axis_value(axis, variation.value));
                }
            }
        }
        if let Ok(avar) = self.font.avar() {
            for (i, coord) in coords.iter_mut().enumerate() {
                if let Some(Ok(map)) = avar.axis_segment_maps().get(i) {
                    *coord = map.apply(coord.to_fixed()).to_f2dot14();
                }
            }
        }
        coords
    }

    /// Returns the `glyf` outline of a glyph. The inner `None` is an empty
    /// glyph, the outer one a glyph that cannot be read.
    fn outline(&self, gid: GlyphId) -> Option<Option<Glyph<'a>>> {
        if gid.to_u32() >= self.num_glyphs {
            return None;
        }
        let loca = self.metrics.loca.as_ref()?;
        let glyf = self.metrics.glyf.as_ref()?;
        loca.get_glyf(gid, glyf).ok()
    }
}

impl core::fmt::Debug for hb_face_t<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Face")
            .field("units_per_em", &self.units_per_em)
            .field("num_glyphs", &self.num_glyphs)
            .finish()
    }
}

fn normalize_axis_value(axis: &VariationAxis, value: f32) -> f32 {
    let value = value.clamp(axis.min_value, axis.max_value);
    let normalized = if value < axis.default_value {
        -(axis.default_value - value) / (axis.default_value - axis.min_value)
    } else if value > axis.default_value {
        (value - axis.default_value) / (axis.max_value - axis.default_value)
    } else {
        0.0
    };
    normalized.clamp(-1.0, 1.0)
}

/// A font: a face with scale, size and variation settings applied.
pub struct hb_font_t<'a> {
    pub(crate) face: &'a hb_face_t<'a>,
    pub(crate) ot_tables: OtTables<'a>,
    x_scale: i32,
    y_scale: i32,
    pub(crate) x_ppem: u16,
    pub(crate) y_ppem: u16,
    ptem: f32,
}

impl<'a> hb_font_t<'a> {
    /// Creates a font at the default scale (units per em) and default
    /// variation instance.
    pub fn new(face: &'a hb_face_t<'a>) -> Self {
        let upem = i32::from(face.units_per_em);
        hb_font_t {
            face,
            ot_tables: OtTables::new(&face.ot, Vec::new()),
            x_scale: upem,
            y_scale: upem,
            x_ppem: 0,
            y_ppem: 0,
            ptem: 0.0,
        }
    }

    pub fn face(&self) -> &'a hb_face_t<'a> {
        self.face
    }

    pub fn set_scale(&mut self, x_scale: i32, y_scale: i32) {
        self.x_scale = x_scale;
        self.y_scale = y_scale;
    }

    pub fn scale(&self) -> (i32, i32) {
        (self.x_scale, self.y_scale)
    }

    pub fn set_ppem(&mut self, x_ppem: u16, y_ppem: u16) {
        self.x_ppem = x_ppem;
        self.y_ppem = y_ppem;
    }

    pub fn ppem(&self) -> (u16, u16) {
        (self.x_ppem, self.y_ppem)
    }

    pub fn set_ptem(&mut self, ptem: f32) {
        self.ptem = ptem;
    }

    pub fn ptem(&self) -> f32 {
        self.ptem
    }

    /// Sets variation axis values in user space.
    pub fn set_variations(&mut self, variations: &[Variation]) {
        let coords = self.face.normalize_variations(variations);
        self.set_normalized_coords(&coords);
    }

    /// Sets normalized variation coordinates, one per `fvar` axis.
    pub fn set_normalized_coords(&mut self, coords: &[F2Dot14]) {
        let coords = coords.iter().copied().take(self.face.axes.len()).collect();
        self.ot_tables = OtTables::new(&self.face.ot, coords);
    }

    pub fn normalized_coords(&self) -> &[F2Dot14] {
        &self.ot_tables.coords
    }

    #[inline]
    fn upem(&self) -> i64 {
        i64::from(self.face.units_per_em)
    }

    #[inline]
    pub(crate) fn em_scale_x(&self, v: i32) -> i32 {
        em_mult(v, self.x_scale, self.upem())
    }

    #[inline]
    pub(crate) fn em_scale_y(&self, v: i32) -> i32 {
        em_mult(v, self.y_scale, self.upem())
    }

    #[inline]
    pub(crate) fn em_scalef_x(&self, v: f32) -> i32 {
        (v * self.x_scale as f32 / self.upem() as f32).round() as i32
    }

    #[inline]
    pub(crate) fn em_scalef_y(&self, v: f32) -> i32 {
        (v * self.y_scale as f32 / self.upem() as f32).round() as i32
    }

    pub(crate) fn get_nominal_glyph(&self, c: hb_codepoint_t) -> Option<GlyphId> {
        self.face.charmap.map(c)
    }

    pub(crate) fn get_variation_glyph(
        &self,
        c: hb_codepoint_t,
        variation: hb_codepoint_t,
    ) -> Option<GlyphId> {
        match self.face.charmap.variations.as_ref()?.map_variant(c, variation)? {
            MapVariant::UseDefault => self.get_nominal_glyph(c),
            MapVariant::Variant(gid) => Some(gid),
        }
    }

    fn hmtx_advance(&self, gid: GlyphId) -> Option<i32> {
        if gid.to_u32() >= self.face.num_glyphs {
            return None;
        }
        self.face.metrics.hmtx.as_ref()?.advance(gid).map(i32::from)
    }

    /// Returns the unscaled horizontal advance, variations applied.
    pub(crate) fn glyph_h_advance_unscaled(&self, gid: GlyphId) -> i32 {
        let Some(mut advance) = self.hmtx_advance(gid) else {
            return i32::from(self.face.units_per_em) / 2;
        };
        if !self.ot_tables.coords.is_empty() {
            if let Ok(hvar) = self.face.font.hvar() {
                if let Ok(delta) = hvar.advance_width_delta(gid, &self.ot_tables.coords) {
                    advance += delta.to_f32().round() as i32;
                }
            }
        }
        advance
    }

    pub(crate) fn get_glyph_h_advance(&self, gid: GlyphId) -> i32 {
        self.em_scale_x(self.glyph_h_advance_unscaled(gid))
    }

    fn vmtx(&self, gid: GlyphId) -> Option<&Vmtx<'a>> {
        if gid.to_u32() >= self.face.num_glyphs {
            return None;
        }
        self.face.metrics.vmtx.as_ref()
    }

    /// Returns the vertical advance; negative, as y grows upwards.
    pub(crate) fn get_glyph_v_advance(&self, gid: GlyphId) -> i32 {
        let Some(mut advance) = self
            .vmtx(gid)
            .and_then(|vmtx| vmtx.advance(gid))
            .map(i32::from)
        else {
            let extents = self.h_extents();
            return -(extents.ascender - extents.descender);
        };
        if !self.ot_tables.coords.is_empty() {
            if let Ok(vvar) = self.face.font.vvar() {
                if let Ok(delta) = vvar.advance_height_delta(gid, &self.ot_tables.coords) {
                    advance += delta.to_f32().round() as i32;
                }
            }
        }
        -self.em_scale_y(advance)
    }

    /// Unscaled top side bearing, variations applied.
    fn vmtx_side_bearing(&self, gid: GlyphId) -> Option<i32> {
        let mut tsb = i32::from(self.vmtx(gid)?.side_bearing(gid)?);
        if !self.ot_tables.coords.is_empty() {
            if let Ok(vvar) = self.face.font.vvar() {
                if let Ok(delta) = vvar.tsb_delta(gid, &self.ot_tables.coords) {
                    tsb += delta.to_f32().round() as i32;
                }
            }
        }
        Some(tsb)
    }

    /// The vertical origin as the font defines it: from `VORG`, from the
    /// `glyf` bounding box plus the `vmtx` top side bearing, or at the
    /// ascender.
    fn font_v_origin(&self, gid: GlyphId) -> Option<(i32, i32)> {
        let x = self.get_glyph_h_advance(gid) / 2;

        if let Some(vorg) = &self.face.metrics.vorg {
            let mut y = i32::from(vorg.vertical_origin_y(gid));
            if !self.ot_tables.coords.is_empty() {
                if let Ok(vvar) = self.face.font.vvar() {
                    if let Ok(delta) = vvar.v_org_delta(gid, &self.ot_tables.coords) {
                        y += delta.to_f32().round() as i32;
                    }
                }
            }
            return Some((x, self.em_scale_y(y)));
        }

        if let (Some(tsb), Some(extents)) = (self.vmtx_side_bearing(gid), self.glyph_extents(gid)) {
            return Some((x, extents.y_bearing + self.em_scale_y(tsb)));
        }

        let (ascender, _, _) = self.font_h_metrics()?;
        Some((x, self.em_scale_y(ascender)))
    }

    /// The vertical origin minus the horizontal one.
    fn guess_v_origin_minus_h_origin(&self, gid: GlyphId) -> (i32, i32) {
        (self.get_glyph_h_advance(gid) / 2, self.h_extents().ascender)
    }

    /// Returns the horizontal origin of a glyph, in font scale.
    ///
    /// OpenType has no horizontal origin data, so it is derived from the
    /// vertical origin.
    pub fn glyph_h_origin(&self, gid: GlyphId) -> (i32, i32) {
        match self.font_v_origin(gid) {
            Some((x, y)) => {
                let (dx, dy) = self.guess_v_origin_minus_h_origin(gid);
                (x - dx, y - dy)
            }
            None => (0, 0),
        }
    }

    /// Returns the vertical origin of a glyph, in font scale.
    pub fn glyph_v_origin(&self, gid: GlyphId) -> (i32, i32) {
        self.font_v_origin(gid).unwrap_or_else(|| {
            // Derived from a horizontal origin at zero.
            self.guess_v_origin_minus_h_origin(gid)
        })
    }

    pub(crate) fn subtract_glyph_v_origin(&self, gid: GlyphId, pos: &mut super::buffer::GlyphPosition) {
        let (x, y) = self.glyph_v_origin(gid);
        pos.x_offset -= x;
        pos.y_offset -= y;
    }

    /// Unscaled ascender, descender and line gap from `OS/2` or `hhea`.
    fn font_h_metrics(&self) -> Option<(i32, i32, i32)> {
        let os2 = self.face.font.os2().ok();
        let use_typo = os2
            .as_ref()
            .is_some_and(|os2| os2.fs_selection().bits() & OS2_USE_TYPO_METRICS != 0);
        let typo = if use_typo {
            os2.as_ref().map(|os2| {
                (
                    i32::from(os2.s_typo_ascender()),
                    i32::from(os2.s_typo_descender()),
                    i32::from(os2.s_typo_line_gap()),
                )
            })
        } else {
            None
        };
        typo.or_else(|| {
            let hhea = self.face.font.hhea().ok()?;
            let metrics = (
                i32::from(hhea.ascender().to_i16()),
                i32::from(hhea.descender().to_i16()),
                i32::from(hhea.line_gap().to_i16()),
            );
            (metrics.0 != 0 || metrics.1 != 0).then_some(metrics)
        })
    }

    /// Horizontal font extents, with the ascender falling back to 0.8 em.
    pub(crate) fn h_extents(&self) -> hb_font_extents_t {
        match self.font_h_metrics() {
            Some((ascender, descender, line_gap)) => hb_font_extents_t {
                ascender: self.em_scale_y(ascender),
                descender: self.em_scale_y(descender),
                line_gap: self.em_scale_y(line_gap),
            },
            None => {
                let ascender = (self.y_scale as f32 * 0.8).round() as i32;
                hb_font_extents_t {
                    ascender,
                    descender: ascender - self.y_scale,
                    line_gap: 0,
                }
            }
        }
    }

    /// Returns the scaled bounding box of a `glyf` glyph.
    pub fn glyph_extents(&self, gid: GlyphId) -> Option<hb_glyph_extents_t> {
        let Some(glyph) = self.face.outline(gid)? else {
            return Some(hb_glyph_extents_t::default());
        };
        let x_bearing = self.em_scale_x(i32::from(glyph.x_min()));
        let y_bearing = self.em_scale_y(i32::from(glyph.y_max()));
        Some(hb_glyph_extents_t {
            x_bearing,
            y_bearing,
            width: self.em_scale_x(i32::from(glyph.x_max())) - x_bearing,
            height: self.em_scale_y(i32::from(glyph.y_min())) - y_bearing,
        })
    }

    /// Returns the scaled position of a point of a simple `glyf` outline.
    fn get_glyph_contour_point(&self, gid: GlyphId, point_index: u16) -> Option<(i32, i32)> {
        let Some(Glyph::Simple(glyph)) = self.face.outline(gid)? else {
            return None;
        };
        let point = glyph.points().nth(usize::from(point_index))?;
        Some((
            self.em_scale_x(i32::from(point.x)),
            self.em_scale_y(i32::from(point.y)),
        ))
    }

    /// Returns a contour point relative to the glyph's horizontal origin.
    pub(crate) fn get_glyph_contour_point_for_origin(
        &self,
        gid: GlyphId,
        point_index: u16,
    ) -> Option<(i32, i32)> {
        let (x, y) = self.get_glyph_contour_point(gid, point_index)?;
        let (origin_x, origin_y) = self.glyph_h_origin(gid);
        Some((x - origin_x, y - origin_y))
    }

    /// Returns the `post` name of a glyph.
    pub fn glyph_name(&self, gid: GlyphId) -> Option<String> {
        let gid = GlyphId16::try_from(gid).ok()?;
        let post = self.face.font.post().ok()?;
        post.glyph_name(gid).map(ToString::to_string)
    }
}

impl core::fmt::Debug for hb_font_t<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Font")
            .field("x_scale", &self.x_scale)
            .field("y_scale", &self.y_scale)
            .field("ppem", &(self.x_ppem, self.y_ppem))
            .field("coords", &self.ot_tables.coords)
            .finish()
    }
}

#[inline]
fn em_mult(v: i32, scale: i32, upem: i64) -> i32 {
    // Rounds half away from zero like the fixed-point path of the reference engine.
    let v = i64::from(v) * i64::from(scale);
    let rounded = if v >= 0 {
        (v + upem / 2) / upem
    } else {
        (v - upem / 2) / upem
    };
    rounded as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn em_mult_rounds_half_away_from_zero() {
        assert_eq!(em_mult(500, 1000, 1000), 500);
        assert_eq!(em_mult(1, 1500, 1000), 2);
        assert_eq!(em_mult(-1, 1500, 1000), -2);
        assert_eq!(em_mult(3, 100, 1000), 0);
    }

    #[test]
    fn axis_normalization() {
        let axis = VariationAxis {
            tag: Tag::new(b"wght"),
            min_value: 100.0,
            default_value: 400.0,
            max_value: 900.0,
        };
        assert_eq!(normalize_axis_value(&axis, 400.0), 0.0);
        assert_eq!(normalize_axis_value(&axis, 900.0), 1.0);
        assert_eq!(normalize_axis_value(&axis, 100.0), -1.0);
        assert_eq!(normalize_axis_value(&axis, 250.0), -0.5);
        assert_eq!(normalize_axis_value(&axis, 2000.0), 1.0);
    }

    #[test]
    fn mac_roman() {
        assert_eq!(unicode_to_mac_roman(0x41), Some(0x41));
        assert_eq!(unicode_to_mac_roman(0x00C4), Some(0x80));
        assert_eq!(unicode_to_mac_roman(0x02C7), Some(0xFF));
        assert_eq!(unicode_to_mac_roman(0x0416), None);
    }
}
