//! GPOS subtable application.

#[cfg(not(feature = "std"))]
#[allow(unused_imports)]
use core_maths::CoreFloat as _;

use crate::hb::buffer::GlyphPosition;
use crate::hb::face::hb_font_t;
use crate::hb::ot_layout_gsubgpos::OT::hb_ot_apply_context_t;
use read_fonts::tables::gpos::{AnchorTable, DeviceOrVariationIndex, ValueRecord};
use read_fonts::tables::layout::Device;
use read_fonts::types::GlyphId;
use read_fonts::{FontData, ReadError};

mod cursive;
mod mark;
mod pair;
mod single;

/// A value record along with the table data its device offsets are
/// relative to.
pub(crate) struct ValueResolver<'a> {
    record: ValueRecord,
    data: FontData<'a>,
}

impl<'a> ValueResolver<'a> {
    pub(crate) fn new(record: ValueRecord, data: FontData<'a>) -> Self {
        Self { record, data }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.record.format.is_empty()
    }

    /// Adds the value to the position of the glyph at `idx`.
    ///
    /// Returns whether any field was non-zero, so that callers know the
    /// pair is not safe to break.
    pub(crate) fn apply(&self, ctx: &mut hb_ot_apply_context_t, idx: usize) -> bool {
        let font = ctx.font;
        let horizontal = ctx.buffer.direction.is_horizontal();
        let mut pos = ctx.buffer.pos[idx];
        let worked = self.apply_to_pos(font, horizontal, &mut pos);
        ctx.buffer.pos[idx] = pos;
        worked
    }

    fn apply_to_pos(&self, font: &hb_font_t, horizontal: bool, pos: &mut GlyphPosition) -> bool {
        let record = &self.record;
        let mut worked = false;

        if let Some(value) = record.x_placement() {
            worked |= value != 0;
            pos.x_offset += font.em_scale_x(i32::from(value));
        }

        if let Some(value) = record.y_placement() {
            worked |= value != 0;
            pos.y_offset += font.em_scale_y(i32::from(value));
        }

        if let Some(value) = record.x_advance() {
            worked |= value != 0;
            if horizontal {
                pos.x_advance += font.em_scale_x(i32::from(value));
            }
        }

        // Font space grows upwards, y_advance downwards.
        if let Some(value) = record.y_advance() {
            worked |= value != 0;
            if !horizontal {
                pos.y_advance -= font.em_scale_y(i32::from(value));
            }
        }

        let use_x_device = font.x_ppem != 0 || font.ot_tables.has_nonzero_coords();
        let use_y_device = font.y_ppem != 0 || font.ot_tables.has_nonzero_coords();
        if !use_x_device && !use_y_device {
            return worked;
        }

        if let Some(device) = record.x_placement_device(self.data) {
            worked = true;
            if use_x_device {
                pos.x_offset += device_delta(font, device, false);
            }
        }

        if let Some(device) = record.y_placement_device(self.data) {
            worked = true;
            if use_y_device {
                pos.y_offset += device_delta(font, device, true);
            }
        }

        if let Some(device) = record.x_advance_device(self.data) {
            worked = true;
            if horizontal && use_x_device {
                pos.x_advance += device_delta(font, device, false);
            }
        }

        if let Some(device) = record.y_advance_device(self.data) {
            worked = true;
            if !horizontal && use_y_device {
                pos.y_advance -= device_delta(font, device, true);
            }
        }

        worked
    }
}

/// Scaled adjustment of a device or variation index table.
fn device_delta(
    font: &hb_font_t,
    device: Result<DeviceOrVariationIndex<'_>, ReadError>,
    vertical: bool,
) -> i32 {
    let (x_scale, y_scale) = font.scale();
    match device {
        Ok(DeviceOrVariationIndex::Device(device)) => {
            if vertical {
                hinting_delta(&device, font.y_ppem, y_scale)
            } else {
                hinting_delta(&device, font.x_ppem, x_scale)
            }
        }
        Ok(DeviceOrVariationIndex::VariationIndex(index)) => {
            let delta = font
                .ot_tables
                .variation_delta(index.delta_set_outer_index(), index.delta_set_inner_index());
            if vertical {
                font.em_scalef_y(delta)
            } else {
                font.em_scalef_x(delta)
            }
        }
        _ => 0,
    }
}

/// Pixel adjustment of a hinting device table, converted to font scale.
fn hinting_delta(device: &Device, ppem: u16, scale: i32) -> i32 {
    if ppem == 0 {
        return 0;
    }

    // 1, 2 or 3: 2, 4 or 8 bits per size.
    let format = device.offset_data().read_at::<u16>(4).unwrap_or(0);
    if !(1..=3).contains(&format) || ppem < device.start_size() || ppem > device.end_size() {
        return 0;
    }

    let s = ppem - device.start_size();
    let Some(word) = device.delta_value().get(usize::from(s >> (4 - format))) else {
        return 0;
    };
    let shift = 16 - (((s & ((1 << (4 - format)) - 1)) + 1) << format);
    let mask = 0xFFFFu32 >> (16 - (1 << format));
    let mut pixels = (u32::from(word.get()) >> shift & mask) as i32;
    if pixels >= ((mask + 1) >> 1) as i32 {
        pixels -= (mask + 1) as i32;
    }

    (i64::from(pixels) * i64::from(scale) / i64::from(ppem)) as i32
}

/// Position of an anchor point on a glyph, in font scale.
pub(crate) fn anchor_position(font: &hb_font_t, anchor: &AnchorTable, glyph: u32) -> (i32, i32) {
    let (x_scale, y_scale) = font.scale();
    let scale = |x: i16, y: i16| {
        (
            font.em_scalef_x(f32::from(x)),
            font.em_scalef_y(f32::from(y)),
        )
    };

    match anchor {
        AnchorTable::Format1(anchor) => scale(anchor.x_coordinate(), anchor.y_coordinate()),
        AnchorTable::Format2(anchor) => {
            let (mut x, mut y) = scale(anchor.x_coordinate(), anchor.y_coordinate());
            if font.x_ppem != 0 || font.y_ppem != 0 {
                if let Some((cx, cy)) = font
                    .get_glyph_contour_point_for_origin(GlyphId::new(glyph), anchor.anchor_point())
                {
                    if font.x_ppem != 0 {
                        x = cx;
                    }
                    if font.y_ppem != 0 {
                        y = cy;
                    }
                }
            }
            (x, y)
        }
        AnchorTable::Format3(anchor) => {
            let mut x = f32::from(anchor.x_coordinate());
            let mut y = f32::from(anchor.y_coordinate());
            let mut hinting = (0, 0);

            match anchor.x_device() {
                Some(Ok(DeviceOrVariationIndex::VariationIndex(index))) => {
                    x += font.ot_tables.variation_delta(
                        index.delta_set_outer_index(),
                        index.delta_set_inner_index(),
                    );
                }
                Some(Ok(DeviceOrVariationIndex::Device(device))) => {
                    hinting.0 = hinting_delta(&device, font.x_ppem, x_scale);
                }
                _ => {}
            }

            match anchor.y_device() {
                Some(Ok(DeviceOrVariationIndex::VariationIndex(index))) => {
                    y += font.ot_tables.variation_delta(
                        index.delta_set_outer_index(),
                        index.delta_set_inner_index(),
                    );
                }
                Some(Ok(DeviceOrVariationIndex::Device(device))) => {
                    hinting.1 = hinting_delta(&device, font.y_ppem, y_scale);
                }
                _ => {}
            }

            (
                font.em_scalef_x(x) + hinting.0,
                font.em_scalef_y(y) + hinting.1,
            )
        }
        #[allow(unreachable_patterns)]
        _ => (0, 0),
    }
}
