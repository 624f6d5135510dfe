use super::buffer::{GlyphBuffer, UnicodeBuffer};
use super::common::{Direction, Feature};
use super::face::hb_font_t;
use super::ot_shape::shape_internal;
use super::ot_shape_plan::hb_ot_shape_plan_t;

/// Shapes the buffer content using provided font and features.
///
/// Consumes the buffer. You can then run [`GlyphBuffer::clear`] to get the
/// [`UnicodeBuffer`] back without allocating a new one.
///
/// If you plan to shape multiple strings with the same properties, use
/// [`shape_with_plan`] to avoid compiling a new shaping plan every time.
pub fn shape(font: &hb_font_t, features: &[Feature], mut buffer: UnicodeBuffer) -> GlyphBuffer {
    buffer.guess_segment_properties();
    let plan = hb_ot_shape_plan_t::new(
        font,
        buffer.0.direction,
        buffer.0.script,
        buffer.0.language.as_ref(),
        features,
    );
    shape_with_plan(font, &plan, features, buffer)
}

/// Shapes the buffer content using the provided font and plan.
///
/// Consumes the buffer. You can then run [`GlyphBuffer::clear`] to get the
/// [`UnicodeBuffer`] back without allocating a new one.
///
/// Only features with a range restriction need to be passed again; global
/// features were compiled into the plan.
///
/// # Panics
///
/// Panics if the plan was built for a different direction, script or
/// language than the buffer carries.
pub fn shape_with_plan(
    font: &hb_font_t,
    plan: &hb_ot_shape_plan_t,
    features: &[Feature],
    mut buffer: UnicodeBuffer,
) -> GlyphBuffer {
    buffer.guess_segment_properties();

    assert_eq!(buffer.0.direction, plan.direction);
    assert_eq!(
        buffer.0.script.unwrap_or(super::common::script::UNKNOWN),
        plan.script.unwrap_or(super::common::script::UNKNOWN)
    );
    assert_eq!(buffer.0.language.as_ref(), plan.language.as_ref());

    if buffer.0.len > 0 && buffer.0.direction != Direction::Invalid {
        shape_internal(plan, font, &mut buffer.0, features);
    }

    GlyphBuffer(buffer.0)
}
