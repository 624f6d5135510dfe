/*!
An OpenType text shaping engine following the HarfBuzz shaping model.

Text goes in as a [`UnicodeBuffer`] of code points with direction, script
and language; it comes out as a [`GlyphBuffer`] of glyph ids, clusters and
positions.

```no_run
use ot_shaper::{Face, Font, UnicodeBuffer};

let data = std::fs::read("font.ttf").unwrap();
let face = Face::from_slice(&data, 0).unwrap();
let font = Font::new(&face);

let mut buffer = UnicodeBuffer::new();
buffer.push_str("Hello");
let glyphs = ot_shaper::shape(&font, &[], buffer);
println!("{}", glyphs.serialize(&font, Default::default()));
```
*/

#![no_std]
#![warn(missing_docs)]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

mod hb;

pub use read_fonts::types::{GlyphId, Tag};

pub use hb::buffer::{
    glyph_flag, BufferClusterLevel, BufferFlags, GlyphBuffer, GlyphFlags, GlyphInfo,
    GlyphPosition, SerializeFlags, UnicodeBuffer,
};
pub use hb::common::{script, Direction, Feature, Language, ParseError, Script, Variation};
pub use hb::face::{hb_face_t as Face, hb_font_t as Font, hb_glyph_extents_t as GlyphExtents};
pub use hb::face::FaceError;
pub use hb::ot_shape_plan::{hb_ot_shape_plan_t as ShapePlan, ShapePlanKey};
pub use hb::shape::{shape, shape_with_plan};
