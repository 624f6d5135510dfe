use log::trace;

use super::buffer::hb_buffer_t;
use super::face::hb_font_t;
use super::ot_layout::*;
use super::ot_shape_plan::hb_ot_shape_plan_t;

pub fn substitute(plan: &hb_ot_shape_plan_t, font: &hb_font_t, buffer: &mut hb_buffer_t) {
    trace!(
        "start table GSUB script tag {:?}",
        plan.ot_map.chosen_script(TableIndex::GSUB)
    );
    apply_layout_table(plan, font, buffer, TableIndex::GSUB);
    trace!("end table GSUB");
}
