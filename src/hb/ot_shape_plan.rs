use alloc::boxed::Box;
use core::any::Any;
use smallvec::SmallVec;

use super::common::{hb_mask_t, Direction, Feature, Language, Script};
use super::face::hb_font_t;
use super::ot_map::*;
use super::ot_shape::*;
use super::ot_shaper::*;

/// A reusable plan for shaping a text buffer.
pub struct hb_ot_shape_plan_t {
    pub(crate) direction: Direction,
    pub(crate) script: Option<Script>,
    pub(crate) language: Option<Language>,
    pub(crate) shaper: &'static hb_ot_shaper_t,
    pub(crate) ot_map: hb_ot_map_t,
    pub(crate) data: Option<Box<dyn Any + Send + Sync>>,

    pub(crate) frac_mask: hb_mask_t,
    pub(crate) numr_mask: hb_mask_t,
    pub(crate) dnom_mask: hb_mask_t,
    pub(crate) rtlm_mask: hb_mask_t,
    pub(crate) kern_mask: hb_mask_t,

    pub(crate) requested_kerning: bool,
    pub(crate) has_frac: bool,
    /// `frac` was turned on by the user, so ASCII slashes form fractions too.
    pub(crate) user_frac: bool,
    pub(crate) has_vert: bool,
    pub(crate) has_gpos_mark: bool,
    pub(crate) zero_marks: bool,
    pub(crate) fallback_glyph_classes: bool,
    pub(crate) fallback_mark_positioning: bool,
    pub(crate) adjust_mark_positioning_when_zeroing: bool,

    pub(crate) apply_gpos: bool,
    pub(crate) apply_fallback_kern: bool,
    pub(crate) apply_kern: bool,

    pub(crate) user_features: SmallVec<[Feature; 4]>,
}

impl hb_ot_shape_plan_t {
    /// Returns a plan that can be used for shaping any buffer with the
    /// provided properties.
    ///
    /// # Panics
    ///
    /// Panics when `direction` is [`Direction::Invalid`].
    pub fn new(
        font: &hb_font_t,
        direction: Direction,
        script: Option<Script>,
        language: Option<&Language>,
        user_features: &[Feature],
    ) -> Self {
        assert_ne!(
            direction,
            Direction::Invalid,
            "Direction must not be Invalid"
        );
        let mut planner = hb_ot_shape_planner_t::new(font, direction, script, language);
        planner.collect_features(user_features);
        planner.compile(user_features)
    }

    /// Shaper data built by `create_data`, if it has the requested type.
    pub(crate) fn data<T: 'static>(&self) -> Option<&T> {
        self.data.as_ref()?.downcast_ref()
    }

    /// The direction this plan was built for.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// The script this plan was built for.
    pub fn script(&self) -> Option<Script> {
        self.script
    }

    /// The language this plan was built for.
    pub fn language(&self) -> Option<&Language> {
        self.language.as_ref()
    }
}

/// A key used for selecting a cached shape plan.
pub struct ShapePlanKey<'a> {
    script: Option<Script>,
    direction: Direction,
    language: Option<&'a Language>,
    feature_variations: [Option<u32>; 2],
    features: &'a [Feature],
}

impl<'a> ShapePlanKey<'a> {
    /// Creates a new shape plan key with the given script and direction.
    pub fn new(script: Option<Script>, direction: Direction) -> Self {
        Self {
            script,
            direction,
            language: None,
            feature_variations: [None; 2],
            features: &[],
        }
    }

    /// Sets the language to use for this shape plan key.
    pub fn language(mut self, language: Option<&'a Language>) -> Self {
        self.language = language;
        self
    }

    /// Takes the feature variations selected by the font's coordinates.
    pub fn font(mut self, font: &hb_font_t) -> Self {
        self.feature_variations = font.ot_tables.feature_variations;
        self
    }

    /// Sets the features to use for this shape plan key.
    pub fn features(mut self, features: &'a [Feature]) -> Self {
        self.features = features;
        self
    }

    /// Returns true if this key is a match for the given shape plan.
    pub fn matches(&self, plan: &hb_ot_shape_plan_t) -> bool {
        self.script == plan.script
            && self.direction == plan.direction
            && self.language == plan.language.as_ref()
            && self.feature_variations == *plan.ot_map.feature_variations()
            && features_equivalent(self.features, &plan.user_features)
    }
}

// Ranges of non-global features only matter per buffer, so two feature
// lists are interchangeable when tags, values and globalness agree.
fn features_equivalent(features_a: &[Feature], features_b: &[Feature]) -> bool {
    features_a.len() == features_b.len()
        && features_a.iter().zip(features_b).all(|(a, b)| {
            a.tag == b.tag && a.value == b.value && a.is_global() == b.is_global()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use read_fonts::types::Tag;

    #[test]
    fn test_shape_plan_is_send_and_sync() {
        fn ensure_send_and_sync<T: Send + Sync>() {}
        ensure_send_and_sync::<hb_ot_shape_plan_t>();
    }

    #[test]
    fn feature_ranges_do_not_split_plans() {
        let kern = Tag::new(b"kern");
        let a = [Feature::new(kern, 0, 2..5)];
        let b = [Feature::new(kern, 0, 7..9)];
        let global = [Feature::new(kern, 0, ..)];
        assert!(features_equivalent(&a, &b));
        assert!(!features_equivalent(&a, &global));
        assert!(!features_equivalent(&a, &[]));
    }
}
