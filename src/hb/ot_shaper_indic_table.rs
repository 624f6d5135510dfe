//! Character categories for the Indic shaper.
//!
//! Each row is an inclusive code point range with its syllable category and
//! its default position relative to the base consonant. Code points outside
//! every row are `OT_X` at `POS_END`.

use super::ot_shaper_indic::ot_category_t::*;
use super::ot_shaper_indic::ot_position_t::*;
use super::ot_shaper_indic::{Category, Position};

#[rustfmt::skip]
static INDIC_TABLE: &[(u32, u32, Category, Position)] = &[
    (0x00A0, 0x00A0, OT_PLACEHOLDER, POS_END),
    (0x00B2, 0x00B3, OT_SM, POS_END),
    (0x0900, 0x0902, OT_SM, POS_ABOVE_C),
    (0x0903, 0x0903, OT_SM, POS_POST_C),
    (0x0904, 0x0914, OT_V, POS_END),
    (0x0915, 0x092F, OT_C, POS_BASE_C),
    (0x0930, 0x0930, OT_Ra, POS_BASE_C),
    (0x0931, 0x0939, OT_C, POS_BASE_C),
    (0x093A, 0x093A, OT_M, POS_ABOVE_C),
    (0x093B, 0x093B, OT_M, POS_POST_C),
    (0x093C, 0x093C, OT_N, POS_BELOW_C),
    (0x093D, 0x093D, OT_Symbol, POS_END),
    (0x093E, 0x093E, OT_M, POS_POST_C),
    (0x093F, 0x093F, OT_M, POS_PRE_C),
    (0x0940, 0x0940, OT_M, POS_POST_C),
    (0x0941, 0x0944, OT_M, POS_BELOW_C),
    (0x0945, 0x0948, OT_M, POS_ABOVE_C),
    (0x0949, 0x094C, OT_M, POS_POST_C),
    (0x094D, 0x094D, OT_H, POS_BELOW_C),
    (0x094E, 0x094E, OT_M, POS_PRE_C),
    (0x094F, 0x094F, OT_M, POS_POST_C),
    (0x0951, 0x0951, OT_A, POS_ABOVE_C),
    (0x0952, 0x0952, OT_A, POS_BELOW_C),
    (0x0955, 0x0955, OT_M, POS_ABOVE_C),
    (0x0956, 0x0957, OT_M, POS_BELOW_C),
    (0x0958, 0x095F, OT_C, POS_BASE_C),
    (0x0960, 0x0961, OT_V, POS_END),
    (0x0962, 0x0963, OT_M, POS_BELOW_C),
    (0x0966, 0x096F, OT_PLACEHOLDER, POS_END),
    (0x0972, 0x0977, OT_V, POS_END),
    (0x0978, 0x097F, OT_C, POS_BASE_C),
    (0x0980, 0x0980, OT_PLACEHOLDER, POS_END),
    (0x0981, 0x0981, OT_SM, POS_ABOVE_C),
    (0x0982, 0x0983, OT_SM, POS_POST_C),
    (0x0985, 0x098C, OT_V, POS_END),
    (0x098F, 0x0990, OT_V, POS_END),
    (0x0993, 0x0994, OT_V, POS_END),
    (0x0995, 0x09A8, OT_C, POS_BASE_C),
    (0x09AA, 0x09AF, OT_C, POS_BASE_C),
    (0x09B0, 0x09B0, OT_Ra, POS_BASE_C),
    (0x09B2, 0x09B2, OT_C, POS_BASE_C),
    (0x09B6, 0x09B9, OT_C, POS_BASE_C),
    (0x09BC, 0x09BC, OT_N, POS_BELOW_C),
    (0x09BD, 0x09BD, OT_Symbol, POS_END),
    (0x09BE, 0x09BE, OT_M, POS_POST_C),
    (0x09BF, 0x09BF, OT_M, POS_PRE_C),
    (0x09C0, 0x09C0, OT_M, POS_POST_C),
    (0x09C1, 0x09C4, OT_M, POS_BELOW_C),
    (0x09C7, 0x09C8, OT_M, POS_PRE_C),
    (0x09CB, 0x09CC, OT_M, POS_POST_C),
    (0x09CD, 0x09CD, OT_H, POS_BELOW_C),
    (0x09CE, 0x09CE, OT_C, POS_BASE_C),
    (0x09D7, 0x09D7, OT_M, POS_POST_C),
    (0x09DC, 0x09DD, OT_C, POS_BASE_C),
    (0x09DF, 0x09DF, OT_C, POS_BASE_C),
    (0x09E0, 0x09E1, OT_V, POS_END),
    (0x09E2, 0x09E3, OT_M, POS_BELOW_C),
    (0x09E6, 0x09EF, OT_PLACEHOLDER, POS_END),
    (0x09F0, 0x09F0, OT_Ra, POS_BASE_C),
    (0x09F1, 0x09F1, OT_C, POS_BASE_C),
    (0x09F2, 0x09F3, OT_Symbol, POS_END),
    (0x09F4, 0x09F9, OT_PLACEHOLDER, POS_END),
    (0x09FA, 0x09FB, OT_Symbol, POS_END),
    (0x09FE, 0x09FE, OT_SM, POS_ABOVE_C),
    (0x0A01, 0x0A02, OT_SM, POS_ABOVE_C),
    (0x0A03, 0x0A03, OT_SM, POS_POST_C),
    (0x0A05, 0x0A0A, OT_V, POS_END),
    (0x0A0F, 0x0A10, OT_V, POS_END),
    (0x0A13, 0x0A14, OT_V, POS_END),
    (0x0A15, 0x0A28, OT_C, POS_BASE_C),
    (0x0A2A, 0x0A2F, OT_C, POS_BASE_C),
    (0x0A30, 0x0A30, OT_Ra, POS_BASE_C),
    (0x0A32, 0x0A33, OT_C, POS_BASE_C),
    (0x0A35, 0x0A36, OT_C, POS_BASE_C),
    (0x0A38, 0x0A39, OT_C, POS_BASE_C),
    (0x0A3C, 0x0A3C, OT_N, POS_BELOW_C),
    (0x0A3E, 0x0A3E, OT_M, POS_POST_C),
    (0x0A3F, 0x0A3F, OT_M, POS_PRE_C),
    (0x0A40, 0x0A40, OT_M, POS_POST_C),
    (0x0A41, 0x0A42, OT_M, POS_BELOW_C),
    (0x0A47, 0x0A48, OT_M, POS_ABOVE_C),
    (0x0A4B, 0x0A4C, OT_M, POS_ABOVE_C),
    (0x0A4D, 0x0A4D, OT_H, POS_BELOW_C),
    (0x0A51, 0x0A51, OT_A, POS_END),
    (0x0A59, 0x0A5C, OT_C, POS_BASE_C),
    (0x0A5E, 0x0A5E, OT_C, POS_BASE_C),
    (0x0A66, 0x0A6F, OT_PLACEHOLDER, POS_END),
    (0x0A70, 0x0A71, OT_SM, POS_ABOVE_C),
    (0x0A72, 0x0A73, OT_PLACEHOLDER, POS_END),
    (0x0A75, 0x0A75, OT_CM, POS_BELOW_C),
    (0x0A81, 0x0A82, OT_SM, POS_ABOVE_C),
    (0x0A83, 0x0A83, OT_SM, POS_POST_C),
    (0x0A85, 0x0A8D, OT_V, POS_END),
    (0x0A8F, 0x0A91, OT_V, POS_END),
    (0x0A93, 0x0A94, OT_V, POS_END),
    (0x0A95, 0x0AA8, OT_C, POS_BASE_C),
    (0x0AAA, 0x0AAF, OT_C, POS_BASE_C),
    (0x0AB0, 0x0AB0, OT_Ra, POS_BASE_C),
    (0x0AB2, 0x0AB3, OT_C, POS_BASE_C),
    (0x0AB5, 0x0AB9, OT_C, POS_BASE_C),
    (0x0ABC, 0x0ABC, OT_N, POS_BELOW_C),
    (0x0ABD, 0x0ABD, OT_Symbol, POS_END),
    (0x0ABE, 0x0ABE, OT_M, POS_POST_C),
    (0x0ABF, 0x0ABF, OT_M, POS_PRE_C),
    (0x0AC0, 0x0AC0, OT_M, POS_POST_C),
    (0x0AC1, 0x0AC4, OT_M, POS_BELOW_C),
    (0x0AC5, 0x0AC5, OT_M, POS_ABOVE_C),
    (0x0AC7, 0x0AC8, OT_M, POS_ABOVE_C),
    (0x0AC9, 0x0AC9, OT_M, POS_POST_C),
    (0x0ACB, 0x0ACC, OT_M, POS_POST_C),
    (0x0ACD, 0x0ACD, OT_H, POS_BELOW_C),
    (0x0AE0, 0x0AE1, OT_V, POS_END),
    (0x0AE2, 0x0AE3, OT_M, POS_BELOW_C),
    (0x0AE6, 0x0AEF, OT_PLACEHOLDER, POS_END),
    (0x0AF0, 0x0AF1, OT_Symbol, POS_END),
    (0x0AF9, 0x0AF9, OT_C, POS_BASE_C),
    (0x0AFA, 0x0AFC, OT_A, POS_ABOVE_C),
    (0x0AFD, 0x0AFF, OT_N, POS_ABOVE_C),
    (0x0B01, 0x0B01, OT_SM, POS_ABOVE_C),
    (0x0B02, 0x0B03, OT_SM, POS_POST_C),
    (0x0B05, 0x0B0C, OT_V, POS_END),
    (0x0B0F, 0x0B10, OT_V, POS_END),
    (0x0B13, 0x0B14, OT_V, POS_END),
    (0x0B15, 0x0B28, OT_C, POS_BASE_C),
    (0x0B2A, 0x0B2F, OT_C, POS_BASE_C),
    (0x0B30, 0x0B30, OT_Ra, POS_BASE_C),
    (0x0B32, 0x0B33, OT_C, POS_BASE_C),
    (0x0B35, 0x0B39, OT_C, POS_BASE_C),
    (0x0B3C, 0x0B3C, OT_N, POS_BELOW_C),
    (0x0B3D, 0x0B3D, OT_Symbol, POS_END),
    (0x0B3E, 0x0B3E, OT_M, POS_POST_C),
    (0x0B3F, 0x0B3F, OT_M, POS_ABOVE_C),
    (0x0B40, 0x0B40, OT_M, POS_POST_C),
    (0x0B41, 0x0B44, OT_M, POS_BELOW_C),
    (0x0B47, 0x0B47, OT_M, POS_PRE_C),
    (0x0B48, 0x0B48, OT_M, POS_ABOVE_C),
    (0x0B4B, 0x0B4C, OT_M, POS_POST_C),
    (0x0B4D, 0x0B4D, OT_H, POS_BELOW_C),
    (0x0B56, 0x0B56, OT_M, POS_ABOVE_C),
    (0x0B57, 0x0B57, OT_M, POS_POST_C),
    (0x0B5C, 0x0B5D, OT_C, POS_BASE_C),
    (0x0B5F, 0x0B5F, OT_C, POS_BASE_C),
    (0x0B60, 0x0B61, OT_V, POS_END),
    (0x0B62, 0x0B63, OT_M, POS_BELOW_C),
    (0x0B66, 0x0B6F, OT_PLACEHOLDER, POS_END),
    (0x0B70, 0x0B70, OT_Symbol, POS_END),
    (0x0B71, 0x0B71, OT_C, POS_BASE_C),
    (0x0B72, 0x0B77, OT_PLACEHOLDER, POS_END),
    (0x0B82, 0x0B82, OT_SM, POS_ABOVE_C),
    (0x0B83, 0x0B83, OT_X, POS_END),
    (0x0B85, 0x0B8A, OT_V, POS_END),
    (0x0B8E, 0x0B90, OT_V, POS_END),
    (0x0B92, 0x0B94, OT_V, POS_END),
    (0x0B95, 0x0B95, OT_C, POS_BASE_C),
    (0x0B99, 0x0B9A, OT_C, POS_BASE_C),
    (0x0B9C, 0x0B9C, OT_C, POS_BASE_C),
    (0x0B9E, 0x0B9F, OT_C, POS_BASE_C),
    (0x0BA3, 0x0BA4, OT_C, POS_BASE_C),
    (0x0BA8, 0x0BAA, OT_C, POS_BASE_C),
    (0x0BAE, 0x0BAF, OT_C, POS_BASE_C),
    (0x0BB0, 0x0BB0, OT_Ra, POS_BASE_C),
    (0x0BB1, 0x0BB9, OT_C, POS_BASE_C),
    (0x0BBE, 0x0BBF, OT_M, POS_POST_C),
    (0x0BC0, 0x0BC0, OT_M, POS_ABOVE_C),
    (0x0BC1, 0x0BC2, OT_M, POS_POST_C),
    (0x0BC6, 0x0BC8, OT_M, POS_PRE_C),
    (0x0BCA, 0x0BCC, OT_M, POS_POST_C),
    (0x0BCD, 0x0BCD, OT_H, POS_ABOVE_C),
    (0x0BD7, 0x0BD7, OT_M, POS_POST_C),
    (0x0BE6, 0x0BF2, OT_PLACEHOLDER, POS_END),
    (0x0BF3, 0x0BFA, OT_Symbol, POS_END),
    (0x0C00, 0x0C00, OT_SM, POS_ABOVE_C),
    (0x0C01, 0x0C03, OT_SM, POS_POST_C),
    (0x0C04, 0x0C04, OT_SM, POS_ABOVE_C),
    (0x0C05, 0x0C0C, OT_V, POS_END),
    (0x0C0E, 0x0C10, OT_V, POS_END),
    (0x0C12, 0x0C14, OT_V, POS_END),
    (0x0C15, 0x0C28, OT_C, POS_BASE_C),
    (0x0C2A, 0x0C2F, OT_C, POS_BASE_C),
    (0x0C30, 0x0C30, OT_Ra, POS_BASE_C),
    (0x0C31, 0x0C39, OT_C, POS_BASE_C),
    (0x0C3D, 0x0C3D, OT_Symbol, POS_END),
    (0x0C3E, 0x0C40, OT_M, POS_ABOVE_C),
    (0x0C41, 0x0C44, OT_M, POS_POST_C),
    (0x0C46, 0x0C47, OT_M, POS_ABOVE_C),
    (0x0C48, 0x0C48, OT_M, POS_BELOW_C),
    (0x0C4A, 0x0C4C, OT_M, POS_ABOVE_C),
    (0x0C4D, 0x0C4D, OT_H, POS_ABOVE_C),
    (0x0C55, 0x0C55, OT_M, POS_ABOVE_C),
    (0x0C56, 0x0C56, OT_M, POS_BELOW_C),
    (0x0C58, 0x0C5A, OT_C, POS_BASE_C),
    (0x0C60, 0x0C61, OT_V, POS_END),
    (0x0C62, 0x0C63, OT_M, POS_BELOW_C),
    (0x0C66, 0x0C6F, OT_PLACEHOLDER, POS_END),
    (0x0C78, 0x0C7E, OT_PLACEHOLDER, POS_END),
    (0x0C7F, 0x0C7F, OT_Symbol, POS_END),
    (0x0C81, 0x0C81, OT_SM, POS_ABOVE_C),
    (0x0C82, 0x0C83, OT_SM, POS_POST_C),
    (0x0C85, 0x0C8C, OT_V, POS_END),
    (0x0C8E, 0x0C90, OT_V, POS_END),
    (0x0C92, 0x0C94, OT_V, POS_END),
    (0x0C95, 0x0CA8, OT_C, POS_BASE_C),
    (0x0CAA, 0x0CAF, OT_C, POS_BASE_C),
    (0x0CB0, 0x0CB0, OT_Ra, POS_BASE_C),
    (0x0CB1, 0x0CB3, OT_C, POS_BASE_C),
    (0x0CB5, 0x0CB9, OT_C, POS_BASE_C),
    (0x0CBC, 0x0CBC, OT_N, POS_BELOW_C),
    (0x0CBD, 0x0CBD, OT_Symbol, POS_END),
    (0x0CBE, 0x0CBE, OT_M, POS_POST_C),
    (0x0CBF, 0x0CBF, OT_M, POS_ABOVE_C),
    (0x0CC0, 0x0CC4, OT_M, POS_POST_C),
    (0x0CC6, 0x0CC6, OT_M, POS_ABOVE_C),
    (0x0CC7, 0x0CC8, OT_M, POS_POST_C),
    (0x0CCA, 0x0CCB, OT_M, POS_POST_C),
    (0x0CCC, 0x0CCC, OT_M, POS_ABOVE_C),
    (0x0CCD, 0x0CCD, OT_H, POS_ABOVE_C),
    (0x0CD5, 0x0CD6, OT_M, POS_POST_C),
    (0x0CDE, 0x0CDE, OT_C, POS_BASE_C),
    (0x0CE0, 0x0CE1, OT_V, POS_END),
    (0x0CE2, 0x0CE3, OT_M, POS_BELOW_C),
    (0x0CE6, 0x0CEF, OT_PLACEHOLDER, POS_END),
    (0x0CF1, 0x0CF2, OT_CS, POS_BASE_C),
    (0x0D00, 0x0D01, OT_SM, POS_ABOVE_C),
    (0x0D02, 0x0D03, OT_SM, POS_POST_C),
    (0x0D05, 0x0D0C, OT_V, POS_END),
    (0x0D0E, 0x0D10, OT_V, POS_END),
    (0x0D12, 0x0D14, OT_V, POS_END),
    (0x0D15, 0x0D2F, OT_C, POS_BASE_C),
    (0x0D30, 0x0D30, OT_Ra, POS_BASE_C),
    (0x0D31, 0x0D3A, OT_C, POS_BASE_C),
    (0x0D3B, 0x0D3C, OT_M, POS_ABOVE_C),
    (0x0D3D, 0x0D3D, OT_Symbol, POS_END),
    (0x0D3E, 0x0D42, OT_M, POS_POST_C),
    (0x0D43, 0x0D44, OT_M, POS_BELOW_C),
    (0x0D46, 0x0D48, OT_M, POS_PRE_C),
    (0x0D4A, 0x0D4C, OT_M, POS_POST_C),
    (0x0D4D, 0x0D4D, OT_H, POS_ABOVE_C),
    (0x0D4E, 0x0D4E, OT_Repha, POS_END),
    (0x0D4F, 0x0D4F, OT_Symbol, POS_END),
    (0x0D54, 0x0D56, OT_C, POS_BASE_C),
    (0x0D57, 0x0D57, OT_M, POS_POST_C),
    (0x0D58, 0x0D5E, OT_PLACEHOLDER, POS_END),
    (0x0D5F, 0x0D61, OT_V, POS_END),
    (0x0D62, 0x0D63, OT_M, POS_BELOW_C),
    (0x0D66, 0x0D78, OT_PLACEHOLDER, POS_END),
    (0x0D79, 0x0D79, OT_Symbol, POS_END),
    (0x0D7A, 0x0D7F, OT_C, POS_BASE_C),
    (0x0D82, 0x0D83, OT_SM, POS_POST_C),
    (0x0D85, 0x0D96, OT_V, POS_END),
    (0x0D9A, 0x0DB1, OT_C, POS_BASE_C),
    (0x0DB3, 0x0DBA, OT_C, POS_BASE_C),
    (0x0DBB, 0x0DBB, OT_Ra, POS_BASE_C),
    (0x0DBD, 0x0DBD, OT_C, POS_BASE_C),
    (0x0DC0, 0x0DC6, OT_C, POS_BASE_C),
    (0x0DCA, 0x0DCA, OT_H, POS_ABOVE_C),
    (0x0DCF, 0x0DD1, OT_M, POS_POST_C),
    (0x0DD2, 0x0DD3, OT_M, POS_ABOVE_C),
    (0x0DD4, 0x0DD4, OT_M, POS_BELOW_C),
    (0x0DD6, 0x0DD6, OT_M, POS_BELOW_C),
    (0x0DD8, 0x0DD8, OT_M, POS_POST_C),
    (0x0DD9, 0x0DD9, OT_M, POS_PRE_C),
    (0x0DDA, 0x0DDA, OT_M, POS_ABOVE_C),
    (0x0DDB, 0x0DDB, OT_M, POS_PRE_C),
    (0x0DDC, 0x0DDF, OT_M, POS_POST_C),
    (0x0DE6, 0x0DEF, OT_PLACEHOLDER, POS_END),
    (0x0DF2, 0x0DF3, OT_M, POS_POST_C),
    (0x1CD0, 0x1CD2, OT_A, POS_ABOVE_C),
    (0x1CD4, 0x1CD4, OT_A, POS_AFTER_MAIN),
    (0x1CD5, 0x1CD9, OT_A, POS_BELOW_C),
    (0x1CDA, 0x1CDB, OT_A, POS_ABOVE_C),
    (0x1CDC, 0x1CDF, OT_A, POS_BELOW_C),
    (0x1CE0, 0x1CE0, OT_A, POS_ABOVE_C),
    (0x1CE1, 0x1CE1, OT_A, POS_POST_C),
    (0x1CE2, 0x1CE2, OT_Symbol, POS_AFTER_MAIN),
    (0x1CE8, 0x1CE8, OT_Symbol, POS_AFTER_MAIN),
    (0x1CE9, 0x1CE9, OT_Symbol, POS_END),
    (0x1CEC, 0x1CEC, OT_Symbol, POS_END),
    (0x1CED, 0x1CED, OT_Symbol, POS_BELOW_C),
    (0x1CEE, 0x1CEE, OT_Symbol, POS_END),
    (0x1CF1, 0x1CF1, OT_Symbol, POS_END),
    (0x1CF2, 0x1CF3, OT_SM, POS_END),
    (0x1CF4, 0x1CF4, OT_A, POS_ABOVE_C),
    (0x1CF5, 0x1CF6, OT_CS, POS_BASE_C),
    (0x1CF8, 0x1CF9, OT_A, POS_END),
    (0x200C, 0x200C, OT_ZWNJ, POS_END),
    (0x200D, 0x200D, OT_ZWJ, POS_END),
    (0x2010, 0x2014, OT_PLACEHOLDER, POS_END),
    (0x2074, 0x2074, OT_SM, POS_END),
    (0x2082, 0x2084, OT_SM, POS_END),
    (0x25CC, 0x25CC, OT_DOTTEDCIRCLE, POS_END),
    (0xA8E0, 0xA8F1, OT_A, POS_ABOVE_C),
    (0xA8F2, 0xA8F3, OT_SM, POS_END),
    (0xA8FE, 0xA8FE, OT_V, POS_END),
    (0xA8FF, 0xA8FF, OT_M, POS_ABOVE_C),
    (0x111E1, 0x111F4, OT_PLACEHOLDER, POS_END),
    (0x11301, 0x11301, OT_SM, POS_ABOVE_C),
    (0x11303, 0x11303, OT_SM, POS_POST_C),
    (0x1133B, 0x1133C, OT_N, POS_BELOW_C),
];

pub(crate) fn table_lookup(u: u32) -> (Category, Position) {
    INDIC_TABLE
        .binary_search_by(|&(first, last, _, _)| {
            if last < u {
                core::cmp::Ordering::Less
            } else if first > u {
                core::cmp::Ordering::Greater
            } else {
                core::cmp::Ordering::Equal
            }
        })
        .map_or((OT_X, POS_END), |i| (INDIC_TABLE[i].2, INDIC_TABLE[i].3))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_sorted_and_disjoint() {
        for pair in INDIC_TABLE.windows(2) {
            assert!(pair[0].0 <= pair[0].1);
            assert!(pair[0].1 < pair[1].0);
        }
    }

    #[test]
    fn devanagari() {
        assert_eq!(table_lookup(0x0915), (OT_C, POS_BASE_C));
        assert_eq!(table_lookup(0x0930), (OT_Ra, POS_BASE_C));
        assert_eq!(table_lookup(0x093F), (OT_M, POS_PRE_C));
        assert_eq!(table_lookup(0x094D), (OT_H, POS_BELOW_C));
        assert_eq!(table_lookup(0x0905), (OT_V, POS_END));
        assert_eq!(table_lookup(0x0041), (OT_X, POS_END));
    }
}
