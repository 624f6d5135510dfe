//! Character categories for the Universal Shaping Engine.
//!
//! Rows are derived from the Unicode Indic syllabic and positional
//! categories of each USE script. The Indic block range reuses the Indic
//! table. Scripts without rows fall back to the general category.

use super::common::hb_codepoint_t;
use super::ot_shaper_indic::ot_category_t::*;
use super::ot_shaper_indic::ot_position_t::*;
use super::ot_shaper_indic_table::table_lookup;
use super::ot_shaper_use::category::*;
use super::unicode::{CharExt, GeneralCategory};

static USE_TABLE: &[(u32, u32, u8)] = &[
    // Tibetan
    (0x0F18, 0x0F19, VOWEL_MOD_BELOW),
    (0x0F20, 0x0F29, BASE),
    (0x0F35, 0x0F35, CONS_FINAL_MOD_BELOW),
    (0x0F37, 0x0F37, CONS_FINAL_MOD_BELOW),
    (0x0F39, 0x0F39, CONS_MOD_ABOVE),
    (0x0F3E, 0x0F3F, VOWEL_MOD_POST),
    (0x0F40, 0x0F47, BASE),
    (0x0F49, 0x0F6C, BASE),
    (0x0F71, 0x0F71, CONS_MOD_BELOW),
    (0x0F72, 0x0F73, VOWEL_ABOVE),
    (0x0F74, 0x0F79, VOWEL_BELOW),
    (0x0F7A, 0x0F7D, VOWEL_ABOVE),
    (0x0F7E, 0x0F7E, VOWEL_MOD_ABOVE),
    (0x0F7F, 0x0F7F, VOWEL_MOD_POST),
    (0x0F80, 0x0F81, VOWEL_ABOVE),
    (0x0F82, 0x0F83, VOWEL_MOD_ABOVE),
    (0x0F84, 0x0F84, HALANT),
    (0x0F86, 0x0F87, VOWEL_MOD_ABOVE),
    (0x0F8D, 0x0F97, CONS_SUB),
    (0x0F99, 0x0FBC, CONS_SUB),
    (0x0FC6, 0x0FC6, SYM_MOD_BELOW),
    // Tagalog
    (0x1700, 0x1711, BASE),
    (0x1712, 0x1712, VOWEL_ABOVE),
    (0x1713, 0x1713, VOWEL_BELOW),
    (0x1714, 0x1714, HALANT),
    (0x1715, 0x1715, VOWEL_POST),
    (0x171F, 0x171F, BASE),
    // Hanunoo
    (0x1720, 0x1731, BASE),
    (0x1732, 0x1732, VOWEL_ABOVE),
    (0x1733, 0x1733, VOWEL_BELOW),
    (0x1734, 0x1734, VOWEL_POST),
    // Buhid
    (0x1740, 0x1751, BASE),
    (0x1752, 0x1752, VOWEL_ABOVE),
    (0x1753, 0x1753, VOWEL_BELOW),
    // Tagbanwa
    (0x1760, 0x176C, BASE),
    (0x176E, 0x1770, BASE),
    (0x1772, 0x1772, VOWEL_ABOVE),
    (0x1773, 0x1773, VOWEL_BELOW),
    // Limbu
    (0x1900, 0x1900, BASE_OTHER),
    (0x1901, 0x191E, BASE),
    (0x1920, 0x1921, VOWEL_ABOVE),
    (0x1922, 0x1922, VOWEL_BELOW),
    (0x1923, 0x1926, VOWEL_POST),
    (0x1927, 0x1928, VOWEL_ABOVE),
    (0x1929, 0x192B, CONS_SUB),
    (0x1930, 0x1931, CONS_FINAL_POST),
    (0x1932, 0x1932, VOWEL_MOD_BELOW),
    (0x1933, 0x1935, CONS_FINAL_POST),
    (0x1936, 0x1936, CONS_FINAL_ABOVE),
    (0x1937, 0x1937, CONS_FINAL_POST),
    (0x1938, 0x1938, CONS_FINAL_BELOW),
    (0x1939, 0x1939, CONS_MOD_BELOW),
    (0x193A, 0x193A, CONS_MOD_ABOVE),
    (0x193B, 0x193B, CONS_FINAL_MOD_BELOW),
    (0x1946, 0x194F, BASE),
    // Buginese
    (0x1A00, 0x1A16, BASE),
    (0x1A17, 0x1A17, VOWEL_ABOVE),
    (0x1A18, 0x1A18, VOWEL_BELOW),
    (0x1A19, 0x1A19, VOWEL_PRE),
    (0x1A1A, 0x1A1A, VOWEL_POST),
    (0x1A1B, 0x1A1B, VOWEL_ABOVE),
    // Tai Tham
    (0x1A20, 0x1A54, BASE),
    (0x1A55, 0x1A55, CONS_MED_PRE),
    (0x1A56, 0x1A56, CONS_MED_BELOW),
    (0x1A57, 0x1A57, CONS_FINAL_POST),
    (0x1A58, 0x1A5A, CONS_FINAL_ABOVE),
    (0x1A5B, 0x1A5E, CONS_FINAL_BELOW),
    (0x1A60, 0x1A60, SAKOT),
    (0x1A61, 0x1A61, VOWEL_POST),
    (0x1A62, 0x1A62, VOWEL_ABOVE),
    (0x1A63, 0x1A64, VOWEL_POST),
    (0x1A65, 0x1A68, VOWEL_ABOVE),
    (0x1A69, 0x1A6A, VOWEL_BELOW),
    (0x1A6B, 0x1A6B, VOWEL_ABOVE),
    (0x1A6C, 0x1A6C, VOWEL_BELOW),
    (0x1A6D, 0x1A6D, VOWEL_POST),
    (0x1A6E, 0x1A72, VOWEL_PRE),
    (0x1A73, 0x1A73, VOWEL_ABOVE),
    (0x1A74, 0x1A79, VOWEL_MOD_ABOVE),
    (0x1A7A, 0x1A7A, VOWEL_ABOVE),
    (0x1A7B, 0x1A7C, VOWEL_MOD_ABOVE),
    (0x1A7F, 0x1A7F, VOWEL_MOD_BELOW),
    (0x1A80, 0x1A89, BASE),
    (0x1A90, 0x1A99, BASE),
    // Balinese
    (0x1B00, 0x1B02, VOWEL_MOD_ABOVE),
    (0x1B03, 0x1B03, CONS_FINAL_ABOVE),
    (0x1B04, 0x1B04, VOWEL_MOD_POST),
    (0x1B05, 0x1B33, BASE),
    (0x1B34, 0x1B34, CONS_MOD_ABOVE),
    (0x1B35, 0x1B35, VOWEL_POST),
    (0x1B36, 0x1B37, VOWEL_ABOVE),
    (0x1B38, 0x1B3A, VOWEL_BELOW),
    (0x1B3B, 0x1B3B, VOWEL_POST),
    (0x1B3C, 0x1B3C, VOWEL_BELOW),
    (0x1B3D, 0x1B3D, VOWEL_POST),
    (0x1B3E, 0x1B3F, VOWEL_PRE),
    (0x1B40, 0x1B41, VOWEL_POST),
    (0x1B42, 0x1B42, VOWEL_ABOVE),
    (0x1B43, 0x1B43, VOWEL_POST),
    (0x1B44, 0x1B44, HALANT),
    (0x1B45, 0x1B4C, BASE),
    (0x1B50, 0x1B59, BASE),
    (0x1B6B, 0x1B6B, SYM_MOD_ABOVE),
    (0x1B6C, 0x1B6C, SYM_MOD_BELOW),
    (0x1B6D, 0x1B73, SYM_MOD_ABOVE),
    // Sundanese
    (0x1B80, 0x1B80, VOWEL_MOD_ABOVE),
    (0x1B81, 0x1B81, CONS_FINAL_ABOVE),
    (0x1B82, 0x1B82, VOWEL_MOD_POST),
    (0x1B83, 0x1BA0, BASE),
    (0x1BA1, 0x1BA1, CONS_MED_POST),
    (0x1BA2, 0x1BA3, CONS_MED_BELOW),
    (0x1BA4, 0x1BA4, VOWEL_ABOVE),
    (0x1BA5, 0x1BA5, VOWEL_BELOW),
    (0x1BA6, 0x1BA6, VOWEL_PRE),
    (0x1BA7, 0x1BA7, VOWEL_POST),
    (0x1BA8, 0x1BA9, VOWEL_ABOVE),
    (0x1BAA, 0x1BAA, VOWEL_POST),
    (0x1BAB, 0x1BAB, HALANT),
    (0x1BAC, 0x1BAD, CONS_SUB),
    (0x1BAE, 0x1BBF, BASE),
    // Batak
    (0x1BC0, 0x1BE5, BASE),
    (0x1BE6, 0x1BE6, CONS_MOD_ABOVE),
    (0x1BE7, 0x1BE7, VOWEL_POST),
    (0x1BE8, 0x1BE9, VOWEL_ABOVE),
    (0x1BEA, 0x1BEC, VOWEL_POST),
    (0x1BED, 0x1BED, VOWEL_ABOVE),
    (0x1BEE, 0x1BEE, VOWEL_POST),
    (0x1BEF, 0x1BEF, VOWEL_ABOVE),
    (0x1BF0, 0x1BF1, CONS_FINAL_ABOVE),
    (0x1BF2, 0x1BF3, VOWEL_POST),
    // Lepcha
    (0x1C00, 0x1C23, BASE),
    (0x1C24, 0x1C25, CONS_MED_POST),
    (0x1C26, 0x1C26, VOWEL_POST),
    (0x1C27, 0x1C29, VOWEL_PRE),
    (0x1C2A, 0x1C2B, VOWEL_POST),
    (0x1C2C, 0x1C2C, VOWEL_BELOW),
    (0x1C2D, 0x1C33, CONS_FINAL_ABOVE),
    (0x1C34, 0x1C35, VOWEL_MOD_PRE),
    (0x1C36, 0x1C36, VOWEL_MOD_ABOVE),
    (0x1C37, 0x1C37, CONS_MOD_BELOW),
    (0x1C40, 0x1C49, BASE),
    (0x1C4D, 0x1C4F, BASE),
    // Syloti Nagri
    (0xA800, 0xA801, BASE),
    (0xA802, 0xA802, VOWEL_ABOVE),
    (0xA803, 0xA805, BASE),
    (0xA806, 0xA806, HALANT),
    (0xA807, 0xA80A, BASE),
    (0xA80B, 0xA80B, VOWEL_MOD_ABOVE),
    (0xA80C, 0xA822, BASE),
    (0xA823, 0xA824, VOWEL_POST),
    (0xA825, 0xA825, VOWEL_BELOW),
    (0xA826, 0xA826, VOWEL_ABOVE),
    (0xA827, 0xA827, VOWEL_POST),
    (0xA82C, 0xA82C, HALANT),
    // Saurashtra
    (0xA880, 0xA881, VOWEL_MOD_POST),
    (0xA882, 0xA8B3, BASE),
    (0xA8B4, 0xA8B4, CONS_MED_POST),
    (0xA8B5, 0xA8C3, VOWEL_POST),
    (0xA8C4, 0xA8C4, HALANT),
    (0xA8C5, 0xA8C5, VOWEL_MOD_ABOVE),
    (0xA8D0, 0xA8D9, BASE),
    // Kayah Li
    (0xA900, 0xA925, BASE),
    (0xA926, 0xA92A, VOWEL_ABOVE),
    (0xA92B, 0xA92D, VOWEL_MOD_BELOW),
    // Rejang
    (0xA930, 0xA946, BASE),
    (0xA947, 0xA949, VOWEL_BELOW),
    (0xA94A, 0xA94A, VOWEL_ABOVE),
    (0xA94B, 0xA94D, VOWEL_BELOW),
    (0xA94E, 0xA94E, VOWEL_ABOVE),
    (0xA94F, 0xA951, CONS_FINAL_ABOVE),
    (0xA952, 0xA952, CONS_FINAL_POST),
    (0xA953, 0xA953, VOWEL_POST),
    // Javanese
    (0xA980, 0xA981, VOWEL_MOD_ABOVE),
    (0xA982, 0xA982, CONS_FINAL_ABOVE),
    (0xA983, 0xA983, VOWEL_MOD_POST),
    (0xA984, 0xA9B2, BASE),
    (0xA9B3, 0xA9B3, CONS_MOD_ABOVE),
    (0xA9B4, 0xA9B5, VOWEL_POST),
    (0xA9B6, 0xA9B7, VOWEL_ABOVE),
    (0xA9B8, 0xA9B9, VOWEL_BELOW),
    (0xA9BA, 0xA9BB, VOWEL_PRE),
    (0xA9BC, 0xA9BC, VOWEL_ABOVE),
    (0xA9BD, 0xA9BD, VOWEL_BELOW),
    (0xA9BE, 0xA9BE, CONS_MED_POST),
    (0xA9BF, 0xA9BF, CONS_MED_BELOW),
    (0xA9C0, 0xA9C0, HALANT),
    (0xA9D0, 0xA9D9, BASE),
    // Cham
    (0xAA00, 0xAA28, BASE),
    (0xAA29, 0xAA2C, VOWEL_ABOVE),
    (0xAA2D, 0xAA2D, VOWEL_BELOW),
    (0xAA2E, 0xAA2E, VOWEL_ABOVE),
    (0xAA2F, 0xAA30, VOWEL_PRE),
    (0xAA31, 0xAA31, VOWEL_ABOVE),
    (0xAA32, 0xAA32, VOWEL_BELOW),
    (0xAA33, 0xAA33, CONS_MED_POST),
    (0xAA34, 0xAA34, CONS_MED_PRE),
    (0xAA35, 0xAA36, CONS_MED_BELOW),
    (0xAA40, 0xAA42, BASE),
    (0xAA43, 0xAA43, CONS_FINAL_ABOVE),
    (0xAA44, 0xAA4B, BASE),
    (0xAA4C, 0xAA4C, CONS_FINAL_ABOVE),
    (0xAA4D, 0xAA4D, CONS_FINAL_POST),
    (0xAA50, 0xAA59, BASE),
    // Tai Viet
    (0xAA80, 0xAAAF, BASE),
    (0xAAB0, 0xAAB0, VOWEL_ABOVE),
    (0xAAB1, 0xAAB1, BASE),
    (0xAAB2, 0xAAB3, VOWEL_ABOVE),
    (0xAAB4, 0xAAB4, VOWEL_BELOW),
    (0xAAB5, 0xAAB6, BASE),
    (0xAAB7, 0xAAB8, VOWEL_ABOVE),
    (0xAAB9, 0xAABD, BASE),
    (0xAABE, 0xAABE, VOWEL_ABOVE),
    (0xAABF, 0xAABF, VOWEL_MOD_ABOVE),
    (0xAAC0, 0xAAC0, BASE),
    (0xAAC1, 0xAAC1, VOWEL_MOD_ABOVE),
    (0xAAC2, 0xAAC2, BASE),
    (0xAADB, 0xAADC, BASE),
    // Meetei Mayek Extensions
    (0xAAE0, 0xAAEA, BASE),
    (0xAAEB, 0xAAEB, VOWEL_PRE),
    (0xAAEC, 0xAAEC, VOWEL_BELOW),
    (0xAAED, 0xAAED, VOWEL_ABOVE),
    (0xAAEE, 0xAAEF, VOWEL_PRE),
    (0xAAF5, 0xAAF5, VOWEL_MOD_POST),
    (0xAAF6, 0xAAF6, HALANT),
    // Meetei Mayek
    (0xABC0, 0xABE2, BASE),
    (0xABE3, 0xABE3, VOWEL_POST),
    (0xABE4, 0xABE5, VOWEL_ABOVE),
    (0xABE6, 0xABE7, VOWEL_POST),
    (0xABE8, 0xABE8, VOWEL_BELOW),
    (0xABE9, 0xABEA, VOWEL_POST),
    (0xABEC, 0xABEC, VOWEL_MOD_POST),
    (0xABED, 0xABED, HALANT),
    (0xABF0, 0xABF9, BASE),
    // Kharoshthi
    (0x10A00, 0x10A00, BASE),
    (0x10A01, 0x10A03, VOWEL_BELOW),
    (0x10A05, 0x10A05, VOWEL_ABOVE),
    (0x10A06, 0x10A06, VOWEL_BELOW),
    (0x10A0C, 0x10A0E, VOWEL_MOD_BELOW),
    (0x10A0F, 0x10A0F, VOWEL_MOD_POST),
    (0x10A10, 0x10A13, BASE),
    (0x10A15, 0x10A17, BASE),
    (0x10A19, 0x10A35, BASE),
    (0x10A38, 0x10A38, CONS_MOD_ABOVE),
    (0x10A39, 0x10A3A, CONS_MOD_BELOW),
    (0x10A3F, 0x10A3F, HALANT),
    (0x10A40, 0x10A48, BASE),
    // Brahmi
    (0x11000, 0x11000, VOWEL_MOD_POST),
    (0x11001, 0x11001, VOWEL_MOD_ABOVE),
    (0x11002, 0x11002, VOWEL_MOD_POST),
    (0x11003, 0x11004, CONS_WITH_STACKER),
    (0x11005, 0x11037, BASE),
    (0x11038, 0x1103B, VOWEL_ABOVE),
    (0x1103C, 0x11041, VOWEL_BELOW),
    (0x11042, 0x11045, VOWEL_ABOVE),
    (0x11046, 0x11046, HALANT),
    (0x11052, 0x11065, BASE_NUM),
    (0x11066, 0x1106F, BASE),
    (0x11070, 0x11070, HALANT),
    (0x11071, 0x11072, BASE),
    (0x11073, 0x11074, VOWEL_ABOVE),
    (0x11075, 0x11075, BASE),
    (0x1107F, 0x1107F, HALANT_NUM),
    // Kaithi
    (0x11080, 0x11081, VOWEL_MOD_ABOVE),
    (0x11082, 0x11082, VOWEL_MOD_POST),
    (0x11083, 0x110AF, BASE),
    (0x110B0, 0x110B0, VOWEL_POST),
    (0x110B1, 0x110B1, VOWEL_PRE),
    (0x110B2, 0x110B2, VOWEL_POST),
    (0x110B3, 0x110B4, VOWEL_BELOW),
    (0x110B5, 0x110B6, VOWEL_ABOVE),
    (0x110B7, 0x110B8, VOWEL_POST),
    (0x110B9, 0x110B9, HALANT),
    (0x110BA, 0x110BA, CONS_MOD_BELOW),
    (0x110C2, 0x110C2, VOWEL_BELOW),
    // Chakma
    (0x11100, 0x11102, VOWEL_MOD_ABOVE),
    (0x11103, 0x11126, BASE),
    (0x11127, 0x11129, VOWEL_ABOVE),
    (0x1112A, 0x1112B, VOWEL_BELOW),
    (0x1112C, 0x1112C, VOWEL_PRE),
    (0x1112D, 0x11130, VOWEL_ABOVE),
    (0x11131, 0x11132, VOWEL_BELOW),
    (0x11133, 0x11133, HALANT),
    (0x11134, 0x11134, VOWEL_ABOVE),
    (0x11136, 0x1113F, BASE),
    (0x11144, 0x11144, BASE),
    (0x11145, 0x11146, VOWEL_POST),
    (0x11147, 0x11147, BASE),
    // Mahajani
    (0x11150, 0x11172, BASE),
    (0x11173, 0x11173, CONS_MOD_BELOW),
    (0x11176, 0x11176, BASE),
    // Sharada
    (0x11180, 0x11181, VOWEL_MOD_ABOVE),
    (0x11182, 0x11182, VOWEL_MOD_POST),
    (0x11183, 0x111B2, BASE),
    (0x111B3, 0x111B3, VOWEL_POST),
    (0x111B4, 0x111B4, VOWEL_PRE),
    (0x111B5, 0x111B5, VOWEL_POST),
    (0x111B6, 0x111BB, VOWEL_BELOW),
    (0x111BC, 0x111BF, VOWEL_ABOVE),
    (0x111C0, 0x111C0, HALANT),
    (0x111C1, 0x111C1, BASE),
    (0x111C2, 0x111C3, REPHA),
    (0x111C9, 0x111C9, CONS_FINAL_MOD_BELOW),
    (0x111CA, 0x111CA, CONS_MOD_BELOW),
    (0x111CB, 0x111CC, VOWEL_ABOVE),
    (0x111CE, 0x111CE, VOWEL_PRE),
    (0x111CF, 0x111CF, VOWEL_MOD_ABOVE),
    (0x111D0, 0x111DA, BASE),
    (0x111DC, 0x111DC, BASE),
    // Khojki
    (0x11200, 0x11211, BASE),
    (0x11213, 0x1122B, BASE),
    (0x1122C, 0x1122E, VOWEL_POST),
    (0x1122F, 0x1122F, VOWEL_BELOW),
    (0x11230, 0x11231, VOWEL_ABOVE),
    (0x11232, 0x11233, VOWEL_POST),
    (0x11234, 0x11234, VOWEL_MOD_ABOVE),
    (0x11235, 0x11235, HALANT),
    (0x11236, 0x11236, CONS_MOD_ABOVE),
    (0x11237, 0x11237, VOWEL_MOD_ABOVE),
    (0x1123E, 0x1123E, VOWEL_MOD_ABOVE),
    (0x11241, 0x11241, VOWEL_BELOW),
    // Khudawadi
    (0x112B0, 0x112DE, BASE),
    (0x112DF, 0x112DF, VOWEL_MOD_ABOVE),
    (0x112E0, 0x112E0, VOWEL_POST),
    (0x112E1, 0x112E1, VOWEL_PRE),
    (0x112E2, 0x112E2, VOWEL_POST),
    (0x112E3, 0x112E4, VOWEL_BELOW),
    (0x112E5, 0x112E8, VOWEL_ABOVE),
    (0x112E9, 0x112E9, CONS_MOD_BELOW),
    (0x112EA, 0x112EA, HALANT),
    (0x112F0, 0x112F9, BASE),
    // Grantha
    (0x11300, 0x11301, VOWEL_MOD_ABOVE),
    (0x11302, 0x11303, VOWEL_MOD_POST),
    (0x11305, 0x1130C, BASE),
    (0x1130F, 0x11310, BASE),
    (0x11313, 0x11328, BASE),
    (0x1132A, 0x11330, BASE),
    (0x11332, 0x11333, BASE),
    (0x11335, 0x11339, BASE),
    (0x1133B, 0x1133C, CONS_MOD_BELOW),
    (0x1133D, 0x1133D, BASE),
    (0x1133E, 0x1133F, VOWEL_POST),
    (0x11340, 0x11340, VOWEL_ABOVE),
    (0x11341, 0x11344, VOWEL_POST),
    (0x11347, 0x11348, VOWEL_PRE),
    (0x1134B, 0x1134C, VOWEL_PRE),
    (0x1134D, 0x1134D, HALANT),
    (0x11350, 0x11350, BASE),
    (0x11357, 0x11357, VOWEL_POST),
    (0x1135D, 0x11361, BASE),
    (0x11362, 0x11363, VOWEL_BELOW),
    (0x11366, 0x1136C, VOWEL_MOD_ABOVE),
    (0x11370, 0x11374, VOWEL_MOD_ABOVE),
    // Newa
    (0x11400, 0x11434, BASE),
    (0x11435, 0x11435, VOWEL_POST),
    (0x11436, 0x11436, VOWEL_PRE),
    (0x11437, 0x11437, VOWEL_POST),
    (0x11438, 0x1143D, VOWEL_BELOW),
    (0x1143E, 0x1143F, VOWEL_ABOVE),
    (0x11440, 0x11441, VOWEL_POST),
    (0x11442, 0x11442, HALANT),
    (0x11443, 0x11444, VOWEL_MOD_ABOVE),
    (0x11445, 0x11445, VOWEL_MOD_POST),
    (0x11446, 0x11446, CONS_MOD_BELOW),
    (0x11447, 0x11447, BASE),
    (0x11450, 0x11459, BASE),
    (0x1145E, 0x1145E, CONS_FINAL_MOD_ABOVE),
    (0x1145F, 0x11461, BASE),
    // Tirhuta
    (0x11480, 0x114AF, BASE),
    (0x114B0, 0x114B0, VOWEL_POST),
    (0x114B1, 0x114B1, VOWEL_PRE),
    (0x114B2, 0x114B2, VOWEL_POST),
    (0x114B3, 0x114B8, VOWEL_BELOW),
    (0x114B9, 0x114B9, VOWEL_PRE),
    (0x114BA, 0x114BA, VOWEL_ABOVE),
    (0x114BB, 0x114BC, VOWEL_PRE),
    (0x114BD, 0x114BD, VOWEL_POST),
    (0x114BE, 0x114BE, VOWEL_PRE),
    (0x114BF, 0x114C0, VOWEL_MOD_ABOVE),
    (0x114C1, 0x114C1, VOWEL_MOD_POST),
    (0x114C2, 0x114C2, HALANT),
    (0x114C3, 0x114C3, CONS_MOD_BELOW),
    (0x114C4, 0x114C5, BASE),
    (0x114C7, 0x114C7, BASE),
    (0x114D0, 0x114D9, BASE),
    // Siddham
    (0x11580, 0x115AE, BASE),
    (0x115AF, 0x115AF, VOWEL_POST),
    (0x115B0, 0x115B0, VOWEL_PRE),
    (0x115B1, 0x115B1, VOWEL_POST),
    (0x115B2, 0x115B5, VOWEL_BELOW),
    (0x115B8, 0x115BB, VOWEL_ABOVE),
    (0x115BC, 0x115BD, VOWEL_MOD_ABOVE),
    (0x115BE, 0x115BE, VOWEL_MOD_POST),
    (0x115BF, 0x115BF, HALANT),
    (0x115C0, 0x115C0, CONS_MOD_BELOW),
    (0x115D8, 0x115DB, BASE),
    (0x115DC, 0x115DD, VOWEL_BELOW),
    // Modi
    (0x11600, 0x1162F, BASE),
    (0x11630, 0x11632, VOWEL_POST),
    (0x11633, 0x11638, VOWEL_BELOW),
    (0x11639, 0x1163A, VOWEL_ABOVE),
    (0x1163B, 0x1163C, VOWEL_POST),
    (0x1163D, 0x1163D, VOWEL_MOD_ABOVE),
    (0x1163E, 0x1163E, VOWEL_MOD_POST),
    (0x1163F, 0x1163F, HALANT),
    (0x11640, 0x11640, VOWEL_MOD_ABOVE),
    (0x11644, 0x11644, BASE),
    (0x11650, 0x11659, BASE),
    // Takri
    (0x11680, 0x116AA, BASE),
    (0x116AB, 0x116AB, VOWEL_MOD_ABOVE),
    (0x116AC, 0x116AC, VOWEL_MOD_POST),
    (0x116AD, 0x116AD, VOWEL_ABOVE),
    (0x116AE, 0x116AE, VOWEL_PRE),
    (0x116AF, 0x116AF, VOWEL_POST),
    (0x116B0, 0x116B1, VOWEL_BELOW),
    (0x116B2, 0x116B5, VOWEL_ABOVE),
    (0x116B6, 0x116B6, HALANT),
    (0x116B7, 0x116B7, CONS_MOD_BELOW),
    (0x116B8, 0x116B8, BASE),
    (0x116C0, 0x116C9, BASE),
    // Ahom
    (0x11700, 0x1171A, BASE),
    (0x1171D, 0x1171D, CONS_MED_BELOW),
    (0x1171E, 0x1171E, CONS_MED_PRE),
    (0x1171F, 0x1171F, CONS_MED_ABOVE),
    (0x11720, 0x11721, VOWEL_POST),
    (0x11722, 0x11723, VOWEL_ABOVE),
    (0x11724, 0x11725, VOWEL_BELOW),
    (0x11726, 0x11726, VOWEL_PRE),
    (0x11727, 0x11727, VOWEL_ABOVE),
    (0x11728, 0x11728, VOWEL_BELOW),
    (0x11729, 0x1172A, VOWEL_ABOVE),
    (0x1172B, 0x1172B, VOWEL_ABOVE),
    (0x11730, 0x1173B, BASE),
    (0x11740, 0x11746, BASE),
    // Dogra
    (0x11800, 0x1182B, BASE),
    (0x1182C, 0x1182C, VOWEL_POST),
    (0x1182D, 0x1182D, VOWEL_PRE),
    (0x1182E, 0x1182E, VOWEL_POST),
    (0x1182F, 0x11832, VOWEL_BELOW),
    (0x11833, 0x11836, VOWEL_ABOVE),
    (0x11837, 0x11837, VOWEL_MOD_ABOVE),
    (0x11838, 0x11838, VOWEL_MOD_POST),
    (0x11839, 0x11839, HALANT),
    (0x1183A, 0x1183A, CONS_MOD_BELOW),
    // Bhaiksuki
    (0x11C00, 0x11C08, BASE),
    (0x11C0A, 0x11C2E, BASE),
    (0x11C2F, 0x11C2F, VOWEL_POST),
    (0x11C30, 0x11C31, VOWEL_ABOVE),
    (0x11C32, 0x11C36, VOWEL_BELOW),
    (0x11C38, 0x11C3B, VOWEL_ABOVE),
    (0x11C3C, 0x11C3D, VOWEL_MOD_ABOVE),
    (0x11C3E, 0x11C3E, VOWEL_MOD_POST),
    (0x11C3F, 0x11C3F, HALANT),
    (0x11C40, 0x11C40, BASE),
    (0x11C50, 0x11C6C, BASE),
];

fn from_indic(u: hb_codepoint_t) -> Option<u8> {
    let (category, position) = table_lookup(u);
    let category = match category {
        OT_C | OT_Ra | OT_V => BASE,
        OT_N if position == POS_ABOVE_C => CONS_MOD_ABOVE,
        OT_N => CONS_MOD_BELOW,
        OT_H => HALANT,
        OT_ZWNJ => ZWNJ,
        OT_M => match position {
            POS_PRE_C => VOWEL_PRE,
            POS_BELOW_C => VOWEL_BELOW,
            POS_POST_C => VOWEL_POST,
            _ => VOWEL_ABOVE,
        },
        OT_SM => match position {
            POS_BELOW_C => VOWEL_MOD_BELOW,
            POS_POST_C => VOWEL_MOD_POST,
            _ => VOWEL_MOD_ABOVE,
        },
        OT_A | OT_RS => VOWEL_MOD_ABOVE,
        OT_PLACEHOLDER | OT_DOTTEDCIRCLE => BASE_OTHER,
        OT_Repha => REPHA,
        OT_CS => CONS_WITH_STACKER,
        OT_CM => CONS_MED_BELOW,
        _ => return None,
    };
    Some(category)
}

fn from_general_category(u: hb_codepoint_t) -> u8 {
    match u.general_category() {
        GeneralCategory::OTHER_LETTER
        | GeneralCategory::LOWERCASE_LETTER
        | GeneralCategory::UPPERCASE_LETTER
        | GeneralCategory::TITLECASE_LETTER
        | GeneralCategory::DECIMAL_NUMBER => BASE,
        GeneralCategory::NON_SPACING_MARK | GeneralCategory::ENCLOSING_MARK => VOWEL_MOD_ABOVE,
        GeneralCategory::SPACING_MARK => VOWEL_MOD_POST,
        _ => OTHER,
    }
}

pub(crate) fn get_category(u: hb_codepoint_t) -> u8 {
    match u {
        0x00A0 | 0x25CC => return BASE_OTHER,
        0x200C => return ZWNJ,
        0x034F | 0x200D | 0x2060 | 0xFE00..=0xFE0F => return OTHER,
        0x0900..=0x0DFF => {
            if let Some(category) = from_indic(u) {
                return category;
            }
        }
        _ => {}
    }

    let row = USE_TABLE.binary_search_by(|&(first, last, _)| {
        if last < u {
            core::cmp::Ordering::Less
        } else if first > u {
            core::cmp::Ordering::Greater
        } else {
            core::cmp::Ordering::Equal
        }
    });

    match row {
        Ok(i) => USE_TABLE[i].2,
        Err(_) => from_general_category(u),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_sorted_and_disjoint() {
        for pair in USE_TABLE.windows(2) {
            assert!(pair[0].0 <= pair[0].1);
            assert!(pair[0].1 < pair[1].0);
        }
    }

    #[test]
    fn categories() {
        assert_eq!(get_category(0x0F40), BASE);
        assert_eq!(get_category(0x0F90), CONS_SUB);
        assert_eq!(get_category(0x0F84), HALANT);
        assert_eq!(get_category(0x1B3E), VOWEL_PRE);
        assert_eq!(get_category(0x0915), BASE);
        assert_eq!(get_category(0x093F), VOWEL_PRE);
        assert_eq!(get_category(0x094D), HALANT);
        assert_eq!(get_category(0x25CC), BASE_OTHER);
        assert_eq!(get_category(0x200C), ZWNJ);
    }

    #[test]
    fn pre_base_vowels() {
        // Buginese E
        assert_eq!(get_category(0x1A19), VOWEL_PRE);
        // Tai Tham E
        assert_eq!(get_category(0x1A6E), VOWEL_PRE);
        assert_eq!(get_category(0xA9BA), VOWEL_PRE);
    }

    #[test]
    fn viramas() {
        // Chakma
        assert_eq!(get_category(0x11133), HALANT);
        // Sharada
        assert_eq!(get_category(0x111C0), HALANT);
        assert_eq!(get_category(0x11046), HALANT);
        assert_eq!(get_category(0x1107F), HALANT_NUM);
    }

    #[test]
    fn script_specific_classes() {
        assert_eq!(get_category(0x1A60), SAKOT);
        assert_eq!(get_category(0x11052), BASE_NUM);
        assert_eq!(get_category(0x11003), CONS_WITH_STACKER);
        assert_eq!(get_category(0x1A00), BASE);
    }
}
