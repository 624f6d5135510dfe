//! Bit set helpers for small category enums.

pub const fn rb_flag(x: u32) -> u32 {
    1 << x
}

/// Like [`rb_flag`], but values that don't fit map to an empty set.
pub const fn rb_flag_unsafe(x: u32) -> u32 {
    if x < 32 {
        1 << x
    } else {
        0
    }
}

/// Flags of the inclusive range `x..=y`.
pub const fn rb_flag_range(x: u32, y: u32) -> u32 {
    rb_flag(y + 1) - rb_flag(x)
}

pub const fn rb_flag64(x: u32) -> u64 {
    1 << x
}

pub const fn rb_flag64_unsafe(x: u32) -> u64 {
    if x < 64 {
        1 << x
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_ranges() {
        assert_eq!(rb_flag_range(0, 0), 0b1);
        assert_eq!(rb_flag_range(2, 4), 0b11100);
        assert_eq!(rb_flag_unsafe(40), 0);
        assert_eq!(rb_flag64_unsafe(40), 1 << 40);
    }
}
