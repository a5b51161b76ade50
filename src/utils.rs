//! Alignment helpers shared by the pool implementations

/// Aligns a value up to the nearest multiple of alignment
///
/// # Examples
/// ```
/// use fixpool::utils::align_up;
///
/// assert_eq!(align_up(7, 8), 8);
/// assert_eq!(align_up(8, 8), 8);
/// assert_eq!(align_up(9, 8), 16);
/// ```
#[inline(always)]
pub const fn align_up(value: usize, alignment: usize) -> usize {
    debug_assert!(alignment.is_power_of_two());
    (value + alignment - 1) & !(alignment - 1)
}

/// Checks if a value is aligned to the given alignment
///
/// # Examples
/// ```
/// use fixpool::utils::is_aligned;
///
/// assert!(is_aligned(16, 8));
/// assert!(!is_aligned(17, 8));
/// ```
#[inline(always)]
pub const fn is_aligned(value: usize, alignment: usize) -> bool {
    debug_assert!(alignment.is_power_of_two());
    value & (alignment - 1) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn align_up_identity_on_aligned() {
        for align in [1, 2, 8, 64] {
            assert_eq!(align_up(align * 3, align), align * 3);
        }
    }

    #[test]
    fn align_up_rounds_to_next_multiple() {
        assert_eq!(align_up(23, 8), 24);
        assert_eq!(align_up(1, 16), 16);
        assert_eq!(align_up(0, 8), 0);
    }
}
