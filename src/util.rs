macro_rules! const_assert {
    ($($tt:tt)*) => {
        const _: () = ::core::assert!($($tt)*);
    }
}
pub(crate) use const_assert;

/// `floor(log10(2) * 2^32)`.
const LOG10_2_Q32: i64 = 1_292_913_986;

/// Returns `ceil(x * log10(2))`.
///
/// Exact for every `x` in `[-1200, 1200]`, which covers every
/// binary exponent a `f64` (or its scaled forms) can carry.
pub(crate) const fn ceil_log10_pow2(x: i32) -> i32 {
    debug_assert!(x >= -1200 && x <= 1200);

    ((x as i64 * LOG10_2_Q32 + (1 << 32) - 1) >> 32) as i32
}

/// Asserts that every byte in `s` is an ASCII digit.
#[track_caller]
pub(super) const fn debug_assert_all_digits(s: &[u8]) {
    if !cfg!(debug_assertions) {
        return;
    }
    let mut i = 0;
    while i < s.len() {
        #[allow(clippy::indexing_slicing)] // i < s.len()
        let c = s[i];
        debug_assert!(c.is_ascii_digit());
        i += 1;
    }
}

/// Converts a count to `i32`.
///
/// Every count this crate works with is bounded by a buffer
/// capacity far below `i32::MAX`.
#[allow(clippy::cast_possible_truncation)]
pub(crate) const fn to_i32(n: usize) -> i32 {
    debug_assert!(n <= i32::MAX as usize);

    n as i32
}
