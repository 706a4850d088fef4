//! Grisu3: fast shortest and counted digit generation.
//!
//! Grisu3 works in 64-bit integer arithmetic on a value scaled
//! by a cached power of ten. The scaled value carries a small,
//! known error. When the error makes the result ambiguous the
//! algorithm gives up and reports failure, which happens for
//! about 0.5% of inputs; callers then fall back to
//! [`bignum_dtoa`][crate::bignum_dtoa].

use super::{buffer::DtoaBuffer, cached_powers, diyfp::DiyFp, ieee::Double, util::to_i32};

/// The range `[alpha, gamma]` of binary exponents a scaled value
/// is placed in.
///
/// With `e` in this range, the integral part of the scaled value
/// fits in 32 bits and the fractional digits can be extracted by
/// multiplying by ten without overflowing a `u64`.
const MINIMAL_TARGET_EXPONENT: i32 = -60;
const MAXIMAL_TARGET_EXPONENT: i32 = -32;

/// The maximum number of digits the shortest mode produces.
pub const FAST_DTOA_MAXIMAL_LENGTH: usize = 17;

const SMALL_POWERS_OF_TEN: [u32; 11] = [
    0,
    1,
    10,
    100,
    1_000,
    10_000,
    100_000,
    1_000_000,
    10_000_000,
    100_000_000,
    1_000_000_000,
];

/// The kind of digits [`fast_dtoa`] generates.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FastDtoaMode {
    /// The shortest digits that read back as the input.
    Shortest,
    /// A fixed number of significant digits.
    Precision,
}

/// Writes the decimal digits of `v` to `buf`.
///
/// In [`FastDtoaMode::Shortest`] mode `requested_digits` is
/// ignored. In [`FastDtoaMode::Precision`] mode exactly
/// `requested_digits` correctly rounded digits are produced,
/// trailing zeros included.
///
/// Reports whether it succeeded. On failure the contents of
/// `buf` are unspecified and the caller must use another
/// algorithm. A request for zero digits always fails, as does a
/// zero `v`.
///
/// `v` must be finite and non-negative.
#[must_use]
pub fn fast_dtoa(
    v: f64,
    mode: FastDtoaMode,
    requested_digits: usize,
    buf: &mut DtoaBuffer,
) -> bool {
    let d = Double::new(v);
    debug_assert!(v >= 0.0);
    debug_assert!(!d.is_special());

    buf.clear_digits();
    if d.is_zero() {
        return false;
    }
    let decimal_exponent = match mode {
        FastDtoaMode::Shortest => grisu3(d, buf),
        FastDtoaMode::Precision if requested_digits == 0 => None,
        FastDtoaMode::Precision => grisu3_counted(d, requested_digits, buf),
    };
    match decimal_exponent {
        Some(exp) => {
            buf.set_decimal_point(to_i32(buf.len()) + exp);
            true
        }
        None => false,
    }
}

/// Shorthand for [`fast_dtoa`] in
/// [`FastDtoaMode::Shortest`] mode.
#[must_use]
pub fn fast_dtoa_shortest(v: f64, buf: &mut DtoaBuffer) -> bool {
    fast_dtoa(v, FastDtoaMode::Shortest, 0, buf)
}

/// Shorthand for [`fast_dtoa`] in
/// [`FastDtoaMode::Precision`] mode.
#[must_use]
pub fn fast_dtoa_counted(v: f64, requested_digits: usize, buf: &mut DtoaBuffer) -> bool {
    fast_dtoa(v, FastDtoaMode::Precision, requested_digits, buf)
}

/// Returns the biggest power of ten that is less than or equal
/// to `number` along with its exponent plus one.
///
/// `number` must be less than `2^number_bits`. For `number == 0`
/// the result is `(0, 0)`.
fn biggest_power_ten(number: u32, number_bits: i32) -> (u32, i32) {
    debug_assert!(number_bits <= 32);
    debug_assert!(u64::from(number) < 1 << number_bits);

    // 1233/4096 is approximately 1/log2(10).
    let mut exponent_plus_one_guess = (((number_bits + 1) * 1233) >> 12) + 1;
    // The guess is either right or one too big.
    #[allow(clippy::indexing_slicing)] // guess <= 10
    if number < SMALL_POWERS_OF_TEN[exponent_plus_one_guess as usize] {
        exponent_plus_one_guess -= 1;
    }
    #[allow(clippy::indexing_slicing)]
    let power = SMALL_POWERS_OF_TEN[exponent_plus_one_guess as usize];
    (power, exponent_plus_one_guess)
}

/// Moves the last digit of `buf` closer to the true value `w`
/// and reports whether the result is guaranteed to be the
/// closest shortest representation.
///
/// All arguments are in the same scaled unit:
///
/// - `distance_too_high_w`: the distance from the (too high)
///   upper boundary to `w`.
/// - `unsafe_interval`: the width of the interval the digits
///   must lie in, widened by the possible error.
/// - `rest`: the distance from the digits to the upper boundary.
/// - `ten_kappa`: the value of one unit in the last digit.
/// - `unit`: the error bound of the scaled boundaries.
fn round_weed(
    buf: &mut DtoaBuffer,
    distance_too_high_w: u64,
    unsafe_interval: u64,
    mut rest: u64,
    ten_kappa: u64,
    unit: u64,
) -> bool {
    let small_distance = distance_too_high_w - unit;
    let big_distance = distance_too_high_w + unit;

    // w lies in (too_high - big_distance, too_high - small_distance).
    // Step the last digit down while that moves it closer to the
    // upper end and stays inside the unsafe interval.
    debug_assert!(rest <= unsafe_interval);
    while rest < small_distance
        && unsafe_interval - rest >= ten_kappa
        && (rest + ten_kappa < small_distance
            || small_distance - rest >= rest + ten_kappa - small_distance)
    {
        if let Some(last) = buf.digits_mut().last_mut() {
            *last -= 1;
        }
        rest += ten_kappa;
    }

    // Ambiguous if one more step would also be closer to the
    // lower end.
    if rest < big_distance
        && unsafe_interval - rest >= ten_kappa
        && (rest + ten_kappa < big_distance
            || big_distance - rest > rest + ten_kappa - big_distance)
    {
        return false;
    }

    // Two units of margin on each side.
    2 * unit <= rest && 4 * unit <= unsafe_interval && rest <= unsafe_interval - 4 * unit
}

/// Rounds the counted digits in `buf` given the remainder
/// `rest` and reports the adjustment to kappa, or `None` if the
/// error makes rounding ambiguous.
///
/// `rest` and `unit` are in units of `ten_kappa`.
fn round_weed_counted(buf: &mut DtoaBuffer, rest: u64, ten_kappa: u64, unit: u64) -> Option<i32> {
    debug_assert!(rest < ten_kappa);

    // Ordered so that no subtraction underflows.
    if unit >= ten_kappa || ten_kappa - unit <= unit {
        return None;
    }
    // 2 * (rest + unit) <= ten_kappa: round down.
    if ten_kappa - rest > rest && ten_kappa - 2 * rest >= 2 * unit {
        return Some(0);
    }
    // 2 * (rest - unit) >= ten_kappa: round up.
    if rest > unit && ten_kappa - (rest - unit) <= rest - unit {
        return Some(i32::from(buf.round_up()));
    }
    None
}

/// Generates the shortest digits of `w` that lie strictly
/// within `(low, high)` and returns kappa.
///
/// `low`, `w` and `high` share the exponent `e` with
/// `MINIMAL_TARGET_EXPONENT <= e <= MAXIMAL_TARGET_EXPONENT`,
/// and each is off by at most one unit.
fn digit_gen(low: DiyFp, w: DiyFp, high: DiyFp, buf: &mut DtoaBuffer) -> Option<i32> {
    debug_assert!(low.e() == w.e() && w.e() == high.e());
    debug_assert!(low.f() + 1 <= high.f() - 1);
    debug_assert!((MINIMAL_TARGET_EXPONENT..=MAXIMAL_TARGET_EXPONENT).contains(&w.e()));

    // Digits are generated for the upper end of the widened
    // interval and round_weed moves them back towards w.
    let mut unit: u64 = 1;
    let too_low = DiyFp::new(low.f() - unit, low.e());
    let too_high = DiyFp::new(high.f() + unit, high.e());
    let unsafe_interval = too_high - too_low;

    let shift = w.e().unsigned_abs();
    let one = DiyFp::new(1 << shift, w.e());
    // The exponent range keeps the integral part below 2^32.
    let mut integrals = (too_high.f() >> shift) as u32;
    let mut fractionals = too_high.f() & (one.f() - 1);

    let (mut divisor, mut kappa) =
        biggest_power_ten(integrals, DiyFp::SIGNIFICAND_SIZE - shift as i32);

    while kappa > 0 {
        let digit = integrals / divisor;
        debug_assert!(digit <= 9);
        buf.push_digit(digit as u8);
        integrals %= divisor;
        kappa -= 1;
        let rest = (u64::from(integrals) << shift) + fractionals;
        if rest < unsafe_interval.f() {
            // Truncating here stays inside the unsafe interval.
            return round_weed(
                buf,
                (too_high - w).f(),
                unsafe_interval.f(),
                rest,
                u64::from(divisor) << shift,
                unit,
            )
            .then_some(kappa);
        }
        divisor /= 10;
    }

    // Fractional digits. With e >= -60 multiplying by ten does
    // not overflow.
    debug_assert!(one.e() >= -60);
    debug_assert!(fractionals < one.f());
    loop {
        fractionals *= 10;
        unit *= 10;
        let interval = unsafe_interval.f() * unit;
        let digit = fractionals >> shift;
        debug_assert!(digit <= 9);
        buf.push_digit(digit as u8);
        fractionals &= one.f() - 1;
        kappa -= 1;
        if fractionals < interval {
            return round_weed(
                buf,
                (too_high - w).f() * unit,
                interval,
                fractionals,
                one.f(),
                unit,
            )
            .then_some(kappa);
        }
    }
}

/// Generates `requested_digits` digits of `w` and returns
/// kappa.
///
/// `w` is off by at most one unit. Fewer digits are produced
/// only if the error grows larger than the remaining
/// fractional part, in which case generation fails.
fn digit_gen_counted(w: DiyFp, requested_digits: usize, buf: &mut DtoaBuffer) -> Option<i32> {
    debug_assert!((MINIMAL_TARGET_EXPONENT..=MAXIMAL_TARGET_EXPONENT).contains(&w.e()));

    let mut w_error: u64 = 1;
    let shift = w.e().unsigned_abs();
    let one = DiyFp::new(1 << shift, w.e());
    let mut integrals = (w.f() >> shift) as u32;
    let mut fractionals = w.f() & (one.f() - 1);
    let (mut divisor, mut kappa) =
        biggest_power_ten(integrals, DiyFp::SIGNIFICAND_SIZE - shift as i32);

    let mut remaining = requested_digits;
    while kappa > 0 {
        let digit = integrals / divisor;
        debug_assert!(digit <= 9);
        buf.push_digit(digit as u8);
        remaining -= 1;
        integrals %= divisor;
        kappa -= 1;
        if remaining == 0 {
            break;
        }
        divisor /= 10;
    }

    if remaining == 0 {
        let rest = (u64::from(integrals) << shift) + fractionals;
        return round_weed_counted(buf, rest, u64::from(divisor) << shift, w_error)
            .map(|carry| kappa + carry);
    }

    // The integrals have been generated and more digits are
    // needed. Stop once the error exceeds what is left.
    debug_assert!(one.e() >= -60);
    debug_assert!(fractionals < one.f());
    while remaining > 0 && fractionals > w_error {
        fractionals *= 10;
        w_error *= 10;
        let digit = fractionals >> shift;
        debug_assert!(digit <= 9);
        buf.push_digit(digit as u8);
        remaining -= 1;
        fractionals &= one.f() - 1;
        kappa -= 1;
    }
    if remaining != 0 {
        return None;
    }
    round_weed_counted(buf, fractionals, one.f(), w_error).map(|carry| kappa + carry)
}

/// Scales `w` by a cached power of ten `10^-mk` so that its
/// exponent lands in the target range and returns the scaled
/// value and `mk`.
fn scale(w: DiyFp) -> (DiyFp, i32) {
    let ten_mk_minimal_binary_exponent =
        MINIMAL_TARGET_EXPONENT - (w.e() + DiyFp::SIGNIFICAND_SIZE);
    let ten_mk_maximal_binary_exponent =
        MAXIMAL_TARGET_EXPONENT - (w.e() + DiyFp::SIGNIFICAND_SIZE);
    let (ten_mk, mk) = cached_powers::for_binary_exponent_range(
        ten_mk_minimal_binary_exponent,
        ten_mk_maximal_binary_exponent,
    );
    debug_assert!(
        MINIMAL_TARGET_EXPONENT <= w.e() + ten_mk.e() + DiyFp::SIGNIFICAND_SIZE
            && MAXIMAL_TARGET_EXPONENT >= w.e() + ten_mk.e() + DiyFp::SIGNIFICAND_SIZE
    );
    (ten_mk, mk)
}

/// Writes the shortest digits of `v` and returns the decimal
/// exponent of the last digit.
fn grisu3(v: Double, buf: &mut DtoaBuffer) -> Option<i32> {
    let w = v.as_normalized_diy_fp();
    // Anything strictly between the boundaries reads back as v.
    let (boundary_minus, boundary_plus) = v.normalized_boundaries();
    debug_assert!(boundary_plus.e() == w.e());

    let (ten_mk, mk) = scale(w);

    // Each product is off by less than one unit.
    let scaled_w = w * ten_mk;
    debug_assert!(scaled_w.e() == boundary_plus.e() + ten_mk.e() + DiyFp::SIGNIFICAND_SIZE);
    let scaled_boundary_minus = boundary_minus * ten_mk;
    let scaled_boundary_plus = boundary_plus * ten_mk;

    let kappa = digit_gen(scaled_boundary_minus, scaled_w, scaled_boundary_plus, buf)?;
    Some(-mk + kappa)
}

/// Writes `requested_digits` digits of `v` and returns the
/// decimal exponent of the last digit.
fn grisu3_counted(v: Double, requested_digits: usize, buf: &mut DtoaBuffer) -> Option<i32> {
    let w = v.as_normalized_diy_fp();
    let (ten_mk, mk) = scale(w);
    let scaled_w = w * ten_mk;

    let kappa = digit_gen_counted(scaled_w, requested_digits, buf)?;
    Some(-mk + kappa)
}
