//! Exact digit generation with arbitrary precision arithmetic.
//!
//! This is the slow path. It represents the value as the exact
//! fraction `numerator / denominator` and generates one digit per
//! division, so it always produces the correct result.

use core::cmp::Ordering;

use super::{
    bignum::Bignum,
    buffer::DtoaBuffer,
    conv::DtoaMode,
    ieee::Double,
    util::{ceil_log10_pow2, to_i32},
};

/// Writes the decimal digits of `v` to `buf`.
///
/// - [`DtoaMode::Shortest`]: the shortest digits that read back
///   as `v`. `requested_digits` is ignored.
/// - [`DtoaMode::Fixed`]: the digits of `v` rounded to
///   `requested_digits` digits after the decimal point. The
///   digits may have trailing zeros and may be empty, in which
///   case the decimal point is `-requested_digits`.
/// - [`DtoaMode::Precision`]: `requested_digits` significant
///   digits, trailing zeros included. A request for zero digits
///   yields no digits.
///
/// The counted modes round ties away from zero.
///
/// `v` must be finite and non-negative. Zero is written as the
/// single digit `0` with the decimal point at 1.
///
/// # Panics
///
/// Panics if the digits do not fit in [`DtoaBuffer::CAPACITY`],
/// which happens when `requested_digits` exceeds the limits
/// [`dtoa`](crate::dtoa) enforces for the mode.
pub fn bignum_dtoa(v: f64, mode: DtoaMode, requested_digits: usize, buf: &mut DtoaBuffer) {
    let d = Double::new(v);
    debug_assert!(v >= 0.0);
    debug_assert!(!d.is_special());

    buf.clear_digits();
    if mode == DtoaMode::Precision && requested_digits == 0 {
        return;
    }
    if v == 0.0 {
        buf.push_digit(0);
        buf.set_decimal_point(1);
        return;
    }

    let significand = d.significand();
    let exponent = d.exponent();
    let lower_boundary_is_closer = d.lower_boundary_is_closer();
    let need_boundary_deltas = mode == DtoaMode::Shortest;
    let is_even = significand & 1 == 0;

    let estimated_power = estimate_power(normalized_exponent(significand, exponent));

    // Rounds to zero at the requested position.
    if mode == DtoaMode::Fixed && -estimated_power - 1 > to_i32(requested_digits) {
        buf.set_decimal_point(-to_i32(requested_digits));
        return;
    }

    let mut numerator = Bignum::new();
    let mut denominator = Bignum::new();
    let mut delta_minus = Bignum::new();
    let mut delta_plus = Bignum::new();
    initial_scaled_start_values(
        significand,
        exponent,
        lower_boundary_is_closer,
        estimated_power,
        need_boundary_deltas,
        &mut numerator,
        &mut denominator,
        &mut delta_minus,
        &mut delta_plus,
    );

    // The estimate might be one too small. Fix that, which also
    // puts the numerator below the denominator.
    let decimal_point = fixup_multiply10(
        estimated_power,
        is_even,
        &mut numerator,
        &mut denominator,
        &mut delta_minus,
        &mut delta_plus,
    );

    // The first digit is now floor(numerator / denominator).
    match mode {
        DtoaMode::Shortest => {
            generate_shortest_digits(
                &mut numerator,
                &denominator,
                &mut delta_minus,
                &mut delta_plus,
                is_even,
                buf,
            );
            buf.set_decimal_point(decimal_point);
        }
        DtoaMode::Fixed => {
            bignum_to_fixed(
                requested_digits,
                decimal_point,
                &mut numerator,
                &mut denominator,
                buf,
            );
        }
        DtoaMode::Precision => {
            generate_counted_digits(
                requested_digits,
                decimal_point,
                &mut numerator,
                &denominator,
                buf,
            );
        }
    }
}

/// Returns the exponent of the value when its significand is
/// shifted so that the hidden bit is set.
fn normalized_exponent(mut significand: u64, mut exponent: i32) -> i32 {
    debug_assert!(significand != 0);

    const HIDDEN_BIT: u64 = 1 << (Double::SIGNIFICAND_SIZE - 1);
    while significand & HIDDEN_BIT == 0 {
        significand <<= 1;
        exponent -= 1;
    }
    exponent
}

/// Returns `k` such that `10^(k-1) <= v < 10^k` or, rarely,
/// `10^k` with `v` just below it.
///
/// The estimate is never too big: it is either exact or one too
/// small, which [`fixup_multiply10`] corrects.
fn estimate_power(exponent: i32) -> i32 {
    // The value is significand * 2^exponent with a 53-bit
    // significand, so it is below 2^(exponent + 53). Using
    // exponent + 52 errs on the low side.
    ceil_log10_pow2(exponent + Double::SIGNIFICAND_SIZE - 1)
}

/// Generates the shortest digits that lie within the boundary
/// deltas.
///
/// Precondition: `numerator < denominator`.
fn generate_shortest_digits(
    numerator: &mut Bignum,
    denominator: &Bignum,
    delta_minus: &mut Bignum,
    delta_plus: &mut Bignum,
    is_even: bool,
    buf: &mut DtoaBuffer,
) {
    // Equal deltas stay equal, so only delta_minus is scaled.
    let symmetric = Bignum::equal(delta_minus, delta_plus);
    loop {
        let digit = numerator.divide_modulo_int_bignum(denominator);
        debug_assert!(digit <= 9);
        buf.push_digit(digit as u8);

        // Stop once the remainder is within a delta of either
        // boundary.
        let delta_plus_ref: &Bignum = if symmetric { &*delta_minus } else { &*delta_plus };
        let in_delta_room_minus = if is_even {
            Bignum::less_equal(numerator, delta_minus)
        } else {
            Bignum::less(numerator, delta_minus)
        };
        let in_delta_room_plus = if is_even {
            Bignum::plus_compare(numerator, delta_plus_ref, denominator).is_ge()
        } else {
            Bignum::plus_compare(numerator, delta_plus_ref, denominator).is_gt()
        };

        match (in_delta_room_minus, in_delta_room_plus) {
            (false, false) => {
                numerator.times_10();
                delta_minus.times_10();
                if !symmetric {
                    delta_plus.times_10();
                }
            }
            (true, true) => {
                // Both neighbors are acceptable. Pick the closer
                // one by comparing 2*numerator with denominator.
                match Bignum::plus_compare(numerator, numerator, denominator) {
                    Ordering::Less => {}
                    Ordering::Greater => increment_last_digit(buf),
                    Ordering::Equal => {
                        // Halfway. Round to even.
                        if digit & 1 == 1 {
                            increment_last_digit(buf);
                        }
                    }
                }
                return;
            }
            (true, false) => return,
            (false, true) => {
                // The last digit cannot be a 9: the previous
                // digit would already have been in range.
                increment_last_digit(buf);
                return;
            }
        }
    }
}

fn increment_last_digit(buf: &mut DtoaBuffer) {
    if let Some(last) = buf.digits_mut().last_mut() {
        debug_assert!(*last != b'9');
        *last += 1;
    }
}

/// Generates `count` digits, rounding the last one half up.
///
/// Precondition: `numerator < denominator`. `count` must be
/// positive.
fn generate_counted_digits(
    count: usize,
    mut decimal_point: i32,
    numerator: &mut Bignum,
    denominator: &Bignum,
    buf: &mut DtoaBuffer,
) {
    debug_assert!(count > 0);

    for _ in 0..count - 1 {
        let digit = numerator.divide_modulo_int_bignum(denominator);
        debug_assert!(digit <= 9);
        buf.push_digit(digit as u8);
        numerator.times_10();
    }
    let mut digit = numerator.divide_modulo_int_bignum(denominator);
    if Bignum::plus_compare(numerator, numerator, denominator).is_ge() {
        digit += 1;
    }
    debug_assert!(digit <= 10);
    if digit == 10 {
        // Carry into the earlier digits.
        buf.push_digit(9);
        if buf.round_up() {
            decimal_point += 1;
        }
    } else {
        buf.push_digit(digit as u8);
    }
    buf.set_decimal_point(decimal_point);
}

/// Generates the digits up to `requested_digits` after the
/// decimal point.
///
/// The digits may be empty, in which case the decimal point
/// is `-requested_digits`.
fn bignum_to_fixed(
    requested_digits: usize,
    decimal_point: i32,
    numerator: &mut Bignum,
    denominator: &mut Bignum,
    buf: &mut DtoaBuffer,
) {
    let requested = to_i32(requested_digits);
    // A value like 0.5 with no fractional digits still rounds
    // up to "1", so the first digit past the cutoff matters.
    match (-decimal_point).cmp(&requested) {
        Ordering::Greater => {
            // 0.001 with one digit.
            buf.set_decimal_point(-requested);
        }
        Ordering::Equal => {
            // 0.04 or 0.06 with one digit: only the rounding
            // direction is left.
            denominator.times_10();
            if Bignum::plus_compare(numerator, numerator, denominator).is_ge() {
                buf.push_digit(1);
                buf.set_decimal_point(decimal_point + 1);
            } else {
                buf.set_decimal_point(-requested);
            }
        }
        Ordering::Less => {
            // Digits before the point plus the requested ones.
            let needed_digits = decimal_point + requested;
            debug_assert!(needed_digits > 0);
            generate_counted_digits(
                needed_digits.unsigned_abs() as usize,
                decimal_point,
                numerator,
                denominator,
                buf,
            );
        }
    }
}

/// Sets up `numerator / denominator == v / 10^estimated_power`.
///
/// When boundary deltas are needed the numerator and the
/// denominator are doubled and `delta_minus`/`delta_plus` hold
/// the distance to the lower and upper boundary in the same
/// scale. Otherwise both deltas are zero.
#[allow(clippy::too_many_arguments)]
fn initial_scaled_start_values(
    significand: u64,
    exponent: i32,
    lower_boundary_is_closer: bool,
    estimated_power: i32,
    need_boundary_deltas: bool,
    numerator: &mut Bignum,
    denominator: &mut Bignum,
    delta_minus: &mut Bignum,
    delta_plus: &mut Bignum,
) {
    if exponent >= 0 {
        initial_scaled_start_values_positive_exponent(
            significand,
            exponent.unsigned_abs() as usize,
            estimated_power.unsigned_abs() as usize,
            need_boundary_deltas,
            numerator,
            denominator,
            delta_minus,
            delta_plus,
        );
    } else if estimated_power >= 0 {
        initial_scaled_start_values_negative_exponent_positive_power(
            significand,
            exponent.unsigned_abs() as usize,
            estimated_power.unsigned_abs() as usize,
            need_boundary_deltas,
            numerator,
            denominator,
            delta_minus,
            delta_plus,
        );
    } else {
        initial_scaled_start_values_negative_exponent_negative_power(
            significand,
            exponent.unsigned_abs() as usize,
            estimated_power.unsigned_abs() as usize,
            need_boundary_deltas,
            numerator,
            denominator,
            delta_minus,
            delta_plus,
        );
    }

    if need_boundary_deltas && lower_boundary_is_closer {
        // The lower boundary is at half the usual distance.
        // Double everything but delta_minus.
        denominator.shift_left(1);
        numerator.shift_left(1);
        delta_plus.shift_left(1);
    }
}

/// `v = significand * 2^exponent` with `exponent >= 0`, so
/// `estimated_power >= 0` as well.
#[allow(clippy::too_many_arguments)]
fn initial_scaled_start_values_positive_exponent(
    significand: u64,
    exponent: usize,
    estimated_power: usize,
    need_boundary_deltas: bool,
    numerator: &mut Bignum,
    denominator: &mut Bignum,
    delta_minus: &mut Bignum,
    delta_plus: &mut Bignum,
) {
    // numerator = v, denominator = 10^estimated_power.
    numerator.assign_u64(significand);
    numerator.shift_left(exponent);
    denominator.assign_power_u16(10, estimated_power);

    if need_boundary_deltas {
        // The boundaries are v +- 2^e / 2. Doubling both sides
        // makes the deltas the integer 2^e.
        denominator.shift_left(1);
        numerator.shift_left(1);
        delta_plus.assign_u16(1);
        delta_plus.shift_left(exponent);
        delta_minus.assign_u16(1);
        delta_minus.shift_left(exponent);
    }
}

/// `v = significand / 2^exponent` with `estimated_power >= 0`.
#[allow(clippy::too_many_arguments)]
fn initial_scaled_start_values_negative_exponent_positive_power(
    significand: u64,
    exponent: usize,
    estimated_power: usize,
    need_boundary_deltas: bool,
    numerator: &mut Bignum,
    denominator: &mut Bignum,
    delta_minus: &mut Bignum,
    delta_plus: &mut Bignum,
) {
    // numerator = significand,
    // denominator = 10^estimated_power * 2^exponent.
    numerator.assign_u64(significand);
    denominator.assign_power_u16(10, estimated_power);
    denominator.shift_left(exponent);

    if need_boundary_deltas {
        // The denominator already carries 2^exponent, so after
        // doubling both deltas are 1.
        denominator.shift_left(1);
        numerator.shift_left(1);
        delta_plus.assign_u16(1);
        delta_minus.assign_u16(1);
    }
}

/// `v = significand / 2^exponent` with `estimated_power < 0`.
#[allow(clippy::too_many_arguments)]
fn initial_scaled_start_values_negative_exponent_negative_power(
    significand: u64,
    exponent: usize,
    estimated_power: usize,
    need_boundary_deltas: bool,
    numerator: &mut Bignum,
    denominator: &mut Bignum,
    delta_minus: &mut Bignum,
    delta_plus: &mut Bignum,
) {
    // Scale the numerator and the deltas by 10^-estimated_power
    // instead of dividing the denominator.
    numerator.assign_power_u16(10, estimated_power);
    if need_boundary_deltas {
        delta_plus.assign_bignum(numerator);
        delta_minus.assign_bignum(numerator);
    }
    // numerator = significand * 10^-estimated_power,
    // denominator = 2^exponent.
    numerator.multiply_by_u64(significand);
    denominator.assign_u16(1);
    denominator.shift_left(exponent);

    if need_boundary_deltas {
        numerator.shift_left(1);
        denominator.shift_left(1);
    }
}

/// Multiplies the numerator and the deltas by ten if the
/// estimated power was right, and returns the decimal point.
///
/// Afterwards `numerator < denominator` and `numerator /
/// denominator` lies in `[0.1, 1)` scaled so that the first
/// division yields the first digit.
fn fixup_multiply10(
    estimated_power: i32,
    is_even: bool,
    numerator: &mut Bignum,
    denominator: &mut Bignum,
    delta_minus: &mut Bignum,
    delta_plus: &mut Bignum,
) -> i32 {
    // An even significand wins ties, so its upper boundary
    // itself reads back as v.
    let in_range = if is_even {
        Bignum::plus_compare(numerator, delta_plus, denominator).is_ge()
    } else {
        Bignum::plus_compare(numerator, delta_plus, denominator).is_gt()
    };
    if in_range {
        estimated_power + 1
    } else {
        numerator.times_10();
        if Bignum::equal(delta_minus, delta_plus) {
            delta_minus.times_10();
            delta_plus.assign_bignum(delta_minus);
        } else {
            delta_minus.times_10();
            delta_plus.times_10();
        }
        estimated_power
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dtoatest::{self, Op};

    const SHORTEST: &str = include_str!("../testdata/shortest.dtoatest");
    const PRECISION: &str = include_str!("../testdata/precision.dtoatest");
    const FIXED: &str = include_str!("../testdata/fixed.dtoatest");

    fn dtoa(v: f64, mode: DtoaMode, n: usize) -> (String, i32) {
        let mut buf = DtoaBuffer::new();
        bignum_dtoa(v, mode, n, &mut buf);
        (buf.raw_digits().to_owned(), buf.decimal_point())
    }

    fn trimmed(v: f64, mode: DtoaMode, n: usize) -> (String, i32) {
        let mut buf = DtoaBuffer::new();
        bignum_dtoa(v, mode, n, &mut buf);
        buf.trim_zeros();
        if buf.is_empty() {
            buf.set_decimal_point(-to_i32(n));
        }
        (buf.raw_digits().to_owned(), buf.decimal_point())
    }

    fn pair(digits: &str, point: i32) -> (String, i32) {
        (digits.to_owned(), point)
    }

    #[test]
    fn test_estimate_power() {
        for bits in [
            1u64,
            0x000f_ffff_ffff_ffff,
            0x0010_0000_0000_0000,
            0x3ff0_0000_0000_0000,
            0x4024_0000_0000_0000,
            0x7fef_ffff_ffff_ffff,
        ] {
            let d = Double::from_bits(bits);
            let k = estimate_power(normalized_exponent(d.significand(), d.exponent()));
            // 10^(k-1) <= v < 10^(k+1)
            let v = d.value();
            assert!(v < 10f64.powi(k + 1), "{v:e} {k}");
            assert!(v >= 10f64.powi(k - 1) || k - 1 < -307, "{v:e} {k}");
        }
    }

    #[test]
    fn test_shortest_various() {
        assert_eq!(dtoa(1.0, DtoaMode::Shortest, 0), pair("1", 1));
        assert_eq!(dtoa(1.5, DtoaMode::Shortest, 0), pair("15", 1));
        assert_eq!(dtoa(0.1, DtoaMode::Shortest, 0), pair("1", 0));
        assert_eq!(dtoa(f64::MAX, DtoaMode::Shortest, 0), pair("17976931348623157", 309));
        assert_eq!(dtoa(5e-324, DtoaMode::Shortest, 0), pair("5", -323));
        assert_eq!(
            dtoa(3.5844466002796428e+298, DtoaMode::Shortest, 0),
            pair("35844466002796428", 299)
        );
        assert_eq!(
            dtoa(f64::from_bits(0x0010_0000_0000_0000), DtoaMode::Shortest, 0),
            pair("22250738585072014", -307)
        );
        assert_eq!(
            dtoa(f64::from_bits(0x000f_ffff_ffff_ffff), DtoaMode::Shortest, 0),
            pair("2225073858507201", -307)
        );
        assert_eq!(dtoa(4294967272.0, DtoaMode::Shortest, 0), pair("4294967272", 10));
        assert_eq!(dtoa(1e23, DtoaMode::Shortest, 0), pair("1", 24));
        assert_eq!(dtoa(9007199254740993.0, DtoaMode::Shortest, 0), pair("9007199254740992", 16));
    }

    #[test]
    fn test_precision_various() {
        assert_eq!(dtoa(1.0, DtoaMode::Precision, 3), pair("100", 1));
        assert_eq!(dtoa(1.5, DtoaMode::Precision, 10), pair("1500000000", 1));
        assert_eq!(dtoa(f64::MAX, DtoaMode::Precision, 5), pair("17977", 309));
        assert_eq!(dtoa(4294967272.0, DtoaMode::Precision, 14), pair("42949672720000", 10));
        assert_eq!(dtoa(5.5626846462680035e-309, DtoaMode::Precision, 1), pair("6", -308));
        assert_eq!(dtoa(0.999_999_999_999_999_9, DtoaMode::Precision, 3), pair("100", 1));
        assert_eq!(dtoa(1.0, DtoaMode::Precision, 0), pair("", 0));
        // Exact ties round up.
        assert_eq!(dtoa(0.5, DtoaMode::Precision, 0), pair("", 0));
        assert_eq!(dtoa(2.5, DtoaMode::Precision, 1), pair("3", 1));
        assert_eq!(dtoa(0.125, DtoaMode::Precision, 2), pair("13", 0));
    }

    #[test]
    fn test_fixed_various() {
        assert_eq!(trimmed(1.0, DtoaMode::Fixed, 3), pair("1", 1));
        assert_eq!(trimmed(1.5, DtoaMode::Fixed, 10), pair("15", 1));
        assert_eq!(trimmed(0.001, DtoaMode::Fixed, 10), pair("1", -2));
        assert_eq!(trimmed(0.001, DtoaMode::Fixed, 1), pair("", -1));
        assert_eq!(trimmed(0.04, DtoaMode::Fixed, 1), pair("", -1));
        assert_eq!(trimmed(0.06, DtoaMode::Fixed, 1), pair("1", 0));
        assert_eq!(trimmed(0.5, DtoaMode::Fixed, 0), pair("1", 1));
        assert_eq!(trimmed(0.4, DtoaMode::Fixed, 0), pair("", 0));
        assert_eq!(trimmed(9.5, DtoaMode::Fixed, 0), pair("1", 2));
        assert_eq!(trimmed(5e-324, DtoaMode::Fixed, 20), pair("", -20));
        assert_eq!(
            trimmed(f64::MAX, DtoaMode::Fixed, 0),
            pair("179769313486231570814527423731704356798070567525844996598917476803157260780028538760589558632766878171540458953514382464234321326889464182768467546703537516986049910576551282076245490090389328944075868508455133942304583236903222948165808559332123348274797826204144723168738177180919299881250404026184124858368", 309)
        );
    }

    #[test]
    fn test_fixed_keeps_trailing_zeros() {
        assert_eq!(dtoa(1.0, DtoaMode::Fixed, 3), pair("1000", 1));
        assert_eq!(dtoa(0.001, DtoaMode::Fixed, 1), pair("", -1));
    }

    #[test]
    fn test_zero() {
        assert_eq!(dtoa(0.0, DtoaMode::Shortest, 0), pair("0", 1));
        assert_eq!(dtoa(0.0, DtoaMode::Fixed, 0), pair("0", 1));
        assert_eq!(dtoa(0.0, DtoaMode::Fixed, 5), pair("0", 1));
        assert_eq!(dtoa(0.0, DtoaMode::Precision, 3), pair("0", 1));
        assert_eq!(dtoa(0.0, DtoaMode::Precision, 0), pair("", 0));
    }

    #[test]
    fn test_shortest_corpus() {
        let suite = dtoatest::parse(SHORTEST).unwrap();
        let mut buf = DtoaBuffer::new();
        for case in &suite.cases {
            assert_eq!(case.op, Op::Shortest);
            buf.reset();
            bignum_dtoa(case.input, DtoaMode::Shortest, 0, &mut buf);
            case.check(&buf).unwrap();
        }
    }

    #[test]
    fn test_precision_corpus() {
        let suite = dtoatest::parse(PRECISION).unwrap();
        let mut buf = DtoaBuffer::new();
        for case in &suite.cases {
            let Op::Precision(n) = case.op else {
                panic!("{}: unexpected op {:?}", case.id, case.op);
            };
            buf.reset();
            bignum_dtoa(case.input, DtoaMode::Precision, n, &mut buf);
            assert_eq!(buf.len(), n, "{}", case.id);
            case.check(&buf).unwrap();
        }
    }

    #[test]
    fn test_fixed_corpus() {
        let suite = dtoatest::parse(FIXED).unwrap();
        let mut buf = DtoaBuffer::new();
        for case in &suite.cases {
            let Op::Fixed(n) = case.op else {
                panic!("{}: unexpected op {:?}", case.id, case.op);
            };
            buf.reset();
            bignum_dtoa(case.input, DtoaMode::Fixed, n, &mut buf);
            buf.trim_zeros();
            if buf.is_empty() {
                buf.set_decimal_point(-to_i32(n));
            }
            case.check(&buf).unwrap();
        }
    }
}
