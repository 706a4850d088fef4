//! Fast digit generation for a fixed number of fractional
//! digits.

use super::{buffer::DtoaBuffer, ieee::Double, util::to_i32};

/// The largest binary exponent [`fixed_dtoa`] accepts.
///
/// With a 53-bit significand the integral part stays below
/// `2^73`.
const MAX_EXPONENT: i32 = 20;

/// The most fractional digits [`fixed_dtoa`] produces.
pub const FIXED_DTOA_MAX_FRACTIONAL_DIGITS: usize = 20;

/// Values with a smaller binary exponent round to zero at every
/// supported position.
const MIN_EXPONENT: i32 = -128;

/// Writes the digits of `v` rounded to `fractional_count`
/// digits after the decimal point to `buf`.
///
/// The digits have neither leading nor trailing zeros. If the
/// value rounds to zero the digits are empty and the decimal
/// point is `-fractional_count`. Ties round away from zero.
///
/// Reports whether it succeeded. It fails, leaving `buf`
/// unspecified, when `v >= 2^73` or when `fractional_count`
/// exceeds [`FIXED_DTOA_MAX_FRACTIONAL_DIGITS`].
///
/// `v` must be finite and non-negative.
#[must_use]
pub fn fixed_dtoa(v: f64, fractional_count: usize, buf: &mut DtoaBuffer) -> bool {
    let d = Double::new(v);
    debug_assert!(d.sign() > 0 || d.is_zero());
    debug_assert!(!d.is_special());

    let significand = d.significand();
    let exponent = d.exponent();
    if exponent > MAX_EXPONENT || fractional_count > FIXED_DTOA_MAX_FRACTIONAL_DIGITS {
        return false;
    }

    buf.clear_digits();
    if exponent >= 0 {
        // The value is an integer.
        write_integral(u128::from(significand) << exponent, buf);
        buf.set_decimal_point(to_i32(buf.len()));
    } else if exponent > -Double::SIGNIFICAND_SIZE {
        // The value has an integral and a fractional part.
        let point = exponent.unsigned_abs();
        let integrals = significand >> point;
        let fractionals = significand - (integrals << point);
        write_integral(u128::from(integrals), buf);
        buf.set_decimal_point(to_i32(buf.len()));
        fill_fractionals(u128::from(fractionals), exponent, fractional_count, buf);
    } else if exponent < MIN_EXPONENT {
        buf.set_decimal_point(-to_i32(fractional_count));
    } else {
        fill_fractionals(u128::from(significand), exponent, fractional_count, buf);
    }

    buf.trim_zeros();
    if buf.is_empty() {
        // The value rounds to zero.
        buf.set_decimal_point(-to_i32(fractional_count));
    }
    true
}

/// Appends the decimal digits of `n`, or nothing if `n` is
/// zero.
fn write_integral(n: u128, buf: &mut DtoaBuffer) {
    if n == 0 {
        return;
    }
    let mut fmt = itoa::Buffer::new();
    for d in fmt.format(n).bytes() {
        buf.push_digit(d - b'0');
    }
}

/// Appends up to `fractional_count` digits of
/// `fractionals * 2^exponent` and rounds the last one.
///
/// `fractionals * 2^exponent` must be below one and `exponent`
/// must be in `[-128, 0)`. If rounding carries past the first
/// digit the decimal point moves right by one.
fn fill_fractionals(
    mut fractionals: u128,
    exponent: i32,
    fractional_count: usize,
    buf: &mut DtoaBuffer,
) {
    debug_assert!((MIN_EXPONENT..0).contains(&exponent));

    // The binary point sits `point` bits from the right.
    // Multiplying by 5 and moving the point left by one is
    // multiplying by 10.
    let mut point = exponent.unsigned_abs();
    debug_assert!(fractionals >> point == 0);
    for _ in 0..fractional_count {
        if fractionals == 0 {
            break;
        }
        fractionals *= 5;
        point -= 1;
        let digit = fractionals >> point;
        debug_assert!(digit <= 9);
        buf.push_digit(digit as u8);
        fractionals -= digit << point;
    }
    // Round half up on the first omitted bit.
    if point > 0 && (fractionals >> (point - 1)) & 1 == 1 {
        if buf.is_empty() {
            // 0.5 with no digits requested.
            buf.push_digit(1);
            buf.set_decimal_point(1);
        } else if buf.round_up() {
            buf.set_decimal_point(buf.decimal_point() + 1);
        }
    }
}
