use core::{fmt, str};

use super::util::{const_assert, debug_assert_all_digits, to_i32};

/// The output of a conversion: decimal digits and the position
/// of the decimal point.
///
/// The digits carry no sign, no decimal point, and no exponent.
/// The value they describe is `0.d1d2...dn * 10^decimal_point`,
/// so digits `"123"` with a decimal point of 1 read as `1.23`,
/// 0 reads as `0.123`, -2 reads as `0.00123` and 5 reads as
/// `12300`.
///
/// A buffer is reused across conversions. Each conversion
/// overwrites the digits and the decimal point; [`reset`]
/// clears everything, including the sign recorded by
/// [`dtoa`][crate::dtoa].
///
/// [`reset`]: Self::reset
#[derive(Clone)]
pub struct DtoaBuffer {
    digits: [u8; Self::CAPACITY],
    len: usize,
    decimal_point: i32,
    negative: bool,
}

impl DtoaBuffer {
    /// The maximum number of digits a buffer holds.
    pub const CAPACITY: usize = 512;

    /// Creates an empty buffer.
    pub const fn new() -> Self {
        Self {
            digits: [0; Self::CAPACITY],
            len: 0,
            decimal_point: 0,
            negative: false,
        }
    }

    /// Clears the buffer for reuse.
    pub fn reset(&mut self) {
        self.clear_digits();
        self.negative = false;
    }

    /// Returns the digits.
    pub fn raw_digits(&self) -> &str {
        let digits = self.as_bytes();
        debug_assert_all_digits(digits);
        // SAFETY: every byte is an ASCII digit.
        unsafe { str::from_utf8_unchecked(digits) }
    }

    /// Returns the position of the decimal point relative to
    /// the start of the digits.
    pub const fn decimal_point(&self) -> i32 {
        self.decimal_point
    }

    /// Returns the number of digits.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Reports whether the buffer holds no digits.
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Reports whether the converted value was negative.
    ///
    /// Only [`dtoa`][crate::dtoa] records a sign. The raw
    /// algorithms work on non-negative values.
    pub const fn is_negative(&self) -> bool {
        self.negative
    }

    fn as_bytes(&self) -> &[u8] {
        #[allow(clippy::indexing_slicing)] // len <= CAPACITY
        &self.digits[..self.len]
    }

    pub(crate) fn clear_digits(&mut self) {
        self.len = 0;
        self.decimal_point = 0;
    }

    pub(crate) fn set_decimal_point(&mut self, decimal_point: i32) {
        self.decimal_point = decimal_point;
    }

    pub(crate) fn set_negative(&mut self, negative: bool) {
        self.negative = negative;
    }

    /// Appends the digit `d`.
    ///
    /// # Panics
    ///
    /// Panics if the buffer is full.
    #[track_caller]
    pub(crate) fn push_digit(&mut self, d: u8) {
        debug_assert!(d <= 9);
        assert!(self.len < Self::CAPACITY, "`DtoaBuffer` is full");

        #[allow(clippy::indexing_slicing)] // checked above
        {
            self.digits[self.len] = b'0' + d;
        }
        self.len += 1;
    }

    /// Returns the digits written so far as ASCII.
    pub(crate) fn digits_mut(&mut self) -> &mut [u8] {
        #[allow(clippy::indexing_slicing)] // len <= CAPACITY
        &mut self.digits[..self.len]
    }

    /// Adds one unit in the last place, propagating the carry.
    ///
    /// Reports whether the carry ran off the front. The digits
    /// are then `"1"` followed by zeros and the caller must move
    /// the decimal point right by one.
    ///
    /// The buffer must not be empty.
    pub(crate) fn round_up(&mut self) -> bool {
        debug_assert!(!self.is_empty());

        let digits = self.digits_mut();
        for d in digits.iter_mut().rev() {
            if *d == b'9' {
                *d = b'0';
            } else {
                *d += 1;
                return false;
            }
        }
        if let Some(first) = digits.first_mut() {
            *first = b'1';
        }
        true
    }

    /// Removes trailing zeros and leading zeros, moving the
    /// decimal point to keep the value unchanged.
    pub(crate) fn trim_zeros(&mut self) {
        while self.as_bytes().last() == Some(&b'0') {
            self.len -= 1;
        }
        let leading = self.as_bytes().iter().take_while(|&&d| d == b'0').count();
        if leading > 0 {
            self.digits.copy_within(leading..self.len, 0);
            self.len -= leading;
            self.decimal_point -= to_i32(leading);
        }
    }
}

// The longest output is fixed mode on `f64::MAX`: 309 integral
// digits and the maximum number of fractional digits.
const_assert!(DtoaBuffer::CAPACITY >= 309 + crate::conv::MAX_FIXED_DIGITS);
const_assert!(DtoaBuffer::CAPACITY >= crate::conv::MAX_PRECISION_DIGITS);

impl Default for DtoaBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DtoaBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DtoaBuffer")
            .field("digits", &self.raw_digits())
            .field("decimal_point", &self.decimal_point)
            .field("negative", &self.negative)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(digits: &str, decimal_point: i32) -> DtoaBuffer {
        let mut buf = DtoaBuffer::new();
        for d in digits.bytes() {
            buf.push_digit(d - b'0');
        }
        buf.set_decimal_point(decimal_point);
        buf
    }

    #[test]
    fn test_push_and_reset() {
        let mut buf = buffer("123", 1);
        buf.set_negative(true);
        assert_eq!(buf.raw_digits(), "123");
        assert_eq!(buf.len(), 3);
        assert_eq!(buf.decimal_point(), 1);
        assert!(buf.is_negative());

        buf.reset();
        assert_eq!(buf.raw_digits(), "");
        assert!(buf.is_empty());
        assert_eq!(buf.decimal_point(), 0);
        assert!(!buf.is_negative());
    }

    #[test]
    fn test_round_up() {
        let mut buf = buffer("123", 1);
        assert!(!buf.round_up());
        assert_eq!(buf.raw_digits(), "124");

        let mut buf = buffer("1299", 1);
        assert!(!buf.round_up());
        assert_eq!(buf.raw_digits(), "1300");

        let mut buf = buffer("999", 1);
        assert!(buf.round_up());
        assert_eq!(buf.raw_digits(), "100");

        let mut buf = buffer("9", 1);
        assert!(buf.round_up());
        assert_eq!(buf.raw_digits(), "1");
    }

    #[test]
    fn test_trim_zeros() {
        let mut buf = buffer("0012300", 3);
        buf.trim_zeros();
        assert_eq!(buf.raw_digits(), "123");
        assert_eq!(buf.decimal_point(), 1);

        let mut buf = buffer("000", 0);
        buf.trim_zeros();
        assert_eq!(buf.raw_digits(), "");

        let mut buf = buffer("5", -3);
        buf.trim_zeros();
        assert_eq!(buf.raw_digits(), "5");
        assert_eq!(buf.decimal_point(), -3);
    }

    #[test]
    #[should_panic(expected = "`DtoaBuffer` is full")]
    fn test_push_full() {
        let mut buf = DtoaBuffer::new();
        for _ in 0..=DtoaBuffer::CAPACITY {
            buf.push_digit(1);
        }
    }

    #[test]
    fn test_debug() {
        let buf = buffer("15", 1);
        assert_eq!(
            format!("{buf:?}"),
            r#"DtoaBuffer { digits: "15", decimal_point: 1, negative: false }"#
        );
    }
}
