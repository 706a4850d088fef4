use core::fmt;

use super::{
    bignum_dtoa::bignum_dtoa,
    buffer::DtoaBuffer,
    fast_dtoa::{fast_dtoa, FastDtoaMode},
    fixed_dtoa::fixed_dtoa,
    ieee::Double,
    util::to_i32,
};

/// The most fractional digits [`dtoa`] produces in
/// [`DtoaMode::Fixed`] mode.
pub const MAX_FIXED_DIGITS: usize = 100;

/// The most significant digits [`dtoa`] produces in
/// [`DtoaMode::Precision`] mode.
pub const MAX_PRECISION_DIGITS: usize = 120;

/// The kind of digits a conversion generates.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum DtoaMode {
    /// The shortest digits that read back as the input.
    ///
    /// If two candidates are equally short, the one closest to
    /// the input wins.
    #[default]
    Shortest,
    /// A fixed number of digits after the decimal point.
    Fixed,
    /// A fixed number of significant digits.
    Precision,
}

/// Writes the decimal digits of `v` to `buf`.
///
/// This is the entry point for callers that do not care which
/// algorithm does the work. Each mode tries its fast algorithm
/// first and falls back to [`bignum_dtoa`] when that fails or
/// does not apply.
///
/// - [`DtoaMode::Shortest`]: `requested_digits` is ignored.
/// - [`DtoaMode::Fixed`]: rounds to `requested_digits` digits
///   after the decimal point. Trailing zeros are removed. If the
///   value rounds to zero the digits are empty and the decimal
///   point is `-requested_digits`.
/// - [`DtoaMode::Precision`]: `requested_digits` significant
///   digits, trailing zeros included.
///
/// The sign of `v` is recorded in `buf` and the digits describe
/// `|v|`. Zero converts to `"0"` with a decimal point of 1,
/// except for a request for zero significant digits, which
/// yields no digits.
///
/// # Errors
///
/// Returns an error if `v` is infinite or NaN, or if
/// `requested_digits` exceeds [`MAX_FIXED_DIGITS`] or
/// [`MAX_PRECISION_DIGITS`] for the respective mode. `buf` is
/// left unchanged.
pub fn dtoa(
    v: f64,
    mode: DtoaMode,
    requested_digits: usize,
    buf: &mut DtoaBuffer,
) -> Result<(), DtoaError> {
    let d = Double::new(v);
    if d.is_special() {
        return Err(DtoaError::non_finite());
    }
    let max_digits = match mode {
        DtoaMode::Shortest => usize::MAX,
        DtoaMode::Fixed => MAX_FIXED_DIGITS,
        DtoaMode::Precision => MAX_PRECISION_DIGITS,
    };
    if requested_digits > max_digits {
        return Err(DtoaError::too_many_digits());
    }

    buf.reset();
    buf.set_negative(d.sign() < 0);
    let v = v.abs();

    if mode == DtoaMode::Precision && requested_digits == 0 {
        return Ok(());
    }
    if v == 0.0 {
        buf.push_digit(0);
        buf.set_decimal_point(1);
        return Ok(());
    }

    let fast_worked = match mode {
        DtoaMode::Shortest => fast_dtoa(v, FastDtoaMode::Shortest, 0, buf),
        DtoaMode::Fixed => fixed_dtoa(v, requested_digits, buf),
        DtoaMode::Precision => fast_dtoa(v, FastDtoaMode::Precision, requested_digits, buf),
    };
    if fast_worked {
        return Ok(());
    }

    // The fast algorithms failed or the request is out of their
    // range.
    bignum_dtoa(v, mode, requested_digits, buf);
    if mode == DtoaMode::Fixed {
        buf.trim_zeros();
        if buf.is_empty() {
            buf.set_decimal_point(-to_i32(requested_digits));
        }
    }
    Ok(())
}

/// An error returned by [`dtoa`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DtoaError {
    kind: DtoaErrorKind,
}

impl DtoaError {
    pub(super) const fn non_finite() -> Self {
        Self {
            kind: DtoaErrorKind::NonFinite,
        }
    }

    pub(super) const fn too_many_digits() -> Self {
        Self {
            kind: DtoaErrorKind::TooManyDigits,
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DtoaError {}

impl fmt::Display for DtoaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.kind, f)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum DtoaErrorKind {
    NonFinite,
    TooManyDigits,
}

impl fmt::Display for DtoaErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFinite => write!(f, "cannot convert infinity or NaN to digits"),
            Self::TooManyDigits => write!(f, "too many digits requested"),
        }
    }
}

/// An error returned when parsing a [`Bignum`] from a string.
///
/// [`Bignum`]: crate::bignum::Bignum
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseBignumError {
    kind: ParseErrorKind,
}

impl ParseBignumError {
    pub(super) const fn empty() -> Self {
        Self {
            kind: ParseErrorKind::Empty,
        }
    }

    pub(super) const fn invalid_digit() -> Self {
        Self {
            kind: ParseErrorKind::InvalidDigit,
        }
    }

    pub(super) const fn too_long() -> Self {
        Self {
            kind: ParseErrorKind::TooLong,
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseBignumError {}

impl fmt::Display for ParseBignumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.kind, f)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum ParseErrorKind {
    Empty,
    InvalidDigit,
    TooLong,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "cannot parse integer from empty string"),
            Self::InvalidDigit => write!(f, "invalid digit found in string"),
            Self::TooLong => write!(f, "number too large to fit in a bignum"),
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use super::*;

    fn convert(v: f64, mode: DtoaMode, n: usize) -> (String, i32, bool) {
        let mut buf = DtoaBuffer::new();
        dtoa(v, mode, n, &mut buf).unwrap();
        (
            buf.raw_digits().to_owned(),
            buf.decimal_point(),
            buf.is_negative(),
        )
    }

    fn triple(digits: &str, point: i32, negative: bool) -> (String, i32, bool) {
        (digits.to_owned(), point, negative)
    }

    /// Splits Rust's `{:e}` output into digits and a decimal
    /// point.
    fn from_exp(s: &str) -> (String, i32) {
        let (mantissa, exp) = s.split_once('e').unwrap();
        let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
        let exp: i32 = exp.parse().unwrap();
        (digits, exp + 1)
    }

    /// Reports whether the exact digits `exact` are a tie when
    /// rounded to `keep` digits: a 5 followed only by zeros.
    ///
    /// Rust's formatter rounds such ties to even, while the
    /// counted modes of `dtoa` round them away from zero.
    fn is_tie(exact: &str, keep: usize) -> bool {
        match exact.as_bytes().get(keep..) {
            Some([b'5', rest @ ..]) => rest.iter().all(|&d| d == b'0'),
            _ => false,
        }
    }

    #[test]
    fn test_errors() {
        let mut buf = DtoaBuffer::new();
        for v in [f64::INFINITY, f64::NEG_INFINITY, f64::NAN] {
            let err = dtoa(v, DtoaMode::Shortest, 0, &mut buf).unwrap_err();
            assert_eq!(err, DtoaError::non_finite());
        }
        assert_eq!(
            dtoa(1.0, DtoaMode::Fixed, MAX_FIXED_DIGITS + 1, &mut buf),
            Err(DtoaError::too_many_digits())
        );
        assert_eq!(
            dtoa(1.0, DtoaMode::Precision, MAX_PRECISION_DIGITS + 1, &mut buf),
            Err(DtoaError::too_many_digits())
        );
        assert!(dtoa(1.0, DtoaMode::Shortest, usize::MAX, &mut buf).is_ok());
        assert_eq!(
            DtoaError::non_finite().to_string(),
            "cannot convert infinity or NaN to digits"
        );
        assert_eq!(
            ParseBignumError::too_long().to_string(),
            "number too large to fit in a bignum"
        );
    }

    #[test]
    fn test_zero_and_sign() {
        assert_eq!(convert(0.0, DtoaMode::Shortest, 0), triple("0", 1, false));
        assert_eq!(convert(-0.0, DtoaMode::Shortest, 0), triple("0", 1, true));
        assert_eq!(convert(0.0, DtoaMode::Fixed, 3), triple("0", 1, false));
        assert_eq!(convert(0.0, DtoaMode::Precision, 3), triple("0", 1, false));
        assert_eq!(convert(0.0, DtoaMode::Precision, 0), triple("", 0, false));
        assert_eq!(convert(-1.5, DtoaMode::Shortest, 0), triple("15", 1, true));
        assert_eq!(convert(-1.5, DtoaMode::Precision, 0), triple("", 0, true));
    }

    #[test]
    fn test_buffer_is_reset() {
        let mut buf = DtoaBuffer::new();
        dtoa(-123.456, DtoaMode::Shortest, 0, &mut buf).unwrap();
        assert!(buf.is_negative());
        dtoa(7.0, DtoaMode::Shortest, 0, &mut buf).unwrap();
        assert_eq!(buf.raw_digits(), "7");
        assert_eq!(buf.decimal_point(), 1);
        assert!(!buf.is_negative());
    }

    #[test]
    fn test_shortest() {
        assert_eq!(convert(1.5, DtoaMode::Shortest, 0), triple("15", 1, false));
        assert_eq!(convert(0.1, DtoaMode::Shortest, 0), triple("1", 0, false));
        assert_eq!(convert(1e23, DtoaMode::Shortest, 0), triple("1", 24, false));
        // The fast path gives up on this one.
        assert_eq!(
            convert(3.5844466002796428e+298, DtoaMode::Shortest, 0),
            triple("35844466002796428", 299, false)
        );
        assert_eq!(convert(5e-324, DtoaMode::Shortest, 0), triple("5", -323, false));
    }

    #[test]
    fn test_fixed() {
        assert_eq!(convert(0.001, DtoaMode::Fixed, 10), triple("1", -2, false));
        assert_eq!(convert(0.001, DtoaMode::Fixed, 1), triple("", -1, false));
        assert_eq!(convert(1.0, DtoaMode::Fixed, 3), triple("1", 1, false));
        assert_eq!(convert(0.5, DtoaMode::Fixed, 0), triple("1", 1, false));
        // Beyond the fast path: too many digits and too large.
        assert_eq!(
            convert(0.1, DtoaMode::Fixed, 30),
            triple("100000000000000005551115123126", 0, false)
        );
        assert_eq!(convert(1e22, DtoaMode::Fixed, 2), triple("1", 23, false));
        assert_eq!(convert(1e-30, DtoaMode::Fixed, 30), triple("1", -29, false));
        assert_eq!(convert(5e-324, DtoaMode::Fixed, 100), triple("", -100, false));
    }

    #[test]
    fn test_precision() {
        assert_eq!(convert(1.5, DtoaMode::Precision, 10), triple("1500000000", 1, false));
        assert_eq!(convert(1.0, DtoaMode::Precision, 3), triple("100", 1, false));
        assert_eq!(convert(-2.5, DtoaMode::Precision, 1), triple("3", 1, true));
        let digits = convert(5e-324, DtoaMode::Precision, MAX_PRECISION_DIGITS).0;
        assert_eq!(digits.len(), MAX_PRECISION_DIGITS);
        assert!(digits.starts_with("4940656458412465441765687928682213723650"));
    }

    #[test]
    fn test_shortest_round_trips() {
        let mut rng = StdRng::seed_from_u64(0x0d0b_1e5);
        let mut buf = DtoaBuffer::new();
        for _ in 0..20_000 {
            let v = f64::from_bits(rng.gen::<u64>());
            if !v.is_finite() {
                continue;
            }
            dtoa(v, DtoaMode::Shortest, 0, &mut buf).unwrap();
            let s = format!(
                "{}0.{}e{}",
                if buf.is_negative() { "-" } else { "" },
                buf.raw_digits(),
                buf.decimal_point()
            );
            let got: f64 = s.parse().unwrap();
            assert_eq!(got.to_bits(), v.to_bits(), "{v:e} -> {s}");

            // Rust's formatter also prints the shortest digits, but
            // may pick the other neighbor when the value is exactly
            // halfway between two shortest candidates.
            let got = (buf.raw_digits().to_owned(), buf.decimal_point());
            let want = from_exp(&format!("{:e}", v.abs()));
            if got != want {
                let (exact, _) = from_exp(&format!("{:.*e}", 1100, v.abs()));
                assert_eq!(got.0.len(), want.0.len(), "{v:e}");
                assert!(is_tie(&exact, got.0.len()), "{v:e}: {got:?} != {want:?}");
            }
        }
    }

    #[test]
    fn test_shortest_exact_tie() {
        // -20839635781001.8125 lies exactly halfway between the
        // two 17 digit candidates; both read back as the input.
        let v = -2.0839635781001813e13;
        assert_eq!(convert(v, DtoaMode::Shortest, 0), triple("20839635781001812", 14, true));
        assert_eq!("-20839635781001.812".parse::<f64>().unwrap(), v);
        assert!(is_tie(&from_exp(&format!("{:.*e}", 40, v.abs())).0, 17));
    }

    #[test]
    fn test_precision_matches_formatter() {
        let mut rng = StdRng::seed_from_u64(0x9e37_79b9);
        let mut buf = DtoaBuffer::new();
        for _ in 0..5_000 {
            let v = f64::from_bits(rng.gen::<u64>() >> 1);
            if !v.is_finite() || v == 0.0 {
                continue;
            }
            let n = rng.gen_range(1..=40);
            dtoa(v, DtoaMode::Precision, n, &mut buf).unwrap();
            assert_eq!(buf.len(), n);

            // Skip exact ties, which the formatter rounds to even.
            let exact = from_exp(&format!("{:.*e}", 800, v)).0;
            if is_tie(&exact, n) {
                continue;
            }
            let want = from_exp(&format!("{:.*e}", n - 1, v));
            assert_eq!(
                (buf.raw_digits().to_owned(), buf.decimal_point()),
                want,
                "{v:e} with {n} digits"
            );
        }
    }

    #[test]
    fn test_fixed_matches_formatter() {
        let mut rng = StdRng::seed_from_u64(0xf1ed);
        let mut buf = DtoaBuffer::new();
        for _ in 0..5_000 {
            let exp = rng.gen_range(-30..30);
            let v = rng.gen::<f64>() * 10f64.powi(exp);
            if v == 0.0 {
                continue;
            }
            let n = rng.gen_range(0..=40);
            dtoa(v, DtoaMode::Fixed, n, &mut buf).unwrap();

            let exact = format!("{:.*}", 1100, v);
            let (_, frac) = exact.split_once('.').unwrap();
            if is_tie(frac, n) {
                continue;
            }
            // The formatted value is `all * 10^-n`.
            let s = format!("{:.*}", n, v);
            let all: String = s.chars().filter(char::is_ascii_digit).collect();
            let trimmed = all.trim_start_matches('0');
            let point = to_i32(trimmed.len()) - to_i32(n);
            let digits = trimmed.trim_end_matches('0');
            assert_eq!(buf.raw_digits(), digits, "{v:e} with {n} digits");
            assert_eq!(buf.decimal_point(), point, "{v:e} with {n} digits");
        }
    }
}
