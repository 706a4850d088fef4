//! "Do it yourself" floating point.

use core::{fmt, ops};

/// An unsigned 64-bit significand and a binary exponent,
/// representing `f * 2^e`.
///
/// Unlike a [`f64`], a `DiyFp` has no hidden bit, no special
/// values and no rounding on construction. It is an exact
/// intermediate form: only [`multiply`][Self::multiply] rounds.
#[derive(Copy, Clone, Default, Eq, PartialEq)]
pub struct DiyFp {
    f: u64,
    e: i32,
}

impl DiyFp {
    /// The number of bits in the significand.
    pub const SIGNIFICAND_SIZE: i32 = 64;

    const UINT64_MSB: u64 = 1 << 63;

    /// Creates `f * 2^e`.
    pub const fn new(f: u64, e: i32) -> Self {
        Self { f, e }
    }

    /// Returns the significand.
    pub const fn f(self) -> u64 {
        self.f
    }

    /// Returns the binary exponent.
    pub const fn e(self) -> i32 {
        self.e
    }

    /// Subtracts `other` from `self`.
    ///
    /// Both values must have the same exponent and `self.f()`
    /// must be at least `other.f()`. The result is exact.
    pub fn subtract(&mut self, other: Self) {
        *self = Self::minus(*self, other);
    }

    /// Returns `a - b`.
    ///
    /// See [`subtract`][Self::subtract].
    pub const fn minus(a: Self, b: Self) -> Self {
        debug_assert!(a.e == b.e);
        debug_assert!(a.f >= b.f);

        Self::new(a.f - b.f, a.e)
    }

    /// Multiplies `self` by `other`.
    ///
    /// Only the upper 64 bits of the 128-bit product are kept
    /// and the result is rounded half up, so the error is at
    /// most half a unit in the last place.
    pub fn multiply(&mut self, other: Self) {
        *self = Self::times(*self, other);
    }

    /// Returns `a * b`.
    ///
    /// See [`multiply`][Self::multiply].
    pub const fn times(a: Self, b: Self) -> Self {
        let product = (a.f as u128) * (b.f as u128);
        // Round half up. The sum cannot overflow because the
        // product is at most (2^64-1)^2.
        let f = ((product + (1 << 63)) >> 64) as u64;
        Self::new(f, a.e + b.e + Self::SIGNIFICAND_SIZE)
    }

    /// Shifts the significand left until its most significant
    /// bit is set, adjusting the exponent to match.
    ///
    /// The significand must be non-zero.
    pub fn normalize(&mut self) {
        *self = self.normalized();
    }

    /// Returns the normalized form of `self`.
    ///
    /// See [`normalize`][Self::normalize].
    pub const fn normalized(self) -> Self {
        debug_assert!(self.f != 0);

        let shift = self.f.leading_zeros();
        Self::new(self.f << shift, self.e - shift as i32)
    }

    /// Reports whether the most significant bit of the
    /// significand is set.
    pub const fn is_normalized(self) -> bool {
        self.f & Self::UINT64_MSB != 0
    }
}

impl ops::Sub for DiyFp {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::minus(self, rhs)
    }
}

impl ops::SubAssign for DiyFp {
    fn sub_assign(&mut self, rhs: Self) {
        self.subtract(rhs);
    }
}

impl ops::Mul for DiyFp {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::times(self, rhs)
    }
}

impl ops::MulAssign for DiyFp {
    fn mul_assign(&mut self, rhs: Self) {
        self.multiply(rhs);
    }
}

impl fmt::Debug for DiyFp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}p{}", self.f, self.e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subtract() {
        let mut a = DiyFp::new(3, 0);
        let b = DiyFp::new(1, 0);
        let diff = DiyFp::minus(a, b);
        assert_eq!(diff.f(), 2);
        assert_eq!(diff.e(), 0);

        a.subtract(b);
        assert_eq!(a, diff);
        assert_eq!(a - DiyFp::new(2, 0), DiyFp::new(0, 0));
    }

    #[test]
    fn test_multiply() {
        let a = DiyFp::new(3, 0);
        let b = DiyFp::new(2, 0);
        let mut product = DiyFp::times(a, b);
        assert_eq!(product, DiyFp::new(0, 64));

        let mut a = DiyFp::new(0x8000_0000_0000_0000, 11);
        a.multiply(DiyFp::new(2, 13));
        assert_eq!(a, DiyFp::new(1, 88));

        // Rounds half up.
        let a = DiyFp::new(0x8000_0000_0000_0001, 11);
        let b = DiyFp::new(1, 13);
        assert_eq!(a * b, DiyFp::new(1, 88));

        // Just below half.
        let a = DiyFp::new(0x7fff_ffff_ffff_ffff, 11);
        let b = DiyFp::new(1, 13);
        assert_eq!(a * b, DiyFp::new(0, 88));

        let a = DiyFp::new(u64::MAX, 11);
        let b = DiyFp::new(u64::MAX, 13);
        // (2^64-1)^2 = 2^128 - 2^65 + 1
        assert_eq!(a * b, DiyFp::new(0xffff_ffff_ffff_fffe, 88));

        product *= DiyFp::new(u64::MAX, 1);
        assert_eq!(product, DiyFp::new(0, 129));
    }

    #[test]
    fn test_multiply_matches_split_product() {
        // Four 32x32-bit partial products.
        fn split_times(a: DiyFp, b: DiyFp) -> DiyFp {
            const M32: u64 = 0xffff_ffff;
            let (a, b) = (a.f(), b.f());
            let (ah, al) = (a >> 32, a & M32);
            let (bh, bl) = (b >> 32, b & M32);
            let ac = ah * bh;
            let bc = al * bh;
            let ad = ah * bl;
            let bd = al * bl;
            let mut tmp = (bd >> 32) + (ad & M32) + (bc & M32);
            tmp += 1 << 31;
            DiyFp::new(ac + (ad >> 32) + (bc >> 32) + (tmp >> 32), 0)
        }

        let mut x: u64 = 0x9e37_79b9_7f4a_7c15;
        for _ in 0..10_000 {
            x ^= x << 13;
            x ^= x >> 7;
            x ^= x << 17;
            let a = DiyFp::new(x, 0);
            let b = DiyFp::new(x.rotate_left(29) ^ 0xdead_beef, 0);
            assert_eq!((a * b).f(), split_times(a, b).f(), "{a:?} * {b:?}");
        }
    }

    #[test]
    fn test_normalize() {
        let mut v = DiyFp::new(1, 0);
        v.normalize();
        assert_eq!(v, DiyFp::new(1 << 63, -63));
        assert!(v.is_normalized());

        let v = DiyFp::new(0x0010_0000_0000_0000, -1074).normalized();
        assert_eq!(v, DiyFp::new(0x8000_0000_0000_0000, -1085));

        let v = DiyFp::new(u64::MAX, 5);
        assert_eq!(v.normalized(), v);
    }
}
