//! IEEE 754 binary64 decomposition.

use core::fmt;

use super::diyfp::DiyFp;

/// A view of the bits of a [`f64`].
///
/// Every method is a total function over the 64-bit input
/// domain. Methods that produce a [`DiyFp`] are only
/// meaningful for finite, non-negative values.
#[derive(Copy, Clone, Default, Eq, PartialEq)]
pub struct Double(u64);

impl Double {
    const SIGN_MASK: u64 = 0x8000_0000_0000_0000;
    const EXPONENT_MASK: u64 = 0x7ff0_0000_0000_0000;
    const SIGNIFICAND_MASK: u64 = 0x000f_ffff_ffff_ffff;
    const HIDDEN_BIT: u64 = 0x0010_0000_0000_0000;
    const EXPONENT_BIAS: i32 = 0x3ff + Self::PHYSICAL_SIGNIFICAND_SIZE;
    const DENORMAL_EXPONENT: i32 = -Self::EXPONENT_BIAS + 1;

    /// The number of significand bits stored in the encoding.
    pub const PHYSICAL_SIGNIFICAND_SIZE: i32 = 52;

    /// The number of significand bits, including the hidden
    /// bit.
    pub const SIGNIFICAND_SIZE: i32 = 53;

    /// Positive infinity.
    pub const INFINITY: Self = Self(0x7ff0_0000_0000_0000);

    /// A quiet NaN.
    pub const NAN: Self = Self(0x7ff8_0000_0000_0000);

    /// Creates a `Double` from a [`f64`].
    pub const fn new(v: f64) -> Self {
        Self(v.to_bits())
    }

    /// Creates a `Double` from its raw bit pattern.
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    /// Returns the raw bit pattern.
    pub const fn to_bits(self) -> u64 {
        self.0
    }

    /// Returns the value as a [`f64`].
    pub const fn value(self) -> f64 {
        f64::from_bits(self.0)
    }

    /// Returns the value as an exact [`DiyFp`].
    ///
    /// The value must be finite and non-negative.
    pub const fn as_diy_fp(self) -> DiyFp {
        debug_assert!(self.sign() > 0);
        debug_assert!(!self.is_special());

        DiyFp::new(self.significand(), self.exponent())
    }

    /// Returns the value as a normalized [`DiyFp`].
    ///
    /// The value must be finite and positive.
    pub const fn as_normalized_diy_fp(self) -> DiyFp {
        debug_assert!(self.sign() > 0 && !self.is_zero());

        self.as_diy_fp().normalized()
    }

    /// Returns the binary exponent of the least significant
    /// bit of the significand.
    ///
    /// Denormals (and zero) report the minimum exponent,
    /// -1074.
    pub const fn exponent(self) -> i32 {
        if self.is_denormal() {
            return Self::DENORMAL_EXPONENT;
        }
        let biased = ((self.0 & Self::EXPONENT_MASK) >> Self::PHYSICAL_SIGNIFICAND_SIZE) as i32;
        biased - Self::EXPONENT_BIAS
    }

    /// Returns the significand, including the hidden bit for
    /// normal values.
    pub const fn significand(self) -> u64 {
        let significand = self.0 & Self::SIGNIFICAND_MASK;
        if self.is_denormal() {
            significand
        } else {
            significand + Self::HIDDEN_BIT
        }
    }

    /// Reports whether the value is a denormal or zero.
    pub const fn is_denormal(self) -> bool {
        self.0 & Self::EXPONENT_MASK == 0
    }

    /// Reports whether the value is a NaN or an infinity.
    ///
    /// Denormals are not special.
    pub const fn is_special(self) -> bool {
        self.0 & Self::EXPONENT_MASK == Self::EXPONENT_MASK
    }

    /// Reports whether the value is a NaN.
    pub const fn is_nan(self) -> bool {
        self.is_special() && self.0 & Self::SIGNIFICAND_MASK != 0
    }

    /// Reports whether the value is an infinity.
    pub const fn is_infinite(self) -> bool {
        self.is_special() && self.0 & Self::SIGNIFICAND_MASK == 0
    }

    /// Reports whether the value is `+0.0` or `-0.0`.
    pub const fn is_zero(self) -> bool {
        self.0 & !Self::SIGN_MASK == 0
    }

    /// Returns 1 if the sign bit is clear and -1 otherwise.
    ///
    /// The sign of `-0.0` is -1.
    pub const fn sign(self) -> i32 {
        if self.0 & Self::SIGN_MASK == 0 {
            1
        } else {
            -1
        }
    }

    /// Returns the next representable value in the direction of
    /// positive infinity.
    ///
    /// The next value after `-0.0` is `+0.0`, positive infinity
    /// saturates and NaN is returned unchanged.
    pub const fn next_double(self) -> f64 {
        if self.is_nan() || self.0 == Self::INFINITY.0 {
            return self.value();
        }
        if self.sign() < 0 && self.significand() == 0 {
            // -0.0
            return 0.0;
        }
        if self.sign() < 0 {
            f64::from_bits(self.0 - 1)
        } else {
            f64::from_bits(self.0 + 1)
        }
    }

    /// Returns the next representable value in the direction of
    /// negative infinity.
    ///
    /// The previous value before `+0.0` is `-0.0`, negative
    /// infinity saturates and NaN is returned unchanged.
    pub const fn previous_double(self) -> f64 {
        if self.is_nan() {
            return self.value();
        }
        if self.0 == Self::INFINITY.0 | Self::SIGN_MASK {
            return f64::from_bits(Self::INFINITY.0 | Self::SIGN_MASK);
        }
        if self.sign() < 0 {
            f64::from_bits(self.0 + 1)
        } else if self.significand() == 0 {
            f64::from_bits(Self::SIGN_MASK)
        } else {
            f64::from_bits(self.0 - 1)
        }
    }

    /// Reports whether the lower boundary is closer to the value
    /// than the upper boundary.
    ///
    /// This is the case for powers of two, where the gap to the
    /// previous double is half the gap to the next, except for
    /// the smallest normal value whose predecessor is a denormal
    /// with the same spacing.
    pub const fn lower_boundary_is_closer(self) -> bool {
        let physical_significand_is_zero = self.0 & Self::SIGNIFICAND_MASK == 0;
        physical_significand_is_zero && self.exponent() != Self::DENORMAL_EXPONENT
    }

    /// Returns the boundaries `(m-, m+)` halfway between the value
    /// and its neighbors.
    ///
    /// Both boundaries share the exponent of the normalized
    /// upper boundary, which is also the exponent of
    /// [`as_normalized_diy_fp`][Self::as_normalized_diy_fp].
    ///
    /// The value must be finite and positive.
    pub const fn normalized_boundaries(self) -> (DiyFp, DiyFp) {
        debug_assert!(self.sign() > 0 && !self.is_zero());

        let v = self.as_diy_fp();
        let m_plus = DiyFp::new((v.f() << 1) + 1, v.e() - 1).normalized();
        let m_minus = if self.lower_boundary_is_closer() {
            DiyFp::new((v.f() << 2) - 1, v.e() - 2)
        } else {
            DiyFp::new((v.f() << 1) - 1, v.e() - 1)
        };
        let m_minus = DiyFp::new(
            m_minus.f() << (m_minus.e() - m_plus.e()) as u32,
            m_plus.e(),
        );
        (m_minus, m_plus)
    }
}

impl From<f64> for Double {
    fn from(v: f64) -> Self {
        Self::new(v)
    }
}

impl fmt::Debug for Double {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Double")
            .field("bits", &format_args!("{:#018x}", self.0))
            .field("value", &self.value())
            .finish()
    }
}
