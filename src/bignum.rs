//! Fixed-capacity arbitrary precision unsigned integers.
//!
//! A [`Bignum`] is large enough for every intermediate value the
//! conversions in this crate create, and no larger. Exceeding its
//! capacity is a bug in the caller and panics.

// Indices are bounded by `used` and `used + exponent`, which
// `ensure_capacity` keeps within `CAPACITY`.
#![allow(clippy::indexing_slicing)]

use core::{cmp::Ordering, fmt};

use super::{conv::ParseBignumError, util::const_assert};

type Chunk = u32;
type DoubleChunk = u64;

const CHUNK_SIZE: u32 = Chunk::BITS;
const DOUBLE_CHUNK_SIZE: u32 = DoubleChunk::BITS;

/// The number of bits in a bigit.
///
/// Leaving headroom in each 32-bit chunk lets multiplication
/// accumulate carries without overflowing a `u64`.
const BIGIT_SIZE: u32 = 28;
const BIGIT_MASK: Chunk = (1 << BIGIT_SIZE) - 1;

/// The largest number a `Bignum` must hold, in bits.
///
/// `f64::MAX` times `10^309`-ish scaling, plus some slack.
const MAX_SIGNIFICANT_BITS: usize = 3584;

const HEX_CHARS_PER_BIGIT: usize = BIGIT_SIZE as usize / 4;

const_assert!(DOUBLE_CHUNK_SIZE >= 2 * BIGIT_SIZE + 8);

/// An arbitrary precision unsigned integer with a fixed
/// capacity.
///
/// The value is `sum(bigits[i] * 2^(28 * (i + exponent)))`: the
/// `exponent` low bigits are implicit zeros, so shifting left
/// by whole bigits is free.
#[derive(Clone)]
pub struct Bignum {
    bigits: [Chunk; Self::CAPACITY],
    /// The number of bigits in use. Bigits at or above `used`
    /// are zero.
    used: usize,
    /// The number of implicit zero bigits below `bigits[0]`.
    exponent: usize,
}

impl Bignum {
    /// The number of bigits a `Bignum` can hold.
    pub const CAPACITY: usize = MAX_SIGNIFICANT_BITS / BIGIT_SIZE as usize;

    /// The longest decimal string
    /// [`assign_decimal_string`][Self::assign_decimal_string]
    /// accepts.
    pub const MAX_DECIMAL_DIGITS: usize = (Self::CAPACITY - 4) * BIGIT_SIZE as usize * 3 / 10;

    /// The longest hexadecimal string
    /// [`assign_hex_string`][Self::assign_hex_string] accepts.
    pub const MAX_HEX_DIGITS: usize = (Self::CAPACITY - 1) * HEX_CHARS_PER_BIGIT;

    /// Creates a `Bignum` with the value zero.
    pub const fn new() -> Self {
        Self {
            bigits: [0; Self::CAPACITY],
            used: 0,
            exponent: 0,
        }
    }

    /// Sets `self` to `value`.
    pub fn assign_u16(&mut self, value: u16) {
        self.zero();
        if value == 0 {
            return;
        }
        self.bigits[0] = Chunk::from(value);
        self.used = 1;
    }

    /// Sets `self` to `value`.
    pub fn assign_u64(&mut self, mut value: u64) {
        self.zero();
        while value != 0 {
            self.bigits[self.used] = (value & u64::from(BIGIT_MASK)) as Chunk;
            self.used += 1;
            value >>= BIGIT_SIZE;
        }
    }

    /// Sets `self` to `other`.
    pub fn assign_bignum(&mut self, other: &Self) {
        self.exponent = other.exponent;
        self.bigits[..other.used].copy_from_slice(&other.bigits[..other.used]);
        if self.used > other.used {
            self.bigits[other.used..self.used].fill(0);
        }
        self.used = other.used;
    }

    /// Sets `self` to the decimal number `s`.
    ///
    /// `s` must be a non-empty string of ASCII digits no longer
    /// than [`MAX_DECIMAL_DIGITS`][Self::MAX_DECIMAL_DIGITS].
    /// On error `self` is zero.
    pub fn assign_decimal_string(&mut self, s: &str) -> Result<(), ParseBignumError> {
        // 10^19 < 2^64.
        const MAX_U64_DECIMAL_DIGITS: usize = 19;

        self.zero();
        let s = s.as_bytes();
        if s.is_empty() {
            return Err(ParseBignumError::empty());
        }
        if !s.iter().all(u8::is_ascii_digit) {
            return Err(ParseBignumError::invalid_digit());
        }
        if s.len() > Self::MAX_DECIMAL_DIGITS {
            return Err(ParseBignumError::too_long());
        }

        for chunk in s.chunks(MAX_U64_DECIMAL_DIGITS) {
            let digits = chunk
                .iter()
                .fold(0u64, |acc, &d| acc * 10 + u64::from(d - b'0'));
            self.multiply_by_power_of_ten(chunk.len());
            self.add_u64(digits);
        }
        self.clamp();
        Ok(())
    }

    /// Sets `self` to the hexadecimal number `s`.
    ///
    /// Both upper and lower case digits are accepted. `s` must
    /// be non-empty and no longer than
    /// [`MAX_HEX_DIGITS`][Self::MAX_HEX_DIGITS]. On error `self`
    /// is zero.
    pub fn assign_hex_string(&mut self, s: &str) -> Result<(), ParseBignumError> {
        self.zero();
        let s = s.as_bytes();
        if s.is_empty() {
            return Err(ParseBignumError::empty());
        }
        if !s.iter().all(u8::is_ascii_hexdigit) {
            return Err(ParseBignumError::invalid_digit());
        }
        if s.len() > Self::MAX_HEX_DIGITS {
            return Err(ParseBignumError::too_long());
        }

        let mut tmp: DoubleChunk = 0;
        let mut bits = 0;
        for &c in s.iter().rev() {
            tmp |= DoubleChunk::from(hex_char_value(c)) << bits;
            bits += 4;
            if bits >= BIGIT_SIZE {
                self.bigits[self.used] = (tmp & DoubleChunk::from(BIGIT_MASK)) as Chunk;
                self.used += 1;
                bits -= BIGIT_SIZE;
                tmp >>= BIGIT_SIZE;
            }
        }
        if tmp > 0 {
            self.bigits[self.used] = tmp as Chunk;
            self.used += 1;
        }
        self.clamp();
        Ok(())
    }

    /// Sets `self` to `base^power_exponent`.
    ///
    /// # Panics
    ///
    /// Panics if the result does not fit.
    pub fn assign_power_u16(&mut self, base: u16, power_exponent: usize) {
        debug_assert!(base != 0);

        if power_exponent == 0 {
            self.assign_u16(1);
            return;
        }
        self.zero();

        // Factor out the powers of two and apply them as a
        // single shift at the end.
        let shifts = base.trailing_zeros() as usize;
        let base = base >> shifts;
        let bit_size = u16::BITS - base.leading_zeros();
        let final_size = bit_size as usize * power_exponent;
        self.ensure_capacity(final_size / BIGIT_SIZE as usize + 2);

        // Left to right exponentiation. `mask` starts at the bit
        // below the most significant one-bit of the exponent.
        let mut mask = 1usize << (usize::BITS - 1 - power_exponent.leading_zeros());
        mask >>= 1;

        // Square in a u64 while the value is small.
        let base = u64::from(base);
        let mut this_value = base;
        let mut delayed_multiplication = false;
        const MAX_32_BITS: u64 = 0xffff_ffff;
        while mask != 0 && this_value <= MAX_32_BITS {
            this_value *= this_value;
            if power_exponent & mask != 0 {
                let base_bits_mask = !((1u64 << (64 - bit_size)) - 1);
                if this_value & base_bits_mask == 0 {
                    this_value *= base;
                } else {
                    delayed_multiplication = true;
                }
            }
            mask >>= 1;
        }
        self.assign_u64(this_value);
        if delayed_multiplication {
            self.multiply_by_u32(base as u32);
        }

        // The rest in the bignum.
        while mask != 0 {
            self.square();
            if power_exponent & mask != 0 {
                self.multiply_by_u32(base as u32);
            }
            mask >>= 1;
        }

        self.shift_left(shifts * power_exponent);
    }

    /// Adds `operand` to `self`.
    pub fn add_u64(&mut self, operand: u64) {
        if operand == 0 {
            return;
        }
        let mut other = Self::new();
        other.assign_u64(operand);
        self.add_bignum(&other);
    }

    /// Adds `other` to `self`.
    ///
    /// # Panics
    ///
    /// Panics if the result does not fit.
    pub fn add_bignum(&mut self, other: &Self) {
        debug_assert!(self.is_clamped());
        debug_assert!(other.is_clamped());

        self.align(other);
        // One extra bigit for the carry.
        self.ensure_capacity(1 + self.bigit_length().max(other.bigit_length()) - self.exponent);

        let mut carry: Chunk = 0;
        let mut bigit_pos = other.exponent - self.exponent;
        for &bigit in &other.bigits[..other.used] {
            let sum = self.bigits[bigit_pos] + bigit + carry;
            self.bigits[bigit_pos] = sum & BIGIT_MASK;
            carry = sum >> BIGIT_SIZE;
            bigit_pos += 1;
        }
        while carry != 0 {
            let sum = self.bigits[bigit_pos] + carry;
            self.bigits[bigit_pos] = sum & BIGIT_MASK;
            carry = sum >> BIGIT_SIZE;
            bigit_pos += 1;
        }
        self.used = self.used.max(bigit_pos);
        debug_assert!(self.is_clamped());
    }

    /// Subtracts `other` from `self`.
    ///
    /// `other` must not be greater than `self`.
    pub fn subtract_bignum(&mut self, other: &Self) {
        debug_assert!(self.is_clamped());
        debug_assert!(other.is_clamped());
        debug_assert!(Self::less_equal(other, self));

        self.align(other);

        let offset = other.exponent - self.exponent;
        let mut borrow: Chunk = 0;
        let mut i = 0;
        while i < other.used {
            let difference = self.bigits[i + offset]
                .wrapping_sub(other.bigits[i])
                .wrapping_sub(borrow);
            self.bigits[i + offset] = difference & BIGIT_MASK;
            borrow = difference >> (CHUNK_SIZE - 1);
            i += 1;
        }
        while borrow != 0 {
            let difference = self.bigits[i + offset].wrapping_sub(borrow);
            self.bigits[i + offset] = difference & BIGIT_MASK;
            borrow = difference >> (CHUNK_SIZE - 1);
            i += 1;
        }
        self.clamp();
    }

    /// Multiplies `self` by `2^shift_amount`.
    ///
    /// # Panics
    ///
    /// Panics if the result does not fit.
    pub fn shift_left(&mut self, shift_amount: usize) {
        if self.used == 0 {
            return;
        }
        self.exponent += shift_amount / BIGIT_SIZE as usize;
        let local_shift = (shift_amount % BIGIT_SIZE as usize) as u32;
        self.ensure_capacity(self.used + 1);
        self.bigits_shift_left(local_shift);
    }

    /// Multiplies `self` by `factor`.
    ///
    /// # Panics
    ///
    /// Panics if the result does not fit.
    pub fn multiply_by_u32(&mut self, factor: u32) {
        if factor == 1 {
            return;
        }
        if factor == 0 {
            self.zero();
            return;
        }
        if self.used == 0 {
            return;
        }
        // A bigit times a u32 plus the carry fits in 60 bits.
        let mut carry: DoubleChunk = 0;
        for bigit in &mut self.bigits[..self.used] {
            let product = DoubleChunk::from(factor) * DoubleChunk::from(*bigit) + carry;
            *bigit = (product & DoubleChunk::from(BIGIT_MASK)) as Chunk;
            carry = product >> BIGIT_SIZE;
        }
        while carry != 0 {
            self.ensure_capacity(self.used + 1);
            self.bigits[self.used] = (carry & DoubleChunk::from(BIGIT_MASK)) as Chunk;
            self.used += 1;
            carry >>= BIGIT_SIZE;
        }
    }

    /// Multiplies `self` by `factor`.
    ///
    /// # Panics
    ///
    /// Panics if the result does not fit.
    pub fn multiply_by_u64(&mut self, factor: u64) {
        if factor == 1 {
            return;
        }
        if factor == 0 {
            self.zero();
            return;
        }
        if self.used == 0 {
            return;
        }
        let mut carry: u128 = 0;
        for bigit in &mut self.bigits[..self.used] {
            let product = u128::from(factor) * u128::from(*bigit) + carry;
            *bigit = (product & u128::from(BIGIT_MASK)) as Chunk;
            carry = product >> BIGIT_SIZE;
        }
        while carry != 0 {
            self.ensure_capacity(self.used + 1);
            self.bigits[self.used] = (carry & u128::from(BIGIT_MASK)) as Chunk;
            self.used += 1;
            carry >>= BIGIT_SIZE;
        }
    }

    /// Multiplies `self` by `10^exponent`.
    ///
    /// # Panics
    ///
    /// Panics if the result does not fit.
    pub fn multiply_by_power_of_ten(&mut self, exponent: usize) {
        const FIVE_27: u64 = 0x6765_c793_fa10_079d;
        const FIVE_1: u32 = 5;
        const FIVE_2: u32 = FIVE_1 * 5;
        const FIVE_3: u32 = FIVE_2 * 5;
        const FIVE_4: u32 = FIVE_3 * 5;
        const FIVE_5: u32 = FIVE_4 * 5;
        const FIVE_6: u32 = FIVE_5 * 5;
        const FIVE_7: u32 = FIVE_6 * 5;
        const FIVE_8: u32 = FIVE_7 * 5;
        const FIVE_9: u32 = FIVE_8 * 5;
        const FIVE_10: u32 = FIVE_9 * 5;
        const FIVE_11: u32 = FIVE_10 * 5;
        const FIVE_12: u32 = FIVE_11 * 5;
        const FIVE_13: u32 = FIVE_12 * 5;
        const FIVE_1_TO_12: [u32; 12] = [
            FIVE_1, FIVE_2, FIVE_3, FIVE_4, FIVE_5, FIVE_6, FIVE_7, FIVE_8, FIVE_9, FIVE_10,
            FIVE_11, FIVE_12,
        ];

        if exponent == 0 {
            return;
        }
        if self.used == 0 {
            return;
        }
        // 10^n = 5^n * 2^n.
        let mut remaining = exponent;
        while remaining >= 27 {
            self.multiply_by_u64(FIVE_27);
            remaining -= 27;
        }
        while remaining >= 13 {
            self.multiply_by_u32(FIVE_13);
            remaining -= 13;
        }
        if remaining > 0 {
            self.multiply_by_u32(FIVE_1_TO_12[remaining - 1]);
        }
        self.shift_left(exponent);
    }

    /// Multiplies `self` by 10.
    pub fn times_10(&mut self) {
        self.multiply_by_u32(10);
    }

    /// Squares `self`.
    ///
    /// # Panics
    ///
    /// Panics if the result does not fit.
    pub fn square(&mut self) {
        debug_assert!(self.is_clamped());

        let product_length = 2 * self.used;
        self.ensure_capacity(product_length);

        // Comba: column i is the sum of bigits[j] * bigits[i - j].
        // A column sums at most `used` products of 56 bits each.
        debug_assert!(self.used < 1 << (2 * (CHUNK_SIZE - BIGIT_SIZE)));

        let used = self.used;
        // The input moves above the output area.
        let copy_offset = used;
        self.bigits.copy_within(..used, copy_offset);

        let mut accumulator: DoubleChunk = 0;
        for i in 0..used {
            for (index1, index2) in (0..=i).rev().zip(0..) {
                let chunk1 = self.bigits[copy_offset + index1];
                let chunk2 = self.bigits[copy_offset + index2];
                accumulator += DoubleChunk::from(chunk1) * DoubleChunk::from(chunk2);
            }
            self.bigits[i] = (accumulator as Chunk) & BIGIT_MASK;
            accumulator >>= BIGIT_SIZE;
        }
        for i in used..product_length {
            let first = i - (used - 1);
            for (index1, index2) in (0..used).rev().zip(first..used) {
                let chunk1 = self.bigits[copy_offset + index1];
                let chunk2 = self.bigits[copy_offset + index2];
                accumulator += DoubleChunk::from(chunk1) * DoubleChunk::from(chunk2);
            }
            self.bigits[i] = (accumulator as Chunk) & BIGIT_MASK;
            accumulator >>= BIGIT_SIZE;
        }
        debug_assert_eq!(accumulator, 0);

        self.used = product_length;
        self.exponent *= 2;
        self.clamp();
    }

    /// Divides `self` by `other`, leaving the remainder in `self`
    /// and returning the quotient.
    ///
    /// The quotient must fit in a `u16`. This is the case when
    /// `self < other * 2^16` and the most significant bigit of
    /// `other` holds at least 24 bits whenever `self` has more
    /// bigits than `other`. Digit generation keeps `self` below
    /// `10 * other`.
    pub fn divide_modulo_int_bignum(&mut self, other: &Self) -> u16 {
        debug_assert!(self.is_clamped());
        debug_assert!(other.is_clamped());
        debug_assert!(other.used > 0);

        if self.bigit_length() < other.bigit_length() {
            return 0;
        }

        self.align(other);

        let mut result: u16 = 0;

        // Subtract multiples of `other` until the lengths match.
        // The top bigit of `self` is then the quotient estimate.
        while self.bigit_length() > other.bigit_length() {
            debug_assert!(other.bigits[other.used - 1] >= (1 << BIGIT_SIZE) / 16);
            debug_assert!(self.bigits[self.used - 1] < 0x10000);
            let top = self.bigits[self.used - 1];
            result += top as u16;
            self.subtract_times(other, top);
        }

        debug_assert_eq!(self.bigit_length(), other.bigit_length());

        let this_bigit = self.bigits[self.used - 1];
        let other_bigit = other.bigits[other.used - 1];

        if other.used == 1 {
            let quotient = this_bigit / other_bigit;
            self.bigits[self.used - 1] = this_bigit - other_bigit * quotient;
            debug_assert!(quotient < 0x10000);
            result += quotient as u16;
            self.clamp();
            return result;
        }

        let division_estimate = this_bigit / (other_bigit + 1);
        debug_assert!(division_estimate < 0x10000);
        result += division_estimate as u16;
        self.subtract_times(other, division_estimate);

        if other_bigit * (division_estimate + 1) > this_bigit {
            // Another subtraction would overshoot even if the
            // lower bigits of `other` were zero.
            return result;
        }

        while Self::less_equal(other, self) {
            self.subtract_bignum(other);
            result += 1;
        }
        result
    }

    /// Returns `a.cmp(b)`.
    pub fn compare(a: &Self, b: &Self) -> Ordering {
        debug_assert!(a.is_clamped());
        debug_assert!(b.is_clamped());

        let bigit_length_a = a.bigit_length();
        let bigit_length_b = b.bigit_length();
        if bigit_length_a < bigit_length_b {
            return Ordering::Less;
        }
        if bigit_length_a > bigit_length_b {
            return Ordering::Greater;
        }
        for i in (a.exponent.min(b.exponent)..bigit_length_a).rev() {
            let bigit_a = a.bigit_at(i);
            let bigit_b = b.bigit_at(i);
            match bigit_a.cmp(&bigit_b) {
                Ordering::Equal => {}
                ord => return ord,
            }
        }
        Ordering::Equal
    }

    /// Reports whether `a == b`.
    pub fn equal(a: &Self, b: &Self) -> bool {
        Self::compare(a, b).is_eq()
    }

    /// Reports whether `a < b`.
    pub fn less(a: &Self, b: &Self) -> bool {
        Self::compare(a, b).is_lt()
    }

    /// Reports whether `a <= b`.
    pub fn less_equal(a: &Self, b: &Self) -> bool {
        Self::compare(a, b).is_le()
    }

    /// Returns `(a + b).cmp(c)` without computing `a + b`.
    pub fn plus_compare(a: &Self, b: &Self, c: &Self) -> Ordering {
        debug_assert!(a.is_clamped());
        debug_assert!(b.is_clamped());
        debug_assert!(c.is_clamped());

        if a.bigit_length() < b.bigit_length() {
            return Self::plus_compare(b, a, c);
        }
        if a.bigit_length() + 1 < c.bigit_length() {
            return Ordering::Less;
        }
        if a.bigit_length() > c.bigit_length() {
            return Ordering::Greater;
        }
        // `b` lies entirely within the implicit zeros of `a`, so
        // the sum has the bigit length of `a`.
        if a.exponent >= b.bigit_length() && a.bigit_length() < c.bigit_length() {
            return Ordering::Less;
        }

        let mut borrow: Chunk = 0;
        // Everything below min_exponent is zero.
        let min_exponent = a.exponent.min(b.exponent).min(c.exponent);
        for i in (min_exponent..c.bigit_length()).rev() {
            let chunk_a = a.bigit_at(i);
            let chunk_b = b.bigit_at(i);
            let chunk_c = c.bigit_at(i);
            let sum = chunk_a + chunk_b;
            if sum > chunk_c + borrow {
                return Ordering::Greater;
            }
            borrow = chunk_c + borrow - sum;
            if borrow > 1 {
                return Ordering::Less;
            }
            borrow <<= BIGIT_SIZE;
        }
        if borrow == 0 {
            Ordering::Equal
        } else {
            Ordering::Less
        }
    }

    /// Reports whether `a + b == c`.
    pub fn plus_equal(a: &Self, b: &Self, c: &Self) -> bool {
        Self::plus_compare(a, b, c).is_eq()
    }

    /// Reports whether `a + b < c`.
    pub fn plus_less(a: &Self, b: &Self, c: &Self) -> bool {
        Self::plus_compare(a, b, c).is_lt()
    }

    /// Reports whether `a + b <= c`.
    pub fn plus_less_equal(a: &Self, b: &Self, c: &Self) -> bool {
        Self::plus_compare(a, b, c).is_le()
    }

    /// Reports whether `self` is zero.
    pub const fn is_zero(&self) -> bool {
        self.used == 0
    }

    /// Removes leading zero bigits.
    fn clamp(&mut self) {
        while self.used > 0 && self.bigits[self.used - 1] == 0 {
            self.used -= 1;
        }
        if self.used == 0 {
            // Zero.
            self.exponent = 0;
        }
    }

    fn is_clamped(&self) -> bool {
        self.used == 0 || self.bigits[self.used - 1] != 0
    }

    fn zero(&mut self) {
        self.bigits[..self.used].fill(0);
        self.used = 0;
        self.exponent = 0;
    }

    /// Returns the number of bigits including the implicit zero
    /// bigits.
    const fn bigit_length(&self) -> usize {
        self.used + self.exponent
    }

    /// Returns the bigit at `index`, counting the implicit zero
    /// bigits.
    fn bigit_at(&self, index: usize) -> Chunk {
        if index >= self.bigit_length() || index < self.exponent {
            return 0;
        }
        self.bigits[index - self.exponent]
    }

    #[track_caller]
    fn ensure_capacity(&self, size: usize) {
        assert!(size <= Self::CAPACITY, "`Bignum` capacity exceeded");
    }

    /// Makes `self.exponent <= other.exponent` by materializing
    /// implicit zero bigits.
    fn align(&mut self, other: &Self) {
        if self.exponent > other.exponent {
            let zero_bigits = self.exponent - other.exponent;
            self.ensure_capacity(self.used + zero_bigits);
            self.bigits.copy_within(..self.used, zero_bigits);
            self.bigits[..zero_bigits].fill(0);
            self.used += zero_bigits;
            self.exponent -= zero_bigits;
            debug_assert!(self.used > 0);
        }
    }

    fn bigits_shift_left(&mut self, shift_amount: u32) {
        debug_assert!(shift_amount < BIGIT_SIZE);

        let mut carry: Chunk = 0;
        for bigit in &mut self.bigits[..self.used] {
            let new_carry = *bigit >> (BIGIT_SIZE - shift_amount);
            *bigit = ((*bigit << shift_amount) + carry) & BIGIT_MASK;
            carry = new_carry;
        }
        if carry != 0 {
            self.bigits[self.used] = carry;
            self.used += 1;
        }
    }

    /// Subtracts `other * factor` from `self`.
    fn subtract_times(&mut self, other: &Self, factor: Chunk) {
        debug_assert!(self.exponent <= other.exponent);

        if factor < 3 {
            for _ in 0..factor {
                self.subtract_bignum(other);
            }
            return;
        }
        let mut borrow: Chunk = 0;
        let exponent_diff = other.exponent - self.exponent;
        for (i, &bigit) in other.bigits[..other.used].iter().enumerate() {
            let product = DoubleChunk::from(factor) * DoubleChunk::from(bigit);
            let remove = DoubleChunk::from(borrow) + product;
            let difference = self.bigits[i + exponent_diff]
                .wrapping_sub((remove & DoubleChunk::from(BIGIT_MASK)) as Chunk);
            self.bigits[i + exponent_diff] = difference & BIGIT_MASK;
            borrow = (difference >> (CHUNK_SIZE - 1)) + (remove >> BIGIT_SIZE) as Chunk;
        }
        for i in other.used + exponent_diff..self.used {
            if borrow == 0 {
                return;
            }
            let difference = self.bigits[i].wrapping_sub(borrow);
            self.bigits[i] = difference & BIGIT_MASK;
            borrow = difference >> (CHUNK_SIZE - 1);
        }
        self.clamp();
    }
}

/// Returns the value of the hexadecimal digit `c`.
const fn hex_char_value(c: u8) -> u8 {
    match c {
        b'0'..=b'9' => c - b'0',
        b'a'..=b'f' => 10 + c - b'a',
        b'A'..=b'F' => 10 + c - b'A',
        _ => 0,
    }
}

impl Default for Bignum {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Bignum {
    fn eq(&self, other: &Self) -> bool {
        Self::equal(self, other)
    }
}

impl Eq for Bignum {}

impl PartialOrd for Bignum {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Bignum {
    fn cmp(&self, other: &Self) -> Ordering {
        Self::compare(self, other)
    }
}

impl fmt::UpperHex for Bignum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        debug_assert!(self.is_clamped());

        let Some((top, rest)) = self.bigits[..self.used].split_last() else {
            return write!(f, "0");
        };
        write!(f, "{top:X}")?;
        for bigit in rest.iter().rev() {
            write!(f, "{bigit:0width$X}", width = HEX_CHARS_PER_BIGIT)?;
        }
        for _ in 0..self.exponent {
            write!(f, "{:0width$}", 0, width = HEX_CHARS_PER_BIGIT)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Bignum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bignum(0x{self:X})")
    }
}
