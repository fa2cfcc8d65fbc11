//! Unsigned 16.16 fixed-point numbers.
//!
//! Every phase, period and amplitude factor in the engine is non-negative,
//! so the representation is a plain `u32` with the binary point between
//! bit 15 and bit 16.

use core::fmt;
use core::ops::{Add, AddAssign, Div, Mul, Rem, Sub, SubAssign};

const FRAC_BITS: u32 = 16;
const FRAC_MASK: u32 = 0x0000_FFFF;
const SCALE: f64 = 65536.0;

/// A 16.16 fixed-point value (`raw / 65536`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Q16(u32);

impl Q16 {
    pub const ZERO: Self = Self(0);
    pub const ONE: Self = Self(1 << FRAC_BITS);
    pub const HALF: Self = Self(1 << (FRAC_BITS - 1));
    pub const MAX: Self = Self(u32::MAX);

    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    pub const fn from_int(value: u16) -> Self {
        Self((value as u32) << FRAC_BITS)
    }

    /// Round to the nearest integer.
    pub const fn to_int(self) -> u16 {
        (self.round().0 >> FRAC_BITS) as u16
    }

    /// Integer part, discarding the fraction.
    pub const fn trunc(self) -> u16 {
        (self.0 >> FRAC_BITS) as u16
    }

    /// Convert from floating point. Negative inputs saturate to zero.
    pub fn from_f64(value: f64) -> Self {
        Self((value * SCALE) as u32)
    }

    pub fn to_f64(self) -> f64 {
        self.0 as f64 / SCALE
    }

    /// Multiply through a 64-bit intermediate, truncating the result.
    pub const fn mul(self, rhs: Self) -> Self {
        Self(((self.0 as u64 * rhs.0 as u64) >> FRAC_BITS) as u32)
    }

    /// Divide through a 64-bit intermediate. `None` for a zero divisor.
    pub const fn checked_div(self, rhs: Self) -> Option<Self> {
        if rhs.0 == 0 {
            return None;
        }
        Some(Self((((self.0 as u64) << FRAC_BITS) / rhs.0 as u64) as u32))
    }

    pub const fn fract(self) -> Self {
        Self(self.0 & FRAC_MASK)
    }

    pub const fn floor(self) -> Self {
        Self(self.0 & !FRAC_MASK)
    }

    /// Smallest integer value not below `self`. Values in the top integer
    /// step wrap.
    pub const fn ceil(self) -> Self {
        if self.0 & FRAC_MASK == 0 {
            self
        } else {
            Self((self.0 & !FRAC_MASK).wrapping_add(Self::ONE.0))
        }
    }

    /// Nearest integer value, halves rounding up. Values in the top integer
    /// step wrap.
    pub const fn round(self) -> Self {
        if self.0 & FRAC_MASK < Self::HALF.0 {
            self.floor()
        } else {
            Self((self.0 & !FRAC_MASK).wrapping_add(Self::ONE.0))
        }
    }

    pub const fn saturating_sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl Add for Q16 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Q16 {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Q16 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Q16 {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

/// Scale the raw value by an integer.
impl Mul<u32> for Q16 {
    type Output = Self;
    fn mul(self, rhs: u32) -> Self {
        Self(self.0 * rhs)
    }
}

/// Divide the raw value by an integer, truncating.
impl Div<u32> for Q16 {
    type Output = Self;
    fn div(self, rhs: u32) -> Self {
        Self(self.0 / rhs)
    }
}

/// Remainder of the raw values. Panics on a zero divisor.
impl Rem for Q16 {
    type Output = Self;
    fn rem(self, rhs: Self) -> Self {
        Self(self.0 % rhs.0)
    }
}

impl fmt::Display for Q16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}", self.to_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiply_is_exact_for_representable_products() {
        let a = Q16::from_raw(0x0001_8000); // 1.5
        let b = Q16::from_int(3);
        assert_eq!(a.mul(b), Q16::from_raw(0x0004_8000)); // 4.5
        assert_eq!(Q16::ONE.mul(Q16::HALF), Q16::HALF);
    }

    #[test]
    fn multiply_does_not_overflow_intermediate() {
        let big = Q16::from_int(60000);
        assert_eq!(big.mul(Q16::ONE), big);
    }

    #[test]
    fn divide_widens_dividend() {
        let q = Q16::from_int(1).checked_div(Q16::from_int(4)).unwrap();
        assert_eq!(q, Q16::from_raw(0x4000));
        let q = Q16::from_int(3200).checked_div(Q16::from_int(100)).unwrap();
        assert_eq!(q, Q16::from_int(32));
    }

    #[test]
    fn divide_by_zero_is_none() {
        assert_eq!(Q16::ONE.checked_div(Q16::ZERO), None);
    }

    #[test]
    fn round_uses_half_of_fraction_range() {
        assert_eq!(Q16::from_raw(0x0002_7FFF).round(), Q16::from_int(2));
        assert_eq!(Q16::from_raw(0x0002_8000).round(), Q16::from_int(3));
        assert_eq!(Q16::from_raw(0x0002_0000).round(), Q16::from_int(2));
    }

    #[test]
    fn floor_and_ceil() {
        let x = Q16::from_raw(0x0005_0001);
        assert_eq!(x.floor(), Q16::from_int(5));
        assert_eq!(x.ceil(), Q16::from_int(6));
        assert_eq!(Q16::from_int(5).ceil(), Q16::from_int(5));
        assert_eq!(x.fract(), Q16::from_raw(1));
    }

    #[test]
    fn int_conversion_rounds() {
        assert_eq!(Q16::from_int(42).to_int(), 42);
        assert_eq!(Q16::from_raw(0x0029_C000).to_int(), 42);
        assert_eq!(Q16::from_raw(0x0029_C000).trunc(), 41);
    }

    #[test]
    fn float_conversion_uses_exact_power_of_two() {
        assert_eq!(Q16::from_f64(1.0), Q16::ONE);
        assert_eq!(Q16::from_f64(0.5), Q16::HALF);
        assert_eq!(Q16::ONE.to_f64(), 1.0);
        assert_eq!(Q16::from_raw(1).to_f64(), 1.0 / 65536.0);
        assert_eq!(Q16::from_f64(-3.0), Q16::ZERO);
    }

    #[test]
    fn integer_scaling_operates_on_raw() {
        let period = Q16::from_int(255);
        assert_eq!(period / 255, Q16::ONE);
        assert_eq!((period / 255) * 128, Q16::from_int(128));
    }

    #[test]
    fn remainder_keeps_fraction() {
        let time = Q16::from_raw(0x0003_4000); // 3.25
        assert_eq!(time % Q16::from_int(2), Q16::from_raw(0x0001_4000));
        assert_eq!(Q16::HALF % Q16::ONE, Q16::HALF);
    }

    #[test]
    fn display_four_decimals() {
        assert_eq!(Q16::from_raw(0x0001_8000).to_string(), "1.5000");
    }
}
