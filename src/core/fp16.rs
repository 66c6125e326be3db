use core::fmt;
use core::ops::Neg;

/// IEEE-754 binary16: 1 sign bit, 5 exponent bits (bias 15), 10 significand
/// bits. A transparent wrapper over the raw bit pattern; equality is bitwise.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(transparent)]
pub struct Fp16(u16);

impl Fp16 {
    // ---- constants ----

    /// Positive zero: s=0, e=0, m=0 => 0x0000
    pub const ZERO: Self = Self(0x0000);

    /// Negative zero: s=1, e=0, m=0 => 0x8000
    pub const NEG_ZERO: Self = Self(0x8000);

    /// One: s=0, e=15, m=0 => 0b0_01111_0000000000 = 0x3C00
    pub const ONE: Self = Self(0x3C00);

    /// Negative one: s=1, e=15, m=0 => 0xBC00
    pub const NEG_ONE: Self = Self(0xBC00);

    /// +Infinity: s=0, e=31, m=0 => 0x7C00
    pub const POS_INF: Self = Self(0x7C00);

    /// -Infinity: s=1, e=31, m=0 => 0xFC00
    pub const NEG_INF: Self = Self(0xFC00);

    /// Canonical quiet NaN: s=0, e=31, m=0x200 => 0x7E00
    pub const CANONICAL_NAN: Self = Self(0x7E00);

    /// Max finite positive: s=0, e=30, m=0x3FF => 0x7BFF (65504.0)
    pub const MAX_FINITE: Self = Self(0x7BFF);

    /// Smallest positive normal: s=0, e=1, m=0 => 0x0400 (2^-14)
    pub const MIN_NORMAL_POS: Self = Self(0x0400);

    /// Smallest positive subnormal: s=0, e=0, m=1 => 0x0001 (2^-24)
    pub const MIN_SUBNORMAL_POS: Self = Self(0x0001);

    #[inline]
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    #[inline]
    pub const fn to_bits(self) -> u16 {
        self.0
    }

    /// Exponent all ones with a nonzero significand.
    #[inline]
    pub const fn is_nan(self) -> bool {
        (self.0 & 0x7C00) == 0x7C00 && (self.0 & 0x03FF) != 0
    }

    /// Everything but the sign bit matches the Inf pattern.
    #[inline]
    pub const fn is_infinite(self) -> bool {
        (self.0 & 0x7FFF) == 0x7C00
    }

    /// Exponent not all ones: zero, subnormal, or normal.
    #[inline]
    pub const fn is_finite(self) -> bool {
        (self.0 & 0x7C00) != 0x7C00
    }
}

/// Convert a binary32 bit pattern to the nearest binary16 bit pattern.
///
/// Round-to-nearest is implemented by adding a rounding bias to the bits
/// below half precision before truncation. A carry out of the significand
/// propagates into the exponent field, which is always the right answer:
/// in the subnormal range it produces the smallest normal, and in the
/// normal range it may saturate the exponent to 31, overflowing to Inf.
///
/// Finite inputs above binary16 range saturate to signed Inf; inputs below
/// half the smallest subnormal round to signed zero. NaN payloads are
/// truncated to their top 10 bits but never collapse to the Inf pattern.
pub const fn floatbits_to_halfbits(fp32: u32) -> u16 {
    let sign = ((fp32 & 0x8000_0000) >> 16) as u16;
    let exp = fp32 & 0x7F80_0000;

    // Exponent too large for binary16: Inf, NaN, or finite overflow.
    if exp >= 0x4780_0000 {
        if exp == 0x7F80_0000 {
            let sig = fp32 & 0x007F_FFFF;
            if sig != 0 {
                // NaN: keep the top payload bits...
                let mut out = 0x7C00 + (sig >> 13) as u16;
                // ...but make sure it stays a NaN
                if out == 0x7C00 {
                    out += 1;
                }
                return sign + out;
            }
            // signed Inf
            return sign + 0x7C00;
        }
        // overflow to signed Inf
        return sign + 0x7C00;
    }

    // Exponent too small for a normal binary16: subnormal or signed zero.
    if exp <= 0x3800_0000 {
        if exp < 0x3300_0000 {
            return sign;
        }
        // Reattach the implicit leading one, shift into subnormal
        // position, then round.
        let mut sig = 0x0080_0000 + (fp32 & 0x007F_FFFF);
        sig >>= 113 - (exp >> 23);
        sig += 0x0000_1000;
        return sign + (sig >> 13) as u16;
    }

    // Normal range: rebias the exponent and round the significand.
    let exp16 = ((exp - 0x3800_0000) >> 13) as u16;
    let sig = (fp32 & 0x007F_FFFF) + 0x0000_1000;
    sign + exp16 + (sig >> 13) as u16
}

/// Convert a binary16 bit pattern to the binary32 bit pattern with the same
/// value. Exact: every binary16 value is representable in binary32, and NaN
/// payloads carry over in the top significand bits.
pub const fn halfbits_to_floatbits(fp16: u16) -> u32 {
    let sign = ((fp16 as u32) & 0x8000) << 16;
    match fp16 & 0x7C00 {
        // zero or subnormal
        0x0000 => {
            let sig = (fp16 & 0x03FF) as u32;
            if sig == 0 {
                return sign;
            }
            // Normalize: shift until the implicit-one position fills,
            // counting how far the exponent drops.
            let mut sig = sig << 1;
            let mut shift = 0u32;
            while sig & 0x0400 == 0 {
                sig <<= 1;
                shift += 1;
            }
            sign + ((127 - 15 - shift) << 23) + ((sig & 0x03FF) << 13)
        }
        // Inf or NaN: all-ones exponent, payload preserved
        0x7C00 => sign + 0x7F80_0000 + (((fp16 & 0x03FF) as u32) << 13),
        // normal: rebias exponent and significand in a single add
        _ => sign + ((((fp16 & 0x7FFF) as u32) + 0x0001_C000) << 13),
    }
}

/// Bit-reinterpret an `f32` and encode it as binary16 bits.
#[inline]
pub fn f32_to_half(v: f32) -> u16 {
    floatbits_to_halfbits(v.to_bits())
}

/// Decode binary16 bits and bit-reinterpret the result as an `f32`.
#[inline]
pub fn half_to_f32(bits: u16) -> f32 {
    f32::from_bits(halfbits_to_floatbits(bits))
}

impl From<f32> for Fp16 {
    #[inline]
    fn from(v: f32) -> Self {
        Self(f32_to_half(v))
    }
}

impl From<Fp16> for f32 {
    #[inline]
    fn from(x: Fp16) -> Self {
        half_to_f32(x.0)
    }
}

impl Neg for Fp16 {
    type Output = Self;

    // Sign flip is a pure bit operation, valid for every pattern
    // including NaN and Inf.
    #[inline]
    fn neg(self) -> Self::Output {
        Self(self.0 ^ 0x8000)
    }
}

impl fmt::Display for Fp16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bits = self.to_bits();

        if self.is_nan() {
            write!(f, "Fp16(NaN, bits=0x{:04X})", bits)
        } else if bits == Self::POS_INF.to_bits() {
            write!(f, "Fp16(+inf, bits=0x{:04X})", bits)
        } else if bits == Self::NEG_INF.to_bits() {
            write!(f, "Fp16(-inf, bits=0x{:04X})", bits)
        } else {
            write!(f, "Fp16({:.8e}, bits=0x{:04X})", f32::from(*self), bits)
        }
    }
}
