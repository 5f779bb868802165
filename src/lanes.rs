//! Lane layout, element kinds and the padding invariant
//!
//! A logical vector of `N` components always lives in one 4-lane physical
//! register. Lanes `0..N` hold X, Y, [Z, [W]]; lanes `N..4` are padding and
//! hold the element's zero after every vector-producing operation.
//!
//! [`Element`] binds each element kind to the back-end serving it
//! (`F32Lanes`, `F64Lanes`, `I32Lanes`) and exposes the register operations as
//! safe functions. This is the only place vector code crosses into `unsafe`.

use std::array;
use std::fmt::Debug;
use std::ops::{Add, Div, Mul, Neg, Sub};

use crate::backends::{
    Arith, Compare, F32Lanes, F64Lanes, FloatMath, I32Lanes, IntMath, LaneStore, Reduce,
};
use crate::Backend;

mod sealed {
    pub trait Sealed {}
    impl Sealed for f32 {}
    impl Sealed for f64 {}
    impl Sealed for i32 {}
}

/// Element kind of a vector or matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// 32-bit IEEE-754 float
    F32,
    /// 64-bit IEEE-754 float
    F64,
    /// 32-bit two's complement integer
    I32,
}

impl ElementKind {
    /// Width of one lane in bits
    pub const fn bits(self) -> u32 {
        match self {
            ElementKind::F32 | ElementKind::I32 => 32,
            ElementKind::F64 => 64,
        }
    }

    pub const fn is_float(self) -> bool {
        !matches!(self, ElementKind::I32)
    }

    pub const fn name(self) -> &'static str {
        match self {
            ElementKind::F32 => "f32",
            ElementKind::F64 => "f64",
            ElementKind::I32 => "i32",
        }
    }
}

/// Native register geometry of a back-end for one element kind
///
/// Describes the widest register the back-end offers, e.g. an AVX2 register
/// holds eight f32 lanes (two logical vectors) while an SSE2 f64 vector spans
/// two registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterShape {
    /// Lanes in one native register
    pub lanes: usize,
    /// Native registers needed for one 4-lane vector
    pub registers_per_vector: usize,
    /// 4-lane vectors that fit in one native register
    pub vectors_per_register: usize,
}

impl RegisterShape {
    pub const fn of(backend: Backend, kind: ElementKind) -> Self {
        let lanes = match backend {
            // Plain arrays: one 4-lane "register" per vector
            Backend::Scalar => 4,
            _ => (backend.register_bits() / kind.bits()) as usize,
        };
        RegisterShape {
            lanes,
            registers_per_vector: if lanes >= 4 { 1 } else { 4 / lanes },
            vectors_per_register: if lanes >= 4 { lanes / 4 } else { 1 },
        }
    }
}

/// Value placed in padding lanes before a full-width fold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaddingFill {
    /// Identity of sum and dot
    Zero,
    /// Identity of product
    One,
    /// Copy of logical lane `i < N`; min/max use lane 0
    Lane(usize),
}

/// Scalar element with a 4-lane register on the active back-end
///
/// Sealed: implemented for `f32`, `f64` and `i32` only.
pub trait Element:
    Copy + PartialEq + PartialOrd + Debug + Default + Send + Sync + 'static + sealed::Sealed
{
    /// Physical register of the back-end serving this kind
    type Reg: Copy;

    const KIND: ElementKind;
    const ZERO: Self;
    const ONE: Self;
    /// Every bit set (`0xFFFF_FFFF` / `0xFFFF_FFFF_FFFF_FFFF`)
    const ALL_BITS: Self;
    /// Tolerance of the within-epsilon predicates (zero for integers)
    const EPSILON: Self;

    fn vload(lanes: [Self; 4]) -> Self::Reg;
    fn vstore(reg: Self::Reg) -> [Self; 4];
    fn vsplat(value: Self) -> Self::Reg;

    fn vadd(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    fn vsub(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    fn vmul(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    fn vmin(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    fn vmax(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    fn vand(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    fn vor(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    fn vxor(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    /// a & !b
    fn vandnot(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    fn vselect(mask: Self::Reg, a: Self::Reg, b: Self::Reg) -> Self::Reg;
    /// Sign flip for floats, wrapping negation for integers
    fn vneg(a: Self::Reg) -> Self::Reg;
    /// Sign clear for floats, wrapping absolute value for integers
    fn vabs(a: Self::Reg) -> Self::Reg;

    fn veq(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    fn vne(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    fn vlt(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    fn vle(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    fn vgt(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    fn vge(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    /// Lanes where the operands lie within `eps` of each other
    ///
    /// Floats test `|a - b| < eps`; integers test `|a - b| <= eps`, so the
    /// zero integer epsilon means exact equality.
    fn vwithin(a: Self::Reg, b: Self::Reg, eps: Self) -> Self::Reg;
    fn vmovemask(mask: Self::Reg) -> u8;

    fn vsum(a: Self::Reg) -> Self;
    fn vproduct(a: Self::Reg) -> Self;
    fn vhmin(a: Self::Reg) -> Self;
    fn vhmax(a: Self::Reg) -> Self;

    fn to_f64(self) -> f64;
    /// Float to integer truncates toward zero and saturates (NaN becomes 0)
    fn from_f64(value: f64) -> Self;
    /// Raw bit pattern, zero-extended
    fn raw_bits(self) -> u64;
    /// Bit pattern for hashing; `-0.0` folds into `+0.0`
    fn hash_bits(self) -> u64;
}

/// Float element kinds
pub trait FloatElement:
    Element
    + Neg<Output = Self>
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
{
    const INFINITY: Self;
    const NEG_INFINITY: Self;
    /// Canonical quiet NaN (`0x7FC0_0000` / `0x7FF8_0000_0000_0000`)
    const NAN: Self;
    /// Smallest positive normal value
    const MIN_POSITIVE: Self;
    /// Explicit mantissa bits (23 / 52)
    const MANTISSA_BITS: u32;
    /// Bit pattern selecting the mantissa field
    const MANTISSA_MASK: Self;
    /// Unbiased exponent of [`FloatElement::MIN_POSITIVE`] (-126 / -1022)
    const MIN_NORMAL_EXP: i32;
    /// First exponent that overflows to infinity (128 / 1024)
    const OVERFLOW_EXP: i32;

    fn vdiv(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    fn vsqrt(a: Self::Reg) -> Self::Reg;
    fn vfloor(a: Self::Reg) -> Self::Reg;
    fn vceil(a: Self::Reg) -> Self::Reg;
    /// Nearest, ties to even
    fn vround(a: Self::Reg) -> Self::Reg;
    fn vtrunc(a: Self::Reg) -> Self::Reg;
    fn vrecip_approx(a: Self::Reg) -> Self::Reg;
    fn vrsqrt_approx(a: Self::Reg) -> Self::Reg;
    /// Unbiased exponent field as a float
    fn vexponent(a: Self::Reg) -> Self::Reg;
    /// `2^n` for integral `n` in `MIN_NORMAL_EXP - 1 ..= OVERFLOW_EXP`
    fn vexp2_int(n: Self::Reg) -> Self::Reg;

    fn sqrt(self) -> Self;
    fn abs(self) -> Self;
    fn is_finite(self) -> bool;
    fn sin(self) -> Self;
    fn cos(self) -> Self;
    fn tan(self) -> Self;
    fn asin(self) -> Self;
    fn acos(self) -> Self;
    fn atan(self) -> Self;
    fn atan2(self, other: Self) -> Self;
    fn sinh(self) -> Self;
    fn cosh(self) -> Self;
    fn tanh(self) -> Self;
    fn exp(self) -> Self;
    fn exp2(self) -> Self;
    fn ln(self) -> Self;
    fn log2(self) -> Self;
    fn powf(self, exponent: Self) -> Self;
}

/// Integer element kinds
pub trait IntElement: Element {
    /// # Panics
    ///
    /// Panics if any lane of `b` is zero.
    fn vdiv(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    /// # Panics
    ///
    /// Panics if any lane of `b` is zero.
    fn vrem(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    fn vsaturating_add(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    fn vsaturating_sub(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    fn vshl(a: Self::Reg, count: u32) -> Self::Reg;
    fn vshr(a: Self::Reg, count: u32) -> Self::Reg;
    fn vshr_logical(a: Self::Reg, count: u32) -> Self::Reg;
}

// SAFETY (all forwarding below): `backends` only names a back-end for a kind
// when that back-end's target feature is enabled for the whole build.
macro_rules! impl_element {
    (
        $t:ty, $lanes:ty, $math:path, $kind:expr,
        all_bits: $all_bits:expr, epsilon: $eps:expr,
        within($wa:ident, $wb:ident, $weps:ident) $within:block,
        raw_bits($rv:ident) $raw:block,
        hash_bits($hv:ident) $hash:block
    ) => {
        impl Element for $t {
            type Reg = <$lanes as LaneStore<$t>>::Reg;

            const KIND: ElementKind = $kind;
            const ZERO: Self = 0 as $t;
            const ONE: Self = 1 as $t;
            const ALL_BITS: Self = $all_bits;
            const EPSILON: Self = $eps;

            #[inline(always)]
            fn vload(lanes: [Self; 4]) -> Self::Reg {
                unsafe { <$lanes as LaneStore<$t>>::load(lanes) }
            }

            #[inline(always)]
            fn vstore(reg: Self::Reg) -> [Self; 4] {
                unsafe { <$lanes as LaneStore<$t>>::store(reg) }
            }

            #[inline(always)]
            fn vsplat(value: Self) -> Self::Reg {
                unsafe { <$lanes as LaneStore<$t>>::splat(value) }
            }

            #[inline(always)]
            fn vadd(a: Self::Reg, b: Self::Reg) -> Self::Reg {
                unsafe { <$lanes as Arith<$t>>::add(a, b) }
            }

            #[inline(always)]
            fn vsub(a: Self::Reg, b: Self::Reg) -> Self::Reg {
                unsafe { <$lanes as Arith<$t>>::sub(a, b) }
            }

            #[inline(always)]
            fn vmul(a: Self::Reg, b: Self::Reg) -> Self::Reg {
                unsafe { <$lanes as Arith<$t>>::mul(a, b) }
            }

            #[inline(always)]
            fn vmin(a: Self::Reg, b: Self::Reg) -> Self::Reg {
                unsafe { <$lanes as Arith<$t>>::min(a, b) }
            }

            #[inline(always)]
            fn vmax(a: Self::Reg, b: Self::Reg) -> Self::Reg {
                unsafe { <$lanes as Arith<$t>>::max(a, b) }
            }

            #[inline(always)]
            fn vand(a: Self::Reg, b: Self::Reg) -> Self::Reg {
                unsafe { <$lanes as Arith<$t>>::and(a, b) }
            }

            #[inline(always)]
            fn vor(a: Self::Reg, b: Self::Reg) -> Self::Reg {
                unsafe { <$lanes as Arith<$t>>::or(a, b) }
            }

            #[inline(always)]
            fn vxor(a: Self::Reg, b: Self::Reg) -> Self::Reg {
                unsafe { <$lanes as Arith<$t>>::xor(a, b) }
            }

            #[inline(always)]
            fn vandnot(a: Self::Reg, b: Self::Reg) -> Self::Reg {
                unsafe { <$lanes as Arith<$t>>::and_not(a, b) }
            }

            #[inline(always)]
            fn vselect(mask: Self::Reg, a: Self::Reg, b: Self::Reg) -> Self::Reg {
                unsafe { <$lanes as Arith<$t>>::select(mask, a, b) }
            }

            #[inline(always)]
            fn vneg(a: Self::Reg) -> Self::Reg {
                unsafe { <$lanes as $math>::neg(a) }
            }

            #[inline(always)]
            fn vabs(a: Self::Reg) -> Self::Reg {
                unsafe { <$lanes as $math>::abs(a) }
            }

            #[inline(always)]
            fn veq(a: Self::Reg, b: Self::Reg) -> Self::Reg {
                unsafe { <$lanes as Compare<$t>>::eq(a, b) }
            }

            #[inline(always)]
            fn vne(a: Self::Reg, b: Self::Reg) -> Self::Reg {
                unsafe { <$lanes as Compare<$t>>::ne(a, b) }
            }

            #[inline(always)]
            fn vlt(a: Self::Reg, b: Self::Reg) -> Self::Reg {
                unsafe { <$lanes as Compare<$t>>::lt(a, b) }
            }

            #[inline(always)]
            fn vle(a: Self::Reg, b: Self::Reg) -> Self::Reg {
                unsafe { <$lanes as Compare<$t>>::le(a, b) }
            }

            #[inline(always)]
            fn vgt(a: Self::Reg, b: Self::Reg) -> Self::Reg {
                unsafe { <$lanes as Compare<$t>>::gt(a, b) }
            }

            #[inline(always)]
            fn vge(a: Self::Reg, b: Self::Reg) -> Self::Reg {
                unsafe { <$lanes as Compare<$t>>::ge(a, b) }
            }

            #[inline(always)]
            fn vwithin($wa: Self::Reg, $wb: Self::Reg, $weps: Self) -> Self::Reg $within

            #[inline(always)]
            fn vmovemask(mask: Self::Reg) -> u8 {
                unsafe { <$lanes as Compare<$t>>::move_mask(mask) }
            }

            #[inline(always)]
            fn vsum(a: Self::Reg) -> Self {
                unsafe { <$lanes as Reduce<$t>>::reduce_add(a) }
            }

            #[inline(always)]
            fn vproduct(a: Self::Reg) -> Self {
                unsafe { <$lanes as Reduce<$t>>::reduce_mul(a) }
            }

            #[inline(always)]
            fn vhmin(a: Self::Reg) -> Self {
                unsafe { <$lanes as Reduce<$t>>::reduce_min(a) }
            }

            #[inline(always)]
            fn vhmax(a: Self::Reg) -> Self {
                unsafe { <$lanes as Reduce<$t>>::reduce_max(a) }
            }

            #[inline(always)]
            fn to_f64(self) -> f64 {
                self as f64
            }

            #[inline(always)]
            fn from_f64(value: f64) -> Self {
                value as $t
            }

            #[inline(always)]
            fn raw_bits(self) -> u64 {
                let $rv = self;
                $raw
            }

            #[inline(always)]
            fn hash_bits(self) -> u64 {
                let $hv = self;
                $hash
            }
        }
    };
}

macro_rules! impl_float_element {
    ($t:ty, $lanes:ty, $kind:expr, $bits:ty, nan_bits: $nan:expr) => {
        impl_element!(
            $t, $lanes, FloatMath<$t>, $kind,
            all_bits: <$t>::from_bits(<$bits>::MAX),
            epsilon: 1e-5,
            within(a, b, eps) {
                Self::vlt(Self::vabs(Self::vsub(a, b)), Self::vsplat(eps))
            },
            raw_bits(v) { v.to_bits() as u64 },
            hash_bits(v) {
                if v == 0.0 {
                    0
                } else {
                    v.to_bits() as u64
                }
            }
        );

        impl FloatElement for $t {
            const INFINITY: Self = <$t>::INFINITY;
            const NEG_INFINITY: Self = <$t>::NEG_INFINITY;
            const NAN: Self = <$t>::from_bits($nan);
            const MIN_POSITIVE: Self = <$t>::MIN_POSITIVE;
            const MANTISSA_BITS: u32 = <$t>::MANTISSA_DIGITS - 1;
            const MANTISSA_MASK: Self = <$t>::from_bits((1 << (<$t>::MANTISSA_DIGITS - 1)) - 1);
            const MIN_NORMAL_EXP: i32 = <$t>::MIN_EXP - 1;
            const OVERFLOW_EXP: i32 = <$t>::MAX_EXP;

            #[inline(always)]
            fn vdiv(a: Self::Reg, b: Self::Reg) -> Self::Reg {
                unsafe { <$lanes as FloatMath<$t>>::div(a, b) }
            }

            #[inline(always)]
            fn vsqrt(a: Self::Reg) -> Self::Reg {
                unsafe { <$lanes as FloatMath<$t>>::sqrt(a) }
            }

            #[inline(always)]
            fn vfloor(a: Self::Reg) -> Self::Reg {
                unsafe { <$lanes as FloatMath<$t>>::floor(a) }
            }

            #[inline(always)]
            fn vceil(a: Self::Reg) -> Self::Reg {
                unsafe { <$lanes as FloatMath<$t>>::ceil(a) }
            }

            #[inline(always)]
            fn vround(a: Self::Reg) -> Self::Reg {
                unsafe { <$lanes as FloatMath<$t>>::round(a) }
            }

            #[inline(always)]
            fn vtrunc(a: Self::Reg) -> Self::Reg {
                unsafe { <$lanes as FloatMath<$t>>::trunc(a) }
            }

            #[inline(always)]
            fn vrecip_approx(a: Self::Reg) -> Self::Reg {
                unsafe { <$lanes as FloatMath<$t>>::recip_approx(a) }
            }

            #[inline(always)]
            fn vrsqrt_approx(a: Self::Reg) -> Self::Reg {
                unsafe { <$lanes as FloatMath<$t>>::rsqrt_approx(a) }
            }

            #[inline(always)]
            fn vexponent(a: Self::Reg) -> Self::Reg {
                unsafe { <$lanes as FloatMath<$t>>::exponent(a) }
            }

            #[inline(always)]
            fn vexp2_int(n: Self::Reg) -> Self::Reg {
                unsafe { <$lanes as FloatMath<$t>>::exp2_int(n) }
            }

            fn sqrt(self) -> Self {
                <$t>::sqrt(self)
            }

            fn abs(self) -> Self {
                <$t>::abs(self)
            }

            fn is_finite(self) -> bool {
                <$t>::is_finite(self)
            }

            fn sin(self) -> Self {
                <$t>::sin(self)
            }

            fn cos(self) -> Self {
                <$t>::cos(self)
            }

            fn tan(self) -> Self {
                <$t>::tan(self)
            }

            fn asin(self) -> Self {
                <$t>::asin(self)
            }

            fn acos(self) -> Self {
                <$t>::acos(self)
            }

            fn atan(self) -> Self {
                <$t>::atan(self)
            }

            fn atan2(self, other: Self) -> Self {
                <$t>::atan2(self, other)
            }

            fn sinh(self) -> Self {
                <$t>::sinh(self)
            }

            fn cosh(self) -> Self {
                <$t>::cosh(self)
            }

            fn tanh(self) -> Self {
                <$t>::tanh(self)
            }

            fn exp(self) -> Self {
                <$t>::exp(self)
            }

            fn exp2(self) -> Self {
                <$t>::exp2(self)
            }

            fn ln(self) -> Self {
                <$t>::ln(self)
            }

            fn log2(self) -> Self {
                <$t>::log2(self)
            }

            fn powf(self, exponent: Self) -> Self {
                <$t>::powf(self, exponent)
            }
        }
    };
}

impl_float_element!(f32, F32Lanes, ElementKind::F32, u32, nan_bits: 0x7FC0_0000);
impl_float_element!(f64, F64Lanes, ElementKind::F64, u64, nan_bits: 0x7FF8_0000_0000_0000);

impl_element!(
    i32, I32Lanes, IntMath, ElementKind::I32,
    all_bits: -1,
    epsilon: 0,
    within(a, b, eps) {
        if eps == 0 {
            return Self::veq(a, b);
        }
        let (x, y) = (Self::vstore(a), Self::vstore(b));
        let limit = i64::from(eps);
        Self::vload(array::from_fn(|i| {
            if (i64::from(x[i]) - i64::from(y[i])).abs() <= limit {
                -1
            } else {
                0
            }
        }))
    },
    raw_bits(v) { v as u32 as u64 },
    hash_bits(v) { v as u32 as u64 }
);

impl IntElement for i32 {
    #[inline(always)]
    fn vdiv(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        unsafe { <I32Lanes as IntMath>::div(a, b) }
    }

    #[inline(always)]
    fn vrem(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        unsafe { <I32Lanes as IntMath>::rem(a, b) }
    }

    #[inline(always)]
    fn vsaturating_add(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        unsafe { <I32Lanes as IntMath>::saturating_add(a, b) }
    }

    #[inline(always)]
    fn vsaturating_sub(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        unsafe { <I32Lanes as IntMath>::saturating_sub(a, b) }
    }

    #[inline(always)]
    fn vshl(a: Self::Reg, count: u32) -> Self::Reg {
        unsafe { <I32Lanes as IntMath>::shl(a, count) }
    }

    #[inline(always)]
    fn vshr(a: Self::Reg, count: u32) -> Self::Reg {
        unsafe { <I32Lanes as IntMath>::shr(a, count) }
    }

    #[inline(always)]
    fn vshr_logical(a: Self::Reg, count: u32) -> Self::Reg {
        unsafe { <I32Lanes as IntMath>::shr_logical(a, count) }
    }
}

/// Lane mask with all bits set on lanes `0..N` and zero on padding
#[inline(always)]
pub fn padding_mask<T: Element, const N: usize>() -> T::Reg {
    T::vload(array::from_fn(|i| if i < N { T::ALL_BITS } else { T::ZERO }))
}

/// Move-mask bits covering the logical lanes `0..N`
#[inline(always)]
pub const fn logical_bits<const N: usize>() -> u8 {
    ((1u16 << N) - 1) as u8
}

/// Replace padding lanes `N..4` with `fill`
///
/// Assumes the padding invariant: padding lanes are zero on entry, so
/// [`PaddingFill::Zero`] is the identity.
///
/// # Panics
///
/// Panics if `fill` is [`PaddingFill::Lane`] naming a lane outside `0..N`.
#[inline(always)]
pub fn pad_with<T: Element, const N: usize>(reg: T::Reg, fill: PaddingFill) -> T::Reg {
    if let PaddingFill::Lane(i) = fill {
        assert!(i < N, "padding source lane {i} out of range for {N} logical lanes");
    }
    if N >= 4 {
        return reg;
    }
    match fill {
        PaddingFill::Zero => reg,
        PaddingFill::One => T::vor(reg, T::vandnot(T::vsplat(T::ONE), padding_mask::<T, N>())),
        PaddingFill::Lane(i) => T::vselect(
            padding_mask::<T, N>(),
            reg,
            T::vsplat(T::vstore(reg)[i]),
        ),
    }
}

/// True when every padding lane holds the all-zero bit pattern
#[inline]
pub fn padding_is_zero<T: Element, const N: usize>(reg: T::Reg) -> bool {
    T::vstore(reg)[N..].iter().all(|lane| lane.raw_bits() == 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_constants() {
        assert_eq!(f32::ALL_BITS.to_bits(), 0xFFFF_FFFF);
        assert_eq!(f64::ALL_BITS.to_bits(), 0xFFFF_FFFF_FFFF_FFFF);
        assert_eq!(i32::ALL_BITS, -1);
        assert_eq!(<f32 as FloatElement>::NAN.to_bits(), 0x7FC0_0000);
        assert_eq!(<f64 as FloatElement>::NAN.to_bits(), 0x7FF8_0000_0000_0000);
        assert_eq!(<f32 as Element>::EPSILON, 1e-5);
        assert_eq!(<i32 as Element>::EPSILON, 0);
    }

    #[test]
    fn test_element_kind() {
        assert_eq!(f32::KIND, ElementKind::F32);
        assert_eq!(f64::KIND.bits(), 64);
        assert!(!i32::KIND.is_float());
        assert_eq!(ElementKind::I32.name(), "i32");
    }

    #[test]
    fn test_register_shape() {
        let avx_f32 = RegisterShape::of(Backend::AVX2, ElementKind::F32);
        assert_eq!(avx_f32.lanes, 8);
        assert_eq!(avx_f32.vectors_per_register, 2);

        let sse_f64 = RegisterShape::of(Backend::SSE2, ElementKind::F64);
        assert_eq!(sse_f64.lanes, 2);
        assert_eq!(sse_f64.registers_per_vector, 2);

        let avx_f64 = RegisterShape::of(Backend::AVX2, ElementKind::F64);
        assert_eq!(avx_f64.registers_per_vector, 1);
        assert_eq!(avx_f64.vectors_per_register, 1);

        let scalar = RegisterShape::of(Backend::Scalar, ElementKind::F64);
        assert_eq!(scalar.lanes, 4);
    }

    #[test]
    fn test_padding_mask() {
        let mask = f32::vstore(padding_mask::<f32, 3>());
        assert_eq!(mask.map(f32::to_bits), [u32::MAX, u32::MAX, u32::MAX, 0]);
        assert_eq!(i32::vstore(padding_mask::<i32, 2>()), [-1, -1, 0, 0]);
        assert_eq!(logical_bits::<2>(), 0b0011);
        assert_eq!(logical_bits::<4>(), 0b1111);
    }

    #[test]
    fn test_pad_with() {
        let reg = f64::vload([2.0, 3.0, 0.0, 0.0]);
        assert_eq!(f64::vstore(pad_with::<f64, 2>(reg, PaddingFill::One)), [2.0, 3.0, 1.0, 1.0]);
        assert_eq!(f64::vstore(pad_with::<f64, 2>(reg, PaddingFill::Lane(0))), [2.0, 3.0, 2.0, 2.0]);
        assert_eq!(f64::vstore(pad_with::<f64, 2>(reg, PaddingFill::Zero)), [2.0, 3.0, 0.0, 0.0]);

        let full = i32::vload([1, 2, 3, 4]);
        assert_eq!(i32::vstore(pad_with::<i32, 4>(full, PaddingFill::One)), [1, 2, 3, 4]);
    }

    #[test]
    fn test_pad_with_copies_last_logical_lane() {
        let reg = i32::vload([5, 6, 7, 0]);
        assert_eq!(i32::vstore(pad_with::<i32, 3>(reg, PaddingFill::Lane(2))), [5, 6, 7, 7]);
    }

    #[test]
    #[should_panic(expected = "padding source lane 2 out of range for 2 logical lanes")]
    fn test_pad_with_rejects_padding_source_lane() {
        pad_with::<f64, 2>(f64::vload([2.0, 3.0, 0.0, 0.0]), PaddingFill::Lane(2));
    }

    #[test]
    #[should_panic(expected = "padding source lane 4 out of range for 4 logical lanes")]
    fn test_pad_with_rejects_lane_past_register() {
        pad_with::<f32, 4>(f32::vload([1.0; 4]), PaddingFill::Lane(4));
    }

    #[test]
    fn test_padding_is_zero_rejects_negative_zero() {
        assert!(padding_is_zero::<f32, 3>(f32::vload([1.0, 2.0, 3.0, 0.0])));
        assert!(!padding_is_zero::<f32, 3>(f32::vload([1.0, 2.0, 3.0, -0.0])));
    }

    #[test]
    fn test_within() {
        let a = f32::vload([1.000_000_1, 1.0, 0.0, f32::NAN]);
        let b = f32::vload([1.000_000_2, 1.1, 0.0, f32::NAN]);
        assert_eq!(f32::vmovemask(f32::vwithin(a, b, <f32 as Element>::EPSILON)), 0b0101);

        let x = i32::vload([5, i32::MIN, 7, 0]);
        let y = i32::vload([5, i32::MAX, 9, 0]);
        assert_eq!(i32::vmovemask(i32::vwithin(x, y, 0)), 0b1001);
        assert_eq!(i32::vmovemask(i32::vwithin(x, y, 2)), 0b1101);
    }

    #[test]
    fn test_hash_bits_folds_negative_zero() {
        assert_eq!((-0.0f32).hash_bits(), 0.0f32.hash_bits());
        assert_ne!((-0.0f32).raw_bits(), 0.0f32.raw_bits());
        assert_eq!((-1i32).hash_bits(), 0xFFFF_FFFF);
    }

    #[test]
    fn test_from_f64_saturates() {
        assert_eq!(i32::from_f64(3.9), 3);
        assert_eq!(i32::from_f64(-3.9), -3);
        assert_eq!(i32::from_f64(1e20), i32::MAX);
        assert_eq!(i32::from_f64(f64::NAN), 0);
    }
}
