//! Backend implementations for different SIMD instruction sets
//!
//! Every back-end stores a logical vector in one 4-lane physical register and
//! implements the same category traits, so vector code above this module is
//! written once and monomorphized against the back-end picked at build time.
//!
//! # Safety
//!
//! All `unsafe` code is isolated within backend implementations. The trait
//! methods are `unsafe` because SIMD back-ends require their target feature to
//! be enabled; the selection below only names a back-end whose feature is a
//! compile-time target feature, which is what the element layer relies on.
//!
//! # Backends
//!
//! - `scalar`: Portable baseline implementation (no SIMD)
//! - `sse2`: x86/x86_64 baseline SIMD (128-bit), SSE4.1 paths when enabled
//! - `avx2`: x86_64 256-bit SIMD, used for the f64 kind
//! - `neon`: AArch64 SIMD (128-bit)
//!
//! # Lane contract
//!
//! Shared by every back-end so logical results are bit-identical:
//!
//! - `min(a, b)` is `if a < b { a } else { b }`, `max(a, b)` is
//!   `if a > b { a } else { b }`
//! - horizontal folds combine `(l0 op l1) op (l2 op l3)`
//! - integer add/sub/mul wrap; shift counts of 32 or more shift every bit out
//!   (arithmetic right shifts fill with the sign)
//! - comparison masks are all-bits-set or zero per lane; `move_mask` packs the
//!   top bit of lane `i` into bit `i`

pub mod scalar;

#[cfg(all(
    any(target_arch = "x86", target_arch = "x86_64"),
    target_feature = "sse2"
))]
pub mod sse2;

#[cfg(all(
    any(target_arch = "x86", target_arch = "x86_64"),
    target_feature = "avx2"
))]
pub mod avx2;

#[cfg(all(target_arch = "aarch64", target_feature = "neon"))]
pub mod neon;

use crate::Backend;

#[cfg(all(
    not(feature = "force-scalar"),
    target_arch = "arm",
    target_feature = "neon"
))]
compile_error!(
    "NEON is declared for 32-bit ARM, but only the AArch64 NEON back-end exists; \
     enable the `force-scalar` feature to build the portable back-end"
);

#[cfg(all(
    not(feature = "force-scalar"),
    target_feature = "avx2",
    not(target_feature = "sse2")
))]
compile_error!("`avx2` is declared without `sse2`; no back-end can serve this target");

/// Register load/store for one element kind
pub trait LaneStore<T: Copy> {
    /// Physical register holding four lanes
    type Reg: Copy;

    /// Load four lanes, lane 0 first
    ///
    /// # Safety
    ///
    /// The back-end's target feature must be enabled.
    unsafe fn load(lanes: [T; 4]) -> Self::Reg;

    /// Store four lanes, lane 0 first
    ///
    /// # Safety
    ///
    /// The back-end's target feature must be enabled.
    unsafe fn store(reg: Self::Reg) -> [T; 4];

    /// Broadcast one value to all four lanes
    ///
    /// # Safety
    ///
    /// The back-end's target feature must be enabled.
    unsafe fn splat(value: T) -> Self::Reg;

    /// Apply a scalar function to every lane
    ///
    /// Used for operations no instruction set provides (trig, exp, integer
    /// division); results match the scalar back-end exactly.
    ///
    /// # Safety
    ///
    /// The back-end's target feature must be enabled.
    unsafe fn map(reg: Self::Reg, f: impl Fn(T) -> T) -> Self::Reg {
        Self::load(Self::store(reg).map(f))
    }

    /// Apply a scalar function to every lane pair
    ///
    /// # Safety
    ///
    /// The back-end's target feature must be enabled.
    unsafe fn zip_map(a: Self::Reg, b: Self::Reg, f: impl Fn(T, T) -> T) -> Self::Reg {
        let (x, y) = (Self::store(a), Self::store(b));
        Self::load([f(x[0], y[0]), f(x[1], y[1]), f(x[2], y[2]), f(x[3], y[3])])
    }
}

/// Lane-wise arithmetic, bitwise and min/max
pub trait Arith<T: Copy>: LaneStore<T> {
    /// a[i] + b[i] (wrapping for integers)
    ///
    /// # Safety
    ///
    /// The back-end's target feature must be enabled.
    unsafe fn add(a: Self::Reg, b: Self::Reg) -> Self::Reg;

    /// a[i] - b[i] (wrapping for integers)
    ///
    /// # Safety
    ///
    /// The back-end's target feature must be enabled.
    unsafe fn sub(a: Self::Reg, b: Self::Reg) -> Self::Reg;

    /// a[i] * b[i] (wrapping for integers)
    ///
    /// # Safety
    ///
    /// The back-end's target feature must be enabled.
    unsafe fn mul(a: Self::Reg, b: Self::Reg) -> Self::Reg;

    /// if a[i] < b[i] { a[i] } else { b[i] }
    ///
    /// # Safety
    ///
    /// The back-end's target feature must be enabled.
    unsafe fn min(a: Self::Reg, b: Self::Reg) -> Self::Reg;

    /// if a[i] > b[i] { a[i] } else { b[i] }
    ///
    /// # Safety
    ///
    /// The back-end's target feature must be enabled.
    unsafe fn max(a: Self::Reg, b: Self::Reg) -> Self::Reg;

    /// Bitwise a & b
    ///
    /// # Safety
    ///
    /// The back-end's target feature must be enabled.
    unsafe fn and(a: Self::Reg, b: Self::Reg) -> Self::Reg;

    /// Bitwise a | b
    ///
    /// # Safety
    ///
    /// The back-end's target feature must be enabled.
    unsafe fn or(a: Self::Reg, b: Self::Reg) -> Self::Reg;

    /// Bitwise a ^ b
    ///
    /// # Safety
    ///
    /// The back-end's target feature must be enabled.
    unsafe fn xor(a: Self::Reg, b: Self::Reg) -> Self::Reg;

    /// Bitwise a & !b
    ///
    /// # Safety
    ///
    /// The back-end's target feature must be enabled.
    unsafe fn and_not(a: Self::Reg, b: Self::Reg) -> Self::Reg;

    /// Per lane, `mask ? a : b`; mask lanes are all-bits-set or zero
    ///
    /// # Safety
    ///
    /// The back-end's target feature must be enabled.
    unsafe fn select(mask: Self::Reg, a: Self::Reg, b: Self::Reg) -> Self::Reg;
}

/// Lane-wise comparisons producing all-bits-set/zero masks
pub trait Compare<T: Copy>: LaneStore<T> {
    /// a[i] == b[i]; NaN compares unequal
    ///
    /// # Safety
    ///
    /// The back-end's target feature must be enabled.
    unsafe fn eq(a: Self::Reg, b: Self::Reg) -> Self::Reg;

    /// a[i] != b[i]; true for NaN lanes
    ///
    /// # Safety
    ///
    /// The back-end's target feature must be enabled.
    unsafe fn ne(a: Self::Reg, b: Self::Reg) -> Self::Reg;

    /// a[i] < b[i]
    ///
    /// # Safety
    ///
    /// The back-end's target feature must be enabled.
    unsafe fn lt(a: Self::Reg, b: Self::Reg) -> Self::Reg;

    /// a[i] <= b[i]
    ///
    /// # Safety
    ///
    /// The back-end's target feature must be enabled.
    unsafe fn le(a: Self::Reg, b: Self::Reg) -> Self::Reg;

    /// a[i] > b[i]
    ///
    /// # Safety
    ///
    /// The back-end's target feature must be enabled.
    unsafe fn gt(a: Self::Reg, b: Self::Reg) -> Self::Reg;

    /// a[i] >= b[i]
    ///
    /// # Safety
    ///
    /// The back-end's target feature must be enabled.
    unsafe fn ge(a: Self::Reg, b: Self::Reg) -> Self::Reg;

    /// Pack the top bit of lane `i` into bit `i` of the result
    ///
    /// # Safety
    ///
    /// The back-end's target feature must be enabled.
    unsafe fn move_mask(mask: Self::Reg) -> u8;
}

/// Horizontal folds over all four lanes
///
/// Callers prepare padding lanes so they act as the fold's identity.
pub trait Reduce<T: Copy>: LaneStore<T> {
    /// Sum of all four lanes
    ///
    /// # Safety
    ///
    /// The back-end's target feature must be enabled.
    unsafe fn reduce_add(a: Self::Reg) -> T;

    /// Product of all four lanes (wrapping for integers)
    ///
    /// # Safety
    ///
    /// The back-end's target feature must be enabled.
    unsafe fn reduce_mul(a: Self::Reg) -> T;

    /// Smallest lane, folded with `Arith::min` semantics
    ///
    /// # Safety
    ///
    /// The back-end's target feature must be enabled.
    unsafe fn reduce_min(a: Self::Reg) -> T;

    /// Largest lane, folded with `Arith::max` semantics
    ///
    /// # Safety
    ///
    /// The back-end's target feature must be enabled.
    unsafe fn reduce_max(a: Self::Reg) -> T;
}

/// Float-only lane operations
pub trait FloatMath<T: Copy>: Arith<T> + Compare<T> {
    /// a[i] / b[i]
    ///
    /// # Safety
    ///
    /// The back-end's target feature must be enabled.
    unsafe fn div(a: Self::Reg, b: Self::Reg) -> Self::Reg;

    /// Correctly rounded square root
    ///
    /// # Safety
    ///
    /// The back-end's target feature must be enabled.
    unsafe fn sqrt(a: Self::Reg) -> Self::Reg;

    /// Clear the sign bit
    ///
    /// # Safety
    ///
    /// The back-end's target feature must be enabled.
    unsafe fn abs(a: Self::Reg) -> Self::Reg;

    /// Flip the sign bit
    ///
    /// # Safety
    ///
    /// The back-end's target feature must be enabled.
    unsafe fn neg(a: Self::Reg) -> Self::Reg;

    /// Round toward negative infinity
    ///
    /// # Safety
    ///
    /// The back-end's target feature must be enabled.
    unsafe fn floor(a: Self::Reg) -> Self::Reg;

    /// Round toward positive infinity
    ///
    /// # Safety
    ///
    /// The back-end's target feature must be enabled.
    unsafe fn ceil(a: Self::Reg) -> Self::Reg;

    /// Round to nearest, ties to even
    ///
    /// # Safety
    ///
    /// The back-end's target feature must be enabled.
    unsafe fn round(a: Self::Reg) -> Self::Reg;

    /// Round toward zero
    ///
    /// # Safety
    ///
    /// The back-end's target feature must be enabled.
    unsafe fn trunc(a: Self::Reg) -> Self::Reg;

    /// Reciprocal estimate; precision varies by back-end
    ///
    /// # Safety
    ///
    /// The back-end's target feature must be enabled.
    unsafe fn recip_approx(a: Self::Reg) -> Self::Reg;

    /// Reciprocal square root estimate; precision varies by back-end
    ///
    /// # Safety
    ///
    /// The back-end's target feature must be enabled.
    unsafe fn rsqrt_approx(a: Self::Reg) -> Self::Reg;

    /// Unbiased IEEE exponent field of each lane, as a float
    ///
    /// Equals `floor(log2(|a|))` for normal lanes. The sign bit is ignored;
    /// zero, subnormal, infinite and NaN lanes yield the raw field minus the
    /// bias.
    ///
    /// # Safety
    ///
    /// The back-end's target feature must be enabled.
    unsafe fn exponent(a: Self::Reg) -> Self::Reg;

    /// `2^n` built directly in the exponent field
    ///
    /// Lanes of `n` must be integral and within `MIN_EXP - 1 ..= MAX_EXP`;
    /// the top of that range produces infinity.
    ///
    /// # Safety
    ///
    /// The back-end's target feature must be enabled.
    unsafe fn exp2_int(n: Self::Reg) -> Self::Reg;
}

/// Integer-only lane operations
pub trait IntMath: Arith<i32> + Compare<i32> {
    /// a[i] + b[i] clamped to the i32 range
    ///
    /// # Safety
    ///
    /// The back-end's target feature must be enabled.
    unsafe fn saturating_add(a: Self::Reg, b: Self::Reg) -> Self::Reg;

    /// a[i] - b[i] clamped to the i32 range
    ///
    /// # Safety
    ///
    /// The back-end's target feature must be enabled.
    unsafe fn saturating_sub(a: Self::Reg, b: Self::Reg) -> Self::Reg;

    /// Wrapping absolute value (`i32::MIN` stays `i32::MIN`)
    ///
    /// # Safety
    ///
    /// The back-end's target feature must be enabled.
    unsafe fn abs(a: Self::Reg) -> Self::Reg;

    /// Wrapping negation
    ///
    /// # Safety
    ///
    /// The back-end's target feature must be enabled.
    unsafe fn neg(a: Self::Reg) -> Self::Reg;

    /// Left shift; counts of 32 or more give zero
    ///
    /// # Safety
    ///
    /// The back-end's target feature must be enabled.
    unsafe fn shl(a: Self::Reg, count: u32) -> Self::Reg;

    /// Arithmetic (sign-filling) right shift
    ///
    /// # Safety
    ///
    /// The back-end's target feature must be enabled.
    unsafe fn shr(a: Self::Reg, count: u32) -> Self::Reg;

    /// Logical (zero-filling) right shift
    ///
    /// # Safety
    ///
    /// The back-end's target feature must be enabled.
    unsafe fn shr_logical(a: Self::Reg, count: u32) -> Self::Reg;

    /// Lane-wise wrapping division
    ///
    /// No instruction set divides integer lanes, so every back-end shares this
    /// per-lane path.
    ///
    /// # Safety
    ///
    /// The back-end's target feature must be enabled.
    ///
    /// # Panics
    ///
    /// Panics if any lane of `b` is zero.
    unsafe fn div(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        Self::zip_map(a, b, i32::wrapping_div)
    }

    /// Lane-wise wrapping remainder
    ///
    /// # Safety
    ///
    /// The back-end's target feature must be enabled.
    ///
    /// # Panics
    ///
    /// Panics if any lane of `b` is zero.
    unsafe fn rem(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        Self::zip_map(a, b, i32::wrapping_rem)
    }
}

/// Every category for one element kind
pub trait FloatLanes<T: Copy>: FloatMath<T> + Reduce<T> {}
impl<T: Copy, B: FloatMath<T> + Reduce<T>> FloatLanes<T> for B {}

/// Every category for the integer kind
pub trait IntLanes: IntMath + Reduce<i32> {}
impl<B: IntMath + Reduce<i32>> IntLanes for B {}

// Compile-time selection. Exactly one of these blocks is compiled.

#[cfg(any(
    feature = "force-scalar",
    not(any(
        all(
            any(target_arch = "x86", target_arch = "x86_64"),
            target_feature = "sse2"
        ),
        all(target_arch = "aarch64", target_feature = "neon")
    ))
))]
mod selected {
    use super::scalar::ScalarBackend;
    use crate::Backend;

    pub const SELECTED: Backend = Backend::Scalar;
    pub type ActiveBackend = ScalarBackend;
    pub type F32Lanes = ScalarBackend;
    pub type F64Lanes = ScalarBackend;
    pub type I32Lanes = ScalarBackend;
}

#[cfg(all(
    not(feature = "force-scalar"),
    any(target_arch = "x86", target_arch = "x86_64"),
    target_feature = "sse2",
    not(target_feature = "avx2")
))]
mod selected {
    use super::sse2::Sse2Backend;
    use crate::Backend;

    pub const SELECTED: Backend = Backend::SSE2;
    pub type ActiveBackend = Sse2Backend;
    pub type F32Lanes = Sse2Backend;
    pub type F64Lanes = Sse2Backend;
    pub type I32Lanes = Sse2Backend;
}

#[cfg(all(
    not(feature = "force-scalar"),
    any(target_arch = "x86", target_arch = "x86_64"),
    target_feature = "sse2",
    target_feature = "avx2"
))]
mod selected {
    use super::avx2::Avx2Backend;
    use super::sse2::Sse2Backend;
    use crate::Backend;

    pub const SELECTED: Backend = Backend::AVX2;
    pub type ActiveBackend = Avx2Backend;
    // A 4-lane f32/i32 vector fills exactly one 128-bit register; with avx2
    // enabled the SSE lane code is VEX-encoded and takes its SSE4.1 paths.
    pub type F32Lanes = Sse2Backend;
    pub type F64Lanes = Avx2Backend;
    pub type I32Lanes = Sse2Backend;
}

#[cfg(all(
    not(feature = "force-scalar"),
    target_arch = "aarch64",
    target_feature = "neon"
))]
mod selected {
    use super::neon::NeonBackend;
    use crate::Backend;

    pub const SELECTED: Backend = Backend::NEON;
    pub type ActiveBackend = NeonBackend;
    pub type F32Lanes = NeonBackend;
    pub type F64Lanes = NeonBackend;
    pub type I32Lanes = NeonBackend;
}

/// Back-end compiled into this build
pub const SELECTED: Backend = selected::SELECTED;

/// Type implementing the compiled back-end
pub type ActiveBackend = selected::ActiveBackend;

/// Back-end serving `f32` lanes
pub type F32Lanes = selected::F32Lanes;

/// Back-end serving `f64` lanes
pub type F64Lanes = selected::F64Lanes;

/// Back-end serving `i32` lanes
pub type I32Lanes = selected::I32Lanes;
