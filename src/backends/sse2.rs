//! SSE2 backend implementation (x86 baseline SIMD)
//!
//! This backend uses 128-bit SSE2 registers: one `__m128` per f32 vector, one
//! `__m128i` per i32 vector and a pair of `__m128d` halves per f64 vector.
//! SSE2 is available on all x86_64 CPUs as a baseline requirement.
//!
//! When SSE4.1 is a compile-time target feature (always the case under AVX2),
//! rounding, blends, 32-bit multiply and 32-bit min/max use their native
//! instructions; otherwise they are emulated with SSE2 sequences that produce
//! the same bits.
//!
//! # Safety
//!
//! All SSE2 intrinsics are marked `unsafe` by Rust. This module carefully isolates
//! all unsafe code and verifies correctness against the scalar backend.

#[cfg(target_arch = "x86")]
use std::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use super::{Arith, Compare, FloatMath, IntMath, LaneStore, Reduce};

/// SSE2 backend (128-bit SIMD for x86/x86_64)
#[derive(Debug, Clone, Copy, Default)]
pub struct Sse2Backend;

/// 2^23: every f32 at or above this magnitude is already integral
#[cfg(not(target_feature = "sse4.1"))]
const F32_INTEGRAL: f32 = 8_388_608.0;

/// 2^52: every f64 at or above this magnitude is already integral
#[cfg(not(target_feature = "sse4.1"))]
const F64_INTEGRAL: f64 = 4_503_599_627_370_496.0;

// ============================================================================
// f32: one __m128 per vector
// ============================================================================

impl LaneStore<f32> for Sse2Backend {
    type Reg = __m128;

    #[inline(always)]
    unsafe fn load(lanes: [f32; 4]) -> Self::Reg {
        _mm_loadu_ps(lanes.as_ptr())
    }

    #[inline(always)]
    unsafe fn store(reg: Self::Reg) -> [f32; 4] {
        let mut out = [0.0f32; 4];
        _mm_storeu_ps(out.as_mut_ptr(), reg);
        out
    }

    #[inline(always)]
    unsafe fn splat(value: f32) -> Self::Reg {
        _mm_set1_ps(value)
    }
}

impl Arith<f32> for Sse2Backend {
    #[inline(always)]
    unsafe fn add(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        _mm_add_ps(a, b)
    }

    #[inline(always)]
    unsafe fn sub(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        _mm_sub_ps(a, b)
    }

    #[inline(always)]
    unsafe fn mul(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        _mm_mul_ps(a, b)
    }

    // MINPS/MAXPS return the second operand unless the comparison holds,
    // which is exactly the lane contract.
    #[inline(always)]
    unsafe fn min(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        _mm_min_ps(a, b)
    }

    #[inline(always)]
    unsafe fn max(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        _mm_max_ps(a, b)
    }

    #[inline(always)]
    unsafe fn and(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        _mm_and_ps(a, b)
    }

    #[inline(always)]
    unsafe fn or(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        _mm_or_ps(a, b)
    }

    #[inline(always)]
    unsafe fn xor(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        _mm_xor_ps(a, b)
    }

    #[inline(always)]
    unsafe fn and_not(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        // ANDNPS complements its first operand
        _mm_andnot_ps(b, a)
    }

    #[cfg(target_feature = "sse4.1")]
    #[inline(always)]
    unsafe fn select(mask: Self::Reg, a: Self::Reg, b: Self::Reg) -> Self::Reg {
        _mm_blendv_ps(b, a, mask)
    }

    #[cfg(not(target_feature = "sse4.1"))]
    #[inline(always)]
    unsafe fn select(mask: Self::Reg, a: Self::Reg, b: Self::Reg) -> Self::Reg {
        _mm_or_ps(_mm_and_ps(mask, a), _mm_andnot_ps(mask, b))
    }
}

impl Compare<f32> for Sse2Backend {
    #[inline(always)]
    unsafe fn eq(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        _mm_cmpeq_ps(a, b)
    }

    #[inline(always)]
    unsafe fn ne(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        _mm_cmpneq_ps(a, b)
    }

    #[inline(always)]
    unsafe fn lt(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        _mm_cmplt_ps(a, b)
    }

    #[inline(always)]
    unsafe fn le(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        _mm_cmple_ps(a, b)
    }

    #[inline(always)]
    unsafe fn gt(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        _mm_cmpgt_ps(a, b)
    }

    #[inline(always)]
    unsafe fn ge(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        _mm_cmpge_ps(a, b)
    }

    #[inline(always)]
    unsafe fn move_mask(mask: Self::Reg) -> u8 {
        _mm_movemask_ps(mask) as u8
    }
}

impl Reduce<f32> for Sse2Backend {
    // Each fold pairs (l0, l1) and (l2, l3) first, then combines the pairs.
    #[inline(always)]
    unsafe fn reduce_add(a: Self::Reg) -> f32 {
        let pairs = _mm_add_ps(a, _mm_shuffle_ps(a, a, 0b10_11_00_01));
        _mm_cvtss_f32(_mm_add_ss(pairs, _mm_movehl_ps(pairs, pairs)))
    }

    #[inline(always)]
    unsafe fn reduce_mul(a: Self::Reg) -> f32 {
        let pairs = _mm_mul_ps(a, _mm_shuffle_ps(a, a, 0b10_11_00_01));
        _mm_cvtss_f32(_mm_mul_ss(pairs, _mm_movehl_ps(pairs, pairs)))
    }

    #[inline(always)]
    unsafe fn reduce_min(a: Self::Reg) -> f32 {
        let pairs = _mm_min_ps(a, _mm_shuffle_ps(a, a, 0b10_11_00_01));
        _mm_cvtss_f32(_mm_min_ss(pairs, _mm_movehl_ps(pairs, pairs)))
    }

    #[inline(always)]
    unsafe fn reduce_max(a: Self::Reg) -> f32 {
        let pairs = _mm_max_ps(a, _mm_shuffle_ps(a, a, 0b10_11_00_01));
        _mm_cvtss_f32(_mm_max_ss(pairs, _mm_movehl_ps(pairs, pairs)))
    }
}

/// Round to nearest even with SSE2 only
///
/// Adding and subtracting 2^23 pushes the fraction out under the default
/// round-to-nearest-even mode; the sign is restored so -0.4 rounds to -0.0.
#[cfg(not(target_feature = "sse4.1"))]
#[inline(always)]
unsafe fn round_ps_emulated(a: __m128) -> __m128 {
    let sign_bit = _mm_set1_ps(-0.0);
    let magic = _mm_set1_ps(F32_INTEGRAL);
    let abs = _mm_andnot_ps(sign_bit, a);
    let rounded = _mm_sub_ps(_mm_add_ps(abs, magic), magic);
    let signed = _mm_or_ps(rounded, _mm_and_ps(a, sign_bit));
    let fractional = _mm_cmplt_ps(abs, magic);
    _mm_or_ps(_mm_and_ps(fractional, signed), _mm_andnot_ps(fractional, a))
}

#[cfg(not(target_feature = "sse4.1"))]
#[inline(always)]
unsafe fn floor_ps_emulated(a: __m128) -> __m128 {
    let rounded = round_ps_emulated(a);
    let overshoot = _mm_and_ps(_mm_cmpgt_ps(rounded, a), _mm_set1_ps(1.0));
    _mm_sub_ps(rounded, overshoot)
}

impl FloatMath<f32> for Sse2Backend {
    #[inline(always)]
    unsafe fn div(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        _mm_div_ps(a, b)
    }

    #[inline(always)]
    unsafe fn sqrt(a: Self::Reg) -> Self::Reg {
        _mm_sqrt_ps(a)
    }

    #[inline(always)]
    unsafe fn abs(a: Self::Reg) -> Self::Reg {
        _mm_andnot_ps(_mm_set1_ps(-0.0), a)
    }

    #[inline(always)]
    unsafe fn neg(a: Self::Reg) -> Self::Reg {
        _mm_xor_ps(a, _mm_set1_ps(-0.0))
    }

    #[cfg(target_feature = "sse4.1")]
    #[inline(always)]
    unsafe fn floor(a: Self::Reg) -> Self::Reg {
        _mm_floor_ps(a)
    }

    #[cfg(not(target_feature = "sse4.1"))]
    #[inline(always)]
    unsafe fn floor(a: Self::Reg) -> Self::Reg {
        floor_ps_emulated(a)
    }

    #[cfg(target_feature = "sse4.1")]
    #[inline(always)]
    unsafe fn ceil(a: Self::Reg) -> Self::Reg {
        _mm_ceil_ps(a)
    }

    // ceil(a) = -floor(-a) keeps the sign of zero results intact
    #[cfg(not(target_feature = "sse4.1"))]
    #[inline(always)]
    unsafe fn ceil(a: Self::Reg) -> Self::Reg {
        <Self as FloatMath<f32>>::neg(floor_ps_emulated(<Self as FloatMath<f32>>::neg(a)))
    }

    #[cfg(target_feature = "sse4.1")]
    #[inline(always)]
    unsafe fn round(a: Self::Reg) -> Self::Reg {
        _mm_round_ps(a, _MM_FROUND_TO_NEAREST_INT | _MM_FROUND_NO_EXC)
    }

    #[cfg(not(target_feature = "sse4.1"))]
    #[inline(always)]
    unsafe fn round(a: Self::Reg) -> Self::Reg {
        round_ps_emulated(a)
    }

    #[cfg(target_feature = "sse4.1")]
    #[inline(always)]
    unsafe fn trunc(a: Self::Reg) -> Self::Reg {
        _mm_round_ps(a, _MM_FROUND_TO_ZERO | _MM_FROUND_NO_EXC)
    }

    #[cfg(not(target_feature = "sse4.1"))]
    #[inline(always)]
    unsafe fn trunc(a: Self::Reg) -> Self::Reg {
        let negative = _mm_cmplt_ps(a, _mm_setzero_ps());
        <Self as Arith<f32>>::select(negative, <Self as FloatMath<f32>>::ceil(a), <Self as FloatMath<f32>>::floor(a))
    }

    #[inline(always)]
    unsafe fn recip_approx(a: Self::Reg) -> Self::Reg {
        _mm_rcp_ps(a)
    }

    #[inline(always)]
    unsafe fn rsqrt_approx(a: Self::Reg) -> Self::Reg {
        _mm_rsqrt_ps(a)
    }

    #[inline(always)]
    unsafe fn exponent(a: Self::Reg) -> Self::Reg {
        let field = _mm_and_si128(_mm_srli_epi32(_mm_castps_si128(a), 23), _mm_set1_epi32(0xff));
        _mm_cvtepi32_ps(_mm_sub_epi32(field, _mm_set1_epi32(127)))
    }

    #[inline(always)]
    unsafe fn exp2_int(n: Self::Reg) -> Self::Reg {
        let biased = _mm_add_epi32(_mm_cvttps_epi32(n), _mm_set1_epi32(127));
        _mm_castsi128_ps(_mm_slli_epi32(biased, 23))
    }
}

// ============================================================================
// f64: two __m128d halves per vector, lanes [0, 1] and [2, 3]
// ============================================================================

#[inline(always)]
unsafe fn each_pd(a: [__m128d; 2], f: impl Fn(__m128d) -> __m128d) -> [__m128d; 2] {
    [f(a[0]), f(a[1])]
}

#[inline(always)]
unsafe fn both_pd(
    a: [__m128d; 2],
    b: [__m128d; 2],
    f: impl Fn(__m128d, __m128d) -> __m128d,
) -> [__m128d; 2] {
    [f(a[0], b[0]), f(a[1], b[1])]
}

impl LaneStore<f64> for Sse2Backend {
    type Reg = [__m128d; 2];

    #[inline(always)]
    unsafe fn load(lanes: [f64; 4]) -> Self::Reg {
        let ptr = lanes.as_ptr();
        [_mm_loadu_pd(ptr), _mm_loadu_pd(ptr.add(2))]
    }

    #[inline(always)]
    unsafe fn store(reg: Self::Reg) -> [f64; 4] {
        let mut out = [0.0f64; 4];
        _mm_storeu_pd(out.as_mut_ptr(), reg[0]);
        _mm_storeu_pd(out.as_mut_ptr().add(2), reg[1]);
        out
    }

    #[inline(always)]
    unsafe fn splat(value: f64) -> Self::Reg {
        [_mm_set1_pd(value); 2]
    }
}

impl Arith<f64> for Sse2Backend {
    #[inline(always)]
    unsafe fn add(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        both_pd(a, b, |x, y| _mm_add_pd(x, y))
    }

    #[inline(always)]
    unsafe fn sub(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        both_pd(a, b, |x, y| _mm_sub_pd(x, y))
    }

    #[inline(always)]
    unsafe fn mul(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        both_pd(a, b, |x, y| _mm_mul_pd(x, y))
    }

    #[inline(always)]
    unsafe fn min(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        both_pd(a, b, |x, y| _mm_min_pd(x, y))
    }

    #[inline(always)]
    unsafe fn max(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        both_pd(a, b, |x, y| _mm_max_pd(x, y))
    }

    #[inline(always)]
    unsafe fn and(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        both_pd(a, b, |x, y| _mm_and_pd(x, y))
    }

    #[inline(always)]
    unsafe fn or(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        both_pd(a, b, |x, y| _mm_or_pd(x, y))
    }

    #[inline(always)]
    unsafe fn xor(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        both_pd(a, b, |x, y| _mm_xor_pd(x, y))
    }

    #[inline(always)]
    unsafe fn and_not(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        both_pd(a, b, |x, y| _mm_andnot_pd(y, x))
    }

    #[inline(always)]
    unsafe fn select(mask: Self::Reg, a: Self::Reg, b: Self::Reg) -> Self::Reg {
        #[cfg(target_feature = "sse4.1")]
        {
            [
                _mm_blendv_pd(b[0], a[0], mask[0]),
                _mm_blendv_pd(b[1], a[1], mask[1]),
            ]
        }
        #[cfg(not(target_feature = "sse4.1"))]
        {
            <Self as Arith<f64>>::or(<Self as Arith<f64>>::and(mask, a), both_pd(mask, b, |m, y| _mm_andnot_pd(m, y)))
        }
    }
}

impl Compare<f64> for Sse2Backend {
    #[inline(always)]
    unsafe fn eq(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        both_pd(a, b, |x, y| _mm_cmpeq_pd(x, y))
    }

    #[inline(always)]
    unsafe fn ne(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        both_pd(a, b, |x, y| _mm_cmpneq_pd(x, y))
    }

    #[inline(always)]
    unsafe fn lt(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        both_pd(a, b, |x, y| _mm_cmplt_pd(x, y))
    }

    #[inline(always)]
    unsafe fn le(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        both_pd(a, b, |x, y| _mm_cmple_pd(x, y))
    }

    #[inline(always)]
    unsafe fn gt(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        both_pd(a, b, |x, y| _mm_cmpgt_pd(x, y))
    }

    #[inline(always)]
    unsafe fn ge(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        both_pd(a, b, |x, y| _mm_cmpge_pd(x, y))
    }

    #[inline(always)]
    unsafe fn move_mask(mask: Self::Reg) -> u8 {
        (_mm_movemask_pd(mask[0]) | (_mm_movemask_pd(mask[1]) << 2)) as u8
    }
}

impl Reduce<f64> for Sse2Backend {
    #[inline(always)]
    unsafe fn reduce_add(a: Self::Reg) -> f64 {
        let [lo, hi] = each_pd(a, |h| _mm_add_sd(h, _mm_unpackhi_pd(h, h)));
        _mm_cvtsd_f64(_mm_add_sd(lo, hi))
    }

    #[inline(always)]
    unsafe fn reduce_mul(a: Self::Reg) -> f64 {
        let [lo, hi] = each_pd(a, |h| _mm_mul_sd(h, _mm_unpackhi_pd(h, h)));
        _mm_cvtsd_f64(_mm_mul_sd(lo, hi))
    }

    #[inline(always)]
    unsafe fn reduce_min(a: Self::Reg) -> f64 {
        let [lo, hi] = each_pd(a, |h| _mm_min_sd(h, _mm_unpackhi_pd(h, h)));
        _mm_cvtsd_f64(_mm_min_sd(lo, hi))
    }

    #[inline(always)]
    unsafe fn reduce_max(a: Self::Reg) -> f64 {
        let [lo, hi] = each_pd(a, |h| _mm_max_sd(h, _mm_unpackhi_pd(h, h)));
        _mm_cvtsd_f64(_mm_max_sd(lo, hi))
    }
}

/// 2^52 as bits: an integer `k < 2^52` or'ed into its mantissa reads back as `2^52 + k`
const F64_MAGIC_BITS: i64 = 0x4330_0000_0000_0000;

// SSE2 has no 64-bit integer <-> double conversions, so both directions go
// through the 2^52 magic number.
#[inline(always)]
unsafe fn exponent_pd(a: __m128d) -> __m128d {
    let field = _mm_and_si128(_mm_srli_epi64(_mm_castpd_si128(a), 52), _mm_set1_epi64x(0x7ff));
    let magic = _mm_set1_epi64x(F64_MAGIC_BITS);
    let as_float = _mm_sub_pd(_mm_castsi128_pd(_mm_or_si128(field, magic)), _mm_castsi128_pd(magic));
    _mm_sub_pd(as_float, _mm_set1_pd(1023.0))
}

#[inline(always)]
unsafe fn exp2_int_pd(n: __m128d) -> __m128d {
    // The low mantissa bits of 2^52 + 1023 + n hold the biased exponent
    let biased = _mm_add_pd(n, _mm_set1_pd(4_503_599_627_370_496.0 + 1023.0));
    _mm_castsi128_pd(_mm_slli_epi64(_mm_castpd_si128(biased), 52))
}

#[cfg(not(target_feature = "sse4.1"))]
#[inline(always)]
unsafe fn round_pd_emulated(a: __m128d) -> __m128d {
    let sign_bit = _mm_set1_pd(-0.0);
    let magic = _mm_set1_pd(F64_INTEGRAL);
    let abs = _mm_andnot_pd(sign_bit, a);
    let rounded = _mm_sub_pd(_mm_add_pd(abs, magic), magic);
    let signed = _mm_or_pd(rounded, _mm_and_pd(a, sign_bit));
    let fractional = _mm_cmplt_pd(abs, magic);
    _mm_or_pd(_mm_and_pd(fractional, signed), _mm_andnot_pd(fractional, a))
}

#[cfg(not(target_feature = "sse4.1"))]
#[inline(always)]
unsafe fn floor_pd_emulated(a: __m128d) -> __m128d {
    let rounded = round_pd_emulated(a);
    let overshoot = _mm_and_pd(_mm_cmpgt_pd(rounded, a), _mm_set1_pd(1.0));
    _mm_sub_pd(rounded, overshoot)
}

impl FloatMath<f64> for Sse2Backend {
    #[inline(always)]
    unsafe fn div(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        both_pd(a, b, |x, y| _mm_div_pd(x, y))
    }

    #[inline(always)]
    unsafe fn sqrt(a: Self::Reg) -> Self::Reg {
        each_pd(a, |x| _mm_sqrt_pd(x))
    }

    #[inline(always)]
    unsafe fn abs(a: Self::Reg) -> Self::Reg {
        each_pd(a, |x| _mm_andnot_pd(_mm_set1_pd(-0.0), x))
    }

    #[inline(always)]
    unsafe fn neg(a: Self::Reg) -> Self::Reg {
        each_pd(a, |x| _mm_xor_pd(x, _mm_set1_pd(-0.0)))
    }

    #[inline(always)]
    unsafe fn floor(a: Self::Reg) -> Self::Reg {
        #[cfg(target_feature = "sse4.1")]
        {
            each_pd(a, |x| _mm_floor_pd(x))
        }
        #[cfg(not(target_feature = "sse4.1"))]
        {
            each_pd(a, |x| floor_pd_emulated(x))
        }
    }

    #[inline(always)]
    unsafe fn ceil(a: Self::Reg) -> Self::Reg {
        #[cfg(target_feature = "sse4.1")]
        {
            each_pd(a, |x| _mm_ceil_pd(x))
        }
        #[cfg(not(target_feature = "sse4.1"))]
        {
            <Self as FloatMath<f64>>::neg(<Self as FloatMath<f64>>::floor(<Self as FloatMath<f64>>::neg(a)))
        }
    }

    #[inline(always)]
    unsafe fn round(a: Self::Reg) -> Self::Reg {
        #[cfg(target_feature = "sse4.1")]
        {
            each_pd(a, |x| _mm_round_pd(x, _MM_FROUND_TO_NEAREST_INT | _MM_FROUND_NO_EXC))
        }
        #[cfg(not(target_feature = "sse4.1"))]
        {
            each_pd(a, |x| round_pd_emulated(x))
        }
    }

    #[inline(always)]
    unsafe fn trunc(a: Self::Reg) -> Self::Reg {
        #[cfg(target_feature = "sse4.1")]
        {
            each_pd(a, |x| _mm_round_pd(x, _MM_FROUND_TO_ZERO | _MM_FROUND_NO_EXC))
        }
        #[cfg(not(target_feature = "sse4.1"))]
        {
            let negative = each_pd(a, |x| _mm_cmplt_pd(x, _mm_setzero_pd()));
            <Self as Arith<f64>>::select(negative, <Self as FloatMath<f64>>::ceil(a), <Self as FloatMath<f64>>::floor(a))
        }
    }

    // SSE2 has no double-precision estimate instructions.
    #[inline(always)]
    unsafe fn recip_approx(a: Self::Reg) -> Self::Reg {
        <Self as FloatMath<f64>>::div(<Self as LaneStore<f64>>::splat(1.0), a)
    }

    #[inline(always)]
    unsafe fn rsqrt_approx(a: Self::Reg) -> Self::Reg {
        <Self as FloatMath<f64>>::div(<Self as LaneStore<f64>>::splat(1.0), <Self as FloatMath<f64>>::sqrt(a))
    }

    #[inline(always)]
    unsafe fn exponent(a: Self::Reg) -> Self::Reg {
        each_pd(a, |x| exponent_pd(x))
    }

    #[inline(always)]
    unsafe fn exp2_int(n: Self::Reg) -> Self::Reg {
        each_pd(n, |x| exp2_int_pd(x))
    }
}

// ============================================================================
// i32: one __m128i per vector
// ============================================================================

#[inline(always)]
unsafe fn all_ones_epi32() -> __m128i {
    _mm_set1_epi32(-1)
}

/// Lanes whose sign bit is set become all-ones, others zero
#[inline(always)]
unsafe fn sign_mask_epi32(a: __m128i) -> __m128i {
    _mm_srai_epi32(a, 31)
}

/// Saturation target per lane: `i32::MIN` for negative `a`, `i32::MAX` otherwise
#[inline(always)]
unsafe fn saturation_bound_epi32(a: __m128i) -> __m128i {
    _mm_xor_si128(sign_mask_epi32(a), _mm_set1_epi32(i32::MAX))
}

impl LaneStore<i32> for Sse2Backend {
    type Reg = __m128i;

    #[inline(always)]
    unsafe fn load(lanes: [i32; 4]) -> Self::Reg {
        _mm_loadu_si128(lanes.as_ptr() as *const __m128i)
    }

    #[inline(always)]
    unsafe fn store(reg: Self::Reg) -> [i32; 4] {
        let mut out = [0i32; 4];
        _mm_storeu_si128(out.as_mut_ptr() as *mut __m128i, reg);
        out
    }

    #[inline(always)]
    unsafe fn splat(value: i32) -> Self::Reg {
        _mm_set1_epi32(value)
    }
}

impl Arith<i32> for Sse2Backend {
    #[inline(always)]
    unsafe fn add(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        _mm_add_epi32(a, b)
    }

    #[inline(always)]
    unsafe fn sub(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        _mm_sub_epi32(a, b)
    }

    #[cfg(target_feature = "sse4.1")]
    #[inline(always)]
    unsafe fn mul(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        _mm_mullo_epi32(a, b)
    }

    // The low 32 bits of the unsigned 64-bit products are the wrapping
    // signed products.
    #[cfg(not(target_feature = "sse4.1"))]
    #[inline(always)]
    unsafe fn mul(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        let even = _mm_mul_epu32(a, b);
        let odd = _mm_mul_epu32(_mm_srli_si128(a, 4), _mm_srli_si128(b, 4));
        _mm_unpacklo_epi32(
            _mm_shuffle_epi32(even, 0b00_00_10_00),
            _mm_shuffle_epi32(odd, 0b00_00_10_00),
        )
    }

    #[cfg(target_feature = "sse4.1")]
    #[inline(always)]
    unsafe fn min(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        _mm_min_epi32(a, b)
    }

    #[cfg(not(target_feature = "sse4.1"))]
    #[inline(always)]
    unsafe fn min(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        <Self as Arith<i32>>::select(_mm_cmplt_epi32(a, b), a, b)
    }

    #[cfg(target_feature = "sse4.1")]
    #[inline(always)]
    unsafe fn max(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        _mm_max_epi32(a, b)
    }

    #[cfg(not(target_feature = "sse4.1"))]
    #[inline(always)]
    unsafe fn max(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        <Self as Arith<i32>>::select(_mm_cmpgt_epi32(a, b), a, b)
    }

    #[inline(always)]
    unsafe fn and(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        _mm_and_si128(a, b)
    }

    #[inline(always)]
    unsafe fn or(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        _mm_or_si128(a, b)
    }

    #[inline(always)]
    unsafe fn xor(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        _mm_xor_si128(a, b)
    }

    #[inline(always)]
    unsafe fn and_not(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        _mm_andnot_si128(b, a)
    }

    #[cfg(target_feature = "sse4.1")]
    #[inline(always)]
    unsafe fn select(mask: Self::Reg, a: Self::Reg, b: Self::Reg) -> Self::Reg {
        _mm_blendv_epi8(b, a, mask)
    }

    #[cfg(not(target_feature = "sse4.1"))]
    #[inline(always)]
    unsafe fn select(mask: Self::Reg, a: Self::Reg, b: Self::Reg) -> Self::Reg {
        _mm_or_si128(_mm_and_si128(mask, a), _mm_andnot_si128(mask, b))
    }
}

impl Compare<i32> for Sse2Backend {
    #[inline(always)]
    unsafe fn eq(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        _mm_cmpeq_epi32(a, b)
    }

    #[inline(always)]
    unsafe fn ne(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        _mm_xor_si128(_mm_cmpeq_epi32(a, b), all_ones_epi32())
    }

    #[inline(always)]
    unsafe fn lt(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        _mm_cmplt_epi32(a, b)
    }

    #[inline(always)]
    unsafe fn le(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        _mm_xor_si128(_mm_cmpgt_epi32(a, b), all_ones_epi32())
    }

    #[inline(always)]
    unsafe fn gt(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        _mm_cmpgt_epi32(a, b)
    }

    #[inline(always)]
    unsafe fn ge(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        _mm_xor_si128(_mm_cmplt_epi32(a, b), all_ones_epi32())
    }

    #[inline(always)]
    unsafe fn move_mask(mask: Self::Reg) -> u8 {
        _mm_movemask_ps(_mm_castsi128_ps(mask)) as u8
    }
}

impl Reduce<i32> for Sse2Backend {
    #[inline(always)]
    unsafe fn reduce_add(a: Self::Reg) -> i32 {
        let pairs = _mm_add_epi32(a, _mm_shuffle_epi32(a, 0b10_11_00_01));
        _mm_cvtsi128_si32(_mm_add_epi32(pairs, _mm_shuffle_epi32(pairs, 0b00_00_11_10)))
    }

    #[inline(always)]
    unsafe fn reduce_mul(a: Self::Reg) -> i32 {
        let pairs = <Self as Arith<i32>>::mul(a, _mm_shuffle_epi32(a, 0b10_11_00_01));
        _mm_cvtsi128_si32(<Self as Arith<i32>>::mul(pairs, _mm_shuffle_epi32(pairs, 0b00_00_11_10)))
    }

    #[inline(always)]
    unsafe fn reduce_min(a: Self::Reg) -> i32 {
        let pairs = <Self as Arith<i32>>::min(a, _mm_shuffle_epi32(a, 0b10_11_00_01));
        _mm_cvtsi128_si32(<Self as Arith<i32>>::min(pairs, _mm_shuffle_epi32(pairs, 0b00_00_11_10)))
    }

    #[inline(always)]
    unsafe fn reduce_max(a: Self::Reg) -> i32 {
        let pairs = <Self as Arith<i32>>::max(a, _mm_shuffle_epi32(a, 0b10_11_00_01));
        _mm_cvtsi128_si32(<Self as Arith<i32>>::max(pairs, _mm_shuffle_epi32(pairs, 0b00_00_11_10)))
    }
}

impl IntMath for Sse2Backend {
    // Overflow iff both operands share a sign the sum does not.
    #[inline(always)]
    unsafe fn saturating_add(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        let sum = _mm_add_epi32(a, b);
        let overflow = _mm_andnot_si128(_mm_xor_si128(a, b), _mm_xor_si128(a, sum));
        <Self as Arith<i32>>::select(sign_mask_epi32(overflow), saturation_bound_epi32(a), sum)
    }

    // Overflow iff the operands differ in sign and the difference loses a's.
    #[inline(always)]
    unsafe fn saturating_sub(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        let diff = _mm_sub_epi32(a, b);
        let overflow = _mm_and_si128(_mm_xor_si128(a, b), _mm_xor_si128(a, diff));
        <Self as Arith<i32>>::select(sign_mask_epi32(overflow), saturation_bound_epi32(a), diff)
    }

    #[inline(always)]
    unsafe fn abs(a: Self::Reg) -> Self::Reg {
        let sign = sign_mask_epi32(a);
        _mm_sub_epi32(_mm_xor_si128(a, sign), sign)
    }

    #[inline(always)]
    unsafe fn neg(a: Self::Reg) -> Self::Reg {
        _mm_sub_epi32(_mm_setzero_si128(), a)
    }

    #[inline(always)]
    unsafe fn shl(a: Self::Reg, count: u32) -> Self::Reg {
        _mm_sll_epi32(a, _mm_cvtsi32_si128(count.min(32) as i32))
    }

    #[inline(always)]
    unsafe fn shr(a: Self::Reg, count: u32) -> Self::Reg {
        _mm_sra_epi32(a, _mm_cvtsi32_si128(count.min(32) as i32))
    }

    #[inline(always)]
    unsafe fn shr_logical(a: Self::Reg, count: u32) -> Self::Reg {
        _mm_srl_epi32(a, _mm_cvtsi32_si128(count.min(32) as i32))
    }
}
