//! NEON backend implementation (AArch64 SIMD)
//!
//! This backend uses 128-bit NEON registers: `float32x4_t` for f32,
//! `int32x4_t` for i32 and a pair of `float64x2_t` halves for f64.
//!
//! # Performance
//!
//! Min/max are built from a compare and a bit-select rather than `FMIN`/`FMAX`,
//! whose NaN handling differs from the other back-ends. Sums use pairwise adds
//! so the fold order matches the scalar reference.
//!
//! # Safety
//!
//! NEON is mandatory on AArch64; this module is only compiled there.

use std::arch::aarch64::*;

use super::{Arith, Compare, FloatMath, IntMath, LaneStore, Reduce};

/// NEON backend (128-bit SIMD for AArch64)
#[derive(Debug, Clone, Copy, Default)]
pub struct NeonBackend;

/// Left shift moving lane i's flag to bit i
const LANE_SHIFTS: [i32; 4] = [0, 1, 2, 3];

/// Top bit of each lane packed into bits 0..4
#[inline(always)]
unsafe fn pack_u32_mask(mask: uint32x4_t) -> u8 {
    let flags = vshrq_n_u32::<31>(mask);
    vaddvq_u32(vshlq_u32(flags, vld1q_s32(LANE_SHIFTS.as_ptr()))) as u8
}

#[inline(always)]
fn fold4<T: Copy>(l: [T; 4], f: impl Fn(T, T) -> T) -> T {
    f(f(l[0], l[1]), f(l[2], l[3]))
}

#[inline(always)]
fn lane_min<T: PartialOrd>(a: T, b: T) -> T {
    if a < b {
        a
    } else {
        b
    }
}

#[inline(always)]
fn lane_max<T: PartialOrd>(a: T, b: T) -> T {
    if a > b {
        a
    } else {
        b
    }
}

// ============================================================================
// f32
// ============================================================================

#[inline(always)]
unsafe fn bits_f32(a: float32x4_t) -> uint32x4_t {
    vreinterpretq_u32_f32(a)
}

#[inline(always)]
unsafe fn from_bits_f32(a: uint32x4_t) -> float32x4_t {
    vreinterpretq_f32_u32(a)
}

impl LaneStore<f32> for NeonBackend {
    type Reg = float32x4_t;

    #[inline(always)]
    unsafe fn load(lanes: [f32; 4]) -> Self::Reg {
        vld1q_f32(lanes.as_ptr())
    }

    #[inline(always)]
    unsafe fn store(reg: Self::Reg) -> [f32; 4] {
        let mut out = [0.0f32; 4];
        vst1q_f32(out.as_mut_ptr(), reg);
        out
    }

    #[inline(always)]
    unsafe fn splat(value: f32) -> Self::Reg {
        vdupq_n_f32(value)
    }
}

impl Arith<f32> for NeonBackend {
    #[inline(always)]
    unsafe fn add(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        vaddq_f32(a, b)
    }

    #[inline(always)]
    unsafe fn sub(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        vsubq_f32(a, b)
    }

    #[inline(always)]
    unsafe fn mul(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        vmulq_f32(a, b)
    }

    #[inline(always)]
    unsafe fn min(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        vbslq_f32(vcltq_f32(a, b), a, b)
    }

    #[inline(always)]
    unsafe fn max(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        vbslq_f32(vcgtq_f32(a, b), a, b)
    }

    #[inline(always)]
    unsafe fn and(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        from_bits_f32(vandq_u32(bits_f32(a), bits_f32(b)))
    }

    #[inline(always)]
    unsafe fn or(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        from_bits_f32(vorrq_u32(bits_f32(a), bits_f32(b)))
    }

    #[inline(always)]
    unsafe fn xor(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        from_bits_f32(veorq_u32(bits_f32(a), bits_f32(b)))
    }

    #[inline(always)]
    unsafe fn and_not(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        from_bits_f32(vbicq_u32(bits_f32(a), bits_f32(b)))
    }

    #[inline(always)]
    unsafe fn select(mask: Self::Reg, a: Self::Reg, b: Self::Reg) -> Self::Reg {
        vbslq_f32(bits_f32(mask), a, b)
    }
}

impl Compare<f32> for NeonBackend {
    #[inline(always)]
    unsafe fn eq(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        from_bits_f32(vceqq_f32(a, b))
    }

    #[inline(always)]
    unsafe fn ne(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        from_bits_f32(vmvnq_u32(vceqq_f32(a, b)))
    }

    #[inline(always)]
    unsafe fn lt(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        from_bits_f32(vcltq_f32(a, b))
    }

    #[inline(always)]
    unsafe fn le(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        from_bits_f32(vcleq_f32(a, b))
    }

    #[inline(always)]
    unsafe fn gt(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        from_bits_f32(vcgtq_f32(a, b))
    }

    #[inline(always)]
    unsafe fn ge(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        from_bits_f32(vcgeq_f32(a, b))
    }

    #[inline(always)]
    unsafe fn move_mask(mask: Self::Reg) -> u8 {
        pack_u32_mask(bits_f32(mask))
    }
}

impl Reduce<f32> for NeonBackend {
    #[inline(always)]
    unsafe fn reduce_add(a: Self::Reg) -> f32 {
        // [l0 + l1, l2 + l3, ..]
        let pairs = vpaddq_f32(a, a);
        vgetq_lane_f32::<0>(pairs) + vgetq_lane_f32::<1>(pairs)
    }

    #[inline(always)]
    unsafe fn reduce_mul(a: Self::Reg) -> f32 {
        fold4(<Self as LaneStore<f32>>::store(a), |x, y| x * y)
    }

    #[inline(always)]
    unsafe fn reduce_min(a: Self::Reg) -> f32 {
        fold4(<Self as LaneStore<f32>>::store(a), lane_min)
    }

    #[inline(always)]
    unsafe fn reduce_max(a: Self::Reg) -> f32 {
        fold4(<Self as LaneStore<f32>>::store(a), lane_max)
    }
}

impl FloatMath<f32> for NeonBackend {
    #[inline(always)]
    unsafe fn div(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        vdivq_f32(a, b)
    }

    #[inline(always)]
    unsafe fn sqrt(a: Self::Reg) -> Self::Reg {
        vsqrtq_f32(a)
    }

    #[inline(always)]
    unsafe fn abs(a: Self::Reg) -> Self::Reg {
        vabsq_f32(a)
    }

    #[inline(always)]
    unsafe fn neg(a: Self::Reg) -> Self::Reg {
        vnegq_f32(a)
    }

    #[inline(always)]
    unsafe fn floor(a: Self::Reg) -> Self::Reg {
        vrndmq_f32(a)
    }

    #[inline(always)]
    unsafe fn ceil(a: Self::Reg) -> Self::Reg {
        vrndpq_f32(a)
    }

    #[inline(always)]
    unsafe fn round(a: Self::Reg) -> Self::Reg {
        vrndnq_f32(a)
    }

    #[inline(always)]
    unsafe fn trunc(a: Self::Reg) -> Self::Reg {
        vrndq_f32(a)
    }

    #[inline(always)]
    unsafe fn recip_approx(a: Self::Reg) -> Self::Reg {
        vrecpeq_f32(a)
    }

    #[inline(always)]
    unsafe fn rsqrt_approx(a: Self::Reg) -> Self::Reg {
        vrsqrteq_f32(a)
    }

    #[inline(always)]
    unsafe fn exponent(a: Self::Reg) -> Self::Reg {
        let field = vandq_u32(vshrq_n_u32::<23>(vreinterpretq_u32_f32(a)), vdupq_n_u32(0xff));
        vcvtq_f32_s32(vsubq_s32(vreinterpretq_s32_u32(field), vdupq_n_s32(127)))
    }

    #[inline(always)]
    unsafe fn exp2_int(n: Self::Reg) -> Self::Reg {
        let biased = vaddq_s32(vcvtq_s32_f32(n), vdupq_n_s32(127));
        vreinterpretq_f32_s32(vshlq_n_s32::<23>(biased))
    }
}

// ============================================================================
// f64: two float64x2_t halves, lanes [0, 1] and [2, 3]
// ============================================================================

#[inline(always)]
unsafe fn both_f64(
    a: [float64x2_t; 2],
    b: [float64x2_t; 2],
    f: impl Fn(float64x2_t, float64x2_t) -> float64x2_t,
) -> [float64x2_t; 2] {
    [f(a[0], b[0]), f(a[1], b[1])]
}

#[inline(always)]
unsafe fn each_f64(a: [float64x2_t; 2], f: impl Fn(float64x2_t) -> float64x2_t) -> [float64x2_t; 2] {
    [f(a[0]), f(a[1])]
}

#[inline(always)]
unsafe fn bitwise_f64(
    a: [float64x2_t; 2],
    b: [float64x2_t; 2],
    f: impl Fn(uint64x2_t, uint64x2_t) -> uint64x2_t,
) -> [float64x2_t; 2] {
    both_f64(a, b, |x, y| {
        vreinterpretq_f64_u64(f(vreinterpretq_u64_f64(x), vreinterpretq_u64_f64(y)))
    })
}

#[inline(always)]
unsafe fn compare_f64(
    a: [float64x2_t; 2],
    b: [float64x2_t; 2],
    f: impl Fn(float64x2_t, float64x2_t) -> uint64x2_t,
) -> [float64x2_t; 2] {
    both_f64(a, b, |x, y| vreinterpretq_f64_u64(f(x, y)))
}

impl LaneStore<f64> for NeonBackend {
    type Reg = [float64x2_t; 2];

    #[inline(always)]
    unsafe fn load(lanes: [f64; 4]) -> Self::Reg {
        let ptr = lanes.as_ptr();
        [vld1q_f64(ptr), vld1q_f64(ptr.add(2))]
    }

    #[inline(always)]
    unsafe fn store(reg: Self::Reg) -> [f64; 4] {
        let mut out = [0.0f64; 4];
        vst1q_f64(out.as_mut_ptr(), reg[0]);
        vst1q_f64(out.as_mut_ptr().add(2), reg[1]);
        out
    }

    #[inline(always)]
    unsafe fn splat(value: f64) -> Self::Reg {
        [vdupq_n_f64(value); 2]
    }
}

impl Arith<f64> for NeonBackend {
    #[inline(always)]
    unsafe fn add(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        both_f64(a, b, |x, y| vaddq_f64(x, y))
    }

    #[inline(always)]
    unsafe fn sub(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        both_f64(a, b, |x, y| vsubq_f64(x, y))
    }

    #[inline(always)]
    unsafe fn mul(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        both_f64(a, b, |x, y| vmulq_f64(x, y))
    }

    #[inline(always)]
    unsafe fn min(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        both_f64(a, b, |x, y| vbslq_f64(vcltq_f64(x, y), x, y))
    }

    #[inline(always)]
    unsafe fn max(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        both_f64(a, b, |x, y| vbslq_f64(vcgtq_f64(x, y), x, y))
    }

    #[inline(always)]
    unsafe fn and(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        bitwise_f64(a, b, |x, y| vandq_u64(x, y))
    }

    #[inline(always)]
    unsafe fn or(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        bitwise_f64(a, b, |x, y| vorrq_u64(x, y))
    }

    #[inline(always)]
    unsafe fn xor(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        bitwise_f64(a, b, |x, y| veorq_u64(x, y))
    }

    #[inline(always)]
    unsafe fn and_not(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        bitwise_f64(a, b, |x, y| vbicq_u64(x, y))
    }

    #[inline(always)]
    unsafe fn select(mask: Self::Reg, a: Self::Reg, b: Self::Reg) -> Self::Reg {
        [
            vbslq_f64(vreinterpretq_u64_f64(mask[0]), a[0], b[0]),
            vbslq_f64(vreinterpretq_u64_f64(mask[1]), a[1], b[1]),
        ]
    }
}

impl Compare<f64> for NeonBackend {
    #[inline(always)]
    unsafe fn eq(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        compare_f64(a, b, |x, y| vceqq_f64(x, y))
    }

    #[inline(always)]
    unsafe fn ne(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        compare_f64(a, b, |x, y| veorq_u64(vceqq_f64(x, y), vdupq_n_u64(u64::MAX)))
    }

    #[inline(always)]
    unsafe fn lt(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        compare_f64(a, b, |x, y| vcltq_f64(x, y))
    }

    #[inline(always)]
    unsafe fn le(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        compare_f64(a, b, |x, y| vcleq_f64(x, y))
    }

    #[inline(always)]
    unsafe fn gt(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        compare_f64(a, b, |x, y| vcgtq_f64(x, y))
    }

    #[inline(always)]
    unsafe fn ge(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        compare_f64(a, b, |x, y| vcgeq_f64(x, y))
    }

    #[inline(always)]
    unsafe fn move_mask(mask: Self::Reg) -> u8 {
        let lo = vreinterpretq_u64_f64(mask[0]);
        let hi = vreinterpretq_u64_f64(mask[1]);
        let top = |lane: u64| (lane >> 63) as u8;
        top(vgetq_lane_u64::<0>(lo))
            | top(vgetq_lane_u64::<1>(lo)) << 1
            | top(vgetq_lane_u64::<0>(hi)) << 2
            | top(vgetq_lane_u64::<1>(hi)) << 3
    }
}

impl Reduce<f64> for NeonBackend {
    #[inline(always)]
    unsafe fn reduce_add(a: Self::Reg) -> f64 {
        // [l0 + l1, l2 + l3]
        vaddvq_f64(vpaddq_f64(a[0], a[1]))
    }

    #[inline(always)]
    unsafe fn reduce_mul(a: Self::Reg) -> f64 {
        fold4(<Self as LaneStore<f64>>::store(a), |x, y| x * y)
    }

    #[inline(always)]
    unsafe fn reduce_min(a: Self::Reg) -> f64 {
        fold4(<Self as LaneStore<f64>>::store(a), lane_min)
    }

    #[inline(always)]
    unsafe fn reduce_max(a: Self::Reg) -> f64 {
        fold4(<Self as LaneStore<f64>>::store(a), lane_max)
    }
}

impl FloatMath<f64> for NeonBackend {
    #[inline(always)]
    unsafe fn div(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        both_f64(a, b, |x, y| vdivq_f64(x, y))
    }

    #[inline(always)]
    unsafe fn sqrt(a: Self::Reg) -> Self::Reg {
        each_f64(a, |x| vsqrtq_f64(x))
    }

    #[inline(always)]
    unsafe fn abs(a: Self::Reg) -> Self::Reg {
        each_f64(a, |x| vabsq_f64(x))
    }

    #[inline(always)]
    unsafe fn neg(a: Self::Reg) -> Self::Reg {
        each_f64(a, |x| vnegq_f64(x))
    }

    #[inline(always)]
    unsafe fn floor(a: Self::Reg) -> Self::Reg {
        each_f64(a, |x| vrndmq_f64(x))
    }

    #[inline(always)]
    unsafe fn ceil(a: Self::Reg) -> Self::Reg {
        each_f64(a, |x| vrndpq_f64(x))
    }

    #[inline(always)]
    unsafe fn round(a: Self::Reg) -> Self::Reg {
        each_f64(a, |x| vrndnq_f64(x))
    }

    #[inline(always)]
    unsafe fn trunc(a: Self::Reg) -> Self::Reg {
        each_f64(a, |x| vrndq_f64(x))
    }

    #[inline(always)]
    unsafe fn recip_approx(a: Self::Reg) -> Self::Reg {
        each_f64(a, |x| vrecpeq_f64(x))
    }

    #[inline(always)]
    unsafe fn rsqrt_approx(a: Self::Reg) -> Self::Reg {
        each_f64(a, |x| vrsqrteq_f64(x))
    }

    #[inline(always)]
    unsafe fn exponent(a: Self::Reg) -> Self::Reg {
        each_f64(a, |x| {
            let field = vandq_u64(vshrq_n_u64::<52>(vreinterpretq_u64_f64(x)), vdupq_n_u64(0x7ff));
            vsubq_f64(vcvtq_f64_s64(vreinterpretq_s64_u64(field)), vdupq_n_f64(1023.0))
        })
    }

    #[inline(always)]
    unsafe fn exp2_int(n: Self::Reg) -> Self::Reg {
        each_f64(n, |x| {
            let biased = vaddq_s64(vcvtq_s64_f64(x), vdupq_n_s64(1023));
            vreinterpretq_f64_s64(vshlq_n_s64::<52>(biased))
        })
    }
}

// ============================================================================
// i32
// ============================================================================

#[inline(always)]
unsafe fn mask_s32(a: uint32x4_t) -> int32x4_t {
    vreinterpretq_s32_u32(a)
}

impl LaneStore<i32> for NeonBackend {
    type Reg = int32x4_t;

    #[inline(always)]
    unsafe fn load(lanes: [i32; 4]) -> Self::Reg {
        vld1q_s32(lanes.as_ptr())
    }

    #[inline(always)]
    unsafe fn store(reg: Self::Reg) -> [i32; 4] {
        let mut out = [0i32; 4];
        vst1q_s32(out.as_mut_ptr(), reg);
        out
    }

    #[inline(always)]
    unsafe fn splat(value: i32) -> Self::Reg {
        vdupq_n_s32(value)
    }
}

impl Arith<i32> for NeonBackend {
    #[inline(always)]
    unsafe fn add(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        vaddq_s32(a, b)
    }

    #[inline(always)]
    unsafe fn sub(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        vsubq_s32(a, b)
    }

    #[inline(always)]
    unsafe fn mul(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        vmulq_s32(a, b)
    }

    #[inline(always)]
    unsafe fn min(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        vminq_s32(a, b)
    }

    #[inline(always)]
    unsafe fn max(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        vmaxq_s32(a, b)
    }

    #[inline(always)]
    unsafe fn and(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        vandq_s32(a, b)
    }

    #[inline(always)]
    unsafe fn or(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        vorrq_s32(a, b)
    }

    #[inline(always)]
    unsafe fn xor(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        veorq_s32(a, b)
    }

    #[inline(always)]
    unsafe fn and_not(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        vbicq_s32(a, b)
    }

    #[inline(always)]
    unsafe fn select(mask: Self::Reg, a: Self::Reg, b: Self::Reg) -> Self::Reg {
        vbslq_s32(vreinterpretq_u32_s32(mask), a, b)
    }
}

impl Compare<i32> for NeonBackend {
    #[inline(always)]
    unsafe fn eq(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        mask_s32(vceqq_s32(a, b))
    }

    #[inline(always)]
    unsafe fn ne(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        mask_s32(vmvnq_u32(vceqq_s32(a, b)))
    }

    #[inline(always)]
    unsafe fn lt(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        mask_s32(vcltq_s32(a, b))
    }

    #[inline(always)]
    unsafe fn le(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        mask_s32(vcleq_s32(a, b))
    }

    #[inline(always)]
    unsafe fn gt(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        mask_s32(vcgtq_s32(a, b))
    }

    #[inline(always)]
    unsafe fn ge(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        mask_s32(vcgeq_s32(a, b))
    }

    #[inline(always)]
    unsafe fn move_mask(mask: Self::Reg) -> u8 {
        pack_u32_mask(vreinterpretq_u32_s32(mask))
    }
}

impl Reduce<i32> for NeonBackend {
    #[inline(always)]
    unsafe fn reduce_add(a: Self::Reg) -> i32 {
        vaddvq_s32(a)
    }

    #[inline(always)]
    unsafe fn reduce_mul(a: Self::Reg) -> i32 {
        fold4(<Self as LaneStore<i32>>::store(a), i32::wrapping_mul)
    }

    #[inline(always)]
    unsafe fn reduce_min(a: Self::Reg) -> i32 {
        vminvq_s32(a)
    }

    #[inline(always)]
    unsafe fn reduce_max(a: Self::Reg) -> i32 {
        vmaxvq_s32(a)
    }
}

impl IntMath for NeonBackend {
    #[inline(always)]
    unsafe fn saturating_add(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        vqaddq_s32(a, b)
    }

    #[inline(always)]
    unsafe fn saturating_sub(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        vqsubq_s32(a, b)
    }

    #[inline(always)]
    unsafe fn abs(a: Self::Reg) -> Self::Reg {
        vabsq_s32(a)
    }

    #[inline(always)]
    unsafe fn neg(a: Self::Reg) -> Self::Reg {
        vnegq_s32(a)
    }

    // SSHL/USHL shift right for negative counts; a count of 32 empties the lane.
    #[inline(always)]
    unsafe fn shl(a: Self::Reg, count: u32) -> Self::Reg {
        vshlq_s32(a, vdupq_n_s32(count.min(32) as i32))
    }

    #[inline(always)]
    unsafe fn shr(a: Self::Reg, count: u32) -> Self::Reg {
        vshlq_s32(a, vdupq_n_s32(-(count.min(32) as i32)))
    }

    #[inline(always)]
    unsafe fn shr_logical(a: Self::Reg, count: u32) -> Self::Reg {
        let shifted = vshlq_u32(vreinterpretq_u32_s32(a), vdupq_n_s32(-(count.min(32) as i32)));
        vreinterpretq_s32_u32(shifted)
    }
}
