//! AVX2 backend implementation (x86_64 256-bit SIMD)
//!
//! A four-lane f64 vector fills exactly one `__m256d`, so this backend serves
//! the f64 kind. The f32 and i32 kinds fit a 128-bit register and stay on the
//! SSE code, which AVX2 builds VEX-encode and run with SSE4.1 paths.
//!
//! # Performance
//!
//! One instruction per lane-wise op instead of two `__m128d` halves; the
//! horizontal folds split the register once and finish in 128-bit lanes.
//!
//! # Safety
//!
//! Only compiled when `avx2` is a compile-time target feature.

#[cfg(target_arch = "x86")]
use std::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use super::{Arith, Compare, FloatMath, LaneStore, Reduce};

/// AVX2 backend (256-bit SIMD for x86_64)
#[derive(Debug, Clone, Copy, Default)]
pub struct Avx2Backend;

/// Bits of 2^52
const F64_MAGIC_BITS: i64 = 0x4330_0000_0000_0000;

/// Split into ([l0, l1], [l2, l3])
#[inline(always)]
unsafe fn halves(a: __m256d) -> (__m128d, __m128d) {
    (_mm256_castpd256_pd128(a), _mm256_extractf128_pd(a, 1))
}

impl LaneStore<f64> for Avx2Backend {
    type Reg = __m256d;

    #[inline(always)]
    unsafe fn load(lanes: [f64; 4]) -> Self::Reg {
        _mm256_loadu_pd(lanes.as_ptr())
    }

    #[inline(always)]
    unsafe fn store(reg: Self::Reg) -> [f64; 4] {
        let mut out = [0.0f64; 4];
        _mm256_storeu_pd(out.as_mut_ptr(), reg);
        out
    }

    #[inline(always)]
    unsafe fn splat(value: f64) -> Self::Reg {
        _mm256_set1_pd(value)
    }
}

impl Arith<f64> for Avx2Backend {
    #[inline(always)]
    unsafe fn add(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        _mm256_add_pd(a, b)
    }

    #[inline(always)]
    unsafe fn sub(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        _mm256_sub_pd(a, b)
    }

    #[inline(always)]
    unsafe fn mul(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        _mm256_mul_pd(a, b)
    }

    #[inline(always)]
    unsafe fn min(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        _mm256_min_pd(a, b)
    }

    #[inline(always)]
    unsafe fn max(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        _mm256_max_pd(a, b)
    }

    #[inline(always)]
    unsafe fn and(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        _mm256_and_pd(a, b)
    }

    #[inline(always)]
    unsafe fn or(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        _mm256_or_pd(a, b)
    }

    #[inline(always)]
    unsafe fn xor(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        _mm256_xor_pd(a, b)
    }

    #[inline(always)]
    unsafe fn and_not(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        _mm256_andnot_pd(b, a)
    }

    #[inline(always)]
    unsafe fn select(mask: Self::Reg, a: Self::Reg, b: Self::Reg) -> Self::Reg {
        _mm256_blendv_pd(b, a, mask)
    }
}

impl Compare<f64> for Avx2Backend {
    // Ordered predicates are false on NaN; NEQ is unordered so NaN != x.
    #[inline(always)]
    unsafe fn eq(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        _mm256_cmp_pd(a, b, _CMP_EQ_OQ)
    }

    #[inline(always)]
    unsafe fn ne(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        _mm256_cmp_pd(a, b, _CMP_NEQ_UQ)
    }

    #[inline(always)]
    unsafe fn lt(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        _mm256_cmp_pd(a, b, _CMP_LT_OQ)
    }

    #[inline(always)]
    unsafe fn le(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        _mm256_cmp_pd(a, b, _CMP_LE_OQ)
    }

    #[inline(always)]
    unsafe fn gt(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        _mm256_cmp_pd(a, b, _CMP_GT_OQ)
    }

    #[inline(always)]
    unsafe fn ge(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        _mm256_cmp_pd(a, b, _CMP_GE_OQ)
    }

    #[inline(always)]
    unsafe fn move_mask(mask: Self::Reg) -> u8 {
        _mm256_movemask_pd(mask) as u8
    }
}

impl Reduce<f64> for Avx2Backend {
    #[inline(always)]
    unsafe fn reduce_add(a: Self::Reg) -> f64 {
        let (lo, hi) = halves(a);
        let lo = _mm_add_sd(lo, _mm_unpackhi_pd(lo, lo));
        let hi = _mm_add_sd(hi, _mm_unpackhi_pd(hi, hi));
        _mm_cvtsd_f64(_mm_add_sd(lo, hi))
    }

    #[inline(always)]
    unsafe fn reduce_mul(a: Self::Reg) -> f64 {
        let (lo, hi) = halves(a);
        let lo = _mm_mul_sd(lo, _mm_unpackhi_pd(lo, lo));
        let hi = _mm_mul_sd(hi, _mm_unpackhi_pd(hi, hi));
        _mm_cvtsd_f64(_mm_mul_sd(lo, hi))
    }

    #[inline(always)]
    unsafe fn reduce_min(a: Self::Reg) -> f64 {
        let (lo, hi) = halves(a);
        let lo = _mm_min_sd(lo, _mm_unpackhi_pd(lo, lo));
        let hi = _mm_min_sd(hi, _mm_unpackhi_pd(hi, hi));
        _mm_cvtsd_f64(_mm_min_sd(lo, hi))
    }

    #[inline(always)]
    unsafe fn reduce_max(a: Self::Reg) -> f64 {
        let (lo, hi) = halves(a);
        let lo = _mm_max_sd(lo, _mm_unpackhi_pd(lo, lo));
        let hi = _mm_max_sd(hi, _mm_unpackhi_pd(hi, hi));
        _mm_cvtsd_f64(_mm_max_sd(lo, hi))
    }
}

impl FloatMath<f64> for Avx2Backend {
    #[inline(always)]
    unsafe fn div(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        _mm256_div_pd(a, b)
    }

    #[inline(always)]
    unsafe fn sqrt(a: Self::Reg) -> Self::Reg {
        _mm256_sqrt_pd(a)
    }

    #[inline(always)]
    unsafe fn abs(a: Self::Reg) -> Self::Reg {
        _mm256_andnot_pd(_mm256_set1_pd(-0.0), a)
    }

    #[inline(always)]
    unsafe fn neg(a: Self::Reg) -> Self::Reg {
        _mm256_xor_pd(a, _mm256_set1_pd(-0.0))
    }

    #[inline(always)]
    unsafe fn floor(a: Self::Reg) -> Self::Reg {
        _mm256_floor_pd(a)
    }

    #[inline(always)]
    unsafe fn ceil(a: Self::Reg) -> Self::Reg {
        _mm256_ceil_pd(a)
    }

    #[inline(always)]
    unsafe fn round(a: Self::Reg) -> Self::Reg {
        _mm256_round_pd(a, _MM_FROUND_TO_NEAREST_INT | _MM_FROUND_NO_EXC)
    }

    #[inline(always)]
    unsafe fn trunc(a: Self::Reg) -> Self::Reg {
        _mm256_round_pd(a, _MM_FROUND_TO_ZERO | _MM_FROUND_NO_EXC)
    }

    // AVX has no double-precision estimates.
    #[inline(always)]
    unsafe fn recip_approx(a: Self::Reg) -> Self::Reg {
        _mm256_div_pd(_mm256_set1_pd(1.0), a)
    }

    #[inline(always)]
    unsafe fn rsqrt_approx(a: Self::Reg) -> Self::Reg {
        _mm256_div_pd(_mm256_set1_pd(1.0), _mm256_sqrt_pd(a))
    }

    // No 64-bit integer <-> double conversion below AVX-512; both directions
    // go through the mantissa of 2^52.
    #[inline(always)]
    unsafe fn exponent(a: Self::Reg) -> Self::Reg {
        let field = _mm256_and_si256(
            _mm256_srli_epi64(_mm256_castpd_si256(a), 52),
            _mm256_set1_epi64x(0x7ff),
        );
        let magic = _mm256_set1_epi64x(F64_MAGIC_BITS);
        let as_float = _mm256_sub_pd(
            _mm256_castsi256_pd(_mm256_or_si256(field, magic)),
            _mm256_castsi256_pd(magic),
        );
        _mm256_sub_pd(as_float, _mm256_set1_pd(1023.0))
    }

    #[inline(always)]
    unsafe fn exp2_int(n: Self::Reg) -> Self::Reg {
        let biased = _mm256_add_pd(n, _mm256_set1_pd(4_503_599_627_370_496.0 + 1023.0));
        _mm256_castsi256_pd(_mm256_slli_epi64(_mm256_castpd_si256(biased), 52))
    }
}

#[cfg(test)]
mod tests {
    use super::super::scalar::ScalarBackend;
    use super::*;

    type A = Avx2Backend;
    type S = ScalarBackend;

    fn bits(lanes: [f64; 4]) -> [u64; 4] {
        lanes.map(f64::to_bits)
    }

    #[test]
    fn test_avx2_add() {
        let result = unsafe {
            <A as LaneStore<f64>>::store(<A as Arith<f64>>::add(
                <A as LaneStore<f64>>::load([1.0, 2.0, 3.0, 4.0]),
                <A as LaneStore<f64>>::load([5.0, 6.0, 7.0, 8.0]),
            ))
        };
        assert_eq!(result, [6.0, 8.0, 10.0, 12.0]);
    }

    #[test]
    fn test_avx2_matches_scalar() {
        let a = [0.1, -2.5, f64::NAN, -0.0];
        let b = [0.3, -2.5, 1.0, 0.0];
        unsafe {
            let (ra, rb) = (<A as LaneStore<f64>>::load(a), <A as LaneStore<f64>>::load(b));
            let store = |r| <A as LaneStore<f64>>::store(r);

            assert_eq!(bits(store(<A as Arith<f64>>::min(ra, rb))), bits(<S as Arith<f64>>::min(a, b)));
            assert_eq!(bits(store(<A as Arith<f64>>::max(ra, rb))), bits(<S as Arith<f64>>::max(a, b)));
            assert_eq!(bits(store(<A as FloatMath<f64>>::round(ra))), bits(<S as FloatMath<f64>>::round(a)));
            assert_eq!(bits(store(<A as FloatMath<f64>>::floor(ra))), bits(<S as FloatMath<f64>>::floor(a)));

            for (simd, scalar) in [
                (<A as Compare<f64>>::eq(ra, rb), <S as Compare<f64>>::eq(a, b)),
                (<A as Compare<f64>>::ne(ra, rb), <S as Compare<f64>>::ne(a, b)),
                (<A as Compare<f64>>::lt(ra, rb), <S as Compare<f64>>::lt(a, b)),
                (<A as Compare<f64>>::ge(ra, rb), <S as Compare<f64>>::ge(a, b)),
            ] {
                assert_eq!(<A as Compare<f64>>::move_mask(simd), <S as Compare<f64>>::move_mask(scalar));
            }
        }
    }

    #[test]
    fn test_avx2_exponent_fields_match_scalar() {
        let a = [3.0, 0.1, 1e300, f64::MIN_POSITIVE];
        let n = [1023.0, -1022.0, 0.0, -3.0];
        unsafe {
            let store = |r| <A as LaneStore<f64>>::store(r);
            assert_eq!(
                store(<A as FloatMath<f64>>::exponent(<A as LaneStore<f64>>::load(a))),
                <S as FloatMath<f64>>::exponent(a)
            );
            assert_eq!(
                bits(store(<A as FloatMath<f64>>::exp2_int(<A as LaneStore<f64>>::load(n)))),
                bits(<S as FloatMath<f64>>::exp2_int(n))
            );
        }
    }

    #[test]
    fn test_avx2_reduce_order() {
        let lanes = [1e17, 1.0, -1e17, 1.0];
        unsafe {
            let reg = <A as LaneStore<f64>>::load(lanes);
            assert_eq!(
                <A as Reduce<f64>>::reduce_add(reg).to_bits(),
                <S as Reduce<f64>>::reduce_add(lanes).to_bits()
            );
            assert_eq!(<A as Reduce<f64>>::reduce_max(reg), 1e17);
            assert_eq!(<A as Reduce<f64>>::reduce_min(reg), -1e17);
        }
    }
}
