//! Scalar (non-SIMD) backend implementation
//!
//! This is the portable baseline implementation that works on all platforms.
//! Registers are plain `[T; 4]` arrays, so the padding lanes exist here too
//! and every padding rule is exercised on every target.
//!
//! # Performance
//!
//! This backend provides the correctness reference but no SIMD acceleration.
//! Every SIMD back-end is tested lane-for-lane against it.

use std::array;

use super::{Arith, Compare, FloatMath, IntMath, LaneStore, Reduce};

/// Scalar backend (portable, no SIMD)
#[derive(Debug, Clone, Copy, Default)]
pub struct ScalarBackend;

#[inline(always)]
fn zip<T: Copy, U>(a: [T; 4], b: [T; 4], f: impl Fn(T, T) -> U) -> [U; 4] {
    array::from_fn(|i| f(a[i], b[i]))
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

// f32 and f64 differ only in their bit type, so one expansion covers both.
macro_rules! scalar_float_lanes {
    ($t:ty, $bits:ty, mantissa: $mantissa:expr, bias: $bias:expr) => {
        // SAFETY: Every method here is safe Rust. They are marked unsafe only
        // to match the back-end trait interface.
        impl LaneStore<$t> for ScalarBackend {
            type Reg = [$t; 4];

            #[inline(always)]
            unsafe fn load(lanes: [$t; 4]) -> Self::Reg {
                lanes
            }

            #[inline(always)]
            unsafe fn store(reg: Self::Reg) -> [$t; 4] {
                reg
            }

            #[inline(always)]
            unsafe fn splat(value: $t) -> Self::Reg {
                [value; 4]
            }
        }

        impl Arith<$t> for ScalarBackend {
            #[inline(always)]
            unsafe fn add(a: Self::Reg, b: Self::Reg) -> Self::Reg {
                zip(a, b, |x, y| x + y)
            }

            #[inline(always)]
            unsafe fn sub(a: Self::Reg, b: Self::Reg) -> Self::Reg {
                zip(a, b, |x, y| x - y)
            }

            #[inline(always)]
            unsafe fn mul(a: Self::Reg, b: Self::Reg) -> Self::Reg {
                zip(a, b, |x, y| x * y)
            }

            #[inline(always)]
            unsafe fn min(a: Self::Reg, b: Self::Reg) -> Self::Reg {
                zip(a, b, lane_min)
            }

            #[inline(always)]
            unsafe fn max(a: Self::Reg, b: Self::Reg) -> Self::Reg {
                zip(a, b, lane_max)
            }

            #[inline(always)]
            unsafe fn and(a: Self::Reg, b: Self::Reg) -> Self::Reg {
                zip(a, b, |x, y| <$t>::from_bits(x.to_bits() & y.to_bits()))
            }

            #[inline(always)]
            unsafe fn or(a: Self::Reg, b: Self::Reg) -> Self::Reg {
                zip(a, b, |x, y| <$t>::from_bits(x.to_bits() | y.to_bits()))
            }

            #[inline(always)]
            unsafe fn xor(a: Self::Reg, b: Self::Reg) -> Self::Reg {
                zip(a, b, |x, y| <$t>::from_bits(x.to_bits() ^ y.to_bits()))
            }

            #[inline(always)]
            unsafe fn and_not(a: Self::Reg, b: Self::Reg) -> Self::Reg {
                zip(a, b, |x, y| <$t>::from_bits(x.to_bits() & !y.to_bits()))
            }

            #[inline(always)]
            unsafe fn select(mask: Self::Reg, a: Self::Reg, b: Self::Reg) -> Self::Reg {
                array::from_fn(|i| {
                    let m = mask[i].to_bits();
                    <$t>::from_bits((m & a[i].to_bits()) | (!m & b[i].to_bits()))
                })
            }
        }

        impl Compare<$t> for ScalarBackend {
            #[inline(always)]
            unsafe fn eq(a: Self::Reg, b: Self::Reg) -> Self::Reg {
                zip(a, b, |x, y| <$t>::from_bits(if x == y { <$bits>::MAX } else { 0 }))
            }

            #[inline(always)]
            unsafe fn ne(a: Self::Reg, b: Self::Reg) -> Self::Reg {
                zip(a, b, |x, y| <$t>::from_bits(if x != y { <$bits>::MAX } else { 0 }))
            }

            #[inline(always)]
            unsafe fn lt(a: Self::Reg, b: Self::Reg) -> Self::Reg {
                zip(a, b, |x, y| <$t>::from_bits(if x < y { <$bits>::MAX } else { 0 }))
            }

            #[inline(always)]
            unsafe fn le(a: Self::Reg, b: Self::Reg) -> Self::Reg {
                zip(a, b, |x, y| <$t>::from_bits(if x <= y { <$bits>::MAX } else { 0 }))
            }

            #[inline(always)]
            unsafe fn gt(a: Self::Reg, b: Self::Reg) -> Self::Reg {
                zip(a, b, |x, y| <$t>::from_bits(if x > y { <$bits>::MAX } else { 0 }))
            }

            #[inline(always)]
            unsafe fn ge(a: Self::Reg, b: Self::Reg) -> Self::Reg {
                zip(a, b, |x, y| <$t>::from_bits(if x >= y { <$bits>::MAX } else { 0 }))
            }

            #[inline(always)]
            unsafe fn move_mask(mask: Self::Reg) -> u8 {
                let sign = <$bits>::BITS - 1;
                mask.iter()
                    .enumerate()
                    .fold(0u8, |acc, (i, lane)| acc | (((lane.to_bits() >> sign) as u8) << i))
            }
        }

        impl Reduce<$t> for ScalarBackend {
            #[inline(always)]
            unsafe fn reduce_add(a: Self::Reg) -> $t {
                (a[0] + a[1]) + (a[2] + a[3])
            }

            #[inline(always)]
            unsafe fn reduce_mul(a: Self::Reg) -> $t {
                (a[0] * a[1]) * (a[2] * a[3])
            }

            #[inline(always)]
            unsafe fn reduce_min(a: Self::Reg) -> $t {
                lane_min(lane_min(a[0], a[1]), lane_min(a[2], a[3]))
            }

            #[inline(always)]
            unsafe fn reduce_max(a: Self::Reg) -> $t {
                lane_max(lane_max(a[0], a[1]), lane_max(a[2], a[3]))
            }
        }

        impl FloatMath<$t> for ScalarBackend {
            #[inline(always)]
            unsafe fn div(a: Self::Reg, b: Self::Reg) -> Self::Reg {
                zip(a, b, |x, y| x / y)
            }

            #[inline(always)]
            unsafe fn sqrt(a: Self::Reg) -> Self::Reg {
                a.map(<$t>::sqrt)
            }

            #[inline(always)]
            unsafe fn abs(a: Self::Reg) -> Self::Reg {
                a.map(<$t>::abs)
            }

            #[inline(always)]
            unsafe fn neg(a: Self::Reg) -> Self::Reg {
                a.map(|x| -x)
            }

            #[inline(always)]
            unsafe fn floor(a: Self::Reg) -> Self::Reg {
                a.map(<$t>::floor)
            }

            #[inline(always)]
            unsafe fn ceil(a: Self::Reg) -> Self::Reg {
                a.map(<$t>::ceil)
            }

            #[inline(always)]
            unsafe fn round(a: Self::Reg) -> Self::Reg {
                a.map(<$t>::round_ties_even)
            }

            #[inline(always)]
            unsafe fn trunc(a: Self::Reg) -> Self::Reg {
                a.map(<$t>::trunc)
            }

            // No estimate instruction exists here; the exact value is a valid
            // estimate.
            #[inline(always)]
            unsafe fn recip_approx(a: Self::Reg) -> Self::Reg {
                a.map(|x| 1.0 / x)
            }

            #[inline(always)]
            unsafe fn rsqrt_approx(a: Self::Reg) -> Self::Reg {
                a.map(|x| 1.0 / x.sqrt())
            }

            #[inline(always)]
            unsafe fn exponent(a: Self::Reg) -> Self::Reg {
                a.map(|x| {
                    let field = (x.to_bits() >> $mantissa) & (2 * $bias + 1);
                    (field as i32 - $bias as i32) as $t
                })
            }

            #[inline(always)]
            unsafe fn exp2_int(n: Self::Reg) -> Self::Reg {
                n.map(|e| <$t>::from_bits(((e as i32 + $bias as i32) as $bits) << $mantissa))
            }
        }
    };
}

scalar_float_lanes!(f32, u32, mantissa: 23, bias: 127);
scalar_float_lanes!(f64, u64, mantissa: 52, bias: 1023);

#[inline(always)]
fn int_mask(condition: bool) -> i32 {
    if condition {
        -1
    } else {
        0
    }
}

// SAFETY: Every method below is safe Rust. They are marked unsafe only to
// match the back-end trait interface.
impl LaneStore<i32> for ScalarBackend {
    type Reg = [i32; 4];

    #[inline(always)]
    unsafe fn load(lanes: [i32; 4]) -> Self::Reg {
        lanes
    }

    #[inline(always)]
    unsafe fn store(reg: Self::Reg) -> [i32; 4] {
        reg
    }

    #[inline(always)]
    unsafe fn splat(value: i32) -> Self::Reg {
        [value; 4]
    }
}

impl Arith<i32> for ScalarBackend {
    #[inline(always)]
    unsafe fn add(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        zip(a, b, i32::wrapping_add)
    }

    #[inline(always)]
    unsafe fn sub(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        zip(a, b, i32::wrapping_sub)
    }

    #[inline(always)]
    unsafe fn mul(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        zip(a, b, i32::wrapping_mul)
    }

    #[inline(always)]
    unsafe fn min(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        zip(a, b, lane_min)
    }

    #[inline(always)]
    unsafe fn max(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        zip(a, b, lane_max)
    }

    #[inline(always)]
    unsafe fn and(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        zip(a, b, |x, y| x & y)
    }

    #[inline(always)]
    unsafe fn or(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        zip(a, b, |x, y| x | y)
    }

    #[inline(always)]
    unsafe fn xor(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        zip(a, b, |x, y| x ^ y)
    }

    #[inline(always)]
    unsafe fn and_not(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        zip(a, b, |x, y| x & !y)
    }

    #[inline(always)]
    unsafe fn select(mask: Self::Reg, a: Self::Reg, b: Self::Reg) -> Self::Reg {
        array::from_fn(|i| (mask[i] & a[i]) | (!mask[i] & b[i]))
    }
}

impl Compare<i32> for ScalarBackend {
    #[inline(always)]
    unsafe fn eq(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        zip(a, b, |x, y| int_mask(x == y))
    }

    #[inline(always)]
    unsafe fn ne(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        zip(a, b, |x, y| int_mask(x != y))
    }

    #[inline(always)]
    unsafe fn lt(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        zip(a, b, |x, y| int_mask(x < y))
    }

    #[inline(always)]
    unsafe fn le(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        zip(a, b, |x, y| int_mask(x <= y))
    }

    #[inline(always)]
    unsafe fn gt(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        zip(a, b, |x, y| int_mask(x > y))
    }

    #[inline(always)]
    unsafe fn ge(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        zip(a, b, |x, y| int_mask(x >= y))
    }

    #[inline(always)]
    unsafe fn move_mask(mask: Self::Reg) -> u8 {
        mask.iter()
            .enumerate()
            .fold(0u8, |acc, (i, &lane)| acc | ((((lane as u32) >> 31) as u8) << i))
    }
}

impl Reduce<i32> for ScalarBackend {
    #[inline(always)]
    unsafe fn reduce_add(a: Self::Reg) -> i32 {
        a[0].wrapping_add(a[1]).wrapping_add(a[2].wrapping_add(a[3]))
    }

    #[inline(always)]
    unsafe fn reduce_mul(a: Self::Reg) -> i32 {
        a[0].wrapping_mul(a[1]).wrapping_mul(a[2].wrapping_mul(a[3]))
    }

    #[inline(always)]
    unsafe fn reduce_min(a: Self::Reg) -> i32 {
        lane_min(lane_min(a[0], a[1]), lane_min(a[2], a[3]))
    }

    #[inline(always)]
    unsafe fn reduce_max(a: Self::Reg) -> i32 {
        lane_max(lane_max(a[0], a[1]), lane_max(a[2], a[3]))
    }
}

impl IntMath for ScalarBackend {
    #[inline(always)]
    unsafe fn saturating_add(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        zip(a, b, i32::saturating_add)
    }

    #[inline(always)]
    unsafe fn saturating_sub(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        zip(a, b, i32::saturating_sub)
    }

    #[inline(always)]
    unsafe fn abs(a: Self::Reg) -> Self::Reg {
        a.map(i32::wrapping_abs)
    }

    #[inline(always)]
    unsafe fn neg(a: Self::Reg) -> Self::Reg {
        a.map(i32::wrapping_neg)
    }

    #[inline(always)]
    unsafe fn shl(a: Self::Reg, count: u32) -> Self::Reg {
        a.map(|x| if count >= 32 { 0 } else { x << count })
    }

    #[inline(always)]
    unsafe fn shr(a: Self::Reg, count: u32) -> Self::Reg {
        a.map(|x| x >> count.min(31))
    }

    #[inline(always)]
    unsafe fn shr_logical(a: Self::Reg, count: u32) -> Self::Reg {
        a.map(|x| if count >= 32 { 0 } else { ((x as u32) >> count) as i32 })
    }
}
