//! Bit-trick `log2`, `exp2` and `pow` on whole registers
//!
//! `log2` reads the IEEE exponent field and evaluates a short series on the
//! mantissa; `exp2` writes the integer part straight into the exponent field
//! and multiplies by a polynomial on the fraction. Every step is a lane op of
//! the active back-end. Relative error stays around 1e-3.

use crate::lanes::FloatElement;

#[inline(always)]
fn splat<T: FloatElement>(value: f64) -> T::Reg {
    T::vsplat(T::from_f64(value))
}

/// log2 of each lane; finite x > 0, subnormals included
#[inline]
pub(crate) fn log2_approx<T: FloatElement>(x: T::Reg) -> T::Reg {
    // Subnormals carry no exponent; scaling by 2^MANTISSA_BITS normalizes them
    let tiny = T::vlt(x, T::vsplat(T::MIN_POSITIVE));
    let scale = splat::<T>(f64::from(T::MANTISSA_BITS).exp2());
    let x = T::vselect(tiny, T::vmul(x, scale), x);
    let shift = T::vand(tiny, splat::<T>(f64::from(T::MANTISSA_BITS)));
    let exponent = T::vsub(T::vexponent(x), shift);

    // Mantissa rebuilt in [1, 2)
    let one = T::vsplat(T::ONE);
    let m = T::vor(T::vand(x, T::vsplat(T::MANTISSA_MASK)), one);

    // ln(m) = 2 * atanh(t), t in [0, 1/3)
    let t = T::vdiv(T::vsub(m, one), T::vadd(m, one));
    let t2 = T::vmul(t, t);
    let series = T::vadd(splat::<T>(1.0 / 3.0), T::vmul(t2, splat::<T>(1.0 / 5.0)));
    let series = T::vadd(one, T::vmul(t2, series));
    let ln_m = T::vmul(T::vmul(splat::<T>(2.0), t), series);

    T::vadd(exponent, T::vmul(ln_m, splat::<T>(std::f64::consts::LOG2_E)))
}

/// 2^y of each lane, saturating to 0 below the normal range and to infinity
/// above it
#[inline]
pub(crate) fn exp2_approx<T: FloatElement>(y: T::Reg) -> T::Reg {
    let low = splat::<T>(f64::from(T::MIN_NORMAL_EXP));
    let high = splat::<T>(f64::from(T::OVERFLOW_EXP));
    let underflow = T::vlt(y, low);
    let overflow = T::vge(y, high);
    let nan = T::vne(y, y);

    let clamped = T::vmin(T::vmax(y, low), high);
    let whole = T::vfloor(clamped);
    let u = T::vmul(T::vsub(clamped, whole), splat::<T>(std::f64::consts::LN_2));

    // e^u, u in [0, ln 2)
    let mut poly = splat::<T>(1.0 / 120.0);
    for c in [1.0 / 24.0, 1.0 / 6.0, 0.5, 1.0, 1.0] {
        poly = T::vadd(splat::<T>(c), T::vmul(u, poly));
    }
    let result = T::vmul(T::vexp2_int(whole), poly);

    let result = T::vselect(underflow, T::vsplat(T::ZERO), result);
    let result = T::vselect(overflow, T::vsplat(T::INFINITY), result);
    T::vselect(nan, y, result)
}

/// x^e for every lane via exp2(e * log2(x))
///
/// Defined for x > 0. Zero and infinite bases follow `powf` (0^e, inf^e and
/// x^0); negative and NaN bases give NaN.
pub(crate) fn pow_approx<T: FloatElement>(x: T::Reg, e: T) -> T::Reg {
    if e == T::ZERO {
        return T::vsplat(T::ONE);
    }
    if e.partial_cmp(&T::ZERO).is_none() {
        return T::vsplat(T::NAN);
    }

    let zero = T::vsplat(T::ZERO);
    let result = exp2_approx::<T>(T::vmul(T::vsplat(e), log2_approx::<T>(x)));

    let (at_zero, at_infinity) = if e > T::ZERO {
        (T::ZERO, T::INFINITY)
    } else {
        (T::INFINITY, T::ZERO)
    };
    let result = T::vselect(T::veq(x, zero), T::vsplat(at_zero), result);
    let result = T::vselect(T::veq(x, T::vsplat(T::INFINITY)), T::vsplat(at_infinity), result);
    // !(x >= 0) catches negative and NaN lanes
    let invalid = T::vxor(T::vge(x, zero), T::vsplat(T::ALL_BITS));
    T::vselect(invalid, T::vsplat(T::NAN), result)
}
