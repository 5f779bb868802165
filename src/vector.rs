//! Fixed-width vector type over the compiled back-end
//!
//! `Vector<T, N>` holds `N` (2, 3 or 4) components of one element kind in a
//! single 4-lane register. Lanes `N..4` are padding and are zero after every
//! operation: operations that could disturb them (negation, division,
//! reciprocal, bitwise not, scalar broadcasts, transcendentals) re-zero them
//! as their last step, and every other operation checks the invariant in
//! debug builds.

use std::array;
use std::fmt;
use std::ops::{
    Add, AddAssign, BitAnd, BitOr, BitXor, Div, DivAssign, Mul, MulAssign, Neg, Not, Rem, Shl,
    Shr, Sub, SubAssign,
};

use crate::fastmath;
use crate::lanes::{self, Element, FloatElement, IntElement, PaddingFill};
use crate::{RayoError, Result};

/// Fixed-width vector of `N` components
///
/// # Examples
///
/// ```
/// use rayo::Vec3f;
///
/// let a = Vec3f::new(1.0, 2.0, 3.0);
/// let b = Vec3f::new(4.0, 5.0, 6.0);
///
/// assert_eq!((a + b).to_array(), [5.0, 7.0, 9.0]);
/// assert_eq!(a.dot(b), 32.0);
/// ```
#[derive(Clone, Copy)]
#[repr(transparent)]
pub struct Vector<T: Element, const N: usize> {
    reg: T::Reg,
}

/// Two `f32` components
pub type Vec2f = Vector<f32, 2>;
/// Three `f32` components
pub type Vec3f = Vector<f32, 3>;
/// Four `f32` components
pub type Vec4f = Vector<f32, 4>;
/// Two `f64` components
pub type Vec2d = Vector<f64, 2>;
/// Three `f64` components
pub type Vec3d = Vector<f64, 3>;
/// Four `f64` components
pub type Vec4d = Vector<f64, 4>;
/// Two `i32` components
pub type Vec2i = Vector<i32, 2>;
/// Three `i32` components
pub type Vec3i = Vector<i32, 3>;
/// Four `i32` components
pub type Vec4i = Vector<i32, 4>;

impl<T: Element, const N: usize> Vector<T, N> {
    const ARITY: () = assert!(N >= 2 && N <= 4, "vectors have 2, 3 or 4 components");

    /// Number of logical components
    pub const DIM: usize = N;

    /// Wrap a register whose padding is already zero
    #[inline(always)]
    pub(crate) fn from_reg(reg: T::Reg) -> Self {
        let () = Self::ARITY;
        debug_assert!(
            lanes::padding_is_zero::<T, N>(reg),
            "padding lane disturbed: {:?}",
            T::vstore(reg)
        );
        Self { reg }
    }

    /// Wrap a register, zeroing its padding lanes
    #[inline(always)]
    pub(crate) fn from_reg_masked(reg: T::Reg) -> Self {
        let () = Self::ARITY;
        Self {
            reg: T::vand(reg, lanes::padding_mask::<T, N>()),
        }
    }

    #[inline(always)]
    pub(crate) fn reg(self) -> T::Reg {
        self.reg
    }

    /// All components zero
    #[inline]
    pub fn zero() -> Self {
        Self::from_reg(T::vsplat(T::ZERO))
    }

    /// All components one
    #[inline]
    pub fn one() -> Self {
        Self::splat(T::ONE)
    }

    /// Every component set to `value`
    #[inline]
    pub fn splat(value: T) -> Self {
        Self::from_reg_masked(T::vsplat(value))
    }

    /// Every logical component has all bits set
    #[inline]
    pub fn all_bits() -> Self {
        Self::from_reg(lanes::padding_mask::<T, N>())
    }

    /// Build from components in X, Y, Z, W order
    #[inline]
    pub fn from_array(components: [T; N]) -> Self {
        Self::from_reg(T::vload(array::from_fn(|i| {
            if i < N {
                components[i]
            } else {
                T::ZERO
            }
        })))
    }

    /// Components in X, Y, Z, W order
    #[inline]
    pub fn to_array(self) -> [T; N] {
        let lanes = T::vstore(self.reg);
        array::from_fn(|i| lanes[i])
    }

    /// Build from the first `N` elements of a slice
    ///
    /// # Errors
    ///
    /// Returns [`RayoError::SizeMismatch`] if the slice holds fewer than `N`
    /// elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use rayo::Vec3i;
    ///
    /// let v = Vec3i::from_slice(&[1, 2, 3, 4]).unwrap();
    /// assert_eq!(v.to_array(), [1, 2, 3]);
    /// assert!(Vec3i::from_slice(&[1, 2]).is_err());
    /// ```
    pub fn from_slice(slice: &[T]) -> Result<Self> {
        if slice.len() < N {
            return Err(RayoError::SizeMismatch {
                expected: N,
                actual: slice.len(),
            });
        }
        Ok(Self::from_array(array::from_fn(|i| slice[i])))
    }

    /// Component `index`, or `None` past the last logical component
    #[inline]
    pub fn get(self, index: usize) -> Option<T> {
        (index < N).then(|| T::vstore(self.reg)[index])
    }

    /// Copy with component `index` replaced
    ///
    /// # Panics
    ///
    /// Panics if `index >= N`.
    pub fn with(self, index: usize, value: T) -> Self {
        assert!(index < N, "component {index} out of range for {} components", N);
        let mut lanes = T::vstore(self.reg);
        lanes[index] = value;
        Self::from_reg(T::vload(lanes))
    }

    #[inline]
    pub fn x(self) -> T {
        T::vstore(self.reg)[0]
    }

    #[inline]
    pub fn y(self) -> T {
        T::vstore(self.reg)[1]
    }

    /// All four physical lanes, padding included
    #[inline]
    pub fn physical_lanes(self) -> [T; 4] {
        T::vstore(self.reg)
    }

    /// True when every padding lane holds the zero bit pattern
    #[inline]
    pub fn padding_is_zero(self) -> bool {
        lanes::padding_is_zero::<T, N>(self.reg)
    }

    /// Apply `f` to every logical component
    #[inline]
    pub fn map(self, f: impl Fn(T) -> T) -> Self {
        Self::from_array(self.to_array().map(f))
    }

    /// Apply `f` to every pair of logical components
    #[inline]
    pub fn zip_map(self, rhs: Self, f: impl Fn(T, T) -> T) -> Self {
        let (a, b) = (self.to_array(), rhs.to_array());
        Self::from_array(array::from_fn(|i| f(a[i], b[i])))
    }

    // ------------------------------------------------------------------
    // Elementwise arithmetic
    // ------------------------------------------------------------------

    /// Component-wise sum (wrapping for integers)
    #[inline]
    pub fn add(self, rhs: Self) -> Self {
        Self::from_reg(T::vadd(self.reg, rhs.reg))
    }

    /// Component-wise difference (wrapping for integers)
    #[inline]
    pub fn sub(self, rhs: Self) -> Self {
        Self::from_reg(T::vsub(self.reg, rhs.reg))
    }

    /// Component-wise product (wrapping for integers)
    #[inline]
    pub fn mul(self, rhs: Self) -> Self {
        Self::from_reg(T::vmul(self.reg, rhs.reg))
    }

    #[inline]
    pub fn add_scalar(self, value: T) -> Self {
        Self::from_reg_masked(T::vadd(self.reg, T::vsplat(value)))
    }

    #[inline]
    pub fn sub_scalar(self, value: T) -> Self {
        Self::from_reg_masked(T::vsub(self.reg, T::vsplat(value)))
    }

    #[inline]
    pub fn mul_scalar(self, value: T) -> Self {
        Self::from_reg_masked(T::vmul(self.reg, T::vsplat(value)))
    }

    /// `self * b + c`, rounded twice on every back-end
    #[inline]
    pub fn mul_add(self, b: Self, c: Self) -> Self {
        self.mul(b).add(c)
    }

    #[inline]
    pub fn neg(self) -> Self {
        Self::from_reg_masked(T::vneg(self.reg))
    }

    /// Absolute value (wrapping for `i32::MIN`)
    #[inline]
    pub fn abs(self) -> Self {
        Self::from_reg(T::vabs(self.reg))
    }

    /// Component-wise `if a < b { a } else { b }`; a NaN in `self` yields `rhs`
    ///
    /// # Examples
    ///
    /// ```
    /// use rayo::Vec2f;
    ///
    /// let a = Vec2f::new(f32::NAN, 1.0);
    /// let b = Vec2f::new(2.0, f32::NAN);
    /// let m = a.min(b);
    /// assert_eq!(m.x(), 2.0);
    /// assert!(m.y().is_nan());
    /// ```
    #[inline]
    pub fn min(self, rhs: Self) -> Self {
        Self::from_reg(T::vmin(self.reg, rhs.reg))
    }

    /// Component-wise `if a > b { a } else { b }`
    #[inline]
    pub fn max(self, rhs: Self) -> Self {
        Self::from_reg(T::vmax(self.reg, rhs.reg))
    }

    /// `self.max(lo).min(hi)`
    #[inline]
    pub fn clamp(self, lo: Self, hi: Self) -> Self {
        self.max(lo).min(hi)
    }

    // ------------------------------------------------------------------
    // Bitwise (floats through their bit patterns)
    // ------------------------------------------------------------------

    #[inline]
    pub fn and(self, rhs: Self) -> Self {
        Self::from_reg(T::vand(self.reg, rhs.reg))
    }

    #[inline]
    pub fn or(self, rhs: Self) -> Self {
        Self::from_reg(T::vor(self.reg, rhs.reg))
    }

    #[inline]
    pub fn xor(self, rhs: Self) -> Self {
        Self::from_reg(T::vxor(self.reg, rhs.reg))
    }

    /// `self & !rhs`
    #[inline]
    pub fn and_not(self, rhs: Self) -> Self {
        Self::from_reg(T::vandnot(self.reg, rhs.reg))
    }

    #[inline]
    pub fn not(self) -> Self {
        Self::from_reg_masked(T::vxor(self.reg, T::vsplat(T::ALL_BITS)))
    }

    // ------------------------------------------------------------------
    // Horizontal reductions
    // ------------------------------------------------------------------

    /// Register prepared so padding lanes are the fold's identity
    #[inline(always)]
    fn fold_operand(self, fill: PaddingFill) -> T::Reg {
        lanes::pad_with::<T, N>(self.reg, fill)
    }

    /// Sum of the components, folded `(x + y) + (z + w)`
    ///
    /// # Examples
    ///
    /// ```
    /// use rayo::Vec3f;
    ///
    /// assert_eq!(Vec3f::new(2.0, 3.0, 4.0).sum(), 9.0);
    /// ```
    #[inline]
    pub fn sum(self) -> T {
        T::vsum(self.fold_operand(PaddingFill::Zero))
    }

    /// Product of the components
    ///
    /// # Examples
    ///
    /// ```
    /// use rayo::Vec3i;
    ///
    /// assert_eq!(Vec3i::new(2, 3, 4).product(), 24);
    /// ```
    #[inline]
    pub fn product(self) -> T {
        T::vproduct(self.fold_operand(PaddingFill::One))
    }

    /// Smallest component
    #[inline]
    pub fn min_element(self) -> T {
        T::vhmin(self.fold_operand(PaddingFill::Lane(0)))
    }

    /// Largest component
    #[inline]
    pub fn max_element(self) -> T {
        T::vhmax(self.fold_operand(PaddingFill::Lane(0)))
    }

    /// Dot product
    #[inline]
    pub fn dot(self, rhs: Self) -> T {
        self.mul(rhs).sum()
    }

    // ------------------------------------------------------------------
    // Conversions
    // ------------------------------------------------------------------

    /// Narrow or widen to `M` components; new components are zero
    ///
    /// # Examples
    ///
    /// ```
    /// use rayo::{Vec2f, Vec4f};
    ///
    /// let v = Vec4f::new(1.0, 2.0, 3.0, 4.0);
    /// let narrow: Vec2f = v.resize();
    /// assert_eq!(narrow.to_array(), [1.0, 2.0]);
    /// assert_eq!(narrow.resize::<4>().to_array(), [1.0, 2.0, 0.0, 0.0]);
    /// ```
    #[inline]
    pub fn resize<const M: usize>(self) -> Vector<T, M> {
        Vector::<T, M>::from_reg_masked(self.reg)
    }

    /// Convert each component to another kind
    ///
    /// Float to integer truncates toward zero and saturates; NaN becomes 0.
    pub fn cast<U: Element>(self) -> Vector<U, N> {
        Vector::from_array(self.to_array().map(|c| U::from_f64(c.to_f64())))
    }
}

impl<T: FloatElement, const N: usize> Vector<T, N> {
    /// Every component `+inf`
    pub fn infinity() -> Self {
        Self::splat(T::INFINITY)
    }

    /// Every component the canonical quiet NaN
    pub fn nan() -> Self {
        Self::splat(T::NAN)
    }

    /// Component-wise quotient; division by zero follows IEEE-754
    #[inline]
    pub fn div(self, rhs: Self) -> Self {
        Self::from_reg_masked(T::vdiv(self.reg, rhs.reg))
    }

    #[inline]
    pub fn div_scalar(self, value: T) -> Self {
        Self::from_reg_masked(T::vdiv(self.reg, T::vsplat(value)))
    }

    #[inline]
    pub fn sqrt(self) -> Self {
        Self::from_reg(T::vsqrt(self.reg))
    }

    /// `1 / self`, exact
    #[inline]
    pub fn recip(self) -> Self {
        Self::from_reg_masked(T::vdiv(T::vsplat(T::ONE), self.reg))
    }

    /// `1 / sqrt(self)`, exact
    #[inline]
    pub fn rsqrt(self) -> Self {
        Self::from_reg_masked(T::vdiv(T::vsplat(T::ONE), T::vsqrt(self.reg)))
    }

    /// Hardware reciprocal estimate (about 12 bits on SSE, 8 on NEON)
    #[inline]
    pub fn recip_approx(self) -> Self {
        Self::from_reg_masked(T::vrecip_approx(self.reg))
    }

    /// Hardware reciprocal square root estimate
    #[inline]
    pub fn rsqrt_approx(self) -> Self {
        Self::from_reg_masked(T::vrsqrt_approx(self.reg))
    }

    /// Square root from the two estimates; zero stays zero
    #[inline]
    pub fn sqrt_approx(self) -> Self {
        Self::from_reg_masked(T::vrecip_approx(T::vrsqrt_approx(self.reg)))
    }

    /// `self^exponent` through exponent/mantissa bit tricks on the register,
    /// relative error around 1e-3
    #[inline]
    pub fn pow_approx(self, exponent: T) -> Self {
        Self::from_reg_masked(fastmath::pow_approx::<T>(self.reg, exponent))
    }

    /// Nearest integer, ties to even
    #[inline]
    pub fn round(self) -> Self {
        Self::from_reg(T::vround(self.reg))
    }

    #[inline]
    pub fn floor(self) -> Self {
        Self::from_reg(T::vfloor(self.reg))
    }

    #[inline]
    pub fn ceil(self) -> Self {
        Self::from_reg(T::vceil(self.reg))
    }

    #[inline]
    pub fn trunc(self) -> Self {
        Self::from_reg(T::vtrunc(self.reg))
    }

    /// `self - floor(self)`
    #[inline]
    pub fn fract(self) -> Self {
        self.sub(self.floor())
    }

    pub fn sin(self) -> Self {
        self.map(T::sin)
    }

    pub fn cos(self) -> Self {
        self.map(T::cos)
    }

    pub fn tan(self) -> Self {
        self.map(T::tan)
    }

    pub fn asin(self) -> Self {
        self.map(T::asin)
    }

    pub fn acos(self) -> Self {
        self.map(T::acos)
    }

    pub fn atan(self) -> Self {
        self.map(T::atan)
    }

    /// Four-quadrant arctangent of `self / x`
    pub fn atan2(self, x: Self) -> Self {
        self.zip_map(x, T::atan2)
    }

    pub fn sinh(self) -> Self {
        self.map(T::sinh)
    }

    pub fn cosh(self) -> Self {
        self.map(T::cosh)
    }

    pub fn tanh(self) -> Self {
        self.map(T::tanh)
    }

    pub fn exp(self) -> Self {
        self.map(T::exp)
    }

    pub fn exp2(self) -> Self {
        self.map(T::exp2)
    }

    /// Natural logarithm
    pub fn ln(self) -> Self {
        self.map(T::ln)
    }

    pub fn log2(self) -> Self {
        self.map(T::log2)
    }

    /// Component-wise power with per-component exponents
    pub fn pow(self, exponent: Self) -> Self {
        self.zip_map(exponent, T::powf)
    }

    /// Component-wise power with one exponent
    pub fn powf(self, exponent: T) -> Self {
        self.map(|c| c.powf(exponent))
    }

    /// True when no component is infinite or NaN
    pub fn is_finite(self) -> bool {
        self.to_array().iter().all(|c| c.is_finite())
    }

    #[inline]
    pub fn length_squared(self) -> T {
        self.dot(self)
    }

    #[inline]
    pub fn length(self) -> T {
        self.length_squared().sqrt()
    }

    /// Unit vector in the same direction
    ///
    /// A zero vector yields NaN components; use
    /// [`try_normalized`](Self::try_normalized) to detect that case.
    #[inline]
    pub fn normalized(self) -> Self {
        self.div_scalar(self.length())
    }

    /// Unit vector, or an error for zero-length and non-finite input
    ///
    /// # Errors
    ///
    /// Returns [`RayoError::DegenerateVector`] if the squared length is zero
    /// or not finite.
    pub fn try_normalized(self) -> Result<Self> {
        let length_squared = self.length_squared();
        if length_squared == T::ZERO || !length_squared.is_finite() {
            return Err(RayoError::DegenerateVector);
        }
        Ok(self.div_scalar(length_squared.sqrt()))
    }

    /// `self + (rhs - self) * t`
    #[inline]
    pub fn lerp(self, rhs: Self, t: T) -> Self {
        self.add(rhs.sub(self).mul_scalar(t))
    }

    #[inline]
    pub fn distance_squared(self, rhs: Self) -> T {
        self.sub(rhs).length_squared()
    }

    #[inline]
    pub fn distance(self, rhs: Self) -> T {
        self.sub(rhs).length()
    }

    /// Reflection about the plane with unit `normal`
    #[inline]
    pub fn reflect(self, normal: Self) -> Self {
        let scale = (T::ONE + T::ONE) * self.dot(normal);
        self.sub(normal.mul_scalar(scale))
    }

    /// Component of `self` along `onto`
    #[inline]
    pub fn project_onto(self, onto: Self) -> Self {
        onto.mul_scalar(self.dot(onto) / onto.length_squared())
    }
}

impl<const N: usize> Vector<i32, N> {
    /// Divisor with padding lanes set to one so only logical lanes can trap
    #[inline(always)]
    fn divisor(self) -> <i32 as Element>::Reg {
        lanes::pad_with::<i32, N>(self.reg, PaddingFill::One)
    }

    /// Component-wise truncating division
    ///
    /// # Panics
    ///
    /// Panics if any component of `rhs` is zero.
    #[inline]
    pub fn div(self, rhs: Self) -> Self {
        Self::from_reg(i32::vdiv(self.reg, rhs.divisor()))
    }

    /// Component-wise remainder
    ///
    /// # Panics
    ///
    /// Panics if any component of `rhs` is zero.
    #[inline]
    pub fn rem(self, rhs: Self) -> Self {
        Self::from_reg(i32::vrem(self.reg, rhs.divisor()))
    }

    /// # Panics
    ///
    /// Panics if `value` is zero.
    #[inline]
    pub fn div_scalar(self, value: i32) -> Self {
        self.div(Self::splat(value))
    }

    /// # Panics
    ///
    /// Panics if `value` is zero.
    #[inline]
    pub fn rem_scalar(self, value: i32) -> Self {
        self.rem(Self::splat(value))
    }

    /// Division that reports a zero divisor instead of panicking
    ///
    /// # Errors
    ///
    /// Returns [`RayoError::DivisionByZero`] if any component of `rhs` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use rayo::{RayoError, Vec2i};
    ///
    /// let a = Vec2i::new(7, 9);
    /// assert_eq!(a.checked_div(Vec2i::new(2, 3)).unwrap(), Vec2i::new(3, 3));
    /// assert_eq!(a.checked_div(Vec2i::new(2, 0)), Err(RayoError::DivisionByZero));
    /// ```
    pub fn checked_div(self, rhs: Self) -> Result<Self> {
        if rhs.to_array().contains(&0) {
            return Err(RayoError::DivisionByZero);
        }
        Ok(self.div(rhs))
    }

    /// # Errors
    ///
    /// Returns [`RayoError::DivisionByZero`] if any component of `rhs` is zero.
    pub fn checked_rem(self, rhs: Self) -> Result<Self> {
        if rhs.to_array().contains(&0) {
            return Err(RayoError::DivisionByZero);
        }
        Ok(self.rem(rhs))
    }

    #[inline]
    pub fn saturating_add(self, rhs: Self) -> Self {
        Self::from_reg(i32::vsaturating_add(self.reg, rhs.reg))
    }

    #[inline]
    pub fn saturating_sub(self, rhs: Self) -> Self {
        Self::from_reg(i32::vsaturating_sub(self.reg, rhs.reg))
    }

    /// Left shift; counts of 32 or more give zero
    #[inline]
    pub fn shl(self, count: u32) -> Self {
        Self::from_reg(i32::vshl(self.reg, count))
    }

    /// Arithmetic right shift; counts of 32 or more fill with the sign
    #[inline]
    pub fn shr(self, count: u32) -> Self {
        Self::from_reg(i32::vshr(self.reg, count))
    }

    /// Logical right shift; counts of 32 or more give zero
    #[inline]
    pub fn shr_logical(self, count: u32) -> Self {
        Self::from_reg(i32::vshr_logical(self.reg, count))
    }
}

// ----------------------------------------------------------------------
// Arity-specific constructors and geometry
// ----------------------------------------------------------------------

impl<T: Element> Vector<T, 2> {
    #[inline]
    pub fn new(x: T, y: T) -> Self {
        Self::from_array([x, y])
    }

    /// Rotated a quarter turn counter-clockwise: `(-y, x)`
    #[inline]
    pub fn perpendicular(self) -> Self {
        let negated = T::vstore(T::vneg(self.reg));
        Self::new(negated[1], self.x())
    }

    /// Widen with `z`
    #[inline]
    pub fn extend(self, z: T) -> Vector<T, 3> {
        self.resize::<3>().with(2, z)
    }

    #[inline]
    pub fn extend_zero(self) -> Vector<T, 3> {
        self.resize()
    }

    #[inline]
    pub fn extend_one(self) -> Vector<T, 3> {
        self.extend(T::ONE)
    }
}

impl<T: Element> Vector<T, 3> {
    #[inline]
    pub fn new(x: T, y: T, z: T) -> Self {
        Self::from_array([x, y, z])
    }

    #[inline]
    pub fn z(self) -> T {
        T::vstore(self.reg)[2]
    }

    /// Drop Z
    #[inline]
    pub fn truncate(self) -> Vector<T, 2> {
        self.resize()
    }

    /// Widen with `w`
    #[inline]
    pub fn extend(self, w: T) -> Vector<T, 4> {
        self.resize::<4>().with(3, w)
    }

    #[inline]
    pub fn extend_zero(self) -> Vector<T, 4> {
        self.resize()
    }

    /// Homogeneous point form `(x, y, z, 1)`
    #[inline]
    pub fn extend_one(self) -> Vector<T, 4> {
        self.extend(T::ONE)
    }

    /// Cross product `self x rhs`
    ///
    /// # Examples
    ///
    /// ```
    /// use rayo::Vec3f;
    ///
    /// let x = Vec3f::new(1.0, 0.0, 0.0);
    /// let y = Vec3f::new(0.0, 1.0, 0.0);
    /// assert_eq!(x.cross(y), Vec3f::new(0.0, 0.0, 1.0));
    /// ```
    pub fn cross(self, rhs: Self) -> Self {
        let [ax, ay, az] = self.to_array();
        let [bx, by, bz] = rhs.to_array();
        let zero = T::ZERO;
        // a.yzx * b.zxy - a.zxy * b.yzx
        let lhs = T::vmul(T::vload([ay, az, ax, zero]), T::vload([bz, bx, by, zero]));
        let rhs = T::vmul(T::vload([az, ax, ay, zero]), T::vload([by, bz, bx, zero]));
        Self::from_reg(T::vsub(lhs, rhs))
    }
}

impl<T: Element> Vector<T, 4> {
    #[inline]
    pub fn new(x: T, y: T, z: T, w: T) -> Self {
        Self::from_array([x, y, z, w])
    }

    #[inline]
    pub fn z(self) -> T {
        T::vstore(self.reg)[2]
    }

    #[inline]
    pub fn w(self) -> T {
        T::vstore(self.reg)[3]
    }

    /// Drop W
    #[inline]
    pub fn truncate(self) -> Vector<T, 3> {
        self.resize()
    }
}

// ----------------------------------------------------------------------
// Trait impls
// ----------------------------------------------------------------------

impl<T: Element, const N: usize> Default for Vector<T, N> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<T: Element, const N: usize> fmt::Debug for Vector<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tuple = f.debug_tuple(["Vec0", "Vec1", "Vec2", "Vec3", "Vec4"][N]);
        for component in self.to_array() {
            tuple.field(&component);
        }
        tuple.finish()
    }
}

impl<T: Element + fmt::Display, const N: usize> fmt::Display for Vector<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, component) in self.to_array().iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            fmt::Display::fmt(component, f)?;
        }
        write!(f, ")")
    }
}

impl<T: Element, const N: usize> From<[T; N]> for Vector<T, N> {
    fn from(components: [T; N]) -> Self {
        Self::from_array(components)
    }
}

impl<T: Element, const N: usize> From<Vector<T, N>> for [T; N] {
    fn from(v: Vector<T, N>) -> Self {
        v.to_array()
    }
}

macro_rules! forward_binop {
    ($($bound:ident: $op:ident::$method:ident => $inherent:ident),* $(,)?) => {
        $(
            impl<T: $bound, const N: usize> $op for Vector<T, N> {
                type Output = Self;

                #[inline]
                fn $method(self, rhs: Self) -> Self {
                    Self::$inherent(self, rhs)
                }
            }
        )*
    };
}

forward_binop!(
    Element: Add::add => add,
    Element: Sub::sub => sub,
    Element: Mul::mul => mul,
    Element: BitAnd::bitand => and,
    Element: BitOr::bitor => or,
    Element: BitXor::bitxor => xor,
    FloatElement: Div::div => div,
);

impl<const N: usize> Div for Vector<i32, N> {
    type Output = Self;

    #[inline]
    fn div(self, rhs: Self) -> Self {
        Self::div(self, rhs)
    }
}

impl<const N: usize> Rem for Vector<i32, N> {
    type Output = Self;

    #[inline]
    fn rem(self, rhs: Self) -> Self {
        Self::rem(self, rhs)
    }
}

impl<const N: usize> Shl<u32> for Vector<i32, N> {
    type Output = Self;

    #[inline]
    fn shl(self, count: u32) -> Self {
        Self::shl(self, count)
    }
}

impl<const N: usize> Shr<u32> for Vector<i32, N> {
    type Output = Self;

    #[inline]
    fn shr(self, count: u32) -> Self {
        Self::shr(self, count)
    }
}

impl<T: Element, const N: usize> Neg for Vector<T, N> {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::neg(self)
    }
}

impl<T: Element, const N: usize> Not for Vector<T, N> {
    type Output = Self;

    #[inline]
    fn not(self) -> Self {
        Self::not(self)
    }
}

impl<T: Element, const N: usize> AddAssign for Vector<T, N> {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = Self::add(*self, rhs);
    }
}

impl<T: Element, const N: usize> SubAssign for Vector<T, N> {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = Self::sub(*self, rhs);
    }
}

impl<T: Element, const N: usize> MulAssign for Vector<T, N> {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = Self::mul(*self, rhs);
    }
}

impl<T: FloatElement, const N: usize> DivAssign for Vector<T, N> {
    #[inline]
    fn div_assign(&mut self, rhs: Self) {
        *self = Self::div(*self, rhs);
    }
}

// Scalar operands, per kind so `2.0 * v` works as well as `v * 2.0`.
macro_rules! scalar_ops {
    ($($t:ty),*) => {
        $(
            impl<const N: usize> Add<$t> for Vector<$t, N> {
                type Output = Self;

                #[inline]
                fn add(self, rhs: $t) -> Self {
                    self.add_scalar(rhs)
                }
            }

            impl<const N: usize> Sub<$t> for Vector<$t, N> {
                type Output = Self;

                #[inline]
                fn sub(self, rhs: $t) -> Self {
                    self.sub_scalar(rhs)
                }
            }

            impl<const N: usize> Mul<$t> for Vector<$t, N> {
                type Output = Self;

                #[inline]
                fn mul(self, rhs: $t) -> Self {
                    self.mul_scalar(rhs)
                }
            }

            impl<const N: usize> Mul<Vector<$t, N>> for $t {
                type Output = Vector<$t, N>;

                #[inline]
                fn mul(self, rhs: Vector<$t, N>) -> Vector<$t, N> {
                    rhs.mul_scalar(self)
                }
            }

            impl<const N: usize> Div<$t> for Vector<$t, N> {
                type Output = Self;

                #[inline]
                fn div(self, rhs: $t) -> Self {
                    self.div_scalar(rhs)
                }
            }
        )*
    };
}

scalar_ops!(f32, f64, i32);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_and_accessors() {
        let v = Vec4f::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!((v.x(), v.y(), v.z(), v.w()), (1.0, 2.0, 3.0, 4.0));
        assert_eq!(v.get(3), Some(4.0));
        assert_eq!(Vec2i::new(5, 6).get(2), None);
        assert_eq!(Vec3d::DIM, 3);
    }

    #[test]
    fn test_from_slice_size_mismatch() {
        let err = Vec4f::from_slice(&[1.0, 2.0]).unwrap_err();
        assert_eq!(
            err,
            RayoError::SizeMismatch {
                expected: 4,
                actual: 2
            }
        );
    }

    #[test]
    fn test_with_replaces_component() {
        let v = Vec3i::new(1, 2, 3).with(1, 9);
        assert_eq!(v.to_array(), [1, 9, 3]);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_with_rejects_padding_lane() {
        let _ = Vec3i::new(1, 2, 3).with(3, 9);
    }

    #[test]
    fn test_arithmetic() {
        let a = Vec3f::new(1.0, 2.0, 3.0);
        let b = Vec3f::new(4.0, 5.0, 6.0);
        assert_eq!((a + b).to_array(), [5.0, 7.0, 9.0]);
        assert_eq!((b - a).to_array(), [3.0, 3.0, 3.0]);
        assert_eq!((a * b).to_array(), [4.0, 10.0, 18.0]);
        assert_eq!((b / a).to_array(), [4.0, 2.5, 2.0]);
        assert_eq!((a * 2.0).to_array(), [2.0, 4.0, 6.0]);
        assert_eq!((2.0 * a).to_array(), [2.0, 4.0, 6.0]);
        assert_eq!(a.mul_add(b, a).to_array(), [5.0, 12.0, 21.0]);
    }

    #[test]
    fn test_padding_survives_disturbing_ops() {
        let v = Vec3f::new(1.0, -2.0, 0.5);
        for result in [
            -v,
            v.recip(),
            v.rsqrt(),
            v / Vec3f::new(2.0, 2.0, 2.0),
            v.div_scalar(0.0),
            !v,
            v.add_scalar(3.0),
            v.mul_scalar(f32::INFINITY),
            v.cos(),
            v.exp(),
            v.recip_approx(),
            v.sqrt_approx(),
        ] {
            assert!(result.padding_is_zero(), "{result:?} -> {:?}", result.physical_lanes());
        }
    }

    #[test]
    fn test_int_ops() {
        let a = Vec4i::new(i32::MAX, -7, 9, 100);
        let b = Vec4i::new(1, 2, -4, 7);
        assert_eq!((a + b).to_array(), [i32::MIN, -5, 5, 107]);
        assert_eq!(a.saturating_add(b).to_array(), [i32::MAX, -5, 5, 107]);
        assert_eq!((a / b).to_array(), [i32::MAX, -3, -2, 14]);
        assert_eq!((a % b).to_array(), [0, -1, 1, 2]);
        assert_eq!((Vec2i::new(1, -8) << 2).to_array(), [4, -32]);
        assert_eq!((Vec2i::new(1, -8) >> 1).to_array(), [0, -4]);
        assert_eq!(Vec2i::new(-1, 16).shr_logical(28).to_array(), [15, 0]);
    }

    #[test]
    fn test_int_division_ignores_padding() {
        // Padding lanes hold zero; the divide must not see them.
        let q = Vec2i::new(10, 20).div(Vec2i::new(5, 4));
        assert_eq!(q.to_array(), [2, 5]);
        assert_eq!(Vec3i::new(9, 8, 7).rem_scalar(4).to_array(), [1, 0, 3]);
    }

    #[test]
    #[should_panic]
    fn test_int_division_by_zero_panics() {
        let _ = Vec2i::new(1, 2) / Vec2i::new(1, 0);
    }

    #[test]
    fn test_checked_rem() {
        assert_eq!(Vec2i::new(7, 8).checked_rem(Vec2i::new(0, 3)), Err(RayoError::DivisionByZero));
        assert_eq!(Vec2i::new(7, 8).checked_rem(Vec2i::new(4, 3)), Ok(Vec2i::new(3, 2)));
    }

    #[test]
    fn test_reductions() {
        let v = Vec3f::new(2.0, 3.0, 4.0);
        assert_eq!(v.sum(), 9.0);
        assert_eq!(v.product(), 24.0);
        assert_eq!(v.min_element(), 2.0);
        assert_eq!(v.max_element(), 4.0);

        // Negative components: zero padding must not win the max.
        let neg = Vec2d::new(-3.0, -5.0);
        assert_eq!(neg.max_element(), -3.0);
        assert_eq!(Vec3i::new(4, 7, 5).min_element(), 4);
        assert_eq!(Vec2i::new(3, 3).product(), 9);
    }

    #[test]
    fn test_length_and_normalize() {
        let v = Vec3f::new(3.0, 4.0, 0.0);
        assert_eq!(v.length(), 5.0);
        assert_eq!(v.normalized().to_array(), [0.6, 0.8, 0.0]);
        assert!(!Vec3f::zero().normalized().is_finite());
        assert_eq!(Vec3f::zero().try_normalized(), Err(RayoError::DegenerateVector));
        assert_eq!(Vec3f::infinity().try_normalized(), Err(RayoError::DegenerateVector));
    }

    #[test]
    fn test_rounding() {
        let v = Vec4f::new(0.5, 1.5, -2.5, -0.3);
        assert_eq!(v.round().to_array(), [0.0, 2.0, -2.0, -0.0]);
        assert_eq!(v.floor().to_array(), [0.0, 1.0, -3.0, -1.0]);
        assert_eq!(v.ceil().to_array(), [1.0, 2.0, -2.0, -0.0]);
        assert_eq!(v.trunc().to_array(), [0.0, 1.0, -2.0, -0.0]);
        let f = v.fract().to_array();
        assert!((f[3] - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_bitwise() {
        let a = Vec2i::new(0b1100, -1);
        let b = Vec2i::new(0b1010, 0);
        assert_eq!((a & b).to_array(), [0b1000, 0]);
        assert_eq!((a | b).to_array(), [0b1110, -1]);
        assert_eq!((a ^ b).to_array(), [0b0110, -1]);
        assert_eq!(a.and_not(b).to_array(), [0b0100, -1]);
        assert_eq!((!b).to_array(), [!0b1010, -1]);

        let f = Vec2f::new(-1.5, 2.0);
        let sign = Vec2f::splat(-0.0);
        assert_eq!(f.and_not(sign).to_array(), [1.5, 2.0]);
        assert_eq!(Vec3f::all_bits().to_array().map(f32::to_bits), [u32::MAX; 3]);
    }

    #[test]
    fn test_arity_conversions() {
        let v2 = Vec2f::new(1.0, 2.0);
        assert_eq!(v2.extend(3.0).to_array(), [1.0, 2.0, 3.0]);
        assert_eq!(v2.extend_one().extend_one().to_array(), [1.0, 2.0, 1.0, 1.0]);
        assert_eq!(Vec4f::new(1.0, 2.0, 3.0, 4.0).truncate().truncate(), v2);
        assert_eq!(Vec3f::new(1.0, 2.0, 3.0).extend_zero().w(), 0.0);
    }

    #[test]
    fn test_cast() {
        let v = Vec3f::new(1.9, -1.9, 3e10);
        assert_eq!(v.cast::<i32>().to_array(), [1, -1, i32::MAX]);
        assert_eq!(Vec2i::new(3, -4).cast::<f64>().to_array(), [3.0, -4.0]);
    }

    #[test]
    fn test_geometry() {
        let a = Vec3d::new(1.0, 2.0, 3.0);
        let b = Vec3d::new(4.0, 5.0, 6.0);
        let c = a.cross(b);
        assert_eq!(c.to_array(), [-3.0, 6.0, -3.0]);
        assert_eq!(a.lerp(b, 0.5).to_array(), [2.5, 3.5, 4.5]);
        assert_eq!(Vec2f::new(3.0, 0.0).distance(Vec2f::new(0.0, 4.0)), 5.0);
        assert_eq!(Vec2f::new(1.0, -1.0).reflect(Vec2f::new(0.0, 1.0)).to_array(), [1.0, 1.0]);
        assert_eq!(Vec2f::new(2.0, 3.0).project_onto(Vec2f::new(1.0, 0.0)).to_array(), [2.0, 0.0]);
        assert_eq!(Vec2i::new(2, 3).perpendicular().to_array(), [-3, 2]);
    }

    #[test]
    fn test_transcendental_close_to_std() {
        let v = Vec4f::new(0.1, 0.5, 1.0, 2.0);
        for (got, x) in v.sin().to_array().iter().zip(v.to_array()) {
            assert!((got - x.sin()).abs() < 1e-6);
        }
        let p = v.pow_approx(2.0).to_array();
        for (got, x) in p.iter().zip(v.to_array()) {
            assert!(((got - x * x) / (x * x)).abs() < 1e-2);
        }
        assert_eq!(Vec2d::new(1.0, -1.0).atan2(Vec2d::new(1.0, 1.0)).to_array()[0], 1f64.atan2(1.0));
    }

    #[test]
    fn test_pow_approx_subnormal_and_edges() {
        let v = Vec3d::new(f64::MIN_POSITIVE / 8.0, 0.0, -1.0).pow_approx(0.5).to_array();
        let exact = (f64::MIN_POSITIVE / 8.0).sqrt();
        assert!(((v[0] - exact) / exact).abs() < 1e-2);
        assert_eq!(v[1], 0.0);
        assert!(v[2].is_nan());
        assert_eq!(Vec2f::new(1e-40, 3.0).pow_approx(0.0).to_array(), [1.0, 1.0]);
    }

    #[test]
    fn test_debug_and_display() {
        assert_eq!(format!("{:?}", Vec2i::new(1, 2)), "Vec2(1, 2)");
        assert_eq!(Vec3f::new(1.0, 2.5, -3.0).to_string(), "(1, 2.5, -3)");
    }

    #[test]
    fn test_nan_and_infinity() {
        let n = Vec2f::nan().to_array();
        assert_eq!(n.map(f32::to_bits), [0x7FC0_0000; 2]);
        assert_eq!(Vec3d::infinity().x(), f64::INFINITY);
    }
}
