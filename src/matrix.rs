//! 3x3 and 4x4 float matrices
//!
//! Matrices are stored as column vectors, so `m.mul_vec(v)` is
//! `c0 * v.x + c1 * v.y + ...` and matrix products compose right to left.
//! A `Matrix3` column is a 3-component vector living in a padded 4-lane
//! register; the [`CompactMatrix3`]/[`CompactMatrix4`] forms hold the
//! logical components only, for storage and interchange.
//!
//! # Example
//!
//! ```
//! use rayo::{Matrix4, Vec3f};
//!
//! let m = Matrix4::from_translation(Vec3f::new(1.0, 2.0, 3.0));
//! let p = m.transform_point3(Vec3f::zero());
//! assert_eq!(p.to_array(), [1.0, 2.0, 3.0]);
//!
//! let back = m.inverse().transform_point3(p);
//! assert_eq!(back.to_array(), [0.0, 0.0, 0.0]);
//! ```

use std::array;
use std::ops::{Add, Mul, Sub};

use crate::error::{RayoError, Result};
use crate::lanes::FloatElement;
use crate::vector::Vector;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// 3x3 float matrix of column vectors
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix3<T: FloatElement> {
    cols: [Vector<T, 3>; 3],
}

/// 4x4 float matrix of column vectors
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix4<T: FloatElement> {
    cols: [Vector<T, 4>; 4],
}

/// Column-major `[[T; 3]; 3]` without lane padding
///
/// 4-byte aligned and 36 bytes for `f32`, against 48 bytes for the padded
/// [`Matrix3`]. Meant for storage; convert to compute.
#[repr(transparent)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CompactMatrix3<T>(pub [[T; 3]; 3]);

/// Column-major `[[T; 4]; 4]`
#[repr(transparent)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CompactMatrix4<T>(pub [[T; 4]; 4]);

macro_rules! matrix_common {
    ($name:ident, $compact:ident, $n:literal) => {
        impl<T: FloatElement> $name<T> {
            /// Dimension of the square matrix
            pub const DIM: usize = $n;

            #[inline]
            pub fn from_cols(cols: [Vector<T, $n>; $n]) -> Self {
                Self { cols }
            }

            pub fn from_rows(rows: [Vector<T, $n>; $n]) -> Self {
                let rows = rows.map(Vector::to_array);
                Self::from_cols(array::from_fn(|c| {
                    Vector::from_array(array::from_fn(|r| rows[r][c]))
                }))
            }

            pub fn zero() -> Self {
                Self::from_cols([Vector::zero(); $n])
            }

            pub fn identity() -> Self {
                Self::from_cols(array::from_fn(|i| Vector::zero().with(i, T::ONE)))
            }

            /// Matrix with `diagonal` on the diagonal and zeros elsewhere
            pub fn from_diagonal(diagonal: Vector<T, $n>) -> Self {
                let diagonal = diagonal.to_array();
                Self::from_cols(array::from_fn(|i| Vector::zero().with(i, diagonal[i])))
            }

            /// # Panics
            ///
            /// Panics if `index` is out of range.
            #[inline]
            pub fn col(&self, index: usize) -> Vector<T, $n> {
                self.cols[index]
            }

            /// # Panics
            ///
            /// Panics if `index` is out of range.
            pub fn row(&self, index: usize) -> Vector<T, $n> {
                assert!(index < $n, "row index {} out of range", index);
                Vector::from_array(self.cols.map(|c| c.to_array()[index]))
            }

            pub fn cols(&self) -> [Vector<T, $n>; $n] {
                self.cols
            }

            pub fn transpose(&self) -> Self {
                Self::from_rows(self.cols)
            }

            /// `self * v`
            #[inline]
            pub fn mul_vec(&self, v: Vector<T, $n>) -> Vector<T, $n> {
                self.cols
                    .iter()
                    .zip(v.to_array())
                    .fold(Vector::zero(), |acc, (col, s)| acc.add(col.mul_scalar(s)))
            }

            /// `self * rhs`: apply `rhs` first, then `self`
            #[inline]
            pub fn mul(self, rhs: Self) -> Self {
                Self::from_cols(rhs.cols.map(|c| self.mul_vec(c)))
            }

            #[inline]
            pub fn add(self, rhs: Self) -> Self {
                Self::from_cols(array::from_fn(|i| self.cols[i].add(rhs.cols[i])))
            }

            #[inline]
            pub fn sub(self, rhs: Self) -> Self {
                Self::from_cols(array::from_fn(|i| self.cols[i].sub(rhs.cols[i])))
            }

            #[inline]
            pub fn mul_scalar(&self, value: T) -> Self {
                Self::from_cols(self.cols.map(|c| c.mul_scalar(value)))
            }

            /// Inverse of a non-singular matrix
            ///
            /// A singular matrix yields inf/NaN entries; use
            /// [`try_inverse`](Self::try_inverse) to detect that case.
            #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
            pub fn inverse(&self) -> Self {
                self.inverse_determinant().0
            }

            /// Inverse together with the determinant, computed once
            #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
            pub fn inverse_determinant(&self) -> (Self, T) {
                let (adjugate, determinant) = self.adjugate_determinant();
                (adjugate.mul_scalar(T::ONE / determinant), determinant)
            }

            /// Classical adjoint: `inverse * determinant`
            pub fn adjugate(&self) -> Self {
                self.adjugate_determinant().0
            }

            /// Inverse, or an error for a zero or non-finite determinant
            ///
            /// # Errors
            ///
            /// Returns [`RayoError::SingularMatrix`] carrying the rejected
            /// determinant.
            #[cfg_attr(feature = "tracing", instrument(level = "debug", skip(self)))]
            pub fn try_inverse(&self) -> Result<Self> {
                let (inverse, determinant) = self.inverse_determinant();
                if determinant == T::ZERO || !determinant.is_finite() {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(
                        determinant = determinant.to_f64(),
                        dim = $n,
                        "singular matrix has no inverse"
                    );
                    return Err(RayoError::SingularMatrix {
                        determinant: determinant.to_f64(),
                    });
                }
                Ok(inverse)
            }

            /// Inverse-transpose, for transforming surface normals
            pub fn normal(&self) -> Self {
                self.inverse().transpose()
            }

            /// Every column pair within `epsilon` component-wise
            pub fn approx_eq(&self, rhs: &Self, epsilon: T) -> bool {
                self.cols
                    .iter()
                    .zip(rhs.cols.iter())
                    .all(|(a, b)| a.within_epsilon_of(*b, epsilon))
            }

            pub fn is_finite(&self) -> bool {
                self.cols.iter().all(|c| c.is_finite())
            }

            pub fn to_compact(&self) -> $compact<T> {
                $compact(self.cols.map(Vector::to_array))
            }

            pub fn from_compact(compact: $compact<T>) -> Self {
                Self::from_cols(compact.0.map(Vector::from_array))
            }
        }

        impl<T: FloatElement> Default for $name<T> {
            fn default() -> Self {
                Self::identity()
            }
        }

        impl<T: FloatElement> Mul for $name<T> {
            type Output = Self;

            #[inline]
            fn mul(self, rhs: Self) -> Self {
                Self::mul(self, rhs)
            }
        }

        impl<T: FloatElement> Mul<Vector<T, $n>> for $name<T> {
            type Output = Vector<T, $n>;

            #[inline]
            fn mul(self, rhs: Vector<T, $n>) -> Vector<T, $n> {
                self.mul_vec(rhs)
            }
        }

        impl<T: FloatElement> Add for $name<T> {
            type Output = Self;

            #[inline]
            fn add(self, rhs: Self) -> Self {
                Self::add(self, rhs)
            }
        }

        impl<T: FloatElement> Sub for $name<T> {
            type Output = Self;

            #[inline]
            fn sub(self, rhs: Self) -> Self {
                Self::sub(self, rhs)
            }
        }

        impl<T: FloatElement> From<$compact<T>> for $name<T> {
            fn from(compact: $compact<T>) -> Self {
                Self::from_compact(compact)
            }
        }

        impl<T: FloatElement> From<$name<T>> for $compact<T> {
            fn from(matrix: $name<T>) -> Self {
                matrix.to_compact()
            }
        }
    };
}

matrix_common!(Matrix3, CompactMatrix3, 3);
matrix_common!(Matrix4, CompactMatrix4, 4);

macro_rules! scalar_mul {
    ($($t:ty),*) => {$(
        impl Mul<$t> for Matrix3<$t> {
            type Output = Self;

            #[inline]
            fn mul(self, rhs: $t) -> Self {
                self.mul_scalar(rhs)
            }
        }

        impl Mul<$t> for Matrix4<$t> {
            type Output = Self;

            #[inline]
            fn mul(self, rhs: $t) -> Self {
                self.mul_scalar(rhs)
            }
        }
    )*};
}

scalar_mul!(f32, f64);

impl<T: FloatElement> Matrix3<T> {
    /// `c0 . (c1 x c2)`
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn determinant(&self) -> T {
        let [c0, c1, c2] = self.cols;
        c0.dot(c1.cross(c2))
    }

    fn adjugate_determinant(&self) -> (Self, T) {
        let [c0, c1, c2] = self.cols;
        let r0 = c1.cross(c2);
        let adjugate = Self::from_rows([r0, c2.cross(c0), c0.cross(c1)]);
        (adjugate, c0.dot(r0))
    }

    /// Counter-clockwise rotation about +Z by `angle` radians
    pub fn from_rotation_z(angle: T) -> Self {
        let (s, c) = (angle.sin(), angle.cos());
        Self::from_cols([
            Vector::<T, 3>::new(c, s, T::ZERO),
            Vector::<T, 3>::new(-s, c, T::ZERO),
            Vector::<T, 3>::new(T::ZERO, T::ZERO, T::ONE),
        ])
    }
}

impl<T: FloatElement> Matrix4<T> {
    /// Cofactor expansion along the first column, shared with
    /// [`inverse_determinant`](Self::inverse_determinant)
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn determinant(&self) -> T {
        self.adjugate_determinant().1
    }

    // The 2x2 minors of the lower rows are paired into vectors so each
    // adjugate column is three vector multiplies.
    fn adjugate_determinant(&self) -> (Self, T) {
        let [m00, m01, m02, m03] = self.cols[0].to_array();
        let [m10, m11, m12, m13] = self.cols[1].to_array();
        let [m20, m21, m22, m23] = self.cols[2].to_array();
        let [m30, m31, m32, m33] = self.cols[3].to_array();

        let coef00 = m22 * m33 - m32 * m23;
        let coef02 = m12 * m33 - m32 * m13;
        let coef03 = m12 * m23 - m22 * m13;

        let coef04 = m21 * m33 - m31 * m23;
        let coef06 = m11 * m33 - m31 * m13;
        let coef07 = m11 * m23 - m21 * m13;

        let coef08 = m21 * m32 - m31 * m22;
        let coef10 = m11 * m32 - m31 * m12;
        let coef11 = m11 * m22 - m21 * m12;

        let coef12 = m20 * m33 - m30 * m23;
        let coef14 = m10 * m33 - m30 * m13;
        let coef15 = m10 * m23 - m20 * m13;

        let coef16 = m20 * m32 - m30 * m22;
        let coef18 = m10 * m32 - m30 * m12;
        let coef19 = m10 * m22 - m20 * m12;

        let coef20 = m20 * m31 - m30 * m21;
        let coef22 = m10 * m31 - m30 * m11;
        let coef23 = m10 * m21 - m20 * m11;

        let fac0 = Vector::<T, 4>::new(coef00, coef00, coef02, coef03);
        let fac1 = Vector::<T, 4>::new(coef04, coef04, coef06, coef07);
        let fac2 = Vector::<T, 4>::new(coef08, coef08, coef10, coef11);
        let fac3 = Vector::<T, 4>::new(coef12, coef12, coef14, coef15);
        let fac4 = Vector::<T, 4>::new(coef16, coef16, coef18, coef19);
        let fac5 = Vector::<T, 4>::new(coef20, coef20, coef22, coef23);

        let vec0 = Vector::<T, 4>::new(m10, m00, m00, m00);
        let vec1 = Vector::<T, 4>::new(m11, m01, m01, m01);
        let vec2 = Vector::<T, 4>::new(m12, m02, m02, m02);
        let vec3 = Vector::<T, 4>::new(m13, m03, m03, m03);

        let inv0 = vec1.mul(fac0).sub(vec2.mul(fac1)).add(vec3.mul(fac2));
        let inv1 = vec0.mul(fac0).sub(vec2.mul(fac3)).add(vec3.mul(fac4));
        let inv2 = vec0.mul(fac1).sub(vec1.mul(fac3)).add(vec3.mul(fac5));
        let inv3 = vec0.mul(fac2).sub(vec1.mul(fac4)).add(vec2.mul(fac5));

        let (one, neg) = (T::ONE, -T::ONE);
        let sign_a = Vector::<T, 4>::new(one, neg, one, neg);
        let sign_b = Vector::<T, 4>::new(neg, one, neg, one);

        let adjugate = Self::from_cols([
            inv0.mul(sign_a),
            inv1.mul(sign_b),
            inv2.mul(sign_a),
            inv3.mul(sign_b),
        ]);
        let determinant = self.cols[0].dot(adjugate.row(0));
        (adjugate, determinant)
    }

    /// Inverse of an affine transform
    ///
    /// Inverts the upper 3x3 block and the translation separately. The bottom
    /// row must be `[0, 0, 0, 1]`; other matrices give a wrong result without
    /// any diagnostic.
    pub fn inverse_affine(&self) -> Self {
        let linear = self.to_mat3().inverse();
        let translation = linear.mul_vec(self.cols[3].truncate()).neg();
        let [c0, c1, c2] = linear.cols();
        Self::from_cols([
            c0.extend_zero(),
            c1.extend_zero(),
            c2.extend_zero(),
            translation.extend_one(),
        ])
    }

    /// Embed a 3x3 matrix; the new row and column are those of the identity
    pub fn from_mat3(m: Matrix3<T>) -> Self {
        let [c0, c1, c2] = m.cols();
        Self::from_cols([
            c0.extend_zero(),
            c1.extend_zero(),
            c2.extend_zero(),
            Vector::<T, 4>::new(T::ZERO, T::ZERO, T::ZERO, T::ONE),
        ])
    }

    /// Upper-left 3x3 block
    pub fn to_mat3(&self) -> Matrix3<T> {
        Matrix3::from_cols([
            self.cols[0].truncate(),
            self.cols[1].truncate(),
            self.cols[2].truncate(),
        ])
    }

    pub fn from_translation(translation: Vector<T, 3>) -> Self {
        let mut m = Self::identity();
        m.cols[3] = translation.extend_one();
        m
    }

    pub fn from_scale(scale: Vector<T, 3>) -> Self {
        Self::from_diagonal(scale.extend_one())
    }

    /// Rotation about +X by `angle` radians
    pub fn from_rotation_x(angle: T) -> Self {
        let (s, c, o, l) = (angle.sin(), angle.cos(), T::ZERO, T::ONE);
        Self::from_cols([
            Vector::<T, 4>::new(l, o, o, o),
            Vector::<T, 4>::new(o, c, s, o),
            Vector::<T, 4>::new(o, -s, c, o),
            Vector::<T, 4>::new(o, o, o, l),
        ])
    }

    /// Rotation about +Y by `angle` radians
    pub fn from_rotation_y(angle: T) -> Self {
        let (s, c, o, l) = (angle.sin(), angle.cos(), T::ZERO, T::ONE);
        Self::from_cols([
            Vector::<T, 4>::new(c, o, -s, o),
            Vector::<T, 4>::new(o, l, o, o),
            Vector::<T, 4>::new(s, o, c, o),
            Vector::<T, 4>::new(o, o, o, l),
        ])
    }

    /// Rotation about +Z by `angle` radians
    pub fn from_rotation_z(angle: T) -> Self {
        Self::from_mat3(Matrix3::from_rotation_z(angle))
    }

    /// Transform a point (`w = 1`); no perspective divide
    #[inline]
    pub fn transform_point3(&self, point: Vector<T, 3>) -> Vector<T, 3> {
        self.mul_vec(point.extend_one()).truncate()
    }

    /// Transform a direction (`w = 0`), ignoring translation
    #[inline]
    pub fn transform_vector3(&self, vector: Vector<T, 3>) -> Vector<T, 3> {
        self.mul_vec(vector.extend_zero()).truncate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::{Vec3d, Vec3f, Vec4d, Vec4f};

    fn sample4() -> Matrix4<f64> {
        Matrix4::from_rows([
            Vec4d::new(4.0, 7.0, 2.0, 3.0),
            Vec4d::new(0.0, 5.0, 0.0, 1.0),
            Vec4d::new(1.0, 0.0, 3.0, 0.0),
            Vec4d::new(2.0, 1.0, 0.0, 6.0),
        ])
    }

    fn sample3() -> Matrix3<f64> {
        Matrix3::from_rows([
            Vec3d::new(2.0, 0.0, 1.0),
            Vec3d::new(1.0, 3.0, 2.0),
            Vec3d::new(1.0, 1.0, 2.0),
        ])
    }

    #[test]
    fn test_identity_and_zero() {
        let i = Matrix4::<f32>::identity();
        assert_eq!(i.col(2).to_array(), [0.0, 0.0, 1.0, 0.0]);
        assert_eq!(i.row(3).to_array(), [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(Matrix3::<f64>::zero().determinant(), 0.0);
        assert_eq!(Matrix4::<f32>::default(), i);
    }

    #[test]
    fn test_rows_and_transpose() {
        let m = sample3();
        assert_eq!(m.row(1).to_array(), [1.0, 3.0, 2.0]);
        assert_eq!(m.col(0).to_array(), [2.0, 1.0, 1.0]);
        assert_eq!(m.transpose().row(0), m.col(0));
        assert_eq!(m.transpose().transpose(), m);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_row_out_of_range() {
        let _ = Matrix3::<f32>::identity().row(3);
    }

    #[test]
    fn test_mul_vec() {
        let m = sample3();
        let v = m.mul_vec(Vec3d::new(1.0, 2.0, 3.0));
        assert_eq!(v.to_array(), [5.0, 13.0, 9.0]);
        assert_eq!((m * Vec3d::new(1.0, 2.0, 3.0)), v);
    }

    #[test]
    fn test_mul_identity() {
        let m = sample4();
        assert_eq!(m * Matrix4::identity(), m);
        assert_eq!(Matrix4::identity() * m, m);
    }

    #[test]
    fn test_add_sub_scale() {
        let m = sample3();
        assert_eq!((m + m).sub(m), m);
        assert_eq!(m * 2.0, m + m);
        assert!(m.sub(m).approx_eq(&Matrix3::zero(), 1e-12));
    }

    #[test]
    fn test_determinants() {
        assert_eq!(sample4().determinant(), 242.0);
        assert_eq!(sample3().determinant(), 6.0);
        assert_eq!(sample4().inverse_determinant().1, 242.0);
        assert_eq!(sample3().inverse_determinant().1, 6.0);
    }

    #[test]
    fn test_inverse4_known_values() {
        let inv = sample4().inverse();
        assert!((inv.row(0).x() - 87.0 / 242.0).abs() < 1e-12);
        assert!((inv.row(3).w() - 25.0 / 121.0).abs() < 1e-12);
        assert!((inv.row(1).z() - -2.0 / 121.0).abs() < 1e-12);
    }

    #[test]
    fn test_inverse3_known_values() {
        let expected = Matrix3::from_rows([
            Vec3d::new(2.0 / 3.0, 1.0 / 6.0, -0.5),
            Vec3d::new(0.0, 0.5, -0.5),
            Vec3d::new(-1.0 / 3.0, -1.0 / 3.0, 1.0),
        ]);
        assert!(sample3().inverse().approx_eq(&expected, 1e-12));
    }

    #[test]
    fn test_inverse_round_trip() {
        let m = sample4();
        assert!((m * m.inverse()).approx_eq(&Matrix4::identity(), 1e-12));
        let m3 = sample3();
        assert!((m3.inverse() * m3).approx_eq(&Matrix3::identity(), 1e-12));
    }

    #[test]
    fn test_adjugate_is_scaled_inverse() {
        let m = sample4();
        let scaled = m.inverse().mul_scalar(m.determinant());
        assert!(m.adjugate().approx_eq(&scaled, 1e-9));
    }

    #[test]
    fn test_singular_matrix() {
        let m = Matrix3::from_rows([
            Vec3f::new(2.0, 0.0, 1.0),
            Vec3f::new(1.0, 3.0, 2.0),
            Vec3f::new(1.0, 1.0, 1.0),
        ]);
        assert_eq!(m.determinant(), 0.0);
        assert!(!m.inverse().is_finite());
        assert_eq!(
            m.try_inverse(),
            Err(RayoError::SingularMatrix { determinant: 0.0 })
        );
        assert!(Matrix4::<f32>::zero().try_inverse().is_err());
        assert!(sample4().try_inverse().is_ok());
    }

    #[test]
    fn test_translation_and_scale() {
        let t = Matrix4::from_translation(Vec3f::new(1.0, 2.0, 3.0));
        let s = Matrix4::from_scale(Vec3f::new(2.0, 2.0, 2.0));
        let p = (t * s).transform_point3(Vec3f::new(1.0, 1.0, 1.0));
        assert_eq!(p.to_array(), [3.0, 4.0, 5.0]);
        let v = (t * s).transform_vector3(Vec3f::new(1.0, 1.0, 1.0));
        assert_eq!(v.to_array(), [2.0, 2.0, 2.0]);
    }

    #[test]
    fn test_rotation_z() {
        let r = Matrix4::from_rotation_z(std::f64::consts::FRAC_PI_2);
        let v = r.transform_vector3(Vec3d::new(1.0, 0.0, 0.0));
        assert!(v.within_epsilon_of(Vec3d::new(0.0, 1.0, 0.0), 1e-12));
        let r3 = Matrix3::from_rotation_z(std::f64::consts::FRAC_PI_2);
        assert!(r3.mul_vec(Vec3d::new(0.0, 1.0, 0.0)).within_epsilon_of(Vec3d::new(-1.0, 0.0, 0.0), 1e-12));
    }

    #[test]
    fn test_rotations_are_orthonormal() {
        for r in [
            Matrix4::from_rotation_x(0.7f64),
            Matrix4::from_rotation_y(-1.3),
            Matrix4::from_rotation_z(2.1),
        ] {
            assert!((r.determinant() - 1.0).abs() < 1e-12);
            assert!(r.inverse().approx_eq(&r.transpose(), 1e-12));
        }
    }

    #[test]
    fn test_inverse_affine_matches_inverse() {
        let m = Matrix4::from_translation(Vec3d::new(3.0, -1.0, 2.0))
            * Matrix4::from_rotation_y(0.4)
            * Matrix4::from_scale(Vec3d::new(2.0, 0.5, 4.0));
        assert!(m.inverse_affine().approx_eq(&m.inverse(), 1e-9));
        assert_eq!(m.inverse_affine().row(3).to_array(), [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_normal_matrix() {
        let s = Matrix3::from_diagonal(Vec3d::new(2.0, 4.0, 8.0));
        let n = s.normal();
        assert_eq!(n.row(0).to_array(), [0.5, 0.0, 0.0]);
        assert_eq!(n.row(2).to_array(), [0.0, 0.0, 0.125]);
    }

    #[test]
    fn test_mat3_embedding() {
        let m = sample3();
        let m4 = Matrix4::from_mat3(m);
        assert_eq!(m4.to_mat3(), m);
        assert_eq!(m4.determinant(), m.determinant());
        assert_eq!(m4.col(3).to_array(), [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_compact_round_trip() {
        let m = sample3();
        let compact = m.to_compact();
        assert_eq!(compact.0[0], [2.0, 1.0, 1.0]);
        assert_eq!(Matrix3::from_compact(compact), m);
        let m4: Matrix4<f64> = CompactMatrix4::from(sample4()).into();
        assert_eq!(m4, sample4());
        assert_eq!(std::mem::size_of::<CompactMatrix3<f32>>(), 36);
    }

    #[test]
    fn test_matrix_columns_keep_padding() {
        let m = sample3().inverse() * sample3();
        assert!(m.cols().iter().all(|c| c.padding_is_zero()));
    }

    #[test]
    fn test_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Matrix3<f32>>();
        assert_send_sync::<Matrix4<f64>>();
    }

    #[test]
    fn test_f32_inverse() {
        let m = Matrix4::from_rows([
            Vec4f::new(4.0, 7.0, 2.0, 3.0),
            Vec4f::new(0.0, 5.0, 0.0, 1.0),
            Vec4f::new(1.0, 0.0, 3.0, 0.0),
            Vec4f::new(2.0, 1.0, 0.0, 6.0),
        ]);
        assert!((m * m.inverse()).approx_eq(&Matrix4::identity(), 1e-5));
    }
}
