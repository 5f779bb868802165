//! Field-order traversal, hashing and serialization
//!
//! Every external view of a vector or matrix uses one order: `x, y, z, w`
//! for vectors and column by column for matrices (`c0.x, c0.y, ..., c1.x`).
//! Padding lanes are never visited, hashed or serialized.

use std::hash::{Hash, Hasher};

use crate::lanes::{Element, FloatElement};
use crate::matrix::{Matrix3, Matrix4};
use crate::vector::Vector;

const VECTOR_FIELDS: [&str; 4] = ["x", "y", "z", "w"];

const MATRIX_FIELDS: [[&str; 4]; 4] = [
    ["c0.x", "c0.y", "c0.z", "c0.w"],
    ["c1.x", "c1.y", "c1.z", "c1.w"],
    ["c2.x", "c2.y", "c2.z", "c2.w"],
    ["c3.x", "c3.y", "c3.z", "c3.w"],
];

/// Receives the scalar fields of a value in field order
///
/// Closures taking `(name, value)` are visitors.
pub trait FieldVisitor<T> {
    fn visit(&mut self, name: &'static str, value: T);
}

impl<T, F: FnMut(&'static str, T)> FieldVisitor<T> for F {
    fn visit(&mut self, name: &'static str, value: T) {
        self(name, value)
    }
}

/// Values with a fixed, named sequence of scalar fields
///
/// # Examples
///
/// ```
/// use rayo::{Vec3i, VisitFields};
///
/// let mut seen = Vec::new();
/// Vec3i::new(7, 8, 9).visit_fields(&mut |name, value| seen.push((name, value)));
/// assert_eq!(seen, [("x", 7), ("y", 8), ("z", 9)]);
/// ```
pub trait VisitFields {
    type Scalar: Element;

    fn visit_fields(&self, visitor: &mut impl FieldVisitor<Self::Scalar>);

    /// Number of scalar fields visited
    fn field_count(&self) -> usize;
}

impl<T: Element, const N: usize> VisitFields for Vector<T, N> {
    type Scalar = T;

    fn visit_fields(&self, visitor: &mut impl FieldVisitor<T>) {
        for (name, value) in VECTOR_FIELDS.into_iter().zip(self.to_array()) {
            visitor.visit(name, value);
        }
    }

    fn field_count(&self) -> usize {
        N
    }
}

macro_rules! matrix_fields {
    ($name:ident, $n:literal) => {
        impl<T: FloatElement> VisitFields for $name<T> {
            type Scalar = T;

            fn visit_fields(&self, visitor: &mut impl FieldVisitor<T>) {
                for (names, col) in MATRIX_FIELDS.into_iter().zip(self.cols()) {
                    for (name, value) in names.into_iter().zip(col.to_array()) {
                        visitor.visit(name, value);
                    }
                }
            }

            fn field_count(&self) -> usize {
                $n * $n
            }
        }

        /// Hashes the columns in order, consistent with `==`
        impl<T: FloatElement> Hash for $name<T> {
            fn hash<H: Hasher>(&self, state: &mut H) {
                for col in self.cols() {
                    col.hash(state);
                }
            }
        }
    };
}

matrix_fields!(Matrix3, 3);
matrix_fields!(Matrix4, 4);

/// Hashes the logical components in field order
///
/// Float components hash their bit pattern with `-0.0` folded into `+0.0`, so
/// vectors equal under `==` hash equally.
impl<T: Element, const N: usize> Hash for Vector<T, N> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for component in self.to_array() {
            state.write_u64(component.hash_bits());
        }
    }
}

#[cfg(feature = "serde")]
mod serde_impls {
    use std::fmt;
    use std::marker::PhantomData;

    use serde::de::{self, Deserialize, Deserializer, SeqAccess, Visitor};
    use serde::ser::{Serialize, SerializeTuple, Serializer};

    use crate::lanes::{Element, FloatElement};
    use crate::matrix::{Matrix3, Matrix4};
    use crate::vector::Vector;

    impl<T: Element + Serialize, const N: usize> Serialize for Vector<T, N> {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut tuple = serializer.serialize_tuple(N)?;
            for component in self.to_array() {
                tuple.serialize_element(&component)?;
            }
            tuple.end()
        }
    }

    struct VectorVisitor<T, const N: usize>(PhantomData<T>);

    impl<'de, T: Element + Deserialize<'de>, const N: usize> Visitor<'de> for VectorVisitor<T, N> {
        type Value = Vector<T, N>;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(formatter, "a tuple of {} {} components", N, T::KIND.name())
        }

        fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut components = [T::ZERO; N];
            for (i, slot) in components.iter_mut().enumerate() {
                *slot = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(i, &self))?;
            }
            Ok(Vector::from_array(components))
        }
    }

    impl<'de, T: Element + Deserialize<'de>, const N: usize> Deserialize<'de> for Vector<T, N> {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserializer.deserialize_tuple(N, VectorVisitor::<T, N>(PhantomData))
        }
    }

    struct MatrixVisitor<M>(PhantomData<M>);

    macro_rules! matrix_serde {
        ($name:ident, $n:literal) => {
            impl<T: FloatElement + Serialize> Serialize for $name<T> {
                fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                    let mut tuple = serializer.serialize_tuple($n)?;
                    for col in self.cols() {
                        tuple.serialize_element(&col)?;
                    }
                    tuple.end()
                }
            }

            impl<'de, T: FloatElement + Deserialize<'de>> Visitor<'de> for MatrixVisitor<$name<T>> {
                type Value = $name<T>;

                fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(formatter, "a tuple of {} columns", $n)
                }

                fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                    let mut cols = [Vector::<T, $n>::zero(); $n];
                    for (i, slot) in cols.iter_mut().enumerate() {
                        *slot = seq
                            .next_element()?
                            .ok_or_else(|| de::Error::invalid_length(i, &self))?;
                    }
                    Ok($name::from_cols(cols))
                }
            }

            impl<'de, T: FloatElement + Deserialize<'de>> Deserialize<'de> for $name<T> {
                fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                    deserializer.deserialize_tuple($n, MatrixVisitor::<$name<T>>(PhantomData))
                }
            }
        };
    }

    matrix_serde!(Matrix3, 3);
    matrix_serde!(Matrix4, 4);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::{Vec2f, Vec3f, Vec4i};
    use std::collections::hash_map::DefaultHasher;
    use std::collections::HashSet;

    fn hash_of<H: Hash>(value: &H) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_vector_field_order() {
        let mut names = Vec::new();
        let mut values = Vec::new();
        Vec4i::new(1, 2, 3, 4).visit_fields(&mut |name, value| {
            names.push(name);
            values.push(value);
        });
        assert_eq!(names, ["x", "y", "z", "w"]);
        assert_eq!(values, [1, 2, 3, 4]);
    }

    #[test]
    fn test_padding_not_visited() {
        let mut count = 0;
        Vec2f::new(1.0, 2.0).visit_fields(&mut |_, _| count += 1);
        assert_eq!(count, 2);
        assert_eq!(Vec2f::zero().field_count(), 2);
    }

    #[test]
    fn test_matrix_field_order() {
        let m = Matrix3::from_cols([
            Vec3f::new(1.0, 2.0, 3.0),
            Vec3f::new(4.0, 5.0, 6.0),
            Vec3f::new(7.0, 8.0, 9.0),
        ]);
        let mut seen = Vec::new();
        m.visit_fields(&mut |name, value| seen.push((name, value)));
        assert_eq!(seen.len(), m.field_count());
        assert_eq!(seen[0], ("c0.x", 1.0));
        assert_eq!(seen[3], ("c1.x", 4.0));
        assert_eq!(seen[8], ("c2.z", 9.0));
    }

    struct Collect(Vec<f64>);

    impl FieldVisitor<f64> for Collect {
        fn visit(&mut self, _name: &'static str, value: f64) {
            self.0.push(value);
        }
    }

    #[test]
    fn test_struct_visitor() {
        let mut collect = Collect(Vec::new());
        Matrix4::<f64>::identity().visit_fields(&mut collect);
        assert_eq!(collect.0.len(), 16);
        assert_eq!(collect.0.iter().sum::<f64>(), 4.0);
        assert_eq!(collect.0[5], 1.0);
    }

    #[test]
    fn test_hash_follows_equality() {
        let a = Vec3f::new(-0.0, 1.0, 2.0);
        let b = Vec3f::new(0.0, 1.0, 2.0);
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
        assert_ne!(hash_of(&a), hash_of(&Vec3f::new(0.0, 1.0, 3.0)));
    }

    #[test]
    fn test_int_vectors_in_hash_set() {
        let set: HashSet<Vec4i> = [Vec4i::new(1, 2, 3, 4), Vec4i::new(1, 2, 3, 4), Vec4i::zero()]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_matrix_hash() {
        let m = Matrix4::<f32>::from_rotation_z(0.3);
        assert_eq!(hash_of(&m), hash_of(&m.transpose().transpose()));
        assert_ne!(hash_of(&m), hash_of(&Matrix4::<f32>::identity()));
    }
}
