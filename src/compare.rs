//! Comparison predicate algebra
//!
//! A [`Predicate`] reduces a lane-wise relation to one boolean: "Any" holds if
//! the relation holds for at least one logical component, "All" if it holds
//! for every one. Before comparing, padding lanes of both operands are forced
//! to a pair of values that make the padding contribute the identity (false
//! for Any, true for All); the full-width mask is then reduced with a 4-bit
//! move-mask.
//!
//! `Ordinal` orders vectors component by component, skipping pairs that are
//! within epsilon. That skip makes it non-transitive: `a ~ b` and `b ~ c` do
//! not imply `a ~ c`, so chains of nearly equal values can order
//! inconsistently.

use std::cmp::Ordering;
use std::fmt;

use crate::lanes::{self, Element, PaddingFill};
use crate::vector::Vector;

/// Lane-wise relation reduced over the logical components
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Predicate {
    AnyLT,
    AllLT,
    AnyLEQ,
    AllLEQ,
    AnyGT,
    AllGT,
    AnyGEQ,
    AllGEQ,
    AnyEQ,
    AllEQ,
    AnyNEQ,
    AllNEQ,
    /// Some component pair satisfies `|a - b| < EPSILON`
    AnyWE,
    /// Every component pair satisfies `|a - b| < EPSILON`
    AllWE,
    AnyNWE,
    AllNWE,
    /// The first component pair not within epsilon decides `a < b`; all
    /// within epsilon compares as not-less
    Ordinal,
}

#[derive(Debug, Clone, Copy)]
enum Relation {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    Within,
    NotWithin,
}

impl Predicate {
    /// Every predicate, in declaration order
    pub const ALL: [Predicate; 17] = [
        Predicate::AnyLT,
        Predicate::AllLT,
        Predicate::AnyLEQ,
        Predicate::AllLEQ,
        Predicate::AnyGT,
        Predicate::AllGT,
        Predicate::AnyGEQ,
        Predicate::AllGEQ,
        Predicate::AnyEQ,
        Predicate::AllEQ,
        Predicate::AnyNEQ,
        Predicate::AllNEQ,
        Predicate::AnyWE,
        Predicate::AllWE,
        Predicate::AnyNWE,
        Predicate::AllNWE,
        Predicate::Ordinal,
    ];

    pub const fn is_any(self) -> bool {
        matches!(
            self,
            Predicate::AnyLT
                | Predicate::AnyLEQ
                | Predicate::AnyGT
                | Predicate::AnyGEQ
                | Predicate::AnyEQ
                | Predicate::AnyNEQ
                | Predicate::AnyWE
                | Predicate::AnyNWE
        )
    }

    pub const fn is_all(self) -> bool {
        !self.is_any() && !matches!(self, Predicate::Ordinal)
    }

    /// Relation and padding values `(lhs, rhs)`, 0 or 1, for the reducing
    /// predicates
    const fn plan(self) -> Option<(Relation, u8, u8)> {
        let plan = match self {
            Predicate::AnyLT => (Relation::Lt, 1, 0),
            Predicate::AllLT => (Relation::Lt, 0, 1),
            Predicate::AnyLEQ => (Relation::Le, 1, 0),
            Predicate::AllLEQ => (Relation::Le, 0, 0),
            Predicate::AnyGT => (Relation::Gt, 0, 1),
            Predicate::AllGT => (Relation::Gt, 1, 0),
            Predicate::AnyGEQ => (Relation::Ge, 0, 1),
            Predicate::AllGEQ => (Relation::Ge, 0, 0),
            Predicate::AnyEQ => (Relation::Eq, 0, 1),
            Predicate::AllEQ => (Relation::Eq, 0, 0),
            Predicate::AnyNEQ => (Relation::Ne, 0, 0),
            Predicate::AllNEQ => (Relation::Ne, 0, 1),
            Predicate::AnyWE => (Relation::Within, 0, 1),
            Predicate::AllWE => (Relation::Within, 0, 0),
            Predicate::AnyNWE => (Relation::NotWithin, 0, 0),
            Predicate::AllNWE => (Relation::NotWithin, 0, 1),
            Predicate::Ordinal => return None,
        };
        Some(plan)
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Per-lane comparison result for the logical lanes `0..N`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LaneMask<const N: usize> {
    bits: u8,
}

impl<const N: usize> LaneMask<N> {
    /// Keep bits `0..N`
    pub const fn new(bits: u8) -> Self {
        Self {
            bits: bits & lanes::logical_bits::<N>(),
        }
    }

    /// Bit `i` set when lane `i` satisfied the relation
    pub const fn bits(self) -> u8 {
        self.bits
    }

    pub const fn any(self) -> bool {
        self.bits != 0
    }

    pub const fn all(self) -> bool {
        self.bits == lanes::logical_bits::<N>()
    }

    pub const fn none(self) -> bool {
        self.bits == 0
    }

    /// Lane `index` satisfied the relation
    pub const fn test(self, index: usize) -> bool {
        index < N && self.bits & (1 << index) != 0
    }

    pub const fn count(self) -> u32 {
        self.bits.count_ones()
    }
}

fn relation_mask<T: Element>(relation: Relation, a: T::Reg, b: T::Reg) -> T::Reg {
    match relation {
        Relation::Lt => T::vlt(a, b),
        Relation::Le => T::vle(a, b),
        Relation::Gt => T::vgt(a, b),
        Relation::Ge => T::vge(a, b),
        Relation::Eq => T::veq(a, b),
        Relation::Ne => T::vne(a, b),
        Relation::Within => T::vwithin(a, b, T::EPSILON),
        Relation::NotWithin => T::vxor(T::vwithin(a, b, T::EPSILON), T::vsplat(T::ALL_BITS)),
    }
}

impl<T: Element, const N: usize> Vector<T, N> {
    fn padded_for(self, one: u8) -> T::Reg {
        if one == 1 {
            lanes::pad_with::<T, N>(self.reg(), PaddingFill::One)
        } else {
            self.reg()
        }
    }

    /// Evaluate `self <predicate> rhs`
    ///
    /// # Examples
    ///
    /// ```
    /// use rayo::{Predicate, Vec3f};
    ///
    /// let a = Vec3f::new(1.0, 2.0, 3.0);
    /// let b = Vec3f::new(1.0, 2.0, 4.0);
    ///
    /// assert!(a.compare(Predicate::AnyLT, b));
    /// assert!(!a.compare(Predicate::AllLT, b));
    /// assert!(!a.compare(Predicate::AllEQ, b));
    /// assert!(a.compare(Predicate::Ordinal, b));
    /// ```
    pub fn compare(self, predicate: Predicate, rhs: Self) -> bool {
        let Some((relation, lhs_pad, rhs_pad)) = predicate.plan() else {
            return self.ordinal_lt(rhs);
        };
        let mask = relation_mask::<T>(relation, self.padded_for(lhs_pad), rhs.padded_for(rhs_pad));
        let bits = T::vmovemask(mask);
        if predicate.is_any() {
            bits != 0
        } else {
            bits == 0b1111
        }
    }

    /// Evaluate `self <predicate> (value, value, ...)`
    pub fn compare_scalar(self, predicate: Predicate, value: T) -> bool {
        self.compare(predicate, Self::splat(value))
    }

    /// (lanes not within epsilon, lanes less than)
    fn ordinal_masks(self, rhs: Self) -> (u8, u8) {
        let (a, b) = (self.reg(), rhs.reg());
        let within = T::vmovemask(T::vwithin(a, b, T::EPSILON));
        (!within & lanes::logical_bits::<N>(), T::vmovemask(T::vlt(a, b)))
    }

    fn ordinal_lt(self, rhs: Self) -> bool {
        let (undecided, lt) = self.ordinal_masks(rhs);
        undecided != 0 && lt & (1 << undecided.trailing_zeros()) != 0
    }

    /// Three-way form of [`Predicate::Ordinal`]
    ///
    /// `Equal` when every component pair is within epsilon. A first deciding
    /// pair that is unordered (NaN) compares `Greater`.
    pub fn ordinal_cmp(self, rhs: Self) -> Ordering {
        let (undecided, lt) = self.ordinal_masks(rhs);
        if undecided == 0 {
            return Ordering::Equal;
        }
        if lt & (1 << undecided.trailing_zeros()) != 0 {
            Ordering::Less
        } else {
            Ordering::Greater
        }
    }

    /// True when every component pair lies within `epsilon`
    ///
    /// Floats test `|a - b| < epsilon`, integers `|a - b| <= epsilon`.
    pub fn within_epsilon_of(self, rhs: Self, epsilon: T) -> bool {
        self.mask_of(T::vwithin(self.reg(), rhs.reg(), epsilon)).all()
    }

    fn mask_of(self, mask: T::Reg) -> LaneMask<N> {
        LaneMask::new(T::vmovemask(mask))
    }

    pub fn eq_mask(self, rhs: Self) -> LaneMask<N> {
        self.mask_of(T::veq(self.reg(), rhs.reg()))
    }

    pub fn ne_mask(self, rhs: Self) -> LaneMask<N> {
        self.mask_of(T::vne(self.reg(), rhs.reg()))
    }

    pub fn lt_mask(self, rhs: Self) -> LaneMask<N> {
        self.mask_of(T::vlt(self.reg(), rhs.reg()))
    }

    pub fn le_mask(self, rhs: Self) -> LaneMask<N> {
        self.mask_of(T::vle(self.reg(), rhs.reg()))
    }

    pub fn gt_mask(self, rhs: Self) -> LaneMask<N> {
        self.mask_of(T::vgt(self.reg(), rhs.reg()))
    }

    pub fn ge_mask(self, rhs: Self) -> LaneMask<N> {
        self.mask_of(T::vge(self.reg(), rhs.reg()))
    }

    /// Lanes within the kind's default epsilon
    pub fn within_mask(self, rhs: Self) -> LaneMask<N> {
        self.mask_of(T::vwithin(self.reg(), rhs.reg(), T::EPSILON))
    }

    /// Per lane, `mask ? self : rhs`
    pub fn select(mask: LaneMask<N>, on_true: Self, on_false: Self) -> Self {
        let lanes = T::vstore(on_true.reg());
        let others = T::vstore(on_false.reg());
        Self::from_array(std::array::from_fn(|i| if mask.test(i) { lanes[i] } else { others[i] }))
    }
}

/// `==` is [`Predicate::AllEQ`]: NaN components never compare equal and
/// `-0.0 == 0.0`
impl<T: Element, const N: usize> PartialEq for Vector<T, N> {
    fn eq(&self, other: &Self) -> bool {
        self.compare(Predicate::AllEQ, *other)
    }
}

impl<const N: usize> Eq for Vector<i32, N> {}

/// Vector wrapper ordered by [`Vector::ordinal_cmp`]
///
/// Usable as a `BTreeMap` key. `Ordinal` is not transitive for float vectors
/// whose components differ by about epsilon, so a map built from such keys
/// may treat nearly equal vectors inconsistently. Integer vectors order
/// lexicographically and are transitive.
///
/// # NaN
///
/// Unlike [`Vector::ordinal_cmp`], a NaN component equals a NaN component and
/// sorts after every number, so every key equals itself.
#[derive(Debug, Clone, Copy)]
pub struct OrdinalKey<T: Element, const N: usize>(pub Vector<T, N>);

impl<T: Element, const N: usize> PartialEq for OrdinalKey<T, N> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T: Element, const N: usize> Eq for OrdinalKey<T, N> {}

impl<T: Element, const N: usize> PartialOrd for OrdinalKey<T, N> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: Element, const N: usize> Ord for OrdinalKey<T, N> {
    fn cmp(&self, other: &Self) -> Ordering {
        let (a, b) = (self.0.reg(), other.0.reg());
        let nan_a = T::vmovemask(T::vne(a, a));
        let nan_b = T::vmovemask(T::vne(b, b));
        let (undecided, lt) = self.0.ordinal_masks(other.0);
        let undecided = undecided & !(nan_a & nan_b);
        if undecided == 0 {
            return Ordering::Equal;
        }
        let lane = 1 << undecided.trailing_zeros();
        if lt & lane != 0 || nan_b & !nan_a & lane != 0 {
            Ordering::Less
        } else {
            Ordering::Greater
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::{Vec2i, Vec3d, Vec3f, Vec3i, Vec4f};

    #[test]
    fn test_predicates_on_sample_vectors() {
        let a = Vec3f::new(1.0, 2.0, 3.0);
        let b = Vec3f::new(1.0, 2.0, 4.0);
        assert!(a.compare(Predicate::AnyLT, b));
        assert!(!a.compare(Predicate::AllLT, b));
        assert!(!a.compare(Predicate::AllEQ, b));
        assert!(a.compare(Predicate::AnyEQ, b));
        assert!(a.compare(Predicate::AllLEQ, b));
        assert!(!a.compare(Predicate::AnyGT, b));
        assert!(b.compare(Predicate::AllGEQ, a));
        assert!(a.compare(Predicate::AnyNEQ, b));
        assert!(!a.compare(Predicate::AllNEQ, b));
        assert!(a.compare(Predicate::Ordinal, b));
        assert!(!b.compare(Predicate::Ordinal, a));
    }

    #[test]
    fn test_padding_never_decides() {
        // Every relation that holds on all logical lanes must not be broken by
        // padding, and no Any predicate may be made true by it.
        let a = Vec3f::new(1.0, 1.0, 1.0);
        let b = Vec3f::new(2.0, 2.0, 2.0);
        assert!(a.compare(Predicate::AllLT, b));
        assert!(b.compare(Predicate::AllGT, a));
        assert!(a.compare(Predicate::AllNEQ, b));
        assert!(a.compare(Predicate::AllNWE, b));
        assert!(!a.compare(Predicate::AnyEQ, b));
        assert!(!a.compare(Predicate::AnyWE, b));
        assert!(!a.compare(Predicate::AnyGEQ, b));
        assert!(!b.compare(Predicate::AnyLEQ, a));

        let z = Vec3f::zero();
        assert!(!z.compare(Predicate::AnyNEQ, z));
        assert!(!z.compare(Predicate::AnyNWE, z));
        assert!(!z.compare(Predicate::AnyLT, z));
        assert!(!z.compare(Predicate::AnyGT, z));
    }

    #[test]
    fn test_within_epsilon() {
        let a = Vec3f::splat(1.000_000_1);
        let b = Vec3f::splat(1.000_000_2);
        assert!(a.compare(Predicate::AllWE, b));
        assert!(!a.compare(Predicate::AllEQ, b));
        assert!(!a.compare(Predicate::AnyNWE, b));
        assert!(a.within_epsilon_of(Vec3f::splat(1.05), 0.1));
        assert!(!a.within_epsilon_of(Vec3f::splat(1.05), 0.01));
    }

    #[test]
    fn test_within_zero_epsilon() {
        let a = Vec3f::new(1.0, 2.0, 3.0);
        assert!(!a.within_epsilon_of(a, 0.0));
        assert!(Vec3i::new(1, 2, 3).within_epsilon_of(Vec3i::new(1, 2, 3), 0));
    }

    #[test]
    fn test_integer_epsilon_is_exact() {
        let a = Vec2i::new(1, 2);
        assert!(a.compare(Predicate::AllWE, Vec2i::new(1, 2)));
        assert!(!a.compare(Predicate::AllWE, Vec2i::new(1, 3)));
        assert!(a.compare(Predicate::AnyNWE, Vec2i::new(1, 3)));
    }

    #[test]
    fn test_integer_ordinal_is_lexicographic() {
        let a = Vec3i::new(1, 5, 0);
        let b = Vec3i::new(2, 0, 0);
        assert!(a.compare(Predicate::Ordinal, b));
        assert_eq!(a.ordinal_cmp(b), Ordering::Less);
        assert_eq!(b.ordinal_cmp(a), Ordering::Greater);
        assert_eq!(a.ordinal_cmp(a), Ordering::Equal);
    }

    #[test]
    fn test_ordinal_skips_near_equal_components() {
        let a = Vec3d::new(1.0, 5.0, 0.0);
        let b = Vec3d::new(1.000_001, 2.0, 0.0);
        // x differs by less than epsilon, so y decides.
        assert_eq!(a.ordinal_cmp(b), Ordering::Greater);
        assert!(!a.compare(Predicate::Ordinal, b));
    }

    #[test]
    fn test_nan_compares() {
        let a = Vec3f::new(f32::NAN, 1.0, 1.0);
        let b = Vec3f::new(f32::NAN, 1.0, 1.0);
        assert!(!a.compare(Predicate::AllEQ, b));
        assert!(a.compare(Predicate::AnyNEQ, b));
        assert_ne!(a, b);
        assert!(!a.compare(Predicate::AllWE, b));
    }

    #[test]
    fn test_signed_zero_equal() {
        assert_eq!(Vec3f::new(-0.0, 1.0, 2.0), Vec3f::new(0.0, 1.0, 2.0));
    }

    #[test]
    fn test_compare_scalar() {
        let v = Vec4f::new(1.0, 2.0, 3.0, 4.0);
        assert!(v.compare_scalar(Predicate::AllGT, 0.5));
        assert!(v.compare_scalar(Predicate::AnyEQ, 3.0));
        assert!(!v.compare_scalar(Predicate::AllLT, 4.0));
    }

    #[test]
    fn test_lane_masks() {
        let a = Vec3f::new(1.0, 5.0, 3.0);
        let b = Vec3f::new(2.0, 4.0, 3.0);
        let lt = a.lt_mask(b);
        assert_eq!(lt.bits(), 0b001);
        assert!(lt.any() && !lt.all() && !lt.none());
        assert!(lt.test(0) && !lt.test(3));
        assert_eq!(a.le_mask(b).bits(), 0b101);
        assert_eq!(a.eq_mask(b).count(), 1);
        // Padding lanes (equal zeros) never appear in a mask.
        assert_eq!(a.ne_mask(b).bits(), 0b011);
        assert!(a.ge_mask(a).all());
        assert_eq!(a.gt_mask(b).bits(), 0b010);
        assert_eq!(a.within_mask(b).bits(), 0b100);

        let picked = Vec3f::select(lt, a, b);
        assert_eq!(picked.to_array(), [1.0, 4.0, 3.0]);
    }

    #[test]
    fn test_predicate_classes() {
        let any = Predicate::ALL.iter().filter(|p| p.is_any()).count();
        let all = Predicate::ALL.iter().filter(|p| p.is_all()).count();
        assert_eq!((any, all), (8, 8));
        assert!(!Predicate::Ordinal.is_any() && !Predicate::Ordinal.is_all());
        assert_eq!(Predicate::AllWE.to_string(), "AllWE");
    }

    #[test]
    fn test_ordinal_key_in_btree() {
        use std::collections::BTreeMap;

        let mut map = BTreeMap::new();
        map.insert(OrdinalKey(Vec2i::new(2, 0)), "b");
        map.insert(OrdinalKey(Vec2i::new(1, 9)), "a");
        map.insert(OrdinalKey(Vec2i::new(2, 1)), "c");
        let order: Vec<_> = map.values().copied().collect();
        assert_eq!(order, ["a", "b", "c"]);
    }

    #[test]
    fn test_ordinal_key_nan_is_reflexive() {
        use std::collections::BTreeMap;

        let nan = OrdinalKey(Vec3d::new(1.0, f64::NAN, 0.0));
        let same = nan;
        assert_eq!(nan.cmp(&same), Ordering::Equal);
        assert_eq!(nan, same);
        assert_eq!(Vec3d::new(1.0, f64::NAN, 0.0).ordinal_cmp(Vec3d::new(1.0, f64::NAN, 0.0)), Ordering::Greater);

        let number = OrdinalKey(Vec3d::new(1.0, 1e300, 0.0));
        assert_eq!(number.cmp(&nan), Ordering::Less);
        assert_eq!(nan.cmp(&number), Ordering::Greater);
        // Both NaN in lane 1, decided by lane 2
        let later = OrdinalKey(Vec3d::new(1.0, f64::NAN, 5.0));
        assert_eq!(nan.cmp(&later), Ordering::Less);

        let mut map = BTreeMap::new();
        map.insert(nan, "nan");
        map.insert(number, "number");
        map.insert(OrdinalKey(Vec3d::new(1.0, f64::NAN, 0.0)), "nan again");
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&nan), Some(&"nan again"));
        assert_eq!(map.values().copied().collect::<Vec<_>>(), ["number", "nan again"]);
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use crate::vector::{Vec4d, Vec4i};
    use proptest::prelude::*;

    fn vec4i() -> impl Strategy<Value = Vec4i> {
        prop::array::uniform4(-5i32..5).prop_map(Vec4i::from_array)
    }

    fn vec4d_with_nan() -> impl Strategy<Value = Vec4d> {
        prop::array::uniform4(prop_oneof![Just(f64::NAN), -5.0f64..5.0]).prop_map(Vec4d::from_array)
    }

    // Property test: OrdinalKey is reflexive and antisymmetric with NaN lanes
    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn test_ordinal_key_total_with_nan(a in vec4d_with_nan(), b in vec4d_with_nan()) {
            let (ka, kb) = (OrdinalKey(a), OrdinalKey(b));
            prop_assert_eq!(ka.cmp(&ka), Ordering::Equal);
            prop_assert_eq!(ka.cmp(&kb), kb.cmp(&ka).reverse());
        }
    }

    // Property test: Any and All are duals through negated relations
    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn test_any_all_duality(a in vec4i(), b in vec4i()) {
            prop_assert_eq!(a.compare(Predicate::AnyLT, b), !a.compare(Predicate::AllGEQ, b));
            prop_assert_eq!(a.compare(Predicate::AnyEQ, b), !a.compare(Predicate::AllNEQ, b));
            prop_assert_eq!(a.compare(Predicate::AllWE, b), !a.compare(Predicate::AnyNWE, b));
        }
    }

    // Property test: Predicates agree with per-lane masks on every arity
    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn test_predicates_match_masks(a in vec4i(), b in vec4i()) {
            let (a3, b3) = (a.truncate(), b.truncate());
            prop_assert_eq!(a3.compare(Predicate::AnyGT, b3), a3.gt_mask(b3).any());
            prop_assert_eq!(a3.compare(Predicate::AllLEQ, b3), a3.le_mask(b3).all());
            let (a2, b2) = (a3.truncate(), b3.truncate());
            prop_assert_eq!(a2.compare(Predicate::AllNEQ, b2), a2.ne_mask(b2).all());
        }
    }

    // Property test: Integer ordinal matches array ordering
    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn test_integer_ordinal_matches_arrays(a in vec4i(), b in vec4i()) {
            prop_assert_eq!(a.ordinal_cmp(b), a.to_array().cmp(&b.to_array()));
        }
    }
}
