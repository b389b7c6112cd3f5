// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Primitive geometry types and helpers used by [`RectTree`](crate::RectTree) bounds.

use core::cmp::Ordering;
use core::fmt::Debug;

/// Axis-aligned bounding box in 2D.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Aabb2D<T> {
    /// Minimum x (left)
    pub min_x: T,
    /// Minimum y (top)
    pub min_y: T,
    /// Maximum x (right)
    pub max_x: T,
    /// Maximum y (bottom)
    pub max_y: T,
}

impl<T> Aabb2D<T> {
    /// Create a new AABB from min/max corners.
    pub const fn new(min_x: T, min_y: T, max_x: T, max_y: T) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }
}

impl<T: Copy> Aabb2D<T> {
    /// Degenerate AABB covering a single point.
    pub const fn from_point(x: T, y: T) -> Self {
        Self::new(x, y, x, y)
    }
}

impl<T: Copy + PartialOrd> Aabb2D<T> {
    /// Whether this AABB contains the point.
    pub fn contains_point(&self, x: T, y: T) -> bool {
        le(self.min_x, x) && le(self.min_y, y) && le(x, self.max_x) && le(y, self.max_y)
    }

    /// The intersection of two AABBs.
    pub fn intersect(&self, other: &Self) -> Self {
        Self {
            min_x: max_t(self.min_x, other.min_x),
            min_y: max_t(self.min_y, other.min_y),
            max_x: min_t(self.max_x, other.max_x),
            max_y: min_t(self.max_y, other.max_y),
        }
    }

    /// The smallest AABB enclosing both.
    pub fn union(&self, other: &Self) -> Self {
        union_aabb(*self, *other)
    }

    /// Return true if the AABB is empty or inverted (no area). Assumes no NaN.
    ///
    /// A degenerate box (a point, or a zero-width line) is not empty.
    pub fn is_empty(&self) -> bool {
        lt(self.max_x, self.min_x) || lt(self.max_y, self.min_y)
    }
}

impl<T: Scalar> Aabb2D<T> {
    /// Squared distance from the point to the nearest point of this AABB.
    ///
    /// Zero when the point lies inside or on the boundary. Squares are summed in the
    /// scalar's widened accumulator. For `i64` the per-axis gap saturates at
    /// `i64::MAX`, so at extreme coordinates the result is clamped to an
    /// under-estimate; it stays a valid lower bound for pruning.
    pub fn min_distance_sq(&self, x: T, y: T) -> T::Acc {
        // At most one of the two terms per axis is non-zero.
        let dx = T::add(
            T::max_zero(T::sub(self.min_x, x)),
            T::max_zero(T::sub(x, self.max_x)),
        );
        let dy = T::add(
            T::max_zero(T::sub(self.min_y, y)),
            T::max_zero(T::sub(y, self.max_y)),
        );
        let (dx, dy) = (T::widen(dx), T::widen(dy));
        dx * dx + dy * dy
    }
}

impl Aabb2D<f32> {
    /// Create an AABB from origin and size in f32.
    pub const fn from_xywh(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self::new(x, y, x + w, y + h)
    }
}

impl Aabb2D<f64> {
    /// Create an AABB from origin and size in f64.
    pub const fn from_xywh(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self::new(x, y, x + w, y + h)
    }
}

impl Aabb2D<i64> {
    /// Create an AABB from origin and size in i64.
    pub const fn from_xywh(x: i64, y: i64, w: i64, h: i64) -> Self {
        Self::new(x, y, x + w, y + h)
    }
}

/// Numeric scalar abstraction for 2D AABBs.
///
/// Provides the handful of operations needed for distance bounds, and an associated
/// widened accumulator type for squared distances (f32→f64, i64→i128).
pub trait Scalar: Copy + PartialOrd + Debug {
    /// Widened accumulator type suitable for squared-distance computations.
    type Acc: Copy
        + PartialOrd
        + core::ops::Add<Output = Self::Acc>
        + core::ops::Mul<Output = Self::Acc>
        + Debug;

    /// Add two scalar values.
    fn add(a: Self, b: Self) -> Self;

    /// Subtract two scalar values: a - b.
    fn sub(a: Self, b: Self) -> Self;

    /// Zero value for the scalar type.
    fn zero() -> Self;

    /// Max of the scalar value and zero.
    fn max_zero(v: Self) -> Self;

    /// Convert a scalar to the accumulator type.
    fn widen(v: Self) -> Self::Acc;

    /// Convert an accumulated value to `f64`, e.g. to build a [`Score`](crate::Score).
    fn acc_to_f64(v: Self::Acc) -> f64;
}

impl Scalar for f32 {
    type Acc = f64;

    #[inline]
    fn add(a: Self, b: Self) -> Self {
        a + b
    }

    #[inline]
    fn sub(a: Self, b: Self) -> Self {
        a - b
    }

    #[inline]
    fn zero() -> Self {
        0.0
    }

    #[inline]
    fn max_zero(v: Self) -> Self {
        v.max(0.0)
    }

    #[inline]
    fn widen(v: Self) -> Self::Acc {
        v as f64
    }

    #[inline]
    fn acc_to_f64(v: Self::Acc) -> f64 {
        v
    }
}

impl Scalar for f64 {
    type Acc = Self;

    #[inline]
    fn add(a: Self, b: Self) -> Self {
        a + b
    }

    #[inline]
    fn sub(a: Self, b: Self) -> Self {
        a - b
    }

    #[inline]
    fn zero() -> Self {
        0.0
    }

    #[inline]
    fn max_zero(v: Self) -> Self {
        v.max(0.0)
    }

    #[inline]
    fn widen(v: Self) -> Self::Acc {
        v
    }

    #[inline]
    fn acc_to_f64(v: Self::Acc) -> f64 {
        v
    }
}

impl Scalar for i64 {
    type Acc = i128;

    #[inline]
    fn add(a: Self, b: Self) -> Self {
        a.saturating_add(b)
    }

    #[inline]
    fn sub(a: Self, b: Self) -> Self {
        a.saturating_sub(b)
    }

    #[inline]
    fn zero() -> Self {
        0
    }

    #[inline]
    fn max_zero(v: Self) -> Self {
        v.max(0)
    }

    #[inline]
    fn widen(v: Self) -> Self::Acc {
        v as i128
    }

    #[inline]
    fn acc_to_f64(v: Self::Acc) -> f64 {
        // Lossy above 2^53, which only blurs ties between huge distances.
        v as f64
    }
}

pub(crate) fn min_t<T: PartialOrd + Copy>(a: T, b: T) -> T {
    match a.partial_cmp(&b) {
        Some(Ordering::Greater) => b,
        _ => a,
    }
}

pub(crate) fn max_t<T: PartialOrd + Copy>(a: T, b: T) -> T {
    match a.partial_cmp(&b) {
        Some(Ordering::Less) => b,
        _ => a,
    }
}

pub(crate) fn le<T: PartialOrd>(a: T, b: T) -> bool {
    a.partial_cmp(&b)
        .map(|o| o != Ordering::Greater)
        .unwrap_or(false)
}

pub(crate) fn lt<T: PartialOrd>(a: T, b: T) -> bool {
    a.partial_cmp(&b)
        .map(|o| o == Ordering::Less)
        .unwrap_or(false)
}

pub(crate) fn union_aabb<T: PartialOrd + Copy>(a: Aabb2D<T>, b: Aabb2D<T>) -> Aabb2D<T> {
    Aabb2D {
        min_x: min_t(a.min_x, b.min_x),
        min_y: min_t(a.min_y, b.min_y),
        max_x: max_t(a.max_x, b.max_x),
        max_y: max_t(a.max_y, b.max_y),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn min_distance_is_zero_inside_and_on_edges() {
        let b = Aabb2D::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(b.min_distance_sq(5.0, 5.0), 0.0);
        assert_eq!(b.min_distance_sq(10.0, 0.0), 0.0);
    }

    #[test]
    fn min_distance_outside_uses_nearest_corner_or_edge() {
        let b = Aabb2D::new(0_i64, 0, 10, 10);
        // Straight out from the right edge.
        assert_eq!(b.min_distance_sq(13, 5), 9);
        // Diagonal from the top-left corner.
        assert_eq!(b.min_distance_sq(-3, -4), 25);
    }

    #[test]
    fn min_distance_i64_extremes_saturate_to_a_lower_bound() {
        let b = Aabb2D::new(i64::MAX - 1, i64::MAX - 1, i64::MAX, i64::MAX);
        let d = b.min_distance_sq(i64::MIN, i64::MIN);
        // The true gap is 2^64 - 2 per axis; it clamps to i64::MAX.
        let clamped = i128::from(i64::MAX) * i128::from(i64::MAX);
        assert_eq!(d, 2 * clamped);
        assert!(i64::acc_to_f64(d) > 1.0e38);
    }

    #[test]
    fn acc_to_f64_keeps_small_distances_exact() {
        let b = Aabb2D::new(0_i64, 0, 10, 10);
        assert_eq!(i64::acc_to_f64(b.min_distance_sq(13, 14)), 25.0);
        let b = Aabb2D::new(0.0_f32, 0.0, 1.0, 1.0);
        assert_eq!(f32::acc_to_f64(b.min_distance_sq(4.0, 5.0)), 25.0);
    }

    #[test]
    fn from_xywh_matches_corner_form() {
        assert_eq!(Aabb2D::<i64>::from_xywh(1, 2, 3, 4), Aabb2D::new(1, 2, 4, 6));
        assert_eq!(
            Aabb2D::<f64>::from_xywh(0.5, 1.0, 2.0, 3.0),
            Aabb2D::new(0.5, 1.0, 2.5, 4.0)
        );
        assert_eq!(
            Aabb2D::<f32>::from_xywh(-1.0, -1.0, 2.0, 2.0),
            Aabb2D::new(-1.0, -1.0, 1.0, 1.0)
        );
    }

    #[test]
    fn point_box_is_not_empty_but_inverted_is() {
        assert!(!Aabb2D::from_point(1.0_f32, 2.0).is_empty());
        assert!(Aabb2D::new(1.0_f32, 0.0, 0.0, 1.0).is_empty());
    }

    #[test]
    fn union_and_intersect() {
        let a = Aabb2D::new(0, 0, 10, 10);
        let b = Aabb2D::new(5, -5, 20, 5);
        assert_eq!(a.union(&b), Aabb2D::new(0, -5, 20, 10));
        assert_eq!(a.intersect(&b), Aabb2D::new(5, 0, 10, 5));
        assert!(a.intersect(&Aabb2D::new(11, 11, 12, 12)).is_empty());
        assert!(a.contains_point(10, 0));
        assert!(!a.contains_point(11, 0));
    }
}
