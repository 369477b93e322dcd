// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scalar abstraction for pixel extents and scroll offsets.
//!
//! Implemented for `f32` and `f64` only.

use core::fmt::Debug;
use core::ops::{Add, Div, Mul, Sub};

/// Scalar type used for item heights, viewport heights, and scroll offsets.
///
/// The trait is deliberately minimal and geared toward floating-point pixel
/// coordinates. It avoids `floor`/`ceil` from `std` so the crate stays
/// `no_std` without pulling in `libm`: index conversions go through saturating
/// casts instead.
pub trait Scalar:
    Copy
    + PartialOrd
    + Debug
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
{
    /// Additive identity (typically `0.0`).
    fn zero() -> Self;

    /// Multiplicative identity (typically `1.0`).
    fn one() -> Self;

    /// Returns the maximum of `self` and `other`.
    fn max(self, other: Self) -> Self;

    /// Returns the minimum of `self` and `other`.
    fn min(self, other: Self) -> Self;

    /// Returns `true` if the value is finite (not NaN or infinite).
    fn is_finite(self) -> bool;

    /// Constructs from a `usize` lossily.
    fn from_usize(value: usize) -> Self;

    /// Returns half of the value.
    fn half(self) -> Self {
        self / (Self::one() + Self::one())
    }

    /// Clamps negative and non-finite values to zero.
    fn sanitize(self) -> Self {
        if self.is_finite() && self > Self::zero() {
            self
        } else {
            Self::zero()
        }
    }

    /// Rounds toward negative infinity and converts to an index.
    ///
    /// Negative values and NaN map to `0`; values beyond `usize::MAX`
    /// saturate.
    fn floor_index(self) -> usize;

    /// Rounds toward positive infinity and converts to an index.
    ///
    /// Negative values and NaN map to `0`; values beyond `usize::MAX`
    /// saturate.
    fn ceil_index(self) -> usize {
        let floor = self.floor_index();
        if Self::from_usize(floor) < self {
            floor.saturating_add(1)
        } else {
            floor
        }
    }
}

impl Scalar for f32 {
    fn zero() -> Self {
        0.0
    }

    fn one() -> Self {
        1.0
    }

    fn max(self, other: Self) -> Self {
        Self::max(self, other)
    }

    fn min(self, other: Self) -> Self {
        Self::min(self, other)
    }

    fn is_finite(self) -> bool {
        Self::is_finite(self)
    }

    fn from_usize(value: usize) -> Self {
        value as Self
    }

    fn floor_index(self) -> usize {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "Float-to-int casts saturate; truncation toward zero is floor for non-negative input"
        )]
        {
            self as usize
        }
    }
}

impl Scalar for f64 {
    fn zero() -> Self {
        0.0
    }

    fn one() -> Self {
        1.0
    }

    fn max(self, other: Self) -> Self {
        Self::max(self, other)
    }

    fn min(self, other: Self) -> Self {
        Self::min(self, other)
    }

    fn is_finite(self) -> bool {
        Self::is_finite(self)
    }

    fn from_usize(value: usize) -> Self {
        value as Self
    }

    fn floor_index(self) -> usize {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "Float-to-int casts saturate; truncation toward zero is floor for non-negative input"
        )]
        {
            self as usize
        }
    }
}
