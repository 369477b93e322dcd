// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Configuration for a [`VirtualScroll`](crate::VirtualScroll) instance.

use core::fmt;
use core::time::Duration;

use crate::Scalar;

/// Rows rendered above and below the viewport when no buffer is configured.
pub const DEFAULT_BUFFER_SIZE: usize = 5;

/// Scroll throttle interval when none is configured (roughly one 60 Hz frame).
pub const DEFAULT_THROTTLE_DELAY: Duration = Duration::from_millis(16);

/// Immutable configuration for one virtual scroll instance.
///
/// Only `item_height` is required; the buffer and throttle delay default to
/// [`DEFAULT_BUFFER_SIZE`] and [`DEFAULT_THROTTLE_DELAY`].
///
/// ```rust
/// use core::time::Duration;
/// use understory_virtual_scroll::ScrollOptions;
///
/// let options = ScrollOptions::new(48.0_f64)
///     .with_buffer_size(8)
///     .with_throttle_delay(Duration::from_millis(32));
/// assert_eq!(options.buffer_size(), 8);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollOptions<S> {
    item_height: S,
    buffer_size: usize,
    throttle_delay: Duration,
}

impl<S: Scalar> ScrollOptions<S> {
    /// Creates options for rows of `item_height` with default buffer and throttle.
    ///
    /// `item_height` must be finite and strictly positive. Other values are a
    /// precondition violation: they trip a debug assertion, and in release
    /// builds the computed windows are unspecified. Use [`Self::try_new`] when
    /// the height comes from untrusted input.
    #[must_use]
    pub fn new(item_height: S) -> Self {
        debug_assert!(
            check_item_height(item_height).is_ok(),
            "item_height must be finite and positive, got {item_height:?}"
        );
        Self {
            item_height,
            buffer_size: DEFAULT_BUFFER_SIZE,
            throttle_delay: DEFAULT_THROTTLE_DELAY,
        }
    }

    /// Creates options after validating `item_height`.
    pub fn try_new(item_height: S) -> Result<Self, OptionsError> {
        check_item_height(item_height)?;
        Ok(Self {
            item_height,
            buffer_size: DEFAULT_BUFFER_SIZE,
            throttle_delay: DEFAULT_THROTTLE_DELAY,
        })
    }

    /// Sets how many rows are rendered beyond each edge of the viewport.
    #[must_use]
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    /// Sets the minimum interval between committed scroll offsets.
    #[must_use]
    pub fn with_throttle_delay(mut self, throttle_delay: Duration) -> Self {
        self.throttle_delay = throttle_delay;
        self
    }

    /// Checks that the configuration describes a usable list.
    pub fn validate(&self) -> Result<(), OptionsError> {
        check_item_height(self.item_height)
    }

    /// Fixed height of every row.
    #[must_use]
    pub fn item_height(&self) -> S {
        self.item_height
    }

    /// Rows rendered beyond each edge of the viewport.
    #[must_use]
    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /// Minimum interval between committed scroll offsets.
    #[must_use]
    pub fn throttle_delay(&self) -> Duration {
        self.throttle_delay
    }
}

fn check_item_height<S: Scalar>(item_height: S) -> Result<(), OptionsError> {
    if !item_height.is_finite() {
        return Err(OptionsError::NonFiniteItemHeight);
    }
    if item_height <= S::zero() {
        return Err(OptionsError::NonPositiveItemHeight);
    }
    Ok(())
}

/// Error returned when [`ScrollOptions`] cannot describe a list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OptionsError {
    /// The item height was NaN or infinite.
    NonFiniteItemHeight,
    /// The item height was zero or negative.
    NonPositiveItemHeight,
}

impl fmt::Display for OptionsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFiniteItemHeight => f.write_str("item height must be finite"),
            Self::NonPositiveItemHeight => f.write_str("item height must be greater than zero"),
        }
    }
}

impl core::error::Error for OptionsError {}
