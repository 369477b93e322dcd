// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stable item identity.

use core::hash::Hash;

/// A list record with a stable, unique identifier.
///
/// Ids may be numeric, strings, or any other hashable key. Two items present
/// in the same list at the same time must not share an id; if they do, id
/// lookups resolve to the first match.
pub trait Keyed {
    /// Identifier type.
    type Id: Clone + Eq + Hash;

    /// Returns this item's identifier.
    fn id(&self) -> Self::Id;

    /// Returns `true` if this item's identifier equals `id`.
    ///
    /// Id lookups go through this method. Override it when building an owned
    /// id is costly, for example to compare a borrowed `String` field.
    fn has_id(&self, id: &Self::Id) -> bool {
        self.id() == *id
    }
}

impl<K: Clone + Eq + Hash, V> Keyed for (K, V) {
    type Id = K;

    fn id(&self) -> K {
        self.0.clone()
    }

    fn has_id(&self, id: &K) -> bool {
        self.0 == *id
    }
}

impl<T: Keyed + ?Sized> Keyed for &T {
    type Id = T::Id;

    fn id(&self) -> Self::Id {
        (**self).id()
    }

    fn has_id(&self, id: &Self::Id) -> bool {
        (**self).has_id(id)
    }
}

/// Returns the index of the first item whose id equals `id`.
///
/// This is a linear scan; it is meant for on-demand queries such as
/// [`VirtualScroll::scroll_to_item`](crate::VirtualScroll::scroll_to_item),
/// not per-frame work.
pub fn position_of<T: Keyed>(items: &[T], id: &T::Id) -> Option<usize> {
    items.iter().position(|item| item.has_id(id))
}
