//
// Copyright 2026 lazybson Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

//! The lazy decode cache.
//!
//! Heap-producing accessors (strings, nested views, ObjectId hex) memoize
//! their result in a per-view slot array, one slot per element descriptor.
//! The slot array itself is allocated on first demand, so a view that only
//! ever serves scalars allocates nothing.
//!
//! Publication discipline: each slot fills at most once visibly. Concurrent
//! first readers of the same slot serialize on the cell; later readers take
//! the published value with no locking. A failed computation publishes
//! nothing, so the next caller retries.

use once_cell::sync::OnceCell;

use crate::raw::array::RawArray;
use crate::raw::document::RawDocument;

/// A memoized accessor result. The variant held by a slot is fixed by the
/// tag of the element the slot belongs to.
#[derive(Debug)]
pub(crate) enum Cached<'a> {
    /// Text of a STRING, JAVASCRIPT or SYMBOL element, borrowed from the
    /// document bytes after one-time UTF-8 validation.
    Str(&'a str),
    /// The 24-character lowercase hex rendering of an OBJECT_ID payload.
    ObjectId(String),
    /// An indexed view over a nested DOCUMENT payload.
    Document(RawDocument<'a>),
    /// An indexed view over a nested ARRAY payload.
    Array(RawArray<'a>),
}

#[derive(Debug)]
pub(crate) struct ElementCache<'a> {
    slots: OnceCell<Box<[OnceCell<Cached<'a>>]>>,
}

impl<'a> ElementCache<'a> {
    pub(crate) fn new() -> Self {
        ElementCache {
            slots: OnceCell::new(),
        }
    }

    /// Returns the slot for the descriptor at `index`, allocating the slot
    /// array on first use. `count` is the number of descriptors in the view.
    pub(crate) fn slot(&self, index: usize, count: usize) -> &OnceCell<Cached<'a>> {
        let slots = self.slots.get_or_init(|| {
            std::iter::repeat_with(OnceCell::new).take(count).collect()
        });
        &slots[index]
    }
}

#[cfg(test)]
mod tests {
    use super::{Cached, ElementCache};

    #[test]
    fn test_slot_array_is_not_allocated_until_first_use() {
        let cache = ElementCache::new();
        assert!(cache.slots.get().is_none());
        let _ = cache.slot(0, 4);
        assert_eq!(cache.slots.get().unwrap().len(), 4);
    }

    #[test]
    fn test_slot_publishes_at_most_once() {
        let cache = ElementCache::new();
        let published = cache.slot(1, 4).get_or_init(|| Cached::Str("first"));
        assert!(matches!(published, Cached::Str("first")));

        // A second initializer for the same slot is discarded.
        let observed = cache.slot(1, 4).get_or_init(|| Cached::Str("second"));
        assert!(matches!(observed, Cached::Str("first")));
    }
}
