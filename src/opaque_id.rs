//! Strongly typed integer handles.
//!
//! An [`OpaqueId`] is a plain `u32` index tagged with a marker type so that handles of different tables
//! (surfaces, volumes, faces, ...) can never be mixed up. The maximum value of the underlying integer is
//! reserved as the "invalid" handle, which is also the [`Default`].
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{
    cmp::Ordering,
    fmt::{Debug, Display},
    hash::{Hash, Hasher},
    marker::PhantomData,
    ops::Range,
};

/// Type-safe index into a table of `T`.
pub struct OpaqueId<T> {
    value: u32,
    marker: PhantomData<fn() -> T>,
}

impl<T> OpaqueId<T> {
    const INVALID: u32 = u32::MAX;

    /// Creates a new valid [`OpaqueId`] from an index.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if the index does not fit into the handle type (or collides with the invalid value).
    #[must_use]
    pub fn new(index: usize) -> Self {
        debug_assert!(index < Self::INVALID as usize, "index {index} out of id range");
        #[allow(clippy::cast_possible_truncation)]
        Self::from_raw(index as u32)
    }
    /// Creates an [`OpaqueId`] from its raw integer representation.
    #[must_use]
    pub const fn from_raw(value: u32) -> Self {
        Self {
            value,
            marker: PhantomData,
        }
    }
    /// Returns the invalid (null) handle.
    #[must_use]
    pub const fn invalid() -> Self {
        Self::from_raw(Self::INVALID)
    }
    /// Returns true if this handle refers to an element.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.value != Self::INVALID
    }
    /// Returns the index of this handle.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if the handle is invalid.
    #[must_use]
    pub fn get(&self) -> usize {
        debug_assert!(self.is_valid(), "access of an invalid id");
        self.value as usize
    }
    /// Returns the raw integer value without checking validity.
    #[must_use]
    pub const fn unchecked_get(&self) -> u32 {
        self.value
    }
    /// Returns the index as an `Option`, `None` if the handle is invalid.
    #[must_use]
    pub const fn to_index(&self) -> Option<usize> {
        if self.is_valid() {
            Some(self.value as usize)
        } else {
            None
        }
    }
}

impl<T> Default for OpaqueId<T> {
    fn default() -> Self {
        Self::invalid()
    }
}
impl<T> Clone for OpaqueId<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T> Copy for OpaqueId<T> {}
impl<T> PartialEq for OpaqueId<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}
impl<T> Eq for OpaqueId<T> {}
impl<T> PartialOrd for OpaqueId<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl<T> Ord for OpaqueId<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}
impl<T> Hash for OpaqueId<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}
impl<T> Debug for OpaqueId<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_valid() {
            write!(f, "OpaqueId({})", self.value)
        } else {
            write!(f, "OpaqueId(invalid)")
        }
    }
}
impl<T> Display for OpaqueId<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_valid() {
            write!(f, "{}", self.value)
        } else {
            write!(f, "<invalid>")
        }
    }
}
impl<T> Serialize for OpaqueId<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}
impl<'de, T> Deserialize<'de> for OpaqueId<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u32::deserialize(deserializer).map(Self::from_raw)
    }
}

/// A contiguous half-open range of [`OpaqueId`]s.
pub struct ItemRange<T> {
    begin: OpaqueId<T>,
    end: OpaqueId<T>,
}
impl<T> ItemRange<T> {
    /// Creates a new range `[begin, end)`.
    #[must_use]
    pub fn new(begin: usize, end: usize) -> Self {
        debug_assert!(begin <= end);
        Self {
            begin: OpaqueId::new(begin),
            end: OpaqueId::new(end),
        }
    }
    /// First element of the range.
    #[must_use]
    pub const fn begin(&self) -> OpaqueId<T> {
        self.begin
    }
    /// One past the last element.
    #[must_use]
    pub const fn end(&self) -> OpaqueId<T> {
        self.end
    }
    /// Number of elements in the range.
    #[must_use]
    pub const fn len(&self) -> usize {
        (self.end.value - self.begin.value) as usize
    }
    /// Returns true if the range is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.end.value == self.begin.value
    }
    /// Returns the range as plain `usize` indices.
    #[must_use]
    pub const fn as_range(&self) -> Range<usize> {
        self.begin.value as usize..self.end.value as usize
    }
    /// Iterate over all ids in this range.
    pub fn iter(&self) -> impl Iterator<Item = OpaqueId<T>> {
        (self.begin.value..self.end.value).map(OpaqueId::from_raw)
    }
}
impl<T> Default for ItemRange<T> {
    fn default() -> Self {
        Self::new(0, 0)
    }
}
impl<T> Clone for ItemRange<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T> Copy for ItemRange<T> {}
impl<T> PartialEq for ItemRange<T> {
    fn eq(&self, other: &Self) -> bool {
        self.begin == other.begin && self.end == other.end
    }
}
impl<T> Eq for ItemRange<T> {}
impl<T> Debug for ItemRange<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ItemRange({}..{})", self.begin.value, self.end.value)
    }
}
