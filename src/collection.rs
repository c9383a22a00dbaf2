//! Typed storage for the frozen geometry tables.
//!
//! A [`Collection`] owns its elements, a [`CollectionRef`] borrows them. Both are indexed by an
//! [`OpaqueId`] of the collection's tag type, so an index into one table cannot be used for another.
//! Conversions between the two are always explicit ([`Collection::as_ref`], [`CollectionRef::to_collection`]).
use crate::opaque_id::{ItemRange, OpaqueId};
use std::{fmt::Debug, marker::PhantomData, ops::Index};

/// Owning, append-only storage of `T` indexed by `OpaqueId<I>`.
pub struct Collection<T, I> {
    data: Vec<T>,
    marker: PhantomData<fn() -> I>,
}
impl<T, I> Default for Collection<T, I> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            marker: PhantomData,
        }
    }
}
impl<T: Clone, I> Clone for Collection<T, I> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            marker: PhantomData,
        }
    }
}
impl<T: Debug, I> Debug for Collection<T, I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.data.iter()).finish()
    }
}
impl<T, I> Collection<T, I> {
    /// Number of stored elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }
    /// Returns true if nothing has been stored yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
    /// Append an element and return its id.
    pub fn push(&mut self, value: T) -> OpaqueId<I> {
        self.data.push(value);
        OpaqueId::new(self.data.len() - 1)
    }
    /// Append several elements and return the range of their ids.
    pub fn extend<It: IntoIterator<Item = T>>(&mut self, values: It) -> ItemRange<I> {
        let begin = self.data.len();
        self.data.extend(values);
        ItemRange::new(begin, self.data.len())
    }
    /// Get an element, `None` if the id is invalid or out of range.
    #[must_use]
    pub fn get(&self, id: OpaqueId<I>) -> Option<&T> {
        id.to_index().and_then(|i| self.data.get(i))
    }
    /// Borrow the elements of an id range.
    #[must_use]
    pub fn slice(&self, range: ItemRange<I>) -> &[T] {
        &self.data[range.as_range()]
    }
    /// Borrow all elements as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }
    /// Create a non-owning view of this collection.
    #[must_use]
    pub fn as_ref(&self) -> CollectionRef<'_, T, I> {
        CollectionRef {
            data: &self.data,
            marker: PhantomData,
        }
    }
}
impl<T, I> Index<OpaqueId<I>> for Collection<T, I> {
    type Output = T;
    fn index(&self, id: OpaqueId<I>) -> &Self::Output {
        &self.data[id.get()]
    }
}

/// Borrowed view of a [`Collection`].
pub struct CollectionRef<'a, T, I> {
    data: &'a [T],
    marker: PhantomData<fn() -> I>,
}
impl<T, I> Clone for CollectionRef<'_, T, I> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T, I> Copy for CollectionRef<'_, T, I> {}
impl<'a, T, I> CollectionRef<'a, T, I> {
    /// Number of elements in the view.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.data.len()
    }
    /// Returns true if the view is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
    /// Get an element, `None` if the id is invalid or out of range.
    #[must_use]
    pub fn get(&self, id: OpaqueId<I>) -> Option<&'a T> {
        id.to_index().and_then(|i| self.data.get(i))
    }
    /// Borrow the elements of an id range.
    #[must_use]
    pub fn slice(&self, range: ItemRange<I>) -> &'a [T] {
        &self.data[range.as_range()]
    }
    /// Borrow all elements as a slice.
    #[must_use]
    pub const fn as_slice(&self) -> &'a [T] {
        self.data
    }
}
impl<T: Clone, I> CollectionRef<'_, T, I> {
    /// Copy the viewed data into a new owning [`Collection`].
    #[must_use]
    pub fn to_collection(&self) -> Collection<T, I> {
        Collection {
            data: self.data.to_vec(),
            marker: PhantomData,
        }
    }
}
impl<T, I> Index<OpaqueId<I>> for CollectionRef<'_, T, I> {
    type Output = T;
    fn index(&self, id: OpaqueId<I>) -> &Self::Output {
        &self.data[id.get()]
    }
}
