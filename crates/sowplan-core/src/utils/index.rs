// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! # Strongly Typed Indices
//!
//! `TypedIndex<T>` is a `#[repr(transparent)]` wrapper around `usize` that carries
//! a phantom tag `T: TypedIndexTag`. Two index spaces that share the same
//! numeric representation (a crop slot and a calendar month, for example) become
//! distinct types, so passing one where the other is expected is a compile
//! error rather than a silent off-by-domain bug.
//!
//! ## Usage
//!
//! ```rust
//! use sowplan_core::utils::index::{TypedIndex, TypedIndexTag};
//!
//! #[derive(Clone, Copy)]
//! struct FieldTag;
//! impl TypedIndexTag for FieldTag { const NAME: &'static str = "FieldIndex"; }
//!
//! type FieldIndex = TypedIndex<FieldTag>;
//! let f = FieldIndex::new(3);
//! assert_eq!(f.get(), 3);
//! assert_eq!(format!("{}", f), "FieldIndex(3)");
//! ```

/// Names an index space for `Debug` and `Display` output.
pub trait TypedIndexTag: Clone {
    const NAME: &'static str;
}

/// A zero-cost index tagged with the index space `T` it belongs to.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypedIndex<T> {
    index: usize,
    _marker: std::marker::PhantomData<T>,
}

impl<T> TypedIndex<T> {
    /// Creates a new index from its raw `usize` position.
    #[inline(always)]
    pub const fn new(index: usize) -> Self {
        Self {
            index,
            _marker: std::marker::PhantomData,
        }
    }

    /// Returns the raw `usize` position.
    #[inline(always)]
    pub const fn get(&self) -> usize {
        self.index
    }

    /// Checks if the index is the first position of its space.
    #[inline(always)]
    pub const fn is_zero(&self) -> bool {
        self.index == 0
    }

    /// Iterates over every index `0..len` of this space in ascending order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use sowplan_core::utils::index::{TypedIndex, TypedIndexTag};
    /// #[derive(Clone, Copy)]
    /// struct RowTag;
    /// impl TypedIndexTag for RowTag { const NAME: &'static str = "Row"; }
    ///
    /// let rows: Vec<usize> = TypedIndex::<RowTag>::range(3).map(|r| r.get()).collect();
    /// assert_eq!(rows, vec![0, 1, 2]);
    /// ```
    #[inline]
    pub fn range(len: usize) -> impl DoubleEndedIterator<Item = Self> + ExactSizeIterator {
        (0..len).map(Self::new)
    }
}

impl<T> std::fmt::Debug for TypedIndex<T>
where
    T: TypedIndexTag,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", T::NAME, self.index)
    }
}

impl<T> std::fmt::Display for TypedIndex<T>
where
    T: TypedIndexTag,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", T::NAME, self.index)
    }
}

impl<T> From<usize> for TypedIndex<T> {
    fn from(index: usize) -> Self {
        Self::new(index)
    }
}

impl<T> From<TypedIndex<T>> for usize {
    fn from(typed_index: TypedIndex<T>) -> Self {
        typed_index.index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
    struct PlotTag;

    impl TypedIndexTag for PlotTag {
        const NAME: &'static str = "PlotIdx";
    }

    type PlotIndex = TypedIndex<PlotTag>;

    #[test]
    fn test_new_get_and_is_zero() {
        let idx = PlotIndex::new(4);
        assert_eq!(idx.get(), 4);
        assert!(!idx.is_zero());
        assert!(PlotIndex::new(0).is_zero());
    }

    #[test]
    fn test_conversions() {
        let idx: PlotIndex = 9.into();
        assert_eq!(idx.get(), 9);
        let raw: usize = idx.into();
        assert_eq!(raw, 9);
    }

    #[test]
    fn test_debug_and_display_use_tag_name() {
        let idx = PlotIndex::new(2);
        assert_eq!(format!("{}", idx), "PlotIdx(2)");
        assert_eq!(format!("{:?}", idx), "PlotIdx(2)");
    }

    #[test]
    fn test_range_is_ascending_and_exact() {
        let it = PlotIndex::range(4);
        assert_eq!(it.len(), 4);
        let collected: Vec<usize> = it.map(|i| i.get()).collect();
        assert_eq!(collected, vec![0, 1, 2, 3]);

        let reversed: Vec<usize> = PlotIndex::range(3).rev().map(|i| i.get()).collect();
        assert_eq!(reversed, vec![2, 1, 0]);
    }

    #[test]
    fn test_ordering_follows_raw_position() {
        assert!(PlotIndex::new(1) < PlotIndex::new(5));
        assert_eq!(PlotIndex::new(3), PlotIndex::new(3));
    }
}
