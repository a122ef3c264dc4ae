//! Append-only log container
//!
//! The diagnostic and finding fields of [`crate::SharedState`] are monotonic:
//! they grow during a run and are never truncated or overwritten. `AppendLog`
//! makes that invariant structural by simply not offering a removal API.

use serde::Serialize;

/// An ordered sequence that only ever grows.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct AppendLog<T> {
    entries: Vec<T>,
}

impl<T> AppendLog<T> {
    /// Create an empty log.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append one entry.
    #[inline]
    pub fn append(&mut self, entry: T) {
        self.entries.push(entry);
    }

    /// Append every entry from an iterator, preserving its order.
    pub fn extend_from<I: IntoIterator<Item = T>>(&mut self, entries: I) {
        self.entries.extend(entries);
    }

    /// Number of entries appended so far.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been appended yet.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in append order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.entries.iter()
    }

    /// Most recently appended entry, if any.
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.entries.last()
    }

    /// Read-only view of the entries.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.entries
    }

    /// Copy the entries out (for result assembly at run end).
    #[must_use]
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.entries.clone()
    }
}

impl<T> Default for AppendLog<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for AppendLog<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a, T> IntoIterator for &'a AppendLog<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
