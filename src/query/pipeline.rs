//! In-memory filter, sort and page stages shared by the member and message
//! listings.
//!
//! Candidates are loaded per request, narrowed by conjunctive filters, put in
//! a stable order and sliced into a [`PagedList`].

use std::cmp::Reverse;

use super::page::{PageRequest, PagedList};

/// Filter, sort, then page a request-scoped collection.
///
/// Every filter is conjunctive. Sorting is stable, so items with equal keys
/// keep the order they were loaded in.
#[derive(Debug, Clone)]
pub struct Pipeline<T> {
    items: Vec<T>,
}

impl<T> Pipeline<T> {
    pub fn new<I>(source: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        Self {
            items: source.into_iter().collect(),
        }
    }

    /// Keeps only the items matching `predicate`.
    pub fn filter<P>(mut self, mut predicate: P) -> Self
    where
        P: FnMut(&T) -> bool,
    {
        self.items.retain(|item| predicate(item));
        self
    }

    /// Applies a filter only when its criterion is present.
    pub fn filter_opt<C, P>(self, criterion: Option<C>, predicate: P) -> Self
    where
        P: Fn(&C, &T) -> bool,
    {
        match criterion {
            Some(criterion) => self.filter(|item| predicate(&criterion, item)),
            None => self,
        }
    }

    /// Stable sort, largest key first.
    pub fn sort_by_key_desc<K, F>(mut self, mut key: F) -> Self
    where
        K: Ord,
        F: FnMut(&T) -> K,
    {
        self.items.sort_by_key(|item| Reverse(key(item)));
        self
    }

    /// Stable sort, smallest key first.
    pub fn sort_by_key_asc<K, F>(mut self, key: F) -> Self
    where
        K: Ord,
        F: FnMut(&T) -> K,
    {
        self.items.sort_by_key(key);
        self
    }

    pub fn page(self, request: PageRequest) -> PagedList<T> {
        PagedList::paginate(self.items, request)
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}
