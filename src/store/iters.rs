use std::vec::IntoIter;

/// Iterator over the values of a store.
///
/// Backends produce this from a snapshot of the backing map taken at call
/// time: iteration is finite, restartable by calling `values()` again, and
/// unaffected by mutations made after the snapshot. Concurrent external
/// mutation during iteration is undefined behavior by contract, not
/// guaranteed-safe; the snapshot merely makes the common case deterministic.
pub struct ValueIter<T> {
    values: IntoIter<T>,
}

impl<T> ValueIter<T> {
    pub(crate) fn new(values: Vec<T>) -> Self {
        ValueIter {
            values: values.into_iter(),
        }
    }
}

impl<T> Iterator for ValueIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.values.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.values.size_hint()
    }
}

/// Iterator over the (key, value) entries of a store.
///
/// Same snapshot-at-call semantics as [`ValueIter`]. Entries come out in the
/// backing map's insertion order, which is the deterministic order callers
/// doing linear scans rely on.
pub struct EntryIter<T> {
    entries: IntoIter<(String, T)>,
}

impl<T> EntryIter<T> {
    pub(crate) fn new(entries: Vec<(String, T)>) -> Self {
        EntryIter {
            entries: entries.into_iter(),
        }
    }
}

impl<T> Iterator for EntryIter<T> {
    type Item = (String, T);

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_iter_yields_all_values() {
        let iter = ValueIter::new(vec![1, 2, 3]);
        assert_eq!(iter.collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_value_iter_size_hint() {
        let iter = ValueIter::new(vec!["a", "b"]);
        assert_eq!(iter.size_hint(), (2, Some(2)));
    }

    #[test]
    fn test_entry_iter_preserves_order() {
        let iter = EntryIter::new(vec![
            ("k1".to_string(), 10),
            ("k2".to_string(), 20),
        ]);
        let entries: Vec<_> = iter.collect();
        assert_eq!(entries[0], ("k1".to_string(), 10));
        assert_eq!(entries[1], ("k2".to_string(), 20));
    }

    #[test]
    fn test_empty_iterators() {
        assert_eq!(ValueIter::<i32>::new(vec![]).count(), 0);
        assert_eq!(EntryIter::<i32>::new(vec![]).count(), 0);
    }
}
