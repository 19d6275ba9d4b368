//! Intrusive doubly-linked lists over arena handles
//!
//! Link fields live inside the arena entries themselves; a [`List`] only
//! records both ends and its length. Every splice and unlink is O(1) and
//! touches at most the two neighbours of the entry.

use std::ops::{Index, IndexMut};

/// Link fields embedded in a list member
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Links<K> {
    pub prev: Option<K>,
    pub next: Option<K>,
}

impl<K> Default for Links<K> {
    fn default() -> Self {
        Self {
            prev: None,
            next: None,
        }
    }
}

/// An arena entry that can be linked into a [`List`]
pub(crate) trait Node<K> {
    fn links(&self) -> &Links<K>;
    fn links_mut(&mut self) -> &mut Links<K>;
}

/// Head of an intrusive list
#[derive(Debug, Clone, Copy)]
pub(crate) struct List<K> {
    first: Option<K>,
    last: Option<K>,
    len: usize,
}

impl<K> Default for List<K> {
    fn default() -> Self {
        Self {
            first: None,
            last: None,
            len: 0,
        }
    }
}

impl<K: Copy + PartialEq> List<K> {
    pub fn first(&self) -> Option<K> {
        self.first
    }

    pub fn last(&self) -> Option<K> {
        self.last
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Link `key` immediately before `pos`, or at the back when `pos` is `None`.
    ///
    /// `key` must be unlinked and `pos` must be a member of this list.
    pub fn insert_before<A>(&mut self, arena: &mut A, key: K, pos: Option<K>)
    where
        A: IndexMut<K> + ?Sized,
        A::Output: Node<K>,
    {
        let prev = match pos {
            Some(pos) => arena[pos].links().prev,
            None => self.last,
        };
        *arena[key].links_mut() = Links { prev, next: pos };
        match prev {
            Some(prev) => arena[prev].links_mut().next = Some(key),
            None => self.first = Some(key),
        }
        match pos {
            Some(next) => arena[next].links_mut().prev = Some(key),
            None => self.last = Some(key),
        }
        self.len += 1;
    }

    /// Link `key` immediately after `pos`
    pub fn insert_after<A>(&mut self, arena: &mut A, key: K, pos: K)
    where
        A: IndexMut<K> + ?Sized,
        A::Output: Node<K>,
    {
        let next = arena[pos].links().next;
        self.insert_before(arena, key, next);
    }

    pub fn push_back<A>(&mut self, arena: &mut A, key: K)
    where
        A: IndexMut<K> + ?Sized,
        A::Output: Node<K>,
    {
        self.insert_before(arena, key, None);
    }

    /// Unlink `key`, which must be a member of this list
    pub fn remove<A>(&mut self, arena: &mut A, key: K)
    where
        A: IndexMut<K> + ?Sized,
        A::Output: Node<K>,
    {
        let Links { prev, next } = *arena[key].links();
        match prev {
            Some(prev) => arena[prev].links_mut().next = next,
            None => self.first = next,
        }
        match next {
            Some(next) => arena[next].links_mut().prev = prev,
            None => self.last = prev,
        }
        *arena[key].links_mut() = Links::default();
        self.len -= 1;
    }

    /// Walk the list by following the members' own links
    pub fn iter<'a, A>(&self, arena: &'a A) -> Iter<'a, K, A>
    where
        A: Index<K> + ?Sized,
        A::Output: Node<K>,
    {
        Iter {
            arena,
            front: self.first,
            back: self.last,
            remaining: self.len,
        }
    }
}

pub(crate) struct Iter<'a, K, A: ?Sized> {
    arena: &'a A,
    front: Option<K>,
    back: Option<K>,
    remaining: usize,
}

impl<K, A> Iterator for Iter<'_, K, A>
where
    K: Copy,
    A: Index<K> + ?Sized,
    A::Output: Node<K>,
{
    type Item = K;

    fn next(&mut self) -> Option<K> {
        if self.remaining == 0 {
            return None;
        }
        let key = self.front?;
        self.front = self.arena[key].links().next;
        self.remaining -= 1;
        Some(key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, A> DoubleEndedIterator for Iter<'_, K, A>
where
    K: Copy,
    A: Index<K> + ?Sized,
    A::Output: Node<K>,
{
    fn next_back(&mut self) -> Option<K> {
        if self.remaining == 0 {
            return None;
        }
        let key = self.back?;
        self.back = self.arena[key].links().prev;
        self.remaining -= 1;
        Some(key)
    }
}

impl<K, A> ExactSizeIterator for Iter<'_, K, A>
where
    K: Copy,
    A: Index<K> + ?Sized,
    A::Output: Node<K>,
{
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Entry {
        links: Links<usize>,
    }

    impl Node<usize> for Entry {
        fn links(&self) -> &Links<usize> {
            &self.links
        }

        fn links_mut(&mut self) -> &mut Links<usize> {
            &mut self.links
        }
    }

    fn arena(n: usize) -> Vec<Entry> {
        (0..n).map(|_| Entry::default()).collect()
    }

    #[test]
    fn test_push_and_iterate() {
        let mut arena = arena(3);
        let mut list = List::default();
        list.push_back(&mut arena, 0);
        list.push_back(&mut arena, 1);
        list.push_back(&mut arena, 2);

        assert_eq!(list.len(), 3);
        assert_eq!(list.iter(&arena).collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(list.iter(&arena).rev().collect::<Vec<_>>(), vec![2, 1, 0]);
    }

    #[test]
    fn test_insert_positions() {
        let mut arena = arena(4);
        let mut list = List::default();
        list.push_back(&mut arena, 0);
        list.push_back(&mut arena, 1);
        list.insert_before(&mut arena, 2, Some(0));
        list.insert_after(&mut arena, 3, 0);

        assert_eq!(list.iter(&arena).collect::<Vec<_>>(), vec![2, 0, 3, 1]);
        assert_eq!(list.first(), Some(2));
        assert_eq!(list.last(), Some(1));
    }

    #[test]
    fn test_remove_relinks_neighbours() {
        let mut arena = arena(3);
        let mut list = List::default();
        for i in 0..3 {
            list.push_back(&mut arena, i);
        }

        list.remove(&mut arena, 1);
        assert_eq!(list.iter(&arena).collect::<Vec<_>>(), vec![0, 2]);
        assert_eq!(arena[1].links, Links::default());

        list.remove(&mut arena, 0);
        list.remove(&mut arena, 2);
        assert!(list.is_empty());
        assert_eq!(list.first(), None);
        assert_eq!(list.last(), None);

        // An emptied list accepts members again without special casing.
        list.push_back(&mut arena, 1);
        assert_eq!(list.iter(&arena).collect::<Vec<_>>(), vec![1]);
    }
}
