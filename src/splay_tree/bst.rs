//! Plain binary-search-tree primitives: ordinary descent with no
//! rebalancing. The splay layer locates nodes through these and then
//! restructures on its own.

use std::cmp::Ordering;

use super::{Direction, NodePtr};

/// Descends from `root` comparing keys. Returns the matching node, or the
/// last node on the search path when `key` is absent, plus the hit flag.
pub(super) fn search<K: Ord>(root: NodePtr<K>, key: &K) -> (NodePtr<K>, bool) {
    let mut current = root;
    loop {
        let node = current.as_ref();
        let next = match key.cmp(&node.key) {
            Ordering::Less => node.left,
            Ordering::Greater => node.right,
            Ordering::Equal => return (current, true),
        };
        match next {
            Some(child) => current = child,
            None => return (current, false),
        }
    }
}

/// Attaches `key` as a fresh leaf under `last`, on the side its order
/// dictates. `last` must be where a failed search for `key` bottomed out.
pub(super) fn insert_child<K: Ord>(last: NodePtr<K>, key: K) -> NodePtr<K> {
    let dir = if key < last.as_ref().key {
        Direction::Left
    } else {
        Direction::Right
    };
    last.attach(key, dir)
}

pub(super) fn leftmost<K>(mut node: NodePtr<K>) -> NodePtr<K> {
    while let Some(left) = node.as_ref().left {
        node = left;
    }
    node
}

pub(super) fn rightmost<K>(mut node: NodePtr<K>) -> NodePtr<K> {
    while let Some(right) = node.as_ref().right {
        node = right;
    }
    node
}

#[cfg(test)]
mod test {
    #[allow(unused_imports)]
    use super::*;

    fn fixture() -> NodePtr<i32> {
        let root = NodePtr::new(4);
        let l = root.attach(2, Direction::Left);
        let r = root.attach(6, Direction::Right);
        l.attach(1, Direction::Left);
        l.attach(3, Direction::Right);
        r.attach(5, Direction::Left);
        r.attach(7, Direction::Right);
        root
    }

    #[test]
    fn search_hit() {
        let root = fixture();
        for key in 1..=7 {
            let (node, found) = search(root, &key);
            assert!(found);
            assert_eq!(node.as_ref().key, key);
        }
    }

    #[test]
    fn search_miss_returns_last_on_path() {
        let root = fixture();
        let (node, found) = search(root, &0);
        assert!(!found);
        assert_eq!(node.as_ref().key, 1);
        let (node, found) = search(root, &8);
        assert!(!found);
        assert_eq!(node.as_ref().key, 7);
    }

    #[test]
    fn extremes() {
        let root = fixture();
        assert_eq!(leftmost(root).as_ref().key, 1);
        assert_eq!(rightmost(root).as_ref().key, 7);
        let lone = NodePtr::new(42);
        assert_eq!(leftmost(lone).as_ref().key, 42);
        assert_eq!(rightmost(lone).as_ref().key, 42);
    }

    #[test]
    fn insert_child_sides() {
        let root = NodePtr::new(10);
        let small = insert_child(root, 5);
        assert!(root.as_ref().left == Some(small));
        assert!(small.as_ref().parent == Some(root));
        let big = insert_child(root, 15);
        assert!(root.as_ref().right == Some(big));
        assert!(big.as_ref().parent == Some(root));
    }
}
