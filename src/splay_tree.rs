//! A splay tree: a binary search tree that rotates every accessed node up to
//! the root, with no balance bookkeeping on the nodes themselves.

mod bst;

use std::{
    fmt::{self, Debug, Display},
    ptr::NonNull,
};

/// Structural view of a subtree, compared key by key and shape by shape.
#[derive(Eq)]
enum Tree<K> {
    Null,
    Root(NonNull<Node<K>>),
}

impl<K: PartialEq> PartialEq for Tree<K> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Tree::Null, Tree::Null) => true,
            (Tree::Root(l), Tree::Root(r)) => unsafe {
                let (l, r) = (l.as_ref(), r.as_ref());
                l.key == r.key
                    && Tree::from(l.left) == Tree::from(r.left)
                    && Tree::from(l.right) == Tree::from(r.right)
            },
            _ => false,
        }
    }
}

struct Node<K> {
    left: Option<NodePtr<K>>,
    right: Option<NodePtr<K>>,
    parent: Option<NodePtr<K>>,
    key: K,
}

#[derive(Eq)]
struct NodePtr<K>(NonNull<Node<K>>);

impl<K> PartialEq for NodePtr<K> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<K> Clone for NodePtr<K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for NodePtr<K> {}

impl<K> Tree<K> {
    fn option(&self) -> Option<NodePtr<K>> {
        match self {
            Self::Null => None,
            Self::Root(n) => Some(NodePtr(*n)),
        }
    }

    fn fmt_rec(&self, f: &mut fmt::Formatter, level: usize) -> fmt::Result
    where
        K: Display,
    {
        if let Some(s) = self.option() {
            Tree::from(s.as_ref().left).fmt_rec(f, level + 1)?;
            writeln!(f, "{}{}", "\t".repeat(level), s.as_ref().key)?;
            Tree::from(s.as_ref().right).fmt_rec(f, level + 1)?;
        }
        Ok(())
    }

    fn fmt_debug_rec(&self, f: &mut fmt::Formatter) -> fmt::Result
    where
        K: Debug,
    {
        if let Some(s) = self.option() {
            write!(f, "{{{:?}, parent: ", s.as_ref().key)?;
            if let Some(p) = s.as_ref().parent {
                write!(f, "{:?}", p.as_ref().key)?;
            } else {
                write!(f, "null")?;
            }
            write!(f, ", left: ")?;
            Tree::from(s.as_ref().left).fmt_debug_rec(f)?;
            write!(f, ", right: ")?;
            Tree::from(s.as_ref().right).fmt_debug_rec(f)?;
            write!(f, "}}")
        } else {
            write!(f, "null")
        }
    }
}

impl<K> Node<K> {
    fn new_ptr(key: K) -> NonNull<Self> {
        Box::leak(Box::new(Self {
            left: None,
            right: None,
            parent: None,
            key,
        }))
        .into()
    }

    /// `self.left != self.right || (self.left == None && self.right == None)`
    fn which(&self, child: NodePtr<K>) -> Option<Direction> {
        if self.left == Some(child) {
            Some(Direction::Left)
        } else if self.right == Some(child) {
            Some(Direction::Right)
        } else {
            None
        }
    }

    fn child(&self, dir: Direction) -> Option<NodePtr<K>> {
        if let Direction::Left = dir {
            self.left
        } else {
            self.right
        }
    }

    fn replace_child(&mut self, dir: Direction, child: Option<NodePtr<K>>) -> Option<NodePtr<K>> {
        match dir {
            Direction::Left => std::mem::replace(&mut self.left, child),
            Direction::Right => std::mem::replace(&mut self.right, child),
        }
    }

    fn child_mut(&mut self, dir: Direction) -> &mut Option<NodePtr<K>> {
        match dir {
            Direction::Left => &mut self.left,
            Direction::Right => &mut self.right,
        }
    }

    /// Links `self` <-> `child`, with `child` in the `dir` slot.
    fn link_child(&mut self, child: &mut Self, dir: Direction) {
        self.replace_child(dir, Some(child.into()));
        child.parent = Some(self.into());
    }

    /// Links `self` <-> `child` for an optional subtree; an absent `child`
    /// leaves the `dir` slot empty.
    /// # Safety
    /// No other reference to the node `child` points at is live.
    fn link_child_tree(&mut self, child: Option<NodePtr<K>>, dir: Direction) {
        self.replace_child(dir, child);
        if let Some(child) = child.map(NodePtr::as_mut) {
            child.parent = Some(self.into());
        }
    }

    /// `self.left != self.right || (self.left == None && self.right == None)`
    fn cas_child(&mut self, old: NodePtr<K>, new: NodePtr<K>) -> bool {
        if let Some(d) = self.which(old) {
            self.replace_child(d, Some(new));
            true
        } else {
            false
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Direction {
    Left,
    Right,
}

impl Direction {
    fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

impl<'a, K> From<&'a mut Node<K>> for NodePtr<K> {
    fn from(value: &'a mut Node<K>) -> Self {
        Self(NonNull::from(value))
    }
}

impl<'a, K> From<&'a Node<K>> for NodePtr<K> {
    fn from(value: &'a Node<K>) -> Self {
        Self(NonNull::from(value))
    }
}

impl<K> From<NodePtr<K>> for Tree<K> {
    fn from(value: NodePtr<K>) -> Self {
        Tree::Root(value.0)
    }
}

impl<K> From<Option<NodePtr<K>>> for Tree<K> {
    fn from(value: Option<NodePtr<K>>) -> Self {
        match value {
            Some(n) => Tree::Root(n.0),
            None => Tree::Null,
        }
    }
}

impl<K> NodePtr<K> {
    fn new(key: K) -> Self {
        Self(Node::new_ptr(key))
    }

    fn is_root(self) -> bool {
        self.as_ref().parent.is_none()
    }

    fn as_mut<'a>(mut self) -> &'a mut Node<K> {
        unsafe { self.0.as_mut() }
    }

    fn as_ref<'a>(self) -> &'a Node<K> {
        unsafe { self.0.as_ref() }
    }

    /// Allocates `key` as a fresh leaf in the `dir` slot of `self`.
    /// The slot must be vacant.
    fn attach(self, key: K, dir: Direction) -> NodePtr<K> {
        debug_assert!(self.as_ref().child(dir).is_none());
        let child = Self::new(key);
        child.as_mut().parent = Some(self);
        *self.as_mut().child_mut(dir) = Some(child);
        child
    }

    /// Single rotation of `self` about its parent, in the direction opposite
    /// its own child side. Covers Zig-Left and Zig-Right; with a grandparent
    /// present its child slot is swung over to `self`, so this is also the
    /// step both double rotations are built from.
    /// # Safety
    /// * a parent node exists
    /// * no other reference into the parent, grandparent, sibling or own
    ///   subtree is live
    fn zig(self) {
        let s = self.as_mut();
        let p_ptr = {
            debug_assert!(s.parent.is_some());
            unsafe { s.parent.unwrap_unchecked() }
        };
        let p = p_ptr.as_mut();
        let gp = p.parent;
        if let Some(gp) = gp {
            gp.as_mut().cas_child(p_ptr, self);
        }
        s.parent = gp;

        if let Some(d) = p.which(self) {
            let child = s.child(d.opposite());
            s.link_child(p, d.opposite());
            p.link_child_tree(child, d);
        }
    }

    /// Double rotation for the collinear case: `self` and its parent are
    /// child of the same side. Covers Zig-Zig-Left and Zig-Zig-Right.
    fn zig_zig(self) {
        let p_ptr = {
            let s = self.as_ref();
            debug_assert!(s.parent.is_some());
            unsafe { s.parent.unwrap_unchecked() }
        };
        debug_assert!(p_ptr.as_ref().parent.is_some_and(|gp| {
            let d1 = p_ptr.as_ref().which(self);
            d1.is_some() && d1 == gp.as_ref().which(p_ptr)
        }));
        // parent about grandparent first, then the node about its parent
        p_ptr.zig();
        self.zig();
    }

    /// Double rotation for the crooked case: `self` and its parent are
    /// opposite-side children. Covers Zig-Left-Zag-Right and
    /// Zig-Right-Zag-Left, the only shapes that lower the local height.
    fn zig_zag(self) {
        debug_assert!(self.as_ref().parent.is_some_and(|p| {
            p.as_ref().parent.is_some_and(|gp| {
                let (d1, d2) = (p.as_ref().which(self), gp.as_ref().which(p));
                d1.is_some() && d2.is_some() && d1 != d2
            })
        }));
        // the node about its parent, then again about its new parent
        self.zig();
        self.zig();
    }

    /// Rotates `self` to the root of whichever tree it lives in. The shape
    /// picked at each step is a pure function of the child sides of `self`
    /// and its parent.
    /// # Safety
    /// No reference into the tree is live, except below `self`'s own subtree.
    fn splay(self) {
        loop {
            let Some(p_ptr) = self.as_ref().parent else {
                break;
            };
            let p = p_ptr.as_ref();
            let Some(gp_ptr) = p.parent else {
                self.zig();
                break;
            };
            match (p.which(self), gp_ptr.as_ref().which(p_ptr)) {
                (Some(d1), Some(d2)) if d1 == d2 => self.zig_zig(),
                (Some(_), Some(_)) => self.zig_zag(),
                _ => break,
            }
        }
    }

    fn drop_node(self) {
        unsafe { drop(Box::from_raw(self.0.as_ptr())) }
    }
}

/// Self-adjusting binary search tree over a set of unique keys.
///
/// Every access, hit or miss, splays the last node it touched to the root.
/// Frequently used keys stay near the top, and any long operation sequence
/// costs amortized O(log n) per call without any balance metadata.
pub struct SplayTree<K> {
    root: Option<NodePtr<K>>,
    len: usize,
}

impl<K> SplayTree<K> {
    pub const fn new() -> Self {
        Self { root: None, len: 0 }
    }

    pub const fn len(&self) -> usize {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Key held by the current root, the most recently accessed one.
    pub fn root_key(&self) -> Option<&K> {
        self.root.map(|n| &n.as_ref().key)
    }

    /// Drops every node and resets the tree to empty.
    pub fn clear(&mut self) {
        let mut stack: Vec<NodePtr<K>> = self.root.take().into_iter().collect();
        while let Some(n) = stack.pop() {
            let node = n.as_ref();
            stack.extend(node.left);
            stack.extend(node.right);
            n.drop_node();
        }
        self.len = 0;
    }
}

impl<K: Ord> SplayTree<K> {
    /// Looks `key` up and splays the matching node, or the last node on the
    /// search path when the key is absent. Splaying on a miss is what keeps
    /// the amortized bound for miss-heavy workloads.
    pub fn find(&mut self, key: &K) -> bool {
        let Some(root) = self.root else {
            return false;
        };
        let (last, found) = bst::search(root, key);
        self.splay_up(Some(last));
        found
    }

    /// Inserts `key` if absent and splays the new node. A key already present
    /// is splayed and otherwise left alone.
    pub fn insert(&mut self, key: K) {
        let target = match self.root {
            None => {
                self.len += 1;
                NodePtr::new(key)
            }
            Some(root) => {
                let (last, found) = bst::search(root, &key);
                if found {
                    last
                } else {
                    self.len += 1;
                    bst::insert_child(last, key)
                }
            }
        };
        self.splay_up(Some(target));

        #[cfg(debug_assertions)]
        debug_assert!(
            self.verify_invariants(),
            "splay tree invariants violated after insert"
        );
    }

    /// Removes `key` if present. A missing key leaves the contents untouched,
    /// though the failed lookup still splays the last node it probed.
    pub fn remove(&mut self, key: &K) {
        let Some(root) = self.root else {
            return;
        };
        let (last, found) = bst::search(root, key);
        self.splay_up(Some(last));
        if !found {
            return;
        }

        let n = last.as_mut();
        let (tl, tr) = (n.left.take(), n.right.take());
        if let Some(tl) = tl {
            tl.as_mut().parent = None;
        }
        if let Some(tr) = tr {
            tr.as_mut().parent = None;
        }
        self.root = match tl {
            None => tr,
            Some(tl) => {
                // Join: the maximum of the detached left subtree is splayed to
                // its local root. Nothing in that subtree exceeds it, so its
                // right slot is vacant for the right subtree. No re-splay
                // afterwards.
                let max = bst::rightmost(tl);
                max.splay();
                debug_assert!(max.as_ref().right.is_none());
                max.as_mut().link_child_tree(tr, Direction::Right);
                Some(max)
            }
        };
        self.len -= 1;
        last.drop_node();

        #[cfg(debug_assertions)]
        debug_assert!(
            self.verify_invariants(),
            "splay tree invariants violated after remove"
        );
    }

    /// Splays the minimum key to the root. `false` only on an empty tree.
    pub fn find_min(&mut self) -> bool {
        self.splay_up(self.root.map(bst::leftmost))
    }

    /// Splays the maximum key to the root. `false` only on an empty tree.
    pub fn find_max(&mut self) -> bool {
        self.splay_up(self.root.map(bst::rightmost))
    }

    /// Splays `node` and re-roots the tree at it. `false` when there was
    /// nothing to splay, so callers can pass a failed locate straight through.
    fn splay_up(&mut self, node: Option<NodePtr<K>>) -> bool {
        let Some(node) = node else {
            return false;
        };
        node.splay();
        self.root = Some(node);
        true
    }

    /// Full walk checking BST order, parent consistency and the node count.
    #[cfg(debug_assertions)]
    fn verify_invariants(&self) -> bool {
        fn check<K: Ord>(
            n: NodePtr<K>,
            lo: Option<&K>,
            hi: Option<&K>,
            parent: Option<NodePtr<K>>,
        ) -> Option<usize> {
            let node = n.as_ref();
            if node.parent != parent {
                return None;
            }
            if lo.is_some_and(|lo| node.key <= *lo) || hi.is_some_and(|hi| node.key >= *hi) {
                return None;
            }
            let left = node
                .left
                .map_or(Some(0), |l| check(l, lo, Some(&node.key), Some(n)))?;
            let right = node
                .right
                .map_or(Some(0), |r| check(r, Some(&node.key), hi, Some(n)))?;
            Some(1 + left + right)
        }
        match self.root {
            None => self.len == 0,
            Some(root) => check(root, None, None, None) == Some(self.len),
        }
    }
}

impl<K> Drop for SplayTree<K> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<K> Default for SplayTree<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone> Clone for SplayTree<K> {
    fn clone(&self) -> Self {
        fn copy_subtree<K: Clone>(n: NodePtr<K>, parent: Option<NodePtr<K>>) -> NodePtr<K> {
            let src = n.as_ref();
            let dst = NodePtr::new(src.key.clone());
            dst.as_mut().parent = parent;
            dst.as_mut().left = src.left.map(|l| copy_subtree(l, Some(dst)));
            dst.as_mut().right = src.right.map(|r| copy_subtree(r, Some(dst)));
            dst
        }
        Self {
            root: self.root.map(|root| copy_subtree(root, None)),
            len: self.len,
        }
    }
}

impl<K: Ord> Extend<K> for SplayTree<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<K: Ord> FromIterator<K> for SplayTree<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<K: Display> Display for SplayTree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&Tree::from(self.root), f)
    }
}

impl<K: Debug> Debug for SplayTree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Debug::fmt(&Tree::from(self.root), f)
    }
}

impl<K: Display> Display for Tree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_rec(f, 0)
    }
}

impl<K: Debug> Debug for Tree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_debug_rec(f)?;
        writeln!(f)
    }
}

pub mod bench {
    use super::*;
    use num_traits::PrimInt;
    use rand::Rng;

    /// Flat handle list over a heap-shaped workload tree; frees its nodes on
    /// drop. The shape exercises rotations, the key order is irrelevant.
    pub struct NodeList<K>(Vec<NodePtr<K>>);

    pub fn gen_tree<K: PrimInt>(n: usize) -> NodeList<K> {
        let mut v = vec![None; n];
        gen_tree_rec(NodePtr::new(K::one()), n, 1, &mut v);
        NodeList(v.iter().filter_map(|x| *x).collect())
    }

    // parent.key == k
    fn gen_tree_rec<K: PrimInt>(
        parent: NodePtr<K>,
        n: usize,
        k: usize,
        v: &mut Vec<Option<NodePtr<K>>>,
    ) {
        v[k - 1] = Some(parent);
        if k * 2 <= n {
            let key = num_traits::cast(k * 2).expect("key type too narrow");
            gen_tree_rec(parent.attach(key, Direction::Left), n, k * 2, v);
            if k * 2 + 1 <= n {
                let key = num_traits::cast(k * 2 + 1).expect("key type too narrow");
                gen_tree_rec(parent.attach(key, Direction::Right), n, k * 2 + 1, v);
            }
        }
    }

    pub fn bm_nop<K>(v: &NodeList<K>) {
        let k = rand::thread_rng().gen_range(0..v.0.len());
        if !v.0[k].is_root() {}
    }

    pub fn bm_zig<K>(v: &NodeList<K>) {
        let k = rand::thread_rng().gen_range(0..v.0.len());
        if !v.0[k].is_root() {
            v.0[k].zig();
        }
    }

    pub fn bm_splay<K>(v: &NodeList<K>) {
        let k = rand::thread_rng().gen_range(0..v.0.len());
        v.0[k].splay();
    }

    impl<K> Drop for NodeList<K> {
        fn drop(&mut self) {
            for n in self.0.iter() {
                n.drop_node();
            }
        }
    }
}
