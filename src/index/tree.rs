//! Term index tree.
//!
//! A red-black tree keyed by term, built while documents are tokenized. Each
//! node owns the postings list of its term. Rebalancing runs bottom-up as the
//! recursive insert unwinds; the tree root is forced black after every
//! insertion.

use crate::index::postings::PostingList;
use crate::index::traversal::{self, Threaded};
use crate::index::types::{Color, DocId};

type Link = Option<Box<TermNode>>;

/// A term together with its postings
#[derive(Debug)]
pub struct TermNode {
    key: String,
    postings: PostingList,
    color: Color,
    left: Link,
    right: Link,
}

impl TermNode {
    fn new(term: &str, doc_id: DocId) -> Box<Self> {
        Box::new(Self {
            key: term.to_string(),
            postings: PostingList::with_doc(doc_id),
            color: Color::Red,
            left: None,
            right: None,
        })
    }

    pub fn term(&self) -> &str {
        &self.key
    }

    pub fn postings(&self) -> &PostingList {
        &self.postings
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// Split into term and postings, releasing the node
    pub fn into_parts(self) -> (String, PostingList) {
        (self.key, self.postings)
    }
}

impl Threaded for TermNode {
    fn left_mut(&mut self) -> &mut Option<Box<Self>> {
        &mut self.left
    }

    fn right_mut(&mut self) -> &mut Option<Box<Self>> {
        &mut self.right
    }
}

/// Red-black tree of terms
#[derive(Debug, Default)]
pub struct TermTree {
    root: Link,
    len: usize,
}

impl TermTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct terms
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Record an occurrence of `term` in `doc_id`.
    ///
    /// Empty terms are ignored.
    pub fn insert(&mut self, term: &str, doc_id: DocId) {
        if term.is_empty() {
            return;
        }

        let mut created = false;
        let mut root = insert_node(self.root.take(), term, doc_id, &mut created);
        root.color = Color::Black;
        self.root = Some(root);
        if created {
            self.len += 1;
        }
    }

    /// Postings recorded for `term`
    pub fn get(&self, term: &str) -> Option<&PostingList> {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            current = match term.cmp(node.key.as_str()) {
                std::cmp::Ordering::Less => node.left.as_deref(),
                std::cmp::Ordering::Greater => node.right.as_deref(),
                std::cmp::Ordering::Equal => return Some(&node.postings),
            };
        }
        None
    }

    /// Non-destructive in-order iterator.
    ///
    /// Keeps the tree intact at the cost of an explicit stack as deep as the
    /// tree. Prefer [`TermTree::drain`] when the tree is not needed afterwards.
    pub fn iter(&self) -> Iter<'_> {
        let mut iter = Iter { stack: Vec::new() };
        iter.push_left(self.root.as_deref());
        iter
    }

    /// Consume the tree in ascending term order with the stack-free traversal
    pub fn drain<F>(mut self, mut visit: F)
    where
        F: FnMut(String, PostingList),
    {
        traversal::drain_inorder(self.root.take(), |node| {
            let (term, postings) = node.into_parts();
            visit(term, postings);
        });
    }

    /// Fallible variant of [`TermTree::drain`]
    pub fn try_drain<E, F>(mut self, mut visit: F) -> Result<(), E>
    where
        F: FnMut(String, PostingList) -> Result<(), E>,
    {
        traversal::try_drain_inorder(self.root.take(), |node| {
            let (term, postings) = node.into_parts();
            visit(term, postings)
        })
    }

    /// Verify the red-black rules and the key order.
    ///
    /// Returns the black height of the tree (absent leaves count as one).
    pub fn check_invariants(&self) -> Result<usize, String> {
        if let Some(root) = &self.root {
            if root.color != Color::Black {
                return Err(format!("root '{}' is red", root.key));
            }
        }
        check_subtree(self.root.as_deref(), None, None)
    }
}

/// In-order iterator over `(term, postings)`
pub struct Iter<'a> {
    stack: Vec<&'a TermNode>,
}

impl<'a> Iter<'a> {
    fn push_left(&mut self, mut node: Option<&'a TermNode>) {
        while let Some(n) = node {
            self.stack.push(n);
            node = n.left.as_deref();
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a PostingList);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left(node.right.as_deref());
        Some((node.key.as_str(), &node.postings))
    }
}

fn is_red(link: &Link) -> bool {
    matches!(link, Some(node) if node.color == Color::Red)
}

fn has_red_left(link: &Link) -> bool {
    link.as_ref().is_some_and(|node| is_red(&node.left))
}

fn has_red_right(link: &Link) -> bool {
    link.as_ref().is_some_and(|node| is_red(&node.right))
}

fn set_color(link: &mut Link, color: Color) {
    if let Some(node) = link {
        node.color = color;
    }
}

fn insert_node(link: Link, term: &str, doc_id: DocId, created: &mut bool) -> Box<TermNode> {
    let mut node = match link {
        None => {
            *created = true;
            return TermNode::new(term, doc_id);
        }
        Some(node) => node,
    };

    match term.cmp(node.key.as_str()) {
        std::cmp::Ordering::Equal => {
            node.postings.store(doc_id);
            return node;
        }
        std::cmp::Ordering::Less => {
            node.left = Some(insert_node(node.left.take(), term, doc_id, created));
        }
        std::cmp::Ordering::Greater => {
            node.right = Some(insert_node(node.right.take(), term, doc_id, created));
        }
    }

    fix(node)
}

/// Swap `node` with its right child
fn rotate_left(mut node: Box<TermNode>) -> Box<TermNode> {
    match node.right.take() {
        Some(mut pivot) => {
            node.right = pivot.left.take();
            pivot.left = Some(node);
            pivot
        }
        None => node,
    }
}

/// Swap `node` with its left child
fn rotate_right(mut node: Box<TermNode>) -> Box<TermNode> {
    match node.left.take() {
        Some(mut pivot) => {
            node.left = pivot.right.take();
            pivot.right = Some(node);
            pivot
        }
        None => node,
    }
}

fn recolor(node: &mut TermNode) {
    node.color = Color::Red;
    set_color(&mut node.left, Color::Black);
    set_color(&mut node.right, Color::Black);
}

/// Resolve a red node with a red child below `node`
fn fix(mut node: Box<TermNode>) -> Box<TermNode> {
    if is_red(&node.left) {
        if has_red_left(&node.left) {
            if is_red(&node.right) {
                recolor(&mut node);
            } else {
                node = rotate_right(node);
                node.color = Color::Black;
                set_color(&mut node.right, Color::Red);
            }
        }

        if has_red_right(&node.left) {
            if is_red(&node.right) {
                recolor(&mut node);
            } else {
                node.left = node.left.take().map(rotate_left);
                node = rotate_right(node);
                node.color = Color::Black;
                set_color(&mut node.right, Color::Red);
            }
        }
    }

    if is_red(&node.right) {
        if has_red_left(&node.right) {
            if is_red(&node.left) {
                recolor(&mut node);
            } else {
                node.right = node.right.take().map(rotate_right);
                node = rotate_left(node);
                node.color = Color::Black;
                set_color(&mut node.left, Color::Red);
            }
        }

        if has_red_right(&node.right) {
            if is_red(&node.left) {
                recolor(&mut node);
            } else {
                node = rotate_left(node);
                node.color = Color::Black;
                set_color(&mut node.left, Color::Red);
            }
        }
    }

    node
}

fn check_subtree(node: Option<&TermNode>, lower: Option<&str>, upper: Option<&str>) -> Result<usize, String> {
    let Some(node) = node else {
        return Ok(1);
    };

    if lower.is_some_and(|lo| node.key.as_str() <= lo) || upper.is_some_and(|hi| node.key.as_str() >= hi) {
        return Err(format!("key '{}' is out of order", node.key));
    }

    if node.color == Color::Red && (is_red(&node.left) || is_red(&node.right)) {
        return Err(format!("red node '{}' has a red child", node.key));
    }

    let left = check_subtree(node.left.as_deref(), lower, Some(node.key.as_str()))?;
    let right = check_subtree(node.right.as_deref(), Some(node.key.as_str()), upper)?;
    if left != right {
        return Err(format!(
            "black height differs below '{}' ({} left, {} right)",
            node.key, left, right
        ));
    }

    Ok(left + usize::from(node.color == Color::Black))
}
