//! Result trees used while ranking a query.
//!
//! A query goes through two unbalanced binary trees of [`ResultNode`]s:
//!
//! 1. [`AccumulatorTree`], ordered by doc id, where the contributions of every
//!    query term to the same document are summed into one node.
//! 2. [`RankingTree`], ordered by score with `>=` descending left, so the
//!    in-order walk yields scores from highest to lowest. Two equal scores
//!    come out in reverse insertion order.
//!
//! Both trees are consumed by the stack-free traversal, and both are dropped
//! through it too, so a degenerate (sorted) insertion sequence never recurses.

use crate::index::traversal::{self, Threaded};
use crate::index::types::DocId;

type Link = Option<Box<ResultNode>>;

/// A document and its relevance score
#[derive(Debug)]
pub struct ResultNode {
    doc_id: DocId,
    score: f32,
    left: Link,
    right: Link,
}

impl ResultNode {
    fn new(doc_id: DocId, score: f32) -> Box<Self> {
        Box::new(Self {
            doc_id,
            score,
            left: None,
            right: None,
        })
    }
}

impl Threaded for ResultNode {
    fn left_mut(&mut self) -> &mut Option<Box<Self>> {
        &mut self.left
    }

    fn right_mut(&mut self) -> &mut Option<Box<Self>> {
        &mut self.right
    }
}

/// Per-document score accumulator keyed by doc id
#[derive(Debug, Default)]
pub struct AccumulatorTree {
    root: Link,
    len: usize,
}

impl AccumulatorTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct documents
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Add `score` to `doc_id`, inserting the document if it is new
    pub fn add(&mut self, doc_id: DocId, score: f32) {
        let mut slot = &mut self.root;
        while let Some(node) = slot {
            if doc_id == node.doc_id {
                node.score += score;
                return;
            }
            slot = if doc_id < node.doc_id {
                &mut node.left
            } else {
                &mut node.right
            };
        }
        *slot = Some(ResultNode::new(doc_id, score));
        self.len += 1;
    }

    /// Accumulated score of `doc_id`
    pub fn score(&self, doc_id: DocId) -> Option<f32> {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            if doc_id == node.doc_id {
                return Some(node.score);
            }
            current = if doc_id < node.doc_id {
                node.left.as_deref()
            } else {
                node.right.as_deref()
            };
        }
        None
    }

    /// Consume the tree in ascending doc id order
    pub fn drain<F: FnMut(DocId, f32)>(mut self, mut visit: F) {
        traversal::drain_inorder(self.root.take(), |node| visit(node.doc_id, node.score));
    }

    /// Re-insert every document into a tree ordered by score
    pub fn into_ranking(self) -> RankingTree {
        let mut ranking = RankingTree::new();
        self.drain(|doc_id, score| ranking.insert(doc_id, score));
        ranking
    }
}

impl Drop for AccumulatorTree {
    fn drop(&mut self) {
        traversal::drain_inorder(self.root.take(), drop);
    }
}

/// Documents ordered by descending score
#[derive(Debug, Default)]
pub struct RankingTree {
    root: Link,
    len: usize,
}

impl RankingTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Insert a scored document; `score >= node.score` descends left
    pub fn insert(&mut self, doc_id: DocId, score: f32) {
        let mut slot = &mut self.root;
        while let Some(node) = slot {
            slot = if score >= node.score {
                &mut node.left
            } else {
                &mut node.right
            };
        }
        *slot = Some(ResultNode::new(doc_id, score));
        self.len += 1;
    }

    /// Consume the tree from highest to lowest score
    pub fn drain<F: FnMut(DocId, f32)>(mut self, mut visit: F) {
        traversal::drain_inorder(self.root.take(), |node| visit(node.doc_id, node.score));
    }
}

impl Drop for RankingTree {
    fn drop(&mut self) {
        traversal::drain_inorder(self.root.take(), drop);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranked(tree: RankingTree) -> Vec<(DocId, f32)> {
        let mut out = Vec::new();
        tree.drain(|doc, score| out.push((doc, score)));
        out
    }

    #[test]
    fn test_accumulator_merges_by_doc() {
        let mut acc = AccumulatorTree::new();
        acc.add(5, 0.5);
        acc.add(2, 1.0);
        acc.add(5, 0.25);
        acc.add(9, 0.1);

        assert_eq!(acc.len(), 3);
        assert_eq!(acc.score(5), Some(0.75));
        assert_eq!(acc.score(7), None);

        let mut docs = Vec::new();
        acc.drain(|doc, _| docs.push(doc));
        assert_eq!(docs, vec![2, 5, 9]);
    }

    #[test]
    fn test_ranking_is_descending() {
        let mut ranking = RankingTree::new();
        for (doc, score) in [(1, 0.2), (2, 0.9), (3, 0.5), (4, 0.7), (5, 0.1)] {
            ranking.insert(doc, score);
        }
        let docs: Vec<_> = ranked(ranking).into_iter().map(|(d, _)| d).collect();
        assert_eq!(docs, vec![2, 4, 3, 1, 5]);
    }

    #[test]
    fn test_equal_scores_put_later_insert_first() {
        let mut ranking = RankingTree::new();
        ranking.insert(1, 0.5);
        ranking.insert(2, 0.8);
        ranking.insert(3, 0.5);
        ranking.insert(4, 0.5);

        let docs: Vec<_> = ranked(ranking).into_iter().map(|(d, _)| d).collect();
        assert_eq!(docs, vec![2, 4, 3, 1]);
    }

    #[test]
    fn test_into_ranking_breaks_ties_by_higher_doc() {
        let mut acc = AccumulatorTree::new();
        for doc in [30, 10, 20] {
            acc.add(doc, 1.0);
        }
        acc.add(40, 2.0);

        let docs: Vec<_> = ranked(acc.into_ranking()).into_iter().map(|(d, _)| d).collect();
        assert_eq!(docs, vec![40, 30, 20, 10]);
    }

    #[test]
    fn test_sorted_input_does_not_overflow() {
        let mut acc = AccumulatorTree::new();
        for doc in 0..10_000 {
            acc.add(doc, 1.0);
        }
        let ranking = acc.into_ranking();
        assert_eq!(ranking.len(), 10_000);
        // dropped without draining
    }
}
