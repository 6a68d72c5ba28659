//! Stack-free destructive in-order traversal.
//!
//! The same primitive drains the term index tree during serialization and
//! both ranking trees during a query. No recursion and no auxiliary stack are
//! used: whenever the current node has a left child, the node is rotated
//! under that child (the child's right subtree becomes the node's new left
//! subtree) and the walk continues at the child. A node without a left child
//! is the next one in order; it is handed to the visitor and the walk moves
//! on to its right subtree.
//!
//! The rotations rewrite the topology as the walk goes, so the traversal
//! takes the tree by value. There is nothing left to traverse a second time.

/// A binary tree node whose children are exclusively owned boxes
pub trait Threaded: Sized {
    fn left_mut(&mut self) -> &mut Option<Box<Self>>;
    fn right_mut(&mut self) -> &mut Option<Box<Self>>;
}

/// Consume `root` in order, handing every node to `visit`
pub fn drain_inorder<N, F>(root: Option<Box<N>>, mut visit: F)
where
    N: Threaded,
    F: FnMut(Box<N>),
{
    let _ = try_drain_inorder::<N, std::convert::Infallible, _>(root, |node| {
        visit(node);
        Ok(())
    });
}

/// Fallible variant of [`drain_inorder`].
///
/// Stops at the first error. Nodes not yet visited are dropped through the
/// same stack-free walk before the error is returned.
pub fn try_drain_inorder<N, E, F>(root: Option<Box<N>>, mut visit: F) -> Result<(), E>
where
    N: Threaded,
    F: FnMut(Box<N>) -> Result<(), E>,
{
    let mut current = root;

    while let Some(mut node) = current {
        match node.left_mut().take() {
            Some(mut left) => {
                *node.left_mut() = left.right_mut().take();
                *left.right_mut() = Some(node);
                current = Some(left);
            }
            None => {
                current = node.right_mut().take();
                if let Err(err) = visit(node) {
                    drain_inorder(current, drop);
                    return Err(err);
                }
            }
        }
    }

    Ok(())
}
