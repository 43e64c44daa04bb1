use std::ops::Range;

/// A node of a [`KDTree`][crate::kdtree::KDTree].
///
/// Nodes live in an arena owned by the tree and refer to their children by position in it. The
/// root is always at position 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Node {
    /// A terminal node covering `ids[start..end]` of the permuted id array.
    Leaf {
        /// First position in the permuted id array.
        start: usize,
        /// One past the last position in the permuted id array.
        end: usize,
    },
    /// An internal node. Every point below `left` has `coord[dim] <= threshold`, every point
    /// below `right` has `coord[dim] >= threshold`.
    Split {
        /// The axis this node splits on.
        dim: usize,
        /// The splitting value on that axis.
        threshold: f64,
        /// Arena position of the lower child.
        left: usize,
        /// Arena position of the upper child.
        right: usize,
    },
}

impl Node {
    /// Returns `true` if this is a leaf node without children.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    /// The range of the permuted id array covered by a leaf.
    #[inline]
    pub fn leaf_range(&self) -> Option<Range<usize>> {
        match *self {
            Node::Leaf { start, end } => Some(start..end),
            Node::Split { .. } => None,
        }
    }
}
