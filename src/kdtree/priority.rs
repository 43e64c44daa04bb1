use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use tinyvec::TinyVec;

use crate::accessor::PointAccessor;
use crate::distance::PartialDistance;
use crate::kdtree::Bounds;
use crate::kdtree::{KDTree, Node};
use crate::r#type::Coordinate;

/// A pending subtree of a priority search, with the raw distance from the query to its cell.
#[derive(Debug, Clone)]
struct Branch {
    rawdist: f64,
    node: usize,
    bounds: Bounds,
}

impl PartialEq for Branch {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Branch {}

impl Ord for Branch {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rawdist
            .total_cmp(&other.rawdist)
            .then_with(|| self.node.cmp(&other.node))
    }
}

impl PartialOrd for Branch {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SearchState {
    /// A query was set and the first candidate is being looked up.
    Seeded,
    /// Positioned on a point of a leaf.
    AtCandidate,
    /// No candidates remain within the cutoff.
    Exhausted,
}

/// Resumable best-first search on a [`KDTree`].
///
/// The searcher enumerates candidate points leaf by leaf, in order of the distance from the query
/// to each leaf's cell. Callers drive it explicitly and may lower the cutoff at any point to stop
/// the enumeration early:
///
/// ```
/// use kd_index::kdtree::split::BoundedMidpointSplit;
/// use kd_index::kdtree::KDTreeBuilder;
/// use kd_index::Metric;
///
/// let points = vec![[0., 0.], [1., 0.], [0., 1.], [5., 5.]];
/// let tree = KDTreeBuilder::new_with_leaf_size(&points, 1)
///     .finish::<BoundedMidpointSplit>()
///     .unwrap();
/// let mut searcher = tree.priority_searcher(Metric::Euclidean).unwrap();
/// let mut found = vec![];
/// searcher.search(&[0., 0.]);
/// while searcher.valid() {
///     if searcher.exact_distance() <= 1.5 {
///         found.push(searcher.id().unwrap());
///     }
///     searcher.decrease_cutoff(1.5).advance();
/// }
/// found.sort();
/// assert_eq!(found, vec![0, 1, 2]);
/// ```
#[derive(Debug)]
pub struct PrioritySearcher<'t, N: Coordinate, P: PointAccessor<N> + ?Sized, D: PartialDistance> {
    tree: &'t KDTree<'t, N, P>,
    distance: D,
    heap: BinaryHeap<Reverse<Branch>>,
    query: Vec<N>,
    cutoff: f64,
    current: Option<Branch>,
    pos: usize,
    state: SearchState,
}

impl<'t, N: Coordinate, P: PointAccessor<N> + ?Sized, D: PartialDistance>
    PrioritySearcher<'t, N, P, D>
{
    pub(crate) fn new(tree: &'t KDTree<'t, N, P>, distance: D) -> Self {
        Self {
            tree,
            distance,
            heap: BinaryHeap::new(),
            query: vec![],
            cutoff: f64::INFINITY,
            current: None,
            pos: 0,
            state: SearchState::Exhausted,
        }
    }

    /// Start a new search for `query`, positioning on the first candidate.
    ///
    /// This resets the cutoff to infinity and discards any state of a previous search.
    pub fn search(&mut self, query: &[N]) -> &mut Self {
        debug_assert_eq!(query.len(), self.tree.dims, "query has wrong dimensionality");
        self.query.clear();
        self.query.extend_from_slice(query);
        self.cutoff = f64::INFINITY;
        self.heap.clear();
        self.current = None;
        self.pos = 0;
        self.state = SearchState::Seeded;

        let mut bounds: Bounds = TinyVec::new();
        bounds.resize(self.tree.dims, 0.0);
        self.heap.push(Reverse(Branch {
            rawdist: 0.0,
            node: 0,
            bounds,
        }));
        self.advance()
    }

    /// Move to the next candidate, or become exhausted.
    pub fn advance(&mut self) -> &mut Self {
        debug_assert!(
            self.state != SearchState::Exhausted,
            "advance() called on an exhausted searcher"
        );
        if self.state == SearchState::Exhausted {
            return self;
        }

        loop {
            // Iteration within the current leaf
            if let Some(cur) = &self.current {
                if let Node::Leaf { end, .. } = self.tree.nodes[cur.node] {
                    if self.pos + 1 < end
                        && self.distance.compare_raw_regular(cur.rawdist, self.cutoff)
                    {
                        self.pos += 1;
                        self.state = SearchState::AtCandidate;
                        return self;
                    }
                }
            }
            self.current = None;

            let Some(Reverse(branch)) = self.heap.pop() else {
                return self.exhaust();
            };
            if !self.distance.compare_raw_regular(branch.rawdist, self.cutoff) {
                return self.exhaust();
            }

            match self.tree.nodes[branch.node] {
                Node::Leaf { start, end } => {
                    if start == end {
                        continue;
                    }
                    self.pos = start;
                    self.current = Some(branch);
                    self.state = SearchState::AtCandidate;
                    return self;
                }
                Node::Split {
                    dim,
                    threshold,
                    left,
                    right,
                } => self.expand(branch, dim, threshold, left, right),
            }
        }
    }

    /// Push the children of a split node, with their cell distances.
    fn expand(&mut self, branch: Branch, dim: usize, threshold: f64, left: usize, right: usize) {
        let Branch {
            rawdist, bounds, ..
        } = branch;
        let delta = threshold - self.query[dim].as_f64();
        if delta == 0.0 {
            self.heap.push(Reverse(Branch {
                rawdist,
                node: left,
                bounds: bounds.clone(),
            }));
            self.heap.push(Reverse(Branch {
                rawdist,
                node: right,
                bounds,
            }));
            return;
        }

        let (near, far) = if delta > 0.0 {
            (left, right)
        } else {
            (right, left)
        };
        let mindist = self.distance.combine_raw(rawdist, delta, bounds[dim]);
        if self.distance.compare_raw_regular(mindist, self.cutoff) {
            let mut far_bounds = bounds.clone();
            far_bounds[dim] = delta;
            self.heap.push(Reverse(Branch {
                rawdist: mindist,
                node: far,
                bounds: far_bounds,
            }));
        }
        self.heap.push(Reverse(Branch {
            rawdist,
            node: near,
            bounds,
        }));
    }

    fn exhaust(&mut self) -> &mut Self {
        self.heap.clear();
        self.current = None;
        self.pos = 0;
        self.state = SearchState::Exhausted;
        self
    }

    /// Returns `true` if the searcher is positioned on a candidate.
    pub fn valid(&self) -> bool {
        self.state == SearchState::AtCandidate
    }

    /// The id of the current candidate, or `None` if the searcher is exhausted.
    pub fn id(&self) -> Option<u32> {
        if !self.valid() {
            return None;
        }
        Some(self.tree.ids[self.pos])
    }

    /// A lower bound on the distance of the current candidate and of all candidates not yet
    /// visited.
    ///
    /// Successive values never decrease. Returns infinity if the searcher is exhausted.
    pub fn lower_bound(&self) -> f64 {
        match &self.current {
            Some(cur) if self.valid() => self.distance.transform_out(cur.rawdist),
            _ => f64::INFINITY,
        }
    }

    /// A lower bound on the distance of all candidates not yet visited, including the current
    /// one. For a k-d tree this is the same as [`PrioritySearcher::lower_bound`].
    pub fn all_lower_bound(&self) -> f64 {
        self.lower_bound()
    }

    /// Compute the exact distance of the current candidate to the query.
    ///
    /// Returns infinity if the searcher is exhausted.
    pub fn exact_distance(&self) -> f64 {
        debug_assert!(self.valid(), "exact_distance() called on an exhausted searcher");
        if !self.valid() {
            return f64::INFINITY;
        }
        self.tree
            .distance_to(&self.distance, &self.query, self.tree.ids[self.pos])
    }

    /// The current stopping threshold.
    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    /// Lower the stopping threshold. Candidates whose lower bound exceeds it are not returned.
    ///
    /// The cutoff may only decrease. Raising it is a programming error; release builds ignore it.
    pub fn decrease_cutoff(&mut self, cutoff: f64) -> &mut Self {
        debug_assert!(
            cutoff <= self.cutoff,
            "cutoff must only decrease: {} > {}",
            cutoff,
            self.cutoff
        );
        if cutoff <= self.cutoff {
            self.cutoff = cutoff;
        }
        self
    }
}
