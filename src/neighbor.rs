use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// A search result: a point id and its distance to the query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// The distance to the query, in the metric of the searcher that produced it.
    pub distance: f64,
    /// The id of the point in the indexed collection.
    pub id: u32,
}

impl Neighbor {
    pub fn new(distance: f64, id: u32) -> Self {
        Self { distance, id }
    }
}

impl Eq for Neighbor {}

impl Ord for Neighbor {
    fn cmp(&self, other: &Self) -> Ordering {
        // We don't allow NaN distances. Ties are broken by id so that results are deterministic.
        self.distance
            .total_cmp(&other.distance)
            .then_with(|| self.id.cmp(&other.id))
    }
}

impl PartialOrd for Neighbor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A max-heap holding the `k` best neighbors seen so far.
#[derive(Debug, Clone)]
pub(crate) struct KnnHeap {
    k: usize,
    heap: BinaryHeap<Neighbor>,
}

impl KnnHeap {
    pub(crate) fn new(k: usize) -> Self {
        Self {
            k,
            heap: BinaryHeap::with_capacity(k + 1),
        }
    }

    /// The distance a candidate has to beat to enter the heap.
    ///
    /// This is infinite until the heap is full.
    #[inline]
    pub(crate) fn knn_distance(&self) -> f64 {
        if self.heap.len() < self.k {
            return f64::INFINITY;
        }
        self.heap.peek().map_or(f64::NEG_INFINITY, |n| n.distance)
    }

    /// Offer a candidate, keeping it only if it improves the current `k` best.
    #[inline]
    pub(crate) fn insert(&mut self, distance: f64, id: u32) {
        if self.k == 0 {
            return;
        }
        let candidate = Neighbor::new(distance, id);
        if self.heap.len() < self.k {
            self.heap.push(candidate);
        } else if self.heap.peek().is_some_and(|worst| candidate < *worst) {
            self.heap.pop();
            self.heap.push(candidate);
        }
    }

    /// Consume the heap, returning neighbors in ascending order of distance.
    pub(crate) fn into_sorted_vec(self) -> Vec<Neighbor> {
        self.heap.into_sorted_vec()
    }
}
