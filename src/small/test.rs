use crate::small::{SmallKDTree, SmallKDTreeBuilder, DEFAULT_SMALL_LEAF_SIZE};
use crate::test::{
    abcd, assert_knn_matches, brute_force_knn, brute_force_range, grid_points, ids,
    random_points, sorted_ids, TestCoord, EXACT_METRICS, SUPPORTED_METRICS,
};
use crate::{FlatPoints, KdIndexError, KnnSearch, Metric, PartialManhattan, PointAccessor, RangeSearch};

/// Check that every range is split around its middle position on the axis of its depth.
fn check_sorted<P: PointAccessor<f64> + ?Sized>(
    tree: &SmallKDTree<'_, f64, P>,
    left: usize,
    right: usize,
    axis: usize,
) {
    if right - left <= tree.leaf_size() {
        return;
    }
    let middle = (left + right) / 2;
    let points = tree.points();
    let split = tree.projections()[middle];
    assert_eq!(points.coord(tree.ids()[middle], axis), split);
    for id in &tree.ids()[left..middle] {
        assert!(points.coord(*id, axis) <= split);
    }
    for id in &tree.ids()[middle + 1..right] {
        assert!(points.coord(*id, axis) >= split);
    }
    let next = (axis + 1) % tree.dimensionality();
    check_sorted(tree, left, middle, next);
    check_sorted(tree, middle + 1, right, next);
}

#[test]
fn knn_and_range_on_four_points() {
    let points = abcd();
    for leaf_size in [1, 100] {
        let tree = SmallKDTreeBuilder::new_with_leaf_size(&points, leaf_size)
            .finish()
            .unwrap();
        let knn = tree.knn_searcher(Metric::Euclidean, 2).unwrap();
        let result = knn.knn(&[0., 0.], 2);
        assert_eq!(result.len(), 2);
        assert_eq!((result[0].id, result[0].distance), (0, 0.));
        assert_eq!((result[1].id, result[1].distance), (1, 1.));

        let range = tree.range_searcher(Metric::Euclidean, 1.5).unwrap();
        assert_eq!(sorted_ids(&range.range(&[0., 0.])), vec![0, 1, 2]);
    }
}

#[test]
fn kd_sorted_order() {
    let points = random_points::<3>(257, 5);
    for leaf_size in [1, 4] {
        let tree = SmallKDTreeBuilder::new_with_leaf_size(&points, leaf_size)
            .finish()
            .unwrap();
        assert_eq!(tree.leaf_size(), leaf_size);
        let mut ids = tree.ids().to_vec();
        ids.sort();
        assert_eq!(ids, (0..257).collect::<Vec<u32>>());
        check_sorted(&tree, 0, 257, 0);
    }
}

#[test]
fn empty_tree() {
    let points: Vec<[f64; 2]> = vec![];
    let tree = SmallKDTreeBuilder::new(&points).finish().unwrap();
    assert_eq!(tree.num_items(), 0);
    assert_eq!(tree.leaf_size(), DEFAULT_SMALL_LEAF_SIZE);
    let knn = tree.knn_searcher(Metric::Euclidean, 3).unwrap();
    assert!(knn.knn(&[1., 1.], 3).is_empty());
    let range = tree.range_searcher(Metric::Manhattan, 10.).unwrap();
    assert!(range.range(&[1., 1.]).is_empty());
}

#[test]
fn brute_force_random_points() {
    let points = random_points::<3>(400, 2);
    let mut queries = random_points::<3>(10, 98);
    queries.extend(points.iter().take(5).copied());

    for leaf_size in [1, 3, 1000] {
        let tree = SmallKDTreeBuilder::new_with_leaf_size(&points, leaf_size)
            .finish()
            .unwrap();
        for metric in SUPPORTED_METRICS {
            let knn = tree.knn_searcher(metric, 10).unwrap();
            let range = tree.range_searcher(metric, 0.0).unwrap();
            for query in queries.iter() {
                for k in [0, 1, 9, 40, 500] {
                    let expected = brute_force_knn(&points, metric, query, k);
                    let actual = knn.knn(query, k);
                    assert_knn_matches(&points, metric, query, &actual, &expected);
                    assert_eq!(ids(&actual), ids(&expected));
                }

                let neighbors = brute_force_knn(&points, metric, query, 11);
                let radius = (neighbors[9].distance + neighbors[10].distance) / 2.0;
                assert_eq!(
                    sorted_ids(&range.range_with_radius(query, radius)),
                    brute_force_range(&points, metric, query, radius)
                );
            }
        }
    }
}

#[test]
fn brute_force_grid_points() {
    let points = grid_points::<2>(200, 8);
    let queries = grid_points::<2>(20, 9);
    let tree = SmallKDTreeBuilder::new(&points).finish().unwrap();
    for metric in SUPPORTED_METRICS {
        let knn = tree.knn_searcher(metric, 8).unwrap();
        let range = tree.range_searcher(metric, 2.5).unwrap();
        for query in queries.iter() {
            let expected = brute_force_knn(&points, metric, query, 8);
            assert_knn_matches(&points, metric, query, &knn.knn(query, 8), &expected);
            assert_eq!(
                sorted_ids(&range.range(query)),
                brute_force_range(&points, metric, query, 2.5)
            );
        }
    }
}

#[test]
fn points_on_the_boundary() {
    let points = grid_points::<3>(400, 21);
    let queries = grid_points::<3>(20, 22);
    for leaf_size in [1, 2, 5] {
        let tree = SmallKDTreeBuilder::new_with_leaf_size(&points, leaf_size)
            .finish()
            .unwrap();

        let range = tree.range_searcher(Metric::Euclidean, 0.0).unwrap();
        for query in queries.iter() {
            for r2 in [1.0f64, 2.0, 3.0, 5.0, 6.0, 7.0] {
                let radius = r2.sqrt();
                assert_eq!(
                    sorted_ids(&range.range_with_radius(query, radius)),
                    brute_force_range(&points, Metric::Euclidean, query, radius),
                    "query {:?}, radius {}",
                    query,
                    radius
                );
            }
        }

        for metric in EXACT_METRICS {
            let knn = tree.knn_searcher(metric, 10).unwrap();
            let range = tree.range_searcher(metric, 0.0).unwrap();
            for query in queries.iter() {
                for k in [1, 5, 12, 40] {
                    let expected = brute_force_knn(&points, metric, query, k);
                    assert_eq!(knn.knn(query, k), expected, "{:?} at {:?}", metric, query);

                    // The k-th neighbor lies exactly on this radius
                    let radius = expected[k - 1].distance;
                    assert_eq!(
                        sorted_ids(&range.range_with_radius(query, radius)),
                        brute_force_range(&points, metric, query, radius)
                    );
                }
            }
        }
    }
}

#[test]
fn queries_by_id() {
    let points = abcd();
    let tree = SmallKDTreeBuilder::new(&points)
        .with_statistics(true)
        .finish()
        .unwrap();
    let knn = tree.knn_searcher(Metric::Euclidean, 2).unwrap();
    let result = knn.knn_by_id(3, 2);
    assert_eq!(ids(&result), vec![3, 1]);
    assert_eq!(result[0].distance, 0.0);

    let range = tree.range_searcher(Metric::Euclidean, 1.5).unwrap();
    tree.reset_statistics();
    assert_eq!(sorted_ids(&range.range_by_id(0)), vec![0, 1, 2]);
    // Looking up the query point is an object access like any other
    assert!(tree.statistics().object_accesses >= 1);
}

#[test]
fn flat_points() {
    let coords = vec![0., 0., 0., 1., 0., 0., 0., 1., 0., 5., 5., 5.];
    let points = FlatPoints::try_new(&coords, 3).unwrap();
    let tree = SmallKDTreeBuilder::new(&points).finish().unwrap();
    assert_eq!(tree.dimensionality(), 3);
    let knn = tree.knn_searcher_with(PartialManhattan, 1);
    assert_eq!(knn.knn(&[4., 4., 4.], 1)[0].id, 3);
    assert_eq!(knn.k(), 1);
}

#[test]
fn unsupported_metrics() {
    let points = abcd();
    let tree = SmallKDTreeBuilder::new(&points).finish().unwrap();
    assert!(tree.knn_searcher(Metric::Maximum, 1).is_none());
    assert!(tree.range_searcher(Metric::Cosine, 1.0).is_none());
}

#[test]
fn build_errors() {
    let points = abcd();
    assert!(matches!(
        SmallKDTreeBuilder::new_with_leaf_size(&points, 0).finish(),
        Err(KdIndexError::InvalidLeafSize(0))
    ));

    let points: Vec<[f64; 0]> = vec![[], []];
    assert!(matches!(
        SmallKDTreeBuilder::new(&points).finish(),
        Err(KdIndexError::General(_))
    ));
}

#[test]
fn statistics() {
    let points = abcd();
    let tree = SmallKDTreeBuilder::new_with_leaf_size(&points, 100)
        .with_statistics(true)
        .finish()
        .unwrap();
    // Building reads every point once to project it
    assert_eq!(tree.statistics().object_accesses, 4);
    assert_eq!(tree.statistics().distance_computations, 0);

    tree.reset_statistics();
    let range = tree.range_searcher(Metric::Euclidean, 1.5).unwrap();
    range.range(&[0., 0.]);
    let stats = tree.statistics();
    assert_eq!(stats.object_accesses, 4);
    assert_eq!(stats.distance_computations, 4);
    tree.log_statistics();
}

#[test]
fn coordinate_and_batch_queries() {
    let points = abcd();
    let tree = SmallKDTreeBuilder::new(&points).finish().unwrap();
    let knn = tree.knn_searcher(Metric::SquaredEuclidean, 1).unwrap();
    assert_eq!(knn.knn_coord(&TestCoord { x: 0.9, y: 0.1 }, 1)[0].id, 1);

    let range = tree.range_searcher(Metric::Manhattan, 1.0).unwrap();
    assert_eq!(range.radius(), 1.0);
    assert_eq!(sorted_ids(&range.range_coord(&TestCoord { x: 0.0, y: 0.0 })), vec![0, 1, 2]);

    let queries = [[0., 1.], [4., 4.]];
    let batch = knn.knn_batch(&queries, 2);
    assert_eq!(sorted_ids(&batch[0]), vec![0, 2]);
    assert_eq!(batch[1][0].id, 3);
    assert_eq!(range.range_batch(&queries)[1], vec![]);
}
