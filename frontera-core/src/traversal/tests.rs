//! Unit tests for the direction-optimising breadth-first search.

use rstest::{fixture, rstest};

use crate::{
    error::{GraphError, GraphErrorCode},
    graph::{Graph, Kind},
    matrix::SparseMatrix,
    test_utils::{directed_matrix, karate, reference_levels, symmetric_matrix},
};

use super::{
    Direction, DirectionPolicy, DirectionSwitch, TraversalConfig, TraversalRequest,
    breadth_first_search,
};

/// Levels of the karate club from vertex 30.
const KARATE_LEVELS_FROM_30: [usize; 34] = [
    2, 1, 2, 2, 3, 3, 3, 2, 1, 2, 3, 3, 3, 2, 2, 2, 4, 2, 2, 2, 2, 2, 2, 2, 3, 3, 2, 2, 2, 2, 0,
    2, 1, 1,
];

/// Source 0 reaches eight hubs, and the hubs share `leaves` further vertices.
fn two_level_edges(leaves: usize) -> Vec<(usize, usize)> {
    let mut edges: Vec<(usize, usize)> = (1..=8).map(|hub| (0, hub)).collect();
    for hub in 1..=8 {
        edges.extend((9..9 + leaves).map(|leaf| (hub, leaf)));
    }
    edges
}

#[fixture]
fn two_level() -> Graph<f64> {
    let mut graph = Graph::new(symmetric_matrix(65, &two_level_edges(56)), Kind::Undirected);
    graph.cached_out_degree();
    graph
}

fn assert_parents_consistent(
    adjacency: &SparseMatrix<f64>,
    source: usize,
    level: &[Option<usize>],
    parent: &[Option<usize>],
) {
    for (vertex, (depth, up)) in level.iter().zip(parent).enumerate() {
        assert_eq!(depth.is_some(), up.is_some(), "vertex {vertex}");
        let (Some(depth), Some(up)) = (depth, up) else {
            continue;
        };
        if vertex == source {
            assert_eq!(*up, source);
            assert_eq!(*depth, 0);
            continue;
        }
        assert_eq!(level[*up], Some(depth - 1), "parent of {vertex} must be one level up");
        assert!(
            adjacency.minor_indices(*up).contains(&vertex),
            "parent {up} of {vertex} must be an in-neighbour"
        );
    }
}

#[test]
fn karate_levels_match_known_values() {
    let mut graph = karate();
    graph.cached_out_degree();
    let result = breadth_first_search(&graph, 30, TraversalRequest::LEVELS, &TraversalConfig::default())
        .expect("source is valid");
    let expected: Vec<Option<usize>> = KARATE_LEVELS_FROM_30.iter().copied().map(Some).collect();
    assert_eq!(result.level(), Some(expected.as_slice()));
    assert!(result.parent().is_none());
}

#[rstest]
#[case::adaptive(DirectionPolicy::Adaptive)]
#[case::push_only(DirectionPolicy::PushOnly)]
fn karate_parents_are_consistent(#[case] policy: DirectionPolicy) {
    let mut graph = karate();
    graph.cached_out_degree();
    let config = TraversalConfig::default().with_policy(policy);
    for source in [0, 16, 33] {
        let result = breadth_first_search(&graph, source, TraversalRequest::LEVELS_AND_PARENTS, &config)
            .expect("source is valid");
        let level = result.level().expect("levels requested");
        let parent = result.parent().expect("parents requested");
        assert_eq!(level, reference_levels(graph.adjacency(), source).as_slice());
        assert_parents_consistent(graph.adjacency(), source, level, parent);
    }
}

#[rstest]
fn dense_second_level_switches_to_pull(two_level: Graph<f64>) {
    let result = breadth_first_search(
        &two_level,
        0,
        TraversalRequest::LEVELS_AND_PARENTS,
        &TraversalConfig::default(),
    )
    .expect("source is valid");
    let stats = result.stats();
    assert_eq!(stats.steps(), 2);
    assert_eq!(stats.push_steps(), 1);
    assert_eq!(stats.pull_steps(), 1);
    assert_eq!(stats.direction_switches(), 1);
    assert_eq!(stats.visited(), 65);
    let level = result.level().expect("levels requested");
    assert_eq!(level, reference_levels(two_level.adjacency(), 0).as_slice());
    assert_parents_consistent(
        two_level.adjacency(),
        0,
        level,
        result.parent().expect("parents requested"),
    );
}

#[rstest]
fn push_only_policy_never_pulls(two_level: Graph<f64>) {
    let config = TraversalConfig::default().with_policy(DirectionPolicy::PushOnly);
    let pushed = breadth_first_search(&two_level, 0, TraversalRequest::LEVELS, &config)
        .expect("source is valid");
    let adaptive = breadth_first_search(&two_level, 0, TraversalRequest::LEVELS, &TraversalConfig::default())
        .expect("source is valid");
    assert_eq!(pushed.stats().pull_steps(), 0);
    assert_eq!(pushed.level(), adaptive.level());
}

#[test]
fn shrinking_pull_frontier_switches_back_to_push() {
    let mut edges = two_level_edges(992);
    edges.extend((1000..1023).map(|v| (v, v + 1)));
    let mut graph = Graph::new(symmetric_matrix(1024, &edges), Kind::Undirected);
    graph.cached_out_degree();

    let result = breadth_first_search(&graph, 0, TraversalRequest::LEVELS, &TraversalConfig::default())
        .expect("source is valid");
    let stats = result.stats();
    assert_eq!(stats.pull_steps(), 2);
    assert_eq!(stats.direction_switches(), 2);
    assert_eq!(stats.steps(), 25);
    let level = result.level().expect("levels requested");
    assert_eq!(level[1023], Some(25));
    assert_eq!(level, reference_levels(graph.adjacency(), 0).as_slice());
}

#[test]
fn missing_out_degree_forces_push() {
    let graph = Graph::new(symmetric_matrix(65, &two_level_edges(56)), Kind::Undirected);
    let result = breadth_first_search(&graph, 0, TraversalRequest::LEVELS, &TraversalConfig::default())
        .expect("source is valid");
    assert_eq!(result.stats().pull_steps(), 0);
    assert_eq!(result.stats().push_steps(), 2);
}

#[test]
fn directed_graph_pulls_through_cached_transpose() {
    let mut edges = two_level_edges(56);
    edges.extend((9..65).map(|leaf| (leaf, 0)));
    let mut graph = Graph::new(directed_matrix(65, &edges), Kind::Directed);
    graph.cached_out_degree();
    let without_transpose =
        breadth_first_search(&graph, 0, TraversalRequest::LEVELS_AND_PARENTS, &TraversalConfig::default())
            .expect("source is valid");
    assert_eq!(without_transpose.stats().pull_steps(), 0);

    graph.cached_transpose();
    let with_transpose =
        breadth_first_search(&graph, 0, TraversalRequest::LEVELS_AND_PARENTS, &TraversalConfig::default())
            .expect("source is valid");
    assert_eq!(with_transpose.stats().pull_steps(), 1);
    assert_eq!(with_transpose.level(), without_transpose.level());
    assert_parents_consistent(
        graph.adjacency(),
        0,
        with_transpose.level().expect("levels requested"),
        with_transpose.parent().expect("parents requested"),
    );
}

#[test]
fn unreachable_vertices_have_no_level_or_parent() {
    let graph = Graph::new(directed_matrix(4, &[(0, 1), (2, 3)]), Kind::Directed);
    let result = breadth_first_search(
        &graph,
        0,
        TraversalRequest::LEVELS_AND_PARENTS,
        &TraversalConfig::default(),
    )
    .expect("source is valid");
    assert_eq!(result.level(), Some([Some(0), Some(1), None, None].as_slice()));
    assert_eq!(result.parent(), Some([Some(0), Some(0), None, None].as_slice()));
    assert_eq!(result.stats().visited(), 2);
}

#[test]
fn parents_only_request_omits_levels() {
    let graph = Graph::new(directed_matrix(3, &[(0, 1), (1, 2)]), Kind::Directed);
    let result = breadth_first_search(&graph, 1, TraversalRequest::PARENTS, &TraversalConfig::default())
        .expect("source is valid");
    assert!(result.level().is_none());
    assert_eq!(result.parent(), Some([None, Some(1), Some(1)].as_slice()));
}

#[test]
fn empty_request_produces_no_output() {
    let graph = karate();
    let result = breadth_first_search(
        &graph,
        0,
        TraversalRequest::new(false, false),
        &TraversalConfig::default(),
    )
    .expect("source is valid");
    assert_eq!(result.into_parts(), (None, None));
}

#[test]
fn single_vertex_graph_visits_only_the_source() {
    let graph = Graph::new(SparseMatrix::<f64>::empty(1, 1), Kind::Directed);
    let result = breadth_first_search(&graph, 0, TraversalRequest::LEVELS, &TraversalConfig::default())
        .expect("source is valid");
    assert_eq!(result.level(), Some([Some(0)].as_slice()));
    assert_eq!(result.stats().steps(), 0);
}

#[rstest]
#[case::past_end(34)]
#[case::far_past_end(usize::MAX)]
fn invalid_source_is_rejected(#[case] source: usize) {
    let graph = karate();
    let err = breadth_first_search(&graph, source, TraversalRequest::LEVELS, &TraversalConfig::default())
        .expect_err("source must be rejected");
    assert_eq!(
        err,
        GraphError::InvalidSource {
            vertex: source,
            vertex_count: 34
        }
    );
}

#[test]
fn rectangular_adjacency_fails_check() {
    let adjacency = SparseMatrix::from_triplets(2, 3, [(0, 1, 1.0_f64)]).expect("in bounds");
    let graph = Graph::new(adjacency, Kind::Directed);
    let err = breadth_first_search(&graph, 0, TraversalRequest::LEVELS, &TraversalConfig::default())
        .expect_err("check must fail");
    assert_eq!(err.code(), GraphErrorCode::InvalidStructure);
}

#[rstest]
#[case::alpha(0, 8, 512)]
#[case::beta1(8, 0, 512)]
#[case::beta2(8, 8, 0)]
fn zero_thresholds_are_rejected(#[case] alpha: usize, #[case] beta1: usize, #[case] beta2: usize) {
    let err = TraversalConfig::new(alpha, beta1, beta2).expect_err("zero thresholds must fail");
    assert_eq!(err.code(), GraphErrorCode::InvalidParameters);
}

#[test]
fn sparse_remainder_disables_switching() {
    let config = TraversalConfig::default();
    let mut switch = DirectionSwitch::new(100, 99, true, &config);
    assert_eq!(switch.decide(1, || 99), Direction::Push);
    assert!(!switch.enabled);
    assert_eq!(switch.decide(90, || unreachable!("heuristic is disabled")), Direction::Push);
}

#[test]
fn later_switches_use_frontier_size() {
    let config = TraversalConfig::default();
    let mut switch = DirectionSwitch::new(1024, 1 << 20, true, &config);
    assert_eq!(switch.decide(1, || 10), Direction::Push);
    assert_eq!(switch.decide(500, || 200_000), Direction::Pull);
    // Still growing while pulling: stay in pull.
    assert_eq!(switch.decide(600, || unreachable!("pull mode ignores edges")), Direction::Pull);
    assert_eq!(switch.decide(2, || unreachable!("pull mode ignores edges")), Direction::Push);
    // After a pull, a growing frontier above n / beta1 pulls again.
    assert_eq!(switch.decide(100, || unreachable!("only the size matters now")), Direction::Push);
    assert_eq!(switch.decide(200, || unreachable!("only the size matters now")), Direction::Pull);
}
