//! Property tests comparing the adaptive traversal with a queue-based oracle.

use proptest::{prelude::*, sample::Index, test_runner::TestCaseResult};
use test_strategy::Arbitrary;

use crate::{
    graph::{Graph, Kind},
    test_utils::{directed_matrix, reference_levels, suite_proptest_config, symmetric_matrix},
};

use super::{DirectionPolicy, TraversalConfig, TraversalRequest, breadth_first_search};

/// Edge interpretation of a generated graph.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Arbitrary)]
enum Orientation {
    Undirected,
    Directed,
}

/// Thresholds are kept small so that both directions are exercised on
/// graphs of this size.
#[derive(Clone, Copy, Debug, Arbitrary)]
struct Thresholds {
    #[strategy(1_usize..16)]
    alpha: usize,
    #[strategy(1_usize..16)]
    beta1: usize,
    #[strategy(1_usize..64)]
    beta2: usize,
}

fn edge_list() -> impl Strategy<Value = (usize, Vec<(usize, usize)>)> {
    (1_usize..96).prop_flat_map(|n| (Just(n), prop::collection::vec((0..n, 0..n), 0..n * 6)))
}

fn build(n: usize, edges: &[(usize, usize)], orientation: Orientation, with_transpose: bool) -> Graph<f64> {
    let mut graph = match orientation {
        Orientation::Undirected => Graph::new(symmetric_matrix(n, edges), Kind::Undirected),
        Orientation::Directed => Graph::new(directed_matrix(n, edges), Kind::Directed),
    };
    graph.cached_out_degree();
    if with_transpose {
        graph.cached_transpose();
    }
    graph
}

fn check_against_oracle(graph: &Graph<f64>, source: usize, config: &TraversalConfig) -> TestCaseResult {
    let result = breadth_first_search(graph, source, TraversalRequest::LEVELS_AND_PARENTS, config)
        .map_err(|err| TestCaseError::fail(err.to_string()))?;
    let expected = reference_levels(graph.adjacency(), source);
    let level = result
        .level()
        .ok_or_else(|| TestCaseError::fail("levels missing"))?;
    let parent = result
        .parent()
        .ok_or_else(|| TestCaseError::fail("parents missing"))?;
    prop_assert_eq!(level, expected.as_slice());
    prop_assert_eq!(result.stats().visited(), level.iter().flatten().count());

    for (vertex, (depth, up)) in level.iter().zip(parent).enumerate() {
        prop_assert_eq!(depth.is_some(), up.is_some());
        if let (Some(depth), Some(up)) = (depth, up) {
            if vertex == source {
                prop_assert_eq!(*up, source);
            } else {
                prop_assert_eq!(level[*up], Some(depth - 1));
                prop_assert!(graph.adjacency().minor_indices(*up).contains(&vertex));
            }
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(suite_proptest_config(96))]

    #[test]
    fn adaptive_levels_match_queue_oracle(
        (n, edges) in edge_list(),
        orientation in any::<Orientation>(),
        with_transpose in any::<bool>(),
        thresholds in any::<Thresholds>(),
        source in any::<Index>(),
    ) {
        let graph = build(n, &edges, orientation, with_transpose);
        let config = TraversalConfig::new(thresholds.alpha, thresholds.beta1, thresholds.beta2)
            .map_err(|err| TestCaseError::fail(err.to_string()))?;
        check_against_oracle(&graph, source.index(n), &config)?;
    }

    #[test]
    fn push_only_matches_adaptive_levels(
        (n, edges) in edge_list(),
        orientation in any::<Orientation>(),
        source in any::<Index>(),
    ) {
        let graph = build(n, &edges, orientation, true);
        let source = source.index(n);
        let push_only = TraversalConfig::default().with_policy(DirectionPolicy::PushOnly);
        check_against_oracle(&graph, source, &push_only)?;

        let adaptive = breadth_first_search(&graph, source, TraversalRequest::LEVELS, &TraversalConfig::default())
            .map_err(|err| TestCaseError::fail(err.to_string()))?;
        let pushed = breadth_first_search(&graph, source, TraversalRequest::LEVELS, &push_only)
            .map_err(|err| TestCaseError::fail(err.to_string()))?;
        prop_assert_eq!(adaptive.level(), pushed.level());
    }
}
