//! Span and event coverage of the public algorithms.

use frontera_core::{
    ConnectivityConfig, Graph, GraphError, Kind, SamplingPolicy, SparseMatrix, TraversalConfig,
    TraversalRequest, betweenness_centrality, breadth_first_search, connected_components,
};
use frontera_test_support::{
    graphs::{KARATE_EDGES, KARATE_VERTICES, symmetric_triplets},
    tracing::RecordingLayer,
};
use rstest::{fixture, rstest};
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;

#[fixture]
fn karate() -> Graph<f64> {
    let adjacency = SparseMatrix::from_triplets(
        KARATE_VERTICES,
        KARATE_VERTICES,
        symmetric_triplets(KARATE_EDGES),
    )
    .expect("karate edges are in bounds");
    Graph::new(adjacency, Kind::Undirected)
}

fn recorded<R>(run: impl FnOnce() -> R) -> (R, RecordingLayer) {
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());
    let output = tracing::subscriber::with_default(subscriber, run);
    (output, layer)
}

fn field<'a>(fields: &'a frontera_test_support::tracing::Fields, name: &str) -> Option<&'a str> {
    fields.get(name).map(String::as_str)
}

#[rstest]
fn bfs_span_records_progress(mut karate: Graph<f64>) {
    karate.cached_out_degree();
    let (result, layer) = recorded(|| {
        breadth_first_search(&karate, 30, TraversalRequest::LEVELS, &TraversalConfig::default())
    });
    let result = result.expect("source is valid");

    let spans = layer.spans_named("bfs.run");
    assert_eq!(spans.len(), 1);
    let fields = &spans[0].fields;
    assert_eq!(field(fields, "vertices"), Some("34"));
    assert_eq!(field(fields, "policy"), Some("Adaptive"));
    assert_eq!(field(fields, "visited"), Some("34"));
    assert_eq!(field(fields, "steps"), Some(result.stats().steps().to_string().as_str()));
    assert_eq!(layer.spans_named("graph.check").len(), 1);

    let done = layer.events_with_message("breadth-first search completed");
    assert_eq!(done.len(), 1);
    assert_eq!(done[0].level, Level::INFO);
}

#[rstest]
fn rejected_source_is_logged_as_error(karate: Graph<f64>) {
    let (outcome, layer) = recorded(|| {
        breadth_first_search(&karate, 99, TraversalRequest::LEVELS, &TraversalConfig::default())
    });
    assert!(matches!(outcome, Err(GraphError::InvalidSource { vertex: 99, .. })));
    assert!(
        layer
            .events()
            .iter()
            .any(|event| event.level == Level::ERROR
                && field(&event.fields, "error").is_some_and(|text| text.contains("99")))
    );
}

#[rstest]
fn betweenness_span_records_depth(karate: Graph<f64>) {
    let (outcome, layer) = recorded(|| betweenness_centrality(&karate, &[6, 29, 0, 9]));
    outcome.expect("sources are valid");
    let spans = layer.spans_named("betweenness.run");
    assert_eq!(spans.len(), 1);
    assert_eq!(field(&spans[0].fields, "sources"), Some("4"));
    let depth: usize = field(&spans[0].fields, "depth")
        .and_then(|text| text.parse().ok())
        .expect("depth is recorded");
    assert!(depth >= 2);
    assert_eq!(layer.events_with_message("betweenness centrality completed").len(), 1);
}

#[rstest]
#[case::unsampled(SamplingPolicy::Never, 0)]
#[case::sampled(SamplingPolicy::Always, 1)]
fn connectivity_spans_reflect_sampling(
    karate: Graph<f64>,
    #[case] sampling: SamplingPolicy,
    #[case] sample_spans: usize,
) {
    let config = ConnectivityConfig::default().with_sampling(sampling);
    let (outcome, layer) = recorded(|| connected_components(&karate, &config));
    assert_eq!(outcome.expect("graph is undirected"), vec![0; 34]);

    let runs = layer.spans_named("connectivity.run");
    assert_eq!(runs.len(), 1);
    assert_eq!(
        field(&runs[0].fields, "sampled"),
        Some(if sample_spans == 1 { "true" } else { "false" })
    );
    assert!(field(&runs[0].fields, "rounds").is_some());

    let samples = layer.spans_named("connectivity.sample");
    assert_eq!(samples.len(), sample_spans);
    if let Some(sample) = samples.first() {
        assert_eq!(field(&sample.fields, "samples"), Some("4"));
        let key: usize = field(&sample.fields, "key")
            .and_then(|text| text.parse().ok())
            .expect("key is recorded");
        assert!(key < KARATE_VERTICES);
    }
    assert!(!layer.events_with_message("fastsv round completed").is_empty());
}
