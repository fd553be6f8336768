//! Command implementations and argument parsing for the frontera CLI.

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use frontera_core::{
    ComponentSummary, ConnectivityConfig, DegreeOrientation, DirectionPolicy, Graph, GraphError,
    GraphErrorCode, Kind, SamplingPolicy, TraversalConfig, TraversalRequest, TraversalResult,
    betweenness_centrality, breadth_first_search, connected_components,
};
use frontera_providers_matrix_market::{MatrixMarketError, read_matrix};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

const DEFAULT_ALPHA: usize = 8;
const DEFAULT_BETA1: usize = 8;
const DEFAULT_BETA2: usize = 512;
const DEFAULT_SAMPLES_PER_VERTEX: usize = 4;
const DEFAULT_HASH_SAMPLES: usize = 864;
const DEFAULT_SEED: u64 = 0x5eed_f457;
const DEFAULT_BATCH_SIZE: usize = 4;
const HUB_COUNT: usize = 5;

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(name = "frontera", about = "Run sparse graph analytics over a Matrix Market file.")]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Report sizes, symmetry, self-loops, weight bounds and hub vertices.
    Info(InfoCommand),
    /// Breadth-first search from one source vertex.
    Bfs(BfsCommand),
    /// Betweenness centrality accumulated over a batch of sources.
    Betweenness(BetweennessCommand),
    /// Connected components of a graph with symmetric structure.
    Components(ComponentsCommand),
}

/// Input graph shared by every command.
#[derive(Debug, Args, Clone)]
pub struct GraphArgs {
    /// Path to a Matrix Market file holding the adjacency matrix.
    pub path: PathBuf,

    /// Interpret entries as directed edges. Without this flag the matrix
    /// must have symmetric structure.
    #[arg(long)]
    pub directed: bool,
}

/// Options accepted by the `info` command.
#[derive(Debug, Args, Clone)]
pub struct InfoCommand {
    /// Input graph.
    #[command(flatten)]
    pub graph: GraphArgs,
}

/// Which per-vertex outputs the `bfs` command prints.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, ValueEnum)]
pub enum BfsOutput {
    /// Level of each vertex.
    Levels,
    /// Parent of each vertex.
    Parents,
    /// Level and parent of each vertex.
    #[default]
    Both,
}

impl BfsOutput {
    const fn request(self) -> TraversalRequest {
        match self {
            Self::Levels => TraversalRequest::LEVELS,
            Self::Parents => TraversalRequest::PARENTS,
            Self::Both => TraversalRequest::LEVELS_AND_PARENTS,
        }
    }
}

/// Options accepted by the `bfs` command.
#[derive(Debug, Args, Clone)]
pub struct BfsCommand {
    /// Input graph.
    #[command(flatten)]
    pub graph: GraphArgs,

    /// Source vertex, 0-based.
    #[arg(long)]
    pub source: usize,

    /// Outputs to compute and print.
    #[arg(long, value_enum, default_value_t = BfsOutput::Both)]
    pub output: BfsOutput,

    /// Never switch to pull steps.
    #[arg(long = "push-only")]
    pub push_only: bool,

    /// Push to pull switch divisor applied to the unexplored edge count.
    #[arg(long, default_value_t = DEFAULT_ALPHA)]
    pub alpha: usize,

    /// Divisor of the vertex count above which a growing frontier pulls.
    #[arg(long, default_value_t = DEFAULT_BETA1)]
    pub beta1: usize,

    /// Divisor of the vertex count at or below which a shrinking frontier pushes.
    #[arg(long, default_value_t = DEFAULT_BETA2)]
    pub beta2: usize,
}

/// Options accepted by the `betweenness` command.
#[derive(Debug, Args, Clone)]
pub struct BetweennessCommand {
    /// Input graph.
    #[command(flatten)]
    pub graph: GraphArgs,

    /// Comma-separated source vertices, 0-based. Defaults to every vertex.
    #[arg(long, value_delimiter = ',')]
    pub sources: Vec<usize>,

    /// Sources traversed per batch. Memory grows with batch size times vertex count.
    #[arg(long = "batch-size", default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,
}

/// Sampling policy accepted on the command line.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, ValueEnum)]
pub enum SamplingArg {
    /// Sample only large graphs that are denser than the sample bound.
    #[default]
    Auto,
    /// Always run the sampling phase.
    Always,
    /// Never run the sampling phase.
    Never,
}

impl From<SamplingArg> for SamplingPolicy {
    fn from(value: SamplingArg) -> Self {
        match value {
            SamplingArg::Auto => Self::Auto,
            SamplingArg::Always => Self::Always,
            SamplingArg::Never => Self::Never,
        }
    }
}

/// Options accepted by the `components` command.
#[derive(Debug, Args, Clone)]
pub struct ComponentsCommand {
    /// Input graph.
    #[command(flatten)]
    pub graph: GraphArgs,

    /// Whether to converge on a bounded-degree sample first.
    #[arg(long, value_enum, default_value_t = SamplingArg::Auto)]
    pub sampling: SamplingArg,

    /// Neighbours kept per vertex in the sample.
    #[arg(long = "samples-per-vertex", default_value_t = DEFAULT_SAMPLES_PER_VERTEX)]
    pub samples_per_vertex: usize,

    /// Labels drawn when estimating the dominant component.
    #[arg(long = "hash-samples", default_value_t = DEFAULT_HASH_SAMPLES)]
    pub hash_samples: usize,

    /// Seed for the label draw.
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// The input file could not be opened.
    #[error("failed to open `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// The Matrix Market document could not be read.
    #[error(transparent)]
    Input(#[from] MatrixMarketError),
    /// An undirected graph was requested for an asymmetric matrix.
    #[error("`{path}` is not structurally symmetric; pass --directed")]
    NotSymmetric {
        /// Path of the offending file.
        path: PathBuf,
    },
    /// A graph algorithm rejected its input.
    #[error(transparent)]
    Graph(#[from] GraphError),
}

impl CliError {
    /// The stable code of the underlying [`GraphError`], if any.
    #[must_use]
    pub const fn graph_code(&self) -> Option<GraphErrorCode> {
        match self {
            Self::Graph(err) | Self::Input(MatrixMarketError::Graph(err)) => Some(err.code()),
            _ => None,
        }
    }
}

/// Structural properties reported by the `info` command.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphInfo {
    /// Number of vertices.
    pub vertices: usize,
    /// Number of stored entries.
    pub entries: usize,
    /// Edge interpretation.
    pub kind: Kind,
    /// Whether the structure is symmetric.
    pub symmetric: bool,
    /// Number of diagonal entries.
    pub self_loops: usize,
    /// Smallest stored value.
    pub edge_min: Option<f64>,
    /// Largest stored value.
    pub edge_max: Option<f64>,
    /// Highest out-degree vertices as `(vertex, degree)`, highest first.
    pub hubs: Vec<(usize, usize)>,
}

/// Outcome of one CLI command.
#[derive(Debug, Clone)]
pub enum ExecutionSummary {
    /// Result of `info`.
    Info(GraphInfo),
    /// Result of `bfs`.
    Bfs {
        /// Source vertex.
        source: usize,
        /// Levels, parents and traversal counters.
        result: TraversalResult,
    },
    /// Result of `betweenness`.
    Betweenness {
        /// Number of sources in the batch.
        sources: usize,
        /// Centrality of each vertex.
        scores: Vec<f64>,
    },
    /// Result of `components`.
    Components {
        /// Component label of each vertex.
        labels: Vec<usize>,
        /// Component sizes.
        summary: ComponentSummary,
    },
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when the input cannot be read or the algorithm
/// rejects it.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use frontera_cli::cli::{Cli, Command, ExecutionSummary, GraphArgs, InfoCommand, run_cli};
/// # use tempfile::NamedTempFile;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let file = NamedTempFile::new()?;
/// std::fs::write(
///     file.path(),
///     "%%MatrixMarket matrix coordinate pattern symmetric\n3 3 2\n2 1\n3 2\n",
/// )?;
/// let cli = Cli {
///     command: Command::Info(InfoCommand {
///         graph: GraphArgs { path: file.path().to_path_buf(), directed: false },
///     }),
/// };
/// let ExecutionSummary::Info(info) = run_cli(cli)? else {
///     unreachable!("info returns an info summary");
/// };
/// assert_eq!((info.vertices, info.entries), (3, 4));
/// # Ok(())
/// # }
/// ```
#[instrument(name = "cli.run", err, skip(cli), fields(command = field::Empty))]
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    let span = Span::current();
    match cli.command {
        Command::Info(command) => {
            span.record("command", field::display("info"));
            run_info(&command)
        }
        Command::Bfs(command) => {
            span.record("command", field::display("bfs"));
            run_bfs(&command)
        }
        Command::Betweenness(command) => {
            span.record("command", field::display("betweenness"));
            run_betweenness(&command)
        }
        Command::Components(command) => {
            span.record("command", field::display("components"));
            run_components(&command)
        }
    }
}

/// Reads the adjacency and wraps it as a graph of the requested kind with
/// its symmetry already cached.
#[instrument(
    name = "cli.load_graph",
    err,
    skip(args),
    fields(path = %args.path.display(), directed = args.directed, vertices = field::Empty, entries = field::Empty),
)]
pub(super) fn load_graph(args: &GraphArgs) -> Result<Graph<f64>, CliError> {
    let reader = open_reader(&args.path)?;
    let mut graph = Graph::new(read_matrix(reader)?, Kind::Directed);
    graph.check()?;
    let span = Span::current();
    span.record("vertices", graph.vertex_count());
    span.record("entries", graph.edge_count());
    let symmetric = graph.cached_symmetric_structure();
    if args.directed {
        return Ok(graph);
    }
    if !symmetric {
        return Err(CliError::NotSymmetric {
            path: args.path.clone(),
        });
    }
    Ok(Graph::new(graph.into_adjacency(), Kind::Undirected))
}

pub(super) fn open_reader(path: &Path) -> Result<BufReader<File>, CliError> {
    let file = File::open(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufReader::new(file))
}

pub(super) fn run_info(command: &InfoCommand) -> Result<ExecutionSummary, CliError> {
    let mut graph = load_graph(&command.graph)?;
    let symmetric = graph.cached_symmetric_structure();
    let self_loops = graph.cached_self_loop_count();
    let edge_min = graph.cached_edge_min();
    let edge_max = graph.cached_edge_max();
    graph.cached_out_degree();
    let order = graph.sort_by_degree(DegreeOrientation::Out, false)?;
    let degree = graph.out_degree().unwrap_or_default();
    let hubs = order
        .into_iter()
        .take(HUB_COUNT)
        .filter_map(|vertex| degree.get(vertex).map(|&d| (vertex, d)))
        .collect();
    let info = GraphInfo {
        vertices: graph.vertex_count(),
        entries: graph.edge_count(),
        kind: graph.kind(),
        symmetric,
        self_loops,
        edge_min,
        edge_max,
        hubs,
    };
    info!(vertices = info.vertices, entries = info.entries, "info completed");
    Ok(ExecutionSummary::Info(info))
}

#[instrument(
    name = "cli.bfs",
    err,
    skip(command),
    fields(source = command.source, output = ?command.output, push_only = command.push_only),
)]
pub(super) fn run_bfs(command: &BfsCommand) -> Result<ExecutionSummary, CliError> {
    let policy = if command.push_only {
        DirectionPolicy::PushOnly
    } else {
        DirectionPolicy::Adaptive
    };
    let config =
        TraversalConfig::new(command.alpha, command.beta1, command.beta2)?.with_policy(policy);
    let mut graph = load_graph(&command.graph)?;
    graph.cached_out_degree();
    graph.cached_transpose();
    let result = breadth_first_search(&graph, command.source, command.output.request(), &config)?;
    info!(
        visited = result.stats().visited(),
        steps = result.stats().steps(),
        "bfs completed"
    );
    Ok(ExecutionSummary::Bfs {
        source: command.source,
        result,
    })
}

#[instrument(
    name = "cli.betweenness",
    err,
    skip(command),
    fields(sources = field::Empty, batch_size = command.batch_size),
)]
pub(super) fn run_betweenness(command: &BetweennessCommand) -> Result<ExecutionSummary, CliError> {
    if command.batch_size == 0 {
        return Err(GraphError::InvalidParameters {
            reason: "batch size must be positive".to_owned(),
        }
        .into());
    }
    let mut graph = load_graph(&command.graph)?;
    graph.cached_transpose();
    let sources: Vec<usize> = if command.sources.is_empty() {
        (0..graph.vertex_count()).collect()
    } else {
        command.sources.clone()
    };
    Span::current().record("sources", sources.len());

    // Unnormalised scores add up across disjoint source batches.
    let mut scores = vec![0.0_f64; graph.vertex_count()];
    for batch in sources.chunks(command.batch_size) {
        let partial = betweenness_centrality(&graph, batch)?;
        for (total, score) in scores.iter_mut().zip(partial) {
            *total += score;
        }
    }
    info!(
        sources = sources.len(),
        batches = sources.len().div_ceil(command.batch_size),
        "betweenness completed"
    );
    Ok(ExecutionSummary::Betweenness {
        sources: sources.len(),
        scores,
    })
}

#[instrument(name = "cli.components", err, skip(command), fields(sampling = ?command.sampling))]
pub(super) fn run_components(command: &ComponentsCommand) -> Result<ExecutionSummary, CliError> {
    let config = ConnectivityConfig::default()
        .with_samples_per_vertex(command.samples_per_vertex)?
        .with_hash_samples(command.hash_samples)?
        .with_seed(command.seed)
        .with_sampling(command.sampling.into());
    let graph = load_graph(&command.graph)?;
    let labels = connected_components(&graph, &config)?;
    let summary = ComponentSummary::from_labels(&labels);
    info!(components = summary.count(), "components completed");
    Ok(ExecutionSummary::Components { labels, summary })
}

fn optional(value: Option<usize>) -> String {
    value.map_or_else(|| "-".to_owned(), |value| value.to_string())
}

/// Renders `summary` to `writer` as tab-separated text.
///
/// Per-vertex rows start with the vertex id; unreached vertices and absent
/// values print as `-`.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use frontera_cli::cli::{ExecutionSummary, render_summary};
/// # use frontera_core::ComponentSummary;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let labels = vec![0, 0, 2];
/// let summary = ExecutionSummary::Components {
///     summary: ComponentSummary::from_labels(&labels),
///     labels,
/// };
/// let mut buffer = Vec::new();
/// render_summary(&summary, &mut buffer)?;
/// assert_eq!(
///     String::from_utf8(buffer)?,
///     "components: 2\nlargest: 0 (2 vertices)\n0\t0\n1\t0\n2\t2\n",
/// );
/// # Ok(())
/// # }
/// ```
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    match summary {
        ExecutionSummary::Info(info) => {
            writeln!(writer, "vertices: {}", info.vertices)?;
            writeln!(writer, "entries: {}", info.entries)?;
            writeln!(writer, "kind: {:?}", info.kind)?;
            writeln!(writer, "symmetric: {}", info.symmetric)?;
            writeln!(writer, "self loops: {}", info.self_loops)?;
            if let (Some(min), Some(max)) = (info.edge_min, info.edge_max) {
                writeln!(writer, "edge values: {min} to {max}")?;
            }
            for (vertex, degree) in &info.hubs {
                writeln!(writer, "hub\t{vertex}\t{degree}")?;
            }
        }
        ExecutionSummary::Bfs { source, result } => {
            let stats = result.stats();
            writeln!(writer, "source: {source}")?;
            writeln!(writer, "visited: {}", stats.visited())?;
            writeln!(
                writer,
                "steps: {} ({} push, {} pull, {} switches)",
                stats.steps(),
                stats.push_steps(),
                stats.pull_steps(),
                stats.direction_switches()
            )?;
            let rows = result.level().or(result.parent()).map_or(0, <[_]>::len);
            for vertex in 0..rows {
                let level = result.level().and_then(|level| level.get(vertex).copied().flatten());
                let parent = result
                    .parent()
                    .and_then(|parent| parent.get(vertex).copied().flatten());
                match (result.level().is_some(), result.parent().is_some()) {
                    (true, true) => {
                        writeln!(writer, "{vertex}\t{}\t{}", optional(level), optional(parent))?;
                    }
                    (true, false) => writeln!(writer, "{vertex}\t{}", optional(level))?,
                    _ => writeln!(writer, "{vertex}\t{}", optional(parent))?,
                }
            }
        }
        ExecutionSummary::Betweenness { sources, scores } => {
            writeln!(writer, "sources: {sources}")?;
            for (vertex, score) in scores.iter().enumerate() {
                writeln!(writer, "{vertex}\t{score:.6}")?;
            }
        }
        ExecutionSummary::Components { labels, summary } => {
            writeln!(writer, "components: {}", summary.count())?;
            if let Some((label, size)) = summary.largest() {
                writeln!(writer, "largest: {label} ({size} vertices)")?;
            }
            for (vertex, label) in labels.iter().enumerate() {
                writeln!(writer, "{vertex}\t{label}")?;
            }
        }
    }
    Ok(())
}
