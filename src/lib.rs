//! Spectral sweep heuristics for sparse graph cuts.
//!
//! Two entry points over an undirected [`petgraph`] graph: [`cheeger_cut`]
//! finds a near-minimum-conductance vertex set from the second eigenvector of
//! the normalized Laplacian, and [`cheeger_trevisan_cut`] finds a
//! near-minimum-bipartiteness pair of sets from its top eigenvector. Both are
//! polynomial-time heuristics whose quality follows from Cheeger-type
//! inequalities; neither promises the optimal cut.
//!
//! The sweeps themselves ([`sweep_set`], [`two_sided_sweep`]) take an
//! adjacency matrix, an eigenvector, and a degree sequence directly, so any
//! eigensolver backend can drive them through the [`SymmetricEigsh`] seam.

use petgraph::graph::UnGraph;

pub mod graph;
pub mod spectrum;
pub mod sweep;

pub use graph::GraphMatrices;
pub use spectrum::{DenseEvd, SymmetricEigsh, Which};
pub use sweep::{sweep_set, two_sided_sweep, SweepCut, TwoSidedCut};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("graph has {n} vertices, a sweep needs at least 2")]
    TooFewVertices { n: usize },
    #[error("vertex {vertex} has zero degree, degree normalization is undefined")]
    DegenerateDegree { vertex: usize },
    #[error("dimension mismatch: expected length {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },
    #[error("eigensolver failure: {0}")]
    Solver(String),
    #[error("sparse matrix assembly failed: {0:?}")]
    Assembly(faer::sparse::CreationError),
}

/// Finds a sparse cut of `graph` by a one-sided sweep over its second
/// Laplacian eigenvector. Returns the vertices on one side of the cut; the
/// complement is implicit. Which side is reported depends on the solver's
/// arbitrary eigenvector sign.
pub fn cheeger_cut<N>(graph: &UnGraph<N, f64>) -> Result<Vec<usize>, Error> {
    cheeger_cut_with_solver(graph, &DenseEvd)
}

/// [`cheeger_cut`] with an injected eigensolver backend.
pub fn cheeger_cut_with_solver<N>(
    graph: &UnGraph<N, f64>,
    solver: &impl SymmetricEigsh,
) -> Result<Vec<usize>, Error> {
    let GraphMatrices {
        adjacency,
        laplacian,
        degrees,
    } = GraphMatrices::from_graph(graph)?;
    let (values, vectors) =
        solver.symmetric_eigsh(laplacian.as_ref(), Which::SmallestMagnitude, 2)?;
    tracing::debug!(lambda_2 = values[1], "laplacian eigenpair");
    // The first eigenvector is the trivial near-zero one; sweep the second.
    let cut = sweep::sweep_set(adjacency.as_ref(), vectors.col_as_slice(1), &degrees)?;
    tracing::debug!(
        conductance = cut.conductance,
        size = cut.vertices.len(),
        "one-sided sweep done"
    );
    Ok(cut.vertices)
}

/// Finds an almost-bipartite pair of vertex sets by a two-sided sweep over
/// the top Laplacian eigenvector, after Trevisan. Returns the left and right
/// sides; the orientation depends on the solver's eigenvector sign.
pub fn cheeger_trevisan_cut<N>(graph: &UnGraph<N, f64>) -> Result<(Vec<usize>, Vec<usize>), Error> {
    cheeger_trevisan_cut_with_solver(graph, &DenseEvd)
}

/// [`cheeger_trevisan_cut`] with an injected eigensolver backend.
pub fn cheeger_trevisan_cut_with_solver<N>(
    graph: &UnGraph<N, f64>,
    solver: &impl SymmetricEigsh,
) -> Result<(Vec<usize>, Vec<usize>), Error> {
    let GraphMatrices {
        adjacency,
        laplacian,
        degrees,
    } = GraphMatrices::from_graph(graph)?;
    let (values, vectors) = solver.symmetric_eigsh(laplacian.as_ref(), Which::LargestMagnitude, 1)?;
    tracing::debug!(lambda_max = values[0], "laplacian eigenpair");
    let cut = sweep::two_sided_sweep(adjacency.as_ref(), vectors.col_as_slice(0), &degrees)?;
    tracing::debug!(
        bipartiteness = cut.bipartiteness,
        left = cut.left.len(),
        right = cut.right.len(),
        "two-sided sweep done"
    );
    Ok((cut.left, cut.right))
}
