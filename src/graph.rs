use faer::sparse::SparseColMat;
use petgraph::graph::UnGraph;
use petgraph::visit::EdgeRef;

use crate::Error;

/// The matrices and degree sequence a sweep reads off an undirected graph.
///
/// Vertex ids are the petgraph node indices `0..n - 1`; all three fields use
/// that ordering consistently. The adjacency matrix is symmetric with
/// `A[i, j]` the (summed) weight between `i` and `j`, the degree sequence is
/// its row sums, and the Laplacian is the normalized `I - D^{-1/2} A D^{-1/2}`.
#[derive(Debug)]
pub struct GraphMatrices {
    pub adjacency: SparseColMat<usize, f64>,
    pub laplacian: SparseColMat<usize, f64>,
    pub degrees: Vec<f64>,
}

impl GraphMatrices {
    pub fn from_graph<N>(graph: &UnGraph<N, f64>) -> Result<Self, Error> {
        let n = graph.node_count();
        if n < 2 {
            return Err(Error::TooFewVertices { n });
        }

        let mut degrees = vec![0.0; n];
        let mut adjacency_triplets = Vec::with_capacity(2 * graph.edge_count());
        for edge in graph.edge_references() {
            let (i, j) = (edge.source().index(), edge.target().index());
            let w = *edge.weight();
            degrees[i] += w;
            if i == j {
                // A self-loop of weight w contributes w to A[i, i] and d[i].
                adjacency_triplets.push((i, i, w));
            } else {
                degrees[j] += w;
                adjacency_triplets.push((i, j, w));
                adjacency_triplets.push((j, i, w));
            }
        }
        if let Some(vertex) = degrees.iter().position(|&d| d <= 0.0) {
            return Err(Error::DegenerateDegree { vertex });
        }

        let mut laplacian_triplets = Vec::with_capacity(n + adjacency_triplets.len());
        for i in 0..n {
            laplacian_triplets.push((i, i, 1.0));
        }
        for &(i, j, w) in &adjacency_triplets {
            laplacian_triplets.push((i, j, -w / (degrees[i] * degrees[j]).sqrt()));
        }

        // try_new_from_triplets sums duplicates, so parallel edges and the
        // Laplacian diagonal come out right without pre-aggregation.
        let adjacency = SparseColMat::try_new_from_triplets(n, n, &adjacency_triplets)
            .map_err(Error::Assembly)?;
        let laplacian = SparseColMat::try_new_from_triplets(n, n, &laplacian_triplets)
            .map_err(Error::Assembly)?;
        Ok(Self {
            adjacency,
            laplacian,
            degrees,
        })
    }
}

#[cfg(test)]
mod tests {
    use equator::assert;
    use petgraph::graph::UnGraph;
    use std::iter::zip;

    use super::GraphMatrices;
    use crate::Error;

    fn read(matrix: &faer::sparse::SparseColMat<usize, f64>, i: usize, j: usize) -> f64 {
        zip(
            matrix.as_ref().row_indices_of_col_raw(j),
            matrix.as_ref().values_of_col(j),
        )
        .filter(|&(&row, _)| row == i)
        .map(|(_, &w)| w)
        .sum()
    }

    #[test]
    fn weighted_triangle_matrices() {
        let mut graph = UnGraph::<(), f64>::new_undirected();
        let v: Vec<_> = (0..3).map(|_| graph.add_node(())).collect();
        graph.add_edge(v[0], v[1], 1.0);
        graph.add_edge(v[1], v[2], 2.0);
        graph.add_edge(v[0], v[2], 3.0);

        let m = GraphMatrices::from_graph(&graph).unwrap();
        assert!(m.degrees == vec![4.0, 3.0, 5.0]);
        assert!(read(&m.adjacency, 0, 1) == 1.0);
        assert!(read(&m.adjacency, 1, 0) == 1.0);
        assert!(read(&m.adjacency, 2, 1) == 2.0);
        assert!(read(&m.adjacency, 0, 0) == 0.0);

        for i in 0..3 {
            assert!(read(&m.laplacian, i, i) == 1.0);
        }
        let expected = -1.0 / (4.0f64 * 3.0).sqrt();
        assert!((read(&m.laplacian, 0, 1) - expected).abs() < 1e-15);
        assert!(read(&m.laplacian, 0, 1) == read(&m.laplacian, 1, 0));
    }

    #[test]
    fn matrices_are_debug_printable() {
        // GraphMatrices is consumed by destructuring; Debug is the only
        // trait it needs to carry (faer's sparse matrices are not Clone).
        let mut graph = UnGraph::<(), f64>::new_undirected();
        let a = graph.add_node(());
        let b = graph.add_node(());
        graph.add_edge(a, b, 1.0);
        let m = GraphMatrices::from_graph(&graph).unwrap();
        assert!(!format!("{m:?}").is_empty());
    }

    #[test]
    fn isolated_vertex_is_degenerate() {
        let mut graph = UnGraph::<(), f64>::new_undirected();
        let a = graph.add_node(());
        let b = graph.add_node(());
        graph.add_node(());
        graph.add_edge(a, b, 1.0);
        let err = GraphMatrices::from_graph(&graph).unwrap_err();
        assert!(matches!(err, Error::DegenerateDegree { vertex: 2 }));
    }

    #[test]
    fn single_vertex_is_too_few() {
        let mut graph = UnGraph::<(), f64>::new_undirected();
        graph.add_node(());
        let err = GraphMatrices::from_graph(&graph).unwrap_err();
        assert!(matches!(err, Error::TooFewVertices { n: 1 }));
    }
}
