use std::iter::zip;

use faer::sparse::SparseColMatRef;
use faer::Col;

use crate::Error;


/// The better side of a one-sided sweep, with the conductance it achieves.
#[derive(Clone, Debug, PartialEq)]
pub struct SweepCut {
    /// Vertices of the cut, in sweep order.
    pub vertices: Vec<usize>,
    pub conductance: f64,
}

/// An almost-bipartite pair of vertex sets found by the two-sided sweep.
#[derive(Clone, Debug, PartialEq)]
pub struct TwoSidedCut {
    pub left: Vec<usize>,
    pub right: Vec<usize>,
    pub bipartiteness: f64,
}

#[derive(Clone, Copy, Debug)]
pub(crate) enum ScoreOrder {
    Ascending,
    DescendingMagnitude,
}

/// Normalizes `eigenvector` by `1 / sqrt(degree)` per vertex and returns the
/// scores together with the vertex permutation sorted by them. Ties are broken
/// by the original vertex index, so the order is a deterministic function of
/// the inputs.
pub(crate) fn degree_normalized_order(
    adjacency: SparseColMatRef<'_, usize, f64>,
    eigenvector: &[f64],
    degrees: &[f64],
    order: ScoreOrder,
) -> Result<(Vec<f64>, Vec<usize>), Error> {
    let n = adjacency.nrows();
    for found in [adjacency.ncols(), eigenvector.len(), degrees.len()] {
        if found != n {
            return Err(Error::DimensionMismatch { expected: n, found });
        }
    }
    if n < 2 {
        return Err(Error::TooFewVertices { n });
    }
    if let Some(vertex) = degrees.iter().position(|&d| d <= 0.0) {
        return Err(Error::DegenerateDegree { vertex });
    }
    let scores: Vec<f64> = zip(eigenvector, degrees)
        .map(|(&v, &d)| v / d.sqrt())
        .collect();
    let mut vertices: Vec<usize> = (0..n).collect();
    match order {
        ScoreOrder::Ascending => vertices.sort_by(|&i, &j| {
            scores[i].partial_cmp(&scores[j]).unwrap().then(i.cmp(&j))
        }),
        ScoreOrder::DescendingMagnitude => vertices.sort_by(|&i, &j| {
            scores[j]
                .abs()
                .partial_cmp(&scores[i].abs())
                .unwrap()
                .then(i.cmp(&j))
        }),
    }
    Ok((scores, vertices))
}

/// Dot product of row `row` of a symmetric sparse matrix with a sign vector.
/// Symmetry lets us read column `row` instead, which is contiguous in CSC.
fn sparse_row_dot(matrix: SparseColMatRef<'_, usize, f64>, row: usize, signs: &[f64]) -> f64 {
    zip(
        matrix.row_indices_of_col_raw(row),
        matrix.values_of_col(row),
    )
    .map(|(&i, &w)| w * signs[i])
    .sum()
}

/// Running conductance of every proper prefix of `order`, maintained
/// incrementally. With `x[u] = -1` for swept vertices and `+1` otherwise,
/// `A[v, :] . x` is exactly the change in cut weight when `v` joins the set,
/// so each step costs one sparse row scan.
pub(crate) fn conductance_trace(
    adjacency: SparseColMatRef<'_, usize, f64>,
    order: &[usize],
    degrees: &[f64],
) -> Vec<f64> {
    let n = order.len();
    let total_volume: f64 = degrees.iter().sum();
    let mut set_volume = 0.0;
    let mut cut_weight = 0.0;
    let mut x = Col::<f64>::from_fn(n, |_| 1.0);
    let signs = x.as_slice_mut();
    order[..n - 1]
        .iter()
        .map(|&v| {
            set_volume += degrees[v];
            // From now on, edges into `v` are subtracted from the cut.
            signs[v] = -1.0;
            cut_weight += sparse_row_dot(adjacency, v, signs);
            cut_weight / set_volume.min(total_volume - set_volume)
        })
        .collect()
}

/// Index and value of the first strict minimum of a scan trace.
fn first_strict_min(trace: &[f64]) -> (usize, f64) {
    let mut best = (0, trace[0]);
    for (i, &value) in trace.iter().enumerate().skip(1) {
        if value < best.1 {
            best = (i, value);
        }
    }
    best
}

/// One-sided sweep over the ascending degree-normalized eigenvector order.
///
/// Scans every prefix of the order except the full vertex set and returns the
/// prefix of minimum conductance `cut(S) / min(vol(S), vol(V \ S))`. The
/// minimum is over the `n - 1` prefixes of this particular ordering only; it
/// is a Cheeger-style heuristic, not a global optimum.
pub fn sweep_set(
    adjacency: SparseColMatRef<'_, usize, f64>,
    eigenvector: &[f64],
    degrees: &[f64],
) -> Result<SweepCut, Error> {
    let (_, sorted_vertices) =
        degree_normalized_order(adjacency, eigenvector, degrees, ScoreOrder::Ascending)?;
    let trace = conductance_trace(adjacency, &sorted_vertices, degrees);
    let (best_index, conductance) = first_strict_min(&trace);
    Ok(SweepCut {
        vertices: sorted_vertices[..=best_index].to_vec(),
        conductance,
    })
}

/// Running bipartiteness of every proper prefix split of `order`. Each
/// vertex joins the left side when its score is negative and the right side
/// otherwise; the numerator `2 w(L, L) + 2 w(R, R) + w(L u R, V \ (L u R))`
/// is maintained through sign-vector dot products: adding a left vertex pays
/// for its edges into everything not already in the right set, and
/// symmetrically.
pub(crate) fn bipartiteness_trace(
    adjacency: SparseColMatRef<'_, usize, f64>,
    order: &[usize],
    scores: &[f64],
    degrees: &[f64],
) -> Vec<f64> {
    let n = order.len();
    let total_volume: f64 = degrees.iter().sum();
    let mut set_volume = 0.0;
    let mut bipart_numerator = 0.0;
    let mut left_x = Col::<f64>::from_fn(n, |_| 1.0);
    let mut right_x = Col::<f64>::from_fn(n, |_| 1.0);
    let left_signs = left_x.as_slice_mut();
    let right_signs = right_x.as_slice_mut();
    order[..n - 1]
        .iter()
        .map(|&v| {
            set_volume += degrees[v];
            let delta = if scores[v] < 0.0 {
                // Future right-set members subtract their edges into `v`.
                right_signs[v] = -1.0;
                sparse_row_dot(adjacency, v, left_signs)
            } else {
                left_signs[v] = -1.0;
                sparse_row_dot(adjacency, v, right_signs)
            };
            bipart_numerator += delta;
            bipart_numerator / set_volume.min(total_volume - set_volume)
        })
        .collect()
}

/// Two-sided sweep over the descending `|v'|` order, after Trevisan.
///
/// Each scanned vertex joins the left set when its normalized score is
/// negative and the right set otherwise (zero scores route right; keep that
/// rule stable, downstream results depend on it). Returns the split of
/// minimum bipartiteness among the `n - 1` prefix splits.
pub fn two_sided_sweep(
    adjacency: SparseColMatRef<'_, usize, f64>,
    eigenvector: &[f64],
    degrees: &[f64],
) -> Result<TwoSidedCut, Error> {
    let (scores, sorted_vertices) = degree_normalized_order(
        adjacency,
        eigenvector,
        degrees,
        ScoreOrder::DescendingMagnitude,
    )?;
    let trace = bipartiteness_trace(adjacency, &sorted_vertices, &scores, degrees);
    let (best_index, bipartiteness) = first_strict_min(&trace);

    let mut left = Vec::new();
    let mut right = Vec::new();
    for &v in &sorted_vertices[..=best_index] {
        if scores[v] < 0.0 {
            left.push(v);
        } else {
            right.push(v);
        }
    }
    Ok(TwoSidedCut {
        left,
        right,
        bipartiteness,
    })
}
