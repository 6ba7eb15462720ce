use ndarray::{Array2, ArrayView1};
use rfqmatch_common::{Result, RfqMatchError};

use crate::types::Neighbor;

/// Brute-force nearest-neighbor index using squared Euclidean distance
///
/// Vectors are stored as rows of a dense `M x D` matrix; slot `i` is row `i`.
#[derive(Debug, Clone)]
pub struct FlatIndex {
    data: Array2<f32>,
}

impl FlatIndex {
    /// Build index from vectors in insertion order
    pub fn from_vectors(vectors: &[Vec<f32>]) -> Result<Self> {
        let dim = vectors
            .first()
            .map(|v| v.len())
            .ok_or_else(|| RfqMatchError::index("cannot build an index from zero vectors"))?;

        if dim == 0 {
            return Err(RfqMatchError::index("vector dimension cannot be 0"));
        }

        let mut flat = Vec::with_capacity(vectors.len() * dim);
        for (i, v) in vectors.iter().enumerate() {
            if v.len() != dim {
                return Err(RfqMatchError::index(format!(
                    "vector {} has dimension {}, expected {}",
                    i,
                    v.len(),
                    dim
                )));
            }
            flat.extend_from_slice(v);
        }

        let data = Array2::from_shape_vec((vectors.len(), dim), flat)
            .map_err(|e| RfqMatchError::index(format!("failed to shape index matrix: {}", e)))?;

        Ok(Self { data })
    }

    /// Number of indexed vectors
    pub fn len(&self) -> usize {
        self.data.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Vector dimension
    pub fn dim(&self) -> usize {
        self.data.ncols()
    }

    /// Find the `k` nearest vectors, ascending by distance
    ///
    /// Equal distances keep slot order.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>> {
        if query.len() != self.dim() {
            return Err(RfqMatchError::index(format!(
                "query dimension {} does not match index dimension {}",
                query.len(),
                self.dim()
            )));
        }

        let q = ArrayView1::from(query);
        let mut hits: Vec<Neighbor> = self
            .data
            .outer_iter()
            .enumerate()
            .map(|(slot, row)| {
                let diff = &row - &q;
                Neighbor {
                    slot,
                    distance: diff.dot(&diff),
                }
            })
            .collect();

        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance).then(a.slot.cmp(&b.slot)));
        hits.truncate(k);
        Ok(hits)
    }
}
