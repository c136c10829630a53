//! Flat vector store with exact nearest-neighbor search

use serde::Deserialize;
use serde::Serialize;

use crate::errors::PromptRagError;
use crate::errors::Result;

/// One search result: a stored vector's position and its distance to the query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchHit {
    /// Insertion position of the matched vector
    pub position: usize,
    /// Squared Euclidean distance to the query
    pub distance: f32,
}

/// Fixed-dimension vectors in insertion order, searched by brute-force scan
///
/// Every stored vector is compared against the query, so results are exact.
/// Vectors are stored row-major in a single buffer; the dimension is fixed
/// at construction and must be positive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorIndex {
    dimension: usize,
    data: Vec<f32>,
}

impl VectorIndex {
    /// Create an empty index for vectors of the given dimension
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            data: Vec::new(),
        }
    }

    /// Rebuild an index from raw parts, validating the buffer layout
    pub fn from_parts(dimension: usize, data: Vec<f32>) -> Result<Self> {
        if dimension == 0 {
            return Err(PromptRagError::CorruptIndex(
                "vector dimension is zero".to_string(),
            ));
        }
        if data.len() % dimension != 0 {
            return Err(PromptRagError::CorruptIndex(format!(
                "vector data length {} is not a multiple of dimension {}",
                data.len(),
                dimension
            )));
        }
        Ok(Self { dimension, data })
    }

    /// Append a vector; its position is the current number of vectors
    pub fn push(&mut self, vector: &[f32]) -> Result<()> {
        if vector.len() != self.dimension {
            return Err(PromptRagError::DimensionMismatch {
                expected: self.dimension,
                actual: vector.len(),
            });
        }
        self.data.extend_from_slice(vector);
        Ok(())
    }

    /// Number of stored vectors
    #[must_use]
    pub fn len(&self) -> usize {
        if self.dimension == 0 {
            0
        } else {
            self.data.len() / self.dimension
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Vector dimension
    #[must_use]
    pub const fn dimension(&self) -> usize {
        self.dimension
    }

    /// Raw row-major vector buffer
    #[must_use]
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// The vector stored at `position`, if any
    #[must_use]
    pub fn vector(&self, position: usize) -> Option<&[f32]> {
        if position >= self.len() {
            return None;
        }
        let start = position * self.dimension;
        Some(&self.data[start..start + self.dimension])
    }

    /// The `k` stored vectors nearest to `query`
    ///
    /// Hits are sorted by ascending distance; equal distances are broken
    /// by ascending position. Asking for more hits than stored vectors
    /// returns them all, and `k == 0` or an empty index returns nothing.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchHit>> {
        if query.len() != self.dimension {
            return Err(PromptRagError::DimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }

        if k == 0 || self.is_empty() {
            return Ok(Vec::new());
        }

        let mut hits: Vec<SearchHit> = (0..self.len())
            .map(|position| {
                let start = position * self.dimension;
                let row = &self.data[start..start + self.dimension];
                SearchHit {
                    position,
                    distance: squared_l2(query, row),
                }
            })
            .collect();

        hits.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.position.cmp(&b.position))
        });
        hits.truncate(k);

        Ok(hits)
    }
}

fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}
