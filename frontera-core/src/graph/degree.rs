//! Degree-based vertex ordering and sampling.

use std::cmp::Reverse;

use rand::Rng;
use rayon::prelude::*;

use crate::{
    error::{GraphError, Result},
    matrix::EdgeValue,
};

use super::{DegreeOrientation, Graph, Kind, Tristate};

/// Mean and median of a random sample of vertex degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DegreeSample {
    mean: f64,
    median: f64,
}

impl DegreeSample {
    /// Average sampled degree.
    #[must_use]
    #[rustfmt::skip]
    pub fn mean(&self) -> f64 { self.mean }

    /// Upper median of the sampled degrees.
    #[must_use]
    #[rustfmt::skip]
    pub fn median(&self) -> f64 { self.median }
}

impl<T: EdgeValue> Graph<T> {
    /// Returns the vertices ordered by cached degree.
    ///
    /// Ties are broken by ascending vertex id in both directions. Undirected
    /// graphs and graphs known to have symmetric structure always use the
    /// out-degree.
    ///
    /// # Errors
    /// Returns [`GraphError::MissingDegree`] when the required degree vector
    /// has not been cached.
    pub fn sort_by_degree(&self, orientation: DegreeOrientation, ascending: bool) -> Result<Vec<usize>> {
        let degree = self.degree_for(orientation)?;
        let mut order: Vec<usize> = (0..degree.len()).collect();
        if ascending {
            order.par_sort_unstable_by_key(|&vertex| (degree[vertex], vertex));
        } else {
            order.par_sort_unstable_by_key(|&vertex| (Reverse(degree[vertex]), vertex));
        }
        Ok(order)
    }

    /// Samples `samples` vertex degrees with replacement and reports their
    /// mean and median.
    ///
    /// # Errors
    /// Returns [`GraphError::MissingDegree`] when the required degree vector
    /// has not been cached, or [`GraphError::InvalidParameters`] when
    /// `samples` is zero or the graph has no vertices.
    pub fn sample_degree<R: Rng + ?Sized>(
        &self,
        orientation: DegreeOrientation,
        samples: usize,
        rng: &mut R,
    ) -> Result<DegreeSample> {
        let degree = self.degree_for(orientation)?;
        if samples == 0 {
            return Err(GraphError::parameters("samples must be greater than zero"));
        }
        if degree.is_empty() {
            return Err(GraphError::parameters("cannot sample degrees of an empty graph"));
        }
        let mut drawn: Vec<usize> = (0..samples)
            .map(|_| degree[rng.gen_range(0..degree.len())])
            .collect();
        let total: usize = drawn.iter().sum();
        drawn.sort_unstable();
        Ok(DegreeSample {
            mean: total as f64 / samples as f64,
            median: drawn[samples / 2] as f64,
        })
    }

    fn degree_for(&self, orientation: DegreeOrientation) -> Result<&[usize]> {
        let effective = if self.kind == Kind::Undirected
            || self.cache.symmetric_structure == Tristate::True
        {
            DegreeOrientation::Out
        } else {
            orientation
        };
        let degree = match effective {
            DegreeOrientation::Out => self.out_degree(),
            DegreeOrientation::In => self.in_degree(),
        };
        degree.ok_or(GraphError::MissingDegree {
            orientation: effective,
        })
    }
}
