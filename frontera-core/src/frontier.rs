//! Sparse and dense representations of a traversal frontier.

use rayon::prelude::*;

/// The set of vertices activated by the latest traversal step.
///
/// Push steps produce and consume the sparse form; pull steps consume the
/// dense form. Both variants denote the same set.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Frontier {
    /// Explicit list of member vertices, unordered.
    Sparse(Vec<usize>),
    /// Membership flag per vertex together with the member count.
    Dense { present: Vec<bool>, len: usize },
}

impl Frontier {
    pub(crate) fn len(&self) -> usize {
        match self {
            Self::Sparse(members) => members.len(),
            Self::Dense { len, .. } => *len,
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sum of `degree` over the members.
    pub(crate) fn degree_sum(&self, degree: &[usize]) -> usize {
        match self {
            Self::Sparse(members) => members.par_iter().map(|&vertex| degree[vertex]).sum(),
            Self::Dense { present, .. } => present
                .par_iter()
                .zip(degree.par_iter())
                .filter_map(|(&member, &d)| member.then_some(d))
                .sum(),
        }
    }

    /// Member list, scanning the flags when the frontier is dense.
    pub(crate) fn into_sparse(self) -> Vec<usize> {
        match self {
            Self::Sparse(members) => members,
            Self::Dense { present, .. } => present
                .par_iter()
                .enumerate()
                .filter_map(|(vertex, &member)| member.then_some(vertex))
                .collect(),
        }
    }

    /// Membership flags over `vertex_count` vertices.
    pub(crate) fn into_dense(self, vertex_count: usize) -> Vec<bool> {
        match self {
            Self::Dense { present, .. } => present,
            Self::Sparse(members) => {
                let mut present = vec![false; vertex_count];
                for vertex in members {
                    present[vertex] = true;
                }
                present
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversions_preserve_membership() {
        let sparse = Frontier::Sparse(vec![3, 0]);
        let present = sparse.clone().into_dense(5);
        assert_eq!(present, vec![true, false, false, true, false]);
        let dense = Frontier::Dense { present, len: 2 };
        assert_eq!(dense.len(), sparse.len());
        assert_eq!(dense.into_sparse(), vec![0, 3]);
    }

    #[test]
    fn degree_sum_matches_between_forms() {
        let degree = [4, 1, 0, 2];
        let sparse = Frontier::Sparse(vec![0, 3]);
        let dense = Frontier::Dense {
            present: vec![true, false, false, true],
            len: 2,
        };
        assert_eq!(sparse.degree_sum(&degree), 6);
        assert_eq!(dense.degree_sum(&degree), 6);
        assert!(Frontier::Sparse(Vec::new()).is_empty());
    }
}
