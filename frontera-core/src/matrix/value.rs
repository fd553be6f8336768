//! Edge value domain accepted by [`super::SparseMatrix`].

use std::fmt::Debug;

/// Scalar stored on each edge of an adjacency.
///
/// The algorithms only read the structure of the adjacency, so the trait asks
/// for little more than a comparable, thread-safe copy type. Implementations
/// are provided for the primitive numeric types and `bool`; every algorithm is
/// monomorphised per value type.
pub trait EdgeValue: Copy + Debug + PartialOrd + Send + Sync + 'static {
    /// Value used for pattern-only entries.
    const ONE: Self;

    /// Returns `false` for values that cannot be ordered, such as NaN.
    #[must_use]
    fn is_comparable(&self) -> bool {
        self.partial_cmp(self).is_some()
    }
}

macro_rules! impl_edge_value {
    ($one:expr => $($ty:ty),+ $(,)?) => {
        $(
            impl EdgeValue for $ty {
                const ONE: Self = $one;
            }
        )+
    };
}

impl_edge_value!(1 => u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);
impl_edge_value!(1.0 => f32, f64);
impl_edge_value!(true => bool);
