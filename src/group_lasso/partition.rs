//! Coefficient partition — contiguous groups of the coefficient vector.
//!
//! Purpose
//! -------
//! Represent the ordered block structure `(n₁, …, n_G)` that splits the
//! coefficient vector `x ∈ ℝⁿ` into contiguous groups `x_1, …, x_G`. The
//! group-norm penalty and its subgradient are evaluated block by block over
//! this structure.
//!
//! Key behaviors
//! -------------
//! - Validate block sizes once ([`Partition::new`]) and precompute the
//!   starting offset of each block.
//! - Iterate groups as half-open index ranges ([`Partition::ranges`]) so
//!   callers can slice `ndarray` views with `s![range]`.
//! - Check the partition against a coefficient count
//!   ([`Partition::check_len`]) before a problem is accepted.
//!
//! Invariants & assumptions
//! ------------------------
//! - At least one block; every block size is strictly positive.
//! - `offsets[g] = n₁ + … + n_{g−1}` and `offsets.len() == sizes.len()`.
//! - A partition accepted by a `ProblemInstance` sums exactly to `n`.
//!
//! Conventions
//! -----------
//! - Blocks are contiguous and listed in coefficient order; no permutation
//!   of coefficients is supported.
//! - Errors are reported via [`ProblemError`]; this module never panics on
//!   user input.
//! - Serialized form is `{"sizes": [...]}`; deserialization goes through
//!   [`Partition::new`], so offsets are always rebuilt and revalidated.
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::group_lasso::errors::{ProblemError, ProblemResult};

/// Partition — validated block sizes plus precomputed offsets.
///
/// Fields
/// ------
/// - `sizes`: block sizes `n_g > 0` in coefficient order.
/// - `offsets`: start index of each block.
/// - `total`: `Σ n_g`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PartitionRepr", into = "PartitionRepr")]
pub struct Partition {
    sizes: Vec<usize>,
    offsets: Vec<usize>,
    total: usize,
}

/// Wire form of a [`Partition`]: block sizes only.
#[derive(Serialize, Deserialize)]
struct PartitionRepr {
    sizes: Vec<usize>,
}

impl TryFrom<PartitionRepr> for Partition {
    type Error = ProblemError;

    fn try_from(repr: PartitionRepr) -> ProblemResult<Self> {
        Self::new(repr.sizes)
    }
}

impl From<Partition> for PartitionRepr {
    fn from(partition: Partition) -> Self {
        Self { sizes: partition.sizes }
    }
}

impl Partition {
    /// Build a partition from block sizes.
    ///
    /// # Errors
    /// - [`ProblemError::EmptyPartition`] if `sizes` is empty.
    /// - [`ProblemError::ZeroBlock`] for the first zero-sized block.
    pub fn new(sizes: Vec<usize>) -> ProblemResult<Self> {
        if sizes.is_empty() {
            return Err(ProblemError::EmptyPartition);
        }
        let mut offsets = Vec::with_capacity(sizes.len());
        let mut total = 0usize;
        for (index, &size) in sizes.iter().enumerate() {
            if size == 0 {
                return Err(ProblemError::ZeroBlock { index });
            }
            offsets.push(total);
            total += size;
        }
        Ok(Self { sizes, offsets, total })
    }

    /// Partition of `n` coefficients into singleton groups (plain LASSO).
    pub fn singletons(n: usize) -> ProblemResult<Self> {
        Self::new(vec![1; n])
    }

    /// Verify that the blocks cover exactly `n` coefficients.
    ///
    /// # Errors
    /// Returns [`ProblemError::PartitionSumMismatch`] when `Σ n_g ≠ n`.
    pub fn check_len(&self, n: usize) -> ProblemResult<()> {
        if self.total != n {
            return Err(ProblemError::PartitionSumMismatch { sum: self.total, n });
        }
        Ok(())
    }

    /// Number of groups `G`.
    pub fn n_groups(&self) -> usize {
        self.sizes.len()
    }

    /// Total number of coefficients covered.
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    /// Half-open index ranges of the groups, in order.
    pub fn ranges(&self) -> impl Iterator<Item = Range<usize>> + '_ {
        self.offsets.iter().zip(&self.sizes).map(|(&start, &len)| start..start + len)
    }
}
