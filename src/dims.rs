//! Condition x replicate grid used for every per-BAM-file option

use crate::{ThorError, ThorResult};
use serde::Serialize;

/// Values laid out per condition, then per replicate
pub type Grid<T> = Vec<Vec<T>>;

/// Shape of the experiment: conditions x replicates per condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dimensions {
    pub conditions: usize,
    pub replicates: usize,
}

impl Dimensions {
    /// Two conditions with `replicates` BAM files each
    pub fn new(replicates: usize) -> Self {
        Self {
            conditions: 2,
            replicates,
        }
    }

    /// Number of values a per-BAM-file list must hold
    pub fn len(&self) -> usize {
        self.conditions * self.replicates
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Test if data given satisfies the dimension required
pub fn is_valid_dim<T>(data: &[T], dims: Dimensions) -> bool {
    data.len() == dims.len()
}

/// Split a flat list row-major into one row per condition.
///
/// Callers must check [`is_valid_dim`] first.
pub fn reshape<T: Clone>(data: &[T], dims: Dimensions) -> Grid<T> {
    debug_assert!(is_valid_dim(data, dims));
    if dims.is_empty() {
        return vec![Vec::new(); dims.conditions];
    }
    data.chunks(dims.replicates).map(|row| row.to_vec()).collect()
}

/// Validate and reshape an optional CLI list.
///
/// An absent or empty list means "not given" and yields `None`.
pub fn shape_option<T: Clone>(
    option: &'static str,
    data: Option<&[T]>,
    dims: Dimensions,
) -> ThorResult<Option<Grid<T>>> {
    match data {
        None => Ok(None),
        Some(values) if values.is_empty() => Ok(None),
        Some(values) => {
            if !is_valid_dim(values, dims) {
                return Err(ThorError::DimensionMismatch {
                    option,
                    expected: dims.len(),
                    found: values.len(),
                });
            }
            Ok(Some(reshape(values, dims)))
        }
    }
}
