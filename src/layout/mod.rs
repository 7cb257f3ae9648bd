//! Node measurement and arrangement.

/// Intrinsic sizes, row/column/grid placement and arrow resolution.
pub mod solver;
