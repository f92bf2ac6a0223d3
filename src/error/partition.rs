use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PartitionError {
    /// The geometry is empty or degenerate and has no envelope to lay a grid over.
    #[error("The geometry collection does not have valid envelope bounds")]
    NoBounds,
    /// Grid cells must have a finite, positive size.
    #[error("Invalid partition cell size: {0}")]
    InvalidCellSize(f64),
}
