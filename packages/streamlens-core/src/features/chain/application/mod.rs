pub mod builder;
pub mod merge;

pub use builder::{PredecessorGraphBuilder, WideningPolicy};
pub use merge::{combine, select, MergeEngine};
