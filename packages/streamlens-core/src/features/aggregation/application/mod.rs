pub mod aggregator;

pub use aggregator::{AggregationInput, ResultAggregator};
