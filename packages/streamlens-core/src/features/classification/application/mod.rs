pub mod reduce_order;
pub mod stateful;

pub use reduce_order::{ReduceOrderClassifier, ReduceOrderReport};
pub use stateful::StatefulOpDetector;
