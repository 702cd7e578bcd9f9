pub mod predecessor_graph;

pub use predecessor_graph::PredecessorGraph;
