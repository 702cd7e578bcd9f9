/*
 * Classification Feature
 *
 * Per-instance boolean classifiers: stateful intermediate operations in the
 * chain, and order sensitivity of the consuming terminal call.
 */

pub mod application;

pub use application::{ReduceOrderClassifier, ReduceOrderReport, StatefulOpDetector};
