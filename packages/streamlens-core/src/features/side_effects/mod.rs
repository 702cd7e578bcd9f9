/*
 * Side-Effects Feature
 *
 * Flags pipelines whose behavioral arguments may write observable state.
 * Writes owned by framework-internal types do not count.
 */

pub mod application;

pub use application::SideEffectDetector;
