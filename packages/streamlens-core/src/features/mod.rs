/*
 * Feature Modules
 *
 * Each feature is a vertical slice with its own domain, application, and
 * (where needed) infrastructure and ports layers:
 *
 * - catalog: operation and source-capability tables, built-in and parsed
 * - oracle: boundary to the external call-graph/points-to engine
 * - automata: attribute automata and the typestate fact table
 * - chain: predecessor graph construction and the state merge engine
 * - reachability: terminal-operation sweep and consumption check
 * - side_effects: observable writes reachable from behavioral arguments
 * - classification: stateful-operation and reduce-order classifiers
 * - aggregation: conversion into the exposed attribute report
 */

pub mod aggregation;
pub mod automata;
pub mod catalog;
pub mod chain;
pub mod classification;
pub mod oracle;
pub mod reachability;
pub mod side_effects;
