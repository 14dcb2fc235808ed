//! Graph representation and algorithms module

pub mod cooccurrence;
pub mod builder;
pub mod algorithms;

pub use cooccurrence::{Cooccurrence, CooccurrenceGraph, Entity};
