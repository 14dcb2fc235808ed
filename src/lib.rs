//! Core library functions for the entity graph analyzer

pub mod config;
pub mod error;
pub mod data;
pub mod graph;
pub mod cluster;
pub mod pipeline;
pub mod viz;

pub use anyhow::{Result, anyhow};
pub use error::GraphError;
