//! # Adapters Layer (Hexagonal Architecture)
//!
//! Implements outbound port traits.

mod local_chain;

pub use local_chain::LocalChainProvider;
