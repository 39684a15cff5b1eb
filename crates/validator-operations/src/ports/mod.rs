//! # Ports Layer
//!
//! Trait definitions for the hexagonal architecture.
//! - **Inbound (Driving)**: API that external callers use
//! - **Outbound (Driven)**: Chain data and submission collaborators

pub mod inbound;
pub mod outbound;

pub use inbound::OperationBuilderApi;
pub use outbound::{ChainParameterProvider, MockSubmitter, OperationSubmitter};
