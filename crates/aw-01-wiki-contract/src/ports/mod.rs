//! # Ports Layer (Middle Hexagon)
//!
//! Trait definitions for driving the wiki contract.
//!
//! - **Driving Ports (Inbound)**: `WikiContractApi`
//! - The contract has no driven ports: it needs nothing from the outside
//!   world beyond the interaction and the block context.

pub mod inbound;

pub use inbound::*;
