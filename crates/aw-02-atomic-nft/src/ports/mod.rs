//! # Ports Layer (Middle Hexagon)
//!
//! - **Driving Ports (Inbound)**: `AtomicNftApi`
//! - **Driven Ports (Outbound)**: `LinkedStateReader`

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
