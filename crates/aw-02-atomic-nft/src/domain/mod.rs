//! # Domain Layer (Inner Hexagon)
//!
//! Pure rules of the atomic NFT. The linked wiki state is passed in by the
//! service after it has been resolved; nothing here performs I/O.

pub mod entities;
pub mod rules;

pub use entities::*;
pub use rules::*;
