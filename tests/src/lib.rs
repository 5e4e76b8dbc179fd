//! # ArWiki Test Suite
//!
//! Cross-crate tests for the wiki contract, the atomic NFT and the runtime.
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── src/integration/
//! │   ├── scenarios.rs    # End-to-end contract flows through the JSON entry point
//! │   ├── properties.rs   # Seeded random sequences checked against the invariants
//! │   └── nft_link.rs     # NFT ownership following page sponsorship via the host
//! └── benches/
//!     └── contract_benchmarks.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p aw-tests
//! cargo bench -p aw-tests
//! ```

#[cfg(test)]
mod integration;
