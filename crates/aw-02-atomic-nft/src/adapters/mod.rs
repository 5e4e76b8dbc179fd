//! # Adapters Layer (Outer Hexagon)

pub mod wiki_registry;

pub use wiki_registry::InMemoryWikiRegistry;
