//! Shared test fixtures for the share workspace.
//!
//! Dev-dependency only, never published.
//!
//! - [`roots`]: [`TestRoots`] fixture pairing a local and a shared
//!   tree inside one temporary directory

pub mod roots;

pub use roots::TestRoots;
