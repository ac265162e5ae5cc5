//! Lifecycle Comprehensive Test Suite
//!
//! End-to-end tests through the public `gdbkit` surface: configuration
//! loading, hub activation, per-thread sessions and identifier resolution
//! against the bundled file engine.
//!
//! ## Test Tier Structure
//!
//! - **Tier 1: Scenarios** (fast, must pass)
//!   Multi-database configuration, direct activation, composite names,
//!   schema drop.
//!
//! - **Tier 2: Activation and lifecycle** (fail-closed activation, custom
//!   loaders, restart staleness)
//!
//! - **Tier 3: Concurrency and properties** (threads, proptest)
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test lifecycle_comprehensive
//! ```

// Test utilities
mod test_utils;

// Tier 1: Scenarios
mod scenario_tests;

// Tier 2: Activation and lifecycle
mod activation_tests;

// Tier 3: Concurrency and properties
mod concurrency_tests;
mod property_tests;
