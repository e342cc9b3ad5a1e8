//! Reya order signer
//!
//! This is the root crate that provides benchmark and integration-test access
//! to the library. For actual functionality, use `reya-core` directly:
//!
//! - `reya_core::scaling`: exact decimal to fixed-point conversion
//! - `reya_core::signing`: typed data, input encoding, nonces, signing
//! - `reya_core::types`: order intents and wire request bodies
//! - `reya_core::config`: chain presets and configuration loading

// Re-export for benchmarks
pub use reya_core as core;
